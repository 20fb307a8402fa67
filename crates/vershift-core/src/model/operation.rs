use serde::{Deserialize, Serialize};

use super::AttributeModel;
use crate::address::PathAddress;

/// Parameter key naming the attribute an operation acts on
pub const NAME_PARAM: &str = "name";

/// Parameter key carrying the value of a write-attribute operation
pub const VALUE_PARAM: &str = "value";

/// Well-known operation identifiers shared between the node and its
/// auto-registration logic
///
/// These are the operations every node understands implicitly: direct
/// attribute writes and undefines obey the same rewrite semantics as
/// whole-resource transformation, so their transformers are derived from
/// the node's attribute rule table rather than registered by hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WellKnownOperation {
    WriteAttribute,
    UndefineAttribute,
}

impl WellKnownOperation {
    /// The wire name of the operation
    pub const fn as_str(&self) -> &'static str {
        match self {
            WellKnownOperation::WriteAttribute => "write-attribute",
            WellKnownOperation::UndefineAttribute => "undefine-attribute",
        }
    }

    /// Resolve a wire name back to the well-known identifier
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "write-attribute" => Some(WellKnownOperation::WriteAttribute),
            "undefine-attribute" => Some(WellKnownOperation::UndefineAttribute),
            _ => None,
        }
    }
}

impl std::fmt::Display for WellKnownOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A named action with parameters, targeted at an address
///
/// Operations are immutable inputs to the engine; transformation always
/// produces a new operation (or the decision to discard it).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    name: String,
    address: PathAddress,
    params: AttributeModel,
}

impl Operation {
    /// Create an operation with no parameters
    pub fn new(name: impl Into<String>, address: PathAddress) -> Self {
        Self {
            name: name.into(),
            address,
            params: AttributeModel::new(),
        }
    }

    /// Add one parameter
    pub fn with_param(mut self, name: impl Into<String>, value: serde_json::Value) -> Self {
        self.params.set(name.into(), value);
        self
    }

    /// Replace the parameter model wholesale
    pub fn with_params(mut self, params: AttributeModel) -> Self {
        self.params = params;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn address(&self) -> &PathAddress {
        &self.address
    }

    pub fn params(&self) -> &AttributeModel {
        &self.params
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::PathSegment;
    use serde_json::json;

    #[test]
    fn test_well_known_names_round_trip() {
        for op in [
            WellKnownOperation::WriteAttribute,
            WellKnownOperation::UndefineAttribute,
        ] {
            assert_eq!(WellKnownOperation::from_name(op.as_str()), Some(op));
        }
        assert_eq!(WellKnownOperation::from_name("add"), None);
    }

    #[test]
    fn test_operation_builder_params() {
        let address = PathAddress::empty().append(PathSegment::new("subsystem", "web"));
        let op = Operation::new(WellKnownOperation::WriteAttribute.as_str(), address.clone())
            .with_param(NAME_PARAM, json!("port"))
            .with_param(VALUE_PARAM, json!(8080));

        assert_eq!(op.name(), "write-attribute");
        assert_eq!(op.address(), &address);
        assert_eq!(op.params().get(NAME_PARAM), Some(&json!("port")));
        assert_eq!(op.params().get(VALUE_PARAM), Some(&json!(8080)));
    }
}
