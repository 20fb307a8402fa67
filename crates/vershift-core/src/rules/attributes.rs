//! Per-attribute rewrite rules and the rule table
//!
//! An attribute rule transforms or removes a single named attribute value,
//! independent of its siblings. The table maps attribute names to rules;
//! attributes without an entry pass through unchanged. The same table also
//! yields the derived write-attribute/undefine-attribute operation
//! transformers, so direct attribute writes obey identical rewrite
//! semantics as whole-resource transformation.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value;

use super::chain::{ChainedOperationContext, ChainedResourceContext};
use super::TransformationRule;
use crate::address::PathAddress;
use crate::context::TransformationContext;
use crate::errors::{Result, TransformError};
use crate::model::{AttributeModel, Operation, Resource, NAME_PARAM, VALUE_PARAM};
use crate::transformer::{OperationTransformer, TransformedOperation};

/// Rewrites one named attribute
///
/// `None` removes the attribute entirely; `Some((name, value))` keeps it
/// under the returned name (possibly renamed) with the returned value
/// (possibly transformed).
pub trait AttributeRule: Send + Sync {
    fn rewrite(
        &self,
        name: &str,
        value: Value,
        address: &PathAddress,
        ctx: &TransformationContext,
    ) -> Option<(String, Value)>;
}

/// Rule that renames an attribute, keeping its value
#[derive(Debug, Clone)]
pub struct RenameAttribute {
    to: String,
}

impl RenameAttribute {
    pub fn new(to: impl Into<String>) -> Self {
        Self { to: to.into() }
    }
}

impl AttributeRule for RenameAttribute {
    fn rewrite(
        &self,
        _name: &str,
        value: Value,
        _address: &PathAddress,
        _ctx: &TransformationContext,
    ) -> Option<(String, Value)> {
        Some((self.to.clone(), value))
    }
}

/// Rule that removes an attribute entirely
#[derive(Debug, Clone, Copy, Default)]
pub struct RemoveAttribute;

impl AttributeRule for RemoveAttribute {
    fn rewrite(
        &self,
        _name: &str,
        _value: Value,
        _address: &PathAddress,
        _ctx: &TransformationContext,
    ) -> Option<(String, Value)> {
        None
    }
}

/// Rule that transforms an attribute's value, keeping its name
pub struct MapValue {
    map: Box<dyn Fn(Value) -> Value + Send + Sync>,
}

impl MapValue {
    pub fn new<F>(map: F) -> Self
    where
        F: Fn(Value) -> Value + Send + Sync + 'static,
    {
        Self { map: Box::new(map) }
    }
}

impl AttributeRule for MapValue {
    fn rewrite(
        &self,
        name: &str,
        value: Value,
        _address: &PathAddress,
        _ctx: &TransformationContext,
    ) -> Option<(String, Value)> {
        Some((name.to_string(), (self.map)(value)))
    }
}

impl std::fmt::Debug for MapValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapValue").finish_non_exhaustive()
    }
}

/// Named attribute rules, ordered by attribute name
#[derive(Default)]
pub struct AttributeRewriteTable {
    rules: BTreeMap<String, Arc<dyn AttributeRule>>,
}

impl AttributeRewriteTable {
    pub fn new() -> Self {
        Self {
            rules: BTreeMap::new(),
        }
    }

    /// Register a rule for one attribute name
    pub fn insert(&mut self, name: impl Into<String>, rule: impl AttributeRule + 'static) {
        self.rules.insert(name.into(), Arc::new(rule));
    }

    /// Builder form of `insert`
    pub fn with_rule(mut self, name: impl Into<String>, rule: impl AttributeRule + 'static) -> Self {
        self.insert(name, rule);
        self
    }

    /// Look up the rule for one attribute name
    pub fn get(&self, name: &str) -> Option<&Arc<dyn AttributeRule>> {
        self.rules.get(name)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rewrite a whole model through the table
    ///
    /// Attributes with a table entry are replaced per their rule; attributes
    /// without one pass through unchanged. Rule application is independent
    /// per attribute.
    pub fn apply(
        &self,
        model: &AttributeModel,
        address: &PathAddress,
        ctx: &TransformationContext,
    ) -> AttributeModel {
        let mut out = AttributeModel::new();
        for (name, value) in model.iter() {
            match self.rules.get(name) {
                None => out.set(name.clone(), value.clone()),
                Some(rule) => {
                    if let Some((new_name, new_value)) =
                        rule.rewrite(name, value.clone(), address, ctx)
                    {
                        out.set(new_name, new_value);
                    }
                }
            }
        }
        out
    }
}

impl std::fmt::Debug for AttributeRewriteTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AttributeRewriteTable")
            .field("attributes", &self.rules.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// The implicit first rule of every node's chain
///
/// Rewrites the operation's parameter model (or the resource's attribute
/// model) through the node's rule table, then advances the chain with the
/// result.
pub struct AttributeTransformationRule {
    table: Arc<AttributeRewriteTable>,
}

impl AttributeTransformationRule {
    pub(crate) fn new(table: Arc<AttributeRewriteTable>) -> Self {
        Self { table }
    }
}

impl TransformationRule for AttributeTransformationRule {
    fn transform_operation(
        &self,
        operation: Operation,
        address: &PathAddress,
        ctx: &mut ChainedOperationContext<'_>,
    ) -> Result<()> {
        let params = self
            .table
            .apply(operation.params(), address, ctx.transformation_context());
        let rewritten = Operation::new(operation.name(), operation.address().clone())
            .with_params(params);
        ctx.invoke_next(TransformedOperation::new(rewritten))
    }

    fn transform_resource(
        &self,
        mut resource: Resource,
        address: &PathAddress,
        ctx: &mut ChainedResourceContext<'_>,
    ) -> Result<()> {
        let model = self
            .table
            .apply(resource.model(), address, ctx.transformation_context());
        resource.set_model(model);
        ctx.invoke_next(resource)
    }
}

/// Derived transformer for the write-attribute operation
///
/// Built mechanically from the node's attribute rule table: the rule named
/// by the operation's `name` parameter rewrites the `name`/`value` pair. A
/// removed attribute discards the whole operation; a renamed attribute
/// retargets it.
pub(crate) struct WriteAttributeTransformer {
    table: Arc<AttributeRewriteTable>,
}

impl WriteAttributeTransformer {
    pub(crate) fn new(table: Arc<AttributeRewriteTable>) -> Self {
        Self { table }
    }
}

impl OperationTransformer for WriteAttributeTransformer {
    fn transform_operation(
        &self,
        ctx: &TransformationContext,
        address: &PathAddress,
        operation: &Operation,
    ) -> Result<TransformedOperation> {
        let attribute = operation
            .params()
            .get(NAME_PARAM)
            .and_then(Value::as_str)
            .ok_or_else(|| TransformError::MissingParameter {
                operation: operation.name().to_string(),
                parameter: NAME_PARAM.to_string(),
            })?;

        let Some(rule) = self.table.get(attribute) else {
            return Ok(TransformedOperation::new(operation.clone()));
        };

        let value = operation
            .params()
            .get(VALUE_PARAM)
            .cloned()
            .unwrap_or(Value::Null);
        match rule.rewrite(attribute, value, address, ctx) {
            None => Ok(TransformedOperation::discarded()),
            Some((new_name, new_value)) => {
                let mut params = operation.params().clone();
                params.set(NAME_PARAM.to_string(), Value::String(new_name));
                params.set(VALUE_PARAM.to_string(), new_value);
                let rewritten = Operation::new(operation.name(), operation.address().clone())
                    .with_params(params);
                Ok(TransformedOperation::new(rewritten))
            }
        }
    }
}

/// Derived transformer for the undefine-attribute operation
///
/// The no-value counterpart of `WriteAttributeTransformer`: the named
/// attribute's rule decides whether the undefine survives (under a
/// possibly renamed attribute) or the operation is discarded.
pub(crate) struct UndefineAttributeTransformer {
    table: Arc<AttributeRewriteTable>,
}

impl UndefineAttributeTransformer {
    pub(crate) fn new(table: Arc<AttributeRewriteTable>) -> Self {
        Self { table }
    }
}

impl OperationTransformer for UndefineAttributeTransformer {
    fn transform_operation(
        &self,
        ctx: &TransformationContext,
        address: &PathAddress,
        operation: &Operation,
    ) -> Result<TransformedOperation> {
        let attribute = operation
            .params()
            .get(NAME_PARAM)
            .and_then(Value::as_str)
            .ok_or_else(|| TransformError::MissingParameter {
                operation: operation.name().to_string(),
                parameter: NAME_PARAM.to_string(),
            })?;

        let Some(rule) = self.table.get(attribute) else {
            return Ok(TransformedOperation::new(operation.clone()));
        };

        match rule.rewrite(attribute, Value::Null, address, ctx) {
            None => Ok(TransformedOperation::discarded()),
            Some((new_name, _)) => {
                let mut params = operation.params().clone();
                params.set(NAME_PARAM.to_string(), Value::String(new_name));
                let rewritten = Operation::new(operation.name(), operation.address().clone())
                    .with_params(params);
                Ok(TransformedOperation::new(rewritten))
            }
        }
    }
}
