//! Discard policy trait and implementations
//!
//! A discard policy decides, per resource or per operation, whether the
//! whole unit is silently dropped, rejected, or passed through to rule
//! processing. Silent discard is the deliberate "this unit does not exist
//! on the other side of the version boundary" outcome; it is not an error.

use crate::address::PathAddress;
use crate::context::TransformationContext;
use crate::model::AttributeModel;

/// Outcome of a discard-policy decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscardDecision {
    /// Drop the unit with no error and no trace left for the caller
    Silent,
    /// Fail the whole transformation of this unit with a reported error
    Reject,
    /// Proceed to rule-chain processing
    Continue,
}

/// Policy trait deciding the fate of a resource or operation
///
/// Inputs are the unit's attribute model (the resource snapshot or the
/// operation's parameters), its address, and the ambient context carrying
/// target-version information. Implementations must be side-effect free.
pub trait DiscardPolicy: Send + Sync {
    fn decide(
        &self,
        model: &AttributeModel,
        address: &PathAddress,
        ctx: &TransformationContext,
    ) -> DiscardDecision;
}

/// Policy that never discards anything (the default)
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverDiscardPolicy;

impl DiscardPolicy for NeverDiscardPolicy {
    fn decide(
        &self,
        _model: &AttributeModel,
        _address: &PathAddress,
        _ctx: &TransformationContext,
    ) -> DiscardDecision {
        DiscardDecision::Continue
    }
}

/// Policy returning a fixed decision when a predicate holds
///
/// # Example
/// ```
/// use serde_json::json;
/// use vershift_core::{AttributeModel, PathAddress, PredicateDiscardPolicy};
/// use vershift_core::{DiscardDecision, DiscardPolicy, TargetVersion, TransformationContext};
///
/// let policy = PredicateDiscardPolicy::silent_when(|model, _address, _ctx| {
///     model.get("deprecated") == Some(&json!(true))
/// });
///
/// let ctx = TransformationContext::new(TargetVersion::new(1, 4, 0));
/// let mut model = AttributeModel::new();
/// model.set("deprecated".to_string(), json!(true));
/// assert_eq!(
///     policy.decide(&model, &PathAddress::empty(), &ctx),
///     DiscardDecision::Silent
/// );
/// ```
pub struct PredicateDiscardPolicy {
    decision: DiscardDecision,
    predicate:
        Box<dyn Fn(&AttributeModel, &PathAddress, &TransformationContext) -> bool + Send + Sync>,
}

impl PredicateDiscardPolicy {
    /// Create a policy with an explicit decision for matching units
    pub fn new<F>(decision: DiscardDecision, predicate: F) -> Self
    where
        F: Fn(&AttributeModel, &PathAddress, &TransformationContext) -> bool + Send + Sync + 'static,
    {
        Self {
            decision,
            predicate: Box::new(predicate),
        }
    }

    /// Silently discard units for which the predicate holds
    pub fn silent_when<F>(predicate: F) -> Self
    where
        F: Fn(&AttributeModel, &PathAddress, &TransformationContext) -> bool + Send + Sync + 'static,
    {
        Self::new(DiscardDecision::Silent, predicate)
    }

    /// Reject units for which the predicate holds
    pub fn reject_when<F>(predicate: F) -> Self
    where
        F: Fn(&AttributeModel, &PathAddress, &TransformationContext) -> bool + Send + Sync + 'static,
    {
        Self::new(DiscardDecision::Reject, predicate)
    }
}

impl DiscardPolicy for PredicateDiscardPolicy {
    fn decide(
        &self,
        model: &AttributeModel,
        address: &PathAddress,
        ctx: &TransformationContext,
    ) -> DiscardDecision {
        if (self.predicate)(model, address, ctx) {
            self.decision
        } else {
            DiscardDecision::Continue
        }
    }
}

impl std::fmt::Debug for PredicateDiscardPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PredicateDiscardPolicy")
            .field("decision", &self.decision)
            .finish_non_exhaustive()
    }
}
