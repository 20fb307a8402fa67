//! Transformation rules
//!
//! A transformation rule is one step in the per-node rule pipeline. Rules
//! advance the chain by invoking the chained context's continuation with
//! the result they produced; a rule that declines to do so terminates the
//! chain early, and neither the remaining rules nor the terminal step run.

pub mod attributes;
pub mod chain;

pub use attributes::{
    AttributeRewriteTable, AttributeRule, AttributeTransformationRule, MapValue, RemoveAttribute,
    RenameAttribute,
};
pub use chain::{ChainedOperationContext, ChainedResourceContext};

use crate::address::PathAddress;
use crate::errors::Result;
use crate::model::{Operation, Resource};

/// One step in a node's transformation rule pipeline
///
/// Both entry points receive the unit being transformed by value: the
/// operation is always a fresh rewrite product, and the resource is always
/// the node's protected clone, so rules are free to mutate what they are
/// given before passing it on.
pub trait TransformationRule: Send + Sync {
    fn transform_operation(
        &self,
        operation: Operation,
        address: &PathAddress,
        ctx: &mut ChainedOperationContext<'_>,
    ) -> Result<()>;

    fn transform_resource(
        &self,
        resource: Resource,
        address: &PathAddress,
        ctx: &mut ChainedResourceContext<'_>,
    ) -> Result<()>;
}
