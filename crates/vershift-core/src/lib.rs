//! Vershift Core - versioned model-transformation engine
//!
//! This crate provides the foundational structures and operations for
//! transforming hierarchical management state across version boundaries,
//! including:
//! - Hierarchical addresses (path segments and path addresses)
//! - Attribute models, resources, and operations
//! - Discard policies for units with no representation on the other side
//! - Per-attribute rewrite rules and the rule table
//! - The chained transformation rule pipeline
//! - Transformation nodes with build-time operation-transformer registration
//!
//! The engine is pure in-memory model transformation: the tree of
//! transformation nodes is built once, is immutable afterwards, and is safe
//! for unbounded concurrent invocation. Every call carries its own context
//! and its own defensively cloned data.

pub mod address;
pub mod context;
pub mod errors;
pub mod logging_facility;
pub mod model;
pub mod node;
pub mod policy;
pub mod rules;
pub mod transformer;

// Re-export commonly used types
pub use address::{PathAddress, PathSegment};
pub use context::{ResourceTransformationContext, TargetVersion, TransformationContext};
pub use errors::{Result, TransformError};
pub use model::{AttributeModel, Operation, Resource, WellKnownOperation};
pub use node::{TransformationNode, TransformationNodeBuilder};
pub use policy::{DiscardDecision, DiscardPolicy, NeverDiscardPolicy, PredicateDiscardPolicy};
pub use rules::{AttributeRewriteTable, AttributeRule, TransformationRule};
pub use transformer::{
    OperationResultTransformer, OperationTransformer, ResourceTransformer, TransformedOperation,
};
