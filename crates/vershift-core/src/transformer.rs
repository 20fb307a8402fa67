//! Transformer traits and the transformed-operation result
//!
//! Operation transformation produces a `TransformedOperation`: the rewritten
//! operation (or the discard sentinel) together with a result transformer
//! that re-maps a deferred response back to the caller's expected shape.
//! Resource transformation emits directly into the target tree through the
//! resource transformation context; its result is the tree itself.

use std::sync::Arc;

use crate::address::PathAddress;
use crate::context::{ResourceTransformationContext, TransformationContext};
use crate::errors::Result;
use crate::model::{AttributeModel, Operation, Resource};
use crate::node::TransformationNode;

/// Re-maps a deferred operation response to the caller's expected shape
pub trait OperationResultTransformer: Send + Sync {
    fn transform_result(&self, result: AttributeModel) -> AttributeModel;
}

/// Result transformer that returns the response unchanged (the default)
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityResultTransformer;

impl OperationResultTransformer for IdentityResultTransformer {
    fn transform_result(&self, result: AttributeModel) -> AttributeModel {
        result
    }
}

/// The outcome of transforming one operation
///
/// Either a rewritten operation to send onward, or the canonical discard
/// sentinel: no operation is produced and any response is treated as
/// trivially successful.
#[derive(Clone)]
pub struct TransformedOperation {
    operation: Option<Operation>,
    result_transformer: Arc<dyn OperationResultTransformer>,
}

impl TransformedOperation {
    /// A rewritten operation with the identity result transformer
    pub fn new(operation: Operation) -> Self {
        Self {
            operation: Some(operation),
            result_transformer: Arc::new(IdentityResultTransformer),
        }
    }

    /// A rewritten operation with an explicit result transformer
    pub fn with_result_transformer(
        operation: Operation,
        result_transformer: Arc<dyn OperationResultTransformer>,
    ) -> Self {
        Self {
            operation: Some(operation),
            result_transformer,
        }
    }

    /// The canonical discard sentinel
    ///
    /// Do not send anything onward; treat any response as success.
    pub fn discarded() -> Self {
        Self {
            operation: None,
            result_transformer: Arc::new(IdentityResultTransformer),
        }
    }

    pub(crate) fn from_parts(
        operation: Option<Operation>,
        result_transformer: Arc<dyn OperationResultTransformer>,
    ) -> Self {
        Self {
            operation,
            result_transformer,
        }
    }

    pub fn is_discarded(&self) -> bool {
        self.operation.is_none()
    }

    /// The rewritten operation, or None for the discard sentinel
    pub fn operation(&self) -> Option<&Operation> {
        self.operation.as_ref()
    }

    pub fn into_operation(self) -> Option<Operation> {
        self.operation
    }

    /// Re-map a response through this result's transformer
    pub fn transform_result(&self, result: AttributeModel) -> AttributeModel {
        self.result_transformer.transform_result(result)
    }

    pub(crate) fn result_transformer(&self) -> Arc<dyn OperationResultTransformer> {
        Arc::clone(&self.result_transformer)
    }
}

impl std::fmt::Debug for TransformedOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransformedOperation")
            .field("operation", &self.operation)
            .finish_non_exhaustive()
    }
}

/// Transforms one operation for the other side of the version boundary
pub trait OperationTransformer: Send + Sync {
    fn transform_operation(
        &self,
        ctx: &TransformationContext,
        address: &PathAddress,
        operation: &Operation,
    ) -> Result<TransformedOperation>;
}

/// Transforms one resource, emitting into the target tree
///
/// Recursion into child resources is the transformer's own concern; the
/// node invoking it makes no assumption either way.
pub trait ResourceTransformer: Send + Sync {
    fn transform_resource(
        &self,
        ctx: &mut ResourceTransformationContext,
        address: &PathAddress,
        resource: Resource,
    ) -> Result<()>;
}

/// Default terminal resource transformer
///
/// Emits the transformed model at the resource's address, then walks the
/// child resources: a child whose segment matches a child node is handed to
/// that node for transformation; a child with no matching node is copied
/// into the target tree verbatim.
pub struct EmitAndRecurse {
    children: Arc<Vec<TransformationNode>>,
}

impl EmitAndRecurse {
    pub(crate) fn new(children: Arc<Vec<TransformationNode>>) -> Self {
        Self { children }
    }
}

impl ResourceTransformer for EmitAndRecurse {
    fn transform_resource(
        &self,
        ctx: &mut ResourceTransformationContext,
        address: &PathAddress,
        resource: Resource,
    ) -> Result<()> {
        let (model, children) = resource.into_parts();
        ctx.emit(address, model);
        for (segment, child) in children {
            let child_address = address.append(segment.clone());
            match self.children.iter().find(|n| n.path().matches(&segment)) {
                Some(node) => node.transform_resource(ctx, &child_address, &child)?,
                None => ctx.emit_subtree(&child_address, child),
            }
        }
        Ok(())
    }
}

impl std::fmt::Debug for EmitAndRecurse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmitAndRecurse")
            .field("children", &self.children.len())
            .finish()
    }
}
