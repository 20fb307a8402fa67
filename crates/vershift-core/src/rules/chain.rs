//! Chained rule contexts
//!
//! The chain is continuation-passing in explicit form: each context owns
//! the slice of remaining rules, and `invoke_next` hands the produced
//! result to the next rule (or, on the resource path, to the terminal
//! resource transformer once no rules remain). A rule that returns without
//! calling `invoke_next` terminates the chain early.

use std::sync::Arc;

use super::TransformationRule;
use crate::address::PathAddress;
use crate::context::{ResourceTransformationContext, TransformationContext};
use crate::errors::Result;
use crate::model::{AttributeModel, Resource};
use crate::transformer::{OperationResultTransformer, ResourceTransformer, TransformedOperation};

/// Chain context for the operation path
///
/// Records every intermediate transformed-operation result as the chain
/// advances; `compose` folds them into the net result once the chain has
/// run to whatever point it reached.
pub struct ChainedOperationContext<'a> {
    ctx: &'a TransformationContext,
    address: &'a PathAddress,
    remaining: &'a [Arc<dyn TransformationRule>],
    recorded: Vec<TransformedOperation>,
}

impl<'a> ChainedOperationContext<'a> {
    pub(crate) fn new(
        ctx: &'a TransformationContext,
        address: &'a PathAddress,
        rules: &'a [Arc<dyn TransformationRule>],
    ) -> Self {
        Self {
            ctx,
            address,
            remaining: rules,
            recorded: Vec::new(),
        }
    }

    pub fn transformation_context(&self) -> &TransformationContext {
        self.ctx
    }

    /// Record a rule's result and advance to the next rule
    ///
    /// A recorded discard sentinel short-circuits: there is no operation
    /// left to feed the remaining rules, so the chain ends there.
    pub fn invoke_next(&mut self, transformed: TransformedOperation) -> Result<()> {
        self.recorded.push(transformed);
        let Some(operation) = self
            .recorded
            .last()
            .and_then(|t| t.operation())
            .cloned()
        else {
            return Ok(());
        };

        let remaining = self.remaining;
        if let Some((next, rest)) = remaining.split_first() {
            self.remaining = rest;
            let address = self.address;
            next.transform_operation(operation, address, self)
        } else {
            Ok(())
        }
    }

    /// Fold the recorded results into the net transformed operation
    ///
    /// The last recorded rewritten operation is what goes onward; result
    /// transformers are applied in reverse recording order, so a response
    /// walks back through the pipeline the way it came. An empty record
    /// (a first rule that never invoked its continuation) composes to the
    /// discard sentinel.
    pub fn compose(self) -> TransformedOperation {
        let mut recorded = self.recorded;
        let Some(last) = recorded.pop() else {
            return TransformedOperation::discarded();
        };
        if recorded.is_empty() {
            return last;
        }
        let mut steps: Vec<Arc<dyn OperationResultTransformer>> =
            recorded.iter().map(|t| t.result_transformer()).collect();
        steps.push(last.result_transformer());
        TransformedOperation::from_parts(
            last.into_operation(),
            Arc::new(ComposedResultTransformer { steps }),
        )
    }
}

/// Applies recorded result transformers in reverse recording order
struct ComposedResultTransformer {
    steps: Vec<Arc<dyn OperationResultTransformer>>,
}

impl OperationResultTransformer for ComposedResultTransformer {
    fn transform_result(&self, result: AttributeModel) -> AttributeModel {
        self.steps
            .iter()
            .rev()
            .fold(result, |acc, step| step.transform_result(acc))
    }
}

/// Chain context for the resource path
///
/// Symmetric to the operation context, except the tail action once no
/// rules remain is the node's terminal resource transformer.
pub struct ChainedResourceContext<'a> {
    ctx: &'a mut ResourceTransformationContext,
    address: &'a PathAddress,
    remaining: &'a [Arc<dyn TransformationRule>],
    terminal: &'a dyn ResourceTransformer,
}

impl<'a> ChainedResourceContext<'a> {
    pub(crate) fn new(
        ctx: &'a mut ResourceTransformationContext,
        address: &'a PathAddress,
        rules: &'a [Arc<dyn TransformationRule>],
        terminal: &'a dyn ResourceTransformer,
    ) -> Self {
        Self {
            ctx,
            address,
            remaining: rules,
            terminal,
        }
    }

    pub fn transformation_context(&self) -> &TransformationContext {
        self.ctx.transformation_context()
    }

    /// Hand the resource to the next rule, or to the terminal transformer
    /// once no rules remain
    pub fn invoke_next(&mut self, resource: Resource) -> Result<()> {
        let remaining = self.remaining;
        let address = self.address;
        if let Some((next, rest)) = remaining.split_first() {
            self.remaining = rest;
            next.transform_resource(resource, address, self)
        } else {
            let terminal = self.terminal;
            terminal.transform_resource(self.ctx, address, resource)
        }
    }
}
