//! Transformation nodes
//!
//! A transformation node is bound to one path segment and owns everything
//! needed to rewrite resources and operations at that address level: a
//! discard policy, an attribute-rewrite table, registered operation
//! transformers, a terminal resource transformer, an ordered rule list, and
//! its child nodes. The tree is built once through the builder and is
//! immutable afterwards; every call carries its own context and cloned
//! data, so unbounded concurrent invocation needs no locks.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::address::{PathAddress, PathSegment};
use crate::context::{ResourceTransformationContext, TransformationContext};
use crate::errors::{Result, TransformError};
use crate::model::{Operation, Resource, WellKnownOperation};
use crate::policy::{DiscardDecision, DiscardPolicy, NeverDiscardPolicy};
use crate::rules::attributes::{
    AttributeRewriteTable, AttributeRule, AttributeTransformationRule,
    UndefineAttributeTransformer, WriteAttributeTransformer,
};
use crate::rules::chain::{ChainedOperationContext, ChainedResourceContext};
use crate::rules::TransformationRule;
use crate::transformer::{
    EmitAndRecurse, OperationTransformer, ResourceTransformer, TransformedOperation,
};

/// One node of the transformation tree
///
/// A node is itself both an operation transformer and a resource
/// transformer (it implements both traits), so it can be registered
/// generically wherever either is expected. Its own rules and discard
/// policy apply only at its own address level; composition with deeper
/// addresses is explicit through the children list.
pub struct TransformationNode {
    path: PathSegment,
    discard_policy: Arc<dyn DiscardPolicy>,
    attribute_rules: Arc<AttributeRewriteTable>,
    operation_transformers: BTreeMap<String, Arc<dyn OperationTransformer>>,
    resource_transformer: Arc<dyn ResourceTransformer>,
    rules: Vec<Arc<dyn TransformationRule>>,
    children: Arc<Vec<TransformationNode>>,
}

impl TransformationNode {
    /// Start building a node bound to the given path segment
    pub fn builder(path: PathSegment) -> TransformationNodeBuilder {
        TransformationNodeBuilder::new(path)
    }

    /// The path segment this node is bound to
    pub fn path(&self) -> &PathSegment {
        &self.path
    }

    /// Read-only view of the registered operation transformers, including
    /// the auto-registered write/undefine attribute entries
    pub fn operation_transformers(&self) -> &BTreeMap<String, Arc<dyn OperationTransformer>> {
        &self.operation_transformers
    }

    /// Read-only ordered list of child nodes
    pub fn children(&self) -> &[TransformationNode] {
        &self.children
    }

    /// First child whose bound segment matches (wildcard-aware)
    pub fn find_child(&self, segment: &PathSegment) -> Option<&TransformationNode> {
        self.children.iter().find(|n| n.path.matches(segment))
    }

    /// Whether this node's rules apply to addresses other than its own
    ///
    /// Always false for this node kind: an orchestrator must not apply a
    /// node's rules to an address that is not exactly its bound path.
    pub fn is_inherited(&self) -> bool {
        false
    }

    /// Transform one operation for the other side of the version boundary
    ///
    /// The discard policy runs first on the raw operation. A registered
    /// operation transformer for the operation name (explicit or
    /// auto-registered) intercepts the call; otherwise the rule chain runs
    /// with attribute rewriting as its first entry and the configured
    /// rules after it.
    ///
    /// # Errors
    ///
    /// Returns `OperationRejected` when the discard policy rejects the
    /// operation, or whatever error an intercepting transformer or chain
    /// rule reports.
    pub fn transform_operation(
        &self,
        ctx: &TransformationContext,
        address: &PathAddress,
        operation: &Operation,
    ) -> Result<TransformedOperation> {
        match self.discard_policy.decide(operation.params(), address, ctx) {
            DiscardDecision::Silent => {
                tracing::debug!(
                    component = module_path!(),
                    op = "transform_operation",
                    event = vershift_core_types::schema::EVENT_DISCARDED,
                    address = %address,
                    operation = operation.name(),
                );
                return Ok(TransformedOperation::discarded());
            }
            DiscardDecision::Reject => {
                return Err(TransformError::OperationRejected {
                    operation: operation.name().to_string(),
                    address: address.clone(),
                });
            }
            DiscardDecision::Continue => {}
        }

        if let Some(transformer) = self.operation_transformers.get(operation.name()) {
            return transformer.transform_operation(ctx, address, operation);
        }

        let mut chain = ChainedOperationContext::new(ctx, address, &self.rules);
        let first = AttributeTransformationRule::new(Arc::clone(&self.attribute_rules));
        first.transform_operation(operation.clone(), address, &mut chain)?;
        Ok(chain.compose())
    }

    /// Transform one resource into the context's target tree
    ///
    /// The original is deep-cloned before any policy or rule sees it, so
    /// the caller's resource is never mutated and stays safe for
    /// concurrent readers. A silent discard returns without touching the
    /// target tree or recursing; otherwise the chain runs and its tail
    /// step, the terminal resource transformer, emits and recurses.
    ///
    /// # Errors
    ///
    /// Returns `ResourceRejected` when the discard policy rejects the
    /// resource, or whatever error a chain rule or the terminal
    /// transformer reports.
    pub fn transform_resource(
        &self,
        ctx: &mut ResourceTransformationContext,
        address: &PathAddress,
        original: &Resource,
    ) -> Result<()> {
        let protected = original.clone();
        match self
            .discard_policy
            .decide(protected.model(), address, ctx.transformation_context())
        {
            DiscardDecision::Silent => {
                tracing::debug!(
                    component = module_path!(),
                    op = "transform_resource",
                    event = vershift_core_types::schema::EVENT_DISCARDED,
                    address = %address,
                );
                return Ok(());
            }
            DiscardDecision::Reject => {
                return Err(TransformError::ResourceRejected {
                    address: address.clone(),
                });
            }
            DiscardDecision::Continue => {}
        }

        let mut chain = ChainedResourceContext::new(
            ctx,
            address,
            &self.rules,
            self.resource_transformer.as_ref(),
        );
        let first = AttributeTransformationRule::new(Arc::clone(&self.attribute_rules));
        first.transform_resource(protected, address, &mut chain)
    }
}

impl OperationTransformer for TransformationNode {
    fn transform_operation(
        &self,
        ctx: &TransformationContext,
        address: &PathAddress,
        operation: &Operation,
    ) -> Result<TransformedOperation> {
        TransformationNode::transform_operation(self, ctx, address, operation)
    }
}

impl ResourceTransformer for TransformationNode {
    fn transform_resource(
        &self,
        ctx: &mut ResourceTransformationContext,
        address: &PathAddress,
        resource: Resource,
    ) -> Result<()> {
        TransformationNode::transform_resource(self, ctx, address, &resource)
    }
}

impl std::fmt::Debug for TransformationNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransformationNode")
            .field("path", &self.path)
            .field("attribute_rules", &self.attribute_rules)
            .field(
                "operation_transformers",
                &self.operation_transformers.keys().collect::<Vec<_>>(),
            )
            .field("children", &self.children)
            .finish_non_exhaustive()
    }
}

/// Builder for `TransformationNode`
///
/// The sole construction path. Auto-registration of the derived
/// write/undefine attribute transformers happens once here; a conflicting
/// explicit registration for the same operation name fails `build()`, so
/// misconfiguration surfaces at tree-build time rather than at call time.
pub struct TransformationNodeBuilder {
    path: PathSegment,
    discard_policy: Arc<dyn DiscardPolicy>,
    attribute_rules: AttributeRewriteTable,
    operation_transformers: Vec<(String, Arc<dyn OperationTransformer>)>,
    resource_transformer: Option<Arc<dyn ResourceTransformer>>,
    rules: Vec<Arc<dyn TransformationRule>>,
    children: Vec<TransformationNode>,
}

impl TransformationNodeBuilder {
    fn new(path: PathSegment) -> Self {
        Self {
            path,
            discard_policy: Arc::new(NeverDiscardPolicy),
            attribute_rules: AttributeRewriteTable::new(),
            operation_transformers: Vec::new(),
            resource_transformer: None,
            rules: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Set the discard policy (default: never discard)
    pub fn discard_policy(mut self, policy: impl DiscardPolicy + 'static) -> Self {
        self.discard_policy = Arc::new(policy);
        self
    }

    /// Register a rewrite rule for one attribute name
    pub fn rewrite_attribute(
        mut self,
        name: impl Into<String>,
        rule: impl AttributeRule + 'static,
    ) -> Self {
        self.attribute_rules.insert(name, rule);
        self
    }

    /// Register an explicit operation transformer for one operation name
    ///
    /// Explicit registrations always win over the auto-registered
    /// write/undefine attribute transformers. Registering the same name
    /// twice is a build-time error.
    pub fn register_operation_transformer(
        mut self,
        name: impl Into<String>,
        transformer: impl OperationTransformer + 'static,
    ) -> Self {
        self.operation_transformers
            .push((name.into(), Arc::new(transformer)));
        self
    }

    /// Set the terminal resource transformer (default: emit and recurse)
    pub fn resource_transformer(mut self, transformer: impl ResourceTransformer + 'static) -> Self {
        self.resource_transformer = Some(Arc::new(transformer));
        self
    }

    /// Append a rule to the node's ordered rule list
    ///
    /// Rules run after the implicit attribute-rewrite rule, in the order
    /// they were added.
    pub fn add_rule(mut self, rule: impl TransformationRule + 'static) -> Self {
        self.rules.push(Arc::new(rule));
        self
    }

    /// Append a child node
    pub fn add_child(mut self, child: TransformationNode) -> Self {
        self.children.push(child);
        self
    }

    /// Build the immutable node
    ///
    /// # Errors
    ///
    /// Returns `DuplicateOperationTransformer` if two explicit transformers
    /// were registered for the same operation name.
    pub fn build(self) -> Result<TransformationNode> {
        let mut transformers: BTreeMap<String, Arc<dyn OperationTransformer>> = BTreeMap::new();
        for (name, transformer) in self.operation_transformers {
            if transformers.insert(name.clone(), transformer).is_some() {
                return Err(TransformError::DuplicateOperationTransformer { operation: name });
            }
        }

        let attribute_rules = Arc::new(self.attribute_rules);
        let write_name = WellKnownOperation::WriteAttribute.as_str();
        if !transformers.contains_key(write_name) {
            transformers.insert(
                write_name.to_string(),
                Arc::new(WriteAttributeTransformer::new(Arc::clone(&attribute_rules))),
            );
        }
        let undefine_name = WellKnownOperation::UndefineAttribute.as_str();
        if !transformers.contains_key(undefine_name) {
            transformers.insert(
                undefine_name.to_string(),
                Arc::new(UndefineAttributeTransformer::new(Arc::clone(
                    &attribute_rules,
                ))),
            );
        }

        let children = Arc::new(self.children);
        let resource_transformer = self
            .resource_transformer
            .unwrap_or_else(|| Arc::new(EmitAndRecurse::new(Arc::clone(&children))));

        Ok(TransformationNode {
            path: self.path,
            discard_policy: self.discard_policy,
            attribute_rules,
            operation_transformers: transformers,
            resource_transformer,
            rules: self.rules,
            children,
        })
    }
}
