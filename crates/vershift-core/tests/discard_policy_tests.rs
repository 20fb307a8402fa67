mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use common::{address, ctx, resource_ctx, segment};
use serde_json::json;
use vershift_core::{
    AttributeModel, Operation, PathAddress, PredicateDiscardPolicy, Resource,
    ResourceTransformationContext, Result, TransformError, TransformationContext,
    TransformationNode, TransformedOperation,
};
use vershift_core::{OperationTransformer, ResourceTransformer};

/// Operation transformer that counts how often it runs
struct CountingOperationTransformer(Arc<AtomicUsize>);

impl OperationTransformer for CountingOperationTransformer {
    fn transform_operation(
        &self,
        _ctx: &TransformationContext,
        _address: &PathAddress,
        operation: &Operation,
    ) -> Result<TransformedOperation> {
        self.0.fetch_add(1, Ordering::SeqCst);
        Ok(TransformedOperation::new(operation.clone()))
    }
}

/// Terminal transformer that counts how often it runs
struct CountingResourceTransformer(Arc<AtomicUsize>);

impl ResourceTransformer for CountingResourceTransformer {
    fn transform_resource(
        &self,
        _ctx: &mut ResourceTransformationContext,
        _address: &PathAddress,
        _resource: Resource,
    ) -> Result<()> {
        self.0.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

// ===== SILENT DISCARD TESTS =====

#[test]
fn test_silent_operation_returns_sentinel_without_invoking_transformer() {
    let calls = Arc::new(AtomicUsize::new(0));
    let node = TransformationNode::builder(segment("subsystem", "legacy"))
        .discard_policy(PredicateDiscardPolicy::silent_when(|_, _, _| true))
        .register_operation_transformer("add", CountingOperationTransformer(calls.clone()))
        .build()
        .unwrap();

    let target = address(&[("subsystem", "legacy")]);
    let op = Operation::new("add", target.clone()).with_param("enabled", json!(true));

    let transformed = node.transform_operation(&ctx(), &target, &op).unwrap();
    assert!(transformed.is_discarded());
    assert!(transformed.operation().is_none());
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_discarded_operation_response_is_trivially_successful() {
    let node = TransformationNode::builder(segment("subsystem", "legacy"))
        .discard_policy(PredicateDiscardPolicy::silent_when(|_, _, _| true))
        .build()
        .unwrap();

    let target = address(&[("subsystem", "legacy")]);
    let op = Operation::new("add", target.clone());
    let transformed = node.transform_operation(&ctx(), &target, &op).unwrap();

    let mut response = AttributeModel::new();
    response.set("outcome".to_string(), json!("success"));
    assert_eq!(transformed.transform_result(response.clone()), response);
}

#[test]
fn test_silent_resource_emits_nothing_and_does_not_recurse() {
    let terminal_calls = Arc::new(AtomicUsize::new(0));
    let node = TransformationNode::builder(segment("subsystem", "legacy"))
        .discard_policy(PredicateDiscardPolicy::silent_when(|model, _, _| {
            model.get("deprecated") == Some(&json!(true))
        }))
        .resource_transformer(CountingResourceTransformer(terminal_calls.clone()))
        .build()
        .unwrap();

    let mut resource = Resource::new();
    resource
        .model_mut()
        .set("deprecated".to_string(), json!(true));
    resource.set_child(segment("connector", "http"), Resource::new());

    let target = address(&[("subsystem", "legacy")]);
    let mut rctx = resource_ctx();
    node.transform_resource(&mut rctx, &target, &resource).unwrap();

    assert_eq!(terminal_calls.load(Ordering::SeqCst), 0);
    let built = rctx.into_target();
    assert!(built.navigate(&target).is_err());
    assert!(!built.has_children());
}

// ===== REJECT TESTS =====

#[test]
fn test_rejected_operation_fails_with_reported_error() {
    let node = TransformationNode::builder(segment("subsystem", "secure"))
        .discard_policy(PredicateDiscardPolicy::reject_when(|_, _, _| true))
        .build()
        .unwrap();

    let target = address(&[("subsystem", "secure")]);
    let op = Operation::new("add", target.clone());

    let result = node.transform_operation(&ctx(), &target, &op);
    match result {
        Err(TransformError::OperationRejected { operation, .. }) => {
            assert_eq!(operation, "add");
        }
        other => panic!("Expected OperationRejected, got {:?}", other),
    }
}

#[test]
fn test_rejected_resource_fails_with_reported_error() {
    let node = TransformationNode::builder(segment("subsystem", "secure"))
        .discard_policy(PredicateDiscardPolicy::reject_when(|_, _, _| true))
        .build()
        .unwrap();

    let target = address(&[("subsystem", "secure")]);
    let mut rctx = resource_ctx();
    let result = node.transform_resource(&mut rctx, &target, &Resource::new());
    assert!(matches!(
        result,
        Err(TransformError::ResourceRejected { .. })
    ));
}

// ===== POLICY INPUT TESTS =====

#[test]
fn test_policy_sees_address_and_target_version() {
    let node = TransformationNode::builder(segment("subsystem", "web"))
        .discard_policy(PredicateDiscardPolicy::silent_when(|_, address, ctx| {
            address.last().map(|s| s.value()) == Some("web")
                && ctx.target_version() < vershift_core::TargetVersion::new(2, 0, 0)
        }))
        .build()
        .unwrap();

    let target = address(&[("subsystem", "web")]);
    let op = Operation::new("add", target.clone());
    let transformed = node.transform_operation(&ctx(), &target, &op).unwrap();
    assert!(transformed.is_discarded());

    let elsewhere = address(&[("subsystem", "other")]);
    let op = Operation::new("add", elsewhere.clone());
    let transformed = node.transform_operation(&ctx(), &elsewhere, &op).unwrap();
    assert!(!transformed.is_discarded());
}
