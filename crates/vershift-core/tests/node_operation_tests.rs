mod common;

use common::{address, ctx, segment};
use serde_json::json;
use vershift_core::model::{NAME_PARAM, VALUE_PARAM};
use vershift_core::rules::{RemoveAttribute, RenameAttribute};
use vershift_core::{
    Operation, OperationTransformer, PathAddress, Result, TransformationContext,
    TransformationNode, TransformedOperation, WellKnownOperation,
};

// ===== AUTO-REGISTRATION TESTS =====

#[test]
fn test_write_attribute_obeys_rename_rule() {
    let node = TransformationNode::builder(segment("subsystem", "web"))
        .rewrite_attribute("foo", RenameAttribute::new("bar"))
        .build()
        .unwrap();

    let target = address(&[("subsystem", "web")]);
    let op = Operation::new(WellKnownOperation::WriteAttribute.as_str(), target.clone())
        .with_param(NAME_PARAM, json!("foo"))
        .with_param(VALUE_PARAM, json!(5));

    let transformed = node.transform_operation(&ctx(), &target, &op).unwrap();
    let rewritten = transformed.operation().unwrap();
    assert_eq!(rewritten.params().get(NAME_PARAM), Some(&json!("bar")));
    assert_eq!(rewritten.params().get(VALUE_PARAM), Some(&json!(5)));
}

#[test]
fn test_write_attribute_of_removed_attribute_is_discarded() {
    let node = TransformationNode::builder(segment("subsystem", "web"))
        .rewrite_attribute("legacy", RemoveAttribute)
        .build()
        .unwrap();

    let target = address(&[("subsystem", "web")]);
    let op = Operation::new(WellKnownOperation::WriteAttribute.as_str(), target.clone())
        .with_param(NAME_PARAM, json!("legacy"))
        .with_param(VALUE_PARAM, json!("anything"));

    let transformed = node.transform_operation(&ctx(), &target, &op).unwrap();
    assert!(transformed.is_discarded());
}

#[test]
fn test_undefine_attribute_obeys_rename_rule() {
    let node = TransformationNode::builder(segment("subsystem", "web"))
        .rewrite_attribute("foo", RenameAttribute::new("bar"))
        .build()
        .unwrap();

    let target = address(&[("subsystem", "web")]);
    let op = Operation::new(
        WellKnownOperation::UndefineAttribute.as_str(),
        target.clone(),
    )
    .with_param(NAME_PARAM, json!("foo"));

    let transformed = node.transform_operation(&ctx(), &target, &op).unwrap();
    let rewritten = transformed.operation().unwrap();
    assert_eq!(rewritten.name(), "undefine-attribute");
    assert_eq!(rewritten.params().get(NAME_PARAM), Some(&json!("bar")));
}

#[test]
fn test_explicit_transformer_wins_over_auto_registration() {
    struct FixedName;
    impl OperationTransformer for FixedName {
        fn transform_operation(
            &self,
            _ctx: &TransformationContext,
            _address: &PathAddress,
            operation: &Operation,
        ) -> Result<TransformedOperation> {
            let rewritten = Operation::new(operation.name(), operation.address().clone())
                .with_param(NAME_PARAM, json!("explicit-wins"));
            Ok(TransformedOperation::new(rewritten))
        }
    }

    let node = TransformationNode::builder(segment("subsystem", "web"))
        .rewrite_attribute("foo", RenameAttribute::new("bar"))
        .register_operation_transformer(WellKnownOperation::WriteAttribute.as_str(), FixedName)
        .build()
        .unwrap();

    let target = address(&[("subsystem", "web")]);
    let op = Operation::new(WellKnownOperation::WriteAttribute.as_str(), target.clone())
        .with_param(NAME_PARAM, json!("foo"))
        .with_param(VALUE_PARAM, json!(5));

    let transformed = node.transform_operation(&ctx(), &target, &op).unwrap();
    let rewritten = transformed.operation().unwrap();
    // The auto-generated transformer was never consulted
    assert_eq!(
        rewritten.params().get(NAME_PARAM),
        Some(&json!("explicit-wins"))
    );
}

#[test]
fn test_transformer_map_exposes_auto_registered_entries() {
    let node = TransformationNode::builder(segment("subsystem", "web"))
        .build()
        .unwrap();

    let transformers = node.operation_transformers();
    assert!(transformers.contains_key(WellKnownOperation::WriteAttribute.as_str()));
    assert!(transformers.contains_key(WellKnownOperation::UndefineAttribute.as_str()));
    assert_eq!(transformers.len(), 2);
}

// ===== GENERIC OPERATION TESTS =====

#[test]
fn test_unregistered_operation_goes_through_the_chain() {
    let node = TransformationNode::builder(segment("subsystem", "web"))
        .rewrite_attribute("foo", RenameAttribute::new("bar"))
        .build()
        .unwrap();

    let target = address(&[("subsystem", "web")]);
    let op = Operation::new("add", target.clone()).with_param("foo", json!(7));

    let transformed = node.transform_operation(&ctx(), &target, &op).unwrap();
    let rewritten = transformed.operation().unwrap();
    assert_eq!(rewritten.params().get("bar"), Some(&json!(7)));
}

#[test]
fn test_empty_rule_list_composes_to_attribute_rewritten_operation() {
    let node = TransformationNode::builder(segment("subsystem", "web"))
        .build()
        .unwrap();

    let target = address(&[("subsystem", "web")]);
    let op = Operation::new("add", target.clone()).with_param("untouched", json!(1));

    let transformed = node.transform_operation(&ctx(), &target, &op).unwrap();
    assert_eq!(transformed.operation(), Some(&op));
}

#[test]
fn test_node_registers_as_generic_operation_transformer() {
    let node = TransformationNode::builder(segment("subsystem", "web"))
        .rewrite_attribute("foo", RenameAttribute::new("bar"))
        .build()
        .unwrap();

    // Use the node through the trait, as an orchestrator would
    let transformer: &dyn OperationTransformer = &node;
    let target = address(&[("subsystem", "web")]);
    let op = Operation::new("add", target.clone()).with_param("foo", json!(1));

    let transformed = transformer
        .transform_operation(&ctx(), &target, &op)
        .unwrap();
    assert_eq!(
        transformed.operation().unwrap().params().get("bar"),
        Some(&json!(1))
    );
}
