mod common;

use common::{address, resource_ctx, segment};
use proptest::prelude::*;
use serde_json::json;
use vershift_core::rules::{RemoveAttribute, RenameAttribute};
use vershift_core::{
    AttributeModel, PathSegment, PredicateDiscardPolicy, Resource, TransformationNode,
};

// ===== RECURSION TESTS =====

#[test]
fn test_child_resources_dispatch_to_matching_child_nodes() {
    let child = TransformationNode::builder(PathSegment::wildcard("connector"))
        .rewrite_attribute("proto", RenameAttribute::new("protocol"))
        .build()
        .unwrap();
    let node = TransformationNode::builder(segment("subsystem", "web"))
        .add_child(child)
        .build()
        .unwrap();

    let mut http = Resource::new();
    http.model_mut().set("proto".to_string(), json!("HTTP/1.1"));
    let mut resource = Resource::new();
    resource.set_child(segment("connector", "http"), http);

    let target = address(&[("subsystem", "web")]);
    let mut rctx = resource_ctx();
    node.transform_resource(&mut rctx, &target, &resource).unwrap();

    let built = rctx.into_target();
    let connector = built
        .navigate(&address(&[("subsystem", "web"), ("connector", "http")]))
        .unwrap();
    assert_eq!(connector.model().get("protocol"), Some(&json!("HTTP/1.1")));
    assert!(!connector.model().contains("proto"));
}

#[test]
fn test_unmatched_children_are_copied_verbatim() {
    let node = TransformationNode::builder(segment("subsystem", "web"))
        .rewrite_attribute("foo", RenameAttribute::new("bar"))
        .build()
        .unwrap();

    let mut listener = Resource::new();
    listener.model_mut().set("foo".to_string(), json!("kept"));
    let mut resource = Resource::new();
    resource.set_child(segment("listener", "default"), listener);

    let target = address(&[("subsystem", "web")]);
    let mut rctx = resource_ctx();
    node.transform_resource(&mut rctx, &target, &resource).unwrap();

    // No child node for "listener": the subtree is untouched, the parent's
    // rules do not reach into it
    let built = rctx.into_target();
    let copied = built
        .navigate(&address(&[("subsystem", "web"), ("listener", "default")]))
        .unwrap();
    assert_eq!(copied.model().get("foo"), Some(&json!("kept")));
}

#[test]
fn test_discarded_child_vanishes_while_siblings_survive() {
    let child = TransformationNode::builder(PathSegment::wildcard("connector"))
        .discard_policy(PredicateDiscardPolicy::silent_when(|model, _, _| {
            model.get("deprecated") == Some(&json!(true))
        }))
        .build()
        .unwrap();
    let node = TransformationNode::builder(segment("subsystem", "web"))
        .add_child(child)
        .build()
        .unwrap();

    let mut old = Resource::new();
    old.model_mut().set("deprecated".to_string(), json!(true));
    let mut new = Resource::new();
    new.model_mut().set("deprecated".to_string(), json!(false));

    let mut resource = Resource::new();
    resource.set_child(segment("connector", "old"), old);
    resource.set_child(segment("connector", "new"), new);

    let target = address(&[("subsystem", "web")]);
    let mut rctx = resource_ctx();
    node.transform_resource(&mut rctx, &target, &resource).unwrap();

    let built = rctx.into_target();
    assert!(built
        .navigate(&address(&[("subsystem", "web"), ("connector", "old")]))
        .is_err());
    assert!(built
        .navigate(&address(&[("subsystem", "web"), ("connector", "new")]))
        .is_ok());
}

// ===== CLONING INVARIANT =====

#[test]
fn test_original_resource_is_never_mutated() {
    let node = TransformationNode::builder(segment("subsystem", "web"))
        .rewrite_attribute("foo", RenameAttribute::new("bar"))
        .rewrite_attribute("legacy", RemoveAttribute)
        .build()
        .unwrap();

    let mut resource = Resource::new();
    resource.model_mut().set("foo".to_string(), json!(5));
    resource.model_mut().set("legacy".to_string(), json!("x"));
    let before = resource.clone();

    let target = address(&[("subsystem", "web")]);
    let mut rctx = resource_ctx();
    node.transform_resource(&mut rctx, &target, &resource).unwrap();

    assert_eq!(resource, before);
}

proptest! {
    #[test]
    fn prop_transform_never_mutates_original(
        entries in prop::collection::btree_map("[a-z]{1,6}", any::<i64>(), 0..6)
    ) {
        let node = TransformationNode::builder(segment("subsystem", "web"))
            .rewrite_attribute("foo", RenameAttribute::new("bar"))
            .rewrite_attribute("legacy", RemoveAttribute)
            .build()
            .unwrap();

        let mut model = AttributeModel::new();
        model.set("foo".to_string(), json!(1));
        model.set("legacy".to_string(), json!("x"));
        for (name, value) in &entries {
            model.set(name.clone(), json!(value));
        }
        let original = Resource::with_model(model);
        let before = original.clone();

        let target = address(&[("subsystem", "web")]);
        let mut rctx = resource_ctx();
        node.transform_resource(&mut rctx, &target, &original).unwrap();

        prop_assert_eq!(&original, &before);
    }
}
