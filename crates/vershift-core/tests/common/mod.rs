use vershift_core::{
    PathAddress, PathSegment, ResourceTransformationContext, TargetVersion, TransformationContext,
};

/// Transformation context targeting an older consumer, for tests
#[allow(dead_code)]
pub fn ctx() -> TransformationContext {
    TransformationContext::new(TargetVersion::new(1, 4, 0))
}

/// Resource transformation context with an empty target tree
#[allow(dead_code)]
pub fn resource_ctx() -> ResourceTransformationContext {
    ResourceTransformationContext::new(ctx())
}

#[allow(dead_code)]
pub fn segment(key: &str, value: &str) -> PathSegment {
    PathSegment::new(key, value)
}

/// Build an address from (key, value) pairs
#[allow(dead_code)]
pub fn address(pairs: &[(&str, &str)]) -> PathAddress {
    let mut address = PathAddress::empty();
    for (key, value) in pairs {
        address = address.append(PathSegment::new(*key, *value));
    }
    address
}
