//! Per-call transformation contexts
//!
//! The transformation tree itself is immutable; all per-call state lives in
//! the context objects defined here. A context is cheap to construct, is
//! never shared between calls, and carries the correlation ids that tie a
//! request's log events together.

use serde::{Deserialize, Serialize};
use vershift_core_types::RequestContext;

use crate::address::PathAddress;
use crate::model::{AttributeModel, Resource};

/// The model version of the consumer on the other side of the boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TargetVersion {
    pub major: u16,
    pub minor: u16,
    pub micro: u16,
}

impl TargetVersion {
    pub fn new(major: u16, minor: u16, micro: u16) -> Self {
        Self {
            major,
            minor,
            micro,
        }
    }
}

impl std::fmt::Display for TargetVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.micro)
    }
}

/// Ambient state for one transformation request
///
/// Opaque to the transformation node itself; only discard policies and
/// rewrite rules consult the target version. No state survives the call.
#[derive(Debug, Clone)]
pub struct TransformationContext {
    target_version: TargetVersion,
    request: RequestContext,
}

impl TransformationContext {
    /// Create a context for the given target version with fresh correlation
    pub fn new(target_version: TargetVersion) -> Self {
        Self {
            target_version,
            request: RequestContext::new(),
        }
    }

    /// Carry an existing request context for correlation
    pub fn with_request(mut self, request: RequestContext) -> Self {
        self.request = request;
        self
    }

    pub fn target_version(&self) -> TargetVersion {
        self.target_version
    }

    pub fn request(&self) -> &RequestContext {
        &self.request
    }
}

/// Context for resource transformation: ambient state plus the target tree
///
/// The terminal resource transformer emits transformed models into the
/// target tree through this context; a silently discarded resource simply
/// never appears in it.
#[derive(Debug)]
pub struct ResourceTransformationContext {
    ctx: TransformationContext,
    target: Resource,
}

impl ResourceTransformationContext {
    /// Create a context with an empty target tree
    pub fn new(ctx: TransformationContext) -> Self {
        Self {
            ctx,
            target: Resource::new(),
        }
    }

    pub fn transformation_context(&self) -> &TransformationContext {
        &self.ctx
    }

    /// Place a transformed model at an address in the target tree
    ///
    /// Intermediate resources along the address are created empty; an
    /// existing model at the address is replaced, its children kept.
    pub fn emit(&mut self, address: &PathAddress, model: AttributeModel) {
        self.target.ensure(address).set_model(model);
    }

    /// Copy an entire untransformed subtree into the target tree
    pub fn emit_subtree(&mut self, address: &PathAddress, resource: Resource) {
        self.target.write(address, resource);
    }

    /// The target tree built so far
    pub fn target(&self) -> &Resource {
        &self.target
    }

    /// Finish the call, yielding the built target tree
    pub fn into_target(self) -> Resource {
        self.target
    }
}
