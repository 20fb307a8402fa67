use serde::{Deserialize, Serialize};

use super::AttributeModel;
use crate::address::{PathAddress, PathSegment};
use crate::errors::{Result, TransformError};

/// A named, addressable unit of management state
///
/// A resource is an attribute model plus zero or more child resources, each
/// keyed by a concrete path segment, in insertion order. Clones are deep;
/// the transformation engine only ever operates on a defensive clone, never
/// on the caller's live resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Resource {
    model: AttributeModel,
    children: Vec<(PathSegment, Resource)>,
}

impl Resource {
    /// Create an empty resource
    pub fn new() -> Self {
        Self {
            model: AttributeModel::new(),
            children: Vec::new(),
        }
    }

    /// Create a resource around an existing attribute model
    pub fn with_model(model: AttributeModel) -> Self {
        Self {
            model,
            children: Vec::new(),
        }
    }

    pub fn model(&self) -> &AttributeModel {
        &self.model
    }

    pub fn model_mut(&mut self) -> &mut AttributeModel {
        &mut self.model
    }

    /// Replace the attribute model wholesale
    pub fn set_model(&mut self, model: AttributeModel) {
        self.model = model;
    }

    /// Child resources in insertion order
    pub fn children(&self) -> &[(PathSegment, Resource)] {
        &self.children
    }

    /// Look up a direct child by its exact segment
    pub fn child(&self, segment: &PathSegment) -> Option<&Resource> {
        self.children
            .iter()
            .find(|(s, _)| s == segment)
            .map(|(_, r)| r)
    }

    /// Insert or replace a direct child
    pub fn set_child(&mut self, segment: PathSegment, resource: Resource) {
        if let Some(entry) = self.children.iter_mut().find(|(s, _)| *s == segment) {
            entry.1 = resource;
        } else {
            self.children.push((segment, resource));
        }
    }

    /// Remove a direct child, returning it if present
    pub fn remove_child(&mut self, segment: &PathSegment) -> Option<Resource> {
        let idx = self.children.iter().position(|(s, _)| s == segment)?;
        Some(self.children.remove(idx).1)
    }

    /// Check whether the resource has children
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Descend a relative address to an existing descendant
    ///
    /// # Errors
    ///
    /// Returns `NoSuchChild` if any segment along the address is missing.
    pub fn navigate(&self, address: &PathAddress) -> Result<&Resource> {
        let mut current = self;
        for segment in address.iter() {
            current = current
                .child(segment)
                .ok_or_else(|| TransformError::NoSuchChild {
                    address: address.clone(),
                })?;
        }
        Ok(current)
    }

    /// Descend a relative address, creating empty intermediate resources
    pub fn ensure(&mut self, address: &PathAddress) -> &mut Resource {
        self.ensure_segments(address.segments())
    }

    fn ensure_segments(&mut self, segments: &[PathSegment]) -> &mut Resource {
        match segments.split_first() {
            None => self,
            Some((head, rest)) => {
                let idx = match self.children.iter().position(|(s, _)| s == head) {
                    Some(i) => i,
                    None => {
                        self.children.push((head.clone(), Resource::new()));
                        self.children.len() - 1
                    }
                };
                self.children[idx].1.ensure_segments(rest)
            }
        }
    }

    /// Insert a subtree at a relative address, creating intermediates
    pub fn write(&mut self, address: &PathAddress, resource: Resource) {
        match address.last() {
            None => *self = resource,
            Some(last) => {
                let parent = self.ensure(&address.parent().unwrap_or_default());
                parent.set_child(last.clone(), resource);
            }
        }
    }

    /// Split into the attribute model and the child list
    pub fn into_parts(self) -> (AttributeModel, Vec<(PathSegment, Resource)>) {
        (self.model, self.children)
    }
}
