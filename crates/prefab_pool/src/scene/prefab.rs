//! Prefab templates

use crate::foundation::math::Transform;
use crate::pool::Template;

/// Template that [`SceneHost`](super::SceneHost) clones instances from
#[derive(Debug, Clone, PartialEq)]
pub struct Prefab {
    /// Variant name
    pub name: String,
    
    /// Transform copied onto every new instance
    pub transform: Transform,
}

impl Prefab {
    /// Create a prefab at the origin
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            transform: Transform::identity(),
        }
    }
    
    /// Replace the spawn transform
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }
}

impl Template for Prefab {
    fn name(&self) -> &str {
        &self.name
    }
}
