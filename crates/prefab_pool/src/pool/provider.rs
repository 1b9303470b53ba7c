//! Host capability traits
//!
//! The pool never owns the objects it hands out. Creating instances, toggling
//! their activation and grouping them under containers is delegated to the
//! host through [`InstantiationProvider`]. Hosts that track spatial state can
//! additionally implement [`TransformProvider`] to support
//! [`PoolRegistry::sync_transform`](super::PoolRegistry::sync_transform).

use crate::foundation::math::{Quat, Transform, Vec3};

/// A prototype that pooled instances are cloned from (a "prefab")
pub trait Template {
    /// Stable name used for variant-targeted lookups
    fn name(&self) -> &str;
}

/// Instance creation and activation supplied by the host
///
/// Handles are cheap copies of host keys. The pool stores them in creation
/// order and only ever asks the host about their activation state.
pub trait InstantiationProvider {
    /// Template type instances are created from
    type Template: Template + Clone;

    /// Handle to a created instance
    type Instance: Copy + Eq + std::fmt::Debug;

    /// Handle to an organizational container
    type Container: Copy + std::fmt::Debug;

    /// Create a new instance of `template` grouped under `container`
    fn instantiate(&mut self, template: &Self::Template, container: Self::Container) -> Self::Instance;

    /// Activate or deactivate an instance
    fn set_active(&mut self, instance: Self::Instance, active: bool);

    /// Whether an instance is currently active
    fn is_active(&self, instance: Self::Instance) -> bool;

    /// Display name of an instance
    fn instance_name(&self, instance: Self::Instance) -> String;

    /// Create a grouping container, optionally nested under `parent`
    fn create_container(&mut self, name: &str, parent: Option<Self::Container>) -> Self::Container;
}

/// Spatial access for hosts whose instances carry a transform
pub trait TransformProvider: InstantiationProvider {
    /// Current transform of an instance, if the host still knows it
    fn transform_of(&self, instance: Self::Instance) -> Option<Transform>;

    /// Overwrite position and rotation, leaving scale untouched
    fn set_position_rotation(&mut self, instance: Self::Instance, position: Vec3, rotation: Quat);
}
