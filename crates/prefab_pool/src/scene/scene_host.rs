//! Slot-map backed scene host

use super::Prefab;
use crate::foundation::math::{Quat, Transform, Vec3};
use crate::pool::{InstantiationProvider, TransformProvider};
use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Stable handle to an object living in a [`SceneHost`]
    pub struct ObjectKey;
}

/// What a scene object is used for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    /// Organizational grouping node
    Container,
    /// Object cloned from a prefab
    Instance,
}

/// A single object in the scene
#[derive(Debug, Clone, PartialEq)]
pub struct SceneObject {
    /// Display name
    pub name: String,

    /// Container or instance
    pub kind: ObjectKind,

    /// Whether the object currently takes part in the scene
    pub active: bool,

    /// Parent container, if any
    pub parent: Option<ObjectKey>,

    /// World transform
    pub transform: Transform,
}

/// Scene object store implementing the pool host traits
///
/// Instances are named after their prefab with a `(Clone)` suffix and start
/// active, the same way a freshly instantiated scene object would.
#[derive(Debug, Default)]
pub struct SceneHost {
    objects: SlotMap<ObjectKey, SceneObject>,
}

impl SceneHost {
    /// Create an empty scene
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up an object
    pub fn object(&self, key: ObjectKey) -> Option<&SceneObject> {
        self.objects.get(key)
    }

    /// Look up an object mutably
    pub fn object_mut(&mut self, key: ObjectKey) -> Option<&mut SceneObject> {
        self.objects.get_mut(key)
    }

    /// Direct children of `parent`, in no particular order
    pub fn children(&self, parent: ObjectKey) -> Vec<ObjectKey> {
        self.objects
            .iter()
            .filter(|(_, object)| object.parent == Some(parent))
            .map(|(key, _)| key)
            .collect()
    }

    /// First object with the given name
    pub fn find_by_name(&self, name: &str) -> Option<ObjectKey> {
        self.objects
            .iter()
            .find(|(_, object)| object.name == name)
            .map(|(key, _)| key)
    }

    /// Number of objects of the given kind
    pub fn count(&self, kind: ObjectKind) -> usize {
        self.objects.values().filter(|object| object.kind == kind).count()
    }

    /// Total number of objects, containers included
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether the scene holds no objects
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Destroy an object and everything parented under it
    ///
    /// Pools never call this; it models the host tearing a scene down.
    pub fn despawn(&mut self, key: ObjectKey) -> usize {
        let mut removed = 0;
        let mut pending = vec![key];

        while let Some(current) = pending.pop() {
            pending.extend(self.children(current));
            if self.objects.remove(current).is_some() {
                removed += 1;
            }
        }

        log::debug!("Despawned {} scene objects", removed);
        removed
    }
}

impl InstantiationProvider for SceneHost {
    type Template = Prefab;
    type Instance = ObjectKey;
    type Container = ObjectKey;

    fn instantiate(&mut self, template: &Prefab, container: ObjectKey) -> ObjectKey {
        self.objects.insert(SceneObject {
            name: format!("{}(Clone)", template.name),
            kind: ObjectKind::Instance,
            active: true,
            parent: Some(container),
            transform: template.transform.clone(),
        })
    }

    fn set_active(&mut self, instance: ObjectKey, active: bool) {
        match self.objects.get_mut(instance) {
            Some(object) => object.active = active,
            None => log::warn!("set_active on missing scene object {:?}", instance),
        }
    }

    fn is_active(&self, instance: ObjectKey) -> bool {
        self.objects.get(instance).is_some_and(|object| object.active)
    }

    fn instance_name(&self, instance: ObjectKey) -> String {
        self.objects
            .get(instance)
            .map(|object| object.name.clone())
            .unwrap_or_default()
    }

    fn create_container(&mut self, name: &str, parent: Option<ObjectKey>) -> ObjectKey {
        self.objects.insert(SceneObject {
            name: name.to_string(),
            kind: ObjectKind::Container,
            active: true,
            parent,
            transform: Transform::identity(),
        })
    }
}

impl TransformProvider for SceneHost {
    fn transform_of(&self, instance: ObjectKey) -> Option<Transform> {
        self.objects.get(instance).map(|object| object.transform.clone())
    }

    fn set_position_rotation(&mut self, instance: ObjectKey, position: Vec3, rotation: Quat) {
        if let Some(object) = self.objects.get_mut(instance) {
            object.transform.position = position;
            object.transform.rotation = rotation;
        }
    }
}
