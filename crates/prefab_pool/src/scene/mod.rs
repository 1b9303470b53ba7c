//! In-memory scene host
//!
//! A small stand-in for a game scene that pools can be driven against.
//! Objects live in a slot map keyed by [`ObjectKey`]; containers and pooled
//! instances share that store and are linked through parent keys.
//!
//! ## Architecture
//!
//! ```text
//! PoolRegistry
//!      ↓  (InstantiationProvider / TransformProvider)
//! SceneHost
//!      ↓
//! SlotMap<ObjectKey, SceneObject>
//! ```

mod prefab;
mod scene_host;

pub use prefab::Prefab;
pub use scene_host::{ObjectKey, ObjectKind, SceneHost, SceneObject};
