//! # Prefab Pool
//!
//! Tag-keyed object pooling for game hosts.
//!
//! ## Features
//!
//! - **Eager Pools**: Pre-allocate instances per tag at startup
//! - **Variants**: Several templates per pool, addressable by name
//! - **Randomized Selection**: Skip-scan pick among idle instances
//! - **Grow on Demand**: Exhausted pools grow by one instance at a time
//! - **Host Agnostic**: Instance creation is delegated to an `InstantiationProvider`
//! - **Manifests**: Pool sets and registry settings loadable from TOML or RON
//!
//! ## Quick Start
//!
//! ```rust
//! use prefab_pool::prelude::*;
//!
//! fn main() -> Result<(), PoolError> {
//!     let mut registry = PoolRegistry::establish(SceneHost::new(), &RegistrySettings::default())?;
//!     
//!     let loot = PoolConfig::with_variants("Loot", vec![Prefab::new("Coin"), Prefab::new("Gem")], 8)?;
//!     registry.create_pool(loot)?;
//!     
//!     if let Some(gem) = registry.get_variant_from_pool("Loot", "Gem") {
//!         // Hand the gem back once it has been collected
//!         registry.host_mut().set_active(gem, false);
//!     }
//!     
//!     assert_eq!(registry.total_instances_created(), registry.stats().total_instances as u64);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod foundation;
pub mod pool;
pub mod scene;

/// Common imports for pool users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigFormat, PoolDefinition, PoolManifest, RegistrySettings},
        foundation::math::{Quat, Transform, Vec3},
        pool::{
            InstantiationProvider, Pool, PoolConfig, PoolError, PoolRegistry, RegistryStats,
            Selection, Template, TransformProvider,
        },
        scene::{ObjectKey, Prefab, SceneHost},
    };
}
