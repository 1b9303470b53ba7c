//! Tag-keyed object pooling
//!
//! Pools pre-allocate reusable instances through a host
//! [`InstantiationProvider`], hand out inactive ones on request and grow by
//! one instance whenever they run dry. Instances are never removed; callers
//! return an instance simply by deactivating it through the host.
//!
//! ```text
//! PoolRegistry ── tag ──▶ Pool ── PoolConfig (variants, starting size)
//!      │                   │
//!      └──── host ◀────────┘  instantiate / set_active / is_active
//! ```
//!
//! Everything here is single-threaded; the registry and its counter are
//! `!Send` and a multi-threaded host has to wrap the registry in its own lock.

mod config;
mod error;
mod object_pool;
mod provider;
mod registry;

#[cfg(test)]
mod tests;

pub use config::PoolConfig;
pub use error::PoolError;
pub use object_pool::{InstanceCounter, Pool, RANDOM_ACCEPT_THRESHOLD, RANDOM_ROLL_CEILING};
pub use provider::{InstantiationProvider, Template, TransformProvider};
pub use registry::{registry_state, PoolRegistry, RegistryState, RegistryStats, Selection};
