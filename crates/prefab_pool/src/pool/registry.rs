//! Tag-keyed pool registry
//!
//! The [`PoolRegistry`] is the caller-facing surface: it creates pools once
//! per tag, forwards retrievals to the matching [`Pool`], and resets pools in
//! bulk. It owns the host provider so activation state always goes through a
//! single place.
//!
//! # Lifecycle
//!
//! ```text
//! Uninitialized ──establish()──▶ Active ──drop──▶ Uninitialized
//!                                   │
//!                        establish() again ──▶ Err(AlreadyEstablished)
//! ```
//!
//! Only one registry may be live per thread. A second
//! [`establish`](PoolRegistry::establish) is rejected and never replaces the
//! live registry.
//!
//! # Usage
//!
//! ```rust
//! use prefab_pool::prelude::*;
//!
//! let mut registry = PoolRegistry::establish(SceneHost::new(), &RegistrySettings::default())?;
//! registry.create_pool(PoolConfig::new("Bullet", Prefab::new("Bullet"), 3)?)?;
//!
//! let bullet = registry.get_from_pool("Bullet", false).expect("pool exists");
//! // ... use the bullet, then hand it back
//! registry.host_mut().set_active(bullet, false);
//! # Ok::<(), PoolError>(())
//! ```

use super::config::PoolConfig;
use super::error::PoolError;
use super::object_pool::{InstanceCounter, Pool};
use super::provider::{InstantiationProvider, TransformProvider};
use crate::config::{PoolManifest, RegistrySettings};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::cell::Cell;
use std::collections::HashMap;
use std::fmt;

thread_local! {
    static ESTABLISHED: Cell<bool> = const { Cell::new(false) };
    static CREATED: InstanceCounter = InstanceCounter::new();
}

/// Lifecycle state of the registry slot on the current thread
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryState {
    /// No registry has been established
    Uninitialized,
    /// A registry is live
    Active,
}

/// Current registry state for this thread
pub fn registry_state() -> RegistryState {
    if ESTABLISHED.with(Cell::get) {
        RegistryState::Active
    } else {
        RegistryState::Uninitialized
    }
}

/// Holds the thread's registry slot until dropped
struct EstablishGuard;

impl EstablishGuard {
    fn acquire() -> Result<Self, PoolError> {
        ESTABLISHED.with(|established| {
            if established.get() {
                Err(PoolError::AlreadyEstablished)
            } else {
                established.set(true);
                Ok(EstablishGuard)
            }
        })
    }
}

impl Drop for EstablishGuard {
    fn drop(&mut self) {
        ESTABLISHED.with(|established| established.set(false));
    }
}

/// How an instance should be picked from a pool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection<'a> {
    /// Earliest-created inactive instance
    First,
    /// Skip-scan randomized pick
    Random,
    /// Inactive instance of the named variant
    Variant(&'a str),
}

/// Snapshot of registry-wide counters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistryStats {
    /// Number of registered pools
    pub pool_count: usize,
    /// Instances currently owned across all pools
    pub total_instances: usize,
    /// Instances the host reports as active
    pub active_instances: usize,
    /// Instances ever created
    pub total_created: u64,
}

/// Directory of pools keyed by tag
pub struct PoolRegistry<P: InstantiationProvider> {
    /// Host provider all instances are created through
    host: P,

    /// Root container pool containers are nested under
    root: P::Container,

    /// Pools keyed by tag
    pools: HashMap<String, Pool<P>>,

    /// Creation counter shared with every registry on this thread
    counter: InstanceCounter,

    /// Template and randomized-selection source
    rng: StdRng,

    /// Released last, once pools and host are gone
    _guard: EstablishGuard,
}

impl<P: InstantiationProvider> PoolRegistry<P> {
    /// Establish the registry for this thread
    ///
    /// # Arguments
    ///
    /// * `host` - Instantiation provider the registry takes ownership of
    /// * `settings` - Root container name and optional RNG seed
    ///
    /// # Returns
    ///
    /// * `Ok(PoolRegistry)` - Registry is now active
    /// * `Err(PoolError::AlreadyEstablished)` - Another registry is live on this thread
    pub fn establish(mut host: P, settings: &RegistrySettings) -> Result<Self, PoolError> {
        let guard = EstablishGuard::acquire().map_err(|err| {
            log::error!("Rejected second pool registry: {}", err);
            err
        })?;

        let root = host.create_container(&settings.root_container_name, None);
        let rng = match settings.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        log::info!("Pool registry established under '{}'", settings.root_container_name);
        Ok(Self {
            host,
            root,
            pools: HashMap::new(),
            counter: CREATED.with(InstanceCounter::clone),
            rng,
            _guard: guard,
        })
    }

    /// Register a pool and eagerly populate it
    ///
    /// A second call with an already registered tag is a no-op: the existing
    /// pool is neither replaced nor compared against `config`.
    pub fn create_pool(&mut self, config: PoolConfig<P::Template>) -> Result<(), PoolError> {
        if self.pools.contains_key(config.tag()) {
            log::debug!("Pool '{}' already exists, ignoring create request", config.tag());
            return Ok(());
        }

        let container_name = format!("{} Pool", config.tag());
        let container = self.host.create_container(&container_name, Some(self.root));
        let tag = config.tag().to_string();
        let pool = Pool::new(config, container, &mut self.host, &mut self.rng, self.counter.clone())?;

        log::info!("Created pool '{}' with {} instances", tag, pool.len());
        self.pools.insert(tag, pool);
        Ok(())
    }

    /// Create every pool of a manifest
    ///
    /// Template names are turned into templates by `resolve`. A pool whose
    /// tag is empty, or that names a template `resolve` does not know, is
    /// skipped and its error returned; the remaining pools are still created.
    pub fn create_pools_from_manifest<F>(&mut self, manifest: &PoolManifest, mut resolve: F) -> Vec<PoolError>
    where
        F: FnMut(&str) -> Option<P::Template>,
    {
        let mut failures = Vec::new();

        for definition in &manifest.pools {
            let resolved: Result<Vec<_>, PoolError> = definition
                .variants
                .iter()
                .map(|name| resolve(name).ok_or_else(|| PoolError::unknown_variant(&definition.tag, name)))
                .collect();

            let result = resolved
                .and_then(|templates| PoolConfig::with_variants(definition.tag.clone(), templates, definition.count))
                .and_then(|config| self.create_pool(config));

            if let Err(err) = result {
                log::error!("Skipping manifest pool '{}': {}", definition.tag, err);
                failures.push(err);
            }
        }

        failures
    }

    /// Retrieve an instance with a typed error
    pub fn try_get(&mut self, tag: &str, selection: Selection<'_>) -> Result<P::Instance, PoolError> {
        let pool = self
            .pools
            .get_mut(tag)
            .ok_or_else(|| PoolError::unknown_tag(tag))?;

        match selection {
            Selection::First => pool.get_one(&mut self.host, &mut self.rng, false),
            Selection::Random => pool.get_one(&mut self.host, &mut self.rng, true),
            Selection::Variant(name) => pool.get_variant(&mut self.host, name),
        }
    }

    /// Retrieve an active instance from the pool registered under `tag`
    ///
    /// Returns `None` and logs an error when the tag is unknown.
    pub fn get_from_pool(&mut self, tag: &str, randomized: bool) -> Option<P::Instance> {
        let selection = if randomized { Selection::Random } else { Selection::First };
        self.get_logged(tag, selection)
    }

    /// Retrieve an active instance of a named variant
    ///
    /// Returns `None` and logs an error when the tag or variant is unknown.
    pub fn get_variant_from_pool(&mut self, tag: &str, variant: &str) -> Option<P::Instance> {
        self.get_logged(tag, Selection::Variant(variant))
    }

    fn get_logged(&mut self, tag: &str, selection: Selection<'_>) -> Option<P::Instance> {
        match self.try_get(tag, selection) {
            Ok(instance) => Some(instance),
            Err(err) => {
                log::error!("Pool lookup failed: {}", err);
                None
            }
        }
    }

    /// Snapshot of registered tags, in no particular order
    pub fn list_tags(&self) -> Vec<String> {
        self.pools.keys().cloned().collect()
    }

    /// Deactivate every instance of one pool
    ///
    /// Returns `false` and logs an error when the tag is unknown.
    pub fn reset_pool(&mut self, tag: &str) -> bool {
        match self.pools.get(tag) {
            Some(pool) => {
                pool.reset(&mut self.host);
                log::debug!("Reset pool '{}' ({} instances)", tag, pool.len());
                true
            }
            None => {
                log::error!("Cannot reset: {}", PoolError::unknown_tag(tag));
                false
            }
        }
    }

    /// Deactivate every instance of every pool whose tag is not in `skip`
    pub fn reset_all_pools(&mut self, skip: &[&str]) {
        let mut reset = 0;
        for (tag, pool) in &self.pools {
            if skip.contains(&tag.as_str()) {
                continue;
            }
            pool.reset(&mut self.host);
            reset += 1;
        }
        log::debug!("Reset {} pools (skipped {:?})", reset, skip);
    }

    /// Instances ever created on this thread
    ///
    /// Monotonic: the count survives dropping and re-establishing the
    /// registry and is never decremented.
    pub fn total_instances_created(&self) -> u64 {
        self.counter.get()
    }

    /// Whether a pool is registered under `tag`
    pub fn has_pool(&self, tag: &str) -> bool {
        self.pools.contains_key(tag)
    }

    /// Pool registered under `tag`
    pub fn pool(&self, tag: &str) -> Option<&Pool<P>> {
        self.pools.get(tag)
    }

    /// Root container of this registry
    pub fn root_container(&self) -> P::Container {
        self.root
    }

    /// Host provider
    pub fn host(&self) -> &P {
        &self.host
    }

    /// Host provider, mutably; used by callers to deactivate instances
    pub fn host_mut(&mut self) -> &mut P {
        &mut self.host
    }

    /// Registry-wide counters
    pub fn stats(&self) -> RegistryStats {
        RegistryStats {
            pool_count: self.pools.len(),
            total_instances: self.pools.values().map(Pool::len).sum(),
            active_instances: self.pools.values().map(|pool| pool.active_count(&self.host)).sum(),
            total_created: self.counter.get(),
        }
    }
}

impl<P: TransformProvider> PoolRegistry<P> {
    /// Copy position and rotation from `source` onto `target`
    ///
    /// Does nothing when either side is absent.
    pub fn sync_transform(&mut self, target: Option<P::Instance>, source: Option<P::Instance>) {
        let (Some(target), Some(source)) = (target, source) else {
            return;
        };

        if let Some(transform) = self.host.transform_of(source) {
            self.host.set_position_rotation(target, transform.position, transform.rotation);
        }
    }
}

impl<P: InstantiationProvider> fmt::Debug for PoolRegistry<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PoolRegistry")
            .field("root", &self.root)
            .field("pools", &self.pools)
            .field("total_created", &self.counter.get())
            .finish()
    }
}
