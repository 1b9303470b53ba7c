//! Single-tag instance pool
//!
//! A [`Pool`] owns the creation-ordered list of instances built from one
//! [`PoolConfig`]. Selection always scans that list front to back; when no
//! inactive instance is left the pool grows by exactly one and never shrinks.
//!
//! # Selection
//!
//! - **First**: the earliest-created inactive instance.
//! - **Random**: a skip-scan. Every inactive candidate is accepted with a
//!   roll in `[0, 0.99)` above `0.87` (about 12%); the first accepted
//!   candidate wins. If every roll fails the first inactive candidate is used.
//!   This is deliberately not a uniform choice among inactive instances.
//! - **Variant**: the earliest inactive instance cloned from a template with
//!   the requested name, else a fresh instance of the first such template.

use super::config::PoolConfig;
use super::error::PoolError;
use super::provider::{InstantiationProvider, Template};
use rand::Rng;
use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

/// Roll threshold a candidate must exceed during randomized selection
pub const RANDOM_ACCEPT_THRESHOLD: f32 = 0.87;

/// Exclusive upper bound of each randomized-selection roll
pub const RANDOM_ROLL_CEILING: f32 = 0.99;

/// Shared count of every instance ever created
///
/// Cloned into each pool a registry owns. Never decremented.
#[derive(Debug, Clone, Default)]
pub struct InstanceCounter(Rc<Cell<u64>>);

impl InstanceCounter {
    /// Create a counter starting at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Instances created so far
    pub fn get(&self) -> u64 {
        self.0.get()
    }

    fn increment(&self) {
        self.0.set(self.0.get() + 1);
    }
}

/// A pooled handle together with the variant it was cloned from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PooledInstance<I> {
    handle: I,
    variant: usize,
}

/// Collection of reusable instances under one tag
pub struct Pool<P: InstantiationProvider> {
    config: PoolConfig<P::Template>,
    container: P::Container,
    instances: Vec<PooledInstance<P::Instance>>,
    counter: InstanceCounter,
}

impl<P: InstantiationProvider> Pool<P> {
    /// Build a pool and eagerly create its starting population
    ///
    /// Each starting instance picks its template independently and uniformly
    /// at random, is created under `container`, and is left inactive.
    ///
    /// # Arguments
    ///
    /// * `config` - Tag, variants and starting size
    /// * `container` - Host grouping handle for created instances
    /// * `host` - Instantiation provider
    /// * `rng` - Source of template choices
    /// * `counter` - Shared creation counter, bumped once per instance
    pub fn new<R: Rng + ?Sized>(
        config: PoolConfig<P::Template>,
        container: P::Container,
        host: &mut P,
        rng: &mut R,
        counter: InstanceCounter,
    ) -> Result<Self, PoolError> {
        let population = config.initial_population();
        let mut pool = Self {
            config,
            container,
            instances: Vec::with_capacity(population),
            counter,
        };

        for _ in 0..population {
            pool.spawn_random(host, rng, false)?;
        }

        log::debug!(
            "Pool '{}' populated with {} inactive instances across {} variants",
            pool.tag(),
            pool.instances.len(),
            pool.config.variants().len()
        );
        Ok(pool)
    }

    /// Hand out an inactive instance, growing the pool if none is left
    ///
    /// The returned instance is active. The caller deactivates it through the
    /// host once it is done with it.
    ///
    /// # Arguments
    ///
    /// * `randomized` - Use the skip-scan instead of first-inactive
    ///
    /// # Returns
    ///
    /// * `Ok(instance)` - Reused or freshly grown instance
    /// * `Err(PoolError::InvalidState)` - Growth needed but the pool has no templates
    pub fn get_one<R: Rng + ?Sized>(
        &mut self,
        host: &mut P,
        rng: &mut R,
        randomized: bool,
    ) -> Result<P::Instance, PoolError> {
        let candidate = if randomized {
            self.roll_inactive(host, rng)
        } else {
            self.first_inactive(host)
        };

        match candidate {
            Some(handle) => {
                host.set_active(handle, true);
                Ok(handle)
            }
            None => {
                let handle = self.spawn_random(host, rng, true)?;
                log::debug!(
                    "Pool '{}' exhausted, grew to {} instances",
                    self.tag(),
                    self.instances.len()
                );
                Ok(handle)
            }
        }
    }

    /// Hand out an inactive instance of a named variant
    ///
    /// Reuses the earliest inactive instance cloned from a template named
    /// `variant`. Otherwise instantiates the first template with that name,
    /// active, without looking at other variants.
    ///
    /// # Returns
    ///
    /// * `Ok(instance)` - Reused or freshly created instance
    /// * `Err(PoolError::NotFound)` - No template carries that name; nothing was created
    pub fn get_variant(&mut self, host: &mut P, variant: &str) -> Result<P::Instance, PoolError> {
        let variants = self.config.variants();
        let reusable = self
            .instances
            .iter()
            .find(|entry| variants[entry.variant].name() == variant && !host.is_active(entry.handle))
            .map(|entry| entry.handle);

        if let Some(handle) = reusable {
            host.set_active(handle, true);
            return Ok(handle);
        }

        let index = variants
            .iter()
            .position(|template| template.name() == variant)
            .ok_or_else(|| PoolError::unknown_variant(self.config.tag(), variant))?;

        let handle = self.spawn(host, index, true);
        log::debug!(
            "Pool '{}' had no idle '{}', grew to {} instances",
            self.tag(),
            variant,
            self.instances.len()
        );
        Ok(handle)
    }

    /// Deactivate every instance regardless of its current state
    pub fn reset(&self, host: &mut P) {
        for entry in &self.instances {
            host.set_active(entry.handle, false);
        }
    }

    /// Pool tag
    pub fn tag(&self) -> &str {
        self.config.tag()
    }

    /// Configuration this pool was built from
    pub fn config(&self) -> &PoolConfig<P::Template> {
        &self.config
    }

    /// Host container the instances are grouped under
    pub fn container(&self) -> P::Container {
        self.container
    }

    /// Number of instances owned by this pool
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    /// Whether the pool owns no instances
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Instance handles in creation order
    pub fn instances(&self) -> impl Iterator<Item = P::Instance> + '_ {
        self.instances.iter().map(|entry| entry.handle)
    }

    /// Name of the template an instance was cloned from
    pub fn variant_of(&self, instance: P::Instance) -> Option<&str> {
        self.instances
            .iter()
            .find(|entry| entry.handle == instance)
            .map(|entry| self.config.variants()[entry.variant].name())
    }

    /// Number of instances the host reports as active
    pub fn active_count(&self, host: &P) -> usize {
        self.instances
            .iter()
            .filter(|entry| host.is_active(entry.handle))
            .count()
    }

    fn first_inactive(&self, host: &P) -> Option<P::Instance> {
        self.instances
            .iter()
            .map(|entry| entry.handle)
            .find(|&handle| !host.is_active(handle))
    }

    fn roll_inactive<R: Rng + ?Sized>(&self, host: &P, rng: &mut R) -> Option<P::Instance> {
        let mut fallback = None;

        for entry in &self.instances {
            if host.is_active(entry.handle) {
                continue;
            }
            if fallback.is_none() {
                fallback = Some(entry.handle);
            }
            if accepts_roll(rng.gen_range(0.0..RANDOM_ROLL_CEILING)) {
                return Some(entry.handle);
            }
        }

        fallback
    }

    fn spawn_random<R: Rng + ?Sized>(
        &mut self,
        host: &mut P,
        rng: &mut R,
        active: bool,
    ) -> Result<P::Instance, PoolError> {
        let index = pick_variant(self.tag(), self.config.variants().len(), rng)?;
        Ok(self.spawn(host, index, active))
    }

    fn spawn(&mut self, host: &mut P, variant: usize, active: bool) -> P::Instance {
        let handle = host.instantiate(&self.config.variants()[variant], self.container);
        host.set_active(handle, active);
        self.instances.push(PooledInstance { handle, variant });
        self.counter.increment();

        log::trace!(
            "Pool '{}' created {} (active: {})",
            self.config.tag(),
            host.instance_name(handle),
            active
        );
        handle
    }
}

impl<P: InstantiationProvider> fmt::Debug for Pool<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pool")
            .field("tag", &self.config.tag())
            .field("variants", &self.config.variants().len())
            .field("container", &self.container)
            .field("instances", &self.instances.len())
            .finish()
    }
}

fn accepts_roll(roll: f32) -> bool {
    roll > RANDOM_ACCEPT_THRESHOLD
}

fn pick_variant<R: Rng + ?Sized>(tag: &str, variant_count: usize, rng: &mut R) -> Result<usize, PoolError> {
    if variant_count == 0 {
        return Err(PoolError::InvalidState(format!(
            "pool '{}' cannot grow without templates",
            tag
        )));
    }
    Ok(rng.gen_range(0..variant_count))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::{Transform, Vec3};
    use crate::scene::{ObjectKey, Prefab, SceneHost};
    use rand::rngs::mock::StepRng;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn build_pool(
        host: &mut SceneHost,
        rng: &mut StdRng,
        variants: &[&str],
        count: i32,
    ) -> (Pool<SceneHost>, InstanceCounter) {
        let templates: Vec<Prefab> = variants.iter().map(|name| Prefab::new(*name)).collect();
        let config = PoolConfig::with_variants("Test", templates, count).unwrap();
        let container = host.create_container("Test Pool", None);
        let counter = InstanceCounter::new();
        let pool = Pool::new(config, container, host, rng, counter.clone()).unwrap();
        (pool, counter)
    }

    fn position_of(pool: &Pool<SceneHost>, handle: ObjectKey) -> usize {
        pool.instances().position(|h| h == handle).unwrap()
    }

    #[test]
    fn test_eager_population_is_inactive() {
        let mut host = SceneHost::new();
        let mut rng = StdRng::seed_from_u64(1);
        let (pool, counter) = build_pool(&mut host, &mut rng, &["Bullet"], 5);

        assert_eq!(pool.len(), 5);
        assert_eq!(pool.active_count(&host), 0);
        assert_eq!(counter.get(), 5);
        for handle in pool.instances() {
            assert_eq!(host.object(handle).unwrap().parent, Some(pool.container()));
        }
    }

    #[test]
    fn test_non_positive_count_creates_nothing() {
        let mut host = SceneHost::new();
        let mut rng = StdRng::seed_from_u64(2);
        let (empty, _) = build_pool(&mut host, &mut rng, &["Bullet"], 0);
        let (negative, counter) = build_pool(&mut host, &mut rng, &["Bullet"], -3);

        assert!(empty.is_empty());
        assert!(negative.is_empty());
        assert_eq!(counter.get(), 0);
    }

    #[test]
    fn test_first_inactive_in_creation_order() {
        let mut host = SceneHost::new();
        let mut rng = StdRng::seed_from_u64(3);
        let (mut pool, _) = build_pool(&mut host, &mut rng, &["Bullet"], 4);
        let handles: Vec<_> = pool.instances().collect();

        host.set_active(handles[0], true);
        host.set_active(handles[2], true);

        let picked = pool.get_one(&mut host, &mut rng, false).unwrap();
        assert_eq!(picked, handles[1]);
        assert!(host.is_active(handles[1]));
        assert!(!host.is_active(handles[3]));
        assert_eq!(pool.len(), 4);
    }

    #[test]
    fn test_growth_when_exhausted() {
        let mut host = SceneHost::new();
        let mut rng = StdRng::seed_from_u64(4);
        let (mut pool, counter) = build_pool(&mut host, &mut rng, &["Bullet"], 2);

        pool.get_one(&mut host, &mut rng, false).unwrap();
        pool.get_one(&mut host, &mut rng, true).unwrap();
        assert_eq!(counter.get(), 2);

        let grown = pool.get_one(&mut host, &mut rng, true).unwrap();
        assert_eq!(pool.len(), 3);
        assert_eq!(counter.get(), 3);
        assert_eq!(position_of(&pool, grown), 2);
        assert!(host.is_active(grown));
    }

    #[test]
    fn test_empty_pool_grows_on_first_request() {
        let mut host = SceneHost::new();
        let mut rng = StdRng::seed_from_u64(5);
        let (mut pool, counter) = build_pool(&mut host, &mut rng, &["Coin", "Gem"], 0);

        let handle = pool.get_one(&mut host, &mut rng, false).unwrap();
        assert_eq!(pool.len(), 1);
        assert_eq!(counter.get(), 1);
        assert!(matches!(pool.variant_of(handle), Some("Coin") | Some("Gem")));
    }

    #[test]
    fn test_randomized_single_candidate_is_always_found() {
        let mut host = SceneHost::new();
        let mut rng = StdRng::seed_from_u64(6);
        let (mut pool, _) = build_pool(&mut host, &mut rng, &["Bullet"], 6);
        let handles: Vec<_> = pool.instances().collect();

        for (index, handle) in handles.iter().enumerate() {
            if index != 4 {
                host.set_active(*handle, true);
            }
        }

        for _ in 0..20 {
            host.set_active(handles[4], false);
            let picked = pool.get_one(&mut host, &mut rng, true).unwrap();
            assert_eq!(picked, handles[4]);
        }
        assert_eq!(pool.len(), 6);
    }

    #[test]
    fn test_randomized_skips_past_first_candidate() {
        let mut skipped = false;

        for seed in 0..64 {
            let mut host = SceneHost::new();
            let mut rng = StdRng::seed_from_u64(seed);
            let (mut pool, _) = build_pool(&mut host, &mut rng, &["Bullet"], 50);
            let picked = pool.get_one(&mut host, &mut rng, true).unwrap();

            assert_eq!(pool.active_count(&host), 1);
            if position_of(&pool, picked) > 0 {
                skipped = true;
                break;
            }
        }

        assert!(skipped);
    }

    fn pool_with_active_head(host: &mut SceneHost, count: i32) -> Pool<SceneHost> {
        let mut rng = StdRng::seed_from_u64(12);
        let (pool, _) = build_pool(host, &mut rng, &["Bullet"], count);
        let head = pool.instances().next().unwrap();
        host.set_active(head, true);
        pool
    }

    #[test]
    fn test_randomized_falls_back_to_first_inactive() {
        let mut host = SceneHost::new();
        let mut pool = pool_with_active_head(&mut host, 4);
        let mut zero_rolls = StepRng::new(0, 0);

        let picked = pool.get_one(&mut host, &mut zero_rolls, true).unwrap();
        assert_eq!(position_of(&pool, picked), 1);
        assert_eq!(pool.active_count(&host), 2);
        assert_eq!(pool.len(), 4);
    }

    #[test]
    fn test_randomized_accepts_high_roll_on_first_candidate() {
        let mut host = SceneHost::new();
        let mut pool = pool_with_active_head(&mut host, 4);
        let mut max_rolls = StepRng::new(u64::MAX, 0);

        let picked = pool.get_one(&mut host, &mut max_rolls, true).unwrap();
        assert_eq!(position_of(&pool, picked), 1);
        assert!(host.is_active(picked));
        assert_eq!(pool.active_count(&host), 2);
    }

    #[test]
    fn test_roll_acceptance_boundary() {
        assert!(!accepts_roll(0.0));
        assert!(!accepts_roll(0.5));
        assert!(!accepts_roll(RANDOM_ACCEPT_THRESHOLD));
        assert!(accepts_roll(0.8701));
        assert!(accepts_roll(0.98));
    }

    #[test]
    fn test_randomized_picks_first_candidate_about_one_in_eight() {
        const TRIALS: u32 = 4000;
        let mut host = SceneHost::new();
        let mut rng = StdRng::seed_from_u64(13);
        let (mut pool, _) = build_pool(&mut host, &mut rng, &["Bullet"], 50);
        let first = pool.instances().next().unwrap();
        let mut first_hits = 0;

        for _ in 0..TRIALS {
            if pool.get_one(&mut host, &mut rng, true).unwrap() == first {
                first_hits += 1;
            }
            pool.reset(&mut host);
        }

        // 0.12 / 0.99 acceptance plus a negligible fallback share
        let share = f64::from(first_hits) / f64::from(TRIALS);
        assert!((0.10..0.165).contains(&share), "first candidate share was {}", share);
        assert_eq!(pool.len(), 50);
    }

    #[test]
    fn test_randomized_is_reproducible_with_seed() {
        let picks = |seed: u64| {
            let mut host = SceneHost::new();
            let mut rng = StdRng::seed_from_u64(seed);
            let (mut pool, _) = build_pool(&mut host, &mut rng, &["A", "B", "C"], 20);
            (0..10)
                .map(|_| {
                    let handle = pool.get_one(&mut host, &mut rng, true).unwrap();
                    (position_of(&pool, handle), pool.variant_of(handle).unwrap().to_string())
                })
                .collect::<Vec<_>>()
        };

        assert_eq!(picks(42), picks(42));
    }

    #[test]
    fn test_variant_reuses_matching_inactive_instance() {
        let mut host = SceneHost::new();
        let mut rng = StdRng::seed_from_u64(7);
        let (mut pool, counter) = build_pool(&mut host, &mut rng, &["Coin", "Gem"], 0);

        let gem = pool.get_variant(&mut host, "Gem").unwrap();
        let coin = pool.get_variant(&mut host, "Coin").unwrap();
        host.set_active(gem, false);

        let again = pool.get_variant(&mut host, "Gem").unwrap();
        assert_eq!(again, gem);
        assert_ne!(again, coin);
        assert_eq!(counter.get(), 2);
    }

    #[test]
    fn test_unknown_variant_leaves_pool_untouched() {
        let mut host = SceneHost::new();
        let mut rng = StdRng::seed_from_u64(8);
        let (mut pool, counter) = build_pool(&mut host, &mut rng, &["Coin", "Gem"], 3);

        let result = pool.get_variant(&mut host, "Ruby");
        assert_eq!(result, Err(PoolError::unknown_variant("Test", "Ruby")));
        assert_eq!(pool.len(), 3);
        assert_eq!(counter.get(), 3);
        assert_eq!(pool.active_count(&host), 0);
    }

    #[test]
    fn test_variant_growth_uses_first_declared_template() {
        let mut host = SceneHost::new();
        let mut rng = StdRng::seed_from_u64(9);
        let templates = vec![
            Prefab::new("Gem").with_transform(Transform::from_translation(Vec3::new(1.0, 0.0, 0.0))),
            Prefab::new("Gem").with_transform(Transform::from_translation(Vec3::new(2.0, 0.0, 0.0))),
        ];
        let config = PoolConfig::with_variants("Loot", templates, 0).unwrap();
        let container = host.create_container("Loot Pool", None);
        let mut pool = Pool::new(config, container, &mut host, &mut rng, InstanceCounter::new()).unwrap();

        let gem = pool.get_variant(&mut host, "Gem").unwrap();
        let position = host.object(gem).unwrap().transform.position;
        assert_eq!(position, Vec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_reset_deactivates_everything() {
        let mut host = SceneHost::new();
        let mut rng = StdRng::seed_from_u64(10);
        let (mut pool, _) = build_pool(&mut host, &mut rng, &["Bullet"], 3);

        for _ in 0..5 {
            pool.get_one(&mut host, &mut rng, false).unwrap();
        }
        assert_eq!(pool.active_count(&host), 5);

        pool.reset(&mut host);
        assert_eq!(pool.active_count(&host), 0);
        assert_eq!(pool.len(), 5);
    }

    #[test]
    fn test_growth_without_templates_is_invalid_state() {
        let mut rng = StdRng::seed_from_u64(11);
        assert!(matches!(
            pick_variant("Empty", 0, &mut rng),
            Err(PoolError::InvalidState(_))
        ));
        assert_eq!(pick_variant("Single", 1, &mut rng), Ok(0));
    }
}
