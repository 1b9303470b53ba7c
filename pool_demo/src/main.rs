//! Pool demo application
//!
//! Runs a short headless simulation against an in-memory scene: bullets are
//! fired every frame and recycled when they expire, asteroids drop loot
//! variants, and the registry statistics are logged as pools grow.
//!
//! Usage: `pool_demo [settings.toml|settings.ron] [manifest.toml|manifest.ron]`

use prefab_pool::foundation::logging;
use prefab_pool::prelude::*;
use rand::prelude::*;

// Simulation constants
const FRAME_COUNT: u32 = 240;
const FRAME_TIME: f32 = 1.0 / 60.0;
const BULLET_LIFETIME: f32 = 0.5;
const ROCK_LIFETIME: f32 = 2.0;
const LOOT_LIFETIME: f32 = 1.0;
const STATS_INTERVAL: u32 = 60;

const DEFAULT_MANIFEST: &str = r#"
[[pools]]
tag = "Bullet"
variants = ["Bullet"]
count = 16

[[pools]]
tag = "Rock"
variants = ["RockLarge", "RockSmall"]
count = 6

[[pools]]
tag = "Loot"
variants = ["Coin", "Gem"]
count = 0
"#;

/// Something the simulation has taken out of a pool
struct LiveObject {
    instance: ObjectKey,
    remaining: f32,
}

/// Headless simulation driving a pool registry over a scene host
pub struct PoolDemoApp {
    registry: PoolRegistry<SceneHost>,
    live: Vec<LiveObject>,
    muzzle: Option<ObjectKey>,
    rng: StdRng,
}

impl PoolDemoApp {
    /// Establish the registry and create the manifest's pools
    pub fn new(settings: &RegistrySettings, manifest: &PoolManifest) -> Result<Self, PoolError> {
        log::info!("Creating pool demo application...");
        let mut registry = PoolRegistry::establish(SceneHost::new(), settings)?;

        let catalog = prefab_catalog();
        let failures = registry.create_pools_from_manifest(manifest, |name| {
            catalog.iter().find(|prefab| prefab.name == name).cloned()
        });
        if !failures.is_empty() {
            log::warn!("{} manifest pools were skipped", failures.len());
        }

        // Single-instance pool acting as the ship's gun muzzle
        let muzzle = Prefab::new("Muzzle").with_transform(Transform::from_position_rotation(
            Vec3::new(0.0, 1.5, 0.0),
            Quat::from_axis_angle(&Vec3::z_axis(), 0.3),
        ));
        registry.create_pool(PoolConfig::new("Muzzle", muzzle, 1)?)?;
        let muzzle = registry.get_from_pool("Muzzle", false);

        let rng = match settings.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Self {
            registry,
            live: Vec::new(),
            muzzle,
            rng,
        })
    }

    /// Simulate every frame, then return all pools to idle
    pub fn run(&mut self) {
        log::info!("Starting simulation for {} frames", FRAME_COUNT);

        for frame in 0..FRAME_COUNT {
            self.update(frame);

            if frame % STATS_INTERVAL == 0 {
                log_stats(frame, &self.registry.stats());
            }
        }

        // Level end: everything goes back to the pools except the muzzle
        self.registry.reset_all_pools(&["Muzzle"]);
        self.live.clear();
        log_stats(FRAME_COUNT, &self.registry.stats());

        let mut tags = self.registry.list_tags();
        tags.sort();
        for tag in tags {
            if let Some(pool) = self.registry.pool(&tag) {
                log::info!("Pool '{}' ended with {} instances", tag, pool.len());
            }
        }
    }

    fn update(&mut self, frame: u32) {
        self.expire_objects(FRAME_TIME);

        if let Some(bullet) = self.registry.get_from_pool("Bullet", false) {
            self.registry.sync_transform(Some(bullet), self.muzzle);
            self.track(bullet, BULLET_LIFETIME);
        }

        if frame % 20 == 0 {
            if let Some(rock) = self.registry.get_from_pool("Rock", true) {
                let position = Vec3::new(
                    self.rng.gen_range(-10.0..10.0),
                    self.rng.gen_range(-10.0..10.0),
                    0.0,
                );
                if let Some(object) = self.registry.host_mut().object_mut(rock) {
                    object.transform.position = position;
                }
                self.track(rock, ROCK_LIFETIME);
            }
        }

        if frame % 30 == 15 {
            let variant = if self.rng.gen_bool(0.2) { "Gem" } else { "Coin" };
            if let Some(loot) = self.registry.get_variant_from_pool("Loot", variant) {
                self.track(loot, LOOT_LIFETIME);
            }
        }
    }

    fn track(&mut self, instance: ObjectKey, lifetime: f32) {
        self.live.push(LiveObject {
            instance,
            remaining: lifetime,
        });
    }

    fn expire_objects(&mut self, delta_time: f32) {
        let host = self.registry.host_mut();
        self.live.retain_mut(|object| {
            object.remaining -= delta_time;
            if object.remaining > 0.0 {
                return true;
            }
            host.set_active(object.instance, false);
            false
        });
    }
}

fn prefab_catalog() -> Vec<Prefab> {
    vec![
        Prefab::new("Bullet"),
        Prefab::new("RockLarge").with_transform(Transform {
            scale: Vec3::new(3.0, 3.0, 3.0),
            ..Transform::default()
        }),
        Prefab::new("RockSmall"),
        Prefab::new("Coin"),
        Prefab::new("Gem"),
    ]
}

fn log_stats(frame: u32, stats: &RegistryStats) {
    log::info!(
        "frame {:>3}: {} pools, {} instances ({} active), {} created",
        frame,
        stats.pool_count,
        stats.total_instances,
        stats.active_instances,
        stats.total_created
    );
}

fn load_or_default<T: Config>(path: Option<&String>) -> Result<T, Box<dyn std::error::Error>> {
    match path {
        Some(path) => {
            log::info!("Loading {}", path);
            Ok(T::load_from_file(path)?)
        }
        None => Ok(T::default()),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    logging::init();

    log::info!("Starting Pool Demo");

    let args: Vec<String> = std::env::args().skip(1).collect();
    let settings: RegistrySettings = load_or_default(args.first())?;
    let manifest = match args.get(1) {
        Some(_) => load_or_default(args.get(1))?,
        None => PoolManifest::from_str_with_format(DEFAULT_MANIFEST, ConfigFormat::Toml)?,
    };

    let mut app = match PoolDemoApp::new(&settings, &manifest) {
        Ok(app) => app,
        Err(e) => {
            log::error!("Pool demo failed: {:?}", e);
            return Err(e.into());
        }
    };
    app.run();

    log::info!("Pool demo completed successfully");
    Ok(())
}
