//! World definition documents and world loading.
//!
//! A world document names entity definition files and how many instances of
//! each to spawn, plus ambient settings the renderer consumes. Loading is
//! the one operation that touches the filesystem; it completes (or fails)
//! before the first tick is scheduled.

use std::fs;
use std::path::PathBuf;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;
use serde_json::{Map, json};
use tracing::info;

use sim_ecs::{Entity, EntityStore};

use crate::document::{EntityDefinition, spawn_entity};
use crate::error::LoadError;

/// Ambient scene settings. Owned by the renderer; the loader only carries
/// them through.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AmbientConfig {
    pub fog_color: String,
    pub fog_near: f64,
    pub fog_far: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WorldConfig {
    pub ambient: AmbientConfig,
}

/// Disc on the XZ plane that spawned instances are scattered over.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct SpawnArea {
    pub x: f64,
    pub z: f64,
    pub radius: f64,
}

/// One entry in a world document: a definition file and how many instances
/// to spawn where.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldEntityEntry {
    /// Path of the entity definition document, relative to the loader root.
    pub definition: String,
    pub count: u32,
    pub spawn_area: SpawnArea,
}

/// A parsed world definition document.
#[derive(Debug, Clone, Deserialize)]
pub struct WorldDefinition {
    pub name: String,
    pub config: WorldConfig,
    #[serde(default)]
    pub entities: Vec<WorldEntityEntry>,
}

/// The result of a successful world load, for the host and renderer.
#[derive(Debug, Clone)]
pub struct LoadedWorld {
    pub name: String,
    pub ambient: AmbientConfig,
    /// Every entity spawned by this load, in spawn order.
    pub entities: Vec<Entity>,
}

/// Reads definition documents from a root directory and spawns them into an
/// [`EntityStore`].
#[derive(Debug)]
pub struct WorldLoader {
    root: PathBuf,
    rng: SmallRng,
}

impl WorldLoader {
    /// Create a loader rooted at `root` with an entropy-seeded generator.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            rng: SmallRng::from_entropy(),
        }
    }

    /// Create a loader with a fixed seed, for deterministic tests.
    #[must_use]
    pub fn with_seed(root: impl Into<PathBuf>, seed: u64) -> Self {
        Self {
            root: root.into(),
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    fn read_json<T: serde::de::DeserializeOwned>(&self, relative: &str) -> Result<T, LoadError> {
        let path = self.root.join(relative);
        let text = fs::read_to_string(&path).map_err(|source| LoadError::Io { path, source })?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Load a world document and spawn everything it declares.
    ///
    /// Each listed definition is spawned `count` times, every instance
    /// given a transform-position override drawn uniformly in angle and
    /// uniformly in radius within its spawn area (uniform in radius, so
    /// instance density leans toward the area's center).
    ///
    /// # Errors
    ///
    /// Any read, parse, or spawn failure propagates immediately. Entities
    /// spawned before the failure are not rolled back.
    pub fn load_world(
        &mut self,
        store: &mut EntityStore,
        world_path: &str,
    ) -> Result<LoadedWorld, LoadError> {
        let world: WorldDefinition = self.read_json(world_path)?;
        info!(world = world.name, entries = world.entities.len(), "loading world");

        let mut spawned = Vec::new();
        for entry in &world.entities {
            let definition: EntityDefinition = self.read_json(&entry.definition)?;
            for _ in 0..entry.count {
                let overrides = self.position_override(entry.spawn_area);
                let entity = spawn_entity(store, &definition, &overrides)?;
                spawned.push(entity);
            }
        }

        info!(world = world.name, spawned = spawned.len(), "world loaded");
        Ok(LoadedWorld {
            name: world.name,
            ambient: world.config.ambient,
            entities: spawned,
        })
    }

    fn position_override(&mut self, area: SpawnArea) -> Map<String, serde_json::Value> {
        let angle = self.rng.gen_range(0.0..std::f64::consts::TAU);
        // A zero radius is a point spawn; rand panics on an empty range.
        let dist = if area.radius > 0.0 {
            self.rng.gen_range(0.0..area.radius)
        } else {
            0.0
        };
        let mut overrides = Map::new();
        overrides.insert(
            "transform".to_string(),
            json!({
                "position": {
                    "x": area.x + angle.cos() * dist,
                    "y": 0.0,
                    "z": area.z + angle.sin() * dist,
                }
            }),
        );
        overrides
    }
}
