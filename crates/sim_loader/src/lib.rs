//! # sim_loader
//!
//! Loads entity and world definition documents (JSON) and spawns them into
//! an [`EntityStore`](sim_ecs::EntityStore) purely through `create` +
//! `add_component` — the loader has no privileged access to the store.

pub mod document;
pub mod error;
pub mod world;

pub use document::{EntityDefinition, build_component, spawn_entity};
pub use error::LoadError;
pub use world::{AmbientConfig, LoadedWorld, SpawnArea, WorldDefinition, WorldLoader};
