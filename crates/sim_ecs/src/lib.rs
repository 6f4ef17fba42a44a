//! # sim_ecs
//!
//! The entity/component core of the simulation kernel.
//!
//! This crate provides:
//!
//! - [`Entity`] — lightweight `u64` entity identifiers.
//! - [`Component`] / [`ComponentKind`] — the closed component variant set.
//! - [`EntityStore`] — entity identity plus all typed component data, with
//!   creation/destruction, component mutation, superset queries, and
//!   lifecycle event recording.
//! - [`System`] — the observer/update interface systems implement, with
//!   default no-op lifecycle hooks.
//! - [`Scheduler`] — ordered system dispatch, one update pass per tick, and
//!   event forwarding at tick boundaries.
//!
//! The model is single-threaded and cooperative: all component access during
//! a tick is synchronous and exclusive, so no locking is involved. Callers
//! that could otherwise race a tick (input handlers, async completions) must
//! route structural mutations through the store between ticks; the event
//! queue delivers the notifications at the next boundary.

pub mod component;
pub mod entity;
pub mod scheduler;
pub mod store;
pub mod system;

pub use component::{Ai, AiState, Behavior, Component, ComponentKind, Health, Mesh, Movement, Transform};
pub use entity::{Entity, EntityAllocator};
pub use scheduler::Scheduler;
pub use store::{EntityStore, StoreError, StoreEvent};
pub use system::{System, TickContext};
