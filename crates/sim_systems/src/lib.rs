//! # sim_systems
//!
//! Gameplay systems built on the [`sim_ecs`] core:
//!
//! - [`MovementIntegrator`] — per-tick numeric integration of hover
//!   movement, plus the impulse/target-seek primitives other systems use.
//! - [`AiStateMachine`] — the wander/seek/idle behavior controller.
//!
//! Both are registered with the [`Scheduler`](sim_ecs::Scheduler) by the
//! host; the AI runs after movement so the locomotion forces it applies are
//! integrated on the following tick.

pub mod ai;
pub mod movement;

pub use ai::{AiStateMachine, RangeHit, WANDER_BOUND};
pub use movement::{ARRIVE_EPSILON, MovementIntegrator};
