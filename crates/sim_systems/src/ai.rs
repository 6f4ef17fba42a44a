//! Finite-state AI controller.
//!
//! Drives per-entity behavior (wander / seek / idle) using simulation-time
//! timers and randomized target selection, delegating actual locomotion to
//! [`MovementIntegrator::move_towards`]. All per-entity state lives in the
//! [`Ai`] component; the system itself owns only its random number
//! generator.

use std::f64::consts::TAU;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::trace;

use sim_ecs::{Ai, AiState, Behavior, ComponentKind, Entity, EntityStore, System, TickContext};
use sim_math::{DVec3, planar_distance};

use crate::movement::MovementIntegrator;

/// Wander targets are clamped into this square on the XZ plane.
pub const WANDER_BOUND: f64 = 25.0;

/// Range (ms) the direction-change interval is re-rolled from on arrival.
const INTERVAL_MIN_MS: f64 = 1000.0;
const INTERVAL_MAX_MS: f64 = 4000.0;

/// A match from [`AiStateMachine::entities_in_range`]: entity, planar
/// distance from the probe point, and the entity's full position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeHit {
    pub entity: Entity,
    pub distance: f64,
    pub position: DVec3,
}

/// Behavior state machine for entities carrying `Transform` + `Movement` +
/// `Ai`.
pub struct AiStateMachine {
    rng: SmallRng,
}

impl AiStateMachine {
    /// Create a controller with an entropy-seeded generator.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rng: SmallRng::from_entropy(),
        }
    }

    /// Create a controller with a fixed seed, for deterministic tests.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Force the entity to pursue `target`: behavior becomes `Seek`,
    /// sub-state `Moving`. No-op if the entity has no `Ai` component.
    pub fn set_target(store: &mut EntityStore, id: Entity, target: DVec3) {
        if let Some(ai) = store.ai_mut(id) {
            ai.behavior = Behavior::Seek;
            ai.state = AiState::Moving;
            ai.target = Some(target);
        }
    }

    /// Force a top-level behavior: sub-state resets to `Idle` and the timer
    /// restarts at `now_ms`. No-op if the entity has no `Ai` component.
    pub fn set_behavior(store: &mut EntityStore, id: Entity, behavior: Behavior, now_ms: f64) {
        if let Some(ai) = store.ai_mut(id) {
            ai.behavior = behavior;
            ai.state = AiState::Idle;
            ai.last_direction_change = now_ms;
        }
    }

    /// All entities carrying `Transform` within planar `range` of
    /// `position` (inclusive), sorted ascending by distance. The sort is
    /// stable, so ties keep scan (creation) order.
    #[must_use]
    pub fn entities_in_range(store: &EntityStore, position: DVec3, range: f64) -> Vec<RangeHit> {
        let mut hits: Vec<RangeHit> = store
            .query(&[ComponentKind::Transform])
            .into_iter()
            .filter_map(|id| {
                let entity_pos = store.transform(id)?.position;
                let distance = planar_distance(position, entity_pos);
                (distance <= range).then_some(RangeHit {
                    entity: id,
                    distance,
                    position: entity_pos,
                })
            })
            .collect();
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }

    fn step_entity(&mut self, store: &mut EntityStore, id: Entity, ctx: &TickContext) {
        let Some(mut ai) = store.ai(id).copied() else {
            return;
        };

        match ai.behavior {
            Behavior::Wander => self.step_wander(store, id, &mut ai, ctx),
            Behavior::Seek => Self::step_seek(store, id, &mut ai),
            Behavior::Idle => {
                if ctx.now_ms - ai.last_direction_change > ai.direction_change_interval {
                    trace!(entity = %id, "idle timer elapsed, wandering");
                    ai.behavior = Behavior::Wander;
                }
            }
        }

        if let Some(slot) = store.ai_mut(id) {
            *slot = ai;
        }
    }

    fn step_wander(&mut self, store: &mut EntityStore, id: Entity, ai: &mut Ai, ctx: &TickContext) {
        if ctx.now_ms - ai.last_direction_change > ai.direction_change_interval {
            if let Some(transform) = store.transform(id) {
                let position = transform.position;
                let angle = self.rng.gen_range(0.0..TAU);
                // Uniform in radius (not area), which biases targets toward
                // the center of the wander disc. A zero radius pins the
                // target to the current position; rand panics on an empty
                // range.
                let dist = if ai.wander_radius > 0.0 {
                    self.rng.gen_range(0.0..ai.wander_radius)
                } else {
                    0.0
                };
                let target = DVec3::new(
                    (position.x + angle.cos() * dist).clamp(-WANDER_BOUND, WANDER_BOUND),
                    0.0,
                    (position.z + angle.sin() * dist).clamp(-WANDER_BOUND, WANDER_BOUND),
                );
                trace!(entity = %id, ?target, "picked wander target");
                ai.target = Some(target);
                ai.last_direction_change = ctx.now_ms;
                ai.state = AiState::Moving;
            }
        }

        if ai.state == AiState::Moving
            && let Some(target) = ai.target
            && MovementIntegrator::move_towards(store, id, target)
        {
            ai.state = AiState::Idle;
            ai.target = None;
            ai.direction_change_interval = self.rng.gen_range(INTERVAL_MIN_MS..INTERVAL_MAX_MS);
            ai.last_direction_change = ctx.now_ms;
        }
    }

    fn step_seek(store: &mut EntityStore, id: Entity, ai: &mut Ai) {
        match ai.target {
            Some(target) => {
                if MovementIntegrator::move_towards(store, id, target) {
                    ai.behavior = Behavior::Wander;
                    ai.target = None;
                }
            }
            // Nothing to pursue: fall back to wandering without moving
            // this tick.
            None => ai.behavior = Behavior::Wander,
        }
    }
}

impl Default for AiStateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl System for AiStateMachine {
    fn name(&self) -> &str {
        "ai"
    }

    fn update(&mut self, store: &mut EntityStore, ctx: &TickContext) {
        let ids = store.query(&[
            ComponentKind::Transform,
            ComponentKind::Movement,
            ComponentKind::Ai,
        ]);
        for id in ids {
            self.step_entity(store, id, ctx);
        }
    }
}
