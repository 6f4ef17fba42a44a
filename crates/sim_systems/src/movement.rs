//! Hover movement integration.
//!
//! Advances position, velocity, and yaw for every entity carrying both
//! `Transform` and `Movement`. The integrator is stateless — all state lives
//! in components — so its locomotion primitives ([`apply_force`],
//! [`move_towards`]) are associated functions other systems call directly
//! within the same tick.
//!
//! [`apply_force`]: MovementIntegrator::apply_force
//! [`move_towards`]: MovementIntegrator::move_towards

use sim_ecs::{ComponentKind, Entity, EntityStore, System, TickContext};
use sim_math::{DVec3, lerp_angle};

/// Planar distance at which `move_towards` reports arrival. The same value
/// gates yaw facing: below this planar speed the heading is left alone.
pub const ARRIVE_EPSILON: f64 = 0.1;

/// Proportional gain of the vertical hover spring.
const HOVER_SPRING_GAIN: f64 = 5.0;

/// Per-tick multiplicative damping on planar velocity. Applied once per
/// tick, not time-normalized, so behavior tracks the tick rate.
const PLANAR_DAMPING: f64 = 0.95;

/// Amplitude of the vertical bobbing oscillation.
const BOB_AMPLITUDE: f64 = 0.1;

/// Angular frequency of the bobbing oscillation, in radians per second.
const BOB_FREQUENCY: f64 = 2.0;

/// Yaw interpolation rate: the lerp factor is `dt_seconds * TURN_RATE`.
/// Not clamped, so ticks longer than a third of a second would overshoot.
const TURN_RATE: f64 = 3.0;

/// Physics-style movement system for hovering entities.
#[derive(Debug, Default)]
pub struct MovementIntegrator;

impl MovementIntegrator {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Add a pure impulse to the entity's velocity (unit mass).
    ///
    /// Best-effort: a missing entity or `Movement` component is a no-op.
    pub fn apply_force(store: &mut EntityStore, id: Entity, force: DVec3) {
        if let Some(movement) = store.movement_mut(id) {
            movement.velocity += force;
        }
    }

    /// Overwrite the entity's velocity.
    ///
    /// Best-effort: a missing entity or `Movement` component is a no-op.
    pub fn set_velocity(store: &mut EntityStore, id: Entity, velocity: DVec3) {
        if let Some(movement) = store.movement_mut(id) {
            movement.velocity = velocity;
        }
    }

    /// Steer the entity toward `target` on the ground plane.
    ///
    /// If the planar distance to the target exceeds [`ARRIVE_EPSILON`],
    /// applies `direction * speed` as an impulse and returns `false`.
    /// Within the epsilon no force is applied and the entity has arrived:
    /// returns `true`.
    pub fn move_towards(store: &mut EntityStore, id: Entity, target: DVec3) -> bool {
        let (Some(transform), Some(movement)) = (store.transform(id), store.movement(id)) else {
            return false;
        };
        let position = transform.position;
        let speed = movement.speed;

        let dx = target.x - position.x;
        let dz = target.z - position.z;
        let distance = (dx * dx + dz * dz).sqrt();
        if distance <= ARRIVE_EPSILON {
            return true;
        }

        let direction = DVec3::new(dx / distance, 0.0, dz / distance);
        Self::apply_force(store, id, direction * speed);
        false
    }

    fn integrate(store: &mut EntityStore, id: Entity, ctx: &TickContext) {
        let (Some(&transform), Some(&movement)) = (store.transform(id), store.movement(id)) else {
            return;
        };
        let mut t = transform;
        let mut m = movement;
        let dt = ctx.dt_seconds();

        // Planar integration.
        t.position.x += m.velocity.x * dt;
        t.position.z += m.velocity.z * dt;

        // Vertical spring, proportional only. The resulting vertical
        // velocity is a signal for external readers; the rendered height
        // comes from the bobbing overwrite below.
        m.velocity.y = (m.ground_y + m.hover_height - t.position.y) * HOVER_SPRING_GAIN;

        // Planar damping.
        m.velocity.x *= PLANAR_DAMPING;
        m.velocity.z *= PLANAR_DAMPING;

        // Authoritative height: hover offset plus a bobbing oscillation,
        // phase-shifted by the entity id so neighbors desynchronize.
        t.position.y = m.ground_y
            + m.hover_height
            + (ctx.now_seconds() * BOB_FREQUENCY + id.id() as f64).sin() * BOB_AMPLITUDE;

        // Face the direction of travel once moving meaningfully.
        let planar_speed = (m.velocity.x * m.velocity.x + m.velocity.z * m.velocity.z).sqrt();
        if planar_speed > ARRIVE_EPSILON {
            let target_yaw = f64::atan2(m.velocity.x, m.velocity.z);
            t.rotation.y = lerp_angle(t.rotation.y, target_yaw, dt * TURN_RATE);
        }

        if let Some(slot) = store.transform_mut(id) {
            *slot = t;
        }
        if let Some(slot) = store.movement_mut(id) {
            *slot = m;
        }
    }
}

impl System for MovementIntegrator {
    fn name(&self) -> &str {
        "movement"
    }

    fn update(&mut self, store: &mut EntityStore, ctx: &TickContext) {
        for id in store.query(&[ComponentKind::Transform, ComponentKind::Movement]) {
            Self::integrate(store, id, ctx);
        }
    }
}
