//! The [`System`] trait and per-tick context.
//!
//! A system declares interest in lifecycle notifications by overriding the
//! corresponding hook; the defaults are no-ops, so a pure per-tick system
//! only has to implement [`System::update`].

use crate::component::ComponentKind;
use crate::entity::Entity;
use crate::store::EntityStore;

/// Timing context for one tick.
///
/// Simulation time is threaded through the tick rather than read from the
/// wall clock, so systems with timers (the AI controller) and oscillators
/// (hover bobbing) are deterministic under test.
#[derive(Debug, Clone, Copy)]
pub struct TickContext {
    /// The current tick counter, starting at 1 for the first tick.
    pub tick_id: u64,
    /// Delta time since the last tick, in milliseconds.
    pub dt_ms: f64,
    /// Simulation time since the scheduler started, in milliseconds.
    pub now_ms: f64,
}

impl TickContext {
    /// Delta time in seconds.
    #[must_use]
    pub fn dt_seconds(&self) -> f64 {
        self.dt_ms / 1000.0
    }

    /// Simulation time in seconds.
    #[must_use]
    pub fn now_seconds(&self) -> f64 {
        self.now_ms / 1000.0
    }
}

/// A simulation system driven by the [`Scheduler`](crate::Scheduler).
///
/// Registration order is update order and lifecycle-notification order.
/// Systems never own component data; they borrow the store for the duration
/// of one call.
pub trait System {
    /// Human-readable system name, used for logging and removal.
    fn name(&self) -> &str;

    /// Advance this system by one tick.
    fn update(&mut self, store: &mut EntityStore, ctx: &TickContext);

    /// A component was attached to (or replaced on) an entity.
    fn on_component_added(&mut self, store: &EntityStore, entity: Entity, kind: ComponentKind) {
        let _ = (store, entity, kind);
    }

    /// A component was detached from an entity.
    fn on_component_removed(&mut self, store: &EntityStore, entity: Entity, kind: ComponentKind) {
        let _ = (store, entity, kind);
    }

    /// An entity was destroyed. Fires even for ids that were never live;
    /// treat release as best-effort.
    fn on_entity_destroyed(&mut self, entity: Entity) {
        let _ = entity;
    }
}
