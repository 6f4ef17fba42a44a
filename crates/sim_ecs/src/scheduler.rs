//! Tick scheduler — ordered system dispatch and event forwarding.
//!
//! One tick is one synchronous pass through all registered systems' `update`
//! in registration order. Lifecycle events recorded by the store are
//! dispatched before the first system runs and after each system's update,
//! so a mutation made by one system reaches every system (in registration
//! order) before the next system executes. No system runs concurrently with
//! another and no two ticks overlap.

use tracing::debug;

use crate::store::{EntityStore, StoreEvent};
use crate::system::{System, TickContext};

/// Drives registered systems, one update pass per simulation tick.
///
/// The scheduler also accumulates simulation time from the per-tick deltas;
/// it is the single clock source for the whole simulation.
#[derive(Default)]
pub struct Scheduler {
    systems: Vec<Box<dyn System>>,
    tick_id: u64,
    now_ms: f64,
}

impl Scheduler {
    /// Create a scheduler with no systems.
    #[must_use]
    pub fn new() -> Self {
        Self {
            systems: Vec::new(),
            tick_id: 0,
            now_ms: 0.0,
        }
    }

    /// Append a system. Registration order is update order and
    /// notification order.
    ///
    /// Registering the same system twice duplicates every call; the
    /// scheduler does not guard against it.
    pub fn add_system(&mut self, system: Box<dyn System>) {
        debug!(system = system.name(), "system registered");
        self.systems.push(system);
    }

    /// Remove a system by name. Returns `true` if one was found.
    pub fn remove_system(&mut self, name: &str) -> bool {
        let before = self.systems.len();
        self.systems.retain(|s| s.name() != name);
        self.systems.len() < before
    }

    /// Number of registered systems.
    #[must_use]
    pub fn system_count(&self) -> usize {
        self.systems.len()
    }

    /// The current tick counter.
    #[must_use]
    pub fn tick_id(&self) -> u64 {
        self.tick_id
    }

    /// Accumulated simulation time in milliseconds.
    #[must_use]
    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    /// Run one tick with the given delta time in milliseconds.
    ///
    /// An in-flight tick always runs to completion; stopping the host loop
    /// simply means not requesting further ticks.
    pub fn tick(&mut self, store: &mut EntityStore, dt_ms: f64) {
        self.tick_id += 1;
        self.now_ms += dt_ms;
        let ctx = TickContext {
            tick_id: self.tick_id,
            dt_ms,
            now_ms: self.now_ms,
        };

        debug!(tick_id = ctx.tick_id, dt_ms, "tick start");

        // Deliver mutations made outside the tick (loading, input handlers)
        // before any system runs.
        self.flush_events(store);

        for idx in 0..self.systems.len() {
            self.systems[idx].update(store, &ctx);
            // Forward this system's structural mutations before the next
            // system executes.
            self.flush_events(store);
        }
    }

    /// Dispatch all pending store events to every system, in occurrence
    /// order and registration order.
    ///
    /// Public so a host can deliver load-time events (e.g. to a renderer)
    /// before the first tick.
    pub fn flush_events(&mut self, store: &mut EntityStore) {
        // Hooks take the store immutably, so a single drain is exhaustive.
        for event in store.take_events() {
            for system in &mut self.systems {
                match event {
                    StoreEvent::ComponentAdded { entity, kind } => {
                        system.on_component_added(store, entity, kind);
                    }
                    StoreEvent::ComponentRemoved { entity, kind } => {
                        system.on_component_removed(store, entity, kind);
                    }
                    StoreEvent::EntityDestroyed { entity } => {
                        system.on_entity_destroyed(entity);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::component::{Component, ComponentKind, Transform};
    use crate::entity::Entity;

    /// Records every call it receives, for ordering assertions.
    struct Probe {
        name: String,
        log: Rc<RefCell<Vec<String>>>,
    }

    impl Probe {
        fn new(name: &str, log: Rc<RefCell<Vec<String>>>) -> Box<Self> {
            Box::new(Self {
                name: name.to_string(),
                log,
            })
        }

        fn record(&self, what: &str) {
            self.log.borrow_mut().push(format!("{}:{}", self.name, what));
        }
    }

    impl System for Probe {
        fn name(&self) -> &str {
            &self.name
        }

        fn update(&mut self, _store: &mut EntityStore, ctx: &TickContext) {
            self.record(&format!("update@{}", ctx.tick_id));
        }

        fn on_component_added(&mut self, _store: &EntityStore, entity: Entity, kind: ComponentKind) {
            self.record(&format!("added:{entity}:{kind}"));
        }

        fn on_component_removed(
            &mut self,
            _store: &EntityStore,
            entity: Entity,
            kind: ComponentKind,
        ) {
            self.record(&format!("removed:{entity}:{kind}"));
        }

        fn on_entity_destroyed(&mut self, entity: Entity) {
            self.record(&format!("destroyed:{entity}"));
        }
    }

    #[test]
    fn test_update_runs_in_registration_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut scheduler = Scheduler::new();
        scheduler.add_system(Probe::new("first", log.clone()));
        scheduler.add_system(Probe::new("second", log.clone()));

        let mut store = EntityStore::new();
        scheduler.tick(&mut store, 16.0);

        assert_eq!(
            *log.borrow(),
            vec!["first:update@1".to_string(), "second:update@1".to_string()]
        );
    }

    #[test]
    fn test_tick_accumulates_time() {
        let mut scheduler = Scheduler::new();
        let mut store = EntityStore::new();
        scheduler.tick(&mut store, 16.0);
        scheduler.tick(&mut store, 16.0);
        assert_eq!(scheduler.tick_id(), 2);
        assert!((scheduler.now_ms() - 32.0).abs() < 1e-12);
    }

    #[test]
    fn test_events_reach_all_systems_in_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut scheduler = Scheduler::new();
        scheduler.add_system(Probe::new("a", log.clone()));
        scheduler.add_system(Probe::new("b", log.clone()));

        let mut store = EntityStore::new();
        let e = store.create(None);
        store
            .add_component(e, Component::Transform(Transform::default()))
            .unwrap();
        store.destroy(e);

        scheduler.flush_events(&mut store);

        let entries = log.borrow();
        assert_eq!(
            *entries,
            vec![
                format!("a:added:{e}:transform"),
                format!("b:added:{e}:transform"),
                format!("a:destroyed:{e}"),
                format!("b:destroyed:{e}"),
            ]
        );
    }

    #[test]
    fn test_destroy_of_unknown_id_still_notifies() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut scheduler = Scheduler::new();
        scheduler.add_system(Probe::new("a", log.clone()));

        let mut store = EntityStore::new();
        let ghost = Entity::from_raw(42);
        store.destroy(ghost);
        scheduler.flush_events(&mut store);

        assert_eq!(*log.borrow(), vec![format!("a:destroyed:{ghost}")]);
    }

    #[test]
    fn test_mid_tick_mutations_dispatch_before_next_tick() {
        /// Spawns one entity on its first update.
        struct Spawner {
            spawned: bool,
        }

        impl System for Spawner {
            fn name(&self) -> &str {
                "spawner"
            }

            fn update(&mut self, store: &mut EntityStore, _ctx: &TickContext) {
                if !self.spawned {
                    let e = store.create(None);
                    store
                        .add_component(e, Component::Transform(Transform::default()))
                        .unwrap();
                    self.spawned = true;
                }
            }
        }

        let log = Rc::new(RefCell::new(Vec::new()));
        let mut scheduler = Scheduler::new();
        scheduler.add_system(Box::new(Spawner { spawned: false }));
        scheduler.add_system(Probe::new("observer", log.clone()));

        let mut store = EntityStore::new();
        scheduler.tick(&mut store, 16.0);

        // The observer hears about the spawner's mutation within the same
        // tick, before its own update.
        let entries = log.borrow();
        assert_eq!(entries.len(), 2);
        assert!(entries[0].starts_with("observer:added:"));
        assert_eq!(entries[1], "observer:update@1");
    }

    #[test]
    fn test_remove_system() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut scheduler = Scheduler::new();
        scheduler.add_system(Probe::new("a", log.clone()));
        assert!(scheduler.remove_system("a"));
        assert!(!scheduler.remove_system("a"));
        assert_eq!(scheduler.system_count(), 0);
    }
}
