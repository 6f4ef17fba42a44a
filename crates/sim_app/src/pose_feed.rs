//! Renderer-side pose feed.
//!
//! Stands in for the store-facing half of an external renderer: it builds a
//! pose record when a mesh component appears, releases it on removal or
//! entity destruction, and copies `Transform` data into the record each
//! tick. It never mutates simulation components.

// The pose accessors are not yet read from main() but are exercised by tests
// and will be used once a real renderer consumes the feed.
#![allow(dead_code)]

use std::collections::HashMap;

use tracing::debug;

use sim_ecs::{ComponentKind, Entity, EntityStore, System, TickContext};
use sim_math::DVec3;

/// The spatial pose a drawable needs, copied from `Transform` every tick.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Pose {
    pub position: DVec3,
    pub rotation: DVec3,
    pub scale: DVec3,
}

/// Maintains per-entity poses for every entity carrying a mesh, kept in
/// sync via lifecycle notifications rather than polling.
#[derive(Debug, Default)]
pub struct PoseFeed {
    poses: HashMap<Entity, Pose>,
}

impl PoseFeed {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The current pose for an entity, if it has a drawable.
    #[must_use]
    pub fn pose(&self, entity: Entity) -> Option<&Pose> {
        self.poses.get(&entity)
    }

    /// Number of tracked drawables.
    #[must_use]
    pub fn drawable_count(&self) -> usize {
        self.poses.len()
    }
}

impl System for PoseFeed {
    fn name(&self) -> &str {
        "pose_feed"
    }

    fn update(&mut self, store: &mut EntityStore, _ctx: &TickContext) {
        for id in store.query(&[ComponentKind::Transform, ComponentKind::Mesh]) {
            let Some(transform) = store.transform(id) else {
                continue;
            };
            if let Some(pose) = self.poses.get_mut(&id) {
                pose.position = transform.position;
                pose.rotation = transform.rotation;
                pose.scale = transform.scale;
            }
        }
    }

    fn on_component_added(&mut self, _store: &EntityStore, entity: Entity, kind: ComponentKind) {
        if kind == ComponentKind::Mesh {
            debug!(entity = %entity, "drawable created");
            self.poses.entry(entity).or_default();
        }
    }

    fn on_component_removed(&mut self, _store: &EntityStore, entity: Entity, kind: ComponentKind) {
        if kind == ComponentKind::Mesh {
            debug!(entity = %entity, "drawable released");
            self.poses.remove(&entity);
        }
    }

    fn on_entity_destroyed(&mut self, entity: Entity) {
        // Fires even for ids never seen; removal is best-effort.
        self.poses.remove(&entity);
    }
}

#[cfg(test)]
mod tests {
    use sim_ecs::{Component, Mesh, Movement, Scheduler, Transform};
    use sim_systems::MovementIntegrator;

    use super::*;

    fn mesh() -> Component {
        Component::Mesh(Mesh {
            geometry: "box".to_string(),
            material: "standard".to_string(),
            cast_shadow: false,
            receive_shadow: false,
        })
    }

    #[test]
    fn test_drawable_lifecycle_follows_events() {
        let mut store = EntityStore::new();
        let mut feed = PoseFeed::new();

        let e = store.create(None);
        store
            .add_component(e, Component::Transform(Transform::default()))
            .unwrap();
        store.add_component(e, mesh()).unwrap();

        // Non-mesh components never create drawables.
        feed.on_component_added(&store, e, ComponentKind::Transform);
        assert_eq!(feed.drawable_count(), 0);

        feed.on_component_added(&store, e, ComponentKind::Mesh);
        assert_eq!(feed.drawable_count(), 1);

        feed.on_component_removed(&store, e, ComponentKind::Mesh);
        assert_eq!(feed.drawable_count(), 0);

        feed.on_component_added(&store, e, ComponentKind::Mesh);
        feed.on_entity_destroyed(e);
        assert_eq!(feed.drawable_count(), 0);
    }

    #[test]
    fn test_pose_copies_transform_each_tick() {
        let mut store = EntityStore::new();
        let mut scheduler = Scheduler::new();
        scheduler.add_system(Box::new(MovementIntegrator::new()));

        let e = store.create(None);
        store
            .add_component(e, Component::Transform(Transform::default()))
            .unwrap();
        store
            .add_component(
                e,
                Component::Movement(Movement {
                    speed: 2.0,
                    hover_height: 1.0,
                    ..Movement::default()
                }),
            )
            .unwrap();
        store.add_component(e, mesh()).unwrap();

        let mut feed = PoseFeed::new();
        feed.on_component_added(&store, e, ComponentKind::Mesh);

        MovementIntegrator::apply_force(&mut store, e, DVec3::new(2.0, 0.0, 0.0));
        scheduler.tick(&mut store, 16.67);

        let ctx = TickContext {
            tick_id: 1,
            dt_ms: 16.67,
            now_ms: 16.67,
        };
        feed.update(&mut store, &ctx);

        let pose = feed.pose(e).unwrap();
        assert_eq!(pose.position, store.transform(e).unwrap().position);
        assert!(pose.position.x > 0.0);
        assert_eq!(pose.scale, DVec3::ONE);
    }

    #[test]
    fn test_destroy_of_untracked_id_is_harmless() {
        let mut feed = PoseFeed::new();
        feed.on_entity_destroyed(Entity::from_raw(999));
        assert_eq!(feed.drawable_count(), 0);
    }
}
