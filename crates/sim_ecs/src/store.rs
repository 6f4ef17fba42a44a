//! Entity/component storage with lifecycle event recording.
//!
//! The [`EntityStore`] exclusively owns the entity → component-set mapping.
//! Structural mutations (`create`, `destroy`, `add_component`,
//! `remove_component`) record [`StoreEvent`]s which the
//! [`Scheduler`](crate::Scheduler) dispatches to registered systems at tick
//! boundaries, so no mutation can re-enter a system while another system is
//! mid-update.

use std::collections::{HashMap, VecDeque};

use thiserror::Error;

use crate::component::{Ai, Component, ComponentKind, Health, Mesh, Movement, Transform};
use crate::entity::{Entity, EntityAllocator};

/// Errors raised by entity-scoped store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The target entity has no component set.
    #[error("entity {0} not found")]
    EntityNotFound(Entity),
}

/// A lifecycle notification recorded by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreEvent {
    /// A component was attached (or replaced) on an entity. Replacing an
    /// existing component of the same variant records exactly one of these,
    /// never a removed/added pair.
    ComponentAdded { entity: Entity, kind: ComponentKind },
    /// A component was detached from an entity.
    ComponentRemoved { entity: Entity, kind: ComponentKind },
    /// An entity was destroyed. Recorded unconditionally by
    /// [`EntityStore::destroy`], even for ids the store never held.
    EntityDestroyed { entity: Entity },
}

/// A single entity's component set, in insertion order.
#[derive(Debug, Clone, Default)]
struct EntityData {
    components: Vec<Component>,
}

impl EntityData {
    fn index_of(&self, kind: ComponentKind) -> Option<usize> {
        self.components.iter().position(|c| c.kind() == kind)
    }
}

/// The entity/component store: identity allocation, typed component
/// mutation, and cross-cutting queries.
///
/// Entity iteration order is creation order, kept in an explicit order
/// vector beside the id map so queries are deterministic given a fixed
/// sequence of creations.
#[derive(Debug, Default)]
pub struct EntityStore {
    allocator: EntityAllocator,
    entities: HashMap<Entity, EntityData>,
    /// Creation order; drives query result ordering.
    order: Vec<Entity>,
    events: VecDeque<StoreEvent>,
}

impl EntityStore {
    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            allocator: EntityAllocator::new(),
            entities: HashMap::new(),
            order: Vec::new(),
            events: VecDeque::new(),
        }
    }

    // -- Entity lifecycle --

    /// Create an entity with an empty component set. Never fails.
    ///
    /// With `None`, a fresh id is allocated. With `Some(id)`, that id is
    /// used as-is: if it is already live its component set is replaced (its
    /// position in iteration order is kept), and the allocator is bumped
    /// past it so future fresh allocations cannot collide.
    pub fn create(&mut self, id: Option<Entity>) -> Entity {
        let entity = match id {
            Some(id) => {
                self.allocator.reserve_past(id);
                id
            }
            None => self.allocator.allocate(),
        };
        if self.entities.insert(entity, EntityData::default()).is_none() {
            self.order.push(entity);
        }
        entity
    }

    /// Destroy an entity, removing its component set if present.
    ///
    /// Idempotent, and the `EntityDestroyed` notification is recorded
    /// unconditionally — observers hear about ids that were never live.
    /// That mirrors long-standing behavior downstream consumers rely on to
    /// treat release as best-effort.
    pub fn destroy(&mut self, id: Entity) {
        if self.entities.remove(&id).is_some() {
            self.order.retain(|&e| e != id);
        }
        self.events.push_back(StoreEvent::EntityDestroyed { entity: id });
    }

    /// Check if an entity is live.
    #[must_use]
    pub fn exists(&self, id: Entity) -> bool {
        self.entities.contains_key(&id)
    }

    /// Number of live entities.
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// All live entities, in creation order.
    pub fn entities(&self) -> impl Iterator<Item = Entity> + '_ {
        self.order.iter().copied()
    }

    // -- Component operations --

    /// Attach a component to an entity, silently replacing any existing
    /// component of the same variant.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::EntityNotFound`] if `id` has no component set.
    pub fn add_component(&mut self, id: Entity, component: Component) -> Result<(), StoreError> {
        let kind = component.kind();
        let data = self
            .entities
            .get_mut(&id)
            .ok_or(StoreError::EntityNotFound(id))?;
        match data.index_of(kind) {
            Some(idx) => data.components[idx] = component,
            None => data.components.push(component),
        }
        self.events
            .push_back(StoreEvent::ComponentAdded { entity: id, kind });
        Ok(())
    }

    /// Detach a component from an entity. No-op (no error, no event) if the
    /// entity or the component is missing.
    pub fn remove_component(&mut self, id: Entity, kind: ComponentKind) {
        let Some(data) = self.entities.get_mut(&id) else {
            return;
        };
        let Some(idx) = data.index_of(kind) else {
            return;
        };
        data.components.remove(idx);
        self.events
            .push_back(StoreEvent::ComponentRemoved { entity: id, kind });
    }

    /// Get a component by variant tag.
    #[must_use]
    pub fn get_component(&self, id: Entity, kind: ComponentKind) -> Option<&Component> {
        let data = self.entities.get(&id)?;
        let idx = data.index_of(kind)?;
        Some(&data.components[idx])
    }

    fn get_component_mut(&mut self, id: Entity, kind: ComponentKind) -> Option<&mut Component> {
        let data = self.entities.get_mut(&id)?;
        let idx = data.index_of(kind)?;
        Some(&mut data.components[idx])
    }

    /// Check if an entity carries a component of the given variant.
    #[must_use]
    pub fn has_component(&self, id: Entity, kind: ComponentKind) -> bool {
        self.entities
            .get(&id)
            .is_some_and(|d| d.index_of(kind).is_some())
    }

    // -- Typed accessors --

    /// The entity's `Transform`, if present.
    #[must_use]
    pub fn transform(&self, id: Entity) -> Option<&Transform> {
        match self.get_component(id, ComponentKind::Transform)? {
            Component::Transform(t) => Some(t),
            _ => None,
        }
    }

    /// Mutable access to the entity's `Transform`.
    pub fn transform_mut(&mut self, id: Entity) -> Option<&mut Transform> {
        match self.get_component_mut(id, ComponentKind::Transform)? {
            Component::Transform(t) => Some(t),
            _ => None,
        }
    }

    /// The entity's `Movement`, if present.
    #[must_use]
    pub fn movement(&self, id: Entity) -> Option<&Movement> {
        match self.get_component(id, ComponentKind::Movement)? {
            Component::Movement(m) => Some(m),
            _ => None,
        }
    }

    /// Mutable access to the entity's `Movement`.
    pub fn movement_mut(&mut self, id: Entity) -> Option<&mut Movement> {
        match self.get_component_mut(id, ComponentKind::Movement)? {
            Component::Movement(m) => Some(m),
            _ => None,
        }
    }

    /// The entity's `Ai`, if present.
    #[must_use]
    pub fn ai(&self, id: Entity) -> Option<&Ai> {
        match self.get_component(id, ComponentKind::Ai)? {
            Component::Ai(a) => Some(a),
            _ => None,
        }
    }

    /// Mutable access to the entity's `Ai`.
    pub fn ai_mut(&mut self, id: Entity) -> Option<&mut Ai> {
        match self.get_component_mut(id, ComponentKind::Ai)? {
            Component::Ai(a) => Some(a),
            _ => None,
        }
    }

    /// The entity's `Health`, if present.
    #[must_use]
    pub fn health(&self, id: Entity) -> Option<&Health> {
        match self.get_component(id, ComponentKind::Health)? {
            Component::Health(h) => Some(h),
            _ => None,
        }
    }

    /// Mutable access to the entity's `Health`.
    pub fn health_mut(&mut self, id: Entity) -> Option<&mut Health> {
        match self.get_component_mut(id, ComponentKind::Health)? {
            Component::Health(h) => Some(h),
            _ => None,
        }
    }

    /// The entity's `Mesh`, if present. The core never reads its fields.
    #[must_use]
    pub fn mesh(&self, id: Entity) -> Option<&Mesh> {
        match self.get_component(id, ComponentKind::Mesh)? {
            Component::Mesh(m) => Some(m),
            _ => None,
        }
    }

    // -- Query --

    /// All entities whose component set is a superset of `kinds`, in
    /// creation order.
    ///
    /// Recomputed on every call; there is no cached index. Linear scans are
    /// an intentional simplicity tradeoff at this entity count.
    #[must_use]
    pub fn query(&self, kinds: &[ComponentKind]) -> Vec<Entity> {
        self.order
            .iter()
            .copied()
            .filter(|&id| {
                let data = &self.entities[&id];
                kinds.iter().all(|&k| data.index_of(k).is_some())
            })
            .collect()
    }

    // -- Events --

    /// Drain all pending lifecycle events, in occurrence order.
    pub fn take_events(&mut self) -> Vec<StoreEvent> {
        self.events.drain(..).collect()
    }

    /// Number of lifecycle events waiting for dispatch.
    #[must_use]
    pub fn pending_events(&self) -> usize {
        self.events.len()
    }
}
