//! Component payloads and the closed variant set.
//!
//! The simulation works over a small fixed set of component kinds, so the
//! storage is a tagged enum rather than type-erased columns: one
//! [`Component`] value per variant per entity, with [`ComponentKind`] as the
//! field-less discriminant used by queries and lifecycle events.

use serde::{Deserialize, Serialize};
use sim_math::DVec3;

/// The discriminant of a [`Component`], used in queries and events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComponentKind {
    Transform,
    Movement,
    Ai,
    Health,
    Mesh,
}

impl std::fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Transform => "transform",
            Self::Movement => "movement",
            Self::Ai => "ai",
            Self::Health => "health",
            Self::Mesh => "mesh",
        };
        f.write_str(name)
    }
}

/// Position, orientation, and scale in world space.
///
/// Rotation is stored as euler angles (radians); only yaw (`rotation.y`) is
/// driven by the movement integrator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: DVec3,
    pub rotation: DVec3,
    pub scale: DVec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: DVec3::ZERO,
            rotation: DVec3::ZERO,
            scale: DVec3::ONE,
        }
    }
}

/// Locomotion state for hovering entities.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Movement {
    /// Current velocity in world units per second.
    pub velocity: DVec3,
    /// Locomotion force magnitude used by `move_towards`.
    pub speed: f64,
    /// Target height above the ground plane.
    pub hover_height: f64,
    /// Ground plane height under this entity.
    pub ground_y: f64,
}

/// Top-level AI behavior mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Behavior {
    Wander,
    Seek,
    Idle,
}

/// Locomotion sub-state within a behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AiState {
    Idle,
    Moving,
}

/// Per-entity AI controller state.
///
/// Timers are in simulation-time milliseconds, compared against the tick
/// clock rather than the wall clock so behavior is deterministic under test.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ai {
    pub behavior: Behavior,
    /// Destination currently pursued, if any. `state == Moving` implies set.
    pub target: Option<DVec3>,
    /// Sim time (ms) of the last target pick or behavior change.
    pub last_direction_change: f64,
    /// How long (ms) to wait before picking a new wander target.
    pub direction_change_interval: f64,
    /// Maximum planar distance of a wander target from the current position.
    pub wander_radius: f64,
    /// Detection radius for range scans.
    pub seek_range: f64,
    pub state: AiState,
}

impl Default for Ai {
    fn default() -> Self {
        Self {
            behavior: Behavior::Wander,
            target: None,
            last_direction_change: 0.0,
            direction_change_interval: 2000.0,
            wander_radius: 10.0,
            seek_range: 15.0,
            state: AiState::Idle,
        }
    }
}

/// Hit points. Data-only: nothing in the core mutates it, it is carried for
/// external systems.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Health {
    pub max_health: f64,
    pub current_health: f64,
    pub is_dead: bool,
}

/// Renderer-owned drawable description.
///
/// The core stores this and forwards lifecycle events for it but never
/// reads its fields; only the renderer interprets them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Mesh {
    pub geometry: String,
    pub material: String,
    #[serde(default)]
    pub cast_shadow: bool,
    #[serde(default)]
    pub receive_shadow: bool,
}

/// A component value attached to an entity under a unique variant tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Component {
    Transform(Transform),
    Movement(Movement),
    Ai(Ai),
    Health(Health),
    Mesh(Mesh),
}

impl Component {
    /// Returns the variant tag of this component.
    #[must_use]
    pub fn kind(&self) -> ComponentKind {
        match self {
            Self::Transform(_) => ComponentKind::Transform,
            Self::Movement(_) => ComponentKind::Movement,
            Self::Ai(_) => ComponentKind::Ai,
            Self::Health(_) => ComponentKind::Health,
            Self::Mesh(_) => ComponentKind::Mesh,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component_kind_matches_variant() {
        assert_eq!(
            Component::Transform(Transform::default()).kind(),
            ComponentKind::Transform
        );
        assert_eq!(
            Component::Movement(Movement::default()).kind(),
            ComponentKind::Movement
        );
        assert_eq!(Component::Ai(Ai::default()).kind(), ComponentKind::Ai);
        assert_eq!(
            Component::Health(Health::default()).kind(),
            ComponentKind::Health
        );
        assert_eq!(Component::Mesh(Mesh::default()).kind(), ComponentKind::Mesh);
    }

    #[test]
    fn test_transform_default_has_unit_scale() {
        let t = Transform::default();
        assert_eq!(t.scale, DVec3::ONE);
        assert_eq!(t.position, DVec3::ZERO);
    }

    #[test]
    fn test_behavior_serde_names_are_lowercase() {
        let json = serde_json::to_string(&Behavior::Wander).unwrap();
        assert_eq!(json, "\"wander\"");
        let back: Behavior = serde_json::from_str("\"seek\"").unwrap();
        assert_eq!(back, Behavior::Seek);
    }
}
