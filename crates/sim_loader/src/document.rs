//! Entity definition documents and component construction.
//!
//! A definition document is JSON of the form
//! `{ "name": ..., "components": { <variant>: { <fields> } } }`. Components
//! are constructed and attached in the order the document declares them
//! (`serde_json`'s `preserve_order` feature keeps map order), with
//! caller-supplied per-variant overrides merged shallowly beforehand.

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;

use sim_ecs::{Ai, Behavior, Component, Entity, EntityStore, Health, Mesh, Movement, Transform};
use sim_math::DVec3;

use crate::error::LoadError;

/// A parsed entity definition document.
#[derive(Debug, Clone, Deserialize)]
pub struct EntityDefinition {
    pub name: String,
    /// Raw component payloads keyed by variant name, in declaration order.
    #[serde(default)]
    pub components: Map<String, Value>,
}

/// `{x, y, z}` vector shape used by definition documents. Distinct from the
/// in-memory `DVec3`, which serialises as an array.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
struct Vec3Doc {
    #[serde(default)]
    x: f64,
    #[serde(default)]
    y: f64,
    #[serde(default)]
    z: f64,
}

impl From<Vec3Doc> for DVec3 {
    fn from(v: Vec3Doc) -> Self {
        DVec3::new(v.x, v.y, v.z)
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
struct TransformDoc {
    #[serde(default)]
    position: Vec3Doc,
    #[serde(default)]
    rotation: Vec3Doc,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MovementDoc {
    #[serde(default)]
    speed: f64,
    #[serde(default)]
    hover_height: f64,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AiDoc {
    behavior: Behavior,
    #[serde(default)]
    target_position: Option<Vec3Doc>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HealthDoc {
    #[serde(default)]
    max_health: f64,
    #[serde(default)]
    current_health: f64,
}

/// Construct a typed component from a declared variant name and its raw
/// payload.
///
/// # Errors
///
/// [`LoadError::UnknownComponentVariant`] for names outside the known set,
/// [`LoadError::Parse`] for payloads of the wrong shape.
pub fn build_component(name: &str, value: &Value) -> Result<Component, LoadError> {
    let component = match name {
        "transform" => {
            let doc: TransformDoc = serde_json::from_value(value.clone())?;
            Component::Transform(Transform {
                position: doc.position.into(),
                rotation: doc.rotation.into(),
                ..Transform::default()
            })
        }
        "movement" => {
            let doc: MovementDoc = serde_json::from_value(value.clone())?;
            Component::Movement(Movement {
                speed: doc.speed,
                hover_height: doc.hover_height,
                ..Movement::default()
            })
        }
        "ai" => {
            let doc: AiDoc = serde_json::from_value(value.clone())?;
            Component::Ai(Ai {
                behavior: doc.behavior,
                target: doc.target_position.map(Into::into),
                ..Ai::default()
            })
        }
        "health" => {
            let doc: HealthDoc = serde_json::from_value(value.clone())?;
            Component::Health(Health {
                max_health: doc.max_health,
                current_health: doc.current_health,
                is_dead: false,
            })
        }
        // Renderer-owned payload, stored but never interpreted here.
        "mesh" => Component::Mesh(serde_json::from_value::<Mesh>(value.clone())?),
        other => return Err(LoadError::UnknownComponentVariant(other.to_string())),
    };
    Ok(component)
}

/// Shallow merge: top-level fields of `overrides` replace those of `base`.
/// Non-object values replace wholesale.
fn merge_shallow(base: &Value, overrides: &Value) -> Value {
    match (base, overrides) {
        (Value::Object(base_map), Value::Object(override_map)) => {
            let mut merged = base_map.clone();
            for (key, value) in override_map {
                merged.insert(key.clone(), value.clone());
            }
            Value::Object(merged)
        }
        _ => overrides.clone(),
    }
}

/// Spawn one entity from a definition: `create` plus one `add_component`
/// per declared component, in document order, with per-variant overrides
/// merged shallowly before construction.
///
/// # Errors
///
/// Any failure aborts construction and propagates, leaving the entity with
/// whichever components were already applied — partial construction is
/// possible and deliberate.
pub fn spawn_entity(
    store: &mut EntityStore,
    definition: &EntityDefinition,
    overrides: &Map<String, Value>,
) -> Result<Entity, LoadError> {
    let entity = store.create(None);
    for (variant, payload) in &definition.components {
        let merged = match overrides.get(variant) {
            Some(over) => merge_shallow(payload, over),
            None => payload.clone(),
        };
        let component = build_component(variant, &merged)?;
        store.add_component(entity, component)?;
    }
    debug!(entity = %entity, definition = definition.name, "spawned entity");
    Ok(entity)
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use sim_ecs::{AiState, ComponentKind};

    use super::*;

    fn hoverbot() -> EntityDefinition {
        serde_json::from_value(json!({
            "name": "hoverbot",
            "components": {
                "transform": { "position": { "x": 1.0, "y": 0.0, "z": 2.0 } },
                "mesh": { "geometry": "box", "material": "standard", "castShadow": true },
                "movement": { "speed": 2.0, "hoverHeight": 1.5 },
                "ai": { "behavior": "wander" },
                "health": { "maxHealth": 100.0, "currentHealth": 100.0 }
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_spawn_entity_attaches_all_components() {
        let mut store = EntityStore::new();
        let e = spawn_entity(&mut store, &hoverbot(), &Map::new()).unwrap();

        assert_eq!(store.transform(e).unwrap().position, DVec3::new(1.0, 0.0, 2.0));
        assert_eq!(store.movement(e).unwrap().speed, 2.0);
        assert_eq!(store.movement(e).unwrap().hover_height, 1.5);
        assert_eq!(store.ai(e).unwrap().behavior, Behavior::Wander);
        assert_eq!(store.ai(e).unwrap().state, AiState::Idle);
        assert_eq!(store.health(e).unwrap().max_health, 100.0);
        assert!(!store.health(e).unwrap().is_dead);
        let mesh = store.mesh(e).unwrap();
        assert_eq!(mesh.geometry, "box");
        assert!(mesh.cast_shadow);
        assert!(!mesh.receive_shadow);
    }

    #[test]
    fn test_spawn_entity_applies_shallow_overrides() {
        let mut store = EntityStore::new();
        let mut overrides = Map::new();
        overrides.insert(
            "transform".to_string(),
            json!({ "position": { "x": -3.0, "y": 0.0, "z": 7.0 } }),
        );
        overrides.insert("movement".to_string(), json!({ "speed": 9.0 }));

        let e = spawn_entity(&mut store, &hoverbot(), &overrides).unwrap();

        // Position replaced wholesale (shallow merge at the variant level).
        assert_eq!(store.transform(e).unwrap().position, DVec3::new(-3.0, 0.0, 7.0));
        // Sibling fields not named by the override survive.
        let m = store.movement(e).unwrap();
        assert_eq!(m.speed, 9.0);
        assert_eq!(m.hover_height, 1.5);
    }

    #[test]
    fn test_unknown_variant_leaves_partial_entity() {
        let definition: EntityDefinition = serde_json::from_value(json!({
            "name": "broken",
            "components": {
                "transform": { "position": { "x": 1.0, "y": 0.0, "z": 1.0 } },
                "jetpack": { "thrust": 11.0 },
                "health": { "maxHealth": 50.0, "currentHealth": 50.0 }
            }
        }))
        .unwrap();

        let mut store = EntityStore::new();
        let result = spawn_entity(&mut store, &definition, &Map::new());
        assert!(matches!(
            result,
            Err(LoadError::UnknownComponentVariant(ref v)) if v == "jetpack"
        ));

        // The entity exists with the components applied before the failure,
        // and nothing after it.
        let survivors = store.query(&[ComponentKind::Transform]);
        assert_eq!(survivors.len(), 1);
        let e = survivors[0];
        assert!(store.has_component(e, ComponentKind::Transform));
        assert!(!store.has_component(e, ComponentKind::Health));
    }

    #[test]
    fn test_missing_numeric_fields_default_to_zero() {
        let definition: EntityDefinition = serde_json::from_value(json!({
            "name": "bare",
            "components": { "movement": {} }
        }))
        .unwrap();
        let mut store = EntityStore::new();
        let e = spawn_entity(&mut store, &definition, &Map::new()).unwrap();
        let m = store.movement(e).unwrap();
        assert_eq!(m.speed, 0.0);
        assert_eq!(m.hover_height, 0.0);
        assert_eq!(m.velocity, DVec3::ZERO);
    }

    #[test]
    fn test_ai_target_position_from_document() {
        let definition: EntityDefinition = serde_json::from_value(json!({
            "name": "seeker",
            "components": {
                "ai": { "behavior": "seek", "targetPosition": { "x": 4.0, "y": 0.0, "z": -2.0 } }
            }
        }))
        .unwrap();
        let mut store = EntityStore::new();
        let e = spawn_entity(&mut store, &definition, &Map::new()).unwrap();
        let ai = store.ai(e).unwrap();
        assert_eq!(ai.behavior, Behavior::Seek);
        assert_eq!(ai.target, Some(DVec3::new(4.0, 0.0, -2.0)));
    }

    #[test]
    fn test_malformed_payload_is_parse_error() {
        let definition: EntityDefinition = serde_json::from_value(json!({
            "name": "bad",
            "components": { "ai": { "behavior": "berserk" } }
        }))
        .unwrap();
        let mut store = EntityStore::new();
        let result = spawn_entity(&mut store, &definition, &Map::new());
        assert!(matches!(result, Err(LoadError::Parse(_))));
    }
}
