//! Entity (a competing team or player) and its standing in the bracket.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Standing of an entity within one tournament.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum EntityStatus {
    /// Still competing (or not yet started).
    #[default]
    In,
    /// Lost a match, or the tournament finished without them on top.
    Out,
    /// Sole survivor of a completed tournament.
    Champion,
}

impl EntityStatus {
    fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "In" => Some(EntityStatus::In),
            "Out" => Some(EntityStatus::Out),
            "Champion" => Some(EntityStatus::Champion),
            _ => None,
        }
    }
}

/// A competing team/player. Names are unique within one tournament.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub name: String,
    #[serde(default)]
    pub status: EntityStatus,
}

impl Entity {
    /// Create a new entity with status `In`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: EntityStatus::In,
        }
    }

    /// Mark the entity as knocked out.
    pub fn knock_out(&mut self) {
        self.status = EntityStatus::Out;
    }

    pub fn is_in(&self) -> bool {
        self.status == EntityStatus::In
    }
}

/// A snapshot entity entry that is neither a plain name nor a `{name, status}` record.
#[derive(Clone, Debug, PartialEq)]
pub struct MalformedEntry {
    pub index: usize,
    pub value: Value,
}

impl std::fmt::Display for MalformedEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "malformed team entry at index {}: {}", self.index, self.value)
    }
}

impl std::error::Error for MalformedEntry {}

/// Convert one raw snapshot entry into an entity.
///
/// Accepts `"Name"`, `{"name": "Name"}` and `{"name": "Name", "status": "Out"}`.
/// Names are trimmed; a missing status means `In`.
pub fn entity_from_value(index: usize, value: Value) -> Result<Entity, MalformedEntry> {
    match parse_entity(&value) {
        Some(entity) => Ok(entity),
        None => Err(MalformedEntry { index, value }),
    }
}

fn parse_entity(value: &Value) -> Option<Entity> {
    match value {
        Value::String(name) => non_blank(name).map(Entity::new),
        Value::Object(map) => {
            let name = map.get("name").and_then(Value::as_str).and_then(non_blank)?;
            let status = match map.get("status") {
                None | Some(Value::Null) => EntityStatus::In,
                Some(Value::String(raw)) => EntityStatus::parse(raw).unwrap_or_else(|| {
                    log::warn!("Unknown status {:?} for team {:?}, treating as In", raw, name);
                    EntityStatus::In
                }),
                Some(_) => return None,
            };
            Some(Entity {
                name: name.to_string(),
                status,
            })
        }
        _ => None,
    }
}

fn non_blank(s: &str) -> Option<&str> {
    let s = s.trim();
    (!s.is_empty()).then_some(s)
}

/// Lenient loader for the `teams` field: malformed entries are dropped with a warning.
pub(crate) fn deserialize_entities<'de, D>(deserializer: D) -> Result<Vec<Entity>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default();
    let entities = raw
        .into_iter()
        .enumerate()
        .filter_map(|(i, v)| match entity_from_value(i, v) {
            Ok(e) => Some(e),
            Err(err) => {
                log::warn!("Dropping {}", err);
                None
            }
        })
        .collect();
    Ok(entities)
}
