//! Tournament snapshot and RoundStatus.

use crate::models::bracket::Round;
use crate::models::entity::{deserialize_entities, Entity, EntityStatus};
use serde::{Deserialize, Deserializer, Serialize};

/// Errors that can occur during bracket operations.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TournamentError {
    /// Declared winner is not playing in any open match.
    UnknownWinner(String),
    /// Cannot start a bracket without entities.
    NoEntities,
    /// Two entities share a name (names are unique, case-insensitive).
    DuplicateEntity(String),
}

impl std::fmt::Display for TournamentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TournamentError::UnknownWinner(name) => {
                write!(f, "No open match found for winner {:?}", name)
            }
            TournamentError::NoEntities => write!(f, "Need at least one team to start"),
            TournamentError::DuplicateEntity(name) => {
                write!(f, "A team named {:?} already exists", name)
            }
        }
    }
}

impl std::error::Error for TournamentError {}

/// Identifier of a tournament (backend record id, or a uuid for local tournaments).
pub type TournamentId = String;

/// Whether the bracket is still being played.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub enum RoundStatus {
    #[default]
    Ongoing,
    Completed,
}

/// Full tournament state. This is also the persisted snapshot shape.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tournament {
    /// Display label; also the correlation key for live-match records.
    #[serde(default, deserialize_with = "null_as_default")]
    pub game_name: String,
    #[serde(default, deserialize_with = "deserialize_entities")]
    pub teams: Vec<Entity>,
    /// Every round ever opened, in order. Never mutated after being appended.
    #[serde(default, deserialize_with = "null_as_default")]
    pub rounds: Vec<Round>,
    /// Open matches of the current round; shrinks as winners are declared.
    #[serde(default, deserialize_with = "null_as_default")]
    pub current_round: Round,
    /// Entities already through to the next pairing pass (winners and byes).
    #[serde(default, deserialize_with = "null_as_default")]
    pub next_round: Vec<String>,
    #[serde(default)]
    pub champion: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub round_status: RoundStatus,
}

impl Tournament {
    /// Create an empty, not yet started tournament.
    pub fn new(game_name: impl Into<String>) -> Self {
        Self {
            game_name: game_name.into(),
            ..Self::default()
        }
    }

    /// Create a tournament with entities, still pre-start (no rounds).
    pub fn with_entities(game_name: impl Into<String>, teams: Vec<Entity>) -> Self {
        Self {
            teams,
            ..Self::new(game_name)
        }
    }

    pub fn entity(&self, name: &str) -> Option<&Entity> {
        self.teams.iter().find(|e| e.name == name)
    }

    pub fn entity_mut(&mut self, name: &str) -> Option<&mut Entity> {
        self.teams.iter_mut().find(|e| e.name == name)
    }

    pub fn entity_names(&self) -> Vec<String> {
        self.teams.iter().map(|e| e.name.clone()).collect()
    }

    pub fn is_completed(&self) -> bool {
        self.round_status == RoundStatus::Completed
    }

    /// Number of the open round (1-based), 0 before the first pairing pass.
    pub fn round_number(&self) -> usize {
        self.rounds.len()
    }

    /// Teams present, but no open round and no champion: round 1 was never generated.
    pub fn awaiting_first_round(&self) -> bool {
        self.current_round.is_empty() && self.champion.is_none() && !self.teams.is_empty()
    }

    pub fn count_with_status(&self, status: EntityStatus) -> usize {
        self.teams.iter().filter(|e| e.status == status).count()
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
