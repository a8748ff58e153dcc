//! Data structures for the bracket: entities, matches, tournament snapshot.

mod bracket;
mod entity;
mod tournament;

pub use bracket::{LiveMatch, Match, Round};
pub use entity::{entity_from_value, Entity, EntityStatus, MalformedEntry};
pub use tournament::{RoundStatus, Tournament, TournamentError, TournamentId};
