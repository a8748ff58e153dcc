//! Bracket business logic: pairing, round resolution, state store.

mod pairing;
mod resolver;
mod store;

pub use pairing::{generate, parse_team_list, Pairing};
pub use resolver::{declare_winner, MatchResult, RoundOutcome};
pub use store::TournamentStore;
