//! Tournament dashboard: single-elimination bracket engine with pluggable persistence.

pub mod config;
pub mod engine;
pub mod logic;
pub mod models;
pub mod notify;
pub mod persistence;

pub use config::Config;
pub use engine::Engine;
pub use logic::{
    declare_winner, generate, parse_team_list, MatchResult, Pairing, RoundOutcome,
    TournamentStore,
};
pub use models::{
    Entity, EntityStatus, LiveMatch, MalformedEntry, Match, Round, RoundStatus, Tournament,
    TournamentError, TournamentId,
};
pub use notify::{spawn_bridge, BridgeHandle, BridgeReport, WinnerEvent, WinnerSink, WinnerSource};
pub use persistence::{
    BackendClient, LocalFileStore, MatchRegistry, MemoryStore, PersistenceError, SnapshotStore,
};
