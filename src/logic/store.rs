//! Tournament state store: fresh start, resume from a snapshot, reset.

use crate::logic::resolver::{advance, declare_winner, RoundOutcome};
use crate::models::{Entity, Tournament, TournamentError};
use std::collections::HashSet;

/// Holds one tournament snapshot plus the one-shot auto-start guard.
#[derive(Clone, Debug, Default)]
pub struct TournamentStore {
    tournament: Tournament,
    /// Set once round 1 has been generated from a resumed snapshot.
    auto_started: bool,
}

impl TournamentStore {
    /// Empty pre-start store.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tournament(&self) -> &Tournament {
        &self.tournament
    }

    pub fn has_auto_started(&self) -> bool {
        self.auto_started
    }

    /// Start a fresh bracket from an operator-entered entity list.
    ///
    /// Names are trimmed and blanks skipped. A single entity is crowned immediately.
    pub fn start(
        &mut self,
        game_name: impl Into<String>,
        names: &[String],
    ) -> Result<RoundOutcome, TournamentError> {
        let mut seen = HashSet::new();
        let mut teams = Vec::with_capacity(names.len());
        for name in names.iter().map(|n| n.trim()).filter(|n| !n.is_empty()) {
            if !seen.insert(name.to_lowercase()) {
                return Err(TournamentError::DuplicateEntity(name.to_string()));
            }
            teams.push(Entity::new(name));
        }
        if teams.is_empty() {
            return Err(TournamentError::NoEntities);
        }
        self.tournament = Tournament::with_entities(game_name, teams);
        Ok(self.open_first_round())
    }

    /// Adopt a persisted snapshot. If it has teams but no open round and no champion,
    /// round 1 is generated, at most once per store.
    ///
    /// Once the guard has fired, a snapshot without an open round is stale relative to
    /// the in-memory state and is ignored.
    pub fn resume(&mut self, snapshot: Tournament) -> Option<RoundOutcome> {
        if !snapshot.awaiting_first_round() {
            self.tournament = snapshot;
            return None;
        }
        if self.auto_started {
            log::debug!(
                "Round 1 of {:?} already generated, ignoring stale snapshot",
                snapshot.game_name
            );
            return None;
        }
        self.auto_started = true;
        self.tournament = snapshot;
        Some(self.open_first_round())
    }

    /// Apply a declared winner to the open round.
    pub fn declare_winner(&mut self, winner: &str) -> Result<RoundOutcome, TournamentError> {
        declare_winner(&mut self.tournament, winner)
    }

    /// Back to the empty pre-start state. Re-arms the auto-start guard.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    fn open_first_round(&mut self) -> RoundOutcome {
        let t = &mut self.tournament;
        t.rounds.clear();
        t.current_round.clear();
        t.next_round.clear();
        t.champion = None;
        let names = t.entity_names();
        advance(t, names, None)
    }
}
