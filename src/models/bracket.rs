//! Match, Round, and the live-match record registered with the match-tracking store.

use serde::{Deserialize, Serialize};

/// A pairing within a round: two entity names. Serialized as `["A", "B"]`.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct Match(pub String, pub String);

impl Match {
    pub fn new(a: impl Into<String>, b: impl Into<String>) -> Self {
        Self(a.into(), b.into())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0 == name || self.1 == name
    }

    /// The other side of the match, or `None` if `name` isn't playing in it.
    pub fn opponent_of(&self, name: &str) -> Option<&str> {
        if self.0 == name {
            Some(&self.1)
        } else if self.1 == name {
            Some(&self.0)
        } else {
            None
        }
    }
}

/// Ordered matches produced by one pairing pass.
pub type Round = Vec<Match>;

/// Live-match record for the match-tracking store (one per Match of a newly opened round).
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveMatch {
    pub game_name: String,
    /// 1-based round number.
    pub round: usize,
    pub team_a: String,
    pub team_b: String,
    pub is_live: bool,
}

impl LiveMatch {
    pub fn new(game_name: impl Into<String>, round: usize, m: &Match) -> Self {
        Self {
            game_name: game_name.into(),
            round,
            team_a: m.0.clone(),
            team_b: m.1.clone(),
            is_live: true,
        }
    }
}
