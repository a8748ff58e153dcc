//! Round resolution: apply a declared winner, close rounds, crown the champion.

use crate::logic::pairing::generate;
use crate::models::{EntityStatus, Match, RoundStatus, Tournament, TournamentError};
use serde::Serialize;

/// Winner and loser of one resolved match.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct MatchResult {
    pub winner: String,
    pub loser: String,
}

/// What a bracket transition did. Returned to the host so it can surface notices.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RoundOutcome {
    /// A match was resolved; other matches of the round are still open.
    Pending { result: MatchResult, remaining: usize },
    /// A new round was opened (round 1 at start, or after the previous round closed).
    RoundOpened {
        result: Option<MatchResult>,
        round: usize,
        matches: Vec<Match>,
        bye: Option<String>,
    },
    /// One entity remains; the tournament is over.
    Completed {
        result: Option<MatchResult>,
        champion: String,
    },
}

impl RoundOutcome {
    /// Human-readable side-channel message, if the transition warrants one.
    ///
    /// Any bye in a newly opened round is announced, whether or not the round also has
    /// pairs: an odd pass always pairs the others. Crowning a champion is announced too.
    pub fn notice(&self) -> Option<String> {
        match self {
            RoundOutcome::RoundOpened { bye: Some(name), .. } => {
                Some(format!("{} advances automatically to the next round", name))
            }
            RoundOutcome::Completed { champion, .. } => {
                Some(format!("{} is the champion", champion))
            }
            _ => None,
        }
    }

    /// Matches of a newly opened round (empty for other outcomes).
    pub fn opened_matches(&self) -> &[Match] {
        match self {
            RoundOutcome::RoundOpened { matches, .. } => matches.as_slice(),
            _ => &[],
        }
    }
}

/// Apply `winner` to the open round of `tournament`.
///
/// Fails with [`TournamentError::UnknownWinner`] if no open match contains the name;
/// the tournament is left untouched in that case.
pub fn declare_winner(
    tournament: &mut Tournament,
    winner: &str,
) -> Result<RoundOutcome, TournamentError> {
    let idx = tournament
        .current_round
        .iter()
        .position(|m| m.contains(winner))
        .ok_or_else(|| TournamentError::UnknownWinner(winner.to_string()))?;

    let resolved = tournament.current_round.remove(idx);
    let loser = resolved
        .opponent_of(winner)
        .unwrap_or_default()
        .to_string();
    match tournament.entity_mut(&loser) {
        Some(e) => e.knock_out(),
        None => log::warn!("Loser {:?} is not a known team", loser),
    }
    tournament.next_round.push(winner.to_string());

    let result = MatchResult {
        winner: winner.to_string(),
        loser,
    };

    if !tournament.current_round.is_empty() {
        return Ok(RoundOutcome::Pending {
            result,
            remaining: tournament.current_round.len(),
        });
    }

    let candidates = std::mem::take(&mut tournament.next_round);
    Ok(advance(tournament, candidates, Some(result)))
}

/// Run one pairing pass over `candidates`, or crown the champion if only one is left.
pub(crate) fn advance(
    tournament: &mut Tournament,
    candidates: Vec<String>,
    result: Option<MatchResult>,
) -> RoundOutcome {
    if let [champion] = candidates.as_slice() {
        let champion = champion.clone();
        crown(tournament, &champion);
        return RoundOutcome::Completed { result, champion };
    }

    let pairing = generate(&candidates);
    tournament.current_round = pairing.pairs.clone();
    tournament.next_round = pairing.byes.clone();
    tournament.rounds.push(pairing.pairs.clone());
    tournament.round_status = RoundStatus::Ongoing;

    RoundOutcome::RoundOpened {
        result,
        round: tournament.round_number(),
        matches: pairing.pairs,
        bye: pairing.byes.into_iter().next(),
    }
}

fn crown(tournament: &mut Tournament, champion: &str) {
    for e in &mut tournament.teams {
        e.status = if e.name == champion {
            EntityStatus::Champion
        } else {
            EntityStatus::Out
        };
    }
    tournament.champion = Some(champion.to_string());
    tournament.current_round.clear();
    tournament.next_round.clear();
    tournament.round_status = RoundStatus::Completed;
}
