//! Integration tests for resuming persisted snapshots and the auto-start guard.

use bracket_dashboard::{
    Entity, EntityStatus, Match, RoundOutcome, RoundStatus, Tournament, TournamentStore,
};

fn fresh_snapshot(list: &[&str]) -> Tournament {
    let teams = list.iter().map(|n| Entity::new(*n)).collect();
    Tournament::with_entities("Valorant", teams)
}

#[test]
fn resume_without_round_auto_starts_once() {
    let snapshot = fresh_snapshot(&["A", "B", "C", "D"]);
    let mut store = TournamentStore::new();

    let first = store.resume(snapshot.clone());
    assert!(matches!(first, Some(RoundOutcome::RoundOpened { round: 1, .. })));
    assert!(store.has_auto_started());

    // Duplicate trigger (re-fetch / remount) with the same stale snapshot.
    assert_eq!(store.resume(snapshot), None);
    let t = store.tournament();
    assert_eq!(t.rounds.len(), 1);
    assert_eq!(
        t.current_round,
        vec![Match::new("A", "B"), Match::new("C", "D")]
    );
}

#[test]
fn resume_keeps_progress_after_guard_fired() {
    let snapshot = fresh_snapshot(&["A", "B", "C", "D"]);
    let mut store = TournamentStore::new();
    store.resume(snapshot.clone());
    store.declare_winner("A").unwrap();

    assert_eq!(store.resume(snapshot), None);
    assert_eq!(store.tournament().next_round, vec!["A".to_string()]);
}

#[test]
fn resume_in_progress_snapshot_is_adopted_verbatim() {
    let mut store = TournamentStore::new();
    store.resume(fresh_snapshot(&["A", "B", "C", "D"]));
    store.declare_winner("C").unwrap();
    let saved = store.tournament().clone();

    let mut other = TournamentStore::new();
    assert_eq!(other.resume(saved.clone()), None);
    assert!(!other.has_auto_started());
    assert_eq!(other.tournament(), &saved);
    other.declare_winner("A").unwrap();
    assert_eq!(other.tournament().current_round, vec![Match::new("C", "A")]);
}

#[test]
fn resume_completed_snapshot_does_not_restart() {
    let mut snapshot = fresh_snapshot(&["A", "B"]);
    snapshot.champion = Some("A".to_string());
    snapshot.round_status = RoundStatus::Completed;
    let mut store = TournamentStore::new();
    assert_eq!(store.resume(snapshot), None);
    assert!(store.tournament().rounds.is_empty());
}

#[test]
fn resume_empty_snapshot_does_nothing() {
    let mut store = TournamentStore::new();
    assert_eq!(store.resume(Tournament::new("Empty")), None);
    assert!(!store.has_auto_started());
    assert_eq!(store.tournament().game_name, "Empty");
}

#[test]
fn resume_keeps_loaded_statuses() {
    let mut snapshot = fresh_snapshot(&["A", "B"]);
    snapshot.teams[1].status = EntityStatus::Out;
    let mut store = TournamentStore::new();
    store.resume(snapshot);
    assert_eq!(store.tournament().teams[1].status, EntityStatus::Out);
    assert_eq!(store.tournament().current_round, vec![Match::new("A", "B")]);
}

#[test]
fn reset_returns_to_pre_start_and_rearms_guard() {
    let snapshot = fresh_snapshot(&["A", "B", "C"]);
    let mut store = TournamentStore::new();
    store.resume(snapshot.clone());
    store.reset();

    let t = store.tournament();
    assert!(t.teams.is_empty());
    assert!(t.rounds.is_empty());
    assert!(t.current_round.is_empty());
    assert!(t.next_round.is_empty());
    assert_eq!(t.champion, None);
    assert_eq!(t.round_status, RoundStatus::Ongoing);
    assert!(!store.has_auto_started());

    assert!(store.resume(snapshot).is_some());
}
