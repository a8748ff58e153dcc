//! Integration tests for round resolution: winners, byes, champion.

use bracket_dashboard::{
    EntityStatus, Match, MatchResult, RoundOutcome, RoundStatus, Tournament, TournamentError,
    TournamentStore,
};

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

fn started(list: &[&str]) -> TournamentStore {
    let mut store = TournamentStore::new();
    store.start("Chess", &names(list)).unwrap();
    store
}

/// Every entity is In, Out or Champion; exactly one Champion iff Completed.
fn assert_status_invariant(t: &Tournament) {
    let champions = t.count_with_status(EntityStatus::Champion);
    if t.round_status == RoundStatus::Completed {
        assert_eq!(champions, 1);
        assert_eq!(t.count_with_status(EntityStatus::Out), t.teams.len() - 1);
    } else {
        assert_eq!(champions, 0);
    }
}

#[test]
fn start_opens_round_one() {
    let mut store = TournamentStore::new();
    let outcome = store.start("Chess", &names(&["A", "B", "C", "D"])).unwrap();
    assert_eq!(
        outcome,
        RoundOutcome::RoundOpened {
            result: None,
            round: 1,
            matches: vec![Match::new("A", "B"), Match::new("C", "D")],
            bye: None,
        }
    );
    let t = store.tournament();
    assert_eq!(t.rounds.len(), 1);
    assert_eq!(t.current_round.len(), 2);
    assert!(t.next_round.is_empty());
    assert!(t.teams.iter().all(|e| e.is_in()));
}

#[test]
fn start_rejects_empty_and_duplicate_lists() {
    let mut store = TournamentStore::new();
    assert_eq!(store.start("Chess", &names(&[" ", ""])), Err(TournamentError::NoEntities));
    assert_eq!(
        store.start("Chess", &names(&["Red", "red"])),
        Err(TournamentError::DuplicateEntity("red".to_string()))
    );
    assert!(store.tournament().teams.is_empty());
}

#[test]
fn single_entity_is_champion_without_matches() {
    let mut store = TournamentStore::new();
    let outcome = store.start("Chess", &names(&["Solo"])).unwrap();
    assert_eq!(
        outcome,
        RoundOutcome::Completed {
            result: None,
            champion: "Solo".to_string()
        }
    );
    let t = store.tournament();
    assert_eq!(t.champion.as_deref(), Some("Solo"));
    assert!(t.rounds.is_empty());
    assert!(t.current_round.is_empty());
    assert_status_invariant(t);
}

#[test]
fn partial_round_keeps_round_open() {
    let mut store = started(&["A", "B", "C", "D"]);
    let outcome = store.declare_winner("B").unwrap();
    assert_eq!(
        outcome,
        RoundOutcome::Pending {
            result: MatchResult {
                winner: "B".to_string(),
                loser: "A".to_string()
            },
            remaining: 1
        }
    );
    let t = store.tournament();
    assert_eq!(t.current_round, vec![Match::new("C", "D")]);
    assert_eq!(t.next_round, vec!["B".to_string()]);
    assert_eq!(t.entity("A").unwrap().status, EntityStatus::Out);
    assert_eq!(t.round_status, RoundStatus::Ongoing);
    assert_status_invariant(t);
}

#[test]
fn unknown_winner_leaves_snapshot_unchanged() {
    let mut store = started(&["A", "B", "C", "D"]);
    store.declare_winner("A").unwrap();
    let before = serde_json::to_vec(store.tournament()).unwrap();

    for bogus in ["Z", "A", "B", ""] {
        assert_eq!(
            store.declare_winner(bogus),
            Err(TournamentError::UnknownWinner(bogus.to_string()))
        );
    }
    assert_eq!(serde_json::to_vec(store.tournament()).unwrap(), before);
}

#[test]
fn three_entities_with_bye() {
    let mut store = started(&["A", "B", "C"]);
    let t = store.tournament();
    assert_eq!(t.current_round, vec![Match::new("A", "B")]);
    assert_eq!(t.next_round, vec!["C".to_string()]);

    let outcome = store.declare_winner("A").unwrap();
    assert_eq!(
        outcome,
        RoundOutcome::RoundOpened {
            result: Some(MatchResult {
                winner: "A".to_string(),
                loser: "B".to_string()
            }),
            round: 2,
            matches: vec![Match::new("C", "A")],
            bye: None,
        }
    );

    let outcome = store.declare_winner("C").unwrap();
    assert!(matches!(outcome, RoundOutcome::Completed { ref champion, .. } if champion == "C"));
    let t = store.tournament();
    assert_eq!(t.champion.as_deref(), Some("C"));
    assert_eq!(t.round_status, RoundStatus::Completed);
    assert!(t.current_round.is_empty());
    assert!(t.next_round.is_empty());
    assert_status_invariant(t);
}

#[test]
fn bye_produces_a_notice() {
    let mut store = TournamentStore::new();
    let outcome = store.start("Chess", &names(&["A", "B", "C", "D", "E"])).unwrap();
    assert_eq!(
        outcome.notice().as_deref(),
        Some("E advances automatically to the next round")
    );
}

#[test]
fn eight_entities_finish_in_three_rounds() {
    let list = ["A", "B", "C", "D", "E", "F", "G", "H"];
    let mut store = started(&list);
    loop {
        let t = store.tournament();
        assert_status_invariant(t);
        if t.is_completed() {
            break;
        }
        let first = t.current_round[0].0.clone();
        store.declare_winner(&first).unwrap();
    }
    let t = store.tournament();
    assert_eq!(t.rounds.len(), 3);
    assert_eq!(t.champion.as_deref(), Some("A"));
    assert_eq!(t.entity("A").unwrap().status, EntityStatus::Champion);
    assert_eq!(t.count_with_status(EntityStatus::Out), 7);
}

#[test]
fn odd_bracket_carries_bye_forward() {
    // 5 -> (A,B)(C,D) bye E -> [E, A, C] -> (E,A) bye C -> [C, E] -> (C,E)
    let mut store = started(&["A", "B", "C", "D", "E"]);
    store.declare_winner("A").unwrap();
    store.declare_winner("C").unwrap();
    let t = store.tournament();
    assert_eq!(t.current_round, vec![Match::new("E", "A")]);
    assert_eq!(t.next_round, vec!["C".to_string()]);

    store.declare_winner("E").unwrap();
    assert_eq!(store.tournament().current_round, vec![Match::new("C", "E")]);

    store.declare_winner("E").unwrap();
    let t = store.tournament();
    assert_eq!(t.champion.as_deref(), Some("E"));
    assert_eq!(t.rounds.len(), 3);
    assert_status_invariant(t);
}

#[test]
fn completed_tournament_rejects_further_winners() {
    let mut store = started(&["A", "B"]);
    store.declare_winner("B").unwrap();
    assert!(store.tournament().is_completed());
    assert_eq!(
        store.declare_winner("A"),
        Err(TournamentError::UnknownWinner("A".to_string()))
    );
}

#[test]
fn closed_rounds_are_never_rewritten() {
    let mut store = started(&["A", "B", "C", "D"]);
    let round_one = store.tournament().rounds[0].clone();
    store.declare_winner("A").unwrap();
    store.declare_winner("D").unwrap();
    let t = store.tournament();
    assert_eq!(t.rounds[0], round_one);
    assert_eq!(t.rounds[1], vec![Match::new("A", "D")]);
}
