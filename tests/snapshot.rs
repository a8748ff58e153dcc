//! Integration tests for the snapshot wire format.

use bracket_dashboard::models::entity_from_value;
use bracket_dashboard::{EntityStatus, Match, RoundStatus, Tournament};
use serde_json::json;

#[test]
fn snapshot_uses_camel_case_and_pair_arrays() {
    let mut t = Tournament::new("Tennis");
    t.current_round = vec![Match::new("A", "B")];
    t.next_round = vec!["C".to_string()];
    let value = serde_json::to_value(&t).unwrap();
    assert_eq!(value["gameName"], json!("Tennis"));
    assert_eq!(value["currentRound"], json!([["A", "B"]]));
    assert_eq!(value["nextRound"], json!(["C"]));
    assert_eq!(value["champion"], json!(null));
    assert_eq!(value["roundStatus"], json!("Ongoing"));
}

#[test]
fn backend_record_with_mixed_team_entries_loads() {
    let raw = json!({
        "_id": "66f0c0ffee",
        "gameName": "Cricket",
        "teams": [
            "  Lions ",
            { "name": "Tigers" },
            { "name": "Bears", "status": "Out" },
            42,
            { "status": "In" },
            null
        ],
        "currentRound": [],
        "nextRound": null,
        "champion": null,
        "__v": 0
    });
    let t: Tournament = serde_json::from_value(raw).unwrap();
    assert_eq!(t.game_name, "Cricket");
    let names: Vec<&str> = t.teams.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["Lions", "Tigers", "Bears"]);
    assert_eq!(t.teams[1].status, EntityStatus::In);
    assert_eq!(t.teams[2].status, EntityStatus::Out);
    assert!(t.next_round.is_empty());
    assert_eq!(t.round_status, RoundStatus::Ongoing);
    assert!(t.awaiting_first_round());
}

#[test]
fn missing_fields_default_to_pre_start() {
    let t: Tournament = serde_json::from_value(json!({})).unwrap();
    assert_eq!(t, Tournament::default());
}

#[test]
fn malformed_entries_are_reported_with_index() {
    let err = entity_from_value(3, json!(["not", "a", "team"])).unwrap_err();
    assert_eq!(err.index, 3);
    assert!(err.to_string().contains("index 3"));
    assert!(entity_from_value(0, json!({ "name": "  " })).is_err());
    assert!(entity_from_value(0, json!({ "name": "X", "status": 5 })).is_err());
}

#[test]
fn unknown_status_string_counts_as_in() {
    let e = entity_from_value(0, json!({ "name": "X", "status": "Benched" })).unwrap();
    assert_eq!(e.status, EntityStatus::In);
}

#[test]
fn completed_snapshot_round_trips() {
    let raw = json!({
        "gameName": "Chess",
        "teams": [{ "name": "A", "status": "Champion" }, { "name": "B", "status": "Out" }],
        "rounds": [[["A", "B"]]],
        "currentRound": [],
        "nextRound": [],
        "champion": "A",
        "roundStatus": "Completed"
    });
    let t: Tournament = serde_json::from_value(raw.clone()).unwrap();
    assert!(t.is_completed());
    assert_eq!(t.rounds, vec![vec![Match::new("A", "B")]]);
    assert_eq!(serde_json::to_value(&t).unwrap(), raw);
}
