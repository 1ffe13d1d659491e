use tabellone::{
    engine::{
        assign_player, build_bracket, can_select_winner, compute_podium, expected_round_count,
        is_complete, set_score, set_winner_manual,
    },
    error::AppError,
    models::{AthleteId, Bracket, CompetitionFormat},
    testing_utils::TestDataBuilder,
};

fn winner_of(bracket: &Bracket, id: &str) -> Option<AthleteId> {
    bracket.match_by_id(id)?.winner.as_ref().map(|w| w.athlete_id)
}

fn occupant(bracket: &Bracket, id: &str, slot: usize) -> Option<AthleteId> {
    bracket.match_by_id(id)?.players[slot]
        .as_ref()
        .map(|p| p.athlete_id)
}

/// Round sizes follow ceil(n/2) from the roster down to a single final
#[test]
fn test_bracket_shape_for_many_roster_sizes() {
    for n in 1..=33 {
        let bracket = build_bracket(&TestDataBuilder::create_roster(1, n)).unwrap();
        assert_eq!(bracket.round_count(), expected_round_count(n), "{n} athletes");
        assert!(TestDataBuilder::validate_bracket(&bracket).is_ok(), "{n} athletes");
        assert_eq!(bracket.rounds[0].matches.len(), n.div_ceil(2));
        assert_eq!(bracket.seeded_participants().len(), n);
    }
}

#[test]
fn test_empty_and_duplicate_rosters_are_rejected() {
    assert!(matches!(build_bracket(&[]), Err(AppError::Validation(_))));
    let mut roster = TestDataBuilder::create_roster(1, 3);
    roster.push(roster[0].clone());
    assert!(matches!(build_bracket(&roster), Err(AppError::Validation(_))));
}

/// Scores decide every match of a six-athlete bracket, byes included
#[test]
fn test_six_athletes_scored_to_completion() {
    let roster = TestDataBuilder::create_roster(1, 6);
    let mut b = build_bracket(&roster).unwrap();
    assert_eq!(
        b.rounds.iter().map(|r| r.matches.len()).collect::<Vec<_>>(),
        vec![3, 2, 1]
    );

    let first_round = [
        ("r0m0", 1, 9.0, 2, 7.0),
        ("r0m1", 3, 6.0, 4, 8.0),
        ("r0m2", 5, 5.5, 6, 5.0),
    ];
    for (m, a, sa, c, sc) in first_round {
        b = set_score(&b, m, a, sa).unwrap();
        b = set_score(&b, m, c, sc).unwrap();
    }
    assert_eq!(occupant(&b, "r1m0", 0), Some(1));
    assert_eq!(occupant(&b, "r1m0", 1), Some(4));
    assert_eq!(occupant(&b, "r1m1", 0), Some(5));
    assert_eq!(occupant(&b, "r1m1", 1), None);

    // r1m1 is a carry bye, resolved only once a score is entered
    assert_eq!(winner_of(&b, "r1m1"), None);
    assert!(!can_select_winner(&b, "r2m0").unwrap());
    b = set_score(&b, "r1m1", 5, 0.0).unwrap();
    assert_eq!(winner_of(&b, "r1m1"), Some(5));

    b = set_score(&b, "r1m0", 1, 3.0).unwrap();
    b = set_score(&b, "r1m0", 4, 4.0).unwrap();
    assert!(can_select_winner(&b, "r2m0").unwrap());
    b = set_winner_manual(&b, "r2m0", 5).unwrap();

    assert!(is_complete(CompetitionFormat::Elimination, Some(&b), None));
    let podium: Vec<_> = compute_podium(CompetitionFormat::Elimination, Some(&b), None)
        .iter()
        .map(|e| (e.position, e.athlete_id))
        .collect();
    // only r1m0 produced a semifinal loser; athlete 2 is first unplaced in seeding order
    assert_eq!(podium, vec![(1, 5), (2, 4), (3, 1), (3, 2)]);
}

/// Fixing a first-round slot wipes every result that depended on it
#[test]
fn test_reassignment_cascades_to_the_final() {
    let roster = TestDataBuilder::create_roster(1, 8);
    let played = TestDataBuilder::create_completed_bracket(&roster).unwrap();
    assert_eq!(winner_of(&played, "r2m0"), Some(1));

    let late_entry = TestDataBuilder::create_participant(9, "Fenice");
    let fixed = assign_player(&played, "r0m0", 0, Some(late_entry)).unwrap();
    assert_eq!(occupant(&fixed, "r0m0", 0), Some(9));
    assert_eq!(winner_of(&fixed, "r0m0"), None);
    assert_eq!(occupant(&fixed, "r1m0", 0), None);
    assert_eq!(winner_of(&fixed, "r1m0"), None);
    assert_eq!(occupant(&fixed, "r2m0", 0), None);
    assert_eq!(winner_of(&fixed, "r2m0"), None);

    // the other half of the bracket is untouched
    assert_eq!(winner_of(&fixed, "r1m1"), Some(5));
    assert_eq!(occupant(&fixed, "r2m0", 1), Some(5));

    // the input value still holds the old results
    assert_eq!(winner_of(&played, "r2m0"), Some(1));
}

/// A semifinal with one side still undecided is not a bye
#[test]
fn test_scoring_waits_for_both_semifinalists() {
    let b = build_bracket(&TestDataBuilder::create_roster(1, 4)).unwrap();
    let b = set_winner_manual(&b, "r0m0", 1).unwrap();
    assert_eq!(occupant(&b, "r1m0", 0), Some(1));
    assert!(!can_select_winner(&b, "r1m0").unwrap());

    assert!(matches!(
        set_score(&b, "r1m0", 1, 5.0),
        Err(AppError::Validation(_))
    ));
    assert!(!is_complete(CompetitionFormat::Elimination, Some(&b), None));
    assert!(compute_podium(CompetitionFormat::Elimination, Some(&b), None).is_empty());
}

/// An athlete can hold only one first-round seat
#[test]
fn test_assigning_a_seated_athlete_twice_is_rejected() {
    let roster = TestDataBuilder::create_roster(1, 4);
    let b = build_bracket(&roster).unwrap();
    assert!(matches!(
        assign_player(&b, "r0m1", 0, Some(roster[0].clone())),
        Err(AppError::Validation(_))
    ));

    let b = assign_player(&b, "r0m0", 0, Some(roster[0].clone())).unwrap();
    assert_eq!(occupant(&b, "r0m0", 0), Some(1));
    assert_eq!(b.seeded_participants().len(), 4);
}

#[test]
fn test_manual_winner_errors() {
    let b = build_bracket(&TestDataBuilder::create_roster(1, 4)).unwrap();
    assert!(matches!(
        set_winner_manual(&b, "r0m0", 3),
        Err(AppError::InvalidWinner { athlete_id: 3, .. })
    ));
    assert!(matches!(
        set_winner_manual(&b, "r9m9", 1),
        Err(AppError::MatchNotFound { .. })
    ));
    assert!(matches!(
        set_score(&b, "r0m0", 1, f64::NAN),
        Err(AppError::Validation(_))
    ));
}

#[test]
fn test_bracket_json_shape() {
    let b = build_bracket(&TestDataBuilder::create_roster(1, 3)).unwrap();
    let json = serde_json::to_value(&b).unwrap();
    let first = &json["rounds"][0]["matches"][0];
    assert_eq!(first["id"], "r0m0");
    assert_eq!(first["players"][0]["athleteId"], 1);
    assert!(json["rounds"][0]["matches"][1]["players"][1].is_null());
    assert_eq!(json["rounds"][1]["matches"][0]["from"][0], "r0m0");

    let back: Bracket = serde_json::from_value(json).unwrap();
    assert_eq!(back, b);
}
