use tabellone::{
    engine::{compute_podium, is_complete, set_judge_score, set_judge_value},
    error::AppError,
    models::{CompetitionFormat, ScoreSheet, validate_classification},
    testing_utils::TestDataBuilder,
};

/// Judge entries typed with a decimal comma count like dotted ones
#[test]
fn test_operator_input_is_parsed_leniently() {
    let mut sheet = ScoreSheet::with_athletes([1]);
    for (judge, raw) in ["8,5", "9.0", " 7,5 ", "abc", ""].iter().enumerate() {
        sheet = set_judge_score(&sheet, 1, judge, raw).unwrap();
    }
    let row = sheet.get(1).unwrap();
    assert_eq!(row, &vec![Some(8.5), Some(9.0), Some(7.5), None, None]);
    assert_eq!(sheet.average(1), Some(25.0 / 3.0));

    // garbage over a numeric entry clears it
    sheet = set_judge_score(&sheet, 1, 0, "n/a").unwrap();
    assert_eq!(sheet.get(1).unwrap()[0], None);
    assert_eq!(sheet.average(1), Some(8.25));
}

#[test]
fn test_judge_index_out_of_range() {
    let sheet = ScoreSheet::with_athletes([1]);
    assert!(matches!(
        set_judge_score(&sheet, 1, 5, "9"),
        Err(AppError::Validation(_))
    ));
}

/// Ties keep roster order and share the rank; positions stay unique
#[test]
fn test_tied_averages_keep_roster_order() {
    let sheet = TestDataBuilder::create_score_sheet(&[(10, 8.0), (11, 9.0), (12, 9.0), (13, 7.0)])
        .unwrap();
    let ranked = sheet.rank();
    let order: Vec<_> = ranked.iter().map(|r| (r.athlete_id, r.rank)).collect();
    assert_eq!(order, vec![(11, 1), (12, 1), (10, 3), (13, 4)]);

    let podium = compute_podium(CompetitionFormat::Judged, None, Some(&sheet));
    let positions: Vec<_> = podium.iter().map(|e| (e.position, e.athlete_id)).collect();
    assert_eq!(positions, vec![(1, 11), (2, 12), (3, 10)]);
    assert!(validate_classification(&podium).is_ok());
}

#[test]
fn test_completion_needs_every_athlete_scored() {
    let mut sheet = ScoreSheet::with_athletes([1, 2, 3]);
    sheet = set_judge_value(&sheet, 1, 0, Some(8.0)).unwrap();
    sheet = set_judge_value(&sheet, 2, 4, Some(6.5)).unwrap();
    assert!(!is_complete(CompetitionFormat::Judged, None, Some(&sheet)));
    assert_eq!(sheet.rank().len(), 2);

    sheet = set_judge_value(&sheet, 3, 2, Some(7.0)).unwrap();
    assert!(is_complete(CompetitionFormat::Judged, None, Some(&sheet)));
}

/// The sheet is stored as an object keyed by athlete id, order preserved
#[test]
fn test_score_sheet_json_keeps_order() {
    let sheet = TestDataBuilder::create_score_sheet(&[(30, 8.0), (4, 9.0), (17, 7.5)]).unwrap();
    let json = serde_json::to_string(&sheet).unwrap();
    assert!(json.starts_with("{\"30\":"), "{json}");

    let back: ScoreSheet = serde_json::from_str(&json).unwrap();
    assert_eq!(back.athletes().collect::<Vec<_>>(), vec![30, 4, 17]);

    let lenient: ScoreSheet =
        serde_json::from_str(r#"{"5": [8, "x", null, "9,5", 6.5]}"#).unwrap();
    assert_eq!(lenient.get(5).unwrap()[1], None);
    assert_eq!(lenient.average(5), Some(8.0));
}
