use crate::engine::{build_bracket, set_judge_value, set_winner_manual};
use crate::error::AppError;
use crate::models::{
    AthleteId, Bracket, CategoryId, CategoryInfo, CompetitionFormat, Gender, Participant,
    ScoreSheet,
};
use crate::store::JsonCatalog;

const CLUBS: [&str; 4] = ["Drago Rosso", "Tigre Bianca", "Fenice", "Loto d'Oro"];

/// Test utilities for creating mock data and testing scenarios
pub struct TestDataBuilder;

impl TestDataBuilder {
    /// Creates a participant with generated names
    pub fn create_participant(athlete_id: AthleteId, club: &str) -> Participant {
        Participant::new(
            athlete_id,
            format!("Nome{athlete_id}"),
            format!("Cognome{athlete_id}"),
            club,
        )
    }

    /// Creates `count` participants with ids starting at `first_id`, clubs in rotation
    pub fn create_roster(first_id: AthleteId, count: usize) -> Vec<Participant> {
        (0..count)
            .map(|i| {
                Self::create_participant(first_id + i as AthleteId, CLUBS[i % CLUBS.len()])
            })
            .collect()
    }

    pub fn create_category(
        id: CategoryId,
        name: &str,
        format: CompetitionFormat,
        gender: Gender,
        athletes: Vec<Participant>,
    ) -> CategoryInfo {
        CategoryInfo {
            id,
            name: name.to_string(),
            format,
            gender,
            athletes,
        }
    }

    /// A small competition: two elimination and two judged categories
    pub fn create_tournament_catalog() -> JsonCatalog {
        JsonCatalog::from_categories(vec![
            Self::create_category(
                1,
                "Combattimento Juniores -60kg",
                CompetitionFormat::Elimination,
                Gender::Male,
                Self::create_roster(100, 8),
            ),
            Self::create_category(
                2,
                "Combattimento Cadetti CN",
                CompetitionFormat::Elimination,
                Gender::Female,
                Self::create_roster(200, 5),
            ),
            Self::create_category(
                3,
                "Quyen Cadetti CN",
                CompetitionFormat::Judged,
                Gender::Female,
                Self::create_roster(200, 4),
            ),
            Self::create_category(
                4,
                "Quyen Seniores",
                CompetitionFormat::Judged,
                Gender::Mixed,
                Self::create_roster(300, 3),
            ),
        ])
    }

    /// Builds a bracket and plays it out, the first occupant winning every match
    pub fn create_completed_bracket(participants: &[Participant]) -> Result<Bracket, AppError> {
        Self::play_out(&build_bracket(participants)?)
    }

    /// Resolves every open match round by round, the first occupant winning
    pub fn play_out(bracket: &Bracket) -> Result<Bracket, AppError> {
        let mut current = bracket.clone();
        for round in 0..current.round_count() {
            let ids: Vec<String> = current.rounds[round]
                .matches
                .iter()
                .filter(|m| m.winner.is_none())
                .map(|m| m.id.clone())
                .collect();
            for id in ids {
                let first = current
                    .match_by_id(&id)
                    .and_then(|m| m.players.iter().flatten().next())
                    .map(|p| p.athlete_id);
                if let Some(athlete_id) = first {
                    current = set_winner_manual(&current, &id, athlete_id)?;
                }
            }
        }
        Ok(current)
    }

    /// Score sheet with the same value from all five judges per athlete
    pub fn create_score_sheet(entries: &[(AthleteId, f64)]) -> Result<ScoreSheet, AppError> {
        let mut sheet = ScoreSheet::with_athletes(entries.iter().map(|(id, _)| *id));
        for (athlete_id, value) in entries {
            for judge in 0..5 {
                sheet = set_judge_value(&sheet, *athlete_id, judge, Some(*value))?;
            }
        }
        Ok(sheet)
    }

    /// Checks the structural properties every bracket must keep
    pub fn validate_bracket(bracket: &Bracket) -> Result<(), String> {
        let Some(last) = bracket.rounds.last() else {
            return Err("Bracket has no rounds".to_string());
        };
        if last.matches.len() != 1 {
            return Err(format!(
                "Last round must hold only the final, found {} matches",
                last.matches.len()
            ));
        }

        for pair in bracket.rounds.windows(2) {
            let expected = pair[0].matches.len().div_ceil(2);
            if pair[1].matches.len() != expected {
                return Err(format!(
                    "Round of {} matches must be followed by {} matches, found {}",
                    pair[0].matches.len(),
                    expected,
                    pair[1].matches.len()
                ));
            }
        }

        for round in &bracket.rounds {
            for m in &round.matches {
                if let Some(winner) = &m.winner
                    && m.slot_of(winner.athlete_id).is_none()
                {
                    return Err(format!(
                        "Winner {} of {} does not occupy the match",
                        winner.athlete_id, m.id
                    ));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::CategoryCatalog;

    #[test]
    fn test_create_roster_rotates_clubs() {
        let roster = TestDataBuilder::create_roster(10, 5);
        assert_eq!(roster.len(), 5);
        assert_eq!(roster[0].athlete_id, 10);
        assert_eq!(roster[4].athlete_id, 14);
        assert_eq!(roster[0].club, roster[4].club);
    }

    #[test]
    fn test_tournament_catalog() {
        let catalog = TestDataBuilder::create_tournament_catalog();
        assert_eq!(catalog.len(), 4);
        assert_eq!(catalog.roster(2).unwrap().len(), 5);
        assert_eq!(catalog.category(3).unwrap().format, CompetitionFormat::Judged);
    }

    #[test]
    fn test_completed_bracket_has_champion() {
        for n in 1..=12 {
            let bracket =
                TestDataBuilder::create_completed_bracket(&TestDataBuilder::create_roster(1, n))
                    .unwrap();
            assert!(TestDataBuilder::validate_bracket(&bracket).is_ok());
            assert_eq!(
                bracket.final_match().and_then(|m| m.winner.as_ref()).map(|w| w.athlete_id),
                Some(1),
                "first seed wins with {n} athletes"
            );
        }
    }

    #[test]
    fn test_validate_bracket_rejects_empty() {
        assert!(TestDataBuilder::validate_bracket(&Bracket::default()).is_err());
    }

    #[test]
    fn test_create_score_sheet() {
        let sheet = TestDataBuilder::create_score_sheet(&[(1, 8.0), (2, 9.5)]).unwrap();
        assert_eq!(sheet.average(2), Some(9.5));
        assert!(sheet.all_scored());
    }
}
