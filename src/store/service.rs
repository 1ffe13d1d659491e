//! Operations on category executions: each one loads the row, runs the pure
//! engine function, recomputes classification and status, and persists the
//! result in a single patch.

use rand::Rng;
use tracing::{info, instrument, warn};

use super::{CategoryCatalog, ExecutionStore, NewExecution, StartOutcome};
use crate::constants::judging::COMMISSION_SIZE;
use crate::engine;
use crate::error::AppError;
use crate::models::{
    AthleteId, Bracket, CategoryExecutionState, CategoryId, CompetitionFormat, CompetitionId,
    ExecutionId, ExecutionPatch, ExecutionStatus, ScoreSheet, validate_classification,
};
use crate::results::{CategoryOutcome, CompetitionResults};

/// Ties a store to the catalog it snapshots rosters from
pub struct ExecutionService<S, C> {
    store: S,
    catalog: C,
}

/// Checks an extracted letter: a single A-Z letter, stored uppercase
pub fn normalize_letter(letter: &str) -> Result<String, AppError> {
    let trimmed = letter.trim();
    let mut chars = trimmed.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_alphabetic() => Ok(c.to_ascii_uppercase().to_string()),
        (None, _) => Err(AppError::validation("Extracted letter is required")),
        _ => Err(AppError::validation(format!(
            "Extracted letter must be a single letter A-Z, got '{trimmed}'"
        ))),
    }
}

/// Draws the competition letter uniformly from A-Z
pub fn draw_letter(rng: &mut impl Rng) -> String {
    char::from(rng.random_range(b'A'..=b'Z')).to_string()
}

/// Elimination rows carry a bracket, judged rows a score sheet
fn format_of(state: &CategoryExecutionState) -> CompetitionFormat {
    if state.bracket.is_some() {
        CompetitionFormat::Elimination
    } else {
        CompetitionFormat::Judged
    }
}

impl<S: ExecutionStore, C: CategoryCatalog> ExecutionService<S, C> {
    pub fn new(store: S, catalog: C) -> Self {
        Self { store, catalog }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    /// Finds or creates the execution of a category at a competition.
    ///
    /// A second call for the same pair returns the existing id and leaves the
    /// roster snapshot alone. The first call snapshots the catalog roster and
    /// builds the bracket or score sheet the category format needs.
    ///
    /// # Errors
    /// * `AppError::Validation` - bad letter, or the category has no athletes
    /// * `AppError::CategoryNotFound` - the catalog does not know the category
    #[instrument(skip(self))]
    pub fn start(
        &self,
        category_id: CategoryId,
        competition_id: CompetitionId,
        letter: &str,
    ) -> Result<StartOutcome, AppError> {
        let letter = normalize_letter(letter)?;
        if let Some(existing) = self.store.find(category_id, competition_id)? {
            info!("Execution {} already started", existing.id);
            return Ok(StartOutcome {
                id: existing.id,
                created: false,
            });
        }

        let category = self.catalog.category(category_id)?;
        let roster = self.catalog.roster(category_id)?;
        if roster.is_empty() {
            return Err(AppError::validation(format!(
                "Category {} ({}) has no athletes",
                category_id, category.name
            )));
        }

        let (bracket, scores) = match category.format {
            CompetitionFormat::Elimination => (Some(engine::build_bracket(&roster)?), None),
            CompetitionFormat::Judged => (
                None,
                Some(ScoreSheet::with_athletes(roster.iter().map(|p| p.athlete_id))),
            ),
        };

        self.store.start(NewExecution {
            category_id,
            competition_id,
            extracted_letter: letter,
            participants: roster,
            scores,
            bracket,
        })
    }

    pub fn get(&self, id: ExecutionId) -> Result<CategoryExecutionState, AppError> {
        self.store.get(id)
    }

    /// Puts an athlete from the row's roster snapshot in a first-round slot,
    /// or empties the slot with `None`
    #[instrument(skip(self))]
    pub fn assign_player(
        &self,
        id: ExecutionId,
        match_id: &str,
        slot: usize,
        athlete_id: Option<AthleteId>,
    ) -> Result<CategoryExecutionState, AppError> {
        let state = self.store.get(id)?;
        let bracket = Self::bracket_of(&state)?;
        let participant = match athlete_id {
            Some(athlete_id) => Some(state.participant(athlete_id).cloned().ok_or_else(|| {
                AppError::validation(format!(
                    "Athlete {athlete_id} is not registered in execution {id}"
                ))
            })?),
            None => None,
        };
        let next = engine::assign_player(bracket, match_id, slot, participant)?;
        self.commit(&state, Some(next), None)
    }

    #[instrument(skip(self))]
    pub fn set_score(
        &self,
        id: ExecutionId,
        match_id: &str,
        athlete_id: AthleteId,
        value: f64,
    ) -> Result<CategoryExecutionState, AppError> {
        let state = self.store.get(id)?;
        let next = engine::set_score(Self::bracket_of(&state)?, match_id, athlete_id, value)?;
        self.commit(&state, Some(next), None)
    }

    #[instrument(skip(self))]
    pub fn set_winner(
        &self,
        id: ExecutionId,
        match_id: &str,
        athlete_id: AthleteId,
    ) -> Result<CategoryExecutionState, AppError> {
        let state = self.store.get(id)?;
        let next = engine::set_winner_manual(Self::bracket_of(&state)?, match_id, athlete_id)?;
        self.commit(&state, Some(next), None)
    }

    pub fn can_select_winner(&self, id: ExecutionId, match_id: &str) -> Result<bool, AppError> {
        let state = self.store.get(id)?;
        engine::can_select_winner(Self::bracket_of(&state)?, match_id)
    }

    /// Stores a judge's raw entry; non-numeric input clears the slot
    #[instrument(skip(self))]
    pub fn set_judge_score(
        &self,
        id: ExecutionId,
        athlete_id: AthleteId,
        judge_index: usize,
        raw: &str,
    ) -> Result<CategoryExecutionState, AppError> {
        let state = self.store.get(id)?;
        if state.bracket.is_some() {
            return Err(AppError::validation(format!(
                "Execution {id} is an elimination category and has no judge scores"
            )));
        }
        if state.participant(athlete_id).is_none() {
            return Err(AppError::validation(format!(
                "Athlete {athlete_id} is not registered in execution {id}"
            )));
        }
        let sheet = state.scores.clone().unwrap_or_default();
        let next = engine::set_judge_score(&sheet, athlete_id, judge_index, raw)?;
        self.commit(&state, None, Some(next))
    }

    /// Replaces the judging commission, at most ten names
    pub fn set_commission(
        &self,
        id: ExecutionId,
        names: Vec<String>,
    ) -> Result<CategoryExecutionState, AppError> {
        if names.len() > COMMISSION_SIZE {
            return Err(AppError::validation(format!(
                "Commission has at most {COMMISSION_SIZE} members, got {}",
                names.len()
            )));
        }
        let state = self.store.get(id)?;
        let status = match state.status {
            ExecutionStatus::Draft => ExecutionStatus::InProgress,
            other => other,
        };
        self.store.patch(
            id,
            ExecutionPatch {
                commission: Some(names),
                status: Some(status),
                ..Default::default()
            },
        )
    }

    /// Stores a caller-built patch without deriving anything; only the shape
    /// of a supplied classification is checked
    pub fn patch(
        &self,
        id: ExecutionId,
        patch: ExecutionPatch,
    ) -> Result<CategoryExecutionState, AppError> {
        if let Some(classification) = &patch.classification {
            validate_classification(classification)?;
        }
        self.store.patch(id, patch)
    }

    /// Medal table, club ranking and bucket leaders of a competition
    #[instrument(skip(self))]
    pub fn results(&self, competition_id: CompetitionId) -> Result<CompetitionResults, AppError> {
        let executions = self.store.list_by_competition(competition_id)?;
        let mut outcomes = Vec::with_capacity(executions.len());
        for execution in &executions {
            let category = match self.catalog.category(execution.category_id) {
                Ok(category) => Some(category),
                Err(e) if e.is_not_found() => {
                    warn!(
                        "Category {} of execution {} missing from catalog",
                        execution.category_id, execution.id
                    );
                    None
                }
                Err(e) => return Err(e),
            };
            outcomes.push(CategoryOutcome::from_execution(execution, category.as_ref()));
        }
        info!(
            "Aggregating results of competition {} over {} categories",
            competition_id,
            outcomes.len()
        );
        Ok(CompetitionResults::build(&outcomes))
    }

    fn bracket_of(state: &CategoryExecutionState) -> Result<&Bracket, AppError> {
        state.bracket.as_ref().ok_or_else(|| {
            AppError::validation(format!(
                "Execution {} is a judged category and has no bracket",
                state.id
            ))
        })
    }

    /// Persists new engine output with the classification and status it implies
    fn commit(
        &self,
        state: &CategoryExecutionState,
        bracket: Option<Bracket>,
        scores: Option<ScoreSheet>,
    ) -> Result<CategoryExecutionState, AppError> {
        let format = format_of(state);
        let current_bracket = bracket.as_ref().or(state.bracket.as_ref());
        let current_scores = scores.as_ref().or(state.scores.as_ref());

        let classification = engine::compute_podium(format, current_bracket, current_scores);
        let status = if engine::is_complete(format, current_bracket, current_scores) {
            ExecutionStatus::Completed
        } else {
            ExecutionStatus::InProgress
        };
        if status != state.status {
            info!(
                "Execution {} status {} -> {}",
                state.id,
                state.status.as_str(),
                status.as_str()
            );
        }

        self.store.patch(
            state.id,
            ExecutionPatch {
                scores,
                bracket,
                classification: Some(classification),
                status: Some(status),
                ..Default::default()
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CategoryInfo, Gender, Participant};
    use crate::store::{JsonCatalog, SqliteExecutionStore};

    fn roster(ids: std::ops::RangeInclusive<u64>) -> Vec<Participant> {
        ids.map(|id| {
            let club = if id % 2 == 0 { "Tigre" } else { "Drago" };
            Participant::new(id, format!("Nome{id}"), format!("Cognome{id}"), club)
        })
        .collect()
    }

    fn service() -> ExecutionService<SqliteExecutionStore, JsonCatalog> {
        let catalog = JsonCatalog::from_categories(vec![
            CategoryInfo {
                id: 1,
                name: "Combattimento Juniores".to_string(),
                format: CompetitionFormat::Elimination,
                gender: Gender::Male,
                athletes: roster(1..=4),
            },
            CategoryInfo {
                id: 2,
                name: "Quyen Cadetti CN".to_string(),
                format: CompetitionFormat::Judged,
                gender: Gender::Female,
                athletes: roster(11..=13),
            },
            CategoryInfo {
                id: 3,
                name: "Vuota".to_string(),
                format: CompetitionFormat::Judged,
                gender: Gender::Mixed,
                athletes: Vec::new(),
            },
        ]);
        ExecutionService::new(SqliteExecutionStore::open_in_memory().unwrap(), catalog)
    }

    #[test]
    fn test_normalize_letter() {
        assert_eq!(normalize_letter(" k ").unwrap(), "K");
        assert!(normalize_letter("").is_err());
        assert!(normalize_letter("AB").is_err());
        assert!(normalize_letter("7").is_err());
    }

    #[test]
    fn test_draw_letter_is_a_valid_letter() {
        use rand::SeedableRng;
        let mut rng = rand::rngs::SmallRng::seed_from_u64(7);
        for _ in 0..100 {
            let letter = draw_letter(&mut rng);
            assert_eq!(normalize_letter(&letter).unwrap(), letter);
        }
    }

    #[test]
    fn test_start_is_idempotent() {
        let service = service();
        let first = service.start(1, 100, "c").unwrap();
        let second = service.start(1, 100, "D").unwrap();
        assert!(first.created);
        assert!(!second.created);
        assert_eq!(first.id, second.id);

        let state = service.get(first.id).unwrap();
        assert_eq!(state.extracted_letter, "C");
        assert_eq!(state.status, ExecutionStatus::Draft);
        assert_eq!(state.participants.len(), 4);
        assert!(state.bracket.is_some());
        assert!(state.scores.is_none());
    }

    #[test]
    fn test_start_judged_seeds_score_sheet() {
        let service = service();
        let outcome = service.start(2, 100, "A").unwrap();
        let state = service.get(outcome.id).unwrap();
        let sheet = state.scores.unwrap();
        assert_eq!(sheet.athletes().collect::<Vec<_>>(), vec![11, 12, 13]);
        assert!(state.bracket.is_none());
    }

    #[test]
    fn test_start_rejects_empty_roster_and_unknown_category() {
        let service = service();
        assert!(matches!(service.start(3, 100, "A"), Err(AppError::Validation(_))));
        assert!(matches!(
            service.start(9, 100, "A"),
            Err(AppError::CategoryNotFound { category_id: 9 })
        ));
    }

    #[test]
    fn test_elimination_flow_reaches_completed() {
        let service = service();
        let id = service.start(1, 100, "A").unwrap().id;

        let state = service.set_score(id, "r0m0", 1, 8.0).unwrap();
        assert_eq!(state.status, ExecutionStatus::InProgress);
        service.set_score(id, "r0m0", 2, 5.0).unwrap();
        service.set_winner(id, "r0m1", 4).unwrap();
        assert!(service.can_select_winner(id, "r1m0").unwrap());

        let state = service.set_winner(id, "r1m0", 1).unwrap();
        assert_eq!(state.status, ExecutionStatus::Completed);
        let podium: Vec<_> = state
            .classification
            .iter()
            .map(|e| (e.position, e.athlete_id))
            .collect();
        assert_eq!(podium, vec![(1, 1), (2, 4), (3, 2), (3, 3)]);

        // an athlete already seated elsewhere cannot fill a second slot
        assert!(matches!(
            service.assign_player(id, "r0m0", 1, Some(3)),
            Err(AppError::Validation(_))
        ));

        // correcting a first-round slot reopens the category
        let state = service.assign_player(id, "r0m0", 1, None).unwrap();
        assert_eq!(state.status, ExecutionStatus::InProgress);
        assert!(state.classification.is_empty());
    }

    #[test]
    fn test_undecided_semifinal_does_not_complete() {
        let service = service();
        let id = service.start(1, 100, "A").unwrap().id;
        service.set_winner(id, "r0m0", 1).unwrap();

        assert!(!service.can_select_winner(id, "r1m0").unwrap());
        assert!(matches!(
            service.set_score(id, "r1m0", 1, 5.0),
            Err(AppError::Validation(_))
        ));
        let state = service.get(id).unwrap();
        assert_eq!(state.status, ExecutionStatus::InProgress);
        assert!(state.classification.is_empty());
    }

    #[test]
    fn test_assign_player_outside_snapshot_is_rejected() {
        let service = service();
        let id = service.start(1, 100, "A").unwrap().id;
        assert!(matches!(
            service.assign_player(id, "r0m0", 0, Some(99)),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            service.set_winner(id, "r0m0", 4),
            Err(AppError::InvalidWinner { .. })
        ));
        assert!(matches!(
            service.set_score(id, "r7m0", 1, 1.0),
            Err(AppError::MatchNotFound { .. })
        ));
    }

    #[test]
    fn test_judged_flow_reaches_completed() {
        let service = service();
        let id = service.start(2, 100, "A").unwrap().id;
        let values = [(11, "8,5"), (12, "9.1"), (13, "7")];
        for (athlete, raw) in values {
            for judge in 0..5 {
                service.set_judge_score(id, athlete, judge, raw).unwrap();
            }
        }
        let state = service.get(id).unwrap();
        assert_eq!(state.status, ExecutionStatus::Completed);
        let podium: Vec<_> = state
            .classification
            .iter()
            .map(|e| (e.position, e.athlete_id))
            .collect();
        assert_eq!(podium, vec![(1, 12), (2, 11), (3, 13)]);

        assert!(matches!(
            service.set_judge_score(id, 11, 5, "9"),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            service.set_score(id, "r0m0", 11, 1.0),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_set_commission_limit() {
        let service = service();
        let id = service.start(2, 100, "A").unwrap().id;
        let names: Vec<String> = (1..=10).map(|i| format!("Giudice {i}")).collect();
        let state = service.set_commission(id, names).unwrap();
        assert_eq!(state.commission.as_ref().map(Vec::len), Some(10));
        assert_eq!(state.status, ExecutionStatus::InProgress);

        let too_many: Vec<String> = (1..=11).map(|i| format!("Giudice {i}")).collect();
        assert!(matches!(
            service.set_commission(id, too_many),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_raw_patch_sets_status_and_checks_classification() {
        use crate::models::ClassificationEntry;

        let service = service();
        let id = service.start(2, 100, "A").unwrap().id;
        let state = service
            .patch(
                id,
                ExecutionPatch {
                    status: Some(ExecutionStatus::Completed),
                    classification: Some(vec![ClassificationEntry::new(1, 12)]),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(state.status, ExecutionStatus::Completed);

        let two_winners = ExecutionPatch {
            classification: Some(vec![
                ClassificationEntry::new(1, 11),
                ClassificationEntry::new(1, 12),
            ]),
            ..Default::default()
        };
        assert!(matches!(service.patch(id, two_winners), Err(AppError::Validation(_))));
        assert!(matches!(
            service.patch(999, ExecutionPatch::default()),
            Err(AppError::ExecutionNotFound { execution_id: 999 })
        ));
    }

    #[test]
    fn test_results_over_competition() {
        let service = service();
        let id = service.start(1, 100, "A").unwrap().id;
        service.set_winner(id, "r0m0", 1).unwrap();
        service.set_winner(id, "r0m1", 3).unwrap();
        service.set_winner(id, "r1m0", 3).unwrap();
        // other competition is not counted
        service.start(2, 200, "B").unwrap();

        let results = service.results(100).unwrap();
        assert_eq!(results.athletes.len(), 4);
        assert_eq!(results.athletes[0].athlete_id, 3);
        assert_eq!(results.athletes[0].points, 7);
        let drago = &results.clubs.entries[0];
        assert_eq!(drago.club, "Drago");
        assert_eq!((drago.gold, drago.silver), (1, 1));
    }
}
