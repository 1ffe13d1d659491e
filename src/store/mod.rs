//! Persistence of category executions and the collaborators they read from.

pub mod catalog;
pub mod service;
pub mod sqlite;

pub use catalog::{CategoryCatalog, JsonCatalog};
pub use service::{ExecutionService, draw_letter, normalize_letter};
pub use sqlite::SqliteExecutionStore;

use crate::error::AppError;
use crate::models::{
    Bracket, CategoryExecutionState, CategoryId, CompetitionId, ExecutionId, ExecutionPatch,
    Participant, ScoreSheet,
};

/// Row to create on the first `start` of a (category, competition) pair
#[derive(Debug, Clone)]
pub struct NewExecution {
    pub category_id: CategoryId,
    pub competition_id: CompetitionId,
    /// Letter proposed by this caller; the competition keeps the first one stored
    pub extracted_letter: String,
    pub participants: Vec<Participant>,
    pub scores: Option<ScoreSheet>,
    pub bracket: Option<Bracket>,
}

/// Result of a find-or-create
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartOutcome {
    pub id: ExecutionId,
    pub created: bool,
}

/// Storage of category execution rows.
///
/// Implementations must make `start` atomic against concurrent first callers
/// so a pair never gets two rows or two roster snapshots.
pub trait ExecutionStore {
    /// Finds the row for `(category_id, competition_id)` or creates it from `new`
    fn start(&self, new: NewExecution) -> Result<StartOutcome, AppError>;

    fn get(&self, id: ExecutionId) -> Result<CategoryExecutionState, AppError>;

    fn find(
        &self,
        category_id: CategoryId,
        competition_id: CompetitionId,
    ) -> Result<Option<CategoryExecutionState>, AppError>;

    /// Shallow-merges the patch; either fully applies or fully fails
    fn patch(
        &self,
        id: ExecutionId,
        patch: ExecutionPatch,
    ) -> Result<CategoryExecutionState, AppError>;

    fn list_by_competition(
        &self,
        competition_id: CompetitionId,
    ) -> Result<Vec<CategoryExecutionState>, AppError>;

    /// The competition-wide extracted letter, once any category has started
    fn competition_letter(&self, competition_id: CompetitionId)
    -> Result<Option<String>, AppError>;
}
