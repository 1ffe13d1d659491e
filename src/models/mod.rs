pub mod bracket;
pub mod category;
pub mod classification;
pub mod execution;
pub mod participant;
pub mod score_sheet;

// Re-export all public types so callers can import from `models` directly
pub use bracket::{Bracket, Match, MatchId, Round, match_id};
pub use category::{CategoryId, CategoryInfo, CompetitionFormat, CompetitionId, Gender};
pub use classification::{ClassificationEntry, validate_classification};
pub use execution::{CategoryExecutionState, ExecutionId, ExecutionPatch, ExecutionStatus};
pub use participant::{AthleteId, Participant};
pub use score_sheet::{JudgeScores, ScoreSheet, parse_judge_value};
