use serde::{Deserialize, Serialize};

use super::bracket::Bracket;
use super::category::{CategoryId, CompetitionId};
use super::classification::ClassificationEntry;
use super::participant::Participant;
use super::score_sheet::ScoreSheet;

pub type ExecutionId = u64;

/// Informational lifecycle of a category execution. Transitions are not guarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExecutionStatus {
    #[serde(rename = "nuovo")]
    Draft,
    #[serde(rename = "in_progress")]
    InProgress,
    #[serde(rename = "completato")]
    Completed,
}

impl ExecutionStatus {
    /// Wire value as persisted in the `stato` column
    pub fn as_str(&self) -> &'static str {
        match self {
            ExecutionStatus::Draft => "nuovo",
            ExecutionStatus::InProgress => "in_progress",
            ExecutionStatus::Completed => "completato",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "nuovo" | "draft" => Some(ExecutionStatus::Draft),
            "in_progress" => Some(ExecutionStatus::InProgress),
            "completato" | "completed" => Some(ExecutionStatus::Completed),
            _ => None,
        }
    }
}

/// Persisted record of one category being run at one competition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryExecutionState {
    pub id: ExecutionId,
    #[serde(rename = "categoriaId")]
    pub category_id: CategoryId,
    #[serde(rename = "competizioneId")]
    pub competition_id: CompetitionId,
    #[serde(rename = "letteraEstratta")]
    pub extracted_letter: String,
    /// Roster snapshot taken by `start`
    #[serde(rename = "atleti", default)]
    pub participants: Vec<Participant>,
    #[serde(rename = "punteggi", default, skip_serializing_if = "Option::is_none")]
    pub scores: Option<ScoreSheet>,
    #[serde(rename = "commissione", default, skip_serializing_if = "Option::is_none")]
    pub commission: Option<Vec<String>>,
    #[serde(rename = "classifica", default)]
    pub classification: Vec<ClassificationEntry>,
    #[serde(rename = "tabellone", default, skip_serializing_if = "Option::is_none")]
    pub bracket: Option<Bracket>,
    #[serde(rename = "stato")]
    pub status: ExecutionStatus,
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(rename = "updatedAt", default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl CategoryExecutionState {
    pub fn participant(&self, athlete_id: u64) -> Option<&Participant> {
        self.participants.iter().find(|p| p.athlete_id == athlete_id)
    }

    /// Applies a patch in place; fields absent from the patch are left untouched
    pub fn apply(&mut self, patch: ExecutionPatch) {
        if let Some(scores) = patch.scores {
            self.scores = Some(scores);
        }
        if let Some(commission) = patch.commission {
            self.commission = Some(commission);
        }
        if let Some(classification) = patch.classification {
            self.classification = classification;
        }
        if let Some(bracket) = patch.bracket {
            self.bracket = Some(bracket);
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
    }
}

/// Shallow update of an execution. Each present field replaces the stored one whole.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ExecutionPatch {
    #[serde(rename = "punteggi", default, skip_serializing_if = "Option::is_none")]
    pub scores: Option<ScoreSheet>,
    #[serde(rename = "commissione", default, skip_serializing_if = "Option::is_none")]
    pub commission: Option<Vec<String>>,
    #[serde(rename = "classifica", default, skip_serializing_if = "Option::is_none")]
    pub classification: Option<Vec<ClassificationEntry>>,
    #[serde(rename = "tabellone", default, skip_serializing_if = "Option::is_none")]
    pub bracket: Option<Bracket>,
    #[serde(rename = "stato", default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ExecutionStatus>,
}

impl ExecutionPatch {
    pub fn is_empty(&self) -> bool {
        self.scores.is_none()
            && self.commission.is_none()
            && self.classification.is_none()
            && self.bracket.is_none()
            && self.status.is_none()
    }
}
