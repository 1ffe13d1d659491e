use serde::{Deserialize, Serialize};

use super::participant::AthleteId;
use crate::error::AppError;

/// One podium placement of a category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClassificationEntry {
    #[serde(rename = "pos")]
    pub position: u8,
    #[serde(rename = "atletaId")]
    pub athlete_id: AthleteId,
}

impl ClassificationEntry {
    pub fn new(position: u8, athlete_id: AthleteId) -> Self {
        Self {
            position,
            athlete_id,
        }
    }
}

/// Checks the podium shape of a non-empty classification.
///
/// Exactly one 1st place, at most one 2nd place, at most two 3rd places
/// (ties are only possible in 3rd), no other positions and no athlete twice.
pub fn validate_classification(entries: &[ClassificationEntry]) -> Result<(), AppError> {
    if entries.is_empty() {
        return Ok(());
    }
    let count = |pos: u8| entries.iter().filter(|e| e.position == pos).count();

    if let Some(bad) = entries.iter().find(|e| !(1..=3).contains(&e.position)) {
        return Err(AppError::validation(format!(
            "Invalid podium position {} for athlete {}",
            bad.position, bad.athlete_id
        )));
    }
    if count(1) != 1 {
        return Err(AppError::validation(format!(
            "Classification must have exactly one 1st place, found {}",
            count(1)
        )));
    }
    if count(2) > 1 {
        return Err(AppError::validation("Classification has more than one 2nd place"));
    }
    if count(3) > 2 {
        return Err(AppError::validation("Classification has more than two 3rd places"));
    }
    for (i, entry) in entries.iter().enumerate() {
        if entries[..i].iter().any(|e| e.athlete_id == entry.athlete_id) {
            return Err(AppError::validation(format!(
                "Athlete {} appears twice in the classification",
                entry.athlete_id
            )));
        }
    }
    Ok(())
}
