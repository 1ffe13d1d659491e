//! Judge score entry and average ranking for judged (forms) categories

use serde::Serialize;
use tracing::debug;

use crate::constants::judging::JUDGES_PER_ATHLETE;
use crate::error::AppError;
use crate::models::{AthleteId, ScoreSheet, parse_judge_value};

/// An athlete's place in the average ranking
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RankedAthlete {
    pub athlete_id: AthleteId,
    pub average: f64,
    /// 1-based competition rank; athletes with equal averages share it
    pub rank: usize,
}

/// Stores a judge's entry as typed by the operator.
///
/// Non-numeric input is dropped: the slot ends up empty rather than failing.
///
/// # Errors
/// * `AppError::Validation` - judge index outside `0..5`
pub fn set_judge_score(
    sheet: &ScoreSheet,
    athlete_id: AthleteId,
    judge_index: usize,
    raw: &str,
) -> Result<ScoreSheet, AppError> {
    set_judge_value(sheet, athlete_id, judge_index, parse_judge_value(raw))
}

/// Stores a judge's numeric entry, or clears the slot with `None`
pub fn set_judge_value(
    sheet: &ScoreSheet,
    athlete_id: AthleteId,
    judge_index: usize,
    value: Option<f64>,
) -> Result<ScoreSheet, AppError> {
    if judge_index >= JUDGES_PER_ATHLETE {
        return Err(AppError::validation(format!(
            "Judge index must be between 0 and {}, got {judge_index}",
            JUDGES_PER_ATHLETE - 1
        )));
    }
    let value = value.filter(|v| v.is_finite());

    let mut next = sheet.clone();
    let row = next.row_mut(athlete_id);
    if row.len() < JUDGES_PER_ATHLETE {
        row.resize(JUDGES_PER_ATHLETE, None);
    }
    row[judge_index] = value;

    debug!(
        "Judge {} score for athlete {}: {:?}",
        judge_index, athlete_id, value
    );
    Ok(next)
}

impl ScoreSheet {
    /// Mean of the athlete's numeric judge entries; `None` when there are none
    pub fn average(&self, athlete_id: AthleteId) -> Option<f64> {
        let values: Vec<f64> = self
            .get(athlete_id)?
            .iter()
            .flatten()
            .copied()
            .filter(|v| v.is_finite())
            .collect();
        if values.is_empty() {
            return None;
        }
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }

    /// Athletes with an average, best first.
    ///
    /// Equal averages keep sheet order and share a rank; no further
    /// tie-break is applied. Athletes without any numeric entry are left out.
    pub fn rank(&self) -> Vec<RankedAthlete> {
        let mut scored: Vec<(AthleteId, f64)> = self
            .athletes()
            .filter_map(|id| self.average(id).map(|avg| (id, avg)))
            .collect();
        // sort_by is stable, so ties stay in first-occurrence order
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));

        let mut ranked: Vec<RankedAthlete> = Vec::with_capacity(scored.len());
        for (i, (athlete_id, average)) in scored.into_iter().enumerate() {
            let rank = match ranked.last() {
                Some(prev) if prev.average == average => prev.rank,
                _ => i + 1,
            };
            ranked.push(RankedAthlete {
                athlete_id,
                average,
                rank,
            });
        }
        ranked
    }

    /// True when every athlete on the sheet has at least one numeric entry
    pub fn all_scored(&self) -> bool {
        !self.is_empty() && self.athletes().all(|id| self.average(id).is_some())
    }
}
