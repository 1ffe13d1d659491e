use serde::{Deserialize, Serialize};

pub type AthleteId = u64;

/// Snapshot of a registered athlete taken when a category execution starts.
///
/// Later roster edits never touch a snapshot, so a running bracket or score
/// sheet always shows the athletes it was started with.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub athlete_id: AthleteId,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub club: String,
}

impl Participant {
    pub fn new(
        athlete_id: AthleteId,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        club: impl Into<String>,
    ) -> Self {
        Self {
            athlete_id,
            first_name: first_name.into(),
            last_name: last_name.into(),
            club: club.into(),
        }
    }

    /// "Lastname Firstname", the order used on score sheets and printed results
    pub fn display_name(&self) -> String {
        format!("{} {}", self.last_name, self.first_name)
            .trim()
            .to_string()
    }
}
