use serde::{Deserialize, Serialize};

use super::participant::Participant;

pub type CategoryId = u64;
pub type CompetitionId = u64;

/// How a category is decided
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompetitionFormat {
    /// Two-person matches in a single-elimination bracket
    Elimination,
    /// Forms ("quyen") scored by up to five judges, ranked by average
    Judged,
}

impl CompetitionFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompetitionFormat::Elimination => "elimination",
            CompetitionFormat::Judged => "judged",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "M", alias = "m")]
    Male,
    #[serde(rename = "F", alias = "f")]
    Female,
    #[serde(rename = "mixed", alias = "X")]
    Mixed,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "M",
            Gender::Female => "F",
            Gender::Mixed => "mixed",
        }
    }
}

/// Category configuration as provided by the catalog collaborator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryInfo {
    pub id: CategoryId,
    pub name: String,
    pub format: CompetitionFormat,
    #[serde(default = "default_gender")]
    pub gender: Gender,
    /// Current registration roster in seeding order
    #[serde(default)]
    pub athletes: Vec<Participant>,
}

fn default_gender() -> Gender {
    Gender::Mixed
}
