//! Cross-category standings: athlete medal totals, club ranking and best
//! athlete per bucket.

use serde::Serialize;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, warn};

use super::buckets::{Bucket, bucket_by_age_and_level};
use crate::constants::points;
use crate::models::{
    AthleteId, CategoryExecutionState, CategoryInfo, ClassificationEntry, Gender, Participant,
};

/// What the aggregator needs from one category execution
#[derive(Debug, Clone)]
pub struct CategoryOutcome {
    pub category_name: String,
    pub gender: Gender,
    pub participants: Vec<Participant>,
    pub classification: Vec<ClassificationEntry>,
}

impl CategoryOutcome {
    /// Pairs an execution with its catalog entry; without one the category
    /// gets an empty name (open bucket) and mixed gender
    pub fn from_execution(
        execution: &CategoryExecutionState,
        category: Option<&CategoryInfo>,
    ) -> Self {
        Self {
            category_name: category.map(|c| c.name.clone()).unwrap_or_default(),
            gender: category.map(|c| c.gender).unwrap_or(Gender::Mixed),
            participants: execution.participants.clone(),
            classification: execution.classification.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AthleteTotals {
    pub athlete_id: AthleteId,
    pub first_name: String,
    pub last_name: String,
    pub club: String,
    pub gender: Gender,
    pub bucket: Bucket,
    pub gold: u32,
    pub silver: u32,
    pub bronze: u32,
    pub points: u32,
}

impl AthleteTotals {
    fn add(&mut self, position: u8) {
        match position {
            1 => self.gold += 1,
            2 => self.silver += 1,
            3 => self.bronze += 1,
            _ => return,
        }
        self.points = medal_points(self.gold, self.silver, self.bronze);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClubTotals {
    pub club: String,
    pub gold: u32,
    pub silver: u32,
    pub bronze: u32,
    pub points: u32,
}

/// Clubs sorted by gold, then silver, then bronze (all descending)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClubRanking {
    pub entries: Vec<ClubTotals>,
}

impl ClubRanking {
    /// The first three clubs
    pub fn podium(&self) -> &[ClubTotals] {
        &self.entries[..self.entries.len().min(3)]
    }
}

/// Top scorer(s) of one (bucket, gender) group; ties are all listed
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BucketLeaders {
    pub bucket: Bucket,
    pub gender: Gender,
    pub points: u32,
    pub athletes: Vec<AthleteTotals>,
}

/// Everything the results screens print for a competition
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompetitionResults {
    pub athletes: Vec<AthleteTotals>,
    pub clubs: ClubRanking,
    pub best_per_bucket: Vec<BucketLeaders>,
}

impl CompetitionResults {
    pub fn build(outcomes: &[CategoryOutcome]) -> Self {
        let athletes = build_athlete_totals(outcomes);
        let clubs = build_club_ranking(&athletes);
        let best_per_bucket = best_per_bucket(&athletes);
        Self {
            athletes,
            clubs,
            best_per_bucket,
        }
    }
}

/// `7 * gold + 4 * silver + 2 * bronze`
pub fn medal_points(gold: u32, silver: u32, bronze: u32) -> u32 {
    points::GOLD * gold + points::SILVER * silver + points::BRONZE * bronze
}

/// Accumulates every classification entry into per-athlete medal counts.
///
/// Athletes are resolved from each category's participant snapshot. The
/// bucket and gender come from the first category the athlete placed in.
/// Result is sorted by points, then gold, silver, bronze, then name.
pub fn build_athlete_totals(outcomes: &[CategoryOutcome]) -> Vec<AthleteTotals> {
    let mut totals: Vec<AthleteTotals> = Vec::new();
    let mut index: HashMap<AthleteId, usize> = HashMap::new();

    for outcome in outcomes {
        let bucket = bucket_by_age_and_level(&outcome.category_name);
        for entry in &outcome.classification {
            let slot = *index.entry(entry.athlete_id).or_insert_with(|| {
                let participant = outcome
                    .participants
                    .iter()
                    .find(|p| p.athlete_id == entry.athlete_id);
                if participant.is_none() {
                    warn!(
                        "Athlete {} placed in '{}' but is not in its roster snapshot",
                        entry.athlete_id, outcome.category_name
                    );
                }
                totals.push(AthleteTotals {
                    athlete_id: entry.athlete_id,
                    first_name: participant.map(|p| p.first_name.clone()).unwrap_or_default(),
                    last_name: participant.map(|p| p.last_name.clone()).unwrap_or_default(),
                    club: participant.map(|p| p.club.clone()).unwrap_or_default(),
                    gender: outcome.gender,
                    bucket: bucket.clone(),
                    gold: 0,
                    silver: 0,
                    bronze: 0,
                    points: 0,
                });
                totals.len() - 1
            });
            totals[slot].add(entry.position);
        }
    }

    totals.sort_by(compare_athletes);
    debug!("Built totals for {} athletes", totals.len());
    totals
}

fn compare_athletes(a: &AthleteTotals, b: &AthleteTotals) -> Ordering {
    b.points
        .cmp(&a.points)
        .then(b.gold.cmp(&a.gold))
        .then(b.silver.cmp(&a.silver))
        .then(b.bronze.cmp(&a.bronze))
        .then_with(|| a.last_name.cmp(&b.last_name))
        .then_with(|| a.first_name.cmp(&b.first_name))
        .then(a.athlete_id.cmp(&b.athlete_id))
}

/// Best athlete(s) by points within each (bucket, gender) group
pub fn best_per_bucket(totals: &[AthleteTotals]) -> Vec<BucketLeaders> {
    let mut groups: BTreeMap<(Bucket, Gender), Vec<&AthleteTotals>> = BTreeMap::new();
    for athlete in totals {
        groups
            .entry((athlete.bucket.clone(), athlete.gender))
            .or_default()
            .push(athlete);
    }

    groups
        .into_iter()
        .filter_map(|((bucket, gender), members)| {
            let best = members.iter().map(|a| a.points).max()?;
            Some(BucketLeaders {
                bucket,
                gender,
                points: best,
                athletes: members
                    .into_iter()
                    .filter(|a| a.points == best)
                    .cloned()
                    .collect(),
            })
        })
        .collect()
}

/// Sums athletes' medals per club; athletes without a club are left out
pub fn build_club_ranking(totals: &[AthleteTotals]) -> ClubRanking {
    let mut clubs: BTreeMap<&str, ClubTotals> = BTreeMap::new();
    for athlete in totals.iter().filter(|a| !a.club.trim().is_empty()) {
        let club = clubs.entry(athlete.club.as_str()).or_insert_with(|| ClubTotals {
            club: athlete.club.clone(),
            gold: 0,
            silver: 0,
            bronze: 0,
            points: 0,
        });
        club.gold += athlete.gold;
        club.silver += athlete.silver;
        club.bronze += athlete.bronze;
        club.points += athlete.points;
    }

    // BTreeMap order makes equal medal tables fall back to club name
    let mut entries: Vec<ClubTotals> = clubs.into_values().collect();
    entries.sort_by(|a, b| {
        b.gold
            .cmp(&a.gold)
            .then(b.silver.cmp(&a.silver))
            .then(b.bronze.cmp(&a.bronze))
    });
    ClubRanking { entries }
}
