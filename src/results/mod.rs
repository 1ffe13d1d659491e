//! Competition-wide results built from category classifications.

pub mod aggregator;
pub mod buckets;

pub use aggregator::{
    AthleteTotals, BucketLeaders, CategoryOutcome, ClubRanking, ClubTotals, CompetitionResults,
    best_per_bucket, build_athlete_totals, build_club_ranking, medal_points,
};
pub use buckets::{Bucket, bucket_by_age_and_level};
