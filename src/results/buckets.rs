//! Display buckets derived from category names

use serde::Serialize;
use std::fmt;

use crate::constants::buckets::{AGE_BANDS, LEVEL_TOKENS, OPEN_BUCKET};

/// Age band plus optional belt sub-tier, e.g. "Cadetti CN"
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Bucket {
    pub age_band: String,
    pub level: Option<String>,
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.level {
            Some(level) => write!(f, "{} {}", self.age_band, level),
            None => write!(f, "{}", self.age_band),
        }
    }
}

/// Derives the display bucket of a category from the tokens of its name.
///
/// The first age-band keyword found wins; a standalone `CN`/`CB` token adds
/// the sub-tier. Names without an age keyword fall in the open bucket.
/// Presentational only, never used for points.
pub fn bucket_by_age_and_level(category_name: &str) -> Bucket {
    let tokens: Vec<&str> = category_name
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .collect();

    let age_band = tokens
        .iter()
        .find_map(|token| {
            let lower = token.to_lowercase();
            AGE_BANDS
                .iter()
                .find(|(keywords, _)| keywords.contains(&lower.as_str()))
                .map(|(_, label)| *label)
        })
        .unwrap_or(OPEN_BUCKET);

    let level = tokens.iter().find_map(|token| {
        LEVEL_TOKENS
            .iter()
            .find(|level| token.eq_ignore_ascii_case(level))
            .map(|level| level.to_string())
    });

    Bucket {
        age_band: age_band.to_string(),
        level,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_age_band_and_level() {
        let bucket = bucket_by_age_and_level("Quyen Cadetti CN maschile");
        assert_eq!(bucket.age_band, "Cadetti");
        assert_eq!(bucket.level.as_deref(), Some("CN"));
        assert_eq!(bucket.to_string(), "Cadetti CN");
    }

    #[test]
    fn test_keyword_variants_and_case() {
        assert_eq!(bucket_by_age_and_level("COMBATTIMENTO JUNIOR -60kg").age_band, "Juniores");
        assert_eq!(bucket_by_age_and_level("quyen senior cb").to_string(), "Seniores CB");
        assert_eq!(bucket_by_age_and_level("Bambini (8-9 anni)").to_string(), "Bambini");
    }

    #[test]
    fn test_level_must_be_a_whole_token() {
        // "CNR" and "cbx" are not sub-tier tokens
        let bucket = bucket_by_age_and_level("Ragazzi CNR cbx");
        assert_eq!(bucket.level, None);
    }

    #[test]
    fn test_open_bucket_without_age_keyword() {
        let bucket = bucket_by_age_and_level("Song Luyen CN");
        assert_eq!(bucket.age_band, OPEN_BUCKET);
        assert_eq!(bucket.to_string(), format!("{OPEN_BUCKET} CN"));
    }
}
