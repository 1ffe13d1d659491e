//! Judge score sheet for judged (forms) categories

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;

use super::participant::AthleteId;
use crate::constants::judging::JUDGES_PER_ATHLETE;

/// One athlete's judge slots; absent or non-numeric entries are `None`
pub type JudgeScores = Vec<Option<f64>>;

/// Per-athlete judge scores, kept in first-occurrence order.
///
/// Serialized as a JSON object `{ "<athleteId>": [n1..n5] }`. Entry order is
/// preserved in both directions because ranking ties fall back to it.
/// Entries past the fifth judge are dropped on decode.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScoreSheet {
    rows: Vec<(AthleteId, JudgeScores)>,
}

impl ScoreSheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a sheet with an empty row for each athlete, in the given order
    pub fn with_athletes(athletes: impl IntoIterator<Item = AthleteId>) -> Self {
        let mut sheet = Self::new();
        for id in athletes {
            sheet.row_mut(id);
        }
        sheet
    }

    pub fn rows(&self) -> &[(AthleteId, JudgeScores)] {
        &self.rows
    }

    pub fn get(&self, athlete_id: AthleteId) -> Option<&JudgeScores> {
        self.rows
            .iter()
            .find(|(id, _)| *id == athlete_id)
            .map(|(_, scores)| scores)
    }

    pub fn athletes(&self) -> impl Iterator<Item = AthleteId> + '_ {
        self.rows.iter().map(|(id, _)| *id)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Row for `athlete_id`, appended at the end if the athlete is new
    pub(crate) fn row_mut(&mut self, athlete_id: AthleteId) -> &mut JudgeScores {
        let index = match self.rows.iter().position(|(id, _)| *id == athlete_id) {
            Some(index) => index,
            None => {
                self.rows.push((athlete_id, Vec::new()));
                self.rows.len() - 1
            }
        };
        &mut self.rows[index].1
    }
}

impl Serialize for ScoreSheet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.rows.len()))?;
        for (id, scores) in &self.rows {
            map.serialize_entry(&id.to_string(), scores)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ScoreSheet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(ScoreSheetVisitor)
    }
}

struct ScoreSheetVisitor;

impl<'de> Visitor<'de> for ScoreSheetVisitor {
    type Value = ScoreSheet;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map of athlete ids to judge score arrays")
    }

    fn visit_map<M: MapAccess<'de>>(self, mut access: M) -> Result<ScoreSheet, M::Error> {
        let mut sheet = ScoreSheet::new();
        while let Some((key, values)) = access.next_entry::<String, Vec<Value>>()? {
            let athlete_id = key
                .trim()
                .parse::<AthleteId>()
                .map_err(|_| serde::de::Error::custom(format!("invalid athlete id '{key}'")))?;
            *sheet.row_mut(athlete_id) = values
                .iter()
                .take(JUDGES_PER_ATHLETE)
                .map(numeric_value)
                .collect();
        }
        Ok(sheet)
    }
}

/// Lenient judge entry decoding: numbers and numeric strings are kept, anything else is absent
fn numeric_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|n| n.is_finite()),
        Value::String(s) => parse_judge_value(s),
        _ => None,
    }
}

/// Parses a judge entry as typed by an operator; accepts a decimal comma
pub fn parse_judge_value(raw: &str) -> Option<f64> {
    raw.trim()
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
}
