//! Elimination bracket data model

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::participant::{AthleteId, Participant};

pub type MatchId = String;

/// Builds the identifier of the `index`-th match of `round`, e.g. `r1m0`
pub fn match_id(round: usize, index: usize) -> MatchId {
    format!("r{round}m{index}")
}

/// A two-slot match. Round-0 slots are seeded from the roster; slots in later
/// rounds are only ever filled by winner propagation from the `from` matches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    pub players: [Option<Participant>; 2],
    #[serde(default)]
    pub scores: BTreeMap<AthleteId, f64>,
    #[serde(default)]
    pub winner: Option<Participant>,
    /// Predecessor matches feeding slot 0 and slot 1; empty for round 0
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub from: Vec<Option<MatchId>>,
}

impl Match {
    pub fn seeded(id: MatchId, first: Option<Participant>, second: Option<Participant>) -> Self {
        Self {
            id,
            players: [first, second],
            scores: BTreeMap::new(),
            winner: None,
            from: Vec::new(),
        }
    }

    pub fn fed_by(id: MatchId, first: Option<MatchId>, second: Option<MatchId>) -> Self {
        Self {
            id,
            players: [None, None],
            scores: BTreeMap::new(),
            winner: None,
            from: vec![first, second],
        }
    }

    /// Number of occupied player slots
    pub fn occupant_count(&self) -> usize {
        self.players.iter().filter(|p| p.is_some()).count()
    }

    /// A match with exactly one occupant
    pub fn is_bye(&self) -> bool {
        self.occupant_count() == 1
    }

    pub fn slot_of(&self, athlete_id: AthleteId) -> Option<usize> {
        self.players
            .iter()
            .position(|p| p.as_ref().is_some_and(|p| p.athlete_id == athlete_id))
    }

    pub fn participant(&self, athlete_id: AthleteId) -> Option<&Participant> {
        self.players
            .iter()
            .flatten()
            .find(|p| p.athlete_id == athlete_id)
    }

    /// The occupant that is not the winner, if the match was actually contested
    pub fn loser(&self) -> Option<&Participant> {
        let winner = self.winner.as_ref()?;
        self.players
            .iter()
            .flatten()
            .find(|p| p.athlete_id != winner.athlete_id)
    }

    /// Slot (0 or 1) this match's winner fills when `predecessor` feeds it
    pub fn feeding_slot(&self, predecessor: &str) -> Option<usize> {
        self.from
            .iter()
            .position(|f| f.as_deref() == Some(predecessor))
    }

    pub(crate) fn reset_result(&mut self) {
        self.scores.clear();
        self.winner = None;
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Round {
    pub matches: Vec<Match>,
}

/// Ordered list of rounds, round 0 first; the last round holds only the final
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Bracket {
    pub rounds: Vec<Round>,
}

impl Bracket {
    pub fn round_count(&self) -> usize {
        self.rounds.len()
    }

    pub fn final_match(&self) -> Option<&Match> {
        self.rounds.last().and_then(|r| r.matches.first())
    }

    /// Returns `(round, index)` of a match id
    pub fn locate(&self, id: &str) -> Option<(usize, usize)> {
        self.rounds.iter().enumerate().find_map(|(r, round)| {
            round
                .matches
                .iter()
                .position(|m| m.id == id)
                .map(|i| (r, i))
        })
    }

    pub fn match_by_id(&self, id: &str) -> Option<&Match> {
        let (r, i) = self.locate(id)?;
        Some(&self.rounds[r].matches[i])
    }

    pub(crate) fn match_at_mut(&mut self, round: usize, index: usize) -> &mut Match {
        &mut self.rounds[round].matches[index]
    }

    /// The match in `round + 1` fed by the match `id`, with the slot it feeds
    pub fn successor_of(&self, round: usize, id: &str) -> Option<(usize, usize)> {
        let next = self.rounds.get(round + 1)?;
        next.matches
            .iter()
            .enumerate()
            .find_map(|(i, m)| m.feeding_slot(id).map(|slot| (i, slot)))
    }

    /// All round-0 occupants in seeding order
    pub fn seeded_participants(&self) -> Vec<&Participant> {
        self.rounds
            .first()
            .map(|r| {
                r.matches
                    .iter()
                    .flat_map(|m| m.players.iter().flatten())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Human readable round name counted back from the final
    pub fn round_label(&self, round: usize) -> String {
        let from_final = self.rounds.len().saturating_sub(round + 1);
        match from_final {
            0 => "Finale".to_string(),
            1 => "Semifinale".to_string(),
            2 => "Quarti".to_string(),
            _ => format!("Turno {}", round + 1),
        }
    }
}
