//! Builds an elimination bracket from a seeded roster

use std::collections::HashSet;
use tracing::debug;

use crate::error::AppError;
use crate::models::{Bracket, Match, Participant, Round, match_id};

/// Builds a bracket by sequential pairing.
///
/// Round 0 pairs the roster two at a time in the given order, an odd athlete
/// out gets a bye (`None` opponent). Every later round pairs the previous
/// round's matches two at a time the same way, until a round holds a single
/// match: the final. Match counts shrink by `ceil(n / 2)` per round, which is
/// not the power-of-two layout of a seeded bracket.
///
/// A single athlete yields one degenerate bye match and no real contest.
///
/// # Errors
/// * `AppError::Validation` - empty roster or the same athlete listed twice
///
/// # Examples
///
/// ```rust
/// use tabellone::engine::build_bracket;
/// use tabellone::models::Participant;
///
/// let roster: Vec<_> = (1..=5)
///     .map(|id| Participant::new(id, "Name", "Surname", "Club"))
///     .collect();
/// let bracket = build_bracket(&roster).unwrap();
/// assert_eq!(bracket.round_count(), 3);
/// assert_eq!(bracket.rounds[0].matches.len(), 3);
/// ```
pub fn build_bracket(participants: &[Participant]) -> Result<Bracket, AppError> {
    if participants.is_empty() {
        return Err(AppError::validation(
            "Cannot build a bracket from an empty roster",
        ));
    }
    let mut seen = HashSet::new();
    if let Some(dup) = participants.iter().find(|p| !seen.insert(p.athlete_id)) {
        return Err(AppError::validation(format!(
            "Athlete {} is listed twice in the roster",
            dup.athlete_id
        )));
    }

    let first_round = Round {
        matches: participants
            .chunks(2)
            .enumerate()
            .map(|(i, pair)| {
                Match::seeded(match_id(0, i), Some(pair[0].clone()), pair.get(1).cloned())
            })
            .collect(),
    };

    let mut rounds = vec![first_round];
    while let Some(previous) = rounds.last().filter(|r| r.matches.len() > 1) {
        let round_index = rounds.len();
        let ids: Vec<_> = previous.matches.iter().map(|m| m.id.clone()).collect();
        let next = Round {
            matches: ids
                .chunks(2)
                .enumerate()
                .map(|(i, pair)| {
                    Match::fed_by(
                        match_id(round_index, i),
                        Some(pair[0].clone()),
                        pair.get(1).cloned(),
                    )
                })
                .collect(),
        };
        rounds.push(next);
    }

    debug!(
        "Built bracket: participants={}, rounds={}, first_round_matches={}",
        participants.len(),
        rounds.len(),
        rounds[0].matches.len()
    );

    Ok(Bracket { rounds })
}

/// Number of rounds `build_bracket` produces for `participants` athletes
pub fn expected_round_count(participants: usize) -> usize {
    if participants == 0 {
        return 0;
    }
    let mut matches = participants.div_ceil(2);
    let mut rounds = 1;
    while matches > 1 {
        matches = matches.div_ceil(2);
        rounds += 1;
    }
    rounds
}
