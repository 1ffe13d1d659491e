//! Match progression: player assignment, score entry, manual winners and
//! winner propagation through an elimination bracket.
//!
//! Every operation takes the current bracket by reference and returns a new
//! bracket value, leaving the input untouched. Callers persist the returned
//! value whole.

use tracing::{debug, info};

use crate::error::AppError;
use crate::models::{AthleteId, Bracket, Participant};

/// Puts `participant` (or nobody) in `slot` of a round-0 match.
///
/// The match loses its scores and winner, and every match downstream that
/// derives from it loses the player slot it fed, its winner and its scores,
/// so no stale result survives a roster correction.
///
/// # Errors
/// * `AppError::MatchNotFound` - unknown match id
/// * `AppError::Validation` - match is not in round 0, slot is not 0/1, or the
///   athlete already sits in another first-round slot
pub fn assign_player(
    bracket: &Bracket,
    match_id: &str,
    slot: usize,
    participant: Option<Participant>,
) -> Result<Bracket, AppError> {
    let (round, index) = bracket
        .locate(match_id)
        .ok_or_else(|| AppError::match_not_found(match_id))?;
    if round != 0 {
        return Err(AppError::validation(format!(
            "Players can only be assigned to first-round matches, {match_id} is in round {round}"
        )));
    }
    if slot > 1 {
        return Err(AppError::validation(format!(
            "Slot must be 0 or 1, got {slot}"
        )));
    }
    if let Some(p) = &participant
        && let Some(other) = first_round_seat(bracket, p.athlete_id)
        && other != (index, slot)
    {
        return Err(AppError::validation(format!(
            "Athlete {} is already seated in {} slot {}",
            p.athlete_id, bracket.rounds[0].matches[other.0].id, other.1
        )));
    }

    let mut next = bracket.clone();
    let target = next.match_at_mut(round, index);
    target.players[slot] = participant;
    target.reset_result();
    invalidate_downstream(&mut next, round, match_id);

    debug!(
        "Assigned slot {} of {}: athlete={:?}",
        slot,
        match_id,
        next.rounds[round].matches[index].players[slot]
            .as_ref()
            .map(|p| p.athlete_id)
    );
    Ok(next)
}

/// Records a score for an athlete in a match and re-derives the winner.
///
/// With both slots filled and both scored, the higher score wins and equal
/// scores leave the winner unset. A match with a single occupant (a bye)
/// resolves to that occupant as soon as any score is entered for it.
/// When the winner changes, downstream matches are invalidated and the new
/// winner is propagated.
///
/// # Errors
/// * `AppError::MatchNotFound` - unknown match id
/// * `AppError::Validation` - the athlete is not in the match, the value is not
///   finite, or the match is still waiting on a predecessor
pub fn set_score(
    bracket: &Bracket,
    match_id: &str,
    athlete_id: AthleteId,
    value: f64,
) -> Result<Bracket, AppError> {
    let (round, index) = bracket
        .locate(match_id)
        .ok_or_else(|| AppError::match_not_found(match_id))?;
    if !value.is_finite() {
        return Err(AppError::validation(format!(
            "Score for athlete {athlete_id} must be a number"
        )));
    }

    if bracket.rounds[round].matches[index].slot_of(athlete_id).is_none() {
        return Err(AppError::validation(format!(
            "Athlete {athlete_id} is not playing in match {match_id}"
        )));
    }
    if !can_select_winner(bracket, match_id)? {
        return Err(AppError::validation(format!(
            "Match {match_id} is still waiting for a previous result"
        )));
    }

    let mut next = bracket.clone();
    let target = next.match_at_mut(round, index);
    target.scores.insert(athlete_id, value);

    let previous = target.winner.as_ref().map(|w| w.athlete_id);
    let decided = decide_by_scores(&next, round, index);
    apply_winner(&mut next, round, index, decided, previous);
    Ok(next)
}

/// Sets the winner of a match directly, for categories that record win/loss
/// per round without numeric scores.
///
/// # Errors
/// * `AppError::MatchNotFound` - unknown match id
/// * `AppError::InvalidWinner` - the athlete does not occupy either slot
/// * `AppError::Validation` - the match is still waiting on a predecessor
pub fn set_winner_manual(
    bracket: &Bracket,
    match_id: &str,
    athlete_id: AthleteId,
) -> Result<Bracket, AppError> {
    let (round, index) = bracket
        .locate(match_id)
        .ok_or_else(|| AppError::match_not_found(match_id))?;
    let current = &bracket.rounds[round].matches[index];
    let Some(chosen) = current.participant(athlete_id).cloned() else {
        return Err(AppError::invalid_winner(match_id, athlete_id));
    };
    if !can_select_winner(bracket, match_id)? {
        return Err(AppError::validation(format!(
            "Match {match_id} is still waiting for a previous result"
        )));
    }

    let previous = current.winner.as_ref().map(|w| w.athlete_id);
    let mut next = bracket.clone();
    apply_winner(&mut next, round, index, Some(chosen), previous);
    Ok(next)
}

/// Whether a winner may be picked for `match_id` right now.
///
/// True if the match already has a winner; for round 0 if at least one slot
/// is filled; for later rounds if every referenced predecessor has a winner.
///
/// # Errors
/// * `AppError::MatchNotFound` - unknown match id
pub fn can_select_winner(bracket: &Bracket, match_id: &str) -> Result<bool, AppError> {
    let (round, index) = bracket
        .locate(match_id)
        .ok_or_else(|| AppError::match_not_found(match_id))?;
    let m = &bracket.rounds[round].matches[index];
    if m.winner.is_some() {
        return Ok(true);
    }
    if round == 0 {
        return Ok(m.occupant_count() > 0);
    }
    Ok(m.from.iter().flatten().all(|pred| {
        bracket
            .match_by_id(pred)
            .is_some_and(|p| p.winner.is_some())
    }))
}

/// Round-0 match index and slot currently holding `athlete_id`
fn first_round_seat(bracket: &Bracket, athlete_id: AthleteId) -> Option<(usize, usize)> {
    bracket
        .rounds
        .first()?
        .matches
        .iter()
        .enumerate()
        .find_map(|(i, m)| m.slot_of(athlete_id).map(|slot| (i, slot)))
}

/// Winner implied by the current scores of a match
fn decide_by_scores(bracket: &Bracket, round: usize, index: usize) -> Option<Participant> {
    let m = &bracket.rounds[round].matches[index];
    match &m.players {
        [Some(a), Some(b)] => {
            let (sa, sb) = (m.scores.get(&a.athlete_id)?, m.scores.get(&b.athlete_id)?);
            if sa > sb {
                Some(a.clone())
            } else if sb > sa {
                Some(b.clone())
            } else {
                None
            }
        }
        [Some(only), None] | [None, Some(only)] => m
            .scores
            .contains_key(&only.athlete_id)
            .then(|| only.clone()),
        [None, None] => None,
    }
}

/// Stores `winner` on a match; on change, clears what depended on the old
/// winner and pushes the new one forward.
fn apply_winner(
    bracket: &mut Bracket,
    round: usize,
    index: usize,
    winner: Option<Participant>,
    previous: Option<AthleteId>,
) {
    let match_id = bracket.rounds[round].matches[index].id.clone();
    let new_id = winner.as_ref().map(|w| w.athlete_id);
    bracket.match_at_mut(round, index).winner = winner;
    if new_id == previous {
        return;
    }

    invalidate_downstream(bracket, round, &match_id);
    propagate_winner(bracket, round, index);
    info!(
        "Winner of {} changed: {:?} -> {:?}",
        match_id, previous, new_id
    );
}

/// Places a match's winner into the slot it feeds in the next round
fn propagate_winner(bracket: &mut Bracket, round: usize, index: usize) {
    let source = &bracket.rounds[round].matches[index];
    let winner = source.winner.clone();
    let id = source.id.clone();
    if let Some((next_index, slot)) = bracket.successor_of(round, &id) {
        bracket.match_at_mut(round + 1, next_index).players[slot] = winner;
    }
}

/// Clears the slot fed by `match_id` in the next round, that match's result,
/// and recursively everything fed by it.
fn invalidate_downstream(bracket: &mut Bracket, round: usize, match_id: &str) {
    let mut current_round = round;
    let mut current_id = match_id.to_string();
    while let Some((next_index, slot)) = bracket.successor_of(current_round, &current_id) {
        let next = bracket.match_at_mut(current_round + 1, next_index);
        next.players[slot] = None;
        next.reset_result();
        current_id = next.id.clone();
        current_round += 1;
    }
}
