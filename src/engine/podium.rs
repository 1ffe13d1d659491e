//! Podium (1st/2nd/3rd) derivation from a bracket or a score sheet.
//!
//! Both strategies are pure functions of the current state: calling them
//! again on the same input always yields the same classification.

use tracing::{debug, warn};

use crate::models::{AthleteId, Bracket, ClassificationEntry, CompetitionFormat, ScoreSheet};

/// Classification of an elimination bracket.
///
/// Empty until the final has a winner. Then: 1st is the final's winner, 2nd
/// the final's other player, 3rd the losers of the round before the final
/// (up to two, kept as ties, no bronze match). When fewer than two of those
/// losers exist, the remaining 3rd places are filled from bracket athletes
/// not yet placed, in seeding order.
pub fn elimination_podium(bracket: &Bracket) -> Vec<ClassificationEntry> {
    let Some(final_match) = bracket.final_match() else {
        return Vec::new();
    };
    let Some(champion) = final_match.winner.as_ref() else {
        return Vec::new();
    };

    let mut podium = vec![ClassificationEntry::new(1, champion.athlete_id)];
    if let Some(runner_up) = final_match.loser() {
        podium.push(ClassificationEntry::new(2, runner_up.athlete_id));
    }

    let placed = |podium: &[ClassificationEntry], id: AthleteId| {
        podium.iter().any(|e| e.athlete_id == id)
    };

    if bracket.round_count() >= 2 {
        let semifinal = &bracket.rounds[bracket.round_count() - 2];
        for m in &semifinal.matches {
            if let Some(loser) = m.loser()
                && !placed(&podium, loser.athlete_id)
            {
                podium.push(ClassificationEntry::new(3, loser.athlete_id));
            }
        }
    }

    let thirds = podium.iter().filter(|e| e.position == 3).count();
    if thirds < 2 {
        let fill: Vec<AthleteId> = bracket
            .seeded_participants()
            .into_iter()
            .map(|p| p.athlete_id)
            .filter(|id| !placed(&podium, *id))
            .take(2 - thirds)
            .collect();
        if !fill.is_empty() {
            warn!(
                "Bracket has only {} semifinal loser(s); filling 3rd place with athletes {:?}",
                thirds, fill
            );
        }
        podium.extend(fill.into_iter().map(|id| ClassificationEntry::new(3, id)));
    }

    debug!("Elimination podium: {:?}", podium);
    podium
}

/// Classification of a judged category: the top three ranked athletes,
/// one per position, ties broken only by sheet order.
pub fn judged_podium(sheet: &ScoreSheet) -> Vec<ClassificationEntry> {
    let podium: Vec<_> = sheet
        .rank()
        .into_iter()
        .take(3)
        .enumerate()
        .map(|(i, r)| ClassificationEntry::new(i as u8 + 1, r.athlete_id))
        .collect();
    debug!("Judged podium: {:?}", podium);
    podium
}

/// Podium for whichever structure the category format uses.
/// A missing bracket or sheet yields an empty classification.
pub fn compute_podium(
    format: CompetitionFormat,
    bracket: Option<&Bracket>,
    sheet: Option<&ScoreSheet>,
) -> Vec<ClassificationEntry> {
    match format {
        CompetitionFormat::Elimination => bracket.map(elimination_podium).unwrap_or_default(),
        CompetitionFormat::Judged => sheet.map(judged_podium).unwrap_or_default(),
    }
}

/// Whether the category has produced its full result
pub fn is_complete(
    format: CompetitionFormat,
    bracket: Option<&Bracket>,
    sheet: Option<&ScoreSheet>,
) -> bool {
    match format {
        CompetitionFormat::Elimination => bracket
            .and_then(|b| b.final_match())
            .is_some_and(|m| m.winner.is_some()),
        CompetitionFormat::Judged => sheet.is_some_and(|s| s.all_scored()),
    }
}
