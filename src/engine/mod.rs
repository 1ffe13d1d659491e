//! Category execution engines: bracket construction, match progression,
//! judged score sheets and podium derivation.

pub mod bracket_builder;
pub mod podium;
pub mod progression;
pub mod score_sheet;

pub use bracket_builder::{build_bracket, expected_round_count};
pub use podium::{compute_podium, elimination_podium, is_complete, judged_podium};
pub use progression::{assign_player, can_select_winner, set_score, set_winner_manual};
pub use score_sheet::{RankedAthlete, set_judge_score, set_judge_value};
