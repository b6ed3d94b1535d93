//! Deterministic tier of the play classifier.
//!
//! Evaluated in order, first match wins:
//! - `Game End` in the event name: worthy, nothing else is consulted
//! - close game (diff <= 2) with a runner starting on 2B/3B: worthy, no AI
//! - postseason, or diff <= 3: defer to the AI judgment
//! - anything else: not worthy, no AI
//!
//! Event names come from free text, so matching is substring-based on purpose.

use crate::feed::{GameContext, PlayEvent};

pub const CLOSE_GAME_MAX_DIFF: u32 = 2;
pub const JUDGMENT_MAX_DIFF: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleOutcome {
    GameEnd,
    CloseWithRisp,
    NeedsJudgment,
    Skip,
}

pub fn is_game_ending(event_name: &str) -> bool {
    event_name.contains("Game End")
}

pub fn is_close(ctx: &GameContext) -> bool {
    ctx.score_diff <= CLOSE_GAME_MAX_DIFF
}

pub fn needs_judgment(ctx: &GameContext) -> bool {
    ctx.game_type.is_postseason() || ctx.score_diff <= JUDGMENT_MAX_DIFF
}

pub fn apply_rules(play: &PlayEvent, ctx: &GameContext) -> RuleOutcome {
    if is_game_ending(&play.event_name) {
        return RuleOutcome::GameEnd;
    }
    if is_close(ctx) && play.has_runner_in_scoring_position() {
        return RuleOutcome::CloseWithRisp;
    }
    if needs_judgment(ctx) {
        return RuleOutcome::NeedsJudgment;
    }
    RuleOutcome::Skip
}
