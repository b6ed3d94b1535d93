// src/classify/mod.rs
//! Play classifier: rule tier first, AI judgment only for the ambiguous middle.
//! One evaluation per play; a failure can never promote a play.

pub mod judge;
pub mod rules;

use serde::Serialize;

use crate::ai::DynGenerator;
use crate::classify::rules::{apply_rules, RuleOutcome};
use crate::feed::{GameContext, PlayEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionReason {
    RuleCloseRisp,
    RuleGameEnd,
    AiPostseason,
    AiRegular,
    Rejected,
}

impl DecisionReason {
    pub fn as_str(self) -> &'static str {
        match self {
            DecisionReason::RuleCloseRisp => "rule_close_risp",
            DecisionReason::RuleGameEnd => "rule_game_end",
            DecisionReason::AiPostseason => "ai_postseason",
            DecisionReason::AiRegular => "ai_regular",
            DecisionReason::Rejected => "rejected",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Decision {
    pub is_worthy: bool,
    pub reason: DecisionReason,
}

impl Decision {
    fn worthy(reason: DecisionReason) -> Self {
        Self {
            is_worthy: true,
            reason,
        }
    }

    fn rejected() -> Self {
        Self {
            is_worthy: false,
            reason: DecisionReason::Rejected,
        }
    }
}

pub struct PlayClassifier {
    judge: DynGenerator,
}

impl PlayClassifier {
    pub fn new(judge: DynGenerator) -> Self {
        Self { judge }
    }

    pub async fn classify(&self, player: &str, play: &PlayEvent, ctx: &GameContext) -> Decision {
        match apply_rules(play, ctx) {
            RuleOutcome::GameEnd => {
                tracing::info!(player, event = %play.event_name, "rule: game end");
                Decision::worthy(DecisionReason::RuleGameEnd)
            }
            RuleOutcome::CloseWithRisp => {
                tracing::info!(player, diff = ctx.score_diff, "rule: close game, runner in scoring position");
                Decision::worthy(DecisionReason::RuleCloseRisp)
            }
            RuleOutcome::NeedsJudgment => {
                metrics::counter!("ai_judgment_calls_total").increment(1);
                let context = judge::context_line(ctx, play.inning);
                tracing::debug!(player, description = %play.description, %context, "asking AI judge");
                if judge::judge_play(self.judge.as_ref(), player, &play.description, &context).await
                {
                    let reason = if ctx.game_type.is_postseason() {
                        DecisionReason::AiPostseason
                    } else {
                        DecisionReason::AiRegular
                    };
                    Decision::worthy(reason)
                } else {
                    Decision::rejected()
                }
            }
            RuleOutcome::Skip => Decision::rejected(),
        }
    }
}
