// src/classify/judge.rs
use crate::ai::{GenerationRequest, TextGenerator};
use crate::feed::GameContext;

/// "GameType: W, Inning: 9, ScoreDiff: 1"
pub fn context_line(ctx: &GameContext, inning: u32) -> String {
    format!(
        "GameType: {}, Inning: {}, ScoreDiff: {}",
        ctx.game_type_code, inning, ctx.score_diff
    )
}

pub fn build_judgment_prompt(player: &str, description: &str, context: &str) -> String {
    format!(
        r#"You are the editor-in-chief of a baseball news desk. Decide whether the play below deserves a breaking-news trading card.

Player: {player}
Play: "{description}"
Context: {context}

# Rules (priority order)
1. Postseason / World Series context:
   - Hit (Single, Double, Triple, Home Run) -> YES
   - RBI (Run Batted In) -> YES
   - Pitcher's strikeout -> YES
   - Great defensive play -> YES
   - Routine out with no run scored (ground out, fly out, pop out) -> NO
2. Inning 9 or later AND ScoreDiff <= 1 (climax):
   - Even an out is YES if it decides the game or is a painful final out.
3. Everything else (regular season etc.):
   - Only clear highlights -> YES
   - Otherwise -> NO

Answer with exactly one word: YES or NO. No explanation."#
    )
}

/// Lenient on purpose: the answer is free text, so any "YES" anywhere counts.
pub fn parse_verdict(answer: &str) -> bool {
    answer.to_uppercase().contains("YES")
}

/// Ask the model. Any error resolves to `false` (fail-closed).
pub async fn judge_play(
    generator: &dyn TextGenerator,
    player: &str,
    description: &str,
    context: &str,
) -> bool {
    let req = GenerationRequest::new(build_judgment_prompt(player, description, context))
        .with_temperature(0.0)
        .with_max_tokens(100);

    match generator.generate(&req).await {
        Ok(answer) => {
            let yes = parse_verdict(&answer);
            let verdict = if yes { "YES" } else { "NO" };
            tracing::info!(player, verdict, "AI judgment");
            yes
        }
        Err(e) => {
            metrics::counter!("ai_judgment_failures_total").increment(1);
            tracing::warn!(player, error = %e, "AI judgment failed, defaulting to NO");
            false
        }
    }
}
