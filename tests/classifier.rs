// tests/classifier.rs
//
// Play classifier tiers, verified by counting calls into the AI judge.
//
// Covered:
// - close game + RISP is worthy with zero judge calls
// - "Game End" short-circuits everything
// - regular-season blowout is rejected with zero judge calls
// - postseason / within-3 plays go to the judge; errors fail closed

use std::collections::BTreeSet;
use std::sync::Arc;

use highlight_watcher::ai::MockGenerator;
use highlight_watcher::feed::{Base, GameContext, GameType, Half, PlayEvent};
use highlight_watcher::{DecisionReason, PlayClassifier};

fn ctx(code: &str, diff: u32) -> GameContext {
    GameContext {
        game_id: 1,
        game_type: GameType::from_code(code),
        game_type_code: code.to_string(),
        away_team: "Los Angeles Dodgers".into(),
        home_team: "Toronto Blue Jays".into(),
        away_score: diff,
        home_score: 0,
        score_diff: diff,
        is_final: false,
    }
}

fn play(event: &str, runners: &[Base]) -> PlayEvent {
    PlayEvent {
        index: 0,
        inning: 9,
        half: Half::Top,
        event_name: event.to_string(),
        description: format!("Shohei Ohtani: {event}"),
        batter_id: Some(660271),
        pitcher_id: Some(1),
        runner_origins: runners.iter().copied().collect::<BTreeSet<_>>(),
        is_complete: true,
    }
}

#[tokio::test]
async fn close_game_with_risp_skips_the_judge() {
    let judge = Arc::new(MockGenerator::always("NO"));
    let c = PlayClassifier::new(judge.clone());

    for diff in 0..=2 {
        for base in [Base::Second, Base::Third] {
            let d = c
                .classify("大谷翔平", &play("Groundout", &[base]), &ctx("R", diff))
                .await;
            assert!(d.is_worthy, "diff={diff} base={base:?}");
            assert_eq!(d.reason, DecisionReason::RuleCloseRisp);
        }
    }
    assert_eq!(judge.calls(), 0, "rule tier must not call the judge");
}

#[tokio::test]
async fn game_end_is_terminal() {
    let judge = Arc::new(MockGenerator::always("NO"));
    let c = PlayClassifier::new(judge.clone());

    let d = c
        .classify("大谷翔平", &play("Game End", &[]), &ctx("R", 12))
        .await;
    assert!(d.is_worthy);
    assert_eq!(d.reason, DecisionReason::RuleGameEnd);
    assert_eq!(judge.calls(), 0);
}

#[tokio::test]
async fn regular_season_blowout_is_rejected_without_judge() {
    let judge = Arc::new(MockGenerator::always("YES"));
    let c = PlayClassifier::new(judge.clone());

    for (event, runners) in [("Home Run", vec![]), ("Single", vec![Base::Second]), ("Strikeout", vec![])] {
        for diff in [4, 7, 15] {
            let d = c.classify("大谷翔平", &play(event, &runners), &ctx("R", diff)).await;
            assert!(!d.is_worthy, "{event} diff={diff}");
            assert_eq!(d.reason, DecisionReason::Rejected);
        }
    }
    // spring training and exhibition are not postseason either
    let d = c.classify("大谷翔平", &play("Home Run", &[]), &ctx("S", 6)).await;
    assert!(!d.is_worthy);
    assert_eq!(judge.calls(), 0);
}

#[tokio::test]
async fn ambiguous_plays_go_to_the_judge() {
    let judge = Arc::new(MockGenerator::always("Yes, definitely."));
    let c = PlayClassifier::new(judge.clone());

    // postseason blowout
    let d = c.classify("大谷翔平", &play("Home Run", &[]), &ctx("W", 9)).await;
    assert!(d.is_worthy);
    assert_eq!(d.reason, DecisionReason::AiPostseason);

    // regular season, diff 3, runner only on first
    let d = c.classify("大谷翔平", &play("Single", &[Base::First]), &ctx("R", 3)).await;
    assert!(d.is_worthy);
    assert_eq!(d.reason, DecisionReason::AiRegular);

    assert_eq!(judge.calls(), 2);
    let reqs = judge.requests();
    assert!(reqs[0].prompt.contains("Context: GameType: W, Inning: 9, ScoreDiff: 9"));
    assert_eq!(reqs[0].temperature, 0.0);
    assert_eq!(reqs[0].max_tokens, 100);
}

#[tokio::test]
async fn judge_errors_fail_closed() {
    let judge = Arc::new(MockGenerator::failing("provider down"));
    let c = PlayClassifier::new(judge.clone());

    let d = c.classify("大谷翔平", &play("Home Run", &[]), &ctx("F", 1)).await;
    assert!(!d.is_worthy);
    assert_eq!(d.reason, DecisionReason::Rejected);
    assert_eq!(judge.calls(), 1, "exactly one judgment per play");
}

#[tokio::test]
async fn judge_no_is_rejected() {
    let judge = Arc::new(MockGenerator::always("NO"));
    let c = PlayClassifier::new(judge.clone());

    let d = c.classify("大谷翔平", &play("Flyout", &[]), &ctx("D", 0)).await;
    assert!(!d.is_worthy);
    assert_eq!(judge.calls(), 1);
}
