// tests/synth.rs
//
// Content synthesizer: bounded retry, fixed pause, deterministic fallback.

use std::sync::Arc;
use std::time::Duration;

use highlight_watcher::ai::MockGenerator;
use highlight_watcher::synth::{SynthSettings, SynthesisRequest};
use highlight_watcher::{ContentPayload, ContentSynthesizer};

const DESC: &str = "Shohei Ohtani doubles (2) on a line drive to left fielder. Mookie Betts scores.";

fn request() -> SynthesisRequest<'static> {
    SynthesisRequest {
        player: "大谷翔平",
        event_type: "TIMELY",
        description: DESC,
        score: "5-4",
    }
}

#[tokio::test(start_paused = true)]
async fn always_failing_generator_falls_back_after_three_attempts() {
    let generator = Arc::new(MockGenerator::failing("timeout"));
    let synth = ContentSynthesizer::new(generator.clone(), SynthSettings::default());

    let t0 = tokio::time::Instant::now();
    let out = synth.synthesize(request()).await;

    assert_eq!(generator.calls(), 3);
    assert_eq!(out, ContentPayload::fallback("TIMELY", DESC));
    assert_eq!(out.title, "TIMELY");
    assert_eq!(out.desc, DESC);
    assert_eq!(out.intensity, "3");
    // two 1s pauses between three attempts, none after the last
    let waited = t0.elapsed();
    assert!(waited >= Duration::from_secs(2) && waited < Duration::from_secs(3), "{waited:?}");
}

#[tokio::test]
async fn noisy_reply_is_repaired() {
    let generator = Arc::new(MockGenerator::always(r#"noise {"Title":"X","Desc":"Y"} noise"#));
    let synth = ContentSynthesizer::new(generator.clone(), SynthSettings::default());

    let out = synth.synthesize(request()).await;
    assert_eq!(
        out,
        ContentPayload {
            title: "X".into(),
            desc: "Y".into(),
            intensity: "3".into(),
        }
    );
    assert_eq!(generator.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn parse_failure_is_retried() {
    let generator = Arc::new(MockGenerator::scripted(
        vec![
            Ok("I'm sorry, here is some prose without JSON.".into()),
            Ok(r#"{"title":"only a title"}"#.into()),
        ],
        Ok(r#"{"title":"値千金の二塁打","desc":"九回に勝ち越しの一打。","intensity":"5"}"#.into()),
    ));
    let synth = ContentSynthesizer::new(generator.clone(), SynthSettings::default());

    let out = synth.synthesize(request()).await;
    assert_eq!(generator.calls(), 3);
    assert_eq!(out.title, "値千金の二塁打");
    assert_eq!(out.intensity, "5");
}

#[tokio::test]
async fn generation_request_shape() {
    let generator = Arc::new(MockGenerator::always(r#"{"title":"t","desc":"d"}"#));
    let settings = SynthSettings {
        language: "English".into(),
        ..SynthSettings::default()
    };
    let synth = ContentSynthesizer::new(generator.clone(), settings);
    synth.synthesize(request()).await;

    let reqs = generator.requests();
    assert_eq!(reqs.len(), 1);
    assert_eq!(reqs[0].temperature, 0.7);
    assert_eq!(reqs[0].max_tokens, 1000);
    assert!(reqs[0].system.as_deref().is_some_and(|s| s.contains("English")));
    assert!(reqs[0].prompt.contains("Target: 大谷翔平 / Event: TIMELY"));
    assert!(reqs[0].prompt.contains("Score: 5-4"));
}
