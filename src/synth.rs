//! Card copy generation for worthy plays.
//!
//! The model is asked for `{"title", "desc", "intensity"}` but returns free
//! text, so the reply is cut from the first `{` to the last `}`, keys are
//! repaired, and the call is retried a bounded number of times. When all
//! attempts fail the play's own data is used; this module never errors.

use std::time::Duration;

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::ai::{DynGenerator, GenerationRequest};
use crate::config::SynthConfig;

pub const DEFAULT_INTENSITY: &str = "3";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentPayload {
    pub title: String,
    pub desc: String,
    /// "1".."5"; not range-checked.
    pub intensity: String,
}

impl ContentPayload {
    /// Used when generation gives up: the raw event type and feed text.
    pub fn fallback(event_type: &str, description: &str) -> Self {
        Self {
            title: event_type.to_string(),
            desc: description.to_string(),
            intensity: DEFAULT_INTENSITY.to_string(),
        }
    }
}

/// Inputs for one card.
#[derive(Debug, Clone, Copy)]
pub struct SynthesisRequest<'a> {
    pub player: &'a str,
    pub event_type: &'a str,
    pub description: &'a str,
    /// "away-home"
    pub score: &'a str,
}

#[derive(Debug, Clone)]
pub struct SynthSettings {
    pub max_attempts: u32,
    pub retry_pause: Duration,
    pub language: String,
}

impl SynthSettings {
    pub fn from_config(cfg: &SynthConfig, language: &str) -> Self {
        Self {
            max_attempts: cfg.max_attempts.max(1),
            retry_pause: Duration::from_millis(cfg.retry_pause_ms),
            language: language.to_string(),
        }
    }
}

impl Default for SynthSettings {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            retry_pause: Duration::from_secs(1),
            language: "Japanese".to_string(),
        }
    }
}

pub struct ContentSynthesizer {
    generator: DynGenerator,
    settings: SynthSettings,
}

impl ContentSynthesizer {
    pub fn new(generator: DynGenerator, settings: SynthSettings) -> Self {
        Self {
            generator,
            settings,
        }
    }

    pub async fn synthesize(&self, req: SynthesisRequest<'_>) -> ContentPayload {
        let gen_req = GenerationRequest::new(build_generation_prompt(&req, &self.settings.language))
            .with_system(system_prompt(&self.settings.language))
            .with_temperature(0.7)
            .with_max_tokens(1000);

        let attempts = self.settings.max_attempts.max(1);
        for attempt in 1..=attempts {
            metrics::counter!("synth_attempts_total").increment(1);
            let outcome = match self.generator.generate(&gen_req).await {
                Ok(text) => parse_content(&text),
                Err(e) => Err(e),
            };
            match outcome {
                Ok(content) => return content,
                Err(e) => {
                    tracing::debug!(player = req.player, attempt, error = %e, "generation attempt failed");
                    if attempt < attempts && !self.settings.retry_pause.is_zero() {
                        tokio::time::sleep(self.settings.retry_pause).await;
                    }
                }
            }
        }

        metrics::counter!("synth_fallbacks_total").increment(1);
        tracing::warn!(
            player = req.player,
            event_type = req.event_type,
            attempts,
            "generation failed, using feed text"
        );
        ContentPayload::fallback(req.event_type, req.description)
    }
}

fn system_prompt(language: &str) -> String {
    format!(
        "You are a veteran editor of baseball trading cards. Write {language} copy that gets fans excited. Output JSON only."
    )
}

pub fn build_generation_prompt(req: &SynthesisRequest<'_>, language: &str) -> String {
    format!(
        r#"Using the MLB play-by-play data below (English), write {language} trading-card copy.
Target: {player} / Event: {event} / Desc: "{desc}" / Score: {score}

# Requirements
1. title: a dramatic, catchy headline of at most 20 characters.
2. desc: about 60 characters describing the moment vividly. Paraphrase with passion, no literal translation.
3. intensity: excitement score from 1 to 5 (5 is highest), as a string.

# Output format (JSON only)
{{"title": "...", "desc": "...", "intensity": "..."}}"#,
        player = req.player,
        event = req.event_type,
        desc = req.description,
        score = req.score,
    )
}

/// Slice from the first `{` to the last `}`; tolerant of prose around it.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

/// Key repairs, in order: `Title`→`title`, `Desc`→`desc`,
/// `description`→`desc`; missing `intensity` becomes "3".
fn repair_keys(map: &mut Map<String, Value>) {
    if !map.contains_key("title") {
        if let Some(v) = map.remove("Title") {
            map.insert("title".into(), v);
        }
    }
    if !map.contains_key("desc") {
        if let Some(v) = map.remove("Desc") {
            map.insert("desc".into(), v);
        }
    }
    if !map.contains_key("desc") {
        if let Some(v) = map.remove("description") {
            map.insert("desc".into(), v);
        }
    }
    if !map.contains_key("intensity") {
        map.insert("intensity".into(), Value::String(DEFAULT_INTENSITY.into()));
    }
}

fn as_text(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Parse one model reply. Errors when no object is found, JSON is invalid,
/// or `title`/`desc` are still missing after repair.
pub fn parse_content(text: &str) -> Result<ContentPayload> {
    let raw = extract_json_object(text).ok_or_else(|| anyhow!("no JSON object in reply"))?;
    let mut map: Map<String, Value> = serde_json::from_str(raw)?;
    repair_keys(&mut map);

    let title = map.get("title").and_then(as_text);
    let desc = map.get("desc").and_then(as_text);
    let (Some(title), Some(desc)) = (title, desc) else {
        return Err(anyhow!("JSON keys missing"));
    };
    let intensity = map
        .get("intensity")
        .and_then(as_text)
        .unwrap_or_else(|| DEFAULT_INTENSITY.to_string());

    Ok(ContentPayload {
        title,
        desc,
        intensity,
    })
}
