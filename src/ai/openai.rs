use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::ai::{http_client, GenerationRequest, TextGenerator};

/// OpenAI provider (uses Chat Completions API).
pub struct OpenAiProvider {
    http: reqwest::Client,
    api_key: String,
    model: String,
}

impl OpenAiProvider {
    /// `model_override`: pass Some("gpt-4o") to override; defaults to gpt-4o-mini.
    pub fn new(api_key: &str, model_override: Option<&str>, timeout: Duration) -> Result<Self> {
        if api_key.is_empty() {
            return Err(anyhow!("OpenAI API key cannot be empty"));
        }
        Ok(Self {
            http: http_client(timeout)?,
            api_key: api_key.to_string(),
            model: model_override.unwrap_or("gpt-4o-mini").to_string(),
        })
    }
}

#[derive(Serialize)]
struct Msg<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct Req<'a> {
    model: &'a str,
    messages: Vec<Msg<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct Resp {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMsg,
}

#[derive(Deserialize)]
struct ChoiceMsg {
    content: Option<String>,
}

#[async_trait]
impl TextGenerator for OpenAiProvider {
    async fn generate(&self, req: &GenerationRequest) -> Result<String> {
        let mut messages = Vec::with_capacity(2);
        if let Some(sys) = req.system.as_deref() {
            messages.push(Msg {
                role: "system",
                content: sys,
            });
        }
        messages.push(Msg {
            role: "user",
            content: &req.prompt,
        });

        let body = Req {
            model: &self.model,
            messages,
            temperature: req.temperature,
            max_tokens: req.max_tokens,
        };

        let resp = self
            .http
            .post("https://api.openai.com/v1/chat/completions")
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .context("openai request")?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(anyhow!("OpenAI API error {status}: {text}"));
        }
        let parsed: Resp = resp.json().await.context("openai response body")?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| anyhow!("Empty response from OpenAI"))
    }

    fn provider_name(&self) -> &'static str {
        "openai"
    }
}
