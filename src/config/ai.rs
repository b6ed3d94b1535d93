// src/config/ai.rs
use serde::{Deserialize, Serialize};
use std::env;

fn default_enabled() -> bool {
    true
}
fn default_provider() -> String {
    "claude".to_string()
}
fn default_api_key() -> String {
    "ENV".to_string()
}
fn default_daily_limit() -> u32 {
    500
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_language() -> String {
    "Japanese".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// "openai" | "claude" | "gemini" | "mock" (case-insensitive)
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Provider default when absent.
    #[serde(default)]
    pub model: Option<String>,
    /// "ENV" means: read from OPENAI_API_KEY / ANTHROPIC_API_KEY / GEMINI_API_KEY (by provider)
    #[serde(default = "default_api_key")]
    pub api_key: String,
    /// Real calls per UTC day across both tiers.
    #[serde(default = "default_daily_limit")]
    pub daily_limit: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Output language of the card copy.
    #[serde(default = "default_language")]
    pub language: String,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            provider: default_provider(),
            model: None,
            api_key: default_api_key(),
            daily_limit: default_daily_limit(),
            timeout_secs: default_timeout_secs(),
            language: default_language(),
        }
    }
}

impl AiConfig {
    /// Lowercase the provider and resolve an "ENV" key from the environment.
    /// A disabled or mock config never needs a key.
    pub fn resolved(mut self) -> anyhow::Result<Self> {
        self.provider = self.provider.trim().to_lowercase();

        if !self.enabled || self.provider == "mock" {
            return Ok(self);
        }

        if self.api_key.trim().eq_ignore_ascii_case("env") {
            let var = match self.provider.as_str() {
                "openai" => "OPENAI_API_KEY",
                "claude" => "ANTHROPIC_API_KEY",
                "gemini" => "GEMINI_API_KEY",
                other => anyhow::bail!("Unsupported provider in config: {other}"),
            };
            self.api_key =
                env::var(var).map_err(|_| anyhow::anyhow!("Missing {var} env var"))?;
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[serial_test::serial]
    #[test]
    fn env_key_is_resolved_by_provider() {
        env::set_var("ANTHROPIC_API_KEY", "sk-test");
        let cfg = AiConfig {
            provider: " Claude ".into(),
            ..Default::default()
        }
        .resolved()
        .unwrap();
        assert_eq!(cfg.provider, "claude");
        assert_eq!(cfg.api_key, "sk-test");
        env::remove_var("ANTHROPIC_API_KEY");
    }

    #[serial_test::serial]
    #[test]
    fn missing_env_key_is_an_error() {
        env::remove_var("GEMINI_API_KEY");
        let cfg = AiConfig {
            provider: "gemini".into(),
            ..Default::default()
        };
        assert!(cfg.resolved().is_err());
    }

    #[test]
    fn disabled_and_mock_need_no_key() {
        let off = AiConfig {
            enabled: false,
            provider: "nonsense".into(),
            ..Default::default()
        };
        assert!(off.resolved().is_ok());
        let mock = AiConfig {
            provider: "MOCK".into(),
            ..Default::default()
        };
        assert_eq!(mock.resolved().unwrap().provider, "mock");
    }

    #[test]
    fn unknown_provider_is_rejected() {
        let cfg = AiConfig {
            provider: "llama".into(),
            ..Default::default()
        };
        assert!(cfg.resolved().is_err());
    }
}
