//! Text-generation providers shared by the judgment and copywriting tiers.
//! Callers get free text back and decide how to interpret it; providers never
//! retry and never swallow errors.

pub mod claude;
pub mod gemini;
pub mod mock;
pub mod openai;

use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};

use crate::config::AiConfig;

pub use crate::ai::claude::ClaudeProvider;
pub use crate::ai::gemini::GeminiProvider;
pub use crate::ai::mock::MockGenerator;
pub use crate::ai::openai::OpenAiProvider;

/// One text-in/text-out call.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub system: Option<String>,
    pub prompt: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            system: None,
            prompt: prompt.into(),
            temperature: 0.0,
            max_tokens: 100,
        }
    }

    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    pub fn with_temperature(mut self, t: f32) -> Self {
        self.temperature = t;
        self
    }

    pub fn with_max_tokens(mut self, n: u32) -> Self {
        self.max_tokens = n;
        self
    }
}

#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, req: &GenerationRequest) -> Result<String>;
    /// Provider name for diagnostics.
    fn provider_name(&self) -> &'static str;
}

/// Convenient alias used by callers.
pub type DynGenerator = Arc<dyn TextGenerator>;

/// Every call fails; used when AI is disabled in config.
pub struct DisabledGenerator;

#[async_trait]
impl TextGenerator for DisabledGenerator {
    async fn generate(&self, _req: &GenerationRequest) -> Result<String> {
        Err(anyhow!("AI is disabled"))
    }
    fn provider_name(&self) -> &'static str {
        "disabled"
    }
}

// ------------------------------------------------------------
// Daily cap wrapper
// ------------------------------------------------------------

#[derive(Debug)]
struct DailyCounter {
    date: NaiveDate,
    count: u32,
}

/// Caps real provider calls per UTC day. Over the cap every call errors,
/// which both tiers already treat as a failed call.
pub struct DailyLimited<G> {
    inner: G,
    limit: u32,
    counter: Mutex<DailyCounter>,
}

impl<G: TextGenerator> DailyLimited<G> {
    pub fn new(inner: G, limit: u32) -> Self {
        Self {
            inner,
            limit,
            counter: Mutex::new(DailyCounter {
                date: Utc::now().date_naive(),
                count: 0,
            }),
        }
    }

    /// Reserve one call; false when today's budget is spent.
    fn try_acquire(&self) -> bool {
        let today = Utc::now().date_naive();
        let mut g = self.counter.lock().unwrap_or_else(|e| e.into_inner());
        if g.date != today {
            g.date = today;
            g.count = 0;
        }
        if g.count >= self.limit {
            return false;
        }
        g.count += 1;
        true
    }
}

#[async_trait]
impl<G: TextGenerator> TextGenerator for DailyLimited<G> {
    async fn generate(&self, req: &GenerationRequest) -> Result<String> {
        if !self.try_acquire() {
            return Err(anyhow!(
                "daily AI call limit ({}) reached for {}",
                self.limit,
                self.inner.provider_name()
            ));
        }
        self.inner.generate(req).await
    }
    fn provider_name(&self) -> &'static str {
        self.inner.provider_name()
    }
}

// ------------------------------------------------------------
// Factory
// ------------------------------------------------------------

pub(crate) fn http_client(timeout: Duration) -> Result<reqwest::Client> {
    Ok(reqwest::Client::builder()
        .user_agent(concat!("highlight-watcher/", env!("CARGO_PKG_VERSION")))
        .connect_timeout(Duration::from_secs(4).min(timeout))
        .timeout(timeout)
        .build()?)
}

/// Build a generator according to a resolved config (see `AiConfig::resolved`).
pub fn build_generator(cfg: &AiConfig) -> Result<DynGenerator> {
    if !cfg.enabled {
        return Ok(Arc::new(DisabledGenerator));
    }
    let timeout = Duration::from_secs(cfg.timeout_secs.max(1));
    let model = cfg.model.as_deref();
    let limit = cfg.daily_limit;

    let client: DynGenerator = match cfg.provider.as_str() {
        "openai" => Arc::new(DailyLimited::new(
            OpenAiProvider::new(&cfg.api_key, model, timeout)?,
            limit,
        )),
        "claude" => Arc::new(DailyLimited::new(
            ClaudeProvider::new(&cfg.api_key, model, timeout)?,
            limit,
        )),
        "gemini" => Arc::new(DailyLimited::new(
            GeminiProvider::new(&cfg.api_key, model, timeout)?,
            limit,
        )),
        "mock" => Arc::new(MockGenerator::always("NO")),
        other => return Err(anyhow!("Unsupported AI provider: {other}")),
    };
    tracing::info!(provider = client.provider_name(), daily_limit = limit, "AI client ready");
    Ok(client)
}
