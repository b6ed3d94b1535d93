use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use crate::ai::{GenerationRequest, TextGenerator};

/// Deterministic generator for tests/local runs.
/// Scripted replies are consumed in order; once exhausted, `fallback` repeats.
/// `Err(msg)` entries make the call fail.
pub struct MockGenerator {
    script: Mutex<VecDeque<Result<String, String>>>,
    fallback: Result<String, String>,
    calls: AtomicUsize,
    prompts: Mutex<Vec<GenerationRequest>>,
}

impl MockGenerator {
    pub fn always(reply: &str) -> Self {
        Self::scripted(Vec::new(), Ok(reply.to_string()))
    }

    pub fn failing(msg: &str) -> Self {
        Self::scripted(Vec::new(), Err(msg.to_string()))
    }

    pub fn scripted(
        replies: Vec<Result<String, String>>,
        fallback: Result<String, String>,
    ) -> Self {
        Self {
            script: Mutex::new(replies.into()),
            fallback,
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Every request seen so far, oldest first.
    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.prompts
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

#[async_trait]
impl TextGenerator for MockGenerator {
    async fn generate(&self, req: &GenerationRequest) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(req.clone());
        let next = self
            .script
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone());
        next.map_err(|e| anyhow!(e))
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}
