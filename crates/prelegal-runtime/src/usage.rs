//! Token usage accounting across assistant calls.

use parking_lot::Mutex;
use serde::Serialize;

use crate::providers::TokenUsage;

/// Accumulated usage for an assistant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct UsageSummary {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    /// Provider calls made
    pub calls: u32,
    /// Replies served from the cache
    pub cache_hits: u32,
}

impl UsageSummary {
    pub fn total_tokens(&self) -> u64 {
        self.prompt_tokens + self.completion_tokens
    }
}

/// Thread-safe usage counter shared by concurrent requests.
#[derive(Debug, Default)]
pub struct UsageTracker {
    inner: Mutex<UsageSummary>,
}

impl UsageTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, usage: &TokenUsage) {
        let mut summary = self.inner.lock();
        summary.prompt_tokens += u64::from(usage.prompt_tokens);
        summary.completion_tokens += u64::from(usage.completion_tokens);
        summary.calls += 1;
    }

    pub fn record_cache_hit(&self) {
        self.inner.lock().cache_hits += 1;
    }

    pub fn summary(&self) -> UsageSummary {
        *self.inner.lock()
    }

    pub fn reset(&self) {
        *self.inner.lock() = UsageSummary::default();
    }
}
