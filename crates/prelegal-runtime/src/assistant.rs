//! The drafting assistant: one structured extraction turn per user message.
//!
//! Each call sends the whole conversation, prefixed by the system prompt,
//! to the provider and parses the reply into an [`ExtractionTurn`]. The
//! caller folds that turn into its `DraftSession`.

use backon::{ExponentialBuilder, Retryable};
use chrono::{NaiveDate, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

use prelegal_core::ExtractionTurn;

use crate::cache::{ConversationKey, TurnCache};
use crate::config::RuntimeConfig;
use crate::prompts::{build_system_prompt, GREETING};
use crate::providers::{ChatMessage, CompletionConfig, CompletionResponse, LlmProvider, ProviderError, Role};
use crate::usage::{UsageSummary, UsageTracker};

lazy_static! {
    /// A reply wrapped in a Markdown code fence.
    static ref FENCED_REPLY: Regex =
        Regex::new(r"(?s)^\s*```(?:json|JSON)?\s*(.*?)\s*```\s*$").unwrap();
}

/// Errors from the drafting assistant.
#[derive(Error, Debug)]
pub enum AssistantError {
    #[error("Conversation has no messages")]
    EmptyConversation,

    #[error("Chat provider failed: {0}")]
    Provider(#[from] ProviderError),

    #[error("Invalid reply from chat service: {0}")]
    InvalidReply(String),
}

pub struct DraftingAssistant {
    provider: Arc<dyn LlmProvider>,
    config: RuntimeConfig,
    cache: Option<TurnCache>,
    usage: UsageTracker,
}

impl DraftingAssistant {
    pub fn new(provider: Arc<dyn LlmProvider>, config: RuntimeConfig) -> Self {
        let cache = config
            .cache
            .enabled
            .then(|| TurnCache::new(config.cache.max_entries, config.cache.ttl));

        Self {
            provider,
            config,
            cache,
            usage: UsageTracker::new(),
        }
    }

    /// The fixed opening turn. Never calls the provider.
    pub fn greeting() -> ExtractionTurn {
        ExtractionTurn::reply(GREETING)
    }

    /// Process the conversation so far, dated today (UTC).
    pub async fn process_message(
        &self,
        messages: &[ChatMessage],
    ) -> Result<ExtractionTurn, AssistantError> {
        self.process_message_on(messages, Utc::now().date_naive())
            .await
    }

    /// Process the conversation with an explicit date for relative-date
    /// resolution.
    pub async fn process_message_on(
        &self,
        messages: &[ChatMessage],
        today: NaiveDate,
    ) -> Result<ExtractionTurn, AssistantError> {
        if messages.is_empty() {
            return Err(AssistantError::EmptyConversation);
        }

        let mut request = Vec::with_capacity(messages.len() + 1);
        request.push(ChatMessage::system(build_system_prompt(today)));
        request.extend(
            messages
                .iter()
                .filter(|m| m.role != Role::System)
                .cloned(),
        );

        let key = ConversationKey::new(&self.config.model, &request);
        if let Some(cache) = &self.cache {
            if let Some(turn) = cache.get(&key).await {
                debug!("Reply served from cache");
                self.usage.record_cache_hit();
                return Ok(turn);
            }
        }

        let completion = self.config.completion_config();
        let response = self.complete_with_retry(&request, &completion).await?;
        self.usage.record(&response.usage);

        let turn = parse_reply(&response.content)?;
        info!(
            provider = self.provider.name(),
            tokens = response.usage.total(),
            document_type = turn.document_type.as_deref().unwrap_or("-"),
            complete = turn.is_complete,
            "Processed chat turn"
        );

        if let Some(cache) = &self.cache {
            cache.insert(key, turn.clone()).await;
        }
        Ok(turn)
    }

    async fn complete_with_retry(
        &self,
        request: &[ChatMessage],
        completion: &CompletionConfig,
    ) -> Result<CompletionResponse, ProviderError> {
        let backoff = ExponentialBuilder::default()
            .with_min_delay(Duration::from_millis(500))
            .with_max_times(self.config.max_retries);

        (|| async { self.complete_once(request.to_vec(), completion).await })
            .retry(backoff)
            .when(ProviderError::is_retryable)
            .adjust(|err: &ProviderError, delay: Option<Duration>| match err {
                // Never retry sooner than the service asked.
                ProviderError::RateLimited {
                    retry_after: Some(after),
                } => delay.map(|d| d.max(*after)),
                _ => delay,
            })
            .notify(|err: &ProviderError, delay: Duration| {
                warn!(error = %err, ?delay, "Retrying chat completion");
            })
            .await
    }

    async fn complete_once(
        &self,
        request: Vec<ChatMessage>,
        completion: &CompletionConfig,
    ) -> Result<CompletionResponse, ProviderError> {
        match tokio::time::timeout(completion.timeout, self.provider.complete(request, completion))
            .await
        {
            Ok(result) => result,
            Err(_) => Err(ProviderError::Timeout(completion.timeout)),
        }
    }

    pub fn usage(&self) -> UsageSummary {
        self.usage.summary()
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }
}

/// Parse a raw model reply, tolerating a fenced JSON block.
pub fn parse_reply(content: &str) -> Result<ExtractionTurn, AssistantError> {
    let body = FENCED_REPLY
        .captures(content)
        .and_then(|c| c.get(1))
        .map_or(content, |m| m.as_str());

    ExtractionTurn::from_json(body.trim()).map_err(|e| AssistantError::InvalidReply(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::TokenUsage;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use prelegal_core::FieldUpdate;

    /// Replays canned replies and records what it was sent.
    struct ScriptedProvider {
        replies: Mutex<Vec<Result<String, ProviderError>>>,
        calls: Mutex<Vec<Vec<ChatMessage>>>,
    }

    impl ScriptedProvider {
        fn new(replies: Vec<Result<String, ProviderError>>) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies),
                calls: Mutex::new(Vec::new()),
            })
        }

        fn call_count(&self) -> usize {
            self.calls.lock().len()
        }
    }

    #[async_trait]
    impl LlmProvider for ScriptedProvider {
        async fn complete(
            &self,
            messages: Vec<ChatMessage>,
            _config: &CompletionConfig,
        ) -> Result<CompletionResponse, ProviderError> {
            self.calls.lock().push(messages);
            let next = {
                let mut replies = self.replies.lock();
                if replies.is_empty() {
                    Err(ProviderError::HttpError("script exhausted".to_string()))
                } else {
                    replies.remove(0)
                }
            };
            next.map(|content| CompletionResponse {
                content,
                usage: TokenUsage {
                    prompt_tokens: 10,
                    completion_tokens: 5,
                },
                model: "scripted".to_string(),
                finish_reason: Some("stop".to_string()),
            })
        }

        async fn health_check(&self) -> bool {
            true
        }

        fn name(&self) -> &str {
            "scripted"
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 9).unwrap()
    }

    fn assistant(provider: Arc<ScriptedProvider>) -> DraftingAssistant {
        DraftingAssistant::new(provider, RuntimeConfig::default())
    }

    #[test]
    fn test_greeting() {
        let turn = DraftingAssistant::greeting();
        assert!(turn.response.starts_with("Hello!"));
        assert!(!turn.is_complete);
        assert!(turn.update.is_empty());
    }

    #[tokio::test]
    async fn test_empty_conversation_is_rejected() {
        let provider = ScriptedProvider::new(vec![]);
        let result = assistant(provider.clone()).process_message(&[]).await;
        assert!(matches!(result, Err(AssistantError::EmptyConversation)));
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_process_message_parses_turn() {
        let provider = ScriptedProvider::new(vec![Ok(
            r#"{"response": "Delaware it is.", "documentType": "mutual_nda", "governingLaw": "Delaware"}"#
                .to_string(),
        )]);
        let assistant = assistant(provider.clone());

        let turn = assistant
            .process_message_on(&[ChatMessage::user("Use Delaware law")], today())
            .await
            .unwrap();

        assert_eq!(turn.response, "Delaware it is.");
        assert_eq!(
            turn.update.governing_law,
            FieldUpdate::Present("Delaware".to_string())
        );

        let sent = provider.calls.lock()[0].clone();
        assert_eq!(sent[0].role, Role::System);
        assert!(sent[0].content.contains("Today's date is 2025-03-09."));
        assert_eq!(sent[1], ChatMessage::user("Use Delaware law"));
        assert_eq!(assistant.usage().total_tokens(), 15);
    }

    #[tokio::test]
    async fn test_identical_conversation_hits_cache() {
        let provider = ScriptedProvider::new(vec![Ok(r#"{"response": "Hi"}"#.to_string())]);
        let assistant = assistant(provider.clone());
        let messages = [ChatMessage::user("Hello")];

        let first = assistant.process_message_on(&messages, today()).await.unwrap();
        let second = assistant.process_message_on(&messages, today()).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(provider.call_count(), 1);
        assert_eq!(assistant.usage().cache_hits, 1);
    }

    #[tokio::test]
    async fn test_invalid_reply() {
        let provider = ScriptedProvider::new(vec![Ok("I am not JSON".to_string())]);
        let result = assistant(provider)
            .process_message_on(&[ChatMessage::user("Hello")], today())
            .await;
        assert!(matches!(result, Err(AssistantError::InvalidReply(_))));
    }

    #[tokio::test]
    async fn test_auth_error_is_not_retried() {
        let provider = ScriptedProvider::new(vec![Err(ProviderError::AuthError)]);
        let result = assistant(provider.clone())
            .process_message_on(&[ChatMessage::user("Hello")], today())
            .await;
        assert!(matches!(
            result,
            Err(AssistantError::Provider(ProviderError::AuthError))
        ));
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limit_is_retried() {
        let provider = ScriptedProvider::new(vec![
            Err(ProviderError::RateLimited { retry_after: None }),
            Ok(r#"{"response": "Back again"}"#.to_string()),
        ]);
        let turn = assistant(provider.clone())
            .process_message_on(&[ChatMessage::user("Hello")], today())
            .await
            .unwrap();
        assert_eq!(turn.response, "Back again");
        assert_eq!(provider.call_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limit_waits_for_retry_after() {
        let provider = ScriptedProvider::new(vec![
            Err(ProviderError::RateLimited {
                retry_after: Some(Duration::from_secs(30)),
            }),
            Ok(r#"{"response": "Patience pays"}"#.to_string()),
        ]);
        let started = tokio::time::Instant::now();
        let turn = assistant(provider.clone())
            .process_message_on(&[ChatMessage::user("Hello")], today())
            .await
            .unwrap();

        assert_eq!(turn.response, "Patience pays");
        assert_eq!(provider.call_count(), 2);
        assert!(started.elapsed() >= Duration::from_secs(30));
    }

    #[test]
    fn test_parse_fenced_reply() {
        let turn = parse_reply("```json\n{\"response\": \"ok\", \"isComplete\": true}\n```").unwrap();
        assert!(turn.is_complete);

        let bare = parse_reply("  {\"response\": \"ok\"}  ").unwrap();
        assert_eq!(bare.response, "ok");
    }
}
