//! # prelegal-runtime
//!
//! Conversational drafting on top of `prelegal-core`.
//!
//! This crate owns everything with side effects: the chat provider, the
//! reply cache, usage accounting and the per-user document store. The core
//! crate stays pure and never makes LLM calls.
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use prelegal_core::DraftSession;
//! use prelegal_runtime::{ChatMessage, DraftingAssistant, OpenRouterProvider, RuntimeConfig};
//!
//! let config = RuntimeConfig::default();
//! let provider = Arc::new(OpenRouterProvider::from_config(&config, None)?);
//! let assistant = DraftingAssistant::new(provider, config);
//!
//! let history = vec![ChatMessage::user("I need an NDA with Acme")];
//! let turn = assistant.process_message(&history).await?;
//! let session = DraftSession::new().apply_turn(&turn);
//! ```

pub mod assistant;
pub mod cache;
pub mod config;
pub mod prompts;
pub mod providers;
pub mod store;
pub mod usage;

pub use assistant::{parse_reply, AssistantError, DraftingAssistant};
pub use cache::{ConversationKey, TurnCache};
pub use config::{CacheConfig, ConfigError, RuntimeConfig};
pub use providers::{
    ApiCredential, ChatMessage, CompletionConfig, CompletionResponse, CredentialSource,
    LlmProvider, ProviderError, Role, TokenUsage,
};
pub use store::{DocumentId, DocumentRecord, DocumentStore, DocumentSummary, StoreError, UserId};
pub use usage::{UsageSummary, UsageTracker};

#[cfg(feature = "openrouter")]
pub use providers::OpenRouterProvider;
