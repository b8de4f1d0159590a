//! Reply cache.
//!
//! Identical conversations (same model, same messages) are answered from
//! memory instead of calling the provider again.

use moka::future::Cache;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::time::Duration;

use prelegal_core::ExtractionTurn;

use crate::providers::ChatMessage;

/// Cache key for one conversation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ConversationKey(u64);

impl ConversationKey {
    pub fn new(model: &str, messages: &[ChatMessage]) -> Self {
        let mut hasher = DefaultHasher::new();
        model.hash(&mut hasher);
        messages.hash(&mut hasher);
        Self(hasher.finish())
    }
}

pub struct TurnCache {
    cache: Cache<ConversationKey, ExtractionTurn>,
}

impl TurnCache {
    pub fn new(max_entries: u64, ttl: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_entries)
            .time_to_live(ttl)
            .build();

        Self { cache }
    }

    pub async fn get(&self, key: &ConversationKey) -> Option<ExtractionTurn> {
        self.cache.get(key).await
    }

    pub async fn insert(&self, key: ConversationKey, turn: ExtractionTurn) {
        self.cache.insert(key, turn).await;
    }
}

impl Default for TurnCache {
    fn default() -> Self {
        Self::new(1_000, Duration::from_secs(3600))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_cache_operations() {
        let cache = TurnCache::default();
        let messages = vec![ChatMessage::user("I need an NDA")];
        let key = ConversationKey::new("m", &messages);

        assert!(cache.get(&key).await.is_none());

        cache.insert(key, ExtractionTurn::reply("Sure")).await;
        let cached = cache.get(&key).await.unwrap();
        assert_eq!(cached.response, "Sure");
    }

    #[test]
    fn test_key_depends_on_model_and_history() {
        let a = vec![ChatMessage::user("hi")];
        let b = vec![ChatMessage::user("hi"), ChatMessage::assistant("hello")];

        assert_eq!(ConversationKey::new("m", &a), ConversationKey::new("m", &a));
        assert_ne!(ConversationKey::new("m", &a), ConversationKey::new("m", &b));
        assert_ne!(ConversationKey::new("m", &a), ConversationKey::new("n", &a));
    }
}
