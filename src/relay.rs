//! AI relay: turns an inbound chat message plus per-user instructions into
//! reply text.
//!
//! This call never fails past its boundary: endpoint errors and empty
//! responses degrade to fixed sentinel strings so a broken provider cannot
//! take a messaging session down with it.

use std::sync::Arc;

use crate::providers::Provider;

/// Returned for empty/whitespace-only inbound bodies, without touching the
/// provider.
pub const NO_MESSAGE_SENTINEL: &str = "No message received";

/// Returned when the provider answers with an empty body.
pub const NO_REPLY_SENTINEL: &str = "No reply generated";

/// Returned when the provider call fails.
pub const ERROR_SENTINEL: &str = "Error generating reply";

/// Relay over a configured text-generation provider.
pub struct AiRelay {
    provider: Arc<dyn Provider>,
}

impl AiRelay {
    pub fn new(provider: Arc<dyn Provider>) -> Self {
        Self { provider }
    }

    /// Generate a reply for `message`, steering the model with the user's
    /// stored `instructions`.
    pub async fn generate_reply(&self, message: &str, instructions: &str) -> String {
        if message.trim().is_empty() {
            return NO_MESSAGE_SENTINEL.to_string();
        }

        let prompt = format!("{}\nUser: {}", instructions, message);

        match self.provider.complete(&prompt, None).await {
            Ok(text) if !text.is_empty() => text,
            Ok(_) => NO_REPLY_SENTINEL.to_string(),
            Err(e) => {
                tracing::error!("Provider {} chat error: {}", self.provider.name(), e);
                ERROR_SENTINEL.to_string()
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::providers::provider::{ProviderError, Result};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Scripted provider that counts completions.
    pub(crate) struct ScriptedProvider {
        pub calls: AtomicUsize,
        pub response: Result<String>,
    }

    impl ScriptedProvider {
        pub fn replying(text: &str) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                response: Ok(text.to_string()),
            }
        }

        pub fn failing(reason: &str) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                response: Err(ProviderError::ApiError(reason.to_string())),
            }
        }

        pub fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Provider for ScriptedProvider {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn is_available(&self) -> bool {
            true
        }

        async fn complete(&self, _prompt: &str, _model: Option<&str>) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.response {
                Ok(text) => Ok(text.clone()),
                Err(ProviderError::ApiError(reason)) => {
                    Err(ProviderError::ApiError(reason.clone()))
                }
                Err(_) => Err(ProviderError::Other("scripted".to_string())),
            }
        }

        fn default_model(&self) -> Option<&str> {
            None
        }
    }

    #[tokio::test]
    async fn blank_message_short_circuits() {
        let provider = Arc::new(ScriptedProvider::replying("hi"));
        let relay = AiRelay::new(provider.clone());

        assert_eq!(relay.generate_reply("   ", "").await, NO_MESSAGE_SENTINEL);
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn returns_provider_text_verbatim() {
        let provider = Arc::new(ScriptedProvider::replying("Sure, 3pm works."));
        let relay = AiRelay::new(provider.clone());

        let reply = relay.generate_reply("Does 3pm work?", "Be brief.").await;
        assert_eq!(reply, "Sure, 3pm works.");
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn empty_response_yields_sentinel() {
        let provider = Arc::new(ScriptedProvider::replying(""));
        let relay = AiRelay::new(provider);

        assert_eq!(relay.generate_reply("hello", "").await, NO_REPLY_SENTINEL);
    }

    #[tokio::test]
    async fn endpoint_failure_yields_sentinel() {
        let provider = Arc::new(ScriptedProvider::failing("boom"));
        let relay = AiRelay::new(provider.clone());

        assert_eq!(relay.generate_reply("hello", "").await, ERROR_SENTINEL);
        assert_eq!(provider.call_count(), 1);
    }
}
