//! AI provider trait for whatsrelay.

use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Provider not available: {0}")]
    NotAvailable(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, ProviderError>;

/// AI provider trait.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Provider name.
    fn name(&self) -> &str;

    /// Check if the provider is available (API key configured).
    async fn is_available(&self) -> bool;

    /// Complete a prompt.
    async fn complete(&self, prompt: &str, model: Option<&str>) -> Result<String>;

    /// Get the default model.
    fn default_model(&self) -> Option<&str>;
}
