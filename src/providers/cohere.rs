//! Cohere chat HTTP provider.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::env;

use super::provider::{Provider, ProviderError, Result};

/// Upper bound on generated reply size, matching the relay's needs.
const MAX_REPLY_TOKENS: u32 = 200;

pub struct CohereProvider {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    default_model: String,
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    message: String,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct ChatResponse {
    text: Option<String>,
}

impl CohereProvider {
    pub fn new() -> Self {
        let api_key = env::var("CO_API_KEY")
            .or_else(|_| env::var("COHERE_API_KEY"))
            .ok();

        Self {
            client: Client::new(),
            api_key,
            base_url: "https://api.cohere.com/v1".to_string(),
            default_model: "command".to_string(),
        }
    }

    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            ..Self::new()
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn get_api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .ok_or_else(|| ProviderError::NotAvailable("CO_API_KEY not set".to_string()))
    }
}

impl Default for CohereProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Provider for CohereProvider {
    fn name(&self) -> &str {
        "cohere"
    }

    async fn is_available(&self) -> bool {
        self.api_key.is_some()
    }

    async fn complete(&self, prompt: &str, model: Option<&str>) -> Result<String> {
        let api_key = self.get_api_key()?;
        let model = model.unwrap_or(&self.default_model);

        let request = ChatRequest {
            model: model.to_string(),
            message: prompt.to_string(),
            max_tokens: MAX_REPLY_TOKENS,
        };

        let response = self
            .client
            .post(format!("{}/chat", self.base_url))
            .header("Authorization", format!("Bearer {}", api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(ProviderError::ApiError(format!("HTTP {}: {}", status, text)));
        }

        let chat_response: ChatResponse = response.json().await?;

        Ok(chat_response.text.unwrap_or_default())
    }

    fn default_model(&self) -> Option<&str> {
        Some(&self.default_model)
    }
}
