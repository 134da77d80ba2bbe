//! AI providers module.

use std::sync::Arc;

pub mod cohere;
pub mod provider;

pub use provider::{Provider, ProviderError, Result};

use crate::config::Settings;

/// Provider factory. Unknown names fall back to the Cohere backend.
pub fn create_provider(name: &str, settings: &Settings) -> Arc<dyn Provider> {
    if name != "cohere" {
        tracing::warn!("Unknown provider '{}', falling back to cohere", name);
    }

    let mut provider = if let Some(key) = &settings.models.cohere.api_key {
        cohere::CohereProvider::with_api_key(key.clone())
    } else {
        cohere::CohereProvider::new()
    };
    if let Some(url) = &settings.models.cohere.base_url {
        provider = provider.with_base_url(url.clone());
    }
    Arc::new(provider)
}

/// Get the current provider from settings.
pub fn get_current_provider(settings: &Settings) -> Arc<dyn Provider> {
    create_provider(&settings.models.provider, settings)
}
