//! Generative-model backends.
//!
//! Defines the [`GenerativeModel`] trait so the analysis gateway can be wired to
//! Gemini, OpenRouter, or a test double without knowing which.

pub mod gemini;
pub mod openrouter;

use std::sync::Arc;

use tracing::info;

use crate::config::AppConfig;
use gemini::GeminiClient;
use openrouter::OpenRouterClient;

/// Async trait implemented by each model backend: one prompt in, raw text out.
#[async_trait::async_trait]
pub trait GenerativeModel: Send + Sync {
    fn name(&self) -> &str;
    async fn generate(&self, prompt: &str) -> anyhow::Result<String>;
}

/// Pick a backend from the configured credentials. Gemini wins when both are
/// set; `None` means the service runs on the offline fallback.
pub fn from_config(config: &AppConfig) -> Option<Arc<dyn GenerativeModel>> {
    let client = reqwest::Client::new();

    if let Some(key) = &config.gemini_api_key {
        info!("Using Gemini model {}", config.gemini_model);
        return Some(Arc::new(GeminiClient::new(
            client,
            key.clone(),
            config.gemini_model.clone(),
        )));
    }

    if let Some(key) = &config.openrouter_api_key {
        info!("Using OpenRouter model {}", config.openrouter_model);
        return Some(Arc::new(
            OpenRouterClient::new(client, key.clone()).with_model(config.openrouter_model.clone()),
        ));
    }

    info!("No model credential configured, analysis will use the offline fallback");
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_credentials_means_no_model() {
        let config = AppConfig::default();
        assert!(from_config(&config).is_none());
    }

    #[test]
    fn test_gemini_preferred_over_openrouter() {
        let config = AppConfig {
            gemini_api_key: Some("g-key".to_string()),
            openrouter_api_key: Some("or-key".to_string()),
            ..AppConfig::default()
        };
        let model = from_config(&config).unwrap();
        assert_eq!(model.name(), "gemini");
    }

    #[test]
    fn test_openrouter_when_only_key() {
        let config = AppConfig {
            openrouter_api_key: Some("or-key".to_string()),
            ..AppConfig::default()
        };
        let model = from_config(&config).unwrap();
        assert_eq!(model.name(), "openrouter");
    }
}
