//! LLM provider factory.
//!
//! Builds a chat completion client from the provider name, resolving the
//! endpoint and API key the caller already looked up.

use crate::client::LlmClient;
use crate::providers::openai::{OpenAiClient, DEFAULT_BASE_URL};
use podium_core::{AppError, AppResult};
use std::sync::Arc;
use std::time::Duration;

/// Create an LLM client based on the provider name.
///
/// # Arguments
/// * `provider` - Provider identifier ("openai")
/// * `endpoint` - Optional custom base URL
/// * `api_key` - API key (required by OpenAI)
/// * `timeout` - Per-request timeout applied by the HTTP client
///
/// # Errors
/// Returns `AppError::Config` if the provider is unknown or the API key is
/// missing.
pub fn create_client(
    provider: &str,
    endpoint: Option<&str>,
    api_key: Option<&str>,
    timeout: Duration,
) -> AppResult<Arc<dyn LlmClient>> {
    match provider.to_lowercase().as_str() {
        "openai" => {
            let api_key = api_key.ok_or_else(|| {
                AppError::Config("OpenAI provider requires API key".to_string())
            })?;
            let base_url = endpoint.unwrap_or(DEFAULT_BASE_URL);
            tracing::debug!("Creating OpenAI chat client for {}", base_url);
            Ok(Arc::new(OpenAiClient::with_base_url(
                base_url, api_key, timeout,
            )?))
        }
        _ => Err(AppError::Config(format!("Unknown provider: {}", provider))),
    }
}
