//! Client selection: builds the single long-lived model client from config.

use std::sync::Arc;
use std::time::Duration;

use agendai_config::AppConfig;
use agendai_core::model::ModelClient;
use tracing::{info, warn};

use crate::disabled::DisabledClient;
use crate::gemini::GeminiClient;

/// Build the model client described by `config`.
///
/// Never fails: a missing key, or an HTTP client that cannot be built,
/// yields a [`DisabledClient`] so the service still starts.
pub fn build_from_config(config: &AppConfig) -> Arc<dyn ModelClient> {
    let Some(api_key) = config.api_key.as_deref().filter(|k| !k.trim().is_empty()) else {
        warn!("GEMINI_API_KEY not found; model client disabled, analyses will report a provider error");
        return Arc::new(DisabledClient::new("GEMINI_API_KEY not set"));
    };

    match GeminiClient::new(api_key, Duration::from_secs(config.timeout_secs)) {
        Ok(client) => {
            info!(model = %config.model, timeout_secs = config.timeout_secs, "Gemini client ready");
            Arc::new(client.with_base_url(&config.api_url))
        }
        Err(e) => {
            warn!(error = %e, "Gemini client could not be built; model client disabled");
            Arc::new(DisabledClient::new(e.to_string()))
        }
    }
}
