//! A model client that refuses every call.
//!
//! Used when no credential is configured so the service still starts and
//! answers with a provider error instead of crashing.

use agendai_core::error::ProviderError;
use agendai_core::model::{GenerateRequest, GenerateResponse, ModelClient};
use async_trait::async_trait;

pub struct DisabledClient {
    reason: String,
}

impl DisabledClient {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl ModelClient for DisabledClient {
    fn name(&self) -> &str {
        "disabled"
    }

    fn is_configured(&self) -> bool {
        false
    }

    async fn generate(&self, _request: GenerateRequest) -> Result<GenerateResponse, ProviderError> {
        Err(ProviderError::NotConfigured(self.reason.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn every_call_is_not_configured() {
        let client = DisabledClient::new("GEMINI_API_KEY not set");
        assert!(!client.is_configured());

        for _ in 0..3 {
            let err = client
                .generate(GenerateRequest::new("m", "s", "p"))
                .await
                .unwrap_err();
            assert!(matches!(err, ProviderError::NotConfigured(ref r) if r == "GEMINI_API_KEY not set"));
        }
    }
}
