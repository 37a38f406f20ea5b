//! ModelClient trait: the abstraction over the text-generation backend.
//!
//! A client takes a system instruction plus one user prompt and returns the
//! raw text the model produced. Parsing that text is not its job.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ProviderError;

/// A single generation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRequest {
    /// The model to use (e.g., "gemini-2.5-flash")
    pub model: String,

    pub system_instruction: String,

    pub prompt: String,

    /// Temperature (0.0 = deterministic)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    /// Ask the provider for JSON-constrained output when it supports it.
    #[serde(default)]
    pub json_output: bool,
}

impl GenerateRequest {
    pub fn new(
        model: impl Into<String>,
        system_instruction: impl Into<String>,
        prompt: impl Into<String>,
    ) -> Self {
        Self {
            model: model.into(),
            system_instruction: system_instruction.into(),
            prompt: prompt.into(),
            temperature: None,
            json_output: true,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

/// Raw model output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub text: String,

    /// Which model actually responded (may differ from requested)
    pub model: String,

    pub usage: Option<Usage>,
}

/// Token usage information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// The core model client trait.
///
/// Implementations are built once at start-up and shared read-only across
/// requests, so they must be `Send + Sync`.
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// A human-readable name for this client (e.g., "gemini", "disabled").
    fn name(&self) -> &str;

    /// Whether this client can reach a backend at all.
    fn is_configured(&self) -> bool {
        true
    }

    /// Send one request, single attempt, and return the raw text.
    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse, ProviderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoClient;

    #[async_trait]
    impl ModelClient for EchoClient {
        fn name(&self) -> &str {
            "echo"
        }

        async fn generate(
            &self,
            request: GenerateRequest,
        ) -> Result<GenerateResponse, ProviderError> {
            Ok(GenerateResponse {
                text: request.prompt,
                model: request.model,
                usage: None,
            })
        }
    }

    #[test]
    fn request_defaults_to_json_output() {
        let req = GenerateRequest::new("gemini-2.5-flash", "sys", "hi");
        assert!(req.json_output);
        assert!(req.temperature.is_none());
        assert_eq!(req.with_temperature(0.2).temperature, Some(0.2));
    }

    #[tokio::test]
    async fn trait_objects_are_usable() {
        let client: std::sync::Arc<dyn ModelClient> = std::sync::Arc::new(EchoClient);
        assert!(client.is_configured());
        let resp = client
            .generate(GenerateRequest::new("m", "s", "ping"))
            .await
            .unwrap();
        assert_eq!(resp.text, "ping");
        assert_eq!(resp.model, "m");
    }
}
