//! Google Gemini provider implementation.
//!
//! Uses the `generateContent` REST endpoint directly.
//!
//! Features:
//! - `x-goog-api-key` header authentication
//! - System instruction as a top-level `systemInstruction` field
//! - JSON-constrained output via `generationConfig.responseMimeType`
//! - Client-side timeout, reported as `ProviderError::Timeout`

use std::time::Duration;

use agendai_core::error::ProviderError;
use agendai_core::model::{GenerateRequest, GenerateResponse, ModelClient, Usage};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Gemini `generateContent` client.
pub struct GeminiClient {
    base_url: String,
    api_key: String,
    timeout: Duration,
    client: reqwest::Client,
}

impl GeminiClient {
    /// Create a new Gemini client with a per-request timeout.
    pub fn new(api_key: impl Into<String>, timeout: Duration) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProviderError::Network(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            base_url: DEFAULT_BASE_URL.into(),
            api_key: api_key.into(),
            timeout,
            client,
        })
    }

    /// Create with a custom base URL (e.g., for testing or proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, model)
    }

    /// Build the `generateContent` request body.
    fn request_body(request: &GenerateRequest) -> serde_json::Value {
        let mut generation_config = serde_json::Map::new();
        if request.json_output {
            generation_config.insert("responseMimeType".into(), "application/json".into());
        }
        if let Some(t) = request.temperature {
            generation_config.insert("temperature".into(), serde_json::json!(t));
        }

        let mut body = serde_json::json!({
            "contents": [
                { "role": "user", "parts": [ { "text": request.prompt } ] }
            ],
        });

        if !request.system_instruction.is_empty() {
            body["systemInstruction"] = serde_json::json!({
                "parts": [ { "text": request.system_instruction } ]
            });
        }

        if !generation_config.is_empty() {
            body["generationConfig"] = serde_json::Value::Object(generation_config);
        }

        body
    }

    /// Pull the text of the first candidate out of a decoded response.
    fn into_response(
        api: ApiResponse,
        requested_model: &str,
    ) -> Result<GenerateResponse, ProviderError> {
        let Some(candidate) = api.candidates.into_iter().next() else {
            let reason = api
                .prompt_feedback
                .and_then(|f| f.block_reason)
                .unwrap_or_else(|| "no candidates".into());
            return Err(ProviderError::EmptyResponse(reason));
        };

        let text: String = candidate
            .content
            .map(|c| {
                c.parts
                    .into_iter()
                    .filter(|p| !p.thought)
                    .filter_map(|p| p.text)
                    .collect()
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            let reason = candidate
                .finish_reason
                .unwrap_or_else(|| "empty candidate".into());
            return Err(ProviderError::EmptyResponse(reason));
        }

        let usage = api.usage_metadata.map(|u| Usage {
            prompt_tokens: u.prompt_token_count,
            completion_tokens: u.candidates_token_count,
            total_tokens: u.total_token_count,
        });

        Ok(GenerateResponse {
            text,
            model: api.model_version.unwrap_or_else(|| requested_model.to_string()),
            usage,
        })
    }

    fn map_transport_error(&self, e: reqwest::Error) -> ProviderError {
        if e.is_timeout() {
            ProviderError::Timeout {
                secs: self.timeout.as_secs(),
            }
        } else {
            ProviderError::Network(e.to_string())
        }
    }
}

#[async_trait]
impl ModelClient for GeminiClient {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse, ProviderError> {
        let url = self.endpoint(&request.model);
        let body = Self::request_body(&request);

        debug!(model = %request.model, prompt_len = request.prompt.len(), "Sending generateContent request");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status().as_u16();

        if status == 429 {
            return Err(ProviderError::RateLimited);
        }

        if status == 401 || status == 403 {
            return Err(ProviderError::AuthenticationFailed(
                "Invalid API key or insufficient permissions".into(),
            ));
        }

        if !(200..300).contains(&status) {
            let error_body = response.text().await.unwrap_or_default();
            warn!(status, body = %error_body, "Provider returned error");
            return Err(ProviderError::ApiError {
                status_code: status,
                message: error_body,
            });
        }

        let api_response: ApiResponse = response
            .json()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    self.map_transport_error(e)
                } else {
                    ProviderError::ApiError {
                        status_code: status,
                        message: format!("Failed to parse response: {e}"),
                    }
                }
            })?;

        Self::into_response(api_response, &request.model)
    }
}

// --- Gemini API types (internal) ---

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiResponse {
    #[serde(default)]
    candidates: Vec<ApiCandidate>,
    #[serde(default)]
    prompt_feedback: Option<ApiPromptFeedback>,
    #[serde(default)]
    usage_metadata: Option<ApiUsage>,
    #[serde(default)]
    model_version: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiCandidate {
    #[serde(default)]
    content: Option<ApiContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiContent {
    #[serde(default)]
    parts: Vec<ApiPart>,
}

#[derive(Debug, Deserialize)]
struct ApiPart {
    #[serde(default)]
    text: Option<String>,
    /// Thinking-model summaries, not part of the answer.
    #[serde(default)]
    thought: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiPromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiUsage {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
    #[serde(default)]
    total_token_count: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::spawn_fake;
    use std::sync::atomic::Ordering;

    fn client() -> GeminiClient {
        GeminiClient::new("test-key", Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn endpoint_includes_model() {
        let c = client().with_base_url("http://localhost:9999/");
        assert_eq!(
            c.endpoint("gemini-2.5-flash"),
            "http://localhost:9999/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn request_body_asks_for_json() {
        let req = GenerateRequest::new("gemini-2.5-flash", "be terse", "rank these").with_temperature(0.3);
        let body = GeminiClient::request_body(&req);
        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(body["systemInstruction"]["parts"][0]["text"], "be terse");
        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "rank these");
        assert!((body["generationConfig"]["temperature"].as_f64().unwrap() - 0.3).abs() < 1e-6);
    }

    #[test]
    fn request_body_without_json_or_system() {
        let mut req = GenerateRequest::new("m", "", "hi");
        req.json_output = false;
        let body = GeminiClient::request_body(&req);
        assert!(body.get("systemInstruction").is_none());
        assert!(body.get("generationConfig").is_none());
    }

    #[test]
    fn parse_candidate_text_and_usage() {
        let data = r#"{
            "candidates": [{
                "content": {"parts": [
                    {"text": "thinking...", "thought": true},
                    {"text": "{\"a\":"},
                    {"text": "1}"}
                ], "role": "model"},
                "finishReason": "STOP"
            }],
            "usageMetadata": {"promptTokenCount": 12, "candidatesTokenCount": 4, "totalTokenCount": 16},
            "modelVersion": "gemini-2.5-flash-001"
        }"#;
        let api: ApiResponse = serde_json::from_str(data).unwrap();
        let resp = GeminiClient::into_response(api, "gemini-2.5-flash").unwrap();
        assert_eq!(resp.text, "{\"a\":1}");
        assert_eq!(resp.model, "gemini-2.5-flash-001");
        assert_eq!(resp.usage.unwrap().total_tokens, 16);
    }

    #[test]
    fn blocked_prompt_is_empty_response() {
        let data = r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#;
        let api: ApiResponse = serde_json::from_str(data).unwrap();
        let err = GeminiClient::into_response(api, "m").unwrap_err();
        assert!(matches!(err, ProviderError::EmptyResponse(ref r) if r == "SAFETY"));
    }

    #[test]
    fn candidate_without_text_is_empty_response() {
        let data = r#"{"candidates": [{"finishReason": "MAX_TOKENS"}]}"#;
        let api: ApiResponse = serde_json::from_str(data).unwrap();
        let err = GeminiClient::into_response(api, "m").unwrap_err();
        assert!(err.to_string().contains("MAX_TOKENS"));
    }

    #[tokio::test]
    async fn generate_round_trip_against_fake_server() {
        let reply = serde_json::json!({
            "candidates": [{"content": {"parts": [{"text": "{\"lista_ordenada\": []}"}]}}]
        });
        let (base, hits) = spawn_fake(200, reply).await;
        let c = client().with_base_url(base);

        let resp = c
            .generate(GenerateRequest::new("gemini-2.5-flash", "sys", "prompt"))
            .await
            .unwrap();

        assert_eq!(resp.text, "{\"lista_ordenada\": []}");
        assert_eq!(resp.model, "gemini-2.5-flash");
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn server_error_maps_to_api_error() {
        let (base, hits) = spawn_fake(500, serde_json::json!({"error": "boom"})).await;
        let c = client().with_base_url(base);

        let err = c
            .generate(GenerateRequest::new("gemini-2.5-flash", "sys", "prompt"))
            .await
            .unwrap_err();

        assert!(matches!(err, ProviderError::ApiError { status_code: 500, .. }));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn forbidden_maps_to_authentication_failure() {
        let (base, _) = spawn_fake(403, serde_json::json!({})).await;
        let err = client()
            .with_base_url(base)
            .generate(GenerateRequest::new("m", "s", "p"))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::AuthenticationFailed(_)));
    }

    #[tokio::test]
    async fn unreachable_host_is_network_error() {
        let err = client()
            .with_base_url("http://127.0.0.1:1")
            .generate(GenerateRequest::new("m", "s", "p"))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Network(_) | ProviderError::Timeout { .. }));
    }
}
