//! Error types for the Agendai domain.
//!
//! Uses `thiserror` for ergonomic error definitions. Provider failures have
//! their own enum; [`AnalysisError`] is the taxonomy the request pipeline
//! reports to callers.

use thiserror::Error;

use crate::analysis::{ErrorKind, ErrorResult};

/// Failures talking to the text-generation backend.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out after {secs}s")]
    Timeout { secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Rate limited by provider")]
    RateLimited,

    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Provider returned no usable content: {0}")]
    EmptyResponse(String),
}

/// Everything that can stop an analysis request.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Invalid task input: {0}")]
    Validation(String),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("Model response is not valid JSON: {detail}")]
    Format { detail: String },
}

impl AnalysisError {
    /// The short classification exposed to callers.
    pub fn kind(&self) -> ErrorKind {
        match self {
            AnalysisError::Validation(_) => ErrorKind::Validation,
            AnalysisError::Provider(_) => ErrorKind::Provider,
            AnalysisError::Format { .. } => ErrorKind::InvalidFormat,
        }
    }

    /// Collapse into the uniform error record.
    pub fn into_error_result(self) -> ErrorResult {
        let kind = self.kind();
        let detail = match self {
            AnalysisError::Validation(msg) => msg,
            AnalysisError::Provider(e) => e.to_string(),
            AnalysisError::Format { detail } => detail,
        };
        ErrorResult { kind, detail }
    }
}

/// Result type alias for the analysis pipeline.
pub type Result<T> = std::result::Result<T, AnalysisError>;
