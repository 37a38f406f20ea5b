//! The analysis pipeline: validate, gather the agenda, prompt, call the
//! model, normalize.
//!
//! Two early exits: invalid input never reaches the model, and a provider
//! failure never reaches the normalizer.

use std::sync::Arc;
use std::time::Duration;

use agendai_config::AppConfig;
use agendai_core::{
    AnalysisError, AnalysisResult, CalendarSource, ErrorResult, GenerateRequest, ModelClient,
    ProviderError, TaskInput, validate_tasks,
};
use serde::{Deserialize, Serialize};
use tracing::{Instrument, debug, info, info_span, warn};
use uuid::Uuid;

use crate::normalize::normalize;
use crate::prompt::PromptBuilder;
use crate::report::{EMPTY_TASKS_REPORT, FAILURE_REPORT};

/// Attached when the model ranked none of a non-empty task list.
pub const DEGRADED_WARNING: &str =
    "A IA retornou uma análise vazia para uma lista de tarefas não vazia.";

/// Body of `POST /analisar`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(rename = "tarefas")]
    pub tasks: Vec<TaskInput>,

    /// Replaces the calendar source when present, even if empty.
    #[serde(
        rename = "compromissos_fixos",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub fixed_commitments: Option<Vec<String>>,
}

/// Either the analysis or the error that replaced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AnalysisPayload {
    Success(AnalysisResult),
    Failure(ErrorResult),
}

/// The reply envelope.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisOutcome {
    #[serde(rename = "analise")]
    pub analysis: AnalysisPayload,

    #[serde(rename = "relatorio")]
    pub report: String,

    #[serde(rename = "aviso", skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl AnalysisOutcome {
    pub fn success(analysis: AnalysisResult) -> Self {
        Self {
            report: analysis.report.clone(),
            analysis: AnalysisPayload::Success(analysis),
            warning: None,
        }
    }

    pub fn failure(error: AnalysisError) -> Self {
        Self {
            analysis: AnalysisPayload::Failure(error.into_error_result()),
            report: FAILURE_REPORT.to_string(),
            warning: None,
        }
    }

    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warning = Some(warning.into());
        self
    }

    pub fn is_success(&self) -> bool {
        matches!(self.analysis, AnalysisPayload::Success(_))
    }

    pub fn error(&self) -> Option<&ErrorResult> {
        match &self.analysis {
            AnalysisPayload::Failure(e) => Some(e),
            AnalysisPayload::Success(_) => None,
        }
    }
}

/// Runs analysis requests. Cheap to share behind an `Arc`.
pub struct AnalysisService {
    client: Arc<dyn ModelClient>,
    calendar: Arc<dyn CalendarSource>,
    model: String,
    temperature: f32,
    timeout: Duration,
}

impl AnalysisService {
    pub fn new(client: Arc<dyn ModelClient>, calendar: Arc<dyn CalendarSource>) -> Self {
        let defaults = AppConfig::default();
        Self {
            client,
            calendar,
            model: defaults.model,
            temperature: defaults.temperature,
            timeout: Duration::from_secs(defaults.timeout_secs),
        }
    }

    pub fn from_config(
        config: &AppConfig,
        client: Arc<dyn ModelClient>,
        calendar: Arc<dyn CalendarSource>,
    ) -> Self {
        Self::new(client, calendar)
            .with_model(&config.model)
            .with_temperature(config.temperature)
            .with_timeout(Duration::from_secs(config.timeout_secs))
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn client(&self) -> &Arc<dyn ModelClient> {
        &self.client
    }

    pub fn calendar(&self) -> &Arc<dyn CalendarSource> {
        &self.calendar
    }

    /// Run one request and always produce an envelope.
    pub async fn analyze(&self, request: AnalyzeRequest) -> AnalysisOutcome {
        let span = info_span!("analyze", request_id = %Uuid::new_v4());
        async {
            match self.try_analyze(request).await {
                Ok(outcome) => outcome,
                Err(e) => {
                    warn!(kind = %e.kind(), error = %e, "Analysis failed");
                    AnalysisOutcome::failure(e)
                }
            }
        }
        .instrument(span)
        .await
    }

    /// Run one request, surfacing the failing stage as an error.
    pub async fn try_analyze(
        &self,
        request: AnalyzeRequest,
    ) -> Result<AnalysisOutcome, AnalysisError> {
        let tasks = validate_tasks(request.tasks)?;

        if tasks.is_empty() {
            debug!("Empty task list, skipping the model");
            return Ok(AnalysisOutcome::success(AnalysisResult {
                report: EMPTY_TASKS_REPORT.to_string(),
                ..AnalysisResult::default()
            }));
        }

        let (events, commitments) = match request.fixed_commitments {
            Some(commitments) => (Vec::new(), commitments),
            None => (self.calendar.list_events().await, Vec::new()),
        };
        info!(
            tasks = tasks.len(),
            events = events.len(),
            commitments = commitments.len(),
            calendar = self.calendar.name(),
            "Analyzing tasks"
        );

        let prompt = PromptBuilder::new(&tasks)
            .events(&events)
            .commitments(&commitments)
            .build();
        let generate = GenerateRequest::new(&self.model, prompt.system_instruction, prompt.user_prompt)
            .with_temperature(self.temperature);

        let response = match tokio::time::timeout(self.timeout, self.client.generate(generate)).await
        {
            Ok(result) => result?,
            Err(_) => {
                return Err(ProviderError::Timeout {
                    secs: self.timeout.as_secs(),
                }
                .into());
            }
        };
        debug!(model = %response.model, chars = response.text.len(), "Model answered");

        let normalized = normalize(&response.text)?;

        let returned: Vec<&str> = normalized.analysis.ordered_titles();
        let dropped = tasks
            .iter()
            .filter(|t| !returned.contains(&t.title.as_str()))
            .count();
        if dropped > 0 || returned.len() != tasks.len() {
            warn!(
                expected = tasks.len(),
                returned = returned.len(),
                dropped,
                "Model list does not match the submitted tasks"
            );
        }

        let degraded = normalized.is_degraded();
        let outcome = AnalysisOutcome::success(normalized.analysis);
        if degraded {
            warn!(missing = ?normalized.missing_keys, "Model returned an empty analysis");
            return Ok(outcome.with_warning(DEGRADED_WARNING));
        }
        Ok(outcome)
    }
}
