//! The structured analysis a model returns, and the error record that
//! replaces it when any stage fails.

use serde::{Deserialize, Serialize};

/// One entry of the prioritized task list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RankedTask {
    #[serde(rename = "titulo")]
    pub title: String,

    /// Free-form label chosen by the model ("alta", "1", ...).
    #[serde(rename = "prioridade", default)]
    pub priority: String,

    #[serde(rename = "motivo", default)]
    pub rationale: String,
}

/// Suggested split of a large task into smaller steps.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubTaskBreakdown {
    #[serde(rename = "tarefa_original")]
    pub task_title: String,

    #[serde(rename = "sub_tarefas", default)]
    pub steps: Vec<String>,
}

/// Normalized model output.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    #[serde(rename = "lista_ordenada", default)]
    pub ordered_tasks: Vec<RankedTask>,

    #[serde(rename = "motivo_ordem", default)]
    pub ordering_rationale: String,

    #[serde(rename = "recomendacoes", default)]
    pub recommendations: String,

    #[serde(rename = "primeira_tarefa", default)]
    pub first_task: String,

    #[serde(rename = "sugestoes", default)]
    pub suggestions: String,

    #[serde(
        rename = "sub_tarefas_sugeridas",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub sub_tasks: Vec<SubTaskBreakdown>,

    /// Plain-text narrative summary.
    #[serde(rename = "relatorio", default)]
    pub report: String,
}

impl AnalysisResult {
    /// Titles of the ordered list, in model order.
    pub fn ordered_titles(&self) -> Vec<&str> {
        self.ordered_tasks.iter().map(|t| t.title.as_str()).collect()
    }
}

/// Short classification of a failed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    #[serde(rename = "validation_error")]
    Validation,
    #[serde(rename = "provider_error")]
    Provider,
    #[serde(rename = "invalid_format")]
    InvalidFormat,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "validation_error",
            ErrorKind::Provider => "provider_error",
            ErrorKind::InvalidFormat => "invalid_format",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error record returned in place of an [`AnalysisResult`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResult {
    #[serde(rename = "error")]
    pub kind: ErrorKind,

    #[serde(rename = "detalhe")]
    pub detail: String,
}

impl ErrorResult {
    pub fn new(kind: ErrorKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_result_wire_shape() {
        let err = ErrorResult::new(ErrorKind::InvalidFormat, "bad json");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["error"], "invalid_format");
        assert_eq!(json["detalhe"], "bad json");
    }

    #[test]
    fn empty_sub_tasks_are_omitted() {
        let json = serde_json::to_value(AnalysisResult::default()).unwrap();
        assert!(json.get("sub_tarefas_sugeridas").is_none());
        assert!(json.get("lista_ordenada").unwrap().as_array().unwrap().is_empty());
    }

    #[test]
    fn ordered_titles_follow_model_order() {
        let result = AnalysisResult {
            ordered_tasks: vec![
                RankedTask {
                    title: "B".into(),
                    ..RankedTask::default()
                },
                RankedTask {
                    title: "A".into(),
                    ..RankedTask::default()
                },
            ],
            ..AnalysisResult::default()
        };
        assert_eq!(result.ordered_titles(), vec!["B", "A"]);
    }
}
