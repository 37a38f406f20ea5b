//! Response normalization.
//!
//! Turns the raw model text into an [`AnalysisResult`] or a classified
//! `invalid_format` error. The model is not trusted: every key is read on
//! its own, wrong shapes fall back to defaults, and the keys that had to be
//! defaulted are reported back to the caller.

use agendai_core::{AnalysisError, AnalysisResult, RankedTask, SubTaskBreakdown};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::report;

/// Top-level keys a complete answer carries. `sub_tarefas_sugeridas` is optional.
pub const REQUIRED_KEYS: [&str; 6] = [
    "lista_ordenada",
    "motivo_ordem",
    "recomendacoes",
    "primeira_tarefa",
    "sugestoes",
    "relatorio",
];

/// Characters of model text quoted in an `invalid_format` detail.
const EXCERPT_CHARS: usize = 200;

/// A parsed model answer.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    pub analysis: AnalysisResult,
    /// Same as `analysis.report`, kept apart for callers that only need the text.
    pub report: String,
    /// Required keys that were absent or had an unusable shape.
    pub missing_keys: Vec<&'static str>,
}

impl Normalized {
    /// True when none of the required keys were usable.
    pub fn is_empty(&self) -> bool {
        self.missing_keys.len() == REQUIRED_KEYS.len()
    }

    /// True when the answer ranks nothing: no keys at all, or an empty
    /// `lista_ordenada`. Only meaningful for a non-empty task list.
    pub fn is_degraded(&self) -> bool {
        self.is_empty() || self.analysis.ordered_tasks.is_empty()
    }
}

/// Remove a surrounding Markdown code fence, if any.
///
/// The language tag may be glued to the payload (`` ```json{ ``) and anything
/// after the last closing fence is dropped. A leading byte-order mark is
/// ignored.
pub fn strip_fences(raw: &str) -> &str {
    let text = raw.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}');
    let Some(body) = text.strip_prefix("```") else {
        return text;
    };

    let body = body.trim_start_matches(|c: char| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    let body = match body.rfind("```") {
        Some(end) => &body[..end],
        None => body,
    };
    body.trim()
}

/// Parse and validate raw model text.
pub fn normalize(raw: &str) -> Result<Normalized, AnalysisError> {
    let text = strip_fences(raw);

    let object = match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(map)) => map,
        Ok(other) => {
            warn!(raw = %raw, "Model answered with JSON that is not an object");
            return Err(format_error(
                format!("expected a JSON object, got {}", json_type(&other)),
                text,
            ));
        }
        Err(e) => {
            warn!(raw = %raw, error = %e, "Model answer is not valid JSON");
            return Err(format_error(e.to_string(), text));
        }
    };

    let mut missing = Vec::new();
    let mut analysis = AnalysisResult {
        ordered_tasks: read_ranked(&object, &mut missing),
        ordering_rationale: read_text(&object, "motivo_ordem", &mut missing),
        recommendations: read_text(&object, "recomendacoes", &mut missing),
        first_task: read_text(&object, "primeira_tarefa", &mut missing),
        suggestions: read_text(&object, "sugestoes", &mut missing),
        sub_tasks: read_sub_tasks(&object),
        report: String::new(),
    };

    let narrative = report::sanitize(&read_text(&object, "relatorio", &mut missing));
    analysis.report = if narrative.is_empty() {
        report::summarize(&analysis)
    } else {
        narrative
    };

    if !missing.is_empty() {
        debug!(missing = ?missing, "Model answer lacks some keys, using defaults");
    }

    Ok(Normalized {
        report: analysis.report.clone(),
        analysis,
        missing_keys: missing,
    })
}

fn format_error(reason: String, text: &str) -> AnalysisError {
    let excerpt: String = text.chars().take(EXCERPT_CHARS).collect();
    AnalysisError::Format {
        detail: format!("{reason}; trecho: {excerpt}"),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Strings, numbers and booleans as text.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn read_text(object: &Map<String, Value>, key: &'static str, missing: &mut Vec<&'static str>) -> String {
    match object.get(key) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(scalar_text)
            .collect::<Vec<_>>()
            .join(" "),
        Some(value) => match scalar_text(value) {
            Some(text) => text,
            None => {
                missing.push(key);
                String::new()
            }
        },
        None => {
            missing.push(key);
            String::new()
        }
    }
}

fn read_ranked(object: &Map<String, Value>, missing: &mut Vec<&'static str>) -> Vec<RankedTask> {
    match object.get("lista_ordenada") {
        Some(Value::Array(items)) => items.iter().filter_map(ranked_entry).collect(),
        _ => {
            missing.push("lista_ordenada");
            Vec::new()
        }
    }
}

fn ranked_entry(value: &Value) -> Option<RankedTask> {
    match value {
        Value::String(title) => Some(RankedTask {
            title: title.clone(),
            ..RankedTask::default()
        }),
        Value::Object(entry) => {
            let field = |key: &str| entry.get(key).and_then(scalar_text).unwrap_or_default();
            let title = entry.get("titulo").and_then(scalar_text)?;
            Some(RankedTask {
                title,
                priority: field("prioridade"),
                rationale: field("motivo"),
            })
        }
        _ => None,
    }
}

fn read_sub_tasks(object: &Map<String, Value>) -> Vec<SubTaskBreakdown> {
    match object.get("sub_tarefas_sugeridas") {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| {
                let entry = item.as_object()?;
                Some(SubTaskBreakdown {
                    task_title: entry.get("tarefa_original").and_then(scalar_text)?,
                    steps: entry.get("sub_tarefas").map(steps).unwrap_or_default(),
                })
            })
            .collect(),
        Some(Value::Object(map)) => map
            .iter()
            .map(|(title, value)| SubTaskBreakdown {
                task_title: title.clone(),
                steps: steps(value),
            })
            .collect(),
        _ => Vec::new(),
    }
}

fn steps(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.iter().filter_map(scalar_text).collect(),
        other => scalar_text(other).into_iter().collect(),
    }
}
