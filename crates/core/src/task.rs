//! Task and calendar event value objects.
//!
//! Both exist only for the lifetime of one request. Wire names are the
//! Portuguese keys the front end sends and reads.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;

/// A task as it arrives over the wire, before validation.
///
/// Every field is optional so a missing title surfaces as a validation
/// error instead of a deserialization failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskInput {
    #[serde(default, rename = "titulo")]
    pub title: Option<String>,

    #[serde(default, rename = "prazo")]
    pub deadline: Option<String>,

    #[serde(default, rename = "prioridade")]
    pub priority: Option<i64>,

    #[serde(default, rename = "descricao")]
    pub description: Option<String>,
}

impl TaskInput {
    /// Validate into a [`Task`]. `index` is used in the error message.
    pub fn validate(self, index: usize) -> Result<Task, AnalysisError> {
        let title = self
            .title
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                AnalysisError::Validation(format!("task #{index} is missing a title (titulo)"))
            })?;

        Ok(Task {
            title,
            deadline: self.deadline,
            priority: self.priority,
            description: self.description,
        })
    }
}

/// A validated user task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    #[serde(rename = "titulo")]
    pub title: String,

    #[serde(default, rename = "prazo", skip_serializing_if = "Option::is_none")]
    pub deadline: Option<String>,

    /// 1 = most important.
    #[serde(default, rename = "prioridade", skip_serializing_if = "Option::is_none")]
    pub priority: Option<i64>,

    #[serde(default, rename = "descricao", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Task {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            deadline: None,
            priority: None,
            description: None,
        }
    }

    pub fn with_priority(mut self, priority: i64) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn with_deadline(mut self, deadline: impl Into<String>) -> Self {
        self.deadline = Some(deadline.into());
        self
    }
}

/// Validate a batch of wire tasks, stopping at the first invalid one.
pub fn validate_tasks(inputs: Vec<TaskInput>) -> Result<Vec<Task>, AnalysisError> {
    inputs
        .into_iter()
        .enumerate()
        .map(|(i, input)| input.validate(i))
        .collect()
}

/// A fixed, non-negotiable block of time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    #[serde(rename = "titulo")]
    pub title: String,

    #[serde(rename = "data_inicio", with = "event_time")]
    pub start: NaiveDateTime,

    #[serde(rename = "data_fim", with = "event_time")]
    pub end: NaiveDateTime,

    #[serde(rename = "local", default)]
    pub location: String,
}

impl CalendarEvent {
    pub fn new(
        title: impl Into<String>,
        start: NaiveDateTime,
        end: NaiveDateTime,
        location: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            start,
            end,
            location: location.into(),
        }
    }

    /// `"2026-10-19 10:00 - 2026-10-19 11:30"`.
    pub fn window(&self) -> String {
        format!(
            "{} - {}",
            self.start.format(event_time::FORMAT),
            self.end.format(event_time::FORMAT)
        )
    }
}

/// `"%Y-%m-%d %H:%M"` (de)serialization for event timestamps.
pub mod event_time {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%Y-%m-%d %H:%M";

    pub fn serialize<S: Serializer>(value: &NaiveDateTime, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&value.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(d)?;
        NaiveDateTime::parse_from_str(&raw, FORMAT).map_err(serde::de::Error::custom)
    }
}
