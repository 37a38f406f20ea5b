//! Prompt construction, response normalization and the request pipeline.
//!
//! [`AnalysisService`] ties a [`agendai_core::ModelClient`] and a
//! [`agendai_core::CalendarSource`] together; the gateway and the CLI both
//! drive it.

pub mod normalize;
pub mod prompt;
pub mod report;
pub mod service;

pub use normalize::{Normalized, normalize, strip_fences};
pub use prompt::{Prompt, PromptBuilder, build_prompt};
pub use service::{AnalysisOutcome, AnalysisPayload, AnalysisService, AnalyzeRequest};
