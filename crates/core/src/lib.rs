//! # Agendai Core
//!
//! Domain types, traits, and error definitions for the Agendai task
//! prioritization service. This crate has **no framework dependencies**: it
//! defines the model that the calendar, provider, analysis and gateway
//! crates implement against.
//!
//! The two seams are traits:
//! - [`ModelClient`] for the text-generation backend
//! - [`CalendarSource`] for fixed commitments of the day
//!
//! Both are injected as `Arc<dyn _>`, so tests swap in fakes freely.

pub mod analysis;
pub mod calendar;
pub mod error;
pub mod model;
pub mod task;

// Re-export key types at crate root for ergonomics
pub use analysis::{AnalysisResult, ErrorKind, ErrorResult, RankedTask, SubTaskBreakdown};
pub use calendar::CalendarSource;
pub use error::{AnalysisError, ProviderError};
pub use model::{GenerateRequest, GenerateResponse, ModelClient, Usage};
pub use task::{CalendarEvent, Task, TaskInput, validate_tasks};
