//! Model client implementations for Agendai.
//!
//! All clients implement the `agendai_core::ModelClient` trait.
//! [`router::build_from_config`] picks the right one at start-up.

pub mod disabled;
pub mod gemini;
pub mod router;

#[cfg(test)]
mod test_support;

pub use disabled::DisabledClient;
pub use gemini::GeminiClient;
pub use router::build_from_config;
