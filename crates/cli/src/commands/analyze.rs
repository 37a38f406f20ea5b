//! `agendai analyze <file>`: one analysis without the HTTP layer.

use std::path::Path;

use agendai_analysis::{AnalysisOutcome, AnalysisService, AnalyzeRequest};
use agendai_core::AnalysisError;

pub async fn run(config_path: Option<&Path>, file: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::load_config(config_path)?;

    let body = if file == Path::new("-") {
        tokio::task::spawn_blocking(|| std::io::read_to_string(std::io::stdin())).await??
    } else {
        tokio::fs::read_to_string(file)
            .await
            .map_err(|e| format!("Failed to read {}: {e}", file.display()))?
    };

    let outcome = match serde_json::from_str::<AnalyzeRequest>(&body) {
        Ok(request) => {
            let client = agendai_providers::build_from_config(&config);
            let calendar = agendai_calendar::build_from_config(&config);
            AnalysisService::from_config(&config, client, calendar)
                .analyze(request)
                .await
        }
        Err(e) => AnalysisOutcome::failure(AnalysisError::Validation(e.to_string())),
    };

    println!("{}", serde_json::to_string_pretty(&outcome)?);

    if let Some(error) = outcome.error() {
        tracing::warn!(kind = %error.kind, "Analysis did not succeed");
    }

    Ok(())
}
