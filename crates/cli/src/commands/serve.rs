//! `agendai serve`: start the HTTP API.

use std::path::Path;

pub async fn run(config_path: Option<&Path>, port_override: Option<u16>) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = super::load_config(config_path)?;

    if let Some(port) = port_override {
        config.gateway.port = port;
    }

    println!("Agendai");
    println!("   Listening: {}:{}", config.gateway.host, config.gateway.port);
    println!("   Model:     {}", config.model);
    println!("   Calendar:  {:?}", config.calendar.source);
    if !config.has_api_key() {
        println!("   No API key set: /analisar answers with provider errors until GEMINI_API_KEY is configured");
    }

    agendai_gateway::start(config).await?;

    Ok(())
}
