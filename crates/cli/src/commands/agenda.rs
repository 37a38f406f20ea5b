//! `agendai agenda`: print the calendar source's events.

use std::path::Path;

pub async fn run(config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::load_config(config_path)?;
    let calendar = agendai_calendar::build_from_config(&config);

    let events = calendar.list_events().await;
    if events.is_empty() {
        println!("Nenhum evento ({})", calendar.name());
        return Ok(());
    }

    println!("Agenda ({})", calendar.name());
    for event in &events {
        if event.location.is_empty() {
            println!("  {}  {}", event.window(), event.title);
        } else {
            println!("  {}  {} @ {}", event.window(), event.title, event.location);
        }
    }

    Ok(())
}
