//! `agendai doctor`: diagnose configuration.

use std::path::Path;

use agendai_config::{AppConfig, CalendarKind};

pub async fn run(config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    println!("Agendai Doctor");
    println!("==============\n");

    let mut issues = 0;

    let path = config_path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| AppConfig::config_dir().join("config.toml"));
    if path.exists() {
        println!("  ok   Config file found at {}", path.display());
    } else {
        println!("  --   No config file at {}, using defaults", path.display());
    }

    let config = match super::load_config(config_path) {
        Ok(config) => {
            println!("  ok   Config valid");
            config
        }
        Err(e) => {
            println!("  FAIL {e}");
            println!("\n  1 issue found. Fix the config file and retry.");
            return Ok(());
        }
    };

    if config.has_api_key() {
        println!("  ok   API key configured (model {})", config.model);
    } else {
        println!("  WARN No API key: set GEMINI_API_KEY or api_key in config.toml");
        issues += 1;
    }

    match (&config.calendar.source, config.calendar.ics_path.as_deref()) {
        (CalendarKind::Ics, Some(ics)) if !Path::new(ics).exists() => {
            println!("  WARN Calendar file {ics} does not exist");
            issues += 1;
        }
        (source, _) => println!("  ok   Calendar source: {source:?}"),
    }

    println!();
    if issues == 0 {
        println!("  All checks passed.");
    } else {
        println!("  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}
