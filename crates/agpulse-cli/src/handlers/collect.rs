use crate::types::OutputFormat;
use crate::views;
use agpulse_runtime::{CollectRequest, CollectService, Config};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};

pub fn handle(
    data_dir: &Path,
    output: Option<PathBuf>,
    now: Option<String>,
    active_days: Option<i64>,
    history_days: Option<i64>,
    format: OutputFormat,
) -> Result<()> {
    let mut config = Config::load_from(&Config::config_path(data_dir))?;

    if let Some(days) = active_days {
        config.windows.active_days = days;
    }
    if let Some(days) = history_days {
        config.windows.history_days = days;
    }

    let now = match now {
        Some(text) => DateTime::parse_from_rfc3339(&text)
            .with_context(|| format!("Invalid --now value '{}': expected RFC3339", text))?
            .with_timezone(&Utc),
        None => Utc::now(),
    };

    let outcome = CollectService::run(CollectRequest {
        config: &config,
        data_dir,
        output,
        now,
    })?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&outcome.snapshot)?),
        OutputFormat::Plain => views::print_collect_outcome(&outcome),
    }

    Ok(())
}
