use crate::types::OutputFormat;
use agpulse_runtime::{Config, SourceConfig};
use agpulse_types::SourceKind;
use anyhow::Result;
use std::path::{Path, PathBuf};

pub fn list(data_dir: &Path, format: OutputFormat) -> Result<()> {
    let config = Config::load_from(&Config::config_path(data_dir))?;

    if format == OutputFormat::Json {
        let mut entries = serde_json::Map::new();
        for kind in SourceKind::ALL {
            let (enabled, log_root) = config.source_settings(kind);
            entries.insert(
                kind.name().to_string(),
                serde_json::json!({
                    "enabled": enabled,
                    "log_root": log_root.as_ref().map(|root| root.display().to_string()),
                }),
            );
        }
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    println!("{:<15} {:<10} LOG_ROOT", "SOURCE", "ENABLED");
    println!("{}", "-".repeat(80));

    for kind in SourceKind::ALL {
        let (enabled, log_root) = config.source_settings(kind);
        let root = match &log_root {
            Some(root) => root.display().to_string(),
            None => "(none)".to_string(),
        };
        println!(
            "{:<15} {:<10} {}",
            kind.name(),
            if enabled { "yes" } else { "no" },
            root
        );
    }

    Ok(())
}

pub fn detect(data_dir: &Path) -> Result<()> {
    let config_path = Config::config_path(data_dir);
    let mut config = Config::load_from(&config_path)?;
    let detected = Config::detect();

    // Re-probing replaces source entries but leaves the rest of the
    // config (author filter, windows, exclusions) alone.
    config.sources = detected.sources;
    if config.repos_dir.is_none() {
        config.repos_dir = detected.repos_dir;
    }
    config.save_to(&config_path)?;

    println!("Detected {} source(s):", config.sources.len());
    for kind in SourceKind::ALL {
        if let Some(source) = config.sources.get(kind.name()) {
            println!("  {} -> {}", kind.name(), source.log_root.display());
        }
    }

    Ok(())
}

pub fn set(
    data_dir: &Path,
    source: &str,
    log_root: PathBuf,
    enable: bool,
    disable: bool,
) -> Result<()> {
    if enable && disable {
        anyhow::bail!("Cannot specify both --enable and --disable");
    }

    let Some(kind) = SourceKind::from_name(source) else {
        anyhow::bail!(
            "Unknown source '{}'. Valid sources: claude, codex, cursor, gemini",
            source
        );
    };

    let config_path = Config::config_path(data_dir);
    let mut config = Config::load_from(&config_path)?;

    let enabled = if enable { true } else { !disable };

    config.set_source(
        kind,
        SourceConfig {
            enabled,
            log_root: log_root.clone(),
        },
    );

    config.save_to(&config_path)?;

    println!(
        "Set source '{}': enabled={}, log_root={}",
        kind.name(),
        enabled,
        log_root.display()
    );

    Ok(())
}
