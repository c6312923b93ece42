use agpulse_providers::{default_log_path, get_all_sources};
use agpulse_runtime::Config;
use agpulse_types::SourceKind;
use anyhow::Result;
use std::path::Path;

pub fn handle(data_dir: &Path, refresh: bool) -> Result<()> {
    println!("Initializing agpulse...\n");

    let config_path = Config::config_path(data_dir);

    let config = if config_path.exists() && !refresh {
        let config = Config::load_from(&config_path)?;
        println!("Configuration:");
        println!("  Loaded from {}", config_path.display());
        println!("  Use `agpulse init --refresh` to re-detect sources.");
        config
    } else {
        let detected = Config::detect();
        detected.save_to(&config_path)?;

        println!("Configuration:");
        if detected.sources.is_empty() {
            println!("  No session sources detected automatically.");
        } else {
            println!("  Detected {} source(s):", detected.sources.len());
            for kind in SourceKind::ALL {
                if let Some(source) = detected.sources.get(kind.name()) {
                    println!("    {} -> {}", kind.name(), source.log_root.display());
                }
            }
        }
        match &detected.repos_dir {
            Some(dir) => println!("  Repositories: {}", dir.display()),
            None => println!("  Repositories: none found (set repos_dir in config.toml)"),
        }
        println!("  Saved to {}", config_path.display());
        detected
    };

    if config.sources.is_empty() {
        println!("\n  To manually configure a source:");
        println!("    agpulse source set <name> --log-root <PATH> --enable");
        println!("\n  Supported sources:");
        for meta in get_all_sources() {
            match default_log_path(meta.kind) {
                Some(path) => println!(
                    "    - {}  ({}, default: {})",
                    meta.kind.name(),
                    meta.description,
                    path.display()
                ),
                None => println!("    - {}  ({})", meta.kind.name(), meta.description),
            }
        }
    }

    println!("\nNext steps:");
    println!("  Build a snapshot:");
    println!("    agpulse collect");
    println!("\n  Inspect it:");
    println!("    agpulse snapshot show");

    Ok(())
}
