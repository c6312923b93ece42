use super::args::{Cli, Commands, SnapshotCommand, SourceCommand};
use super::handlers;
use agpulse_runtime::resolve_workspace_path;
use anyhow::Result;
use std::path::Path;

pub fn run(cli: Cli) -> Result<()> {
    let data_dir = resolve_workspace_path(cli.data_dir.as_deref())?;

    let Some(command) = cli.command else {
        show_guidance(&data_dir);
        return Ok(());
    };

    match command {
        Commands::Init { refresh } => handlers::init::handle(&data_dir, refresh),

        Commands::Collect {
            output,
            now,
            active_days,
            history_days,
        } => handlers::collect::handle(
            &data_dir,
            output,
            now,
            active_days,
            history_days,
            cli.format,
        ),

        Commands::Source { command } => match command {
            SourceCommand::List => handlers::source::list(&data_dir, cli.format),
            SourceCommand::Detect => handlers::source::detect(&data_dir),
            SourceCommand::Set {
                source,
                log_root,
                enable,
                disable,
            } => handlers::source::set(&data_dir, &source, log_root, enable, disable),
        },

        Commands::Snapshot { command } => match command {
            SnapshotCommand::Show => handlers::snapshot::show(&data_dir, cli.format),
        },
    }
}

fn show_guidance(data_dir: &Path) {
    let config_path = data_dir.join("config.toml");

    println!("agpulse - Local activity snapshots from git and AI sessions\n");

    if !config_path.exists() {
        println!("Get started:");
        println!("  agpulse init\n");
        println!("The init command will:");
        println!("  1. Detect installed session sources (claude, codex, cursor, gemini)");
        println!("  2. Look for a repositories directory (~/git)");
        println!("  3. Write {}\n", config_path.display());
    } else {
        println!("Quick commands:");
        println!("  agpulse collect                   # Build a fresh snapshot");
        println!("  agpulse snapshot show             # Print the current snapshot");
        println!("  agpulse source list               # Show configured sources\n");
    }

    println!("For more commands:");
    println!("  agpulse --help");
}
