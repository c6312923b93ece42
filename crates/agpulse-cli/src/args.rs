use crate::types::OutputFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "agpulse")]
#[command(about = "Snapshot local git and AI coding activity", long_about = None)]
#[command(version)]
pub struct Cli {
    #[arg(
        long,
        global = true,
        help = "Workspace directory (default: AGPULSE_PATH, then the platform data dir)"
    )]
    pub data_dir: Option<String>,

    #[arg(long, default_value = "plain", global = true)]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    Init {
        #[arg(long)]
        refresh: bool,
    },

    Collect {
        #[arg(long, help = "Write the snapshot here instead of the workspace")]
        output: Option<PathBuf>,

        #[arg(long, help = "RFC3339 instant to aggregate against (defaults to now)")]
        now: Option<String>,

        #[arg(long)]
        active_days: Option<i64>,

        #[arg(long)]
        history_days: Option<i64>,
    },

    Source {
        #[command(subcommand)]
        command: SourceCommand,
    },

    Snapshot {
        #[command(subcommand)]
        command: SnapshotCommand,
    },
}

#[derive(Subcommand)]
pub enum SourceCommand {
    List,
    Detect,
    Set {
        source: String,

        #[arg(long)]
        log_root: PathBuf,

        #[arg(long)]
        enable: bool,

        #[arg(long)]
        disable: bool,
    },
}

#[derive(Subcommand)]
pub enum SnapshotCommand {
    Show,
}
