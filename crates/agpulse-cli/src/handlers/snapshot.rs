use crate::types::OutputFormat;
use crate::views;
use agpulse_runtime::SnapshotStore;
use anyhow::Result;
use std::path::Path;

pub fn show(data_dir: &Path, format: OutputFormat) -> Result<()> {
    let store = SnapshotStore::default_in(data_dir);

    let Some(snapshot) = store.load()? else {
        match format {
            OutputFormat::Json => println!("null"),
            OutputFormat::Plain => {
                println!("No snapshot at {}.", store.path().display());
                println!("Run 'agpulse collect' to build one.");
            }
        }
        return Ok(());
    };

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&snapshot)?),
        OutputFormat::Plain => views::print_snapshot(&snapshot),
    }

    Ok(())
}
