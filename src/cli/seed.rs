//! Seed command: load puzzle content into the database

use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

use letrasgo::config::Config;
use letrasgo::store::{parse_entries, ContentCatalog, GameDb, SAMPLE_CONTENT};

pub async fn seed_command(config: &Config, file: Option<&Path>) -> Result<()> {
    let json = match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read seed file: {}", path.display()))?,
        None => SAMPLE_CONTENT.to_string(),
    };
    let entries = parse_entries(&json).with_context(|| match file {
        Some(path) => format!("Failed to parse seed file: {}", path.display()),
        None => "Failed to parse built-in sample content".to_string(),
    })?;

    let db_path = config.db_path();
    let db = GameDb::open(&db_path)?;
    let catalog = ContentCatalog::new(db);
    let report = catalog.seed(entries)?;

    info!("[letras:seed] Database: {}", db_path.display());
    println!(
        "Stored {} puzzles ({} total in {})",
        report.stored,
        catalog.count()?,
        db_path.display()
    );
    for (index, reason) in &report.skipped {
        println!("  skipped entry #{}: {}", index + 1, reason);
    }
    Ok(())
}
