//! Serve command: run the game server until Ctrl-C

use anyhow::{Context, Result};
use tracing::info;

use letrasgo::config::Config;
use letrasgo::http_server::{start_server, ApiState};
use letrasgo::store::{ContentCatalog, GameDb};

pub async fn serve_command(config: Config) -> Result<()> {
    let db_path = config.db_path();
    let db = GameDb::open(&db_path)?;

    let puzzles = ContentCatalog::new(db.clone()).count()?;
    if puzzles == 0 {
        tracing::warn!(
            "[letras:serve] No puzzles in {}, run `letrasgo seed` first",
            db_path.display()
        );
    }

    let handle = start_server(ApiState::new(config, db))?;
    println!("LetrasGo running on {}", handle.base_url());

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for Ctrl-C")?;
    info!("[letras:serve] Shutting down");

    tokio::task::spawn_blocking(move || handle.shutdown())
        .await
        .context("Server shutdown task failed")?;
    Ok(())
}
