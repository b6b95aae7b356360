//! Seat map editor CLI
//!
//! Edits the map saved in a file-backed key/value store. Every command loads
//! the saved map, applies one editor command and saves the result.
//!
//! # Usage
//!
//! ```bash
//! seatmap template small-theatre
//! seatmap add-row --label Balcony
//! seatmap label --row-prefix Row --seat-prefix S --start 1
//! seatmap export hall.json --name "Main Hall"
//! ```
//!
//! Configuration comes from `SEATMAP_*` environment variables (see
//! [`config::Config`]), optionally loaded from a `.env` file.

mod commands;
mod config;

use anyhow::Context;
use clap::Parser;
use commands::Command;
use config::Config;
use seatmap_core::editor::EditorEnvironment;
use seatmap_runtime::EditorStore;
use seatmap_runtime::persistence::JsonFilePersistence;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "seatmap", version, about = "Seat map layout editor")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

fn main() -> anyhow::Result<()> {
    // Load .env file
    let _ = dotenvy::dotenv();

    let config = Config::from_env().context("invalid configuration")?;

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    tracing::debug!(
        data_dir = %config.storage.data_dir.display(),
        key = %config.storage.key,
        "Configuration loaded"
    );

    let persistence = JsonFilePersistence::new(&config.storage.data_dir, &config.storage.key);
    let environment = EditorEnvironment::production().with_template_seed(config.template_seed);
    let mut store = EditorStore::open(environment, persistence);

    let mut stdout = std::io::stdout().lock();
    commands::run(cli.command, &mut store, &mut stdout)?;

    let health = store.health();
    if !health.status.is_healthy() {
        tracing::warn!(
            status = %health.status,
            message = health.message.as_deref().unwrap_or_default(),
            "Changes were applied but not all of them were saved"
        );
    }

    Ok(())
}
