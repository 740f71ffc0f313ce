//! Notionable CLI - generate Rust types from Notion databases.

#![warn(clippy::pedantic)]
#![allow(clippy::disallowed_macros)]

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use notionable::naming::database_name;
use notionable::{fetch_workspace, save_settings, Config, NotionClient};

#[derive(Parser)]
#[command(name = "notionable")]
#[command(about = "Generate Rust types from Notion databases", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Notion integration token
    #[arg(long, env = "NOTION_TOKEN", global = true, hide_env_values = true)]
    token: Option<String>,

    /// Notion API base URL
    #[arg(long, env = "NOTION_API_URL", global = true)]
    api_url: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a type file for every shared database
    Generate {
        /// Output directory for generated files
        #[arg(short, long, env = "NOTIONABLE_TYPES_PATH")]
        out: Option<PathBuf>,

        /// Also write the database settings map to this JSON file
        #[arg(short, long)]
        settings: Option<PathBuf>,
    },

    /// List the databases shared with the integration
    Databases,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive("notionable=info".parse()?))
        .init();

    let cli = Cli::parse();

    let mut config = Config::default();
    if let Some(token) = cli.token {
        config.token = Some(token);
    }
    if let Some(api_url) = cli.api_url {
        config.api_url = api_url;
    }

    let options = config
        .options()
        .context("No Notion token configured; pass --token or set NOTION_TOKEN")?;

    match cli.command {
        Commands::Generate { out, settings } => {
            let out = out.unwrap_or_else(|| config.types_path.clone());
            let workspace = fetch_workspace(&options, &out)
                .await
                .context("Failed to fetch Notion workspace")?;

            for (name, db) in workspace.settings() {
                println!("{name}\t{}\t{} properties", db.id, db.properties.len());
            }

            if let Some(path) = settings {
                save_settings(&path, workspace.settings())
                    .await
                    .with_context(|| format!("Failed to save settings to {}", path.display()))?;
                info!(path = %path.display(), "Saved database settings");
            }

            info!(out = %out.display(), "Type generation complete");
        }
        Commands::Databases => {
            let client = NotionClient::new(&options).context("Failed to create Notion client")?;
            let databases = client
                .list_databases()
                .await
                .context("Failed to list databases")?;

            for database in &databases {
                let name = database_name(database)
                    .unwrap_or_else(|_| "<untitled>".to_string());
                println!(
                    "{name}\t{}\t{} properties",
                    database.id,
                    database.properties.len()
                );
            }
        }
    }

    Ok(())
}
