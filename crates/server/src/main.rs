//! relict server entry point.
//!
//! Boots the HTTP adapter over one deployed snapshot. Logging goes to stderr
//! as JSON; request detail never reaches clients.

use anyhow::{Context, Result};
use clap::Parser;
use relict_core::{AppConfig, StructureDb, source};
use relict_pipeline::ContentLoader;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

mod app;

/// Serve an archived website snapshot over HTTP.
#[derive(Debug, Parser)]
#[command(name = "relict", version)]
struct Args {
    /// Verify configuration, content root, and index, print OK, and exit.
    #[arg(long)]
    check: bool,

    /// Listen address override.
    #[arg(long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let args = Args::parse();

    let config = Arc::new(AppConfig::load().context("loading configuration")?);
    let source_root =
        source::discover(&config.root_dir, config.content_path.as_deref()).context("locating content root")?;
    let store = StructureDb::open_in_root(&source_root)
        .await
        .context("opening structure index")?;

    if args.check {
        println!("OK");
        return Ok(());
    }

    let bind = args.bind.clone().unwrap_or_else(|| config.bind_addr.clone());
    let loader = Arc::new(ContentLoader::new(store, config, source_root));

    tracing::info!(%bind, "starting relict");
    let listener = tokio::net::TcpListener::bind(&bind)
        .await
        .with_context(|| format!("binding {bind}"))?;
    axum::serve(listener, app::router(loader)).await?;

    Ok(())
}
