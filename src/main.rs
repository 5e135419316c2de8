use anyhow::Context;
use clap::Parser;
use std::sync::Arc;

use recipe_explorer::api::{cors_layer, create_router};
use recipe_explorer::config::CONFIG;
use recipe_explorer::spoonacular::SpoonacularClient;

#[derive(Debug, Parser)]
#[command(name = "recipe-explorer", about = "Recipe Explorer API server")]
struct Cli {
    /// Address to bind (overrides HOST)
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on (overrides PORT)
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing subscriber (handles both tracing and log crate)
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_target(true)
        .init();

    let cli = Cli::parse();
    let config = &*CONFIG;

    let spoonacular = SpoonacularClient::from_config(config)?;
    if !spoonacular.has_api_key() {
        log::warn!("SPOONACULAR_API_KEY is not set; recipe endpoints will answer 401");
    }

    log::info!("CORS allowed origins: {:?}", config.cors_allowed_origins);
    let app = create_router(
        Arc::new(spoonacular),
        cors_layer(&config.cors_allowed_origins),
    );

    let host = cli.host.unwrap_or_else(|| config.host.clone());
    let port = cli.port.unwrap_or(config.port);
    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind to {addr}"))?;
    log::info!("listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    log::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("failed to listen for shutdown signal: {:#}", e);
        std::future::pending::<()>().await;
    }
}
