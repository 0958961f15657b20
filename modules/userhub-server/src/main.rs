use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use userhub_core::{AppConfig, PgGateway, ServerDeps, User};
use userhub_events::EventBus;
use userhub_server::routes;

#[derive(Parser)]
#[command(name = "userhub-server", about = "User registry with live user-added subscriptions")]
struct Cli {
    /// Override the listen port from the environment
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    tracing::info!("Starting userhub-server");

    let cli = Cli::parse();
    let mut config = AppConfig::from_env()?;
    if let Some(port) = cli.port {
        config.port = port;
    }

    // Database pool
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await?;
    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("../../migrations").run(&pool).await?;
    tracing::info!("Migrations complete");

    // Event bus — one per process, lifetime bound to the server.
    let bus: EventBus<User> = EventBus::with_queue_capacity(config.channel_queue_capacity);

    let gateway = Arc::new(PgGateway::new(pool));
    let deps = Arc::new(ServerDeps::new(gateway, bus.clone(), config.clone()));

    let app = routes::build_router(deps);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "GraphQL at /graphql, subscriptions at /subscriptions");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(bus))
        .await?;

    Ok(())
}

/// On ctrl-c, close every subscriber channel so in-flight subscription
/// streams terminate before the server stops accepting traffic.
async fn shutdown_signal(bus: EventBus<User>) {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("Shutting down, closing subscriber channels");
    bus.shutdown();
}
