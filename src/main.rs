//! Catalog Backend - book and author catalog service
//!
//! This is the main entry point for the catalog API.
//! All operations are exposed via GraphQL at /graphql.

use std::net::SocketAddr;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use catalog::app::{AppState, build_app};
use catalog::cli::CliOptions;
use catalog::config::Config;
use catalog::db::Database;
use catalog::graphql;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "catalog=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    let options = CliOptions::from_args();
    if options.print_schema {
        println!("{}", graphql::schema_sdl());
        return Ok(());
    }

    tracing::info!("Starting Catalog Backend");
    let config = Config::from_env()?;
    tracing::info!("Configuration loaded");

    let db = Database::connect_with_retry(
        &config.database_url,
        config.database_max_connections,
        Duration::from_secs(5),
    )
    .await?;
    tracing::info!("Database connected");

    let state = AppState::new(&config, db);
    tracing::info!("GraphQL schema built");

    let app = build_app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on {}", addr);
    tracing::info!("GraphQL playground: http://localhost:{}/graphql", config.port);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
