use anyhow::Context;
use tracing_subscriber::EnvFilter;

use gram_api::config::{config, Environment};
use gram_api::state::{AppState, Backend};

const DEV_USER_EMAIL: &str = "dev@example.com";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("gram_api=info,tower_http=info")),
        )
        .init();

    // Initialize configuration (this loads the config singleton)
    let config = config().clone();
    tracing::info!("Starting gram API in {:?} mode", config.environment);

    let port = config.server.port;
    let environment = config.environment;
    let state = AppState::from_config(config)
        .await
        .context("failed to initialise application state")?;

    if environment == Environment::Development && matches!(state.backend, Backend::Memory) {
        seed_dev_user(&state).await?;
    }

    let app = gram_api::app(state.clone());

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("gram API listening on http://{}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    if let Backend::Postgres(pool) = &state.backend {
        gram_api::database::DatabaseManager::close(pool).await;
    }
    Ok(())
}

/// In-memory development servers start empty; give them one account to sign in with
async fn seed_dev_user(state: &AppState) -> anyhow::Result<()> {
    let user = state.users.create(DEV_USER_EMAIL).await?;
    let token = state.keys.issue(&user)?;
    tracing::info!("Seeded development user {}", user.email);
    tracing::info!("Development token: Bearer {}", token);
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
