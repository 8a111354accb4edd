use std::sync::Arc;

use anyhow::Context;

use fitgate::config::AppConfig;
use fitgate::onboarding::{OnboardingManager, OnboardingRouteState, onboarding_routes};
use fitgate::store::{Gateway, LibSqlGateway};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = AppConfig::from_env()?;

    eprintln!("🏋️ Fitgate v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   API: http://0.0.0.0:{}/api/onboarding/status", config.port);
    eprintln!("   Database: {}", config.db_path);

    // ── Persistence ──────────────────────────────────────────────────
    let db_path = std::path::Path::new(&config.db_path);
    let gateway: Arc<dyn Gateway> = Arc::new(
        LibSqlGateway::new_local(db_path)
            .await
            .with_context(|| format!("Failed to open database at {}", config.db_path))?,
    );

    // ── Onboarding engine ────────────────────────────────────────────
    let manager = Arc::new(OnboardingManager::new(gateway, config.lead_source.clone()));
    manager.hydrate().await.context("Failed to load existing profile")?;

    // ── HTTP surface ─────────────────────────────────────────────────
    let app = onboarding_routes(OnboardingRouteState {
        manager: Arc::clone(&manager),
    });

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port))
        .await
        .with_context(|| format!("Failed to bind port {}", config.port))?;
    tracing::info!(port = config.port, "Listening");
    axum::serve(listener, app).await?;

    Ok(())
}
