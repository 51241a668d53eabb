//! `writebuddy serve` — start the HTTP gateway.

use tracing::info;
use writebuddy_config::AppConfig;

pub async fn run(port: Option<u16>) -> anyhow::Result<()> {
    let mut config = AppConfig::load()?;

    if let Some(port) = port {
        config.gateway.port = port;
    }

    // A missing encoding table must fail here, not inside a request.
    writebuddy_assist::tokens::preload();

    info!(
        primary = %config.models.primary,
        fallback = %config.models.fallback,
        "Starting WriteBuddy gateway"
    );

    writebuddy_gateway::start(config).await
}
