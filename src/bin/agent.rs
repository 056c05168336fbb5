use hooklog::config::AgentConfig;
use hooklog::services::{ActivityLog, ActivityLogger, ActivitySender, GeoClient};

use std::env;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// Companion process: enriches itself with public-IP/geolocation metadata once
// at startup, then reports activity events to the remote webhook and mirrors
// them into the bounded local log.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hooklog=info,agent=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AgentConfig::from_env()?;

    info!("Starting activity agent v{}", env!("CARGO_PKG_VERSION"));
    info!("Local activity log: {}", config.log_dir.display());

    let logger = ActivityLogger::new(
        ActivitySender::new(config.webhook_url.clone(), config.webhook_secret.clone()),
        ActivityLog::new(&config.log_dir),
        GeoClient::new(),
    );

    let session = logger
        .initialize(config.user_name.clone(), config.user_email.clone(), true)
        .await;

    let mut args = env::args().skip(1);
    let event = args.next().unwrap_or_else(|| "Heartbeat".to_string());
    let message = args.next().unwrap_or_else(|| {
        format!(
            "{} reported from {}",
            event,
            session.hostname.as_deref().unwrap_or("unknown host")
        )
    });

    logger.simple_send(&session, &event, &message, true, true).await;

    Ok(())
}
