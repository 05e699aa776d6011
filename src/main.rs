use std::sync::Arc;

use intake_bot::config::{AppConfig, BusinessHoursConfig};
use intake_bot::flow::FlowEngine;
use intake_bot::webhook::webhook_routes;

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

    eprintln!("🤖 Intake bot v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Chatwoot URL: {}", config.chatwoot.base_url);
    eprintln!("   Account ID: {}", config.chatwoot.account_id);
    eprintln!("   Booking link: {}", config.booking_link);
    match &config.business_hours {
        BusinessHoursConfig::Always => eprintln!("   Business hours: always open"),
        BusinessHoursConfig::Schedule {
            open_hour,
            close_hour,
            utc_offset_minutes,
            weekdays_only,
        } => eprintln!(
            "   Business hours: {open_hour:02}:00-{close_hour:02}:00 (UTC{utc_offset_minutes:+} min{})",
            if *weekdays_only { ", weekdays" } else { "" }
        ),
    }

    let engine = Arc::new(FlowEngine::from_config(&config)?);
    let app = webhook_routes(engine);

    let addr = format!("{}:{}", config.bind_addr, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    eprintln!("   Webhook: http://{addr}/webhook\n");
    tracing::info!(%addr, "Webhook server started");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Webhook server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Could not listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
