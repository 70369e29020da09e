//! OTP Bridge web server.
//!
//! This binary:
//! - Loads configuration (refusing to start without a channel secret)
//! - Receives LINE webhooks on `POST /callback`
//! - Writes extracted OTP codes to the shared slot file
//! - Optionally replies to the sender

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::{net::TcpListener, signal};
use tracing::{error, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use otpbridge::{router, AppState, Config, FileOtpStore, LineReplyClient, MessageHandler};

#[tokio::main]
async fn main() -> Result<()> {
    let dotenv_loaded = dotenvy::dotenv().is_ok();

    // Initialize structured JSON logging
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().json().flatten_event(true))
        .init();

    info!(dotenv_loaded, "web_server_starting");

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "config_invalid");
            return Err(e).context("Failed to load configuration");
        }
    };
    info!(
        port = config.port,
        otp_path = %config.otp_path.display(),
        reply_enabled = config.reply_enabled,
        access_token_set = config.channel_access_token.is_some(),
        api_base = %config.api_base,
        "config_loaded"
    );

    let store = Arc::new(FileOtpStore::new(&config.otp_path));
    let mut handler = MessageHandler::new(store);

    if config.reply_enabled {
        if let Some(token) = config.channel_access_token.clone() {
            let client = LineReplyClient::new(
                &config.api_base,
                token,
                Duration::from_millis(config.reply_timeout_ms),
            )
            .context("Failed to create reply client")?;
            handler = handler.with_replies(Arc::new(client));
            info!("reply_client_created");
        }
    }

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let app = router(AppState::new(config, handler));

    let listener = TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    info!(address = %addr, "web_server_listening");

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("web_server_shutdown_complete");

    Ok(())
}

/// Resolve once SIGINT or SIGTERM arrives.
///
/// A handler that cannot be installed is logged and never fires; the other
/// signal still stops the server.
async fn shutdown_signal() {
    let interrupt = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(signal = "SIGINT", error = %e, "signal_handler_failed");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(signal = "SIGTERM", error = %e, "signal_handler_failed");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let received = tokio::select! {
        _ = interrupt => "SIGINT",
        _ = terminate => "SIGTERM",
    };

    info!(signal = received, "web_server_shutting_down");
}
