//! tunescope-web - related media and artwork theming service
//!
//! Serves the related-media pipeline, palette derivation, lyrics and
//! featured-songs lookups over HTTP, with progress events streamed over SSE.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use tunescope_common::config::{ConfigOverrides, TomlConfig};
use tunescope_web::{build_router, AppState};

/// Command-line arguments for tunescope-web
#[derive(Parser, Debug)]
#[command(name = "tunescope-web")]
#[command(about = "Related media and artwork theming service for TuneScope")]
#[command(version)]
struct Args {
    /// Port to listen on
    #[arg(short, long, env = "TUNESCOPE_PORT")]
    port: Option<u16>,

    /// Interface to bind
    #[arg(long)]
    bind: Option<String>,

    /// Config file (defaults to <config dir>/tunescope/config.toml)
    #[arg(short, long, env = "TUNESCOPE_CONFIG")]
    config: Option<PathBuf>,

    /// Base URL of the video-search endpoint
    #[arg(long, env = "TUNESCOPE_VIDEO_API_URL")]
    video_api_url: Option<String>,

    /// Base URL of the lyrics endpoint
    #[arg(long, env = "TUNESCOPE_LYRICS_API_URL")]
    lyrics_api_url: Option<String>,

    /// Base URL of the music catalog web API
    #[arg(long, env = "TUNESCOPE_CATALOG_API_URL")]
    catalog_api_url: Option<String>,

    /// Log level used when RUST_LOG is unset
    #[arg(long)]
    log_level: Option<String>,
}

impl Args {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            port: self.port,
            bind_address: self.bind.clone(),
            video_api_url: self.video_api_url.clone(),
            lyrics_api_url: self.lyrics_api_url.clone(),
            catalog_api_url: self.catalog_api_url.clone(),
            log_level: self.log_level.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Config is resolved before tracing so its log level can seed the filter;
    // its outcome is logged once the subscriber is installed.
    let (file_config, config_source) = TomlConfig::resolve(args.config.as_deref());
    let (config, rejected_overrides) = file_config.with_checked_overrides(args.overrides());

    let default_filter = format!(
        "tunescope_web={0},tunescope_common={0},tower_http={0}",
        config.logging.level
    );
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Build identification first, before any network setup
    info!(
        "Starting TuneScope web service (tunescope-web) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    config_source.log();
    if let Some(e) = rejected_overrides {
        warn!("Ignoring command-line/environment overrides: {}", e);
    }

    info!("Video search API: {}", config.video_api_url);
    info!("Lyrics API: {}", config.lyrics_api_url);
    info!("Catalog API: {}", config.catalog_api_url);

    let addr = config.listen_address();
    let state = AppState::new(config).context("Failed to initialize application state")?;
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("tunescope-web listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
