// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use anyhow::Context;
use axum::{routing::get, Router};
use std::{net::SocketAddr, sync::Arc};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::application::refresh_scheduler::{RefreshScheduler, SystemClock};
use crate::application::reveal_scheduler::RevealScheduler;
use crate::application::wind_service::WindService;
use crate::infrastructure::config::load_app_config;
use crate::infrastructure::ha_repository::HomeAssistantRepository;
use crate::presentation::app_state::AppState;
use crate::presentation::frame_renderer::FrameRenderer;
use crate::presentation::handlers::{current_window, health_check, stream_window};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load and validate configuration before any fetch is attempted
    let app_config = load_app_config()?;
    let (series, settings) = app_config.card.validate()?;

    // Create repository (infrastructure layer)
    let repository = Arc::new(HomeAssistantRepository::new(
        app_config.home_assistant.base_url,
        app_config.home_assistant.token,
    )?);

    // Create services (application layer)
    let renderer = Arc::new(FrameRenderer::default());
    let reveal = Arc::new(RevealScheduler::new(
        renderer.clone(),
        app_config.card.reveal_step(),
    ));
    let service = Arc::new(WindService::new(repository, reveal, series, settings));
    let scheduler = Arc::new(RefreshScheduler::new(service, Arc::new(SystemClock)));

    // Create application state
    let state = Arc::new(AppState {
        renderer,
        scheduler: scheduler.clone(),
    });

    // Build router (presentation layer)
    let router = Router::new()
        .route("/healthz", get(health_check))
        .route("/window", get(current_window))
        .route("/window/stream", get(stream_window))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr: SocketAddr = app_config
        .server
        .bind
        .parse()
        .with_context(|| format!("Invalid bind address {}", app_config.server.bind))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    scheduler.attach();
    tracing::info!("Starting wind-stat service on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;

    scheduler.detach();
    Ok(())
}
