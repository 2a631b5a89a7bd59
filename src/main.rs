// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Text2Learn API Server
//!
//! Generates structured courses from a topic with Gemini, enriches lessons
//! with YouTube videos, and stores each user's course library.

use std::sync::Arc;

use text2learn::{
    config::Config,
    db::Db,
    error::set_diagnostics,
    services::{CourseGenerator, GeminiClient, VideoService, YouTubeClient},
    AppState,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize structured JSON logging
    init_logging()?;

    // Load configuration from environment; refuse to start without a signing key
    let config = Config::from_env()?;
    tracing::info!(
        port = config.port,
        environment = ?config.environment,
        "Starting Text2Learn API"
    );
    set_diagnostics(config.environment.is_development());

    let db = Db::connect(&config.database_url).await?;

    if config.gemini_api_key.is_none() {
        tracing::error!("GEMINI_API_KEY is not configured; generation requests will fail");
    }
    let gemini = GeminiClient::new(config.gemini_api_key.clone(), config.gemini_model.clone());
    tracing::info!(model = %config.gemini_model, "Gemini client initialized");

    let youtube = YouTubeClient::new(config.youtube_api_key.clone());

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        db,
        generator: CourseGenerator::new(Arc::new(gemini)),
        videos: VideoService::new(Arc::new(youtube)),
    });

    // Build router
    let app = text2learn::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() -> anyhow::Result<()> {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("text2learn=debug".parse()?)
                .add_directive("info".parse()?),
        )
        .with(format)
        .init();
    Ok(())
}
