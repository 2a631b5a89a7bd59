// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Development-only probes. Mounted only when `APP_ENV=development`.

use axum::{extract::State, routing::get, Router};
use serde::Serialize;
use std::sync::Arc;

use crate::envelope::ApiResponse;
use crate::error::Result;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/test/gemini", get(test_gemini))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiProbe {
    pub model: String,
    pub response: String,
}

/// Send a fixed prompt to the model and echo the reply.
async fn test_gemini(State(state): State<Arc<AppState>>) -> Result<ApiResponse<GeminiProbe>> {
    let response = state.generator.ping().await?;
    tracing::info!(response = %response, "Gemini connectivity check passed");

    Ok(ApiResponse::ok(GeminiProbe {
        model: state.config.gemini_model.clone(),
        response,
    })
    .with_message("Gemini API is working"))
}
