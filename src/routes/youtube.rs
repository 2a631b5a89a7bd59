// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Public YouTube lookup routes.
//!
//! These never surface provider failures: an unavailable provider looks like
//! a search with no hits.

use axum::{
    extract::{Path, State},
    routing::get,
    Router,
};
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

use crate::envelope::ApiResponse;
use crate::error::{AppError, Result};
use crate::routes::ValidatedQuery;
use crate::services::YouTubeVideo;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/youtube/search", get(search_videos))
        .route("/api/youtube/videos/{video_id}", get(get_video))
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct SearchParams {
    #[validate(custom(function = "crate::routes::validated::not_blank", message = "Search query is required"))]
    pub q: String,
    #[validate(range(min = 1, max = 10, message = "maxResults must be between 1 and 10"))]
    pub max_results: Option<u32>,
}

async fn search_videos(
    State(state): State<Arc<AppState>>,
    ValidatedQuery(params): ValidatedQuery<SearchParams>,
) -> Result<ApiResponse<Vec<YouTubeVideo>>> {
    let videos = state
        .videos
        .search_videos(params.q.trim(), params.max_results)
        .await;
    Ok(ApiResponse::ok(videos))
}

async fn get_video(
    State(state): State<Arc<AppState>>,
    Path(video_id): Path<String>,
) -> Result<ApiResponse<YouTubeVideo>> {
    let video = state
        .videos
        .video_details(&video_id)
        .await
        .ok_or(AppError::NotFound("Video"))?;
    Ok(ApiResponse::ok(video))
}
