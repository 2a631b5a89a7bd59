// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! YouTube Data API v3 client and the best-effort video service.
//!
//! Video is an enhancement: provider failures are logged and collapse to
//! "no videos" instead of failing the request.

use std::sync::Arc;

use futures_util::future::BoxFuture;
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::error::AppError;
use crate::models::{ContentBlock, LessonContent};

pub const DEFAULT_MAX_RESULTS: u32 = 5;
pub const MAX_RESULTS_LIMIT: u32 = 10;

/// One video search hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct YouTubeVideo {
    pub video_id: String,
    pub title: String,
    pub description: String,
    pub thumbnail: String,
    pub channel_title: String,
    pub published_at: String,
}

/// A video search backend.
pub trait VideoSearchProvider: Send + Sync {
    fn search<'a>(
        &'a self,
        query: &'a str,
        max_results: u32,
    ) -> BoxFuture<'a, Result<Vec<YouTubeVideo>, AppError>>;

    fn video_details<'a>(
        &'a self,
        video_id: &'a str,
    ) -> BoxFuture<'a, Result<Option<YouTubeVideo>, AppError>>;
}

/// YouTube Data API client.
#[derive(Clone)]
pub struct YouTubeClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl YouTubeClient {
    pub fn new(api_key: Option<String>) -> Self {
        if api_key.is_none() {
            tracing::warn!("YOUTUBE_API_KEY is not configured; video search will return no results");
        }
        Self {
            http: reqwest::Client::new(),
            base_url: "https://www.googleapis.com/youtube/v3".to_string(),
            api_key,
        }
    }

    fn key(&self) -> Result<&str, AppError> {
        self.api_key
            .as_deref()
            .ok_or_else(|| AppError::UpstreamAuth("YOUTUBE_API_KEY is not configured".to_string()))
    }

    async fn search_list(&self, query: &str, max_results: u32) -> Result<Vec<YouTubeVideo>, AppError> {
        let url = format!("{}/search", self.base_url);
        let max_results = max_results.to_string();

        let response = self
            .http
            .get(&url)
            .query(&[
                ("key", self.key()?),
                ("part", "snippet"),
                ("q", query),
                ("type", "video"),
                ("maxResults", max_results.as_str()),
                ("order", "relevance"),
                ("videoDuration", "medium"),
                ("relevanceLanguage", "en"),
                ("videoEmbeddable", "true"),
                ("safeSearch", "strict"),
            ])
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("YouTube request failed: {}", e)))?;

        let list: ListResponse<SearchItem> = check_response_json(response).await?;
        Ok(list
            .items
            .into_iter()
            .map(|item| item.snippet.into_video(item.id.video_id.unwrap_or_default()))
            .collect())
    }

    async fn videos_list(&self, video_id: &str) -> Result<Option<YouTubeVideo>, AppError> {
        let url = format!("{}/videos", self.base_url);

        let response = self
            .http
            .get(&url)
            .query(&[
                ("key", self.key()?),
                ("part", "snippet,contentDetails"),
                ("id", video_id),
            ])
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("YouTube request failed: {}", e)))?;

        let list: ListResponse<VideoItem> = check_response_json(response).await?;
        Ok(list
            .items
            .into_iter()
            .next()
            .map(|item| item.snippet.into_video(item.id)))
    }
}

impl VideoSearchProvider for YouTubeClient {
    fn search<'a>(
        &'a self,
        query: &'a str,
        max_results: u32,
    ) -> BoxFuture<'a, Result<Vec<YouTubeVideo>, AppError>> {
        Box::pin(self.search_list(query, max_results))
    }

    fn video_details<'a>(
        &'a self,
        video_id: &'a str,
    ) -> BoxFuture<'a, Result<Option<YouTubeVideo>, AppError>> {
        Box::pin(self.videos_list(video_id))
    }
}

/// Check response status and parse the JSON body.
async fn check_response_json<T: for<'de> Deserialize<'de>>(
    response: reqwest::Response,
) -> Result<T, AppError> {
    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if status.as_u16() == 403 && body.contains("quotaExceeded") {
            tracing::warn!("YouTube quota exhausted");
            return Err(AppError::QuotaExceeded);
        }

        return Err(AppError::Upstream(format!("HTTP {}: {}", status, body)));
    }

    response
        .json()
        .await
        .map_err(|e| AppError::UpstreamInvalidResponse(format!("JSON parse error: {}", e)))
}

#[derive(Debug, Deserialize)]
struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    items: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: SearchItemId,
    #[serde(default)]
    snippet: Snippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchItemId {
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct VideoItem {
    id: String,
    #[serde(default)]
    snippet: Snippet,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct Snippet {
    title: String,
    description: String,
    channel_title: String,
    published_at: String,
    thumbnails: Thumbnails,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Thumbnails {
    medium: Option<Thumbnail>,
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    url: String,
}

impl Snippet {
    fn into_video(self, video_id: String) -> YouTubeVideo {
        YouTubeVideo {
            video_id,
            title: self.title,
            description: self.description,
            thumbnail: self.thumbnails.medium.map(|t| t.url).unwrap_or_default(),
            channel_title: self.channel_title,
            published_at: self.published_at,
        }
    }
}

/// Best-effort video lookups on top of a [`VideoSearchProvider`].
#[derive(Clone)]
pub struct VideoService {
    provider: Arc<dyn VideoSearchProvider>,
}

impl VideoService {
    pub fn new(provider: Arc<dyn VideoSearchProvider>) -> Self {
        Self { provider }
    }

    /// Search for videos. Never fails: provider errors yield an empty list.
    pub async fn search_videos(&self, query: &str, max_results: Option<u32>) -> Vec<YouTubeVideo> {
        let max_results = max_results
            .unwrap_or(DEFAULT_MAX_RESULTS)
            .clamp(1, MAX_RESULTS_LIMIT);

        match self.provider.search(query, max_results).await {
            Ok(mut videos) => {
                videos.retain(|v| !v.video_id.is_empty());
                videos.truncate(max_results as usize);
                tracing::debug!(query, count = videos.len(), "Video search complete");
                videos
            }
            Err(e) => {
                tracing::warn!(query, error = %e, "Video search failed; returning no results");
                Vec::new()
            }
        }
    }

    /// Look up one video. Provider errors are treated as "not found".
    pub async fn video_details(&self, video_id: &str) -> Option<YouTubeVideo> {
        match self.provider.video_details(video_id).await {
            Ok(video) => video,
            Err(e) => {
                tracing::warn!(video_id, error = %e, "Video lookup failed");
                None
            }
        }
    }

    /// Fill in unresolved `video` blocks with the top search hit.
    ///
    /// Blocks whose search comes back empty are left as they are.
    pub async fn resolve_video_blocks(&self, lesson: &mut LessonContent) {
        for block in lesson.content.iter_mut() {
            let ContentBlock::Video {
                query,
                video_id,
                title,
                thumbnail,
            } = block
            else {
                continue;
            };
            if video_id.is_some() || query.trim().is_empty() {
                continue;
            }

            if let Some(hit) = self.search_videos(query, Some(1)).await.into_iter().next() {
                *video_id = Some(hit.video_id);
                *title = Some(hit.title);
                if !hit.thumbnail.is_empty() {
                    *thumbnail = Some(hit.thumbnail);
                }
            }
        }
    }
}
