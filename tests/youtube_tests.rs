// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Public video search routes.

use axum::http::StatusCode;
use serde_json::json;
use text2learn::config::Config;

mod common;

use common::{video, StubVideos};

#[tokio::test]
async fn test_search_returns_mapped_videos() {
    let videos = StubVideos {
        videos: vec![
            video("a1", "Graphs 101"),
            video("b2", "Graphs 102"),
            video("c3", "Graphs 103"),
        ],
        fail: false,
    };
    let app = common::test_app_with(Config::test_default(), videos).await;

    let (status, body) = app.get("/api/youtube/search?q=graphs&maxResults=2", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    let results = body["data"].as_array().unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0]["videoId"], "a1");
    assert_eq!(results[0]["channelTitle"], "Test Channel");
    assert!(results[0]["thumbnail"].as_str().unwrap().starts_with("https://"));
}

#[tokio::test]
async fn test_provider_failure_is_empty_success() {
    let videos = StubVideos {
        videos: vec![video("a1", "Graphs 101")],
        fail: true,
    };
    let app = common::test_app_with(Config::test_default(), videos).await;

    let (status, body) = app.get("/api/youtube/search?q=graphs", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn test_search_validation() {
    let app = common::test_app().await;

    let (status, body) = app.get("/api/youtube/search", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"][0]["field"], "q");

    let (status, body) = app.get("/api/youtube/search?q=x&maxResults=11", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"][0]["field"], "maxResults");

    let (status, body) = app.get("/api/youtube/search?q=x&maxResults=lots", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");
    assert_eq!(body["errors"][0]["field"], "maxResults");

    let (status, body) = app.get("/api/youtube/search?q=%20%20", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"][0]["field"], "q");
}

#[tokio::test]
async fn test_video_details() {
    let videos = StubVideos {
        videos: vec![video("a1", "Graphs 101")],
        fail: false,
    };
    let app = common::test_app_with(Config::test_default(), videos).await;

    let (status, body) = app.get("/api/youtube/videos/a1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["title"], "Graphs 101");

    let (status, _) = app.get("/api/youtube/videos/zz", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
