// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use futures_util::future::BoxFuture;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use text2learn::config::Config;
use text2learn::db::Db;
use text2learn::error::AppError;
use text2learn::routes::create_router;
use text2learn::services::{
    CourseGenerator, LanguageModel, VideoSearchProvider, VideoService, YouTubeVideo,
};
use text2learn::AppState;
use tower::ServiceExt;

/// Language model that replays queued responses and records prompts.
#[derive(Default)]
pub struct StubModel {
    responses: Mutex<VecDeque<Result<String, AppError>>>,
    prompts: Mutex<Vec<String>>,
    calls: AtomicUsize,
}

#[allow(dead_code)]
impl StubModel {
    pub fn push_text(&self, text: impl Into<String>) {
        self.responses.lock().unwrap().push_back(Ok(text.into()));
    }

    pub fn push_error(&self, err: AppError) {
        self.responses.lock().unwrap().push_back(Err(err));
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().unwrap().last().cloned()
    }
}

impl LanguageModel for StubModel {
    fn generate<'a>(&'a self, prompt: &'a str) -> BoxFuture<'a, Result<String, AppError>> {
        Box::pin(async move {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(AppError::Upstream("no stubbed response".to_string())))
        })
    }
}

/// Video provider returning a fixed list, or failing every call.
#[derive(Default)]
pub struct StubVideos {
    pub videos: Vec<YouTubeVideo>,
    pub fail: bool,
}

impl VideoSearchProvider for StubVideos {
    fn search<'a>(
        &'a self,
        _query: &'a str,
        max_results: u32,
    ) -> BoxFuture<'a, Result<Vec<YouTubeVideo>, AppError>> {
        Box::pin(async move {
            if self.fail {
                return Err(AppError::Upstream("HTTP 403: quota".to_string()));
            }
            Ok(self
                .videos
                .iter()
                .take(max_results as usize)
                .cloned()
                .collect())
        })
    }

    fn video_details<'a>(
        &'a self,
        video_id: &'a str,
    ) -> BoxFuture<'a, Result<Option<YouTubeVideo>, AppError>> {
        Box::pin(async move {
            if self.fail {
                return Err(AppError::Upstream("HTTP 500".to_string()));
            }
            Ok(self.videos.iter().find(|v| v.video_id == video_id).cloned())
        })
    }
}

#[allow(dead_code)]
pub fn video(id: &str, title: &str) -> YouTubeVideo {
    YouTubeVideo {
        video_id: id.to_string(),
        title: title.to_string(),
        description: format!("About {}", title),
        thumbnail: format!("https://i.ytimg.com/vi/{}/mqdefault.jpg", id),
        channel_title: "Test Channel".to_string(),
        published_at: "2024-01-01T00:00:00Z".to_string(),
    }
}

pub struct TestApp {
    pub router: axum::Router,
    #[allow(dead_code)]
    pub state: Arc<AppState>,
    #[allow(dead_code)]
    pub model: Arc<StubModel>,
}

/// App over an in-memory store, a stub model and no videos.
#[allow(dead_code)]
pub async fn test_app() -> TestApp {
    test_app_with(Config::test_default(), StubVideos::default()).await
}

pub async fn test_app_with(config: Config, videos: StubVideos) -> TestApp {
    let db = Db::in_memory().await.expect("in-memory database");
    let model = Arc::new(StubModel::default());

    let state = Arc::new(AppState {
        config,
        db,
        generator: CourseGenerator::new(model.clone()),
        videos: VideoService::new(Arc::new(videos)),
    });

    TestApp {
        router: create_router(state.clone()),
        state,
        model,
    }
}

#[allow(dead_code)]
impl TestApp {
    /// Send a request and return the status and parsed JSON body.
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send(Method::GET, uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, token, Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.send(Method::DELETE, uri, Some(token), None).await
    }

    /// Register a user and return (token, user id).
    pub async fn signup(&self, email: &str, name: &str) -> (String, String) {
        let (status, body) = self
            .post(
                "/api/auth/signup",
                None,
                json!({ "email": email, "password": "secret1", "name": name }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "signup failed: {}", body);
        (
            body["data"]["token"].as_str().unwrap().to_string(),
            body["data"]["user"]["id"].as_str().unwrap().to_string(),
        )
    }

    /// Save a course with the given outline and return its id.
    pub async fn create_course(&self, token: &str, outline: Value) -> String {
        let (status, body) = self
            .post(
                "/api/courses",
                Some(token),
                json!({
                    "title": outline["title"],
                    "description": outline["description"],
                    "outline": outline,
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create failed: {}", body);
        body["data"]["id"].as_str().unwrap().to_string()
    }
}

/// A 2x2 outline as the model would return it.
#[allow(dead_code)]
pub fn sample_outline(title: &str) -> Value {
    json!({
        "title": title,
        "description": format!("An introduction to {}", title),
        "modules": [
            { "title": "Foundations", "description": "Core ideas", "lessons": ["Vertices", "Edges"] },
            { "title": "Algorithms", "lessons": ["Traversal", "Shortest Paths"] }
        ]
    })
}

/// Minimal valid lesson content.
#[allow(dead_code)]
pub fn sample_lesson(title: &str) -> Value {
    json!({
        "title": title,
        "objectives": ["Understand the basics"],
        "estimatedMinutes": 10,
        "content": [
            { "type": "heading", "text": title, "level": 1 },
            { "type": "paragraph", "text": "Some explanation." }
        ]
    })
}
