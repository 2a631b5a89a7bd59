// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Generation routes. Nothing here is persisted; the client saves results
//! through the course routes.

use axum::{extract::State, routing::post, Router};
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

use crate::envelope::ApiResponse;
use crate::error::Result;
use crate::models::{CourseOutline, LessonContent};
use crate::routes::ValidatedJson;
use crate::services::generator::{DEFAULT_LESSON_COUNT, DEFAULT_MODULE_COUNT};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/generate/course", post(generate_course))
        .route("/api/generate/lesson", post(generate_lesson))
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct GenerateCourseRequest {
    #[validate(custom(function = "crate::routes::validated::not_blank", message = "Topic is required"))]
    pub topic: String,
    #[validate(range(min = 2, max = 10, message = "moduleCount must be between 2 and 10"))]
    pub module_count: Option<u32>,
    #[validate(range(min = 2, max = 8, message = "lessonCount must be between 2 and 8"))]
    pub lesson_count: Option<u32>,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct GenerateLessonRequest {
    #[validate(custom(function = "crate::routes::validated::not_blank", message = "Course title is required"))]
    pub course_title: String,
    #[validate(custom(function = "crate::routes::validated::not_blank", message = "Module title is required"))]
    pub module_title: String,
    #[validate(custom(function = "crate::routes::validated::not_blank", message = "Lesson title is required"))]
    pub lesson_title: String,
    pub previous_lessons: Vec<String>,
}

async fn generate_course(
    State(state): State<Arc<AppState>>,
    ValidatedJson(body): ValidatedJson<GenerateCourseRequest>,
) -> Result<ApiResponse<CourseOutline>> {
    let outline = state
        .generator
        .generate_course_outline(
            body.topic.trim(),
            body.module_count.unwrap_or(DEFAULT_MODULE_COUNT),
            body.lesson_count.unwrap_or(DEFAULT_LESSON_COUNT),
        )
        .await?;

    Ok(ApiResponse::ok(outline).with_message("Course outline generated successfully"))
}

async fn generate_lesson(
    State(state): State<Arc<AppState>>,
    ValidatedJson(body): ValidatedJson<GenerateLessonRequest>,
) -> Result<ApiResponse<LessonContent>> {
    let mut lesson = state
        .generator
        .generate_lesson_content(
            &body.course_title,
            &body.module_title,
            &body.lesson_title,
            &body.previous_lessons,
        )
        .await?;

    state.videos.resolve_video_blocks(&mut lesson).await;

    Ok(ApiResponse::ok(lesson).with_message("Lesson content generated successfully"))
}
