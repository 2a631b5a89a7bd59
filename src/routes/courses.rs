// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Course library routes: CRUD, lesson saves, sharing and translation.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Extension, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::envelope::{ApiResponse, FieldError};
use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{
    Course, CourseOutline, CourseSummary, CourseWithLessons, Lesson, LessonContent, SharedCourse,
};
use crate::routes::{ValidatedJson, ValidatedQuery};
use crate::services::sharing;
use crate::AppState;

/// Course routes (require authentication).
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/courses", post(create_course).get(list_courses))
        .route("/api/courses/{id}", get(get_course).delete(delete_course))
        .route("/api/courses/{id}/lessons", post(save_lesson))
        .route(
            "/api/courses/{id}/share",
            post(share_course).delete(revoke_share),
        )
        .route("/api/courses/{id}/translate", post(translate_course))
}

/// Public read-only view of shared courses.
pub fn public_routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/courses/share/{share_id}", get(get_shared_course))
}

// ─── Courses ─────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct CreateCourseRequest {
    #[validate(custom(function = "crate::routes::validated::not_blank", message = "Title is required"))]
    pub title: String,
    pub description: String,
    #[validate(required(message = "Outline is required"))]
    pub outline: Option<CourseOutline>,
}

async fn create_course(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    ValidatedJson(body): ValidatedJson<CreateCourseRequest>,
) -> Result<(StatusCode, ApiResponse<Course>)> {
    let outline = body
        .outline
        .ok_or_else(|| AppError::Validation(vec![FieldError::new("outline", "Outline is required")]))?;

    let course = state
        .db
        .create_course(&user.user_id, body.title.trim(), &body.description, &outline)
        .await?;

    Ok((
        StatusCode::CREATED,
        ApiResponse::ok(course).with_message("Course created successfully"),
    ))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ListCoursesParams {
    /// Case-insensitive match on title or description
    pub q: Option<String>,
}

async fn list_courses(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<ListCoursesParams>,
) -> Result<ApiResponse<Vec<CourseSummary>>> {
    let search = params
        .q
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty());

    let courses = state.db.list_courses(&user.user_id, search).await?;
    Ok(ApiResponse::ok(courses))
}

async fn get_course(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(course_id): Path<String>,
) -> Result<ApiResponse<CourseWithLessons>> {
    let course = state.db.get_course(&user.user_id, &course_id).await?;
    Ok(ApiResponse::ok(course))
}

async fn delete_course(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(course_id): Path<String>,
) -> Result<ApiResponse<()>> {
    state.db.delete_course(&user.user_id, &course_id).await?;
    Ok(ApiResponse::message_only("Course deleted successfully"))
}

// ─── Lessons ─────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct SaveLessonRequest {
    #[validate(required(message = "moduleIndex is required"))]
    pub module_index: Option<u32>,
    #[validate(required(message = "lessonIndex is required"))]
    pub lesson_index: Option<u32>,
    #[validate(custom(function = "crate::routes::validated::not_blank", message = "Title is required"))]
    pub title: String,
    #[validate(required(message = "Content is required"))]
    pub content: Option<LessonContent>,
}

async fn save_lesson(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(course_id): Path<String>,
    ValidatedJson(body): ValidatedJson<SaveLessonRequest>,
) -> Result<ApiResponse<Lesson>> {
    let (Some(module_index), Some(lesson_index), Some(content)) =
        (body.module_index, body.lesson_index, body.content)
    else {
        return Err(AppError::BadRequest(
            "moduleIndex, lessonIndex and content are required".to_string(),
        ));
    };

    let lesson = state
        .db
        .upsert_lesson(
            &user.user_id,
            &course_id,
            module_index,
            lesson_index,
            &body.title,
            &content,
        )
        .await?;

    Ok(ApiResponse::ok(lesson).with_message("Lesson saved successfully"))
}

// ─── Sharing ─────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ShareResponse {
    pub share_id: String,
}

async fn share_course(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(course_id): Path<String>,
) -> Result<ApiResponse<ShareResponse>> {
    let share_id = sharing::share_course(&state.db, &user.user_id, &course_id).await?;
    Ok(ApiResponse::ok(ShareResponse { share_id }).with_message("Course shared successfully"))
}

async fn revoke_share(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(course_id): Path<String>,
) -> Result<ApiResponse<()>> {
    sharing::revoke_share(&state.db, &user.user_id, &course_id).await?;
    Ok(ApiResponse::message_only("Course is no longer shared"))
}

async fn get_shared_course(
    State(state): State<Arc<AppState>>,
    Path(share_id): Path<String>,
) -> Result<ApiResponse<SharedCourse>> {
    let course = sharing::get_shared_course(&state.db, &share_id).await?;
    Ok(ApiResponse::ok(course))
}

// ─── Translation ─────────────────────────────────────────────

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct TranslateParams {
    #[validate(length(min = 1, message = "language is required"))]
    pub language: String,
}

async fn translate_course(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(course_id): Path<String>,
    ValidatedQuery(params): ValidatedQuery<TranslateParams>,
) -> Result<ApiResponse<Course>> {
    let course = sharing::translate_course(
        &state.db,
        &state.generator,
        &user.user_id,
        &course_id,
        &params.language,
    )
    .await?;

    Ok(ApiResponse::ok(course).with_message("Course translated successfully"))
}
