// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Account routes: signup, login and the caller's profile.

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Extension, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

use crate::envelope::ApiResponse;
use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::UserProfile;
use crate::routes::ValidatedJson;
use crate::services::auth::{self, AuthSession};
use crate::AppState;

pub fn public_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/auth/signup", post(signup))
        .route("/api/auth/login", post(login))
}

pub fn protected_routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/auth/profile", get(profile))
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct SignupRequest {
    #[validate(email(message = "Valid email is required"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
    #[validate(custom(function = "crate::routes::validated::not_blank", message = "Name is required"))]
    pub name: String,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct LoginRequest {
    #[validate(email(message = "Valid email is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

async fn signup(
    State(state): State<Arc<AppState>>,
    ValidatedJson(body): ValidatedJson<SignupRequest>,
) -> Result<(StatusCode, ApiResponse<AuthSession>)> {
    let session =
        auth::register(&state.db, &state.config, &body.email, &body.password, &body.name).await?;

    Ok((
        StatusCode::CREATED,
        ApiResponse::ok(session).with_message("User created successfully"),
    ))
}

async fn login(
    State(state): State<Arc<AppState>>,
    ValidatedJson(body): ValidatedJson<LoginRequest>,
) -> Result<ApiResponse<AuthSession>> {
    let session = auth::authenticate(&state.db, &state.config, &body.email, &body.password).await?;
    Ok(ApiResponse::ok(session).with_message("Login successful"))
}

async fn profile(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<ApiResponse<UserProfile>> {
    let user = state
        .db
        .get_user(&user.user_id)
        .await?
        .ok_or(AppError::NotFound("User"))?;

    Ok(ApiResponse::ok(UserProfile::from(user)))
}
