// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent API responses.

use std::sync::atomic::{AtomicBool, Ordering};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::envelope::{ApiResponse, FieldError};

/// When set, error responses append internal detail to the message.
static DIAGNOSTICS: AtomicBool = AtomicBool::new(false);

/// Enable or disable diagnostic detail in error responses.
///
/// Called once at startup from the deployment mode.
pub fn set_diagnostics(enabled: bool) {
    DIAGNOSTICS.store(enabled, Ordering::Relaxed);
}

fn diagnostics_enabled() -> bool {
    DIAGNOSTICS.load(Ordering::Relaxed)
}

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("No token provided. Authorization required.")]
    MissingToken,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token expired")]
    TokenExpired,

    /// Same message for unknown email and wrong password.
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    Conflict(String),

    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),

    #[error("Gemini API quota exceeded")]
    QuotaExceeded,

    #[error("Gemini API authentication failed: {0}")]
    UpstreamAuth(String),

    #[error("Invalid AI response: {0}")]
    UpstreamInvalidResponse(String),

    #[error("Upstream API error: {0}")]
    Upstream(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub const QUOTA_MESSAGE: &'static str =
        "Gemini API quota exceeded. Please wait a few minutes and try again.";

    /// HTTP status for this error kind.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::BadRequest(_) | AppError::UnsupportedLanguage(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::MissingToken
            | AppError::InvalidToken
            | AppError::TokenExpired
            | AppError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::QuotaExceeded => StatusCode::TOO_MANY_REQUESTS,
            AppError::Upstream(_) => StatusCode::BAD_GATEWAY,
            AppError::UpstreamAuth(_)
            | AppError::UpstreamInvalidResponse(_)
            | AppError::Database(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Machine-readable kind placed in the envelope's `error` field.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "validation_error",
            AppError::BadRequest(_) => "bad_request",
            AppError::MissingToken => "missing_token",
            AppError::InvalidToken => "invalid_token",
            AppError::TokenExpired => "token_expired",
            AppError::InvalidCredentials => "invalid_credentials",
            AppError::NotFound(_) => "not_found",
            AppError::Conflict(_) => "conflict",
            AppError::UnsupportedLanguage(_) => "unsupported_language",
            AppError::QuotaExceeded => "quota_exceeded",
            AppError::UpstreamAuth(_) => "upstream_auth_error",
            AppError::UpstreamInvalidResponse(_) => "upstream_invalid_response",
            AppError::Upstream(_) => "upstream_error",
            AppError::Database(_) => "database_error",
            AppError::Internal(_) => "internal_error",
        }
    }

    /// Client-facing message and the internal detail withheld from it.
    fn public_message(&self) -> (String, Option<String>) {
        match self {
            AppError::UnsupportedLanguage(code) => (
                format!(
                    "Unsupported language '{}'. Supported languages: {}",
                    code,
                    crate::services::sharing::Language::supported_codes().join(", ")
                ),
                None,
            ),
            AppError::QuotaExceeded => (Self::QUOTA_MESSAGE.to_string(), None),
            AppError::UpstreamAuth(detail) => (
                "Invalid Gemini API key. Please check your configuration.".to_string(),
                Some(detail.clone()),
            ),
            AppError::UpstreamInvalidResponse(detail) => (
                "The AI returned an invalid response. Please try again.".to_string(),
                Some(detail.clone()),
            ),
            AppError::Upstream(detail) => (
                "Upstream service error. Please try again later.".to_string(),
                Some(detail.clone()),
            ),
            AppError::Database(detail) => ("Database error".to_string(), Some(detail.clone())),
            AppError::Internal(err) => ("Internal server error".to_string(), Some(err.to_string())),
            other => (other.to_string(), None),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code();
        let (mut message, detail) = self.public_message();

        if let Some(detail) = &detail {
            if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
                tracing::error!(error = %detail, kind = code, "Request failed");
            } else {
                tracing::warn!(error = %detail, kind = code, "Request rejected");
            }
            if diagnostics_enabled() {
                message = format!("{} ({})", message, detail);
            }
        }

        let errors = match self {
            AppError::Validation(fields) => Some(fields),
            _ => None,
        };

        (status, ApiResponse::failure(message, code, errors)).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Database(err.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<FieldError> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| {
                    let message = e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("Invalid value ({})", e.code));
                    FieldError::new(camel_case(&field), message)
                })
            })
            .collect();
        fields.sort_by(|a, b| a.field.cmp(&b.field));
        AppError::Validation(fields)
    }
}

/// Request DTO fields are snake_case in Rust but camelCase on the wire.
fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
