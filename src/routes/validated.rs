// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Extractors that deserialize and then run `validator` checks.
//!
//! Rejections become `AppError`, so malformed input gets the same envelope
//! as every other failure. A value of the wrong type for a known field is
//! reported against that field; broken syntax stays a plain bad request.

use std::error::Error as StdError;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{FromRequest, FromRequestParts, Query, Request};
use axum::http::request::Parts;
use axum::Json;
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationError};

use crate::envelope::FieldError;
use crate::error::AppError;

/// JSON body that has passed its `Validate` rules.
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(json_rejection)?;
        value.validate()?;
        Ok(Self(value))
    }
}

/// Query string that has passed its `Validate` rules.
#[derive(Debug, Clone)]
pub struct ValidatedQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ValidatedQuery<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(query_rejection)?;
        value.validate()?;
        Ok(Self(value))
    }
}

/// Rejects strings that are empty once surrounding whitespace is removed.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

fn json_rejection(rejection: JsonRejection) -> AppError {
    let field_error = match &rejection {
        JsonRejection::JsonDataError(err) => field_type_error::<serde_json::Error>(err),
        _ => None,
    };
    field_error.unwrap_or_else(|| AppError::BadRequest(rejection.body_text()))
}

fn query_rejection(rejection: QueryRejection) -> AppError {
    let field_error = match &rejection {
        QueryRejection::FailedToDeserializeQueryString(err) => {
            field_type_error::<serde::de::value::Error>(err)
        }
        _ => None,
    };
    field_error.unwrap_or_else(|| AppError::BadRequest(rejection.body_text()))
}

/// Finds the serde path of the offending field in a deserialization rejection.
///
/// `None` when the failure is not tied to a field, e.g. a body that is not an
/// object at all.
fn field_type_error<E>(rejection: &(dyn StdError + 'static)) -> Option<AppError>
where
    E: StdError + 'static,
{
    let mut source = rejection.source();
    while let Some(err) = source {
        if let Some(err) = err.downcast_ref::<serde_path_to_error::Error<E>>() {
            let field = err.path().to_string();
            if field == "." {
                return None;
            }
            let detail = err.inner().to_string();
            let detail = match detail.find(" at line ") {
                Some(end) => &detail[..end],
                None => detail.as_str(),
            };
            return Some(AppError::Validation(vec![FieldError::new(
                field,
                format!("Invalid value: {}", detail),
            )]));
        }
        source = err.source();
    }
    None
}
