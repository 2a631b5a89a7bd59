// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! JWT session tokens: issuing and the bearer-token middleware.

use crate::error::AppError;
use crate::AppState;
use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, errors::ErrorKind, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// JWT claims structure.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// User email at issue time
    pub email: String,
    /// Expiration time (Unix timestamp)
    pub exp: usize,
    /// Issued at (Unix timestamp)
    pub iat: usize,
}

/// Authenticated user extracted from JWT.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: String,
    pub email: String,
}

/// Middleware that requires a valid `Authorization: Bearer <token>` header.
///
/// On success the `AuthUser` is attached to the request extensions.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let auth_user = verify_bearer(auth_header, &state.config.jwt_signing_key)?;
    request.extensions_mut().insert(auth_user);

    Ok(next.run(request).await)
}

/// Validate a raw `Authorization` header value.
///
/// Missing/malformed header, bad signature and expiry are distinct errors.
pub fn verify_bearer(auth_header: Option<&str>, signing_key: &[u8]) -> Result<AuthUser, AppError> {
    let token = match auth_header {
        Some(h) if h.starts_with("Bearer ") => h["Bearer ".len()..].trim(),
        _ => return Err(AppError::MissingToken),
    };
    if token.is_empty() {
        return Err(AppError::MissingToken);
    }

    let claims = verify_token(token, signing_key)?;
    Ok(AuthUser {
        user_id: claims.sub,
        email: claims.email,
    })
}

/// Verify signature and expiry of a session token.
pub fn verify_token(token: &str, signing_key: &[u8]) -> Result<Claims, AppError> {
    let key = DecodingKey::from_secret(signing_key);
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;

    decode::<Claims>(token, &key, &validation)
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => AppError::TokenExpired,
            _ => AppError::InvalidToken,
        })
}

/// Create a JWT for a user session.
pub fn create_jwt(
    user_id: &str,
    email: &str,
    signing_key: &[u8],
    ttl: Duration,
) -> anyhow::Result<String> {
    use jsonwebtoken::{encode, EncodingKey, Header};

    let now = chrono::Utc::now().timestamp() as usize;

    let claims = Claims {
        sub: user_id.to_string(),
        email: email.to_string(),
        iat: now,
        exp: now + ttl.as_secs() as usize,
    };

    Ok(encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(signing_key),
    )?)
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &[u8] = b"test_signing_key_32_bytes_long!!";

    #[test]
    fn test_issued_token_verifies() {
        let token = create_jwt("user-1", "a@x.com", KEY, Duration::from_secs(3600)).unwrap();
        let user = verify_bearer(Some(&format!("Bearer {}", token)), KEY).unwrap();

        assert_eq!(user.user_id, "user-1");
        assert_eq!(user.email, "a@x.com");
    }

    #[test]
    fn test_missing_and_malformed_headers() {
        assert!(matches!(verify_bearer(None, KEY), Err(AppError::MissingToken)));
        assert!(matches!(
            verify_bearer(Some("Token abc"), KEY),
            Err(AppError::MissingToken)
        ));
        assert!(matches!(
            verify_bearer(Some("Bearer "), KEY),
            Err(AppError::MissingToken)
        ));
    }

    #[test]
    fn test_wrong_key_is_invalid() {
        let token = create_jwt("user-1", "a@x.com", KEY, Duration::from_secs(3600)).unwrap();
        assert!(matches!(
            verify_token(&token, b"another_key_entirely_32_bytes!!!"),
            Err(AppError::InvalidToken)
        ));
        assert!(matches!(
            verify_token("not.a.jwt", KEY),
            Err(AppError::InvalidToken)
        ));
    }

    #[test]
    fn test_expired_token() {
        use jsonwebtoken::{encode, EncodingKey, Header};

        let now = chrono::Utc::now().timestamp() as usize;
        let claims = Claims {
            sub: "user-1".to_string(),
            email: "a@x.com".to_string(),
            iat: now - 7200,
            exp: now - 3600,
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &EncodingKey::from_secret(KEY))
            .unwrap();

        assert!(matches!(verify_token(&token, KEY), Err(AppError::TokenExpired)));
    }
}
