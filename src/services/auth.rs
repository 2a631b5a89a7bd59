// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Registration and credential checks.

use serde::Serialize;

use crate::config::Config;
use crate::crypto;
use crate::db::{users::DUPLICATE_EMAIL, Db};
use crate::error::AppError;
use crate::middleware::auth::create_jwt;
use crate::models::{PublicUser, User};

/// Token plus public user fields returned by signup and login.
#[derive(Debug, Clone, Serialize)]
pub struct AuthSession {
    pub token: String,
    pub user: PublicUser,
}

/// Emails are compared case-insensitively.
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Create an account and sign it in.
///
/// Fails with `Conflict` if the email is already registered.
pub async fn register(
    db: &Db,
    config: &Config,
    email: &str,
    password: &str,
    name: &str,
) -> Result<AuthSession, AppError> {
    let email = normalize_email(email);

    if db.find_user_by_email(&email).await?.is_some() {
        return Err(AppError::Conflict(DUPLICATE_EMAIL.to_string()));
    }

    let password = password.to_string();
    let password_hash = tokio::task::spawn_blocking(move || crypto::hash_password(&password))
        .await
        .map_err(|e| AppError::Internal(e.into()))??;

    // The unique index still guards against a concurrent signup racing us here.
    let user = db.create_user(&email, name.trim(), &password_hash).await?;
    tracing::info!(user_id = %user.id, "User registered");

    issue_session(&user, config)
}

/// Check credentials and issue a session token.
///
/// Unknown email and wrong password both yield `InvalidCredentials`.
pub async fn authenticate(
    db: &Db,
    config: &Config,
    email: &str,
    password: &str,
) -> Result<AuthSession, AppError> {
    let email = normalize_email(email);

    let Some(user) = db.find_user_by_email(&email).await? else {
        tracing::debug!("Login attempt for unknown email");
        return Err(AppError::InvalidCredentials);
    };

    let password = password.to_string();
    let stored_hash = user.password_hash.clone();
    let valid = tokio::task::spawn_blocking(move || crypto::verify_password(&password, &stored_hash))
        .await
        .map_err(|e| AppError::Internal(e.into()))?;

    if !valid {
        tracing::debug!(user_id = %user.id, "Login attempt with wrong password");
        return Err(AppError::InvalidCredentials);
    }

    issue_session(&user, config)
}

fn issue_session(user: &User, config: &Config) -> Result<AuthSession, AppError> {
    let token = create_jwt(&user.id, &user.email, &config.jwt_signing_key, config.token_ttl)?;
    Ok(AuthSession {
        token,
        user: PublicUser::from(user),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::auth::verify_token;

    async fn setup() -> (Db, Config) {
        (Db::in_memory().await.unwrap(), Config::test_default())
    }

    #[tokio::test]
    async fn test_register_then_authenticate() {
        let (db, config) = setup().await;

        let session = register(&db, &config, "A@X.com ", "secret1", "A").await.unwrap();
        assert_eq!(session.user.email, "a@x.com");

        let claims = verify_token(&session.token, &config.jwt_signing_key).unwrap();
        assert_eq!(claims.sub, session.user.id);

        let login = authenticate(&db, &config, "a@x.com", "secret1").await.unwrap();
        assert_eq!(login.user.id, session.user.id);
    }

    #[tokio::test]
    async fn test_duplicate_registration_conflicts() {
        let (db, config) = setup().await;
        register(&db, &config, "a@x.com", "secret1", "A").await.unwrap();

        let err = register(&db, &config, "a@x.com", "different", "B").await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_bad_credentials_are_indistinguishable() {
        let (db, config) = setup().await;
        register(&db, &config, "a@x.com", "secret1", "A").await.unwrap();

        let wrong_password = authenticate(&db, &config, "a@x.com", "nope").await.unwrap_err();
        let unknown_email = authenticate(&db, &config, "b@x.com", "secret1").await.unwrap_err();

        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
        assert!(matches!(wrong_password, AppError::InvalidCredentials));
    }
}
