// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Signup, login, profile and bearer-token handling through the router.

use axum::http::StatusCode;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::Serialize;
use serde_json::json;
use std::time::{SystemTime, UNIX_EPOCH};
use text2learn::middleware::auth::verify_token;

mod common;

fn now() -> usize {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs() as usize
}

/// Sign arbitrary claims with the given key.
fn sign_token(sub: &str, exp: usize, signing_key: &[u8]) -> String {
    #[derive(Serialize)]
    struct Claims<'a> {
        sub: &'a str,
        email: &'a str,
        exp: usize,
        iat: usize,
    }

    encode(
        &Header::new(Algorithm::HS256),
        &Claims {
            sub,
            email: "a@x.com",
            exp,
            iat: now(),
        },
        &EncodingKey::from_secret(signing_key),
    )
    .unwrap()
}

#[tokio::test]
async fn test_signup_token_identifies_new_user() {
    let app = common::test_app().await;

    let (status, body) = app
        .post(
            "/api/auth/signup",
            None,
            json!({ "email": "a@x.com", "password": "secret1", "name": "A" }),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["user"]["email"], "a@x.com");
    assert_eq!(body["data"]["user"]["name"], "A");
    assert!(body["data"]["user"].get("passwordHash").is_none());
    assert!(body["data"]["user"].get("password_hash").is_none());

    let token = body["data"]["token"].as_str().unwrap();
    let claims = verify_token(token, &app.state.config.jwt_signing_key).unwrap();
    assert_eq!(claims.sub, body["data"]["user"]["id"].as_str().unwrap());
    assert_eq!(claims.email, "a@x.com");
}

#[tokio::test]
async fn test_login_with_correct_and_wrong_password() {
    let app = common::test_app().await;
    let (_, user_id) = app.signup("a@x.com", "A").await;

    let (status, body) = app
        .post(
            "/api/auth/login",
            None,
            json!({ "email": "a@x.com", "password": "secret1" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let token = body["data"]["token"].as_str().unwrap();
    let claims = verify_token(token, &app.state.config.jwt_signing_key).unwrap();
    assert_eq!(claims.sub, user_id);

    let (status, wrong) = app
        .post(
            "/api/auth/login",
            None,
            json!({ "email": "a@x.com", "password": "secret2" }),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong["success"], false);

    // Unknown email is indistinguishable from a wrong password
    let (status, unknown) = app
        .post(
            "/api/auth/login",
            None,
            json!({ "email": "nobody@x.com", "password": "secret1" }),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown["message"], wrong["message"]);
    assert_eq!(unknown["message"], "Invalid email or password");
}

#[tokio::test]
async fn test_duplicate_signup_conflicts() {
    let app = common::test_app().await;
    app.signup("a@x.com", "A").await;

    let (status, body) = app
        .post(
            "/api/auth/signup",
            None,
            json!({ "email": "A@X.COM", "password": "another1", "name": "Someone Else" }),
        )
        .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "conflict");
}

#[tokio::test]
async fn test_signup_validation_errors() {
    let app = common::test_app().await;

    let (status, body) = app
        .post(
            "/api/auth/signup",
            None,
            json!({ "email": "not-an-email", "password": "123" }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");

    let fields: Vec<&str> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["email", "name", "password"]);
}

#[tokio::test]
async fn test_profile_requires_token() {
    let app = common::test_app().await;
    let (token, user_id) = app.signup("a@x.com", "A").await;

    let (status, body) = app.get("/api/auth/profile", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], user_id.as_str());
    assert_eq!(body["data"]["email"], "a@x.com");
    assert!(body["data"]["createdAt"].is_string());

    let (status, body) = app.get("/api/auth/profile", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "missing_token");
    assert_eq!(body["message"], "No token provided. Authorization required.");
}

#[tokio::test]
async fn test_token_failures_are_distinguished() {
    let app = common::test_app().await;
    let key = app.state.config.jwt_signing_key.clone();

    let (status, body) = app.get("/api/auth/profile", Some("invalid.token.here")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "invalid_token");

    let forged = sign_token("someone", now() + 3600, b"a-completely-different-key!!!!!");
    let (status, body) = app.get("/api/auth/profile", Some(&forged)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "invalid_token");

    let expired = sign_token("someone", now() - 3600, &key);
    let (status, body) = app.get("/api/auth/profile", Some(&expired)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "token_expired");
    assert_eq!(body["message"], "Token expired");
}

#[tokio::test]
async fn test_valid_token_for_deleted_user_is_not_found() {
    let app = common::test_app().await;
    let token = sign_token("ghost", now() + 3600, &app.state.config.jwt_signing_key);

    let (status, body) = app.get("/api/auth/profile", Some(&token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "User not found");
}
