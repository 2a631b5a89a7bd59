// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Credential store: user rows.

use chrono::Utc;
use uuid::Uuid;

use crate::db::{conflict_or_db, Db};
use crate::error::AppError;
use crate::models::User;

pub const DUPLICATE_EMAIL: &str = "User with this email already exists";

impl Db {
    /// Insert a new user. Fails with `Conflict` if the email is taken.
    pub async fn create_user(
        &self,
        email: &str,
        name: &str,
        password_hash: &str,
    ) -> Result<User, AppError> {
        let now = Utc::now();

        sqlx::query_as::<_, User>(
            "INSERT INTO users (id, email, name, password_hash, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?) \
             RETURNING *",
        )
        .bind(Uuid::new_v4().to_string())
        .bind(email)
        .bind(name)
        .bind(password_hash)
        .bind(now)
        .bind(now)
        .fetch_one(self.pool())
        .await
        .map_err(|e| conflict_or_db(e, DUPLICATE_EMAIL))
    }

    /// Look up a user by (normalized) email.
    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(self.pool())
            .await?)
    }

    /// Get a user by ID.
    pub async fn get_user(&self, user_id: &str) -> Result<Option<User>, AppError> {
        Ok(sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
            .bind(user_id)
            .fetch_optional(self.pool())
            .await?)
    }
}
