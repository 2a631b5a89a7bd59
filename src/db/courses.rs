// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Course/Lesson repository.
//!
//! Every owner-scoped operation treats "does not exist" and "owned by someone
//! else" identically: both surface as `NotFound("Course")`.

use chrono::Utc;
use sqlx::types::Json;
use sqlx::{Sqlite, Transaction};
use uuid::Uuid;

use crate::db::{conflict_or_db, Db};
use crate::envelope::FieldError;
use crate::error::AppError;
use crate::models::{
    Course, CourseOutline, CourseSummary, CourseWithLessons, Lesson, LessonContent,
};

const COURSE: &str = "Course";

impl Db {
    // ─── Courses ─────────────────────────────────────────────────

    /// Insert a new course owned by `owner_id`.
    pub async fn create_course(
        &self,
        owner_id: &str,
        title: &str,
        description: &str,
        outline: &CourseOutline,
    ) -> Result<Course, AppError> {
        let now = Utc::now();

        let course = sqlx::query_as::<_, Course>(
            "INSERT INTO courses (id, user_id, title, description, outline, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?) \
             RETURNING *",
        )
        .bind(Uuid::new_v4().to_string())
        .bind(owner_id)
        .bind(title)
        .bind(description)
        .bind(Json(outline))
        .bind(now)
        .bind(now)
        .fetch_one(self.pool())
        .await?;

        tracing::info!(course_id = %course.id, owner_id, "Course created");
        Ok(course)
    }

    /// List the owner's courses, newest first, each with its lesson count.
    ///
    /// `search` is a case-insensitive substring match on title or description.
    pub async fn list_courses(
        &self,
        owner_id: &str,
        search: Option<&str>,
    ) -> Result<Vec<CourseSummary>, AppError> {
        let courses = sqlx::query_as::<_, CourseSummary>(
            "SELECT c.*, \
                    (SELECT COUNT(*) FROM lessons l WHERE l.course_id = c.id) AS lesson_count \
             FROM courses c \
             WHERE c.user_id = ? \
             ORDER BY c.created_at DESC, c.rowid DESC",
        )
        .bind(owner_id)
        .fetch_all(self.pool())
        .await?;

        // Filtering happens here rather than in SQL because SQLite's LOWER()
        // only folds ASCII; per-user course lists are small.
        let needle = search
            .map(|q| q.trim().to_lowercase())
            .filter(|q| !q.is_empty());

        Ok(match needle {
            Some(needle) => courses
                .into_iter()
                .filter(|c| {
                    c.course.title.to_lowercase().contains(&needle)
                        || c.course.description.to_lowercase().contains(&needle)
                })
                .collect(),
            None => courses,
        })
    }

    /// Get an owned course with its lessons ordered by (module, lesson).
    pub async fn get_course(
        &self,
        owner_id: &str,
        course_id: &str,
    ) -> Result<CourseWithLessons, AppError> {
        let course = self.get_owned_course(owner_id, course_id).await?;

        let lessons = sqlx::query_as::<_, Lesson>(
            "SELECT * FROM lessons WHERE course_id = ? ORDER BY module_index ASC, lesson_index ASC",
        )
        .bind(&course.id)
        .fetch_all(self.pool())
        .await?;

        Ok(CourseWithLessons { course, lessons })
    }

    /// Get an owned course without lessons.
    pub async fn get_owned_course(&self, owner_id: &str, course_id: &str) -> Result<Course, AppError> {
        sqlx::query_as::<_, Course>("SELECT * FROM courses WHERE id = ? AND user_id = ?")
            .bind(course_id)
            .bind(owner_id)
            .fetch_optional(self.pool())
            .await?
            .ok_or(AppError::NotFound(COURSE))
    }

    /// Delete an owned course and all of its lessons atomically.
    pub async fn delete_course(&self, owner_id: &str, course_id: &str) -> Result<(), AppError> {
        let mut tx = self.pool().begin().await?;

        owned_course_in(&mut tx, owner_id, course_id).await?;

        let lessons = sqlx::query("DELETE FROM lessons WHERE course_id = ?")
            .bind(course_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        sqlx::query("DELETE FROM courses WHERE id = ?")
            .bind(course_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!(course_id, owner_id, lessons, "Course deleted");
        Ok(())
    }

    /// Overwrite title/description/outline after a successful translation.
    ///
    /// Ownership and ID are never touched. Single statement, so either the
    /// whole translation lands or nothing does.
    pub async fn update_after_translation(
        &self,
        course_id: &str,
        title: &str,
        description: &str,
        outline: &CourseOutline,
        language: &str,
    ) -> Result<Course, AppError> {
        sqlx::query_as::<_, Course>(
            "UPDATE courses \
             SET title = ?, description = ?, outline = ?, language = ?, updated_at = ? \
             WHERE id = ? \
             RETURNING *",
        )
        .bind(title)
        .bind(description)
        .bind(Json(outline))
        .bind(language)
        .bind(Utc::now())
        .bind(course_id)
        .fetch_optional(self.pool())
        .await?
        .ok_or(AppError::NotFound(COURSE))
    }

    // ─── Lessons ─────────────────────────────────────────────────

    /// Insert or overwrite the lesson at (module_index, lesson_index).
    ///
    /// Repeated calls with identical arguments converge to one row with
    /// identical content; the row keeps its original ID.
    pub async fn upsert_lesson(
        &self,
        owner_id: &str,
        course_id: &str,
        module_index: u32,
        lesson_index: u32,
        title: &str,
        content: &LessonContent,
    ) -> Result<Lesson, AppError> {
        let mut tx = self.pool().begin().await?;

        let course = owned_course_in(&mut tx, owner_id, course_id).await?;

        if course.outline.lesson_title(module_index, lesson_index).is_none() {
            return Err(AppError::Validation(vec![FieldError::new(
                "lessonIndex",
                format!(
                    "Course outline has no lesson at module {}, lesson {}",
                    module_index, lesson_index
                ),
            )]));
        }

        let now = Utc::now();
        let lesson = sqlx::query_as::<_, Lesson>(
            "INSERT INTO lessons \
                (id, course_id, module_index, lesson_index, title, content, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?) \
             ON CONFLICT (course_id, module_index, lesson_index) DO UPDATE SET \
                title = excluded.title, \
                content = excluded.content, \
                updated_at = excluded.updated_at \
             RETURNING *",
        )
        .bind(Uuid::new_v4().to_string())
        .bind(course_id)
        .bind(module_index)
        .bind(lesson_index)
        .bind(title)
        .bind(Json(content))
        .bind(now)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::debug!(
            course_id,
            module_index,
            lesson_index,
            lesson_id = %lesson.id,
            "Lesson saved"
        );
        Ok(lesson)
    }

    // ─── Sharing ─────────────────────────────────────────────────

    /// Persist `candidate` as the course's share ID unless it already has one.
    ///
    /// Returns the share ID now stored on the course.
    pub async fn assign_share_id(
        &self,
        owner_id: &str,
        course_id: &str,
        candidate: &str,
    ) -> Result<String, AppError> {
        let mut tx = self.pool().begin().await?;

        let course = owned_course_in(&mut tx, owner_id, course_id).await?;
        if let Some(existing) = course.share_id {
            tx.commit().await?;
            return Ok(existing);
        }

        sqlx::query("UPDATE courses SET share_id = ?, updated_at = ? WHERE id = ?")
            .bind(candidate)
            .bind(Utc::now())
            .bind(course_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| conflict_or_db(e, "Share identifier collision"))?;

        tx.commit().await?;
        Ok(candidate.to_string())
    }

    /// Remove the course's share ID; later public lookups fail with `NotFound`.
    pub async fn revoke_share_id(&self, owner_id: &str, course_id: &str) -> Result<(), AppError> {
        let result = sqlx::query(
            "UPDATE courses SET share_id = NULL, updated_at = ? WHERE id = ? AND user_id = ?",
        )
        .bind(Utc::now())
        .bind(course_id)
        .bind(owner_id)
        .execute(self.pool())
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(COURSE));
        }
        Ok(())
    }

    /// Public lookup by share ID.
    pub async fn get_course_by_share_id(&self, share_id: &str) -> Result<Course, AppError> {
        sqlx::query_as::<_, Course>("SELECT * FROM courses WHERE share_id = ?")
            .bind(share_id)
            .fetch_optional(self.pool())
            .await?
            .ok_or(AppError::NotFound(COURSE))
    }
}

/// Fetch an owned course inside a transaction, or `NotFound`.
async fn owned_course_in(
    tx: &mut Transaction<'_, Sqlite>,
    owner_id: &str,
    course_id: &str,
) -> Result<Course, AppError> {
    sqlx::query_as::<_, Course>("SELECT * FROM courses WHERE id = ? AND user_id = ?")
        .bind(course_id)
        .bind(owner_id)
        .fetch_optional(&mut **tx)
        .await?
        .ok_or(AppError::NotFound(COURSE))
}
