// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Course and lesson models for storage and API.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::{CourseOutline, LessonContent};

/// Course row stored in the `courses` table.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: String,
    /// Owning user ID
    pub user_id: String,
    pub title: String,
    pub description: String,
    #[sqlx(json)]
    pub outline: CourseOutline,
    /// Public share identifier, if the course has been shared
    pub share_id: Option<String>,
    /// Language tag of the last translation (None = as generated)
    pub language: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Course listing entry annotated with its saved lesson count.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CourseSummary {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub course: Course,
    pub lesson_count: i64,
}

/// Course together with its saved lessons, ordered by (module, lesson).
#[derive(Debug, Clone, Serialize)]
pub struct CourseWithLessons {
    #[serde(flatten)]
    pub course: Course,
    pub lessons: Vec<Lesson>,
}

/// Lesson row stored in the `lessons` table.
///
/// Unique per (course_id, module_index, lesson_index).
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    pub id: String,
    pub course_id: String,
    pub module_index: u32,
    pub lesson_index: u32,
    pub title: String,
    #[sqlx(json)]
    pub content: LessonContent,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Read-only public view of a shared course.
///
/// Carries no owner, course ID or share identifier.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SharedCourse {
    pub title: String,
    pub description: String,
    pub outline: CourseOutline,
    pub language: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Course> for SharedCourse {
    fn from(course: Course) -> Self {
        Self {
            title: course.title,
            description: course.description,
            outline: course.outline,
            language: course.language,
            created_at: course.created_at,
            updated_at: course.updated_at,
        }
    }
}
