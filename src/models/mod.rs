// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for the application.

pub mod content;
pub mod course;
pub mod user;

pub use content::{ContentBlock, CourseModule, CourseOutline, LessonContent, McqOption};
pub use course::{Course, CourseSummary, CourseWithLessons, Lesson, SharedCourse};
pub use user::{PublicUser, User, UserProfile};
