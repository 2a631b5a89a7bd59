// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Course outline and lesson content structures.
//!
//! These are stored as JSON columns and exchanged verbatim with the
//! frontend, so field names follow the camelCase wire format.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Hierarchical course skeleton produced before any lesson content exists.
///
/// Module order and lesson order are significant and preserved verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct CourseOutline {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub modules: Vec<CourseModule>,
}

impl CourseOutline {
    /// Number of lessons in each module, in order.
    pub fn shape(&self) -> Vec<usize> {
        self.modules.iter().map(|m| m.lessons.len()).collect()
    }

    /// Title of the lesson at the given position, if the slot exists.
    pub fn lesson_title(&self, module_index: u32, lesson_index: u32) -> Option<&str> {
        self.modules
            .get(module_index as usize)?
            .lessons
            .get(lesson_index as usize)
            .map(String::as_str)
    }
}

/// One module of a course outline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct CourseModule {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Lesson titles in teaching order
    #[serde(default)]
    pub lessons: Vec<String>,
}

/// Fully generated body of a single lesson.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct LessonContent {
    pub title: String,
    #[serde(default)]
    pub objectives: Vec<String>,
    pub content: Vec<ContentBlock>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_minutes: Option<u32>,
}

/// One typed unit of lesson content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum ContentBlock {
    Heading {
        text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        level: Option<u8>,
    },
    Paragraph {
        text: String,
    },
    Code {
        #[serde(default)]
        language: String,
        text: String,
    },
    List {
        items: Vec<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        ordered: Option<bool>,
    },
    Video {
        query: String,
        #[serde(
            default,
            rename = "videoId",
            skip_serializing_if = "Option::is_none"
        )]
        video_id: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        thumbnail: Option<String>,
    },
    Mcq {
        question: String,
        options: Vec<McqOption>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        explanation: Option<String>,
    },
}

impl ContentBlock {
    /// Short tag name, matching the serialized `type` field.
    pub fn kind(&self) -> &'static str {
        match self {
            ContentBlock::Heading { .. } => "heading",
            ContentBlock::Paragraph { .. } => "paragraph",
            ContentBlock::Code { .. } => "code",
            ContentBlock::List { .. } => "list",
            ContentBlock::Video { .. } => "video",
            ContentBlock::Mcq { .. } => "mcq",
        }
    }
}

/// A single answer option of a multiple-choice question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct McqOption {
    pub text: String,
    #[serde(default)]
    pub is_correct: bool,
}
