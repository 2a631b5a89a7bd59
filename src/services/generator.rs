// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Generative content gateway.
//!
//! Turns prompts into validated outlines and lessons. The model is treated
//! as an untrusted producer: every response goes through JSON extraction and
//! shape checks before anything reaches the caller.

use std::ops::RangeInclusive;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::error::AppError;
use crate::models::{ContentBlock, CourseOutline, LessonContent};
use crate::services::extract::extract_json_object;
use crate::services::gemini::LanguageModel;
use crate::services::prompts;
use crate::services::sharing::Language;

pub const DEFAULT_MODULE_COUNT: u32 = 5;
pub const DEFAULT_LESSON_COUNT: u32 = 4;
pub const MODULE_COUNT_RANGE: RangeInclusive<u32> = 2..=10;
pub const LESSON_COUNT_RANGE: RangeInclusive<u32> = 2..=8;

/// Generates course material through a [`LanguageModel`].
#[derive(Clone)]
pub struct CourseGenerator {
    model: Arc<dyn LanguageModel>,
}

impl CourseGenerator {
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self { model }
    }

    /// Generate a course outline with the requested number of modules and
    /// lessons per module.
    pub async fn generate_course_outline(
        &self,
        topic: &str,
        module_count: u32,
        lesson_count: u32,
    ) -> Result<CourseOutline, AppError> {
        if !MODULE_COUNT_RANGE.contains(&module_count) || !LESSON_COUNT_RANGE.contains(&lesson_count)
        {
            return Err(AppError::BadRequest(format!(
                "moduleCount must be in {:?} and lessonCount in {:?}",
                MODULE_COUNT_RANGE, LESSON_COUNT_RANGE
            )));
        }

        tracing::info!(topic, module_count, lesson_count, "Generating course outline");
        let raw = self
            .model
            .generate(&prompts::course_outline(topic, module_count, lesson_count))
            .await?;

        let outline = parse_outline(&raw)?;

        let counts_match = outline.modules.len() == module_count as usize
            && outline
                .modules
                .iter()
                .all(|m| m.lessons.len() == lesson_count as usize);
        if !counts_match {
            tracing::warn!(
                requested_modules = module_count,
                requested_lessons = lesson_count,
                shape = ?outline.shape(),
                "Model returned an outline with different counts"
            );
        }

        tracing::info!(
            title = %outline.title,
            modules = outline.modules.len(),
            "Generated course outline"
        );
        Ok(outline)
    }

    /// Generate the full content of one lesson.
    pub async fn generate_lesson_content(
        &self,
        course_title: &str,
        module_title: &str,
        lesson_title: &str,
        previous_lessons: &[String],
    ) -> Result<LessonContent, AppError> {
        tracing::info!(lesson = lesson_title, "Generating lesson content");
        let raw = self
            .model
            .generate(&prompts::lesson_content(
                course_title,
                module_title,
                lesson_title,
                previous_lessons,
            ))
            .await?;

        let lesson = parse_lesson(&raw)?;
        tracing::info!(
            title = %lesson.title,
            blocks = lesson.content.len(),
            "Generated lesson content"
        );
        Ok(lesson)
    }

    /// Translate an outline, requiring the result to keep the same shape.
    pub async fn translate_course(
        &self,
        outline: &CourseOutline,
        language: Language,
    ) -> Result<CourseOutline, AppError> {
        tracing::info!(language = language.code(), "Translating course outline");
        let prompt = prompts::translate_outline(outline, language.name())?;
        let raw = self.model.generate(&prompt).await?;

        let translated = parse_outline(&raw)?;
        if translated.shape() != outline.shape() {
            return Err(AppError::UpstreamInvalidResponse(format!(
                "translated outline has shape {:?}, expected {:?}",
                translated.shape(),
                outline.shape()
            )));
        }
        Ok(translated)
    }

    /// Send a fixed prompt and return the raw reply.
    pub async fn ping(&self) -> Result<String, AppError> {
        let reply = self.model.generate(prompts::PING).await?;
        Ok(reply.trim().to_string())
    }
}

fn non_empty_str<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    map.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Extract and validate a course outline from raw model text.
pub fn parse_outline(raw: &str) -> Result<CourseOutline, AppError> {
    let map = extract_json_object(raw)?;

    if non_empty_str(&map, "title").is_none() {
        return Err(AppError::UpstreamInvalidResponse(
            "course outline is missing a title".to_string(),
        ));
    }
    if !map.get("modules").is_some_and(Value::is_array) {
        return Err(AppError::UpstreamInvalidResponse(
            "course outline is missing a modules list".to_string(),
        ));
    }

    serde_json::from_value(Value::Object(map))
        .map_err(|e| AppError::UpstreamInvalidResponse(format!("invalid course outline: {}", e)))
}

/// Extract and validate lesson content from raw model text.
///
/// Blocks that do not match a known block type are dropped; a lesson with no
/// usable blocks is rejected.
pub fn parse_lesson(raw: &str) -> Result<LessonContent, AppError> {
    let mut map = extract_json_object(raw)?;

    let title = non_empty_str(&map, "title")
        .ok_or_else(|| {
            AppError::UpstreamInvalidResponse("lesson content is missing a title".to_string())
        })?
        .to_string();

    let Some(Value::Array(raw_blocks)) = map.remove("content") else {
        return Err(AppError::UpstreamInvalidResponse(
            "lesson content is missing a content list".to_string(),
        ));
    };

    let total = raw_blocks.len();
    let content: Vec<ContentBlock> = raw_blocks
        .into_iter()
        .enumerate()
        .filter_map(|(i, block)| match serde_json::from_value(block) {
            Ok(block) => Some(block),
            Err(e) => {
                tracing::warn!(index = i, error = %e, "Dropping malformed content block");
                None
            }
        })
        .collect();

    if content.is_empty() {
        return Err(AppError::UpstreamInvalidResponse(format!(
            "none of the {} content blocks were usable",
            total
        )));
    }

    let objectives = match map.get("objectives") {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    };

    let estimated_minutes = map.get("estimatedMinutes").and_then(|v| {
        v.as_u64()
            .or_else(|| v.as_f64().filter(|f| *f >= 0.0).map(|f| f.round() as u64))
            .and_then(|m| u32::try_from(m).ok())
    });

    Ok(LessonContent {
        title,
        objectives,
        content,
        estimated_minutes,
    })
}
