// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Public sharing and outline translation.

use std::fmt;
use std::str::FromStr;

use crate::crypto;
use crate::db::Db;
use crate::error::AppError;
use crate::models::{Course, SharedCourse};
use crate::services::generator::CourseGenerator;

/// Attempts at drawing a fresh share ID before giving up.
const SHARE_ID_ATTEMPTS: usize = 3;

/// Languages a course can be translated into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    En,
    Hi,
    Es,
    Fr,
    De,
}

impl Language {
    pub const ALL: [Language; 5] = [
        Language::En,
        Language::Hi,
        Language::Es,
        Language::Fr,
        Language::De,
    ];

    /// ISO 639-1 code, as stored on the course.
    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Hi => "hi",
            Language::Es => "es",
            Language::Fr => "fr",
            Language::De => "de",
        }
    }

    /// English name used in prompts.
    pub fn name(self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Hi => "Hindi",
            Language::Es => "Spanish",
            Language::Fr => "French",
            Language::De => "German",
        }
    }

    pub fn supported_codes() -> Vec<&'static str> {
        Self::ALL.iter().map(|l| l.code()).collect()
    }
}

impl FromStr for Language {
    type Err = AppError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let code = raw.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|l| l.code() == code)
            .ok_or_else(|| AppError::UnsupportedLanguage(raw.to_string()))
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Make a course publicly readable and return its share ID.
///
/// A course that is already shared keeps its existing ID.
pub async fn share_course(db: &Db, owner_id: &str, course_id: &str) -> Result<String, AppError> {
    let mut attempt = 0;
    loop {
        attempt += 1;
        let candidate = crypto::generate_share_id()?;
        match db.assign_share_id(owner_id, course_id, &candidate).await {
            Ok(share_id) => {
                tracing::info!(course_id, "Course shared");
                return Ok(share_id);
            }
            Err(AppError::Conflict(_)) if attempt < SHARE_ID_ATTEMPTS => {
                tracing::warn!(course_id, attempt, "Share ID collision; retrying");
            }
            Err(e) => return Err(e),
        }
    }
}

/// Public, unauthenticated view of a shared course.
pub async fn get_shared_course(db: &Db, share_id: &str) -> Result<SharedCourse, AppError> {
    let course = db.get_course_by_share_id(share_id).await?;
    Ok(SharedCourse::from(course))
}

/// Stop sharing a course.
pub async fn revoke_share(db: &Db, owner_id: &str, course_id: &str) -> Result<(), AppError> {
    db.revoke_share_id(owner_id, course_id).await?;
    tracing::info!(course_id, "Course share revoked");
    Ok(())
}

/// Translate a course outline in place.
///
/// The language is validated before anything else, and the stored course is
/// only written once a complete translated outline has been parsed.
pub async fn translate_course(
    db: &Db,
    generator: &CourseGenerator,
    owner_id: &str,
    course_id: &str,
    language: &str,
) -> Result<Course, AppError> {
    let language: Language = language.parse()?;

    let course = db.get_owned_course(owner_id, course_id).await?;
    let translated = generator.translate_course(&course.outline, language).await?;

    let updated = db
        .update_after_translation(
            &course.id,
            &translated.title,
            &translated.description,
            &translated,
            language.code(),
        )
        .await?;

    tracing::info!(course_id, language = %language, "Course translated");
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_parse() {
        assert_eq!("es".parse::<Language>().unwrap(), Language::Es);
        assert_eq!(" DE ".parse::<Language>().unwrap(), Language::De);
        assert!(matches!(
            "xx".parse::<Language>(),
            Err(AppError::UnsupportedLanguage(code)) if code == "xx"
        ));
        assert!("".parse::<Language>().is_err());
    }

    #[test]
    fn test_supported_codes() {
        assert_eq!(Language::supported_codes(), vec!["en", "hi", "es", "fr", "de"]);
        assert_eq!(Language::Hi.name(), "Hindi");
    }
}
