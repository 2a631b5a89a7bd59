// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod auth;
pub mod extract;
pub mod gemini;
pub mod generator;
pub mod prompts;
pub mod sharing;
pub mod youtube;

pub use gemini::{GeminiClient, LanguageModel};
pub use generator::CourseGenerator;
pub use sharing::Language;
pub use youtube::{VideoSearchProvider, VideoService, YouTubeClient, YouTubeVideo};
