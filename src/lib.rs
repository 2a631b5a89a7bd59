// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Text2Learn: AI-generated courses from a single topic.
//!
//! This crate provides the backend API: accounts, outline and lesson
//! generation through a generative model, YouTube video lookup, and a
//! per-user course library with sharing and translation.

pub mod config;
pub mod crypto;
pub mod db;
pub mod envelope;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use config::Config;
use db::Db;
use services::{CourseGenerator, VideoService};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: Db,
    pub generator: CourseGenerator,
    pub videos: VideoService,
}
