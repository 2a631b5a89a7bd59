// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.
//!
//! Loaded once at startup; the JWT signing secret is mandatory and the
//! process refuses to start without it.

use std::env;
use std::time::Duration;

/// Default token lifetime when `JWT_EXPIRES_IN` is unset.
const DEFAULT_TOKEN_TTL: &str = "7d";

/// Default generative model.
const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash-exp";

/// Values shipped in `.env.example` files that mean "not configured".
const PLACEHOLDER_KEYS: &[&str] = &[
    "your-real-gemini-key-here",
    "YOUR_GEMINI_API_KEY_HERE",
    "your-real-youtube-key-here",
];

/// Deployment mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" | "local" => Environment::Development,
            _ => Environment::Production,
        }
    }

    pub fn is_development(self) -> bool {
        self == Environment::Development
    }
}

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    // --- Environment Variables (non-sensitive) ---
    /// Frontend URL allowed by CORS
    pub frontend_url: String,
    /// Server port
    pub port: u16,
    /// Relational store connection string
    pub database_url: String,
    /// Gemini model name
    pub gemini_model: String,
    /// Session token lifetime
    pub token_ttl: Duration,
    /// Deployment mode (controls diagnostics and test routes)
    pub environment: Environment,

    // --- Secrets ---
    /// JWT signing key for session tokens (raw bytes)
    pub jwt_signing_key: Vec<u8>,
    /// Gemini API key (None = generation unavailable)
    pub gemini_api_key: Option<String>,
    /// YouTube Data API key (None = video search returns nothing)
    pub youtube_api_key: Option<String>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// A `.env` file in the working directory is honoured for local development.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let jwt_secret = env::var("JWT_SECRET")
            .map(|v| v.trim().to_string())
            .map_err(|_| ConfigError::Missing("JWT_SECRET"))?;
        if jwt_secret.is_empty() {
            return Err(ConfigError::Missing("JWT_SECRET"));
        }

        let ttl_raw = env::var("JWT_EXPIRES_IN").unwrap_or_else(|_| DEFAULT_TOKEN_TTL.to_string());
        let token_ttl = parse_ttl(&ttl_raw).ok_or(ConfigError::Invalid {
            var: "JWT_EXPIRES_IN",
            value: ttl_raw,
        })?;

        Ok(Self {
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "5000".to_string())
                .parse()
                .unwrap_or(5000),
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://text2learn.db?mode=rwc".to_string()),
            gemini_model: env::var("GEMINI_MODEL")
                .unwrap_or_else(|_| DEFAULT_GEMINI_MODEL.to_string()),
            token_ttl,
            environment: Environment::parse(
                &env::var("APP_ENV").unwrap_or_else(|_| "production".to_string()),
            ),
            jwt_signing_key: jwt_secret.into_bytes(),
            gemini_api_key: env::var("GEMINI_API_KEY").ok().and_then(|v| clean_api_key(&v)),
            youtube_api_key: env::var("YOUTUBE_API_KEY").ok().and_then(|v| clean_api_key(&v)),
        })
    }

    /// Fixed configuration for tests.
    pub fn test_default() -> Self {
        Self {
            frontend_url: "http://localhost:5173".to_string(),
            port: 5000,
            database_url: "sqlite::memory:".to_string(),
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            token_ttl: Duration::from_secs(7 * 24 * 60 * 60),
            environment: Environment::Production,
            jwt_signing_key: b"test_jwt_key_32_bytes_minimum!!".to_vec(),
            gemini_api_key: Some("test_gemini_key".to_string()),
            youtube_api_key: None,
        }
    }
}

/// Strip surrounding quotes/whitespace and drop placeholder values.
fn clean_api_key(raw: &str) -> Option<String> {
    let key = raw
        .trim()
        .trim_matches(|c| c == '"' || c == '\'')
        .trim()
        .to_string();

    if key.is_empty() || PLACEHOLDER_KEYS.contains(&key.as_str()) {
        None
    } else {
        Some(key)
    }
}

/// Parse a token lifetime: plain seconds (`3600`) or `<n>s|m|h|d` (`7d`).
pub fn parse_ttl(raw: &str) -> Option<Duration> {
    let raw = raw.trim();
    let (digits, multiplier) = match raw.chars().last()? {
        's' => (&raw[..raw.len() - 1], 1),
        'm' => (&raw[..raw.len() - 1], 60),
        'h' => (&raw[..raw.len() - 1], 60 * 60),
        'd' => (&raw[..raw.len() - 1], 24 * 60 * 60),
        c if c.is_ascii_digit() => (raw, 1),
        _ => return None,
    };

    let value: u64 = digits.trim().parse().ok()?;
    if value == 0 {
        return None;
    }
    value.checked_mul(multiplier).map(Duration::from_secs)
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {var}: {value:?}")]
    Invalid { var: &'static str, value: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ttl_units() {
        assert_eq!(parse_ttl("7d"), Some(Duration::from_secs(604_800)));
        assert_eq!(parse_ttl("12h"), Some(Duration::from_secs(43_200)));
        assert_eq!(parse_ttl("30m"), Some(Duration::from_secs(1_800)));
        assert_eq!(parse_ttl("45s"), Some(Duration::from_secs(45)));
        assert_eq!(parse_ttl("3600"), Some(Duration::from_secs(3_600)));
    }

    #[test]
    fn test_parse_ttl_rejects_garbage() {
        assert_eq!(parse_ttl(""), None);
        assert_eq!(parse_ttl("d"), None);
        assert_eq!(parse_ttl("7w"), None);
        assert_eq!(parse_ttl("0d"), None);
        assert_eq!(parse_ttl("-1h"), None);
    }

    #[test]
    fn test_clean_api_key() {
        assert_eq!(clean_api_key("\"abc123\""), Some("abc123".to_string()));
        assert_eq!(clean_api_key("  'abc' "), Some("abc".to_string()));
        assert_eq!(clean_api_key("your-real-gemini-key-here"), None);
        assert_eq!(clean_api_key("   "), None);
    }

    #[test]
    fn test_environment_parse() {
        assert!(Environment::parse("development").is_development());
        assert!(Environment::parse("DEV").is_development());
        assert!(!Environment::parse("production").is_development());
        assert!(!Environment::parse("anything").is_development());
    }

    #[test]
    fn test_config_from_env() {
        // Set required env vars for test
        env::set_var("JWT_SECRET", "test_jwt_key_32_bytes_minimum!!");
        env::set_var("JWT_EXPIRES_IN", "2h");

        let config = Config::from_env().expect("Config should load");

        assert_eq!(config.jwt_signing_key, b"test_jwt_key_32_bytes_minimum!!".to_vec());
        assert_eq!(config.token_ttl, Duration::from_secs(7_200));
    }
}
