// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;

use crate::services::summary::DEFAULT_WINDOW_DAYS;

/// Longest summary window the server will build.
pub const MAX_WINDOW_DAYS: u32 = 28;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,
    /// Frontend URL allowed by CORS
    pub frontend_url: String,
    /// Athlete profile JSON document
    pub profile_path: PathBuf,
    /// Past days listed before today in each report
    pub window_days: u32,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let port = match env::var("PORT") {
            Ok(v) => v
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid("PORT", v))?,
            Err(_) => 8080,
        };

        let window_days = match env::var("SUMMARY_WINDOW_DAYS") {
            Ok(v) => v
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|d| (1..=MAX_WINDOW_DAYS).contains(d))
                .ok_or(ConfigError::Invalid("SUMMARY_WINDOW_DAYS", v))?,
            Err(_) => DEFAULT_WINDOW_DAYS,
        };

        Ok(Self {
            port,
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            profile_path: env::var("ATHLETE_PROFILE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("data/athlete_profile.json")),
            window_days,
        })
    }

    /// Config for testing only.
    pub fn test_default() -> Self {
        Self {
            port: 8080,
            frontend_url: "http://localhost:5173".to_string(),
            profile_path: PathBuf::from("data/athlete_profile.json"),
            window_days: DEFAULT_WINDOW_DAYS,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1:?}")]
    Invalid(&'static str, String),
}
