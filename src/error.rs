// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent API responses, plus the
//! per-field report issues that degrade a summary without aborting it.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::models::Sport;
use crate::services::ingest::IngestError;
use crate::services::profile_store::ProfileStoreError;

/// A field of the weekly report that could not be produced.
///
/// These never abort a report; they are collected into
/// [`WeeklyReport::issues`](crate::models::WeeklyReport::issues).
#[derive(Debug, Clone, PartialEq, Serialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SummaryError {
    #[error("Missing athlete baseline: {field}")]
    MissingBaselineData { field: &'static str },

    #[error("Insufficient history: {available} of {required} nights with HRV")]
    InsufficientHistory { available: usize, required: usize },

    #[error("No attempt data for climbing activity {activity_id}")]
    NoAttemptData { activity_id: u64 },

    #[error("Ambiguous timeline: {detail}")]
    AmbiguousTimeline { detail: String },

    #[error("Activity {activity_id} has no average heart rate")]
    MissingHeartRate { activity_id: u64 },

    #[error("Recorded {sport} max HR {observed} exceeds profile value {profile}; update the profile if this is real")]
    ObservedMaxHrAboveProfile {
        sport: Sport,
        observed: u16,
        profile: u16,
    },
}

/// Report issues in first-seen order, without repeats.
#[derive(Debug, Clone, Default)]
pub struct IssueLog(Vec<SummaryError>);

impl IssueLog {
    pub fn push(&mut self, issue: SummaryError) {
        if !self.0.contains(&issue) {
            tracing::debug!(%issue, "Report issue");
            self.0.push(issue);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_vec(self) -> Vec<SummaryError> {
        self.0
    }
}

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Invalid export: {0}")]
    Ingest(#[from] IngestError),

    #[error("Profile storage error: {0}")]
    Profile(#[from] ProfileStoreError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, details) = match &self {
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "bad_request", Some(msg.clone()))
            }
            AppError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                "validation_error",
                Some(errors.to_string()),
            ),
            AppError::Ingest(err) => {
                (StatusCode::BAD_REQUEST, "invalid_export", Some(err.to_string()))
            }
            AppError::Profile(err) => {
                tracing::error!(error = %err, "Profile storage error");
                (StatusCode::INTERNAL_SERVER_ERROR, "profile_error", None)
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", None)
            }
        };

        let body = ErrorResponse {
            error: error.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
