// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API routes: athlete profile and weekly summaries.

use crate::error::{AppError, Result};
use crate::models::{
    ActivityRecord, AthleteProfile, ClimbAttempt, ClimbDiscipline, DailyStatsRecord, ProfileUpdate,
    ReadinessRecord, SleepRecord, Vo2MaxRecord, WeeklyReport,
};
use crate::services::ingest::parse_markdown_export;
use crate::services::{SummaryInput, WeeklySummaryBuilder};
use crate::AppState;
use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/profile", get(get_profile).put(update_profile))
        .route("/api/summary", post(create_summary))
        .route("/api/summary/export", post(create_summary_from_export))
}

// ─── Athlete Profile ─────────────────────────────────────────

async fn get_profile(State(state): State<Arc<AppState>>) -> Json<AthleteProfile> {
    Json(state.profiles.current().await)
}

/// Explicit profile update. This is the only way max HR or the HRV baseline change.
async fn update_profile(
    State(state): State<Arc<AppState>>,
    Json(update): Json<ProfileUpdate>,
) -> Result<Json<AthleteProfile>> {
    update.validate()?;
    if update.is_empty() {
        return Err(AppError::BadRequest("No profile fields given".to_string()));
    }

    let profile = state.profiles.update(&update).await?;
    Ok(Json(profile))
}

// ─── Summaries ───────────────────────────────────────────────

#[derive(Deserialize)]
struct SummaryRequest {
    #[serde(default)]
    activities: Vec<ActivityRecord>,
    #[serde(default)]
    climbing_routes: Vec<ClimbAttempt>,
    #[serde(default)]
    boulder_problems: Vec<ClimbAttempt>,
    #[serde(default)]
    sleep: Vec<SleepRecord>,
    #[serde(default)]
    training_readiness: Vec<ReadinessRecord>,
    #[serde(default)]
    daily_stats: Vec<DailyStatsRecord>,
    #[serde(default)]
    vo2_max: Vec<Vo2MaxRecord>,
    /// Report time (RFC3339); defaults to the server clock
    now: Option<String>,
}

impl SummaryRequest {
    fn into_input(self) -> SummaryInput {
        let attempts = self
            .climbing_routes
            .into_iter()
            .map(|a| a.with_discipline(ClimbDiscipline::Route))
            .chain(
                self.boulder_problems
                    .into_iter()
                    .map(|a| a.with_discipline(ClimbDiscipline::Boulder)),
            )
            .collect();
        SummaryInput {
            activities: self.activities,
            attempts,
            sleep: self.sleep,
            readiness: self.training_readiness,
            daily_stats: self.daily_stats,
            vo2_max: self.vo2_max,
        }
    }
}

#[derive(Deserialize)]
struct ExportQuery {
    now: Option<String>,
}

fn parse_now(raw: Option<&str>) -> Result<DateTime<Utc>> {
    match raw {
        None => Ok(Utc::now()),
        Some(s) => DateTime::parse_from_rfc3339(s)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|_| AppError::BadRequest(format!("Invalid 'now' timestamp: {}", s))),
    }
}

async fn build_report(state: &AppState, input: &SummaryInput, now: DateTime<Utc>) -> WeeklyReport {
    let profile = state.profiles.current().await;
    WeeklySummaryBuilder::new(&profile)
        .window_days(state.config.window_days)
        .build(input, now)
}

async fn create_summary(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SummaryRequest>,
) -> Result<Json<WeeklyReport>> {
    let now = parse_now(request.now.as_deref())?;
    let input = request.into_input();

    tracing::debug!(
        activities = input.activities.len(),
        attempts = input.attempts.len(),
        nights = input.sleep.len(),
        "Building summary from JSON records"
    );

    Ok(Json(build_report(&state, &input, now).await))
}

/// Build a summary from the tracker's markdown export sent as the request body.
async fn create_summary_from_export(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ExportQuery>,
    body: String,
) -> Result<Json<WeeklyReport>> {
    let now = parse_now(query.now.as_deref())?;
    let input = parse_markdown_export(&body)?.into_input();

    Ok(Json(build_report(&state, &input, now).await))
}
