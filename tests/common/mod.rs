// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use chrono::{DateTime, NaiveDate, Utc};
use coach_summary::config::Config;
use coach_summary::models::{
    ActivityRecord, ActivityType, AthleteProfile, ClimbAttempt, ClimbDiscipline, Grade,
    SleepRecord,
};
use coach_summary::routes::create_router;
use coach_summary::services::ProfileStore;
use coach_summary::AppState;
use std::path::PathBuf;
use std::sync::Arc;

/// Profile used across tests: UTC athlete with both max HRs and a baseline.
#[allow(dead_code)]
pub fn test_profile() -> AthleteProfile {
    AthleteProfile {
        max_hr_running: Some(192),
        max_hr_cycling: Some(185),
        hrv_baseline_ms: Some(55.0),
        utc_offset_minutes: 0,
        updated_at: None,
    }
}

#[allow(dead_code)]
pub fn ts(raw: &str) -> DateTime<Utc> {
    raw.parse().expect("valid RFC3339 timestamp")
}

#[allow(dead_code)]
pub fn activity(id: u64, kind: ActivityType, start: &str, avg_hr: Option<u16>) -> ActivityRecord {
    ActivityRecord {
        activity_id: id,
        activity_type: kind,
        name: None,
        start: ts(start),
        elapsed_duration_secs: 3600.0,
        moving_duration_secs: None,
        avg_hr,
        max_hr: avg_hr.map(|hr| hr + 15),
    }
}

#[allow(dead_code)]
pub fn attempt(activity_id: u64, time: &str, duration_secs: f64, grade: &str, sent: bool) -> ClimbAttempt {
    ClimbAttempt {
        activity_id,
        discipline: ClimbDiscipline::Route,
        time: ts(time),
        duration_secs,
        grade: Grade::parse(grade),
        max_hr: Some(160),
        sent,
        status: if sent { "completed" } else { "attempted" }.to_string(),
        attempt_count: None,
    }
}

#[allow(dead_code)]
pub fn night(date: &str, hrv: f64) -> SleepRecord {
    SleepRecord {
        date: NaiveDate::parse_from_str(date, "%Y-%m-%d").expect("valid date"),
        avg_overnight_hrv: Some(hrv),
        resting_hr: Some(48),
        sleep_time_secs: Some(7.5 * 3600.0),
        sleep_score: Some(80.0),
    }
}

/// Path of a file under `tests/fixtures`.
#[allow(dead_code)]
pub fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

/// Unique scratch path for profile files.
#[allow(dead_code)]
pub fn scratch_path(name: &str) -> PathBuf {
    std::env::temp_dir()
        .join(format!("coach-summary-{}-{}", std::process::id(), name))
        .join("athlete_profile.json")
}

/// Create a test app backed by an in-memory profile.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    let state = Arc::new(AppState {
        config: Config::test_default(),
        profiles: ProfileStore::in_memory(test_profile()),
    });

    (create_router(state.clone()), state)
}
