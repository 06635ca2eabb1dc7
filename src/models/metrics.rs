// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Wellness metrics from the tracker: training readiness, daily stats and
//! VO2 max estimates, plus the report block built from them.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Tracker training-readiness reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadinessRecord {
    pub time: DateTime<Utc>,
    #[serde(default)]
    pub score: Option<f64>,
    /// Tracker level label, e.g. `MODERATE`
    #[serde(default)]
    pub level: Option<String>,
    #[serde(default)]
    pub acute_load: Option<f64>,
}

/// One day of tracker daily stats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyStatsRecord {
    pub date: NaiveDate,
    #[serde(default)]
    pub total_steps: Option<u64>,
    #[serde(default)]
    pub resting_hr: Option<u16>,
    /// Time spent stressed
    #[serde(default)]
    pub stress_duration_secs: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vo2MaxRecord {
    pub date: NaiveDate,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReadinessSnapshot {
    pub time: DateTime<Utc>,
    pub score: Option<f64>,
    pub level: Option<String>,
    pub acute_load: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SleepMetrics {
    /// Nights in the window
    pub nights: usize,
    pub avg_duration_hours: Option<f64>,
    pub avg_score: Option<f64>,
    pub latest_score: Option<f64>,
    pub avg_resting_hr: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyMetrics {
    pub days: usize,
    pub avg_steps: Option<f64>,
    pub avg_resting_hr: Option<f64>,
    pub avg_stress_minutes: Option<f64>,
}

/// Trailing-week wellness context. Informational only; nothing here feeds
/// the recommendation.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RecentMetrics {
    pub training_readiness: Option<ReadinessSnapshot>,
    pub sleep: Option<SleepMetrics>,
    pub daily: Option<DailyMetrics>,
    /// Latest estimates, oldest first
    pub vo2_max: Vec<Vo2MaxRecord>,
}
