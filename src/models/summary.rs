// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Weekly report produced by the summary builder.
//!
//! Everything here is computed fresh per run and never persisted.

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::error::SummaryError;
use crate::models::{ActivityType, ClimbDiscipline, Grade, RecentMetrics, Sport};

/// Heart-rate intensity tier, lowest to highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IntensityTier {
    Base,
    Steady,
    Tempo,
    Threshold,
    Vo2Max,
}

impl IntensityTier {
    /// Display zone, 1 (Base) to 5 (VO2 Max).
    pub fn zone(self) -> u8 {
        match self {
            IntensityTier::Base => 1,
            IntensityTier::Steady => 2,
            IntensityTier::Tempo => 3,
            IntensityTier::Threshold => 4,
            IntensityTier::Vo2Max => 5,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            IntensityTier::Base => "Base",
            IntensityTier::Steady => "Steady",
            IntensityTier::Tempo => "Tempo",
            IntensityTier::Threshold => "Threshold",
            IntensityTier::Vo2Max => "VO2 Max",
        }
    }

    /// Zones 4-5.
    pub fn is_hard(self) -> bool {
        self >= IntensityTier::Threshold
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZoneClassification {
    pub tier: IntensityTier,
    pub zone: u8,
    /// Display name of the tier, e.g. "VO2 Max"
    pub label: &'static str,
    /// Average HR as a percentage of the sport's max HR
    pub percent_of_max: f64,
}

/// Statistics for one climbing session, computed from its attempts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClimbingSessionStats {
    pub attempts: usize,
    pub sends: usize,
    pub send_rate: f64,
    pub climbing_minutes: f64,
    pub avg_attempt_secs: f64,
    pub hardest_attempted: Option<Grade>,
    pub hardest_sent: Option<Grade>,
    /// Second-half send rate minus first-half send rate (negative = fading)
    pub fatigue_trend: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSummary {
    pub activity_id: u64,
    pub activity_type: ActivityType,
    pub name: Option<String>,
    pub start_local: DateTime<FixedOffset>,
    /// `None` when it cannot be determined (climbing without attempts)
    pub duration_minutes: Option<f64>,
    pub avg_hr: Option<u16>,
    pub max_hr: Option<u16>,
    pub zone: Option<ZoneClassification>,
    pub climbing: Option<ClimbingSessionStats>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DayStatus {
    Trained,
    RestDay,
    InProgress,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DaySummary {
    pub date: NaiveDate,
    /// `Mon`..`Sun`
    pub weekday: String,
    pub status: DayStatus,
    /// Non-walking sessions in chronological order
    pub sessions: Vec<SessionSummary>,
    /// Walking records seen that day (never counted as training)
    pub walks: usize,
}

/// HRV readiness, ordered from least to most ready.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Readiness {
    PrioritizeRecovery,
    Normal,
    ReadyForHardTraining,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct HrvStatus {
    /// Mean over a complete 7-night window
    pub average_7day: Option<f64>,
    /// Mean over fewer than 7 nights, flagged as partial
    pub partial_average: Option<f64>,
    pub latest: Option<f64>,
    pub latest_date: Option<NaiveDate>,
    pub baseline: Option<f64>,
    pub records_used: usize,
    pub readiness: Option<Readiness>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Intensity {
    /// Zones 1-2 only
    Easy,
    /// Any intensity fits the week's distribution
    Any,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RestReason {
    RecoveryPriority,
    ConsecutiveTrainingDays { days: usize },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Recommendation {
    Rest {
        reason: RestReason,
    },
    Train {
        sport: Sport,
        intensity: Intensity,
        /// Share of the trailing week's zone-classified minutes in Zones 4-5
        hard_share: Option<f64>,
    },
}

/// Climbing volume per discipline over the report window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClimbingTotals {
    pub discipline: ClimbDiscipline,
    pub sessions: usize,
    pub attempts: usize,
    pub sends: usize,
    pub minutes: f64,
    /// Mean tracker attempt count per logged climb, where recorded
    pub avg_attempt_count: Option<f64>,
    /// Attempt count per grade
    pub grades: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklyReport {
    pub generated_at: DateTime<FixedOffset>,
    pub today: NaiveDate,
    /// Oldest first; the last entry is today
    pub days: Vec<DaySummary>,
    pub hrv: HrvStatus,
    pub recommendation: Recommendation,
    pub climbing: Vec<ClimbingTotals>,
    pub recent_metrics: RecentMetrics,
    /// Fields the report could not fill, and why
    pub issues: Vec<SummaryError>,
}

impl WeeklyReport {
    pub fn today(&self) -> Option<&DaySummary> {
        self.days.last()
    }

    pub fn day(&self, date: NaiveDate) -> Option<&DaySummary> {
        self.days.iter().find(|d| d.date == date)
    }
}
