// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod activity;
pub mod climb;
pub mod metrics;
pub mod profile;
pub mod sleep;
pub mod summary;

pub use activity::{ActivityRecord, ActivityType, Sport};
pub use climb::{ClimbAttempt, ClimbDiscipline, Grade, GradeScale};
pub use metrics::{
    DailyMetrics, DailyStatsRecord, ReadinessRecord, ReadinessSnapshot, RecentMetrics,
    SleepMetrics, Vo2MaxRecord,
};
pub use profile::{AthleteProfile, ProfileUpdate};
pub use sleep::SleepRecord;
pub use summary::{
    ClimbingSessionStats, ClimbingTotals, DayStatus, DaySummary, HrvStatus, Intensity,
    IntensityTier, Readiness, Recommendation, RestReason, SessionSummary, WeeklyReport,
    ZoneClassification,
};
