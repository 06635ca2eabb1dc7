// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Nightly sleep/recovery record.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One night's sleep summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SleepRecord {
    /// Calendar date the night is attributed to
    pub date: NaiveDate,
    /// Average overnight heart-rate variability (ms)
    #[serde(default)]
    pub avg_overnight_hrv: Option<f64>,
    /// Resting heart rate (bpm)
    #[serde(default)]
    pub resting_hr: Option<u16>,
    #[serde(default)]
    pub sleep_time_secs: Option<f64>,
    /// Tracker sleep score, 0-100
    #[serde(default)]
    pub sleep_score: Option<f64>,
}
