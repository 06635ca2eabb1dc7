// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Athlete profile: the long-lived baselines every report depends on.
//!
//! Max heart rate and HRV baseline only change through an explicit
//! [`ProfileUpdate`]. Nothing in this crate derives them from activity data.

use chrono::{DateTime, FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::Sport;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AthleteProfile {
    /// Max heart rate while running (bpm)
    #[serde(default)]
    pub max_hr_running: Option<u16>,
    /// Max heart rate while cycling (bpm)
    #[serde(default)]
    pub max_hr_cycling: Option<u16>,
    /// Personal overnight HRV baseline (ms)
    #[serde(default)]
    pub hrv_baseline_ms: Option<f64>,
    /// Athlete's local UTC offset in minutes (e.g. -480 for PST)
    #[serde(default)]
    pub utc_offset_minutes: i32,
    /// Last explicit update
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl AthleteProfile {
    pub fn max_hr_for(&self, sport: Sport) -> Option<u16> {
        match sport {
            Sport::Running => self.max_hr_running,
            Sport::Cycling => self.max_hr_cycling,
        }
    }

    /// The athlete's local timezone.
    ///
    /// Out-of-range offsets (only possible through a hand-edited profile
    /// file) fall back to UTC.
    pub fn timezone(&self) -> FixedOffset {
        self.utc_offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .unwrap_or_else(|| {
                tracing::warn!(
                    utc_offset_minutes = self.utc_offset_minutes,
                    "Profile UTC offset out of range, using UTC"
                );
                Utc.fix()
            })
    }

    /// Apply an explicit athlete-provided update.
    pub fn apply(&mut self, update: &ProfileUpdate, now: DateTime<Utc>) {
        if let Some(v) = update.max_hr_running {
            self.max_hr_running = Some(v);
        }
        if let Some(v) = update.max_hr_cycling {
            self.max_hr_cycling = Some(v);
        }
        if let Some(v) = update.hrv_baseline_ms {
            self.hrv_baseline_ms = Some(v);
        }
        if let Some(v) = update.utc_offset_minutes {
            self.utc_offset_minutes = v;
        }
        self.updated_at = Some(now);
    }
}

/// Explicit profile update. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ProfileUpdate {
    #[validate(range(min = 100, max = 240))]
    pub max_hr_running: Option<u16>,
    #[validate(range(min = 100, max = 240))]
    pub max_hr_cycling: Option<u16>,
    #[validate(range(min = 1.0, max = 300.0))]
    pub hrv_baseline_ms: Option<f64>,
    #[validate(range(min = -720, max = 840))]
    pub utc_offset_minutes: Option<i32>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self.max_hr_running.is_none()
            && self.max_hr_cycling.is_none()
            && self.hrv_baseline_ms.is_none()
            && self.utc_offset_minutes.is_none()
    }
}
