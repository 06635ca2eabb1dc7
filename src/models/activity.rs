// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Fitness-tracker activity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Activity category as exported by the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityType {
    Running,
    Cycling,
    Walking,
    IndoorClimbing,
    Bouldering,
    #[serde(other)]
    Other,
}

/// Sports with independently tracked heart-rate zones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sport {
    Running,
    Cycling,
}

impl ActivityType {
    /// Map a tracker `activityType` string onto our categories.
    pub fn from_tracker(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "running" | "trail_running" | "treadmill_running" | "track_running" => Self::Running,
            "cycling" | "indoor_cycling" | "road_biking" | "mountain_biking"
            | "gravel_cycling" | "virtual_ride" => Self::Cycling,
            "walking" | "casual_walking" | "speed_walking" => Self::Walking,
            "indoor_climbing" => Self::IndoorClimbing,
            "bouldering" => Self::Bouldering,
            _ => Self::Other,
        }
    }

    /// Heart-rate zone sport, if this is a cardio activity.
    pub fn sport(self) -> Option<Sport> {
        match self {
            Self::Running => Some(Sport::Running),
            Self::Cycling => Some(Sport::Cycling),
            _ => None,
        }
    }

    pub fn is_climbing(self) -> bool {
        matches!(self, Self::IndoorClimbing | Self::Bouldering)
    }

    /// Walking never counts toward training.
    pub fn counts_as_training(self) -> bool {
        self != Self::Walking
    }
}

impl Sport {
    pub fn as_str(self) -> &'static str {
        match self {
            Sport::Running => "running",
            Sport::Cycling => "cycling",
        }
    }
}

impl std::fmt::Display for Sport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One activity from the tracker's activity summary table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityRecord {
    /// Tracker activity ID (unique per activity)
    pub activity_id: u64,
    pub activity_type: ActivityType,
    /// Activity name/title
    #[serde(default)]
    pub name: Option<String>,
    /// Start time
    pub start: DateTime<Utc>,
    /// Wall-clock duration including pauses (seconds).
    /// Never used for climbing, where it includes rest between attempts.
    pub elapsed_duration_secs: f64,
    /// Moving duration (seconds), when the tracker records it
    #[serde(default)]
    pub moving_duration_secs: Option<f64>,
    /// Average heart rate (bpm)
    #[serde(default)]
    pub avg_hr: Option<u16>,
    /// Maximum heart rate (bpm)
    #[serde(default)]
    pub max_hr: Option<u16>,
}

impl ActivityRecord {
    /// Duration in seconds for non-climbing activities.
    pub fn active_duration_secs(&self) -> f64 {
        self.moving_duration_secs
            .unwrap_or(self.elapsed_duration_secs)
    }
}
