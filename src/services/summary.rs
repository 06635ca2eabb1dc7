// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Weekly training summary builder.
//!
//! Pulls the pieces together:
//! 1. Group activities by local day (timeline checks)
//! 2. Classify/aggregate each session and decide each day's status
//! 3. Compute the HRV block
//! 4. Select a recommendation from the recent load and readiness
//! 5. Attach climbing totals and the trailing-week wellness metrics
//!
//! The build is a pure function of its inputs and `now`: identical inputs
//! serialize to identical JSON.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::error::{IssueLog, SummaryError};
use crate::models::{
    ActivityRecord, AthleteProfile, ClimbAttempt, DailyStatsRecord, DaySummary, ReadinessRecord,
    SleepRecord, Sport, Vo2MaxRecord, WeeklyReport,
};
use crate::services::climbing::climbing_totals;
use crate::services::daily::{summarize_day, DayPosition, LoadPattern, Timeline, LOAD_WINDOW_DAYS};
use crate::services::hrv::hrv_status;
use crate::services::metrics::recent_metrics;
use crate::services::recommendation::recommend;

/// Past days shown before today unless configured otherwise.
pub const DEFAULT_WINDOW_DAYS: u32 = 7;

/// Raw records for one report run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SummaryInput {
    #[serde(default)]
    pub activities: Vec<ActivityRecord>,
    /// Route and boulder attempts together
    #[serde(default)]
    pub attempts: Vec<ClimbAttempt>,
    #[serde(default)]
    pub sleep: Vec<SleepRecord>,
    #[serde(default)]
    pub readiness: Vec<ReadinessRecord>,
    #[serde(default)]
    pub daily_stats: Vec<DailyStatsRecord>,
    #[serde(default)]
    pub vo2_max: Vec<Vo2MaxRecord>,
}

pub struct WeeklySummaryBuilder<'a> {
    profile: &'a AthleteProfile,
    window_days: u32,
}

impl<'a> WeeklySummaryBuilder<'a> {
    pub fn new(profile: &'a AthleteProfile) -> Self {
        Self {
            profile,
            window_days: DEFAULT_WINDOW_DAYS,
        }
    }

    /// Number of past days listed before today (at least one).
    pub fn window_days(mut self, days: u32) -> Self {
        self.window_days = days.max(1);
        self
    }

    pub fn build(&self, input: &SummaryInput, now: DateTime<Utc>) -> WeeklyReport {
        let profile = self.profile;
        let tz = profile.timezone();
        let now_local = now.with_timezone(&tz);
        let today = now_local.date_naive();

        let mut issues = IssueLog::default();
        let timeline = Timeline::build(&input.activities, &tz, now, &mut issues);

        // The load pattern needs a full trailing week even when fewer days are shown;
        // problems on those hidden days are not reported.
        let window = i64::from(self.window_days);
        let history = window.max(LOAD_WINDOW_DAYS);
        let mut hidden_issues = IssueLog::default();
        let mut days: Vec<DaySummary> = Vec::with_capacity(history as usize + 1);
        for offset in (0..=history).rev() {
            let date = today - Duration::days(offset);
            let position = if offset == 0 {
                DayPosition::Today
            } else {
                DayPosition::Past
            };
            let log = if offset > window {
                &mut hidden_issues
            } else {
                &mut issues
            };
            days.push(summarize_day(
                date,
                timeline.activities_on(date),
                position,
                now_local.time(),
                profile,
                &input.attempts,
                log,
            ));
        }

        let load = LoadPattern::from_days(&days, today, &timeline);
        let hrv = hrv_status(&input.sleep, today, profile.hrv_baseline_ms, &mut issues);
        let recommendation = recommend(&load, hrv.readiness);

        let shown = days.split_off(days.len() - (window as usize + 1));
        check_observed_max_hr(&shown, profile, &mut issues);

        let climbing_ids: BTreeSet<u64> = shown
            .iter()
            .flat_map(|d| &d.sessions)
            .filter(|s| s.activity_type.is_climbing())
            .map(|s| s.activity_id)
            .collect();
        let climbing = climbing_totals(&climbing_ids, &input.attempts);
        let metrics = recent_metrics(input, today, now);

        let issues = issues.into_vec();
        tracing::info!(
            today = %today,
            days = shown.len(),
            issues = issues.len(),
            recommendation = ?recommendation,
            "Weekly summary built"
        );

        WeeklyReport {
            generated_at: now_local,
            today,
            days: shown,
            hrv,
            recommendation,
            climbing,
            recent_metrics: metrics,
            issues,
        }
    }
}

/// Flag recorded max HRs above the profile. The profile itself is never changed.
fn check_observed_max_hr(days: &[DaySummary], profile: &AthleteProfile, issues: &mut IssueLog) {
    let mut observed: BTreeMap<Sport, u16> = BTreeMap::new();
    for session in days.iter().flat_map(|d| &d.sessions) {
        if let (Some(sport), Some(max_hr)) = (session.activity_type.sport(), session.max_hr) {
            let entry = observed.entry(sport).or_insert(max_hr);
            *entry = (*entry).max(max_hr);
        }
    }

    for (sport, observed) in observed {
        if let Some(profile_max) = profile.max_hr_for(sport) {
            if observed > profile_max {
                issues.push(SummaryError::ObservedMaxHrAboveProfile {
                    sport,
                    observed,
                    profile: profile_max,
                });
            }
        }
    }
}
