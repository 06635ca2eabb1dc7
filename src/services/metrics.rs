// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Trailing-week wellness metrics.
//!
//! Each table is windowed to its most recent dates up to today. Averages skip
//! missing cells and are taken over sorted values, so record order never
//! changes the result.

use chrono::{DateTime, NaiveDate, Utc};
use std::cmp::Ordering;
use std::collections::BTreeSet;

use crate::models::{
    DailyMetrics, DailyStatsRecord, ReadinessRecord, ReadinessSnapshot, RecentMetrics,
    SleepMetrics, SleepRecord, Vo2MaxRecord,
};
use crate::services::summary::SummaryInput;

/// Distinct dates averaged for sleep and daily stats.
pub const RECENT_DAYS: usize = 7;

/// VO2 max estimates reported.
pub const VO2_MAX_HISTORY: usize = 3;

pub fn recent_metrics(input: &SummaryInput, today: NaiveDate, now: DateTime<Utc>) -> RecentMetrics {
    RecentMetrics {
        training_readiness: latest_readiness(&input.readiness, now),
        sleep: sleep_metrics(&input.sleep, today),
        daily: daily_metrics(&input.daily_stats, today),
        vo2_max: latest_vo2_max(&input.vo2_max, today),
    }
}

/// Records on the `RECENT_DAYS` most recent dates up to `today`.
fn recent<T>(records: &[T], today: NaiveDate, date_of: impl Fn(&T) -> NaiveDate) -> Vec<&T> {
    let dates: BTreeSet<NaiveDate> = records
        .iter()
        .map(&date_of)
        .filter(|d| *d <= today)
        .collect();
    let keep: BTreeSet<NaiveDate> = dates.into_iter().rev().take(RECENT_DAYS).collect();
    records.iter().filter(|r| keep.contains(&date_of(*r))).collect()
}

fn distinct_dates<T>(records: &[&T], date_of: impl Fn(&T) -> NaiveDate) -> usize {
    records.iter().map(|r| date_of(*r)).collect::<BTreeSet<_>>().len()
}

fn mean(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    let mut values: Vec<f64> = values.into_iter().filter(|v| v.is_finite()).collect();
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

fn cmp_optional(a: Option<f64>, b: Option<f64>) -> Ordering {
    a.unwrap_or(f64::NEG_INFINITY)
        .total_cmp(&b.unwrap_or(f64::NEG_INFINITY))
}

/// Most recent reading at or before `now`.
pub fn latest_readiness(records: &[ReadinessRecord], now: DateTime<Utc>) -> Option<ReadinessSnapshot> {
    records
        .iter()
        .filter(|r| r.time <= now)
        .max_by(|a, b| {
            a.time
                .cmp(&b.time)
                .then_with(|| cmp_optional(a.score, b.score))
                .then_with(|| a.level.cmp(&b.level))
                .then_with(|| cmp_optional(a.acute_load, b.acute_load))
        })
        .map(|r| ReadinessSnapshot {
            time: r.time,
            score: r.score,
            level: r.level.clone(),
            acute_load: r.acute_load,
        })
}

pub fn sleep_metrics(records: &[SleepRecord], today: NaiveDate) -> Option<SleepMetrics> {
    let window = recent(records, today, |r| r.date);
    if window.is_empty() {
        return None;
    }

    let latest_score = window
        .iter()
        .filter_map(|r| r.sleep_score.map(|s| (r.date, s)))
        .max_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.total_cmp(&b.1)))
        .map(|(_, score)| score);

    Some(SleepMetrics {
        nights: distinct_dates(&window, |r| r.date),
        avg_duration_hours: mean(window.iter().filter_map(|r| r.sleep_time_secs)).map(|s| s / 3600.0),
        avg_score: mean(window.iter().filter_map(|r| r.sleep_score)),
        latest_score,
        avg_resting_hr: mean(window.iter().filter_map(|r| r.resting_hr).map(f64::from)),
    })
}

pub fn daily_metrics(records: &[DailyStatsRecord], today: NaiveDate) -> Option<DailyMetrics> {
    let window = recent(records, today, |r| r.date);
    if window.is_empty() {
        return None;
    }

    Some(DailyMetrics {
        days: distinct_dates(&window, |r| r.date),
        avg_steps: mean(window.iter().filter_map(|r| r.total_steps).map(|s| s as f64)),
        avg_resting_hr: mean(window.iter().filter_map(|r| r.resting_hr).map(f64::from)),
        avg_stress_minutes: mean(window.iter().filter_map(|r| r.stress_duration_secs)).map(|s| s / 60.0),
    })
}

/// The latest estimates up to `today`, oldest first.
pub fn latest_vo2_max(records: &[Vo2MaxRecord], today: NaiveDate) -> Vec<Vo2MaxRecord> {
    let mut dated: Vec<&Vo2MaxRecord> = records
        .iter()
        .filter(|r| r.date <= today && r.value.is_finite())
        .collect();
    dated.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.value.total_cmp(&b.value)));
    dated.dedup_by(|a, b| a.date == b.date);

    let skip = dated.len().saturating_sub(VO2_MAX_HISTORY);
    dated.into_iter().skip(skip).cloned().collect()
}
