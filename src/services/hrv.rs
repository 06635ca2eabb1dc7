// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! HRV recovery signal.

use chrono::{Duration, NaiveDate};
use std::collections::BTreeMap;

use crate::error::{IssueLog, SummaryError};
use crate::models::{HrvStatus, Readiness, SleepRecord};

/// Nights in a complete HRV window.
pub const HRV_WINDOW_NIGHTS: usize = 7;

/// Deviation from baseline (ms) beyond which readiness changes.
pub const READINESS_MARGIN_MS: f64 = 5.0;

/// Readiness from the latest night against the athlete's baseline.
/// Exactly ±5 ms is still normal.
pub fn readiness(latest_hrv: f64, baseline: f64) -> Readiness {
    let delta = latest_hrv - baseline;
    if delta > READINESS_MARGIN_MS {
        Readiness::ReadyForHardTraining
    } else if delta < -READINESS_MARGIN_MS {
        Readiness::PrioritizeRecovery
    } else {
        Readiness::Normal
    }
}

/// Compute the HRV block from the trailing nights up to and including `today`.
///
/// A window shorter than seven nights is only ever reported as
/// `partial_average`, never as the 7-day average, and yields no readiness.
pub fn hrv_status(
    records: &[SleepRecord],
    today: NaiveDate,
    baseline: Option<f64>,
    issues: &mut IssueLog,
) -> HrvStatus {
    let mut by_date: BTreeMap<NaiveDate, Vec<f64>> = BTreeMap::new();
    for record in records.iter().filter(|r| r.date <= today) {
        if let Some(hrv) = record.avg_overnight_hrv {
            by_date.entry(record.date).or_default().push(hrv);
        }
    }

    let mut nights: Vec<(NaiveDate, f64)> = Vec::new();
    for (date, values) in by_date {
        if values.iter().any(|v| *v != values[0]) {
            issues.push(SummaryError::AmbiguousTimeline {
                detail: format!("conflicting HRV values recorded for {}", date),
            });
            continue;
        }
        nights.push((date, values[0]));
    }

    // Most recent first
    let window: Vec<(NaiveDate, f64)> = nights.into_iter().rev().take(HRV_WINDOW_NIGHTS).collect();

    let mut status = HrvStatus {
        baseline,
        records_used: window.len(),
        ..Default::default()
    };

    if baseline.is_none() {
        issues.push(SummaryError::MissingBaselineData {
            field: "hrv_baseline_ms",
        });
    }

    let Some(&(latest_date, latest)) = window.first() else {
        issues.push(SummaryError::InsufficientHistory {
            available: 0,
            required: HRV_WINDOW_NIGHTS,
        });
        return status;
    };
    status.latest = Some(latest);
    status.latest_date = Some(latest_date);

    let mean = window.iter().map(|(_, v)| v).sum::<f64>() / window.len() as f64;

    if window.len() < HRV_WINDOW_NIGHTS {
        issues.push(SummaryError::InsufficientHistory {
            available: window.len(),
            required: HRV_WINDOW_NIGHTS,
        });
        status.partial_average = Some(mean);
        return status;
    }

    let oldest = window[window.len() - 1].0;
    if latest_date - oldest != Duration::days(HRV_WINDOW_NIGHTS as i64 - 1) {
        issues.push(SummaryError::AmbiguousTimeline {
            detail: format!(
                "last {} HRV nights span {} to {} with gaps",
                HRV_WINDOW_NIGHTS, oldest, latest_date
            ),
        });
    }

    status.average_7day = Some(mean);
    status.readiness = baseline.map(|b| readiness(latest, b));
    status
}

#[cfg(test)]
mod tests {
    use super::*;

    fn night(day: u32, hrv: Option<f64>) -> SleepRecord {
        SleepRecord {
            date: NaiveDate::from_ymd_opt(2026, 3, day).unwrap(),
            avg_overnight_hrv: hrv,
            resting_hr: Some(48),
            sleep_time_secs: None,
            sleep_score: None,
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 9).unwrap()
    }

    #[test]
    fn test_readiness_thresholds() {
        assert_eq!(readiness(61.0, 55.0), Readiness::ReadyForHardTraining);
        assert_eq!(readiness(60.0, 55.0), Readiness::Normal);
        assert_eq!(readiness(50.0, 55.0), Readiness::Normal);
        assert_eq!(readiness(49.9, 55.0), Readiness::PrioritizeRecovery);
    }

    #[test]
    fn test_full_window() {
        let records: Vec<SleepRecord> = (3..=9).map(|d| night(d, Some(50.0 + d as f64))).collect();
        let mut issues = IssueLog::default();
        let status = hrv_status(&records, today(), Some(52.0), &mut issues);

        assert_eq!(status.records_used, 7);
        assert_eq!(status.latest, Some(59.0));
        assert_eq!(status.average_7day, Some(56.0));
        assert_eq!(status.partial_average, None);
        assert_eq!(status.readiness, Some(Readiness::ReadyForHardTraining));
        assert!(issues.is_empty());
    }

    #[test]
    fn test_partial_window_is_flagged() {
        let records = vec![night(8, Some(60.0)), night(9, Some(50.0)), night(7, None)];
        let mut issues = IssueLog::default();
        let status = hrv_status(&records, today(), Some(55.0), &mut issues);

        assert_eq!(status.average_7day, None);
        assert_eq!(status.partial_average, Some(55.0));
        assert_eq!(status.latest, Some(50.0));
        assert_eq!(status.readiness, None);
        assert_eq!(
            issues.into_vec(),
            vec![SummaryError::InsufficientHistory {
                available: 2,
                required: 7
            }]
        );
    }

    #[test]
    fn test_future_nights_ignored() {
        let mut records: Vec<SleepRecord> = (3..=9).map(|d| night(d, Some(55.0))).collect();
        records.push(night(10, Some(10.0)));
        let mut issues = IssueLog::default();
        let status = hrv_status(&records, today(), Some(55.0), &mut issues);
        assert_eq!(status.latest, Some(55.0));
        assert_eq!(status.readiness, Some(Readiness::Normal));
    }

    #[test]
    fn test_duplicate_nights() {
        let mut records: Vec<SleepRecord> = (3..=9).map(|d| night(d, Some(55.0))).collect();
        records.push(night(9, Some(55.0)));
        let mut issues = IssueLog::default();
        let status = hrv_status(&records, today(), Some(55.0), &mut issues);
        assert_eq!(status.records_used, 7);
        assert_eq!(status.latest, Some(55.0));
        assert!(issues.is_empty());

        records.push(night(9, Some(70.0)));
        let mut issues = IssueLog::default();
        let status = hrv_status(&records, today(), Some(55.0), &mut issues);
        assert_eq!(status.latest_date, NaiveDate::from_ymd_opt(2026, 3, 8));
        assert_eq!(status.partial_average, Some(55.0));
        let issues = issues.into_vec();
        assert!(issues.contains(&SummaryError::AmbiguousTimeline {
            detail: "conflicting HRV values recorded for 2026-03-09".to_string()
        }));
    }

    #[test]
    fn test_gap_in_window_flagged() {
        let records: Vec<SleepRecord> = [1, 3, 4, 5, 6, 7, 9]
            .into_iter()
            .map(|d| night(d, Some(55.0)))
            .collect();
        let mut issues = IssueLog::default();
        let status = hrv_status(&records, today(), Some(55.0), &mut issues);
        assert_eq!(status.average_7day, Some(55.0));
        assert!(matches!(
            issues.into_vec().as_slice(),
            [SummaryError::AmbiguousTimeline { .. }]
        ));
    }

    #[test]
    fn test_missing_baseline_keeps_averages() {
        let records: Vec<SleepRecord> = (3..=9).map(|d| night(d, Some(55.0))).collect();
        let mut issues = IssueLog::default();
        let status = hrv_status(&records, today(), None, &mut issues);
        assert_eq!(status.average_7day, Some(55.0));
        assert_eq!(status.readiness, None);
        assert_eq!(
            issues.into_vec(),
            vec![SummaryError::MissingBaselineData {
                field: "hrv_baseline_ms"
            }]
        );
    }
}
