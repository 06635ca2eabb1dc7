// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Daily aggregation and rest-day determination.
//!
//! Past days are rest days when they hold no training (walking never counts).
//! The current day is only a rest day once it is 20:00 local and no activity
//! of any type, walks included, has been recorded. Before that it is in
//! progress, so an empty morning is never reported as a completed rest day.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveTime, Timelike, Utc};
use std::collections::BTreeMap;

use crate::error::{IssueLog, SummaryError};
use crate::models::{
    ActivityRecord, ActivityType, AthleteProfile, ClimbAttempt, DayStatus, DaySummary,
    SessionSummary, Sport,
};
use crate::services::{climbing, zones};
use crate::time_utils::{format_utc_rfc3339, local_date, weekday_label};

/// Local hour from which an empty current day counts as a rest day.
pub const REST_DAY_CUTOFF_HOUR: u32 = 20;

/// Days of history behind the hard-intensity share.
pub const LOAD_WINDOW_DAYS: i64 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayPosition {
    Past,
    Today,
}

/// Rest-day rule for the current day. `recorded` counts every activity.
pub fn is_rest_day_today(now_local: NaiveTime, recorded: usize) -> bool {
    now_local.hour() >= REST_DAY_CUTOFF_HOUR && recorded == 0
}

/// `recorded` is the number of training sessions for a past day and the
/// number of activities of any type for the current day.
pub fn day_status(position: DayPosition, recorded: usize, now_local: NaiveTime) -> DayStatus {
    match position {
        DayPosition::Past if recorded == 0 => DayStatus::RestDay,
        DayPosition::Past => DayStatus::Trained,
        DayPosition::Today if is_rest_day_today(now_local, recorded) => DayStatus::RestDay,
        DayPosition::Today => DayStatus::InProgress,
    }
}

/// Activities grouped by local calendar day, after timeline checks.
#[derive(Debug, Default)]
pub struct Timeline<'a> {
    pub days: BTreeMap<NaiveDate, Vec<&'a ActivityRecord>>,
}

impl<'a> Timeline<'a> {
    /// Group activities by local day.
    ///
    /// Activities starting after `now`, and activity IDs that appear more
    /// than once with different data, are excluded and reported rather than
    /// assigned to a guessed day. Exact duplicates are merged.
    pub fn build(
        activities: &'a [ActivityRecord],
        tz: &FixedOffset,
        now: DateTime<Utc>,
        issues: &mut IssueLog,
    ) -> Self {
        let mut by_id: BTreeMap<u64, Vec<&'a ActivityRecord>> = BTreeMap::new();
        for activity in activities {
            by_id.entry(activity.activity_id).or_default().push(activity);
        }

        let mut days: BTreeMap<NaiveDate, Vec<&'a ActivityRecord>> = BTreeMap::new();
        for (activity_id, copies) in by_id {
            let first = copies[0];
            if copies.iter().any(|c| *c != first) {
                issues.push(SummaryError::AmbiguousTimeline {
                    detail: format!(
                        "activity {} appears {} times with conflicting data",
                        activity_id,
                        copies.len()
                    ),
                });
                continue;
            }
            if first.start > now {
                issues.push(SummaryError::AmbiguousTimeline {
                    detail: format!(
                        "activity {} starts at {} after the report time",
                        activity_id,
                        format_utc_rfc3339(first.start)
                    ),
                });
                continue;
            }
            days.entry(local_date(first.start, tz))
                .or_default()
                .push(first);
        }

        for list in days.values_mut() {
            list.sort_by_key(|a| (a.start, a.activity_id));
        }

        Self { days }
    }

    pub fn activities_on(&self, date: NaiveDate) -> &[&'a ActivityRecord] {
        self.days.get(&date).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Start of the most recent activity of a sport.
    pub fn last_trained(&self, sport: Sport) -> Option<DateTime<Utc>> {
        self.days
            .values()
            .flatten()
            .filter(|a| a.activity_type.sport() == Some(sport))
            .map(|a| a.start)
            .max()
    }
}

/// Summarize one non-walking activity.
pub fn summarize_session(
    activity: &ActivityRecord,
    profile: &AthleteProfile,
    attempts: &[ClimbAttempt],
    tz: &FixedOffset,
    issues: &mut IssueLog,
) -> SessionSummary {
    let mut session = SessionSummary {
        activity_id: activity.activity_id,
        activity_type: activity.activity_type,
        name: activity.name.clone(),
        start_local: activity.start.with_timezone(tz),
        duration_minutes: None,
        avg_hr: activity.avg_hr,
        max_hr: activity.max_hr,
        zone: None,
        climbing: None,
    };

    if activity.activity_type.is_climbing() {
        match climbing::session_stats(activity.activity_id, attempts) {
            Ok(stats) => {
                check_attempt_dates(activity, attempts, tz, issues);
                session.duration_minutes = Some(stats.climbing_minutes);
                session.climbing = Some(stats);
            }
            Err(err) => issues.push(err),
        }
        return session;
    }

    session.duration_minutes = Some(activity.active_duration_secs() / 60.0);

    if let Some(sport) = activity.activity_type.sport() {
        match activity.avg_hr {
            Some(avg_hr) => match zones::classify(sport, avg_hr, profile) {
                Ok(zone) => session.zone = Some(zone),
                Err(err) => issues.push(err),
            },
            None => issues.push(SummaryError::MissingHeartRate {
                activity_id: activity.activity_id,
            }),
        }
    }

    session
}

/// Attempts logged on a different local day than their activity.
fn check_attempt_dates(
    activity: &ActivityRecord,
    attempts: &[ClimbAttempt],
    tz: &FixedOffset,
    issues: &mut IssueLog,
) {
    let day = local_date(activity.start, tz);
    let stray = attempts
        .iter()
        .filter(|a| a.activity_id == activity.activity_id)
        .filter(|a| local_date(a.time, tz) != day)
        .count();
    if stray > 0 {
        issues.push(SummaryError::AmbiguousTimeline {
            detail: format!(
                "{} attempt(s) of activity {} fall on a different day than the activity ({})",
                stray, activity.activity_id, day
            ),
        });
    }
}

/// Build one day's summary.
pub fn summarize_day(
    date: NaiveDate,
    activities: &[&ActivityRecord],
    position: DayPosition,
    now_local: NaiveTime,
    profile: &AthleteProfile,
    attempts: &[ClimbAttempt],
    issues: &mut IssueLog,
) -> DaySummary {
    let tz = profile.timezone();
    let walks = activities
        .iter()
        .filter(|a| a.activity_type == ActivityType::Walking)
        .count();
    let sessions: Vec<SessionSummary> = activities
        .iter()
        .filter(|a| a.activity_type.counts_as_training())
        .map(|a| summarize_session(a, profile, attempts, &tz, issues))
        .collect();
    let recorded = match position {
        DayPosition::Past => sessions.len(),
        DayPosition::Today => activities.len(),
    };

    DaySummary {
        date,
        weekday: weekday_label(date),
        status: day_status(position, recorded, now_local),
        sessions,
        walks,
    }
}

/// Recent training load, as consumed by the recommendation selector.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadPattern {
    /// Trained days immediately before today
    pub consecutive_training_days: usize,
    /// Zone 4-5 minutes over the trailing week
    pub hard_minutes: f64,
    /// All zone-classified minutes over the trailing week
    pub classified_minutes: f64,
    pub last_running: Option<DateTime<Utc>>,
    pub last_cycling: Option<DateTime<Utc>>,
}

impl LoadPattern {
    /// `days` must be oldest first and cover at least the trailing week.
    pub fn from_days(days: &[DaySummary], today: NaiveDate, timeline: &Timeline<'_>) -> Self {
        let consecutive_training_days = days
            .iter()
            .rev()
            .filter(|d| d.date < today)
            .take_while(|d| d.status == DayStatus::Trained)
            .count();

        let window_start = today - Duration::days(LOAD_WINDOW_DAYS);
        let mut hard_minutes = 0.0;
        let mut classified_minutes = 0.0;
        for session in days
            .iter()
            .filter(|d| d.date >= window_start && d.date < today)
            .flat_map(|d| &d.sessions)
        {
            if let Some(zone) = &session.zone {
                let minutes = session.duration_minutes.unwrap_or(0.0);
                classified_minutes += minutes;
                if zone.tier.is_hard() {
                    hard_minutes += minutes;
                }
            }
        }

        Self {
            consecutive_training_days,
            hard_minutes,
            classified_minutes,
            last_running: timeline.last_trained(Sport::Running),
            last_cycling: timeline.last_trained(Sport::Cycling),
        }
    }

    pub fn hard_share(&self) -> Option<f64> {
        (self.classified_minutes > 0.0).then(|| self.hard_minutes / self.classified_minutes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn activity(id: u64, kind: ActivityType, start: &str) -> ActivityRecord {
        ActivityRecord {
            activity_id: id,
            activity_type: kind,
            name: None,
            start: start.parse().unwrap(),
            elapsed_duration_secs: 1800.0,
            moving_duration_secs: None,
            avg_hr: Some(140),
            max_hr: Some(160),
        }
    }

    #[test]
    fn test_today_before_cutoff_is_in_progress() {
        assert_eq!(day_status(DayPosition::Today, 0, at(19, 59)), DayStatus::InProgress);
        assert_eq!(day_status(DayPosition::Today, 2, at(9, 0)), DayStatus::InProgress);
    }

    #[test]
    fn test_today_after_cutoff() {
        assert_eq!(day_status(DayPosition::Today, 0, at(20, 0)), DayStatus::RestDay);
        assert_eq!(day_status(DayPosition::Today, 1, at(21, 0)), DayStatus::InProgress);
    }

    #[test]
    fn test_past_day_status() {
        assert_eq!(day_status(DayPosition::Past, 0, at(8, 0)), DayStatus::RestDay);
        assert_eq!(day_status(DayPosition::Past, 1, at(8, 0)), DayStatus::Trained);
    }

    #[test]
    fn test_timeline_drops_future_and_conflicts() {
        let now: DateTime<Utc> = "2026-03-08T12:00:00Z".parse().unwrap();
        let mut conflicting = activity(2, ActivityType::Running, "2026-03-05T07:00:00Z");
        conflicting.avg_hr = Some(150);
        let activities = vec![
            activity(1, ActivityType::Running, "2026-03-06T07:00:00Z"),
            activity(1, ActivityType::Running, "2026-03-06T07:00:00Z"),
            activity(2, ActivityType::Running, "2026-03-05T07:00:00Z"),
            conflicting,
            activity(3, ActivityType::Cycling, "2026-03-09T07:00:00Z"),
        ];
        let tz = FixedOffset::east_opt(0).unwrap();
        let mut issues = IssueLog::default();
        let timeline = Timeline::build(&activities, &tz, now, &mut issues);

        let all: Vec<u64> = timeline.days.values().flatten().map(|a| a.activity_id).collect();
        assert_eq!(all, vec![1]);
        assert_eq!(issues.into_vec().len(), 2);
    }

    #[test]
    fn test_walk_only_past_day_is_rest() {
        let walk = activity(1, ActivityType::Walking, "2026-03-06T07:00:00Z");
        let profile = AthleteProfile::default();
        let mut issues = IssueLog::default();
        let day = summarize_day(
            NaiveDate::from_ymd_opt(2026, 3, 6).unwrap(),
            &[&walk],
            DayPosition::Past,
            at(12, 0),
            &profile,
            &[],
            &mut issues,
        );
        assert_eq!(day.status, DayStatus::RestDay);
        assert_eq!(day.walks, 1);
        assert!(day.sessions.is_empty());
    }

    #[test]
    fn test_walk_only_today_after_cutoff_is_in_progress() {
        let walk = activity(1, ActivityType::Walking, "2026-03-09T07:00:00Z");
        let profile = AthleteProfile::default();
        let mut issues = IssueLog::default();
        let day = summarize_day(
            NaiveDate::from_ymd_opt(2026, 3, 9).unwrap(),
            &[&walk],
            DayPosition::Today,
            at(21, 0),
            &profile,
            &[],
            &mut issues,
        );
        assert_eq!(day.status, DayStatus::InProgress);
        assert_eq!(day.walks, 1);
        assert!(day.sessions.is_empty());
    }
}
