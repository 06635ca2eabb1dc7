// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! End-to-end weekly summary behavior.

use chrono::{Duration, NaiveDate};
use coach_summary::error::SummaryError;
use coach_summary::models::{
    ActivityType, AthleteProfile, DayStatus, Intensity, IntensityTier, Readiness, Recommendation,
    RestReason, Sport,
};
use coach_summary::services::hrv::readiness;
use coach_summary::services::zones::{classify, tier_for};
use coach_summary::services::{SummaryInput, WeeklySummaryBuilder};

mod common;
use common::{activity, attempt, night, test_profile, ts};

fn date(raw: &str) -> NaiveDate {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").unwrap()
}

fn week_input() -> SummaryInput {
    SummaryInput {
        activities: vec![
            activity(1, ActivityType::Running, "2026-03-03T07:00:00Z", Some(162)),
            activity(2, ActivityType::IndoorClimbing, "2026-03-04T18:00:00Z", Some(120)),
            activity(3, ActivityType::Walking, "2026-03-05T12:00:00Z", Some(95)),
            activity(4, ActivityType::Cycling, "2026-03-07T09:00:00Z", Some(130)),
        ],
        attempts: vec![
            attempt(2, "2026-03-04T18:05:00Z", 180.0, "6a", true),
            attempt(2, "2026-03-04T18:15:00Z", 240.0, "6b", false),
            attempt(2, "2026-03-04T18:30:00Z", 300.0, "6a+", true),
        ],
        sleep: (3..=9)
            .map(|d| night(&format!("2026-03-{:02}", d), 55.0 + d as f64 - 6.0))
            .collect(),
        ..Default::default()
    }
}

#[test]
fn test_zone_examples() {
    let profile = test_profile();

    let threshold = classify(Sport::Running, 162, &profile).unwrap();
    assert_eq!(threshold.tier, IntensityTier::Threshold);
    assert_eq!(threshold.zone, 4);
    assert_eq!(threshold.label, "Threshold");
    assert!((threshold.percent_of_max - 84.375).abs() < 1e-9);

    let base = classify(Sport::Running, 134, &profile).unwrap();
    assert_eq!(base.tier, IntensityTier::Base);
    assert_eq!(base.zone, 1);
}

#[test]
fn test_zone_boundaries_resolve_upward() {
    // 100 bpm max makes every boundary an exact integer
    assert_eq!(tier_for(70, 100), IntensityTier::Steady);
    assert_eq!(tier_for(76, 100), IntensityTier::Tempo);
    assert_eq!(tier_for(84, 100), IntensityTier::Threshold);
    assert_eq!(tier_for(90, 100), IntensityTier::Vo2Max);
    assert_eq!(tier_for(69, 100), IntensityTier::Base);
}

#[test]
fn test_zone_without_max_hr_is_reported() {
    let profile = AthleteProfile {
        max_hr_cycling: None,
        ..test_profile()
    };
    assert_eq!(
        classify(Sport::Cycling, 140, &profile).unwrap_err(),
        SummaryError::MissingBaselineData {
            field: "max_hr_cycling"
        }
    );
}

#[test]
fn test_climbing_duration_ignores_elapsed() {
    let profile = test_profile();
    let report = WeeklySummaryBuilder::new(&profile).build(&week_input(), ts("2026-03-09T21:00:00Z"));

    let day = report.day(date("2026-03-04")).unwrap();
    let session = &day.sessions[0];
    assert_eq!(session.activity_type, ActivityType::IndoorClimbing);
    assert_eq!(session.duration_minutes, Some(12.0));
    assert!(session.zone.is_none());

    let stats = session.climbing.as_ref().unwrap();
    assert_eq!(stats.attempts, 3);
    assert_eq!(stats.sends, 2);
}

#[test]
fn test_climbing_output_independent_of_elapsed_duration() {
    let profile = test_profile();
    let now = ts("2026-03-09T21:00:00Z");
    let build_with_elapsed = |elapsed: f64| {
        let mut input = week_input();
        for a in input.activities.iter_mut().filter(|a| a.activity_id == 2) {
            a.elapsed_duration_secs = elapsed;
        }
        WeeklySummaryBuilder::new(&profile).build(&input, now)
    };

    let short = build_with_elapsed(3600.0);
    let long = build_with_elapsed(99999.0);
    let session = &long.day(date("2026-03-04")).unwrap().sessions[0];
    assert_eq!(session.duration_minutes, Some(12.0));
    assert_eq!(
        serde_json::to_string(&short.days).unwrap(),
        serde_json::to_string(&long.days).unwrap()
    );
    assert_eq!(
        serde_json::to_string(&short.climbing).unwrap(),
        serde_json::to_string(&long.climbing).unwrap()
    );
}

#[test]
fn test_climbing_without_attempts_has_unknown_duration() {
    let profile = test_profile();
    let input = SummaryInput {
        activities: vec![activity(9, ActivityType::Bouldering, "2026-03-06T18:00:00Z", Some(120))],
        ..Default::default()
    };
    let report = WeeklySummaryBuilder::new(&profile).build(&input, ts("2026-03-09T21:00:00Z"));

    let session = &report.day(date("2026-03-06")).unwrap().sessions[0];
    assert_eq!(session.duration_minutes, None);
    assert!(report
        .issues
        .contains(&SummaryError::NoAttemptData { activity_id: 9 }));
    // Still a training day
    assert_eq!(report.day(date("2026-03-06")).unwrap().status, DayStatus::Trained);
}

#[test]
fn test_today_never_rest_before_cutoff() {
    let profile = test_profile();
    let input = SummaryInput::default();

    for hour in 0..20 {
        let now = ts("2026-03-09T00:00:00Z") + Duration::hours(hour) + Duration::minutes(59);
        let report = WeeklySummaryBuilder::new(&profile).build(&input, now);
        assert_eq!(report.today().unwrap().status, DayStatus::InProgress, "hour {}", hour);
    }

    let report = WeeklySummaryBuilder::new(&profile).build(&input, ts("2026-03-09T20:00:00Z"));
    assert_eq!(report.today().unwrap().status, DayStatus::RestDay);
}

#[test]
fn test_today_with_activity_after_cutoff_is_not_rest() {
    let profile = test_profile();
    let input = SummaryInput {
        activities: vec![activity(1, ActivityType::Running, "2026-03-09T07:00:00Z", Some(140))],
        ..Default::default()
    };
    let report = WeeklySummaryBuilder::new(&profile).build(&input, ts("2026-03-09T22:00:00Z"));
    assert_eq!(report.today().unwrap().status, DayStatus::InProgress);
    assert_eq!(report.today().unwrap().sessions.len(), 1);
}

#[test]
fn test_walk_today_keeps_day_in_progress() {
    let profile = test_profile();
    let input = SummaryInput {
        activities: vec![activity(1, ActivityType::Walking, "2026-03-09T12:00:00Z", Some(95))],
        ..Default::default()
    };
    let report = WeeklySummaryBuilder::new(&profile).build(&input, ts("2026-03-09T21:00:00Z"));
    let today = report.today().unwrap();
    assert_eq!(today.status, DayStatus::InProgress);
    assert_eq!(today.walks, 1);
    assert!(today.sessions.is_empty());
}

#[test]
fn test_cutoff_uses_profile_timezone() {
    // 03:30 UTC on the 10th is 19:30 on the 9th at UTC-8
    let profile = AthleteProfile {
        utc_offset_minutes: -480,
        ..test_profile()
    };
    let report =
        WeeklySummaryBuilder::new(&profile).build(&SummaryInput::default(), ts("2026-03-10T03:30:00Z"));
    assert_eq!(report.today, date("2026-03-09"));
    assert_eq!(report.today().unwrap().status, DayStatus::InProgress);

    let report =
        WeeklySummaryBuilder::new(&profile).build(&SummaryInput::default(), ts("2026-03-10T04:00:00Z"));
    assert_eq!(report.today().unwrap().status, DayStatus::RestDay);
}

#[test]
fn test_walking_is_not_training() {
    let profile = test_profile();
    let report = WeeklySummaryBuilder::new(&profile).build(&week_input(), ts("2026-03-09T21:00:00Z"));

    let day = report.day(date("2026-03-05")).unwrap();
    assert_eq!(day.status, DayStatus::RestDay);
    assert_eq!(day.walks, 1);
    assert!(day.sessions.is_empty());
}

#[test]
fn test_readiness_is_monotonic() {
    let baseline = 55.0;
    let mut previous = readiness(30.0, baseline);
    for tenth in 301..=800 {
        let current = readiness(tenth as f64 / 10.0, baseline);
        assert!(current >= previous);
        previous = current;
    }
    assert_eq!(previous, Readiness::ReadyForHardTraining);
}

#[test]
fn test_week_report() {
    let profile = test_profile();
    let report = WeeklySummaryBuilder::new(&profile).build(&week_input(), ts("2026-03-09T21:00:00Z"));

    let statuses: Vec<DayStatus> = report.days.iter().map(|d| d.status).collect();
    assert_eq!(
        statuses,
        vec![
            DayStatus::RestDay,
            DayStatus::Trained,
            DayStatus::Trained,
            DayStatus::RestDay,
            DayStatus::RestDay,
            DayStatus::Trained,
            DayStatus::RestDay,
            DayStatus::RestDay,
        ]
    );
    assert_eq!(report.today().unwrap().weekday, "Mon");

    // Latest night 58 vs baseline 55: normal
    assert_eq!(report.hrv.latest, Some(58.0));
    assert_eq!(report.hrv.average_7day, Some(55.0));
    assert_eq!(report.hrv.readiness, Some(Readiness::Normal));

    // 60 threshold minutes of 120 classified, running last done on the 3rd
    assert_eq!(
        report.recommendation,
        Recommendation::Train {
            sport: Sport::Running,
            intensity: Intensity::Easy,
            hard_share: Some(0.5),
        }
    );
    assert!(report.issues.is_empty(), "{:?}", report.issues);
}

#[test]
fn test_low_hrv_forces_rest() {
    let profile = test_profile();
    let mut input = week_input();
    input.sleep.push(night("2026-03-10", 0.0));
    input.sleep.retain(|n| n.date != date("2026-03-09"));
    input.sleep.push(night("2026-03-09", 44.0));

    let report = WeeklySummaryBuilder::new(&profile).build(&input, ts("2026-03-09T21:00:00Z"));
    assert_eq!(report.hrv.latest, Some(44.0));
    assert_eq!(
        report.recommendation,
        Recommendation::Rest {
            reason: RestReason::RecoveryPriority
        }
    );
}

#[test]
fn test_identical_inputs_serialize_identically() {
    let profile = test_profile();
    let now = ts("2026-03-09T21:00:00Z");
    let mut shuffled = week_input();
    shuffled.activities.reverse();
    shuffled.attempts.reverse();
    shuffled.sleep.reverse();

    let a = serde_json::to_string(&WeeklySummaryBuilder::new(&profile).build(&week_input(), now)).unwrap();
    let b = serde_json::to_string(&WeeklySummaryBuilder::new(&profile).build(&week_input(), now)).unwrap();
    let c = serde_json::to_string(&WeeklySummaryBuilder::new(&profile).build(&shuffled, now)).unwrap();
    assert_eq!(a, b);
    assert_eq!(a, c);
}
