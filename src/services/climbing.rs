// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Climbing duration aggregation and per-session statistics.
//!
//! A climbing activity's elapsed time includes rest between attempts, so the
//! true climbing time is always the sum of its attempt durations. When no
//! attempts exist the duration is unknown; it is never backfilled.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use crate::error::SummaryError;
use crate::models::{
    ClimbAttempt, ClimbDiscipline, ClimbingSessionStats, ClimbingTotals, Grade, GradeScale,
};

/// Minimum attempts before a fatigue trend is meaningful.
const MIN_ATTEMPTS_FOR_TREND: usize = 4;

/// Attempts belonging to an activity, in chronological order.
pub fn attempts_for(activity_id: u64, attempts: &[ClimbAttempt]) -> Vec<&ClimbAttempt> {
    let mut matched: Vec<&ClimbAttempt> = attempts
        .iter()
        .filter(|a| a.activity_id == activity_id)
        .collect();
    matched.sort_by_key(|a| a.time);
    matched
}

/// Sum of attempt durations for an activity, in seconds.
pub fn climbing_seconds(activity_id: u64, attempts: &[ClimbAttempt]) -> Result<f64, SummaryError> {
    let matched = attempts_for(activity_id, attempts);
    if matched.is_empty() {
        return Err(SummaryError::NoAttemptData { activity_id });
    }
    Ok(matched.iter().map(|a| a.duration_secs).sum())
}

/// Sum of attempt durations for an activity, in minutes.
pub fn climbing_minutes(activity_id: u64, attempts: &[ClimbAttempt]) -> Result<f64, SummaryError> {
    climbing_seconds(activity_id, attempts).map(|secs| secs / 60.0)
}

/// Full statistics for one climbing session.
pub fn session_stats(
    activity_id: u64,
    attempts: &[ClimbAttempt],
) -> Result<ClimbingSessionStats, SummaryError> {
    let matched = attempts_for(activity_id, attempts);
    if matched.is_empty() {
        return Err(SummaryError::NoAttemptData { activity_id });
    }

    let total_secs: f64 = matched.iter().map(|a| a.duration_secs).sum();
    let sends = matched.iter().filter(|a| a.sent).count();
    let count = matched.len();

    let scale = primary_scale(matched.iter().map(|a| &a.grade));
    let hardest_attempted = scale.and_then(|s| hardest_in(s, matched.iter().map(|a| &a.grade)));
    let hardest_sent = scale.and_then(|s| {
        hardest_in(s, matched.iter().filter(|a| a.sent).map(|a| &a.grade))
    });

    Ok(ClimbingSessionStats {
        attempts: count,
        sends,
        send_rate: sends as f64 / count as f64,
        climbing_minutes: total_secs / 60.0,
        avg_attempt_secs: total_secs / count as f64,
        hardest_attempted,
        hardest_sent,
        fatigue_trend: fatigue_trend(&matched),
    })
}

fn send_rate(attempts: &[&ClimbAttempt]) -> f64 {
    let sends = attempts.iter().filter(|a| a.sent).count();
    sends as f64 / attempts.len() as f64
}

/// Send rate of the later half of a session minus the earlier half.
/// Odd counts give the extra attempt to the later half.
fn fatigue_trend(chronological: &[&ClimbAttempt]) -> Option<f64> {
    if chronological.len() < MIN_ATTEMPTS_FOR_TREND {
        return None;
    }
    let (early, late) = chronological.split_at(chronological.len() / 2);
    Some(send_rate(late) - send_rate(early))
}

/// Most common recognized scale; ties resolve in scale order.
fn primary_scale<'a>(grades: impl Iterator<Item = &'a Grade>) -> Option<GradeScale> {
    let mut counts: BTreeMap<GradeScale, usize> = BTreeMap::new();
    for grade in grades {
        if grade.scale() != GradeScale::Unrecognized {
            *counts.entry(grade.scale()).or_insert(0) += 1;
        }
    }
    counts
        .into_iter()
        .fold(None, |best: Option<(GradeScale, usize)>, (scale, n)| match best {
            Some((_, best_n)) if best_n >= n => best,
            _ => Some((scale, n)),
        })
        .map(|(scale, _)| scale)
}

fn hardest_in<'a>(scale: GradeScale, grades: impl Iterator<Item = &'a Grade>) -> Option<Grade> {
    grades
        .filter(|g| g.scale() == scale)
        .max_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal))
        .cloned()
}

/// Climbing volume per discipline for the given activities.
pub fn climbing_totals(activity_ids: &BTreeSet<u64>, attempts: &[ClimbAttempt]) -> Vec<ClimbingTotals> {
    let mut by_discipline: BTreeMap<ClimbDiscipline, (BTreeSet<u64>, Vec<&ClimbAttempt>)> =
        BTreeMap::new();
    for attempt in attempts.iter().filter(|a| activity_ids.contains(&a.activity_id)) {
        let entry = by_discipline.entry(attempt.discipline).or_default();
        entry.0.insert(attempt.activity_id);
        entry.1.push(attempt);
    }

    by_discipline
        .into_iter()
        .map(|(discipline, (sessions, list))| {
            let mut grades = BTreeMap::new();
            for attempt in &list {
                *grades.entry(attempt.grade.to_string()).or_insert(0) += 1;
            }
            let counts: Vec<u64> = list.iter().filter_map(|a| a.attempt_count).map(u64::from).collect();
            let avg_attempt_count = (!counts.is_empty())
                .then(|| counts.iter().sum::<u64>() as f64 / counts.len() as f64);
            ClimbingTotals {
                discipline,
                sessions: sessions.len(),
                attempts: list.len(),
                sends: list.iter().filter(|a| a.sent).count(),
                minutes: list.iter().map(|a| a.duration_secs).sum::<f64>() / 60.0,
                avg_attempt_count,
                grades,
            }
        })
        .collect()
}
