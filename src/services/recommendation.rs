// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Recommendation selector: rest vs. a specific session.

use crate::models::{Intensity, Readiness, Recommendation, RestReason, Sport};
use crate::services::daily::LoadPattern;

/// Consecutive trained days before today that force a rest day.
pub const MAX_CONSECUTIVE_TRAINING_DAYS: usize = 6;

/// Largest share of Zone 4-5 minutes before easy sessions are prescribed (80/20).
pub const HARD_SHARE_LIMIT: f64 = 0.20;

/// Decide today's recommendation. Pure function of load and readiness.
pub fn recommend(load: &LoadPattern, readiness: Option<Readiness>) -> Recommendation {
    if readiness == Some(Readiness::PrioritizeRecovery) {
        return Recommendation::Rest {
            reason: RestReason::RecoveryPriority,
        };
    }
    if load.consecutive_training_days >= MAX_CONSECUTIVE_TRAINING_DAYS {
        return Recommendation::Rest {
            reason: RestReason::ConsecutiveTrainingDays {
                days: load.consecutive_training_days,
            },
        };
    }

    let hard_share = load.hard_share();
    let intensity = match hard_share {
        Some(share) if share > HARD_SHARE_LIMIT => Intensity::Easy,
        _ => Intensity::Any,
    };

    Recommendation::Train {
        sport: least_recent_sport(load),
        intensity,
        hard_share,
    }
}

/// Sport trained least recently; never trained counts as least recent, ties go to running.
fn least_recent_sport(load: &LoadPattern) -> Sport {
    // `None < Some(_)` so an untrained sport always sorts first
    if load.last_cycling < load.last_running {
        Sport::Cycling
    } else {
        Sport::Running
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};

    fn ts(s: &str) -> Option<DateTime<Utc>> {
        Some(s.parse().unwrap())
    }

    fn load(consecutive: usize, hard: f64, classified: f64) -> LoadPattern {
        LoadPattern {
            consecutive_training_days: consecutive,
            hard_minutes: hard,
            classified_minutes: classified,
            last_running: ts("2026-03-07T07:00:00Z"),
            last_cycling: ts("2026-03-05T07:00:00Z"),
        }
    }

    #[test]
    fn test_recovery_readiness_forces_rest() {
        assert_eq!(
            recommend(&load(0, 0.0, 0.0), Some(Readiness::PrioritizeRecovery)),
            Recommendation::Rest {
                reason: RestReason::RecoveryPriority
            }
        );
    }

    #[test]
    fn test_six_day_streak_forces_rest() {
        assert_eq!(
            recommend(&load(6, 0.0, 100.0), Some(Readiness::ReadyForHardTraining)),
            Recommendation::Rest {
                reason: RestReason::ConsecutiveTrainingDays { days: 6 }
            }
        );
        assert!(matches!(
            recommend(&load(5, 0.0, 100.0), None),
            Recommendation::Train { .. }
        ));
    }

    #[test]
    fn test_picks_least_recent_sport() {
        match recommend(&load(1, 0.0, 100.0), Some(Readiness::Normal)) {
            Recommendation::Train { sport, .. } => assert_eq!(sport, Sport::Cycling),
            other => panic!("expected train, got {:?}", other),
        }

        let mut never_ran = load(1, 0.0, 100.0);
        never_ran.last_running = None;
        match recommend(&never_ran, None) {
            Recommendation::Train { sport, .. } => assert_eq!(sport, Sport::Running),
            other => panic!("expected train, got {:?}", other),
        }
    }

    #[test]
    fn test_hard_share_over_limit_prescribes_easy() {
        match recommend(&load(1, 30.0, 100.0), None) {
            Recommendation::Train {
                intensity,
                hard_share,
                ..
            } => {
                assert_eq!(intensity, Intensity::Easy);
                assert_eq!(hard_share, Some(0.3));
            }
            other => panic!("expected train, got {:?}", other),
        }
        match recommend(&load(1, 20.0, 100.0), None) {
            Recommendation::Train { intensity, .. } => assert_eq!(intensity, Intensity::Any),
            other => panic!("expected train, got {:?}", other),
        }
    }

    #[test]
    fn test_no_classified_minutes_allows_any() {
        match recommend(&load(0, 0.0, 0.0), None) {
            Recommendation::Train {
                intensity,
                hard_share,
                ..
            } => {
                assert_eq!(intensity, Intensity::Any);
                assert_eq!(hard_share, None);
            }
            other => panic!("expected train, got {:?}", other),
        }
    }
}
