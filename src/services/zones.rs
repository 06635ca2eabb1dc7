// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Heart-rate session classifier.
//!
//! Tiers are keyed on average HR as a percentage of the athlete's max HR for
//! that sport. A ratio exactly on a boundary belongs to the higher tier.

use crate::error::SummaryError;
use crate::models::{AthleteProfile, IntensityTier, Sport, ZoneClassification};

/// Lower bound (percent of max, inclusive) of each tier above Base, highest first.
pub const TIER_LOWER_BOUNDS: [(IntensityTier, u32); 4] = [
    (IntensityTier::Vo2Max, 90),
    (IntensityTier::Threshold, 84),
    (IntensityTier::Tempo, 76),
    (IntensityTier::Steady, 70),
];

/// Tier for an average/max HR pair. Integer comparison keeps boundary ties exact.
pub fn tier_for(avg_hr: u16, max_hr: u16) -> IntensityTier {
    let scaled_avg = u32::from(avg_hr) * 100;
    TIER_LOWER_BOUNDS
        .iter()
        .find(|(_, pct)| scaled_avg >= pct * u32::from(max_hr))
        .map(|(tier, _)| *tier)
        .unwrap_or(IntensityTier::Base)
}

/// Field name reported when a sport's max HR is absent.
pub fn max_hr_field(sport: Sport) -> &'static str {
    match sport {
        Sport::Running => "max_hr_running",
        Sport::Cycling => "max_hr_cycling",
    }
}

/// Classify a cardio session against the profile's max HR for its sport.
///
/// Fails with [`SummaryError::MissingBaselineData`] rather than guessing a
/// max HR.
pub fn classify(
    sport: Sport,
    avg_hr: u16,
    profile: &AthleteProfile,
) -> Result<ZoneClassification, SummaryError> {
    let max_hr = profile
        .max_hr_for(sport)
        .filter(|max| *max > 0)
        .ok_or(SummaryError::MissingBaselineData {
            field: max_hr_field(sport),
        })?;

    let tier = tier_for(avg_hr, max_hr);
    Ok(ZoneClassification {
        tier,
        zone: tier.zone(),
        label: tier.label(),
        percent_of_max: f64::from(avg_hr) * 100.0 / f64::from(max_hr),
    })
}
