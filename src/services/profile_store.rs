// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Athlete profile persistence.
//!
//! The profile is a single small JSON document. Reads are served from memory;
//! updates are written to a temporary file and renamed over the original.

use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

use crate::models::{AthleteProfile, ProfileUpdate};

/// Errors from loading or saving the profile.
#[derive(Debug, thiserror::Error)]
pub enum ProfileStoreError {
    #[error("Profile I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Profile JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub struct ProfileStore {
    path: Option<PathBuf>,
    profile: RwLock<AthleteProfile>,
}

impl ProfileStore {
    /// Load the profile at `path`. A missing file yields the default profile.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, ProfileStoreError> {
        let path = path.into();
        let profile = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(path = %path.display(), "No athlete profile found, using defaults");
                AthleteProfile::default()
            }
            Err(source) => return Err(io_error(&path, source)),
        };

        tracing::info!(path = %path.display(), "Athlete profile loaded");
        Ok(Self {
            path: Some(path),
            profile: RwLock::new(profile),
        })
    }

    /// Store that never touches disk.
    pub fn in_memory(profile: AthleteProfile) -> Self {
        Self {
            path: None,
            profile: RwLock::new(profile),
        }
    }

    pub async fn current(&self) -> AthleteProfile {
        self.profile.read().await.clone()
    }

    /// Apply a validated update and persist the result.
    pub async fn update(&self, update: &ProfileUpdate) -> Result<AthleteProfile, ProfileStoreError> {
        self.update_at(update, Utc::now()).await
    }

    pub async fn update_at(
        &self,
        update: &ProfileUpdate,
        now: DateTime<Utc>,
    ) -> Result<AthleteProfile, ProfileStoreError> {
        // Hold the write lock across the save so concurrent updates serialize
        let mut guard = self.profile.write().await;
        let mut next = guard.clone();
        next.apply(update, now);

        if let Some(path) = &self.path {
            save(path, &next).await?;
        }
        *guard = next.clone();

        tracing::info!(
            max_hr_running = ?next.max_hr_running,
            max_hr_cycling = ?next.max_hr_cycling,
            hrv_baseline_ms = ?next.hrv_baseline_ms,
            "Athlete profile updated"
        );
        Ok(next)
    }
}

fn io_error(path: &Path, source: std::io::Error) -> ProfileStoreError {
    ProfileStoreError::Io {
        path: path.display().to_string(),
        source,
    }
}

async fn save(path: &Path, profile: &AthleteProfile) -> Result<(), ProfileStoreError> {
    let json = serde_json::to_vec_pretty(profile)?;

    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|e| io_error(dir, e))?;
    }

    let tmp = path.with_extension("json.tmp");
    tokio::fs::write(&tmp, json)
        .await
        .map_err(|e| io_error(&tmp, e))?;
    tokio::fs::rename(&tmp, path)
        .await
        .map_err(|e| io_error(path, e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_update() {
        let store = ProfileStore::in_memory(AthleteProfile::default());
        let now: DateTime<Utc> = "2026-03-09T10:00:00Z".parse().unwrap();
        let update = ProfileUpdate {
            max_hr_running: Some(190),
            ..Default::default()
        };

        let updated = store.update_at(&update, now).await.unwrap();
        assert_eq!(updated.max_hr_running, Some(190));
        assert_eq!(updated.updated_at, Some(now));
        assert_eq!(store.current().await, updated);
    }
}
