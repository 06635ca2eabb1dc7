// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - summary computation and record handling.

pub mod climbing;
pub mod daily;
pub mod hrv;
pub mod ingest;
pub mod metrics;
pub mod profile_store;
pub mod recommendation;
pub mod summary;
pub mod zones;

pub use ingest::{IngestError, TrainingExport};
pub use profile_store::{ProfileStore, ProfileStoreError};
pub use summary::{SummaryInput, WeeklySummaryBuilder};
