// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Coach-Summary: weekly training summaries from fitness-tracker exports
//!
//! The core ([`services::WeeklySummaryBuilder`]) is a pure function of the
//! records, the athlete profile and the report time. The HTTP API and the
//! `weekly-summary` CLI are thin layers over it.

pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use services::ProfileStore;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub profiles: ProfileStore,
}
