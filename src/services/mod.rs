// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod auth;
pub mod clock;
pub mod fetcher;
pub mod scheduler;
pub mod snapshot;
pub mod strava;
pub mod token_store;

pub use auth::{AccessToken, AuthClient, AuthorizationCodeProvider, ConsoleCodeProvider};
pub use clock::{Clock, SystemClock};
pub use fetcher::{ActivityFetcher, FetchPolicy};
pub use scheduler::Scheduler;
pub use snapshot::SnapshotStore;
pub use strava::StravaClient;
pub use token_store::TokenStore;
