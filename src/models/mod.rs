// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for the application.

pub mod covid;
pub mod record;
pub mod user;

pub use covid::CovidCacheEntry;
pub use record::{PopulatedRecord, Record};
pub use user::{User, UserSummary};
