// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod covid;
pub mod google_oauth;

pub use covid::{CovidCache, CovidClient, CovidService, ExpiryPolicy};
pub use google_oauth::{GoogleOAuthClient, GoogleOAuthConfig, GoogleProfile};
