// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Middleware modules (API key gate, bearer auth, security headers).

pub mod api_key;
pub mod auth;
pub mod security;

pub use api_key::require_api_key;
pub use auth::{require_auth, AuthGate, AuthUser};
