// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Errors seen by the dashboard client.

/// Client-side failure, rendered into the banner or a warning.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("{0}")]
    Request(#[from] reqwest::Error),

    #[error("API request failed: {0}")]
    Status(u16),

    #[error("{message}")]
    Backend { status: u16, message: String },

    #[error("No data returned for {0}")]
    Empty(String),

    #[error("No data to save!")]
    NothingToSave,
}
