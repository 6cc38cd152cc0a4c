// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Public COVID statistics proxy.

use crate::error::{AppError, Result};
use crate::models::CovidCacheEntry;
use crate::AppState;
use axum::{
    extract::{rejection::PathRejection, Path, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use validator::{Validate, ValidationError};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/covid/{country}", get(get_covid))
}

#[derive(Debug, Deserialize, Validate)]
struct CountryPath {
    #[validate(
        length(min = 2, max = 56),
        custom(function = "validate_country_chars")
    )]
    country: String,
}

/// Country codes and names: letters, spaces, dots, hyphens, apostrophes,
/// with at least one letter so `..` and friends never reach the upstream URL.
fn validate_country_chars(value: &str) -> std::result::Result<(), ValidationError> {
    let trimmed = value.trim();
    if trimmed.len() < 2 {
        return Err(ValidationError::new("country_too_short"));
    }
    if !trimmed
        .chars()
        .all(|c| c.is_ascii_alphabetic() || matches!(c, ' ' | '.' | '-' | '\''))
    {
        return Err(ValidationError::new("country_invalid_chars"));
    }
    if !trimmed.chars().any(|c| c.is_ascii_alphabetic()) {
        return Err(ValidationError::new("country_no_letters"));
    }
    Ok(())
}

/// Cached (or freshly fetched) statistics for one country.
async fn get_covid(
    State(state): State<Arc<AppState>>,
    params: std::result::Result<Path<CountryPath>, PathRejection>,
) -> Result<Json<CovidCacheEntry>> {
    let Path(params) = params.map_err(|e| AppError::BadRequest(e.body_text()))?;
    params
        .validate()
        .map_err(|e| AppError::BadRequest(format!("Invalid country: {}", e)))?;

    let entry = state.covid_service.get_or_fetch(&params.country).await?;
    Ok(Json(entry))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_country_validation() {
        let ok = |c: &str| {
            CountryPath {
                country: c.to_string(),
            }
            .validate()
            .is_ok()
        };

        assert!(ok("US"));
        assert!(ok("united kingdom"));
        assert!(ok("Cote d'Ivoire"));
        assert!(!ok("U"));
        assert!(!ok("  U "));
        assert!(!ok("US;DROP"));
        assert!(!ok("../etc"));
        assert!(!ok(".."));
        assert!(!ok("..."));
        assert!(!ok("-."));
        assert!(!ok(" .. "));
        assert!(ok("St. Lucia"));
        assert!(!ok(&"A".repeat(57)));
    }
}
