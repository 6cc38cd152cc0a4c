// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Static API key check for record endpoints.

use crate::error::AppError;
use crate::AppState;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

pub const API_KEY_HEADER: &str = "x-api-key";

/// Fallback query parameter for the key: `?api_key=...`.
const API_KEY_PARAM: &str = "api_key";

/// The `x-api-key` header value that passed the gate, recorded on created
/// records. Absent when the key came from the query string.
#[derive(Debug, Clone)]
pub struct ApiKeyUsed(pub String);

fn header_key(request: &Request) -> Option<String> {
    request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|h| h.to_str().ok())
        .filter(|k| !k.is_empty())
        .map(str::to_string)
}

/// First `api_key` query value. Other parameters and repeats are ignored.
fn query_key(request: &Request) -> Option<String> {
    let query = request.uri().query()?;
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(name, _)| name == API_KEY_PARAM)
        .map(|(_, value)| value.into_owned())
}

/// Middleware that requires the configured API key (header, then query).
pub async fn require_api_key(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let from_header = header_key(&request);
    let presented = from_header.clone().or_else(|| query_key(&request));

    if let Err(err) = state.auth.check_api_key(presented.as_deref()) {
        tracing::warn!(
            path = %request.uri().path(),
            reason = %err,
            "Rejected request at API key check"
        );
        return Err(err);
    }

    if let Some(key) = from_header {
        request.extensions_mut().insert(ApiKeyUsed(key));
    }

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    fn request(uri: &str) -> Request {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[test]
    fn test_query_key_first_value_wins() {
        assert_eq!(
            query_key(&request("/records?api_key=a&api_key=b")).as_deref(),
            Some("a")
        );
        assert_eq!(
            query_key(&request("/records?x=1&api_key=k%20ey")).as_deref(),
            Some("k ey")
        );
        assert_eq!(query_key(&request("/records?x=1")), None);
        assert_eq!(query_key(&request("/records")), None);
    }

    #[test]
    fn test_empty_header_is_ignored() {
        let request = Request::builder()
            .uri("/records")
            .header(API_KEY_HEADER, "")
            .body(Body::empty())
            .unwrap();
        assert_eq!(header_key(&request), None);
    }
}
