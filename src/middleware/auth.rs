// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Bearer-token (JWT) authentication.
//!
//! [`AuthGate`] owns the API key and token secret, built once from
//! [`AuthConfig`] at startup. The middleware functions here and in
//! `api_key` only adapt it to axum.

use crate::error::AppError;
use crate::AppState;
use axum::{
    extract::{Request, State},
    http::{header, HeaderValue},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use subtle::ConstantTimeEq;

/// Secrets and settings for the record endpoints' gate.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Static shared secret expected in `x-api-key`
    pub api_key: String,
    /// HS256 signing key for bearer tokens
    pub jwt_signing_key: Vec<u8>,
    /// Lifetime of issued tokens
    pub token_ttl_secs: u64,
}

/// JWT claims structure.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user document ID)
    pub sub: String,
    #[serde(default)]
    pub email: String,
    /// Expiration time (Unix timestamp)
    pub exp: usize,
    /// Issued at (Unix timestamp)
    pub iat: usize,
}

/// Authenticated user extracted from JWT.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: String,
    pub email: String,
}

/// Stateless credential checks for the record endpoints.
pub struct AuthGate {
    api_key: String,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    token_ttl_secs: u64,
}

impl AuthGate {
    pub fn new(config: AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(&config.jwt_signing_key),
            decoding_key: DecodingKey::from_secret(&config.jwt_signing_key),
            validation: Validation::new(Algorithm::HS256),
            api_key: config.api_key,
            token_ttl_secs: config.token_ttl_secs,
        }
    }

    /// Check a presented API key. Absent is 401, wrong is 403.
    pub fn check_api_key(&self, presented: Option<&str>) -> Result<(), AppError> {
        let presented = presented
            .filter(|k| !k.is_empty())
            .ok_or_else(|| AppError::Unauthorized("API key required".to_string()))?;

        if bool::from(presented.as_bytes().ct_eq(self.api_key.as_bytes())) {
            Ok(())
        } else {
            Err(AppError::Forbidden("Invalid API key".to_string()))
        }
    }

    /// Verify an `Authorization: Bearer <token>` header value.
    pub fn verify_bearer(&self, header: Option<&HeaderValue>) -> Result<AuthUser, AppError> {
        let token = header
            .and_then(|h| h.to_str().ok())
            .and_then(|h| h.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                AppError::Unauthorized("Authorization Bearer token required".to_string())
            })?;

        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|_| AppError::InvalidToken)?;

        if token_data.claims.sub.is_empty() {
            return Err(AppError::InvalidToken);
        }

        Ok(AuthUser {
            user_id: token_data.claims.sub,
            email: token_data.claims.email,
        })
    }

    /// Sign a bearer token for a user.
    pub fn issue_token(&self, user_id: &str, email: &str) -> anyhow::Result<String> {
        let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs() as usize;

        let claims = Claims {
            sub: user_id.to_string(),
            email: email.to_string(),
            iat: now,
            exp: now.saturating_add(usize::try_from(self.token_ttl_secs).unwrap_or(usize::MAX)),
        };

        Ok(encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &self.encoding_key,
        )?)
    }
}

/// Middleware that requires a valid bearer token.
///
/// Runs after the API-key check; attaches [`AuthUser`] to the request.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_user = state
        .auth
        .verify_bearer(request.headers().get(header::AUTHORIZATION))?;

    tracing::debug!(user_id = %auth_user.user_id, "Bearer token verified");
    request.extensions_mut().insert(auth_user);

    Ok(next.run(request).await)
}
