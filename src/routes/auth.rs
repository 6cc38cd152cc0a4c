// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Google OAuth login routes.

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    response::Redirect,
    routing::get,
    Router,
};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::db::{new_document_id, Database};
use crate::error::{AppError, Result};
use crate::models::User;
use crate::services::GoogleProfile;
use crate::time_utils::format_utc_rfc3339;
use crate::AppState;

// Type alias for HMAC-SHA256
type HmacSha256 = Hmac<Sha256>;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/google", get(auth_start))
        .route("/auth/google/callback", get(auth_callback))
        .route("/auth/logout", get(logout))
}

/// Query parameters for starting OAuth flow.
#[derive(Deserialize)]
pub struct AuthStartParams {
    /// Frontend URL to redirect back to after OAuth completes.
    /// If not provided, uses FRONTEND_URL env var.
    #[serde(default)]
    redirect_uri: Option<String>,
}

/// Start OAuth flow - redirect to Google's consent screen.
async fn auth_start(
    State(state): State<Arc<AppState>>,
    params: std::result::Result<Query<AuthStartParams>, QueryRejection>,
) -> Result<Redirect> {
    let Query(params) = params.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let frontend_url = params
        .redirect_uri
        .filter(|url| state.config.is_allowed_frontend(url))
        .unwrap_or_else(|| state.config.frontend_url.clone());

    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("System time error: {}", e)))?
        .as_millis();

    let oauth_state = sign_state(&frontend_url, timestamp, &state.config.oauth_state_key)?;

    tracing::info!(frontend_url = %frontend_url, "Starting OAuth flow, redirecting to Google");

    Ok(Redirect::temporary(
        &state.google_oauth.authorize_url(&oauth_state),
    ))
}

#[derive(Deserialize)]
pub struct CallbackParams {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    state: String,
    #[serde(default)]
    error: Option<String>,
}

/// OAuth callback - exchange code, find or create the user, issue a token.
async fn auth_callback(
    State(state): State<Arc<AppState>>,
    params: std::result::Result<Query<CallbackParams>, QueryRejection>,
) -> Result<Redirect> {
    let Query(params) = params.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let frontend_url = verify_and_decode_state(&params.state, &state.config.oauth_state_key)
        .unwrap_or_else(|| {
            tracing::warn!(
                "Invalid or tampered state parameter, falling back to default frontend URL"
            );
            state.config.frontend_url.clone()
        });

    if let Some(error) = params.error {
        tracing::warn!(error = %error, "OAuth error from Google");
        let redirect = format!("{}?error={}", frontend_url, urlencoding::encode(&error));
        return Ok(Redirect::temporary(&redirect));
    }

    let code = params
        .code
        .filter(|c| !c.is_empty())
        .ok_or_else(|| AppError::BadRequest("Missing authorization code".to_string()))?;

    let access_token = state.google_oauth.exchange_code(&code).await?;
    let profile = state.google_oauth.fetch_profile(&access_token).await?;
    let user = find_or_create_user(&state.db, &profile).await?;

    tracing::info!(user_id = %user.id, "OAuth successful");

    let token = state
        .auth
        .issue_token(&user.id, &user.email)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("JWT creation failed: {}", e)))?;

    let redirect_url = format!("{}/callback?token={}", frontend_url, token);
    Ok(Redirect::temporary(&redirect_url))
}

/// Look up the user by Google subject, creating it on first login.
pub async fn find_or_create_user(db: &Database, profile: &GoogleProfile) -> Result<User> {
    if let Some(user) = db.find_user_by_google_id(&profile.sub).await? {
        return Ok(user);
    }

    let email = profile.email.clone().unwrap_or_default();
    let user = User {
        id: new_document_id()?,
        google_id: profile.sub.clone(),
        display_name: profile
            .name
            .clone()
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| email.clone()),
        email,
        created_at: format_utc_rfc3339(chrono::Utc::now()),
    };
    db.insert_user(&user).await?;

    tracing::info!(user_id = %user.id, "Created user on first login");
    Ok(user)
}

/// Encode `frontend_url|timestamp_hex|signature_hex` as URL-safe base64.
fn sign_state(frontend_url: &str, timestamp: u128, secret: &[u8]) -> Result<String> {
    let payload = format!("{}|{:x}", frontend_url, timestamp);

    let mut mac = HmacSha256::new_from_slice(secret)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("HMAC init failed: {}", e)))?;
    mac.update(payload.as_bytes());
    let signature = hex::encode(mac.finalize().into_bytes());

    Ok(URL_SAFE_NO_PAD.encode(format!("{}|{}", payload, signature).as_bytes()))
}

/// Verify HMAC signature and decode the frontend URL from the OAuth state parameter.
fn verify_and_decode_state(state: &str, secret: &[u8]) -> Option<String> {
    let bytes = URL_SAFE_NO_PAD.decode(state).ok()?;
    let state_str = String::from_utf8(bytes).ok()?;

    // Split from the right: the URL itself may contain '|'.
    let mut parts = state_str.rsplitn(3, '|');
    let signature_hex = parts.next()?;
    let timestamp_hex = parts.next()?;
    let frontend_url = parts.next()?;

    let payload = format!("{}|{}", frontend_url, timestamp_hex);

    let mut mac = HmacSha256::new_from_slice(secret).ok()?;
    mac.update(payload.as_bytes());

    let signature = hex::decode(signature_hex).ok()?;
    if mac.verify_slice(&signature).is_err() {
        tracing::error!("OAuth state signature mismatch! Potential tampering.");
        return None;
    }

    Some(frontend_url.to_string())
}

/// Logout - tokens live client-side, so this only redirects.
async fn logout() -> Redirect {
    Redirect::temporary("/")
}
