// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Development-only helpers. Not mounted when `APP_ENV=production`.

use crate::db::new_document_id;
use crate::error::{AppError, Result};
use crate::models::User;
use crate::time_utils::format_utc_rfc3339;
use crate::AppState;
use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/dev/generate-token", get(generate_token))
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// Mint a bearer token for an existing user, or for a new "Dev User".
async fn generate_token(State(state): State<Arc<AppState>>) -> Result<Json<TokenResponse>> {
    let user = match state.db.find_any_user().await? {
        Some(user) => user,
        None => {
            let user = User {
                id: new_document_id()?,
                google_id: "dev".to_string(),
                display_name: "Dev User".to_string(),
                email: "dev@example.com".to_string(),
                created_at: format_utc_rfc3339(chrono::Utc::now()),
            };
            state.db.insert_user(&user).await?;
            tracing::info!(user_id = %user.id, "Created dev user");
            user
        }
    };

    let token = state
        .auth
        .issue_token(&user.id, &user.email)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("JWT creation failed: {}", e)))?;

    tracing::debug!(user_id = %user.id, "Issued dev token");
    Ok(Json(TokenResponse { token }))
}
