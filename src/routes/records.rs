// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Saved record routes.
//!
//! The API key and bearer token gates are applied in routes/mod.rs; these
//! handlers only read what the gates attached to the request.

use crate::db::new_document_id;
use crate::error::{AppError, Result};
use crate::middleware::api_key::ApiKeyUsed;
use crate::middleware::auth::AuthUser;
use crate::models::record::UNKNOWN_API_KEY;
use crate::models::{PopulatedRecord, Record, UserSummary};
use crate::time_utils::{format_utc_rfc3339_micros, monotonic_now};
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Extension, Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route(
        "/records",
        post(create_record).get(list_records).delete(clear_records),
    )
}

fn require_identity(auth_user: Option<Extension<AuthUser>>) -> Result<AuthUser> {
    auth_user
        .map(|Extension(user)| user)
        .ok_or_else(|| AppError::Unauthorized("Authorization Bearer token required".to_string()))
}

/// Save an arbitrary JSON payload as a new record.
///
/// The owner is the authenticated user when there is one; otherwise the
/// record is stored anonymously with `user: null`.
async fn create_record(
    State(state): State<Arc<AppState>>,
    auth_user: Option<Extension<AuthUser>>,
    api_key: Option<Extension<ApiKeyUsed>>,
    payload: std::result::Result<Json<serde_json::Value>, JsonRejection>,
) -> Result<Json<Record>> {
    let Json(payload) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;

    let record = Record {
        id: new_document_id()?,
        user: auth_user.map(|Extension(user)| user.user_id),
        api_key_used: api_key
            .map(|Extension(ApiKeyUsed(key))| key)
            .unwrap_or_else(|| UNKNOWN_API_KEY.to_string()),
        data: payload,
        created_at: format_utc_rfc3339_micros(monotonic_now()),
    };

    state.db.insert_record(&record).await.map_err(|e| {
        tracing::error!(error = %e, "Save record error");
        e
    })?;

    tracing::info!(
        record_id = %record.id,
        user_id = record.user.as_deref().unwrap_or("anonymous"),
        "Record saved"
    );

    Ok(Json(record))
}

/// List the caller's records, newest first, with the owner resolved.
async fn list_records(
    State(state): State<Arc<AppState>>,
    auth_user: Option<Extension<AuthUser>>,
) -> Result<Json<Vec<PopulatedRecord>>> {
    let user = require_identity(auth_user)?;

    let records = state.db.list_records_for_user(&user.user_id).await?;
    if records.is_empty() {
        return Ok(Json(Vec::new()));
    }

    // Every record shares the same owner, so one lookup covers the page.
    let owner = state
        .db
        .get_user(&user.user_id)
        .await?
        .as_ref()
        .map(UserSummary::from);

    Ok(Json(
        records
            .into_iter()
            .map(|record| PopulatedRecord::new(record, owner.clone()))
            .collect(),
    ))
}

/// Response for clearing records.
#[derive(Debug, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ClearRecordsResponse {
    pub message: String,
    pub deleted: usize,
}

/// Delete every record owned by the caller.
async fn clear_records(
    State(state): State<Arc<AppState>>,
    auth_user: Option<Extension<AuthUser>>,
) -> Result<Json<ClearRecordsResponse>> {
    let user = require_identity(auth_user)?;

    let deleted = state.db.delete_records_for_user(&user.user_id).await?;
    tracing::info!(user_id = %user.user_id, deleted, "Records cleared");

    Ok(Json(ClearRecordsResponse {
        message: "Records cleared".to_string(),
        deleted,
    }))
}
