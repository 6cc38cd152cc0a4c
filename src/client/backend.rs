// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client for the Record Service (`/records`).

use crate::client::error::ClientError;
use crate::middleware::api_key::API_KEY_HEADER;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// A record as returned by the backend. `user` is an ID on create and a
/// `{_id, displayName, email}` object on list, so it stays untyped here.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedRecord {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub user: serde_json::Value,
    #[serde(default)]
    pub api_key_used: String,
    #[serde(default)]
    pub data: serde_json::Value,
    pub created_at: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClearResponse {
    pub message: String,
    #[serde(default)]
    pub deleted: usize,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
    #[serde(default)]
    details: Option<String>,
}

/// Sends the API key and bearer token on every call.
#[derive(Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    api_url: String,
    api_key: String,
    token: String,
}

impl BackendClient {
    pub fn new(api_url: &str, api_key: &str, token: &str) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder().timeout(HTTP_TIMEOUT).build()?;

        Ok(Self {
            http,
            api_url: api_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            token: token.to_string(),
        })
    }

    fn records_url(&self) -> String {
        format!("{}/records", self.api_url)
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .header(API_KEY_HEADER, &self.api_key)
            .bearer_auth(&self.token)
    }

    pub async fn save_record<T: Serialize + ?Sized>(
        &self,
        data: &T,
    ) -> Result<SavedRecord, ClientError> {
        let response = self
            .authorized(self.http.post(self.records_url()))
            .json(data)
            .send()
            .await?;
        Self::check_response_json(response).await
    }

    pub async fn list_records(&self) -> Result<Vec<SavedRecord>, ClientError> {
        let response = self
            .authorized(self.http.get(self.records_url()))
            .send()
            .await?;
        Self::check_response_json(response).await
    }

    pub async fn clear_records(&self) -> Result<ClearResponse, ClientError> {
        let response = self
            .authorized(self.http.delete(self.records_url()))
            .send()
            .await?;
        Self::check_response_json(response).await
    }

    async fn check_response_json<T: for<'de> Deserialize<'de>>(
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }

        let message = match response.json::<ErrorBody>().await {
            Ok(body) => body.details.unwrap_or(body.error),
            Err(_) => format!("HTTP {}", status),
        };
        Err(ClientError::Backend {
            status: status.as_u16(),
            message,
        })
    }
}
