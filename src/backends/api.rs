// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::json;
use std::time::Duration;

use crate::errors::ClientError;
use crate::model::Status;
use crate::traits::IncidentApi;

/// Client for the incident REST API.
pub struct HttpIncidentApi {
    client: Client,
    base_url: String,
}

impl HttpIncidentApi {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ClientError> {
        let base_url = base_url.into();
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| ClientError::Transport {
                url: base_url.clone(),
                source,
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn status_url(&self, id: &str) -> String {
        format!("{}/incidentes/{}/estado", self.base_url, id)
    }
}

#[async_trait]
impl IncidentApi for HttpIncidentApi {
    async fn update_status(&self, id: &str, status: Status) -> Result<(), ClientError> {
        let url = self.status_url(id);

        let response = self
            .client
            .patch(&url)
            .header("Content-Type", "application/json")
            .json(&json!({ "nuevoEstado": status.label() }))
            .send()
            .await
            .map_err(|source| ClientError::Transport {
                url: url.clone(),
                source,
            })?;

        // The API answers 200 on success; anything else, 2xx included, counts as a failure.
        let code = response.status();
        if code != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Status {
                url,
                status: code.as_u16(),
                body,
            });
        }

        Ok(())
    }
}
