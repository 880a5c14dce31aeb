// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Seams to the remote services the workflows call.

use async_trait::async_trait;

use crate::errors::ClientError;
use crate::model::{AlertMessage, Status};

/// The incident REST API.
#[async_trait]
pub trait IncidentApi: Send + Sync {
    /// `PATCH /incidentes/{id}/estado` with `{"nuevoEstado": status}`.
    async fn update_status(&self, id: &str, status: Status) -> Result<(), ClientError>;
}

/// Real-time push to connected dashboards.
#[async_trait]
pub trait RealtimeChannel: Send + Sync {
    async fn publish(&self, message: &AlertMessage) -> Result<(), ClientError>;
}

/// SMS provider.
#[async_trait]
pub trait SmsGateway: Send + Sync {
    async fn send(&self, phone_number: &str, text: &str) -> Result<(), ClientError>;
}
