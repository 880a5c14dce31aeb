// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;

use crate::errors::StoreError;
use crate::model::{HistoryEntry, Incident, ScanFilter};

/// The document store holding the `Incidentes` table.
///
/// Query semantics belong to the store; this crate only needs a filtered scan,
/// point reads and a history overwrite.
#[async_trait]
pub trait IncidentStore: Send + Sync {
    /// Every incident matching `filter`, in table order.
    async fn scan(&self, filter: &ScanFilter) -> Result<Vec<Incident>, StoreError>;

    async fn get(&self, id: &str) -> Result<Option<Incident>, StoreError>;

    /// Insert or replace a whole incident document.
    async fn put(&self, incident: Incident) -> Result<(), StoreError>;

    /// `SET historial = :h` on one incident. Other fields are left untouched.
    async fn set_history(&self, id: &str, history: Vec<HistoryEntry>) -> Result<(), StoreError>;
}
