// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use super::{
    find_document, scan_documents, set_document_field, upsert_document, HISTORY_FIELD,
};
use crate::errors::StoreError;
use crate::model::{HistoryEntry, Incident, ScanFilter};
use crate::traits::IncidentStore;

/// In-process incident table. Used for dry runs and tests.
#[derive(Default)]
pub struct MemoryStore {
    docs: RwLock<Vec<Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the table with raw documents, kept in the given order.
    pub fn from_documents(docs: Vec<Value>) -> Self {
        Self {
            docs: RwLock::new(docs),
        }
    }

    /// Copy of every stored document.
    pub async fn documents(&self) -> Vec<Value> {
        self.docs.read().await.clone()
    }

    /// Overwrite one top-level field of a document.
    pub async fn set_field(&self, id: &str, field: &str, value: Value) -> Result<(), StoreError> {
        let mut docs = self.docs.write().await;
        set_document_field(&mut docs, id, field, value)
    }
}

#[async_trait]
impl IncidentStore for MemoryStore {
    async fn scan(&self, filter: &ScanFilter) -> Result<Vec<Incident>, StoreError> {
        scan_documents(&self.docs.read().await, filter)
    }

    async fn get(&self, id: &str) -> Result<Option<Incident>, StoreError> {
        find_document(&self.docs.read().await, id)
    }

    async fn put(&self, incident: Incident) -> Result<(), StoreError> {
        upsert_document(&mut *self.docs.write().await, &incident)
    }

    async fn set_history(&self, id: &str, history: Vec<HistoryEntry>) -> Result<(), StoreError> {
        let value = serde_json::to_value(history)?;
        self.set_field(id, HISTORY_FIELD, value).await
    }
}
