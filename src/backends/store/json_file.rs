// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use serde_json::Value;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

use super::{
    find_document, scan_documents, set_document_field, upsert_document, HISTORY_FIELD,
};
use crate::errors::StoreError;
use crate::model::{HistoryEntry, Incident, ScanFilter};
use crate::traits::IncidentStore;

/// Incident table stored as a JSON array in a single file.
///
/// The file is re-read on every operation so edits made by other processes
/// between runs are picked up. Mutations are serialised through a lock and
/// written to a sibling temp file that is then renamed over the original.
/// A missing file is an empty table.
pub struct JsonFileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<Vec<Value>, StoreError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Ok(Vec::new()),
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Vec::new()),
            Err(source) => Err(self.io_error(source)),
        }
    }

    async fn save(&self, docs: &[Value]) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(docs)?;
        let tmp = self.path.with_extension("json.tmp");

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| self.io_error(e))?;
        }
        tokio::fs::write(&tmp, bytes)
            .await
            .map_err(|e| self.io_error(e))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| self.io_error(e))
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }
}

#[async_trait]
impl IncidentStore for JsonFileStore {
    async fn scan(&self, filter: &ScanFilter) -> Result<Vec<Incident>, StoreError> {
        scan_documents(&self.load().await?, filter)
    }

    async fn get(&self, id: &str) -> Result<Option<Incident>, StoreError> {
        find_document(&self.load().await?, id)
    }

    async fn put(&self, incident: Incident) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut docs = self.load().await?;
        upsert_document(&mut docs, &incident)?;
        self.save(&docs).await
    }

    async fn set_history(&self, id: &str, history: Vec<HistoryEntry>) -> Result<(), StoreError> {
        let value = serde_json::to_value(history)?;
        let _guard = self.write_lock.lock().await;
        let mut docs = self.load().await?;
        set_document_field(&mut docs, id, HISTORY_FIELD, value)?;
        self.save(&docs).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Status;
    use chrono::Utc;
    use serde_json::json;

    fn seeded(dir: &tempfile::TempDir) -> JsonFileStore {
        let path = dir.path().join("incidentes.json");
        std::fs::write(
            &path,
            serde_json::to_vec(&json!([
                {"incidenteId": "a", "estado": "pendiente", "tipo": "Limpieza", "extra": {"k": 1}},
                {"incidenteId": "b", "estado": "en_atencion"}
            ]))
            .unwrap(),
        )
        .unwrap();
        JsonFileStore::new(path)
    }

    #[tokio::test]
    async fn test_missing_file_is_empty_table() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("nothing.json"));
        assert!(store.scan(&ScanFilter::default()).await.unwrap().is_empty());
        assert!(store.get("a").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_set_history_persists_and_preserves_fields() {
        let dir = tempfile::tempdir().unwrap();
        let store = seeded(&dir);

        store
            .set_history("a", vec![HistoryEntry::new("nota", Utc::now())])
            .await
            .unwrap();

        let raw: Value =
            serde_json::from_slice(&std::fs::read(store.path()).unwrap()).unwrap();
        assert_eq!(raw[0]["historial"][0]["accion"], "nota");
        assert_eq!(raw[0]["extra"]["k"], 1);
        assert_eq!(raw[1]["incidenteId"], "b");
        assert!(!store.path().with_extension("json.tmp").exists());
    }

    #[tokio::test]
    async fn test_put_creates_file_and_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("nested").join("incidentes.json"));

        let incident: Incident = serde_json::from_value(json!({
            "incidenteId": "n1", "estado": "pendiente"
        }))
        .unwrap();
        store.put(incident).await.unwrap();

        let pending = store.scan(&ScanFilter::status(Status::Pending)).await.unwrap();
        assert_eq!(pending.len(), 1);
    }

    #[tokio::test]
    async fn test_corrupt_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, b"{not json").unwrap();

        let err = JsonFileStore::new(path)
            .scan(&ScanFilter::default())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Serialization(_)));
    }
}
