// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Incident store implementations.
//!
//! Both stores keep incidents as raw JSON documents and only decode them into
//! [`Incident`] on the way out. Writes touch the single field they change, so
//! fields and labels this crate does not model survive untouched.

mod json_file;
mod memory;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

use serde_json::Value;

use crate::errors::StoreError;
use crate::model::{Incident, ScanFilter};
use crate::observability::messages::incidents::UndecodableIncident;
use crate::observability::messages::StructuredLog;

const ID_FIELD: &str = "incidenteId";
const HISTORY_FIELD: &str = "historial";

fn document_id(doc: &Value) -> Option<&str> {
    doc.get(ID_FIELD).and_then(Value::as_str)
}

/// Documents that do not decode are logged and left out; the rest of the scan proceeds.
fn scan_documents(docs: &[Value], filter: &ScanFilter) -> Result<Vec<Incident>, StoreError> {
    let mut matched = Vec::new();
    for doc in docs {
        let incident: Incident = match serde_json::from_value(doc.clone()) {
            Ok(incident) => incident,
            Err(error) => {
                UndecodableIncident {
                    incident_id: document_id(doc),
                    error: &error,
                }
                .log();
                continue;
            }
        };
        if filter.matches(&incident) {
            matched.push(incident);
        }
    }
    Ok(matched)
}

fn find_document(docs: &[Value], id: &str) -> Result<Option<Incident>, StoreError> {
    docs.iter()
        .find(|doc| document_id(doc) == Some(id))
        .map(|doc| serde_json::from_value(doc.clone()))
        .transpose()
        .map_err(StoreError::from)
}

/// Replace the document with the same ID, or append a new one.
fn upsert_document(docs: &mut Vec<Value>, incident: &Incident) -> Result<(), StoreError> {
    let doc = serde_json::to_value(incident)?;
    match docs
        .iter_mut()
        .find(|existing| document_id(existing) == Some(incident.id.as_str()))
    {
        Some(existing) => *existing = doc,
        None => docs.push(doc),
    }
    Ok(())
}

/// `SET field = value` on one document.
fn set_document_field(
    docs: &mut [Value],
    id: &str,
    field: &str,
    value: Value,
) -> Result<(), StoreError> {
    let doc = docs
        .iter_mut()
        .find(|doc| document_id(doc) == Some(id))
        .and_then(Value::as_object_mut)
        .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
    doc.insert(field.to_string(), value);
    Ok(())
}
