// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Recording doubles for the external collaborators, plus request helpers.

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::backends::MemoryStore;
use crate::config::EmailConfig;
use crate::engine::{Outcome, RunContext, TaskRequest, TaskResponse};
use crate::errors::ClientError;
use crate::model::{AlertMessage, RoutingTable, Status};
use crate::services::Services;
use crate::traits::{IncidentApi, RealtimeChannel, SmsGateway};

pub const EMERGENCY_CONTACT: &str = "+51999999999";

fn rejected(target: &str) -> ClientError {
    ClientError::Status {
        url: target.to_string(),
        status: 500,
        body: "simulated failure".to_string(),
    }
}

/// Records status changes and mirrors successful ones into the store.
pub struct RecordingApi {
    store: Arc<MemoryStore>,
    pub calls: Mutex<Vec<(String, Status)>>,
    pub failing_ids: Mutex<HashSet<String>>,
}

impl RecordingApi {
    pub fn fail_for(&self, id: &str) {
        self.failing_ids.lock().unwrap().insert(id.to_string());
    }

    pub fn calls(&self) -> Vec<(String, Status)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl IncidentApi for RecordingApi {
    async fn update_status(&self, id: &str, status: Status) -> Result<(), ClientError> {
        self.calls.lock().unwrap().push((id.to_string(), status));
        if self.failing_ids.lock().unwrap().contains(id) {
            return Err(rejected(id));
        }
        // Unknown IDs are accepted without touching the store.
        let _ = self
            .store
            .set_field(id, "estado", Value::String(status.label().to_string()))
            .await;
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingChannel {
    pub published: Mutex<Vec<AlertMessage>>,
    pub fail: AtomicBool,
}

impl RecordingChannel {
    pub fn published(&self) -> Vec<AlertMessage> {
        self.published.lock().unwrap().clone()
    }
}

#[async_trait]
impl RealtimeChannel for RecordingChannel {
    async fn publish(&self, message: &AlertMessage) -> Result<(), ClientError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(rejected("websocket"));
        }
        self.published.lock().unwrap().push(message.clone());
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingSms {
    pub sent: Mutex<Vec<(String, String)>>,
    pub fail: AtomicBool,
}

impl RecordingSms {
    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl SmsGateway for RecordingSms {
    async fn send(&self, phone_number: &str, text: &str) -> Result<(), ClientError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(rejected(phone_number));
        }
        self.sent
            .lock()
            .unwrap()
            .push((phone_number.to_string(), text.to_string()));
        Ok(())
    }
}

pub struct TestServices {
    pub store: Arc<MemoryStore>,
    pub api: Arc<RecordingApi>,
    pub realtime: Arc<RecordingChannel>,
    pub sms: Arc<RecordingSms>,
}

impl TestServices {
    pub fn new() -> Self {
        Self::with_incidents(Vec::new())
    }

    pub fn with_incidents(docs: Vec<Value>) -> Self {
        let store = Arc::new(MemoryStore::from_documents(docs));
        Self {
            api: Arc::new(RecordingApi {
                store: store.clone(),
                calls: Mutex::new(Vec::new()),
                failing_ids: Mutex::new(HashSet::new()),
            }),
            store,
            realtime: Arc::new(RecordingChannel::default()),
            sms: Arc::new(RecordingSms::default()),
        }
    }

    pub fn services(&self) -> Services {
        Services {
            store: self.store.clone(),
            api: self.api.clone(),
            realtime: self.realtime.clone(),
            sms: self.sms.clone(),
            routing: Arc::new(RoutingTable::default()),
            email: EmailConfig::default(),
            emergency_contacts: vec![EMERGENCY_CONTACT.to_string()],
        }
    }
}

/// Logical time used by task tests: 2025-11-15 12:00:00 UTC.
pub fn noon() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 11, 15, 12, 0, 0).unwrap()
}

pub fn request_at(now: DateTime<Utc>, outputs: Vec<(&str, Value)>) -> TaskRequest {
    let outputs: HashMap<String, Value> = outputs
        .into_iter()
        .map(|(id, value)| (id.to_string(), value))
        .collect();
    TaskRequest::new(
        Arc::new(RunContext::new("test", now)),
        Arc::new(outputs),
    )
}

pub fn request(outputs: Vec<(&str, Value)>) -> TaskRequest {
    request_at(noon(), outputs)
}

/// Output of a successful response, panicking with the error otherwise.
pub fn output(response: TaskResponse) -> Value {
    match response.outcome {
        Outcome::Output(value) => value,
        Outcome::Error(e) => panic!("task failed with {}: {}", e.code, e.message),
    }
}
