// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Shared handles to the external collaborators, handed to every task.

use std::sync::Arc;
use std::time::Duration;

use crate::backends::{
    HttpIncidentApi, HttpSmsGateway, JsonFileStore, LogChannel, LogSmsGateway, MemoryStore,
    WebSocketChannel,
};
use crate::config::{Config, EmailConfig, StoreConfig};
use crate::errors::ConfigError;
use crate::model::RoutingTable;
use crate::traits::{IncidentApi, IncidentStore, RealtimeChannel, SmsGateway};

#[derive(Clone)]
pub struct Services {
    pub store: Arc<dyn IncidentStore>,
    pub api: Arc<dyn IncidentApi>,
    pub realtime: Arc<dyn RealtimeChannel>,
    pub sms: Arc<dyn SmsGateway>,
    pub routing: Arc<RoutingTable>,
    pub email: EmailConfig,
    pub emergency_contacts: Vec<String>,
}

impl Services {
    /// Build the production collaborators described by the configuration.
    /// Channels without an endpoint fall back to their logging dry-run versions.
    pub fn from_config(cfg: &Config) -> Result<Self, ConfigError> {
        let store: Arc<dyn IncidentStore> = match &cfg.store {
            StoreConfig::Memory => Arc::new(MemoryStore::new()),
            StoreConfig::JsonFile { path } => Arc::new(JsonFileStore::new(path.clone())),
        };

        let api = HttpIncidentApi::new(
            cfg.api.base_url.clone(),
            Duration::from_secs(cfg.api.timeout_seconds),
        )
        .map_err(|e| ConfigError::Service {
            service: "incident api",
            reason: e.to_string(),
        })?;

        let realtime: Arc<dyn RealtimeChannel> = match &cfg.realtime.url {
            Some(url) => Arc::new(WebSocketChannel::new(url.clone())),
            None => Arc::new(LogChannel),
        };

        let sms: Arc<dyn SmsGateway> = match &cfg.sms.endpoint {
            Some(endpoint) => Arc::new(
                HttpSmsGateway::new(
                    endpoint.clone(),
                    Duration::from_secs(cfg.sms.timeout_seconds),
                )
                .map_err(|e| ConfigError::Service {
                    service: "sms gateway",
                    reason: e.to_string(),
                })?,
            ),
            None => Arc::new(LogSmsGateway),
        };

        Ok(Self {
            store,
            api: Arc::new(api),
            realtime,
            sms,
            routing: Arc::new(cfg.routing.clone()),
            email: cfg.email.clone(),
            emergency_contacts: cfg.sms.emergency_contacts.clone(),
        })
    }
}
