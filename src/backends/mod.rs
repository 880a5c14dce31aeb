// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Implementations of the external collaborators the workflows talk to.
//!
//! # Available Backends
//!
//! ## Store
//! - **MemoryStore**: in-process table for dry runs and tests
//! - **JsonFileStore**: JSON array on disk, rewritten through a temp file
//!
//! ## REST API
//! - **HttpIncidentApi**: `PATCH /incidentes/{id}/estado` via `reqwest`
//!
//! ## Real-time
//! - **WebSocketChannel**: text frames to the gateway via `tokio-tungstenite`
//! - **LogChannel**: dry run, logs the frame
//!
//! ## SMS
//! - **HttpSmsGateway**: JSON webhook via `reqwest`
//! - **LogSmsGateway**: dry run, logs the text
//!
//! ## Stub Backend (Test-Only)
//! Tasks for exercising the executor: fixed output, always failing, flaky,
//! slow and upstream-reading tasks. Not available in production builds.

pub mod api;
pub mod realtime;
pub mod sms;
pub mod store;
#[cfg(test)]
pub mod stub;

pub use api::HttpIncidentApi;
pub use realtime::{LogChannel, WebSocketChannel};
pub use sms::{HttpSmsGateway, LogSmsGateway};
pub use store::{JsonFileStore, MemoryStore};
