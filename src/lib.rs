// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod backends;   // store, REST, WebSocket and SMS clients
pub mod config;     // config + runtime builder
pub mod engine;     // DAG executor + scheduler
pub mod errors;     // error handling
pub mod model;      // incident records and task payloads
pub mod observability;
pub mod services;   // collaborators shared by every task
pub mod tasks;      // classification + notification tasks
pub mod traits;     // unified abstractions
