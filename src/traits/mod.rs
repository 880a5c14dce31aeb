// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod channels;
pub mod executor;
pub mod store;
pub mod task;

pub use channels::{IncidentApi, RealtimeChannel, SmsGateway};
pub use executor::DagExecutor;
pub use store::IncidentStore;
pub use task::Task;
pub use crate::config::{DependencyGraph, EntryPoints, TaskMap};
