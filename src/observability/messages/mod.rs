// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Centralized message types for structured logging.
//!
//! Each message type implements `Display` for the human-readable line and
//! [`StructuredLog`] to emit the same event with typed fields, so JSON log
//! output carries `workflow_id`, `task_id` and friends as real keys.
//!
//! # Organization
//!
//! * `engine` - workflow run lifecycle and scheduler events
//! * `task` - per-task attempts, retries and timeouts
//! * `validation` - configuration validation
//! * `incidents` - what the classification and notification tasks did
//!
//! # Usage Pattern
//!
//! ```rust
//! use alerta_flows::observability::messages::engine::ExecutionStarted;
//! use alerta_flows::observability::messages::StructuredLog;
//!
//! let msg = ExecutionStarted {
//!     workflow_id: "clasificar_incidentes",
//!     run_id: "5c1f...",
//!     strategy: "level_by_level",
//!     task_count: 5,
//!     max_concurrency: 4,
//! };
//!
//! msg.log();
//! ```

use tracing::Span;

pub mod engine;
pub mod incidents;
pub mod task;
pub mod validation;

/// Emit a message as a tracing event, or open a span carrying its fields.
pub trait StructuredLog {
    fn log(&self);

    fn span(&self, name: &str) -> Span;
}
