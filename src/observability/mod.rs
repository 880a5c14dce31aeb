// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Observability module for structured logging and tracing.
//!
//! Log lines are built from message structs instead of inline format strings.
//! Every struct implements `Display` and [`messages::StructuredLog`], which
//! keeps wording in one place and gives the JSON formatter typed fields.
//!
//! # Architecture
//!
//! * `messages::engine` - workflow runs and the scheduler
//! * `messages::task` - task attempts and retries
//! * `messages::validation` - configuration validation
//! * `messages::incidents` - incident classification and notification events
//!
//! The subscriber itself is installed by the binary (see `init_tracing` in
//! `main.rs`); the library only emits events.

pub mod messages;
