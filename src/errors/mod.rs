// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod config;
mod execution;
mod services;

pub use config::{ConfigError, ValidationError};
pub use execution::{ExecutionError, FailureStrategy, PullError};
pub use services::{ClientError, StoreError};
