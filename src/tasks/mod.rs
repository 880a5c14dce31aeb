// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Built-in task implementations for the two incident workflows.
//!
//! Tasks are created by [`TaskFactory`] from the `task:` name in configuration.
//! Each one reads its upstream data with [`TaskRequest::pull`](crate::engine::TaskRequest::pull)
//! and publishes a single JSON output.

pub mod classification;
mod factory;
pub mod notification;

#[cfg(test)]
pub mod test_support;

pub use factory::{TaskFactory, UpstreamRead};
