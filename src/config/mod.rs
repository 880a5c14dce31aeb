// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod dependency_graph;
mod entry_points;
mod loader;
mod runtime;
mod task_map;
mod validation;

pub mod consts;
pub mod defaults;

pub use dependency_graph::DependencyGraph;
pub use entry_points::EntryPoints;
pub use loader::{
    load_and_validate_config, load_config, ApiConfig, Config, EmailConfig, ExecutorOptions,
    RealtimeConfig, SmsConfig, StoreConfig, Strategy, TaskConfig, WorkflowConfig,
};
pub use runtime::{RuntimeBuilder, WorkflowRuntime};
pub use task_map::TaskMap;
pub use validation::{validate_config, validate_workflow};
