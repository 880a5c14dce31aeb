// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod exchange;
pub mod factory;
pub mod level_by_level;
pub mod run_report;
pub mod scheduler;

pub use exchange::{ErrorDetail, Outcome, RunContext, TaskRequest, TaskResponse};
pub use factory::ExecutorFactory;
pub use level_by_level::{LevelByLevelExecutor, RetryPolicy};
pub use run_report::RunReport;
pub use scheduler::Scheduler;
