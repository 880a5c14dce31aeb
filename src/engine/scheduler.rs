// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Periodic execution of workflow runtimes.
//!
//! Each workflow gets its own loop driven by a `tokio::time::interval`. The
//! first run starts immediately. A run is awaited inside its loop, so a
//! workflow never overlaps with itself; ticks that fall due while a run is in
//! progress are dropped (`MissedTickBehavior::Skip`) instead of being replayed.
//! Cancelling the token stops the loops once their current run has finished.

use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::config::WorkflowRuntime;
use crate::observability::messages::engine::{
    SchedulerStarted, SchedulerStopped, WorkflowScheduled,
};
use crate::observability::messages::StructuredLog;

pub struct Scheduler {
    workflows: Vec<(Arc<WorkflowRuntime>, Duration)>,
    shutdown: CancellationToken,
}

impl Scheduler {
    pub fn new(shutdown: CancellationToken) -> Self {
        Self {
            workflows: Vec::new(),
            shutdown,
        }
    }

    pub fn add(&mut self, runtime: WorkflowRuntime, interval: Duration) {
        self.workflows.push((Arc::new(runtime), interval));
    }

    pub fn len(&self) -> usize {
        self.workflows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workflows.is_empty()
    }

    /// Run every registered workflow until the shutdown token is cancelled.
    /// Returns the number of runs started, failed ones included.
    pub async fn run(self) -> u64 {
        SchedulerStarted {
            workflow_count: self.workflows.len(),
        }
        .log();

        let mut loops = JoinSet::new();
        for (runtime, interval) in self.workflows {
            WorkflowScheduled {
                workflow_id: runtime.workflow_id(),
                interval,
            }
            .log();
            loops.spawn(workflow_loop(runtime, interval, self.shutdown.clone()));
        }

        let mut runs_completed = 0;
        while let Some(joined) = loops.join_next().await {
            match joined {
                Ok(runs) => runs_completed += runs,
                Err(e) => tracing::error!(error = %e, "Scheduler loop panicked"),
            }
        }

        SchedulerStopped { runs_completed }.log();
        runs_completed
    }
}

async fn workflow_loop(
    runtime: Arc<WorkflowRuntime>,
    interval: Duration,
    shutdown: CancellationToken,
) -> u64 {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut runs = 0;
    loop {
        tokio::select! {
            _ = shutdown.cancelled() => break,
            _ = ticker.tick() => {
                // Failures are logged by the runtime; the next tick retries from scratch.
                let _ = runtime.run_once(Utc::now()).await;
                runs += 1;
            }
        }
    }
    runs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::consts::CLASSIFICATION_WORKFLOW_ID;
    use crate::config::{Config, RuntimeBuilder};
    use crate::errors::StoreError;
    use crate::model::{HistoryEntry, Incident, ScanFilter};
    use crate::services::Services;
    use crate::tasks::test_support::TestServices;
    use crate::traits::IncidentStore;
    use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
    use std::sync::Mutex;
    use tokio::time::Instant;

    fn classification_runtime(services: &TestServices) -> WorkflowRuntime {
        runtime_with(&services.services())
    }

    fn runtime_with(services: &Services) -> WorkflowRuntime {
        let config = Config::default();
        RuntimeBuilder::from_workflow(config.workflow(CLASSIFICATION_WORKFLOW_ID).unwrap(), services)
            .unwrap()
    }

    /// Empty table whose first `slow_scans` scans take `delay`. Records when each
    /// scan started and how many were in flight at once.
    struct SlowStore {
        delay: Duration,
        slow_scans: AtomicU32,
        origin: Instant,
        starts: Mutex<Vec<u64>>,
        active: AtomicUsize,
        max_active: AtomicUsize,
    }

    impl SlowStore {
        fn new(delay: Duration, slow_scans: u32) -> Self {
            Self {
                delay,
                slow_scans: AtomicU32::new(slow_scans),
                origin: Instant::now(),
                starts: Mutex::new(Vec::new()),
                active: AtomicUsize::new(0),
                max_active: AtomicUsize::new(0),
            }
        }

        fn starts(&self) -> Vec<u64> {
            self.starts.lock().unwrap().clone()
        }
    }

    #[async_trait::async_trait]
    impl IncidentStore for SlowStore {
        async fn scan(&self, _filter: &ScanFilter) -> Result<Vec<Incident>, StoreError> {
            self.starts
                .lock()
                .unwrap()
                .push(self.origin.elapsed().as_secs());
            let active = self.active.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_active.fetch_max(active, Ordering::SeqCst);

            let slow = self
                .slow_scans
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok();
            if slow {
                tokio::time::sleep(self.delay).await;
            }

            self.active.fetch_sub(1, Ordering::SeqCst);
            Ok(Vec::new())
        }

        async fn get(&self, _id: &str) -> Result<Option<Incident>, StoreError> {
            Ok(None)
        }

        async fn put(&self, _incident: Incident) -> Result<(), StoreError> {
            Ok(())
        }

        async fn set_history(&self, id: &str, _history: Vec<HistoryEntry>) -> Result<(), StoreError> {
            Err(StoreError::NotFound(id.to_string()))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_runs_on_every_tick_until_cancelled() {
        let services = TestServices::new();
        let token = CancellationToken::new();

        let mut scheduler = Scheduler::new(token.clone());
        scheduler.add(classification_runtime(&services), Duration::from_secs(60));
        assert_eq!(scheduler.len(), 1);

        let handle = tokio::spawn(scheduler.run());

        // Ticks at 0s, 60s and 120s.
        tokio::time::sleep(Duration::from_secs(150)).await;
        token.cancel();

        assert_eq!(handle.await.unwrap(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_run_neither_overlaps_nor_replays_missed_ticks() {
        let store = Arc::new(SlowStore::new(Duration::from_secs(150), 1));
        let mut services = TestServices::new().services();
        services.store = store.clone() as Arc<dyn IncidentStore>;

        let token = CancellationToken::new();
        let mut scheduler = Scheduler::new(token.clone());
        scheduler.add(runtime_with(&services), Duration::from_secs(60));
        let handle = tokio::spawn(scheduler.run());

        // The first run holds the loop until 150s, covering the 60s and 120s ticks.
        // One late tick fires as soon as it ends; the schedule then realigns to 180s.
        tokio::time::sleep(Duration::from_secs(200)).await;
        token.cancel();

        assert_eq!(handle.await.unwrap(), 3);
        assert_eq!(store.starts(), vec![0, 150, 180]);
        assert_eq!(store.max_active.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_cancelled_before_start() {
        let services = TestServices::new();
        let token = CancellationToken::new();
        token.cancel();

        let mut scheduler = Scheduler::new(token);
        scheduler.add(classification_runtime(&services), Duration::from_secs(60));

        // `select!` picks randomly between ready branches, so the first tick may still run.
        assert!(scheduler.run().await <= 1);
    }

    #[tokio::test]
    async fn test_empty_scheduler_returns_immediately() {
        let scheduler = Scheduler::new(CancellationToken::new());
        assert!(scheduler.is_empty());
        assert_eq!(scheduler.run().await, 0);
    }
}
