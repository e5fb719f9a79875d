//! # Sweep Scheduler
//!
//! A `tokio` interval task that runs [`sweep_expired`] against the store
//! once per period. The first tick fires immediately. A failed sweep is
//! logged and the permits are left for the next tick; the loop never exits
//! on error, only on shutdown.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use permit_core::Timestamp;
use permit_state::ExpiryPolicy;

use crate::lifecycle::{sweep_expired, OperationError};
use crate::middleware::metrics::ApiMetrics;
use crate::state::AppState;
use crate::store::PermitStore;

/// Run one sweep at the current time and record it in `metrics`.
pub async fn run_once(
    store: &dyn PermitStore,
    policy: &ExpiryPolicy,
    metrics: &ApiMetrics,
) -> Result<u64, OperationError> {
    let expired = sweep_expired(store, Timestamp::now(), policy).await?;
    metrics.record_sweep(expired);
    Ok(expired)
}

/// Handle to a running sweep task.
#[derive(Debug)]
pub struct SweepScheduler {
    shutdown: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl SweepScheduler {
    /// Spawn the sweep loop over the store, expiry policy, and metrics of
    /// `state`.
    pub fn for_state(state: &AppState, period: Duration) -> Self {
        Self::spawn(
            state.store.clone(),
            state.expiry,
            period,
            state.metrics.clone(),
        )
    }

    /// Spawn the sweep loop on the current runtime.
    pub fn spawn(
        store: Arc<dyn PermitStore>,
        policy: ExpiryPolicy,
        period: Duration,
        metrics: ApiMetrics,
    ) -> Self {
        let (shutdown, mut stop) = watch::channel(false);

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            tracing::info!(
                period_secs = period.as_secs(),
                threshold_secs = policy.threshold().as_secs(),
                "sweep scheduler started"
            );

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        if let Err(e) = run_once(store.as_ref(), &policy, &metrics).await {
                            tracing::error!(error = %e, "permit expiry sweep failed");
                        }
                    }
                    changed = stop.changed() => {
                        if changed.is_err() || *stop.borrow() {
                            break;
                        }
                    }
                }
            }

            tracing::info!("sweep scheduler stopped");
        });

        Self { shutdown, handle }
    }

    /// Signal the loop to stop and wait for it. An in-flight sweep
    /// completes first.
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(true);
        if let Err(e) = self.handle.await {
            tracing::error!(error = %e, "sweep task panicked");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use crate::store::{MemoryPermitStore, StoreError, Transitioned};
    use permit_core::{PermitApplication, PermitId};
    use permit_state::{Permit, PermitStatus, TransitionTarget};

    fn stale_permit() -> Permit {
        let app = PermitApplication::new("Alice", "ABC123", "1 Main St").unwrap();
        let created = Timestamp::now()
            .checked_sub(Duration::from_secs(10 * 60))
            .unwrap();
        Permit::new(PermitId::new(), app, created)
    }

    #[tokio::test]
    async fn run_once_records_metrics() {
        let store = MemoryPermitStore::new();
        store.insert(&stale_permit()).await.unwrap();
        let metrics = ApiMetrics::new();
        let expired = run_once(&store, &ExpiryPolicy::default(), &metrics).await.unwrap();
        assert_eq!(expired, 1);
        assert_eq!(metrics.snapshot().permits_expired, 1);
        assert_eq!(metrics.snapshot().sweeps, 1);
    }

    #[tokio::test]
    async fn scheduler_sweeps_on_first_tick_and_stops() {
        let store = MemoryPermitStore::new();
        let permit = stale_permit();
        store.insert(&permit).await.unwrap();
        let metrics = ApiMetrics::new();

        let scheduler = SweepScheduler::spawn(
            Arc::new(store.clone()),
            ExpiryPolicy::default(),
            Duration::from_secs(3600),
            metrics.clone(),
        );

        for _ in 0..100 {
            if metrics.snapshot().sweeps > 0 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        scheduler.shutdown().await;

        assert_eq!(store.get(&permit.id).unwrap().status, PermitStatus::Expired);
        assert_eq!(metrics.snapshot().permits_expired, 1);
    }

    /// Fails the first `failures` sweeps, then delegates.
    #[derive(Debug)]
    struct FlakyStore {
        inner: MemoryPermitStore,
        failures: AtomicUsize,
    }

    #[async_trait]
    impl PermitStore for FlakyStore {
        fn backend(&self) -> &'static str {
            "flaky"
        }

        async fn insert(&self, permit: &Permit) -> Result<(), StoreError> {
            self.inner.insert(permit).await
        }

        async fn list(&self, status: Option<PermitStatus>) -> Result<Vec<Permit>, StoreError> {
            self.inner.list(status).await
        }

        async fn transition(
            &self,
            id: PermitId,
            target: TransitionTarget,
        ) -> Result<Option<Transitioned>, StoreError> {
            self.inner.transition(id, target).await
        }

        async fn expire_pending_before(&self, cutoff: Timestamp) -> Result<u64, StoreError> {
            let remaining = self.failures.load(Ordering::SeqCst);
            if remaining > 0 {
                self.failures.store(remaining - 1, Ordering::SeqCst);
                return Err(StoreError::Unavailable("connection reset".into()));
            }
            self.inner.expire_pending_before(cutoff).await
        }

        async fn ping(&self) -> Result<(), StoreError> {
            self.inner.ping().await
        }

        async fn close(&self) {
            self.inner.close().await
        }
    }

    #[tokio::test]
    async fn scheduler_retries_after_failed_sweep() {
        let inner = MemoryPermitStore::new();
        let permit = stale_permit();
        inner.insert(&permit).await.unwrap();
        let store = Arc::new(FlakyStore {
            inner: inner.clone(),
            failures: AtomicUsize::new(2),
        });
        let metrics = ApiMetrics::new();

        let scheduler = SweepScheduler::spawn(
            store.clone(),
            ExpiryPolicy::default(),
            Duration::from_millis(5),
            metrics.clone(),
        );
        for _ in 0..200 {
            if metrics.snapshot().sweeps > 0 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        scheduler.shutdown().await;

        assert_eq!(store.failures.load(Ordering::SeqCst), 0);
        assert_eq!(inner.get(&permit.id).unwrap().status, PermitStatus::Expired);
        assert_eq!(metrics.snapshot().permits_expired, 1);
    }

    #[tokio::test]
    async fn scheduler_from_state_uses_state_policy() {
        let store = MemoryPermitStore::new();
        let app = PermitApplication::new("Bob", "XYZ789", "2 Elm St").unwrap();
        let created = Timestamp::now().checked_sub(Duration::from_secs(60)).unwrap();
        let permit = Permit::new(PermitId::new(), app, created);
        store.insert(&permit).await.unwrap();

        let state = AppState::with_store(Arc::new(store.clone()))
            .with_expiry(ExpiryPolicy::new(Duration::from_secs(30)).unwrap());
        let scheduler = SweepScheduler::for_state(&state, Duration::from_secs(3600));
        for _ in 0..100 {
            if state.metrics.snapshot().sweeps > 0 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        scheduler.shutdown().await;

        assert_eq!(store.get(&permit.id).unwrap().status, PermitStatus::Expired);
    }
}
