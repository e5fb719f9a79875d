//! In-memory permit store.
//!
//! A `parking_lot::RwLock<HashMap>`; each operation takes exactly one guard
//! and releases it before returning, so no guard outlives an `.await`.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;

use permit_core::{PermitId, Timestamp};
use permit_state::{expire_stale, Permit, PermitStatus, TransitionTarget};

use super::{PermitStore, StoreError, Transitioned};

/// Process-local permit store. Cloning shares the underlying map.
#[derive(Debug, Clone, Default)]
pub struct MemoryPermitStore {
    permits: Arc<RwLock<HashMap<PermitId, Permit>>>,
    closed: Arc<AtomicBool>,
}

impl MemoryPermitStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored permits.
    pub fn len(&self) -> usize {
        self.permits.read().len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.permits.read().is_empty()
    }

    /// Fetch a permit by id.
    pub fn get(&self, id: &PermitId) -> Option<Permit> {
        self.permits.read().get(id).cloned()
    }

    fn check_open(&self) -> Result<(), StoreError> {
        if self.closed.load(Ordering::Acquire) {
            return Err(StoreError::Unavailable("store closed".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl PermitStore for MemoryPermitStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn insert(&self, permit: &Permit) -> Result<(), StoreError> {
        self.check_open()?;
        let mut guard = self.permits.write();
        if guard.contains_key(&permit.id) {
            return Err(StoreError::Backend(format!(
                "duplicate permit id {}",
                permit.id
            )));
        }
        guard.insert(permit.id, permit.clone());
        Ok(())
    }

    async fn list(&self, status: Option<PermitStatus>) -> Result<Vec<Permit>, StoreError> {
        self.check_open()?;
        let mut permits: Vec<Permit> = self
            .permits
            .read()
            .values()
            .filter(|p| status.map_or(true, |s| p.status == s))
            .cloned()
            .collect();
        permits.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(permits)
    }

    async fn transition(
        &self,
        id: PermitId,
        target: TransitionTarget,
    ) -> Result<Option<Transitioned>, StoreError> {
        self.check_open()?;
        let mut guard = self.permits.write();
        Ok(guard.get_mut(&id).map(|permit| {
            let outcome = permit.apply(target);
            Transitioned {
                permit: permit.clone(),
                outcome,
            }
        }))
    }

    async fn expire_pending_before(&self, cutoff: Timestamp) -> Result<u64, StoreError> {
        self.check_open()?;
        let mut guard = self.permits.write();
        Ok(expire_stale(guard.values_mut(), cutoff))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.check_open()
    }

    async fn close(&self) {
        self.closed.store(true, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use permit_core::PermitApplication;
    use std::time::Duration;

    fn t0() -> Timestamp {
        Timestamp::parse("2026-01-15T12:00:00Z").unwrap()
    }

    fn permit_at(created_at: Timestamp) -> Permit {
        let app = PermitApplication::new("Alice", "ABC123", "1 Main St").unwrap();
        Permit::new(PermitId::new(), app, created_at)
    }

    #[tokio::test]
    async fn insert_then_list() {
        let store = MemoryPermitStore::new();
        let permit = permit_at(t0());
        store.insert(&permit).await.unwrap();
        assert_eq!(store.list(None).await.unwrap(), vec![permit]);
    }

    #[tokio::test]
    async fn duplicate_id_rejected() {
        let store = MemoryPermitStore::new();
        let permit = permit_at(t0());
        store.insert(&permit).await.unwrap();
        assert!(matches!(
            store.insert(&permit).await,
            Err(StoreError::Backend(_))
        ));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn list_orders_by_creation_time() {
        let store = MemoryPermitStore::new();
        let later = permit_at(t0().checked_add(Duration::from_secs(10)).unwrap());
        let earlier = permit_at(t0());
        store.insert(&later).await.unwrap();
        store.insert(&earlier).await.unwrap();
        let ids: Vec<_> = store.list(None).await.unwrap().into_iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![earlier.id, later.id]);
    }

    #[tokio::test]
    async fn transition_unknown_id_writes_nothing() {
        let store = MemoryPermitStore::new();
        let permit = permit_at(t0());
        store.insert(&permit).await.unwrap();
        let result = store
            .transition(PermitId::new(), TransitionTarget::Approved)
            .await
            .unwrap();
        assert!(result.is_none());
        assert_eq!(store.get(&permit.id).unwrap(), permit);
    }

    #[tokio::test]
    async fn transition_reports_previous_status() {
        let store = MemoryPermitStore::new();
        let permit = permit_at(t0());
        store.insert(&permit).await.unwrap();
        let done = store
            .transition(permit.id, TransitionTarget::Revoked)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(done.outcome.from, PermitStatus::Pending);
        assert_eq!(done.permit.status, PermitStatus::Revoked);
        assert_eq!(done.permit.created_at, permit.created_at);
    }

    #[tokio::test]
    async fn expire_pending_before_cutoff() {
        let store = MemoryPermitStore::new();
        let old = permit_at(t0());
        let fresh = permit_at(t0().checked_add(Duration::from_secs(600)).unwrap());
        store.insert(&old).await.unwrap();
        store.insert(&fresh).await.unwrap();
        let cutoff = t0().checked_add(Duration::from_secs(300)).unwrap();
        assert_eq!(store.expire_pending_before(cutoff).await.unwrap(), 1);
        assert_eq!(store.get(&old.id).unwrap().status, PermitStatus::Expired);
        assert_eq!(store.get(&fresh.id).unwrap().status, PermitStatus::Pending);
        assert_eq!(store.expire_pending_before(cutoff).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn closed_store_is_unavailable() {
        let store = MemoryPermitStore::new();
        assert!(store.ping().await.is_ok());
        store.close().await;
        assert!(matches!(store.ping().await, Err(StoreError::Unavailable(_))));
        assert!(matches!(store.list(None).await, Err(StoreError::Unavailable(_))));
    }
}
