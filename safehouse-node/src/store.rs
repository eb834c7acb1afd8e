//! Shared sensor store
//!
//! The single piece of cross-task mutable state: the latest fused reading,
//! the access engine (roster and occupancy) and the status board, behind
//! one lock. Access is scoped: callers pass a synchronous closure, so the
//! lock can never be held across an await point, and it is released on
//! every exit path.
//!
//! Lock acquisition is bounded. A caller that cannot get the lock in time
//! gets `LockTimeout`, skips its cycle and the store counts a degraded
//! cycle.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::Mutex;

use safehouse_core::access::AccessControlEngine;
use safehouse_core::presentation::StatusBoard;
use safehouse_core::reading::FusedReading;

use crate::errors::LockTimeout;

/// Everything guarded by the store lock
#[derive(Debug, Clone)]
pub struct NodeState {
    pub reading: FusedReading,
    pub access: AccessControlEngine,
    pub board: StatusBoard,
}

impl NodeState {
    /// Unknown reading, given roster and board
    pub fn new(access: AccessControlEngine, board: StatusBoard) -> Self {
        Self { reading: FusedReading::unknown(), access, board }
    }
}

/// Lock-guarded node state shared by every task
#[derive(Debug)]
pub struct SharedSensorStore {
    state: Mutex<NodeState>,
    degraded_cycles: AtomicU64,
}

impl SharedSensorStore {
    pub fn new(state: NodeState) -> Self {
        Self { state: Mutex::new(state), degraded_cycles: AtomicU64::new(0) }
    }

    /// Run `f` with exclusive access, waiting at most `timeout` for the lock
    ///
    /// On timeout `f` is not run.
    pub async fn with_lock<R, F>(&self, timeout: Duration, f: F) -> Result<R, LockTimeout>
    where
        F: FnOnce(&mut NodeState) -> R,
    {
        match tokio::time::timeout(timeout, self.state.lock()).await {
            Ok(mut guard) => Ok(f(&mut guard)),
            Err(_) => {
                self.degraded_cycles.fetch_add(1, Ordering::Relaxed);
                Err(LockTimeout { waited: timeout })
            }
        }
    }

    /// Copy of the current state
    pub async fn snapshot(&self, timeout: Duration) -> Result<NodeState, LockTimeout> {
        self.with_lock(timeout, |state| state.clone()).await
    }

    /// Number of operations skipped on lock timeout
    pub fn degraded_cycles(&self) -> u64 {
        self.degraded_cycles.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn store() -> SharedSensorStore {
        SharedSensorStore::new(NodeState::new(AccessControlEngine::default(), StatusBoard::default()))
    }

    #[tokio::test]
    async fn scoped_mutation() {
        let store = store();
        store
            .with_lock(Duration::from_millis(10), |s| s.reading.motion = true)
            .await
            .unwrap();

        let motion = store.with_lock(Duration::from_millis(10), |s| s.reading.motion).await;
        assert_eq!(motion, Ok(true));
        assert_eq!(store.degraded_cycles(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_skips_the_closure() {
        let store = Arc::new(store());

        let holder = Arc::clone(&store);
        let (locked_tx, locked_rx) = tokio::sync::oneshot::channel();
        let hold = tokio::spawn(async move {
            let _guard = holder.state.lock().await;
            let _ = locked_tx.send(());
            tokio::time::sleep(Duration::from_millis(500)).await;
        });
        locked_rx.await.unwrap();

        let mut ran = false;
        let result = store.with_lock(Duration::from_millis(100), |_| ran = true).await;
        assert_eq!(result, Err(LockTimeout { waited: Duration::from_millis(100) }));
        assert!(!ran);
        assert_eq!(store.degraded_cycles(), 1);

        hold.await.unwrap();
        assert!(store.with_lock(Duration::from_millis(100), |_| ()).await.is_ok());
    }
}
