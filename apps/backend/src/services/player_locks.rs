//! In-process per-player serialization for ledger writes.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

type LockMap = DashMap<i64, Arc<Mutex<()>>>;

/// One async mutex per player id. Cloning shares the same map.
///
/// Entries only live while someone holds or waits for them.
#[derive(Debug, Clone, Default)]
pub struct PlayerLocks {
    locks: Arc<LockMap>,
}

/// Exclusive access to one player's ledger. Dropping it releases the lock
/// and forgets the player if nobody else is waiting.
#[derive(Debug)]
pub struct PlayerLockGuard {
    guard: Option<OwnedMutexGuard<()>>,
    player_id: i64,
    locks: Arc<LockMap>,
}

impl Drop for PlayerLockGuard {
    fn drop(&mut self) {
        drop(self.guard.take());
        // the map holds the last reference unless a waiter cloned it
        self.locks
            .remove_if(&self.player_id, |_, m| Arc::strong_count(m) == 1);
    }
}

impl PlayerLocks {
    /// Wait for exclusive access to `player_id`. Released when the guard drops.
    pub async fn lock(&self, player_id: i64) -> PlayerLockGuard {
        // The map shard guard must be gone before awaiting.
        let mutex = self
            .locks
            .entry(player_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .value()
            .clone();
        let guard = mutex.lock_owned().await;
        PlayerLockGuard {
            guard: Some(guard),
            player_id,
            locks: self.locks.clone(),
        }
    }

    pub fn tracked_players(&self) -> usize {
        self.locks.len()
    }
}
