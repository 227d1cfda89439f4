// Shared cooldown gate for one API handle
// Author: kelexine (https://github.com/kelexine)

use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

use crate::sync::AsyncLock;

/// Holds at most one active cooldown lock.
///
/// Checking for an active cooldown and installing a new one happen under the
/// same mutex, so concurrent failures on one handle produce a single window.
#[derive(Debug, Clone, Default)]
pub struct CooldownSlot {
    active: Arc<Mutex<Option<Arc<AsyncLock>>>>,
    installs: Arc<AtomicU64>,
}

impl CooldownSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active.lock().is_some()
    }

    /// Total number of cooldowns installed over the handle's lifetime.
    pub fn installs(&self) -> u64 {
        self.installs.load(Ordering::Relaxed)
    }

    /// Suspend until the active cooldown, if any, has ended.
    ///
    /// Returns how long the caller waited, or `None` when no cooldown was active.
    pub async fn wait(&self) -> Option<Duration> {
        let lock = self.active.lock().clone()?;
        let started = Instant::now();
        lock.acquire().await;
        // Pass straight through so every queued caller resumes after the timer
        lock.release();
        Some(started.elapsed())
    }

    /// Install a cooldown lasting `duration` unless one is already active.
    ///
    /// The lock is held from the moment it is installed. A timer task clears
    /// the slot and releases the lock when the duration has elapsed. Returns
    /// whether a new cooldown was installed.
    pub fn install(&self, duration: Duration) -> bool {
        let lock = {
            let mut slot = self.active.lock();
            if slot.is_some() {
                return false;
            }
            let lock = Arc::new(AsyncLock::new());
            lock.try_acquire();
            *slot = Some(lock.clone());
            lock
        };
        self.installs.fetch_add(1, Ordering::Relaxed);
        debug!("Cooldown installed for {}ms", duration.as_millis());

        let active = self.active.clone();
        tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            {
                let mut slot = active.lock();
                if slot.as_ref().is_some_and(|current| Arc::ptr_eq(current, &lock)) {
                    *slot = None;
                }
            }
            lock.release();
            debug!("Cooldown ended");
        });

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_about(waited: Option<Duration>, expected: Duration) {
        let waited = waited.expect("expected to wait on a cooldown");
        assert!(
            waited >= expected && waited < expected + Duration::from_millis(50),
            "waited {:?}, expected {:?}",
            waited,
            expected
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_without_cooldown_returns_immediately() {
        let slot = CooldownSlot::new();
        assert_eq!(slot.wait().await, None);
        assert_eq!(slot.installs(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_install_blocks_until_timer_fires() {
        let slot = CooldownSlot::new();
        assert!(slot.install(Duration::from_secs(4)));
        assert!(slot.is_active());

        assert_about(slot.wait().await, Duration::from_secs(4));
        assert!(!slot.is_active());
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_install_is_refused_while_active() {
        let slot = CooldownSlot::new();
        assert!(slot.install(Duration::from_secs(1)));
        assert!(!slot.install(Duration::from_secs(9)));
        assert_eq!(slot.installs(), 1);

        // The refused install did not stretch the window
        assert_about(slot.wait().await, Duration::from_secs(1));
        assert!(slot.install(Duration::from_secs(1)));
        assert_eq!(slot.installs(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_all_waiters_resume_together() {
        let slot = CooldownSlot::new();
        slot.install(Duration::from_secs(2));

        let waiters: Vec<_> = (0..4)
            .map(|_| {
                let slot = slot.clone();
                tokio::spawn(async move { slot.wait().await })
            })
            .collect();

        for waiter in waiters {
            assert_about(waiter.await.unwrap(), Duration::from_secs(2));
        }
    }
}
