// Acquire/release async lock with FIFO hand-off
// Author: kelexine (https://github.com/kelexine)

use parking_lot::Mutex;
use tokio::sync::Semaphore;

/// A mutual-exclusion lock that is released explicitly rather than by a guard.
///
/// The holder does not need to be the one calling [`AsyncLock::release`], which
/// lets a timer task open the lock that a request task closed. Pending
/// [`AsyncLock::acquire`] calls are resumed one at a time, in arrival order.
/// A caller dropped while waiting never ends up owning the lock.
#[derive(Debug)]
pub struct AsyncLock {
    permits: Semaphore,
    // Serializes the held check in `release` with the permit it adds back
    releasing: Mutex<()>,
}

impl Default for AsyncLock {
    fn default() -> Self {
        Self {
            permits: Semaphore::new(1),
            releasing: Mutex::new(()),
        }
    }
}

impl AsyncLock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait until the lock is free, then hold it.
    pub async fn acquire(&self) {
        // The semaphore is never closed, so acquire only fails if it were
        if let Ok(permit) = self.permits.acquire().await {
            permit.forget();
        }
    }

    /// Hold the lock without waiting. Returns `false` if it is already held.
    pub fn try_acquire(&self) -> bool {
        match self.permits.try_acquire() {
            Ok(permit) => {
                permit.forget();
                true
            }
            Err(_) => false,
        }
    }

    /// Hand the lock to the next waiter, or mark it free.
    ///
    /// Releasing a lock nobody holds does nothing.
    pub fn release(&self) {
        let _releasing = self.releasing.lock();
        if self.permits.available_permits() == 0 {
            self.permits.add_permits(1);
        }
    }

    pub fn is_locked(&self) -> bool {
        self.permits.available_permits() == 0
    }
}
