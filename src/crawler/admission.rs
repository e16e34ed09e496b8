//! Admission control and completion tracking for units of work
//!
//! This module handles:
//! - Bounding how many units of work are past admission at once (semaphore)
//! - Counting units of work that have been created but not finished
//! - Waking the crawl's caller once that count drops to zero

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{Notify, OwnedSemaphorePermit, Semaphore};

/// Counting gate limiting concurrent units of work
///
/// Units that cannot get a slot wait in `admit`; the number of waiting units
/// is unbounded.
#[derive(Debug, Clone)]
pub struct AdmissionGate {
    semaphore: Arc<Semaphore>,
}

impl AdmissionGate {
    /// Creates a gate admitting at most `capacity` units at once
    pub fn new(capacity: usize) -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(capacity)),
        }
    }

    /// Waits for a free slot
    ///
    /// The slot is released when the returned permit is dropped. Returns
    /// `None` once the gate has been closed.
    pub async fn admit(&self) -> Option<OwnedSemaphorePermit> {
        Arc::clone(&self.semaphore).acquire_owned().await.ok()
    }

    /// Closes the gate: current and future `admit` calls return `None`
    pub fn close(&self) {
        self.semaphore.close();
    }

    pub fn is_closed(&self) -> bool {
        self.semaphore.is_closed()
    }

    /// Number of slots not currently held
    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }
}

#[derive(Debug, Default)]
struct TrackerState {
    outstanding: AtomicUsize,
    idle: Notify,
}

/// Counter of units of work that have been created but not finished
///
/// Every unit holds a [`WorkTicket`] from creation until it is done. A child
/// unit must be registered while its parent still holds its ticket, so the
/// count can only reach zero when no work is left.
#[derive(Debug, Clone, Default)]
pub struct WorkTracker {
    state: Arc<TrackerState>,
}

impl WorkTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers one new unit of work
    pub fn register(&self) -> WorkTicket {
        self.state.outstanding.fetch_add(1, Ordering::SeqCst);
        WorkTicket {
            tracker: self.clone(),
        }
    }

    /// Number of registered units that have not finished
    pub fn outstanding(&self) -> usize {
        self.state.outstanding.load(Ordering::SeqCst)
    }

    /// Waits until no registered unit of work is outstanding
    ///
    /// Returns immediately if nothing is outstanding.
    pub async fn wait_idle(&self) {
        loop {
            let notified = self.state.idle.notified();
            tokio::pin!(notified);

            // Register interest before checking, so a completion landing in
            // between cannot be missed.
            notified.as_mut().enable();

            if self.outstanding() == 0 {
                return;
            }

            notified.await;
        }
    }

    fn complete(&self) {
        if self.state.outstanding.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.state.idle.notify_waiters();
        }
    }
}

/// Proof that a unit of work is outstanding
///
/// Dropping the ticket marks the unit as done, on every path out of the unit
/// including a panic.
#[derive(Debug)]
pub struct WorkTicket {
    tracker: WorkTracker,
}

impl Drop for WorkTicket {
    fn drop(&mut self) {
        self.tracker.complete();
    }
}
