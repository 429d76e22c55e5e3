//! Fire-and-forget click recording.
//!
//! A redirect must never wait for, or fail because of, its click write. Each
//! [`ClickRecorder::record`] call spawns one detached task that makes a single
//! insert attempt and then ends. The task's outcome is not observed by anyone:
//! errors are logged and dropped, and a click still in flight when the process
//! exits is lost.
//!
//! The number of in-flight writes is capped by a semaphore. When the cap is
//! reached (the store is slow or down), further clicks are dropped instead of
//! queueing, so memory use stays bounded.

use std::sync::Arc;

use tokio::sync::Semaphore;
use tracing::{debug, warn};

use crate::domain::entities::NewClick;
use crate::domain::repositories::ClickRepository;

/// Default maximum number of concurrent click writes.
pub const DEFAULT_MAX_IN_FLIGHT: usize = 1024;

/// Schedules best-effort click writes outside the request path.
pub struct ClickRecorder {
    repository: Arc<dyn ClickRepository>,
    permits: Arc<Semaphore>,
    max_in_flight: usize,
}

impl ClickRecorder {
    /// Creates a recorder allowing at most `max_in_flight` concurrent writes.
    pub fn new(repository: Arc<dyn ClickRepository>, max_in_flight: usize) -> Self {
        Self {
            repository,
            permits: Arc::new(Semaphore::new(max_in_flight)),
            max_in_flight,
        }
    }

    /// Schedules a single attempt to record a click and returns immediately.
    ///
    /// Returns `false` when the click was dropped because too many writes are
    /// already in flight. Must be called from within a Tokio runtime.
    pub fn record(&self, link_id: i64, ip: Option<String>, user_agent: Option<String>) -> bool {
        let Ok(permit) = self.permits.clone().try_acquire_owned() else {
            debug!(link_id, "Click dropped: recorder at capacity");
            return false;
        };

        let repository = self.repository.clone();
        let new_click = NewClick {
            link_id,
            user_agent,
            ip,
        };

        // Detached: the JoinHandle is dropped, nobody awaits the outcome.
        tokio::spawn(async move {
            if let Err(e) = repository.record(new_click).await {
                warn!(link_id, error = %e, "Failed to record click");
            }
            drop(permit);
        });

        true
    }

    /// Number of click writes currently running.
    pub fn in_flight(&self) -> usize {
        self.max_in_flight - self.permits.available_permits()
    }

    /// Configured maximum of concurrent click writes.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight
    }
}
