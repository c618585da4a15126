use crate::Result;
use core::time::Duration;
use ohno::IntoAppError;
use std::sync::{Mutex, PoisonError};
use tokio::sync::{Semaphore, SemaphorePermit};
use tokio::time::Instant;

/// Limits concurrency and supports temporarily pausing work dispatch.
///
/// Call [`Throttler::acquire`] before each unit of work and hold the permit until the work is
/// done. Any task can call [`Throttler::pause_for`] to hold back new work, for example when
/// the remote side reports a rate limit. Overlapping pauses keep the latest deadline.
#[derive(Debug)]
pub struct Throttler {
    semaphore: Semaphore,
    resume_at: Mutex<Option<Instant>>,
}

impl Throttler {
    #[must_use]
    pub fn new(max_concurrent: usize) -> Self {
        Self {
            semaphore: Semaphore::new(max_concurrent),
            resume_at: Mutex::new(None),
        }
    }

    /// Wait out any active pause, then acquire a concurrency slot.
    pub async fn acquire(&self) -> Result<SemaphorePermit<'_>> {
        loop {
            match self.pause_deadline() {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => break,
            }
        }

        self.semaphore.acquire().await.into_app_err("throttler shut down")
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.pause_deadline().is_some()
    }

    /// Hold back new work for `duration`.
    ///
    /// Work already running is not interrupted. Returns `false` when an equal or longer pause
    /// is already in effect.
    pub fn pause_for(&self, duration: Duration) -> bool {
        let new_deadline = Instant::now() + duration;
        let mut guard = self.resume_at.lock().unwrap_or_else(PoisonError::into_inner);

        if guard.is_some_and(|existing| existing >= new_deadline) {
            return false;
        }

        *guard = Some(new_deadline);
        true
    }

    /// The instant at which an active pause ends, clearing expired pauses.
    fn pause_deadline(&self) -> Option<Instant> {
        let mut guard = self.resume_at.lock().unwrap_or_else(PoisonError::into_inner);
        match *guard {
            Some(deadline) if deadline > Instant::now() => Some(deadline),
            Some(_) => {
                *guard = None;
                None
            }
            None => None,
        }
    }
}
