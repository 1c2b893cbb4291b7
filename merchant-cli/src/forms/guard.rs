//! Single-flight guard for form submissions
//!
//! A one-permit semaphore: a submission takes the permit and holds it until the
//! form's `submit()` returns its dialog. While it is held the submit control is
//! disabled. The permit is gone before the caller renders that dialog, so the
//! control is already enabled while the dialog is on screen; callers that must
//! block input until dismissal do so themselves.

use log::debug;
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Owns the permit for one form instance
#[derive(Debug, Clone)]
pub struct SubmitGuard {
    semaphore: Arc<Semaphore>,
}

/// Read-only view of the guard for whatever renders the submit control
#[derive(Debug, Clone)]
pub struct SubmitControl {
    semaphore: Arc<Semaphore>,
}

/// Held for the duration of one submission; dropping it re-enables the control
#[derive(Debug)]
pub struct SubmitPermit {
    _permit: OwnedSemaphorePermit,
}

impl SubmitGuard {
    pub fn new() -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(1)),
        }
    }

    /// Take the permit without waiting. None while a submission is outstanding.
    pub fn try_begin(&self) -> Option<SubmitPermit> {
        match self.semaphore.clone().try_acquire_owned() {
            Ok(permit) => {
                debug!("Submit guard: submission started");
                Some(SubmitPermit { _permit: permit })
            }
            Err(_) => {
                debug!("Submit guard: submission already in flight");
                None
            }
        }
    }

    pub fn control(&self) -> SubmitControl {
        SubmitControl {
            semaphore: Arc::clone(&self.semaphore),
        }
    }
}

impl Default for SubmitGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl SubmitControl {
    pub fn is_enabled(&self) -> bool {
        self.semaphore.available_permits() > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_one_submission_at_a_time() {
        let guard = SubmitGuard::new();
        let control = guard.control();
        assert!(control.is_enabled());

        let permit = guard.try_begin();
        assert!(permit.is_some());
        assert!(!control.is_enabled());
        assert!(guard.try_begin().is_none());

        drop(permit);
        assert!(control.is_enabled());
        assert!(guard.try_begin().is_some());
    }

    #[tokio::test]
    async fn test_permit_released_when_task_finishes() {
        let guard = SubmitGuard::new();
        let control = guard.control();
        let (release_tx, release_rx) = tokio::sync::oneshot::channel::<()>();

        let permit = guard.try_begin().unwrap();
        let task = tokio::spawn(async move {
            let _permit = permit;
            release_rx.await.ok();
        });

        assert!(!control.is_enabled());
        release_tx.send(()).unwrap();
        task.await.unwrap();
        assert!(control.is_enabled());
    }
}
