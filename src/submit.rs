use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::Result;
use tracing::{info, warn};

use crate::error::SubmitError;
use crate::models::IntakeRecord;

/// Something that can deliver a finished intake record.
pub trait SubmitIntake {
    fn submit_intake(&self, record: IntakeRecord) -> impl Future<Output = Result<()>> + Send;
}

impl<F, Fut> SubmitIntake for F
where
    F: Fn(IntakeRecord) -> Fut,
    Fut: Future<Output = Result<()>> + Send,
{
    fn submit_intake(&self, record: IntakeRecord) -> impl Future<Output = Result<()>> + Send {
        self(record)
    }
}

/// Runs at most one submission at a time.
///
/// Clones share the in-flight flag, so every handle given to the UI sees the
/// same state.
pub struct SubmissionCoordinator<S> {
    submitter: Arc<S>,
    in_flight: Arc<AtomicBool>,
}

impl<S> Clone for SubmissionCoordinator<S> {
    fn clone(&self) -> Self {
        Self {
            submitter: self.submitter.clone(),
            in_flight: self.in_flight.clone(),
        }
    }
}

// Clears the flag on every exit, including a dropped future.
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl<S: SubmitIntake> SubmissionCoordinator<S> {
    pub fn new(submitter: S) -> Self {
        Self {
            submitter: Arc::new(submitter),
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn is_submitting(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Hand `record` to the submitter.
    ///
    /// A call made while another is still running returns
    /// [`SubmitError::AlreadySubmitting`] without reaching the submitter.
    /// Failures are returned untouched; nothing is retried.
    pub async fn submit(&self, record: IntakeRecord) -> Result<(), SubmitError> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            warn!("Ignoring intake submission while another is in flight");
            return Err(SubmitError::AlreadySubmitting);
        }
        let _guard = InFlight(&self.in_flight);

        info!("Submitting intake record");
        match self.submitter.submit_intake(record).await {
            Ok(()) => {
                info!("Intake record submitted");
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Intake submission failed");
                Err(SubmitError::Rejected(e))
            }
        }
    }
}
