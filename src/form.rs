//! Multi-step intake (anamnesis) form.
//!
//! All transitions are synchronous. The only side effect, sending the
//! finished record, is handed out as data by [`IntakeForm::prepare_submit`]
//! and executed by a [`SubmissionCoordinator`].

use tracing::debug;

use crate::error::{FormError, SubmitError};
use crate::models::IntakeRecord;
use crate::patch::SectionPatch;
use crate::steps::{self, StepDescriptor, FIRST_STEP, STEP_COUNT};
use crate::submit::{SubmissionCoordinator, SubmitIntake};
use crate::validation::{validate_section, FieldErrors};

/// Which way the last transition went. Presentation hint only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Direction {
    #[default]
    Forward,
    Backward,
}

/// Result of [`IntakeForm::jump_to`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpOutcome {
    /// The target step is now current.
    Arrived,
    /// Stopped on this step because it failed validation.
    Blocked(u8),
}

#[derive(Debug, Clone)]
pub struct IntakeForm {
    record: IntakeRecord,
    step: u8,
    errors: FieldErrors,
    direction: Direction,
}

impl Default for IntakeForm {
    fn default() -> Self {
        Self::new()
    }
}

impl IntakeForm {
    /// A blank form on the first step.
    pub fn new() -> Self {
        Self::with_record(IntakeRecord::default())
    }

    /// Start from an existing (e.g. previously drafted) record.
    pub fn with_record(record: IntakeRecord) -> Self {
        Self {
            record,
            step: FIRST_STEP,
            errors: FieldErrors::new(),
            direction: Direction::Forward,
        }
    }

    pub fn record(&self) -> &IntakeRecord {
        &self.record
    }

    /// Current 1-based step.
    pub fn step(&self) -> u8 {
        self.step
    }

    pub fn current_step(&self) -> &'static StepDescriptor {
        &steps::STEPS[usize::from(self.step - 1)]
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn is_first_step(&self) -> bool {
        self.step == FIRST_STEP
    }

    pub fn is_last_step(&self) -> bool {
        self.step == STEP_COUNT
    }

    /// Merge a partial update into one section.
    ///
    /// Clears the held errors of the fields the patch wrote, and only those.
    pub fn update_section(&mut self, patch: impl Into<SectionPatch>) {
        let patch = patch.into();
        let section = patch.section();
        let touched = patch.apply(&mut self.record);
        for field in &touched {
            self.errors.remove(field);
        }
        debug!(?section, ?touched, "Updated intake section");
    }

    /// Validate the current step and move forward if it passes.
    ///
    /// Returns whether the step changed. The last step is still validated,
    /// so its errors show up, but the step never moves past it.
    pub fn advance(&mut self) -> bool {
        let errors = self.validate_current();
        if !errors.is_empty() {
            debug!(step = self.step, fields = ?errors.keys(), "Intake step invalid");
            self.errors = errors;
            return false;
        }

        self.errors.clear();
        if self.is_last_step() {
            return false;
        }
        self.step += 1;
        self.direction = Direction::Forward;
        debug!(step = self.step, "Advanced intake form");
        true
    }

    /// Move back one step. Never validates; errors of the step left behind
    /// are dropped.
    pub fn retreat(&mut self) -> bool {
        if self.is_first_step() {
            return false;
        }

        self.errors.clear();
        self.step -= 1;
        self.direction = Direction::Backward;
        debug!(step = self.step, "Retreated intake form");
        true
    }

    /// Go straight to `target`.
    ///
    /// Going back is always allowed. Going forward validates every step in
    /// between and stops on the first one that fails, holding its errors.
    pub fn jump_to(&mut self, target: u8) -> Result<JumpOutcome, FormError> {
        if steps::step(target).is_none() {
            return Err(FormError::StepOutOfRange(target));
        }

        if target <= self.step {
            if target < self.step {
                self.errors.clear();
                self.direction = Direction::Backward;
            }
            self.step = target;
            return Ok(JumpOutcome::Arrived);
        }

        while self.step < target {
            if !self.advance() {
                return Ok(JumpOutcome::Blocked(self.step));
            }
        }
        Ok(JumpOutcome::Arrived)
    }

    /// Check the final step and hand out the record to send.
    ///
    /// The form keeps its own copy, so a failed submission can be retried.
    pub fn prepare_submit(&mut self) -> Result<IntakeRecord, FormError> {
        if !self.is_last_step() {
            return Err(FormError::NotOnFinalStep {
                current: self.step,
                expected: STEP_COUNT,
            });
        }

        let errors = self.validate_current();
        if !errors.is_empty() {
            self.errors = errors.clone();
            return Err(FormError::Invalid {
                step: self.step,
                errors,
            });
        }

        self.errors.clear();
        Ok(self.record.clone())
    }

    /// Validate and send the record through `coordinator`.
    ///
    /// Neither the step nor the record change, whatever the outcome.
    pub async fn submit<S: SubmitIntake>(
        &mut self,
        coordinator: &SubmissionCoordinator<S>,
    ) -> Result<(), SubmitError> {
        let record = self.prepare_submit()?;
        coordinator.submit(record).await
    }

    /// Discard everything and start over.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    fn validate_current(&self) -> FieldErrors {
        validate_section(self.current_step().section, &self.record)
    }
}
