//! Client core for ZapNutre.
//!
//! The intake (anamnesis) form engine lives in [`form`], backed by the
//! [`steps`] registry and [`validation`] rules; [`submit`] guards the final
//! submission and [`query`] drives read-only dashboard data. [`client`] and
//! [`auth`] talk to the REST API.

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod form;
pub mod models;
pub mod patch;
pub mod query;
pub mod steps;
pub mod submit;
pub mod validation;

pub use error::{ApiError, FormError, SubmitError};
pub use form::{Direction, IntakeForm, JumpOutcome};
pub use models::IntakeRecord;
pub use query::{FetchPhase, FetchState, Query};
pub use submit::{SubmissionCoordinator, SubmitIntake};
