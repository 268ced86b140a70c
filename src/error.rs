use thiserror::Error;

use crate::validation::FieldErrors;

/// Shown when a failure carries no usable text.
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong. Please try again.";

/// A non-success response from the ZapNutre API.
#[derive(Debug, Error)]
#[error("{method} {path} failed: {status} - {body}")]
pub struct ApiError {
    pub method: String,
    pub path: String,
    pub status: u16,
    /// The `message` field of the JSON error body, when present
    pub message: Option<String>,
    pub body: String,
}

impl ApiError {
    pub fn new(method: &str, path: &str, status: u16, body: String) -> Self {
        let message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(String::from))
            .filter(|m| !m.trim().is_empty());
        Self {
            method: method.to_string(),
            path: path.to_string(),
            status,
            message,
            body,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status == 401
    }
}

#[derive(Debug, Error)]
pub enum FormError {
    #[error("submission is only possible from step {expected}, currently on step {current}")]
    NotOnFinalStep { current: u8, expected: u8 },
    #[error("step {step} has invalid fields: {}", field_list(.errors))]
    Invalid { step: u8, errors: FieldErrors },
    #[error("step {0} does not exist")]
    StepOutOfRange(u8),
}

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("a submission is already in progress")]
    AlreadySubmitting,
    #[error(transparent)]
    Form(#[from] FormError),
    /// The injected submitter failed; the original error is kept as-is.
    #[error(transparent)]
    Rejected(anyhow::Error),
}

fn field_list(errors: &FieldErrors) -> String {
    errors.keys().copied().collect::<Vec<_>>().join(", ")
}

/// Best human-readable text for a failed request: the server-provided
/// message, then the error's own message, then a generic default.
pub fn user_message(err: &anyhow::Error) -> String {
    if let Some(message) = err
        .chain()
        .find_map(|e| e.downcast_ref::<ApiError>())
        .and_then(|api| api.message.clone())
    {
        return message;
    }

    let own = err.to_string();
    if own.trim().is_empty() {
        GENERIC_ERROR_MESSAGE.to_string()
    } else {
        own
    }
}
