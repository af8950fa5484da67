//! HTML page handlers.
//!
//! Handlers re-render the submitted form (status 200) when a service returns
//! [`AppError::Form`]; every other error becomes a JSON error response.

pub mod comments;
pub mod news;
pub mod notes;
pub mod users;

use crate::domain::validation::FormErrors;
use crate::error::AppError;

/// Splits recoverable form errors from the rest.
pub(crate) fn form_errors(error: AppError) -> Result<FormErrors, AppError> {
    match error {
        AppError::Form(errors) => Ok(errors),
        other => Err(other),
    }
}
