//! Operator input accepted by row actions.

use thiserror::Error;
use validator::ValidationErrors;

pub mod actions;

#[derive(Debug, Error)]
/// Errors that can occur when processing action input.
pub enum FormError {
    #[error("validation errors: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("a reason is required for `{0}`")]
    MissingReason(String),
}
