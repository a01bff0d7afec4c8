//! List controller and the row action workflow built around it.

use thiserror::Error;

use crate::repository::errors::FetchError;

pub mod controller;
pub mod mutation;

/// Failure of a single row action. Never affects the list state.
#[derive(Debug, Error)]
pub enum MutationError {
    #[error("invalid input: {0}")]
    Validation(String),

    #[error("unknown action `{action}` for {resource}")]
    UnknownAction { resource: String, action: String },

    #[error(transparent)]
    Backend(#[from] FetchError),
}

impl MutationError {
    /// Text for the toast reporting the failure.
    pub fn user_message(&self) -> String {
        match self {
            MutationError::Backend(err) => err.user_message(),
            other => other.to_string(),
        }
    }
}

pub type MutationResult<T> = Result<T, MutationError>;
