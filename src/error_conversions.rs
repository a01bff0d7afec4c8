//! Error conversion glue between the form and service layers.
//!
//! The form layer must not depend on service error types, so the `From`
//! impls live here.

use crate::forms::FormError;
use crate::services::MutationError;

impl From<FormError> for MutationError {
    fn from(val: FormError) -> Self {
        MutationError::Validation(val.to_string())
    }
}
