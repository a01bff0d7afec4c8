use serde::Deserialize;
use validator::Validate;

use crate::domain::resource::RowActionSpec;
use crate::forms::FormError;

#[derive(Debug, Default, Deserialize, Validate)]
/// Input collected by the confirmation dialog of a row action.
pub struct RowActionForm {
    /// Free-text justification, shown to the affected user by the backend.
    #[validate(length(max = 500))]
    pub reason: Option<String>,
}

impl RowActionForm {
    pub fn with_reason(reason: impl Into<String>) -> Self {
        Self {
            reason: Some(reason.into()),
        }
    }

    /// Validates the form for `action` and returns the trimmed reason.
    ///
    /// Blank reasons count as absent.
    pub fn reason_for(&self, action: &RowActionSpec) -> Result<Option<String>, FormError> {
        self.validate()?;

        let reason = self
            .reason
            .as_deref()
            .map(str::trim)
            .filter(|reason| !reason.is_empty())
            .map(str::to_string);

        if action.requires_reason && reason.is_none() {
            return Err(FormError::MissingReason(action.name.clone()));
        }

        Ok(reason)
    }
}
