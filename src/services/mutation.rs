//! Row actions (approve, ban, refund, ...) and the refresh that follows them.
//!
//! A mutation is confirmed by the backend before the list changes: on
//! success the controller re-fetches the current page, on failure the list
//! is left exactly as it was and the error goes back to the caller. Bulk
//! actions send one request per selected row and refresh once at the end.

use std::future::Future;

use serde::de::DeserializeOwned;

use crate::domain::resource::ResourceSpec;
use crate::domain::types::RowId;
use crate::dto::api::action_body;
use crate::forms::actions::RowActionForm;
use crate::repository::errors::FetchError;
use crate::repository::{ListSource, MutationRequest, RowMutator};
use crate::services::controller::{FetchOutcome, ListController};
use crate::services::{MutationError, MutationResult};

/// Awaits a caller-defined mutation and refreshes the list if it succeeded.
pub async fn refresh_after<S, R, T, E>(
    controller: &ListController<S, R>,
    mutation: impl Future<Output = Result<T, E>>,
) -> Result<(T, FetchOutcome), E>
where
    S: ListSource,
    R: DeserializeOwned + Clone + Send,
{
    let value = mutation.await?;
    let outcome = controller.refresh().await;
    Ok((value, outcome))
}

/// Builds the backend request for `action_name` on one row.
pub fn build_action_request(
    resource: &ResourceSpec,
    action_name: &str,
    row_id: &RowId,
    form: &RowActionForm,
) -> MutationResult<MutationRequest> {
    let action =
        resource
            .find_action(action_name)
            .ok_or_else(|| MutationError::UnknownAction {
                resource: resource.name.clone(),
                action: action_name.to_string(),
            })?;

    let reason = form.reason_for(action)?;

    Ok(MutationRequest {
        method: action.method,
        path: action.path(resource.action_base(), row_id),
        body: action_body(action, reason.as_deref()),
    })
}

/// Runs a declared row action and refreshes `controller` on success.
pub async fn perform_row_action<S, R, M>(
    controller: &ListController<S, R>,
    mutator: &M,
    resource: &ResourceSpec,
    action_name: &str,
    row_id: &RowId,
    form: &RowActionForm,
) -> MutationResult<FetchOutcome>
where
    S: ListSource,
    R: DeserializeOwned + Clone + Send,
    M: RowMutator + ?Sized,
{
    let request = build_action_request(resource, action_name, row_id, form).map_err(|err| {
        log::error!("Rejected {action_name} on {} {row_id}: {err}", resource.name);
        err
    })?;

    let context = controller.context();
    let (_, outcome) = refresh_after(controller, async {
        mutator.mutate(&context, &request).await.map_err(|err| {
            log::error!("Failed to {action_name} {} {row_id}: {err}", resource.name);
            MutationError::from(err)
        })
    })
    .await?;

    log::debug!("{action_name} on {} {row_id} applied", resource.name);
    Ok(outcome)
}

/// Per-row results of a bulk action.
#[derive(Debug)]
pub struct BulkActionReport {
    pub succeeded: Vec<RowId>,
    pub failed: Vec<(RowId, FetchError)>,
    /// Refresh issued after the last request.
    pub outcome: FetchOutcome,
}

impl BulkActionReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Runs one declared action on every selected row, then refreshes once.
///
/// Input is validated for all rows before anything is sent. Rows that fail
/// do not stop the rest; if none succeeds the first error is returned and
/// the list is not refreshed.
pub async fn perform_bulk_action<S, R, M>(
    controller: &ListController<S, R>,
    mutator: &M,
    resource: &ResourceSpec,
    action_name: &str,
    row_ids: &[RowId],
    form: &RowActionForm,
) -> MutationResult<BulkActionReport>
where
    S: ListSource,
    R: DeserializeOwned + Clone + Send,
    M: RowMutator + ?Sized,
{
    if row_ids.is_empty() {
        return Err(MutationError::Validation("no rows selected".to_string()));
    }

    let requests = row_ids
        .iter()
        .map(|row_id| build_action_request(resource, action_name, row_id, form))
        .collect::<MutationResult<Vec<_>>>()
        .map_err(|err| {
            log::error!("Rejected bulk {action_name} on {}: {err}", resource.name);
            err
        })?;

    let context = controller.context();
    let mut succeeded = Vec::new();
    let mut failed = Vec::new();
    for (row_id, request) in row_ids.iter().zip(&requests) {
        match mutator.mutate(&context, request).await {
            Ok(_) => succeeded.push(row_id.clone()),
            Err(err) => {
                log::error!("Failed to {action_name} {} {row_id}: {err}", resource.name);
                failed.push((row_id.clone(), err));
            }
        }
    }

    if succeeded.is_empty() {
        let (_, first) = failed.swap_remove(0);
        return Err(MutationError::Backend(first));
    }

    log::info!(
        "Bulk {action_name} on {}: {} applied, {} failed",
        resource.name,
        succeeded.len(),
        failed.len()
    );
    let outcome = controller.refresh().await;
    Ok(BulkActionReport {
        succeeded,
        failed,
        outcome,
    })
}
