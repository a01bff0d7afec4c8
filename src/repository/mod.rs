use async_trait::async_trait;
use serde_json::Value;

use crate::domain::query::ListQuery;
use crate::domain::resource::MutationMethod;
use crate::domain::types::BearerToken;
use crate::repository::errors::FetchResult;

pub mod errors;
#[cfg(feature = "http")]
pub mod http;
#[cfg(any(test, feature = "test-mocks"))]
pub mod mock;

/// Per-request context handed to every data source call.
///
/// Carries the session credential explicitly instead of relying on a shared
/// client default.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RequestContext {
    pub bearer: Option<BearerToken>,
}

impl RequestContext {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn authenticated(token: BearerToken) -> Self {
        Self {
            bearer: Some(token),
        }
    }
}

/// A write issued for one row.
#[derive(Clone, Debug, PartialEq)]
pub struct MutationRequest {
    pub method: MutationMethod,
    /// Path relative to the API base.
    pub path: String,
    pub body: Value,
}

/// Source of list pages.
///
/// Returns the raw response body; shaping it into rows is the controller's
/// job.
#[async_trait]
pub trait ListSource: Send + Sync {
    async fn fetch_page(&self, context: &RequestContext, query: &ListQuery) -> FetchResult<Value>;
}

/// Backend endpoint for row actions.
#[async_trait]
pub trait RowMutator: Send + Sync {
    async fn mutate(&self, context: &RequestContext, request: &MutationRequest)
    -> FetchResult<Value>;
}
