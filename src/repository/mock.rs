//! Mock data sources for isolating the controller in tests.

use async_trait::async_trait;
use mockall::mock;
use serde_json::Value;

use crate::domain::query::ListQuery;
use crate::repository::errors::FetchResult;
use crate::repository::{ListSource, MutationRequest, RequestContext, RowMutator};

mock! {
    pub ListSource {}

    #[async_trait]
    impl ListSource for ListSource {
        async fn fetch_page(&self, context: &RequestContext, query: &ListQuery) -> FetchResult<Value>;
    }
}

mock! {
    pub RowMutator {}

    #[async_trait]
    impl RowMutator for RowMutator {
        async fn mutate(
            &self,
            context: &RequestContext,
            request: &MutationRequest,
        ) -> FetchResult<Value>;
    }
}
