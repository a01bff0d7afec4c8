//! The remote list controller behind every admin table.
//!
//! A [`ListController`] owns one list's [`ListQuery`] and [`FetchState`].
//! Each query change is dispatched synchronously (the query is updated, the
//! state becomes `Loading` and the request receives the next sequence
//! number) and then awaited. A response is applied only when its sequence
//! number is still the latest, so a slow answer to an older query can never
//! replace the answer to a newer one. Stale requests are left to finish and
//! are dropped on arrival.

use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::domain::list::{FetchFailure, FetchState};
use crate::domain::query::{ListQuery, Sort};
use crate::domain::resource::ResourceSpec;
use crate::domain::row::Row;
use crate::domain::types::{FilterKey, FilterValue, PageSize, SortField, TypeConstraintError};
use crate::normalize::ResponseNormalizer;
use crate::repository::errors::FetchResult;
use crate::repository::{ListSource, RequestContext};

/// What happened to the request a controller call dispatched.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The response (or its error) is now the visible state.
    Applied,
    /// A newer request was dispatched meanwhile; the response was dropped.
    Stale,
    /// Nothing was dispatched.
    Skipped,
}

struct ControllerState<R> {
    query: ListQuery,
    /// Search text typed but not yet submitted.
    search_draft: String,
    fetch: FetchState<R>,
    context: RequestContext,
    latest: u64,
}

#[derive(Debug)]
struct FetchTicket {
    seq: u64,
    query: ListQuery,
    context: RequestContext,
}

enum Completion {
    Done(FetchOutcome),
    Refetch(FetchTicket),
}

pub struct ListController<S, R = Row> {
    source: S,
    normalizer: ResponseNormalizer,
    /// Declared search, sort and filter options; `None` allows anything.
    resource: Option<ResourceSpec>,
    inner: Mutex<ControllerState<R>>,
}

impl<S, R> ListController<S, R>
where
    S: ListSource,
    R: DeserializeOwned + Clone + Send,
{
    pub fn new(source: S, normalizer: ResponseNormalizer, query: ListQuery) -> Self {
        Self {
            source,
            normalizer,
            resource: None,
            inner: Mutex::new(ControllerState {
                search_draft: query.search_text.clone(),
                query,
                fetch: FetchState::Idle,
                context: RequestContext::anonymous(),
                latest: 0,
            }),
        }
    }

    /// Controller for a catalog resource, starting from its initial query.
    ///
    /// Search, sort and filter changes the resource does not offer are
    /// rejected without fetching.
    pub fn for_resource(resource: &ResourceSpec, source: S) -> Self {
        let mut controller = Self::new(
            source,
            ResponseNormalizer::for_resource(resource),
            resource.initial_query(),
        );
        controller.resource = Some(resource.clone());
        controller
    }

    pub fn with_context(mut self, context: RequestContext) -> Self {
        self.inner
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .context = context;
        self
    }

    /// Replaces the credential used by subsequent requests; fetches nothing.
    pub fn set_context(&self, context: RequestContext) {
        self.lock().context = context;
    }

    pub fn context(&self) -> RequestContext {
        self.lock().context.clone()
    }

    pub fn query(&self) -> ListQuery {
        self.lock().query.clone()
    }

    pub fn state(&self) -> FetchState<R> {
        self.lock().fetch.clone()
    }

    /// The search box content, submitted or not.
    pub fn search_text(&self) -> String {
        self.lock().search_draft.clone()
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn resource(&self) -> Option<&ResourceSpec> {
        self.resource.as_ref()
    }

    /// First fetch after mounting the list.
    pub async fn load(&self) -> FetchOutcome {
        self.refresh().await
    }

    /// Moves to `page`, never below 1.
    ///
    /// Moving to the page already shown is skipped.
    pub async fn set_page(&self, page: i64) -> FetchOutcome {
        let ticket = self.dispatch(|query, fetch| {
            let previous = query.page;
            query.set_page(page);
            query.page != previous || !fetch.is_loaded()
        });
        self.complete(ticket).await
    }

    pub async fn set_page_size(&self, page_size: PageSize) -> FetchOutcome {
        let ticket = self.dispatch(|query, _| {
            query.set_page_size(page_size);
            true
        });
        self.complete(ticket).await
    }

    /// Records typed search text without fetching.
    pub fn set_search_text(&self, text: impl Into<String>) {
        self.lock().search_draft = text.into();
    }

    /// Commits the typed search text and fetches the first page.
    pub async fn submit_search(&self) -> FetchOutcome {
        if !self.permits(|resource| resource.check_search()) {
            return FetchOutcome::Skipped;
        }
        let ticket = {
            let mut state = self.lock();
            let draft = state.search_draft.clone();
            state.query.set_search_text(&draft);
            Some(Self::issue(&mut state))
        };
        self.complete(ticket).await
    }

    /// Sets (`Some`) or clears (`None`) one filter.
    pub async fn set_filter(&self, key: FilterKey, value: Option<FilterValue>) -> FetchOutcome {
        let rejected = value
            .as_ref()
            .is_some_and(|value| !self.permits(|resource| resource.check_filter(&key, value)));
        if rejected {
            return FetchOutcome::Skipped;
        }
        let ticket = self.dispatch(|query, _| {
            query.set_filter(key, value);
            true
        });
        self.complete(ticket).await
    }

    /// Replaces the sort; `None` returns to server order.
    pub async fn set_sort(&self, sort: Option<Sort>) -> FetchOutcome {
        let rejected = sort
            .as_ref()
            .is_some_and(|sort| !self.permits(|resource| resource.check_sort(&sort.field)));
        if rejected {
            return FetchOutcome::Skipped;
        }
        let ticket = self.dispatch(|query, _| {
            query.set_sort(sort);
            true
        });
        self.complete(ticket).await
    }

    /// Column-header click: none, ascending, descending, none.
    pub async fn toggle_sort(&self, field: SortField) -> FetchOutcome {
        if !self.permits(|resource| resource.check_sort(&field)) {
            return FetchOutcome::Skipped;
        }
        let ticket = self.dispatch(|query, _| {
            query.toggle_sort(field);
            true
        });
        self.complete(ticket).await
    }

    /// Re-issues the current query unchanged.
    pub async fn refresh(&self) -> FetchOutcome {
        let ticket = self.dispatch(|_, _| true);
        self.complete(ticket).await
    }

    /// Runs `check` against the resource, logging a rejection.
    fn permits(
        &self,
        check: impl FnOnce(&ResourceSpec) -> Result<(), TypeConstraintError>,
    ) -> bool {
        let Some(resource) = &self.resource else {
            return true;
        };
        match check(resource) {
            Ok(()) => true,
            Err(err) => {
                log::warn!("Rejected change to {} list: {err}", resource.name);
                false
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, ControllerState<R>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Applies `update` and, if it asks for a fetch, issues a ticket.
    fn dispatch(
        &self,
        update: impl FnOnce(&mut ListQuery, &FetchState<R>) -> bool,
    ) -> Option<FetchTicket> {
        let mut state = self.lock();
        let ControllerState { query, fetch, .. } = &mut *state;
        if update(query, fetch) {
            Some(Self::issue(&mut state))
        } else {
            None
        }
    }

    fn issue(state: &mut ControllerState<R>) -> FetchTicket {
        state.latest += 1;
        state.fetch = FetchState::Loading;
        log::debug!(
            "Dispatching list request #{} for page {}",
            state.latest,
            state.query.page
        );
        FetchTicket {
            seq: state.latest,
            query: state.query.clone(),
            context: state.context.clone(),
        }
    }

    async fn complete(&self, ticket: Option<FetchTicket>) -> FetchOutcome {
        let Some(mut ticket) = ticket else {
            return FetchOutcome::Skipped;
        };
        loop {
            let response = self
                .source
                .fetch_page(&ticket.context, &ticket.query)
                .await;
            match self.apply(ticket, response) {
                Completion::Done(outcome) => return outcome,
                Completion::Refetch(next) => ticket = next,
            }
        }
    }

    fn apply(&self, ticket: FetchTicket, response: FetchResult<Value>) -> Completion {
        let mut state = self.lock();
        if ticket.seq != state.latest {
            log::debug!(
                "Discarding stale list response #{} (latest #{})",
                ticket.seq,
                state.latest
            );
            return Completion::Done(FetchOutcome::Stale);
        }

        let normalized =
            response.and_then(|body| self.normalizer.normalize::<R>(&body, &ticket.query));

        match normalized {
            Ok(result) => {
                if let Some(last) = ticket.query.last_page(result.total_count) {
                    if ticket.query.page > last {
                        log::warn!(
                            "Page {} is past the last page {last}; moving back",
                            ticket.query.page
                        );
                        state.query.page = last;
                        return Completion::Refetch(Self::issue(&mut state));
                    }
                }
                state.fetch = FetchState::Loaded(result);
            }
            Err(error) => {
                log::error!("Failed to load list page {}: {error}", ticket.query.page);
                state.fetch = FetchState::Failed(FetchFailure {
                    error,
                    query: ticket.query,
                });
            }
        }
        Completion::Done(FetchOutcome::Applied)
    }
}
