use serde::Serialize;

use crate::domain::query::ListQuery;
use crate::domain::types::PageSize;
use crate::repository::errors::FetchError;

/// One page of rows as returned by the backend.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct ListResult<R> {
    /// Rows in server order; never longer than `page_size`.
    pub rows: Vec<R>,
    /// Size of the whole filtered set, not just this page.
    pub total_count: usize,
    pub page: usize,
    pub page_size: PageSize,
}

impl<R> ListResult<R> {
    pub fn total_pages(&self) -> usize {
        self.page_size.page_count(self.total_count)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn map<T>(self, f: impl FnMut(R) -> T) -> ListResult<T> {
        ListResult {
            rows: self.rows.into_iter().map(f).collect(),
            total_count: self.total_count,
            page: self.page,
            page_size: self.page_size,
        }
    }
}

/// A list fetch that did not produce rows.
#[derive(Clone, Debug, PartialEq)]
pub struct FetchFailure {
    pub error: FetchError,
    /// Query the failed request was issued for.
    pub query: ListQuery,
}

impl FetchFailure {
    /// Text suitable for the inline error shown in place of the table body.
    pub fn message(&self) -> String {
        self.error.user_message()
    }
}

/// What the list currently shows.
#[derive(Clone, Debug, PartialEq)]
pub enum FetchState<R> {
    Idle,
    Loading,
    Loaded(ListResult<R>),
    Failed(FetchFailure),
}

impl<R> Default for FetchState<R> {
    fn default() -> Self {
        FetchState::Idle
    }
}

impl<R> FetchState<R> {
    pub fn is_loading(&self) -> bool {
        matches!(self, FetchState::Loading)
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, FetchState::Loaded(_))
    }

    pub fn result(&self) -> Option<&ListResult<R>> {
        match self {
            FetchState::Loaded(result) => Some(result),
            _ => None,
        }
    }

    pub fn failure(&self) -> Option<&FetchFailure> {
        match self {
            FetchState::Failed(failure) => Some(failure),
            _ => None,
        }
    }
}
