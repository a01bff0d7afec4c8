//! Shared helpers for integration tests.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use admin_dashboard::domain::query::ListQuery;
use admin_dashboard::repository::errors::{FetchError, FetchResult};
use admin_dashboard::repository::{ListSource, RequestContext};
use async_trait::async_trait;
use serde_json::{Value, json};

/// List source replaying scripted responses, each after its own delay.
///
/// Responses are handed out in dispatch order, so a longer delay on an
/// earlier entry makes it arrive after later ones.
#[derive(Default)]
pub struct ScriptedSource {
    script: Mutex<VecDeque<(Duration, FetchResult<Value>)>>,
    seen: Mutex<Vec<(RequestContext, ListQuery)>>,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn then(self, response: FetchResult<Value>) -> Self {
        self.then_after(Duration::ZERO, response)
    }

    pub fn then_after(self, delay: Duration, response: FetchResult<Value>) -> Self {
        self.script.lock().unwrap().push_back((delay, response));
        self
    }

    pub fn push(&self, response: FetchResult<Value>) {
        self.script
            .lock()
            .unwrap()
            .push_back((Duration::ZERO, response));
    }

    pub fn queries(&self) -> Vec<ListQuery> {
        self.seen
            .lock()
            .unwrap()
            .iter()
            .map(|(_, query)| query.clone())
            .collect()
    }

    pub fn contexts(&self) -> Vec<RequestContext> {
        self.seen
            .lock()
            .unwrap()
            .iter()
            .map(|(context, _)| context.clone())
            .collect()
    }
}

#[async_trait]
impl ListSource for ScriptedSource {
    async fn fetch_page(&self, context: &RequestContext, query: &ListQuery) -> FetchResult<Value> {
        self.seen
            .lock()
            .unwrap()
            .push((context.clone(), query.clone()));
        let next = self.script.lock().unwrap().pop_front();
        let (delay, response) = next.unwrap_or_else(|| {
            (
                Duration::ZERO,
                Err(FetchError::Network("script exhausted".to_string())),
            )
        });
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        response
    }
}

/// `{data: {users, pagination}}` body with one row per id.
pub fn users_page(ids: &[&str], total: usize) -> Value {
    let rows: Vec<Value> = ids.iter().map(|id| json!({ "id": id })).collect();
    json!({ "data": { "users": rows, "pagination": { "total": total } } })
}
