use std::time::Duration;

use admin_dashboard::catalog;
use admin_dashboard::domain::list::{FetchState, ListResult};
use admin_dashboard::domain::query::{ListQuery, Sort, SortDirection};
use admin_dashboard::domain::row::Row;
use admin_dashboard::domain::types::{
    BearerToken, FilterKey, FilterValue, PageSize, SortField,
};
use admin_dashboard::normalize::ResponseNormalizer;
use admin_dashboard::repository::RequestContext;
use admin_dashboard::repository::errors::FetchError;
use admin_dashboard::services::controller::{FetchOutcome, ListController};
use serde_json::json;

mod common;

use common::{ScriptedSource, users_page};

fn controller(source: ScriptedSource) -> ListController<ScriptedSource> {
    ListController::new(
        source,
        ResponseNormalizer::new(vec!["users".to_string()]),
        ListQuery::default(),
    )
}

fn status(value: &str) -> (FilterKey, Option<FilterValue>) {
    (
        FilterKey::new("status").unwrap(),
        Some(FilterValue::new(value).unwrap()),
    )
}

fn row_ids(state: &FetchState<Row>) -> Vec<String> {
    state
        .result()
        .map(|result| {
            result
                .rows
                .iter()
                .filter_map(|row| row.id().map(|id| id.as_str().to_string()))
                .collect()
        })
        .unwrap_or_default()
}

#[tokio::test]
async fn test_first_page_loads_into_state() {
    let source = ScriptedSource::new().then(Ok(users_page(&["u1", "u2"], 2)));
    let controller = controller(source);

    assert_eq!(controller.state(), FetchState::Idle);
    assert_eq!(controller.load().await, FetchOutcome::Applied);

    let expected = ListResult {
        rows: vec![
            serde_json::from_value::<Row>(json!({"id": "u1"})).unwrap(),
            serde_json::from_value::<Row>(json!({"id": "u2"})).unwrap(),
        ],
        total_count: 2,
        page: 1,
        page_size: PageSize::default(),
    };
    assert_eq!(controller.state(), FetchState::Loaded(expected));
}

#[tokio::test]
async fn test_query_changes_reset_to_first_page() {
    let source = ScriptedSource::new();
    for _ in 0..8 {
        source.push(Ok(users_page(&["u1"], 200)));
    }
    let controller = controller(source);

    controller.set_page(4).await;
    controller
        .set_page_size(PageSize::new(50).unwrap())
        .await;
    assert_eq!(controller.query().page, 1);

    controller.set_page(3).await;
    let (key, value) = status("active");
    controller.set_filter(key, value).await;
    assert_eq!(controller.query().page, 1);

    controller.set_page(2).await;
    controller.set_search_text("jane");
    controller.submit_search().await;
    assert_eq!(controller.query().page, 1);
    assert_eq!(controller.query().search_text, "jane");

    controller.set_page(3).await;
    let (key, _) = status("active");
    controller.set_filter(key, None).await;
    assert_eq!(controller.query().page, 1);
    assert!(controller.query().filters.is_empty());
}

#[tokio::test]
async fn test_page_is_never_below_one() {
    let source = ScriptedSource::new()
        .then(Ok(users_page(&["u1"], 1)))
        .then(Ok(users_page(&["u1"], 1)));
    let controller = controller(source);

    controller.set_page(-7).await;
    assert_eq!(controller.query().page, 1);
    controller.set_page(0).await;
    assert_eq!(controller.query().page, 1);
    // Second call targets the page already shown.
    assert_eq!(controller.source().queries().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_slow_stale_response_is_discarded() {
    let source = ScriptedSource::new()
        .then_after(Duration::from_millis(500), Ok(users_page(&["stale"], 1)))
        .then_after(Duration::from_millis(50), Ok(users_page(&["fresh"], 1)));
    let controller = controller(source);

    let (status_key, active) = status("active");
    let (banned_key, banned) = status("banned");
    let (first, second) = tokio::join!(
        controller.set_filter(status_key, active),
        controller.set_filter(banned_key, banned),
    );

    assert_eq!(first, FetchOutcome::Stale);
    assert_eq!(second, FetchOutcome::Applied);
    assert_eq!(row_ids(&controller.state()), vec!["fresh"]);
    assert_eq!(
        controller.query().filters.values().next().map(|v| v.as_str()),
        Some("banned")
    );
}

#[tokio::test(start_paused = true)]
async fn test_stale_error_does_not_replace_newer_rows() {
    let source = ScriptedSource::new()
        .then_after(
            Duration::from_secs(2),
            Err(FetchError::Network("Network Error".to_string())),
        )
        .then_after(Duration::from_millis(10), Ok(users_page(&["u1"], 1)));
    let controller = controller(source);

    let (first, second) = tokio::join!(controller.refresh(), controller.refresh());

    assert_eq!((first, second), (FetchOutcome::Stale, FetchOutcome::Applied));
    assert!(controller.state().is_loaded());
}

#[tokio::test]
async fn test_equivalent_shapes_normalize_identically() {
    let rows = json!([{"id": "u1", "email": "a@example.com"}, {"id": "u2", "email": "b@example.com"}]);
    let bodies = [
        json!({"data": {"users": rows.clone(), "pagination": {"total": 2}}}),
        json!({"users": rows.clone(), "pagination": {"total": 2}}),
        rows.clone(),
    ];

    let mut results = Vec::new();
    for body in bodies {
        let controller = controller(ScriptedSource::new().then(Ok(body)));
        controller.load().await;
        results.push(controller.state());
    }

    assert!(results[0].is_loaded());
    assert_eq!(results[0], results[1]);
    assert_eq!(results[1], results[2]);
}

#[tokio::test]
async fn test_refresh_twice_keeps_query_and_shows_latest() {
    let source = ScriptedSource::new()
        .then(Ok(users_page(&["u1"], 1)))
        .then(Ok(users_page(&["u2"], 1)));
    let controller = controller(source);
    let before = controller.query();

    controller.refresh().await;
    controller.refresh().await;

    assert_eq!(controller.query(), before);
    assert_eq!(controller.source().queries(), vec![before.clone(), before]);
    assert_eq!(row_ids(&controller.state()), vec!["u2"]);
}

#[tokio::test]
async fn test_filter_change_on_third_page_dispatches_once() {
    let source = ScriptedSource::new()
        .then(Ok(users_page(&["u41"], 60)))
        .then(Ok(users_page(&["u1"], 1)));
    let controller = controller(source);
    controller.set_page(3).await;

    let (key, value) = status("active");
    controller.set_filter(key, value).await;

    let queries = controller.source().queries();
    assert_eq!(queries.len(), 2);
    let expected = ListQuery::default().filter(
        FilterKey::new("status").unwrap(),
        FilterValue::new("active").unwrap(),
    );
    assert_eq!(queries[1], expected);
    assert_eq!(controller.query(), expected);
}

#[tokio::test]
async fn test_network_error_then_successful_refresh() {
    let source = ScriptedSource::new()
        .then(Err(FetchError::Network("Network Error".to_string())))
        .then(Ok(users_page(&["u1"], 1)));
    let controller = controller(source);

    controller.load().await;
    let state = controller.state();
    let failure = state.failure().expect("first load should fail");
    assert_eq!(failure.message(), "Network Error");

    assert_eq!(controller.refresh().await, FetchOutcome::Applied);
    assert_eq!(row_ids(&controller.state()), vec!["u1"]);
}

#[tokio::test]
async fn test_page_past_the_end_moves_back() {
    let source = ScriptedSource::new()
        .then(Ok(users_page(&["u1"], 100)))
        .then(Ok(users_page(&[], 30)))
        .then(Ok(users_page(&["u21"], 30)));
    let controller = controller(source);
    controller.set_page(5).await;

    // Rows were removed elsewhere; page 5 no longer exists.
    controller.refresh().await;

    assert_eq!(controller.query().page, 2);
    let pages: Vec<usize> = controller
        .source()
        .queries()
        .iter()
        .map(|query| query.page)
        .collect();
    assert_eq!(pages, vec![5, 5, 2]);
    assert_eq!(controller.state().result().map(|r| r.page), Some(2));
}

#[tokio::test]
async fn test_sort_header_cycles_and_keeps_page() {
    let source = ScriptedSource::new();
    for _ in 0..4 {
        source.push(Ok(users_page(&["u1"], 100)));
    }
    let controller = controller(source);
    controller.set_page(2).await;

    let field = SortField::new("createdAt").unwrap();
    controller.toggle_sort(field.clone()).await;
    assert_eq!(controller.query().sort, Some(Sort::asc(field.clone())));
    controller.toggle_sort(field.clone()).await;
    assert_eq!(
        controller.query().sort,
        Some(Sort::new(field.clone(), SortDirection::Desc))
    );
    controller.toggle_sort(field).await;
    assert_eq!(controller.query().sort, None);
    assert_eq!(controller.query().page, 2);
}

#[tokio::test]
async fn test_typed_search_is_not_sent_until_submitted() {
    let source = ScriptedSource::new()
        .then(Ok(users_page(&["u1"], 1)))
        .then(Ok(users_page(&["u1"], 1)));
    let controller = controller(source);
    controller.load().await;

    controller.set_search_text("  jane  ");
    assert_eq!(controller.search_text(), "  jane  ");
    assert_eq!(controller.query().search_text, "");
    assert_eq!(controller.source().queries().len(), 1);

    controller.submit_search().await;
    assert_eq!(controller.source().queries()[1].search_text, "jane");
}

#[tokio::test]
async fn test_context_is_sent_with_every_request() {
    let resource = catalog::users().unwrap();
    let token = BearerToken::new("admin-token").unwrap();
    let source = ScriptedSource::new().then(Ok(users_page(&["u1"], 1)));
    let controller = ListController::<_, Row>::for_resource(&resource, source)
        .with_context(RequestContext::authenticated(token.clone()));

    controller.load().await;

    assert_eq!(
        controller.source().contexts(),
        vec![RequestContext::authenticated(token)]
    );
    assert_eq!(
        controller.source().queries()[0].sort,
        Some(Sort::desc(SortField::new("createdAt").unwrap()))
    );
}

#[tokio::test(start_paused = true)]
async fn test_loading_is_visible_while_request_is_in_flight() {
    let source = ScriptedSource::new()
        .then(Ok(users_page(&["u1"], 1)))
        .then_after(Duration::from_millis(100), Ok(users_page(&["u2"], 1)));
    let controller = controller(source);
    controller.load().await;
    assert!(controller.state().is_loaded());

    let observe = async {
        tokio::time::sleep(Duration::from_millis(10)).await;
        controller.state()
    };
    let (outcome, during) = tokio::join!(controller.refresh(), observe);

    assert_eq!(during, FetchState::Loading);
    assert_eq!(outcome, FetchOutcome::Applied);
    assert_eq!(row_ids(&controller.state()), vec!["u2"]);
}

#[tokio::test]
async fn test_catalog_constraints_block_undeclared_changes() {
    let resource = catalog::transactions().unwrap();
    let controller = ListController::<_, Row>::for_resource(&resource, ScriptedSource::new());

    controller.set_search_text("x");
    assert_eq!(controller.submit_search().await, FetchOutcome::Skipped);
    assert_eq!(
        controller
            .toggle_sort(SortField::new("notAColumn").unwrap())
            .await,
        FetchOutcome::Skipped
    );
    assert!(controller.source().queries().is_empty());
    assert_eq!(controller.query(), resource.initial_query());

    let users = catalog::users().unwrap();
    let controller = ListController::<_, Row>::for_resource(
        &users,
        ScriptedSource::new().then(Ok(users_page(&["u1"], 1))),
    );
    let (key, value) = status("deleted");
    assert_eq!(controller.set_filter(key, value).await, FetchOutcome::Skipped);
    let (key, value) = status("banned");
    assert_eq!(controller.set_filter(key, value).await, FetchOutcome::Applied);
    assert_eq!(controller.source().queries().len(), 1);
}
