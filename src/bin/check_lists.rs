//! Loads the first page of every configured admin list and reports the result.

use std::env;

use dotenvy::dotenv;

use admin_dashboard::catalog;
use admin_dashboard::domain::list::FetchState;
use admin_dashboard::domain::resource::ResourceSpec;
use admin_dashboard::domain::row::Row;
use admin_dashboard::domain::types::{BearerToken, PageSize};
use admin_dashboard::models::config::DashboardConfig;
use admin_dashboard::repository::RequestContext;
use admin_dashboard::repository::http::{HttpApi, HttpListSource};
use admin_dashboard::services::controller::ListController;

fn selected_resources(config: &DashboardConfig) -> Vec<ResourceSpec> {
    let resources = match catalog::all() {
        Ok(resources) => resources,
        Err(err) => {
            log::error!("Invalid resource catalog: {err}");
            std::process::exit(1);
        }
    };

    if config.resources.is_empty() {
        return resources;
    }

    for name in &config.resources {
        if !resources.iter().any(|resource| &resource.name == name) {
            log::warn!("Unknown resource `{name}` in config, skipping");
        }
    }
    resources
        .into_iter()
        .filter(|resource| config.resources.contains(&resource.name))
        .collect()
}

/// Controller loading `resource` through `api` with the configured page size.
fn list_controller(
    api: &HttpApi,
    resource: &ResourceSpec,
    page_size: PageSize,
    context: &RequestContext,
) -> ListController<HttpListSource, Row> {
    let resource = resource.clone().page_size(page_size);
    ListController::for_resource(&resource, api.list_source(&resource))
        .with_context(context.clone())
}

/// Logs the outcome of one list; returns `false` when it failed to load.
fn report(name: &str, state: &FetchState<Row>) -> bool {
    match state {
        FetchState::Loaded(result) => {
            log::info!(
                "{name}: total={} rows={} pages={}",
                result.total_count,
                result.rows.len(),
                result.total_pages()
            );
            true
        }
        FetchState::Failed(failure) => {
            log::error!("{name}: {}", failure.message());
            false
        }
        other => {
            log::warn!("{name}: unexpected state {other:?}");
            false
        }
    }
}

#[tokio::main]
async fn main() {
    dotenv().ok(); // Load .env file
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    // Select config profile (defaults to `local`).
    let app_env = env::var("APP_ENV").unwrap_or_else(|_| "local".into());

    let config = match DashboardConfig::load("config", &app_env) {
        Ok(config) => config,
        Err(err) => {
            log::error!("Error loading dashboard config: {}", err);
            std::process::exit(1);
        }
    };

    let page_size = match PageSize::new(config.default_page_size) {
        Ok(page_size) => page_size,
        Err(err) => {
            log::error!("Invalid default_page_size: {err}");
            std::process::exit(1);
        }
    };

    let context = match config.bearer_token.as_deref().map(BearerToken::new) {
        Some(Ok(token)) => RequestContext::authenticated(token),
        Some(Err(err)) => {
            log::error!("Invalid bearer_token: {err}");
            std::process::exit(1);
        }
        None => RequestContext::anonymous(),
    };

    let api = match HttpApi::from_config(&config) {
        Ok(api) => api,
        Err(err) => {
            log::error!("{err}");
            std::process::exit(1);
        }
    };

    log::info!("Checking lists against {}", api.base_url());

    let mut failed = 0;
    for resource in selected_resources(&config) {
        let controller = list_controller(&api, &resource, page_size, &context);
        controller.load().await;
        if !report(&resource.name, &controller.state()) {
            failed += 1;
        }
    }

    if failed > 0 {
        log::error!("{failed} list(s) failed to load");
        std::process::exit(1);
    }
}
