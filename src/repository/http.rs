//! `reqwest` binding of the data-source seams.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde_json::Value;

use crate::domain::query::ListQuery;
use crate::domain::resource::{MutationMethod, ResourceSpec};
use crate::dto::api::ListQueryParams;
use crate::models::config::DashboardConfig;
use crate::repository::errors::{FetchError, FetchResult};
use crate::repository::{ListSource, MutationRequest, RequestContext, RowMutator};

/// Shared HTTP client rooted at the API base URL.
#[derive(Clone, Debug)]
pub struct HttpApi {
    client: Client,
    base_url: String,
}

impl HttpApi {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Client with the configured request timeout.
    pub fn from_config(config: &DashboardConfig) -> FetchResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|err| FetchError::Network(format!("Failed to build HTTP client: {err}")))?;
        Ok(Self::new(client, config.api_base_url.as_str()))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for `path`, which may omit its leading slash.
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Absolute list URL including the encoded query.
    pub fn list_url(&self, endpoint: &str, query: &ListQuery) -> FetchResult<String> {
        let query_string = ListQueryParams::from(query)
            .to_query_string()
            .map_err(|err| FetchError::Network(format!("Failed to encode query: {err}")))?;
        Ok(format!("{}?{query_string}", self.url(endpoint)))
    }

    /// Source for one resource's list endpoint.
    pub fn list_source(&self, resource: &ResourceSpec) -> HttpListSource {
        HttpListSource {
            api: self.clone(),
            endpoint: resource.endpoint.clone(),
        }
    }

    fn authorize(request: RequestBuilder, context: &RequestContext) -> RequestBuilder {
        match &context.bearer {
            Some(token) => request.bearer_auth(token.as_str()),
            None => request,
        }
    }
}

/// Reads a JSON body, turning error statuses into [`FetchError::Server`].
async fn read_json(response: Response) -> FetchResult<Value> {
    let status = response.status();
    let text = response.text().await?;
    parse_body(status, &text)
}

/// An empty success body is `null`; error bodies only lend their message.
fn parse_body(status: StatusCode, text: &str) -> FetchResult<Value> {
    let body = if text.trim().is_empty() {
        None
    } else {
        serde_json::from_str::<Value>(text).ok()
    };

    if !status.is_success() {
        return Err(FetchError::from_status(status.as_u16(), body.as_ref()));
    }

    match body {
        Some(body) => Ok(body),
        None if text.trim().is_empty() => Ok(Value::Null),
        None => Err(FetchError::MalformedResponse(
            "response body is not JSON".to_string(),
        )),
    }
}

/// List endpoint of one resource.
#[derive(Clone, Debug)]
pub struct HttpListSource {
    api: HttpApi,
    endpoint: String,
}

impl HttpListSource {
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ListSource for HttpListSource {
    async fn fetch_page(&self, context: &RequestContext, query: &ListQuery) -> FetchResult<Value> {
        let url = self.api.list_url(&self.endpoint, query)?;
        log::debug!("GET {url}");
        let request = HttpApi::authorize(self.api.client.get(url), context);
        let response = request.send().await?;
        read_json(response).await
    }
}

impl From<MutationMethod> for Method {
    fn from(method: MutationMethod) -> Self {
        match method {
            MutationMethod::Post => Method::POST,
            MutationMethod::Put => Method::PUT,
            MutationMethod::Patch => Method::PATCH,
        }
    }
}

#[async_trait]
impl RowMutator for HttpApi {
    async fn mutate(
        &self,
        context: &RequestContext,
        request: &MutationRequest,
    ) -> FetchResult<Value> {
        let url = self.url(&request.path);
        log::debug!("{:?} {url}", request.method);
        let builder = self
            .client
            .request(Method::from(request.method), url)
            .json(&request.body);
        let response = HttpApi::authorize(builder, context).send().await?;
        read_json(response).await
    }
}
