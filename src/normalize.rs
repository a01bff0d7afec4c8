//! Turns list response bodies into [`ListResult`]s.
//!
//! The backend wraps list responses in several shapes. Each shape is one
//! [`NormalizationStrategy`]; strategies are tried in [`STRATEGIES`] order and
//! the first one that recognizes the body wins. A body no strategy
//! recognizes is reported as [`FetchError::MalformedResponse`].

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::domain::list::ListResult;
use crate::domain::query::ListQuery;
use crate::domain::resource::ResourceSpec;
use crate::repository::errors::{FetchError, FetchResult};

/// Fields a pagination block may carry the total under, besides `total<Plural>`.
const TOTAL_FIELDS: [&str; 3] = ["total", "totalCount", "totalItems"];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NormalizationStrategy {
    /// `{data: {<plural>: [...], pagination: {...}}}`
    DataEnvelope,
    /// `{<plural>: [...], pagination: {...}}`
    TopLevel,
    /// `{data: [...]}` with an optional top-level `pagination`.
    DataArray,
    /// `[...]`
    BareArray,
}

pub const STRATEGIES: [NormalizationStrategy; 4] = [
    NormalizationStrategy::DataEnvelope,
    NormalizationStrategy::TopLevel,
    NormalizationStrategy::DataArray,
    NormalizationStrategy::BareArray,
];

/// Rows and total pulled out of a body, before paging and typing.
#[derive(Debug, PartialEq)]
pub struct RawPage {
    pub rows: Vec<Value>,
    /// Server-reported total; `None` when the server did not paginate.
    pub total: Option<usize>,
}

impl NormalizationStrategy {
    pub fn name(self) -> &'static str {
        match self {
            NormalizationStrategy::DataEnvelope => "data-envelope",
            NormalizationStrategy::TopLevel => "top-level",
            NormalizationStrategy::DataArray => "data-array",
            NormalizationStrategy::BareArray => "bare-array",
        }
    }

    /// Returns `None` when the body does not have this shape.
    pub fn extract(self, body: &Value, keys: &[String]) -> Option<FetchResult<RawPage>> {
        match self {
            NormalizationStrategy::DataEnvelope => {
                let data = body.get("data")?;
                let rows = collection(data, keys)?;
                let pagination = data.get("pagination").or_else(|| body.get("pagination"));
                Some(raw_page(rows, pagination, keys))
            }
            NormalizationStrategy::TopLevel => {
                let rows = collection(body, keys)?;
                Some(raw_page(rows, body.get("pagination"), keys))
            }
            NormalizationStrategy::DataArray => {
                let rows = body.get("data")?.as_array()?;
                Some(raw_page(rows, body.get("pagination"), keys))
            }
            NormalizationStrategy::BareArray => {
                let rows = body.as_array()?;
                Some(Ok(RawPage {
                    rows: rows.clone(),
                    total: None,
                }))
            }
        }
    }
}

fn collection<'a>(container: &'a Value, keys: &[String]) -> Option<&'a Vec<Value>> {
    keys.iter()
        .find_map(|key| container.get(key.as_str())?.as_array())
}

fn raw_page(rows: &[Value], pagination: Option<&Value>, keys: &[String]) -> FetchResult<RawPage> {
    let total = match pagination {
        Some(pagination) => Some(pagination_total(pagination, keys)?),
        None => None,
    };
    Ok(RawPage {
        rows: rows.to_vec(),
        total,
    })
}

fn pagination_total(pagination: &Value, keys: &[String]) -> FetchResult<usize> {
    let plural_fields = keys.iter().map(|key| format!("total{}", capitalize(key)));
    let fields = TOTAL_FIELDS
        .iter()
        .map(|field| field.to_string())
        .chain(plural_fields);

    for field in fields {
        match pagination.get(field.as_str()) {
            Some(Value::Number(total)) => {
                return total
                    .as_u64()
                    .and_then(|total| usize::try_from(total).ok())
                    .ok_or_else(|| {
                        FetchError::MalformedResponse(format!("invalid {field}: {total}"))
                    });
            }
            Some(Value::String(total)) => {
                return total.trim().parse().map_err(|_| {
                    FetchError::MalformedResponse(format!("invalid {field}: {total}"))
                });
            }
            _ => {}
        }
    }

    Err(FetchError::MalformedResponse(
        "pagination block without a total".to_string(),
    ))
}

fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Normalizes bodies for one resource.
#[derive(Clone, Debug, PartialEq)]
pub struct ResponseNormalizer {
    collection_keys: Vec<String>,
}

impl ResponseNormalizer {
    pub fn new(collection_keys: Vec<String>) -> Self {
        Self { collection_keys }
    }

    pub fn for_resource(resource: &ResourceSpec) -> Self {
        Self::new(resource.collection_keys.clone())
    }

    /// Finds the first strategy that recognizes `body`.
    pub fn extract(&self, body: &Value) -> FetchResult<(NormalizationStrategy, RawPage)> {
        for strategy in STRATEGIES {
            if let Some(page) = strategy.extract(body, &self.collection_keys) {
                return page.map(|page| (strategy, page));
            }
        }
        Err(FetchError::MalformedResponse(format!(
            "no rows under {:?}",
            self.collection_keys
        )))
    }

    /// Produces the typed page shown for `query`.
    ///
    /// Un-paginated bodies are paged here; paginated bodies holding more rows
    /// than the page size are rejected.
    pub fn normalize<R>(&self, body: &Value, query: &ListQuery) -> FetchResult<ListResult<R>>
    where
        R: DeserializeOwned,
    {
        let (strategy, raw) = self.extract(body)?;
        let page_size = query.page_size.get();

        let (rows, total_count) = match raw.total {
            Some(total) => {
                if raw.rows.len() > page_size {
                    return Err(FetchError::MalformedResponse(format!(
                        "{} rows for page size {page_size}",
                        raw.rows.len()
                    )));
                }
                (raw.rows, total)
            }
            None => {
                log::debug!(
                    "Paging {} un-paginated rows locally ({})",
                    raw.rows.len(),
                    strategy.name()
                );
                let total = raw.rows.len();
                let start = (query.page - 1).saturating_mul(page_size);
                let rows = raw.rows.into_iter().skip(start).take(page_size).collect();
                (rows, total)
            }
        };

        let rows = rows
            .into_iter()
            .enumerate()
            .map(|(index, row)| {
                serde_json::from_value(row).map_err(|err| {
                    FetchError::MalformedResponse(format!("row {index}: {err}"))
                })
            })
            .collect::<FetchResult<Vec<R>>>()?;

        Ok(ListResult {
            rows,
            total_count,
            page: query.page,
            page_size: query.page_size,
        })
    }
}
