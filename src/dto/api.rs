//! Wire-level representation of list queries and row action payloads.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::domain::query::ListQuery;
use crate::domain::resource::RowActionSpec;

/// Query string pairs sent with every list request, in wire order.
///
/// `page` and `limit` always come first; `search`, `sortBy` and `sortOrder`
/// only when set; filters follow in key order.
#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct ListQueryParams(Vec<(String, String)>);

impl ListQueryParams {
    pub fn pairs(&self) -> &[(String, String)] {
        &self.0
    }

    /// Encodes the pairs as an `application/x-www-form-urlencoded` string.
    pub fn to_query_string(&self) -> Result<String, serde_html_form::ser::Error> {
        serde_html_form::to_string(&self.0)
    }
}

impl From<&ListQuery> for ListQueryParams {
    fn from(query: &ListQuery) -> Self {
        let mut pairs = vec![
            ("page".to_string(), query.page.to_string()),
            ("limit".to_string(), query.page_size.to_string()),
        ];

        if !query.search_text.is_empty() {
            pairs.push(("search".to_string(), query.search_text.clone()));
        }

        if let Some(sort) = &query.sort {
            pairs.push(("sortBy".to_string(), sort.field.as_str().to_string()));
            pairs.push((
                "sortOrder".to_string(),
                sort.direction.as_str().to_string(),
            ));
        }

        pairs.extend(
            query
                .filters
                .iter()
                .map(|(key, value)| (key.as_str().to_string(), value.as_str().to_string())),
        );

        Self(pairs)
    }
}

/// JSON body of a row action: the declared fixed fields plus the reason.
pub fn action_body(action: &RowActionSpec, reason: Option<&str>) -> Value {
    let mut body: Map<String, Value> = action.fixed_body.clone();
    if let Some(reason) = reason {
        body.insert("reason".to_string(), Value::String(reason.to_string()));
    }
    Value::Object(body)
}
