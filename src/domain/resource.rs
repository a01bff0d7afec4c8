//! Declarative description of one admin list page.
//!
//! A [`ResourceSpec`] replaces a hand-written page component: it names the
//! endpoint, the keys rows arrive under, the filters and sort columns on
//! offer, and the row actions an operator can trigger.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::domain::query::{ListQuery, Sort, SortDirection};
use crate::domain::types::{FilterKey, FilterValue, PageSize, RowId, SortField, TypeConstraintError};

/// HTTP verb used by a row action.
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum MutationMethod {
    Post,
    Put,
    Patch,
}

/// A select-style filter shown above the table.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct FilterSpec {
    pub key: FilterKey,
    /// Allowed values; empty means free-form.
    pub options: Vec<FilterValue>,
}

/// A per-row action such as approve, ban or refund.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct RowActionSpec {
    pub name: String,
    pub method: MutationMethod,
    /// Path segment appended after the row id, if any.
    pub suffix: Option<String>,
    /// Body fields always sent with the action.
    pub fixed_body: Map<String, Value>,
    pub requires_reason: bool,
}

impl RowActionSpec {
    pub fn new(name: impl Into<String>, method: MutationMethod) -> Self {
        Self {
            name: name.into(),
            method,
            suffix: None,
            fixed_body: Map::new(),
            requires_reason: false,
        }
    }

    pub fn suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = Some(suffix.into());
        self
    }

    pub fn body_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fixed_body.insert(key.into(), value.into());
        self
    }

    pub fn with_reason(mut self) -> Self {
        self.requires_reason = true;
        self
    }

    /// Path of the action for the given row under `base`.
    pub fn path(&self, base: &str, row_id: &RowId) -> String {
        let base = base.trim_end_matches('/');
        match &self.suffix {
            Some(suffix) => format!("{base}/{row_id}/{suffix}"),
            None => format!("{base}/{row_id}"),
        }
    }
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct ResourceSpec {
    /// Short name, also the default collection key (`users`, `orders`).
    pub name: String,
    /// List endpoint relative to the API base.
    pub endpoint: String,
    /// Base for row actions when it differs from `endpoint`.
    pub mutation_endpoint: Option<String>,
    /// Keys the rows may arrive under, tried in order.
    pub collection_keys: Vec<String>,
    pub filters: Vec<FilterSpec>,
    pub sortable: Vec<SortField>,
    pub default_sort: Option<Sort>,
    pub default_page_size: PageSize,
    pub searchable: bool,
    pub actions: Vec<RowActionSpec>,
}

impl ResourceSpec {
    pub fn new(name: impl Into<String>, endpoint: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            collection_keys: vec![name.clone()],
            name,
            endpoint: endpoint.into(),
            mutation_endpoint: None,
            filters: Vec::new(),
            sortable: Vec::new(),
            default_sort: None,
            default_page_size: PageSize::default(),
            searchable: true,
            actions: Vec::new(),
        }
    }

    pub fn collection_alias(mut self, key: impl Into<String>) -> Self {
        self.collection_keys.push(key.into());
        self
    }

    pub fn mutation_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.mutation_endpoint = Some(endpoint.into());
        self
    }

    pub fn filter(mut self, key: &str, options: &[&str]) -> Result<Self, TypeConstraintError> {
        let options = options
            .iter()
            .map(|option| FilterValue::new(*option))
            .collect::<Result<Vec<_>, _>>()?;
        self.filters.push(FilterSpec {
            key: FilterKey::new(key)?,
            options,
        });
        Ok(self)
    }

    pub fn sortable(mut self, fields: &[&str]) -> Result<Self, TypeConstraintError> {
        for field in fields {
            self.sortable.push(SortField::new(*field)?);
        }
        Ok(self)
    }

    pub fn default_sort(
        mut self,
        field: &str,
        direction: SortDirection,
    ) -> Result<Self, TypeConstraintError> {
        self.default_sort = Some(Sort::new(SortField::new(field)?, direction));
        Ok(self)
    }

    pub fn page_size(mut self, page_size: PageSize) -> Self {
        self.default_page_size = page_size;
        self
    }

    pub fn without_search(mut self) -> Self {
        self.searchable = false;
        self
    }

    pub fn action(mut self, action: RowActionSpec) -> Self {
        self.actions.push(action);
        self
    }

    /// Query a freshly mounted list starts from.
    pub fn initial_query(&self) -> ListQuery {
        let query = ListQuery::new(self.default_page_size);
        match &self.default_sort {
            Some(sort) => query.sorted(sort.clone()),
            None => query,
        }
    }

    pub fn find_action(&self, name: &str) -> Option<&RowActionSpec> {
        self.actions.iter().find(|action| action.name == name)
    }

    pub fn action_base(&self) -> &str {
        self.mutation_endpoint.as_deref().unwrap_or(&self.endpoint)
    }

    /// Validates a filter selection against the declared options.
    ///
    /// Keys without a declaration are accepted as free-form filters.
    pub fn filter_value(
        &self,
        key: &str,
        value: &str,
    ) -> Result<(FilterKey, FilterValue), TypeConstraintError> {
        let key = FilterKey::new(key)?;
        let value = FilterValue::new(value)?;
        self.check_filter(&key, &value)?;
        Ok((key, value))
    }

    /// Rejects a value outside the options declared for `key`.
    pub fn check_filter(
        &self,
        key: &FilterKey,
        value: &FilterValue,
    ) -> Result<(), TypeConstraintError> {
        let rejected = self
            .filters
            .iter()
            .find(|filter| &filter.key == key)
            .is_some_and(|filter| !filter.options.is_empty() && !filter.options.contains(value));
        if rejected {
            return Err(TypeConstraintError::InvalidFilterValue {
                key: key.as_str().to_string(),
                value: value.as_str().to_string(),
            });
        }
        Ok(())
    }

    pub fn check_search(&self) -> Result<(), TypeConstraintError> {
        if self.searchable {
            Ok(())
        } else {
            Err(TypeConstraintError::SearchNotSupported)
        }
    }

    /// Only declared columns and the default sort field may be sorted by.
    pub fn check_sort(&self, field: &SortField) -> Result<(), TypeConstraintError> {
        let is_default = self
            .default_sort
            .as_ref()
            .is_some_and(|sort| &sort.field == field);
        if is_default || self.sortable.contains(field) {
            Ok(())
        } else {
            Err(TypeConstraintError::SortNotAllowed(field.as_str().to_string()))
        }
    }
}
