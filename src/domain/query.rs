use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::types::{FilterKey, FilterValue, PageSize, SortField};

/// Direction of a server-side sort.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Sort {
    pub field: SortField,
    pub direction: SortDirection,
}

impl Sort {
    pub fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    pub fn asc(field: SortField) -> Self {
        Self::new(field, SortDirection::Asc)
    }

    pub fn desc(field: SortField) -> Self {
        Self::new(field, SortDirection::Desc)
    }
}

/// Query state of one admin list.
///
/// `page` is one-based and never below 1. Every setter that can shrink the
/// result set (page size, search, filters) moves back to the first page.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ListQuery {
    pub page: usize,
    pub page_size: PageSize,
    pub search_text: String,
    pub filters: BTreeMap<FilterKey, FilterValue>,
    pub sort: Option<Sort>,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self::new(PageSize::default())
    }
}

impl ListQuery {
    pub fn new(page_size: PageSize) -> Self {
        Self {
            page: 1,
            page_size,
            search_text: String::new(),
            filters: BTreeMap::new(),
            sort: None,
        }
    }

    /// Builder-style filter used when declaring initial queries.
    pub fn filter(mut self, key: FilterKey, value: FilterValue) -> Self {
        self.filters.insert(key, value);
        self
    }

    pub fn sorted(mut self, sort: Sort) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn set_page(&mut self, page: i64) {
        self.page = usize::try_from(page.max(1)).unwrap_or(usize::MAX);
    }

    pub fn set_page_size(&mut self, page_size: PageSize) {
        self.page_size = page_size;
        self.page = 1;
    }

    /// Commits trimmed search text; blank input clears the search.
    pub fn set_search_text(&mut self, text: &str) {
        self.search_text = text.trim().to_string();
        self.page = 1;
    }

    /// Sets or clears one filter.
    pub fn set_filter(&mut self, key: FilterKey, value: Option<FilterValue>) {
        match value {
            Some(value) => {
                self.filters.insert(key, value);
            }
            None => {
                self.filters.remove(&key);
            }
        }
        self.page = 1;
    }

    /// Replaces the sort; the current page is kept.
    pub fn set_sort(&mut self, sort: Option<Sort>) {
        self.sort = sort;
    }

    /// Cycles `field` through ascending, descending and unsorted.
    pub fn toggle_sort(&mut self, field: SortField) {
        self.sort = match self.sort.take() {
            Some(current) if current.field == field => match current.direction {
                SortDirection::Asc => Some(Sort::desc(field)),
                SortDirection::Desc => None,
            },
            _ => Some(Sort::asc(field)),
        };
    }

    /// Last valid page for `total` rows, if any row exists.
    pub fn last_page(&self, total: usize) -> Option<usize> {
        match self.page_size.page_count(total) {
            0 => None,
            pages => Some(pages),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(name: &str) -> FilterKey {
        FilterKey::new(name).unwrap()
    }

    fn value(name: &str) -> FilterValue {
        FilterValue::new(name).unwrap()
    }

    #[test]
    fn set_page_clamps_to_first_page() {
        let mut query = ListQuery::default();
        query.set_page(-4);
        assert_eq!(query.page, 1);
        query.set_page(0);
        assert_eq!(query.page, 1);
        query.set_page(7);
        assert_eq!(query.page, 7);
    }

    #[test]
    fn narrowing_setters_reset_page() {
        let mut query = ListQuery::default();

        query.set_page(5);
        query.set_page_size(PageSize::new(50).unwrap());
        assert_eq!(query.page, 1);

        query.set_page(5);
        query.set_filter(key("status"), Some(value("active")));
        assert_eq!(query.page, 1);

        query.set_page(5);
        query.set_filter(key("status"), None);
        assert_eq!(query.page, 1);
        assert!(query.filters.is_empty());

        query.set_page(5);
        query.set_search_text("  alice ");
        assert_eq!(query.page, 1);
        assert_eq!(query.search_text, "alice");
    }

    #[test]
    fn sort_keeps_page() {
        let mut query = ListQuery::default();
        query.set_page(3);
        query.set_sort(Some(Sort::desc(SortField::new("createdAt").unwrap())));
        assert_eq!(query.page, 3);
    }

    #[test]
    fn toggle_sort_cycles_directions() {
        let field = SortField::new("createdAt").unwrap();
        let mut query = ListQuery::default();

        query.toggle_sort(field.clone());
        assert_eq!(query.sort, Some(Sort::asc(field.clone())));
        query.toggle_sort(field.clone());
        assert_eq!(query.sort, Some(Sort::desc(field.clone())));
        query.toggle_sort(field.clone());
        assert_eq!(query.sort, None);

        query.toggle_sort(field);
        query.toggle_sort(SortField::new("total").unwrap());
        assert_eq!(
            query.sort,
            Some(Sort::asc(SortField::new("total").unwrap()))
        );
    }

    #[test]
    fn last_page_is_none_for_empty_sets() {
        let query = ListQuery::default();
        assert_eq!(query.last_page(0), None);
        assert_eq!(query.last_page(21), Some(2));
    }

    #[test]
    fn deserialized_filters_cannot_shadow_paging() {
        let body = r#"{"page":3,"page_size":20,"search_text":"","filters":{"page":"9"},"sort":null}"#;
        assert!(serde_json::from_str::<ListQuery>(body).is_err());

        let body = r#"{"page":3,"page_size":20,"search_text":"","filters":{"status":"active"},"sort":null}"#;
        let query: ListQuery = serde_json::from_str(body).unwrap();
        assert_eq!(query.filters.get(&key("status")), Some(&value("active")));
    }
}
