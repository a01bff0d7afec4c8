//! Remote list controller and HTTP binding for the commerce admin dashboard.
//!
//! Every admin list page (users, products, orders, payments, comments, ...)
//! is one [`services::controller::ListController`] driven by a
//! [`domain::resource::ResourceSpec`] and a [`repository::ListSource`].

pub mod catalog;
pub mod domain;
pub mod dto;
pub mod error_conversions;
pub mod forms;
pub mod models;
pub mod normalize;
pub mod pagination;
pub mod repository;
pub mod services;

/// Page size used when neither the resource nor the configuration picks one.
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Page sizes offered by the list footer.
pub const ALLOWED_PAGE_SIZES: [usize; 4] = [10, 20, 50, 100];

/// Query parameter names owned by the controller; filters may not reuse them.
pub const RESERVED_QUERY_KEYS: [&str; 5] = ["page", "limit", "search", "sortBy", "sortOrder"];
