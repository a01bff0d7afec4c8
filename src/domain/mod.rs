//! Domain types shared by the list controller, its data sources and adapters.

pub mod list;
pub mod query;
pub mod resource;
pub mod row;
pub mod types;
