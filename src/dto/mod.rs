//! Data transfer objects exchanged with the backend.

pub mod api;
