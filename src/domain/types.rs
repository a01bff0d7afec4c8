//! Strongly-typed value objects used by the list controller.
//!
//! These wrappers enforce the query invariants (allowed page sizes, filter
//! keys that cannot shadow controller-owned parameters, non-empty
//! credentials) so that once a value reaches a [`super::query::ListQuery`] it
//! can be sent to the backend as is.
use std::fmt::{Display, Formatter};
use std::ops::Deref;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{ALLOWED_PAGE_SIZES, DEFAULT_PAGE_SIZE, RESERVED_QUERY_KEYS};

/// Errors produced when attempting to construct a constrained value object.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeConstraintError {
    /// Page size is not one of the sizes the list footer offers.
    #[error("page size {0} is not allowed")]
    PageSizeNotAllowed(usize),
    /// Provided string contained no non-whitespace characters.
    #[error("value cannot be empty")]
    EmptyString,
    /// Filter key collides with a controller-owned query parameter.
    #[error("filter key `{0}` is reserved")]
    ReservedKey(String),
    /// Value is not one of the options declared for a filter.
    #[error("invalid value `{value}` for filter `{key}`")]
    InvalidFilterValue { key: String, value: String },
    /// The list does not offer a search box.
    #[error("this list cannot be searched")]
    SearchNotSupported,
    /// Field is not one of the sortable columns of the list.
    #[error("cannot sort by `{0}`")]
    SortNotAllowed(String),
}

/// Number of rows requested per page, restricted to [`ALLOWED_PAGE_SIZES`].
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "usize", into = "usize")]
pub struct PageSize(usize);

impl PageSize {
    /// Creates a page size ensuring it is one of the allowed sizes.
    pub fn new(value: usize) -> Result<Self, TypeConstraintError> {
        if ALLOWED_PAGE_SIZES.contains(&value) {
            Ok(Self(value))
        } else {
            Err(TypeConstraintError::PageSizeNotAllowed(value))
        }
    }

    /// Returns the raw number of rows.
    pub const fn get(self) -> usize {
        self.0
    }

    /// Number of pages needed to show `total` rows.
    pub fn page_count(self, total: usize) -> usize {
        total.div_ceil(self.0)
    }
}

impl Default for PageSize {
    fn default() -> Self {
        Self(DEFAULT_PAGE_SIZE)
    }
}

impl Display for PageSize {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<usize> for PageSize {
    type Error = TypeConstraintError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PageSize> for usize {
    fn from(value: PageSize) -> Self {
        value.0
    }
}

/// Trims and rejects blank strings.
fn non_empty<S: Into<String>>(value: S) -> Result<String, TypeConstraintError> {
    let trimmed = value.into().trim().to_string();
    if trimmed.is_empty() {
        Err(TypeConstraintError::EmptyString)
    } else {
        Ok(trimmed)
    }
}

macro_rules! non_empty_string_newtype {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Constructs a trimmed, non-empty value.
            pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
                Ok(Self(non_empty(value)?))
            }

            /// Borrow the value as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the wrapper and return the owned string.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl Deref for $name {
            type Target = str;

            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<String> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl TryFrom<&str> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

non_empty_string_newtype!(RowId, "Backend identifier of a single row.");
non_empty_string_newtype!(SortField, "Field name the backend sorts by.");
non_empty_string_newtype!(FilterValue, "Selected value of a list filter.");

/// Name of a list filter sent as its own query parameter.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct FilterKey(String);

impl FilterKey {
    /// Creates a filter key rejecting blank and reserved names.
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let key = non_empty(value)?;
        if RESERVED_QUERY_KEYS.contains(&key.as_str()) {
            return Err(TypeConstraintError::ReservedKey(key));
        }
        Ok(Self(key))
    }

    /// Borrow the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for FilterKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<&str> for FilterKey {
    type Error = TypeConstraintError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<String> for FilterKey {
    type Error = TypeConstraintError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<FilterKey> for String {
    fn from(value: FilterKey) -> Self {
        value.0
    }
}

/// Bearer credential issued by the session collaborator.
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(String);

impl BearerToken {
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        Ok(Self(non_empty(value)?))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("BearerToken(***)")
    }
}
