use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::types::RowId;

/// Identifier fields tried in order when keying a row.
const ID_FIELDS: [&str; 2] = ["_id", "id"];

/// An opaque backend record.
///
/// Only the identifier is ever read; everything else belongs to the adapter
/// rendering the row.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
#[serde(transparent)]
pub struct Row(pub Map<String, Value>);

impl Row {
    /// Stable key of the row, taken from `_id` or `id`.
    pub fn id(&self) -> Option<RowId> {
        ID_FIELDS.iter().find_map(|field| match self.0.get(*field)? {
            Value::String(id) => RowId::new(id.as_str()).ok(),
            Value::Number(id) => RowId::new(id.to_string()).ok(),
            _ => None,
        })
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }
}
