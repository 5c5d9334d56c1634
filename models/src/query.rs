//! Equality filter shared by local and remote data sources.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

/// Placeholder for values with no text form; stored fields never render to it.
const NULL_TEXT: &str = "null";

/// A set of `field == value` constraints combined with AND.
///
/// Local stores translate it into a `WHERE` clause, remote stores into request
/// parameters. An empty query selects everything.
///
/// # Example
///
/// ```
/// use models::Query;
///
/// let query = Query::new().where_eq("owner", "alice").where_eq("archived", false);
/// assert!(query.has("owner"));
/// assert_eq!(query.get("archived"), Some("false"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Query {
    params: BTreeMap<String, String>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the constraint on `field`.
    ///
    /// `value` is kept in its JSON text form, so `1.0_f64` is `"1.0"` and
    /// `false` is `"false"`. A `null` value, or one that cannot be serialized,
    /// matches nothing.
    pub fn where_eq(mut self, field: impl Into<String>, value: impl Serialize) -> Self {
        let text = serde_json::to_value(&value)
            .ok()
            .as_ref()
            .and_then(Self::value_text)
            .unwrap_or_else(|| NULL_TEXT.to_string());
        self.params.insert(field.into(), text);
        self
    }

    /// Text a stored JSON field is compared by. `null` has none.
    pub fn value_text(value: &Value) -> Option<String> {
        match value {
            Value::Null => None,
            Value::String(text) => Some(text.clone()),
            other => Some(other.to_string()),
        }
    }

    pub fn has(&self, field: &str) -> bool {
        self.params.contains_key(field)
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.params.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Constraints in field-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params
            .iter()
            .map(|(field, value)| (field.as_str(), value.as_str()))
    }
}
