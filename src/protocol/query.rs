//! Query model and row types.

// ============================================================================
// Imports
// ============================================================================

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ============================================================================
// Types
// ============================================================================

/// Name of the device-assigned item identifier.
pub const ID_FIELD: &str = ".id";

/// Attribute mapping sent with `add` and `set`.
pub type Attributes = Map<String, Value>;

/// One row returned by `print`.
pub type Row = Map<String, Value>;

// ============================================================================
// Predicate
// ============================================================================

/// Row filter evaluated by the device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Predicate {
    /// `field == value`.
    Equals {
        /// Attribute name.
        field: String,
        /// Expected value.
        value: Value,
    },
}

impl Predicate {
    /// Creates an equality predicate.
    #[inline]
    #[must_use]
    pub fn equals(field: impl Into<String>, value: Value) -> Self {
        Self::Equals {
            field: field.into(),
            value,
        }
    }

    /// Returns `true` if `row` satisfies this predicate.
    #[must_use]
    pub fn matches(&self, row: &Row) -> bool {
        match self {
            Self::Equals { field, value } => row.get(field) == Some(value),
        }
    }
}

// ============================================================================
// Query
// ============================================================================

/// Projection and filter for a `print` call.
///
/// An empty `fields` list selects every attribute.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Query {
    /// Attributes to return.
    pub fields: Vec<String>,
    /// Conjunction of filters.
    pub predicates: Vec<Predicate>,
}

impl Query {
    /// Creates a query selecting every row and attribute.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts returned attributes.
    #[inline]
    #[must_use]
    pub fn select(mut self, fields: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.fields.extend(fields.into_iter().map(Into::into));
        self
    }

    /// Adds a filter.
    #[inline]
    #[must_use]
    pub fn filter(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    /// Returns `true` if `row` satisfies every predicate.
    #[must_use]
    pub fn matches(&self, row: &Row) -> bool {
        self.predicates.iter().all(|p| p.matches(row))
    }

    /// Applies the projection to `row`.
    #[must_use]
    pub fn project(&self, row: &Row) -> Row {
        if self.fields.is_empty() {
            return row.clone();
        }
        self.fields
            .iter()
            .filter_map(|f| row.get(f).map(|v| (f.clone(), v.clone())))
            .collect()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    fn row(value: Value) -> Row {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_equals_matches() {
        let r = row(json!({".id": "*1", "name": "ether1"}));
        assert!(Predicate::equals("name", json!("ether1")).matches(&r));
        assert!(!Predicate::equals("name", json!("ether2")).matches(&r));
        assert!(!Predicate::equals("mtu", json!("1500")).matches(&r));
    }

    #[test]
    fn test_query_matches_all_predicates() {
        let r = row(json!({"name": "ether1", "disabled": "false"}));
        let q = Query::new()
            .filter(Predicate::equals("name", json!("ether1")))
            .filter(Predicate::equals("disabled", json!("true")));
        assert!(!q.matches(&r));
        assert!(Query::new().matches(&r));
    }

    #[test]
    fn test_projection() {
        let r = row(json!({".id": "*1", "name": "ether1", "mtu": "1500"}));
        let projected = Query::new().select([ID_FIELD]).project(&r);
        assert_eq!(Value::Object(projected), json!({".id": "*1"}));
        assert_eq!(Query::new().project(&r), r);
    }
}
