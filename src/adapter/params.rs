//! Verb parameters.
//!
//! The route table delivers parameters as a JSON object already validated
//! against its schema; each verb deserializes the keys it uses and ignores
//! the rest.

// ============================================================================
// Imports
// ============================================================================

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::protocol::Attributes;

// ============================================================================
// Types
// ============================================================================

/// Raw request parameters.
pub type Params = Map<String, Value>;

/// Parameters of `create`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CreateParams {
    /// Attributes of the new item.
    pub body: Attributes,
}

/// Parameters of `update`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct UpdateParams {
    /// Items to update, at least one.
    pub ids: Vec<String>,
    /// Attributes to set.
    pub body: Attributes,
}

/// Parameters of `list`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ListParams {
    /// Maximum rows returned. Unbounded when absent.
    #[serde(default)]
    pub limit: Option<usize>,
    /// Attributes to return. All when absent.
    #[serde(default)]
    pub fields: Option<Vec<String>>,
    /// Equality filters.
    #[serde(default, rename = "where")]
    pub filters: Option<Attributes>,
}

/// Parameters of `delete`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DeleteParams {
    /// Single item to remove.
    #[serde(default)]
    pub id: Option<String>,
    /// Items to remove.
    #[serde(default)]
    pub ids: Option<Vec<String>>,
}

// ============================================================================
// Parsing
// ============================================================================

/// Deserializes verb parameters.
///
/// # Errors
///
/// Returns [`Error::InvalidArgument`] if a required key is missing or has
/// the wrong shape.
pub fn parse<T: DeserializeOwned>(params: Params) -> Result<T> {
    serde_json::from_value(Value::Object(params)).map_err(|e| Error::invalid_argument(e.to_string()))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    fn params(value: Value) -> Params {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_list_params_all_optional() {
        let parsed: ListParams = parse(Params::new()).unwrap();
        assert_eq!(parsed, ListParams::default());
    }

    #[test]
    fn test_list_params_where_key() {
        let parsed: ListParams = parse(params(json!({
            "limit": 5,
            "fields": ["name"],
            "where": {"name": "ether1"}
        })))
        .unwrap();
        assert_eq!(parsed.limit, Some(5));
        assert_eq!(parsed.fields, Some(vec!["name".to_string()]));
        assert_eq!(parsed.filters.unwrap()["name"], json!("ether1"));
    }

    #[test]
    fn test_update_requires_ids_and_body() {
        let err = parse::<UpdateParams>(params(json!({"body": {}}))).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument { .. }));

        let ok: UpdateParams = parse(params(json!({"ids": ["*1"], "body": {"disabled": "yes"}}))).unwrap();
        assert_eq!(ok.ids, vec!["*1"]);
    }

    #[test]
    fn test_create_requires_body() {
        assert!(parse::<CreateParams>(Params::new()).is_err());
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let parsed: DeleteParams = parse(params(json!({"id": "*5", "extra": 1}))).unwrap();
        assert_eq!(parsed.id.as_deref(), Some("*5"));
        assert!(parsed.ids.is_none());
    }
}
