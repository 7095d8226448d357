//! Core data models for the storefront
//!
//! This module contains the catalog item type, the view state produced by the
//! fetch hook, and the HTTP transport used to reach the catalog endpoint.

pub mod catalog;

pub use catalog::{HttpTransport, Transport, TransportError, DEFAULT_CATALOG_URL};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A product record from the remote catalog
///
/// No schema is enforced: the record is kept as the JSON object the endpoint
/// returned. Accessors cover the fields the storefront renders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Item(pub Map<String, Value>);

impl Item {
    /// Product identifier; numeric ids are rendered as strings
    pub fn id(&self) -> Option<String> {
        match self.0.get("id")? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// Display name
    pub fn name(&self) -> Option<&str> {
        self.0.get("name")?.as_str()
    }

    /// Unit price, if the catalog supplies one
    pub fn price(&self) -> Option<f64> {
        self.0.get("price")?.as_f64()
    }

    /// Raw access to any other field
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }
}

/// View state published by the fetch hook
///
/// `loading` is true exactly while a run is in flight. `data` is only replaced by
/// a successful run; failures leave it untouched and set `error` instead.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FetchResult {
    pub data: Vec<Item>,
    pub loading: bool,
    pub error: Option<String>,
}

impl Default for FetchResult {
    fn default() -> Self {
        Self {
            data: Vec::new(),
            loading: true,
            error: None,
        }
    }
}

/// Parses a catalog body (from the network or the cache) into items
pub fn parse_items(body: &str) -> Result<Vec<Item>, serde_json::Error> {
    serde_json::from_str(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_items_reads_observed_shape() {
        let items = parse_items(r#"[{"id":"1","name":"Mango","price":1.5}]"#).unwrap();

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id().as_deref(), Some("1"));
        assert_eq!(items[0].name(), Some("Mango"));
        assert!((items[0].price().unwrap() - 1.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_item_accessors_tolerate_other_shapes() {
        let items = parse_items(r#"[{"id":7,"name":"Orange","inStock":true}]"#).unwrap();
        let item = &items[0];

        assert_eq!(item.id().as_deref(), Some("7"));
        assert!(item.price().is_none());
        assert_eq!(item.get("inStock"), Some(&Value::Bool(true)));
    }

    #[test]
    fn test_parse_items_rejects_non_array_body() {
        assert!(parse_items(r#"{"error":"not found"}"#).is_err());
        assert!(parse_items("<html>").is_err());
    }

    #[test]
    fn test_empty_array_is_valid() {
        assert!(parse_items("[]").unwrap().is_empty());
    }

    #[test]
    fn test_fetch_result_default_is_loading() {
        let state = FetchResult::default();
        assert!(state.loading);
        assert!(state.error.is_none());
        assert!(state.data.is_empty());
    }

    #[test]
    fn test_fetch_result_serializes_items_transparently() {
        let state = FetchResult {
            data: parse_items(r#"[{"id":"1","name":"Mango","price":1.5}]"#).unwrap(),
            loading: false,
            error: None,
        };

        let json = serde_json::to_value(&state).unwrap();

        assert_eq!(json["data"][0]["name"], "Mango");
        assert_eq!(json["loading"], false);
        assert!(json["error"].is_null());
    }
}
