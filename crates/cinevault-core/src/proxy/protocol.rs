//! Proxy wire format
//!
//! Request: `{"endpoint": "/trending/all/week", "params": {"page": 1}}`
//! Error response: `{"error": "message"}`

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Body accepted by the proxy endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProxyRequest {
    /// Upstream sub-path, e.g. `/movie/550`
    pub endpoint: String,
    /// Query parameters forwarded upstream
    #[serde(default)]
    pub params: Option<Map<String, Value>>,
}

impl ProxyRequest {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            params: None,
        }
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params
            .get_or_insert_with(Map::new)
            .insert(key.into(), value.into());
        self
    }

    /// Params as query pairs, sorted by key
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        self.params
            .as_ref()
            .map(|params| {
                params
                    .iter()
                    .filter_map(|(key, value)| query_value(value).map(|v| (key.clone(), v)))
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Strings are sent verbatim, other scalars stringified, nulls dropped
fn query_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Reject anything that is not a rooted sub-path of the upstream API
pub fn validate_endpoint(endpoint: &str) -> Result<(), String> {
    if !endpoint.starts_with('/') {
        return Err(format!("endpoint must start with '/': {}", endpoint));
    }
    if endpoint.contains("://") || endpoint.starts_with("//") {
        return Err(format!("endpoint must be a path, not a URL: {}", endpoint));
    }
    if endpoint.split('/').any(|segment| segment == "..") {
        return Err(format!("endpoint must not contain '..': {}", endpoint));
    }
    if endpoint.contains('?') || endpoint.contains('#') {
        return Err("query parameters belong in 'params'".to_string());
    }
    Ok(())
}

/// Error body returned by the proxy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_params_optional() {
        let request: ProxyRequest = serde_json::from_value(json!({ "endpoint": "/movie/1" })).unwrap();
        assert_eq!(request.params, None);
        assert!(request.query_pairs().is_empty());
    }

    #[test]
    fn test_query_pairs_stringify_scalars() {
        let request = ProxyRequest::new("/search/movie")
            .with_param("query", "alien")
            .with_param("page", 2)
            .with_param("include_adult", false)
            .with_param("region", Value::Null);

        let pairs = request.query_pairs();
        assert!(pairs.contains(&("query".to_string(), "alien".to_string())));
        assert!(pairs.contains(&("page".to_string(), "2".to_string())));
        assert!(pairs.contains(&("include_adult".to_string(), "false".to_string())));
        assert_eq!(pairs.len(), 3);
    }

    #[test]
    fn test_validate_endpoint() {
        assert!(validate_endpoint("/trending/all/week").is_ok());
        assert!(validate_endpoint("movie/1").is_err());
        assert!(validate_endpoint("/../secrets").is_err());
        assert!(validate_endpoint("//evil.example/x").is_err());
        assert!(validate_endpoint("/x?api_key=1").is_err());
    }
}
