//! Outbound request description
//!
//! An [`ApiRequest`] carries everything needed to send a call again after a
//! token refresh: the replay only swaps the bearer token.

use reqwest::Method;
use serde_json::Value;

/// A backend call that can be replayed.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Path relative to the configured base URL (e.g. `/students/42`)
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
    /// Extra headers; `Authorization` is always set by the client
    pub headers: Vec<(String, String)>,
    /// Set once the request has been through a refresh; a second 401 is
    /// terminal
    pub retried: bool,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            headers: Vec::new(),
            retried: false,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Add a query parameter only when a value is present.
    #[must_use]
    pub fn query_opt<V: ToString>(self, key: impl Into<String>, value: Option<V>) -> Self {
        match value {
            Some(value) => self.query(key, value),
            None => self,
        }
    }

    #[must_use]
    pub fn query_pairs(mut self, pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        self.query.extend(pairs);
        self
    }

    #[must_use]
    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// `METHOD path` for log fields.
    pub fn describe(&self) -> String {
        format!("{} {}", self.method, self.path)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_builder_collects_parts() {
        let request = ApiRequest::put("/repairs/3/status")
            .query("status", "DONE")
            .query_opt("comment", None::<String>)
            .query_opt("page", Some(2))
            .json(json!({"note": "ok"}))
            .header("X-Trace", "abc");

        assert_eq!(request.method, Method::PUT);
        assert_eq!(
            request.query,
            vec![("status".to_string(), "DONE".to_string()), ("page".to_string(), "2".to_string())]
        );
        assert_eq!(request.body, Some(json!({"note": "ok"})));
        assert_eq!(request.headers.len(), 1);
        assert!(!request.retried);
        assert_eq!(request.describe(), "PUT /repairs/3/status");
    }
}
