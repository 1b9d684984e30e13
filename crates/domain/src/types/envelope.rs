//! Backend response envelope and pagination types

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constants::SUCCESS_CODE;

/// Uniform `{ code, message, data }` wrapper returned by the backend.
///
/// Every field is optional so that bodies which are not envelopes still
/// deserialize; such bodies have `code == None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiEnvelope {
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
}

impl ApiEnvelope {
    /// A present, non-zero `code` marks an application-level rejection.
    #[must_use]
    pub fn is_business_failure(&self) -> bool {
        self.code.is_some_and(|code| code != SUCCESS_CODE)
    }

    /// Non-empty server message, if any.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref().filter(|m| !m.trim().is_empty())
    }
}

/// One page of a listing (`PageResponse` on the backend).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    pub total_elements: u64,
    pub total_pages: u32,
    pub size: u32,
    pub number: u32,
    pub first: bool,
    pub last: bool,
}

impl<T> Page<T> {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

/// Pagination and filter parameters for listing endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageQuery {
    pub page: Option<u32>,
    pub size: Option<u32>,
    pub filters: Vec<(String, String)>,
}

impl PageQuery {
    #[must_use]
    pub fn new(page: u32, size: u32) -> Self {
        Self { page: Some(page), size: Some(size), filters: Vec::new() }
    }

    /// Add an arbitrary filter (e.g. `status=PENDING`).
    #[must_use]
    pub fn filter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.push((key.into(), value.into()));
        self
    }

    /// Flatten into query pairs, `page` and `size` first.
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::with_capacity(self.filters.len() + 2);
        if let Some(page) = self.page {
            pairs.push(("page".to_string(), page.to_string()));
        }
        if let Some(size) = self.size {
            pairs.push(("size".to_string(), size.to_string()));
        }
        pairs.extend(self.filters.iter().cloned());
        pairs
    }
}
