//! Shared types for backend communication

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Province/city hierarchy served by `/api/locations`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocationDirectory {
    /// Province (sido) names, in backend order
    pub sido: Vec<String>,
    /// City (sigungu) names keyed by province
    pub sigungu: HashMap<String, Vec<String>>,
}

impl LocationDirectory {
    /// Cities of a province, empty when the province has no entry
    pub fn cities_of(&self, sido: &str) -> &[String] {
        self.sigungu.get(sido).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// One ranked disposal-fee entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResultItem {
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub spec: Option<String>,
    pub fee: u64,
    pub similarity: f64,
    pub sido: String,
    pub sigungu: String,
}

impl SearchResultItem {
    /// Size/spec note, treating the backend's empty string as absent
    pub fn spec(&self) -> Option<&str> {
        self.spec.as_deref().filter(|s| !s.is_empty())
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    pub results: Vec<SearchResultItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    #[serde(default)]
    pub message: String,
}

/// Parameters of one search call.
///
/// Empty filters are dropped when the request is built, meaning "no regional filter".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub query: String,
    pub sido: Option<String>,
    pub sigungu: Option<String>,
}

impl SearchQuery {
    pub fn new(query: impl Into<String>, sido: &str, sigungu: &str) -> Self {
        let non_empty = |s: &str| (!s.is_empty()).then(|| s.to_string());
        Self {
            query: query.into(),
            sido: non_empty(sido),
            sigungu: non_empty(sigungu),
        }
    }

    pub(crate) fn params(&self) -> Vec<(&'static str, &str)> {
        let mut params = vec![("query", self.query.as_str())];
        if let Some(sido) = &self.sido {
            params.push(("sido", sido));
        }
        if let Some(sigungu) = &self.sigungu {
            params.push(("sigungu", sigungu));
        }
        params
    }
}
