//! Pagination
//!
//! List endpoints accept `?limit=&offset=` (plus an optional `search`) and answer
//! with a `links` object pointing at the first, previous, next and last pages.

use serde::{Deserialize, Serialize};

/// Page size used when the client does not send `limit`
pub const DEFAULT_LIMIT: u32 = 20;

/// Largest page a client may request
pub const MAX_LIMIT: u32 = 100;

/// Query parameters for paged list endpoints
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct PageQuery {
    /// Free-text filter, only honoured by endpoints that support search
    pub search: Option<String>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl PageQuery {
    /// Effective page size, clamped to `1..=MAX_LIMIT`
    pub fn limit(&self) -> u32 {
        self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
    }

    pub fn offset(&self) -> u32 {
        self.offset.unwrap_or(0)
    }

    /// Trimmed search term, `None` when absent or blank
    pub fn search_term(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Build navigation links for a collection of `total` items served at `base`
    pub fn links(&self, base: &str, total: u64) -> Links {
        let limit = self.limit() as u64;
        let offset = self.offset() as u64;
        let last_offset = if total == 0 { 0 } else { ((total - 1) / limit) * limit };

        let prev = (offset > 0).then(|| self.page_url(base, offset.saturating_sub(limit)));
        let next = (offset + limit < total).then(|| self.page_url(base, offset + limit));

        Links {
            first: self.page_url(base, 0),
            prev,
            next,
            last: self.page_url(base, last_offset),
        }
    }

    fn page_url(&self, base: &str, offset: u64) -> String {
        let mut query = url::form_urlencoded::Serializer::new(String::new());
        if let Some(search) = self.search_term() {
            query.append_pair("search", search);
        }
        query.append_pair("limit", &self.limit().to_string());
        query.append_pair("offset", &offset.to_string());
        format!("{}?{}", base, query.finish())
    }
}

/// Navigation links for a paged response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Links {
    pub first: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
    pub last: String,
}
