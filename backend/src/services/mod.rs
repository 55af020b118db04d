//! Typed wrappers over the admin gateway, one module per backend domain.
//!
//! Each wrapper fixes the backend path and the payload type, so a shape
//! mismatch surfaces as a failed envelope instead of an untyped value
//! flowing into the caller.

pub mod auth;
pub mod blog;
pub mod packages;
pub mod public;
pub mod users;
pub mod waitlist;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::gateway::QueryParams;

/// A page of results as the backend returns it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
    /// Items on this page
    pub results: Vec<T>,
    /// Current page, 1-based
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    /// Page size
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    /// Number of pages
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_pages: Option<u32>,
    /// Number of items across all pages
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_results: Option<u64>,
}

/// Paging and search options shared by list endpoints
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, JsonSchema)]
pub struct ListQuery {
    /// Page number, 1-based
    pub page: Option<u32>,
    /// Page size
    pub limit: Option<u32>,
    /// Free-text filter
    pub search: Option<String>,
}

impl ListQuery {
    /// Backend query parameters; unset options are not sent
    #[must_use]
    pub fn to_params(&self) -> QueryParams {
        QueryParams::new()
            .with_opt("page", self.page)
            .with_opt("limit", self.limit)
            .with_opt("search", self.search.as_deref())
    }
}

/// Fields the backend sends that the gateway does not model
pub type Extra = Map<String, Value>;
