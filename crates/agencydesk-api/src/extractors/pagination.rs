//! Pagination query parameter extractors.

use serde::Deserialize;

use agencydesk_core::types::pagination::{DEFAULT_PER_PAGE, PageRequest};

/// Query parameters for paginated endpoints.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationParams {
    /// Page number (1-based, default: 1).
    #[serde(default = "default_page")]
    pub page: u64,
    /// Items per page (default: 20, max: 100).
    #[serde(default = "default_per_page")]
    pub per_page: u64,
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: default_page(),
            per_page: default_per_page(),
        }
    }
}

impl PaginationParams {
    /// Converts to a clamped `PageRequest`.
    pub fn into_page_request(self) -> PageRequest {
        PageRequest::new(self.page, self.per_page)
    }
}

/// `GET /api/clients` query: pagination plus the archive toggle.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientListParams {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_per_page")]
    pub per_page: u64,
    /// Include archived clients (default: false).
    #[serde(default)]
    pub include_archived: bool,
}

impl ClientListParams {
    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(self.page, self.per_page)
    }
}

fn default_page() -> u64 {
    1
}

fn default_per_page() -> u64 {
    DEFAULT_PER_PAGE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamps_out_of_range_values() {
        let params = PaginationParams {
            page: 0,
            per_page: 10_000,
        };
        let page = params.into_page_request();
        assert_eq!(page.page, 1);
        assert_eq!(page.per_page, 100);
    }

    #[test]
    fn test_client_list_defaults() {
        let params: ClientListParams = serde_json::from_str("{}").unwrap();
        assert!(!params.include_archived);
        assert_eq!(params.page_request(), PageRequest::default());
    }
}
