pub mod auth;
pub mod resources;

use serde::{Deserialize, Serialize};

use crate::models::Page;

pub const DEFAULT_PAGE_SIZE: i64 = 50;
pub const MAX_PAGE_SIZE: i64 = 200;

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// `?limit=&offset=` on list endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl ListQuery {
    /// Clamp to `1..=MAX_PAGE_SIZE` rows and a non-negative offset.
    pub fn page(&self) -> Page {
        Page {
            limit: self
                .limit
                .unwrap_or(DEFAULT_PAGE_SIZE)
                .clamp(1, MAX_PAGE_SIZE),
            offset: self.offset.unwrap_or(0).max(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_first_page() {
        let page = ListQuery::default().page();
        assert_eq!(page, Page { limit: 50, offset: 0 });
    }

    #[test]
    fn clamps_out_of_range_values() {
        let page = ListQuery {
            limit: Some(10_000),
            offset: Some(-5),
        }
        .page();
        assert_eq!(page, Page { limit: 200, offset: 0 });

        let page = ListQuery {
            limit: Some(0),
            offset: Some(20),
        }
        .page();
        assert_eq!(page, Page { limit: 1, offset: 20 });
    }
}
