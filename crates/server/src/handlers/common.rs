//! Shared handler helpers.

use crate::error::{ApiError, ApiResult};
use serde::Deserialize;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use uuid::Uuid;

/// Default page size for list endpoints.
pub const DEFAULT_PER_PAGE: i64 = 50;

/// Upper bound on page size.
pub const MAX_PER_PAGE: i64 = 200;

/// Maximum accepted name length.
pub const MAX_NAME_LEN: usize = 200;

/// Raw paging query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

/// Validated paging window.
#[derive(Debug, Clone, Copy)]
pub struct Paging {
    pub page: i64,
    pub per_page: i64,
}

impl Paging {
    pub fn limit(&self) -> i64 {
        self.per_page
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.per_page
    }
}

/// Validate paging parameters. `page` is 1-based; `per_page` is capped.
pub fn resolve_paging(params: &PageParams) -> ApiResult<Paging> {
    let page = params.page.unwrap_or(1);
    let per_page = params.per_page.unwrap_or(DEFAULT_PER_PAGE);

    if page < 1 {
        return Err(ApiError::BadRequest("page must be >= 1".to_string()));
    }
    if !(1..=MAX_PER_PAGE).contains(&per_page) {
        return Err(ApiError::BadRequest(format!(
            "per_page must be between 1 and {MAX_PER_PAGE}"
        )));
    }
    // The offset must stay representable; a page number near i64::MAX
    // would otherwise overflow in offset().
    if (page - 1).checked_mul(per_page).is_none() {
        return Err(ApiError::BadRequest("page is out of range".to_string()));
    }
    Ok(Paging { page, per_page })
}

/// Parse a route/body UUID, naming the field in the error.
pub fn parse_uuid(value: &str, what: &str) -> ApiResult<Uuid> {
    Uuid::parse_str(value).map_err(|e| ApiError::BadRequest(format!("invalid {what}: {e}")))
}

/// Validate and normalize a display name: trimmed, non-empty, bounded.
pub fn require_name(value: &str, what: &str) -> ApiResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ApiError::BadRequest(format!("{what} must not be empty")));
    }
    if trimmed.chars().count() > MAX_NAME_LEN {
        return Err(ApiError::BadRequest(format!(
            "{what} must be at most {MAX_NAME_LEN} characters"
        )));
    }
    Ok(trimmed.to_string())
}

/// RFC 3339 timestamp for response bodies.
pub fn format_timestamp(ts: OffsetDateTime) -> ApiResult<String> {
    ts.format(&Rfc3339)
        .map_err(|e| ApiError::Internal(format!("failed to format timestamp: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paging_defaults() {
        let paging = resolve_paging(&PageParams::default()).unwrap();
        assert_eq!(paging.page, 1);
        assert_eq!(paging.per_page, DEFAULT_PER_PAGE);
        assert_eq!(paging.offset(), 0);
    }

    #[test]
    fn paging_rejects_out_of_range() {
        assert!(resolve_paging(&PageParams {
            page: Some(0),
            per_page: None
        })
        .is_err());
        assert!(resolve_paging(&PageParams {
            page: None,
            per_page: Some(0)
        })
        .is_err());
        assert!(resolve_paging(&PageParams {
            page: None,
            per_page: Some(MAX_PER_PAGE + 1)
        })
        .is_err());
    }

    #[test]
    fn paging_rejects_unrepresentable_offset() {
        let result = resolve_paging(&PageParams {
            page: Some(i64::MAX),
            per_page: Some(MAX_PER_PAGE),
        });
        assert!(result.is_err());

        // A large but representable window still resolves
        let paging = resolve_paging(&PageParams {
            page: Some(i64::MAX / MAX_PER_PAGE),
            per_page: Some(MAX_PER_PAGE),
        })
        .unwrap();
        assert!(paging.offset() >= 0);
    }

    #[test]
    fn paging_offset_math() {
        let paging = resolve_paging(&PageParams {
            page: Some(3),
            per_page: Some(25),
        })
        .unwrap();
        assert_eq!(paging.limit(), 25);
        assert_eq!(paging.offset(), 50);
    }

    #[test]
    fn require_name_trims() {
        assert_eq!(require_name("  Ardbeg ", "name").unwrap(), "Ardbeg");
        assert!(require_name("   ", "name").is_err());
    }
}
