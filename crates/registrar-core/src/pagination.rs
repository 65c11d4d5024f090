//! Pagination and sorting utilities for list endpoints.
//!
//! List endpoints accept `page` and `per_page`:
//! - `page`: 1-indexed page number (default: 1, must be >= 1)
//! - `per_page`: items per page (default: 20, must be >= 1, capped at 100)
//!
//! Sorting uses `sort_by` and `sort_dir`. The column is resolved against a
//! per-entity allow-list of `'static` column names, so only known columns
//! ever reach a storage query; unknown values fall back to the default.
//!
//! # Example
//!
//! ```ignore
//! let page = params.pagination.page_request(params.sort.resolve(
//!     &["nama_dosen", "nidn", "email"],
//!     OrderBy::asc("nama_dosen"),
//! ))?;
//! let rows = repo.list(&filter, &page).await?;
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::errors::{AppError, AppResult};
use crate::serde::{deserialize_optional_i64, deserialize_trimmed_string};

pub const DEFAULT_PER_PAGE: i64 = 20;
pub const MAX_PER_PAGE: i64 = 100;

/// Query parameters for page-based pagination.
#[derive(Debug, Clone, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct PaginationParams {
    /// Page number (1-indexed, default: 1)
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub page: Option<i64>,
    /// Items per page (default: 20, max: 100)
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub per_page: Option<i64>,
}

impl PaginationParams {
    #[must_use]
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1)
    }

    /// Effective page size, capped at [`MAX_PER_PAGE`].
    #[must_use]
    pub fn per_page(&self) -> i64 {
        self.per_page.unwrap_or(DEFAULT_PER_PAGE).min(MAX_PER_PAGE)
    }

    #[must_use]
    pub fn limit(&self) -> i64 {
        self.per_page()
    }

    /// Rows to skip, or `None` when the page is too large to address.
    #[must_use]
    pub fn offset(&self) -> Option<i64> {
        self.page()
            .checked_sub(1)
            .and_then(|skipped| skipped.checked_mul(self.per_page()))
    }

    /// Rejects a page or page size below 1.
    pub fn validate(&self) -> AppResult<()> {
        if self.page() < 1 {
            return Err(AppError::invalid_input("page must be >= 1"));
        }
        if self.per_page() < 1 {
            return Err(AppError::invalid_input("per_page must be >= 1"));
        }
        Ok(())
    }

    /// Validates the parameters and combines them with an ordering.
    pub fn page_request(&self, order_by: OrderBy) -> AppResult<PageRequest> {
        self.validate()?;
        Ok(PageRequest {
            limit: self.limit(),
            offset: self
                .offset()
                .ok_or_else(|| AppError::invalid_input("page is out of range"))?,
            order_by,
        })
    }

    #[must_use]
    pub fn meta(&self) -> PaginationMeta {
        PaginationMeta {
            page: self.page(),
            per_page: self.per_page(),
        }
    }
}

/// Metadata echoed back with every list response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PaginationMeta {
    pub page: i64,
    pub per_page: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// A column from an allow-list plus a direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderBy {
    pub column: &'static str,
    pub direction: SortDirection,
}

impl OrderBy {
    pub const fn asc(column: &'static str) -> Self {
        Self {
            column,
            direction: SortDirection::Asc,
        }
    }

    pub const fn desc(column: &'static str) -> Self {
        Self {
            column,
            direction: SortDirection::Desc,
        }
    }
}

impl fmt::Display for OrderBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.column, self.direction.as_sql())
    }
}

/// Raw `sort_by` / `sort_dir` query parameters.
#[derive(Debug, Clone, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct SortParams {
    /// Column to sort by; unknown columns fall back to the default
    #[serde(default, deserialize_with = "deserialize_trimmed_string")]
    pub sort_by: Option<String>,
    /// `asc` or `desc`
    #[serde(default, deserialize_with = "deserialize_trimmed_string")]
    pub sort_dir: Option<String>,
}

impl SortParams {
    /// Resolves the requested ordering against `allowed`.
    ///
    /// An absent `sort_dir` keeps the default direction; any supplied value
    /// other than `desc` means ascending.
    pub fn resolve(&self, allowed: &[&'static str], default: OrderBy) -> OrderBy {
        let column = self
            .sort_by
            .as_deref()
            .map(str::to_lowercase)
            .and_then(|requested| allowed.iter().find(|c| **c == requested).copied())
            .unwrap_or(default.column);

        let direction = match self.sort_dir.as_deref().map(str::to_lowercase) {
            None => default.direction,
            Some(dir) if dir == "desc" => SortDirection::Desc,
            Some(_) => SortDirection::Asc,
        };

        OrderBy { column, direction }
    }
}

/// Window and ordering handed to repository `list` calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub limit: i64,
    pub offset: i64,
    pub order_by: OrderBy,
}

impl PageRequest {
    pub fn new(limit: i64, offset: i64, order_by: OrderBy) -> Self {
        Self {
            limit,
            offset,
            order_by,
        }
    }

    /// Negative windows are malformed input.
    pub fn validate(&self) -> AppResult<()> {
        if self.limit < 0 || self.offset < 0 {
            return Err(AppError::invalid_input("limit and offset must not be negative"));
        }
        Ok(())
    }
}
