use serde::Deserialize;

use crate::db::models::api::Pagination;
use crate::error::{AppError, AppResult};

pub const DEFAULT_PER_PAGE: i64 = 20;
pub const MAX_PER_PAGE: i64 = 100;

/// Query-string parameters shared by every list endpoint.
#[derive(Deserialize, Debug, Default, Clone)]
pub struct ListQuery {
    pub search: Option<String>,
    pub sort_by: Option<String>,
    pub order: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn parse(raw: Option<&str>) -> AppResult<Self> {
        match raw.map(|s| s.trim().to_ascii_lowercase()) {
            None => Ok(SortOrder::Desc),
            Some(s) if s.is_empty() || s == "desc" => Ok(SortOrder::Desc),
            Some(s) if s == "asc" => Ok(SortOrder::Asc),
            Some(_) => Err(AppError::validation_field("order", "Order must be 'asc' or 'desc'")),
        }
    }
}

/// Whitelisted sort columns of one resource.
pub trait SortKey: Sized + Copy {
    const ALLOWED: &'static [&'static str];

    fn from_key(key: &str) -> Option<Self>;

    fn default_key() -> Self;
}

#[derive(Debug, Clone)]
pub struct ListParams<S> {
    pub search: Option<String>,
    pub sort: S,
    pub order: SortOrder,
    pub page: i64,
    pub per_page: i64,
}

impl ListQuery {
    pub fn resolve<S: SortKey>(&self) -> AppResult<ListParams<S>> {
        let sort = match self.sort_by.as_deref().map(str::trim) {
            None | Some("") => S::default_key(),
            Some(key) => S::from_key(key).ok_or_else(|| {
                AppError::validation_field(
                    "sort_by",
                    format!("Cannot sort by '{}'; allowed: {}", key, S::ALLOWED.join(", ")),
                )
            })?,
        };

        let search = self
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        Ok(ListParams {
            search,
            sort,
            order: SortOrder::parse(self.order.as_deref())?,
            page: self.page.unwrap_or(1).max(1),
            per_page: self.per_page.unwrap_or(DEFAULT_PER_PAGE).clamp(1, MAX_PER_PAGE),
        })
    }
}

impl<S> ListParams<S> {
    /// Saturates instead of overflowing; a far-away page just yields no rows.
    pub fn offset(&self) -> i64 {
        self.page.saturating_sub(1).saturating_mul(self.per_page)
    }

    /// `ILIKE` pattern for the search term, `None` when no search was given.
    pub fn search_pattern(&self) -> Option<String> {
        self.search.as_deref().map(|term| format!("%{}%", escape_like(term)))
    }

    pub fn pagination(&self, total_count: i64) -> Pagination {
        let total_pages = if total_count == 0 {
            0
        } else {
            (total_count + self.per_page - 1) / self.per_page
        };
        Pagination {
            page: self.page,
            per_page: self.per_page,
            total_pages,
            has_next: self.page < total_pages,
            has_prev: self.page > 1,
        }
    }
}

/// Escapes `LIKE` wildcards so user input matches literally.
pub fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
