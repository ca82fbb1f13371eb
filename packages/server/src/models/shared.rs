use serde::Serialize;
use utoipa::ToSchema;

use crate::entity::user;
use crate::error::AppError;

pub const DEFAULT_PAGE_SIZE: u64 = 10;
pub const MAX_PAGE_SIZE: u64 = 100;

/// Pagination metadata included in list responses.
#[derive(Debug, Serialize, ToSchema)]
pub struct Pagination {
    /// Current page number (1-based).
    #[schema(example = 1)]
    pub page: u64,
    /// Number of items per page.
    #[schema(example = 10)]
    pub per_page: u64,
    /// Total number of matching items across all pages.
    #[schema(example = 47)]
    pub total: u64,
    /// Total number of pages.
    #[schema(example = 5)]
    pub total_pages: u64,
}

impl Pagination {
    pub fn new(page: u64, per_page: u64, total: u64) -> Self {
        Self {
            page,
            per_page,
            total,
            total_pages: total.div_ceil(per_page),
        }
    }

    /// Rows to skip before this page. Saturates for absurd page numbers.
    pub fn offset(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.per_page)
    }

    /// Whether this page starts beyond the last matching row. Such a page is
    /// empty and must not be queried: its offset may not fit a SQL bind.
    pub fn is_past_end(&self) -> bool {
        self.offset() >= self.total
    }
}

/// Normalize `page`/`limit` query values: page defaults to 1 and never drops
/// below it, limit defaults to 10 and is clamped to 1..=100.
pub fn page_window(page: Option<u64>, limit: Option<u64>) -> (u64, u64) {
    let page = Ord::max(page.unwrap_or(1), 1);
    let per_page = limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
    (page, per_page)
}

/// Public subset of a user record.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserProfile {
    #[schema(example = "65a1f0c2e4b0a1b2c3d4e5f6")]
    pub id: String,
    pub username: String,
    pub avatar: String,
}

impl From<user::Model> for UserProfile {
    fn from(m: user::Model) -> Self {
        Self {
            id: m.id,
            username: m.username,
            avatar: m.avatar,
        }
    }
}

/// Escape LIKE wildcard characters in a search string.
pub fn escape_like(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Trimmed value of a required text field, or `Validation` naming it.
pub fn require_text(value: Option<&str>, field: &str) -> Result<String, AppError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(AppError::Validation(format!("{field} is required"))),
    }
}

/// PATCH helper: a field is applied only when present and non-blank.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Validate a trimmed title or name (1-256 Unicode characters).
pub fn validate_title(title: &str, field: &str) -> Result<(), AppError> {
    let title = title.trim();
    if title.is_empty() || title.chars().count() > 256 {
        return Err(AppError::Validation(format!(
            "{field} must be 1-256 characters"
        )));
    }
    Ok(())
}
