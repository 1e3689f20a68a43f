use crate::error::AppError;

pub const MAX_TITLE_LEN: usize = 200;
pub const MAX_CATEGORY_LEN: usize = 50;

pub fn validate_create_news(title: &str, content: &str, category: &str) -> Result<(), AppError> {
    super::require_text("title", title, MAX_TITLE_LEN)?;
    if content.trim().is_empty() {
        return Err(AppError::validation_field("content", "Content is required"));
    }
    validate_category(category)?;
    Ok(())
}

pub fn validate_category(category: &str) -> Result<String, AppError> {
    super::require_text("category", category, MAX_CATEGORY_LEN)
}
