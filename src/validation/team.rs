use crate::error::AppError;

pub const MAX_TEAM_NAME_LEN: usize = 120;

pub fn validate_team_name(name: &str) -> Result<String, AppError> {
    super::require_text("name", name, MAX_TEAM_NAME_LEN)
}

/// Acronyms are stored upper-cased: 2 to 10 of `A-Z`, `0-9`, `-`, `_`.
pub fn normalize_acronym(acronym: &str) -> Result<String, AppError> {
    let acronym = acronym.trim().to_uppercase();
    if acronym.is_empty() {
        return Err(AppError::validation_field("acronym", "Team acronym is required"));
    }
    let len = acronym.chars().count();
    if !(2..=10).contains(&len) {
        return Err(AppError::validation_field(
            "acronym",
            "Team acronym must be between 2 and 10 characters",
        ));
    }
    if !acronym
        .chars()
        .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '-' || c == '_')
    {
        return Err(AppError::validation_field(
            "acronym",
            "Team acronym can only contain letters, numbers, hyphens, and underscores",
        ));
    }
    Ok(acronym)
}
