use chrono::NaiveDate;

use crate::error::AppError;

pub const MAX_PROJECT_NAME_LEN: usize = 200;

pub fn validate_project_name(name: &str) -> Result<String, AppError> {
    super::require_text("name", name, MAX_PROJECT_NAME_LEN)
}

pub fn validate_project_dates(
    start_date: Option<NaiveDate>,
    expected_end_date: Option<NaiveDate>,
) -> Result<(), AppError> {
    if let (Some(start), Some(end)) = (start_date, expected_end_date) {
        if end < start {
            return Err(AppError::validation_field(
                "expected_end_date",
                "Expected end date cannot be before the start date",
            ));
        }
    }
    Ok(())
}
