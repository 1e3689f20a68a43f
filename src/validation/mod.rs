pub mod news;
pub mod project;
pub mod publication;
pub mod team;
pub mod user;

use axum::{
    Json, async_trait,
    extract::FromRequest,
    http::Request,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::error::AppError;

/// JSON extractor that runs `validator` rules before the handler sees the body.
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S, axum::body::Body> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request<axum::body::Body>, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::bad_request(format!("Invalid JSON body: {}", rejection)))?;

        value.validate().map_err(|errors| {
            let field_errors = errors.field_errors();
            let mut fields: Vec<_> = field_errors.iter().collect();
            fields.sort_by(|a, b| a.0.cmp(b.0));
            match fields.first() {
                Some((field, errs)) => {
                    let message = errs
                        .first()
                        .and_then(|e| e.message.as_ref())
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("Invalid value for {}", field));
                    AppError::validation_field(field.to_string(), message)
                }
                None => AppError::validation("Validation failed"),
            }
        })?;

        Ok(ValidatedJson(value))
    }
}

/// Parses a body that may be omitted. Empty or whitespace-only input is `None`;
/// anything else must be valid JSON for `T`.
pub fn parse_optional_json<T: DeserializeOwned>(body: &[u8]) -> Result<Option<T>, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    serde_json::from_slice(body)
        .map(Some)
        .map_err(|err| AppError::bad_request(format!("Invalid JSON body: {}", err)))
}

/// Trims free text; blank input becomes `None`.
pub fn normalize_optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Same as [`normalize_optional_text`] for patch fields where `Some(None)` clears.
pub fn normalize_patch_text(value: Option<Option<String>>) -> Option<Option<String>> {
    value.map(normalize_optional_text)
}

pub fn require_text(field: &str, value: &str, max_len: usize) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation_field(field, format!("{} is required", field)));
    }
    if trimmed.chars().count() > max_len {
        return Err(AppError::validation_field(
            field,
            format!("{} must be {} characters or less", field, max_len),
        ));
    }
    Ok(trimmed.to_string())
}
