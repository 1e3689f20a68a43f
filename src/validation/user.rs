use std::borrow::Cow;

use validator::ValidationError;

use crate::error::AppError;

pub const MAX_NAME_LEN: usize = 100;

pub fn validate_name(name: &str) -> Result<String, AppError> {
    super::require_text("name", name, MAX_NAME_LEN)
}

/// Lower-cases and checks the rough shape of an address.
pub fn normalize_email(email: &str) -> Result<String, AppError> {
    let email = email.trim().to_lowercase();
    if email.is_empty() {
        return Err(AppError::validation_field("email", "Email is required"));
    }
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    };
    if !valid {
        return Err(AppError::validation_field("email", "Invalid email format"));
    }
    Ok(email)
}

fn password_weakness(password: &str) -> Option<&'static str> {
    if password.chars().count() < 8 {
        return Some("Password must be at least 8 characters");
    }

    let classes = [
        password.chars().any(|c| c.is_lowercase()),
        password.chars().any(|c| c.is_uppercase()),
        password.chars().any(|c| c.is_ascii_digit()),
        password.chars().any(|c| !c.is_alphanumeric()),
    ];
    if classes.iter().filter(|present| **present).count() < 3 {
        return Some("Password must mix at least three of: lowercase, uppercase, digits, symbols");
    }
    None
}

/// At least 8 characters drawn from at least three of: lower, upper, digit, symbol.
pub fn validate_password(password: &str) -> Result<(), AppError> {
    match password_weakness(password) {
        Some(message) => Err(AppError::validation_field("password", message)),
        None => Ok(()),
    }
}

/// Same policy as [`validate_password`], as a `validator` custom rule for request bodies.
pub fn validate_password_strength(password: &str) -> Result<(), ValidationError> {
    match password_weakness(password) {
        Some(message) => {
            let mut error = ValidationError::new("weak_password");
            error.message = Some(Cow::Borrowed(message));
            Err(error)
        }
        None => Ok(()),
    }
}
