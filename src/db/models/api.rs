use serde::Serialize;

/// Envelope shared by every endpoint.
#[derive(Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub code: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<ResponseMeta>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<ErrorDetail>>,
    pub timestamp: String,
}

#[derive(Serialize, Default)]
pub struct ResponseMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_count: Option<i64>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Pagination {
    pub page: i64,
    pub per_page: i64,
    pub total_pages: i64,
    pub has_next: bool,
    pub has_prev: bool,
}

#[derive(Serialize, Debug, Clone)]
pub struct ErrorDetail {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    pub code: String,
    pub message: String,
}

/// A page of rows plus the total number of rows matching the filters.
#[derive(Debug)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_count: i64,
    pub pagination: Pagination,
}

impl<T> ApiResponse<T> {
    fn build(success: bool, code: u16, message: &str, data: Option<T>) -> Self {
        Self {
            success,
            code,
            message: message.to_string(),
            data,
            meta: None,
            errors: None,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    fn failure(code: u16, error_code: &str, message: &str, field: Option<String>) -> Self {
        let mut response = Self::build(false, code, message, None);
        response.errors = Some(vec![ErrorDetail {
            field,
            code: error_code.to_string(),
            message: message.to_string(),
        }]);
        response
    }

    pub fn success(data: T, message: &str) -> Self {
        Self::build(true, 200, message, Some(data))
    }

    pub fn success_with_meta(data: T, message: &str, meta: ResponseMeta) -> Self {
        let mut response = Self::build(true, 200, message, Some(data));
        response.meta = Some(meta);
        response
    }

    pub fn created(data: T, message: &str) -> Self {
        Self::build(true, 201, message, Some(data))
    }

    pub fn ok(message: &str) -> Self {
        Self::build(true, 200, message, None)
    }

    pub fn validation_error(errors: Vec<ErrorDetail>) -> Self {
        let mut response = Self::build(false, 400, "Validation failed", None);
        response.errors = Some(errors);
        response
    }

    pub fn bad_request(message: &str) -> Self {
        Self::failure(400, "BAD_REQUEST", message, None)
    }

    pub fn unauthorized(message: &str) -> Self {
        Self::failure(401, "UNAUTHORIZED", message, None)
    }

    pub fn forbidden(message: &str) -> Self {
        Self::failure(403, "FORBIDDEN", message, None)
    }

    pub fn not_found(message: &str) -> Self {
        Self::failure(404, "NOT_FOUND", message, None)
    }

    pub fn conflict(message: &str, field: Option<String>, error_code: &str) -> Self {
        Self::failure(409, error_code, message, field)
    }

    pub fn internal_error(message: &str) -> Self {
        Self::failure(500, "INTERNAL_ERROR", message, None)
    }
}

impl<T> ApiResponse<Vec<T>> {
    pub fn paginated(page: Page<T>, message: &str) -> Self {
        let meta = ResponseMeta {
            pagination: Some(page.pagination),
            total_count: Some(page.total_count),
        };
        Self::success_with_meta(page.items, message, meta)
    }
}

pub mod error_codes {
    pub const USER_EMAIL_EXISTS: &str = "USER_EMAIL_EXISTS";
    pub const TEAM_NAME_EXISTS: &str = "TEAM_NAME_EXISTS";
    pub const TEAM_ACRONYM_EXISTS: &str = "TEAM_ACRONYM_EXISTS";
    pub const TEAM_MEMBER_EXISTS: &str = "TEAM_MEMBER_EXISTS";
    pub const TEAM_LEADER_IN_USE: &str = "TEAM_LEADER_IN_USE";
    pub const PUBLICATION_DOI_EXISTS: &str = "PUBLICATION_DOI_EXISTS";
}
