use crate::db::enums::UserRole;
use crate::validation::user::validate_password_strength;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

// User models
#[derive(Queryable, Selectable, Identifiable, Clone, Debug)]
#[diesel(table_name = crate::schema::users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::users)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
    pub image: Option<String>,
}

#[derive(AsChangeset, Default)]
#[diesel(table_name = crate::schema::users)]
pub struct UserChangeset {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub role: Option<UserRole>,
    pub image: Option<Option<String>>,
    pub updated_at: Option<DateTime<Utc>>,
}

// User API DTOs
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct UserInfo {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserInfo {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            image: user.image,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct UserBasicInfo {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub image: Option<String>,
}

impl From<&User> for UserBasicInfo {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
            image: user.image.clone(),
        }
    }
}

/// A team the user belongs to, as shown on their profile.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct MembershipInfo {
    pub team_id: Uuid,
    pub team_name: String,
    pub acronym: String,
    pub is_leader: bool,
    pub joined_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(flatten)]
    pub user: UserInfo,
    pub teams: Vec<MembershipInfo>,
}

#[derive(Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
    pub name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(custom(function = "validate_password_strength"))]
    pub password: String,

    pub role: UserRole,

    #[validate(url(message = "Image must be a valid URL"))]
    pub image: Option<String>,
}

#[derive(Deserialize, Validate, Default)]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
    pub name: Option<String>,

    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    pub role: Option<UserRole>,

    #[serde(default, deserialize_with = "crate::utils::double_option")]
    pub image: Option<Option<String>>,
}

#[derive(Deserialize, Validate, Default)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
    pub name: Option<String>,

    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    #[serde(default, deserialize_with = "crate::utils::double_option")]
    pub image: Option<Option<String>>,
}

#[derive(Deserialize, Validate)]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, message = "Current password is required"))]
    pub current_password: String,

    #[validate(custom(function = "validate_password_strength"))]
    pub new_password: String,
}

#[derive(Deserialize)]
pub struct UserFilter {
    pub role: Option<UserRole>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UserSortKey {
    Name,
    Email,
    Role,
    CreatedAt,
}

impl crate::utils::SortKey for UserSortKey {
    const ALLOWED: &'static [&'static str] = &["name", "email", "role", "created_at"];

    fn from_key(key: &str) -> Option<Self> {
        match key {
            "name" => Some(UserSortKey::Name),
            "email" => Some(UserSortKey::Email),
            "role" => Some(UserSortKey::Role),
            "created_at" => Some(UserSortKey::CreatedAt),
            _ => None,
        }
    }

    fn default_key() -> Self {
        UserSortKey::CreatedAt
    }
}
