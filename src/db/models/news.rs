use crate::db::enums::NewsStatus;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::user::UserBasicInfo;

#[derive(Queryable, Selectable, Identifiable, Serialize, Deserialize, Clone, Debug)]
#[diesel(table_name = crate::schema::news)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct News {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub image: Option<String>,
    pub category: String,
    pub status: NewsStatus,
    pub publish_date: Option<DateTime<Utc>>,
    pub author_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::news)]
pub struct NewNews {
    pub title: String,
    pub content: String,
    pub image: Option<String>,
    pub category: String,
    pub status: NewsStatus,
    pub publish_date: Option<DateTime<Utc>>,
    pub author_id: Uuid,
}

#[derive(AsChangeset, Default)]
#[diesel(table_name = crate::schema::news)]
pub struct NewsChangeset {
    pub title: Option<String>,
    pub content: Option<String>,
    pub image: Option<Option<String>>,
    pub category: Option<String>,
    pub status: Option<NewsStatus>,
    pub publish_date: Option<Option<DateTime<Utc>>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Serialize, Debug)]
pub struct NewsInfo {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub image: Option<String>,
    pub category: String,
    pub status: NewsStatus,
    pub publish_date: Option<DateTime<Utc>>,
    pub author: UserBasicInfo,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl NewsInfo {
    pub fn new(news: News, author: UserBasicInfo) -> Self {
        Self {
            id: news.id,
            title: news.title,
            content: news.content,
            image: news.image,
            category: news.category,
            status: news.status,
            publish_date: news.publish_date,
            author,
            created_at: news.created_at,
            updated_at: news.updated_at,
        }
    }
}

#[derive(Deserialize, Validate)]
pub struct CreateNewsRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be between 1 and 200 characters"))]
    pub title: String,
    #[validate(length(min = 1, message = "Content is required"))]
    pub content: String,
    #[validate(url(message = "Image must be a valid URL"))]
    pub image: Option<String>,
    #[validate(length(min = 1, max = 50, message = "Category must be between 1 and 50 characters"))]
    pub category: String,
    pub status: Option<NewsStatus>,
    pub publish_date: Option<DateTime<Utc>>,
}

#[derive(Deserialize, Validate, Default)]
pub struct UpdateNewsRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be between 1 and 200 characters"))]
    pub title: Option<String>,
    #[validate(length(min = 1, message = "Content cannot be empty"))]
    pub content: Option<String>,
    #[serde(default, deserialize_with = "crate::utils::double_option")]
    pub image: Option<Option<String>>,
    #[validate(length(min = 1, max = 50, message = "Category must be between 1 and 50 characters"))]
    pub category: Option<String>,
    pub status: Option<NewsStatus>,
    #[serde(default, deserialize_with = "crate::utils::double_option")]
    pub publish_date: Option<Option<DateTime<Utc>>>,
}

#[derive(Deserialize, Default)]
pub struct NewsFilter {
    pub category: Option<String>,
    pub status: Option<NewsStatus>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NewsSortKey {
    Title,
    PublishDate,
    CreatedAt,
}

impl crate::utils::SortKey for NewsSortKey {
    const ALLOWED: &'static [&'static str] = &["title", "publish_date", "created_at"];

    fn from_key(key: &str) -> Option<Self> {
        match key {
            "title" => Some(NewsSortKey::Title),
            "publish_date" => Some(NewsSortKey::PublishDate),
            "created_at" => Some(NewsSortKey::CreatedAt),
            _ => None,
        }
    }

    fn default_key() -> Self {
        NewsSortKey::CreatedAt
    }
}
