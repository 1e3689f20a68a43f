use crate::db::enums::PublicationKind;
use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::user::UserBasicInfo;

#[derive(Queryable, Selectable, Identifiable, Serialize, Deserialize, Clone, Debug)]
#[diesel(table_name = crate::schema::publications)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Publication {
    pub id: Uuid,
    pub title: String,
    pub authors: Vec<String>,
    pub journal: Option<String>,
    pub kind: PublicationKind,
    pub publication_date: NaiveDate,
    pub doi: Option<String>,
    pub abstract_text: Option<String>,
    pub url: Option<String>,
    pub author_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::publications)]
pub struct NewPublication {
    pub title: String,
    pub authors: Vec<String>,
    pub journal: Option<String>,
    pub kind: PublicationKind,
    pub publication_date: NaiveDate,
    pub doi: Option<String>,
    pub abstract_text: Option<String>,
    pub url: Option<String>,
    pub author_id: Uuid,
}

#[derive(AsChangeset, Default)]
#[diesel(table_name = crate::schema::publications)]
pub struct PublicationChangeset {
    pub title: Option<String>,
    pub authors: Option<Vec<String>>,
    pub journal: Option<Option<String>>,
    pub kind: Option<PublicationKind>,
    pub publication_date: Option<NaiveDate>,
    pub doi: Option<Option<String>>,
    pub abstract_text: Option<Option<String>>,
    pub url: Option<Option<String>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Serialize, Debug)]
pub struct PublicationInfo {
    pub id: Uuid,
    pub title: String,
    pub authors: Vec<String>,
    pub journal: Option<String>,
    pub kind: PublicationKind,
    pub publication_date: NaiveDate,
    pub doi: Option<String>,
    #[serde(rename = "abstract")]
    pub abstract_text: Option<String>,
    pub url: Option<String>,
    pub registered_by: UserBasicInfo,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PublicationInfo {
    pub fn new(publication: Publication, registered_by: UserBasicInfo) -> Self {
        Self {
            id: publication.id,
            title: publication.title,
            authors: publication.authors,
            journal: publication.journal,
            kind: publication.kind,
            publication_date: publication.publication_date,
            doi: publication.doi,
            abstract_text: publication.abstract_text,
            url: publication.url,
            registered_by,
            created_at: publication.created_at,
            updated_at: publication.updated_at,
        }
    }
}

#[derive(Deserialize, Validate)]
pub struct CreatePublicationRequest {
    #[validate(length(min = 1, max = 300, message = "Title must be between 1 and 300 characters"))]
    pub title: String,
    #[validate(length(min = 1, message = "At least one author is required"))]
    pub authors: Vec<String>,
    pub journal: Option<String>,
    pub kind: Option<PublicationKind>,
    pub publication_date: NaiveDate,
    pub doi: Option<String>,
    #[serde(rename = "abstract")]
    pub abstract_text: Option<String>,
    #[validate(url(message = "URL must be valid"))]
    pub url: Option<String>,
}

#[derive(Deserialize, Validate, Default)]
pub struct UpdatePublicationRequest {
    #[validate(length(min = 1, max = 300, message = "Title must be between 1 and 300 characters"))]
    pub title: Option<String>,
    #[validate(length(min = 1, message = "At least one author is required"))]
    pub authors: Option<Vec<String>>,
    #[serde(default, deserialize_with = "crate::utils::double_option")]
    pub journal: Option<Option<String>>,
    pub kind: Option<PublicationKind>,
    pub publication_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "crate::utils::double_option")]
    pub doi: Option<Option<String>>,
    #[serde(default, rename = "abstract", deserialize_with = "crate::utils::double_option")]
    pub abstract_text: Option<Option<String>>,
    #[serde(default, deserialize_with = "crate::utils::double_option")]
    pub url: Option<Option<String>>,
}

#[derive(Deserialize, Default)]
pub struct PublicationFilter {
    pub kind: Option<PublicationKind>,
    pub year: Option<i32>,
    pub author_id: Option<Uuid>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PublicationSortKey {
    Title,
    PublicationDate,
    CreatedAt,
}

impl crate::utils::SortKey for PublicationSortKey {
    const ALLOWED: &'static [&'static str] = &["title", "publication_date", "created_at"];

    fn from_key(key: &str) -> Option<Self> {
        match key {
            "title" => Some(PublicationSortKey::Title),
            "publication_date" => Some(PublicationSortKey::PublicationDate),
            "created_at" => Some(PublicationSortKey::CreatedAt),
            _ => None,
        }
    }

    fn default_key() -> Self {
        PublicationSortKey::PublicationDate
    }
}
