use crate::db::enums::ProjectState;
use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::team::TeamBasicInfo;

// Project models
#[derive(Queryable, Selectable, Identifiable, Serialize, Deserialize, Clone, Debug)]
#[diesel(table_name = crate::schema::projects)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub state: ProjectState,
    pub team_id: Uuid,
    pub start_date: Option<NaiveDate>,
    pub expected_end_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::projects)]
pub struct NewProject {
    pub name: String,
    pub description: Option<String>,
    pub state: ProjectState,
    pub team_id: Uuid,
    pub start_date: Option<NaiveDate>,
    pub expected_end_date: Option<NaiveDate>,
}

#[derive(AsChangeset, Default)]
#[diesel(table_name = crate::schema::projects)]
pub struct ProjectChangeset {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub state: Option<ProjectState>,
    pub team_id: Option<Uuid>,
    pub start_date: Option<Option<NaiveDate>>,
    pub expected_end_date: Option<Option<NaiveDate>>,
    pub updated_at: Option<DateTime<Utc>>,
}

// Project API DTOs
#[derive(Serialize, Debug)]
pub struct ProjectInfo {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub state: ProjectState,
    pub team: TeamBasicInfo,
    pub start_date: Option<NaiveDate>,
    pub expected_end_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProjectInfo {
    pub fn new(project: Project, team: TeamBasicInfo) -> Self {
        Self {
            id: project.id,
            name: project.name,
            description: project.description,
            state: project.state,
            team,
            start_date: project.start_date,
            expected_end_date: project.expected_end_date,
            created_at: project.created_at,
            updated_at: project.updated_at,
        }
    }
}

#[derive(Deserialize, Validate)]
pub struct CreateProjectRequest {
    #[validate(length(min = 1, max = 200, message = "Project name must be between 1 and 200 characters"))]
    pub name: String,
    pub description: Option<String>,
    pub state: Option<ProjectState>,
    pub team_id: Uuid,
    pub start_date: Option<NaiveDate>,
    pub expected_end_date: Option<NaiveDate>,
}

#[derive(Deserialize, Validate, Default)]
pub struct UpdateProjectRequest {
    #[validate(length(min = 1, max = 200, message = "Project name must be between 1 and 200 characters"))]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "crate::utils::double_option")]
    pub description: Option<Option<String>>,
    pub state: Option<ProjectState>,
    pub team_id: Option<Uuid>,
    #[serde(default, deserialize_with = "crate::utils::double_option")]
    pub start_date: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "crate::utils::double_option")]
    pub expected_end_date: Option<Option<NaiveDate>>,
}

#[derive(Deserialize, Default)]
pub struct ProjectFilter {
    pub team_id: Option<Uuid>,
    pub state: Option<ProjectState>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProjectSortKey {
    Name,
    State,
    ExpectedEndDate,
    CreatedAt,
}

impl crate::utils::SortKey for ProjectSortKey {
    const ALLOWED: &'static [&'static str] = &["name", "state", "expected_end_date", "created_at"];

    fn from_key(key: &str) -> Option<Self> {
        match key {
            "name" => Some(ProjectSortKey::Name),
            "state" => Some(ProjectSortKey::State),
            "expected_end_date" => Some(ProjectSortKey::ExpectedEndDate),
            "created_at" => Some(ProjectSortKey::CreatedAt),
            _ => None,
        }
    }

    fn default_key() -> Self {
        ProjectSortKey::CreatedAt
    }
}
