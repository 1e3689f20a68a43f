use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::project::ProjectInfo;
use super::user::UserBasicInfo;

// Team models
#[derive(Queryable, Selectable, Identifiable, Serialize, Deserialize, Clone, Debug)]
#[diesel(table_name = crate::schema::teams)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Team {
    pub id: Uuid,
    pub name: String,
    pub acronym: String,
    pub description: Option<String>,
    pub leader_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::teams)]
pub struct NewTeam {
    pub name: String,
    pub acronym: String,
    pub description: Option<String>,
    pub leader_id: Uuid,
}

#[derive(AsChangeset, Default)]
#[diesel(table_name = crate::schema::teams)]
pub struct TeamChangeset {
    pub name: Option<String>,
    pub acronym: Option<String>,
    pub description: Option<Option<String>>,
    pub leader_id: Option<Uuid>,
    pub updated_at: Option<DateTime<Utc>>,
}

// Team Member models
#[derive(Queryable, Selectable, Serialize, Deserialize, Clone, Debug)]
#[diesel(table_name = crate::schema::team_members)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TeamMember {
    pub team_id: Uuid,
    pub user_id: Uuid,
    pub joined_at: DateTime<Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::team_members)]
pub struct NewTeamMember {
    pub team_id: Uuid,
    pub user_id: Uuid,
}

// Team API DTOs
#[derive(Serialize, Clone, Debug)]
pub struct TeamBasicInfo {
    pub id: Uuid,
    pub name: String,
    pub acronym: String,
}

impl From<&Team> for TeamBasicInfo {
    fn from(team: &Team) -> Self {
        Self {
            id: team.id,
            name: team.name.clone(),
            acronym: team.acronym.clone(),
        }
    }
}

#[derive(Serialize)]
pub struct TeamSummary {
    pub id: Uuid,
    pub name: String,
    pub acronym: String,
    pub description: Option<String>,
    pub leader: UserBasicInfo,
    pub member_count: i64,
    pub project_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Serialize)]
pub struct TeamMemberInfo {
    pub user: UserBasicInfo,
    pub is_leader: bool,
    pub joined_at: DateTime<Utc>,
}

#[derive(Serialize)]
pub struct TeamDetailResponse {
    pub id: Uuid,
    pub name: String,
    pub acronym: String,
    pub description: Option<String>,
    pub leader: UserBasicInfo,
    pub members: Vec<TeamMemberInfo>,
    pub projects: Vec<ProjectInfo>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Deserialize, Validate)]
pub struct CreateTeamRequest {
    #[validate(length(min = 1, max = 120, message = "Team name must be between 1 and 120 characters"))]
    pub name: String,
    pub acronym: String,
    pub description: Option<String>,
    pub leader_id: Uuid,
}

#[derive(Deserialize, Validate, Default)]
pub struct UpdateTeamRequest {
    #[validate(length(min = 1, max = 120, message = "Team name must be between 1 and 120 characters"))]
    pub name: Option<String>,
    pub acronym: Option<String>,
    #[serde(default, deserialize_with = "crate::utils::double_option")]
    pub description: Option<Option<String>>,
    pub leader_id: Option<Uuid>,
}

impl UpdateTeamRequest {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.acronym.is_none()
            && self.description.is_none()
            && self.leader_id.is_none()
    }
}

#[derive(Deserialize)]
pub struct AddTeamMemberRequest {
    pub user_id: Uuid,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TeamSortKey {
    Name,
    Acronym,
    CreatedAt,
}

impl crate::utils::SortKey for TeamSortKey {
    const ALLOWED: &'static [&'static str] = &["name", "acronym", "created_at"];

    fn from_key(key: &str) -> Option<Self> {
        match key {
            "name" => Some(TeamSortKey::Name),
            "acronym" => Some(TeamSortKey::Acronym),
            "created_at" => Some(TeamSortKey::CreatedAt),
            _ => None,
        }
    }

    fn default_key() -> Self {
        TeamSortKey::CreatedAt
    }
}
