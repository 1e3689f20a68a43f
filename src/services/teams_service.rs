use std::collections::HashMap;

use chrono::Utc;
use diesel::prelude::*;
use uuid::Uuid;

use crate::{
    db::enums::UserRole,
    db::models::{
        api::{Page, error_codes},
        project::ProjectInfo,
        team::{
            CreateTeamRequest, NewTeam, Team, TeamBasicInfo, TeamChangeset, TeamDetailResponse,
            TeamMemberInfo, TeamSortKey, TeamSummary, UpdateTeamRequest,
        },
        user::{User, UserBasicInfo},
    },
    db::repositories::{ProjectsRepo, TeamsRepo, UsersRepo},
    error::{AppError, unique_violation_constraint},
    services::context::RequestContext,
    utils::ListQuery,
    validation::{
        normalize_optional_text, normalize_patch_text,
        team::{normalize_acronym, validate_team_name},
    },
};

pub struct TeamsService;

impl TeamsService {
    pub fn list(conn: &mut PgConnection, query: &ListQuery) -> Result<Page<TeamSummary>, AppError> {
        let params = query.resolve::<TeamSortKey>()?;
        let (teams, total_count) = TeamsRepo::list(conn, &params)?;
        Ok(Page {
            items: Self::summaries(conn, teams)?,
            total_count,
            pagination: params.pagination(total_count),
        })
    }

    /// Teams the caller belongs to.
    pub fn for_user(conn: &mut PgConnection, ctx: &RequestContext) -> Result<Vec<TeamSummary>, AppError> {
        let team_ids = TeamsRepo::member_team_ids(conn, ctx.user_id)?;
        let teams = TeamsRepo::find_many(conn, &team_ids)?;
        Self::summaries(conn, teams)
    }

    pub fn get(conn: &mut PgConnection, team_id: Uuid) -> Result<TeamDetailResponse, AppError> {
        let team = Self::find(conn, team_id)?;
        let leader = UsersRepo::find_by_id(conn, team.leader_id)?
            .ok_or_else(|| AppError::internal(format!("Team {} has no leader row", team.id)))?;

        let members = TeamsRepo::members(conn, team.id)?
            .into_iter()
            .map(|(membership, user)| TeamMemberInfo {
                is_leader: user.id == team.leader_id,
                user: UserBasicInfo::from(&user),
                joined_at: membership.joined_at,
            })
            .collect();

        let basic = TeamBasicInfo::from(&team);
        let projects = ProjectsRepo::for_team(conn, team.id)?
            .into_iter()
            .map(|project| ProjectInfo::new(project, basic.clone()))
            .collect();

        Ok(TeamDetailResponse {
            id: team.id,
            name: team.name,
            acronym: team.acronym,
            description: team.description,
            leader: UserBasicInfo::from(&leader),
            members,
            projects,
            created_at: team.created_at,
            updated_at: team.updated_at,
        })
    }

    pub fn create(
        conn: &mut PgConnection,
        ctx: &RequestContext,
        req: &CreateTeamRequest,
    ) -> Result<Team, AppError> {
        ctx.ensure_lab_leader()?;

        let name = validate_team_name(&req.name)?;
        let acronym = normalize_acronym(&req.acronym)?;
        let leader = Self::find_leader_candidate(conn, req.leader_id)?;

        if TeamsRepo::name_taken(conn, &name, None)? {
            return Err(name_conflict());
        }
        if TeamsRepo::acronym_taken(conn, &acronym, None)? {
            return Err(acronym_conflict());
        }

        let new_team = NewTeam {
            name,
            acronym,
            description: normalize_optional_text(req.description.clone()),
            leader_id: leader.id,
        };

        let team = conn
            .transaction::<Team, diesel::result::Error, _>(|conn| {
                let team = TeamsRepo::insert(conn, &new_team)?;
                Self::install_leader(conn, team.id, &leader)?;
                Ok(team)
            })
            .map_err(map_team_write_error)?;

        tracing::info!(team_id = %team.id, leader_id = %team.leader_id, "Team created");
        Ok(team)
    }

    pub fn update(
        conn: &mut PgConnection,
        ctx: &RequestContext,
        team_id: Uuid,
        req: &UpdateTeamRequest,
    ) -> Result<Team, AppError> {
        let existing = Self::find(conn, team_id)?;
        ctx.ensure_can_manage_team(existing.leader_id)?;

        if req.is_empty() {
            return Ok(existing);
        }

        let new_leader = match req.leader_id {
            Some(leader_id) if leader_id != existing.leader_id => {
                if !ctx.is_lab_leader() {
                    return Err(AppError::forbidden("Only the lab leader can change a team's leader"));
                }
                Some(Self::find_leader_candidate(conn, leader_id)?)
            }
            _ => None,
        };

        let name = req.name.as_deref().map(validate_team_name).transpose()?;
        let acronym = req.acronym.as_deref().map(normalize_acronym).transpose()?;

        if let Some(name) = name.as_deref() {
            if TeamsRepo::name_taken(conn, name, Some(team_id))? {
                return Err(name_conflict());
            }
        }
        if let Some(acronym) = acronym.as_deref() {
            if TeamsRepo::acronym_taken(conn, acronym, Some(team_id))? {
                return Err(acronym_conflict());
            }
        }

        let changes = TeamChangeset {
            name,
            acronym,
            description: normalize_patch_text(req.description.clone()),
            leader_id: new_leader.as_ref().map(|leader| leader.id),
            updated_at: Some(Utc::now()),
        };

        let team = conn
            .transaction::<Team, diesel::result::Error, _>(|conn| {
                let team = TeamsRepo::update(conn, team_id, &changes)?;
                if let Some(leader) = new_leader.as_ref() {
                    Self::install_leader(conn, team.id, leader)?;
                }
                Ok(team)
            })
            .map_err(map_team_write_error)?;

        tracing::info!(team_id = %team.id, updated_by = %ctx.user_id, "Team updated");
        Ok(team)
    }

    pub fn delete(conn: &mut PgConnection, ctx: &RequestContext, team_id: Uuid) -> Result<(), AppError> {
        ctx.ensure_lab_leader()?;
        Self::find(conn, team_id)?;

        TeamsRepo::delete(conn, team_id)?;
        tracing::info!(team_id = %team_id, deleted_by = %ctx.user_id, "Team deleted with its projects and memberships");
        Ok(())
    }

    pub fn find(conn: &mut PgConnection, team_id: Uuid) -> Result<Team, AppError> {
        TeamsRepo::find_by_id(conn, team_id)?.ok_or_else(|| AppError::not_found("Team"))
    }

    fn find_leader_candidate(conn: &mut PgConnection, user_id: Uuid) -> Result<User, AppError> {
        UsersRepo::find_by_id(conn, user_id)?
            .ok_or_else(|| AppError::validation_field("leader_id", "Leader must be an existing user"))
    }

    /// The leader is always a member; a plain member becomes a team leader.
    fn install_leader(conn: &mut PgConnection, team_id: Uuid, leader: &User) -> QueryResult<()> {
        TeamsRepo::ensure_member(conn, team_id, leader.id)?;
        if leader.role == UserRole::TeamMember {
            UsersRepo::set_role(conn, leader.id, UserRole::TeamLeader)?;
            tracing::info!(user_id = %leader.id, "Promoted to team leader");
        }
        Ok(())
    }

    fn summaries(conn: &mut PgConnection, teams: Vec<Team>) -> Result<Vec<TeamSummary>, AppError> {
        let team_ids: Vec<Uuid> = teams.iter().map(|t| t.id).collect();
        let leader_ids: Vec<Uuid> = teams.iter().map(|t| t.leader_id).collect();

        let leaders: HashMap<Uuid, User> = UsersRepo::find_many(conn, &leader_ids)?
            .into_iter()
            .map(|user| (user.id, user))
            .collect();
        let member_counts = TeamsRepo::member_counts(conn, &team_ids)?;
        let project_counts = TeamsRepo::project_counts(conn, &team_ids)?;

        teams
            .into_iter()
            .map(|team| {
                let leader = leaders
                    .get(&team.leader_id)
                    .ok_or_else(|| AppError::internal(format!("Team {} has no leader row", team.id)))?;
                Ok(TeamSummary {
                    leader: UserBasicInfo::from(leader),
                    member_count: member_counts.get(&team.id).copied().unwrap_or(0),
                    project_count: project_counts.get(&team.id).copied().unwrap_or(0),
                    id: team.id,
                    name: team.name,
                    acronym: team.acronym,
                    description: team.description,
                    created_at: team.created_at,
                    updated_at: team.updated_at,
                })
            })
            .collect()
    }
}

fn name_conflict() -> AppError {
    AppError::conflict_with_code(
        "A team with this name already exists",
        Some("name".to_string()),
        error_codes::TEAM_NAME_EXISTS,
    )
}

fn acronym_conflict() -> AppError {
    AppError::conflict_with_code(
        "A team with this acronym already exists",
        Some("acronym".to_string()),
        error_codes::TEAM_ACRONYM_EXISTS,
    )
}

fn map_team_write_error(err: diesel::result::Error) -> AppError {
    match unique_violation_constraint(&err).as_deref() {
        Some("teams_name_key") => name_conflict(),
        Some("teams_acronym_key") => acronym_conflict(),
        _ => AppError::Database(err),
    }
}
