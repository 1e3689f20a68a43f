use diesel::prelude::*;
use uuid::Uuid;

use crate::{
    db::models::{
        api::error_codes,
        team::{AddTeamMemberRequest, TeamMemberInfo},
        user::UserBasicInfo,
    },
    db::repositories::{TeamsRepo, UsersRepo},
    error::{AppError, unique_violation_constraint},
    services::{context::RequestContext, teams_service::TeamsService},
};

pub struct TeamMembersService;

impl TeamMembersService {
    pub fn list(conn: &mut PgConnection, team_id: Uuid) -> Result<Vec<TeamMemberInfo>, AppError> {
        let team = TeamsService::find(conn, team_id)?;
        let members = TeamsRepo::members(conn, team.id)?
            .into_iter()
            .map(|(membership, user)| TeamMemberInfo {
                is_leader: user.id == team.leader_id,
                user: UserBasicInfo::from(&user),
                joined_at: membership.joined_at,
            })
            .collect();
        Ok(members)
    }

    pub fn add(
        conn: &mut PgConnection,
        ctx: &RequestContext,
        team_id: Uuid,
        req: &AddTeamMemberRequest,
    ) -> Result<TeamMemberInfo, AppError> {
        let team = TeamsService::find(conn, team_id)?;
        ctx.ensure_can_manage_team(team.leader_id)?;

        let user = UsersRepo::find_by_id(conn, req.user_id)?.ok_or_else(|| AppError::not_found("User"))?;

        if TeamsRepo::is_member(conn, team.id, user.id)? {
            return Err(member_conflict());
        }

        let membership = TeamsRepo::add_member(conn, team.id, user.id).map_err(|err| {
            match unique_violation_constraint(&err).as_deref() {
                Some("team_members_pkey") => member_conflict(),
                _ => AppError::Database(err),
            }
        })?;

        tracing::info!(team_id = %team.id, user_id = %user.id, added_by = %ctx.user_id, "Team member added");
        Ok(TeamMemberInfo {
            is_leader: user.id == team.leader_id,
            user: UserBasicInfo::from(&user),
            joined_at: membership.joined_at,
        })
    }

    pub fn remove(
        conn: &mut PgConnection,
        ctx: &RequestContext,
        team_id: Uuid,
        user_id: Uuid,
    ) -> Result<(), AppError> {
        let team = TeamsService::find(conn, team_id)?;
        ctx.ensure_can_manage_team(team.leader_id)?;

        if user_id == team.leader_id {
            return Err(AppError::conflict_with_code(
                "The team leader cannot be removed from the team",
                Some("user_id".to_string()),
                error_codes::TEAM_LEADER_IN_USE,
            ));
        }

        if TeamsRepo::remove_member(conn, team.id, user_id)? == 0 {
            return Err(AppError::not_found("Team member"));
        }
        tracing::info!(team_id = %team.id, user_id = %user_id, removed_by = %ctx.user_id, "Team member removed");
        Ok(())
    }
}

fn member_conflict() -> AppError {
    AppError::conflict_with_code(
        "User is already a member of this team",
        Some("user_id".to_string()),
        error_codes::TEAM_MEMBER_EXISTS,
    )
}
