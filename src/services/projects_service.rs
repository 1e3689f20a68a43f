use std::collections::HashMap;

use chrono::Utc;
use diesel::prelude::*;
use uuid::Uuid;

use crate::{
    db::models::{
        api::Page,
        project::{
            CreateProjectRequest, NewProject, Project, ProjectChangeset, ProjectFilter, ProjectInfo,
            ProjectSortKey, UpdateProjectRequest,
        },
        team::TeamBasicInfo,
    },
    db::repositories::{ProjectsRepo, TeamsRepo},
    error::AppError,
    services::{context::RequestContext, teams_service::TeamsService},
    utils::ListQuery,
    validation::{
        normalize_optional_text, normalize_patch_text,
        project::{validate_project_dates, validate_project_name},
    },
};

pub struct ProjectsService;

impl ProjectsService {
    pub fn list(
        conn: &mut PgConnection,
        query: &ListQuery,
        filter: &ProjectFilter,
    ) -> Result<Page<ProjectInfo>, AppError> {
        let params = query.resolve::<ProjectSortKey>()?;
        let (projects, total_count) = ProjectsRepo::list(conn, &params, filter)?;
        Ok(Page {
            items: Self::with_teams(conn, projects)?,
            total_count,
            pagination: params.pagination(total_count),
        })
    }

    pub fn get(conn: &mut PgConnection, project_id: Uuid) -> Result<ProjectInfo, AppError> {
        let project = Self::find(conn, project_id)?;
        let team = TeamsService::find(conn, project.team_id)?;
        Ok(ProjectInfo::new(project, TeamBasicInfo::from(&team)))
    }

    pub fn create(
        conn: &mut PgConnection,
        ctx: &RequestContext,
        req: &CreateProjectRequest,
    ) -> Result<ProjectInfo, AppError> {
        let team = TeamsService::find(conn, req.team_id)?;
        ctx.ensure_can_manage_team(team.leader_id)?;

        let name = validate_project_name(&req.name)?;
        validate_project_dates(req.start_date, req.expected_end_date)?;

        let new_project = NewProject {
            name,
            description: normalize_optional_text(req.description.clone()),
            state: req.state.unwrap_or_default(),
            team_id: team.id,
            start_date: req.start_date,
            expected_end_date: req.expected_end_date,
        };
        let project = ProjectsRepo::insert(conn, &new_project)?;
        tracing::info!(project_id = %project.id, team_id = %team.id, "Project created");
        Ok(ProjectInfo::new(project, TeamBasicInfo::from(&team)))
    }

    pub fn update(
        conn: &mut PgConnection,
        ctx: &RequestContext,
        project_id: Uuid,
        req: &UpdateProjectRequest,
    ) -> Result<ProjectInfo, AppError> {
        let existing = Self::find(conn, project_id)?;
        let current_team = TeamsService::find(conn, existing.team_id)?;
        ctx.ensure_can_manage_team(current_team.leader_id)?;

        // moving a project needs rights on the receiving team too
        let team = match req.team_id {
            Some(team_id) if team_id != existing.team_id => {
                let target = TeamsService::find(conn, team_id)?;
                ctx.ensure_can_manage_team(target.leader_id)?;
                target
            }
            _ => current_team,
        };

        let name = req.name.as_deref().map(validate_project_name).transpose()?;
        let start_date = req.start_date.unwrap_or(existing.start_date);
        let expected_end_date = req.expected_end_date.unwrap_or(existing.expected_end_date);
        validate_project_dates(start_date, expected_end_date)?;

        let changes = ProjectChangeset {
            name,
            description: normalize_patch_text(req.description.clone()),
            state: req.state,
            team_id: (team.id != existing.team_id).then_some(team.id),
            start_date: req.start_date,
            expected_end_date: req.expected_end_date,
            updated_at: Some(Utc::now()),
        };
        let project = ProjectsRepo::update(conn, project_id, &changes)?;
        tracing::info!(project_id = %project.id, updated_by = %ctx.user_id, "Project updated");
        Ok(ProjectInfo::new(project, TeamBasicInfo::from(&team)))
    }

    pub fn delete(conn: &mut PgConnection, ctx: &RequestContext, project_id: Uuid) -> Result<(), AppError> {
        let project = Self::find(conn, project_id)?;
        let team = TeamsService::find(conn, project.team_id)?;
        ctx.ensure_can_manage_team(team.leader_id)?;

        ProjectsRepo::delete(conn, project_id)?;
        tracing::info!(project_id = %project_id, deleted_by = %ctx.user_id, "Project deleted");
        Ok(())
    }

    fn find(conn: &mut PgConnection, project_id: Uuid) -> Result<Project, AppError> {
        ProjectsRepo::find_by_id(conn, project_id)?.ok_or_else(|| AppError::not_found("Project"))
    }

    fn with_teams(conn: &mut PgConnection, projects: Vec<Project>) -> Result<Vec<ProjectInfo>, AppError> {
        let team_ids: Vec<Uuid> = projects.iter().map(|p| p.team_id).collect();
        let teams: HashMap<Uuid, TeamBasicInfo> = TeamsRepo::find_many(conn, &team_ids)?
            .iter()
            .map(|team| (team.id, TeamBasicInfo::from(team)))
            .collect();

        projects
            .into_iter()
            .map(|project| {
                let team = teams
                    .get(&project.team_id)
                    .cloned()
                    .ok_or_else(|| AppError::internal(format!("Project {} has no team row", project.id)))?;
                Ok(ProjectInfo::new(project, team))
            })
            .collect()
    }
}
