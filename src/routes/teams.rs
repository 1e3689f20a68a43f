use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    AppState,
    db::models::{
        api::{ApiResponse, ResponseMeta},
        team::{AddTeamMemberRequest, CreateTeamRequest, UpdateTeamRequest},
    },
    error::AppResult,
    middleware::auth::AuthUserInfo,
    services::{TeamMembersService, TeamsService},
    utils::ListQuery,
    validation::ValidatedJson,
};

pub async fn list_teams(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> AppResult<impl IntoResponse> {
    let mut conn = state.db.get()?;
    let page = TeamsService::list(&mut conn, &query)?;

    Ok((StatusCode::OK, Json(ApiResponse::paginated(page, "Teams retrieved successfully"))))
}

pub async fn get_team(
    State(state): State<Arc<AppState>>,
    Path(team_id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let mut conn = state.db.get()?;
    let team = TeamsService::get(&mut conn, team_id)?;

    Ok((StatusCode::OK, Json(ApiResponse::success(team, "Team retrieved successfully"))))
}

pub async fn create_team(
    State(state): State<Arc<AppState>>,
    auth_info: AuthUserInfo,
    ValidatedJson(payload): ValidatedJson<CreateTeamRequest>,
) -> AppResult<impl IntoResponse> {
    let mut conn = state.db.get()?;
    let team = TeamsService::create(&mut conn, &auth_info.ctx(), &payload)?;

    Ok((StatusCode::CREATED, Json(ApiResponse::created(team, "Team created successfully"))))
}

pub async fn update_team(
    State(state): State<Arc<AppState>>,
    auth_info: AuthUserInfo,
    Path(team_id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateTeamRequest>,
) -> AppResult<impl IntoResponse> {
    let mut conn = state.db.get()?;
    let team = TeamsService::update(&mut conn, &auth_info.ctx(), team_id, &payload)?;

    Ok((StatusCode::OK, Json(ApiResponse::success(team, "Team updated successfully"))))
}

pub async fn delete_team(
    State(state): State<Arc<AppState>>,
    auth_info: AuthUserInfo,
    Path(team_id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let mut conn = state.db.get()?;
    TeamsService::delete(&mut conn, &auth_info.ctx(), team_id)?;

    Ok((StatusCode::OK, Json(ApiResponse::<()>::ok("Team deleted successfully"))))
}

pub async fn get_team_members(
    State(state): State<Arc<AppState>>,
    Path(team_id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let mut conn = state.db.get()?;
    let members = TeamMembersService::list(&mut conn, team_id)?;

    let meta = ResponseMeta {
        total_count: Some(members.len() as i64),
        ..Default::default()
    };
    Ok((
        StatusCode::OK,
        Json(ApiResponse::success_with_meta(members, "Team members retrieved successfully", meta)),
    ))
}

pub async fn add_team_member(
    State(state): State<Arc<AppState>>,
    auth_info: AuthUserInfo,
    Path(team_id): Path<Uuid>,
    Json(payload): Json<AddTeamMemberRequest>,
) -> AppResult<impl IntoResponse> {
    let mut conn = state.db.get()?;
    let member = TeamMembersService::add(&mut conn, &auth_info.ctx(), team_id, &payload)?;

    Ok((StatusCode::CREATED, Json(ApiResponse::created(member, "Member added successfully"))))
}

pub async fn remove_team_member(
    State(state): State<Arc<AppState>>,
    auth_info: AuthUserInfo,
    Path((team_id, user_id)): Path<(Uuid, Uuid)>,
) -> AppResult<impl IntoResponse> {
    let mut conn = state.db.get()?;
    TeamMembersService::remove(&mut conn, &auth_info.ctx(), team_id, user_id)?;

    Ok((StatusCode::OK, Json(ApiResponse::<()>::ok("Member removed successfully"))))
}

pub async fn get_user_teams(
    State(state): State<Arc<AppState>>,
    auth_info: AuthUserInfo,
) -> AppResult<impl IntoResponse> {
    let mut conn = state.db.get()?;
    let teams = TeamsService::for_user(&mut conn, &auth_info.ctx())?;

    let meta = ResponseMeta {
        total_count: Some(teams.len() as i64),
        ..Default::default()
    };
    Ok((
        StatusCode::OK,
        Json(ApiResponse::success_with_meta(teams, "User teams retrieved successfully", meta)),
    ))
}
