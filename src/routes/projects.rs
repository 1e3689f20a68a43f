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
        api::ApiResponse,
        project::{CreateProjectRequest, ProjectFilter, UpdateProjectRequest},
    },
    error::AppResult,
    middleware::auth::AuthUserInfo,
    services::ProjectsService,
    utils::ListQuery,
    validation::ValidatedJson,
};

pub async fn get_projects(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
    Query(filter): Query<ProjectFilter>,
) -> AppResult<impl IntoResponse> {
    let mut conn = state.db.get()?;
    let page = ProjectsService::list(&mut conn, &query, &filter)?;

    Ok((StatusCode::OK, Json(ApiResponse::paginated(page, "Projects retrieved successfully"))))
}

pub async fn get_project(
    State(state): State<Arc<AppState>>,
    Path(project_id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let mut conn = state.db.get()?;
    let project = ProjectsService::get(&mut conn, project_id)?;

    Ok((StatusCode::OK, Json(ApiResponse::success(project, "Project retrieved successfully"))))
}

pub async fn create_project(
    State(state): State<Arc<AppState>>,
    auth_info: AuthUserInfo,
    ValidatedJson(payload): ValidatedJson<CreateProjectRequest>,
) -> AppResult<impl IntoResponse> {
    let mut conn = state.db.get()?;
    let project = ProjectsService::create(&mut conn, &auth_info.ctx(), &payload)?;

    Ok((StatusCode::CREATED, Json(ApiResponse::created(project, "Project created successfully"))))
}

pub async fn update_project(
    State(state): State<Arc<AppState>>,
    auth_info: AuthUserInfo,
    Path(project_id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateProjectRequest>,
) -> AppResult<impl IntoResponse> {
    let mut conn = state.db.get()?;
    let project = ProjectsService::update(&mut conn, &auth_info.ctx(), project_id, &payload)?;

    Ok((StatusCode::OK, Json(ApiResponse::success(project, "Project updated successfully"))))
}

pub async fn delete_project(
    State(state): State<Arc<AppState>>,
    auth_info: AuthUserInfo,
    Path(project_id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let mut conn = state.db.get()?;
    ProjectsService::delete(&mut conn, &auth_info.ctx(), project_id)?;

    Ok((StatusCode::OK, Json(ApiResponse::<()>::ok("Project deleted successfully"))))
}
