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
        publication::{CreatePublicationRequest, PublicationFilter, UpdatePublicationRequest},
    },
    error::AppResult,
    middleware::auth::AuthUserInfo,
    services::PublicationsService,
    utils::ListQuery,
    validation::ValidatedJson,
};

pub async fn get_publications(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
    Query(filter): Query<PublicationFilter>,
) -> AppResult<impl IntoResponse> {
    let mut conn = state.db.get()?;
    let page = PublicationsService::list(&mut conn, &query, &filter)?;

    Ok((StatusCode::OK, Json(ApiResponse::paginated(page, "Publications retrieved successfully"))))
}

pub async fn get_publication(
    State(state): State<Arc<AppState>>,
    Path(publication_id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let mut conn = state.db.get()?;
    let publication = PublicationsService::get(&mut conn, publication_id)?;

    Ok((StatusCode::OK, Json(ApiResponse::success(publication, "Publication retrieved successfully"))))
}

pub async fn create_publication(
    State(state): State<Arc<AppState>>,
    auth_info: AuthUserInfo,
    ValidatedJson(payload): ValidatedJson<CreatePublicationRequest>,
) -> AppResult<impl IntoResponse> {
    let mut conn = state.db.get()?;
    let publication = PublicationsService::create(&mut conn, &auth_info.ctx(), &payload)?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::created(publication, "Publication registered successfully")),
    ))
}

pub async fn update_publication(
    State(state): State<Arc<AppState>>,
    auth_info: AuthUserInfo,
    Path(publication_id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdatePublicationRequest>,
) -> AppResult<impl IntoResponse> {
    let mut conn = state.db.get()?;
    let publication = PublicationsService::update(&mut conn, &auth_info.ctx(), publication_id, &payload)?;

    Ok((StatusCode::OK, Json(ApiResponse::success(publication, "Publication updated successfully"))))
}

pub async fn delete_publication(
    State(state): State<Arc<AppState>>,
    auth_info: AuthUserInfo,
    Path(publication_id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let mut conn = state.db.get()?;
    PublicationsService::delete(&mut conn, &auth_info.ctx(), publication_id)?;

    Ok((StatusCode::OK, Json(ApiResponse::<()>::ok("Publication deleted successfully"))))
}
