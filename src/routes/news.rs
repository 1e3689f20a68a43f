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
    db::enums::NewsStatus,
    db::models::{
        api::ApiResponse,
        news::{CreateNewsRequest, NewsFilter, UpdateNewsRequest},
    },
    error::AppResult,
    middleware::auth::AuthUserInfo,
    services::NewsService,
    utils::ListQuery,
    validation::ValidatedJson,
};

pub async fn get_news_list(
    State(state): State<Arc<AppState>>,
    auth_info: AuthUserInfo,
    Query(query): Query<ListQuery>,
    Query(filter): Query<NewsFilter>,
) -> AppResult<impl IntoResponse> {
    let mut conn = state.db.get()?;
    let page = NewsService::list(&mut conn, &auth_info.ctx(), &query, &filter)?;

    Ok((StatusCode::OK, Json(ApiResponse::paginated(page, "News retrieved successfully"))))
}

pub async fn get_news(
    State(state): State<Arc<AppState>>,
    auth_info: AuthUserInfo,
    Path(news_id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let mut conn = state.db.get()?;
    let news = NewsService::get(&mut conn, &auth_info.ctx(), news_id)?;

    Ok((StatusCode::OK, Json(ApiResponse::success(news, "News retrieved successfully"))))
}

pub async fn create_news(
    State(state): State<Arc<AppState>>,
    auth_info: AuthUserInfo,
    ValidatedJson(payload): ValidatedJson<CreateNewsRequest>,
) -> AppResult<impl IntoResponse> {
    let mut conn = state.db.get()?;
    let news = NewsService::create(&mut conn, &auth_info.ctx(), &payload)?;

    Ok((StatusCode::CREATED, Json(ApiResponse::created(news, "News created successfully"))))
}

pub async fn update_news(
    State(state): State<Arc<AppState>>,
    auth_info: AuthUserInfo,
    Path(news_id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateNewsRequest>,
) -> AppResult<impl IntoResponse> {
    let mut conn = state.db.get()?;
    let news = NewsService::update(&mut conn, &auth_info.ctx(), news_id, &payload)?;

    Ok((StatusCode::OK, Json(ApiResponse::success(news, "News updated successfully"))))
}

pub async fn publish_news(
    State(state): State<Arc<AppState>>,
    auth_info: AuthUserInfo,
    Path(news_id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let mut conn = state.db.get()?;
    let news = NewsService::set_status(&mut conn, &auth_info.ctx(), news_id, NewsStatus::Published)?;

    Ok((StatusCode::OK, Json(ApiResponse::success(news, "News published"))))
}

pub async fn unpublish_news(
    State(state): State<Arc<AppState>>,
    auth_info: AuthUserInfo,
    Path(news_id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let mut conn = state.db.get()?;
    let news = NewsService::set_status(&mut conn, &auth_info.ctx(), news_id, NewsStatus::Draft)?;

    Ok((StatusCode::OK, Json(ApiResponse::success(news, "News moved back to draft"))))
}

pub async fn delete_news(
    State(state): State<Arc<AppState>>,
    auth_info: AuthUserInfo,
    Path(news_id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let mut conn = state.db.get()?;
    NewsService::delete(&mut conn, &auth_info.ctx(), news_id)?;

    Ok((StatusCode::OK, Json(ApiResponse::<()>::ok("News deleted successfully"))))
}
