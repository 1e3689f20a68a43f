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
        user::{CreateUserRequest, UpdateUserRequest, UserFilter},
    },
    error::AppResult,
    middleware::auth::AuthUserInfo,
    services::UsersService,
    utils::ListQuery,
    validation::ValidatedJson,
};

pub async fn list_users(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
    Query(filter): Query<UserFilter>,
) -> AppResult<impl IntoResponse> {
    let mut conn = state.db.get()?;
    let page = UsersService::list(&mut conn, &query, &filter)?;

    Ok((StatusCode::OK, Json(ApiResponse::paginated(page, "Users retrieved successfully"))))
}

pub async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let mut conn = state.db.get()?;
    let user = UsersService::get(&mut conn, user_id)?;

    Ok((StatusCode::OK, Json(ApiResponse::success(user, "User retrieved successfully"))))
}

pub async fn create_user(
    State(state): State<Arc<AppState>>,
    auth_info: AuthUserInfo,
    ValidatedJson(payload): ValidatedJson<CreateUserRequest>,
) -> AppResult<impl IntoResponse> {
    let mut conn = state.db.get()?;
    let user = UsersService::create(
        &mut conn,
        &auth_info.ctx(),
        state.auth_service.bcrypt_cost(),
        &state.avatars,
        &payload,
    )?;

    Ok((StatusCode::CREATED, Json(ApiResponse::created(user, "User created successfully"))))
}

pub async fn update_user(
    State(state): State<Arc<AppState>>,
    auth_info: AuthUserInfo,
    Path(user_id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateUserRequest>,
) -> AppResult<impl IntoResponse> {
    let mut conn = state.db.get()?;
    let user = UsersService::update(&mut conn, &auth_info.ctx(), &state.avatars, user_id, &payload)?;

    Ok((StatusCode::OK, Json(ApiResponse::success(user, "User updated successfully"))))
}

pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    auth_info: AuthUserInfo,
    Path(user_id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let mut conn = state.db.get()?;
    UsersService::delete(&mut conn, &auth_info.ctx(), user_id)?;

    Ok((StatusCode::OK, Json(ApiResponse::<()>::ok("User deleted successfully"))))
}
