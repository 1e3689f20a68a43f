use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use std::sync::Arc;

use crate::{
    AppState, db::models::api::ApiResponse, error::AppResult, middleware::auth::AuthUserInfo,
    services::DashboardService,
};

pub async fn get_stats(
    State(state): State<Arc<AppState>>,
    auth_info: AuthUserInfo,
) -> AppResult<impl IntoResponse> {
    let mut conn = state.db.get()?;
    let stats = DashboardService::stats(&mut conn, &auth_info.ctx())?;

    Ok((StatusCode::OK, Json(ApiResponse::success(stats, "Dashboard statistics retrieved"))))
}
