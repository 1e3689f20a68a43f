use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use diesel::RunQueryDsl;
use serde::Serialize;
use std::sync::Arc;

use crate::{AppState, db::models::api::ApiResponse};

#[derive(Serialize)]
pub struct HealthStatus {
    pub database: bool,
    pub redis: bool,
}

impl HealthStatus {
    pub fn healthy(&self) -> bool {
        self.database && self.redis
    }
}

pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let database = match state.db.get() {
        Ok(mut conn) => diesel::sql_query("SELECT 1").execute(&mut conn).is_ok(),
        Err(e) => {
            tracing::warn!("Health check could not get a connection: {}", e);
            false
        }
    };
    let redis = state.token_blacklist.health_check().await.unwrap_or(false);

    let status = HealthStatus { database, redis };
    if status.healthy() {
        (StatusCode::OK, Json(ApiResponse::success(status, "OK")))
    } else {
        let mut response = ApiResponse::success(status, "Degraded");
        response.success = false;
        response.code = StatusCode::SERVICE_UNAVAILABLE.as_u16();
        (StatusCode::SERVICE_UNAVAILABLE, Json(response))
    }
}
