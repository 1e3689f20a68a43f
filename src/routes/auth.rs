use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};
use std::sync::Arc;

use crate::{
    AppState,
    db::models::{
        api::ApiResponse,
        auth::{LoginRequest, RefreshTokenRequest, RegisterRequest},
        user::{ChangePasswordRequest, UpdateProfileRequest, UserInfo},
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUserInfo,
    services::AccountsService,
    validation::{ValidatedJson, parse_optional_json},
};

pub async fn register(
    State(state): State<Arc<AppState>>,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> AppResult<impl IntoResponse> {
    let mut conn = state.db.get()?;
    let user = AccountsService::register(
        &mut conn,
        state.auth_service.bcrypt_cost(),
        &state.avatars,
        &payload,
    )?;

    let response = ApiResponse::created(UserInfo::from(user), "User registered successfully");
    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<impl IntoResponse> {
    let mut conn = state.db.get()?;
    let login = AccountsService::login(&mut conn, &state.auth_service, &payload)?;

    Ok((StatusCode::OK, Json(ApiResponse::success(login, "Login successful"))))
}

pub async fn refresh_token(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RefreshTokenRequest>,
) -> AppResult<impl IntoResponse> {
    let claims = state.auth_service.verify_refresh_token(&payload.refresh_token)?;
    if state.token_blacklist.is_revoked(&claims.jti).await? {
        return Err(AppError::auth("Refresh token has been revoked"));
    }

    let mut conn = state.db.get()?;
    let refreshed = AccountsService::refresh(&mut conn, &state.auth_service, &claims)?;

    Ok((StatusCode::OK, Json(ApiResponse::success(refreshed, "Token refreshed"))))
}

/// Revokes the presented access token and, when sent, the refresh token too.
/// Nothing is revoked unless the whole request checks out.
pub async fn logout(
    State(state): State<Arc<AppState>>,
    auth_info: AuthUserInfo,
    body: Bytes,
) -> AppResult<impl IntoResponse> {
    let refresh_claims = match parse_optional_json::<RefreshTokenRequest>(&body)? {
        Some(payload) => {
            let claims = state.auth_service.verify_refresh_token(&payload.refresh_token)?;
            if claims.sub != auth_info.user.id {
                return Err(AppError::forbidden("Refresh token belongs to another user"));
            }
            Some(claims)
        }
        None => None,
    };

    if let Some(claims) = &refresh_claims {
        state
            .token_blacklist
            .revoke(&claims.jti, claims.remaining_lifetime())
            .await?;
    }
    state
        .token_blacklist
        .revoke(&auth_info.token_id, auth_info.token_remaining_lifetime())
        .await?;

    tracing::info!(
        user_id = %auth_info.user.id,
        refresh_revoked = refresh_claims.is_some(),
        "User logged out"
    );
    Ok((StatusCode::OK, Json(ApiResponse::<()>::ok("Logged out successfully"))))
}

pub async fn get_profile(
    State(state): State<Arc<AppState>>,
    auth_info: AuthUserInfo,
) -> AppResult<impl IntoResponse> {
    let mut conn = state.db.get()?;
    let profile = AccountsService::profile(&mut conn, auth_info.user)?;

    Ok((StatusCode::OK, Json(ApiResponse::success(profile, "Profile retrieved successfully"))))
}

pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    auth_info: AuthUserInfo,
    ValidatedJson(payload): ValidatedJson<UpdateProfileRequest>,
) -> AppResult<impl IntoResponse> {
    let mut conn = state.db.get()?;
    let profile = AccountsService::update_profile(&mut conn, &auth_info.ctx(), &state.avatars, &payload)?;

    Ok((StatusCode::OK, Json(ApiResponse::success(profile, "Profile updated successfully"))))
}

pub async fn change_password(
    State(state): State<Arc<AppState>>,
    auth_info: AuthUserInfo,
    ValidatedJson(payload): ValidatedJson<ChangePasswordRequest>,
) -> AppResult<impl IntoResponse> {
    let mut conn = state.db.get()?;
    AccountsService::change_password(
        &mut conn,
        &auth_info.ctx(),
        state.auth_service.bcrypt_cost(),
        &payload,
    )?;

    Ok((StatusCode::OK, Json(ApiResponse::<()>::ok("Password changed successfully"))))
}
