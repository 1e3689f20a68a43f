use crate::{
    AppState,
    config::AuthConfig,
    db::{enums::UserRole, models::user::User, repositories::UsersRepo},
    error::AppError,
    services::context::RequestContext,
};
use axum::{
    async_trait,
    extract::{FromRequestParts, State},
    http::{HeaderMap, Request, request::Parts},
    middleware::Next,
    response::Response,
};
use headers::{Authorization, HeaderMapExt, authorization::Bearer};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: uuid::Uuid, // user_id
    pub email: String,
    pub role: UserRole,
    pub typ: TokenKind,
    pub exp: u64,    // expiration time
    pub iat: u64,    // issued at
    pub jti: String, // JWT ID
}

impl Claims {
    /// Seconds until expiry, zero once expired.
    pub fn remaining_lifetime(&self) -> u64 {
        self.exp.saturating_sub(now_secs())
    }
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[derive(Clone)]
pub struct AuthService {
    config: AuthConfig,
}

impl AuthService {
    pub fn new(config: AuthConfig) -> Self {
        Self { config }
    }

    pub fn access_token_ttl(&self) -> u64 {
        self.config.access_token_expires_in
    }

    pub fn bcrypt_cost(&self) -> u32 {
        self.config.bcrypt_cost
    }

    fn issue(&self, user: &User, typ: TokenKind, ttl: u64) -> Result<String, jsonwebtoken::errors::Error> {
        let now = now_secs();
        let claims = Claims {
            sub: user.id,
            email: user.email.clone(),
            role: user.role,
            typ,
            exp: now + ttl,
            iat: now,
            jti: uuid::Uuid::new_v4().to_string(),
        };
        self.encode_claims(&claims)
    }

    fn encode_claims(&self, claims: &Claims) -> Result<String, jsonwebtoken::errors::Error> {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(self.config.jwt_secret.as_ref()),
        )
    }

    pub fn generate_access_token(&self, user: &User) -> Result<String, jsonwebtoken::errors::Error> {
        self.issue(user, TokenKind::Access, self.config.access_token_expires_in)
    }

    pub fn generate_refresh_token(&self, user: &User) -> Result<String, jsonwebtoken::errors::Error> {
        self.issue(user, TokenKind::Refresh, self.config.refresh_token_expires_in)
    }

    fn decode_kind(&self, token: &str, expected: TokenKind) -> Result<Claims, AppError> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret.as_ref()),
            &Validation::default(),
        )?;
        if token_data.claims.typ != expected {
            return Err(AppError::auth("Wrong token type"));
        }
        Ok(token_data.claims)
    }

    pub fn verify_token(&self, token: &str) -> Result<Claims, AppError> {
        self.decode_kind(token, TokenKind::Access)
    }

    pub fn verify_refresh_token(&self, token: &str) -> Result<Claims, AppError> {
        self.decode_kind(token, TokenKind::Refresh)
    }
}

/// The authenticated caller, placed in request extensions by [`auth_middleware`].
#[derive(Clone, Debug)]
pub struct AuthUserInfo {
    pub user: User,
    pub token_id: String,
    pub token_expires_at: u64,
}

impl AuthUserInfo {
    pub fn ctx(&self) -> RequestContext {
        RequestContext {
            user_id: self.user.id,
            role: self.user.role,
        }
    }

    pub fn token_remaining_lifetime(&self) -> u64 {
        self.token_expires_at.saturating_sub(now_secs())
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUserInfo
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUserInfo>()
            .cloned()
            .ok_or_else(|| AppError::auth("Unauthorized"))
    }
}

pub fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let Authorization(bearer) = headers.typed_get::<Authorization<Bearer>>()?;
    let token = bearer.token().trim();
    if token.is_empty() { None } else { Some(token.to_string()) }
}

pub async fn auth_middleware<B>(
    State(state): State<Arc<AppState>>,
    mut request: Request<B>,
    next: Next<B>,
) -> Result<Response, AppError> {
    let token = bearer_token(request.headers())
        .ok_or_else(|| AppError::auth("Missing bearer token"))?;

    let claims = state.auth_service.verify_token(&token)?;

    if state.token_blacklist.is_revoked(&claims.jti).await? {
        return Err(AppError::auth("Token has been revoked"));
    }

    let user = {
        let mut conn = state.db.get()?;
        UsersRepo::find_by_id(&mut conn, claims.sub)?
            .ok_or_else(|| AppError::auth("User no longer exists"))?
    };

    request.extensions_mut().insert(AuthUserInfo {
        user,
        token_id: claims.jti,
        token_expires_at: claims.exp,
    });

    Ok(next.run(request).await)
}

/// Rejects callers whose role is not in `allowed`. Must run after [`auth_middleware`].
pub async fn require_role<B>(
    State(allowed): State<&'static [UserRole]>,
    request: Request<B>,
    next: Next<B>,
) -> Result<Response, AppError> {
    let role = request
        .extensions()
        .get::<AuthUserInfo>()
        .map(|info| info.user.role)
        .ok_or_else(|| AppError::auth("Unauthorized"))?;

    if !allowed.contains(&role) {
        tracing::warn!(role = %role, "Role not allowed for route");
        return Err(AppError::forbidden("Your role does not allow this action"));
    }

    Ok(next.run(request).await)
}
