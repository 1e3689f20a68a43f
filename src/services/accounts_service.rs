use bcrypt::{hash, verify};
use chrono::Utc;
use diesel::prelude::*;

use crate::{
    db::enums::UserRole,
    db::models::{
        api::error_codes,
        auth::{LoginRequest, LoginResponse, RefreshTokenResponse, RegisterRequest},
        user::{
            ChangePasswordRequest, MembershipInfo, NewUser, UpdateProfileRequest, User,
            UserChangeset, UserInfo, UserProfile,
        },
    },
    db::repositories::{TeamsRepo, UsersRepo},
    error::AppError,
    middleware::auth::{AuthService, Claims},
    services::context::RequestContext,
    utils::AvatarService,
    validation::{
        normalize_patch_text,
        user::{normalize_email, validate_name},
    },
};

/// Registration, login and self-service account operations.
pub struct AccountsService;

impl AccountsService {
    /// Self-registration always yields a plain team member.
    pub fn register(
        conn: &mut PgConnection,
        bcrypt_cost: u32,
        avatars: &AvatarService,
        req: &RegisterRequest,
    ) -> Result<User, AppError> {
        let name = validate_name(&req.name)?;
        let email = normalize_email(&req.email)?;

        if UsersRepo::email_taken(conn, &email, None)? {
            return Err(email_conflict());
        }

        let new_user = NewUser {
            name,
            image: Some(avatars.placeholder_for_email(&email)),
            email,
            password_hash: hash(&req.password, bcrypt_cost)?,
            role: UserRole::TeamMember,
        };
        let user = UsersRepo::insert(conn, &new_user).map_err(map_user_write_error)?;
        tracing::info!(user_id = %user.id, "User registered");
        Ok(user)
    }

    pub fn login(
        conn: &mut PgConnection,
        auth: &AuthService,
        req: &LoginRequest,
    ) -> Result<LoginResponse, AppError> {
        // unknown email and wrong password answer the same way
        let user = UsersRepo::find_by_email(conn, &req.email)?
            .ok_or_else(|| AppError::auth("Invalid email or password"))?;

        if !verify(&req.password, &user.password_hash)? {
            tracing::warn!(user_id = %user.id, "Failed login attempt");
            return Err(AppError::auth("Invalid email or password"));
        }

        let access_token = auth.generate_access_token(&user)?;
        let refresh_token = auth.generate_refresh_token(&user)?;
        tracing::info!(user_id = %user.id, "User logged in");

        Ok(LoginResponse {
            access_token,
            refresh_token,
            token_type: "Bearer".to_string(),
            expires_in: auth.access_token_ttl(),
            user: UserInfo::from(user),
        })
    }

    /// Issues a new access token for verified refresh claims. Revocation is
    /// checked by the caller.
    pub fn refresh(
        conn: &mut PgConnection,
        auth: &AuthService,
        claims: &Claims,
    ) -> Result<RefreshTokenResponse, AppError> {
        let user = UsersRepo::find_by_id(conn, claims.sub)?
            .ok_or_else(|| AppError::auth("User no longer exists"))?;

        Ok(RefreshTokenResponse {
            access_token: auth.generate_access_token(&user)?,
            token_type: "Bearer".to_string(),
            expires_in: auth.access_token_ttl(),
        })
    }

    pub fn profile(conn: &mut PgConnection, user: User) -> Result<UserProfile, AppError> {
        let teams = TeamsRepo::memberships_of(conn, user.id)?
            .into_iter()
            .map(|(membership, team)| MembershipInfo {
                team_id: team.id,
                is_leader: team.leader_id == user.id,
                team_name: team.name,
                acronym: team.acronym,
                joined_at: membership.joined_at,
            })
            .collect();

        Ok(UserProfile {
            user: UserInfo::from(user),
            teams,
        })
    }

    pub fn update_profile(
        conn: &mut PgConnection,
        ctx: &RequestContext,
        avatars: &AvatarService,
        req: &UpdateProfileRequest,
    ) -> Result<UserProfile, AppError> {
        let current = UsersRepo::find_by_id(conn, ctx.user_id)?
            .ok_or_else(|| AppError::not_found("User"))?;

        let name = req.name.as_deref().map(validate_name).transpose()?;
        let email = req.email.as_deref().map(normalize_email).transpose()?;
        if let Some(email) = email.as_deref() {
            if UsersRepo::email_taken(conn, email, Some(ctx.user_id))? {
                return Err(email_conflict());
            }
        }

        // clearing the picture falls back to the generated placeholder
        let image = normalize_patch_text(req.image.clone()).map(|image| {
            let email = email.as_deref().unwrap_or(&current.email);
            Some(image.unwrap_or_else(|| avatars.placeholder_for_email(email)))
        });

        if name.is_none() && email.is_none() && image.is_none() {
            return Self::profile(conn, current);
        }

        let changes = UserChangeset {
            name,
            email,
            image,
            updated_at: Some(Utc::now()),
            ..Default::default()
        };
        let user = UsersRepo::update(conn, ctx.user_id, &changes).map_err(map_user_write_error)?;
        tracing::info!(user_id = %user.id, "Profile updated");
        Self::profile(conn, user)
    }

    pub fn change_password(
        conn: &mut PgConnection,
        ctx: &RequestContext,
        bcrypt_cost: u32,
        req: &ChangePasswordRequest,
    ) -> Result<(), AppError> {
        let user = UsersRepo::find_by_id(conn, ctx.user_id)?
            .ok_or_else(|| AppError::not_found("User"))?;

        if !verify(&req.current_password, &user.password_hash)? {
            return Err(AppError::validation_field(
                "current_password",
                "Current password is incorrect",
            ));
        }

        let changes = UserChangeset {
            password_hash: Some(hash(&req.new_password, bcrypt_cost)?),
            updated_at: Some(Utc::now()),
            ..Default::default()
        };
        UsersRepo::update(conn, ctx.user_id, &changes)?;
        tracing::info!(user_id = %ctx.user_id, "Password changed");
        Ok(())
    }
}

pub(crate) fn email_conflict() -> AppError {
    AppError::conflict_with_code(
        "Email address already exists",
        Some("email".to_string()),
        error_codes::USER_EMAIL_EXISTS,
    )
}

/// A concurrent insert can still hit the unique index after the pre-check.
pub(crate) fn map_user_write_error(err: diesel::result::Error) -> AppError {
    match crate::error::unique_violation_constraint(&err).as_deref() {
        Some("users_email_key") => email_conflict(),
        _ => AppError::Database(err),
    }
}
