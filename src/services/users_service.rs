use bcrypt::hash;
use chrono::Utc;
use diesel::prelude::*;
use uuid::Uuid;

use crate::{
    db::enums::UserRole,
    db::models::{
        api::{Page, error_codes},
        user::{
            CreateUserRequest, NewUser, UpdateUserRequest, UserChangeset, UserFilter, UserInfo,
            UserProfile, UserSortKey,
        },
    },
    db::repositories::{TeamsRepo, UsersRepo},
    error::AppError,
    services::{
        accounts_service::{AccountsService, email_conflict, map_user_write_error},
        context::RequestContext,
    },
    utils::{AvatarService, ListQuery},
    validation::{
        normalize_optional_text, normalize_patch_text,
        user::{normalize_email, validate_name},
    },
};

pub struct UsersService;

impl UsersService {
    pub fn list(
        conn: &mut PgConnection,
        query: &ListQuery,
        filter: &UserFilter,
    ) -> Result<Page<UserInfo>, AppError> {
        let params = query.resolve::<UserSortKey>()?;
        let (users, total_count) = UsersRepo::list(conn, &params, filter)?;
        Ok(Page {
            items: users.into_iter().map(UserInfo::from).collect(),
            total_count,
            pagination: params.pagination(total_count),
        })
    }

    pub fn get(conn: &mut PgConnection, user_id: Uuid) -> Result<UserProfile, AppError> {
        let user = UsersRepo::find_by_id(conn, user_id)?.ok_or_else(|| AppError::not_found("User"))?;
        AccountsService::profile(conn, user)
    }

    pub fn create(
        conn: &mut PgConnection,
        ctx: &RequestContext,
        bcrypt_cost: u32,
        avatars: &AvatarService,
        req: &CreateUserRequest,
    ) -> Result<UserInfo, AppError> {
        ctx.ensure_lab_leader()?;

        let name = validate_name(&req.name)?;
        let email = normalize_email(&req.email)?;

        if UsersRepo::email_taken(conn, &email, None)? {
            return Err(email_conflict());
        }

        let image = normalize_optional_text(req.image.clone())
            .unwrap_or_else(|| avatars.placeholder_for_email(&email));

        let new_user = NewUser {
            name,
            email,
            password_hash: hash(&req.password, bcrypt_cost)?,
            role: req.role,
            image: Some(image),
        };
        let user = UsersRepo::insert(conn, &new_user).map_err(map_user_write_error)?;
        tracing::info!(user_id = %user.id, role = %user.role, created_by = %ctx.user_id, "User created");
        Ok(UserInfo::from(user))
    }

    pub fn update(
        conn: &mut PgConnection,
        ctx: &RequestContext,
        avatars: &AvatarService,
        user_id: Uuid,
        req: &UpdateUserRequest,
    ) -> Result<UserInfo, AppError> {
        ctx.ensure_lab_leader()?;

        let current = UsersRepo::find_by_id(conn, user_id)?.ok_or_else(|| AppError::not_found("User"))?;

        let name = req.name.as_deref().map(validate_name).transpose()?;
        let email = req.email.as_deref().map(normalize_email).transpose()?;
        if let Some(email) = email.as_deref() {
            if UsersRepo::email_taken(conn, email, Some(user_id))? {
                return Err(email_conflict());
            }
        }

        if let Some(role) = req.role {
            if role == UserRole::TeamMember
                && current.role != UserRole::TeamMember
                && TeamsRepo::is_leader_of_any(conn, user_id)?
            {
                return Err(AppError::conflict_with_code(
                    "User leads a team and cannot be demoted to team member",
                    Some("role".to_string()),
                    error_codes::TEAM_LEADER_IN_USE,
                ));
            }
            if user_id == ctx.user_id && role != UserRole::LabLeader {
                return Err(AppError::forbidden("You cannot change your own lab leader role"));
            }
        }

        let image = normalize_patch_text(req.image.clone()).map(|image| {
            let email = email.as_deref().unwrap_or(&current.email);
            Some(image.unwrap_or_else(|| avatars.placeholder_for_email(email)))
        });

        let changes = UserChangeset {
            name,
            email,
            role: req.role,
            image,
            updated_at: Some(Utc::now()),
            ..Default::default()
        };
        let user = UsersRepo::update(conn, user_id, &changes).map_err(map_user_write_error)?;
        tracing::info!(user_id = %user.id, updated_by = %ctx.user_id, "User updated");
        Ok(UserInfo::from(user))
    }

    pub fn delete(conn: &mut PgConnection, ctx: &RequestContext, user_id: Uuid) -> Result<(), AppError> {
        ctx.ensure_lab_leader()?;

        if user_id == ctx.user_id {
            return Err(AppError::forbidden("You cannot delete your own account"));
        }
        if UsersRepo::find_by_id(conn, user_id)?.is_none() {
            return Err(AppError::not_found("User"));
        }
        if TeamsRepo::is_leader_of_any(conn, user_id)? {
            return Err(AppError::conflict_with_code(
                "User leads a team; assign a new leader first",
                None,
                error_codes::TEAM_LEADER_IN_USE,
            ));
        }

        UsersRepo::delete(conn, user_id)?;
        tracing::info!(user_id = %user_id, deleted_by = %ctx.user_id, "User deleted");
        Ok(())
    }
}
