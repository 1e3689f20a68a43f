use bcrypt::hash;
use chrono::Utc;
use diesel::prelude::*;
use uuid::Uuid;

use crate::{
    db::enums::UserRole,
    db::models::user::{NewUser, User},
    db::repositories::UsersRepo,
    error::AppError,
    utils::AvatarService,
    validation::user::{normalize_email, validate_name, validate_password},
};

#[derive(Debug, PartialEq)]
pub enum LabLeaderOutcome {
    Created(Uuid),
    /// An account with that email exists; nothing was written.
    AlreadyExists { user_id: Uuid, role: UserRole },
    WouldCreate { email: String },
}

/// One pending image change.
#[derive(Debug, Clone, PartialEq)]
pub struct AvatarChange {
    pub user_id: Uuid,
    pub email: String,
    pub old_image: Option<String>,
    pub new_image: String,
}

/// Users whose picture should change. With `only_missing`, users without an
/// image get their deterministic placeholder; otherwise every user gets a
/// fresh one salted with `salt`.
pub fn plan_avatar_changes(
    users: &[User],
    avatars: &AvatarService,
    only_missing: bool,
    salt: &str,
) -> Vec<AvatarChange> {
    users
        .iter()
        .filter(|user| {
            !only_missing || user.image.as_deref().map(str::trim).unwrap_or("").is_empty()
        })
        .map(|user| AvatarChange {
            user_id: user.id,
            email: user.email.clone(),
            old_image: user.image.clone(),
            new_image: if only_missing {
                avatars.placeholder_for_email(&user.email)
            } else {
                avatars.reassigned_for_email(&user.email, salt)
            },
        })
        .collect()
}

pub struct SeedService;

impl SeedService {
    pub fn ensure_lab_leader(
        conn: &mut PgConnection,
        bcrypt_cost: u32,
        avatars: &AvatarService,
        name: &str,
        email: &str,
        password: &str,
        dry_run: bool,
    ) -> Result<LabLeaderOutcome, AppError> {
        let name = validate_name(name)?;
        let email = normalize_email(email)?;
        validate_password(password)?;

        if let Some(existing) = UsersRepo::find_by_email(conn, &email)? {
            return Ok(LabLeaderOutcome::AlreadyExists {
                user_id: existing.id,
                role: existing.role,
            });
        }
        if dry_run {
            return Ok(LabLeaderOutcome::WouldCreate { email });
        }

        let new_user = NewUser {
            name,
            image: Some(avatars.placeholder_for_email(&email)),
            email,
            password_hash: hash(password, bcrypt_cost)?,
            role: UserRole::LabLeader,
        };
        let user = UsersRepo::insert(conn, &new_user)?;
        tracing::info!(user_id = %user.id, "Lab leader account created");
        Ok(LabLeaderOutcome::Created(user.id))
    }

    /// Applies (or with `dry_run`, only computes) placeholder reassignment.
    pub fn reassign_avatars(
        conn: &mut PgConnection,
        avatars: &AvatarService,
        only_missing: bool,
        dry_run: bool,
    ) -> Result<Vec<AvatarChange>, AppError> {
        let users = UsersRepo::all(conn)?;
        let salt = Utc::now().timestamp_millis().to_string();
        let changes = plan_avatar_changes(&users, avatars, only_missing, &salt);

        if !dry_run {
            conn.transaction::<_, diesel::result::Error, _>(|conn| {
                for change in &changes {
                    UsersRepo::set_image(conn, change.user_id, &change.new_image)?;
                }
                Ok(())
            })?;
            tracing::info!(updated = changes.len(), only_missing, "Avatars reassigned");
        }
        Ok(changes)
    }
}
