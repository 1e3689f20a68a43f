use uuid::Uuid;

use crate::db::enums::UserRole;
use crate::db::repositories::NewsVisibility;
use crate::error::AppError;

/// The caller of a service operation. Every access rule of the lab lives here.
#[derive(Clone, Copy, Debug)]
pub struct RequestContext {
    pub user_id: Uuid,
    pub role: UserRole,
}

impl RequestContext {
    pub fn new(user_id: Uuid, role: UserRole) -> Self {
        Self { user_id, role }
    }

    pub fn is_lab_leader(&self) -> bool {
        self.role == UserRole::LabLeader
    }

    pub fn ensure_lab_leader(&self) -> Result<(), AppError> {
        if self.is_lab_leader() {
            Ok(())
        } else {
            Err(AppError::forbidden("Only the lab leader can perform this action"))
        }
    }

    /// Lab leaders manage every team; team leaders manage the teams they lead.
    pub fn can_manage_team(&self, team_leader_id: Uuid) -> bool {
        self.is_lab_leader() || self.user_id == team_leader_id
    }

    pub fn ensure_can_manage_team(&self, team_leader_id: Uuid) -> Result<(), AppError> {
        if self.can_manage_team(team_leader_id) {
            Ok(())
        } else {
            Err(AppError::forbidden("Only the lab leader or the team's leader can manage this team"))
        }
    }

    pub fn can_edit_authored(&self, author_id: Uuid) -> bool {
        self.is_lab_leader() || self.user_id == author_id
    }

    pub fn ensure_author_or_lab_leader(&self, author_id: Uuid) -> Result<(), AppError> {
        if self.can_edit_authored(author_id) {
            Ok(())
        } else {
            Err(AppError::forbidden("Only the author or the lab leader can modify this item"))
        }
    }

    pub fn can_create_news(&self) -> bool {
        matches!(self.role, UserRole::LabLeader | UserRole::TeamLeader)
    }

    pub fn ensure_can_create_news(&self) -> Result<(), AppError> {
        if self.can_create_news() {
            Ok(())
        } else {
            Err(AppError::forbidden("Team members cannot post news"))
        }
    }

    pub fn news_visibility(&self) -> NewsVisibility {
        if self.is_lab_leader() {
            NewsVisibility::All
        } else {
            NewsVisibility::PublishedOrAuthoredBy(self.user_id)
        }
    }
}
