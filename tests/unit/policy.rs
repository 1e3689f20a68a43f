use lab_backend::{
    db::{enums::UserRole, repositories::NewsVisibility},
    error::AppError,
    services::RequestContext,
};
use uuid::Uuid;

fn ctx(role: UserRole) -> RequestContext {
    RequestContext::new(Uuid::new_v4(), role)
}

#[test]
fn test_lab_leader_manages_everything() {
    let lab = ctx(UserRole::LabLeader);
    let someone_else = Uuid::new_v4();
    assert!(lab.ensure_lab_leader().is_ok());
    assert!(lab.can_manage_team(someone_else));
    assert!(lab.can_edit_authored(someone_else));
    assert!(lab.can_create_news());
    assert!(matches!(lab.news_visibility(), NewsVisibility::All));
}

#[test]
fn test_team_leader_manages_only_own_team() {
    let leader = ctx(UserRole::TeamLeader);
    assert!(leader.can_manage_team(leader.user_id));
    assert!(!leader.can_manage_team(Uuid::new_v4()));
    assert!(matches!(
        leader.ensure_can_manage_team(Uuid::new_v4()),
        Err(AppError::Forbidden { .. })
    ));
    assert!(matches!(leader.ensure_lab_leader(), Err(AppError::Forbidden { .. })));
    assert!(leader.ensure_can_create_news().is_ok());
}

#[test]
fn test_team_member_limits() {
    let member = ctx(UserRole::TeamMember);
    assert!(!member.can_create_news());
    assert!(member.ensure_can_create_news().is_err());
    assert!(member.ensure_author_or_lab_leader(member.user_id).is_ok());
    assert!(member.ensure_author_or_lab_leader(Uuid::new_v4()).is_err());
    match member.news_visibility() {
        NewsVisibility::PublishedOrAuthoredBy(id) => assert_eq!(id, member.user_id),
        NewsVisibility::All => panic!("members must not see other people's drafts"),
    }
}
