use lab_backend::{
    db::models::team::{CreateTeamRequest, UpdateTeamRequest},
    validation::team::{normalize_acronym, validate_team_name},
};
use uuid::Uuid;
use validator::Validate;

#[test]
fn test_acronym_normalization() {
    assert_eq!(normalize_acronym(" ml ").unwrap(), "ML");
    assert_eq!(normalize_acronym("bio-inf_2").unwrap(), "BIO-INF_2");
    assert!(normalize_acronym("").is_err());
    assert!(normalize_acronym("x").is_err());
    assert!(normalize_acronym("ELEVENCHARS").is_err());
    assert!(normalize_acronym("A B").is_err());
    assert!(normalize_acronym("AI&ML").is_err());
}

#[test]
fn test_team_name_rules() {
    assert_eq!(validate_team_name(" Robotics ").unwrap(), "Robotics");
    assert!(validate_team_name("  ").is_err());
    assert!(validate_team_name(&"n".repeat(121)).is_err());
}

#[test]
fn test_create_team_request_requires_leader() {
    let missing_leader = serde_json::from_value::<CreateTeamRequest>(serde_json::json!({
        "name": "Robotics",
        "acronym": "ROB"
    }));
    assert!(missing_leader.is_err());

    let leader = Uuid::new_v4();
    let req: CreateTeamRequest = serde_json::from_value(serde_json::json!({
        "name": "Robotics",
        "acronym": "ROB",
        "leader_id": leader
    }))
    .unwrap();
    assert_eq!(req.leader_id, leader);
    assert!(req.validate().is_ok());
}

#[test]
fn test_update_team_request_emptiness() {
    assert!(UpdateTeamRequest::default().is_empty());

    let req: UpdateTeamRequest =
        serde_json::from_value(serde_json::json!({ "description": null })).unwrap();
    assert!(!req.is_empty());
    assert_eq!(req.description, Some(None));

    let req: UpdateTeamRequest = serde_json::from_value(serde_json::json!({ "name": "" })).unwrap();
    assert!(req.validate().is_err());
}
