use chrono::NaiveDate;
use lab_backend::{
    db::{enums::ProjectState, models::project::{CreateProjectRequest, UpdateProjectRequest}},
    validation::project::{validate_project_dates, validate_project_name},
};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

#[test]
fn test_project_state_wire_names() {
    let names: Vec<&str> = ProjectState::ALL.iter().map(|s| s.as_str()).collect();
    assert_eq!(names, vec!["PLANNING", "IN_PROGRESS", "COMPLETED", "ON_HOLD", "CANCELLED"]);
    assert_eq!(ProjectState::default(), ProjectState::Planning);
    assert_eq!(
        serde_json::to_value(ProjectState::OnHold).unwrap(),
        serde_json::json!("ON_HOLD")
    );
}

#[test]
fn test_project_dates_and_name() {
    assert!(validate_project_dates(Some(d(2025, 3, 1)), Some(d(2026, 3, 1))).is_ok());
    assert!(validate_project_dates(Some(d(2025, 3, 1)), Some(d(2025, 2, 28))).is_err());
    assert!(validate_project_dates(None, Some(d(2025, 2, 28))).is_ok());
    assert!(validate_project_name("").is_err());
    assert_eq!(validate_project_name(" Atlas ").unwrap(), "Atlas");
}

#[test]
fn test_project_requests_parse() {
    let req: CreateProjectRequest = serde_json::from_value(serde_json::json!({
        "name": "Atlas",
        "team_id": "6f1c1f52-3f1e-4c8e-9d76-3a4a1b0d7d11",
        "state": "IN_PROGRESS",
        "start_date": "2025-01-15"
    }))
    .unwrap();
    assert_eq!(req.state, Some(ProjectState::InProgress));
    assert_eq!(req.start_date, Some(d(2025, 1, 15)));
    assert!(req.expected_end_date.is_none());

    let patch: UpdateProjectRequest =
        serde_json::from_value(serde_json::json!({ "expected_end_date": null })).unwrap();
    assert_eq!(patch.expected_end_date, Some(None));
    assert!(patch.start_date.is_none());

    let bad_state = serde_json::from_value::<UpdateProjectRequest>(serde_json::json!({
        "state": "ARCHIVED"
    }));
    assert!(bad_state.is_err());
}
