use chrono::{Duration, TimeZone, Utc};
use lab_backend::{
    db::{enums::NewsStatus, models::news::CreateNewsRequest},
    services::news_service::resolve_publish_date,
    validation::news::{validate_category, validate_create_news},
};
use validator::Validate;

#[test]
fn test_publish_date_resolution() {
    let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
    let scheduled = now - Duration::days(2);

    assert_eq!(resolve_publish_date(NewsStatus::Published, None, now), Some(now));
    assert_eq!(
        resolve_publish_date(NewsStatus::Published, Some(scheduled), now),
        Some(scheduled)
    );
    assert_eq!(resolve_publish_date(NewsStatus::Draft, Some(scheduled), now), None);
}

#[test]
fn test_news_content_rules() {
    assert!(validate_create_news("Open day", "Visit us", "events").is_ok());
    assert!(validate_create_news("Open day", "", "events").is_err());
    assert!(validate_category(&"c".repeat(51)).is_err());
    assert_eq!(validate_category(" events ").unwrap(), "events");
}

#[test]
fn test_create_news_request_defaults_to_no_status() {
    let req: CreateNewsRequest = serde_json::from_value(serde_json::json!({
        "title": "Open day",
        "content": "Visit us",
        "category": "events"
    }))
    .unwrap();
    assert!(req.status.is_none());
    assert!(req.validate().is_ok());

    let req: CreateNewsRequest = serde_json::from_value(serde_json::json!({
        "title": "Open day",
        "content": "Visit us",
        "category": "events",
        "status": "published"
    }))
    .unwrap();
    assert_eq!(req.status, Some(NewsStatus::Published));

    let unknown = serde_json::from_value::<CreateNewsRequest>(serde_json::json!({
        "title": "Open day",
        "content": "Visit us",
        "category": "events",
        "status": "archived"
    }));
    assert!(unknown.is_err());
}
