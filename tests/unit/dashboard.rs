use chrono::NaiveDate;
use lab_backend::{
    db::{enums::ProjectState, models::dashboard::CountBucket},
    services::dashboard_service::{bucket_by_year, ordered_buckets},
};

#[test]
fn test_project_buckets_follow_state_order() {
    let counts = vec![(ProjectState::Completed, 4), (ProjectState::Planning, 1)];
    let buckets = ordered_buckets(&ProjectState::ALL, &counts, |s| s.as_str());
    assert_eq!(
        buckets,
        vec![
            CountBucket::new("PLANNING", 1),
            CountBucket::new("IN_PROGRESS", 0),
            CountBucket::new("COMPLETED", 4),
            CountBucket::new("ON_HOLD", 0),
            CountBucket::new("CANCELLED", 0),
        ]
    );
}

#[test]
fn test_publications_grouped_by_year() {
    let d = |y, m, day| NaiveDate::from_ymd_opt(y, m, day).unwrap();
    let buckets = bucket_by_year(&[d(2024, 5, 1), d(2022, 1, 9), d(2024, 12, 31)]);
    assert_eq!(
        buckets,
        vec![CountBucket::new("2022", 1), CountBucket::new("2024", 2)]
    );
    assert!(bucket_by_year(&[]).is_empty());
}
