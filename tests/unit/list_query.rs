use lab_backend::{
    db::models::{team::TeamSortKey, user::UserSortKey},
    utils::{ListQuery, SortOrder, list_query::{MAX_PER_PAGE, escape_like}},
};

#[test]
fn test_defaults() {
    let params = ListQuery::default().resolve::<TeamSortKey>().unwrap();
    assert_eq!(params.page, 1);
    assert_eq!(params.per_page, 20);
    assert_eq!(params.order, SortOrder::Desc);
    assert_eq!(params.offset(), 0);
    assert!(params.search_pattern().is_none());
}

#[test]
fn test_page_bounds_are_clamped() {
    let query = ListQuery {
        page: Some(0),
        per_page: Some(10_000),
        ..Default::default()
    };
    let params = query.resolve::<UserSortKey>().unwrap();
    assert_eq!(params.page, 1);
    assert_eq!(params.per_page, MAX_PER_PAGE);

    let query = ListQuery {
        page: Some(3),
        per_page: Some(10),
        ..Default::default()
    };
    let params = query.resolve::<UserSortKey>().unwrap();
    assert_eq!(params.offset(), 20);
}

#[test]
fn test_unknown_sort_key_rejected() {
    let query = ListQuery {
        sort_by: Some("password_hash".to_string()),
        ..Default::default()
    };
    assert!(query.resolve::<UserSortKey>().is_err());

    let query = ListQuery {
        sort_by: Some("email".to_string()),
        order: Some("ASC".to_string()),
        ..Default::default()
    };
    let params = query.resolve::<UserSortKey>().unwrap();
    assert_eq!(params.sort, UserSortKey::Email);
    assert_eq!(params.order, SortOrder::Asc);

    let query = ListQuery {
        order: Some("sideways".to_string()),
        ..Default::default()
    };
    assert!(query.resolve::<TeamSortKey>().is_err());
}

#[test]
fn test_search_is_trimmed_and_escaped() {
    let query = ListQuery {
        search: Some("  100%_done ".to_string()),
        ..Default::default()
    };
    let params = query.resolve::<TeamSortKey>().unwrap();
    assert_eq!(params.search.as_deref(), Some("100%_done"));
    assert_eq!(params.search_pattern().as_deref(), Some("%100\\%\\_done%"));

    let blank = ListQuery {
        search: Some("   ".to_string()),
        ..Default::default()
    };
    assert!(blank.resolve::<TeamSortKey>().unwrap().search.is_none());
    assert_eq!(escape_like("a\\b"), "a\\\\b");
}

#[test]
fn test_pagination_metadata() {
    let query = ListQuery {
        page: Some(2),
        per_page: Some(10),
        ..Default::default()
    };
    let params = query.resolve::<TeamSortKey>().unwrap();

    let meta = params.pagination(25);
    assert_eq!(meta.total_pages, 3);
    assert!(meta.has_next);
    assert!(meta.has_prev);

    let empty = params.pagination(0);
    assert_eq!(empty.total_pages, 0);
    assert!(!empty.has_next);
}
