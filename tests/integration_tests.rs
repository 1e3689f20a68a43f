use reqwest::{Client, StatusCode};
use serde_json::{Value, json};
use uuid::Uuid;

mod unit;

const BASE_URL: &str = "http://127.0.0.1:8000";
const TEST_PASSWORD: &str = "Str0ngPass!";

/// Credentials of the account created by `seed --lab-leader-email ...`.
fn lab_leader_credentials() -> (String, String) {
    (
        std::env::var("TEST_LAB_LEADER_EMAIL").unwrap_or_else(|_| "leader@lab.test".to_string()),
        std::env::var("TEST_LAB_LEADER_PASSWORD").unwrap_or_else(|_| "Str0ngPass!".to_string()),
    )
}

fn unique_email(prefix: &str) -> String {
    format!("{}-{}@lab.test", prefix, Uuid::new_v4().simple())
}

async fn register(client: &Client, name: &str, email: &str) -> Value {
    let response = client
        .post(format!("{}/auth/register", BASE_URL))
        .json(&json!({ "name": name, "email": email, "password": TEST_PASSWORD }))
        .send()
        .await
        .expect("Failed to register");
    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = response.json().await.expect("Failed to parse JSON");
    body["data"].clone()
}

async fn login(client: &Client, email: &str, password: &str) -> Value {
    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({ "email": email, "password": password }))
        .send()
        .await
        .expect("Failed to login");
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("Failed to parse JSON");
    body["data"].clone()
}

async fn access_token(client: &Client, email: &str, password: &str) -> String {
    login(client, email, password).await["access_token"]
        .as_str()
        .expect("access_token missing")
        .to_string()
}

/// Creates a team led by `leader_id`; returns its id.
async fn create_team(client: &Client, token: &str, leader_id: &Value) -> String {
    let acronym = format!("T{}", &Uuid::new_v4().simple().to_string()[..6]).to_uppercase();
    let response = client
        .post(format!("{}/teams", BASE_URL))
        .bearer_auth(token)
        .json(&json!({
            "name": format!("Team {}", acronym),
            "acronym": acronym,
            "leader_id": leader_id
        }))
        .send()
        .await
        .expect("Failed to create team");
    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = response.json().await.expect("Failed to parse JSON");
    body["data"]["id"].as_str().expect("team id missing").to_string()
}

async fn error_code(response: reqwest::Response) -> Value {
    let body: Value = response.json().await.expect("Failed to parse JSON");
    body["errors"][0]["code"].clone()
}

#[tokio::test]
#[ignore = "requires running server"]
async fn test_health_reports_dependencies() {
    let client = Client::new();
    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to call health");

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
    let body: Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["data"]["database"], true);
    assert_eq!(body["data"]["redis"], true);
}

#[tokio::test]
#[ignore = "requires running server"]
async fn test_request_id_is_echoed() {
    let client = Client::new();
    let response = client
        .get(format!("{}/health", BASE_URL))
        .header("x-request-id", "trace-me-123")
        .send()
        .await
        .expect("Failed to call health");

    assert_eq!(
        response.headers().get("x-request-id").and_then(|v| v.to_str().ok()),
        Some("trace-me-123")
    );
}

#[tokio::test]
#[ignore = "requires running server"]
async fn test_protected_routes_require_token() {
    let client = Client::new();
    for path in ["/users", "/teams", "/news", "/dashboard/stats"] {
        let response = client
            .get(format!("{}{}", BASE_URL, path))
            .send()
            .await
            .expect("Request failed");
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{}", path);
    }

    let response = client
        .get(format!("{}/users", BASE_URL))
        .bearer_auth("not-a-jwt")
        .send()
        .await
        .expect("Request failed");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "requires running server"]
async fn test_register_login_logout_cycle() {
    let client = Client::new();
    let email = unique_email("cycle");
    let user = register(&client, "Cycle Tester", &email).await;
    assert_eq!(user["role"], "TeamMember");
    assert!(user["image"].as_str().is_some_and(|url| !url.is_empty()));

    let session = login(&client, &email.to_uppercase(), TEST_PASSWORD).await;
    let token = session["access_token"].as_str().unwrap().to_string();
    let refresh = session["refresh_token"].as_str().unwrap().to_string();

    let response = client
        .get(format!("{}/auth/profile", BASE_URL))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let profile: Value = response.json().await.unwrap();
    assert_eq!(profile["data"]["email"], email);
    assert_eq!(profile["data"]["teams"], json!([]));

    let response = client
        .post(format!("{}/auth/logout", BASE_URL))
        .bearer_auth(&token)
        .json(&json!({ "refresh_token": refresh }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = client
        .get(format!("{}/auth/profile", BASE_URL))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = client
        .post(format!("{}/auth/refresh", BASE_URL))
        .json(&json!({ "refresh_token": refresh }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "requires running server"]
async fn test_duplicate_email_and_bad_password() {
    let client = Client::new();
    let email = unique_email("dup");
    register(&client, "First", &email).await;

    let response = client
        .post(format!("{}/auth/register", BASE_URL))
        .json(&json!({ "name": "Second", "email": email, "password": TEST_PASSWORD }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["errors"][0]["code"], "USER_EMAIL_EXISTS");

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({ "email": email, "password": "Wr0ngPass!" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = client
        .post(format!("{}/auth/register", BASE_URL))
        .json(&json!({ "name": "Weak", "email": unique_email("weak"), "password": "short" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "requires running server"]
async fn test_team_member_permissions() {
    let client = Client::new();
    let email = unique_email("member");
    register(&client, "Plain Member", &email).await;
    let token = access_token(&client, &email, TEST_PASSWORD).await;

    let response = client
        .post(format!("{}/news", BASE_URL))
        .bearer_auth(&token)
        .json(&json!({ "title": "Hi", "content": "Body", "category": "general" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = client
        .post(format!("{}/users", BASE_URL))
        .bearer_auth(&token)
        .json(&json!({
            "name": "Sneaky",
            "email": unique_email("sneaky"),
            "password": TEST_PASSWORD,
            "role": "LabLeader"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = client
        .get(format!("{}/dashboard/stats", BASE_URL))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["data"]["scope"], "TeamMember");
}

#[tokio::test]
#[ignore = "requires running seeded server"]
async fn test_lab_leader_team_and_project_flow() {
    let client = Client::new();
    let (leader_email, leader_password) = lab_leader_credentials();
    let admin = access_token(&client, &leader_email, &leader_password).await;

    let future_leader_email = unique_email("tl");
    let future_leader = register(&client, "Future Leader", &future_leader_email).await;
    let acronym = format!("T{}", &Uuid::new_v4().simple().to_string()[..6]).to_uppercase();

    let response = client
        .post(format!("{}/teams", BASE_URL))
        .bearer_auth(&admin)
        .json(&json!({
            "name": format!("Team {}", acronym),
            "acronym": acronym,
            "leader_id": future_leader["id"]
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let team: Value = response.json().await.unwrap();
    let team_id = team["data"]["id"].as_str().unwrap().to_string();
    assert_eq!(team["data"]["leader_id"], future_leader["id"]);

    let response = client
        .get(format!("{}/users/{}", BASE_URL, future_leader["id"].as_str().unwrap()))
        .bearer_auth(&admin)
        .send()
        .await
        .unwrap();
    let promoted: Value = response.json().await.unwrap();
    assert_eq!(promoted["data"]["role"], "TeamLeader");
    assert_eq!(promoted["data"]["teams"][0]["is_leader"], true);

    let tl_token = access_token(&client, &future_leader_email, TEST_PASSWORD).await;
    let response = client
        .post(format!("{}/projects", BASE_URL))
        .bearer_auth(&tl_token)
        .json(&json!({
            "name": format!("Project of {}", acronym),
            "team_id": team_id,
            "start_date": "2025-01-01",
            "expected_end_date": "2024-01-01"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = client
        .post(format!("{}/projects", BASE_URL))
        .bearer_auth(&tl_token)
        .json(&json!({ "name": format!("Project of {}", acronym), "team_id": team_id }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let project: Value = response.json().await.unwrap();
    assert_eq!(project["data"]["state"], "PLANNING");
    let project_id = project["data"]["id"].as_str().unwrap().to_string();

    let response = client
        .get(format!("{}/projects", BASE_URL))
        .bearer_auth(&tl_token)
        .query(&[("team_id", team_id.as_str()), ("search", acronym.as_str())])
        .send()
        .await
        .unwrap();
    let page: Value = response.json().await.unwrap();
    assert_eq!(page["meta"]["total_count"], 1);

    let response = client
        .delete(format!("{}/users/{}", BASE_URL, future_leader["id"].as_str().unwrap()))
        .bearer_auth(&admin)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = client
        .delete(format!("{}/teams/{}", BASE_URL, team_id))
        .bearer_auth(&admin)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = client
        .get(format!("{}/projects/{}", BASE_URL, project_id))
        .bearer_auth(&admin)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "requires running server"]
async fn test_list_rejects_unknown_sort_key() {
    let client = Client::new();
    let email = unique_email("sort");
    register(&client, "Sorter", &email).await;
    let token = access_token(&client, &email, TEST_PASSWORD).await;

    let response = client
        .get(format!("{}/users?sort_by=password_hash", BASE_URL))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = client
        .get(format!("{}/users?sort_by=name&order=asc&per_page=500", BASE_URL))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["meta"]["pagination"]["per_page"], 100);
}

#[tokio::test]
#[ignore = "requires running server"]
async fn test_huge_page_returns_empty_list() {
    let client = Client::new();
    let email = unique_email("pager");
    register(&client, "Pager", &email).await;
    let token = access_token(&client, &email, TEST_PASSWORD).await;

    let response = client
        .get(format!("{}/teams?page=100000000000000000&per_page=100", BASE_URL))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["data"], json!([]));
    assert_eq!(body["meta"]["pagination"]["has_next"], false);
}

#[tokio::test]
#[ignore = "requires running server"]
async fn test_logout_checks_refresh_token_before_revoking() {
    let client = Client::new();
    let email = unique_email("logout");
    register(&client, "Logout Tester", &email).await;
    let session = login(&client, &email, TEST_PASSWORD).await;
    let token = session["access_token"].as_str().unwrap().to_string();
    let refresh = session["refresh_token"].as_str().unwrap().to_string();

    let other_email = unique_email("other");
    register(&client, "Someone Else", &other_email).await;
    let other_refresh = login(&client, &other_email, TEST_PASSWORD).await["refresh_token"]
        .as_str()
        .unwrap()
        .to_string();

    let response = client
        .post(format!("{}/auth/logout", BASE_URL))
        .bearer_auth(&token)
        .header("content-type", "application/json")
        .body("{\"refresh_token\":")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = client
        .post(format!("{}/auth/logout", BASE_URL))
        .bearer_auth(&token)
        .json(&json!({ "refresh_token": "not-a-jwt" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = client
        .post(format!("{}/auth/logout", BASE_URL))
        .bearer_auth(&token)
        .json(&json!({ "refresh_token": other_refresh }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // none of the rejected attempts revoked anything
    let response = client
        .get(format!("{}/auth/profile", BASE_URL))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = client
        .post(format!("{}/auth/refresh", BASE_URL))
        .json(&json!({ "refresh_token": other_refresh }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = client
        .post(format!("{}/auth/logout", BASE_URL))
        .bearer_auth(&token)
        .json(&json!({ "refresh_token": refresh }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "requires running seeded server"]
async fn test_news_draft_visibility_and_publish_cycle() {
    let client = Client::new();
    let (leader_email, leader_password) = lab_leader_credentials();
    let admin = access_token(&client, &leader_email, &leader_password).await;

    let reader_email = unique_email("reader");
    register(&client, "Reader", &reader_email).await;
    let reader = access_token(&client, &reader_email, TEST_PASSWORD).await;

    let response = client
        .post(format!("{}/news", BASE_URL))
        .bearer_auth(&admin)
        .json(&json!({ "title": "Seminar", "content": "Thursday 10am", "category": "events" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let news: Value = response.json().await.unwrap();
    assert_eq!(news["data"]["status"], "draft");
    assert_eq!(news["data"]["publish_date"], Value::Null);
    let news_id = news["data"]["id"].as_str().unwrap().to_string();

    let response = client
        .get(format!("{}/news/{}", BASE_URL, news_id))
        .bearer_auth(&reader)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = client
        .post(format!("{}/news/{}/publish", BASE_URL, news_id))
        .bearer_auth(&admin)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let published: Value = response.json().await.unwrap();
    assert_eq!(published["data"]["status"], "published");
    assert!(published["data"]["publish_date"].is_string());

    let response = client
        .get(format!("{}/news/{}", BASE_URL, news_id))
        .bearer_auth(&reader)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = client
        .post(format!("{}/news/{}/unpublish", BASE_URL, news_id))
        .bearer_auth(&admin)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let drafted: Value = response.json().await.unwrap();
    assert_eq!(drafted["data"]["status"], "draft");
    assert_eq!(drafted["data"]["publish_date"], Value::Null);

    let response = client
        .get(format!("{}/news/{}", BASE_URL, news_id))
        .bearer_auth(&reader)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = client
        .delete(format!("{}/news/{}", BASE_URL, news_id))
        .bearer_auth(&admin)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "requires running seeded server"]
async fn test_team_membership_conflicts() {
    let client = Client::new();
    let (leader_email, leader_password) = lab_leader_credentials();
    let admin = access_token(&client, &leader_email, &leader_password).await;

    let team_leader = register(&client, "Leader", &unique_email("lead")).await;
    let member = register(&client, "Member", &unique_email("mem")).await;
    let team_id = create_team(&client, &admin, &team_leader["id"]).await;

    let response = client
        .post(format!("{}/teams/{}/members", BASE_URL, team_id))
        .bearer_auth(&admin)
        .json(&json!({ "user_id": member["id"] }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = client
        .post(format!("{}/teams/{}/members", BASE_URL, team_id))
        .bearer_auth(&admin)
        .json(&json!({ "user_id": member["id"] }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(error_code(response).await, "TEAM_MEMBER_EXISTS");

    let response = client
        .delete(format!(
            "{}/teams/{}/members/{}",
            BASE_URL,
            team_id,
            team_leader["id"].as_str().unwrap()
        ))
        .bearer_auth(&admin)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(error_code(response).await, "TEAM_LEADER_IN_USE");

    let response = client
        .put(format!("{}/users/{}", BASE_URL, team_leader["id"].as_str().unwrap()))
        .bearer_auth(&admin)
        .json(&json!({ "role": "TeamMember" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(error_code(response).await, "TEAM_LEADER_IN_USE");

    let response = client
        .delete(format!(
            "{}/teams/{}/members/{}",
            BASE_URL,
            team_id,
            member["id"].as_str().unwrap()
        ))
        .bearer_auth(&admin)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = client
        .delete(format!("{}/teams/{}", BASE_URL, team_id))
        .bearer_auth(&admin)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "requires running server"]
async fn test_publication_doi_conflicts_and_year_filter() {
    let client = Client::new();
    let first_email = unique_email("author");
    register(&client, "First Author", &first_email).await;
    let first = access_token(&client, &first_email, TEST_PASSWORD).await;
    let second_email = unique_email("coauthor");
    register(&client, "Second Author", &second_email).await;
    let second = access_token(&client, &second_email, TEST_PASSWORD).await;

    let suffix = Uuid::new_v4().simple().to_string();
    let response = client
        .post(format!("{}/publications", BASE_URL))
        .bearer_auth(&first)
        .json(&json!({
            "title": "On Lab Backends",
            "authors": ["First Author"],
            "publication_date": "2024-03-01",
            "doi": format!("10.5555/{}", suffix)
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let publication: Value = response.json().await.unwrap();
    let publication_id = publication["data"]["id"].as_str().unwrap().to_string();

    let response = client
        .post(format!("{}/publications", BASE_URL))
        .bearer_auth(&second)
        .json(&json!({
            "title": "On Lab Backends, again",
            "authors": ["Second Author"],
            "publication_date": "2024-04-01",
            "doi": format!("https://doi.org/10.5555/{}", suffix.to_uppercase())
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(error_code(response).await, "PUBLICATION_DOI_EXISTS");

    let response = client
        .get(format!("{}/publications?year=999999", BASE_URL))
        .bearer_auth(&first)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["errors"][0]["field"], "year");

    let response = client
        .delete(format!("{}/publications/{}", BASE_URL, publication_id))
        .bearer_auth(&first)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
