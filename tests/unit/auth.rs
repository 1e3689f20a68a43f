use chrono::Utc;
use lab_backend::{
    config::AuthConfig,
    db::{enums::UserRole, models::user::User},
    middleware::auth::{AuthService, TokenKind},
};
use uuid::Uuid;

fn service(secret: &str) -> AuthService {
    AuthService::new(AuthConfig {
        jwt_secret: secret.to_string(),
        access_token_expires_in: 900,
        refresh_token_expires_in: 86_400,
        bcrypt_cost: 4,
    })
}

fn user(role: UserRole) -> User {
    User {
        id: Uuid::new_v4(),
        name: "Ada Lovelace".to_string(),
        email: "ada@lab.org".to_string(),
        password_hash: String::new(),
        role,
        image: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

#[test]
fn test_access_token_carries_role() {
    let auth = service("unit-test-secret-with-enough-length");
    let user = user(UserRole::TeamLeader);
    let token = auth.generate_access_token(&user).unwrap();

    let claims = auth.verify_token(&token).unwrap();
    assert_eq!(claims.sub, user.id);
    assert_eq!(claims.role, UserRole::TeamLeader);
    assert_eq!(claims.typ, TokenKind::Access);
    assert!(claims.remaining_lifetime() <= 900);
    assert!(claims.remaining_lifetime() > 0);
}

#[test]
fn test_refresh_token_is_not_an_access_token() {
    let auth = service("unit-test-secret-with-enough-length");
    let user = user(UserRole::TeamMember);
    let refresh = auth.generate_refresh_token(&user).unwrap();
    let access = auth.generate_access_token(&user).unwrap();

    assert!(auth.verify_token(&refresh).is_err());
    assert!(auth.verify_refresh_token(&access).is_err());
    assert_eq!(auth.verify_refresh_token(&refresh).unwrap().typ, TokenKind::Refresh);
}

#[test]
fn test_tokens_have_unique_ids() {
    let auth = service("unit-test-secret-with-enough-length");
    let user = user(UserRole::LabLeader);
    let a = auth.verify_token(&auth.generate_access_token(&user).unwrap()).unwrap();
    let b = auth.verify_token(&auth.generate_access_token(&user).unwrap()).unwrap();
    assert_ne!(a.jti, b.jti);
}

#[test]
fn test_token_from_other_secret_rejected() {
    let issuer = service("first-secret-first-secret-first-secret");
    let verifier = service("second-secret-second-secret-second");
    let token = issuer.generate_access_token(&user(UserRole::LabLeader)).unwrap();
    assert!(verifier.verify_token(&token).is_err());
}
