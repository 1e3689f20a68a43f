use lab_backend::{
    db::{
        enums::UserRole,
        models::{
            auth::RegisterRequest,
            user::{ChangePasswordRequest, CreateUserRequest, UpdateUserRequest},
        },
    },
    validation::user::{normalize_email, validate_name, validate_password},
};
use validator::Validate;

#[test]
fn test_email_normalization() {
    assert_eq!(normalize_email("  Ada@Lab.ORG ").unwrap(), "ada@lab.org");
    assert!(normalize_email("").is_err());
    assert!(normalize_email("ada").is_err());
    assert!(normalize_email("ada@lab").is_err());
    assert!(normalize_email("@lab.org").is_err());
    assert!(normalize_email("ada@@lab.org").is_err());
    assert!(normalize_email("a da@lab.org").is_err());
}

#[test]
fn test_password_strength() {
    assert!(validate_password("Str0ngPass").is_ok());
    assert!(validate_password("lower1!x").is_ok());
    assert!(validate_password("Sh0rt!").is_err());
    assert!(validate_password("alllowercase").is_err());
    assert!(validate_password("12345678").is_err());
}

#[test]
fn test_name_is_trimmed() {
    assert_eq!(validate_name("  Grace Hopper ").unwrap(), "Grace Hopper");
    assert!(validate_name("   ").is_err());
    assert!(validate_name(&"x".repeat(101)).is_err());
}

#[test]
fn test_create_user_request_roles_and_rules() {
    let req: CreateUserRequest = serde_json::from_value(serde_json::json!({
        "name": "Grace",
        "email": "grace@lab.org",
        "password": "Str0ngPass",
        "role": "TeamLeader"
    }))
    .unwrap();
    assert_eq!(req.role, UserRole::TeamLeader);
    assert!(req.validate().is_ok());

    let bad_role = serde_json::from_value::<CreateUserRequest>(serde_json::json!({
        "name": "Grace",
        "email": "grace@lab.org",
        "password": "Str0ngPass",
        "role": "Admin"
    }));
    assert!(bad_role.is_err());

    let bad_image: CreateUserRequest = serde_json::from_value(serde_json::json!({
        "name": "Grace",
        "email": "grace@lab.org",
        "password": "Str0ngPass",
        "role": "TeamMember",
        "image": "not a url"
    }))
    .unwrap();
    assert!(bad_image.validate().is_err());
}

#[test]
fn test_weak_passwords_fail_request_validation() {
    let register: RegisterRequest = serde_json::from_value(serde_json::json!({
        "name": "Weak",
        "email": "weak@lab.org",
        "password": "password"
    }))
    .unwrap();
    let errors = register.validate().unwrap_err();
    assert!(errors.field_errors().contains_key("password"));

    let create: CreateUserRequest = serde_json::from_value(serde_json::json!({
        "name": "Weak",
        "email": "weak@lab.org",
        "password": "short",
        "role": "TeamMember"
    }))
    .unwrap();
    let errors = create.validate().unwrap_err();
    let field_errors = errors.field_errors();
    let password_errors = field_errors["password"];
    assert_eq!(password_errors[0].code, "weak_password");
    assert!(password_errors[0].message.is_some());

    let change: ChangePasswordRequest = serde_json::from_value(serde_json::json!({
        "current_password": "Str0ngPass",
        "new_password": "alllowercase"
    }))
    .unwrap();
    let errors = change.validate().unwrap_err();
    assert!(errors.field_errors().contains_key("new_password"));
    assert!(!errors.field_errors().contains_key("current_password"));

    let change: ChangePasswordRequest = serde_json::from_value(serde_json::json!({
        "current_password": "Str0ngPass",
        "new_password": "N3wer-Pass"
    }))
    .unwrap();
    assert!(change.validate().is_ok());
}

#[test]
fn test_update_user_request_null_image_clears() {
    let req: UpdateUserRequest =
        serde_json::from_value(serde_json::json!({ "image": null })).unwrap();
    assert_eq!(req.image, Some(None));

    let req: UpdateUserRequest = serde_json::from_value(serde_json::json!({})).unwrap();
    assert!(req.image.is_none());
    assert!(req.role.is_none());
}
