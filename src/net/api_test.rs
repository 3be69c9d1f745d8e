use super::*;
use serde_json::json;

#[test]
fn identity_endpoints_live_under_auth() {
    for path in [LOGIN_ENDPOINT, REGISTER_ENDPOINT, ME_ENDPOINT, LOGOUT_ENDPOINT, PROFILE_ENDPOINT] {
        assert!(path.starts_with("/auth/"), "{path} should be under /auth/");
    }
}

#[test]
fn login_body_has_email_and_password_only() {
    let body = LoginRequest { email: "user@example.com".into(), password: "password".into() };
    assert_eq!(
        serde_json::to_value(&body).unwrap(),
        json!({ "email": "user@example.com", "password": "password" })
    );
}

#[test]
fn register_body_includes_username() {
    let body = RegisterRequest { username: "jd".into(), email: "jd@example.com".into(), password: "secret1".into() };
    assert_eq!(
        serde_json::to_value(&body).unwrap(),
        json!({ "username": "jd", "email": "jd@example.com", "password": "secret1" })
    );
}
