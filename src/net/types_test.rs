use super::*;
use serde_json::json;

#[test]
fn user_deserializes_camel_case_payload() {
    let raw = json!({
        "id": "123456789",
        "email": "user@example.com",
        "role": "admin",
        "createdAt": "2023-01-01T00:00:00Z",
        "lastLogin": "2024-05-02T10:30:00Z",
        "profile": {
            "username": "johndoe",
            "fullName": "John Doe",
            "notificationEmail": "user@example.com",
            "enableNotification": true,
            "bio": "",
            "contactNumber": "+1 (936) 514-1641"
        }
    });
    let user: AuthenticatedUser = serde_json::from_value(raw).unwrap();
    assert_eq!(user.role, Role::Admin);
    assert_eq!(user.profile.full_name, "John Doe");
    assert_eq!(user.created_at.to_rfc3339(), "2023-01-01T00:00:00+00:00");
}

#[test]
fn profile_tolerates_missing_optional_text() {
    let raw = json!({
        "username": "jd",
        "fullName": "J D",
        "notificationEmail": "jd@example.com",
        "enableNotification": false
    });
    let profile: UserProfile = serde_json::from_value(raw).unwrap();
    assert!(profile.bio.is_empty());
    assert!(profile.contact_number.is_empty());
}

#[test]
fn enum_variants_use_screaming_snake_case() {
    assert_eq!(serde_json::to_value(BountyStatus::InProgress).unwrap(), json!("IN_PROGRESS"));
    assert_eq!(serde_json::to_value(BountyCategory::CallCenter).unwrap(), json!("CALL_CENTER"));
    assert_eq!(serde_json::to_value(TipStatus::Paid).unwrap(), json!("PAID"));
}

#[test]
fn enum_parse_is_case_and_dash_insensitive() {
    assert_eq!("in-progress".parse::<BountyStatus>().unwrap(), BountyStatus::InProgress);
    assert_eq!("call_center".parse::<BountyCategory>().unwrap(), BountyCategory::CallCenter);
    assert_eq!(" high ".parse::<Priority>().unwrap(), Priority::High);
    assert_eq!("Sighting".parse::<TipCategory>().unwrap(), TipCategory::Sighting);
}

#[test]
fn enum_parse_error_lists_expected_values() {
    let err = "urgent".parse::<Priority>().unwrap_err();
    assert_eq!(err.kind, "priority");
    assert_eq!(err.to_string(), "unknown priority `urgent` (expected one of: LOW, MEDIUM, HIGH)");
}

#[test]
fn display_matches_wire_name() {
    for status in TipStatus::ALL {
        assert_eq!(status.to_string(), serde_json::to_value(status).unwrap().as_str().unwrap());
    }
}

#[test]
fn priority_defaults_to_medium() {
    assert_eq!(Priority::default(), Priority::Medium);
}

#[test]
fn bounty_update_omits_absent_fields() {
    let mut update = UpdateBountyRequest::new("b1");
    update.status = Some(BountyStatus::Completed);
    let body = serde_json::to_value(&update).unwrap();
    assert_eq!(body, json!({ "id": "b1", "status": "COMPLETED" }));
}

#[test]
fn tip_notify_payload_only_for_watched_fields() {
    let mut update = UpdateTipRequest::new("t1");
    update.location = Some("Lagos".to_owned());
    assert!(update.notify_payload().is_none());

    update.reward = Some(250.0);
    let payload = update.notify_payload().unwrap();
    assert_eq!(serde_json::to_value(&payload).unwrap(), json!({ "reward": 250.0 }));
}

#[test]
fn summary_accepts_missing_category_leaders() {
    let raw = json!({
        "totalBounties": 4,
        "totalTips": 9,
        "totalRevenue": 1250.5,
        "totalVendors": 3,
        "totalShops": 2
    });
    let summary: Summary = serde_json::from_value(raw).unwrap();
    assert_eq!(summary.total_tips, 9);
    assert!(summary.most_common_tip_category.is_none());
}
