use super::*;
use crate::config::Config;
use crate::net::client::BearerAuthorizer;
use crate::state::token_store::MemoryTokenStore;

fn client() -> ApiClient {
    // Nothing listens on port 9; tests below must fail before dispatch.
    let config = Config::for_base_url("http://127.0.0.1:9/api");
    let authorizer = Arc::new(BearerAuthorizer::new(Arc::new(MemoryTokenStore::new())));
    ApiClient::new(&config, authorizer).unwrap()
}

fn service() -> BountyService {
    BountyService::new(Arc::new(client()))
}

#[test]
fn bounty_endpoint_formats_expected_path() {
    assert_eq!(bounty_endpoint("b42").unwrap(), "/bounties/b42");
    assert_eq!(search_endpoint(), "/bounties/search");
}

#[test]
fn bounty_ids_stay_in_one_path_segment() {
    let path = bounty_endpoint("x?admin=1").unwrap();
    assert_eq!(path, "/bounties/x%3Fadmin%3D1");

    let request = client().request(Method::DELETE, &path).build().unwrap();
    assert_eq!(request.url().path(), "/api/bounties/x%3Fadmin%3D1");
    assert_eq!(request.url().query(), None);
}

#[test]
fn traversal_ids_are_rejected() {
    for id in ["../x", "../summary", "..", ".", "", "a/b"] {
        assert!(bounty_endpoint(id).is_err(), "{id:?} accepted");
    }
}

#[tokio::test]
async fn get_with_traversal_id_sends_nothing() {
    let err = service().get("../tips/t1").await.unwrap_err();
    assert!(matches!(err, RecordError::Invalid(_)));
}

#[tokio::test]
async fn create_rejects_invalid_form_without_request() {
    let form = CreateBountyRequest {
        title: String::new(),
        description: "d".into(),
        reward: -1.0,
        expires_at: None,
        category: BountyCategory::Web,
        priority: Priority::Low,
    };
    let err = service().create(&form).await.unwrap_err();
    let RecordError::Invalid(errors) = err else { panic!("expected validation error") };
    assert!(errors.message_for("title").is_some());
    assert!(errors.message_for("reward").is_some());
}

#[tokio::test]
async fn reward_dialog_rejects_non_positive_amount() {
    let err = service().assign_reward("b1", 0.0).await.unwrap_err();
    assert!(matches!(err, RecordError::Invalid(_)));
}

#[tokio::test]
async fn unreachable_server_is_transport_error() {
    let err = service().list().await.unwrap_err();
    assert!(matches!(err, RecordError::Api(crate::net::client::ApiError::Transport(_))));
    assert!(!err.is_unauthorized());
}
