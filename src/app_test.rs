use super::*;
use crate::routes::LOGIN_PATH;
use crate::state::auth::SessionPhase;
use crate::test_support::{FakeIdentity, MeOutcome, VALID_EMAIL, VALID_PASSWORD};

fn app_with(tokens: MemoryTokenStore, identity: FakeIdentity) -> (App, Arc<MemoryTokenStore>) {
    let tokens = Arc::new(tokens);
    let config = Config::for_base_url("http://127.0.0.1:9/api");
    let app = App::with_identity(config, tokens.clone(), Arc::new(identity)).unwrap();
    (app, tokens)
}

#[tokio::test]
async fn anonymous_open_redirects_and_records_intended_path() {
    let (app, tokens) = app_with(MemoryTokenStore::new(), FakeIdentity::new());

    let err = app.open("/bounties/edit/b7/").await.unwrap_err();
    assert!(matches!(err, AppError::LoginRequired { ref path } if path == "/bounties/edit/b7"));
    assert_eq!(app.history().current(), LOGIN_PATH);
    assert_eq!(tokens.intended_path().as_deref(), Some("/bounties/edit/b7"));
}

#[tokio::test]
async fn login_after_redirect_lands_on_intended_path() {
    let (app, _tokens) = app_with(MemoryTokenStore::new(), FakeIdentity::new());
    let _ = app.open("/tips").await;

    app.auth().login(VALID_EMAIL, VALID_PASSWORD).await.unwrap();
    assert_eq!(app.history().current(), "/tips");
    assert!(matches!(app.open("/tips").await, Ok(Route::Tips)));
}

#[tokio::test]
async fn stored_token_opens_protected_route() {
    let (app, _tokens) = app_with(MemoryTokenStore::with_token("tok-old"), FakeIdentity::new());
    let route = app.open("/profile").await.unwrap();
    assert_eq!(route, Route::Profile);
    assert_eq!(app.history().current(), "/profile");
}

#[tokio::test]
async fn public_route_opens_without_session() {
    let (app, tokens) = app_with(MemoryTokenStore::new(), FakeIdentity::new());
    assert_eq!(app.open("/register").await.unwrap(), Route::Register);
    assert_eq!(tokens.intended_path(), None);
}

#[tokio::test]
async fn rejected_token_redirects() {
    let (app, tokens) = app_with(MemoryTokenStore::with_token("tok-stale"), FakeIdentity::with_me(MeOutcome::Status(401)));
    assert!(matches!(app.open("/").await, Err(AppError::LoginRequired { .. })));
    assert_eq!(tokens.token(), None);
}

#[tokio::test]
async fn unauthorized_record_error_drops_session() {
    let (app, tokens) = app_with(MemoryTokenStore::with_token("tok-old"), FakeIdentity::new());
    app.open("/").await.unwrap();

    let outcome: Result<(), RecordError> = Err(RecordError::Api(ApiError::Status { status: 401, body: String::new() }));
    assert!(app.checked(outcome).is_err());
    assert_eq!(tokens.token(), None);
    assert_eq!(app.auth().state().phase(), SessionPhase::Anonymous);
}

#[tokio::test]
async fn other_record_errors_keep_session() {
    let (app, tokens) = app_with(MemoryTokenStore::with_token("tok-old"), FakeIdentity::new());
    app.open("/").await.unwrap();

    let outcome: Result<(), RecordError> = Err(RecordError::Api(ApiError::Status { status: 404, body: String::new() }));
    let err = app.checked(outcome).unwrap_err();
    assert!(matches!(err, AppError::Record(ref e) if e.is_not_found()));
    assert_eq!(tokens.token().as_deref(), Some("tok-old"));
}

#[test]
fn ephemeral_config_builds_memory_store() {
    let app = App::new(Config::for_base_url("http://127.0.0.1:9/api")).unwrap();
    assert_eq!(app.tokens().token(), None);
    assert_eq!(app.config().api_url, "http://127.0.0.1:9/api");
}

#[tokio::test]
async fn enter_refuses_ids_that_change_the_route() {
    let (app, _tokens) = app_with(MemoryTokenStore::with_token("tok-old"), FakeIdentity::new());

    let err = app.enter(Route::ViewBounty("../tips/t1".into())).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(ref path) if path == "/bounties/view/../tips/t1"));

    let err = app.enter(Route::EditTip("t1?admin=1".into())).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    app.enter(Route::ViewBounty("b42".into())).await.unwrap();
    assert_eq!(app.history().current(), "/bounties/view/b42");
}
