use super::*;
use crate::state::token_store::MemoryTokenStore;
use crate::test_support::sample_user;

fn anonymous() -> AuthState {
    AuthState { user: None, loading: false, in_flight: false }
}

fn signed_in() -> AuthState {
    AuthState { user: Some(sample_user()), loading: false, in_flight: false }
}

// =============================================================================
// Route parsing
// =============================================================================

#[test]
fn parse_known_routes() {
    assert_eq!(Route::parse("/"), Route::Dashboard);
    assert_eq!(Route::parse("/dashboard"), Route::Dashboard);
    assert_eq!(Route::parse("/bounties/create"), Route::CreateBounty);
    assert_eq!(Route::parse("/bounties/edit/42"), Route::EditBounty("42".into()));
    assert_eq!(Route::parse("/tips/view/t-9"), Route::ViewTip("t-9".into()));
    assert_eq!(Route::parse("/profile"), Route::Profile);
    assert_eq!(Route::parse("/login"), Route::Login);
}

#[test]
fn parse_tolerates_trailing_slash_and_query() {
    assert_eq!(Route::parse("/tips/?status=NEW"), Route::Tips);
    assert_eq!(Route::parse("bounties"), Route::Bounties);
    assert_eq!(Route::parse(""), Route::Dashboard);
}

#[test]
fn unknown_paths_are_not_found() {
    assert_eq!(Route::parse("/bounties/edit"), Route::NotFound("/bounties/edit".into()));
    assert_eq!(Route::parse("/admin/users"), Route::NotFound("/admin/users".into()));
}

#[test]
fn path_round_trips_for_parameterized_routes() {
    for path in ["/bounties/view/abc", "/tips/edit/7", "/tips/create", "/profile"] {
        assert_eq!(Route::parse(path).path(), path);
    }
}

#[test]
fn only_login_and_register_are_public() {
    assert!(Route::Login.is_public());
    assert!(Route::Register.is_public());
    assert!(!Route::Dashboard.is_public());
    assert!(!Route::NotFound("/x".into()).is_public());
}

// =============================================================================
// History
// =============================================================================

#[test]
fn history_tracks_current_location() {
    let history = History::default();
    assert_eq!(history.current(), "/");
    history.navigate("/tips/");
    history.navigate("/login");
    assert_eq!(history.current(), "/login");
    assert_eq!(history.entries(), ["/", "/tips", "/login"]);
}

// =============================================================================
// RouteGuard
// =============================================================================

#[test]
fn should_redirect_unauth_when_not_loading_and_user_missing() {
    assert!(should_redirect_unauth(&anonymous()));
}

#[test]
fn should_not_redirect_while_loading() {
    let state = AuthState { user: None, loading: true, in_flight: false };
    assert!(!should_redirect_unauth(&state));
}

#[test]
fn should_not_redirect_when_user_exists() {
    assert!(!should_redirect_unauth(&signed_in()));
}

#[test]
fn guard_never_renders_while_loading() {
    let tokens = Arc::new(MemoryTokenStore::new());
    let guard = RouteGuard::new(tokens.clone());
    for user in [None, Some(sample_user())] {
        let state = AuthState { user, loading: true, in_flight: false };
        assert_eq!(guard.check(&state, "/bounties"), GuardDecision::Loading);
    }
    assert_eq!(tokens.intended_path(), None);
}

#[test]
fn guard_redirects_anonymous_and_records_path() {
    let tokens = Arc::new(MemoryTokenStore::new());
    let guard = RouteGuard::new(tokens.clone());
    let decision = guard.check(&anonymous(), "/bounties/create");
    assert_eq!(decision, GuardDecision::Redirect(LOGIN_PATH.into()));
    assert_eq!(tokens.intended_path().as_deref(), Some("/bounties/create"));
}

#[test]
fn second_denied_access_overwrites_intended_path() {
    let tokens = Arc::new(MemoryTokenStore::new());
    let guard = RouteGuard::new(tokens.clone());
    let _ = guard.check(&anonymous(), "/tips");
    let _ = guard.check(&anonymous(), "/profile");
    assert_eq!(tokens.intended_path().as_deref(), Some("/profile"));
}

#[test]
fn guard_renders_for_signed_in_user() {
    let tokens = Arc::new(MemoryTokenStore::new());
    let guard = RouteGuard::new(tokens.clone());
    assert_eq!(guard.check(&signed_in(), "/tips/view/t1"), GuardDecision::Render(Route::ViewTip("t1".into())));
    assert_eq!(tokens.intended_path(), None);
}

#[test]
fn login_route_is_exempt_from_guard() {
    let tokens = Arc::new(MemoryTokenStore::new());
    let guard = RouteGuard::new(tokens.clone());
    assert_eq!(guard.check(&anonymous(), "/login"), GuardDecision::Render(Route::Login));
    assert_eq!(guard.check(&AuthState::unresolved(), "/register"), GuardDecision::Render(Route::Register));
    assert_eq!(tokens.intended_path(), None);
}
