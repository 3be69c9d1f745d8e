//! Shared fixtures for unit tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use chrono::{TimeZone, Utc};
use tokio::sync::Notify;

use crate::net::api::IdentityApi;
use crate::net::client::ApiError;
use crate::net::types::{
    AuthResponse, AuthenticatedUser, Bounty, BountyCategory, BountyStatus, LoginRequest, Priority, RegisterRequest,
    Role, Tip, TipCategory, TipStatus, UserProfile,
};

pub const VALID_EMAIL: &str = "user@example.com";
pub const VALID_PASSWORD: &str = "password";
pub const EXISTING_EMAIL: &str = "existing@example.com";
pub const ISSUED_TOKEN: &str = "tok-issued";

pub fn sample_user() -> AuthenticatedUser {
    AuthenticatedUser {
        id: "123456789".into(),
        email: VALID_EMAIL.into(),
        role: Role::Admin,
        created_at: Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap(),
        last_login: Utc.with_ymd_and_hms(2026, 2, 1, 9, 30, 0).unwrap(),
        profile: UserProfile {
            username: "johndoe".into(),
            full_name: "John Doe".into(),
            notification_email: VALID_EMAIL.into(),
            enable_notification: true,
            bio: String::new(),
            contact_number: "+1 (936) 514-1641".into(),
        },
    }
}

pub fn sample_bounty(id: &str, title: &str) -> Bounty {
    Bounty {
        id: id.into(),
        title: title.into(),
        description: "desc".into(),
        reward: 100.0,
        status: BountyStatus::Open,
        created_at: Utc.with_ymd_and_hms(2026, 1, 10, 8, 0, 0).unwrap(),
        expires_at: None,
        created_by: "123456789".into(),
        category: BountyCategory::General,
        priority: Priority::Medium,
    }
}

pub fn sample_tip(id: &str, title: &str) -> Tip {
    let at = Utc.with_ymd_and_hms(2026, 1, 12, 18, 45, 0).unwrap();
    Tip {
        id: id.into(),
        title: title.into(),
        description: "desc".into(),
        category: TipCategory::General,
        datetime: at,
        location: "Downtown".into(),
        status: TipStatus::New,
        priority: Priority::Medium,
        reward: 25.0,
        created_at: at,
        updated_at: at,
    }
}

/// How the fake answers `GET /auth/me`.
#[derive(Clone, Copy, Debug)]
pub enum MeOutcome {
    User,
    Status(u16),
    Transport,
}

/// Scripted identity service.
pub struct FakeIdentity {
    pub me: Mutex<MeOutcome>,
    pub logout_fails: AtomicBool,
    /// When set, `login` parks until notified.
    pub login_gate: Option<Notify>,
    pub login_calls: AtomicUsize,
    pub register_calls: AtomicUsize,
    pub me_calls: AtomicUsize,
    pub logout_calls: AtomicUsize,
    pub profile_calls: AtomicUsize,
    pub profile_status: Mutex<Option<u16>>,
}

impl FakeIdentity {
    pub fn new() -> Self {
        Self {
            me: Mutex::new(MeOutcome::User),
            logout_fails: AtomicBool::new(false),
            login_gate: None,
            login_calls: AtomicUsize::new(0),
            register_calls: AtomicUsize::new(0),
            me_calls: AtomicUsize::new(0),
            logout_calls: AtomicUsize::new(0),
            profile_calls: AtomicUsize::new(0),
            profile_status: Mutex::new(None),
        }
    }

    pub fn gated() -> Self {
        Self { login_gate: Some(Notify::new()), ..Self::new() }
    }

    pub fn with_me(outcome: MeOutcome) -> Self {
        let fake = Self::new();
        *fake.me.lock().unwrap() = outcome;
        fake
    }

    pub fn calls(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }
}

fn rejected(status: u16, message: &str) -> ApiError {
    ApiError::Status { status, body: serde_json::json!({ "message": message }).to_string() }
}

#[async_trait::async_trait]
impl IdentityApi for FakeIdentity {
    async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, ApiError> {
        self.login_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.login_gate {
            gate.notified().await;
        }
        if request.email != VALID_EMAIL || request.password != VALID_PASSWORD {
            return Err(rejected(401, "Invalid credentials"));
        }
        Ok(AuthResponse { token: ISSUED_TOKEN.into(), user: sample_user() })
    }

    async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, ApiError> {
        self.register_calls.fetch_add(1, Ordering::SeqCst);
        if request.email == EXISTING_EMAIL {
            return Err(rejected(409, "User already exists"));
        }
        let mut user = sample_user();
        user.id = "new-user".into();
        user.email.clone_from(&request.email);
        user.role = Role::User;
        user.profile.username.clone_from(&request.username);
        Ok(AuthResponse { token: "tok-registered".into(), user })
    }

    async fn me(&self) -> Result<AuthenticatedUser, ApiError> {
        self.me_calls.fetch_add(1, Ordering::SeqCst);
        match *self.me.lock().unwrap() {
            MeOutcome::User => Ok(sample_user()),
            MeOutcome::Status(status) => Err(rejected(status, "Invalid token")),
            MeOutcome::Transport => Err(ApiError::Transport("connection refused".into())),
        }
    }

    async fn logout(&self) -> Result<(), ApiError> {
        self.logout_calls.fetch_add(1, Ordering::SeqCst);
        if self.logout_fails.load(Ordering::SeqCst) {
            return Err(ApiError::Transport("network unreachable".into()));
        }
        Ok(())
    }

    async fn update_profile(&self, profile: &UserProfile) -> Result<AuthenticatedUser, ApiError> {
        self.profile_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(status) = *self.profile_status.lock().unwrap() {
            return Err(rejected(status, "Profile update refused"));
        }
        let mut user = sample_user();
        user.profile = profile.clone();
        Ok(user)
    }
}
