//! Wire DTOs for the admin API.
//!
//! DESIGN
//! ======
//! Field names follow the remote service's camelCase JSON, enum variants its
//! SCREAMING_SNAKE_CASE spelling. Enums carry an `ALL` table so CLI parsing and
//! filter menus share one source of truth.

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// ENUM PARSING
// =============================================================================

/// Returned when a string names no variant of a wire enum.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} `{value}` (expected one of: {expected})")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
    pub expected: String,
}

/// Match `raw` against `all` by wire name, ignoring case and treating `-` as `_`.
fn parse_variant<T: Copy>(kind: &'static str, raw: &str, all: &[T], name: fn(T) -> &'static str) -> Result<T, UnknownVariant> {
    let wanted = raw.trim().replace('-', "_").to_ascii_uppercase();
    all.iter()
        .copied()
        .find(|v| name(*v) == wanted)
        .ok_or_else(|| UnknownVariant {
            kind,
            value: raw.to_owned(),
            expected: all.iter().map(|v| name(*v)).collect::<Vec<_>>().join(", "),
        })
}

macro_rules! wire_enum_impls {
    ($ty:ident, $kind:literal) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                parse_variant($kind, s, Self::ALL, Self::as_str)
            }
        }
    };
}

// =============================================================================
// USERS
// =============================================================================

/// Account role as assigned by the remote identity service.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

/// Editable profile attached to every account.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub username: String,
    pub full_name: String,
    pub notification_email: String,
    pub enable_notification: bool,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub contact_number: String,
}

/// The signed-in account as returned by `/auth/me`, `/auth/login` and `/auth/register`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticatedUser {
    pub id: String,
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub last_login: DateTime<Utc>,
    pub profile: UserProfile,
}

#[derive(Clone, Debug, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Token plus user pair issued on login/register.
#[derive(Clone, Debug, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: AuthenticatedUser,
}

// =============================================================================
// BOUNTIES
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BountyStatus {
    Open,
    InProgress,
    Completed,
    Cancelled,
}

impl BountyStatus {
    pub const ALL: &'static [Self] = &[Self::Open, Self::InProgress, Self::Completed, Self::Cancelled];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Open => "OPEN",
            Self::InProgress => "IN_PROGRESS",
            Self::Completed => "COMPLETED",
            Self::Cancelled => "CANCELLED",
        }
    }
}

wire_enum_impls!(BountyStatus, "bounty status");

/// Urgency level shared by bounties and tips.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub const ALL: &'static [Self] = &[Self::Low, Self::Medium, Self::High];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
        }
    }
}

wire_enum_impls!(Priority, "priority");

/// Channel a bounty targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BountyCategory {
    Telegram,
    Whatsapp,
    Web,
    CallCenter,
    Teams,
    General,
}

impl BountyCategory {
    pub const ALL: &'static [Self] =
        &[Self::Telegram, Self::Whatsapp, Self::Web, Self::CallCenter, Self::Teams, Self::General];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Telegram => "TELEGRAM",
            Self::Whatsapp => "WHATSAPP",
            Self::Web => "WEB",
            Self::CallCenter => "CALL_CENTER",
            Self::Teams => "TEAMS",
            Self::General => "GENERAL",
        }
    }
}

wire_enum_impls!(BountyCategory, "bounty category");

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bounty {
    pub id: String,
    pub title: String,
    pub description: String,
    pub reward: f64,
    pub status: BountyStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    pub created_by: String,
    pub category: BountyCategory,
    pub priority: Priority,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBountyRequest {
    pub title: String,
    pub description: String,
    pub reward: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    pub category: BountyCategory,
    pub priority: Priority,
}

/// Partial bounty update. Absent fields are left untouched by the server.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBountyRequest {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reward: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<BountyStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<BountyCategory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
}

impl UpdateBountyRequest {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into(), ..Self::default() }
    }
}

// =============================================================================
// TIPS
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TipStatus {
    New,
    InProgress,
    Verified,
    Closed,
    Rejected,
    Paid,
}

impl TipStatus {
    pub const ALL: &'static [Self] =
        &[Self::New, Self::InProgress, Self::Verified, Self::Closed, Self::Rejected, Self::Paid];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::New => "NEW",
            Self::InProgress => "IN_PROGRESS",
            Self::Verified => "VERIFIED",
            Self::Closed => "CLOSED",
            Self::Rejected => "REJECTED",
            Self::Paid => "PAID",
        }
    }
}

wire_enum_impls!(TipStatus, "tip status");

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TipCategory {
    General,
    Sighting,
    Intelligence,
    Evidence,
    Other,
}

impl TipCategory {
    pub const ALL: &'static [Self] = &[Self::General, Self::Sighting, Self::Intelligence, Self::Evidence, Self::Other];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::General => "GENERAL",
            Self::Sighting => "SIGHTING",
            Self::Intelligence => "INTELLIGENCE",
            Self::Evidence => "EVIDENCE",
            Self::Other => "OTHER",
        }
    }
}

wire_enum_impls!(TipCategory, "tip category");

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tip {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: TipCategory,
    /// When the reported activity was observed.
    pub datetime: DateTime<Utc>,
    pub location: String,
    pub status: TipStatus,
    pub priority: Priority,
    pub reward: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTipRequest {
    pub title: String,
    pub description: String,
    pub category: TipCategory,
    pub datetime: DateTime<Utc>,
    pub location: String,
    pub priority: Priority,
    pub reward: f64,
}

/// Partial tip update. Absent fields are left untouched by the server.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTipRequest {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<TipCategory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub datetime: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TipStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reward: Option<f64>,
}

impl UpdateTipRequest {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into(), ..Self::default() }
    }

    /// Whether this update touches a field that reporters are notified about.
    #[must_use]
    pub fn notify_payload(&self) -> Option<TipNotification> {
        if self.priority.is_none() && self.status.is_none() && self.reward.is_none() {
            return None;
        }
        Some(TipNotification { priority: self.priority, status: self.status, reward: self.reward })
    }
}

/// Body of `POST /tips/{id}/notify`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TipNotification {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TipStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reward: Option<f64>,
}

// =============================================================================
// SUMMARY
// =============================================================================

/// Dashboard aggregates from `GET /summary`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total_bounties: u64,
    pub total_tips: u64,
    pub most_common_tip_category: Option<TipCategory>,
    pub most_common_bounty_category: Option<BountyCategory>,
    pub total_revenue: f64,
    pub total_vendors: u64,
    pub total_shops: u64,
}
