//! Form validation for auth, record and dialog inputs.
//!
//! DESIGN
//! ======
//! Each validator checks every field and reports all failures at once, keyed
//! by wire field name, so the CLI can print one message per bad flag the way a
//! form shows one helper text per input. Validators are pure; the clock is
//! passed in where "in the future" matters.

#[cfg(test)]
#[path = "validate_test.rs"]
mod tests;

use chrono::{DateTime, Utc};

use crate::net::types::{CreateBountyRequest, CreateTipRequest, UpdateBountyRequest, UpdateTipRequest, UserProfile};

pub const MIN_PASSWORD_LEN: usize = 6;

/// One failing field and its user-facing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// All field failures from one validation pass. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid input ({})", join_fields(.errors))]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

fn join_fields(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationErrors {
    #[must_use]
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Message for `field`, if it failed.
    #[must_use]
    pub fn message_for(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }
}

#[derive(Default)]
struct Checks {
    errors: Vec<FieldError>,
}

impl Checks {
    fn fail(&mut self, field: &'static str, message: &str) {
        // First failure per field wins.
        if !self.errors.iter().any(|e| e.field == field) {
            self.errors.push(FieldError { field, message: message.to_owned() });
        }
    }

    fn required(&mut self, field: &'static str, value: &str, message: &str) {
        if value.trim().is_empty() {
            self.fail(field, message);
        }
    }

    fn email(&mut self, field: &'static str, value: &str) {
        if value.trim().is_empty() {
            self.fail(field, "Email is required");
        } else if !is_valid_email(value) {
            self.fail(field, "Invalid email");
        }
    }

    fn positive(&mut self, field: &'static str, value: f64, message: &str) {
        if !(value.is_finite() && value > 0.0) {
            self.fail(field, message);
        }
    }

    fn future(&mut self, field: &'static str, value: Option<DateTime<Utc>>, now: DateTime<Utc>, message: &str) {
        if value.is_some_and(|at| at <= now) {
            self.fail(field, message);
        }
    }

    fn non_blank_if_set(&mut self, field: &'static str, value: Option<&str>, message: &str) {
        if let Some(v) = value {
            self.required(field, v, message);
        }
    }

    fn finish(self) -> Result<(), ValidationErrors> {
        if self.errors.is_empty() { Ok(()) } else { Err(ValidationErrors { errors: self.errors }) }
    }
}

/// Loose structural email check: `local@domain.tld`, no whitespace.
#[must_use]
pub fn is_valid_email(raw: &str) -> bool {
    let value = raw.trim();
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    let Some((name, tld)) = domain.rsplit_once('.') else {
        return false;
    };
    !name.is_empty() && !tld.is_empty() && !domain.starts_with('.') && !domain.contains("..")
}

// =============================================================================
// AUTH FORMS
// =============================================================================

/// Login form: email required and well-formed, password required.
///
/// # Errors
///
/// Returns every failing field.
pub fn validate_login(email: &str, password: &str) -> Result<(), ValidationErrors> {
    let mut checks = Checks::default();
    checks.email("email", email);
    if password.is_empty() {
        checks.fail("password", "Password is required");
    }
    checks.finish()
}

/// Register form: username required, email well-formed, password of at
/// least [`MIN_PASSWORD_LEN`] characters.
///
/// # Errors
///
/// Returns every failing field.
pub fn validate_register(username: &str, email: &str, password: &str) -> Result<(), ValidationErrors> {
    let mut checks = Checks::default();
    checks.required("username", username, "Username is required");
    checks.email("email", email);
    if password.is_empty() {
        checks.fail("password", "Password is required");
    } else if password.chars().count() < MIN_PASSWORD_LEN {
        checks.fail("password", "Password must be at least 6 characters");
    }
    checks.finish()
}

/// # Errors
///
/// Returns every failing field.
pub fn validate_profile(profile: &UserProfile) -> Result<(), ValidationErrors> {
    let mut checks = Checks::default();
    checks.required("username", &profile.username, "Username is required");
    checks.required("fullName", &profile.full_name, "Full name is required");
    if !profile.notification_email.trim().is_empty() && !is_valid_email(&profile.notification_email) {
        checks.fail("notificationEmail", "Invalid email");
    }
    checks.finish()
}

// =============================================================================
// RECORD FORMS
// =============================================================================

/// # Errors
///
/// Returns every failing field.
pub fn validate_new_bounty(request: &CreateBountyRequest, now: DateTime<Utc>) -> Result<(), ValidationErrors> {
    let mut checks = Checks::default();
    checks.required("title", &request.title, "Title is required");
    checks.required("description", &request.description, "Description is required");
    checks.positive("reward", request.reward, "Reward must be positive");
    checks.future("expiresAt", request.expires_at, now, "Expiry date must be in the future");
    checks.finish()
}

/// # Errors
///
/// Returns every failing field.
pub fn validate_bounty_update(request: &UpdateBountyRequest, now: DateTime<Utc>) -> Result<(), ValidationErrors> {
    let mut checks = Checks::default();
    checks.required("id", &request.id, "Bounty id is required");
    checks.non_blank_if_set("title", request.title.as_deref(), "Title is required");
    checks.non_blank_if_set("description", request.description.as_deref(), "Description is required");
    if let Some(reward) = request.reward {
        checks.positive("reward", reward, "Reward must be positive");
    }
    checks.future("expiresAt", request.expires_at, now, "Expiry date must be in the future");
    checks.finish()
}

/// # Errors
///
/// Returns every failing field.
pub fn validate_new_tip(request: &CreateTipRequest) -> Result<(), ValidationErrors> {
    let mut checks = Checks::default();
    checks.required("title", &request.title, "Title is required");
    checks.required("description", &request.description, "Description is required");
    checks.required("location", &request.location, "Location is required");
    checks.positive("reward", request.reward, "Reward must be positive");
    checks.finish()
}

/// # Errors
///
/// Returns every failing field.
pub fn validate_tip_update(request: &UpdateTipRequest) -> Result<(), ValidationErrors> {
    let mut checks = Checks::default();
    checks.required("id", &request.id, "Tip id is required");
    checks.non_blank_if_set("title", request.title.as_deref(), "Title is required");
    checks.non_blank_if_set("description", request.description.as_deref(), "Description is required");
    checks.non_blank_if_set("location", request.location.as_deref(), "Location is required");
    if let Some(reward) = request.reward {
        checks.positive("reward", reward, "Reward must be positive");
    }
    checks.finish()
}

/// Reward-assignment dialog amount.
///
/// # Errors
///
/// Returns an error unless `amount` is finite and greater than zero.
pub fn validate_reward(amount: f64) -> Result<(), ValidationErrors> {
    let mut checks = Checks::default();
    checks.positive("reward", amount, "Reward must be positive");
    checks.finish()
}

/// Record id used as a single URL path segment and route segment.
///
/// # Errors
///
/// Returns an error for blank ids, dot segments, or ids containing `/`.
pub fn validate_record_id(id: &str) -> Result<(), ValidationErrors> {
    let mut checks = Checks::default();
    checks.required("id", id, "Id is required");
    if matches!(id, "." | "..") || id.contains('/') {
        checks.fail("id", "Id must be a single path segment");
    }
    checks.finish()
}
