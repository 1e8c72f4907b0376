// ================
// common/src/lib.rs
// ================
//! Common identity types
//! shared between the identity core and the services that host it.
//! This module defines the stored entities and the registration payload.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

mod outcome;

pub use outcome::{Outcome, OutcomeKind};

/// A registered identity
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct User {
    id: Uuid,
    /// Login email address, unique across users
    pub email: String,
    pub first_name: String,
    pub surname: String,
    /// Contact telephone number
    #[serde(default)]
    pub telephone: Option<String>,
    /// Encoded credential hash, never the plaintext
    pub password_hash: String,
    /// Random token rotated on every security-relevant change
    pub security_stamp: String,
    pub email_confirmed: bool,
    pub two_factor_enabled: bool,
    pub access_failed_count: u32,
    /// Reserved: not consulted by any lifecycle operation
    #[serde(default)]
    pub lockout_end: Option<DateTime<Utc>>,
    /// Reserved: not consulted by any lifecycle operation
    #[serde(default)]
    pub lockout_enabled: bool,
    #[serde(default)]
    pub last_password_change: Option<DateTime<Utc>>,
    /// Claims owned by this user, in insertion order
    #[serde(default)]
    pub claims: Vec<Claim>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub deleted: bool,
}

impl User {
    /// Create an unconfirmed user with a freshly assigned id
    pub fn new(email: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email: email.into(),
            first_name: String::new(),
            surname: String::new(),
            telephone: None,
            password_hash: String::new(),
            security_stamp: String::new(),
            email_confirmed: false,
            two_factor_enabled: false,
            access_failed_count: 0,
            lockout_end: None,
            lockout_enabled: false,
            last_password_change: None,
            claims: Vec::new(),
            created_at: now,
            updated_at: now,
            deleted: false,
        }
    }

    /// The id assigned at construction. There is no setter.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Bump the modification timestamp
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.email)
    }
}

/// A claim held by a user, optionally scoped to one application
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Claim {
    pub id: Uuid,
    /// Back-reference to the owning user
    pub user_id: Uuid,
    pub claim_type: String,
    pub claim_value: String,
    #[serde(default)]
    pub application_id: Option<String>,
}

impl Claim {
    pub fn new(user_id: Uuid, claim_type: impl Into<String>, claim_value: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            claim_type: claim_type.into(),
            claim_value: claim_value.into(),
            application_id: None,
        }
    }

    /// Scope the claim to a single application
    pub fn for_application(mut self, application_id: impl Into<String>) -> Self {
        self.application_id = Some(application_id.into());
        self
    }
}

/// Registration payload submitted by a prospective user
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub surname: String,
    #[serde(default)]
    pub employee_id: String,
    #[serde(default)]
    pub profit_center_id: String,
    #[serde(default)]
    pub telephone: Option<String>,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirm_password: String,
}
