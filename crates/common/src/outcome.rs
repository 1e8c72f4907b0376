//! Result value returned by every lifecycle operation.

use crate::User;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Message recorded when a failure is constructed without any reasons
const UNSPECIFIED_FAILURE: &str = "Operation failed";

/// Which request produced an outcome
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeKind {
    LoginRequest,
    RegisterRequest,
    ConfirmAccountRequest,
    PasswordResetRequest,
}

/// Success or failure of an identity operation, with every reason it failed.
///
/// `succeeded()` is true exactly when `errors()` is empty. The fields are
/// private so the two can never disagree.
#[derive(Serialize, Debug, Clone)]
pub struct Outcome {
    succeeded: bool,
    errors: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    kind: Option<OutcomeKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    user_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    security_stamp: Option<String>,
    #[serde(skip)]
    user: Option<User>,
}

impl Outcome {
    /// The shared success value
    pub fn success() -> Self {
        Self::default()
    }

    /// A failed outcome carrying `errors` in order
    pub fn failed<I, S>(errors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut errors: Vec<String> = errors.into_iter().map(Into::into).collect();
        if errors.is_empty() {
            errors.push(UNSPECIFIED_FAILURE.to_string());
        }
        Self {
            succeeded: false,
            errors,
            ..Self::default()
        }
    }

    /// Success when `errors` is empty, failure otherwise
    pub fn from_errors(errors: Vec<String>) -> Self {
        if errors.is_empty() {
            Self::success()
        } else {
            Self::failed(errors)
        }
    }

    pub fn succeeded(&self) -> bool {
        self.succeeded
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn kind(&self) -> Option<OutcomeKind> {
        self.kind
    }

    pub fn user_id(&self) -> Option<Uuid> {
        self.user_id
    }

    pub fn security_stamp(&self) -> Option<&str> {
        self.security_stamp.as_deref()
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// Take ownership of the attached user, if any
    pub fn into_user(self) -> Option<User> {
        self.user
    }

    pub fn with_kind(mut self, kind: OutcomeKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn with_user_id(mut self, user_id: Uuid) -> Self {
        self.user_id = Some(user_id);
        self
    }

    pub fn with_security_stamp(mut self, stamp: impl Into<String>) -> Self {
        self.security_stamp = Some(stamp.into());
        self
    }

    pub fn with_user(mut self, user: User) -> Self {
        self.user = Some(user);
        self
    }
}

impl Default for Outcome {
    fn default() -> Self {
        Self {
            succeeded: true,
            errors: Vec::new(),
            kind: None,
            user_id: None,
            security_stamp: None,
            user: None,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.succeeded {
            f.write_str("Succeeded")
        } else {
            write!(f, "Failed : {}", self.errors.join(","))
        }
    }
}
