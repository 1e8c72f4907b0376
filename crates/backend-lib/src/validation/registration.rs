// ============================
// crates/backend-lib/src/validation/registration.rs
// ============================
//! Registration request validation.
use identity_common::{Outcome, RegistrationRequest, User};
use std::sync::Arc;
use tracing::warn;

use super::password::PasswordPolicy;
use crate::storage::{ByEmail, Repository};

pub const PASSWORDS_DO_NOT_MATCH: &str = "Passwords do not match";
pub const PROFIT_CENTER_MISSING: &str = "ProfitCenterId not specified";
pub const EMAIL_MISSING: &str = "Email not specified";
pub const EMPLOYEE_ID_MISSING: &str = "EmployeeId not specified";
pub const FIRST_NAME_MISSING: &str = "First Name not specified";
pub const SURNAME_MISSING: &str = "Surname not specified";

/// Message for an address that is already registered
pub fn email_taken(email: &str) -> String {
    format!("User with email {email} already exists!")
}

/// Message for an address outside the organisation's domain
pub fn domain_not_allowed(domain: &str) -> String {
    format!("Only {domain} emails are allowed!")
}

/// Checks a registration request against every rule and reports all failures
pub struct RegistrationValidator<R> {
    repository: Arc<R>,
    email_domain: String,
}

impl<R> Clone for RegistrationValidator<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            email_domain: self.email_domain.clone(),
        }
    }
}

impl<R: Repository<User>> RegistrationValidator<R> {
    /// Create a validator accepting only addresses at `email_domain`
    pub fn new(repository: Arc<R>, email_domain: impl Into<String>) -> Self {
        Self {
            repository,
            email_domain: email_domain.into(),
        }
    }

    pub fn email_domain(&self) -> &str {
        &self.email_domain
    }

    /// Validate `request`. Rules never short-circuit; the outcome lists
    /// every failure in rule order.
    pub async fn validate(&self, request: &RegistrationRequest) -> Outcome {
        let mut errors = Vec::new();

        match self
            .repository
            .find_first_matching(&ByEmail::new(request.email.as_str()))
            .await
        {
            Ok(Some(_)) => errors.push(email_taken(&request.email)),
            Ok(None) => {},
            Err(e) => {
                warn!(error = %e, "email uniqueness lookup failed");
                errors.push(e.to_string());
            },
        }

        let required_suffix = format!("@{}", self.email_domain.to_lowercase());
        if !request.email.to_lowercase().contains(&required_suffix) {
            errors.push(domain_not_allowed(&self.email_domain));
        }

        if request.password != request.confirm_password {
            errors.push(PASSWORDS_DO_NOT_MATCH.to_string());
        }

        let required = [
            (&request.profit_center_id, PROFIT_CENTER_MISSING),
            (&request.email, EMAIL_MISSING),
            (&request.employee_id, EMPLOYEE_ID_MISSING),
            (&request.first_name, FIRST_NAME_MISSING),
            (&request.surname, SURNAME_MISSING),
        ];
        for (value, message) in required {
            if value.is_empty() {
                errors.push(message.to_string());
            }
        }

        errors.extend(PasswordPolicy::validate(&request.password));

        Outcome::from_errors(errors)
    }
}
