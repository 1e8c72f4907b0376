// ============================
// identity-core/src/manager.rs
// ============================
//! Account lifecycle: registration, confirmation and sign-in.
//!
//! Business failures come back as `Ok(Outcome)` with the reasons listed;
//! `Err` is reserved for cancellation, missing collaborators and faults the
//! caller has to handle itself.
use std::sync::Arc;

use chrono::Utc;
use identity_common::{Claim, Outcome, OutcomeKind, RegistrationRequest, User};
use metrics::counter;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    auth::{fixed_time_eq, generate_security_token, CredentialHasher, OsRandom, SecureRandom},
    claims::ClaimStore,
    config::Settings,
    error::{IdentityError, Result},
    metrics::{
        ACCOUNT_CONFIRMED, CONFIRM_FAILED, REGISTER_FAILED, SIGN_IN_FAILED, SIGN_IN_SUCCEEDED,
        USER_REGISTERED,
    },
    storage::{ByEmail, Repository, WriteBatch},
    validation::RegistrationValidator,
};

pub const USER_NOT_FOUND: &str = "User not found";
pub const CONFIRMATION_MISMATCH: &str = "Token or password was incorrect";
pub const ACCOUNT_NOT_CONFIRMED: &str =
    "Sorry, this account has not been confirmed! Please check your email for the Activation Link";
pub const PASSWORD_INVALID: &str = "Password Invalid!";

/// Sign-in message for an unknown address
pub fn email_not_found(email: &str) -> String {
    format!("User with email address {email} not found!")
}

fn check_cancelled(cancel: Option<&CancellationToken>) -> Result<()> {
    match cancel {
        Some(token) if token.is_cancelled() => Err(IdentityError::Cancelled),
        _ => Ok(()),
    }
}

/// Drives users through registration, confirmation and sign-in
pub struct IdentityLifecycleManager<R> {
    repository: Arc<R>,
    hasher: CredentialHasher,
    validator: RegistrationValidator<R>,
    rng: Arc<dyn SecureRandom>,
    claim_store: Option<Arc<dyn ClaimStore>>,
}

impl<R> Clone for IdentityLifecycleManager<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            hasher: self.hasher.clone(),
            validator: self.validator.clone(),
            rng: Arc::clone(&self.rng),
            claim_store: self.claim_store.clone(),
        }
    }
}

impl<R: Repository<User>> IdentityLifecycleManager<R> {
    /// Create a manager using OS randomness and the configured email domain
    pub fn new(repository: Arc<R>, settings: &Settings) -> Self {
        Self::with_random(repository, settings.email_domain.clone(), Arc::new(OsRandom))
    }

    /// Create a manager drawing salts and stamps from `rng`
    pub fn with_random(
        repository: Arc<R>,
        email_domain: impl Into<String>,
        rng: Arc<dyn SecureRandom>,
    ) -> Self {
        Self {
            validator: RegistrationValidator::new(Arc::clone(&repository), email_domain),
            hasher: CredentialHasher::new(Arc::clone(&rng)),
            repository,
            rng,
            claim_store: None,
        }
    }

    /// Delegate claim operations to `store`
    pub fn with_claim_store(mut self, store: Arc<dyn ClaimStore>) -> Self {
        self.claim_store = Some(store);
        self
    }

    pub fn hasher(&self) -> &CredentialHasher {
        &self.hasher
    }

    pub fn repository(&self) -> &Arc<R> {
        &self.repository
    }

    /// Exact-match lookup by email
    pub async fn find_by_email(
        &self,
        email: &str,
        cancel: Option<&CancellationToken>,
    ) -> Result<Option<User>> {
        check_cancelled(cancel)?;
        Ok(self.repository.find_first_matching(&ByEmail::new(email)).await?)
    }

    /// Validate `request` and create an unconfirmed user.
    ///
    /// A rejected request returns the validator's outcome as is. On success
    /// the outcome carries the new user's id and security stamp.
    pub async fn register(
        &self,
        request: &RegistrationRequest,
        cancel: Option<&CancellationToken>,
    ) -> Result<Outcome> {
        check_cancelled(cancel)?;

        let validation = self.validator.validate(request).await;
        if !validation.succeeded() {
            counter!(REGISTER_FAILED).increment(1);
            info!(
                email = %request.email,
                errors = validation.errors().len(),
                "registration rejected"
            );
            return Ok(validation);
        }

        let mut user = User::new(request.email.as_str());
        user.first_name = request.first_name.clone();
        user.surname = request.surname.clone();
        user.telephone = request.telephone.clone();
        user.password_hash = self.hasher.hash(&request.password);
        user.security_stamp = generate_security_token(self.rng.as_ref());
        user.last_password_change = Some(Utc::now());

        let user_id = user.id();
        let stamp = user.security_stamp.clone();

        if let Err(e) = self.repository.commit_batch(WriteBatch::new().insert(user)).await {
            counter!(REGISTER_FAILED).increment(1);
            warn!(email = %request.email, error = %e, "failed to store new user");
            return Ok(Outcome::failed([e.to_string()]));
        }

        counter!(USER_REGISTERED).increment(1);
        info!(%user_id, email = %request.email, "user registered");
        Ok(Outcome::success()
            .with_kind(OutcomeKind::RegisterRequest)
            .with_user_id(user_id)
            .with_security_stamp(stamp))
    }

    /// Confirm the account at `email`.
    ///
    /// `stamp` must equal the stored security stamp and `proof` must be an
    /// encoded hash of the stored password hash, as produced by
    /// [`confirmation_proof`](Self::confirmation_proof). A successful
    /// confirmation rotates the stamp, so each link works once.
    pub async fn confirm_account(
        &self,
        email: &str,
        stamp: &str,
        proof: &str,
        cancel: Option<&CancellationToken>,
    ) -> Result<Outcome> {
        check_cancelled(cancel)?;

        let mut user = match self.repository.find_first_matching(&ByEmail::new(email)).await {
            Ok(Some(user)) => user,
            Ok(None) => {
                counter!(CONFIRM_FAILED).increment(1);
                debug!(%email, "confirmation for unknown user");
                return Ok(Outcome::failed([USER_NOT_FOUND]));
            },
            Err(e) => {
                counter!(CONFIRM_FAILED).increment(1);
                warn!(%email, error = %e, "user lookup failed");
                return Ok(Outcome::failed([e.to_string()]));
            },
        };

        let stamp_matches = fixed_time_eq(user.security_stamp.as_bytes(), stamp.as_bytes());
        if !stamp_matches || !self.hasher.verify(proof, &user.password_hash) {
            counter!(CONFIRM_FAILED).increment(1);
            info!(user_id = %user.id(), "confirmation rejected");
            return Ok(Outcome::failed([CONFIRMATION_MISMATCH]));
        }

        user.email_confirmed = true;
        user.security_stamp = generate_security_token(self.rng.as_ref());
        user.touch();
        let user_id = user.id();

        if let Err(e) = self.repository.commit_batch(WriteBatch::new().update(user)).await {
            counter!(CONFIRM_FAILED).increment(1);
            warn!(%user_id, error = %e, "failed to store confirmation");
            return Ok(Outcome::failed([e.to_string()]));
        }

        counter!(ACCOUNT_CONFIRMED).increment(1);
        info!(%user_id, "account confirmed");
        Ok(Outcome::success()
            .with_kind(OutcomeKind::ConfirmAccountRequest)
            .with_user_id(user_id))
    }

    /// The proof a confirmation link for `user` carries
    pub fn confirmation_proof(&self, user: &User) -> String {
        self.hasher.hash(&user.password_hash)
    }

    /// Check `password` for the account at `email`.
    ///
    /// Unconfirmed accounts are refused before the password is looked at.
    /// A failed outcome always carries exactly one reason.
    pub async fn sign_in(
        &self,
        email: &str,
        password: &str,
        cancel: Option<&CancellationToken>,
    ) -> Result<Outcome> {
        check_cancelled(cancel)?;

        let reason = match self.repository.find_first_matching(&ByEmail::new(email)).await {
            Ok(None) => email_not_found(email),
            Ok(Some(user)) if !user.email_confirmed => ACCOUNT_NOT_CONFIRMED.to_string(),
            Ok(Some(user)) if !self.hasher.verify(&user.password_hash, password) => {
                PASSWORD_INVALID.to_string()
            },
            Ok(Some(user)) => {
                counter!(SIGN_IN_SUCCEEDED).increment(1);
                info!(user_id = %user.id(), "sign-in succeeded");
                return Ok(Outcome::success()
                    .with_kind(OutcomeKind::LoginRequest)
                    .with_user_id(user.id())
                    .with_user(user));
            },
            Err(e) => {
                warn!(%email, error = %e, "user lookup failed");
                e.to_string()
            },
        };

        counter!(SIGN_IN_FAILED).increment(1);
        info!(%email, %reason, "sign-in failed");
        Ok(Outcome::failed([reason]).with_kind(OutcomeKind::LoginRequest))
    }

    /// A fresh 256-bit security token, URL-safe base64 without padding
    pub fn generate_security_token(&self, cancel: Option<&CancellationToken>) -> Result<String> {
        check_cancelled(cancel)?;
        Ok(generate_security_token(self.rng.as_ref()))
    }

    /// Hand `claim` to the configured claim store
    pub async fn add_claim(
        &self,
        user_id: Uuid,
        claim: Claim,
        cancel: Option<&CancellationToken>,
    ) -> Result<Outcome> {
        check_cancelled(cancel)?;
        let store = self
            .claim_store
            .as_ref()
            .ok_or(IdentityError::NotImplemented("add_claim"))?;
        store.add_claim(user_id, claim).await?;
        debug!(%user_id, "claim added");
        Ok(Outcome::success())
    }

    /// Ask the configured claim store to drop `claim`
    pub async fn delete_claim(
        &self,
        user_id: Uuid,
        claim: &Claim,
        cancel: Option<&CancellationToken>,
    ) -> Result<Outcome> {
        check_cancelled(cancel)?;
        let store = self
            .claim_store
            .as_ref()
            .ok_or(IdentityError::NotImplemented("delete_claim"))?;
        store.remove_claim(user_id, claim).await?;
        debug!(%user_id, "claim removed");
        Ok(Outcome::success())
    }
}
