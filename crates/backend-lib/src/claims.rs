// ============================
// identity-core/src/claims.rs
// ============================
//! Claim store contract.
//!
//! The identity core does not persist claims itself. Hosts that need claims
//! plug a store into the lifecycle manager; how it treats duplicates and
//! repeated removals is up to the store.
use async_trait::async_trait;
use identity_common::Claim;
use uuid::Uuid;

use crate::error::RepositoryError;

#[async_trait]
pub trait ClaimStore: Send + Sync {
    async fn add_claim(&self, user_id: Uuid, claim: Claim) -> Result<(), RepositoryError>;

    async fn remove_claim(&self, user_id: Uuid, claim: &Claim) -> Result<(), RepositoryError>;

    async fn list_claims(&self, user_id: Uuid) -> Result<Vec<Claim>, RepositoryError>;
}
