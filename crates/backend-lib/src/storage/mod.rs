// ============================
// identity-core/src/storage/mod.rs
// ============================
//! Repository abstraction with in-memory and flat-file implementations.
//!
//! Writes are staged by `insert`, `update` and `delete` and only become
//! visible to reads once `commit` succeeds. The staging area is shared by
//! every holder of the repository; an operation that needs its own result
//! builds a [`WriteBatch`] and hands it to `commit_batch` instead.
use async_trait::async_trait;
use identity_common::{Claim, User};
use uuid::Uuid;

use crate::error::RepositoryError;

mod flat_file;
mod memory;

pub use flat_file::FlatFileRepository;
pub use memory::InMemoryRepository;

pub type Result<T> = std::result::Result<T, RepositoryError>;

/// Anything a repository can store
pub trait Entity: Clone + Send + Sync + 'static {
    /// Stable identifier; never changes once assigned
    fn entity_id(&self) -> Uuid;

    /// Name of the model, used for storage layout and metadata
    fn kind() -> &'static str;

    /// Names of the model's persisted fields
    fn fields() -> &'static [&'static str];
}

impl Entity for User {
    fn entity_id(&self) -> Uuid {
        self.id()
    }

    fn kind() -> &'static str {
        "users"
    }

    fn fields() -> &'static [&'static str] {
        &[
            "id",
            "email",
            "first_name",
            "surname",
            "telephone",
            "password_hash",
            "security_stamp",
            "email_confirmed",
            "two_factor_enabled",
            "access_failed_count",
            "lockout_end",
            "lockout_enabled",
            "last_password_change",
            "claims",
            "created_at",
            "updated_at",
            "deleted",
        ]
    }
}

impl Entity for Claim {
    fn entity_id(&self) -> Uuid {
        self.id
    }

    fn kind() -> &'static str {
        "claims"
    }

    fn fields() -> &'static [&'static str] {
        &["id", "user_id", "claim_type", "claim_value", "application_id"]
    }
}

/// A filter over entities.
///
/// Backends that can translate a filter into a native query may inspect
/// [`describe`](Specification::describe); the rest evaluate
/// [`is_satisfied_by`](Specification::is_satisfied_by) per entity.
pub trait Specification<T>: Send + Sync {
    fn is_satisfied_by(&self, entity: &T) -> bool;

    /// Human-readable form of the filter, for logs and query translation
    fn describe(&self) -> String {
        "custom predicate".to_string()
    }
}

impl<T, F> Specification<T> for F
where
    F: Fn(&T) -> bool + Send + Sync,
{
    fn is_satisfied_by(&self, entity: &T) -> bool {
        self(entity)
    }
}

/// Users whose email equals the given address exactly
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ByEmail(pub String);

impl ByEmail {
    pub fn new(email: impl Into<String>) -> Self {
        Self(email.into())
    }
}

impl Specification<User> for ByEmail {
    fn is_satisfied_by(&self, user: &User) -> bool {
        user.email == self.0
    }

    fn describe(&self) -> String {
        format!("email == {:?}", self.0)
    }
}

/// Repository contract the identity core depends on
#[async_trait]
pub trait Repository<T: Entity>: Send + Sync {
    /// Get a committed entity by id
    async fn find_by_id(&self, id: Uuid) -> Result<Option<T>>;

    /// First committed entity matching `spec`, in repository order
    async fn find_first_matching(&self, spec: &dyn Specification<T>) -> Result<Option<T>>;

    /// Every committed entity
    async fn list_all(&self) -> Result<Vec<T>>;

    /// Stage a new entity
    async fn insert(&self, entity: T) -> Result<()>;

    /// Stage a replacement for an existing entity
    async fn update(&self, entity: T) -> Result<()>;

    /// Stage removal of an entity
    async fn delete(&self, entity: &T) -> Result<()> {
        self.delete_by_id(entity.entity_id()).await
    }

    /// Stage removal by id
    async fn delete_by_id(&self, id: Uuid) -> Result<()>;

    /// Apply staged writes. Returns how many were applied.
    async fn commit(&self) -> Result<usize>;

    /// Apply the writes in `batch` and nothing else. Staged writes are
    /// left alone. Returns how many were applied.
    async fn commit_batch(&self, batch: WriteBatch<T>) -> Result<usize>;

    /// Describe the stored model
    async fn list_model_metadata(&self) -> Result<Vec<String>> {
        Ok(T::fields()
            .iter()
            .map(|field| format!("{}.{}", T::kind(), field))
            .collect())
    }
}

/// A write waiting for the next commit
#[derive(Debug, Clone)]
pub(crate) enum PendingWrite<T> {
    Insert(T),
    Update(T),
    Delete(Uuid),
}

/// Writes owned by a single operation
#[derive(Debug, Clone)]
pub struct WriteBatch<T> {
    writes: Vec<PendingWrite<T>>,
}

impl<T> Default for WriteBatch<T> {
    fn default() -> Self {
        Self { writes: Vec::new() }
    }
}

impl<T: Entity> WriteBatch<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(mut self, entity: T) -> Self {
        self.writes.push(PendingWrite::Insert(entity));
        self
    }

    pub fn update(mut self, entity: T) -> Self {
        self.writes.push(PendingWrite::Update(entity));
        self
    }

    pub fn delete_by_id(mut self, id: Uuid) -> Self {
        self.writes.push(PendingWrite::Delete(id));
        self
    }

    pub fn len(&self) -> usize {
        self.writes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }

    pub(crate) fn into_writes(self) -> Vec<PendingWrite<T>> {
        self.writes
    }
}
