// ============================
// identity-core/src/storage/memory.rs
// ============================
//! In-memory repository.
use async_trait::async_trait;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use super::{Entity, PendingWrite, Repository, Result, Specification, WriteBatch};
use crate::error::RepositoryError;

struct State<T> {
    /// Committed entities in insertion order
    committed: Vec<T>,
    pending: Vec<PendingWrite<T>>,
}

/// Repository backed by a vector in memory.
///
/// Commits are all-or-nothing: if any write is invalid (duplicate id on
/// insert, unknown id on update or delete) nothing is applied. A failed
/// `commit` discards the shared staged writes; a failed `commit_batch`
/// only drops its own batch.
#[derive(Clone)]
pub struct InMemoryRepository<T> {
    state: Arc<RwLock<State<T>>>,
}

impl<T: Entity> Default for InMemoryRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Entity> InMemoryRepository<T> {
    /// Create an empty repository
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(State {
                committed: Vec::new(),
                pending: Vec::new(),
            })),
        }
    }

    /// Number of writes staged since the last commit
    pub fn pending_len(&self) -> usize {
        self.state.read().pending.len()
    }

    /// Drop every staged write
    pub fn rollback(&self) {
        self.state.write().pending.clear();
    }
}

fn apply<T: Entity>(committed: &mut Vec<T>, write: PendingWrite<T>) -> Result<()> {
    match write {
        PendingWrite::Insert(entity) => {
            let id = entity.entity_id();
            if committed.iter().any(|e| e.entity_id() == id) {
                return Err(RepositoryError::AlreadyExists(id));
            }
            committed.push(entity);
        },
        PendingWrite::Update(entity) => {
            let id = entity.entity_id();
            let slot = committed
                .iter_mut()
                .find(|e| e.entity_id() == id)
                .ok_or(RepositoryError::NotFound(id))?;
            *slot = entity;
        },
        PendingWrite::Delete(id) => {
            let index = committed
                .iter()
                .position(|e| e.entity_id() == id)
                .ok_or(RepositoryError::NotFound(id))?;
            committed.remove(index);
        },
    }
    Ok(())
}

/// Apply `writes` to a copy of `committed` and swap it in only if all succeed
fn apply_all<T: Entity>(committed: &mut Vec<T>, writes: Vec<PendingWrite<T>>) -> Result<usize> {
    let count = writes.len();
    let mut next = committed.clone();
    for write in writes {
        apply(&mut next, write)?;
    }
    *committed = next;
    Ok(count)
}

#[async_trait]
impl<T: Entity> Repository<T> for InMemoryRepository<T> {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<T>> {
        let state = self.state.read();
        Ok(state.committed.iter().find(|e| e.entity_id() == id).cloned())
    }

    async fn find_first_matching(&self, spec: &dyn Specification<T>) -> Result<Option<T>> {
        let state = self.state.read();
        Ok(state
            .committed
            .iter()
            .find(|e| spec.is_satisfied_by(e))
            .cloned())
    }

    async fn list_all(&self) -> Result<Vec<T>> {
        Ok(self.state.read().committed.clone())
    }

    async fn insert(&self, entity: T) -> Result<()> {
        self.state.write().pending.push(PendingWrite::Insert(entity));
        Ok(())
    }

    async fn update(&self, entity: T) -> Result<()> {
        self.state.write().pending.push(PendingWrite::Update(entity));
        Ok(())
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<()> {
        self.state.write().pending.push(PendingWrite::Delete(id));
        Ok(())
    }

    async fn commit(&self) -> Result<usize> {
        let mut state = self.state.write();
        let pending = std::mem::take(&mut state.pending);
        let count = apply_all(&mut state.committed, pending)?;

        debug!(kind = T::kind(), applied = count, "in-memory commit");
        Ok(count)
    }

    async fn commit_batch(&self, batch: WriteBatch<T>) -> Result<usize> {
        let mut state = self.state.write();
        let count = apply_all(&mut state.committed, batch.into_writes())?;

        debug!(kind = T::kind(), applied = count, "in-memory batch commit");
        Ok(count)
    }
}
