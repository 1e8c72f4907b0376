// ============================
// identity-core/src/storage/flat_file.rs
// ============================
//! Flat-file repository: one pretty-printed JSON document per entity.
use async_trait::async_trait;
use parking_lot::Mutex;
use serde::{de::DeserializeOwned, Serialize};
use std::{
    fs,
    marker::PhantomData,
    path::{Path, PathBuf},
    sync::Arc,
};
use tokio::{fs as tokio_fs, sync::Mutex as AsyncMutex};
use tracing::{debug, warn};
use uuid::Uuid;

use super::{Entity, PendingWrite, Repository, Result, Specification, WriteBatch};
use crate::config::Settings;
use crate::error::RepositoryError;

/// Repository persisting entities under `<root>/<kind>/<id>.json`.
///
/// Each file is replaced atomically (write to a temporary file, then
/// rename). Commits run one at a time. A commit is not atomic across
/// files: on failure the writes before the failing one stay applied and the
/// rest are discarded.
pub struct FlatFileRepository<T> {
    dir: PathBuf,
    pending: Arc<Mutex<Vec<PendingWrite<T>>>>,
    commit_lock: Arc<AsyncMutex<()>>,
    _entity: PhantomData<fn() -> T>,
}

impl<T> Clone for FlatFileRepository<T> {
    fn clone(&self) -> Self {
        Self {
            dir: self.dir.clone(),
            pending: Arc::clone(&self.pending),
            commit_lock: Arc::clone(&self.commit_lock),
            _entity: PhantomData,
        }
    }
}

impl<T> FlatFileRepository<T>
where
    T: Entity + Serialize + DeserializeOwned,
{
    /// Open (creating if needed) the repository rooted at `root`
    pub fn new<P: AsRef<Path>>(root: P) -> Result<Self> {
        let dir = root.as_ref().join(T::kind());
        fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            pending: Arc::new(Mutex::new(Vec::new())),
            commit_lock: Arc::new(AsyncMutex::new(())),
            _entity: PhantomData,
        })
    }

    /// Open the repository under the configured `data_dir`
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Self::new(&settings.data_dir)
    }

    fn entity_path(&self, id: Uuid) -> PathBuf {
        self.dir.join(format!("{id}.json"))
    }

    async fn read_entity(&self, path: &Path) -> Result<T> {
        let content = tokio_fs::read_to_string(path).await?;
        Ok(serde_json::from_str(&content)?)
    }

    async fn write_entity(&self, entity: &T) -> Result<()> {
        let path = self.entity_path(entity.entity_id());
        let tmp = path.with_extension("json.tmp");
        let json = serde_json::to_string_pretty(entity)?;
        tokio_fs::write(&tmp, json).await?;
        tokio_fs::rename(&tmp, &path).await?;
        Ok(())
    }

    async fn apply_all(&self, writes: Vec<PendingWrite<T>>) -> Result<usize> {
        let mut applied = 0;
        for write in writes {
            if let Err(e) = self.apply(write).await {
                warn!(kind = T::kind(), applied, error = %e, "flat-file commit stopped");
                return Err(e);
            }
            applied += 1;
        }
        Ok(applied)
    }

    async fn apply(&self, write: PendingWrite<T>) -> Result<()> {
        match write {
            PendingWrite::Insert(entity) => {
                let id = entity.entity_id();
                if tokio_fs::try_exists(self.entity_path(id)).await? {
                    return Err(RepositoryError::AlreadyExists(id));
                }
                self.write_entity(&entity).await
            },
            PendingWrite::Update(entity) => {
                let id = entity.entity_id();
                if !tokio_fs::try_exists(self.entity_path(id)).await? {
                    return Err(RepositoryError::NotFound(id));
                }
                self.write_entity(&entity).await
            },
            PendingWrite::Delete(id) => match tokio_fs::remove_file(self.entity_path(id)).await {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    Err(RepositoryError::NotFound(id))
                },
                Err(e) => Err(e.into()),
            },
        }
    }
}

#[async_trait]
impl<T> Repository<T> for FlatFileRepository<T>
where
    T: Entity + Serialize + DeserializeOwned,
{
    async fn find_by_id(&self, id: Uuid) -> Result<Option<T>> {
        let path = self.entity_path(id);
        if !tokio_fs::try_exists(&path).await? {
            return Ok(None);
        }
        self.read_entity(&path).await.map(Some)
    }

    async fn find_first_matching(&self, spec: &dyn Specification<T>) -> Result<Option<T>> {
        debug!(kind = T::kind(), filter = %spec.describe(), "scanning flat-file repository");
        Ok(self
            .list_all()
            .await?
            .into_iter()
            .find(|entity| spec.is_satisfied_by(entity)))
    }

    /// Entities ordered by file name, so by id
    async fn list_all(&self) -> Result<Vec<T>> {
        let mut paths = Vec::new();
        let mut entries = tokio_fs::read_dir(&self.dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                paths.push(path);
            }
        }
        paths.sort();

        let mut entities = Vec::with_capacity(paths.len());
        for path in paths {
            entities.push(self.read_entity(&path).await?);
        }
        Ok(entities)
    }

    async fn insert(&self, entity: T) -> Result<()> {
        self.pending.lock().push(PendingWrite::Insert(entity));
        Ok(())
    }

    async fn update(&self, entity: T) -> Result<()> {
        self.pending.lock().push(PendingWrite::Update(entity));
        Ok(())
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<()> {
        self.pending.lock().push(PendingWrite::Delete(id));
        Ok(())
    }

    async fn commit(&self) -> Result<usize> {
        let _guard = self.commit_lock.lock().await;
        let pending = std::mem::take(&mut *self.pending.lock());
        let applied = self.apply_all(pending).await?;

        debug!(kind = T::kind(), applied, "flat-file commit");
        Ok(applied)
    }

    async fn commit_batch(&self, batch: WriteBatch<T>) -> Result<usize> {
        let _guard = self.commit_lock.lock().await;
        let applied = self.apply_all(batch.into_writes()).await?;

        debug!(kind = T::kind(), applied, "flat-file batch commit");
        Ok(applied)
    }
}
