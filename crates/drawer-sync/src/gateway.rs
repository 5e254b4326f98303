//! # Persistence Gateway
//!
//! Loads and saves a user's whole [`UserDocument`]. The core never does
//! I/O itself; it hands documents to a gateway through the saver.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        FallbackGateway                                  │
//! │                                                                         │
//! │  save(user, doc)                                                        │
//! │     ├──► LocalFileStore   always, best-effort (failure only logged)    │
//! │     └──► SqliteGateway    when user is Some; error is returned         │
//! │                                                                         │
//! │  load(user)                                                             │
//! │     ├── user None ──► LocalFileStore                                   │
//! │     └── user Some ──► SqliteGateway ── error ──► LocalFileStore        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use chrono::Utc;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

use drawer_core::UserDocument;
use drawer_db::{Database, SaveOutcome};

use crate::error::{SyncError, SyncResult};

/// Whole-document storage keyed by user identity. `None` is the
/// anonymous guest.
#[async_trait]
pub trait PersistenceGateway: Send + Sync {
    async fn load(&self, user_id: Option<&str>) -> SyncResult<Option<UserDocument>>;

    async fn save(&self, user_id: Option<&str>, document: &UserDocument) -> SyncResult<()>;
}

// =============================================================================
// SQLite Gateway
// =============================================================================

/// Signed-in users' documents in the SQLite store.
///
/// Anonymous documents never reach the shared store: loads return `None`
/// and saves are skipped.
#[derive(Debug, Clone)]
pub struct SqliteGateway {
    db: Database,
    device_id: String,
}

impl SqliteGateway {
    pub fn new(db: Database, device_id: impl Into<String>) -> Self {
        SqliteGateway {
            db,
            device_id: device_id.into(),
        }
    }
}

#[async_trait]
impl PersistenceGateway for SqliteGateway {
    async fn load(&self, user_id: Option<&str>) -> SyncResult<Option<UserDocument>> {
        let Some(user_id) = user_id else {
            return Ok(None);
        };
        let stored = self
            .db
            .documents()
            .load(user_id)
            .await
            .map_err(|e| SyncError::PersistenceFailed(e.to_string()))?;
        Ok(stored.map(|s| s.document))
    }

    async fn save(&self, user_id: Option<&str>, document: &UserDocument) -> SyncResult<()> {
        let Some(user_id) = user_id else {
            debug!("Guest document, skipping database save");
            return Ok(());
        };

        let stamped = document.clone().stamped(Utc::now());
        let outcome = self
            .db
            .documents()
            .save(user_id, &stamped, Some(&self.device_id))
            .await
            .map_err(|e| SyncError::PersistenceFailed(e.to_string()))?;

        if outcome == SaveOutcome::Stale {
            // Another writer saved later; its document stands.
            info!(user_id = %user_id, revision = document.revision, "Newer document already stored");
        }
        Ok(())
    }
}

// =============================================================================
// Local File Store
// =============================================================================

/// One JSON file on disk. Synchronous; used for guests and as a mirror.
#[derive(Debug, Clone)]
pub struct LocalFileStore {
    path: PathBuf,
}

impl LocalFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        LocalFileStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn read(&self) -> SyncResult<Option<UserDocument>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(&self.path)
            .map_err(|e| SyncError::LocalStore(format!("{}: {}", self.path.display(), e)))?;
        let document = UserDocument::from_json(&contents)
            .map_err(|e| SyncError::LocalStore(format!("{}: {}", self.path.display(), e)))?;
        Ok(Some(document))
    }

    /// Writes through a temp file and rename so a crash never leaves a
    /// half-written document.
    pub fn write(&self, document: &UserDocument) -> SyncResult<()> {
        let local_err = |e: std::io::Error| SyncError::LocalStore(format!("{}: {}", self.path.display(), e));

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(local_err)?;
        }
        let json = document.to_json()?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json).map_err(local_err)?;
        std::fs::rename(&tmp, &self.path).map_err(local_err)?;

        debug!(path = %self.path.display(), revision = document.revision, "Local document written");
        Ok(())
    }

    /// Removes the file. Missing is fine.
    pub fn clear(&self) -> SyncResult<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                info!(path = %self.path.display(), "Local document cleared");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(SyncError::LocalStore(format!("{}: {}", self.path.display(), e))),
        }
    }
}

#[async_trait]
impl PersistenceGateway for LocalFileStore {
    async fn load(&self, _user_id: Option<&str>) -> SyncResult<Option<UserDocument>> {
        self.read()
    }

    async fn save(&self, _user_id: Option<&str>, document: &UserDocument) -> SyncResult<()> {
        self.write(document)
    }
}

// =============================================================================
// Fallback Gateway
// =============================================================================

/// Remote store for signed-in users, mirrored to a local file.
#[derive(Clone)]
pub struct FallbackGateway {
    remote: Arc<dyn PersistenceGateway>,
    local: LocalFileStore,
}

impl FallbackGateway {
    pub fn new(remote: Arc<dyn PersistenceGateway>, local: LocalFileStore) -> Self {
        FallbackGateway { remote, local }
    }

    pub fn local(&self) -> &LocalFileStore {
        &self.local
    }
}

#[async_trait]
impl PersistenceGateway for FallbackGateway {
    async fn load(&self, user_id: Option<&str>) -> SyncResult<Option<UserDocument>> {
        if user_id.is_none() {
            return self.local.read();
        }
        match self.remote.load(user_id).await {
            Ok(document) => Ok(document),
            Err(e) => {
                warn!(error = %e, "Remote load failed, using local document");
                self.local.read()
            }
        }
    }

    async fn save(&self, user_id: Option<&str>, document: &UserDocument) -> SyncResult<()> {
        let local = self.local.write(document);

        match user_id {
            None => local,
            Some(_) => {
                if let Err(e) = local {
                    warn!(error = %e, "Local mirror write failed");
                }
                self.remote.save(user_id, document).await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use drawer_core::{DrawerSnapshot, Money, Tier};
    use drawer_db::DbConfig;

    fn document(revision: u64) -> UserDocument {
        let mut doc = UserDocument::empty(Tier::User);
        doc.revision = revision;
        let mut snapshot = DrawerSnapshot::default();
        snapshot.counts.insert("twenty-bill".into(), 3);
        snapshot.total = Money::from_dollars(60);
        doc.drawers.insert(1, snapshot);
        doc
    }

    /// Gateway whose every call fails.
    struct BrokenGateway;

    #[async_trait]
    impl PersistenceGateway for BrokenGateway {
        async fn load(&self, _: Option<&str>) -> SyncResult<Option<UserDocument>> {
            Err(SyncError::PersistenceFailed("offline".into()))
        }

        async fn save(&self, _: Option<&str>, _: &UserDocument) -> SyncResult<()> {
            Err(SyncError::PersistenceFailed("offline".into()))
        }
    }

    #[test]
    fn test_local_store_roundtrip_and_clear() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalFileStore::new(dir.path().join("sub").join("guest.json"));

        assert!(store.read().unwrap().is_none());
        store.write(&document(2)).unwrap();
        assert_eq!(store.read().unwrap().unwrap().revision, 2);

        store.clear().unwrap();
        assert!(store.read().unwrap().is_none());
        store.clear().unwrap();
    }

    #[test]
    fn test_local_store_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("guest.json");
        std::fs::write(&path, "not json").unwrap();

        let store = LocalFileStore::new(&path);
        assert!(matches!(store.read(), Err(SyncError::LocalStore(_))));
    }

    #[tokio::test]
    async fn test_sqlite_gateway_ignores_guests() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let gateway = SqliteGateway::new(db, "dev-1");

        gateway.save(None, &document(1)).await.unwrap();
        assert!(gateway.load(None).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_sqlite_gateway_roundtrip() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let gateway = SqliteGateway::new(db.clone(), "dev-1");

        gateway.save(Some("u1"), &document(4)).await.unwrap();
        let loaded = gateway.load(Some("u1")).await.unwrap().unwrap();
        assert_eq!(loaded.revision, 4);
        assert!(loaded.saved_at.is_some());

        let stored = db.documents().load("u1").await.unwrap().unwrap();
        assert_eq!(stored.device_id.as_deref(), Some("dev-1"));
        assert!(gateway.load(Some("u2")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_fallback_mirrors_and_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let local = LocalFileStore::new(dir.path().join("guest.json"));
        let gateway = FallbackGateway::new(Arc::new(BrokenGateway), local.clone());

        // Remote failure is reported, but the mirror still got the write.
        let result = gateway.save(Some("u1"), &document(7)).await;
        assert!(matches!(result, Err(SyncError::PersistenceFailed(_))));
        assert_eq!(local.read().unwrap().unwrap().revision, 7);

        let loaded = gateway.load(Some("u1")).await.unwrap().unwrap();
        assert_eq!(loaded.revision, 7);
    }

    #[tokio::test]
    async fn test_fallback_guest_uses_local_only() {
        let dir = tempfile::tempdir().unwrap();
        let local = LocalFileStore::new(dir.path().join("guest.json"));
        let gateway = FallbackGateway::new(Arc::new(BrokenGateway), local);

        gateway.save(None, &document(3)).await.unwrap();
        assert_eq!(gateway.load(None).await.unwrap().unwrap().revision, 3);
    }
}
