use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, info};

use sentinel_common::{DiseaseData, DiseaseEntry, SignalSet, User, UserData, UserRole, Ward};

use crate::document::{Document, WardState};
use crate::error::{StoreError, StoreResult};
use crate::repository::{NewWard, WardRepository};

/// Repository backed by one JSON document.
///
/// The document lives in memory behind a mutex; every mutation is applied to a
/// copy, written to disk (temp file + rename) and only then swapped in, all
/// while holding the lock.
pub struct JsonFileStore {
    path: Option<PathBuf>,
    doc: Mutex<Document>,
}

impl JsonFileStore {
    /// Load the document at `path`. A missing or blank file starts empty.
    pub async fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();
        let doc = load_document(&path).await?;
        info!(
            path = %path.display(),
            wards = doc.wards.len(),
            users = doc.users.len(),
            "Loaded store"
        );
        Ok(Self {
            path: Some(path),
            doc: Mutex::new(doc),
        })
    }

    /// A store that never touches disk.
    pub fn in_memory() -> Self {
        Self::with_document(Document::default())
    }

    pub fn with_document(doc: Document) -> Self {
        Self {
            path: None,
            doc: Mutex::new(doc),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Copy of the current document.
    pub async fn snapshot(&self) -> Document {
        self.doc.lock().await.clone()
    }

    async fn read<T>(&self, f: impl FnOnce(&Document) -> T + Send) -> T {
        let doc = self.doc.lock().await;
        f(&doc)
    }

    async fn mutate<T: Send>(
        &self,
        f: impl FnOnce(&mut Document) -> StoreResult<T> + Send,
    ) -> StoreResult<T> {
        let mut doc = self.doc.lock().await;
        let mut draft = doc.clone();
        let out = f(&mut draft)?;
        if let Some(path) = &self.path {
            write_document(path, &draft).await?;
        }
        *doc = draft;
        Ok(out)
    }
}

async fn load_document(path: &Path) -> StoreResult<Document> {
    let raw = match tokio::fs::read_to_string(path).await {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Document::default()),
        Err(source) => {
            return Err(StoreError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    if raw.trim().is_empty() {
        return Ok(Document::default());
    }

    serde_json::from_str(&raw).map_err(|source| StoreError::Corrupt {
        path: path.to_path_buf(),
        source,
    })
}

async fn write_document(path: &Path, doc: &Document) -> StoreResult<()> {
    let bytes = serde_json::to_vec_pretty(doc)?;
    let io_err = |source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(io_err)?;
    }

    let tmp = path.with_extension("json.tmp");
    tokio::fs::write(&tmp, &bytes).await.map_err(io_err)?;
    tokio::fs::rename(&tmp, path).await.map_err(io_err)?;

    debug!(path = %path.display(), bytes = bytes.len(), "Store persisted");
    Ok(())
}

#[async_trait]
impl WardRepository for JsonFileStore {
    async fn list_wards(&self) -> StoreResult<Vec<Ward>> {
        Ok(self.read(|doc| doc.wards.clone()).await)
    }

    async fn get_ward(&self, id: &str) -> StoreResult<Option<Ward>> {
        Ok(self.read(|doc| doc.ward(id).cloned()).await)
    }

    async fn insert_ward(&self, ward: NewWard) -> StoreResult<Ward> {
        self.mutate(|doc| Ok(doc.add_ward(ward))).await
    }

    async fn get_signals(&self, ward_id: &str) -> StoreResult<Option<SignalSet>> {
        Ok(self.read(|doc| doc.signals_for(ward_id).cloned()).await)
    }

    async fn put_signals(&self, ward_id: &str, signals: SignalSet) -> StoreResult<WardState> {
        self.mutate(|doc| doc.set_signals(ward_id, signals)).await
    }

    async fn all_signals(&self) -> StoreResult<HashMap<String, SignalSet>> {
        Ok(self.read(|doc| doc.all_signals()).await)
    }

    async fn disease_data(&self, ward_id: &str) -> StoreResult<DiseaseData> {
        Ok(self.read(|doc| doc.disease_data_for(ward_id)).await)
    }

    async fn upsert_disease_entry(
        &self,
        ward_id: &str,
        disease: &str,
        entry: DiseaseEntry,
    ) -> StoreResult<(String, WardState)> {
        self.mutate(|doc| doc.upsert_disease(ward_id, disease, entry))
            .await
    }

    async fn all_disease_data(&self) -> StoreResult<HashMap<String, DiseaseData>> {
        Ok(self
            .read(|doc| {
                doc.disease_data
                    .iter()
                    .map(|(id, data)| (id.clone(), data.clone()))
                    .collect()
            })
            .await)
    }

    async fn login_user(&self, role: UserRole, name: Option<String>) -> StoreResult<User> {
        self.mutate(|doc| Ok(doc.login_user(role, name, Utc::now())))
            .await
    }

    async fn get_user(&self, id: &str) -> StoreResult<Option<User>> {
        Ok(self.read(|doc| doc.user(id).cloned()).await)
    }

    async fn user_data(&self, user_id: &str) -> StoreResult<Option<UserData>> {
        Ok(self.read(|doc| doc.user_data.get(user_id).cloned()).await)
    }

    async fn put_user_data(&self, user_id: &str, data: UserData) -> StoreResult<UserData> {
        self.mutate(|doc| doc.set_user_data(user_id, data)).await
    }

    async fn simulation_history(&self) -> StoreResult<Vec<Value>> {
        Ok(self.read(|doc| doc.simulation_history.clone()).await)
    }
}
