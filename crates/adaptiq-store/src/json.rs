//! JSON file-backed store.
//!
//! The whole data set is one snapshot file. Reads are served from memory;
//! every insert rewrites the file.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::sync::Mutex;

use adaptiq_core::model::{PublicQuestion, Question, ResponseRecord};
use adaptiq_core::traits::{QuestionFilter, QuestionStore};

use crate::error::StoreError;
use crate::memory::{InMemoryStore, Snapshot};

/// A store persisted as a single JSON snapshot.
pub struct JsonFileStore {
    path: PathBuf,
    inner: InMemoryStore,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    /// Open an existing data file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read data file: {}", path.display()))?;
        let snapshot: Snapshot =
            serde_json::from_str(&content).map_err(|source| StoreError::Parse {
                path: path.display().to_string(),
                source,
            })?;
        let inner = InMemoryStore::from_snapshot(snapshot)
            .with_context(|| format!("invalid question bank in {}", path.display()))?;
        Ok(Self::wrap(path, inner))
    }

    /// Create a new data file holding `questions` and no responses.
    ///
    /// Fails with [`StoreError::AlreadyExists`] unless `overwrite` is set.
    pub fn create(
        path: impl AsRef<Path>,
        questions: Vec<Question>,
        overwrite: bool,
    ) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if path.exists() && !overwrite {
            return Err(StoreError::AlreadyExists(path.display().to_string()).into());
        }
        let snapshot = Snapshot {
            questions,
            responses: Vec::new(),
        };
        let inner = InMemoryStore::from_snapshot(snapshot.clone())?;
        write_snapshot(&path, &snapshot)?;
        tracing::info!(
            path = %path.display(),
            questions = snapshot.questions.len(),
            "created data file"
        );
        Ok(Self::wrap(path, inner))
    }

    fn wrap(path: PathBuf, inner: InMemoryStore) -> Self {
        Self {
            path,
            inner,
            write_lock: Mutex::new(()),
        }
    }

    /// Use a fixed RNG seed for sampling.
    pub fn with_seed(self, seed: u64) -> Self {
        Self {
            inner: self.inner.with_seed(seed),
            ..self
        }
    }

    /// Location of the data file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Copy of the current contents.
    pub async fn snapshot(&self) -> Snapshot {
        self.inner.snapshot().await
    }
}

fn write_snapshot(path: &Path, snapshot: &Snapshot) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory: {}", parent.display()))?;
        }
    }
    let json = serde_json::to_string_pretty(snapshot).context("failed to serialize data")?;
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, json)
        .with_context(|| format!("failed to write data file: {}", tmp.display()))?;
    std::fs::rename(&tmp, path)
        .with_context(|| format!("failed to replace data file: {}", path.display()))?;
    Ok(())
}

#[async_trait]
impl QuestionStore for JsonFileStore {
    async fn fetch_responses(&self, user_id: &str) -> Result<Vec<ResponseRecord>> {
        self.inner.fetch_responses(user_id).await
    }

    async fn fetch_questions(&self, ids: &HashSet<String>) -> Result<Vec<Question>> {
        self.inner.fetch_questions(ids).await
    }

    async fn sample_questions(
        &self,
        n: usize,
        filter: &QuestionFilter,
        exclude: &HashSet<String>,
    ) -> Result<Vec<PublicQuestion>> {
        self.inner.sample_questions(n, filter, exclude).await
    }

    async fn find_questions(
        &self,
        filter: &QuestionFilter,
        limit: usize,
    ) -> Result<Vec<PublicQuestion>> {
        self.inner.find_questions(filter, limit).await
    }

    async fn insert_responses(&self, responses: Vec<ResponseRecord>) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let count = responses.len();
        // memory only changes once the file holds the new records
        let mut snapshot = self.inner.snapshot().await;
        snapshot.responses.extend(responses.iter().cloned());
        write_snapshot(&self.path, &snapshot)?;
        self.inner.insert_responses(responses).await?;
        tracing::debug!(path = %self.path.display(), count, "persisted responses");
        Ok(())
    }
}
