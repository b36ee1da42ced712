use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{SubsecRound, Utc};
use tracing::{info, warn};

use super::domain::{AssessmentDocument, AssessmentId, AssessmentSummary};
use crate::appetite::AssessmentCategory;

/// Storage abstraction so the session and service can be exercised in
/// isolation.
pub trait AssessmentRepository: Send + Sync {
    /// Persists the document, assigning an id when it has none and stamping
    /// `saved_at`. Returns the stored document.
    fn save(&self, document: AssessmentDocument) -> Result<AssessmentDocument, RepositoryError>;

    /// Summaries of saved documents, newest first, optionally restricted to
    /// one category.
    fn list(
        &self,
        category: Option<AssessmentCategory>,
    ) -> Result<Vec<AssessmentSummary>, RepositoryError>;

    fn load(&self, id: &AssessmentId) -> Result<Option<AssessmentDocument>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("assessment storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("assessment could not be encoded: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Stamps a document for storage: keeps an existing id, otherwise assigns a
/// fresh one, and records the save time at second precision.
pub fn stamp_for_save(mut document: AssessmentDocument) -> (AssessmentId, AssessmentDocument) {
    let id = document.id.unwrap_or_else(AssessmentId::generate);
    document.id = Some(id);
    document.saved_at = Some(Utc::now().trunc_subsecs(0));
    (id, document)
}

/// Newest first; ties broken by id so listings are stable.
pub fn sort_newest_first(summaries: &mut [AssessmentSummary]) {
    summaries.sort_by(|a, b| b.saved_at.cmp(&a.saved_at).then_with(|| a.id.cmp(&b.id)));
}

/// Drops directory entries that cannot be read, logging each one, so a
/// single bad entry does not hide the rest of the store.
fn readable_entries<T>(
    entries: impl IntoIterator<Item = std::io::Result<T>>,
    root: &Path,
) -> impl Iterator<Item = T> {
    let root = root.display().to_string();
    entries.into_iter().filter_map(move |entry| match entry {
        Ok(entry) => Some(entry),
        Err(err) => {
            warn!(root = %root, error = %err, "skipping unreadable directory entry");
            None
        }
    })
}

/// One pretty-printed JSON file per assessment under a single directory.
#[derive(Debug, Clone)]
pub struct FileAssessmentRepository {
    root: PathBuf,
}

impl FileAssessmentRepository {
    /// Opens the store, creating the directory when missing.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, RepositoryError> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, id: &AssessmentId) -> PathBuf {
        self.root.join(format!("{id}.json"))
    }

    fn read_document(path: &Path) -> Result<AssessmentDocument, RepositoryError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }
}

impl AssessmentRepository for FileAssessmentRepository {
    fn save(&self, document: AssessmentDocument) -> Result<AssessmentDocument, RepositoryError> {
        let (id, document) = stamp_for_save(document);
        let encoded = serde_json::to_string_pretty(&document)?;
        fs::write(self.path_for(&id), encoded)?;
        info!(%id, title = %document.display_title(), "assessment saved");
        Ok(document)
    }

    fn list(
        &self,
        category: Option<AssessmentCategory>,
    ) -> Result<Vec<AssessmentSummary>, RepositoryError> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };

        let mut summaries = Vec::new();
        for entry in readable_entries(entries, &self.root) {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }

            let document = match Self::read_document(&path) {
                Ok(document) => document,
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "skipping unreadable assessment");
                    continue;
                }
            };

            if category.is_some_and(|category| document.context.category != category) {
                continue;
            }
            if let Some(summary) = document.summary() {
                summaries.push(summary);
            }
        }

        sort_newest_first(&mut summaries);
        Ok(summaries)
    }

    fn load(&self, id: &AssessmentId) -> Result<Option<AssessmentDocument>, RepositoryError> {
        match Self::read_document(&self.path_for(id)) {
            Ok(document) => Ok(Some(document)),
            Err(RepositoryError::Io(err)) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err),
        }
    }
}
