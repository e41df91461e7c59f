//! File Store: persists uploaded resumes and job descriptions on local disk.
//!
//! Layout: one flat directory per [`FileCategory`], each file named
//! `<yyyyMMdd_HHmmss>_<original filename>`. Files are never updated or deleted.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use crate::models::file::{FileCategory, FileListing, StoredFile};

/// `chrono` format of the stored-name prefix.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Only these are accepted on upload and show up in listings.
const LISTED_EXTENSION: &str = "txt";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Invalid filename '{0}'")]
    InvalidName(String),

    #[error("Unsupported file '{0}': only .txt files can be uploaded")]
    UnsupportedExtension(String),

    #[error("File '{stored_name}' not found in {category} storage")]
    NotFound {
        category: FileCategory,
        stored_name: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone)]
pub struct FileStore {
    resumes_dir: PathBuf,
    jobs_dir: PathBuf,
}

impl FileStore {
    pub fn new(resumes_dir: impl Into<PathBuf>, jobs_dir: impl Into<PathBuf>) -> Self {
        Self {
            resumes_dir: resumes_dir.into(),
            jobs_dir: jobs_dir.into(),
        }
    }

    /// Creates both category roots if absent.
    pub async fn init(&self) -> Result<(), StoreError> {
        for dir in [&self.resumes_dir, &self.jobs_dir] {
            tokio::fs::create_dir_all(dir).await?;
            debug!("Storage directory ready: {}", dir.display());
        }
        Ok(())
    }

    pub fn dir(&self, category: FileCategory) -> &Path {
        match category {
            FileCategory::Resume => &self.resumes_dir,
            FileCategory::Job => &self.jobs_dir,
        }
    }

    /// On-disk location of a stored file. Does not check existence.
    pub fn path_of(&self, category: FileCategory, stored_name: &str) -> PathBuf {
        self.dir(category).join(stored_name)
    }

    /// Persists `bytes` under a timestamped name and returns the record.
    ///
    /// Uses create-new semantics: two uploads of the same filename within the
    /// same second fail the second write instead of overwriting the first.
    pub async fn save(
        &self,
        category: FileCategory,
        original_name: &str,
        bytes: &[u8],
    ) -> Result<StoredFile, StoreError> {
        validate_filename(original_name)?;
        if !is_listed(Path::new(original_name)) {
            return Err(StoreError::UnsupportedExtension(original_name.to_string()));
        }

        let created_at = Local::now();
        let stored_name = stored_name_for(created_at, original_name);
        let path = self.path_of(category, &stored_name);

        let mut file = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await?;
        file.write_all(bytes).await?;
        file.flush().await?;

        info!(
            "Stored {} upload '{}' as {} ({} bytes)",
            category,
            original_name,
            stored_name,
            bytes.len()
        );

        Ok(StoredFile {
            category,
            name: original_name.to_string(),
            stored_name,
            created_at,
        })
    }

    /// Stored names of every `.txt` file in both categories, sorted by name.
    pub async fn list(&self) -> Result<FileListing, StoreError> {
        Ok(FileListing {
            resumes: list_dir(&self.resumes_dir).await?,
            jobs: list_dir(&self.jobs_dir).await?,
        })
    }

    pub async fn read(
        &self,
        category: FileCategory,
        stored_name: &str,
    ) -> Result<Vec<u8>, StoreError> {
        validate_filename(stored_name)?;

        match tokio::fs::read(self.path_of(category, stored_name)).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(StoreError::NotFound {
                category,
                stored_name: stored_name.to_string(),
            }),
            Err(e) => Err(e.into()),
        }
    }
}

pub fn stored_name_for(created_at: DateTime<Local>, original_name: &str) -> String {
    format!("{}_{}", created_at.format(TIMESTAMP_FORMAT), original_name)
}

/// Rejects names that would escape the category directory.
pub fn validate_filename(name: &str) -> Result<(), StoreError> {
    let escapes = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains('/')
        || name.contains('\\')
        || name.contains('\0');
    if escapes {
        return Err(StoreError::InvalidName(name.to_string()));
    }
    Ok(())
}

fn is_listed(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some(LISTED_EXTENSION)
}

async fn list_dir(dir: &Path) -> Result<Vec<String>, StoreError> {
    let mut names = Vec::new();
    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(names),
        Err(e) => return Err(e.into()),
    };

    while let Some(entry) = entries.next_entry().await? {
        if !entry.file_type().await?.is_file() {
            continue;
        }
        let path = entry.path();
        if !is_listed(&path) {
            continue;
        }
        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            names.push(name.to_string());
        }
    }

    names.sort();
    Ok(names)
}
