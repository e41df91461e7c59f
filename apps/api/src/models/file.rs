use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// The two upload categories. Each maps to its own on-disk root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileCategory {
    Resume,
    Job,
}

impl FileCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileCategory::Resume => "resume",
            FileCategory::Job => "job",
        }
    }
}

impl fmt::Display for FileCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCategory(pub String);

impl fmt::Display for UnknownCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid file type '{}': expected 'resume' or 'job'", self.0)
    }
}

impl FromStr for FileCategory {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "resume" => Ok(FileCategory::Resume),
            "job" => Ok(FileCategory::Job),
            other => Err(UnknownCategory(other.to_string())),
        }
    }
}

/// An uploaded document as persisted on disk. Never updated after creation.
#[derive(Debug, Clone, Serialize)]
pub struct StoredFile {
    pub category: FileCategory,
    /// Filename as supplied by the client. Not unique.
    pub name: String,
    /// `<yyyyMMdd_HHmmss>_<name>`, the key clients use to select the file.
    pub stored_name: String,
    pub created_at: DateTime<Local>,
}

/// Stored names grouped by category, as returned by `GET /files`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FileListing {
    pub resumes: Vec<String>,
    pub jobs: Vec<String>,
}

/// A selected stored file, as handed to the assistant backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReference {
    pub category: FileCategory,
    pub stored_name: String,
    pub path: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_parses_known_values() {
        assert_eq!("resume".parse::<FileCategory>(), Ok(FileCategory::Resume));
        assert_eq!("job".parse::<FileCategory>(), Ok(FileCategory::Job));
    }

    #[test]
    fn test_category_rejects_unknown_and_case_variants() {
        assert!("resumes".parse::<FileCategory>().is_err());
        assert!("Job".parse::<FileCategory>().is_err());
        assert!("".parse::<FileCategory>().is_err());
    }
}
