use std::path::{Path, PathBuf};

use anyhow::Context;
use log::{info, warn};
use serde::Serialize;
use walkdir::DirEntry;

use crate::document::{extension_of, is_supported, SUPPORTED_EXTENSIONS};

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct StoredFile {
    pub name: String,
    pub size: u64,
    #[serde(rename = "type")]
    pub file_type: String,
}

/// Rejections that callers may want to tell apart from I/O failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UploadError {
    #[error("Unsupported file type: {0}. Supported types: {types}", types = SUPPORTED_EXTENSIONS.join(", "))]
    Unsupported(String),

    #[error("Invalid file name: {0}")]
    InvalidName(String),

    #[error("File {0} not found")]
    NotFound(String),
}

/// Flat directory of uploaded source documents.
#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
}

impl UploadStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Uploads live directly in the store; anything that would escape it is refused.
    fn path_for(&self, name: &str) -> Result<PathBuf, UploadError> {
        let candidate = Path::new(name);
        let is_plain = candidate.file_name().map(|f| f == candidate.as_os_str()).unwrap_or(false);
        if name.is_empty() || !is_plain || name.contains(['/', '\\']) {
            return Err(UploadError::InvalidName(name.to_string()));
        }
        Ok(self.dir.join(name))
    }

    /// Checks that `name` could be saved, without touching the disk.
    pub fn validate(&self, name: &str) -> Result<PathBuf, UploadError> {
        if !is_supported(Path::new(name)) {
            return Err(UploadError::Unsupported(name.to_string()));
        }
        self.path_for(name)
    }

    pub fn save(&self, name: &str, bytes: &[u8]) -> anyhow::Result<()> {
        let path = self.validate(name)?;
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("Could not create {}", self.dir.display()))?;
        std::fs::write(&path, bytes)
            .with_context(|| format!("Could not save file: {}", name))?;
        info!("Saved {} ({} bytes)", name, bytes.len());
        Ok(())
    }

    pub fn list(&self) -> anyhow::Result<Vec<StoredFile>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let mut files = Vec::new();
        for entry in std::fs::read_dir(&self.dir)? {
            let entry = entry?;
            let metadata = entry.metadata()?;
            if !metadata.is_file() {
                continue;
            }
            let path = entry.path();
            files.push(StoredFile {
                name: entry.file_name().to_string_lossy().into_owned(),
                size: metadata.len(),
                file_type: extension_of(&path).unwrap_or_default(),
            });
        }
        files.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(files)
    }

    pub fn remove(&self, name: &str) -> anyhow::Result<()> {
        let path = self.path_for(name)?;
        if !path.is_file() {
            return Err(UploadError::NotFound(name.to_string()).into());
        }
        std::fs::remove_file(&path)
            .with_context(|| format!("Could not delete {}", name))?;
        info!("Deleted {}", name);
        Ok(())
    }

    /// Copies a document, or every supported document of a directory, into the
    /// store. Returns the stored names.
    pub fn import(&self, path: &Path, recursive: bool) -> anyhow::Result<Vec<String>> {
        if !path.is_dir() {
            return Ok(vec![self.import_file(path)?]);
        }

        let mut imported = Vec::new();
        for entry in get_entries(path, recursive) {
            let entry_path = entry.path();
            if !entry_path.is_file() {
                continue;
            }
            if is_supported(entry_path) {
                imported.push(self.import_file(entry_path)?);
            } else {
                warn!("Skipping unsupported file type: {}", entry_path.display());
            }
        }
        Ok(imported)
    }

    fn import_file(&self, path: &Path) -> anyhow::Result<String> {
        let name = path.file_name()
            .and_then(|s| s.to_str())
            .with_context(|| format!("Not a file name: {}", path.display()))?
            .to_string();
        let bytes = std::fs::read(path)
            .with_context(|| format!("Could not read {}", path.display()))?;
        self.save(&name, &bytes)?;
        Ok(name)
    }
}

fn get_entries(path: &Path, recursive: bool) -> Box<dyn Iterator<Item = DirEntry>> {
    let iter = if recursive {
        walkdir::WalkDir::new(path)
    } else {
        walkdir::WalkDir::new(path).max_depth(1)
    };
    Box::new(iter.sort_by_file_name().into_iter().filter_map(|e| e.ok()))
}
