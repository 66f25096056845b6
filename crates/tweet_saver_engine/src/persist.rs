use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use saver_logging::saver_info;
use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("folder escapes the vault root: {0}")]
    InvalidFolder(String),
    #[error("path exists but is not a directory: {0}")]
    FolderIsFile(PathBuf),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Created,
    Overwritten,
}

/// Storage the notes land in. Paths are relative to the vault root.
pub trait Vault: Send + Sync {
    fn exists(&self, relative: &Path) -> bool;
    /// Creates the folder and any missing parents; an existing folder is left as is.
    fn create_folder(&self, relative: &Path) -> Result<(), PersistError>;
    /// Creates the file, or replaces the content of an existing one.
    fn write(&self, relative: &Path, content: &str) -> Result<WriteOutcome, PersistError>;
}

/// Vault backed by a directory on the local filesystem.
#[derive(Debug, Clone)]
pub struct FsVault {
    root: PathBuf,
}

impl FsVault {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Vault for FsVault {
    fn exists(&self, relative: &Path) -> bool {
        self.root.join(relative).exists()
    }

    fn create_folder(&self, relative: &Path) -> Result<(), PersistError> {
        let dir = self.root.join(relative);
        if ensure_dir(&dir)? {
            saver_info!("Created folder: {}", relative.display());
        }
        Ok(())
    }

    fn write(&self, relative: &Path, content: &str) -> Result<WriteOutcome, PersistError> {
        let target = self.root.join(relative);
        let dir = target
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.root.clone());
        let filename = target
            .file_name()
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "missing file name"))?;

        let outcome = if target.is_file() {
            WriteOutcome::Overwritten
        } else {
            WriteOutcome::Created
        };
        AtomicFileWriter::new(dir).write(Path::new(filename), content)?;
        Ok(outcome)
    }
}

/// Ensure `dir` exists as a directory. Returns `true` when it had to be created.
pub fn ensure_dir(dir: &Path) -> Result<bool, PersistError> {
    if dir.exists() {
        if !fs::metadata(dir)?.is_dir() {
            return Err(PersistError::FolderIsFile(dir.to_path_buf()));
        }
        return Ok(false);
    }
    fs::create_dir_all(dir)?;
    Ok(true)
}

/// Atomically write content to `{dir}/{filename}` by writing a temp file then renaming.
pub struct AtomicFileWriter {
    dir: PathBuf,
}

impl AtomicFileWriter {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn write(&self, filename: &Path, content: &str) -> Result<PathBuf, PersistError> {
        ensure_dir(&self.dir)?;

        let target = self.dir.join(filename);
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.flush()?;
        tmp.as_file_mut().sync_all()?;

        // The rename replaces an existing file in place.
        tmp.persist(&target).map_err(|e| PersistError::Io(e.error))?;
        Ok(target)
    }
}
