//! Storage collaborator: async whole-file I/O for the save file.
//!
//! "File does not exist" is distinguished from every other I/O failure so the
//! layers above can treat it as a normal empty result (load) or a no-op
//! (delete).

use anyhow::{Context, Result};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Default save location: `$HOME/.taskdeck/tasks.csv`.
pub fn default_save_path() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".taskdeck").join("tasks.csv"))
}

/// Handle to the persisted task file.
#[derive(Debug, Clone)]
pub struct SaveFile {
    path: PathBuf,
}

impl SaveFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn exists(&self) -> bool {
        fs::try_exists(&self.path).await.unwrap_or(false)
    }

    /// Read the whole file as text. `Ok(None)` when the file does not exist;
    /// any other I/O failure propagates.
    pub async fn read(&self) -> Result<Option<String>> {
        match fs::read_to_string(&self.path).await {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("read {}", self.path.display())),
        }
    }

    /// Overwrite the whole file, creating the parent directory if missing.
    pub async fn write(&self, text: &str) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)
                .await
                .with_context(|| format!("create {}", dir.display()))?;
        }
        fs::write(&self.path, text)
            .await
            .with_context(|| format!("write {}", self.path.display()))
    }

    /// Delete the file, reporting whether anything was removed. A missing
    /// file is not an error.
    pub async fn delete(&self) -> Result<bool> {
        match fs::remove_file(&self.path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e).with_context(|| format!("delete {}", self.path.display())),
        }
    }

    /// Copy the file to `dest`. Used for timestamped backups.
    pub async fn copy_to(&self, dest: &Path) -> Result<()> {
        fs::copy(&self.path, dest)
            .await
            .map(|_| ())
            .with_context(|| format!("copy {} to {}", self.path.display(), dest.display()))
    }
}
