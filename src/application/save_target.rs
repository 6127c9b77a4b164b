use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::info;

use crate::domain::AppError;

/// Where a downloaded payload ends up on this machine.
#[async_trait]
pub trait SaveTarget: Send + Sync {
    async fn save(&self, file_name: &str, contents: Bytes) -> Result<PathBuf, AppError>;
}

/// Asks the user for a location, starting in `start_dir`.
pub struct DialogSaveTarget {
    start_dir: Option<PathBuf>,
}

impl DialogSaveTarget {
    pub fn new(start_dir: Option<PathBuf>) -> Self {
        Self { start_dir }
    }
}

#[async_trait]
impl SaveTarget for DialogSaveTarget {
    async fn save(&self, file_name: &str, contents: Bytes) -> Result<PathBuf, AppError> {
        let mut dialog = rfd::AsyncFileDialog::new().set_file_name(file_name);
        if let Some(dir) = &self.start_dir {
            dialog = dialog.set_directory(dir);
        }

        let path = dialog
            .save_file()
            .await
            .map(|handle| handle.path().to_path_buf())
            .ok_or(AppError::Cancelled)?;

        write_file(path, contents).await
    }
}

/// Writes straight into a fixed directory. Existing files are kept and
/// the new one gets a ` (n)` suffix instead.
pub struct DirectorySaveTarget {
    dir: PathBuf,
}

impl DirectorySaveTarget {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    async fn create_unique(&self, file_name: &str) -> Result<(PathBuf, File), AppError> {
        let name = Path::new(file_name);
        let stem = name
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let extension = name.extension().map(|e| e.to_string_lossy().into_owned());

        let mut path = self.dir.join(file_name);
        let mut copy = 0u32;
        loop {
            match OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(file) => return Ok((path, file)),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    copy += 1;
                    let next = match &extension {
                        Some(extension) => format!("{} ({}).{}", stem, copy, extension),
                        None => format!("{} ({})", stem, copy),
                    };
                    path = self.dir.join(next);
                }
                Err(e) => {
                    return Err(AppError::Io(format!(
                        "Failed to create {}: {}",
                        path.display(),
                        e
                    )))
                }
            }
        }
    }
}

#[async_trait]
impl SaveTarget for DirectorySaveTarget {
    async fn save(&self, file_name: &str, contents: Bytes) -> Result<PathBuf, AppError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| AppError::Io(format!("Failed to create {}: {}", self.dir.display(), e)))?;

        let (path, mut file) = self.create_unique(file_name).await?;

        file.write_all(&contents)
            .await
            .map_err(|e| AppError::Io(format!("Write error: {}", e)))?;
        file.sync_all()
            .await
            .map_err(|e| AppError::Io(format!("Failed to sync file: {}", e)))?;

        info!(path = %path.display(), bytes = contents.len(), "Saved download");
        Ok(path)
    }
}

/// The user picked this path in the dialog, which already confirmed any overwrite.
async fn write_file(path: PathBuf, contents: Bytes) -> Result<PathBuf, AppError> {
    tokio::fs::write(&path, &contents)
        .await
        .map_err(|e| AppError::Io(format!("Write error: {}", e)))?;

    info!(path = %path.display(), bytes = contents.len(), "Saved download");
    Ok(path)
}
