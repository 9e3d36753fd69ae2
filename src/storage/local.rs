//! Local filesystem snapshot storage.
//!
//! ## Storage Layout
//!
//! ```text
//! {snapshots.dir}/
//! ├── farmingGetro.txt      # JSON array of jobs, farming board
//! └── huntingGetro.txt      # JSON array of jobs, hunting board
//! ```
//!
//! Saving deletes the old file, then writes the new one in place. There is
//! no temp-file rename: a crash mid-write leaves a truncated file, which the
//! next `load` reads as an empty snapshot.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::models::{Board, Config, Job};
use crate::storage::SnapshotStore;

/// One JSON file per board.
#[derive(Debug, Clone)]
pub struct LocalSnapshotStore {
    farming: PathBuf,
    hunting: PathBuf,
}

impl LocalSnapshotStore {
    pub fn new(farming: impl Into<PathBuf>, hunting: impl Into<PathBuf>) -> Self {
        Self {
            farming: farming.into(),
            hunting: hunting.into(),
        }
    }

    /// Use the snapshot paths from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.snapshot_path(Board::Farming),
            config.snapshot_path(Board::Hunting),
        )
    }

    /// Snapshot file for a board.
    pub fn path(&self, board: Board) -> &Path {
        match board {
            Board::Farming => &self.farming,
            Board::Hunting => &self.hunting,
        }
    }

    /// Delete a snapshot file. A missing file is not an error.
    async fn remove(&self, path: &Path) -> Result<()> {
        match tokio::fs::remove_file(path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::Io(e)),
        }
    }

    async fn ensure_dir(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl SnapshotStore for LocalSnapshotStore {
    async fn read(&self, board: Board) -> Result<Option<Vec<Job>>> {
        let path = self.path(board);
        let bytes = match tokio::fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(AppError::Io(e)),
        };
        Ok(Some(serde_json::from_slice(&bytes)?))
    }

    async fn save(&self, board: Board, jobs: &[Job]) -> Result<()> {
        let path = self.path(board);

        if let Err(error) = self.remove(path).await {
            log::warn!("Could not delete old snapshot {}: {}", path.display(), error);
        }

        self.ensure_dir(path).await?;
        let bytes = serde_json::to_vec(jobs)?;
        let mut file = tokio::fs::File::create(path).await?;
        file.write_all(&bytes).await?;
        file.flush().await?;

        log::info!(
            "Stored {} jobs for {} board in {}",
            jobs.len(),
            board,
            path.display()
        );
        Ok(())
    }
}
