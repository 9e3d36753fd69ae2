//! Snapshot persistence.
//!
//! A snapshot is the full job list of one board as of the end of the last
//! run. It is always replaced wholesale, never merged.

pub mod local;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Board, Job};

// Re-export for convenience
pub use local::LocalSnapshotStore;

/// Trait for snapshot storage backends.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Read the stored snapshot. `Ok(None)` if nothing was stored yet.
    async fn read(&self, board: Board) -> Result<Option<Vec<Job>>>;

    /// Replace the stored snapshot with `jobs`.
    async fn save(&self, board: Board, jobs: &[Job]) -> Result<()>;

    /// Load the previous snapshot, treating any failure as "no previous data".
    async fn load(&self, board: Board) -> Vec<Job> {
        match self.read(board).await {
            Ok(Some(jobs)) => jobs,
            Ok(None) => {
                log::info!("No previous snapshot for {board} board");
                Vec::new()
            }
            Err(error) => {
                log::warn!("Unreadable snapshot for {board} board, starting empty: {error}");
                Vec::new()
            }
        }
    }
}
