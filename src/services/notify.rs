// src/services/notify.rs

//! Change notifications.
//!
//! One message per added or removed job. Messages for a board are sent
//! concurrently (bounded) and the whole batch is awaited, so every failure
//! is known before the snapshot is replaced.

use async_trait::async_trait;
use futures::stream::{self, StreamExt};

use crate::error::Result;
use crate::models::{Board, Job, JobId};
use crate::pipeline::Delta;

/// Direction of a change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Added,
    Removed,
}

impl ChangeKind {
    pub fn verb(&self) -> &'static str {
        match self {
            ChangeKind::Added => "added",
            ChangeKind::Removed => "removed",
        }
    }
}

/// A destination for free-text notification messages.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, text: &str) -> Result<()>;
}

/// Render the message announcing one change.
pub fn format_message(job: &Job, kind: ChangeKind, board: Board) -> String {
    format!(
        "A job has been {} by {} on the {} board\nId: {}\nTitle: {}\nLink: {}",
        kind.verb(),
        job.company,
        board.label(),
        job.id,
        job.title,
        job.url
    )
}

/// A notification that could not be delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryFailure {
    pub job_id: JobId,
    pub kind: ChangeKind,
    pub reason: String,
}

/// Summary of one dispatch batch.
#[derive(Debug, Clone, Default)]
pub struct DispatchReport {
    pub sent: usize,
    pub failures: Vec<DeliveryFailure>,
}

/// Send one message per change in `delta` and wait for all of them.
///
/// Additions are queued before removals; completion order is unspecified.
pub async fn dispatch_changes(
    notifier: &dyn Notifier,
    board: Board,
    delta: &Delta,
    max_concurrent: usize,
) -> DispatchReport {
    let changes = delta
        .added
        .iter()
        .map(|job| (job, ChangeKind::Added))
        .chain(delta.removed.iter().map(|job| (job, ChangeKind::Removed)));

    let mut results = stream::iter(changes)
        .map(|(job, kind)| async move {
            let text = format_message(job, kind, board);
            (job, kind, notifier.send(&text).await)
        })
        .buffer_unordered(max_concurrent.max(1));

    let mut report = DispatchReport::default();
    while let Some((job, kind, result)) = results.next().await {
        match result {
            Ok(()) => report.sent += 1,
            Err(error) => {
                log::error!(
                    "Failed to notify {} job {} on {} board: {}",
                    kind.verb(),
                    job.id,
                    board,
                    error
                );
                report.failures.push(DeliveryFailure {
                    job_id: job.id.clone(),
                    kind,
                    reason: error.to_string(),
                });
            }
        }
    }
    report
}
