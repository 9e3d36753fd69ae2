// src/pipeline/watch.rs

//! Board watching pipeline.
//!
//! For each board, in order: fetch current jobs, load the previous
//! snapshot, compute the delta, notify every change, then replace the
//! snapshot. Boards run one after the other and share nothing.

use crate::error::Result;
use crate::models::{Board, FetchFailurePolicy, Job, Settings};
use crate::pipeline::Delta;
use crate::services::{
    DispatchReport, FetchOutcome, GetroClient, JobSource, Notifier, SlackNotifier,
    dispatch_changes,
};
use crate::storage::{LocalSnapshotStore, SnapshotStore};
use crate::utils::http;
use crate::utils::log::{header, step, summary};

/// How the fetch of a board went.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchStatus {
    Complete,
    Partial { failed_pages: Vec<u64> },
    Failed { reason: String },
}

impl From<&FetchOutcome> for FetchStatus {
    fn from(outcome: &FetchOutcome) -> Self {
        match outcome {
            FetchOutcome::Complete(_) => FetchStatus::Complete,
            FetchOutcome::Partial { failures, .. } => FetchStatus::Partial {
                failed_pages: failures.iter().map(|f| f.page).collect(),
            },
            FetchOutcome::Failed { reason } => FetchStatus::Failed {
                reason: reason.clone(),
            },
        }
    }
}

/// Result of processing one board.
#[derive(Debug, Clone)]
pub struct BoardReport {
    pub board: Board,
    pub fetch: FetchStatus,
    /// Jobs fetched this run
    pub fetched: usize,
    /// Jobs in the previous snapshot
    pub previous: usize,
    pub added: usize,
    pub removed: usize,
    pub dispatch: DispatchReport,
    pub snapshot_saved: bool,
    /// Board left untouched because nothing could be fetched
    pub skipped: bool,
}

impl BoardReport {
    fn skipped(board: Board, fetch: FetchStatus, previous: usize) -> Self {
        Self {
            board,
            fetch,
            fetched: 0,
            previous,
            added: 0,
            removed: 0,
            dispatch: DispatchReport::default(),
            snapshot_saved: false,
            skipped: true,
        }
    }

    /// Anything short of a clean run for this board.
    pub fn is_degraded(&self) -> bool {
        self.skipped
            || self.fetch != FetchStatus::Complete
            || !self.dispatch.failures.is_empty()
            || !self.snapshot_saved
    }
}

/// Result of a whole run.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub boards: Vec<BoardReport>,
}

impl RunReport {
    pub fn is_degraded(&self) -> bool {
        self.boards.iter().any(BoardReport::is_degraded)
    }
}

/// Drives fetch, diff, notify and persist for both boards.
pub struct Watcher<'a> {
    settings: &'a Settings,
    source: &'a dyn JobSource,
    store: &'a dyn SnapshotStore,
    notifier: &'a dyn Notifier,
}

impl<'a> Watcher<'a> {
    pub fn new(
        settings: &'a Settings,
        source: &'a dyn JobSource,
        store: &'a dyn SnapshotStore,
        notifier: &'a dyn Notifier,
    ) -> Self {
        Self {
            settings,
            source,
            store,
            notifier,
        }
    }

    /// Process every board in order.
    pub async fn run(&self) -> RunReport {
        header("Job board watch");

        let mut report = RunReport::default();
        for (index, board) in Board::ALL.into_iter().enumerate() {
            step(index + 1, Board::ALL.len(), &format!("Checking {board} board"));
            report.boards.push(self.run_board(board).await);
        }

        for board in &report.boards {
            log_board_summary(board);
        }
        report
    }

    /// Process one board.
    pub async fn run_board(&self, board: Board) -> BoardReport {
        let network_id = self.settings.secrets.network_id(board);
        let outcome = self.source.fetch_jobs(network_id).await;
        let fetch = FetchStatus::from(&outcome);

        let current: Vec<Job> = match outcome.into_jobs() {
            Some(jobs) => jobs,
            None => match self.settings.config.run.on_fetch_failure {
                FetchFailurePolicy::Skip => {
                    log::warn!("No jobs fetched for {board} board, leaving snapshot untouched");
                    let previous = self.store.load(board).await.len();
                    return BoardReport::skipped(board, fetch, previous);
                }
                FetchFailurePolicy::TreatAsEmpty => {
                    log::warn!("No jobs fetched for {board} board, treating as empty");
                    Vec::new()
                }
            },
        };

        if let FetchStatus::Partial { failed_pages } = &fetch {
            log::warn!(
                "{} board fetched partially, missing pages {:?}",
                board,
                failed_pages
            );
        }

        let previous = self.store.load(board).await;
        let delta = Delta::between(&previous, &current);

        log::info!(
            "{} board: {} new, {} deleted ({} now, {} before)",
            board,
            delta.added.len(),
            delta.removed.len(),
            current.len(),
            previous.len()
        );
        for job in &delta.added {
            log::debug!("new {board} job {}: {} at {}", job.id, job.title, job.company);
        }
        for job in &delta.removed {
            log::debug!("deleted {board} job {}: {} at {}", job.id, job.title, job.company);
        }

        let dispatch = dispatch_changes(
            self.notifier,
            board,
            &delta,
            self.settings.config.slack.max_concurrent,
        )
        .await;

        let snapshot_saved = match self.store.save(board, &current).await {
            Ok(()) => true,
            Err(error) => {
                log::error!("Failed to store {board} snapshot: {error}");
                false
            }
        };

        BoardReport {
            board,
            fetch,
            fetched: current.len(),
            previous: previous.len(),
            added: delta.added.len(),
            removed: delta.removed.len(),
            dispatch,
            snapshot_saved,
            skipped: false,
        }
    }
}

fn log_board_summary(report: &BoardReport) {
    let fetch = match &report.fetch {
        FetchStatus::Complete => "complete".to_string(),
        FetchStatus::Partial { failed_pages } => format!("partial (pages {failed_pages:?})"),
        FetchStatus::Failed { reason } => format!("failed ({reason})"),
    };
    summary(
        &format!("{} board", report.board),
        &[
            ("Fetch", fetch),
            ("Jobs", report.fetched.to_string()),
            ("Added", report.added.to_string()),
            ("Removed", report.removed.to_string()),
            (
                "Notifications",
                format!(
                    "{} sent, {} failed",
                    report.dispatch.sent,
                    report.dispatch.failures.len()
                ),
            ),
            (
                "Snapshot",
                if report.skipped {
                    "unchanged".to_string()
                } else if report.snapshot_saved {
                    "saved".to_string()
                } else {
                    "not saved".to_string()
                },
            ),
        ],
    );
}

/// Run the watcher against the real Getro API, Slack webhook and local files.
pub async fn run_watch(settings: &Settings) -> Result<RunReport> {
    let client = http::create_async_client(&settings.config.api)?;
    let source = GetroClient::new(client.clone(), &settings.config.api, &settings.secrets);
    let notifier = SlackNotifier::new(client, &settings.secrets.webhook_url, &settings.config.slack)?;
    let store = LocalSnapshotStore::from_config(&settings.config);

    let watcher = Watcher::new(settings, &source, &store, &notifier);
    Ok(watcher.run().await)
}
