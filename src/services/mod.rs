//! Service layer for the job watcher.
//!
//! This module contains the external collaborators:
//! - Job fetching from the Getro API (`GetroClient`)
//! - Change notification formatting and dispatch (`dispatch_changes`)
//! - Slack webhook delivery (`SlackNotifier`)

mod getro;
mod notify;
mod slack;

pub use getro::{FetchOutcome, GetroClient, JobSource, PAGE_SIZE, PageFailure};
pub use notify::{
    ChangeKind, DeliveryFailure, DispatchReport, Notifier, dispatch_changes, format_message,
};
pub use slack::SlackNotifier;
