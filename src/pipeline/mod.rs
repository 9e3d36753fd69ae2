//! Pipeline entry points for the job watcher.
//!
//! - `Delta`: added/removed jobs between two snapshots
//! - `run_watch`: fetch, diff, notify and persist both boards

pub mod diff;
pub mod watch;

pub use diff::{Delta, deleted_items, new_items};
pub use watch::{BoardReport, FetchStatus, RunReport, Watcher, run_watch};
