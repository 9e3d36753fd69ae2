// src/models/mod.rs

//! Domain models for the job watcher.

mod board;
mod config;
mod job;

// Re-export all public types
pub use board::Board;
pub use config::{
    ApiConfig, Config, FetchFailurePolicy, LoggingConfig, RequiredSetting, RunConfig, Secrets,
    Settings, SlackConfig, SnapshotConfig,
};
pub use job::{Job, JobId};
