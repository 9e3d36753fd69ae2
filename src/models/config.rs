//! Application configuration structures.
//!
//! Non-secret settings live in a TOML file and fall back to defaults.
//! Credentials and endpoints come from the environment and are mandatory.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{AppError, Result};
use crate::models::Board;

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Getro API settings
    #[serde(default)]
    pub api: ApiConfig,

    /// Slack message settings
    #[serde(default)]
    pub slack: SlackConfig,

    /// Snapshot file locations
    #[serde(default)]
    pub snapshots: SnapshotConfig,

    /// Run policy
    #[serde(default)]
    pub run: RunConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if the file is missing.
    ///
    /// A file that exists but fails to parse is still an error.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            log::info!("No config file at {:?}, using defaults", path);
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        Url::parse(&self.api.base_url)?;
        if self.api.job_function.trim().is_empty() {
            return Err(AppError::config("api.job_function is empty"));
        }
        if self.api.user_agent.trim().is_empty() {
            return Err(AppError::config("api.user_agent is empty"));
        }
        if self.api.timeout_secs == 0 {
            return Err(AppError::config("api.timeout_secs must be > 0"));
        }
        if self.slack.max_concurrent == 0 {
            return Err(AppError::config("slack.max_concurrent must be > 0"));
        }
        if self.snapshots.farming_file.trim().is_empty()
            || self.snapshots.hunting_file.trim().is_empty()
        {
            return Err(AppError::config("snapshot file names must not be empty"));
        }
        if self.snapshot_path(Board::Farming) == self.snapshot_path(Board::Hunting) {
            return Err(AppError::config(
                "farming and hunting boards must use different snapshot files",
            ));
        }
        Ok(())
    }

    /// Path of the snapshot file for a board.
    pub fn snapshot_path(&self, board: Board) -> PathBuf {
        let file = match board {
            Board::Farming => &self.snapshots.farming_file,
            Board::Hunting => &self.snapshots.hunting_file,
        };
        self.snapshots.dir.join(file)
    }
}

/// Getro API client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// API root, without trailing `/networks`
    #[serde(default = "defaults::base_url")]
    pub base_url: String,

    /// `job_functions` filter sent with every request
    #[serde(default = "defaults::job_function")]
    pub job_function: String,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::base_url(),
            job_function: defaults::job_function(),
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
        }
    }
}

/// Slack webhook message settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlackConfig {
    #[serde(default = "defaults::channel")]
    pub channel: String,

    /// Display name of the posting bot
    #[serde(default = "defaults::username")]
    pub username: String,

    /// Maximum notifications in flight at once
    #[serde(default = "defaults::max_concurrent")]
    pub max_concurrent: usize,
}

impl Default for SlackConfig {
    fn default() -> Self {
        Self {
            channel: defaults::channel(),
            username: defaults::username(),
            max_concurrent: defaults::max_concurrent(),
        }
    }
}

/// Where each board's snapshot is persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotConfig {
    #[serde(default = "defaults::snapshot_dir")]
    pub dir: PathBuf,

    #[serde(default = "defaults::farming_file")]
    pub farming_file: String,

    #[serde(default = "defaults::hunting_file")]
    pub hunting_file: String,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            dir: defaults::snapshot_dir(),
            farming_file: defaults::farming_file(),
            hunting_file: defaults::hunting_file(),
        }
    }
}

/// What to do when the first page of a board cannot be fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FetchFailurePolicy {
    /// Leave the board alone for this run
    #[default]
    Skip,
    /// Diff against an empty list and persist it
    TreatAsEmpty,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RunConfig {
    #[serde(default)]
    pub on_fetch_failure: FetchFailurePolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "defaults::log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::log_level(),
        }
    }
}

/// A setting that must be supplied through the environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequiredSetting {
    FarmingNetworkId,
    HuntingNetworkId,
    ApiEmail,
    ApiToken,
    SlackWebhookUrl,
}

impl RequiredSetting {
    pub const ALL: [RequiredSetting; 5] = [
        RequiredSetting::FarmingNetworkId,
        RequiredSetting::HuntingNetworkId,
        RequiredSetting::ApiEmail,
        RequiredSetting::ApiToken,
        RequiredSetting::SlackWebhookUrl,
    ];

    /// Environment variable holding the value.
    pub fn env_var(&self) -> &'static str {
        match self {
            RequiredSetting::FarmingNetworkId => "GETRO_API_FARMING_NETWORK_ID",
            RequiredSetting::HuntingNetworkId => "GETRO_API_HUNTING_NETWORK_ID",
            RequiredSetting::ApiEmail => "GETRO_API_EMAIL",
            RequiredSetting::ApiToken => "GETRO_API_TOKEN",
            RequiredSetting::SlackWebhookUrl => "SLACK_WEBHOOK_URL",
        }
    }

    /// Human-readable failure message.
    pub fn message(&self) -> &'static str {
        match self {
            RequiredSetting::FarmingNetworkId => "missing Getro network id for the farming board",
            RequiredSetting::HuntingNetworkId => "missing Getro network id for the hunting board",
            RequiredSetting::ApiEmail => "missing Getro API account email",
            RequiredSetting::ApiToken => "missing Getro API token",
            RequiredSetting::SlackWebhookUrl => "missing Slack webhook URL",
        }
    }
}

/// Credentials and endpoints read from the environment.
#[derive(Clone)]
pub struct Secrets {
    pub farming_network_id: String,
    pub hunting_network_id: String,
    pub email: String,
    pub token: String,
    pub webhook_url: String,
}

impl std::fmt::Debug for Secrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Secrets")
            .field("farming_network_id", &self.farming_network_id)
            .field("hunting_network_id", &self.hunting_network_id)
            .field("email", &self.email)
            .field("token", &"<redacted>")
            .field("webhook_url", &"<redacted>")
            .finish()
    }
}

impl Secrets {
    /// Read all secrets from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read all secrets through `lookup`, reporting every missing one at once.
    ///
    /// Blank values count as missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut missing = Vec::new();
        let mut get = |setting: RequiredSetting| -> String {
            match lookup(setting.env_var()).map(|v| v.trim().to_string()) {
                Some(value) if !value.is_empty() => value,
                _ => {
                    missing.push(setting);
                    String::new()
                }
            }
        };

        let secrets = Self {
            farming_network_id: get(RequiredSetting::FarmingNetworkId),
            hunting_network_id: get(RequiredSetting::HuntingNetworkId),
            email: get(RequiredSetting::ApiEmail),
            token: get(RequiredSetting::ApiToken),
            webhook_url: get(RequiredSetting::SlackWebhookUrl),
        };

        if !missing.is_empty() {
            return Err(AppError::MissingSettings(missing));
        }
        Ok(secrets)
    }

    /// Network id configured for a board.
    pub fn network_id(&self, board: Board) -> &str {
        match board {
            Board::Farming => &self.farming_network_id,
            Board::Hunting => &self.hunting_network_id,
        }
    }
}

/// Validated runtime settings: file configuration plus secrets.
#[derive(Debug, Clone)]
pub struct Settings {
    pub config: Config,
    pub secrets: Secrets,
}

impl Settings {
    /// Combine and validate. Any error here must abort the run.
    pub fn new(config: Config, secrets: Secrets) -> Result<Self> {
        let settings = Self { config, secrets };
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        self.config.validate()?;
        Url::parse(&self.secrets.webhook_url)?;
        if self.secrets.farming_network_id == self.secrets.hunting_network_id {
            return Err(AppError::config(format!(
                "{} and {} must differ",
                RequiredSetting::FarmingNetworkId.env_var(),
                RequiredSetting::HuntingNetworkId.env_var()
            )));
        }
        Ok(())
    }
}

mod defaults {
    use std::path::PathBuf;

    // API defaults
    pub fn base_url() -> String {
        "https://api.getro.com/v2".into()
    }
    pub fn job_function() -> String {
        "Software Engineering".into()
    }
    pub fn user_agent() -> String {
        concat!("jobwatch/", env!("CARGO_PKG_VERSION")).into()
    }
    pub fn timeout() -> u64 {
        30
    }

    // Slack defaults
    pub fn channel() -> String {
        "getro-api".into()
    }
    pub fn username() -> String {
        "Commit Getro Bot".into()
    }
    pub fn max_concurrent() -> usize {
        8
    }

    // Snapshot defaults
    pub fn snapshot_dir() -> PathBuf {
        PathBuf::from(".")
    }
    pub fn farming_file() -> String {
        "farmingGetro.txt".into()
    }
    pub fn hunting_file() -> String {
        "huntingGetro.txt".into()
    }

    pub fn log_level() -> String {
        "info".into()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn full_env() -> HashMap<&'static str, String> {
        HashMap::from([
            ("GETRO_API_FARMING_NETWORK_ID", "farm-1".to_string()),
            ("GETRO_API_HUNTING_NETWORK_ID", "hunt-2".to_string()),
            ("GETRO_API_EMAIL", "ops@example.com".to_string()),
            ("GETRO_API_TOKEN", "secret".to_string()),
            ("SLACK_WEBHOOK_URL", "https://hooks.slack.test/T/B/X".to_string()),
        ])
    }

    fn secrets_from(env: &HashMap<&'static str, String>) -> Result<Secrets> {
        Secrets::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn validate_default_config_ok() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn default_snapshot_paths_match_board_names() {
        let config = Config::default();
        assert_eq!(
            config.snapshot_path(Board::Farming),
            PathBuf::from("./farmingGetro.txt")
        );
        assert_eq!(
            config.snapshot_path(Board::Hunting),
            PathBuf::from("./huntingGetro.txt")
        );
    }

    #[test]
    fn validate_rejects_shared_snapshot_file() {
        let mut config = Config::default();
        config.snapshots.hunting_file = config.snapshots.farming_file.clone();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_concurrency() {
        let mut config = Config::default();
        config.slack.max_concurrent = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn parse_partial_toml_keeps_defaults() {
        let config: Config = toml::from_str(
            r#"
            [api]
            job_function = "Data Science"

            [run]
            on_fetch_failure = "treat_as_empty"
            "#,
        )
        .unwrap();
        assert_eq!(config.api.job_function, "Data Science");
        assert_eq!(config.api.base_url, "https://api.getro.com/v2");
        assert_eq!(config.slack.channel, "getro-api");
        assert_eq!(config.run.on_fetch_failure, FetchFailurePolicy::TreatAsEmpty);
    }

    #[test]
    fn load_or_default_without_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let config = Config::load_or_default(tmp.path().join("absent.toml")).unwrap();
        assert_eq!(config.run.on_fetch_failure, FetchFailurePolicy::Skip);
    }

    #[test]
    fn load_or_default_rejects_broken_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("jobwatch.toml");
        fs::write(&path, "[api\nbase_url = ").unwrap();
        assert!(Config::load_or_default(&path).is_err());
    }

    #[test]
    fn secrets_read_all_values() {
        let secrets = secrets_from(&full_env()).unwrap();
        assert_eq!(secrets.network_id(Board::Farming), "farm-1");
        assert_eq!(secrets.network_id(Board::Hunting), "hunt-2");
        assert!(!format!("{secrets:?}").contains("secret"));
    }

    #[test]
    fn secrets_report_every_missing_value() {
        let mut env = full_env();
        env.remove("GETRO_API_TOKEN");
        env.insert("SLACK_WEBHOOK_URL", "   ".to_string());

        match secrets_from(&env) {
            Err(AppError::MissingSettings(missing)) => assert_eq!(
                missing,
                vec![RequiredSetting::ApiToken, RequiredSetting::SlackWebhookUrl]
            ),
            other => panic!("expected missing settings, got {other:?}"),
        }
    }

    #[test]
    fn settings_reject_identical_network_ids() {
        let mut env = full_env();
        env.insert("GETRO_API_HUNTING_NETWORK_ID", "farm-1".to_string());
        let secrets = secrets_from(&env).unwrap();
        assert!(Settings::new(Config::default(), secrets).is_err());
    }

    #[test]
    fn settings_reject_invalid_webhook_url() {
        let mut env = full_env();
        env.insert("SLACK_WEBHOOK_URL", "not a url".to_string());
        let secrets = secrets_from(&env).unwrap();
        let err = Settings::new(Config::default(), secrets).unwrap_err();
        assert!(err.is_fatal());
    }

    #[test]
    fn settings_accept_valid_input() {
        let secrets = secrets_from(&full_env()).unwrap();
        assert!(Settings::new(Config::default(), secrets).is_ok());
    }
}
