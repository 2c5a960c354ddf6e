use anyhow::{bail, Context, Result};
use chrono::FixedOffset;
use serde::Deserialize;
use std::net::IpAddr;
use std::path::PathBuf;

/// Prefix for environment overrides, e.g. `INSIGHTS__TELEGRAM__BOT_TOKEN`
pub const ENV_PREFIX: &str = "INSIGHTS";

#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub service: ServiceConfig,
    pub telegram: TelegramConfig,
    #[serde(default)]
    pub collector: CollectorConfig,
    pub analyzer: AnalyzerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: "daily-insights".to_string(),
            http: HttpConfig::default(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub enabled: bool,
    pub bind: String,
    pub port: u16,

    /// Shared secret callers send as `Authorization: Bearer <token>`
    pub auth_token: Option<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            bind: "127.0.0.1".to_string(),
            port: 8787,
            auth_token: None,
        }
    }
}

impl HttpConfig {
    /// Whether `bind` only accepts connections from this machine
    pub fn is_loopback(&self) -> bool {
        match self.bind.parse::<IpAddr>() {
            Ok(ip) => ip.is_loopback(),
            Err(_) => self.bind.eq_ignore_ascii_case("localhost"),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct TelegramConfig {
    /// Token of the bot that answers commands
    pub bot_token: String,

    /// The only chat allowed to record and run commands
    pub allowed_chat_id: i64,

    /// Token of the voice-note bot to pull messages from, if any
    #[serde(default)]
    pub source_bot_token: Option<String>,

    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct CollectorConfig {
    /// Offset from UTC (minutes) used to decide where a day starts
    pub utc_offset_minutes: i32,

    /// Exact texts to drop (unfilled template placeholders)
    pub ignored_texts: Vec<String>,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            utc_offset_minutes: 0,
            ignored_texts: vec!["{input}".to_string()],
        }
    }
}

impl CollectorConfig {
    pub fn offset(&self) -> Result<FixedOffset> {
        self.utc_offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .with_context(|| format!("Invalid UTC offset: {} minutes", self.utc_offset_minutes))
    }
}

#[derive(Debug, Deserialize)]
pub struct AnalyzerConfig {
    pub api_key: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_analyzer_url")]
    pub base_url: String,
    #[serde(default = "default_analyzer_timeout_secs")]
    pub timeout_secs: u64,
}

/// Where analysed days are persisted
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "backend", rename_all = "lowercase")]
pub enum StorageConfig {
    /// Plain files in a local directory
    Local { dir: PathBuf },

    /// Google Drive v3
    Drive {
        access_token: String,
        #[serde(default)]
        folder_id: Option<String>,
        #[serde(default = "default_drive_url")]
        base_url: String,
        #[serde(default = "default_storage_timeout_secs")]
        timeout_secs: u64,
    },
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig::Local {
            dir: PathBuf::from("insights"),
        }
    }
}

fn default_poll_interval_secs() -> u64 {
    60
}

fn default_model() -> String {
    crate::analyzer::DEFAULT_MODEL.to_string()
}

fn default_analyzer_url() -> String {
    crate::analyzer::DEFAULT_BASE_URL.to_string()
}

fn default_analyzer_timeout_secs() -> u64 {
    30
}

fn default_drive_url() -> String {
    crate::storage::DRIVE_BASE_URL.to_string()
}

fn default_storage_timeout_secs() -> u64 {
    30
}

impl Config {
    /// Load from an optional config file, then environment overrides
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()?;

        let cfg: Self = settings
            .try_deserialize()
            .context("Failed to parse configuration")?;
        cfg.validate()?;

        Ok(cfg)
    }

    /// Reject configurations the bot cannot start with
    pub fn validate(&self) -> Result<()> {
        if self.telegram.bot_token.trim().is_empty() {
            bail!("telegram.bot_token is not set");
        }
        if self.analyzer.api_key.trim().is_empty() {
            bail!("analyzer.api_key is not set");
        }
        if let StorageConfig::Drive { access_token, .. } = &self.storage {
            if access_token.trim().is_empty() {
                bail!("storage.access_token is not set");
            }
        }
        self.collector.offset()?;

        let http = &self.service.http;
        if let Some(token) = &http.auth_token {
            if token.trim().is_empty() {
                bail!("service.http.auth_token is empty");
            }
        } else if http.enabled && !http.is_loopback() {
            bail!(
                "service.http.bind is {} but service.http.auth_token is not set",
                http.bind
            );
        }

        Ok(())
    }
}
