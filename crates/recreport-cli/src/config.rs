//! Client configuration.
//!
//! All settings live in a single `config.toml` file at
//! `~/.config/recreport/config.toml` by default. Command-line flags
//! override individual values.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::cli::Cli;

/// Configuration for the recreport client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// How many days of history to report on.
    pub days: i64,

    /// Explicit list of site URLs to report on.
    #[serde(default)]
    pub sites: Vec<String>,

    /// Report on every accessible site.
    pub all_sites: bool,

    /// Directory the CSV report is written into.
    pub output_dir: Option<PathBuf>,

    /// Maximum number of concurrent audit lookups per site.
    pub concurrency: usize,

    /// Webex connection settings.
    #[serde(default)]
    pub webex: WebexSettings,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            days: 30,
            sites: Vec::new(),
            all_sites: false,
            output_dir: None,
            concurrency: 16,
            webex: WebexSettings::default(),
        }
    }
}

/// Webex connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WebexSettings {
    /// OAuth client id, needed to refresh an expired access token.
    pub client_id: Option<String>,

    /// OAuth client secret, needed to refresh an expired access token.
    pub client_secret: Option<String>,

    /// Path to the OAuth tokens file.
    pub tokens_file: Option<PathBuf>,

    /// Override for the API base URL (non-standard deployments).
    pub api_base: Option<String>,

    /// HTTP request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for WebexSettings {
    fn default() -> Self {
        Self {
            client_id: None,
            client_secret: None,
            tokens_file: None,
            api_base: None,
            timeout_secs: 30,
        }
    }
}

impl ReportConfig {
    /// Loads configuration from the default path.
    pub fn load() -> Result<Self, String> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Loads configuration from an explicit path.
    pub fn load_from(path: &std::path::Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("failed to read config: {}", e))?;
        toml::from_str(&content).map_err(|e| format!("failed to parse config: {}", e))
    }

    /// The default configuration file path.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("recreport")
            .join("config.toml")
    }

    /// The tokens file path, configured or defaulted next to the config.
    pub fn tokens_path(&self) -> PathBuf {
        self.webex.tokens_file.clone().unwrap_or_else(|| {
            dirs::config_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("recreport")
                .join("tokens.json")
        })
    }

    /// Applies command-line overrides on top of the file values.
    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(days) = cli.days {
            self.days = days;
        }
        if !cli.sites.is_empty() {
            self.sites = cli.sites.clone();
            self.all_sites = false;
        }
        if cli.all_sites {
            self.all_sites = true;
            self.sites.clear();
        }
        if cli.default_site {
            self.all_sites = false;
            self.sites.clear();
        }
        if let Some(ref dir) = cli.output_dir {
            self.output_dir = Some(dir.clone());
        }
        if let Some(concurrency) = cli.concurrency {
            self.concurrency = concurrency;
        }
        if let Some(ref path) = cli.tokens_file {
            self.webex.tokens_file = Some(path.clone());
        }
    }
}
