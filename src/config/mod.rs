//
//  bamboo-client
//  config/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Client Configuration
//!
//! A small TOML file describing which Bamboo server to talk to and how to
//! authenticate against it. The default location is platform specific:
//!
//! - Linux: `~/.config/bamboo/config.toml`
//! - macOS: `~/Library/Application Support/bamboo/config.toml`
//! - Windows: `%APPDATA%\bamboo\config\config.toml`
//!
//! ## File Format
//!
//! ```toml
//! base_url = "https://bamboo.example.com"
//! timeout_secs = 30
//!
//! [credentials]
//! type = "basic"
//! username = "ci-bot"
//! password = "s3cret"
//! ```
//!
//! A personal access token uses `type = "token"` and a `token` key instead.
//! Every key is optional. Missing keys fall back to the defaults of
//! [`BambooClient`].
//!
//! ```rust,no_run
//! use bamboo_client::Config;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let client = Config::load()?.build_client()?;
//! let info = client.info().server_info().await?;
//! println!("running: {}", info.is_running());
//! # Ok(())
//! # }
//! ```

mod file;

pub use file::*;

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::api::client::{user_agent, BambooClient, DEFAULT_TIMEOUT};
use crate::auth::Credential;

/// Persisted client settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Server root, e.g. `https://bamboo.example.com`. The REST prefix is
    /// appended when missing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Whole-request deadline in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,

    /// Credentials sent with every request. Anonymous when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credentials: Option<CredentialsConfig>,
}

/// The `[credentials]` table.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum CredentialsConfig {
    /// `type = "basic"`: HTTP Basic authentication.
    Basic {
        /// Bamboo username.
        username: String,
        /// Password of the user.
        password: String,
    },
    /// `type = "token"`: a personal access token.
    Token {
        /// The token string.
        token: String,
    },
}

impl From<CredentialsConfig> for Credential {
    fn from(config: CredentialsConfig) -> Self {
        match config {
            CredentialsConfig::Basic { username, password } => Credential::basic(username, password),
            CredentialsConfig::Token { token } => Credential::bearer(token),
        }
    }
}

impl fmt::Debug for CredentialsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&Credential::from(self.clone()), f)
    }
}

impl Config {
    /// Loads the configuration from [`Config::config_path`].
    ///
    /// A missing file yields the default configuration.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        Self::load_from(&path)
    }

    /// Loads the configuration from `path`, or the default if it does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !config_exists(path) {
            return Ok(Self::default());
        }
        let content = read_config_file(path)?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Saves the configuration to [`Config::config_path`].
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        self.save_to(&path)
    }

    /// Saves the configuration to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        write_config_file(path, &content)
    }

    /// Returns the default configuration file location.
    pub fn config_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("", "", crate::APP_NAME)
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    /// The configured timeout, or the client default.
    pub fn timeout(&self) -> Duration {
        self.timeout_secs
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TIMEOUT)
    }

    /// Returns the value of a scalar setting by key.
    ///
    /// Supported keys are `base_url` and `timeout_secs`.
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "base_url" => self.base_url.clone(),
            "timeout_secs" => self.timeout_secs.map(|secs| secs.to_string()),
            _ => None,
        }
    }

    /// Sets a scalar setting by key.
    ///
    /// Returns an error for unknown keys and for timeouts that are not a
    /// positive integer.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "base_url" => {
                self.base_url = Some(value.to_string());
            }
            "timeout_secs" => {
                let secs: u64 = value
                    .parse()
                    .with_context(|| format!("Invalid timeout_secs: {}", value))?;
                if secs == 0 {
                    anyhow::bail!("timeout_secs must be greater than zero");
                }
                self.timeout_secs = Some(secs);
            }
            other => anyhow::bail!("Unknown config key: {}", other),
        }
        Ok(())
    }

    /// Builds a [`BambooClient`] from this configuration.
    ///
    /// Without `[credentials]` the client sends empty Basic credentials,
    /// which Bamboo treats as anonymous access.
    pub fn build_client(&self) -> Result<BambooClient> {
        let http = reqwest::Client::builder()
            .user_agent(user_agent())
            .timeout(self.timeout())
            .build()
            .context("Failed to build HTTP client")?;

        let credential = self
            .credentials
            .clone()
            .map(Credential::from)
            .unwrap_or_else(|| Credential::basic("", ""));

        let mut client = BambooClient::with_http_client(http, credential)?;
        if let Some(base_url) = self.base_url.as_deref() {
            client
                .set_url(base_url)
                .with_context(|| format!("Invalid base_url in config: {}", base_url))?;
        }

        Ok(client)
    }
}
