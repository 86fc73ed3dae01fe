// src/config.rs
// =============================================================================
// Settings for talking to GitHub.
//
// Sources, lowest priority first:
// 1. An optional TOML file (gh-embed.toml by default)
// 2. Environment variables prefixed with GH_EMBED_
//
// Example gh-embed.toml:
//
//   [github]
//   token = "ghp_..."
//
//   [defaults]
//   account = "myaccount"
//   repository = "myrepo"
//
// The same keys as environment variables:
//   GH_EMBED_GITHUB_TOKEN, GH_EMBED_DEFAULTS_ACCOUNT, GH_EMBED_DEFAULTS_REPOSITORY
// =============================================================================

use std::{collections::HashMap, path::Path};

use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_CONFIG_FILE: &str = "gh-embed.toml";
pub const DEFAULT_API_URL: &str = "https://api.github.com";

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Failed to load settings: {0}")]
    Load(#[from] ConfigError),
    #[error("Please set your GitHub access token (github.token or GH_EMBED_GITHUB_TOKEN).")]
    MissingToken,
}

/// Resolved settings used by the rest of the crate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub access_token: String,
    pub api_url: String,
    pub default_account: String,
    pub default_repository: String,
}

impl Settings {
    /// Loads the optional file at `path`, then layers the environment on top.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        Ok(RawSettings::load(Some(path), None)?.into())
    }

    /// Every network command needs a token, so check it before doing anything.
    pub fn require_token(&self) -> Result<&str, SettingsError> {
        if self.access_token.is_empty() {
            Err(SettingsError::MissingToken)
        } else {
            Ok(&self.access_token)
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        RawSettings::default().into()
    }
}

#[derive(Default, Debug, Deserialize, PartialEq, Eq)]
struct RawSettings {
    #[serde(default)]
    github: GithubSection,
    #[serde(default)]
    defaults: DefaultsSection,
}

#[derive(Default, Debug, Deserialize, PartialEq, Eq)]
struct GithubSection {
    token: Option<String>,
    api: Option<String>,
}

#[derive(Default, Debug, Deserialize, PartialEq, Eq)]
struct DefaultsSection {
    account: Option<String>,
    repository: Option<String>,
}

impl RawSettings {
    fn load(
        path: Option<&Path>,
        env: Option<HashMap<String, String>>,
    ) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(
                File::from(path)
                    .format(FileFormat::Toml)
                    .required(false),
            );
        }
        builder
            .add_source(
                Environment::with_prefix("GH_EMBED")
                    .separator("_")
                    .source(env),
            )
            .build()?
            .try_deserialize()
    }
}

impl From<RawSettings> for Settings {
    fn from(raw: RawSettings) -> Self {
        Settings {
            access_token: raw.github.token.unwrap_or_default(),
            api_url: raw
                .github
                .api
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            default_account: raw.defaults.account.unwrap_or_default(),
            default_repository: raw.defaults.repository.unwrap_or_default(),
        }
    }
}
