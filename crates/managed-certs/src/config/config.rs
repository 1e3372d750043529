//! Configuration file handling
//!
//! Profiles are stored in TOML. `${VAR}` and `${VAR:-default}` references are
//! expanded from the environment before parsing.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::error::{ConfigError, Result};
use crate::client::{ComputeClient, DEFAULT_API_URL};
use crate::waiter::DEFAULT_POLL_INTERVAL;

/// Overrides the config file location
pub const CONFIG_PATH_ENV: &str = "MANAGED_CERTS_CONFIG";

/// Access token used when a profile does not set one
pub const ACCESS_TOKEN_ENV: &str = "GOOGLE_OAUTH_ACCESS_TOKEN";

/// Main configuration structure
#[derive(Debug, Serialize, Deserialize, Default, Clone)]
pub struct Config {
    /// Profile used when none is named explicitly
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_profile: Option<String>,
    /// Map of profile name -> profile configuration
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

/// Individual profile configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Profile {
    /// Project every request is scoped to
    pub project_id: String,
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// OAuth2 bearer token; falls back to `GOOGLE_OAUTH_ACCESS_TOKEN`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_poll_interval_secs() -> u64 {
    DEFAULT_POLL_INTERVAL.as_secs()
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl Profile {
    /// Profile for `project_id` with default endpoint and timings
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            api_url: default_api_url(),
            access_token: None,
            poll_interval_secs: default_poll_interval_secs(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Check the values a client cannot work without
    pub fn validate(&self) -> Result<()> {
        if self.project_id.trim().is_empty() {
            return Err(ConfigError::InvalidProfile(
                "project_id must not be empty".to_string(),
            ));
        }
        if self.poll_interval_secs == 0 {
            return Err(ConfigError::InvalidProfile(
                "poll_interval_secs must be at least 1".to_string(),
            ));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidProfile(
                "request_timeout_secs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Resolve the access token, falling back to the environment
    ///
    /// `Ok(None)` means requests go out unauthenticated (emulators).
    pub fn resolve_access_token(&self) -> Result<Option<String>> {
        match &self.access_token {
            Some(token) if token.contains("${") => Err(ConfigError::EnvExpansionError(format!(
                "access_token references an unset variable: {token}"
            ))),
            Some(token) if !token.is_empty() => Ok(Some(token.clone())),
            _ => Ok(std::env::var(ACCESS_TOKEN_ENV)
                .ok()
                .filter(|t| !t.is_empty())),
        }
    }

    /// HTTP client for this profile's endpoint and credentials
    pub fn compute_client(&self) -> crate::error::Result<ComputeClient> {
        self.validate()?;

        let mut builder = ComputeClient::builder()
            .base_url(&self.api_url)
            .timeout(self.request_timeout());
        if let Some(token) = self.resolve_access_token()? {
            builder = builder.access_token(token);
        }

        Ok(builder.build()?)
    }
}

impl Config {
    /// Resolve which profile to use
    ///
    /// Order: explicit name, `default_profile`, the only configured profile.
    pub fn resolve_profile(&self, explicit_profile: Option<&str>) -> Result<String> {
        if let Some(profile_name) = explicit_profile {
            return Ok(profile_name.to_string());
        }

        if let Some(ref default) = self.default_profile {
            return Ok(default.clone());
        }

        match self.profiles.len() {
            1 => Ok(self.profiles.keys().next().cloned().unwrap_or_default()),
            0 => Err(ConfigError::NoProfileSelected {
                suggestion: "No profiles configured.".to_string(),
            }),
            _ => {
                let mut names: Vec<_> = self.profiles.keys().map(String::as_str).collect();
                names.sort_unstable();
                Err(ConfigError::NoProfileSelected {
                    suggestion: format!(
                        "Available profiles: {}. Set default_profile or pick one explicitly.",
                        names.join(", ")
                    ),
                })
            }
        }
    }

    /// Look up the resolved profile
    pub fn profile(&self, explicit_profile: Option<&str>) -> Result<&Profile> {
        let name = self.resolve_profile(explicit_profile)?;
        self.profiles
            .get(&name)
            .ok_or(ConfigError::ProfileNotFound { name })
    }

    /// Load configuration from the standard location
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        Self::load_from_path(&config_path)
    }

    /// Load configuration from a specific path
    ///
    /// A missing file yields the default (empty) configuration.
    pub fn load_from_path(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(config_path).map_err(|e| ConfigError::LoadError {
            path: config_path.display().to_string(),
            source: e,
        })?;

        let expanded_content = Self::expand_env_vars(&content);

        let config: Config = toml::from_str(&expanded_content)?;

        Ok(config)
    }

    /// Save configuration to a specific path
    pub fn save_to_path(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::SaveError {
                path: parent.display().to_string(),
                source: e,
            })?;
        }

        let content = toml::to_string_pretty(self)?;

        fs::write(config_path, content).map_err(|e| ConfigError::SaveError {
            path: config_path.display().to_string(),
            source: e,
        })?;

        Ok(())
    }

    /// Set or update a profile
    pub fn set_profile(&mut self, name: String, profile: Profile) {
        self.profiles.insert(name, profile);
    }

    /// Remove a profile by name, clearing the default if it pointed there
    pub fn remove_profile(&mut self, name: &str) -> Option<Profile> {
        if self.default_profile.as_deref() == Some(name) {
            self.default_profile = None;
        }
        self.profiles.remove(name)
    }

    /// List all profiles sorted by name
    pub fn list_profiles(&self) -> Vec<(&String, &Profile)> {
        let mut profiles: Vec<_> = self.profiles.iter().collect();
        profiles.sort_by_key(|(name, _)| *name);
        profiles
    }

    /// Get the path to the configuration file
    ///
    /// `MANAGED_CERTS_CONFIG` wins; otherwise the platform config directory
    /// (`~/.config/managed-certs/config.toml` on Linux).
    pub fn config_path() -> Result<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_PATH_ENV).filter(|p| !p.is_empty()) {
            return Ok(PathBuf::from(path));
        }

        let proj_dirs = ProjectDirs::from("com", "managed-certs", "managed-certs")
            .ok_or(ConfigError::ConfigDirError)?;

        Ok(proj_dirs.config_dir().join("config.toml"))
    }

    /// Expand `${VAR}` and `${VAR:-default}` references
    ///
    /// Unset variables without a default are left as-is so that profiles that
    /// are not used do not fail to load.
    fn expand_env_vars(content: &str) -> String {
        let expanded =
            shellexpand::env_with_context_no_errors(content, |var| std::env::var(var).ok());
        expanded.to_string()
    }
}
