//! Configuration profiles
//!
// Allow nested config module - this is intentional for the config subsystem

#![allow(clippy::module_inception)]
//!
//! A profile names the project a manager is bound to plus how to reach the
//! Compute API: endpoint, access token, request timeout and poll interval.
//!
//! ```toml
//! default_profile = "prod"
//!
//! [profiles.prod]
//! project_id = "my-project"
//! access_token = "${GCE_ACCESS_TOKEN}"
//!
//! [profiles.emulator]
//! project_id = "test-project"
//! api_url = "http://localhost:8080/compute/v1/"
//! poll_interval_secs = 1
//! ```

pub mod config;
pub mod error;

pub use config::{ACCESS_TOKEN_ENV, CONFIG_PATH_ENV, Config, Profile};
pub use error::{ConfigError, Result};
