//! Error types for the router crate.

use std::path::PathBuf;

use skill_router_skills::SkillError;
use thiserror::Error;

/// Errors that can occur while configuring or reloading a router.
///
/// Routing itself never fails; see [`SkillRouter::route`](crate::SkillRouter::route).
#[derive(Debug, Error)]
pub enum RouterError {
    /// The skill registry could not be loaded or validated.
    #[error("failed to load skill registry: {0}")]
    Load(#[from] SkillError),

    /// The configuration file could not be read.
    #[error("failed to read router config at {path}: {source}")]
    ReadConfig {
        /// Path of the configuration file.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for [`RouterConfig`](crate::RouterConfig).
    #[error("failed to parse router config at {path}: {source}")]
    ParseConfig {
        /// Path of the configuration file.
        path: PathBuf,
        /// Underlying TOML error.
        #[source]
        source: toml::de::Error,
    },

    /// Inline configuration text is not valid TOML.
    #[error("failed to parse router config: {0}")]
    Toml(#[from] toml::de::Error),

    /// A configuration value is out of range.
    #[error("invalid router config value for {field}: {reason}")]
    InvalidConfig {
        /// Name of the offending option.
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
}

/// Result type alias for router operations.
pub type Result<T> = std::result::Result<T, RouterError>;
