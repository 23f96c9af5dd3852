//! Error types for the skills system.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading and validating skills.
///
/// Every variant is fatal to the load that produced it: a registry is
/// either built from all records or not built at all.
#[derive(Debug, Error)]
pub enum SkillError {
    /// Two records declared the same skill id.
    #[error("duplicate skill id '{id}'")]
    DuplicateSkill {
        /// The id that appeared more than once.
        id: String,
    },

    /// A record is missing a required field or carries an invalid value.
    #[error("malformed skill descriptor '{id}': {reason}")]
    MalformedDescriptor {
        /// Id of the offending record, or its position when the id itself is missing.
        id: String,
        /// What is wrong with the record.
        reason: String,
    },

    /// Failed to read a skill file or directory.
    #[error("failed to read skill file at {path}: {source}")]
    ReadFile {
        /// Path to the file that couldn't be read.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse skill frontmatter.
    #[error("failed to parse skill frontmatter: {0}")]
    ParseFrontmatter(#[from] serde_yaml::Error),

    /// Failed to parse a file of skill records.
    #[error("failed to parse skill records at {path}: {source}")]
    ParseRecords {
        /// Path to the records file.
        path: PathBuf,
        /// The underlying YAML error.
        #[source]
        source: serde_yaml::Error,
    },

    /// Skill file is missing required frontmatter.
    #[error("skill file missing frontmatter delimiter '---'")]
    MissingFrontmatter,

    /// Invalid skill directory structure.
    #[error("invalid skill directory at {path}: {reason}")]
    InvalidStructure {
        /// Path to the invalid directory.
        path: PathBuf,
        /// Reason why it's invalid.
        reason: String,
    },
}

impl SkillError {
    pub(crate) fn malformed(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedDescriptor {
            id: id.into(),
            reason: reason.into(),
        }
    }
}
