//! Skill loader for discovering skill records on the filesystem.

use std::path::{Path, PathBuf};

use async_fs as afs;
use futures_lite::stream::StreamExt;

use crate::{SkillError, SkillRecord, SkillRegistry};

const SKILL_FILE: &str = "SKILL.md";
const RECORD_EXTENSIONS: &[&str] = &["yaml", "yml", "json"];

/// Loads skill records from filesystem paths.
///
/// Each configured path may be:
///
/// ```text
/// skills.yaml              # a file holding a list of records
/// skills/
/// ├── extra.yml            # record files inside a directory
/// └── code-review/
///     └── SKILL.md         # frontmatter holds the record
/// ```
///
/// # Example
///
/// ```rust,ignore
/// let loader = SkillLoader::new()
///     .add_path("~/.claude/skills")
///     .add_path("./skills.yaml");
///
/// let registry = loader.load_registry().await?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct SkillLoader {
    paths: Vec<PathBuf>,
}

impl SkillLoader {
    /// Create a new skill loader with no paths.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file or directory to search for skill records.
    #[must_use]
    pub fn add_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.paths.push(path.into());
        self
    }

    /// The configured search paths, in the order they were added.
    #[must_use]
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    /// Load all records from all configured paths.
    ///
    /// Missing paths are skipped. Directory entries are visited in sorted
    /// order and hidden entries are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if any file cannot be read or parsed, or if a skill
    /// folder has no `SKILL.md`. One bad source fails the whole load.
    pub async fn load_all(&self) -> Result<Vec<SkillRecord>, SkillError> {
        let mut records = Vec::new();

        for base_path in &self.paths {
            let Some(metadata) = metadata_async(base_path).await? else {
                tracing::warn!(path = %base_path.display(), "skill path does not exist, skipping");
                continue;
            };

            if metadata.is_file() {
                records.extend(Self::load_records_file(base_path).await?);
                continue;
            }

            for path in sorted_entries(base_path).await? {
                if is_hidden(&path) {
                    continue;
                }

                let file_type = afs::metadata(&path)
                    .await
                    .map_err(|source| SkillError::ReadFile {
                        path: path.clone(),
                        source,
                    })?;

                if file_type.is_dir() {
                    records.push(Self::load_from_dir(&path).await?);
                } else if is_record_file(&path) {
                    records.extend(Self::load_records_file(&path).await?);
                }
            }
        }

        tracing::debug!(records = records.len(), paths = self.paths.len(), "loaded skill records");
        Ok(records)
    }

    /// Load all records and validate them into a registry.
    ///
    /// # Errors
    ///
    /// Returns any read or parse error from [`Self::load_all`], or the
    /// validation error from [`SkillRegistry::from_records`].
    pub async fn load_registry(&self) -> Result<SkillRegistry, SkillError> {
        let records = self.load_all().await?;
        SkillRegistry::from_records(records)
    }

    /// Load a record from a skill folder's `SKILL.md`.
    async fn load_from_dir(dir: &Path) -> Result<SkillRecord, SkillError> {
        let skill_file = dir.join(SKILL_FILE);

        if metadata_async(&skill_file).await?.is_none() {
            return Err(SkillError::InvalidStructure {
                path: dir.to_path_buf(),
                reason: format!("missing {SKILL_FILE} file"),
            });
        }

        let content =
            afs::read_to_string(&skill_file)
                .await
                .map_err(|source| SkillError::ReadFile {
                    path: skill_file,
                    source,
                })?;

        SkillRecord::from_markdown(&content)
    }

    /// Load every record from a YAML or JSON file.
    async fn load_records_file(path: &Path) -> Result<Vec<SkillRecord>, SkillError> {
        let content = afs::read_to_string(path)
            .await
            .map_err(|source| SkillError::ReadFile {
                path: path.to_path_buf(),
                source,
            })?;

        SkillRecord::parse_many(&content).map_err(|source| SkillError::ParseRecords {
            path: path.to_path_buf(),
            source,
        })
    }
}

async fn sorted_entries(dir: &Path) -> Result<Vec<PathBuf>, SkillError> {
    let mut entries = afs::read_dir(dir)
        .await
        .map_err(|source| SkillError::ReadFile {
            path: dir.to_path_buf(),
            source,
        })?;

    let mut paths = Vec::new();
    while let Some(entry) = entries
        .try_next()
        .await
        .map_err(|source| SkillError::ReadFile {
            path: dir.to_path_buf(),
            source,
        })?
    {
        paths.push(entry.path());
    }

    paths.sort();
    Ok(paths)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with('.'))
}

fn is_record_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| RECORD_EXTENSIONS.iter().any(|e| ext.eq_ignore_ascii_case(e)))
}

async fn metadata_async(path: &Path) -> Result<Option<std::fs::Metadata>, SkillError> {
    match afs::metadata(path).await {
        Ok(metadata) => Ok(Some(metadata)),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(SkillError::ReadFile {
            path: path.to_path_buf(),
            source: err,
        }),
    }
}
