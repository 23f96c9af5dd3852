//! Skill records, validated descriptors and frontmatter parsing.

use serde::{Deserialize, Serialize};

use crate::SkillError;

/// A raw skill record as it appears in a source file.
///
/// Every field is optional at this stage so that validation can report
/// exactly which one is missing instead of failing inside the YAML parser.
///
/// ```yaml
/// id: auth                       # `name` is accepted as well
/// displayName: Authentication
/// description: JWT and session handling
/// triggers: [jwt, token, auth]
/// relatedSkillIds: [security]
/// priority: 1
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillRecord {
    /// Unique identifier of the skill.
    #[serde(default, alias = "name")]
    pub id: Option<String>,
    /// Human-readable name, defaults to the id.
    #[serde(default)]
    pub display_name: Option<String>,
    /// Free-text description.
    #[serde(default)]
    pub description: Option<String>,
    /// Trigger keywords or short phrases.
    #[serde(default)]
    pub triggers: Option<Vec<String>>,
    /// Ids of related skills, informational only.
    #[serde(default)]
    pub related_skill_ids: Vec<String>,
    /// Tie-break priority, higher wins.
    #[serde(default)]
    pub priority: Option<i64>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RecordsDocument {
    Many(Vec<SkillRecord>),
    Wrapped { skills: Vec<SkillRecord> },
    One(SkillRecord),
}

impl SkillRecord {
    /// Create a record with the required fields and no triggers.
    #[must_use]
    pub fn new(id: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            description: Some(description.into()),
            triggers: Some(Vec::new()),
            ..Self::default()
        }
    }

    /// Set the trigger list.
    #[must_use]
    pub fn with_triggers<I, S>(mut self, triggers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.triggers = Some(triggers.into_iter().map(Into::into).collect());
        self
    }

    /// Set the display name.
    #[must_use]
    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    /// Set the related skill ids.
    #[must_use]
    pub fn with_related<I, S>(mut self, related: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.related_skill_ids = related.into_iter().map(Into::into).collect();
        self
    }

    /// Set the tie-break priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: i64) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Parse one or more records from a YAML (or JSON) document.
    ///
    /// Accepts a sequence of records, a mapping with a `skills` sequence,
    /// or a single record. An empty document yields no records.
    ///
    /// # Errors
    ///
    /// Returns the YAML error if the document matches none of these shapes.
    pub fn parse_many(content: &str) -> Result<Vec<Self>, serde_yaml::Error> {
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        Ok(match serde_yaml::from_str(content)? {
            RecordsDocument::Many(records) | RecordsDocument::Wrapped { skills: records } => {
                records
            }
            RecordsDocument::One(record) => vec![record],
        })
    }

    /// Parse a record from the frontmatter of a `SKILL.md` file.
    ///
    /// The file format is:
    /// ```markdown
    /// ---
    /// name: skill-name
    /// description: What this skill does
    /// triggers:
    ///   - "trigger phrase"
    /// ---
    ///
    /// # Instructions
    ///
    /// The markdown body is guidance for the assistant and is not read.
    /// ```
    ///
    /// # Errors
    ///
    /// Returns `SkillError::MissingFrontmatter` if the content doesn't have
    /// valid YAML frontmatter, or `SkillError::ParseFrontmatter` if the YAML
    /// cannot be parsed.
    pub fn from_markdown(content: &str) -> Result<Self, SkillError> {
        let content = content.trim_start_matches('\u{feff}').trim();

        let Some(after_first) = content.strip_prefix("---") else {
            return Err(SkillError::MissingFrontmatter);
        };

        let end_idx = after_first
            .find("\n---")
            .ok_or(SkillError::MissingFrontmatter)?;

        let record = serde_yaml::from_str(&after_first[..end_idx])?;
        Ok(record)
    }

    /// Validate the record and turn it into a descriptor.
    ///
    /// `position` labels the record in errors when its id is missing.
    ///
    /// # Errors
    ///
    /// Returns `SkillError::MalformedDescriptor` when the id, description or
    /// trigger list is missing, the id is blank or contains whitespace, or any
    /// trigger is blank.
    pub fn into_descriptor(self, position: usize) -> Result<SkillDescriptor, SkillError> {
        let id = match self.id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => return Err(SkillError::malformed(format!("#{position}"), "missing id")),
        };
        if id.chars().any(char::is_whitespace) {
            return Err(SkillError::malformed(id, "id must not contain whitespace"));
        }

        let Some(description) = self.description else {
            return Err(SkillError::malformed(id, "missing description"));
        };

        let Some(raw_triggers) = self.triggers else {
            return Err(SkillError::malformed(id, "missing triggers"));
        };

        let mut triggers: Vec<String> = Vec::with_capacity(raw_triggers.len());
        for (idx, trigger) in raw_triggers.into_iter().enumerate() {
            let trigger = trigger.trim();
            if trigger.is_empty() {
                return Err(SkillError::malformed(
                    id,
                    format!("trigger #{idx} is empty"),
                ));
            }
            // Trigger sets are case-insensitive; keep the first spelling.
            let folded = trigger.to_lowercase();
            if !triggers.iter().any(|t| t.to_lowercase() == folded) {
                triggers.push(trigger.to_string());
            }
        }

        let display_name = self
            .display_name
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| id.clone());

        Ok(SkillDescriptor {
            id,
            display_name,
            description: description.trim().to_string(),
            triggers,
            related_skill_ids: self.related_skill_ids,
            priority: self.priority.unwrap_or_default(),
        })
    }
}

/// A validated, immutable skill descriptor owned by a [`SkillRegistry`](crate::SkillRegistry).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillDescriptor {
    /// Unique, stable identifier.
    pub id: String,
    /// Human-readable name.
    pub display_name: String,
    /// Free-text description.
    pub description: String,
    /// Trigger keywords, unique case-insensitively. Order carries no meaning.
    pub triggers: Vec<String>,
    /// Ids of related skills, informational only.
    pub related_skill_ids: Vec<String>,
    /// Tie-break priority, higher wins.
    pub priority: i64,
}
