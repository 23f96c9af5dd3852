//! Skill registry: the validated, immutable set of loaded descriptors.

use std::collections::HashMap;

use crate::{SkillDescriptor, SkillError, SkillRecord};

/// Registry of available skills, keyed by id.
///
/// A registry is built once from a complete batch of records and never
/// changes afterwards. Reloading means building a new registry.
///
/// # Example
///
/// ```rust
/// use skill_router_skills::{SkillRecord, SkillRegistry};
///
/// let registry = SkillRegistry::from_records([
///     SkillRecord::new("auth", "JWT and session handling").with_triggers(["jwt", "token"]),
///     SkillRecord::new("cache", "Redis caching patterns").with_triggers(["redis", "ttl"]),
/// ])
/// .unwrap();
///
/// assert_eq!(registry.len(), 2);
/// assert!(registry.contains("auth"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct SkillRegistry {
    skills: HashMap<String, SkillDescriptor>,
}

impl SkillRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate a batch of records and build a registry from them.
    ///
    /// The batch is all-or-nothing: the first invalid record aborts the
    /// whole build and no partial registry is returned.
    ///
    /// # Errors
    ///
    /// Returns `SkillError::MalformedDescriptor` for a record that fails
    /// validation and `SkillError::DuplicateSkill` when two records share an id.
    pub fn from_records<I>(records: I) -> Result<Self, SkillError>
    where
        I: IntoIterator<Item = SkillRecord>,
    {
        let mut skills = HashMap::new();

        for (position, record) in records.into_iter().enumerate() {
            let skill = record.into_descriptor(position)?;
            if skills.contains_key(&skill.id) {
                return Err(SkillError::DuplicateSkill { id: skill.id });
            }
            skills.insert(skill.id.clone(), skill);
        }

        Ok(Self { skills })
    }

    /// Get a skill by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&SkillDescriptor> {
        self.skills.get(id)
    }

    /// Check if a skill exists.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.skills.contains_key(id)
    }

    /// All registered skill ids, sorted.
    #[must_use]
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.skills.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// All registered skills, in no particular order.
    pub fn skills(&self) -> impl Iterator<Item = &SkillDescriptor> {
        self.skills.values()
    }

    /// All registered skills, sorted by id.
    #[must_use]
    pub fn sorted(&self) -> Vec<&SkillDescriptor> {
        let mut skills: Vec<&SkillDescriptor> = self.skills.values().collect();
        skills.sort_unstable_by(|a, b| a.id.cmp(&b.id));
        skills
    }

    /// Priority of a skill, or 0 if it isn't registered.
    #[must_use]
    pub fn priority(&self, id: &str) -> i64 {
        self.skills.get(id).map_or(0, |skill| skill.priority)
    }

    /// Number of registered skills.
    #[must_use]
    pub fn len(&self) -> usize {
        self.skills.len()
    }

    /// Check if registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }
}
