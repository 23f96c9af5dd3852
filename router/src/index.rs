//! Inverted index from normalized trigger tokens to skill ids.

use std::collections::{BTreeSet, HashMap, HashSet};

use skill_router_skills::SkillRegistry;

use crate::normalize::{description_words, normalize_trigger};

/// Token-to-skill lookup derived from a [`SkillRegistry`].
///
/// Holds the normalized description words of every skill as well, so that
/// scoring needs nothing but the index and the query tokens. The index is
/// rebuilt whenever the registry is replaced and never mutated on its own.
#[derive(Debug, Clone, Default)]
pub struct TriggerIndex {
    postings: HashMap<String, BTreeSet<String>>,
    tokens: Vec<String>,
    max_phrase_words: usize,
    descriptions: HashMap<String, DescriptionTerms>,
}

#[derive(Debug, Clone, Default)]
struct DescriptionTerms {
    words: HashSet<String>,
    // Space-separated words with a leading and trailing space, for phrase lookups.
    padded: String,
}

impl TriggerIndex {
    /// Build the index for every trigger of every skill in the registry.
    #[must_use]
    pub fn build(registry: &SkillRegistry) -> Self {
        let mut postings: HashMap<String, BTreeSet<String>> = HashMap::new();
        let mut descriptions = HashMap::with_capacity(registry.len());

        for skill in registry.skills() {
            for trigger in &skill.triggers {
                let token = normalize_trigger(trigger);
                if token.is_empty() {
                    continue;
                }
                postings
                    .entry(token)
                    .or_default()
                    .insert(skill.id.clone());
            }

            let (words, sequence) = description_words(&skill.description);
            descriptions.insert(
                skill.id.clone(),
                DescriptionTerms {
                    words,
                    padded: format!(" {} ", sequence.join(" ")),
                },
            );
        }

        let mut tokens: Vec<String> = postings.keys().cloned().collect();
        tokens.sort_unstable();

        let max_phrase_words = tokens
            .iter()
            .map(|token| token.split(' ').count())
            .max()
            .unwrap_or(0);

        Self {
            postings,
            tokens,
            max_phrase_words,
            descriptions,
        }
    }

    /// Skill ids whose triggers contain exactly this normalized token.
    #[must_use]
    pub fn lookup(&self, token: &str) -> Option<&BTreeSet<String>> {
        self.postings.get(token)
    }

    /// Whether any skill declares this normalized token as a trigger.
    #[must_use]
    pub fn contains(&self, token: &str) -> bool {
        self.postings.contains_key(token)
    }

    /// Every indexed token, sorted.
    #[must_use]
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Word count of the longest multi-word trigger.
    #[must_use]
    pub const fn max_phrase_words(&self) -> usize {
        self.max_phrase_words
    }

    /// Whether `token` appears as a whole word (or word sequence) in the
    /// description of `skill_id`.
    #[must_use]
    pub fn description_contains(&self, skill_id: &str, token: &str) -> bool {
        let Some(terms) = self.descriptions.get(skill_id) else {
            return false;
        };
        if token.contains(' ') {
            terms.padded.contains(&format!(" {token} "))
        } else {
            terms.words.contains(token)
        }
    }

    /// Ids of all indexed skills, sorted.
    #[must_use]
    pub fn skill_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.descriptions.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// Number of distinct trigger tokens.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Whether the index holds no trigger tokens.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}
