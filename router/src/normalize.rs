//! Query and trigger normalization.

use std::collections::HashSet;

use crate::TriggerIndex;

/// A routing query: the raw text plus its normalized tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    raw: String,
    tokens: Vec<String>,
}

impl Query {
    /// Normalize `raw` against the vocabulary of `index`.
    #[must_use]
    pub fn parse(raw: impl Into<String>, index: &TriggerIndex) -> Self {
        let raw = raw.into();
        let tokens = normalize(&raw, index);
        Self { raw, tokens }
    }

    /// The text as given.
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Normalized tokens in query order.
    #[must_use]
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Whether normalization produced no tokens.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// Canonical form of a trigger: lowercase, trimmed, single-spaced.
#[must_use]
pub fn normalize_trigger(trigger: &str) -> String {
    trigger
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Split a raw query into normalized tokens.
///
/// Text is lowercased and split on anything that isn't alphanumeric. A
/// hyphenated word such as `api-key` stays whole only when the index holds
/// it as a trigger; otherwise it splits into its parts. Runs of words that
/// spell a multi-word trigger also yield that phrase as a token, placed
/// before the words it covers, longest phrase first.
///
/// Empty or whitespace-only input yields no tokens.
#[must_use]
pub fn normalize(raw: &str, index: &TriggerIndex) -> Vec<String> {
    let lowered = raw.trim().to_lowercase();
    let mut words = Vec::new();

    for word in segments(&lowered) {
        if word.contains('-') && !index.contains(word) {
            words.extend(
                word.split('-')
                    .filter(|part| !part.is_empty())
                    .map(str::to_string),
            );
        } else {
            words.push(word.to_string());
        }
    }

    merge_phrases(words, index)
}

/// Words of a description, for whole-word matching.
///
/// Returns the set of words (hyphenated words both whole and split) and the
/// fully split word sequence.
pub(crate) fn description_words(text: &str) -> (HashSet<String>, Vec<String>) {
    let lowered = text.to_lowercase();
    let mut words = HashSet::new();
    let mut sequence = Vec::new();

    for word in segments(&lowered) {
        if word.contains('-') {
            words.insert(word.to_string());
        }
        for part in word.split('-').filter(|part| !part.is_empty()) {
            words.insert(part.to_string());
            sequence.push(part.to_string());
        }
    }

    (words, sequence)
}

// Maximal runs of alphanumerics and hyphens, with outer hyphens stripped.
fn segments(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '-'))
        .map(|word| word.trim_matches('-'))
        .filter(|word| !word.is_empty())
}

fn merge_phrases(words: Vec<String>, index: &TriggerIndex) -> Vec<String> {
    let max_words = index.max_phrase_words();
    if max_words < 2 || words.len() < 2 {
        return words;
    }

    // Phrases are added ahead of the word they start at; the words stay.
    let mut tokens = Vec::with_capacity(words.len());
    for start in 0..words.len() {
        let longest = max_words.min(words.len() - start);
        tokens.extend(
            (2..=longest)
                .rev()
                .map(|len| words[start..start + len].join(" "))
                .filter(|phrase| index.contains(phrase)),
        );
        tokens.push(words[start].clone());
    }
    tokens
}
