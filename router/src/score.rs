//! Scoring of skills against normalized query tokens.

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;

use crate::{RouterConfig, ScoringWeights, TriggerIndex};

/// How well one skill matched a query.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    /// Id of the matched skill.
    pub skill_id: String,
    /// Sum of all signal contributions, always positive.
    pub score: f64,
    /// Normalized triggers that contributed: exact matches in query order,
    /// then partial matches.
    pub matched_triggers: Vec<String>,
}

/// Computes per-skill scores from query tokens and a [`TriggerIndex`].
///
/// Three signals are summed:
///
/// - exact: a token equals a trigger,
/// - partial: a token contains a trigger or is contained in one, once per trigger,
/// - description: any token is a whole word of the description, once per skill.
///
/// A trigger contributes at most one signal per query, exact taking
/// precedence over partial.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scorer {
    weights: ScoringWeights,
    min_fuzzy_len: usize,
}

impl Default for Scorer {
    fn default() -> Self {
        Self::from_config(&RouterConfig::default())
    }
}

#[derive(Debug, Default)]
struct Accumulator<'a> {
    score: f64,
    matched: Vec<String>,
    credited: HashSet<&'a str>,
}

impl Scorer {
    /// Create a scorer with the given weights and the default minimum fuzzy length.
    #[must_use]
    pub fn new(weights: ScoringWeights) -> Self {
        Self {
            weights,
            ..Self::default()
        }
    }

    /// Create a scorer from a router configuration.
    #[must_use]
    pub const fn from_config(config: &RouterConfig) -> Self {
        Self {
            weights: config.weights,
            min_fuzzy_len: config.min_fuzzy_len,
        }
    }

    /// Set the minimum length of the shorter string in partial and description matches.
    #[must_use]
    pub const fn with_min_fuzzy_len(mut self, len: usize) -> Self {
        self.min_fuzzy_len = len;
        self
    }

    /// The weights in use.
    #[must_use]
    pub const fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    /// Score every skill that matches at least one token.
    ///
    /// Repeated tokens count once. The result holds one entry per skill with
    /// a positive score, ordered by skill id; ranking is the selector's job.
    #[must_use]
    pub fn score(&self, tokens: &[String], index: &TriggerIndex) -> Vec<MatchResult> {
        let tokens = dedup(tokens);
        if tokens.is_empty() {
            return Vec::new();
        }

        let mut skills: BTreeMap<&str, Accumulator<'_>> = BTreeMap::new();

        if self.weights.exact_weight > 0.0 {
            for &token in &tokens {
                let Some(owners) = index.lookup(token) else {
                    continue;
                };
                for owner in owners {
                    let acc = skills.entry(owner.as_str()).or_default();
                    acc.score += self.weights.exact_weight;
                    acc.matched.push(token.to_string());
                    acc.credited.insert(token);
                }
            }
        }

        if self.weights.partial_weight > 0.0 {
            for &token in &tokens {
                for trigger in index.tokens() {
                    if !self.is_partial(token, trigger) {
                        continue;
                    }
                    let Some(owners) = index.lookup(trigger) else {
                        continue;
                    };
                    for owner in owners {
                        let acc = skills.entry(owner.as_str()).or_default();
                        if acc.credited.insert(trigger.as_str()) {
                            acc.score += self.weights.partial_weight;
                            acc.matched.push(trigger.clone());
                        }
                    }
                }
            }
        }

        if self.weights.description_weight > 0.0 {
            let fuzzy: Vec<&str> = tokens
                .iter()
                .copied()
                .filter(|token| token.chars().count() >= self.min_fuzzy_len)
                .collect();
            for skill_id in index.skill_ids() {
                if fuzzy
                    .iter()
                    .any(|token| index.description_contains(skill_id, token))
                {
                    skills.entry(skill_id).or_default().score += self.weights.description_weight;
                }
            }
        }

        let results: Vec<MatchResult> = skills
            .into_iter()
            .filter(|(_, acc)| acc.score > 0.0)
            .map(|(skill_id, acc)| MatchResult {
                skill_id: skill_id.to_string(),
                score: acc.score,
                matched_triggers: acc.matched,
            })
            .collect();

        tracing::debug!(tokens = tokens.len(), candidates = results.len(), "scored query");
        results
    }

    fn is_partial(&self, token: &str, trigger: &str) -> bool {
        let token_len = token.chars().count();
        let trigger_len = trigger.chars().count();
        if token_len == trigger_len || token_len.min(trigger_len) < self.min_fuzzy_len {
            return false;
        }
        if token_len < trigger_len {
            trigger.contains(token)
        } else {
            token.contains(trigger)
        }
    }
}

fn dedup(tokens: &[String]) -> Vec<&str> {
    let mut seen = HashSet::with_capacity(tokens.len());
    tokens
        .iter()
        .map(String::as_str)
        .filter(|token| !token.is_empty() && seen.insert(*token))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize;
    use skill_router_skills::{SkillRecord, SkillRegistry};

    fn auth_and_cache() -> TriggerIndex {
        let registry = SkillRegistry::from_records([
            SkillRecord::new("auth", "Authentication with JWT and sessions")
                .with_triggers(["jwt", "token", "auth"]),
            SkillRecord::new("cache", "Redis caching with expiry policies")
                .with_triggers(["redis", "cache", "ttl"]),
        ])
        .unwrap();
        TriggerIndex::build(&registry)
    }

    fn score(query: &str, index: &TriggerIndex) -> Vec<MatchResult> {
        Scorer::default().score(&normalize(query, index), index)
    }

    #[test]
    fn exact_matches_and_description_overlap() {
        let index = auth_and_cache();
        let results = score("how do I expire a jwt token", &index);

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].skill_id, "auth");
        // jwt + token exact, jwt in description
        assert_eq!(results[0].score, 6.5);
        assert_eq!(results[0].matched_triggers, vec!["jwt", "token"]);
    }

    #[test]
    fn partial_match_counts_once_per_trigger() {
        let registry = SkillRegistry::from_records([SkillRecord::new("auth", "Sign in flows")
            .with_triggers(["authentication", "authorization"])])
        .unwrap();
        let index = TriggerIndex::build(&registry);

        let results = score("auth authentic authent", &index);
        // "auth" is a substring of both triggers; later tokens hit the same triggers again.
        assert_eq!(results[0].score, 2.0);
        assert_eq!(
            results[0].matched_triggers,
            vec!["authentication", "authorization"]
        );
    }

    #[test]
    fn exact_takes_precedence_over_partial() {
        let registry = SkillRegistry::from_records([SkillRecord::new("cache", "none here")
            .with_triggers(["cache"])])
        .unwrap();
        let index = TriggerIndex::build(&registry);

        let results = score("cache caches", &index);
        assert_eq!(results[0].score, 3.0);
        assert_eq!(results[0].matched_triggers, vec!["cache"]);
    }

    #[test]
    fn token_containing_trigger_is_partial() {
        let index = auth_and_cache();
        let results = score("rediscover", &index);
        assert_eq!(results[0].skill_id, "cache");
        assert_eq!(results[0].score, 1.0);
        assert_eq!(results[0].matched_triggers, vec!["redis"]);
    }

    #[test]
    fn short_tokens_never_match_fuzzily() {
        let index = auth_and_cache();
        // "a" and "i" are substrings of several triggers.
        assert!(score("a i", &index).is_empty());

        let lenient = Scorer::default().with_min_fuzzy_len(1);
        let results = lenient.score(&normalize("a", &index), &index);
        assert!(results.iter().any(|r| r.skill_id == "cache"));
    }

    #[test]
    fn description_counts_once_per_skill() {
        let index = auth_and_cache();
        let results = score("redis caches expiry policies", &index);

        let cache = results.iter().find(|r| r.skill_id == "cache").unwrap();
        // redis exact, "cache" partial via "caches", description once
        assert_eq!(cache.score, 3.0 + 1.0 + 0.5);
    }

    #[test]
    fn repeated_tokens_count_once() {
        let index = auth_and_cache();
        assert_eq!(score("jwt jwt JWT", &index)[0].score, 3.5);
    }

    #[test]
    fn zero_weights_disable_signals() {
        let index = auth_and_cache();
        let scorer = Scorer::new(ScoringWeights {
            exact_weight: 0.0,
            partial_weight: 1.0,
            description_weight: 0.0,
        });

        assert!(scorer.score(&normalize("jwt token", &index), &index).is_empty());

        let results = scorer.score(&normalize("tokens", &index), &index);
        assert_eq!(results[0].score, 1.0);
    }

    #[test]
    fn custom_weights_are_applied() {
        let index = auth_and_cache();
        let scorer = Scorer::new(ScoringWeights {
            exact_weight: 10.0,
            partial_weight: 0.0,
            description_weight: 2.0,
        });
        let results = scorer.score(&normalize("jwt", &index), &index);
        assert_eq!(results[0].score, 12.0);
    }

    #[test]
    fn empty_tokens_score_nothing() {
        let index = auth_and_cache();
        assert!(Scorer::default().score(&[], &index).is_empty());
        assert!(score("   ", &index).is_empty());
    }

    #[test]
    fn registration_order_does_not_matter() {
        let records = vec![
            SkillRecord::new("a", "token helpers").with_triggers(["token", "jwt-auth"]),
            SkillRecord::new("b", "jwt parsing").with_triggers(["jwt", "tokens"]),
            SkillRecord::new("c", "misc").with_triggers(["auth"]),
        ];
        let forward = TriggerIndex::build(&SkillRegistry::from_records(records.clone()).unwrap());
        let backward = TriggerIndex::build(
            &SkillRegistry::from_records(records.into_iter().rev()).unwrap(),
        );

        let query = "jwt-auth token parsing";
        assert_eq!(score(query, &forward), score(query, &backward));
    }

    #[test]
    fn phrase_trigger_leaves_single_word_triggers_exact() {
        let registry = SkillRegistry::from_records([
            SkillRecord::new("review", "Code checks").with_triggers(["security audit"]),
            SkillRecord::new("audit", "Compliance logs").with_triggers(["audit"]),
        ])
        .unwrap();
        let index = TriggerIndex::build(&registry);

        let results = score("security audit", &index);
        let audit = results.iter().find(|r| r.skill_id == "audit").unwrap();
        let review = results.iter().find(|r| r.skill_id == "review").unwrap();

        assert_eq!(audit.score, 3.0);
        assert_eq!(audit.matched_triggers, vec!["audit"]);
        assert_eq!(review.score, 3.0);
        assert_eq!(review.matched_triggers, vec!["security audit"]);
    }
}
