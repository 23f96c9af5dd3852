//! Ranking, thresholding and explicit overrides.

use std::cmp::Ordering;

use serde::Serialize;
use skill_router_skills::SkillRegistry;

use crate::MatchResult;

/// Score given to a skill selected by explicit override.
pub const OVERRIDE_SCORE: f64 = f64::MAX;

/// Ranked matches, best first. This is the router's only output.
///
/// An empty response is a valid outcome meaning "no confident match".
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RankedResponse {
    matches: Vec<MatchResult>,
}

impl RankedResponse {
    /// Wrap already ranked matches.
    #[must_use]
    pub const fn new(matches: Vec<MatchResult>) -> Self {
        Self { matches }
    }

    /// The matches, best first.
    #[must_use]
    pub fn matches(&self) -> &[MatchResult] {
        &self.matches
    }

    /// The best match, if any.
    #[must_use]
    pub fn best(&self) -> Option<&MatchResult> {
        self.matches.first()
    }

    /// Number of matches.
    #[must_use]
    pub fn len(&self) -> usize {
        self.matches.len()
    }

    /// Whether nothing matched.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    /// Take the matches out.
    #[must_use]
    pub fn into_matches(self) -> Vec<MatchResult> {
        self.matches
    }
}

impl<'a> IntoIterator for &'a RankedResponse {
    type Item = &'a MatchResult;
    type IntoIter = std::slice::Iter<'a, MatchResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.matches.iter()
    }
}

/// Selection policy: limit, threshold and explicit override.
///
/// ```rust
/// use skill_router_core::Selector;
///
/// let selector = Selector::new().limit(3).threshold(1.0);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selector {
    limit: Option<usize>,
    threshold: f64,
    explicit_override: Option<String>,
}

impl Selector {
    /// Unbounded selection with threshold 0 and no override.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep at most `limit` results.
    #[must_use]
    pub const fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Keep at most `limit` results, or all when `None`.
    #[must_use]
    pub const fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }

    /// Drop results scoring below `threshold`.
    #[must_use]
    pub const fn threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Return this skill alone if it is registered.
    #[must_use]
    pub fn explicit_override(mut self, skill_id: impl Into<String>) -> Self {
        self.explicit_override = Some(skill_id.into());
        self
    }

    /// Set or clear the explicit override.
    #[must_use]
    pub fn with_explicit_override(mut self, skill_id: Option<String>) -> Self {
        self.explicit_override = skill_id;
        self
    }

    /// Rank scored results into a response.
    ///
    /// A registered override wins unconditionally and yields a single
    /// result scored [`OVERRIDE_SCORE`]. An unknown override is ignored.
    /// Otherwise results below the threshold are dropped, the rest are
    /// sorted by score, then priority (higher first), then id, and the
    /// list is truncated to the limit.
    #[must_use]
    pub fn select(&self, mut results: Vec<MatchResult>, registry: &SkillRegistry) -> RankedResponse {
        if let Some(skill_id) = self.explicit_override.as_deref() {
            if registry.contains(skill_id) {
                let matched_triggers = results
                    .into_iter()
                    .find(|result| result.skill_id == skill_id)
                    .map(|result| result.matched_triggers)
                    .unwrap_or_default();
                tracing::debug!(skill = skill_id, "explicit skill override");
                return RankedResponse::new(vec![MatchResult {
                    skill_id: skill_id.to_string(),
                    score: OVERRIDE_SCORE,
                    matched_triggers,
                }]);
            }
            tracing::debug!(skill = skill_id, "unknown override, falling back to scoring");
        }

        results.retain(|result| result.score > 0.0 && result.score >= self.threshold);
        results.sort_by(|a, b| rank_order(a, b, registry));
        if let Some(limit) = self.limit {
            results.truncate(limit);
        }

        RankedResponse::new(results)
    }
}

// Score descending, then priority descending, then id ascending.
fn rank_order(a: &MatchResult, b: &MatchResult, registry: &SkillRegistry) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| registry.priority(&b.skill_id).cmp(&registry.priority(&a.skill_id)))
        .then_with(|| a.skill_id.cmp(&b.skill_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use skill_router_skills::SkillRecord;

    fn result(id: &str, score: f64) -> MatchResult {
        MatchResult {
            skill_id: id.to_string(),
            score,
            matched_triggers: vec![],
        }
    }

    fn registry() -> SkillRegistry {
        SkillRegistry::from_records([
            SkillRecord::new("x", "x").with_priority(1),
            SkillRecord::new("y", "y"),
            SkillRecord::new("z", "z"),
            SkillRecord::new("auth", "auth"),
        ])
        .unwrap()
    }

    fn ids(response: &RankedResponse) -> Vec<&str> {
        response.matches().iter().map(|m| m.skill_id.as_str()).collect()
    }

    #[test]
    fn sorts_by_score_descending() {
        let response = Selector::new().select(
            vec![result("y", 1.0), result("z", 4.0), result("auth", 2.5)],
            &registry(),
        );
        assert_eq!(ids(&response), vec!["z", "auth", "y"]);
    }

    #[test]
    fn ties_break_by_priority_then_id() {
        let response = Selector::new().select(
            vec![result("z", 2.0), result("y", 2.0), result("x", 2.0)],
            &registry(),
        );
        assert_eq!(ids(&response), vec!["x", "y", "z"]);
    }

    #[test]
    fn threshold_and_limit() {
        let results = vec![result("x", 0.5), result("y", 3.0), result("z", 2.0)];

        let response = Selector::new().threshold(1.0).select(results.clone(), &registry());
        assert_eq!(ids(&response), vec!["y", "z"]);

        let response = Selector::new().limit(1).select(results.clone(), &registry());
        assert_eq!(ids(&response), vec!["y"]);

        let response = Selector::new().threshold(2.0).select(results, &registry());
        assert_eq!(ids(&response), vec!["y", "z"]);
    }

    #[test]
    fn no_results_is_empty_response() {
        let response = Selector::new().limit(3).select(vec![], &registry());
        assert!(response.is_empty());
        assert!(response.best().is_none());
    }

    #[test]
    fn known_override_wins() {
        let response = Selector::new()
            .limit(3)
            .explicit_override("z")
            .select(vec![result("y", 9.0)], &registry());

        assert_eq!(response.len(), 1);
        let best = response.best().unwrap();
        assert_eq!(best.skill_id, "z");
        assert_eq!(best.score, OVERRIDE_SCORE);
        assert!(best.matched_triggers.is_empty());
    }

    #[test]
    fn override_keeps_its_matched_triggers() {
        let mut scored = result("auth", 3.0);
        scored.matched_triggers = vec!["jwt".to_string()];

        let response = Selector::new()
            .explicit_override("auth")
            .select(vec![result("y", 9.0), scored], &registry());
        assert_eq!(response.matches()[0].matched_triggers, vec!["jwt"]);
    }

    #[test]
    fn unknown_override_falls_back_to_scoring() {
        let response = Selector::new()
            .explicit_override("nope")
            .select(vec![result("y", 1.0)], &registry());
        assert_eq!(ids(&response), vec!["y"]);
    }

    #[test]
    fn rank_order_matches_select() {
        let registry = registry();
        let mut results = vec![result("z", 2.0), result("x", 2.0), result("y", 5.0)];
        results.sort_by(|a, b| rank_order(a, b, &registry));
        let expected = Selector::new().select(results.clone(), &registry);
        assert_eq!(results, expected.into_matches());
    }
}
