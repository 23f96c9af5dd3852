//! The shared router handle and its atomically replaced snapshot.

use std::sync::Arc;

use parking_lot::RwLock;
use skill_router_skills::{SkillLoader, SkillRecord, SkillRegistry};

use crate::{Query, RankedResponse, Result, RouterConfig, Scorer, Selector, TriggerIndex};

/// A registry together with the index built from it.
///
/// Snapshots are immutable; any number of queries can run against one
/// concurrently.
#[derive(Debug)]
pub struct RouterSnapshot {
    registry: SkillRegistry,
    index: TriggerIndex,
}

impl RouterSnapshot {
    /// Index a registry.
    #[must_use]
    pub fn new(registry: SkillRegistry) -> Self {
        let index = TriggerIndex::build(&registry);
        Self { registry, index }
    }

    /// The registry.
    #[must_use]
    pub const fn registry(&self) -> &SkillRegistry {
        &self.registry
    }

    /// The trigger index.
    #[must_use]
    pub const fn index(&self) -> &TriggerIndex {
        &self.index
    }

    /// Normalize, score and select in one pass.
    #[must_use]
    pub fn route(&self, query: &str, scorer: &Scorer, selector: &Selector) -> RankedResponse {
        let query = Query::parse(query, &self.index);
        let results = scorer.score(query.tokens(), &self.index);
        selector.select(results, &self.registry)
    }
}

/// A single routing request.
///
/// Unset limit and threshold fall back to the router's configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RouteRequest {
    query: String,
    limit: Option<usize>,
    threshold: Option<f64>,
    explicit_skill: Option<String>,
}

impl RouteRequest {
    /// Route this free-text query.
    #[must_use]
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }

    /// Keep at most `limit` results.
    #[must_use]
    pub const fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Drop results scoring below `threshold`.
    #[must_use]
    pub const fn threshold(mut self, threshold: f64) -> Self {
        self.threshold = Some(threshold);
        self
    }

    /// Name the skill to return regardless of scores.
    #[must_use]
    pub fn explicit_skill(mut self, skill_id: impl Into<String>) -> Self {
        self.explicit_skill = Some(skill_id.into());
        self
    }

    /// The query text.
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }
}

/// Routes queries against the currently loaded skill registry.
///
/// The router starts unloaded. Each reload builds a complete new
/// [`RouterSnapshot`] before swapping it in, so a query sees either the
/// old snapshot or the new one, never a partial state. A failed reload
/// leaves the previous snapshot in place.
///
/// # Example
///
/// ```rust
/// use skill_router_core::{RouteRequest, RouterConfig, SkillRouter};
/// use skill_router_skills::SkillRecord;
///
/// let router = SkillRouter::new(RouterConfig::default());
/// router
///     .reload([SkillRecord::new("auth", "JWT handling").with_triggers(["jwt", "token"])])
///     .unwrap();
///
/// let response = router.route(&RouteRequest::new("refresh my jwt").limit(1));
/// assert_eq!(response.best().unwrap().skill_id, "auth");
/// ```
#[derive(Debug)]
pub struct SkillRouter {
    config: RouterConfig,
    scorer: Scorer,
    current: RwLock<Option<Arc<RouterSnapshot>>>,
}

impl Default for SkillRouter {
    fn default() -> Self {
        Self::new(RouterConfig::default())
    }
}

impl SkillRouter {
    /// Create an unloaded router.
    #[must_use]
    pub fn new(config: RouterConfig) -> Self {
        let scorer = Scorer::from_config(&config);
        Self {
            config,
            scorer,
            current: RwLock::new(None),
        }
    }

    /// Create a router and load it from records.
    ///
    /// # Errors
    ///
    /// Returns `RouterError::Load` if the records don't form a valid registry.
    pub fn with_records<I>(config: RouterConfig, records: I) -> Result<Self>
    where
        I: IntoIterator<Item = SkillRecord>,
    {
        let router = Self::new(config);
        router.reload(records)?;
        Ok(router)
    }

    /// The configuration in use.
    #[must_use]
    pub const fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// The current snapshot, or `None` before the first successful load.
    #[must_use]
    pub fn snapshot(&self) -> Option<Arc<RouterSnapshot>> {
        self.current.read().clone()
    }

    /// Whether a registry has been loaded.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.current.read().is_some()
    }

    /// Validate records and swap in a new snapshot built from them.
    ///
    /// Returns the number of skills now loaded.
    ///
    /// # Errors
    ///
    /// Returns `RouterError::Load` if the records don't form a valid
    /// registry. The previous snapshot stays active.
    pub fn reload<I>(&self, records: I) -> Result<usize>
    where
        I: IntoIterator<Item = SkillRecord>,
    {
        let registry = SkillRegistry::from_records(records).inspect_err(|error| {
            tracing::warn!(error = %error, "rejected skill registry reload");
        })?;
        Ok(self.install(registry))
    }

    /// Load records through `loader` and swap in a new snapshot.
    ///
    /// # Errors
    ///
    /// Returns `RouterError::Load` on any read, parse or validation error.
    /// The previous snapshot stays active.
    pub async fn reload_from(&self, loader: &SkillLoader) -> Result<usize> {
        let registry = loader.load_registry().await.inspect_err(|error| {
            tracing::warn!(error = %error, paths = ?loader.paths(), "rejected skill registry reload");
        })?;
        Ok(self.install(registry))
    }

    /// Swap in an already validated registry.
    pub fn install(&self, registry: SkillRegistry) -> usize {
        let snapshot = Arc::new(RouterSnapshot::new(registry));
        let skills = snapshot.registry().len();
        let triggers = snapshot.index().len();

        *self.current.write() = Some(snapshot);

        tracing::info!(skills, triggers, "skill registry loaded");
        skills
    }

    /// Route a request against the current snapshot.
    ///
    /// Never fails: an unloaded router, an empty query or no matches all
    /// produce an empty response.
    #[must_use]
    pub fn route(&self, request: &RouteRequest) -> RankedResponse {
        let Some(snapshot) = self.snapshot() else {
            tracing::debug!("routing before any registry was loaded");
            return RankedResponse::default();
        };

        let selector = Selector::new()
            .with_limit(request.limit.or(self.config.default_limit))
            .threshold(request.threshold.unwrap_or(self.config.default_threshold))
            .with_explicit_override(request.explicit_skill.clone());

        snapshot.route(&request.query, &self.scorer, &selector)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{OVERRIDE_SCORE, RouterError};
    use futures_lite::future::block_on;
    use skill_router_skills::SkillError;

    fn records() -> Vec<SkillRecord> {
        vec![
            SkillRecord::new("auth", "Authentication with JWT").with_triggers(["jwt", "token", "auth"]),
            SkillRecord::new("cache", "Caching layers").with_triggers(["redis", "cache", "ttl"]),
        ]
    }

    #[test]
    fn unloaded_router_returns_empty() {
        let router = SkillRouter::default();
        assert!(!router.is_loaded());
        assert!(router.snapshot().is_none());
        assert!(router.route(&RouteRequest::new("jwt")).is_empty());
    }

    #[test]
    fn routes_after_load() {
        let router = SkillRouter::with_records(RouterConfig::default(), records()).unwrap();
        let response = router.route(&RouteRequest::new("how do I expire a jwt token").limit(1));

        assert_eq!(response.len(), 1);
        let best = response.best().unwrap();
        assert_eq!(best.skill_id, "auth");
        assert!(best.score >= 6.0);
        assert_eq!(best.matched_triggers, vec!["jwt", "token"]);
    }

    #[test]
    fn config_defaults_apply_to_requests() {
        let config = RouterConfig::builder()
            .default_limit(Some(1))
            .default_threshold(4.0)
            .build();
        let router = SkillRouter::with_records(config, records()).unwrap();

        assert!(router.route(&RouteRequest::new("redis")).is_empty());
        assert_eq!(router.route(&RouteRequest::new("redis").threshold(0.0)).len(), 1);
        assert_eq!(router.route(&RouteRequest::new("jwt redis").threshold(0.0)).len(), 1);
        assert_eq!(
            router
                .route(&RouteRequest::new("jwt redis").threshold(0.0).limit(5))
                .len(),
            2
        );
    }

    #[test]
    fn explicit_skill_overrides_scores() {
        let router = SkillRouter::with_records(RouterConfig::default(), records()).unwrap();
        let response = router.route(&RouteRequest::new("jwt token auth").explicit_skill("cache"));

        assert_eq!(response.len(), 1);
        assert_eq!(response.best().unwrap().skill_id, "cache");
        assert_eq!(response.best().unwrap().score, OVERRIDE_SCORE);
    }

    #[test]
    fn failed_reload_keeps_previous_snapshot() {
        let router = SkillRouter::with_records(RouterConfig::default(), records()).unwrap();
        let before = router.snapshot().unwrap();

        let mut bad = records();
        bad.push(SkillRecord {
            id: Some("broken".to_string()),
            ..SkillRecord::default()
        });
        let result = router.reload(bad);

        assert!(matches!(
            result,
            Err(RouterError::Load(SkillError::MalformedDescriptor { .. }))
        ));
        assert!(Arc::ptr_eq(&before, &router.snapshot().unwrap()));
        assert_eq!(router.route(&RouteRequest::new("redis")).best().unwrap().skill_id, "cache");
    }

    #[test]
    fn reload_replaces_snapshot_but_not_held_ones() {
        let router = SkillRouter::with_records(RouterConfig::default(), records()).unwrap();
        let held = router.snapshot().unwrap();

        let count = router
            .reload([SkillRecord::new("deploy", "Shipping").with_triggers(["docker"])])
            .unwrap();

        assert_eq!(count, 1);
        assert!(router.route(&RouteRequest::new("jwt")).is_empty());
        assert_eq!(router.route(&RouteRequest::new("docker")).len(), 1);
        // In-flight readers keep the snapshot they started with.
        assert!(held.registry().contains("auth"));
    }

    #[test]
    fn reload_from_loader() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("skills.yaml"),
            "- id: auth\n  description: Auth\n  triggers: [jwt]\n",
        )
        .unwrap();

        let router = SkillRouter::default();
        let loader = SkillLoader::new().add_path(dir.path());
        assert_eq!(block_on(router.reload_from(&loader)).unwrap(), 1);

        std::fs::write(dir.path().join("broken.yaml"), "- id: [").unwrap();
        assert!(block_on(router.reload_from(&loader)).is_err());
        assert!(router.snapshot().unwrap().registry().contains("auth"));
    }

    #[test]
    fn concurrent_queries_during_reload() {
        let router = Arc::new(SkillRouter::with_records(RouterConfig::default(), records()).unwrap());

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let router = Arc::clone(&router);
                std::thread::spawn(move || {
                    for _ in 0..200 {
                        let response = router.route(&RouteRequest::new("jwt docker"));
                        // Either the old or the new registry, never a mix.
                        let ids: Vec<_> =
                            response.matches().iter().map(|m| m.skill_id.clone()).collect();
                        assert!(ids == vec!["auth"] || ids == vec!["deploy"], "{ids:?}");
                    }
                })
            })
            .collect();

        for round in 0..50 {
            let next = if round % 2 == 0 {
                vec![SkillRecord::new("deploy", "Shipping").with_triggers(["docker"])]
            } else {
                records()
            };
            router.reload(next).unwrap();
        }

        for reader in readers {
            reader.join().unwrap();
        }
    }
}
