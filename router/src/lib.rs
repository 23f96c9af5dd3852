//! Keyword routing from free-text requests to skills.
//!
//! Given a [`SkillRegistry`](skill_router_skills::SkillRegistry), the router
//! decides which skills best fit a request:
//!
//! 1. [`TriggerIndex::build`] maps every normalized trigger to its skills.
//! 2. [`normalize`] turns the request into tokens.
//! 3. [`Scorer::score`] sums exact, partial and description signals per skill.
//! 4. [`Selector::select`] applies the threshold, ranks by score, priority
//!    and id, truncates to the limit, or short-circuits on an explicit override.
//! 5. [`emit`] renders the [`RankedResponse`] as text or JSON.
//!
//! [`SkillRouter`] wraps the pipeline around a registry snapshot that can be
//! reloaded while queries are running.
//!
//! ```rust
//! use skill_router_core::{OutputFormat, RouteRequest, RouterConfig, SkillRouter, emit};
//! use skill_router_skills::SkillRecord;
//!
//! let router = SkillRouter::with_records(
//!     RouterConfig::default(),
//!     [
//!         SkillRecord::new("auth", "JWT and sessions").with_triggers(["jwt", "token", "auth"]),
//!         SkillRecord::new("cache", "Redis caching").with_triggers(["redis", "cache", "ttl"]),
//!     ],
//! )
//! .unwrap();
//!
//! let response = router.route(&RouteRequest::new("how do I expire a jwt token").limit(3));
//! println!("{}", emit(&response, OutputFormat::Json, None));
//! ```

mod config;
mod emit;
mod error;
mod index;
mod normalize;
mod router;
mod score;
mod select;

pub use config::{RouterConfig, RouterConfigBuilder, ScoringWeights};
pub use emit::{OutputFormat, emit, render_text, to_json};
pub use error::{Result, RouterError};
pub use index::TriggerIndex;
pub use normalize::{Query, normalize, normalize_trigger};
pub use router::{RouteRequest, RouterSnapshot, SkillRouter};
pub use score::{MatchResult, Scorer};
pub use select::{OVERRIDE_SCORE, RankedResponse, Selector};
