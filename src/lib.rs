//! # skill-router
//!
//! Facade crate that re-exports the router from [`skill_router_core`] and the
//! registry types from [`skill_router_skills`]. Pull this crate into a host
//! tool to decide which guidance documents ("skills") fit a user's request.
//!
//! ## What's inside?
//!
//! - [`SkillLoader`] and [`SkillRegistry`] to discover and validate skill descriptors.
//! - [`SkillRouter`] to rank skills for a query against a reloadable registry.
//! - [`emit`] to render a [`RankedResponse`] as text or JSON.
//!
//! ## Example
//!
//! ```rust
//! use skill_router::{RouteRequest, RouterConfig, SkillRecord, SkillRouter};
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
//! let response = router.route(&RouteRequest::new("how do I expire a jwt token").limit(1));
//! match response.best() {
//!     Some(best) => println!("use {} ({:?})", best.skill_id, best.matched_triggers),
//!     None => println!("no confident match, fall back to a general skill"),
//! }
//! ```
//!
//! ## Modules
//!
//! - [`skills`]: descriptor records, validation, filesystem discovery.
//! - [`skill_router_core`]: index, normalization, scoring, selection, output.

pub use skill_router_core::*;
pub use skill_router_skills as skills;
pub use skill_router_skills::{SkillDescriptor, SkillError, SkillLoader, SkillRecord, SkillRegistry};
