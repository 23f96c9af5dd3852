//! Skill descriptors and registry loading.
//!
//! Skills are topic-tagged guidance documents. This crate only deals with
//! their metadata: the id, description and trigger keywords a router needs
//! to decide which skill fits a request. The guidance text itself is never
//! read.
//!
//! # Record Format
//!
//! ```yaml
//! - id: auth                          # required, unique
//!   displayName: Authentication       # optional, defaults to id
//!   description: JWT and sessions     # required
//!   triggers: [jwt, token, auth]      # required, may be empty
//!   relatedSkillIds: [security]       # optional
//!   priority: 1                       # optional, default 0
//! ```
//!
//! Records can also live in the YAML frontmatter of `<skill>/SKILL.md`
//! files, where `name` stands in for `id`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use skill_router_skills::SkillLoader;
//!
//! let registry = SkillLoader::new()
//!     .add_path("~/.claude/skills")
//!     .load_registry()
//!     .await?;
//!
//! if let Some(skill) = registry.get("auth") {
//!     println!("{}: {}", skill.display_name, skill.description);
//! }
//! ```

mod error;
mod loader;
mod registry;
mod skill;

pub use error::SkillError;
pub use loader::SkillLoader;
pub use registry::SkillRegistry;
pub use skill::{SkillDescriptor, SkillRecord};
