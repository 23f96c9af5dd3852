//! Rendering ranked responses for callers.

use std::fmt::Write as _;

use serde_json::{Value, json};
use skill_router_skills::SkillRegistry;

use crate::{OVERRIDE_SCORE, RankedResponse};

/// Output format of [`emit`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable ranked list.
    #[default]
    Text,
    /// Pretty-printed JSON array.
    Json,
}

/// Render a response in the requested format. Never fails.
#[must_use]
pub fn emit(response: &RankedResponse, format: OutputFormat, registry: Option<&SkillRegistry>) -> String {
    match format {
        OutputFormat::Text => render_text(response, registry),
        OutputFormat::Json => format!("{:#}", to_json(response)),
    }
}

/// Structured form: an array of `{skillId, score, matchedTriggers}`.
#[must_use]
pub fn to_json(response: &RankedResponse) -> Value {
    Value::Array(
        response
            .matches()
            .iter()
            .map(|m| {
                json!({
                    "skillId": m.skill_id,
                    "score": m.score,
                    "matchedTriggers": m.matched_triggers,
                })
            })
            .collect(),
    )
}

/// One numbered line per match. Display names are shown when a registry is given.
#[must_use]
pub fn render_text(response: &RankedResponse, registry: Option<&SkillRegistry>) -> String {
    if response.is_empty() {
        return "no matching skills\n".to_string();
    }

    let mut out = String::new();
    for (rank, m) in response.matches().iter().enumerate() {
        let _ = write!(out, "{}. {}", rank + 1, m.skill_id);

        if let Some(skill) = registry.and_then(|r| r.get(&m.skill_id)) {
            if skill.display_name != skill.id {
                let _ = write!(out, " ({})", skill.display_name);
            }
        }

        if m.score >= OVERRIDE_SCORE {
            out.push_str(" score=explicit");
        } else {
            let _ = write!(out, " score={:.2}", m.score);
        }

        if !m.matched_triggers.is_empty() {
            let _ = write!(out, " [{}]", m.matched_triggers.join(", "));
        }
        out.push('\n');
    }
    out
}
