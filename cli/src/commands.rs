//! Command implementations and exit code mapping.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, anyhow};
use futures_lite::future::block_on;
use skill_router_core::{OutputFormat, RouteRequest, RouterConfig, SkillRouter, emit};
use skill_router_skills::{SkillLoader, SkillRegistry};

use crate::{Args, Command, MatchArgs};

/// Why a command failed, mapped to the process exit code.
#[derive(Debug)]
pub enum Failure {
    /// Arguments parsed but make no sense.
    Usage(anyhow::Error),
    /// The registry or configuration could not be loaded.
    Startup(anyhow::Error),
    /// Anything else, such as a closed stdout.
    Other(anyhow::Error),
}

impl Failure {
    pub const fn error(&self) -> &anyhow::Error {
        match self {
            Self::Usage(error) | Self::Startup(error) | Self::Other(error) => error,
        }
    }

    pub fn exit_code(&self) -> ExitCode {
        match self {
            Self::Usage(_) => ExitCode::from(2),
            Self::Startup(_) => ExitCode::from(3),
            Self::Other(_) => ExitCode::FAILURE,
        }
    }
}

pub fn run(args: &Args) -> Result<(), Failure> {
    if let Command::Match(match_args) = &args.command {
        validate_match_args(match_args).map_err(Failure::Usage)?;
    }

    let config = load_config(args.config.as_deref()).map_err(Failure::Startup)?;
    let (router, source) = load_router(config, args.registry.as_deref()).map_err(Failure::Startup)?;

    let mut stdout = io::stdout().lock();
    match &args.command {
        Command::Match(match_args) => run_match(&router, match_args, &mut stdout),
        Command::List { json } => run_list(&router, *json, &mut stdout),
        Command::Validate => run_validate(&router, &source, &mut stdout),
    }
    .map_err(Failure::Other)
}

fn validate_match_args(args: &MatchArgs) -> anyhow::Result<()> {
    if args
        .query
        .chars()
        .any(|c| c.is_control() && !c.is_whitespace())
    {
        return Err(anyhow!("query contains control characters"));
    }
    if args.limit == Some(0) {
        return Err(anyhow!("--limit must be at least 1"));
    }
    if let Some(threshold) = args.threshold {
        if !threshold.is_finite() || threshold < 0.0 {
            return Err(anyhow!("--threshold must be a finite non-negative number, got {threshold}"));
        }
    }
    if args.skill.as_deref().is_some_and(|id| id.trim().is_empty()) {
        return Err(anyhow!("--skill must not be blank"));
    }
    Ok(())
}

fn load_config(path: Option<&Path>) -> anyhow::Result<RouterConfig> {
    let Some(path) = path else {
        return Ok(RouterConfig::default());
    };
    let path = expand_tilde(path);
    let config = RouterConfig::from_toml_file(&path)?;
    tracing::debug!(path = %path.display(), ?config, "loaded router config");
    Ok(config)
}

fn load_router(config: RouterConfig, registry: Option<&Path>) -> anyhow::Result<(SkillRouter, PathBuf)> {
    let path = registry
        .map(expand_tilde)
        .context("no skill registry configured; pass --registry or set SKILL_REGISTRY_PATH")?;

    if !path.exists() {
        return Err(anyhow!("skill registry not found at {}", path.display()));
    }

    let router = SkillRouter::new(config);
    let loader = SkillLoader::new().add_path(&path);
    block_on(router.reload_from(&loader))
        .with_context(|| format!("failed to load skill registry from {}", path.display()))?;

    Ok((router, path))
}

fn run_match(router: &SkillRouter, args: &MatchArgs, out: &mut impl Write) -> anyhow::Result<()> {
    let mut request = RouteRequest::new(args.query.as_str());
    if let Some(limit) = args.limit {
        request = request.limit(limit);
    }
    if let Some(threshold) = args.threshold {
        request = request.threshold(threshold);
    }
    if let Some(skill) = &args.skill {
        request = request.explicit_skill(skill.trim());
    }

    let response = router.route(&request);
    let format = if args.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };

    let snapshot = router.snapshot();
    let registry = snapshot.as_ref().map(|s| s.registry());
    let rendered = emit(&response, format, registry);

    out.write_all(rendered.as_bytes())?;
    if !rendered.ends_with('\n') {
        writeln!(out)?;
    }
    Ok(())
}

fn run_list(router: &SkillRouter, json: bool, out: &mut impl Write) -> anyhow::Result<()> {
    let snapshot = router.snapshot().context("skill registry is not loaded")?;
    let registry = snapshot.registry();

    if json {
        let rendered = serde_json::to_string_pretty(&registry.sorted())?;
        writeln!(out, "{rendered}")?;
    } else {
        write_listing(registry, out)?;
    }
    Ok(())
}

fn write_listing(registry: &SkillRegistry, out: &mut impl Write) -> io::Result<()> {
    for skill in registry.sorted() {
        write!(out, "{}", skill.id)?;
        if skill.display_name != skill.id {
            write!(out, " ({})", skill.display_name)?;
        }
        if skill.priority != 0 {
            write!(out, " priority={}", skill.priority)?;
        }
        writeln!(out)?;

        let mut triggers = skill.triggers.clone();
        triggers.sort_unstable_by_key(|t| t.to_lowercase());
        writeln!(out, "  triggers: {}", triggers.join(", "))?;
        if !skill.related_skill_ids.is_empty() {
            writeln!(out, "  related: {}", skill.related_skill_ids.join(", "))?;
        }
    }
    Ok(())
}

fn run_validate(router: &SkillRouter, source: &Path, out: &mut impl Write) -> anyhow::Result<()> {
    let snapshot = router.snapshot().context("skill registry is not loaded")?;
    writeln!(
        out,
        "ok: {} skills, {} triggers loaded from {}",
        snapshot.registry().len(),
        snapshot.index().len(),
        source.display()
    )?;
    Ok(())
}

/// Expand ~ to home directory in a path.
fn expand_tilde(path: &Path) -> PathBuf {
    if let Ok(stripped) = path.strip_prefix("~") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    path.to_path_buf()
}
