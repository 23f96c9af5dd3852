//! Command-line front end for the skill router.
//!
//! Loads a skill registry and ranks skills for a free-text request.
//!
//! # Usage
//!
//! ```bash
//! # Rank skills for a query (registry from the environment)
//! SKILL_REGISTRY_PATH=~/.claude/skills skill-router match "how do I expire a jwt token"
//!
//! # Top three as JSON, with a custom scoring config
//! skill-router --registry skills.yaml --config router.toml match "redis ttl" --limit 3 --json
//!
//! # Explicitly pick a skill
//! skill-router --registry skills/ match "anything" --skill auth
//!
//! # Inspect the registry
//! skill-router --registry skills/ list
//! skill-router --registry skills/ validate
//! ```
//!
//! Exit codes: `0` on success (including no matches), `2` for invalid
//! arguments, `3` when the registry or configuration fails to load.

mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::commands::Failure;

/// Route natural-language requests to skills.
#[derive(Parser, Debug)]
#[command(name = "skill-router", version, about)]
struct Args {
    /// Skill registry: a records file, or a directory of record files and skill folders.
    #[arg(long, global = true, env = "SKILL_REGISTRY_PATH")]
    registry: Option<PathBuf>,

    /// Router configuration file (TOML) with scoring weights and defaults.
    #[arg(long, global = true, env = "SKILL_ROUTER_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Rank the skills that fit a query.
    Match(MatchArgs),

    /// List every registered skill.
    List {
        /// Print the descriptors as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Load the registry and report whether it is valid.
    Validate,
}

#[derive(clap::Args, Debug)]
struct MatchArgs {
    /// Free-text request to route.
    query: String,

    /// Maximum number of skills to return.
    #[arg(short, long)]
    limit: Option<usize>,

    /// Minimum score a skill needs to be returned.
    #[arg(short, long)]
    threshold: Option<f64>,

    /// Return this skill regardless of scores, if it exists.
    #[arg(long = "skill", value_name = "ID")]
    skill: Option<String>,

    /// Print structured JSON instead of a ranked list.
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    match commands::run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(failure) => {
            eprintln!("error: {:#}", failure.error());
            failure.exit_code()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_match_flags() {
        let args = Args::try_parse_from([
            "skill-router",
            "--registry",
            "skills.yaml",
            "match",
            "how do I expire a jwt token",
            "--limit",
            "3",
            "--threshold",
            "1.5",
            "--skill",
            "auth",
            "--json",
        ])
        .unwrap();

        assert_eq!(args.registry, Some(PathBuf::from("skills.yaml")));
        let Command::Match(m) = args.command else {
            panic!("expected match command");
        };
        assert_eq!(m.query, "how do I expire a jwt token");
        assert_eq!(m.limit, Some(3));
        assert_eq!(m.threshold, Some(1.5));
        assert_eq!(m.skill.as_deref(), Some("auth"));
        assert!(m.json);
    }

    #[test]
    fn global_flags_after_subcommand() {
        let args =
            Args::try_parse_from(["skill-router", "list", "--registry", "dir", "--json"]).unwrap();
        assert_eq!(args.registry, Some(PathBuf::from("dir")));
        assert!(matches!(args.command, Command::List { json: true }));
    }

    #[test]
    fn bad_flags_are_usage_errors() {
        let err = Args::try_parse_from(["skill-router", "match", "q", "--limit", "many"]).unwrap_err();
        assert_eq!(err.exit_code(), 2);

        let err = Args::try_parse_from(["skill-router", "match"]).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
