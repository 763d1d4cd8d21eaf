use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// How results are printed.
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Pretty-printed JSON, errors as `{"error": "..."}`.
    #[default]
    Json,
    /// Condensed human-readable summary.
    Text,
}

/// Command-line interface for `scout`.
#[derive(Debug, Parser)]
#[command(name = "scout", about = "Counter builds and duo synergy for Predecessor", version)]
pub struct Cli {
    /// Dataset directory holding items.json, hero-profiles.json and friends.
    #[arg(long, global = true, env = "SCOUT_DATA_DIR", value_name = "DIR")]
    pub data: Option<PathBuf>,
    /// Engine config file (defaults to `~/.scout/config.toml` when present).
    #[arg(long, global = true, env = "SCOUT_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,
    #[command(subcommand)]
    pub command: Commands,
}

/// Available `scout` commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Builds your hero to counter one enemy.
    Counter {
        /// Your hero slug.
        hero: String,
        /// Enemy hero slug.
        enemy: String,
        /// Role to read your statistics from (falls back when inactive).
        #[arg(long)]
        role: Option<String>,
    },
    /// Builds two allies against an enemy lane.
    Duo {
        /// Ally as `slug` or `slug:role` (repeatable).
        #[arg(long = "ally", value_name = "SLUG[:ROLE]", required = true)]
        allies: Vec<String>,
        /// Enemy hero slug (repeatable).
        #[arg(long = "enemy", value_name = "SLUG")]
        enemies: Vec<String>,
    },
    /// Shows how an enemy builds and how to answer each variant.
    Hero {
        /// Enemy hero slug.
        enemy: String,
    },
    /// Ranks lane partners for a hero by kit synergy.
    Duos {
        hero: String,
        #[arg(long, default_value_t = 5)]
        count: usize,
    },
    /// Profiles an item build.
    Analyze {
        /// Item names (comma-separated or repeated).
        #[arg(required = true, value_delimiter = ',')]
        items: Vec<String>,
        /// Hero whose damage type the build belongs to.
        #[arg(long)]
        hero: Option<String>,
    },
    /// Scores one pair of heroes by kit.
    Synergy {
        first: String,
        second: String,
    },
    /// Ability tips against a hero, optionally from a specific attacker.
    Tips {
        /// The hero you are playing against.
        enemy: String,
        /// Your hero; enables attacker-specific tips.
        #[arg(long = "as", value_name = "HERO")]
        attacker: Option<String>,
    },
    /// Ability combos for a hero.
    Combo {
        hero: String,
        /// Ability rank used for cooldowns and costs.
        #[arg(long, default_value_t = scout_engine::DEFAULT_RANK)]
        rank: usize,
    },
    /// Compares a baseline build with a counter build.
    Diff {
        /// Baseline item names.
        #[arg(long, required = true, value_delimiter = ',')]
        baseline: Vec<String>,
        /// Counter item names.
        #[arg(long, required = true, value_delimiter = ',')]
        counter: Vec<String>,
        /// Enemy whose best build explains the swaps.
        #[arg(long)]
        enemy: Option<String>,
    },
}
