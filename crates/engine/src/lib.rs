//! Counter-build and duo-synergy recommendations.
//!
//! This crate turns a [`KnowledgeBase`](scout_catalog::KnowledgeBase) and
//! scraped hero statistics into recommendations:
//! - Threat profiles for arbitrary item builds ([`analyze`])
//! - Solo counter builds against one enemy, with meta diffs ([`matchup`])
//! - Hero-agnostic counter routes per enemy build variant ([`matchup`])
//! - Coordinated two-versus-two lane builds ([`duo`])
//! - Kit-based duo synergy, ability matchup tips and combos
//!   ([`synergy`], [`interactions`], [`combo`])
//!
//! Every operation is a pure function of the [`Engine`] and its inputs.

#![deny(unsafe_code)]

pub mod analyze;
pub mod combo;
pub mod config;
pub mod context;
pub mod diff;
pub mod duo;
pub mod error;
pub mod explain;
pub mod interactions;
pub mod matchup;
pub mod stats;
pub mod synergy;
pub mod synthesize;

pub use analyze::{analyze_build, LaneThreats, Threat, ThreatProfile, Thresholds, Weakness};
pub use combo::{HeroCombo, DEFAULT_RANK};
pub use config::{load_config, ConfigError, EngineConfig, SynthesisConfig};
pub use context::Engine;
pub use diff::{meta_diff, MetaDiff, Swap};
pub use duo::{Ally, AllyBuild, DuoCounterBuild};
pub use error::{EngineError, Response};
pub use interactions::{AbilityTip, InteractionProfile, TipCategory, TipKind};
pub use matchup::{CounterBuildPath, CounterHeroAnalysis, CounterVariant};
pub use stats::{highest_win_rate_build, BestBuild};
pub use synergy::{DuoAnalysis, DuoPartner, SynergyScore};
pub use synthesize::{CounterPick, CounterRoute};
