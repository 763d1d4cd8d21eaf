//! One-versus-one counter builds and hero-agnostic counter analysis.

use crate::analyze::{Threat, ThreatProfile, Weakness};
use crate::context::Engine;
use crate::diff::{meta_diff, MetaDiff};
use crate::error::EngineError;
use crate::explain;
use crate::interactions::AbilityTip;
use crate::stats::{
    highest_win_rate_build, lookup_counter_data, proven_items, resolve_role, scraped_counter_build,
    top_augment_above, BestBuild, CounterData, RoleResolution, ScrapedCounterBuild,
};
use crate::synthesize::{
    alt_crests, also_consider, best_crest_name, build_name, counter_path, counter_routes, fill_full_build,
    pick_augment, rank_crests, AlsoConsider, AltCrest, AugmentChoice, CounterPick, CounterRoute, PathContext,
};
use scout_catalog::{DamageType, HeroDataMap, HeroStats, StatLine};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

pub const AGGRESSIVE_LABEL: &str = "Aggressive: highest WR build, use when winning";
pub const COUNTER_LABEL: &str = "Counter: matchup-specific, use against this enemy";

/// Enemy augment warnings kept by [`Engine::counter_hero_analysis`].
const MAX_AUGMENT_WARNINGS: usize = 3;

// ============================================================================
// Output types
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroSummary {
    pub name: String,
    pub slug: String,
    pub role: Option<String>,
    pub damage_type: DamageType,
}

/// A recorded build as shown to the user, win rate formatted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildSummary {
    pub name: String,
    pub items: Vec<String>,
    pub win_rate: String,
    pub matches: u32,
}

impl BuildSummary {
    pub(crate) fn new(build: &BestBuild, items: Vec<String>) -> Self {
        Self {
            name: build.name.clone(),
            items,
            win_rate: explain::percent(build.win_rate),
            matches: build.matches,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnemySummary {
    pub name: String,
    pub slug: String,
    pub meta_build: BuildSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggressiveBuild {
    pub name: String,
    /// Core items extended to a full build.
    pub items: Vec<String>,
    pub core_items: Vec<String>,
    pub win_rate: String,
    pub matches: u32,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CounterBuild {
    pub name: String,
    pub items: Vec<String>,
    pub core_items: Vec<String>,
    pub crest: String,
    pub augment: AugmentChoice,
    pub path: Vec<CounterPick>,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AugmentWarning {
    pub name: String,
    pub win_rate: String,
    pub matches: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl AugmentWarning {
    fn from_line(line: &StatLine) -> Self {
        Self {
            name: line.name.trim().to_string(),
            win_rate: explain::percent(line.win_rate.0),
            matches: line.matches.0,
            note: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnemyBuildAnalysis {
    pub threats: Vec<Threat>,
    pub weaknesses: Vec<Weakness>,
    pub has_sustain: bool,
    pub has_crit: bool,
    pub has_on_hit: bool,
}

impl From<&ThreatProfile> for EnemyBuildAnalysis {
    fn from(p: &ThreatProfile) -> Self {
        Self {
            threats: p.threats.clone(),
            weaknesses: p.weaknesses.clone(),
            has_sustain: p.has_sustain,
            has_crit: p.has_crit,
            has_on_hit: p.has_on_hit,
        }
    }
}

/// Everything needed to play one hero into one enemy.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CounterBuildPath {
    pub your_hero: HeroSummary,
    pub role_info: RoleResolution,
    pub counter_data: CounterData,
    /// Your best build, when your record against this enemy is deep enough.
    pub scraped_counter_build: Option<ScrapedCounterBuild>,
    pub vs_enemy: EnemySummary,
    pub aggressive_build: Option<AggressiveBuild>,
    pub counter_build: CounterBuild,
    pub meta_build: Option<BuildSummary>,
    pub meta_diff: Option<MetaDiff>,
    pub also_consider: Vec<AlsoConsider>,
    pub alt_crests: Vec<AltCrest>,
    pub enemy_augment_warnings: Vec<AugmentWarning>,
    pub enemy_build_analysis: EnemyBuildAnalysis,
    pub tips: Vec<String>,
    pub ability_tips: Vec<AbilityTip>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnemyProfileSummary {
    pub name: String,
    pub slug: String,
    pub damage_type: DamageType,
    pub classes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantBuild {
    pub name: String,
    pub role: String,
    pub items: Vec<String>,
    pub win_rate: String,
    pub matches: u32,
}

/// One way the enemy builds, and how to answer it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CounterVariant {
    pub build: VariantBuild,
    pub dangers: Vec<String>,
    pub exploits: Vec<String>,
    pub counter_routes: Vec<CounterRoute>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CounterHeroAnalysis {
    pub enemy: EnemyProfileSummary,
    pub variants: Vec<CounterVariant>,
    pub augment_warnings: Vec<AugmentWarning>,
    pub ability_tips: Vec<AbilityTip>,
}

// ============================================================================
// Build variants
// ============================================================================

struct Variant<'a> {
    role: &'a str,
    name: &'a str,
    items: &'a [String],
    win_rate: f64,
    matches: u32,
    augments: &'a [StatLine],
}

/// Every recorded build across roles with at least `min_matches`, one per
/// distinct item set. Builds with `confident_matches` sort first, then by
/// win rate.
fn build_variants(data: &HeroStats, min_matches: u32, confident_matches: u32) -> Vec<Variant<'_>> {
    let mut seen: BTreeSet<Vec<&str>> = BTreeSet::new();
    let mut variants = Vec::new();
    for (role, rd) in &data.roles {
        for tab in &rd.build_tabs {
            if tab.matches.0 < min_matches {
                continue;
            }
            let mut key: Vec<&str> = tab.items.iter().map(String::as_str).collect();
            key.sort_unstable();
            if !seen.insert(key) {
                continue;
            }
            variants.push(Variant {
                role,
                name: &tab.name,
                items: &tab.items,
                win_rate: tab.win_rate.0,
                matches: tab.matches.0,
                augments: &rd.augments,
            });
        }
    }
    variants.sort_by(|a, b| {
        let confident = |v: &Variant<'_>| v.matches >= confident_matches;
        confident(b)
            .cmp(&confident(a))
            .then(b.win_rate.total_cmp(&a.win_rate))
    });
    variants
}

// ============================================================================
// Operations
// ============================================================================

impl Engine {
    /// Builds a counter path for `your_slug` into `enemy_slug`'s best build,
    /// next to your own highest-win-rate build and the edits between them.
    pub fn counter_build_path(
        &self,
        your_slug: &str,
        role: Option<&str>,
        enemy_slug: &str,
        data: &HeroDataMap,
    ) -> Result<CounterBuildPath, EngineError> {
        let your = self
            .profile(your_slug)
            .ok_or_else(|| EngineError::HeroNotFound(your_slug.to_string()))?;
        let enemy = self
            .profile(enemy_slug)
            .ok_or_else(|| EngineError::EnemyNotFound(enemy_slug.to_string()))?;
        let syn = &self.config().synthesis;

        let your_data = data.get(your_slug);
        let enemy_data = data.get(enemy_slug);
        let role_info = resolve_role(your_data, &your.name, role);
        let effective_role: Option<String> = role_info.valid_role.clone().or_else(|| role.map(str::to_string));
        let effective_role = effective_role.as_deref();
        let counter_data = lookup_counter_data(your_data, enemy_data, &your.name, &enemy.name, effective_role);

        let enemy_build = enemy_data
            .and_then(|d| highest_win_rate_build(d, None, syn.min_build_matches))
            .ok_or_else(|| EngineError::NoBuildData(enemy.name.clone()))?;
        let threats = self.analyze_build(&enemy_build.items, Some(enemy_slug));

        let proven = proven_items(your_data, effective_role);
        let role_stats = proven.role_stats();
        let ctx = PathContext {
            hero: your,
            threats: &threats,
            proven: &proven,
            proven_win_rate: syn.proven_win_rate,
        };

        let candidates = self.index().completed_items();
        let core = counter_path(&candidates, &ctx, syn.core_slots);
        let crests = rank_crests(&self.index().completed_crests(), &ctx);

        let no_slots = BTreeMap::new();
        let item_slots = role_stats.map_or(&no_slots, |rd| &rd.item_slots);

        let aggressive = your_data
            .and_then(|d| highest_win_rate_build(d, effective_role, syn.min_build_matches))
            .map(|b| {
                let full = fill_full_build(&b.items, item_slots, self.index(), None);
                (b, full)
            });
        let meta_build = aggressive
            .as_ref()
            .map(|(b, full)| BuildSummary::new(b, full.clone()));

        let core_items = core.names();
        let counter_full = fill_full_build(&core_items, item_slots, self.index(), Some(&threats));
        let diff = meta_build
            .as_ref()
            .map(|m| meta_diff(&m.items, &counter_full, self.index(), &threats, &enemy.name));

        let path = core
            .picks
            .iter()
            .map(|p| {
                let reasons = explain::path_reasons(p.item, your, &enemy.name, &threats, &proven, syn.proven_win_rate);
                CounterPick::new(p, reasons)
            })
            .collect();

        let enemy_augment_warnings = top_augment_above(&enemy_build.augments, syn.augment_warning_win_rate)
            .map(|a| {
                let mut warning = AugmentWarning::from_line(a);
                warning.note = Some(format!("Enemy likely runs {} ({} WR)", warning.name, warning.win_rate));
                warning
            })
            .into_iter()
            .collect();

        tracing::debug!(
            target: "scout::matchup",
            hero = your_slug,
            enemy = enemy_slug,
            role = ?effective_role,
            core = ?core_items,
            "Synthesized counter build"
        );

        Ok(CounterBuildPath {
            your_hero: HeroSummary {
                name: your.name.clone(),
                slug: your_slug.to_string(),
                role: effective_role.map(str::to_string),
                damage_type: your.damage_type,
            },
            scraped_counter_build: your_data.and_then(|d| {
                scraped_counter_build(
                    d,
                    effective_role,
                    &enemy.name,
                    syn.counter_data_min_matches,
                    syn.min_build_matches,
                )
            }),
            role_info,
            counter_data,
            vs_enemy: EnemySummary {
                name: enemy.name.clone(),
                slug: enemy_slug.to_string(),
                meta_build: BuildSummary::new(&enemy_build, enemy_build.items.clone()),
            },
            aggressive_build: aggressive.map(|(b, full)| AggressiveBuild {
                name: b.name.clone(),
                items: full,
                core_items: b.items.clone(),
                win_rate: explain::percent(b.win_rate),
                matches: b.matches,
                label: AGGRESSIVE_LABEL.to_string(),
            }),
            counter_build: CounterBuild {
                name: build_name(&core.items(), your.damage_type),
                items: counter_full,
                core_items,
                crest: best_crest_name(&crests),
                augment: pick_augment(role_stats, Some(&threats), your),
                path,
                label: COUNTER_LABEL.to_string(),
            },
            meta_build,
            meta_diff: diff,
            also_consider: also_consider(&candidates, &ctx, &core.state, syn.also_consider_count),
            alt_crests: alt_crests(&crests, syn.alt_crest_count),
            enemy_augment_warnings,
            enemy_build_analysis: EnemyBuildAnalysis::from(&threats),
            tips: explain::matchup_tips(&threats, your, &enemy.name),
            ability_tips: self.ability_tips(your_slug, enemy_slug).unwrap_or_default(),
        })
    }

    /// How to play against `enemy_slug` without picking a hero: its main
    /// build variants, what each threatens and general counter routes.
    pub fn counter_hero_analysis(&self, enemy_slug: &str, data: &HeroDataMap) -> Result<CounterHeroAnalysis, EngineError> {
        let enemy = self
            .profile(enemy_slug)
            .ok_or_else(|| EngineError::HeroNotFound(enemy_slug.to_string()))?;
        let syn = &self.config().synthesis;
        let no_data = || EngineError::NoBuildData(enemy.name.clone());

        let enemy_data = data.get(enemy_slug).filter(|d| !d.roles.is_empty()).ok_or_else(no_data)?;
        let all = build_variants(enemy_data, syn.variant_min_matches, syn.confident_variant_matches);
        if all.is_empty() {
            return Err(no_data());
        }

        let candidates = self.index().completed_items();
        let variants: Vec<CounterVariant> = all
            .iter()
            .take(syn.max_variants)
            .map(|v| {
                let threats = self.analyze_build(v.items, Some(enemy_slug));
                CounterVariant {
                    build: VariantBuild {
                        name: v.name.to_string(),
                        role: v.role.to_string(),
                        items: v.items.to_vec(),
                        win_rate: explain::percent(v.win_rate),
                        matches: v.matches,
                    },
                    dangers: explain::dangers(&threats, &self.config().thresholds),
                    exploits: explain::exploits(&threats),
                    counter_routes: counter_routes(&candidates, &threats, syn.core_slots),
                }
            })
            .collect();

        let mut seen = BTreeSet::new();
        let mut warnings: Vec<(f64, AugmentWarning)> = Vec::new();
        for aug in all.iter().flat_map(|v| v.augments) {
            if !seen.insert(aug.name.as_str()) {
                continue;
            }
            if aug.win_rate.0 > syn.augment_warning_win_rate {
                warnings.push((aug.win_rate.0, AugmentWarning::from_line(aug)));
            }
        }
        warnings.sort_by(|a, b| b.0.total_cmp(&a.0));
        warnings.truncate(MAX_AUGMENT_WARNINGS);

        tracing::debug!(
            target: "scout::matchup",
            enemy = enemy_slug,
            variants = variants.len(),
            "Analyzed counter variants"
        );

        Ok(CounterHeroAnalysis {
            enemy: EnemyProfileSummary {
                name: enemy.name.clone(),
                slug: enemy_slug.to_string(),
                damage_type: enemy.damage_type,
                classes: enemy.classes.clone(),
            },
            variants,
            augment_warnings: warnings.into_iter().map(|(_, w)| w).collect(),
            ability_tips: self.defender_tips(enemy_slug),
        })
    }
}
