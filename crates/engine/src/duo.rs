//! Two-versus-two lane builds.
//!
//! Both allies are built greedily against the union of the enemy threat
//! profiles. A shared [`PickState`] keeps them from buying the same item or
//! doubling up on lane-wide effects, and exactly one ally is chosen to carry
//! anti-heal when the enemy lane sustains.

use crate::analyze::{LaneThreats, Threat, ThreatProfile, Weakness};
use crate::context::Engine;
use crate::error::EngineError;
use crate::explain;
use crate::matchup::{BuildSummary, HeroSummary};
use crate::stats::{highest_win_rate_build, proven_items, top_augment_above, BestBuild, ProvenItems};
use crate::synergy::{analyze_duo, DuoAnalysis};
use crate::synthesize::{
    alt_crests, best_crest_name, build_name, choose, offense_score, pick_augment, proven_crest_score, proven_score,
    quality_score, rank, synergy_matches, synergy_weight, top_alternatives, AlsoConsider, AltCrest, AugmentChoice,
    CounterPick, PickState, Scored, COVERED_TAG, CREST_OFFENSE, CREST_SYNERGY, PATH_OFFENSE, PATH_PROVEN,
    STEROID_OVERLAP, SYNERGY_MATCH, WATCHED_TAGS,
};
use scout_catalog::{DamageType, EffectTag, HeroDataMap, HeroProfile, IndexedItem, ItemIndex, StatCategory};
use serde::{Deserialize, Serialize};

/// Classes that put a hero on the support side of a lane.
const SUPPORT_CLASSES: &[&str] = &["SUPPORT", "WARDEN", "TANK", "ENCHANTER", "CATCHER"];

/// Tags recorded for both allies once either buys them.
const SHARED_TAGS: &[EffectTag] = &[EffectTag::AntiHeal, EffectTag::Tenacity, EffectTag::Shield, EffectTag::Aura];
/// Shared tags whose second copy across the duo is penalized.
const SHARED_PENALIZED: &[EffectTag] = &[EffectTag::AntiHeal, EffectTag::Tenacity, EffectTag::Aura];

const ARMOR_VS_CRIT: f64 = 12.0;
const RESIST_VS_LANE: f64 = 10.0;
const PEN_VS_TANKY: f64 = 12.0;
const DEFENSE_VS_ON_HIT: f64 = 6.0;
const ANTI_HEAL_CARRIER: f64 = 35.0;
const ANTI_HEAL_OTHER: f64 = -20.0;
const SUPPORT_DEFENSE: f64 = 10.0;
const SUPPORT_UTILITY: f64 = 12.0;
const SUPPORT_CATEGORY: f64 = 15.0;
const CARRY_OFFENSE: f64 = 8.0;
const CARRY_PURE_DEFENSE: f64 = -5.0;
const SHARED_COVERED_TAG: f64 = -20.0;
const SUPPORT_CREST_UTILITY: f64 = 15.0;
/// The carrier's anti-heal pick must score above this to be forced.
const FORCED_ANTI_HEAL_FLOOR: f64 = -10.0;

// ============================================================================
// Input and output types
// ============================================================================

/// A hero on your side of the lane and the role they play.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ally {
    pub slug: String,
    #[serde(default)]
    pub role: Option<String>,
}

impl Ally {
    pub fn new(slug: &str, role: Option<&str>) -> Self {
        Self {
            slug: slug.to_string(),
            role: role.map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DuoBuild {
    pub name: String,
    pub items: Vec<String>,
    pub crest: String,
    pub augment: AugmentChoice,
    pub path: Vec<CounterPick>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AllyBuild {
    pub hero: HeroSummary,
    pub is_support: bool,
    pub build: DuoBuild,
    pub also_consider: Vec<AlsoConsider>,
    pub alt_crests: Vec<AltCrest>,
    pub responsibility: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnemyBreakdown {
    pub hero: String,
    pub meta_build: BuildSummary,
    pub threats: Vec<Threat>,
    pub weaknesses: Vec<Weakness>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DuoAugmentWarning {
    pub hero: String,
    pub augment: String,
    pub win_rate: String,
    pub matches: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DuoCounterBuild {
    pub allies: Vec<AllyBuild>,
    pub enemies: Vec<EnemyBreakdown>,
    pub lane_threats: LaneThreats,
    pub synergy_notes: Vec<String>,
    /// Kit synergy of the first two allies, when both have ability data.
    pub kit_synergy: Option<DuoAnalysis>,
    pub augment_warnings: Vec<DuoAugmentWarning>,
    pub tips: Vec<String>,
}

// ============================================================================
// Scoring
// ============================================================================

struct Enemy<'a> {
    profile: &'a HeroProfile,
    build: BestBuild,
    threats: ThreatProfile,
}

struct Assigned<'a> {
    ally: &'a Ally,
    profile: &'a HeroProfile,
    is_support: bool,
}

fn plays_support(ally: &Ally, profile: &HeroProfile) -> bool {
    ally.role.as_deref().is_some_and(|r| r.eq_ignore_ascii_case("support"))
        || profile
            .classes
            .iter()
            .any(|c| SUPPORT_CLASSES.contains(&c.to_uppercase().as_str()))
}

/// Whether a finished anti-heal item fits the support's damage type.
fn support_can_carry_anti_heal(index: &ItemIndex, support: &HeroProfile) -> bool {
    index
        .completed_items()
        .into_iter()
        .filter(|i| i.has_tag(EffectTag::AntiHeal))
        .any(|i| {
            let defense = i.in_category(StatCategory::Defense);
            match support.damage_type {
                DamageType::Physical => i.in_category(StatCategory::OffensePhysical) || defense,
                DamageType::Magical => i.in_category(StatCategory::OffenseMagical) || defense,
                DamageType::Hybrid => defense,
            }
        })
}

/// Slug of the ally who buys anti-heal: the support when an item suits them,
/// otherwise the first carry.
fn anti_heal_carrier<'a>(index: &ItemIndex, assigned: &[Assigned<'a>]) -> Option<&'a str> {
    let support = assigned.iter().find(|a| a.is_support);
    let carry = assigned.iter().find(|a| !a.is_support);
    match support {
        Some(s) if support_can_carry_anti_heal(index, s.profile) => Some(s.ally.slug.as_str()),
        _ => carry.map(|c| c.ally.slug.as_str()),
    }
}

struct AllyContext<'a> {
    hero: &'a HeroProfile,
    is_support: bool,
    carries_anti_heal: bool,
    lane: &'a LaneThreats,
    proven: &'a ProvenItems<'a>,
    proven_win_rate: f64,
}

fn score_for_ally(item: &IndexedItem, ctx: &AllyContext<'_>, local: &PickState, duo: &PickState) -> f64 {
    let lane = ctx.lane;
    let mut score = offense_score(ctx.hero.damage_type, item, &PATH_OFFENSE);
    score += SYNERGY_MATCH * synergy_weight(ctx.hero, item);
    if ctx.hero.has_as_steroid && item.has_tag(EffectTag::AttackSpeed) {
        score += STEROID_OVERLAP;
    }
    if lane.has_crit && item.in_category(StatCategory::DefensePhysical) {
        score += ARMOR_VS_CRIT;
    }
    if lane.primary_physical && item.in_category(StatCategory::DefensePhysical) {
        score += RESIST_VS_LANE;
    }
    if lane.primary_magical && item.in_category(StatCategory::DefenseMagical) {
        score += RESIST_VS_LANE;
    }
    if lane.has_threat(Threat::HardToKill) && item.has_tag(EffectTag::Pen) {
        score += PEN_VS_TANKY;
    }
    if lane.has_threat(Threat::OnHitDps) && item.in_category(StatCategory::Defense) {
        score += DEFENSE_VS_ON_HIT;
    }
    if lane.has_sustain && item.has_tag(EffectTag::AntiHeal) {
        score += if ctx.carries_anti_heal { ANTI_HEAL_CARRIER } else { ANTI_HEAL_OTHER };
    }
    if ctx.is_support {
        if item.is_defensive() {
            score += SUPPORT_DEFENSE;
        }
        if item.has_tag(EffectTag::Shield) || item.has_tag(EffectTag::Aura) {
            score += SUPPORT_UTILITY;
        }
        if item.in_category(StatCategory::Support) {
            score += SUPPORT_CATEGORY;
        }
    } else {
        if item.is_offensive() {
            score += CARRY_OFFENSE;
        }
        if item.in_category(StatCategory::Defense) && !item.is_offensive() {
            score += CARRY_PURE_DEFENSE;
        }
    }
    score += proven_score(item, ctx.proven, ctx.proven_win_rate, &PATH_PROVEN);
    score += quality_score(item);
    score += SHARED_COVERED_TAG * duo.covered_count(item, SHARED_PENALIZED) as f64;
    score += COVERED_TAG * local.covered_count(item, WATCHED_TAGS) as f64;
    score
}

fn score_crest(crest: &IndexedItem, ctx: &AllyContext<'_>) -> f64 {
    let mut score = offense_score(ctx.hero.damage_type, crest, &CREST_OFFENSE);
    if ctx.is_support
        && (crest.has_tag(EffectTag::Shield) || crest.has_tag(EffectTag::Aura) || crest.in_category(StatCategory::Support))
    {
        score += SUPPORT_CREST_UTILITY;
    }
    score += proven_crest_score(crest, ctx.proven, ctx.proven_win_rate);
    score += CREST_SYNERGY * synergy_matches(ctx.hero, crest) as f64;
    score
}

fn responsibility(is_support: bool, carries_anti_heal: bool) -> &'static str {
    match (is_support, carries_anti_heal) {
        (true, true) => "Anti-heal carrier + peel + CC",
        (true, false) => "Peel + CC + frontline",
        (false, true) => "Primary damage + anti-heal",
        (false, false) => "Primary damage dealer",
    }
}

fn synergy_notes(assigned: &[Assigned<'_>], lane: &LaneThreats, carrier: Option<&str>) -> Vec<String> {
    let mut notes = Vec::new();
    let mut damage_types: Vec<DamageType> = Vec::new();
    for a in assigned {
        if !damage_types.contains(&a.profile.damage_type) {
            damage_types.push(a.profile.damage_type);
        }
    }
    if damage_types.contains(&DamageType::Physical) && damage_types.contains(&DamageType::Magical) {
        notes.push("Mixed damage lane: enemy can't stack one resist type".to_string());
    } else if let [only] = damage_types.as_slice() {
        notes.push(format!("Same damage type ({only}): enemy can stack one resist"));
    }

    let has_cc = assigned.iter().any(|a| a.profile.has_playstyle("cc_heavy"));
    let has_burst = assigned.iter().any(|a| a.profile.has_playstyle("burst"));
    if has_cc && has_burst {
        notes.push("CC + burst synergy: CC into burst combo".to_string());
    }
    if has_cc && lane.has_weakness(Weakness::DiesToCc) {
        notes.push("Enemy has no tenacity: your CC advantage is huge".to_string());
    }

    if let Some(carrier) = carrier {
        let holder = assigned.iter().find(|a| a.ally.slug == carrier);
        let other = assigned.iter().find(|a| a.ally.slug != carrier);
        if let (Some(holder), Some(other)) = (holder, other) {
            notes.push(format!(
                "Anti-heal on {}: {} can focus on core build",
                holder.profile.name, other.profile.name
            ));
        }
    }
    notes
}

// ============================================================================
// Operation
// ============================================================================

impl Engine {
    /// Builds both allies of a lane against up to two enemies. Unknown enemies
    /// and enemies without build data are left out of the analysis.
    pub fn duo_counter_build(
        &self,
        allies: &[Ally],
        enemy_slugs: &[String],
        data: &HeroDataMap,
    ) -> Result<DuoCounterBuild, EngineError> {
        let missing: Vec<&str> = allies
            .iter()
            .filter(|a| self.profile(&a.slug).is_none())
            .map(|a| a.slug.as_str())
            .collect();
        if !missing.is_empty() {
            return Err(EngineError::AllyNotFound(missing.join(", ")));
        }
        let syn = &self.config().synthesis;

        let enemies: Vec<Enemy<'_>> = enemy_slugs
            .iter()
            .filter(|s| !s.is_empty())
            .filter_map(|slug| {
                let profile = self.profile(slug)?;
                let Some(build) = data
                    .get(slug.as_str())
                    .and_then(|d| highest_win_rate_build(d, None, syn.min_build_matches))
                else {
                    tracing::debug!(target: "scout::duo", enemy = %slug, "Skipping enemy without build data");
                    return None;
                };
                let threats = self.analyze_build(&build.items, Some(slug.as_str()));
                Some(Enemy { profile, build, threats })
            })
            .collect();
        let lane = LaneThreats::from_profiles(enemies.iter().map(|e| &e.threats));

        let assigned: Vec<Assigned<'_>> = allies
            .iter()
            .filter_map(|ally| {
                let profile = self.profile(&ally.slug)?;
                Some(Assigned {
                    ally,
                    profile,
                    is_support: plays_support(ally, profile),
                })
            })
            .collect();
        let carrier = if lane.has_sustain {
            anti_heal_carrier(self.index(), &assigned)
        } else {
            None
        };

        let candidates = self.index().completed_items();
        let crests = self.index().completed_crests();
        let first_threats = enemies.first().map(|e| &e.threats);
        let mut duo = PickState::default();
        let mut builds = Vec::with_capacity(assigned.len());

        for a in &assigned {
            let proven = proven_items(data.get(&a.ally.slug), a.ally.role.as_deref());
            let carries_anti_heal = carrier == Some(a.ally.slug.as_str());
            let ctx = AllyContext {
                hero: a.profile,
                is_support: a.is_support,
                carries_anti_heal,
                lane: &lane,
                proven: &proven,
                proven_win_rate: syn.proven_win_rate,
            };

            let mut local = PickState::default();
            let mut picks: Vec<Scored<'_>> = Vec::with_capacity(syn.core_slots);
            for _ in 0..syn.core_slots {
                let ranked = rank(
                    candidates.iter().copied().filter(|i| !local.is_used(i) && !duo.is_used(i)),
                    |i| score_for_ally(i, &ctx, &local, &duo),
                );
                let force = carries_anti_heal && !picks.iter().any(|p| p.item.has_tag(EffectTag::AntiHeal));
                let Some(pick) = choose(&ranked, force, FORCED_ANTI_HEAL_FLOOR) else {
                    break;
                };
                local.record(pick.item, SHARED_TAGS);
                duo.record(pick.item, SHARED_TAGS);
                picks.push(pick);
            }

            let ranked_crests = rank(crests.iter().copied().filter(|c| !duo.is_used(c)), |c| score_crest(c, &ctx));
            if let Some(best) = ranked_crests.first() {
                duo.mark_used(best.item);
            }

            let remaining = rank(
                candidates.iter().copied().filter(|i| !local.is_used(i) && !duo.is_used(i)),
                |i| score_for_ally(i, &ctx, &local, &duo),
            );
            let also_consider = top_alternatives(&remaining, syn.also_consider_count, |i| {
                explain::duo_item_swap_reason(i, &lane, a.is_support)
            });

            let items: Vec<&IndexedItem> = picks.iter().map(|p| p.item).collect();
            let path = picks
                .iter()
                .map(|p| {
                    let reasons = explain::duo_path_reasons(p.item, a.profile, &lane, &proven, syn.proven_win_rate);
                    CounterPick::new(p, reasons)
                })
                .collect();

            tracing::debug!(
                target: "scout::duo",
                ally = %a.ally.slug,
                support = a.is_support,
                carries_anti_heal,
                picks = picks.len(),
                "Built duo ally"
            );

            builds.push(AllyBuild {
                hero: HeroSummary {
                    name: a.profile.name.clone(),
                    slug: a.ally.slug.clone(),
                    role: a.ally.role.clone(),
                    damage_type: a.profile.damage_type,
                },
                is_support: a.is_support,
                build: DuoBuild {
                    name: build_name(&items, lane.dominant_damage_type()),
                    items: items.iter().map(|i| i.name.clone()).collect(),
                    crest: best_crest_name(&ranked_crests),
                    augment: pick_augment(proven.role_stats(), first_threats, a.profile),
                    path,
                },
                also_consider,
                alt_crests: alt_crests(&ranked_crests, syn.alt_crest_count),
                responsibility: responsibility(a.is_support, carries_anti_heal).to_string(),
            });
        }

        let kit_synergy = match assigned.as_slice() {
            [first, second, ..] => match (self.hero_kit(&first.ally.slug), self.hero_kit(&second.ally.slug)) {
                (Some(a), Some(b)) => Some(analyze_duo(a, b, first.is_support, second.is_support)),
                _ => None,
            },
            _ => None,
        };

        let augment_warnings = enemies
            .iter()
            .filter_map(|e| {
                let top = top_augment_above(&e.build.augments, syn.augment_warning_win_rate)?;
                Some(DuoAugmentWarning {
                    hero: e.profile.name.clone(),
                    augment: top.name.trim().to_string(),
                    win_rate: explain::percent(top.win_rate.0),
                    matches: top.matches.0,
                })
            })
            .collect();

        Ok(DuoCounterBuild {
            allies: builds,
            enemies: enemies
                .iter()
                .map(|e| EnemyBreakdown {
                    hero: e.profile.name.clone(),
                    meta_build: BuildSummary::new(&e.build, e.build.items.clone()),
                    threats: e.threats.threats.clone(),
                    weaknesses: e.threats.weaknesses.clone(),
                })
                .collect(),
            synergy_notes: synergy_notes(&assigned, &lane, carrier),
            kit_synergy,
            augment_warnings,
            tips: explain::duo_tips(&lane),
            lane_threats: lane,
        })
    }
}
