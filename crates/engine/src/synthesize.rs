//! Counter-build synthesis.
//!
//! Items are picked greedily, one slot at a time. Every candidate is scored
//! against the enemy [`ThreatProfile`] with an additive weight table, and a
//! [`PickState`] carries what earlier picks already cover so later slots
//! diversify. Sorting is stable, so equal scores keep catalog order and the
//! output is deterministic.

use crate::analyze::{Threat, ThreatProfile};
use crate::explain;
use crate::stats::ProvenItems;
use scout_catalog::{
    confidence_score, item_family, DamageType, EffectTag, HeroProfile, IndexedItem, ItemIndex, Rarity, RoleStats,
    StatCategory, StatLine,
};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

// ============================================================================
// Weight tables
// ============================================================================

/// Offense-category weights relative to the buyer's damage type.
#[derive(Debug, Clone, Copy)]
pub(crate) struct OffenseWeights {
    pub matching: f64,
    /// Applied to either offense category for hybrid heroes.
    pub hybrid: f64,
    /// Offense of the other type only.
    pub wrong: f64,
}

pub(crate) const PATH_OFFENSE: OffenseWeights = OffenseWeights { matching: 20.0, hybrid: 12.0, wrong: -30.0 };
const ALSO_CONSIDER_OFFENSE: OffenseWeights = OffenseWeights { matching: 15.0, hybrid: 0.0, wrong: -30.0 };
pub(crate) const CREST_OFFENSE: OffenseWeights = OffenseWeights { matching: 15.0, hybrid: 0.0, wrong: 0.0 };
const ROUTE_OFFENSE: OffenseWeights = OffenseWeights { matching: 20.0, hybrid: 0.0, wrong: -30.0 };

/// Bonuses for items seen in the hero's own builds.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ProvenWeights {
    pub seen: f64,
    pub high_win_rate: f64,
    pub repeated: f64,
}

pub(crate) const PATH_PROVEN: ProvenWeights = ProvenWeights { seen: 10.0, high_win_rate: 10.0, repeated: 5.0 };
const ALSO_CONSIDER_PROVEN: ProvenWeights = ProvenWeights { seen: 8.0, high_win_rate: 0.0, repeated: 0.0 };

pub(crate) const SYNERGY_MATCH: f64 = 15.0;
pub(crate) const STEROID_OVERLAP: f64 = -5.0;
const ANTI_HEAL_VS_SUSTAIN: f64 = 30.0;
const ARMOR_VS_CRIT: f64 = 15.0;
const RESIST_VS_DAMAGE_TYPE: f64 = 12.0;
const PEN_VS_TANKY: f64 = 15.0;
const DEFENSE_VS_ON_HIT: f64 = 8.0;
pub(crate) const EFFICIENT_ITEM: f64 = 5.0;
pub(crate) const LEGENDARY_ITEM: f64 = 3.0;
pub(crate) const COVERED_TAG: f64 = -25.0;
const FAMILY_REUSE: f64 = -40.0;

const ALSO_CONSIDER_ANTI_HEAL: f64 = 20.0;
const ALSO_CONSIDER_RESIST: f64 = 10.0;
const ALSO_CONSIDER_PEN: f64 = 12.0;
const ALSO_CONSIDER_SYNERGY: f64 = 10.0;
const ALSO_CONSIDER_FAMILY: f64 = -35.0;

const CREST_ANTI_HEAL: f64 = 20.0;
pub(crate) const CREST_SYNERGY: f64 = 8.0;
const PROVEN_CREST: f64 = 10.0;
const PROVEN_CREST_HIGH_WIN_RATE: f64 = 10.0;

const ROUTE_ARMOR_VS_CRIT: f64 = 10.0;
/// Route picks at or below this score are dropped.
const ROUTE_MIN_SCORE: f64 = -10.0;

/// Gold efficiency (percent) above which an item earns [`EFFICIENT_ITEM`].
const EFFICIENCY_BONUS_ABOVE: i64 = 100;

/// Tags whose second copy in a build is penalized.
pub const WATCHED_TAGS: &[EffectTag] = &[EffectTag::AntiHeal, EffectTag::Tenacity, EffectTag::Shield];

// ============================================================================
// Shared scoring helpers
// ============================================================================

pub(crate) fn offense_score(damage_type: DamageType, item: &IndexedItem, w: &OffenseWeights) -> f64 {
    let physical = item.in_category(StatCategory::OffensePhysical);
    let magical = item.in_category(StatCategory::OffenseMagical);
    match damage_type {
        DamageType::Physical if physical => w.matching,
        DamageType::Physical if magical => w.wrong,
        DamageType::Magical if magical => w.matching,
        DamageType::Magical if physical => w.wrong,
        DamageType::Hybrid if physical || magical => w.hybrid,
        _ => 0.0,
    }
}

/// Whether the item's resist answers `enemy` damage.
pub(crate) fn resists(item: &IndexedItem, enemy: DamageType) -> bool {
    match enemy {
        DamageType::Physical => item.in_category(StatCategory::DefensePhysical),
        DamageType::Magical => item.in_category(StatCategory::DefenseMagical),
        DamageType::Hybrid => false,
    }
}

/// Sum of the weights of every synergy preference the item satisfies.
pub(crate) fn synergy_weight(hero: &HeroProfile, item: &IndexedItem) -> f64 {
    hero.synergies
        .iter()
        .filter(|s| item.has_label(&s.tag))
        .map(|s| s.weight)
        .sum()
}

pub(crate) fn synergy_matches(hero: &HeroProfile, item: &IndexedItem) -> usize {
    hero.synergies.iter().filter(|s| item.has_label(&s.tag)).count()
}

pub(crate) fn proven_score(item: &IndexedItem, proven: &ProvenItems<'_>, proven_win_rate: f64, w: &ProvenWeights) -> f64 {
    let Some(p) = proven.get(&item.name) else {
        return 0.0;
    };
    let mut score = w.seen;
    if p.avg_win_rate > proven_win_rate {
        score += w.high_win_rate;
    }
    if p.appearances >= 2 {
        score += w.repeated;
    }
    score
}

pub(crate) fn proven_crest_score(crest: &IndexedItem, proven: &ProvenItems<'_>, proven_win_rate: f64) -> f64 {
    match proven.crest(&crest.name) {
        Some(line) if line.win_rate.0 > proven_win_rate => PROVEN_CREST + PROVEN_CREST_HIGH_WIN_RATE,
        Some(_) => PROVEN_CREST,
        None => 0.0,
    }
}

/// Efficiency and rarity bonuses.
pub(crate) fn quality_score(item: &IndexedItem) -> f64 {
    let mut score = 0.0;
    if item.efficiency().is_some_and(|e| e > EFFICIENCY_BONUS_ABOVE) {
        score += EFFICIENT_ITEM;
    }
    if item.rarity == Rarity::Legendary {
        score += LEGENDARY_ITEM;
    }
    score
}

// ============================================================================
// Greedy state
// ============================================================================

/// What earlier picks already provide.
#[derive(Debug, Clone, Default)]
pub struct PickState {
    used_slugs: BTreeSet<String>,
    covered: BTreeSet<EffectTag>,
    families: BTreeSet<&'static str>,
}

impl PickState {
    pub fn is_used(&self, item: &IndexedItem) -> bool {
        self.used_slugs.contains(&item.slug)
    }

    pub fn covers(&self, tag: EffectTag) -> bool {
        self.covered.contains(&tag)
    }

    /// Tags of `item` already covered, counted over `penalized` only.
    pub fn covered_count(&self, item: &IndexedItem, penalized: &[EffectTag]) -> usize {
        item.tags
            .iter()
            .filter(|t| penalized.contains(t) && self.covered.contains(t))
            .count()
    }

    pub fn family_used(&self, item: &IndexedItem) -> bool {
        item.family.is_some_and(|f| self.families.contains(f))
    }

    pub fn families(&self) -> &BTreeSet<&'static str> {
        &self.families
    }

    /// Marks `item` as used and covers those of its tags listed in `watched`.
    pub fn record(&mut self, item: &IndexedItem, watched: &[EffectTag]) {
        self.used_slugs.insert(item.slug.clone());
        if let Some(family) = item.family {
            self.families.insert(family);
        }
        self.covered
            .extend(item.tags.iter().copied().filter(|t| watched.contains(t)));
    }

    pub fn mark_used(&mut self, item: &IndexedItem) {
        self.used_slugs.insert(item.slug.clone());
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Scored<'a> {
    pub item: &'a IndexedItem,
    pub score: f64,
}

/// Scores and sorts candidates, highest first. Ties keep input order.
pub fn rank<'a, I, F>(candidates: I, mut score: F) -> Vec<Scored<'a>>
where
    I: IntoIterator<Item = &'a IndexedItem>,
    F: FnMut(&IndexedItem) -> f64,
{
    let mut scored: Vec<Scored<'a>> = candidates
        .into_iter()
        .map(|item| Scored { item, score: score(item) })
        .collect();
    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    scored
}

/// The top candidate, or when `force_anti_heal` is set the best anti-heal
/// candidate scoring above `floor` (falling back to the top one).
pub fn choose<'a>(ranked: &[Scored<'a>], force_anti_heal: bool, floor: f64) -> Option<Scored<'a>> {
    if force_anti_heal {
        if let Some(forced) = ranked
            .iter()
            .find(|s| s.item.has_tag(EffectTag::AntiHeal) && s.score > floor)
        {
            return Some(*forced);
        }
    }
    ranked.first().copied()
}

fn has_anti_heal(picks: &[Scored<'_>]) -> bool {
    picks.iter().any(|p| p.item.has_tag(EffectTag::AntiHeal))
}

// ============================================================================
// Core path
// ============================================================================

/// Inputs to solo path scoring.
#[derive(Debug, Clone, Copy)]
pub struct PathContext<'a> {
    pub hero: &'a HeroProfile,
    pub threats: &'a ThreatProfile,
    pub proven: &'a ProvenItems<'a>,
    pub proven_win_rate: f64,
}

/// Additive score of `item` for the next slot.
pub fn score_for_path(item: &IndexedItem, ctx: &PathContext<'_>, state: &PickState) -> f64 {
    let hero = ctx.hero;
    let threats = ctx.threats;
    let mut score = offense_score(hero.damage_type, item, &PATH_OFFENSE);
    score += SYNERGY_MATCH * synergy_weight(hero, item);
    if hero.has_as_steroid && item.has_tag(EffectTag::AttackSpeed) {
        score += STEROID_OVERLAP;
    }
    if threats.has_sustain && item.has_tag(EffectTag::AntiHeal) && !state.covers(EffectTag::AntiHeal) {
        score += ANTI_HEAL_VS_SUSTAIN;
    }
    if threats.has_crit && item.in_category(StatCategory::DefensePhysical) {
        score += ARMOR_VS_CRIT;
    }
    if resists(item, threats.primary_damage_type) {
        score += RESIST_VS_DAMAGE_TYPE;
    }
    if threats.has_threat(Threat::HardToKill) && item.has_tag(EffectTag::Pen) {
        score += PEN_VS_TANKY;
    }
    if threats.has_threat(Threat::OnHitDps) && item.in_category(StatCategory::Defense) {
        score += DEFENSE_VS_ON_HIT;
    }
    score += proven_score(item, ctx.proven, ctx.proven_win_rate, &PATH_PROVEN);
    score += quality_score(item);
    score += COVERED_TAG * state.covered_count(item, WATCHED_TAGS) as f64;
    if state.family_used(item) {
        score += FAMILY_REUSE;
    }
    score
}

/// Greedy core picks and the state they leave behind.
#[derive(Debug, Clone)]
pub struct CorePath<'a> {
    pub picks: Vec<Scored<'a>>,
    pub state: PickState,
}

impl CorePath<'_> {
    pub fn names(&self) -> Vec<String> {
        self.picks.iter().map(|p| p.item.name.clone()).collect()
    }

    pub fn items(&self) -> Vec<&IndexedItem> {
        self.picks.iter().map(|p| p.item).collect()
    }
}

/// Picks `slots` items from `candidates`. While the enemy has sustain and no
/// anti-heal item has been picked, the best positive-scoring anti-heal
/// candidate takes the slot.
pub fn counter_path<'a>(candidates: &[&'a IndexedItem], ctx: &PathContext<'_>, slots: usize) -> CorePath<'a> {
    let mut picks: Vec<Scored<'a>> = Vec::with_capacity(slots);
    let mut state = PickState::default();

    for slot in 0..slots {
        let ranked = rank(
            candidates.iter().copied().filter(|i| !state.is_used(i)),
            |i| score_for_path(i, ctx, &state),
        );
        let force = ctx.threats.has_sustain && !has_anti_heal(&picks);
        let Some(pick) = choose(&ranked, force, 0.0) else {
            break;
        };
        tracing::trace!(
            target: "scout::synthesize",
            slot,
            item = %pick.item.name,
            score = pick.score,
            "Picked core item"
        );
        state.record(pick.item, WATCHED_TAGS);
        picks.push(pick);
    }

    CorePath { picks, state }
}

/// One explained slot of a counter path.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CounterPick {
    pub item: String,
    pub slug: String,
    pub score: f64,
    pub reasons: Vec<String>,
}

impl CounterPick {
    pub fn new(scored: &Scored<'_>, reasons: Vec<String>) -> Self {
        Self {
            item: scored.item.name.clone(),
            slug: scored.item.slug.clone(),
            score: scored.score,
            reasons,
        }
    }
}

// ============================================================================
// Alternatives
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlsoConsider {
    pub item: String,
    pub slug: String,
    pub swap_when: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AltCrest {
    pub crest: String,
    pub swap_when: String,
}

/// Positive-scoring entries of `ranked`, at most `count`, with swap reasons.
pub fn top_alternatives(
    ranked: &[Scored<'_>],
    count: usize,
    reason: impl Fn(&IndexedItem) -> String,
) -> Vec<AlsoConsider> {
    ranked
        .iter()
        .filter(|s| s.score > 0.0)
        .take(count)
        .map(|s| AlsoConsider {
            item: s.item.name.clone(),
            slug: s.item.slug.clone(),
            swap_when: reason(s.item),
        })
        .collect()
}

fn score_also_consider(item: &IndexedItem, ctx: &PathContext<'_>, state: &PickState) -> f64 {
    let threats = ctx.threats;
    let mut score = offense_score(ctx.hero.damage_type, item, &ALSO_CONSIDER_OFFENSE);
    if threats.has_sustain && item.has_tag(EffectTag::AntiHeal) {
        score += ALSO_CONSIDER_ANTI_HEAL;
    }
    if resists(item, threats.primary_damage_type) {
        score += ALSO_CONSIDER_RESIST;
    }
    if threats.has_threat(Threat::HardToKill) && item.has_tag(EffectTag::Pen) {
        score += ALSO_CONSIDER_PEN;
    }
    score += proven_score(item, ctx.proven, ctx.proven_win_rate, &ALSO_CONSIDER_PROVEN);
    score += ALSO_CONSIDER_SYNERGY * synergy_matches(ctx.hero, item) as f64;
    if state.family_used(item) {
        score += ALSO_CONSIDER_FAMILY;
    }
    score
}

/// Items outside the core path worth swapping in, with when to do it.
pub fn also_consider(
    candidates: &[&IndexedItem],
    ctx: &PathContext<'_>,
    state: &PickState,
    count: usize,
) -> Vec<AlsoConsider> {
    let ranked = rank(
        candidates.iter().copied().filter(|i| !state.is_used(i)),
        |i| score_also_consider(i, ctx, state),
    );
    top_alternatives(&ranked, count, explain::item_swap_reason)
}

/// Crests ranked for a solo lane.
pub fn rank_crests<'a>(crests: &[&'a IndexedItem], ctx: &PathContext<'_>) -> Vec<Scored<'a>> {
    rank(crests.iter().copied(), |c| {
        let mut score = offense_score(ctx.hero.damage_type, c, &CREST_OFFENSE);
        if ctx.threats.has_sustain && c.has_tag(EffectTag::AntiHeal) {
            score += CREST_ANTI_HEAL;
        }
        score += proven_crest_score(c, ctx.proven, ctx.proven_win_rate);
        score += CREST_SYNERGY * synergy_matches(ctx.hero, c) as f64;
        score
    })
}

/// Name of the best crest, `"N/A"` when there is none.
pub fn best_crest_name(ranked: &[Scored<'_>]) -> String {
    ranked
        .first()
        .map_or_else(|| "N/A".to_string(), |c| c.item.name.clone())
}

/// Runners-up after the best crest.
pub fn alt_crests(ranked: &[Scored<'_>], count: usize) -> Vec<AltCrest> {
    ranked
        .iter()
        .skip(1)
        .take(count)
        .map(|c| AltCrest {
            crest: c.item.name.clone(),
            swap_when: explain::crest_swap_reason(c.item),
        })
        .collect()
}

// ============================================================================
// Augment
// ============================================================================

const ANTI_HEAL_AUGMENT: f64 = 1.8;
const SHRED_AUGMENT: f64 = 1.5;
const SUSTAINED_DPS_AUGMENT: f64 = 1.3;
const BURST_AUGMENT: f64 = 1.3;
const ALTERNATIVE_AUGMENTS: usize = 2;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AugmentPick {
    pub name: String,
    pub win_rate: String,
    pub matches: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AugmentChoice {
    pub recommended: Option<AugmentPick>,
    pub alternatives: Vec<AugmentPick>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

fn augment_score(line: &StatLine, threats: Option<&ThreatProfile>, hero: &HeroProfile) -> f64 {
    let name = line.name.trim().to_lowercase();
    let mut score = confidence_score(line.win_rate.0, line.matches.0);
    if threats.is_some_and(|t| t.has_sustain) && contains_any(&name, &["tainted", "anti-heal", "grievous"]) {
        score *= ANTI_HEAL_AUGMENT;
    }
    if threats.is_some_and(|t| t.has_threat(Threat::HardToKill)) && contains_any(&name, &["shred", "pen", "break"]) {
        score *= SHRED_AUGMENT;
    }
    if hero.has_playstyle("sustained_dps") && contains_any(&name, &["hit", "attack"]) {
        score *= SUSTAINED_DPS_AUGMENT;
    }
    if hero.has_playstyle("burst") && contains_any(&name, &["burst", "soul", "limit break"]) {
        score *= BURST_AUGMENT;
    }
    score
}

fn augment_pick(line: &StatLine, reason: Option<String>) -> AugmentPick {
    AugmentPick {
        name: line.name.trim().to_string(),
        win_rate: explain::percent(line.win_rate.0),
        matches: line.matches.0,
        reason,
    }
}

/// Best augment by confidence score, nudged by name keywords that fit the matchup.
pub fn pick_augment(role_stats: Option<&RoleStats>, threats: Option<&ThreatProfile>, hero: &HeroProfile) -> AugmentChoice {
    let augments = role_stats.map(|rd| rd.augments.as_slice()).unwrap_or_default();
    let mut scored: Vec<(f64, &StatLine)> = augments
        .iter()
        .map(|a| (augment_score(a, threats, hero), a))
        .collect();
    scored.sort_by(|a, b| b.0.total_cmp(&a.0));

    let Some((_, top)) = scored.first() else {
        return AugmentChoice {
            recommended: None,
            alternatives: Vec::new(),
            note: Some("No augment data".to_string()),
        };
    };

    let mut reason = format!("{} WR across {} matches", explain::percent(top.win_rate.0), top.matches.0);
    let lower = top.name.trim().to_lowercase();
    if threats.is_some_and(|t| t.has_sustain) && contains_any(&lower, &["tainted", "anti-heal"]) {
        reason.push_str("; adds anti-heal pressure");
    }

    AugmentChoice {
        recommended: Some(augment_pick(top, Some(reason))),
        alternatives: scored
            .iter()
            .skip(1)
            .take(ALTERNATIVE_AUGMENTS)
            .map(|(_, a)| augment_pick(a, None))
            .collect(),
        note: None,
    }
}

// ============================================================================
// Build name
// ============================================================================

/// Short label for a set of items, e.g. `Anti-Heal/On-Hit/Pen`.
pub fn build_name(items: &[&IndexedItem], damage_type: DamageType) -> String {
    let any_tag = |tag: EffectTag| items.iter().any(|i| i.has_tag(tag));
    let any_cat = |cat: StatCategory| items.iter().any(|i| i.in_category(cat));

    let defensive = any_cat(StatCategory::DefensePhysical) || any_cat(StatCategory::DefenseMagical);
    let offensive = any_cat(StatCategory::OffensePhysical) || any_cat(StatCategory::OffenseMagical);

    let mut labels: Vec<(&str, u8)> = Vec::new();
    if any_tag(EffectTag::Crit) {
        labels.push(("Crit", 10));
    }
    if any_tag(EffectTag::OnHit) {
        labels.push(("On-Hit", 9));
    }
    if any_tag(EffectTag::Pen) || any_tag(EffectTag::PhysicalShred) || any_tag(EffectTag::MagicalShred) {
        labels.push(("Pen", 8));
    }
    if any_tag(EffectTag::AntiHeal) {
        labels.push(("Anti-Heal", 15));
    }
    if defensive && offensive {
        labels.push(("Bruiser", 7));
    } else if defensive {
        labels.push(("Tanky", 6));
    }
    if any_tag(EffectTag::Shield) || any_tag(EffectTag::Aura) {
        labels.push(("Utility", 5));
    }
    if any_tag(EffectTag::Sustain) && !any_tag(EffectTag::AntiHeal) {
        labels.push(("Sustain", 4));
    }
    labels.sort_by(|a, b| b.1.cmp(&a.1));

    if labels.is_empty() {
        return match damage_type {
            DamageType::Physical => "AD/Counter",
            DamageType::Magical => "AP/Counter",
            DamageType::Hybrid => "Counter",
        }
        .to_string();
    }
    labels
        .iter()
        .take(3)
        .map(|(label, _)| *label)
        .collect::<Vec<_>>()
        .join("/")
}

// ============================================================================
// General routes
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteItem {
    pub name: String,
    pub why: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CounterRoute {
    pub label: String,
    pub damage_type: DamageType,
    pub items: Vec<RouteItem>,
}

fn score_for_route(item: &IndexedItem, damage_type: DamageType, threats: &ThreatProfile, state: &PickState) -> f64 {
    let mut score = offense_score(damage_type, item, &ROUTE_OFFENSE);
    if threats.has_sustain && item.has_tag(EffectTag::AntiHeal) && !state.covers(EffectTag::AntiHeal) {
        score += ANTI_HEAL_VS_SUSTAIN;
    }
    if resists(item, threats.primary_damage_type) {
        score += RESIST_VS_DAMAGE_TYPE;
    }
    if threats.has_crit && item.in_category(StatCategory::DefensePhysical) {
        score += ROUTE_ARMOR_VS_CRIT;
    }
    if threats.has_threat(Threat::HardToKill) && item.has_tag(EffectTag::Pen) {
        score += PEN_VS_TANKY;
    }
    score += quality_score(item);
    score += COVERED_TAG * state.covered_count(item, WATCHED_TAGS) as f64;
    if state.family_used(item) {
        score += FAMILY_REUSE;
    }
    score
}

/// Hero-agnostic counter items for a damage type.
pub fn general_counter_route(
    candidates: &[&IndexedItem],
    damage_type: DamageType,
    threats: &ThreatProfile,
    slots: usize,
) -> Vec<RouteItem> {
    let mut picks: Vec<Scored<'_>> = Vec::with_capacity(slots);
    let mut state = PickState::default();

    for _ in 0..slots {
        let ranked = rank(
            candidates.iter().copied().filter(|i| !state.is_used(i)),
            |i| score_for_route(i, damage_type, threats, &state),
        );
        let force = threats.has_sustain && !has_anti_heal(&picks);
        let Some(pick) = choose(&ranked, force, 0.0) else {
            break;
        };
        if pick.score > ROUTE_MIN_SCORE {
            state.record(pick.item, WATCHED_TAGS);
            picks.push(pick);
        }
    }

    picks
        .iter()
        .map(|p| RouteItem {
            name: p.item.name.clone(),
            why: explain::route_reason(p.item),
        })
        .collect()
}

/// Physical and magical routes; empty routes are left out.
pub fn counter_routes(candidates: &[&IndexedItem], threats: &ThreatProfile, slots: usize) -> Vec<CounterRoute> {
    [
        (DamageType::Physical, "If you deal physical damage"),
        (DamageType::Magical, "If you deal magical damage"),
    ]
    .into_iter()
    .filter_map(|(damage_type, label)| {
        let items = general_counter_route(candidates, damage_type, threats, slots);
        (!items.is_empty()).then(|| CounterRoute {
            label: label.to_string(),
            damage_type,
            items,
        })
    })
    .collect()
}

// ============================================================================
// Slot filling
// ============================================================================

/// Slot keys filled after the core, in order.
pub const FILL_SLOTS: [&str; 3] = ["4th", "5th", "6th"];

const FILL_FAMILY_REUSE: f64 = 0.3;
const FILL_ANTI_HEAL: f64 = 1.5;
const FILL_RESIST: f64 = 1.2;

/// Extends `core` with the best recorded 4th, 5th and 6th items. Names
/// already in the build are skipped case-insensitively. With `threats` the
/// first anti-heal item and matching resists are boosted.
pub fn fill_full_build(
    core: &[String],
    item_slots: &BTreeMap<String, Vec<StatLine>>,
    index: &ItemIndex,
    threats: Option<&ThreatProfile>,
) -> Vec<String> {
    let mut full: Vec<String> = core.to_vec();
    let mut used: BTreeSet<String> = core.iter().map(|n| n.to_lowercase()).collect();
    let mut families: BTreeSet<&'static str> = core.iter().filter_map(|n| item_family(n)).collect();

    for slot in FILL_SLOTS {
        let Some(lines) = item_slots.get(slot) else {
            continue;
        };
        let full_has_anti_heal = full
            .iter()
            .any(|n| index.get(n).is_some_and(|i| i.has_tag(EffectTag::AntiHeal)));

        let mut best: Option<(f64, &StatLine)> = None;
        for line in lines.iter().filter(|l| !used.contains(&l.name.to_lowercase())) {
            let mut score = confidence_score(line.win_rate.0, line.matches.0);
            if item_family(&line.name).is_some_and(|f| families.contains(f)) {
                score *= FILL_FAMILY_REUSE;
            }
            if let (Some(t), Some(item)) = (threats, index.get(&line.name)) {
                if t.has_sustain && item.has_tag(EffectTag::AntiHeal) && !full_has_anti_heal {
                    score *= FILL_ANTI_HEAL;
                }
                if resists(item, t.primary_damage_type) {
                    score *= FILL_RESIST;
                }
            }
            if best.map_or(true, |(s, _)| score > s) {
                best = Some((score, line));
            }
        }

        if let Some((score, line)) = best {
            tracing::trace!(target: "scout::synthesize", slot, item = %line.name, score, "Filled slot");
            used.insert(line.name.to_lowercase());
            if let Some(f) = item_family(&line.name) {
                families.insert(f);
            }
            full.push(line.name.clone());
        }
    }
    full
}
