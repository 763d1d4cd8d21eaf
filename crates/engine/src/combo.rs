//! Single-hero ability sequencing: burst order, sustained-damage rotation,
//! mana ranking and, for supports, peel/engage/sustain sequences.

use scout_catalog::rules::{pat, pat_unless, CompiledRules, PatternRule};
use scout_catalog::{clean_description, display_name, extract_cc, Ability, AbilityKey, CcEffect, CcExtractorConfig, CcKind};
use serde::Serialize;
use std::sync::LazyLock;

/// Rank index used when the caller does not pick one (rank 3).
pub const DEFAULT_RANK: usize = 2;

const HARD_CC_SCORE: u32 = 3;
const SILENCE_SCORE: u32 = 2;
const SLOW_SCORE: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Purpose {
    ShieldAlly,
    Heal,
    AoeDamage,
    GapClose,
    Buff,
}

impl Purpose {
    fn label(self) -> &'static str {
        match self {
            Purpose::ShieldAlly => "shield ally",
            Purpose::Heal => "heal",
            Purpose::AoeDamage => "AoE damage",
            Purpose::GapClose => "gap close",
            Purpose::Buff => "buff",
        }
    }
}

const PURPOSE_RULES: &[PatternRule<Purpose>] = &[
    PatternRule { label: Purpose::ShieldAlly, patterns: &[pat("shield")] },
    PatternRule { label: Purpose::Heal, patterns: &[pat_unless("heal", "ing.*reduc"), pat("restore.*health")] },
    PatternRule { label: Purpose::AoeDamage, patterns: &[pat("area"), pat("aoe"), pat("nearby enem")] },
    PatternRule { label: Purpose::GapClose, patterns: &[pat("dash"), pat("charge"), pat("leap")] },
    PatternRule { label: Purpose::Buff, patterns: &[pat("empower"), pat("buff"), pat("enhance")] },
];

// RATIONALE: compile-time constant patterns; `.expect()` cannot fire.
static PURPOSE_MATCHERS: LazyLock<CompiledRules<Purpose>> =
    LazyLock::new(|| CompiledRules::compile(PURPOSE_RULES).expect("PURPOSE_RULES: compile-time constant"));

/// One ability evaluated at a fixed rank.
#[derive(Debug, Clone)]
struct RankedAbility<'a> {
    ability: &'a Ability,
    cd: f64,
    cost: f64,
    damage: f64,
    scaling: f64,
    cc: Vec<CcEffect>,
    cc_score: u32,
    purposes: Vec<Purpose>,
    purpose: String,
}

impl<'a> RankedAbility<'a> {
    fn new(ability: &'a Ability, rank: usize, config: &CcExtractorConfig) -> Self {
        let ri = rank.min(ability.cooldowns.len().max(1) - 1);
        let primary = ability.damage.first();
        let cc = extract_cc(&ability.description, &ability.cc, config);
        let cc_score = cc
            .iter()
            .map(|c| match c.kind {
                _ if c.hard => HARD_CC_SCORE,
                CcKind::Silence => SILENCE_SCORE,
                CcKind::Slow => SLOW_SCORE,
                _ => 0,
            })
            .sum();

        let text = clean_description(&ability.description);
        let purposes: Vec<Purpose> = PURPOSE_MATCHERS.matching(&text).collect();
        let purpose = purpose_label(ability, &cc, &purposes);

        Self {
            ability,
            cd: ability.cooldowns.get(ri).copied().unwrap_or(0.0),
            cost: ability.costs.get(ri).copied().unwrap_or(0.0),
            damage: primary.and_then(|d| d.values.get(ri)).copied().unwrap_or(0.0),
            scaling: primary.and_then(|d| d.scaling).unwrap_or(0.0),
            cc,
            cc_score,
            purposes,
            purpose,
        }
    }

    fn dps(&self) -> f64 {
        if self.cd > 0.0 {
            self.damage / self.cd
        } else {
            0.0
        }
    }

    fn sustains(&self) -> bool {
        self.purposes.iter().any(|p| matches!(p, Purpose::ShieldAlly | Purpose::Heal))
    }

    fn step(&self) -> ComboStep {
        ComboStep {
            name: self.ability.name.clone(),
            key: self.ability.key,
            purpose: self.purpose.clone(),
            cd: self.cd,
            cost: self.cost,
        }
    }
}

/// `lock down + gap close + ultimate`, `damage`, or `utility`.
fn purpose_label(ability: &Ability, cc: &[CcEffect], purposes: &[Purpose]) -> String {
    let mut parts: Vec<&str> = Vec::new();
    if cc.iter().any(|c| c.hard) {
        parts.push("lock down");
    } else if cc.iter().any(|c| c.kind == CcKind::Slow) {
        parts.push("slow");
    }
    parts.extend(purposes.iter().map(|p| p.label()));
    if parts.is_empty() && ability.damage_at(0).is_some_and(|d| d > 0.0) {
        parts.push("damage");
    }
    if ability.key == AbilityKey::Ultimate {
        parts.push("ultimate");
    }
    if parts.is_empty() {
        "utility".to_string()
    } else {
        parts.join(" + ")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComboStep {
    pub name: String,
    pub key: AbilityKey,
    pub purpose: String,
    pub cd: f64,
    pub cost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BurstStep {
    pub name: String,
    pub key: AbilityKey,
    pub purpose: String,
    pub reason: String,
    pub damage: f64,
    pub scaling: f64,
    pub cost: f64,
    pub cd: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DpsStep {
    pub name: String,
    pub key: AbilityKey,
    /// Damage per second of cooldown, one decimal.
    pub dps: f64,
    pub cost: f64,
    pub cd: f64,
    pub purpose: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ManaStep {
    pub name: String,
    pub key: AbilityKey,
    pub mana_efficiency: f64,
    pub damage: f64,
    pub cost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SupportCombos {
    /// Heals and shields first, then the remaining CC.
    pub peel: Vec<ComboStep>,
    /// CC first, then the remaining damage.
    pub engage: Vec<ComboStep>,
    /// Heals and shields by cooldown; every ability when there are none.
    pub sustain: Vec<ComboStep>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroCombo {
    pub hero_name: String,
    pub hero_slug: String,
    pub rank: usize,
    pub burst_combo: Vec<BurstStep>,
    pub dps_rotation: Vec<DpsStep>,
    pub mana_ranking: Vec<ManaStep>,
    pub total_combo_cost: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub support_combos: Option<SupportCombos>,
}

/// Sequences a hero's castable abilities: non-basic, non-passive, with a
/// cooldown or a cost. Returns `None` when there are none.
pub fn hero_combo(
    slug: &str,
    name: &str,
    abilities: &[Ability],
    is_support: bool,
    rank: usize,
    config: &CcExtractorConfig,
) -> Option<HeroCombo> {
    let scored: Vec<RankedAbility<'_>> = abilities
        .iter()
        .filter(|a| !matches!(a.key, AbilityKey::Basic | AbilityKey::Passive))
        .filter(|a| !a.cooldowns.is_empty() || !a.costs.is_empty())
        .map(|a| RankedAbility::new(a, rank, config))
        .collect();
    if scored.is_empty() {
        tracing::debug!(target: "scout::combo", slug, "No castable abilities");
        return None;
    }

    let mut burst: Vec<&RankedAbility<'_>> = scored.iter().collect();
    burst.sort_by(|a, b| b.cc_score.cmp(&a.cc_score).then(b.damage.total_cmp(&a.damage)));

    let mut rotation: Vec<&RankedAbility<'_>> = scored.iter().collect();
    rotation.sort_by(|a, b| b.dps().total_cmp(&a.dps()));

    let mut mana: Vec<&RankedAbility<'_>> = scored.iter().filter(|a| a.cost > 0.0 && a.damage > 0.0).collect();
    mana.sort_by(|a, b| (b.damage / b.cost).total_cmp(&(a.damage / a.cost)));

    Some(HeroCombo {
        hero_name: display_name(name).to_string(),
        hero_slug: slug.to_string(),
        rank,
        burst_combo: burst
            .iter()
            .map(|a| BurstStep {
                name: a.ability.name.clone(),
                key: a.ability.key,
                purpose: a.purpose.clone(),
                reason: if a.cc_score > 0 {
                    let kinds: Vec<&str> = a.cc.iter().map(|c| c.kind.as_str()).collect();
                    format!("CC ({})", kinds.join(", "))
                } else if a.ability.key == AbilityKey::Ultimate {
                    "Ultimate".to_string()
                } else {
                    "Damage".to_string()
                },
                damage: a.damage,
                scaling: a.scaling,
                cost: a.cost,
                cd: a.cd,
            })
            .collect(),
        dps_rotation: rotation
            .iter()
            .map(|a| DpsStep {
                name: a.ability.name.clone(),
                key: a.ability.key,
                dps: (a.dps() * 10.0).round() / 10.0,
                cost: a.cost,
                cd: a.cd,
                purpose: a.purpose.clone(),
            })
            .collect(),
        mana_ranking: mana
            .iter()
            .map(|a| ManaStep {
                name: a.ability.name.clone(),
                key: a.ability.key,
                mana_efficiency: a.damage / a.cost,
                damage: a.damage,
                cost: a.cost,
            })
            .collect(),
        total_combo_cost: scored.iter().map(|a| a.cost).sum(),
        support_combos: is_support.then(|| support_combos(&scored)),
    })
}

fn support_combos(scored: &[RankedAbility<'_>]) -> SupportCombos {
    let is_cc = |a: &&RankedAbility<'_>| a.cc_score > 0;
    let sustains = |a: &&RankedAbility<'_>| a.sustains();

    let peel = scored
        .iter()
        .filter(sustains)
        .chain(scored.iter().filter(|a| is_cc(a) && !a.sustains()))
        .map(RankedAbility::step)
        .collect();
    let engage = scored
        .iter()
        .filter(is_cc)
        .chain(scored.iter().filter(|a| a.damage > 0.0 && !is_cc(a)))
        .map(RankedAbility::step)
        .collect();

    let mut sustain: Vec<&RankedAbility<'_>> = scored.iter().filter(sustains).collect();
    if sustain.is_empty() {
        sustain = scored.iter().collect();
    }
    sustain.sort_by(|a, b| a.cd.total_cmp(&b.cd));

    SupportCombos {
        peel,
        engage,
        sustain: sustain.into_iter().map(RankedAbility::step).collect(),
    }
}
