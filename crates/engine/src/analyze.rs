//! Build threat analysis.
//!
//! Turns a list of item names into a [`ThreatProfile`]: summed stats,
//! capability flags, and the ordered threats and weaknesses those imply.

use scout_catalog::{stat, DamageType, EffectTag, HeroProfile, ItemIndex};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

// ============================================================================
// Thresholds
// ============================================================================

const HIGH_PHYSICAL_POWER: f64 = 60.0;
const HIGH_MAGICAL_POWER: f64 = 80.0;
const ON_HIT_ATTACK_SPEED: f64 = 20.0;
const TANKY_HEALTH: f64 = 400.0;
const TANKY_ARMOR: f64 = 40.0;
const NO_DEFENSE_ARMOR: f64 = 20.0;
const NO_DEFENSE_MAGIC_RESIST: f64 = 20.0;
const ATTACK_SPEED_RELIANCE: f64 = 30.0;
const SQUISHY_HEALTH: f64 = 300.0;

/// Stat thresholds behind threat and weakness detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub high_physical_power: f64,
    pub high_magical_power: f64,
    /// Attack speed above which an on-hit build counts as a DPS threat.
    pub on_hit_attack_speed: f64,
    pub tanky_health: f64,
    pub tanky_armor: f64,
    pub no_defense_armor: f64,
    pub no_defense_magic_resist: f64,
    /// Attack speed above which a non-crit build depends on it.
    pub attack_speed_reliance: f64,
    /// Health below which a defenseless build reads as squishy.
    pub squishy_health: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            high_physical_power: HIGH_PHYSICAL_POWER,
            high_magical_power: HIGH_MAGICAL_POWER,
            on_hit_attack_speed: ON_HIT_ATTACK_SPEED,
            tanky_health: TANKY_HEALTH,
            tanky_armor: TANKY_ARMOR,
            no_defense_armor: NO_DEFENSE_ARMOR,
            no_defense_magic_resist: NO_DEFENSE_MAGIC_RESIST,
            attack_speed_reliance: ATTACK_SPEED_RELIANCE,
            squishy_health: SQUISHY_HEALTH,
        }
    }
}

// ============================================================================
// Threats and weaknesses
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Threat {
    #[serde(rename = "high physical damage")]
    HighPhysicalDamage,
    #[serde(rename = "high magic damage")]
    HighMagicDamage,
    #[serde(rename = "on-hit DPS")]
    OnHitDps,
    #[serde(rename = "crit burst")]
    CritBurst,
    #[serde(rename = "heals a lot")]
    HealsALot,
    #[serde(rename = "shreds your armor")]
    ShredsArmor,
    #[serde(rename = "AoE damage")]
    AoeDamage,
    #[serde(rename = "hard to kill")]
    HardToKill,
}

impl Threat {
    /// Detection order.
    pub const ALL: [Threat; 8] = [
        Threat::HighPhysicalDamage,
        Threat::HighMagicDamage,
        Threat::OnHitDps,
        Threat::CritBurst,
        Threat::HealsALot,
        Threat::ShredsArmor,
        Threat::AoeDamage,
        Threat::HardToKill,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Threat::HighPhysicalDamage => "high physical damage",
            Threat::HighMagicDamage => "high magic damage",
            Threat::OnHitDps => "on-hit DPS",
            Threat::CritBurst => "crit burst",
            Threat::HealsALot => "heals a lot",
            Threat::ShredsArmor => "shreds your armor",
            Threat::AoeDamage => "AoE damage",
            Threat::HardToKill => "hard to kill",
        }
    }

    fn detected(self, p: &ThreatProfile, t: &Thresholds) -> bool {
        match self {
            Threat::HighPhysicalDamage => p.total_physical_power > t.high_physical_power || p.has_crit,
            Threat::HighMagicDamage => p.total_magical_power > t.high_magical_power,
            Threat::OnHitDps => p.has_on_hit && p.total_attack_speed > t.on_hit_attack_speed,
            Threat::CritBurst => p.has_crit,
            Threat::HealsALot => p.has_sustain,
            Threat::ShredsArmor => p.has_pen,
            Threat::AoeDamage => p.has_cleave,
            Threat::HardToKill => p.total_health > t.tanky_health || p.total_armor > t.tanky_armor,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Weakness {
    CantCutYourHealing,
    NoDefenses,
    DiesToCc,
    NeedsAttackSpeed,
    ReliesOnCrit,
    HealingIsCounterable,
}

impl Weakness {
    /// Detection order.
    pub const ALL: [Weakness; 6] = [
        Weakness::CantCutYourHealing,
        Weakness::NoDefenses,
        Weakness::DiesToCc,
        Weakness::NeedsAttackSpeed,
        Weakness::ReliesOnCrit,
        Weakness::HealingIsCounterable,
    ];

    fn detected(self, p: &ThreatProfile, t: &Thresholds) -> bool {
        match self {
            Weakness::CantCutYourHealing => !p.has_anti_heal,
            Weakness::NoDefenses => p.total_armor < t.no_defense_armor && p.total_magic_resist < t.no_defense_magic_resist,
            Weakness::DiesToCc => !p.has_tenacity,
            Weakness::NeedsAttackSpeed => p.total_attack_speed > t.attack_speed_reliance && !p.has_crit,
            Weakness::ReliesOnCrit => p.has_crit,
            Weakness::HealingIsCounterable => p.has_sustain && !p.has_anti_heal,
        }
    }
}

// ============================================================================
// Profile
// ============================================================================

/// What a build can do, and where it is exposed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreatProfile {
    pub total_physical_power: f64,
    pub total_magical_power: f64,
    pub total_armor: f64,
    pub total_magic_resist: f64,
    pub total_health: f64,
    pub total_attack_speed: f64,
    /// Every stat summed across resolved items.
    pub stat_totals: BTreeMap<String, f64>,
    pub has_crit: bool,
    pub has_on_hit: bool,
    pub has_anti_heal: bool,
    pub has_sustain: bool,
    pub has_shield: bool,
    pub has_pen: bool,
    pub has_tenacity: bool,
    pub has_cleave: bool,
    pub primary_damage_type: DamageType,
    pub effect_tags: BTreeSet<EffectTag>,
    #[serde(rename = "threatProfile")]
    pub threats: Vec<Threat>,
    pub weaknesses: Vec<Weakness>,
    pub resolved_items: Vec<String>,
    pub unresolved_items: Vec<String>,
}

impl ThreatProfile {
    fn empty(primary_damage_type: DamageType) -> Self {
        Self {
            total_physical_power: 0.0,
            total_magical_power: 0.0,
            total_armor: 0.0,
            total_magic_resist: 0.0,
            total_health: 0.0,
            total_attack_speed: 0.0,
            stat_totals: BTreeMap::new(),
            has_crit: false,
            has_on_hit: false,
            has_anti_heal: false,
            has_sustain: false,
            has_shield: false,
            has_pen: false,
            has_tenacity: false,
            has_cleave: false,
            primary_damage_type,
            effect_tags: BTreeSet::new(),
            threats: Vec::new(),
            weaknesses: Vec::new(),
            resolved_items: Vec::new(),
            unresolved_items: Vec::new(),
        }
    }

    pub fn has_threat(&self, threat: Threat) -> bool {
        self.threats.contains(&threat)
    }

    pub fn has_weakness(&self, weakness: Weakness) -> bool {
        self.weaknesses.contains(&weakness)
    }

    /// Low armor, low magic resist and little health.
    pub fn is_squishy(&self, t: &Thresholds) -> bool {
        self.total_armor < t.no_defense_armor
            && self.total_magic_resist < t.no_defense_magic_resist
            && self.total_health < t.squishy_health
    }
}

/// Analyzes a build. Unknown item names are skipped and listed in
/// `unresolved_items`. Without a hero the damage type defaults to physical.
pub fn analyze_build<S: AsRef<str>>(
    index: &ItemIndex,
    items: &[S],
    hero: Option<&HeroProfile>,
    thresholds: &Thresholds,
) -> ThreatProfile {
    let mut p = ThreatProfile::empty(hero.map(|h| h.damage_type).unwrap_or_default());

    for name in items {
        let name = name.as_ref();
        let Some(item) = index.get(name) else {
            tracing::debug!(target: "scout::analyze", item = name, "Skipping unknown item");
            p.unresolved_items.push(name.to_string());
            continue;
        };
        p.resolved_items.push(item.name.clone());

        for (id, value) in &item.stats {
            *p.stat_totals.entry(id.clone()).or_insert(0.0) += value;
            match id.as_str() {
                stat::PHYSICAL_POWER => p.total_physical_power += value,
                stat::MAGICAL_POWER => p.total_magical_power += value,
                stat::PHYSICAL_ARMOR => p.total_armor += value,
                stat::MAGICAL_ARMOR => p.total_magic_resist += value,
                stat::HEALTH => p.total_health += value,
                stat::ATTACK_SPEED => p.total_attack_speed += value,
                stat::CRITICAL_CHANCE => p.has_crit = true,
                _ => {}
            }
        }

        for tag in &item.tags {
            p.effect_tags.insert(*tag);
            match tag {
                EffectTag::OnHit => p.has_on_hit = true,
                EffectTag::AntiHeal => p.has_anti_heal = true,
                EffectTag::Sustain => p.has_sustain = true,
                EffectTag::Shield => p.has_shield = true,
                EffectTag::Pen => p.has_pen = true,
                EffectTag::Tenacity => p.has_tenacity = true,
                EffectTag::Cleave => p.has_cleave = true,
                EffectTag::Crit => p.has_crit = true,
                _ => {}
            }
        }
    }

    p.threats = Threat::ALL.into_iter().filter(|t| t.detected(&p, thresholds)).collect();
    p.weaknesses = Weakness::ALL.into_iter().filter(|w| w.detected(&p, thresholds)).collect();
    p
}

// ============================================================================
// Lane aggregate
// ============================================================================

/// Union of several enemy profiles, for two-versus-two lanes.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LaneThreats {
    pub has_sustain: bool,
    pub has_crit: bool,
    pub has_on_hit: bool,
    pub has_pen: bool,
    pub primary_physical: bool,
    pub primary_magical: bool,
    /// Deduplicated, in first-seen order.
    pub threats: Vec<Threat>,
    pub weaknesses: Vec<Weakness>,
}

impl LaneThreats {
    pub fn from_profiles<'a>(profiles: impl IntoIterator<Item = &'a ThreatProfile>) -> Self {
        let mut lane = LaneThreats::default();
        for p in profiles {
            lane.has_sustain |= p.has_sustain;
            lane.has_crit |= p.has_crit;
            lane.has_on_hit |= p.has_on_hit;
            lane.has_pen |= p.has_pen;
            lane.primary_physical |= p.primary_damage_type == DamageType::Physical;
            lane.primary_magical |= p.primary_damage_type == DamageType::Magical;
            for t in &p.threats {
                if !lane.threats.contains(t) {
                    lane.threats.push(*t);
                }
            }
            for w in &p.weaknesses {
                if !lane.weaknesses.contains(w) {
                    lane.weaknesses.push(*w);
                }
            }
        }
        lane
    }

    pub fn has_threat(&self, threat: Threat) -> bool {
        self.threats.contains(&threat)
    }

    pub fn has_weakness(&self, weakness: Weakness) -> bool {
        self.weaknesses.contains(&weakness)
    }

    /// Damage type crests are judged against: physical if any enemy deals it.
    pub fn dominant_damage_type(&self) -> DamageType {
        if self.primary_physical {
            DamageType::Physical
        } else {
            DamageType::Magical
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scout_test_utils::{sample_index, HeroBuilder};

    #[test]
    fn test_lifesteal_build_has_sustain_and_no_anti_heal() {
        let index = sample_index();
        let p = analyze_build(&index, &["Bloodletter"], None, &Thresholds::default());
        assert!(p.has_sustain);
        assert!(p.has_weakness(Weakness::CantCutYourHealing));
        assert!(p.has_weakness(Weakness::HealingIsCounterable));
        assert!(p.has_threat(Threat::HealsALot));
    }

    #[test]
    fn test_unknown_items_are_recorded_not_fatal() {
        let index = sample_index();
        let p = analyze_build(&index, &["Bloodletter", "Nonexistent Relic"], None, &Thresholds::default());
        assert_eq!(p.resolved_items, vec!["Bloodletter".to_string()]);
        assert_eq!(p.unresolved_items, vec!["Nonexistent Relic".to_string()]);
    }

    #[test]
    fn test_empty_build_has_only_baseline_weaknesses() {
        let index = sample_index();
        let p = analyze_build::<&str>(&index, &[], None, &Thresholds::default());
        assert!(p.threats.is_empty());
        assert_eq!(
            p.weaknesses,
            vec![Weakness::CantCutYourHealing, Weakness::NoDefenses, Weakness::DiesToCc]
        );
        assert_eq!(p.primary_damage_type, DamageType::Physical);
    }

    #[test]
    fn test_hero_damage_type_is_used() {
        let index = sample_index();
        let hero = HeroBuilder::new("muriel", "Muriel").damage_type(DamageType::Magical).build();
        let p = analyze_build::<&str>(&index, &[], Some(&hero), &Thresholds::default());
        assert_eq!(p.primary_damage_type, DamageType::Magical);
    }

    #[test]
    fn test_threats_follow_detection_order() {
        let index = sample_index();
        let p = analyze_build(&index, &["Sky Splitter", "Bloodletter", "Stonewall"], None, &Thresholds::default());
        let positions: Vec<usize> = p
            .threats
            .iter()
            .map(|t| Threat::ALL.iter().position(|x| x == t).expect("known threat"))
            .collect();
        let mut sorted = positions.clone();
        sorted.sort_unstable();
        assert_eq!(positions, sorted);
        assert!(p.has_threat(Threat::HighPhysicalDamage));
        assert!(p.has_threat(Threat::HardToKill));
    }

    #[test]
    fn test_thresholds_are_configurable() {
        let index = sample_index();
        let strict = Thresholds {
            high_physical_power: 1000.0,
            ..Default::default()
        };
        let p = analyze_build(&index, &["Bloodletter"], None, &strict);
        assert!(!p.has_threat(Threat::HighPhysicalDamage));
    }

    #[test]
    fn test_threat_labels_serialize_verbatim() {
        let json = serde_json::to_string(&vec![Threat::OnHitDps, Threat::AoeDamage]).expect("serialize");
        assert_eq!(json, r#"["on-hit DPS","AoE damage"]"#);
        let json = serde_json::to_string(&Weakness::CantCutYourHealing).expect("serialize");
        assert_eq!(json, r#""cant_cut_your_healing""#);
    }

    #[test]
    fn test_lane_threats_union_without_duplicates() {
        let index = sample_index();
        let t = Thresholds::default();
        let bruiser = analyze_build(&index, &["Bloodletter", "Stonewall"], None, &t);
        let mage = HeroBuilder::new("gideon", "Gideon").damage_type(DamageType::Magical).build();
        let caster = analyze_build(&index, &["Mindrazor Orb"], Some(&mage), &t);
        let lane = LaneThreats::from_profiles([&bruiser, &caster]);
        assert!(lane.has_sustain);
        assert!(lane.has_pen);
        assert!(lane.primary_physical && lane.primary_magical);
        let dies = lane.weaknesses.iter().filter(|w| **w == Weakness::DiesToCc).count();
        assert_eq!(dies, 1);
        assert_eq!(lane.dominant_damage_type(), DamageType::Physical);
    }

    #[test]
    fn test_empty_lane() {
        let lane = LaneThreats::from_profiles(std::iter::empty());
        assert!(!lane.has_sustain);
        assert!(lane.threats.is_empty());
        assert_eq!(lane.dominant_damage_type(), DamageType::Magical);
    }
}
