//! Raw game content as supplied by the data-loading layer.
//!
//! Every type here deserializes from the camelCase JSON the content files use.
//! Numbers that the statistics feed sometimes renders as text (`"55.2%"`,
//! `"1,204 matches"`) are accepted either way through [`WinRate`] and
//! [`MatchCount`].

use crate::text::{first_integer, leading_float};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Stat identifiers used by the item catalog.
pub mod stat {
    pub const PHYSICAL_POWER: &str = "PHYSICAL_POWER";
    pub const MAGICAL_POWER: &str = "MAGICAL_POWER";
    pub const ATTACK_SPEED: &str = "ATTACK_SPEED";
    pub const CRITICAL_CHANCE: &str = "CRITICAL_CHANCE";
    pub const PHYSICAL_PENETRATION: &str = "PHYSICAL_PENETRATION";
    pub const MAGICAL_PENETRATION: &str = "MAGICAL_PENETRATION";
    pub const LIFESTEAL: &str = "LIFESTEAL";
    pub const MAGICAL_LIFESTEAL: &str = "MAGICAL_LIFESTEAL";
    pub const OMNIVAMP: &str = "OMNIVAMP";
    pub const HEALTH: &str = "HEALTH";
    pub const PHYSICAL_ARMOR: &str = "PHYSICAL_ARMOR";
    pub const MAGICAL_ARMOR: &str = "MAGICAL_ARMOR";
    pub const ABILITY_HASTE: &str = "ABILITY_HASTE";
    pub const MANA: &str = "MANA";
    pub const MOVEMENT_SPEED: &str = "MOVEMENT_SPEED";
    pub const BASE_HEALTH_REGENERATION: &str = "BASE_HEALTH_REGENERATION";
    pub const BASE_MANA_REGENERATION: &str = "BASE_MANA_REGENERATION";
    pub const HEAL_AND_SHIELD_POWER: &str = "HEAL_AND_SHIELD_POWER";
    pub const TENACITY: &str = "TENACITY";
    pub const GOLD_PER_SECOND: &str = "GOLD_PER_SECOND";
}

// ============================================================================
// Lenient numbers
// ============================================================================

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(f64),
    Text(String),
    Missing(()),
}

/// Observed win rate in percent.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(from = "NumberOrText", into = "f64")]
pub struct WinRate(pub f64);

impl From<NumberOrText> for WinRate {
    fn from(raw: NumberOrText) -> Self {
        match raw {
            NumberOrText::Number(n) if n.is_finite() => WinRate(n),
            NumberOrText::Text(s) => WinRate(leading_float(&s).unwrap_or(0.0)),
            _ => WinRate(0.0),
        }
    }
}

impl From<WinRate> for f64 {
    fn from(wr: WinRate) -> Self {
        wr.0
    }
}

/// Observed sample size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "NumberOrText", into = "u32")]
pub struct MatchCount(pub u32);

impl From<NumberOrText> for MatchCount {
    fn from(raw: NumberOrText) -> Self {
        match raw {
            NumberOrText::Number(n) if n.is_finite() && n > 0.0 => MatchCount(n.min(u32::MAX as f64) as u32),
            NumberOrText::Text(s) => MatchCount(first_integer(&s).unwrap_or(0)),
            _ => MatchCount(0),
        }
    }
}

impl From<MatchCount> for u32 {
    fn from(m: MatchCount) -> Self {
        m.0
    }
}

/// Confidence-weighted win rate: `winRate × log2(matches + 1)`.
pub fn confidence_score(win_rate: f64, matches: u32) -> f64 {
    win_rate * (f64::from(matches) + 1.0).log2()
}

// ============================================================================
// Items
// ============================================================================

/// Item tier. Ordering follows the in-game progression.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Rarity {
    #[default]
    #[serde(other)]
    Unknown,
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
}

impl Rarity {
    /// Minimum tier counted as a finished item.
    pub const COMPLETED: Rarity = Rarity::Epic;

    pub fn is_completed(self) -> bool {
        self >= Self::COMPLETED
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SlotType {
    #[default]
    Passive,
    Active,
    Crest,
    Trinket,
    #[serde(other)]
    Other,
}

/// One catalog entry. Entries without `data` are placeholders and never indexed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawItem {
    pub slug: String,
    #[serde(default)]
    pub data: Option<ItemData>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemData {
    pub display_name: String,
    #[serde(default)]
    pub rarity: Rarity,
    #[serde(default)]
    pub total_price: Option<u32>,
    #[serde(default)]
    pub slot_type: SlotType,
    #[serde(default)]
    pub stats: Vec<StatValue>,
    #[serde(default)]
    pub effects: Vec<ItemEffect>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatValue {
    pub stat: String,
    pub value: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemEffect {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    /// Trigger or condition text shown alongside the effect.
    #[serde(default)]
    pub condition: Option<String>,
}

// ============================================================================
// Abilities
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AbilityKey {
    Basic,
    Alternate,
    #[default]
    Primary,
    Secondary,
    Ultimate,
    Passive,
    #[serde(other)]
    Other,
}

/// Structured crowd-control record attached to an ability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CcRecord {
    #[serde(rename = "type")]
    pub kind: String,
    /// Duration in seconds, or slow percentage for some slows.
    #[serde(default)]
    pub value: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DamageEntry {
    /// Base damage per rank, rank 1 first.
    #[serde(default)]
    pub values: Vec<f64>,
    #[serde(default)]
    pub scaling: Option<f64>,
    #[serde(default)]
    pub damage_type: Option<String>,
}

/// A hero ability. Per-rank sequences (`cooldowns`, `costs`, damage values)
/// list rank 1 first.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ability {
    pub name: String,
    #[serde(default)]
    pub key: AbilityKey,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub cc: Vec<CcRecord>,
    #[serde(default)]
    pub damage: Vec<DamageEntry>,
    #[serde(default)]
    pub cooldowns: Vec<f64>,
    #[serde(default)]
    pub costs: Vec<f64>,
}

impl Ability {
    /// Base damage of the primary damage entry at a zero-based rank index.
    pub fn damage_at(&self, rank_index: usize) -> Option<f64> {
        self.damage.first().and_then(|d| d.values.get(rank_index)).copied()
    }

    pub fn primary_damage_type(&self) -> Option<&str> {
        self.damage.first().and_then(|d| d.damage_type.as_deref())
    }
}

/// Ability list for one hero, keyed by slug in [`KnowledgeBase::abilities`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HeroAbilitySet {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub abilities: Vec<Ability>,
}

// ============================================================================
// Heroes
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DamageType {
    #[default]
    Physical,
    Magical,
    Hybrid,
}

impl DamageType {
    pub fn as_str(self) -> &'static str {
        match self {
            DamageType::Physical => "physical",
            DamageType::Magical => "magical",
            DamageType::Hybrid => "hybrid",
        }
    }
}

impl std::fmt::Display for DamageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttackType {
    Melee,
    Ranged,
}

/// Alternative ability variant a hero can pick before the match.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Augment {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub traits: Vec<String>,
}

fn default_synergy_weight() -> f64 {
    1.0
}

/// Item tag or stat category the hero wants more of.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynergyPreference {
    pub tag: String,
    #[serde(default = "default_synergy_weight")]
    pub weight: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroProfile {
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub damage_type: DamageType,
    #[serde(default)]
    pub attack_type: Option<AttackType>,
    #[serde(default)]
    pub classes: Vec<String>,
    /// Lane roles such as `CARRY` or `SUPPORT`.
    #[serde(default)]
    pub roles: Vec<String>,
    /// Named ratings on a bounded scale (durability, mobility, ...).
    #[serde(default)]
    pub attributes: BTreeMap<String, f64>,
    #[serde(default)]
    pub base_traits: Vec<String>,
    #[serde(default)]
    pub playstyle: Vec<String>,
    #[serde(default)]
    pub augments: Vec<Augment>,
    #[serde(default)]
    pub synergies: Vec<SynergyPreference>,
    #[serde(default, alias = "hasASSteroid")]
    pub has_as_steroid: bool,
}

impl HeroProfile {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r.eq_ignore_ascii_case(role))
    }

    pub fn has_playstyle(&self, style: &str) -> bool {
        self.playstyle.iter().any(|p| p == style)
    }
}

// ============================================================================
// Statistics
// ============================================================================

/// An immutable build snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Build {
    pub name: String,
    pub items: Vec<String>,
    pub win_rate: f64,
    pub matches: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildTab {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub items: Vec<String>,
    #[serde(default)]
    pub win_rate: WinRate,
    #[serde(default)]
    pub matches: MatchCount,
}

impl BuildTab {
    pub fn to_build(&self) -> Build {
        Build {
            name: self.name.clone(),
            items: self.items.clone(),
            win_rate: self.win_rate.0,
            matches: self.matches.0,
        }
    }
}

/// Named win-rate line: an augment, a crest or a per-slot item candidate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatLine {
    pub name: String,
    #[serde(default)]
    pub win_rate: WinRate,
    #[serde(default)]
    pub matches: MatchCount,
}

/// Head-to-head record against a named opposing hero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CounterStat {
    pub hero: String,
    #[serde(default)]
    pub win_rate: WinRate,
    #[serde(default)]
    pub matches: MatchCount,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleStats {
    #[serde(default)]
    pub build_tabs: Vec<BuildTab>,
    #[serde(default)]
    pub augments: Vec<StatLine>,
    #[serde(default)]
    pub crests: Vec<StatLine>,
    /// Candidates for late slots, keyed `4th`, `5th`, `6th`.
    #[serde(default)]
    pub item_slots: BTreeMap<String, Vec<StatLine>>,
    #[serde(default)]
    pub counters: Vec<CounterStat>,
}

impl RoleStats {
    pub fn total_matches(&self) -> u64 {
        self.build_tabs.iter().map(|b| u64::from(b.matches.0)).sum()
    }

    pub fn counter_against(&self, hero_name: &str) -> Option<&CounterStat> {
        self.counters
            .iter()
            .find(|c| c.hero.to_lowercase() == hero_name.to_lowercase())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroStats {
    #[serde(default)]
    pub active_roles: Vec<String>,
    #[serde(default)]
    pub roles: BTreeMap<String, RoleStats>,
}

impl HeroStats {
    /// Stats for `role`, else the first active role, else the first role on record.
    pub fn role_or_default(&self, role: Option<&str>) -> Option<&RoleStats> {
        role.and_then(|r| self.roles.get(r))
            .or_else(|| self.active_roles.first().and_then(|r| self.roles.get(r)))
            .or_else(|| self.roles.values().next())
    }
}

/// Per-hero statistics keyed by hero slug.
pub type HeroDataMap = BTreeMap<String, HeroStats>;

/// Static content the engine is built from.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KnowledgeBase {
    #[serde(default)]
    pub items: Vec<RawItem>,
    #[serde(default)]
    pub heroes: Vec<HeroProfile>,
    #[serde(default)]
    pub abilities: BTreeMap<String, HeroAbilitySet>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_win_rate_accepts_number_and_text() {
        let tab: BuildTab =
            serde_json::from_str(r#"{"name":"A","items":[],"winRate":"55.2%","matches":"1204 matches"}"#)
                .expect("parse text tab");
        assert!((tab.win_rate.0 - 55.2).abs() < 1e-9);
        assert_eq!(tab.matches.0, 1204);

        let tab: BuildTab =
            serde_json::from_str(r#"{"name":"B","items":[],"winRate":48,"matches":12}"#).expect("parse numeric tab");
        assert_eq!(tab.win_rate.0, 48.0);
        assert_eq!(tab.matches.0, 12);
    }

    #[test]
    fn test_unparseable_numbers_fall_back_to_zero() {
        let line: StatLine =
            serde_json::from_str(r#"{"name":"X","winRate":"n/a","matches":null}"#).expect("parse");
        assert_eq!(line.win_rate.0, 0.0);
        assert_eq!(line.matches.0, 0);
    }

    #[test]
    fn test_rarity_ordering_and_unknown_tier() {
        assert!(Rarity::Legendary > Rarity::Epic);
        assert!(Rarity::Epic.is_completed());
        assert!(!Rarity::Rare.is_completed());
        let r: Rarity = serde_json::from_str(r#""MYTHIC""#).expect("unknown rarity");
        assert_eq!(r, Rarity::Unknown);
    }

    #[test]
    fn test_hero_profile_defaults() {
        let hero: HeroProfile = serde_json::from_str(
            r#"{"slug":"grux","name":"Grux","hasASSteroid":true,"synergies":[{"tag":"sustain"}]}"#,
        )
        .expect("parse profile");
        assert_eq!(hero.damage_type, DamageType::Physical);
        assert!(hero.has_as_steroid);
        assert_eq!(hero.synergies[0].weight, 1.0);
    }

    #[test]
    fn test_role_or_default_prefers_requested_then_active() {
        let mut stats = HeroStats {
            active_roles: vec!["carry".into()],
            ..Default::default()
        };
        stats.roles.insert("carry".into(), RoleStats::default());
        stats.roles.insert("midlane".into(), RoleStats {
            crests: vec![StatLine { name: "Crest".into(), ..Default::default() }],
            ..Default::default()
        });

        assert_eq!(stats.role_or_default(Some("midlane")).map(|r| r.crests.len()), Some(1));
        assert_eq!(stats.role_or_default(Some("jungle")).map(|r| r.crests.len()), Some(0));
    }

    #[test]
    fn test_confidence_score_grows_with_sample_size() {
        assert!(confidence_score(50.0, 100) > confidence_score(50.0, 3));
        assert_eq!(confidence_score(50.0, 0), 0.0);
    }
}
