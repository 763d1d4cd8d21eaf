//! Indexed item catalog.
//!
//! Every item with a data payload is indexed once with derived semantic tags,
//! coarse stat categories and a gold-efficiency score. The index is read-only
//! after construction.

use crate::rules::{pat, pat_unless, CompiledRules, PatternRule};
use crate::text::clean_game_text;
use crate::types::{stat, ItemData, Rarity, RawItem, SlotType};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::LazyLock;

// ============================================================================
// Tags and categories
// ============================================================================

/// Semantic effect tag derived from item stats and effect text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectTag {
    AntiHeal,
    PhysicalShred,
    MagicalShred,
    OnHit,
    Sustain,
    Shield,
    Mobility,
    Cc,
    Cleave,
    Burst,
    Crit,
    TrueDamage,
    Aura,
    Mana,
    CooldownReduction,
    PercentHealth,
    Tenacity,
    Pen,
    AttackSpeed,
}

impl EffectTag {
    pub fn as_str(self) -> &'static str {
        match self {
            EffectTag::AntiHeal => "anti_heal",
            EffectTag::PhysicalShred => "physical_shred",
            EffectTag::MagicalShred => "magical_shred",
            EffectTag::OnHit => "on_hit",
            EffectTag::Sustain => "sustain",
            EffectTag::Shield => "shield",
            EffectTag::Mobility => "mobility",
            EffectTag::Cc => "cc",
            EffectTag::Cleave => "cleave",
            EffectTag::Burst => "burst",
            EffectTag::Crit => "crit",
            EffectTag::TrueDamage => "true_damage",
            EffectTag::Aura => "aura",
            EffectTag::Mana => "mana",
            EffectTag::CooldownReduction => "cooldown_reduction",
            EffectTag::PercentHealth => "percent_health",
            EffectTag::Tenacity => "tenacity",
            EffectTag::Pen => "pen",
            EffectTag::AttackSpeed => "attack_speed",
        }
    }
}

/// Coarse grouping of an item's stats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatCategory {
    OffensePhysical,
    OffenseMagical,
    Sustain,
    Defense,
    DefensePhysical,
    DefenseMagical,
    Utility,
    Support,
}

impl StatCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            StatCategory::OffensePhysical => "offense_physical",
            StatCategory::OffenseMagical => "offense_magical",
            StatCategory::Sustain => "sustain",
            StatCategory::Defense => "defense",
            StatCategory::DefensePhysical => "defense_physical",
            StatCategory::DefenseMagical => "defense_magical",
            StatCategory::Utility => "utility",
            StatCategory::Support => "support",
        }
    }
}

// ============================================================================
// Rule tables
// ============================================================================

/// Effect-text rules, evaluated in order against the cleaned effect text.
pub const EFFECT_TAG_RULES: &[PatternRule<EffectTag>] = &[
    PatternRule { label: EffectTag::AntiHeal, patterns: &[pat("reduce.*healing"), pat("grievous"), pat("blighted")] },
    PatternRule {
        label: EffectTag::PhysicalShred,
        patterns: &[pat("reduce.*physical armor"), pat("physical armor.*reduc"), pat("shred.*physical")],
    },
    PatternRule {
        label: EffectTag::MagicalShred,
        patterns: &[pat("reduce.*magical armor"), pat("magical armor.*reduc"), pat("shred.*magic")],
    },
    PatternRule {
        label: EffectTag::OnHit,
        patterns: &[pat("on basic attack"), pat("on-hit"), pat("basic attack.*deal"), pat("on attacking")],
    },
    PatternRule {
        label: EffectTag::Sustain,
        patterns: &[
            pat_unless("heal", "ing.*reduc"),
            pat("lifesteal"),
            pat("omnivamp"),
            pat("life steal"),
            pat("restore.*health"),
        ],
    },
    PatternRule { label: EffectTag::Shield, patterns: &[pat("shield"), pat("barrier")] },
    PatternRule {
        label: EffectTag::Mobility,
        patterns: &[pat("movement speed"), pat("dash"), pat("blink"), pat("sprint")],
    },
    PatternRule {
        label: EffectTag::Cc,
        patterns: &[pat("slow"), pat("stun"), pat("root"), pat("silence"), pat("pull"), pat("knockback")],
    },
    PatternRule {
        label: EffectTag::Cleave,
        patterns: &[pat("cleave"), pat("splash"), pat("area.*damage"), pat("nearby enem")],
    },
    PatternRule { label: EffectTag::Burst, patterns: &[pat("bonus damage"), pat("execute"), pat("empower.*next")] },
    PatternRule { label: EffectTag::Crit, patterns: &[pat("critical"), pat("crit")] },
    PatternRule { label: EffectTag::TrueDamage, patterns: &[pat("true damage")] },
    PatternRule { label: EffectTag::Aura, patterns: &[pat("aura"), pat("nearby all")] },
    PatternRule { label: EffectTag::Mana, patterns: &[pat("mana")] },
    PatternRule { label: EffectTag::CooldownReduction, patterns: &[pat("ability haste"), pat("cooldown")] },
    PatternRule {
        label: EffectTag::PercentHealth,
        patterns: &[pat("maximum health"), pat("max health"), pat("% health")],
    },
    PatternRule { label: EffectTag::Tenacity, patterns: &[pat("tenacity"), pat("crowd control.*reduc")] },
    PatternRule { label: EffectTag::Pen, patterns: &[pat("penetrat"), pat("lethality")] },
];

/// Tags implied by the presence of a stat.
pub const STAT_TAGS: &[(&str, EffectTag)] = &[
    (stat::LIFESTEAL, EffectTag::Sustain),
    (stat::OMNIVAMP, EffectTag::Sustain),
    (stat::MAGICAL_LIFESTEAL, EffectTag::Sustain),
    (stat::PHYSICAL_PENETRATION, EffectTag::Pen),
    (stat::MAGICAL_PENETRATION, EffectTag::Pen),
    (stat::CRITICAL_CHANCE, EffectTag::Crit),
    (stat::ATTACK_SPEED, EffectTag::AttackSpeed),
    (stat::ABILITY_HASTE, EffectTag::CooldownReduction),
    (stat::HEAL_AND_SHIELD_POWER, EffectTag::Shield),
];

pub const STAT_CATEGORIES: &[(&str, StatCategory)] = &[
    (stat::PHYSICAL_POWER, StatCategory::OffensePhysical),
    (stat::MAGICAL_POWER, StatCategory::OffenseMagical),
    (stat::ATTACK_SPEED, StatCategory::OffensePhysical),
    (stat::CRITICAL_CHANCE, StatCategory::OffensePhysical),
    (stat::PHYSICAL_PENETRATION, StatCategory::OffensePhysical),
    (stat::MAGICAL_PENETRATION, StatCategory::OffenseMagical),
    (stat::LIFESTEAL, StatCategory::Sustain),
    (stat::MAGICAL_LIFESTEAL, StatCategory::Sustain),
    (stat::OMNIVAMP, StatCategory::Sustain),
    (stat::HEALTH, StatCategory::Defense),
    (stat::PHYSICAL_ARMOR, StatCategory::DefensePhysical),
    (stat::MAGICAL_ARMOR, StatCategory::DefenseMagical),
    (stat::ABILITY_HASTE, StatCategory::Utility),
    (stat::MANA, StatCategory::Utility),
    (stat::MOVEMENT_SPEED, StatCategory::Utility),
    (stat::BASE_HEALTH_REGENERATION, StatCategory::Sustain),
    (stat::BASE_MANA_REGENERATION, StatCategory::Utility),
    (stat::HEAL_AND_SHIELD_POWER, StatCategory::Support),
    (stat::TENACITY, StatCategory::Defense),
    (stat::GOLD_PER_SECOND, StatCategory::Utility),
];

/// Gold value of one point of each stat.
pub const GOLD_PER_STAT: &[(&str, f64)] = &[
    (stat::PHYSICAL_POWER, 43.3),
    (stat::MAGICAL_POWER, 21.7),
    (stat::ATTACK_SPEED, 30.0),
    (stat::HEALTH, 2.67),
    (stat::MANA, 2.33),
    (stat::PHYSICAL_ARMOR, 20.0),
    (stat::MAGICAL_ARMOR, 20.0),
    (stat::ABILITY_HASTE, 50.0),
    (stat::CRITICAL_CHANCE, 40.0),
    (stat::PHYSICAL_PENETRATION, 50.0),
    (stat::MAGICAL_PENETRATION, 50.0),
    (stat::LIFESTEAL, 75.0),
    (stat::MAGICAL_LIFESTEAL, 75.0),
    (stat::OMNIVAMP, 100.0),
    (stat::MOVEMENT_SPEED, 100.0),
    (stat::BASE_HEALTH_REGENERATION, 100.0),
    (stat::BASE_MANA_REGENERATION, 100.0),
    (stat::HEAL_AND_SHIELD_POWER, 50.0),
    (stat::TENACITY, 50.0),
    (stat::GOLD_PER_SECOND, 500.0),
];

/// Name prefixes of item groups that share a non-stacking passive.
pub const ITEM_FAMILY_PREFIXES: &[&str] = &["Tainted", "Ashenblade", "Hexbound", "Oathkeeper", "Mindrazor"];

// RATIONALE: compile-time constant patterns; `.expect()` cannot fire.
static EFFECT_TAG_MATCHERS: LazyLock<CompiledRules<EffectTag>> = LazyLock::new(|| {
    CompiledRules::compile(EFFECT_TAG_RULES).expect("EFFECT_TAG_RULES: compile-time constant")
});

/// Family prefix of an item name (`"Tainted Scepter"` -> `Some("Tainted")`).
pub fn item_family(name: &str) -> Option<&'static str> {
    ITEM_FAMILY_PREFIXES.iter().copied().find(|prefix| {
        name.strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with(' '))
    })
}

/// Effect text and conditions, cleaned and joined.
pub fn effect_text(data: &ItemData) -> String {
    data.effects
        .iter()
        .map(|e| {
            format!(
                "{} {}",
                clean_game_text(e.text.as_deref().unwrap_or_default()),
                clean_game_text(e.condition.as_deref().unwrap_or_default())
            )
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Semantic tags of an item. Pure function of stats and effects.
pub fn derive_tags(data: &ItemData) -> BTreeSet<EffectTag> {
    let mut tags: BTreeSet<EffectTag> = data
        .stats
        .iter()
        .flat_map(|s| {
            STAT_TAGS
                .iter()
                .filter(move |(id, _)| *id == s.stat)
                .map(|(_, tag)| *tag)
        })
        .collect();
    let text = effect_text(data);
    tags.extend(EFFECT_TAG_MATCHERS.matching(&text));
    tags
}

pub fn derive_stat_categories(data: &ItemData) -> BTreeSet<StatCategory> {
    data.stats
        .iter()
        .filter_map(|s| {
            STAT_CATEGORIES
                .iter()
                .find(|(id, _)| *id == s.stat)
                .map(|(_, cat)| *cat)
        })
        .collect()
}

/// Stat value expressed in gold relative to the item's price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoldEfficiency {
    pub stat_value: f64,
    pub total_price: u32,
    /// Percentage, rounded. Above 100 means the stats alone are worth more than the price.
    pub efficiency: i64,
}

/// `None` when the item has no price.
pub fn gold_efficiency(data: &ItemData) -> Option<GoldEfficiency> {
    let price = data.total_price.filter(|p| *p > 0)?;
    let stat_value: f64 = data
        .stats
        .iter()
        .filter_map(|s| {
            GOLD_PER_STAT
                .iter()
                .find(|(id, _)| *id == s.stat)
                .map(|(_, gold)| s.value * gold)
        })
        .sum();
    Some(GoldEfficiency {
        stat_value: stat_value.round(),
        total_price: price,
        efficiency: (stat_value / f64::from(price) * 100.0).round() as i64,
    })
}

// ============================================================================
// Index
// ============================================================================

/// An item with its derived attributes.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexedItem {
    pub slug: String,
    pub name: String,
    pub rarity: Rarity,
    pub price: Option<u32>,
    pub slot_type: SlotType,
    pub stats: BTreeMap<String, f64>,
    pub tags: BTreeSet<EffectTag>,
    pub stat_categories: BTreeSet<StatCategory>,
    pub gold_efficiency: Option<GoldEfficiency>,
    pub family: Option<&'static str>,
}

impl IndexedItem {
    pub fn from_raw(slug: &str, data: &ItemData) -> Self {
        Self {
            slug: slug.to_string(),
            name: data.display_name.clone(),
            rarity: data.rarity,
            price: data.total_price,
            slot_type: data.slot_type,
            stats: data.stats.iter().map(|s| (s.stat.clone(), s.value)).collect(),
            tags: derive_tags(data),
            stat_categories: derive_stat_categories(data),
            gold_efficiency: gold_efficiency(data),
            family: item_family(&data.display_name),
        }
    }

    pub fn has_tag(&self, tag: EffectTag) -> bool {
        self.tags.contains(&tag)
    }

    pub fn in_category(&self, category: StatCategory) -> bool {
        self.stat_categories.contains(&category)
    }

    /// Matches a free-form label against both tags and categories.
    pub fn has_label(&self, label: &str) -> bool {
        self.tags.iter().any(|t| t.as_str() == label)
            || self.stat_categories.iter().any(|c| c.as_str() == label)
    }

    pub fn is_offensive(&self) -> bool {
        self.in_category(StatCategory::OffensePhysical) || self.in_category(StatCategory::OffenseMagical)
    }

    /// Any defensive category: health, armor or magic armor.
    pub fn is_defensive(&self) -> bool {
        self.in_category(StatCategory::Defense)
            || self.in_category(StatCategory::DefensePhysical)
            || self.in_category(StatCategory::DefenseMagical)
    }

    pub fn stat(&self, id: &str) -> f64 {
        self.stats.get(id).copied().unwrap_or(0.0)
    }

    pub fn is_crest(&self) -> bool {
        self.slot_type == SlotType::Crest
    }

    pub fn efficiency(&self) -> Option<i64> {
        self.gold_efficiency.map(|g| g.efficiency)
    }
}

/// Read-only item catalog with lookup tables.
#[derive(Debug, Clone, Default)]
pub struct ItemIndex {
    items: Vec<IndexedItem>,
    by_slug: HashMap<String, usize>,
    by_name: HashMap<String, usize>,
    by_lower_name: HashMap<String, usize>,
    by_tag: BTreeMap<EffectTag, Vec<usize>>,
    by_category: BTreeMap<StatCategory, Vec<usize>>,
}

impl ItemIndex {
    pub fn build(raw: &[RawItem]) -> Self {
        let mut index = Self::default();
        let mut skipped = 0usize;

        for item in raw {
            let Some(data) = &item.data else {
                skipped += 1;
                continue;
            };
            let indexed = IndexedItem::from_raw(&item.slug, data);
            let pos = index.items.len();
            index.by_slug.insert(indexed.slug.clone(), pos);
            index.by_name.insert(indexed.name.clone(), pos);
            index.by_lower_name.insert(indexed.name.to_lowercase(), pos);
            for tag in &indexed.tags {
                index.by_tag.entry(*tag).or_default().push(pos);
            }
            for cat in &indexed.stat_categories {
                index.by_category.entry(*cat).or_default().push(pos);
            }
            index.items.push(indexed);
        }

        tracing::debug!(
            target: "scout::index",
            indexed = index.items.len(),
            skipped,
            "Built item index"
        );
        index
    }

    /// Looks up by slug, then display name, then case-insensitive display name.
    pub fn get(&self, key: &str) -> Option<&IndexedItem> {
        self.by_slug
            .get(key)
            .or_else(|| self.by_name.get(key))
            .or_else(|| self.by_lower_name.get(&key.to_lowercase()))
            .map(|&i| &self.items[i])
    }

    pub fn items(&self) -> &[IndexedItem] {
        &self.items
    }

    pub fn find_by_tag(&self, tag: EffectTag) -> impl Iterator<Item = &IndexedItem> {
        self.by_tag
            .get(&tag)
            .into_iter()
            .flatten()
            .map(|&i| &self.items[i])
    }

    pub fn find_by_category(&self, category: StatCategory) -> impl Iterator<Item = &IndexedItem> {
        self.by_category
            .get(&category)
            .into_iter()
            .flatten()
            .map(|&i| &self.items[i])
    }

    /// Finished items (rarity at least epic), crests excluded.
    pub fn completed_items(&self) -> Vec<&IndexedItem> {
        self.items
            .iter()
            .filter(|i| i.rarity.is_completed() && !i.is_crest())
            .collect()
    }

    /// Finished crests.
    pub fn completed_crests(&self) -> Vec<&IndexedItem> {
        self.items
            .iter()
            .filter(|i| i.rarity.is_completed() && i.is_crest())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ItemEffect, StatValue};

    fn data(name: &str, stats: &[(&str, f64)], effects: &[&str]) -> ItemData {
        ItemData {
            display_name: name.to_string(),
            rarity: Rarity::Legendary,
            total_price: Some(3000),
            slot_type: SlotType::Passive,
            stats: stats
                .iter()
                .map(|(s, v)| StatValue { stat: s.to_string(), value: *v })
                .collect(),
            effects: effects
                .iter()
                .map(|t| ItemEffect { text: Some(t.to_string()), ..Default::default() })
                .collect(),
        }
    }

    // ------------------------------------------------------------------
    // Tag derivation
    // ------------------------------------------------------------------

    #[test]
    fn test_lifesteal_stat_implies_sustain() {
        let d = data("Bloodletter", &[(stat::LIFESTEAL, 10.0)], &[]);
        assert!(derive_tags(&d).contains(&EffectTag::Sustain));
    }

    #[test]
    fn test_healing_reduction_text_is_anti_heal_not_sustain() {
        let d = data("Tainted Blade", &[], &["Applies <b>Blighted</b>, causing healing reduction of 40%."]);
        let tags = derive_tags(&d);
        assert!(tags.contains(&EffectTag::AntiHeal));
        assert!(!tags.contains(&EffectTag::Sustain), "healing reduction is not sustain: {tags:?}");
    }

    #[test]
    fn test_condition_text_is_scanned() {
        let mut d = data("Storm", &[], &["Deals bonus damage."]);
        d.effects[0].condition = Some("On basic attack".into());
        let tags = derive_tags(&d);
        assert!(tags.contains(&EffectTag::OnHit));
        assert!(tags.contains(&EffectTag::Burst));
    }

    #[test]
    fn test_tags_are_stable_across_derivations() {
        let d = data(
            "Sky Splitter",
            &[(stat::ATTACK_SPEED, 25.0), (stat::PHYSICAL_POWER, 40.0)],
            &["On-hit: deal 4% max health as bonus damage."],
        );
        assert_eq!(derive_tags(&d), derive_tags(&d));
        assert_eq!(derive_stat_categories(&d), derive_stat_categories(&d));
    }

    #[test]
    fn test_stat_categories() {
        let d = data("Plate", &[(stat::PHYSICAL_ARMOR, 40.0), (stat::HEALTH, 200.0)], &[]);
        let cats = derive_stat_categories(&d);
        assert!(cats.contains(&StatCategory::DefensePhysical));
        assert!(cats.contains(&StatCategory::Defense));
        assert_eq!(cats.len(), 2);
    }

    // ------------------------------------------------------------------
    // Gold efficiency
    // ------------------------------------------------------------------

    #[test]
    fn test_gold_efficiency_is_percentage() {
        let d = data("Blade", &[(stat::PHYSICAL_POWER, 60.0), (stat::LIFESTEAL, 12.0)], &[]);
        let eff = gold_efficiency(&d).expect("priced item");
        // 60 * 43.3 + 12 * 75 = 3498 gold of stats for 3000 gold.
        assert_eq!(eff.stat_value, 3498.0);
        assert_eq!(eff.efficiency, 117);
    }

    #[test]
    fn test_unpriced_item_has_no_efficiency() {
        let mut d = data("Free", &[(stat::HEALTH, 100.0)], &[]);
        d.total_price = None;
        assert!(gold_efficiency(&d).is_none());
        d.total_price = Some(0);
        assert!(gold_efficiency(&d).is_none());
    }

    // ------------------------------------------------------------------
    // Index
    // ------------------------------------------------------------------

    #[test]
    fn test_items_without_data_are_not_indexed() {
        let raw = vec![
            RawItem { slug: "ghost".into(), data: None },
            RawItem { slug: "blade".into(), data: Some(data("Blade", &[(stat::PHYSICAL_POWER, 50.0)], &[])) },
        ];
        let index = ItemIndex::build(&raw);
        assert_eq!(index.len(), 1);
        assert!(index.get("ghost").is_none());
    }

    #[test]
    fn test_lookup_by_slug_name_and_lowercase_name() {
        let raw = vec![RawItem {
            slug: "tainted-blade".into(),
            data: Some(data("Tainted Blade", &[], &["Blighted"])),
        }];
        let index = ItemIndex::build(&raw);
        assert!(index.get("tainted-blade").is_some());
        assert!(index.get("Tainted Blade").is_some());
        assert!(index.get("tainted blade").is_some());
        assert_eq!(index.find_by_tag(EffectTag::AntiHeal).count(), 1);
        assert_eq!(index.find_by_tag(EffectTag::Crit).count(), 0);
    }

    #[test]
    fn test_find_by_category_returns_each_item_once() {
        let raw = vec![
            RawItem {
                slug: "stonewall".into(),
                data: Some(data("Stonewall", &[(stat::PHYSICAL_ARMOR, 60.0), (stat::HEALTH, 300.0)], &[])),
            },
            RawItem {
                slug: "plate".into(),
                data: Some(data("Plate", &[(stat::PHYSICAL_ARMOR, 40.0)], &[])),
            },
            RawItem {
                slug: "veil".into(),
                data: Some(data("Veil", &[(stat::MAGICAL_ARMOR, 50.0)], &[])),
            },
        ];
        let index = ItemIndex::build(&raw);

        let armor: Vec<_> = index
            .find_by_category(StatCategory::DefensePhysical)
            .map(|i| i.slug.as_str())
            .collect();
        assert_eq!(armor, vec!["stonewall", "plate"]);
        assert_eq!(index.find_by_category(StatCategory::Defense).count(), 1);
        assert_eq!(index.find_by_category(StatCategory::Support).count(), 0);
    }

    #[test]
    fn test_completed_items_exclude_crests_and_components() {
        let mut crest = data("Warrior Crest", &[(stat::PHYSICAL_POWER, 10.0)], &[]);
        crest.slot_type = SlotType::Crest;
        let mut component = data("Long Sword", &[(stat::PHYSICAL_POWER, 10.0)], &[]);
        component.rarity = Rarity::Rare;
        let raw = vec![
            RawItem { slug: "crest".into(), data: Some(crest) },
            RawItem { slug: "sword".into(), data: Some(component) },
            RawItem { slug: "blade".into(), data: Some(data("Blade", &[(stat::PHYSICAL_POWER, 50.0)], &[])) },
        ];
        let index = ItemIndex::build(&raw);
        let completed: Vec<_> = index.completed_items().iter().map(|i| i.slug.as_str()).collect();
        assert_eq!(completed, vec!["blade"]);
        let crests: Vec<_> = index.completed_crests().iter().map(|i| i.slug.as_str()).collect();
        assert_eq!(crests, vec!["crest"]);
    }

    #[test]
    fn test_item_family_requires_word_boundary() {
        assert_eq!(item_family("Tainted Scepter"), Some("Tainted"));
        assert_eq!(item_family("Ashenblade Reaver"), Some("Ashenblade"));
        assert_eq!(item_family("Taintedness"), None);
        assert_eq!(item_family("Tainted"), None);
    }

    #[test]
    fn test_has_label_checks_tags_and_categories() {
        let raw = vec![RawItem {
            slug: "bow".into(),
            data: Some(data("Bow", &[(stat::ATTACK_SPEED, 30.0)], &[])),
        }];
        let index = ItemIndex::build(&raw);
        let bow = index.get("bow").expect("indexed");
        assert!(bow.has_label("attack_speed"));
        assert!(bow.has_label("offense_physical"));
        assert!(!bow.has_label("crit"));
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn derive_tags_never_panics(text in "\\PC*") {
                let d = data("Fuzz", &[], &[text.as_str()]);
                let _ = derive_tags(&d);
            }

            #[test]
            fn item_family_is_a_known_prefix(name in "\\PC{0,40}") {
                if let Some(family) = item_family(&name) {
                    prop_assert!(ITEM_FAMILY_PREFIXES.contains(&family));
                    prop_assert!(name.starts_with(family));
                }
            }
        }
    }
}
