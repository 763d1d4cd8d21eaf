//! Shared test utilities for scout crates.
//!
//! Builders for items, heroes, abilities and role statistics, a small but
//! complete sample dataset, and a [`DatasetFixture`] that writes that dataset
//! to a temporary directory in the layout the CLI loads.

use scout_catalog::{
    Ability, AbilityKey, AttackType, Augment, BuildTab, CcRecord, CounterStat, DamageEntry, DamageType,
    HeroAbilitySet, HeroDataMap, HeroProfile, HeroStats, ItemData, ItemEffect, ItemIndex, KnowledgeBase,
    MatchCount, Rarity, RawItem, RoleStats, SlotType, StatLine, StatValue, SynergyPreference, WinRate,
};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{LazyLock, Mutex, MutexGuard};

// ============================================================================
// Process-global state
// ============================================================================

/// Serialize tests that mutate process-global state (env vars, cwd, etc).
///
/// Acquire this guard at the start of any test that modifies environment
/// variables to prevent race conditions between parallel tests.
pub fn env_guard() -> MutexGuard<'static, ()> {
    static TEST_SERIAL: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));
    TEST_SERIAL.lock().unwrap_or_else(|e| e.into_inner())
}

/// RAII guard for environment variables - restores original value on drop.
pub struct EnvVarGuard {
    key: &'static str,
    previous: Option<String>,
}

impl Drop for EnvVarGuard {
    fn drop(&mut self) {
        if let Some(v) = &self.previous {
            std::env::set_var(self.key, v);
        } else {
            std::env::remove_var(self.key);
        }
    }
}

/// Set an environment variable and return a guard that restores the original on drop.
///
/// # Example
/// ```
/// let _guard = scout_test_utils::set_env_var("SCOUT_DATA_DIR", Some("/tmp/data"));
/// // SCOUT_DATA_DIR is restored when _guard drops
/// ```
pub fn set_env_var(key: &'static str, value: Option<&str>) -> EnvVarGuard {
    let previous = std::env::var(key).ok();
    if let Some(val) = value {
        std::env::set_var(key, val);
    } else {
        std::env::remove_var(key);
    }
    EnvVarGuard { key, previous }
}

// ============================================================================
// Builders
// ============================================================================

/// Builds a [`RawItem`]. Defaults to an epic passive item with no price.
pub struct ItemBuilder {
    slug: String,
    data: ItemData,
}

impl ItemBuilder {
    pub fn new(slug: &str, name: &str) -> Self {
        Self {
            slug: slug.to_string(),
            data: ItemData {
                display_name: name.to_string(),
                rarity: Rarity::Epic,
                total_price: None,
                slot_type: SlotType::Passive,
                stats: Vec::new(),
                effects: Vec::new(),
            },
        }
    }

    pub fn rarity(mut self, rarity: Rarity) -> Self {
        self.data.rarity = rarity;
        self
    }

    pub fn price(mut self, price: u32) -> Self {
        self.data.total_price = Some(price);
        self
    }

    pub fn crest(mut self) -> Self {
        self.data.slot_type = SlotType::Crest;
        self
    }

    pub fn stat(mut self, id: &str, value: f64) -> Self {
        self.data.stats.push(StatValue {
            stat: id.to_string(),
            value,
        });
        self
    }

    pub fn effect(mut self, text: &str) -> Self {
        self.data.effects.push(ItemEffect {
            text: Some(text.to_string()),
            ..Default::default()
        });
        self
    }

    pub fn build(self) -> RawItem {
        RawItem {
            slug: self.slug,
            data: Some(self.data),
        }
    }
}

/// Builds a [`HeroProfile`].
pub struct HeroBuilder {
    profile: HeroProfile,
}

impl HeroBuilder {
    pub fn new(slug: &str, name: &str) -> Self {
        Self {
            profile: HeroProfile {
                slug: slug.to_string(),
                name: name.to_string(),
                ..Default::default()
            },
        }
    }

    pub fn damage_type(mut self, damage_type: DamageType) -> Self {
        self.profile.damage_type = damage_type;
        self
    }

    pub fn attack_type(mut self, attack_type: AttackType) -> Self {
        self.profile.attack_type = Some(attack_type);
        self
    }

    pub fn class(mut self, class: &str) -> Self {
        self.profile.classes.push(class.to_string());
        self
    }

    pub fn role(mut self, role: &str) -> Self {
        self.profile.roles.push(role.to_string());
        self
    }

    pub fn playstyle(mut self, style: &str) -> Self {
        self.profile.playstyle.push(style.to_string());
        self
    }

    pub fn synergy(mut self, tag: &str, weight: f64) -> Self {
        self.profile.synergies.push(SynergyPreference {
            tag: tag.to_string(),
            weight,
        });
        self
    }

    pub fn attack_speed_steroid(mut self) -> Self {
        self.profile.has_as_steroid = true;
        self
    }

    pub fn augment(mut self, name: &str, description: &str) -> Self {
        self.profile.augments.push(Augment {
            name: name.to_string(),
            description: description.to_string(),
            traits: Vec::new(),
        });
        self
    }

    pub fn build(self) -> HeroProfile {
        self.profile
    }
}

/// Builds an [`Ability`].
pub struct AbilityBuilder {
    ability: Ability,
}

impl AbilityBuilder {
    pub fn new(name: &str, key: AbilityKey) -> Self {
        Self {
            ability: Ability {
                name: name.to_string(),
                key,
                ..Default::default()
            },
        }
    }

    pub fn description(mut self, text: &str) -> Self {
        self.ability.description = text.to_string();
        self
    }

    pub fn cooldowns(mut self, per_rank: &[f64]) -> Self {
        self.ability.cooldowns = per_rank.to_vec();
        self
    }

    pub fn costs(mut self, per_rank: &[f64]) -> Self {
        self.ability.costs = per_rank.to_vec();
        self
    }

    pub fn damage(mut self, per_rank: &[f64], damage_type: &str) -> Self {
        self.ability.damage.push(DamageEntry {
            values: per_rank.to_vec(),
            scaling: None,
            damage_type: Some(damage_type.to_string()),
        });
        self
    }

    pub fn cc(mut self, kind: &str, value: f64) -> Self {
        self.ability.cc.push(CcRecord {
            kind: kind.to_string(),
            value: Some(value),
        });
        self
    }

    pub fn build(self) -> Ability {
        self.ability
    }
}

fn line(name: &str, win_rate: f64, matches: u32) -> StatLine {
    StatLine {
        name: name.to_string(),
        win_rate: WinRate(win_rate),
        matches: MatchCount(matches),
    }
}

/// Builds the statistics of one role.
#[derive(Default)]
pub struct RoleStatsBuilder {
    stats: RoleStats,
}

impl RoleStatsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn build_tab(mut self, name: &str, items: &[&str], win_rate: f64, matches: u32) -> Self {
        self.stats.build_tabs.push(BuildTab {
            name: name.to_string(),
            items: items.iter().map(|s| s.to_string()).collect(),
            win_rate: WinRate(win_rate),
            matches: MatchCount(matches),
        });
        self
    }

    pub fn augment(mut self, name: &str, win_rate: f64, matches: u32) -> Self {
        self.stats.augments.push(line(name, win_rate, matches));
        self
    }

    pub fn crest(mut self, name: &str, win_rate: f64, matches: u32) -> Self {
        self.stats.crests.push(line(name, win_rate, matches));
        self
    }

    /// Adds a late-slot candidate under `slot` (`4th`, `5th` or `6th`).
    pub fn slot_item(mut self, slot: &str, name: &str, win_rate: f64, matches: u32) -> Self {
        self.stats
            .item_slots
            .entry(slot.to_string())
            .or_default()
            .push(line(name, win_rate, matches));
        self
    }

    pub fn counter(mut self, hero: &str, win_rate: f64, matches: u32) -> Self {
        self.stats.counters.push(CounterStat {
            hero: hero.to_string(),
            win_rate: WinRate(win_rate),
            matches: MatchCount(matches),
        });
        self
    }

    pub fn build(self) -> RoleStats {
        self.stats
    }
}

/// Hero statistics from `(role, stats)` pairs; every listed role is active.
pub fn hero_stats(roles: Vec<(&str, RoleStats)>) -> HeroStats {
    HeroStats {
        active_roles: roles.iter().map(|(r, _)| r.to_string()).collect(),
        roles: roles.into_iter().map(|(r, s)| (r.to_string(), s)).collect(),
    }
}

// ============================================================================
// Sample dataset
// ============================================================================

/// A small item catalog covering every scoring rule.
///
/// Notable entries: `Bloodletter` (lifesteal), three `Tainted` anti-heal items,
/// `Sky Splitter` (on-hit), `Stonewall` (armor), four crests, one unfinished
/// item and one placeholder without data.
pub fn sample_items() -> Vec<RawItem> {
    vec![
        ItemBuilder::new("bloodletter", "Bloodletter")
            .rarity(Rarity::Legendary)
            .price(3000)
            .stat("PHYSICAL_POWER", 60.0)
            .stat("LIFESTEAL", 12.0)
            .effect("Restores health after takedowns.")
            .build(),
        ItemBuilder::new("tainted-blade", "Tainted Blade")
            .price(2800)
            .stat("PHYSICAL_POWER", 40.0)
            .stat("ABILITY_HASTE", 10.0)
            .effect("Physical damage inflicts Blighted for 2s.")
            .build(),
        ItemBuilder::new("tainted-scepter", "Tainted Scepter")
            .price(2800)
            .stat("MAGICAL_POWER", 75.0)
            .stat("ABILITY_HASTE", 10.0)
            .effect("Magical damage inflicts Blighted for 2s.")
            .build(),
        ItemBuilder::new("tainted-guard", "Tainted Guard")
            .price(2700)
            .stat("HEALTH", 250.0)
            .stat("PHYSICAL_ARMOR", 25.0)
            .effect("Nearby enemies are Blighted.")
            .build(),
        ItemBuilder::new("sky-splitter", "Sky Splitter")
            .rarity(Rarity::Legendary)
            .price(3200)
            .stat("PHYSICAL_POWER", 65.0)
            .stat("ATTACK_SPEED", 25.0)
            .effect("Basic attacks deal bonus damage that ramps with each hit.")
            .build(),
        ItemBuilder::new("stonewall", "Stonewall")
            .price(2700)
            .stat("HEALTH", 300.0)
            .stat("PHYSICAL_ARMOR", 45.0)
            .effect("Taking damage grants bonus armor for 3s.")
            .build(),
        ItemBuilder::new("mindrazor-orb", "Mindrazor Orb")
            .rarity(Rarity::Legendary)
            .price(3100)
            .stat("MAGICAL_POWER", 90.0)
            .stat("MAGICAL_PENETRATION", 10.0)
            .effect("Abilities deal bonus damage on their first strike.")
            .build(),
        ItemBuilder::new("spellbreaker", "Spellbreaker")
            .price(2600)
            .stat("MAGICAL_ARMOR", 40.0)
            .stat("HEALTH", 200.0)
            .effect("Grants a barrier that absorbs magical damage.")
            .build(),
        ItemBuilder::new("rapture", "Rapture")
            .rarity(Rarity::Legendary)
            .price(3300)
            .stat("PHYSICAL_POWER", 50.0)
            .stat("CRITICAL_CHANCE", 25.0)
            .build(),
        ItemBuilder::new("lifebinder", "Lifebinder")
            .price(2500)
            .stat("HEAL_AND_SHIELD_POWER", 15.0)
            .stat("HEALTH", 200.0)
            .stat("ABILITY_HASTE", 10.0)
            .effect("Grants an aura of armor to nearby allies.")
            .build(),
        ItemBuilder::new("unbroken-will", "Unbroken Will")
            .price(2600)
            .stat("MAGICAL_ARMOR", 30.0)
            .stat("TENACITY", 20.0)
            .effect("Grants 20% tenacity.")
            .build(),
        ItemBuilder::new("basilisk", "Basilisk")
            .price(2900)
            .stat("PHYSICAL_POWER", 45.0)
            .stat("PHYSICAL_PENETRATION", 15.0)
            .build(),
        ItemBuilder::new("longsword", "Longsword")
            .rarity(Rarity::Rare)
            .price(900)
            .stat("PHYSICAL_POWER", 15.0)
            .build(),
        RawItem {
            slug: "mystery".to_string(),
            data: None,
        },
        ItemBuilder::new("warrior-crest", "Warrior Crest")
            .crest()
            .price(1800)
            .stat("PHYSICAL_POWER", 20.0)
            .stat("HEALTH", 100.0)
            .build(),
        ItemBuilder::new("hunter-crest", "Hunter Crest")
            .crest()
            .price(1800)
            .stat("PHYSICAL_POWER", 15.0)
            .effect("Damage inflicts Blighted.")
            .build(),
        ItemBuilder::new("healer-crest", "Healer Crest")
            .crest()
            .price(1800)
            .stat("HEAL_AND_SHIELD_POWER", 10.0)
            .build(),
        ItemBuilder::new("magus-crest", "Magus Crest")
            .crest()
            .price(1800)
            .stat("MAGICAL_POWER", 30.0)
            .build(),
    ]
}

pub fn sample_index() -> ItemIndex {
    ItemIndex::build(&sample_items())
}

/// Six heroes: `grux` (sustain bruiser), `sparrow` (on-hit carry), `muriel`
/// (enchanter support), `gideon` (burst mage), `steel` (tank support) and
/// `kallari` (no statistics on record).
pub fn sample_heroes() -> Vec<HeroProfile> {
    vec![
        HeroBuilder::new("grux", "Grux")
            .attack_type(AttackType::Melee)
            .class("FIGHTER")
            .role("OFFLANE")
            .role("JUNGLE")
            .playstyle("sustained_dps")
            .synergy("sustain", 1.0)
            .augment("Bloodlust", "Basic attacks <HealText>heal</> Grux.")
            .build(),
        HeroBuilder::new("sparrow", "Sparrow")
            .attack_type(AttackType::Ranged)
            .class("SHARPSHOOTER")
            .role("CARRY")
            .playstyle("sustained_dps")
            .synergy("on_hit", 1.0)
            .synergy("crit", 0.5)
            .attack_speed_steroid()
            .augment("Rapid Fire", "Gains attack speed after using an ability.")
            .build(),
        HeroBuilder::new("muriel", "Muriel")
            .damage_type(DamageType::Magical)
            .attack_type(AttackType::Ranged)
            .class("ENCHANTER")
            .role("SUPPORT")
            .playstyle("cc_heavy")
            .synergy("support", 1.0)
            .build(),
        HeroBuilder::new("gideon", "Gideon")
            .damage_type(DamageType::Magical)
            .attack_type(AttackType::Ranged)
            .class("MAGE")
            .role("MIDLANE")
            .playstyle("burst")
            .synergy("pen", 1.0)
            .build(),
        HeroBuilder::new("steel", "Steel")
            .attack_type(AttackType::Melee)
            .class("TANK")
            .role("SUPPORT")
            .role("OFFLANE")
            .playstyle("cc_heavy")
            .build(),
        HeroBuilder::new("kallari", "Kallari")
            .attack_type(AttackType::Melee)
            .class("ASSASSIN")
            .role("JUNGLE")
            .playstyle("burst")
            .build(),
    ]
}

fn ability_set(name: &str, abilities: Vec<Ability>) -> HeroAbilitySet {
    HeroAbilitySet {
        name: name.to_string(),
        abilities,
    }
}

/// Abilities for every sample hero except `kallari`.
pub fn sample_abilities() -> BTreeMap<String, HeroAbilitySet> {
    use AbilityKey::*;
    let mut map = BTreeMap::new();
    map.insert(
        "grux".to_string(),
        ability_set(
            "Grux",
            vec![
                AbilityBuilder::new("Cleave Strike", Basic).description("Basic attack.").build(),
                AbilityBuilder::new("Double Down", Primary)
                    .description("Grux leaps to a target location dealing damage to nearby enemies.")
                    .damage(&[60.0, 95.0, 130.0, 165.0], "PHYSICAL")
                    .cooldowns(&[12.0, 11.0, 10.0, 9.0])
                    .costs(&[50.0, 55.0, 60.0, 65.0])
                    .build(),
                AbilityBuilder::new("Warlord's Pull", Secondary)
                    .description("Pulls enemies toward Grux.")
                    .damage(&[40.0, 60.0, 80.0, 100.0], "PHYSICAL")
                    .cc("pull", 0.5)
                    .cooldowns(&[14.0, 13.0, 12.0, 11.0])
                    .costs(&[60.0, 65.0, 70.0, 75.0])
                    .build(),
                AbilityBuilder::new("Bloodlust", Passive).description("Basic attacks heal Grux.").build(),
                AbilityBuilder::new("Rampage", Ultimate)
                    .description("Grux gains damage reduction for 4s.")
                    .cooldowns(&[90.0, 80.0, 70.0])
                    .costs(&[100.0, 100.0, 100.0])
                    .build(),
            ],
        ),
    );
    map.insert(
        "sparrow".to_string(),
        ability_set(
            "Sparrow",
            vec![
                AbilityBuilder::new("Piercing Shot", Primary)
                    .description("Fires an arrow that deals damage and slows by 25% for 1s.")
                    .damage(&[70.0, 110.0, 150.0, 190.0], "PHYSICAL")
                    .cooldowns(&[10.0, 9.0, 8.0, 7.0])
                    .costs(&[40.0, 45.0, 50.0, 55.0])
                    .build(),
                AbilityBuilder::new("Inspire", Secondary)
                    .description("Gains attack speed and movement speed.")
                    .cooldowns(&[16.0, 15.0, 14.0, 13.0])
                    .costs(&[50.0, 50.0, 50.0, 50.0])
                    .build(),
                AbilityBuilder::new("Rain of Arrows", Ultimate)
                    .description("Deals damage to all enemies in an area.")
                    .damage(&[150.0, 250.0, 350.0], "PHYSICAL")
                    .cooldowns(&[100.0, 90.0, 80.0])
                    .costs(&[100.0, 100.0, 100.0])
                    .build(),
            ],
        ),
    );
    map.insert(
        "muriel".to_string(),
        ability_set(
            "Muriel",
            vec![
                AbilityBuilder::new("Twin Fates", Primary)
                    .description("Heals an ally and grants them a shield.")
                    .cooldowns(&[12.0, 11.0, 10.0, 9.0])
                    .costs(&[60.0, 65.0, 70.0, 75.0])
                    .build(),
                AbilityBuilder::new("Reversal of Fortune", Secondary)
                    .description("Roots enemies for 1.5s.")
                    .damage(&[50.0, 80.0, 110.0, 140.0], "MAGICAL")
                    .cooldowns(&[15.0, 14.0, 13.0, 12.0])
                    .costs(&[70.0, 75.0, 80.0, 85.0])
                    .build(),
                AbilityBuilder::new("Guardian Angel", Ultimate)
                    .description("Flies to an ally and stuns nearby enemies for 1s.")
                    .cooldowns(&[150.0, 130.0, 110.0])
                    .costs(&[100.0, 100.0, 100.0])
                    .build(),
            ],
        ),
    );
    map.insert(
        "gideon".to_string(),
        ability_set(
            "Gideon",
            vec![
                AbilityBuilder::new("Cosmic Rift", Primary)
                    .description("Deals magical damage in an area.")
                    .damage(&[80.0, 120.0, 160.0, 200.0], "MAGICAL")
                    .cooldowns(&[10.0, 9.0, 8.0, 7.0])
                    .costs(&[70.0, 75.0, 80.0, 85.0])
                    .build(),
                AbilityBuilder::new("Burden", Secondary)
                    .description("Slows enemies by 30% for 1.5s.")
                    .cooldowns(&[13.0, 12.0, 11.0, 10.0])
                    .costs(&[60.0, 60.0, 60.0, 60.0])
                    .build(),
                AbilityBuilder::new("Black Hole", Ultimate)
                    .description("Deals massive damage over time.")
                    .damage(&[200.0, 300.0, 400.0], "MAGICAL")
                    .cooldowns(&[120.0, 100.0, 80.0])
                    .costs(&[100.0, 100.0, 100.0])
                    .build(),
            ],
        ),
    );
    map.insert(
        "steel".to_string(),
        ability_set(
            "Steel",
            vec![
                AbilityBuilder::new("Shield Slam", Primary)
                    .description("Stuns enemies for 2s.")
                    .damage(&[60.0, 90.0, 120.0, 150.0], "PHYSICAL")
                    .cooldowns(&[14.0, 13.0, 12.0, 11.0])
                    .costs(&[60.0, 60.0, 60.0, 60.0])
                    .build(),
                AbilityBuilder::new("Bulwark", Secondary)
                    .description("Grants a shield to nearby allies and reduces damage taken.")
                    .cooldowns(&[18.0, 17.0, 16.0, 15.0])
                    .costs(&[80.0, 80.0, 80.0, 80.0])
                    .build(),
                AbilityBuilder::new("Unstoppable Charge", Ultimate)
                    .description("Becomes unstoppable and charges forward.")
                    .cooldowns(&[110.0, 95.0, 80.0])
                    .costs(&[100.0, 100.0, 100.0])
                    .build(),
            ],
        ),
    );
    map
}

pub fn sample_knowledge_base() -> KnowledgeBase {
    KnowledgeBase {
        items: sample_items(),
        heroes: sample_heroes(),
        abilities: sample_abilities(),
    }
}

/// Statistics for every sample hero except `kallari`.
pub fn sample_hero_data() -> HeroDataMap {
    let mut map = HeroDataMap::new();
    let grux = hero_stats(vec![
        (
            "offlane",
            RoleStatsBuilder::new()
                .build_tab("Bruiser", &["Bloodletter", "Stonewall", "Sky Splitter"], 56.0, 200)
                .build_tab("Lifesteal", &["Bloodletter", "Sky Splitter", "Rapture"], 52.0, 40)
                .augment("Bloodlust", 57.0, 120)
                .augment("Iron Will", 51.0, 30)
                .crest("Warrior Crest", 54.0, 150)
                .counter("Sparrow", 45.0, 20)
                .counter("Steel", 53.0, 30)
                .build(),
        ),
        (
            "jungle",
            RoleStatsBuilder::new()
                .build_tab("Jungle", &["Bloodletter", "Basilisk"], 50.0, 10)
                .build(),
        ),
    ]);
    map.insert("grux".to_string(), grux);

    map.insert(
        "sparrow".to_string(),
        hero_stats(vec![(
            "carry",
            RoleStatsBuilder::new()
                .build_tab("On-Hit", &["Sky Splitter", "Rapture", "Basilisk"], 54.0, 300)
                .build_tab("Crit", &["Rapture", "Bloodletter", "Basilisk"], 53.0, 50)
                .augment("Rapid Fire", 53.0, 80)
                .augment("Tainted Arrows", 51.0, 40)
                .crest("Warrior Crest", 56.0, 200)
                .crest("Hunter Crest", 50.0, 10)
                .slot_item("4th", "Bloodletter", 55.0, 100)
                .slot_item("4th", "Stonewall", 50.0, 20)
                .slot_item("5th", "Spellbreaker", 52.0, 40)
                .slot_item("5th", "Tainted Blade", 51.0, 30)
                .slot_item("6th", "Stonewall", 49.0, 15)
                .slot_item("6th", "Unbroken Will", 50.0, 10)
                .counter("Grux", 55.0, 25)
                .build(),
        )]),
    );

    map.insert(
        "muriel".to_string(),
        hero_stats(vec![(
            "support",
            RoleStatsBuilder::new()
                .build_tab("Enchanter", &["Lifebinder", "Spellbreaker", "Unbroken Will"], 55.0, 150)
                .augment("Guardian", 54.0, 50)
                .crest("Healer Crest", 55.0, 60)
                .build(),
        )]),
    );

    map.insert(
        "gideon".to_string(),
        hero_stats(vec![(
            "midlane",
            RoleStatsBuilder::new()
                .build_tab("Burst", &["Mindrazor Orb", "Tainted Scepter", "Spellbreaker"], 53.0, 100)
                .augment("Singularity", 56.0, 70)
                .build(),
        )]),
    );

    map.insert(
        "steel".to_string(),
        hero_stats(vec![
            (
                "support",
                RoleStatsBuilder::new()
                    .build_tab("Warden", &["Stonewall", "Lifebinder", "Unbroken Will"], 51.0, 80)
                    .build(),
            ),
            (
                "offlane",
                RoleStatsBuilder::new()
                    .build_tab("Tank", &["Stonewall", "Tainted Guard", "Bloodletter"], 52.0, 30)
                    .build(),
            ),
        ]),
    );
    map
}

// ============================================================================
// Dataset directory
// ============================================================================

pub const ITEMS_FILE: &str = "items.json";
pub const PROFILES_FILE: &str = "hero-profiles.json";
pub const ABILITIES_FILE: &str = "hero-abilities.json";
pub const STATS_FILE: &str = "hero-stats.json";

/// The sample dataset written to a temporary directory.
///
/// The tempdir is automatically cleaned up when this struct is dropped.
pub struct DatasetFixture {
    pub tempdir: tempfile::TempDir,
}

impl DatasetFixture {
    /// Writes all four dataset files.
    pub fn new() -> std::io::Result<Self> {
        let fixture = Self::empty()?;
        fixture.write_json(ITEMS_FILE, &sample_items())?;
        fixture.write_json(PROFILES_FILE, &sample_heroes())?;
        fixture.write_json(ABILITIES_FILE, &sample_abilities())?;
        fixture.write_json(STATS_FILE, &sample_hero_data())?;
        Ok(fixture)
    }

    /// An empty directory; add files with [`DatasetFixture::write_json`] or
    /// [`DatasetFixture::write_raw`].
    pub fn empty() -> std::io::Result<Self> {
        Ok(Self {
            tempdir: tempfile::tempdir()?,
        })
    }

    pub fn path(&self) -> &Path {
        self.tempdir.path()
    }

    pub fn write_json<T: serde::Serialize>(&self, name: &str, value: &T) -> std::io::Result<PathBuf> {
        let body = serde_json::to_string_pretty(value).map_err(std::io::Error::other)?;
        self.write_raw(name, &body)
    }

    pub fn write_raw(&self, name: &str, body: &str) -> std::io::Result<PathBuf> {
        let path = self.tempdir.path().join(name);
        std::fs::write(&path, body)?;
        Ok(path)
    }

    pub fn remove(&self, name: &str) -> std::io::Result<()> {
        std::fs::remove_file(self.tempdir.path().join(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_guard_serializes_tests() {
        let _g = env_guard();
    }

    #[test]
    fn test_set_env_var_sets_and_restores() {
        let _g = env_guard();

        const KEY: &str = "SCOUT_TEST_UTILS_TEST_VAR";
        std::env::remove_var(KEY);

        {
            let _guard = set_env_var(KEY, Some("test_value"));
            assert_eq!(std::env::var(KEY).ok(), Some("test_value".to_string()));
        }
        assert!(std::env::var(KEY).is_err());
    }

    #[test]
    fn test_set_env_var_removes_when_none() {
        let _g = env_guard();

        const KEY: &str = "SCOUT_TEST_REMOVE_VAR";
        std::env::set_var(KEY, "exists");

        {
            let _guard = set_env_var(KEY, None);
            assert!(std::env::var(KEY).is_err());
        }
        assert_eq!(std::env::var(KEY).ok(), Some("exists".to_string()));

        std::env::remove_var(KEY);
    }

    #[test]
    fn test_sample_index_skips_placeholder() {
        let raw = sample_items();
        let index = sample_index();
        assert_eq!(index.len(), raw.len() - 1);
        assert!(index.get("mystery").is_none());
        assert!(index.get("Bloodletter").is_some());
    }

    #[test]
    fn test_sample_data_covers_every_hero_but_one() {
        let heroes = sample_heroes();
        let data = sample_hero_data();
        let missing: Vec<_> = heroes.iter().filter(|h| !data.contains_key(&h.slug)).collect();
        assert_eq!(missing.len(), 1);
        assert_eq!(missing[0].slug, "kallari");
    }

    #[test]
    fn test_dataset_fixture_writes_all_files() {
        let fixture = DatasetFixture::new().expect("fixture creation");
        for name in [ITEMS_FILE, PROFILES_FILE, ABILITIES_FILE, STATS_FILE] {
            assert!(fixture.path().join(name).is_file(), "{name} missing");
        }
        let body = std::fs::read_to_string(fixture.path().join(STATS_FILE)).unwrap();
        let parsed: HeroDataMap = serde_json::from_str(&body).unwrap();
        assert_eq!(parsed.len(), 5);
    }

    #[test]
    fn test_dataset_fixture_remove() {
        let fixture = DatasetFixture::new().expect("fixture creation");
        fixture.remove(ABILITIES_FILE).unwrap();
        assert!(!fixture.path().join(ABILITIES_FILE).exists());
    }
}
