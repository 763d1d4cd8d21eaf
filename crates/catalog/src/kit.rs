//! Per-hero kit summary used by duo scoring.

use crate::traits::{extract_cc, kit_traits, CcEffect, CcExtractorConfig, KitTrait};
use crate::types::{Ability, AbilityKey};
use serde::Serialize;

/// Codename to display name. Hero data sometimes carries internal codenames.
const DISPLAY_NAMES: &[(&str, &str)] = &[
    ("Tidebinder", "Yurei"),
    ("Bright", "Renna"),
    ("DemonKing", "Akeron"),
    ("Fey", "The Fey"),
    ("GRIMexe", "GRIM.exe"),
    ("FengMao", "Feng Mao"),
    ("LtBelica", "Lt. Belica"),
    ("Cryptmaker", "Bayle"),
    ("Lizard", "Zarus"),
    ("Swiftpaw", "Maco"),
    ("Huntress", "Kira"),
    ("IggyScorch", "Iggy & Scorch"),
    ("Wood", "Mourn"),
    ("Boost", "Skylar"),
    ("Mech", "Eden"),
    ("Emerald", "Argus"),
];

pub fn display_name(raw: &str) -> &str {
    DISPLAY_NAMES
        .iter()
        .find(|(code, _)| *code == raw)
        .map_or(raw, |(_, name)| *name)
}

/// An ability that applies crowd control.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CcAbility {
    pub name: String,
    pub key: AbilityKey,
    pub cc: Vec<CcEffect>,
    /// Rank-3 cooldown, else rank-1, else 0.
    pub cooldown: f64,
}

impl CcAbility {
    pub fn hard_duration(&self) -> f64 {
        self.cc.iter().filter(|c| c.hard).map(|c| c.duration).sum()
    }

    pub fn hard_kinds(&self) -> impl Iterator<Item = &CcEffect> {
        self.cc.iter().filter(|c| c.hard)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KitAbility {
    pub name: String,
    pub key: AbilityKey,
    pub traits: Vec<KitTrait>,
    /// Rank-3 base damage, 0 when absent.
    pub top_damage: f64,
}

/// Aggregated crowd control, sustain and damage of a hero's non-basic abilities.
///
/// Only [`HeroKit::from_abilities`] builds one.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroKit {
    slug: String,
    name: String,
    abilities: Vec<KitAbility>,
    total_hard_cc: f64,
    total_soft_cc: f64,
    cc_abilities: Vec<CcAbility>,
    has_heal: bool,
    has_shield: bool,
    #[serde(rename = "hasAoE")]
    has_aoe: bool,
    has_mobility: bool,
    total_burst_dmg: f64,
    damage_type: Option<String>,
}

impl HeroKit {
    pub fn from_abilities(slug: &str, name: &str, abilities: &[Ability], config: &CcExtractorConfig) -> Self {
        let mut kit = HeroKit {
            slug: slug.to_string(),
            name: display_name(name).to_string(),
            abilities: Vec::new(),
            total_hard_cc: 0.0,
            total_soft_cc: 0.0,
            cc_abilities: Vec::new(),
            has_heal: false,
            has_shield: false,
            has_aoe: false,
            has_mobility: false,
            total_burst_dmg: 0.0,
            damage_type: abilities
                .iter()
                .find(|a| !a.damage.is_empty())
                .and_then(|a| a.primary_damage_type())
                .map(str::to_string),
        };

        for ability in abilities.iter().filter(|a| a.key != AbilityKey::Basic) {
            let cc = extract_cc(&ability.description, &ability.cc, config);
            let traits = kit_traits(&ability.description);

            for effect in &cc {
                if effect.hard {
                    kit.total_hard_cc += effect.duration;
                } else {
                    kit.total_soft_cc += effect.duration;
                }
            }
            if !cc.is_empty() {
                let cooldown = [ability.cooldowns.get(2), ability.cooldowns.first()]
                    .into_iter()
                    .flatten()
                    .copied()
                    .find(|cd| *cd != 0.0)
                    .unwrap_or(0.0);
                kit.cc_abilities.push(CcAbility {
                    name: ability.name.clone(),
                    key: ability.key,
                    cc,
                    cooldown,
                });
            }

            kit.has_heal |= traits.contains(&KitTrait::Heal);
            kit.has_shield |= traits.contains(&KitTrait::Shield);
            kit.has_aoe |= traits.contains(&KitTrait::Aoe);
            kit.has_mobility |= traits.contains(&KitTrait::Mobility);
            kit.total_burst_dmg += ability.damage_at(2).or_else(|| ability.damage_at(0)).unwrap_or(0.0);

            kit.abilities.push(KitAbility {
                name: ability.name.clone(),
                key: ability.key,
                traits,
                top_damage: ability.damage_at(2).unwrap_or(0.0),
            });
        }

        tracing::trace!(
            target: "scout::kit",
            slug,
            hard_cc = kit.total_hard_cc,
            soft_cc = kit.total_soft_cc,
            "Built hero kit"
        );
        kit
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Non-basic abilities in source order.
    pub fn abilities(&self) -> &[KitAbility] {
        &self.abilities
    }

    pub fn total_hard_cc(&self) -> f64 {
        self.total_hard_cc
    }

    pub fn total_soft_cc(&self) -> f64 {
        self.total_soft_cc
    }

    pub fn cc_abilities(&self) -> &[CcAbility] {
        &self.cc_abilities
    }

    pub fn has_heal(&self) -> bool {
        self.has_heal
    }

    pub fn has_shield(&self) -> bool {
        self.has_shield
    }

    pub fn has_aoe(&self) -> bool {
        self.has_aoe
    }

    pub fn has_mobility(&self) -> bool {
        self.has_mobility
    }

    pub fn total_burst_dmg(&self) -> f64 {
        self.total_burst_dmg
    }

    /// Damage type of the first ability that lists damage, basic attacks included.
    pub fn damage_type(&self) -> Option<&str> {
        self.damage_type.as_deref()
    }

    /// Highest rank-3 damage ability; the earliest wins ties.
    pub fn strongest_ability(&self) -> Option<&KitAbility> {
        self.abilities.iter().fold(None, |best: Option<&KitAbility>, a| match best {
            Some(b) if b.top_damage >= a.top_damage => Some(b),
            _ => Some(a),
        })
    }

    pub fn first_aoe_ability(&self) -> Option<&KitAbility> {
        self.abilities.iter().find(|a| a.traits.contains(&KitTrait::Aoe))
    }

    /// CC abilities that can open a fight (stun, pull, knockup or knockback).
    pub fn engage_abilities(&self) -> impl Iterator<Item = &CcAbility> {
        self.cc_abilities
            .iter()
            .filter(|a| a.cc.iter().any(|c| c.kind.is_engage()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CcRecord, DamageEntry};

    fn ability(name: &str, key: AbilityKey, description: &str, damage: &[f64]) -> Ability {
        Ability {
            name: name.to_string(),
            key,
            description: description.to_string(),
            damage: if damage.is_empty() {
                Vec::new()
            } else {
                vec![DamageEntry {
                    values: damage.to_vec(),
                    scaling: None,
                    damage_type: Some("MAGICAL".into()),
                }]
            },
            cooldowns: vec![14.0, 13.0, 12.0, 11.0],
            ..Default::default()
        }
    }

    #[test]
    fn test_display_name_maps_codenames() {
        assert_eq!(display_name("Tidebinder"), "Yurei");
        assert_eq!(display_name("Sparrow"), "Sparrow");
    }

    #[test]
    fn test_kit_sums_cc_and_ignores_basic_attacks() {
        let abilities = vec![
            ability("Punch", AbilityKey::Basic, "Stuns for 5s", &[]),
            ability("Slam", AbilityKey::Primary, "Stuns enemies for 2.5s", &[60.0, 80.0, 100.0]),
            ability("Chill", AbilityKey::Secondary, "Slows by 30% for 1.5s", &[]),
        ];
        let kit = HeroKit::from_abilities("steel", "Steel", &abilities, &CcExtractorConfig::default());
        assert_eq!(kit.total_hard_cc(), 2.5);
        assert_eq!(kit.total_soft_cc(), 1.5);
        assert_eq!(kit.cc_abilities().len(), 2);
        assert_eq!(kit.cc_abilities()[0].cooldown, 12.0);
        assert_eq!(kit.abilities().len(), 2);
        assert_eq!(kit.total_burst_dmg(), 100.0);
    }

    #[test]
    fn test_structured_cc_counts_toward_totals() {
        let mut a = ability("Hook", AbilityKey::Ultimate, "Yanks a foe.", &[]);
        a.cc = vec![CcRecord {
            kind: "pull".into(),
            value: Some(1.0),
        }];
        let kit = HeroKit::from_abilities("x", "X", &[a], &CcExtractorConfig::default());
        assert_eq!(kit.total_hard_cc(), 1.0);
        assert_eq!(kit.engage_abilities().count(), 1);
    }

    #[test]
    fn test_traits_and_damage_type() {
        let abilities = vec![
            ability("Blast", AbilityKey::Primary, "Deals damage in an area.", &[50.0]),
            ability("Mend", AbilityKey::Secondary, "Heals and shields an ally.", &[]),
        ];
        let kit = HeroKit::from_abilities("muriel", "Muriel", &abilities, &CcExtractorConfig::default());
        assert!(kit.has_aoe());
        assert!(kit.has_heal());
        assert!(kit.has_shield());
        assert!(!kit.has_mobility());
        assert_eq!(kit.damage_type(), Some("MAGICAL"));
        assert_eq!(kit.first_aoe_ability().map(|a| a.name.as_str()), Some("Blast"));
        // Rank-1-only damage falls back for burst but not for top damage.
        assert_eq!(kit.total_burst_dmg(), 50.0);
        assert_eq!(kit.abilities()[0].top_damage, 0.0);
    }

    #[test]
    fn test_strongest_ability_prefers_first_on_ties() {
        let abilities = vec![
            ability("A", AbilityKey::Primary, "", &[1.0, 2.0, 90.0]),
            ability("B", AbilityKey::Secondary, "", &[1.0, 2.0, 120.0]),
            ability("C", AbilityKey::Ultimate, "", &[1.0, 2.0, 120.0]),
        ];
        let kit = HeroKit::from_abilities("x", "X", &abilities, &CcExtractorConfig::default());
        assert_eq!(kit.strongest_ability().map(|a| a.name.as_str()), Some("B"));
    }

    #[test]
    fn test_empty_kit() {
        let kit = HeroKit::from_abilities("x", "X", &[], &CcExtractorConfig::default());
        assert!(kit.strongest_ability().is_none());
        assert_eq!(kit.total_hard_cc(), 0.0);
        assert!(kit.damage_type().is_none());
    }
}
