//! The [`Engine`] handle.
//!
//! Everything derived from static content is computed once here: the item
//! index, hero kits and ability interaction profiles. The handle is immutable
//! afterwards and can be shared across threads.

use crate::analyze::{analyze_build, ThreatProfile};
use crate::combo::{hero_combo, HeroCombo};
use crate::config::EngineConfig;
use crate::interactions::{defender_tips, matchup_tips, AbilityTip, InteractionProfile};
use crate::synergy::{analyze_duo, rank_partners, score_synergy, DuoAnalysis, DuoPartner, PartnerPool, SynergyScore};
use scout_catalog::{HeroAbilitySet, HeroKit, HeroProfile, ItemIndex, KnowledgeBase};
use std::collections::BTreeMap;

/// Lane role labels as they appear on hero profiles.
pub const SUPPORT_ROLE: &str = "SUPPORT";
pub const CARRY_ROLE: &str = "CARRY";

/// Read-only engine state built from a [`KnowledgeBase`].
#[derive(Debug, Clone)]
pub struct Engine {
    config: EngineConfig,
    index: ItemIndex,
    profiles: BTreeMap<String, HeroProfile>,
    abilities: BTreeMap<String, HeroAbilitySet>,
    kits: BTreeMap<String, HeroKit>,
    interactions: BTreeMap<String, InteractionProfile>,
}

impl Engine {
    pub fn new(kb: &KnowledgeBase) -> Self {
        Self::with_config(kb, EngineConfig::default())
    }

    pub fn with_config(kb: &KnowledgeBase, config: EngineConfig) -> Self {
        let index = ItemIndex::build(&kb.items);
        let profiles: BTreeMap<String, HeroProfile> =
            kb.heroes.iter().map(|h| (h.slug.clone(), h.clone())).collect();

        let mut kits = BTreeMap::new();
        let mut interactions = BTreeMap::new();
        for (slug, set) in &kb.abilities {
            let name = hero_name(slug, set, profiles.get(slug));
            kits.insert(
                slug.clone(),
                HeroKit::from_abilities(slug, name, &set.abilities, &config.extractor),
            );
            interactions.insert(slug.clone(), InteractionProfile::from_abilities(slug, name, &set.abilities));
        }

        tracing::debug!(
            target: "scout::engine",
            items = index.len(),
            heroes = profiles.len(),
            kits = kits.len(),
            "Built engine"
        );

        Self {
            config,
            index,
            profiles,
            abilities: kb.abilities.clone(),
            kits,
            interactions,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn index(&self) -> &ItemIndex {
        &self.index
    }

    pub fn profile(&self, slug: &str) -> Option<&HeroProfile> {
        self.profiles.get(slug)
    }

    pub fn profiles(&self) -> impl Iterator<Item = &HeroProfile> {
        self.profiles.values()
    }

    pub fn hero_kit(&self, slug: &str) -> Option<&HeroKit> {
        self.kits.get(slug)
    }

    pub fn interaction_profile(&self, slug: &str) -> Option<&InteractionProfile> {
        self.interactions.get(slug)
    }

    /// Heroes whose profile lists the support lane role.
    pub fn is_support(&self, slug: &str) -> bool {
        self.profile(slug).is_some_and(|p| p.has_role(SUPPORT_ROLE))
    }

    pub fn is_carry(&self, slug: &str) -> bool {
        self.profile(slug).is_some_and(|p| p.has_role(CARRY_ROLE))
    }

    /// Analyzes a build, using `hero`'s damage type when the hero is known.
    pub fn analyze_build<S: AsRef<str>>(&self, items: &[S], hero: Option<&str>) -> ThreatProfile {
        let profile = hero.and_then(|h| self.profile(h));
        analyze_build(&self.index, items, profile, &self.config.thresholds)
    }

    /// Scores `support` as the enabler for `partner`.
    pub fn synergy(&self, support: &str, partner: &str) -> Option<SynergyScore> {
        Some(score_synergy(self.hero_kit(support)?, self.hero_kit(partner)?))
    }

    /// Scores a pair, letting a support-role hero be the enabler.
    pub fn analyze_duo(&self, first: &str, second: &str) -> Option<DuoAnalysis> {
        let a = self.hero_kit(first)?;
        let b = self.hero_kit(second)?;
        Some(analyze_duo(a, b, self.is_support(first), self.is_support(second)))
    }

    /// Best lane partners for `slug`. Supports are paired with carries,
    /// carries with supports, and any other hero with everyone.
    pub fn top_duos(&self, slug: &str, count: usize) -> Vec<DuoPartner> {
        let Some(kit) = self.hero_kit(slug) else {
            tracing::debug!(target: "scout::engine", slug, "No kit for duo ranking");
            return Vec::new();
        };
        let pool = PartnerPool::for_roles(self.is_support(slug), self.is_carry(slug));
        let candidates = self.kits.values().filter(|k| match pool {
            PartnerPool::Carries => self.is_carry(k.slug()),
            PartnerPool::Supports => self.is_support(k.slug()),
            PartnerPool::Everyone => true,
        });
        rank_partners(kit, candidates, pool, count)
    }

    /// Tips for `attacker` facing `defender`; `None` if either lacks ability data.
    pub fn ability_tips(&self, attacker: &str, defender: &str) -> Option<Vec<AbilityTip>> {
        Some(matchup_tips(
            self.interaction_profile(attacker)?,
            self.interaction_profile(defender)?,
        ))
    }

    /// How to play against `slug`, regardless of your own hero.
    pub fn defender_tips(&self, slug: &str) -> Vec<AbilityTip> {
        self.interaction_profile(slug).map(defender_tips).unwrap_or_default()
    }

    /// Combo sequences at ability `rank` (1-based ranks clamp to what the
    /// ability has).
    pub fn hero_combo(&self, slug: &str, rank: usize) -> Option<HeroCombo> {
        let set = self.abilities.get(slug)?;
        let name = hero_name(slug, set, self.profile(slug));
        hero_combo(
            slug,
            name,
            &set.abilities,
            self.is_support(slug),
            rank,
            &self.config.extractor,
        )
    }
}

fn hero_name<'a>(slug: &'a str, set: &'a HeroAbilitySet, profile: Option<&'a HeroProfile>) -> &'a str {
    if !set.name.is_empty() {
        &set.name
    } else {
        profile.map_or(slug, |p| p.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scout_test_utils::sample_knowledge_base;

    fn engine() -> Engine {
        Engine::new(&sample_knowledge_base())
    }

    #[test]
    fn test_engine_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Engine>();
    }

    #[test]
    fn test_lookups() {
        let e = engine();
        assert_eq!(e.profile("grux").unwrap().name, "Grux");
        assert!(e.profile("nobody").is_none());
        assert!(e.hero_kit("steel").is_some());
        assert!(e.hero_kit("kallari").is_none());
        assert!(e.is_support("muriel"));
        assert!(e.is_carry("sparrow"));
        assert!(!e.is_carry("grux"));
        assert!(e.index().get("Bloodletter").is_some());
    }

    #[test]
    fn test_analyze_build_uses_hero_damage_type() {
        let e = engine();
        let p = e.analyze_build(&["Mindrazor Orb"], Some("gideon"));
        assert_eq!(p.primary_damage_type, scout_catalog::DamageType::Magical);
        let unknown = e.analyze_build(&["Mindrazor Orb"], Some("nobody"));
        assert_eq!(unknown.primary_damage_type, scout_catalog::DamageType::Physical);
    }

    #[test]
    fn test_top_duos_pairs_supports_with_carries() {
        let e = engine();
        let duos = e.top_duos("muriel", 5);
        assert_eq!(duos.len(), 1);
        assert_eq!(duos[0].partner, "sparrow");

        let supports = e.top_duos("sparrow", 5);
        let partners: Vec<_> = supports.iter().map(|d| d.partner.as_str()).collect();
        assert_eq!(partners.len(), 2);
        assert!(partners.contains(&"muriel") && partners.contains(&"steel"));
        assert!(supports.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn test_top_duos_for_other_roles_ranks_everyone() {
        let e = engine();
        let duos = e.top_duos("gideon", 10);
        assert_eq!(duos.len(), 4);
        assert!(duos.iter().all(|d| d.partner != "gideon"));
        assert!(e.top_duos("kallari", 5).is_empty());
    }

    #[test]
    fn test_analyze_duo_prefers_support_as_enabler() {
        let e = engine();
        let duo = e.analyze_duo("gideon", "steel").unwrap();
        assert_eq!(duo.support, "steel");
        assert_eq!(duo.partner, "gideon");
        assert!(e.analyze_duo("gideon", "kallari").is_none());
    }

    #[test]
    fn test_tips_and_combos() {
        let e = engine();
        assert!(e.ability_tips("steel", "grux").is_some_and(|t| !t.is_empty()));
        assert!(e.ability_tips("steel", "kallari").is_none());
        assert!(!e.defender_tips("steel").is_empty());
        assert!(e.defender_tips("kallari").is_empty());

        let combo = e.hero_combo("steel", 2).unwrap();
        assert_eq!(combo.hero_name, "Steel");
        assert!(combo.support_combos.is_some());
        assert!(e.hero_combo("sparrow", 2).unwrap().support_combos.is_none());
    }
}
