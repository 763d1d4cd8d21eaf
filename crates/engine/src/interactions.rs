//! Ability-level matchup tips.
//!
//! Each hero's abilities are profiled into defensive sources (cleanse, CC
//! immunity, dashes, healing, shields, damage reduction) and offensive
//! sources (CC, anti-heal, execute). Tips compare an attacker's offensive
//! sources with a defender's defensive ones.

use scout_catalog::{display_name, interaction_traits, Ability, AbilityKey, DefensiveTrait, InteractionTraits, OffensiveTrait};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

/// A cleanse with a rank-1 cooldown at least this long leaves a punish window.
const LONG_COOLDOWN: f64 = 15.0;

/// Rank-1 (`max`) and max-rank (`min`) cooldowns. Zero reads as unknown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CooldownRange {
    pub max: Option<f64>,
    pub min: Option<f64>,
}

impl CooldownRange {
    pub fn from_ranks(cooldowns: &[f64]) -> Self {
        let known = |v: Option<&f64>| v.copied().filter(|cd| *cd != 0.0);
        Self {
            max: known(cooldowns.first()),
            min: known(cooldowns.last()),
        }
    }

    /// Max-rank cooldown when it differs from rank 1.
    fn distinct_min(&self) -> Option<f64> {
        self.min.filter(|min| Some(*min) != self.max)
    }
}

/// `12s-9s`, `12s`, or empty when unknown.
impl fmt::Display for CooldownRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(max) = self.max {
            write!(f, "{max}s")?;
            if let Some(min) = self.distinct_min() {
                write!(f, "-{min}s")?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AbilityProfile {
    pub name: String,
    pub key: AbilityKey,
    pub traits: InteractionTraits,
    pub cooldown: CooldownRange,
}

/// One trait and the ability it comes from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TraitSource<T> {
    #[serde(rename = "trait")]
    pub kind: T,
    pub ability: String,
    pub key: AbilityKey,
    pub cooldown: CooldownRange,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileSummary {
    #[serde(rename = "hasHardCC")]
    pub has_hard_cc: bool,
    pub has_cleanse: bool,
    #[serde(rename = "hasCCImmunity")]
    pub has_cc_immunity: bool,
    pub has_dash: bool,
    pub has_healing: bool,
    pub has_shield: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InteractionProfile {
    pub slug: String,
    pub name: String,
    pub abilities: Vec<AbilityProfile>,
    pub defensive: Vec<TraitSource<DefensiveTrait>>,
    pub offensive: Vec<TraitSource<OffensiveTrait>>,
    pub summary: ProfileSummary,
}

fn source<T>(kind: T, ab: &AbilityProfile) -> TraitSource<T> {
    TraitSource {
        kind,
        ability: ab.name.clone(),
        key: ab.key,
        cooldown: ab.cooldown,
    }
}

impl InteractionProfile {
    /// Profiles every ability, basic attacks included.
    pub fn from_abilities(slug: &str, name: &str, abilities: &[Ability]) -> Self {
        let abilities: Vec<AbilityProfile> = abilities
            .iter()
            .map(|a| AbilityProfile {
                name: a.name.clone(),
                key: a.key,
                traits: interaction_traits(&a.description, &a.cc),
                cooldown: CooldownRange::from_ranks(&a.cooldowns),
            })
            .collect();

        let defensive: Vec<_> = abilities
            .iter()
            .flat_map(|ab| ab.traits.defensive.iter().map(move |t| source(*t, ab)))
            .collect();
        let offensive: Vec<_> = abilities
            .iter()
            .flat_map(|ab| ab.traits.offensive.iter().map(move |t| source(*t, ab)))
            .collect();

        let has = |t: DefensiveTrait| defensive.iter().any(|d: &TraitSource<DefensiveTrait>| d.kind == t);
        let summary = ProfileSummary {
            has_hard_cc: offensive.iter().any(|o| o.kind.is_hard_cc()),
            has_cleanse: has(DefensiveTrait::Cleanse),
            has_cc_immunity: has(DefensiveTrait::CcImmunity),
            has_dash: has(DefensiveTrait::Dash),
            has_healing: has(DefensiveTrait::Healing),
            has_shield: has(DefensiveTrait::Shield),
        };

        Self {
            slug: slug.to_string(),
            name: display_name(name).to_string(),
            abilities,
            defensive,
            offensive,
            summary,
        }
    }

    fn defensive_of(&self, kind: DefensiveTrait) -> Vec<&TraitSource<DefensiveTrait>> {
        self.defensive.iter().filter(|d| d.kind == kind).collect()
    }

    fn hard_cc(&self) -> Vec<&TraitSource<OffensiveTrait>> {
        self.offensive.iter().filter(|o| o.kind.is_hard_cc()).collect()
    }

    fn has_offensive(&self, kind: OffensiveTrait) -> bool {
        self.offensive.iter().any(|o| o.kind == kind)
    }
}

// ============================================================================
// Tips
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TipKind {
    Warning,
    Advantage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TipCategory {
    Cleanse,
    Window,
    CcImmunity,
    Escape,
    EscapeCounter,
    AntiHeal,
    Healing,
    Shield,
    ShieldWindow,
    DamageReduction,
    EnemyCc,
    YourCleanse,
    CdAdvantage,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AbilityTip {
    #[serde(rename = "type")]
    pub kind: TipKind,
    pub category: TipCategory,
    pub tip: String,
    pub detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ability: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cooldown: Option<CooldownRange>,
}

impl AbilityTip {
    fn new(kind: TipKind, category: TipCategory, tip: String, detail: impl Into<String>) -> Self {
        Self {
            kind,
            category,
            tip,
            detail: detail.into(),
            ability: None,
            cooldown: None,
        }
    }

    fn at<T>(mut self, source: &TraitSource<T>) -> Self {
        self.ability = Some(source.ability.clone());
        self.cooldown = Some(source.cooldown);
        self
    }
}

/// Ability names in first-seen order without repeats.
fn unique_abilities<'a, T: 'a>(sources: impl IntoIterator<Item = &'a TraitSource<T>>) -> Vec<&'a str> {
    let mut seen = BTreeSet::new();
    sources
        .into_iter()
        .map(|s| s.ability.as_str())
        .filter(|a| seen.insert(*a))
        .collect()
}

fn cc_list(sources: &[&TraitSource<OffensiveTrait>]) -> String {
    let mut seen = BTreeSet::new();
    sources
        .iter()
        .map(|c| format!("{} ({})", c.ability, c.kind.as_str()))
        .filter(|entry| seen.insert(entry.clone()))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Tips for `attacker` playing into `defender`.
pub fn matchup_tips(attacker: &InteractionProfile, defender: &InteractionProfile) -> Vec<AbilityTip> {
    use TipCategory as C;
    use TipKind::{Advantage, Warning};

    let mut tips = Vec::new();
    let d = defender.name.as_str();
    let attacker_cc = attacker.hard_cc();
    let attacker_anti_heal = attacker.has_offensive(OffensiveTrait::AntiHeal);
    let attacker_cleanse = attacker.defensive_of(DefensiveTrait::Cleanse);
    let cleanses = defender.defensive_of(DefensiveTrait::Cleanse);
    let healing = defender.defensive_of(DefensiveTrait::Healing);
    let defender_cc = defender.hard_cc();

    if !attacker_cc.is_empty() {
        for cl in &cleanses {
            tips.push(
                AbilityTip::new(
                    Warning,
                    C::Cleanse,
                    format!("Your CC is less effective: {d} has a Cleanse on {} ({} CD)", cl.ability, cl.cooldown),
                    format!("Bait out {} first, THEN commit your hard CC", cl.ability),
                )
                .at(cl),
            );
            if let Some(max) = cl.cooldown.max.filter(|m| *m >= LONG_COOLDOWN) {
                tips.push(
                    AbilityTip::new(
                        Advantage,
                        C::Window,
                        format!("Punish during {max}s {} cooldown, that's a big window", cl.ability),
                        format!("After they Cleanse, you have {max}s where CC sticks"),
                    )
                    .at(cl),
                );
            }
        }

        for imm in defender.defensive_of(DefensiveTrait::CcImmunity) {
            tips.push(
                AbilityTip::new(
                    Warning,
                    C::CcImmunity,
                    format!("{d} has CC Immunity on {}: don't waste abilities during it", imm.ability),
                    "Wait for immunity window to expire, then layer your CC",
                )
                .at(imm),
            );
        }

        let mut seen = BTreeSet::new();
        for dash in defender.defensive_of(DefensiveTrait::Dash) {
            if !seen.insert(dash.ability.as_str()) {
                continue;
            }
            tips.push(
                AbilityTip::new(
                    Advantage,
                    C::EscapeCounter,
                    format!("Save {} to cancel {d}'s {} escape", attacker_cc[0].ability, dash.ability),
                    "Don't open with CC, hold it to punish their escape attempt",
                )
                .at(dash),
            );
        }
    }

    let heal_names = unique_abilities(healing.iter().copied());
    if attacker_anti_heal && !healing.is_empty() {
        tips.push(AbilityTip::new(
            Advantage,
            C::AntiHeal,
            format!("Your anti-heal counters {d}'s healing ({})", heal_names.join(", ")),
            "Apply anti-heal before they use healing abilities for maximum impact",
        ));
    }
    if !attacker_anti_heal && healing.len() >= 2 {
        tips.push(AbilityTip::new(
            Warning,
            C::Healing,
            format!("{d} has strong healing ({}), consider anti-heal items", heal_names.join(", ")),
            "Without anti-heal, extended trades heavily favor them",
        ));
    }

    let mut seen = BTreeSet::new();
    for sh in defender.defensive_of(DefensiveTrait::Shield) {
        if !seen.insert(sh.ability.as_str()) {
            continue;
        }
        if let Some(max) = sh.cooldown.max {
            tips.push(
                AbilityTip::new(
                    Advantage,
                    C::ShieldWindow,
                    format!("Wait for {} shield cooldown ({max}s) before committing burst", sh.ability),
                    "Baiting the shield first means your damage isn't wasted",
                )
                .at(sh),
            );
        }
    }

    for dr in defender.defensive_of(DefensiveTrait::DamageReduction) {
        tips.push(
            AbilityTip::new(
                Warning,
                C::DamageReduction,
                format!("{d} can reduce damage with {}: don't burst into it", dr.ability),
                format!("Wait for {} to expire before going all-in", dr.ability),
            )
            .at(dr),
        );
    }

    if !defender_cc.is_empty() {
        match attacker_cleanse.first() {
            None => tips.push(AbilityTip::new(
                Warning,
                C::EnemyCc,
                format!("Watch out for {d}'s CC: {}", cc_list(&defender_cc)),
                "You have no cleanse, getting caught means death if they follow up",
            )),
            Some(cl) => tips.push(
                AbilityTip::new(
                    Advantage,
                    C::YourCleanse,
                    format!("Your {} cleanses {d}'s CC: save it for their key ability", cl.ability),
                    "Don't waste your cleanse early; hold it for their most dangerous CC",
                )
                .at(cl),
            ),
        }
    }

    if let (Some(cc), Some(cl)) = (attacker_cc.first(), cleanses.first()) {
        let cc_cooldown = cc.cooldown.min.or(cc.cooldown.max);
        if let (Some(ours), Some(theirs)) = (cc_cooldown, cl.cooldown.max) {
            if ours < theirs {
                tips.push(AbilityTip::new(
                    Advantage,
                    C::CdAdvantage,
                    format!(
                        "Your {} ({ours}s) comes up faster than their {} ({theirs}s)",
                        cc.ability, cl.ability
                    ),
                    "Chain CC attempts, your CC will be ready before their cleanse",
                ));
            }
        }
    }

    tips
}

/// How to play against `defender` with no particular attacker in mind.
/// Tips with identical text are dropped.
pub fn defender_tips(defender: &InteractionProfile) -> Vec<AbilityTip> {
    use TipCategory as C;
    use TipKind::{Advantage, Warning};

    let mut tips = Vec::new();
    for d in &defender.defensive {
        let cd = match d.cooldown.max {
            Some(_) => format!(" ({} CD)", d.cooldown),
            None => String::new(),
        };
        let tip = |kind, category, tip: String, detail: &str| AbilityTip::new(kind, category, tip, detail).at(d);
        match d.kind {
            DefensiveTrait::Cleanse => {
                tips.push(tip(
                    Warning,
                    C::Cleanse,
                    format!("Has Cleanse on {}{cd}: CC is less reliable", d.ability),
                    "Bait it out first, then commit hard CC. Stack CC chains, cleanse only works once.",
                ));
                if let Some(max) = d.cooldown.max.filter(|m| *m >= LONG_COOLDOWN) {
                    tips.push(tip(
                        Advantage,
                        C::Window,
                        format!("{} has a {max}s cooldown at rank 1: big punish window", d.ability),
                        "After cleanse is used, you have a long window to lock them down.",
                    ));
                }
            }
            DefensiveTrait::CcImmunity => tips.push(tip(
                Warning,
                C::CcImmunity,
                format!("Has CC Immunity on {}{cd}", d.ability),
                "Don't waste key abilities during their immunity window.",
            )),
            DefensiveTrait::Dash => tips.push(tip(
                Warning,
                C::Escape,
                format!("Has escape/mobility on {}{cd}", d.ability),
                "Save hard CC to cancel their escape. Don't blow everything before they dash.",
            )),
            DefensiveTrait::Shield => tips.push(tip(
                Warning,
                C::Shield,
                format!("Has shield on {}{cd}", d.ability),
                "Bait or wait out the shield before committing burst damage.",
            )),
            DefensiveTrait::DamageReduction => tips.push(tip(
                Warning,
                C::DamageReduction,
                format!("Has damage reduction on {}{cd}", d.ability),
                "Don't burst into it, wait for it to expire.",
            )),
            DefensiveTrait::SpellShield | DefensiveTrait::Healing => {}
        }
    }

    let heals = unique_abilities(defender.defensive_of(DefensiveTrait::Healing));
    match heals.as_slice() {
        [] => {}
        [only] => tips.push(AbilityTip::new(
            Warning,
            C::Healing,
            format!("Has healing on {only}"),
            "Consider anti-heal if they're sustaining through fights.",
        )),
        many => tips.push(AbilityTip::new(
            Warning,
            C::Healing,
            format!("Strong healing kit: {}", many.join(", ")),
            "Anti-heal items are essential. Without them, extended trades heavily favor this hero.",
        )),
    }

    let hard_cc = defender.hard_cc();
    if !hard_cc.is_empty() {
        tips.push(AbilityTip::new(
            Warning,
            C::EnemyCc,
            format!("Dangerous CC: {}", cc_list(&hard_cc)),
            "Respect their engage range. Cleanse items/abilities help survive their combo.",
        ));
    }

    let mut seen = BTreeSet::new();
    tips.retain(|t| seen.insert(t.tip.clone()));
    tips
}

#[cfg(test)]
mod tests {
    use super::*;
    use scout_test_utils::{sample_abilities, AbilityBuilder};

    fn profile(slug: &str) -> InteractionProfile {
        let abilities = sample_abilities();
        let set = &abilities[slug];
        InteractionProfile::from_abilities(slug, &set.name, &set.abilities)
    }

    #[test]
    fn test_cooldown_range_display() {
        assert_eq!(CooldownRange::from_ranks(&[12.0, 11.0, 10.0, 9.0]).to_string(), "12s-9s");
        assert_eq!(CooldownRange::from_ranks(&[8.5]).to_string(), "8.5s");
        assert_eq!(CooldownRange::from_ranks(&[]).to_string(), "");
        assert_eq!(CooldownRange::from_ranks(&[0.0]).max, None);
    }

    #[test]
    fn test_profile_summary() {
        let grux = profile("grux");
        assert!(grux.summary.has_hard_cc);
        assert!(grux.summary.has_dash);
        assert!(grux.summary.has_healing);
        assert!(!grux.summary.has_cleanse);

        let steel = profile("steel");
        assert!(steel.summary.has_cc_immunity);
        assert!(steel.summary.has_shield);
    }

    #[test]
    fn test_matchup_tips_against_mobile_bruiser() {
        let tips = matchup_tips(&profile("steel"), &profile("grux"));
        let texts: Vec<&str> = tips.iter().map(|t| t.tip.as_str()).collect();

        assert!(texts.contains(&"Save Shield Slam to cancel Grux's Double Down escape"));
        assert!(texts.contains(&"Grux can reduce damage with Rampage: don't burst into it"));
        assert!(texts.contains(&"Watch out for Grux's CC: Warlord's Pull (pull)"));
        assert!(!tips.iter().any(|t| t.category == TipCategory::Healing), "one heal source is not strong healing");

        let escape = tips.iter().find(|t| t.category == TipCategory::EscapeCounter).unwrap();
        assert_eq!(escape.cooldown, Some(CooldownRange { max: Some(12.0), min: Some(9.0) }));
    }

    #[test]
    fn test_cleanse_tips_and_cooldown_advantage() {
        let attacker = InteractionProfile::from_abilities(
            "a",
            "Attacker",
            &[AbilityBuilder::new("Bash", AbilityKey::Primary)
                .description("Stuns the target.")
                .cooldowns(&[10.0, 8.0])
                .build()],
        );
        let defender = InteractionProfile::from_abilities(
            "d",
            "Defender",
            &[AbilityBuilder::new("Purify", AbilityKey::Secondary)
                .description("Removes all debuffs.")
                .cooldowns(&[20.0, 16.0])
                .build()],
        );
        let tips = matchup_tips(&attacker, &defender);
        let categories: Vec<TipCategory> = tips.iter().map(|t| t.category).collect();
        assert_eq!(categories, vec![TipCategory::Cleanse, TipCategory::Window, TipCategory::CdAdvantage]);
        assert_eq!(tips[0].tip, "Your CC is less effective: Defender has a Cleanse on Purify (20s-16s CD)");
        assert_eq!(tips[2].tip, "Your Bash (8s) comes up faster than their Purify (20s)");
    }

    #[test]
    fn test_defender_tips_for_tank() {
        let tips = defender_tips(&profile("steel"));
        let texts: Vec<&str> = tips.iter().map(|t| t.tip.as_str()).collect();
        assert_eq!(
            texts,
            vec![
                "Has shield on Bulwark (18s-15s CD)",
                "Has damage reduction on Bulwark (18s-15s CD)",
                "Has CC Immunity on Unstoppable Charge (110s-80s CD)",
                "Dangerous CC: Shield Slam (stun)",
            ]
        );
    }

    #[test]
    fn test_defender_tips_are_deduplicated() {
        let defender = InteractionProfile::from_abilities(
            "d",
            "Defender",
            &[
                AbilityBuilder::new("Guard", AbilityKey::Primary).description("Gains a shield and a barrier.").build(),
                AbilityBuilder::new("Guard", AbilityKey::Secondary).description("Gains a shield.").build(),
            ],
        );
        let tips = defender_tips(&defender);
        assert_eq!(tips.len(), 1);
        assert_eq!(tips[0].tip, "Has shield on Guard");
    }
}
