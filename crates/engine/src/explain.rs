//! Human-readable reasoning.
//!
//! Every sentence the engine emits about items, matchups and lanes is built
//! here, from tables where the rule is a single flag check.

use crate::analyze::{LaneThreats, Threat, ThreatProfile, Thresholds, Weakness};
use crate::stats::ProvenItems;
use scout_catalog::{DamageType, EffectTag, HeroProfile, IndexedItem, StatCategory};

/// Formats a win rate the way the statistics feed does (`56%`, `55.2%`).
pub fn percent(win_rate: f64) -> String {
    format!("{win_rate}%")
}

fn join_or(parts: Vec<&str>, sep: &str, fallback: &str) -> String {
    if parts.is_empty() {
        fallback.to_string()
    } else {
        parts.join(sep)
    }
}

// ============================================================================
// Path reasons
// ============================================================================

/// Why an item earned its slot in a solo counter path.
pub fn path_reasons(
    item: &IndexedItem,
    hero: &HeroProfile,
    enemy_name: &str,
    threats: &ThreatProfile,
    proven: &ProvenItems<'_>,
    proven_win_rate: f64,
) -> Vec<String> {
    let mut reasons = Vec::new();
    if item.is_offensive() {
        reasons.push(format!("powers your {} damage", hero.damage_type));
    }
    if item.has_tag(EffectTag::AntiHeal) && threats.has_sustain {
        reasons.push(format!("shuts down {enemy_name}'s sustain"));
    }
    if item.has_tag(EffectTag::Pen) && threats.has_threat(Threat::HardToKill) {
        reasons.push("cuts through their tankiness".to_string());
    }
    if item.in_category(StatCategory::DefensePhysical) && threats.primary_damage_type == DamageType::Physical {
        reasons.push("armor vs their physical damage".to_string());
    }
    if item.in_category(StatCategory::DefenseMagical) && threats.primary_damage_type == DamageType::Magical {
        reasons.push("MR vs their magic damage".to_string());
    }
    if let Some(p) = proven.get(&item.name).filter(|p| p.avg_win_rate > proven_win_rate) {
        reasons.push(format!("proven on {} ({:.1}% avg WR)", hero.name, p.avg_win_rate));
    }
    if reasons.is_empty() {
        reasons.push("strong overall synergy with your kit".to_string());
    }
    reasons
}

/// Why an item earned its slot in one half of a duo build.
pub fn duo_path_reasons(
    item: &IndexedItem,
    hero: &HeroProfile,
    lane: &LaneThreats,
    proven: &ProvenItems<'_>,
    proven_win_rate: f64,
) -> Vec<String> {
    let mut reasons = Vec::new();
    if item.is_offensive() {
        reasons.push(format!("powers your {} damage", hero.damage_type));
    }
    if item.has_tag(EffectTag::AntiHeal) && lane.has_sustain {
        reasons.push("you're the anti-heal carrier".to_string());
    }
    if item.in_category(StatCategory::DefensePhysical) && lane.primary_physical {
        reasons.push("armor vs enemy physical".to_string());
    }
    if item.in_category(StatCategory::DefenseMagical) && lane.primary_magical {
        reasons.push("MR vs enemy magic".to_string());
    }
    if item.has_tag(EffectTag::Pen) {
        reasons.push("penetration".to_string());
    }
    if item.has_tag(EffectTag::Shield) || item.has_tag(EffectTag::Aura) {
        reasons.push("team utility".to_string());
    }
    if proven.get(&item.name).is_some_and(|p| p.avg_win_rate > proven_win_rate) {
        reasons.push(format!("proven on {}", hero.name));
    }
    if reasons.is_empty() {
        reasons.push("strong synergy".to_string());
    }
    reasons
}

/// Short justification for an item in a hero-agnostic counter route.
pub fn route_reason(item: &IndexedItem) -> String {
    let mut parts = Vec::new();
    if item.is_offensive() {
        parts.push("damage");
    }
    if item.has_tag(EffectTag::AntiHeal) {
        parts.push("cuts their healing");
    }
    if item.in_category(StatCategory::DefensePhysical) {
        parts.push("armor");
    }
    if item.in_category(StatCategory::DefenseMagical) {
        parts.push("magic resist");
    }
    if item.has_tag(EffectTag::Pen) {
        parts.push("penetration");
    }
    join_or(parts, " + ", "strong stats")
}

// ============================================================================
// Swap-when reasons
// ============================================================================

/// When an "also consider" item is worth swapping in.
pub fn item_swap_reason(item: &IndexedItem) -> String {
    let mut r = Vec::new();
    if item.has_tag(EffectTag::AntiHeal) {
        r.push("if nobody else has anti-heal");
    }
    if item.has_tag(EffectTag::Pen) || item.has_tag(EffectTag::PhysicalShred) || item.has_tag(EffectTag::MagicalShred) {
        r.push("if enemy buys armor/MR");
    }
    if item.in_category(StatCategory::DefensePhysical) {
        r.push("if you're getting burst down");
    }
    if item.in_category(StatCategory::DefenseMagical) {
        r.push("if enemy mages are a problem");
    }
    if item.has_tag(EffectTag::Sustain) && !item.has_tag(EffectTag::AntiHeal) {
        r.push("if you need to stay in lane longer");
    }
    if item.has_tag(EffectTag::Tenacity) {
        r.push("if you keep getting CC'd");
    }
    if item.has_tag(EffectTag::Mobility) {
        r.push("if you need to dodge skillshots");
    }
    if item.has_tag(EffectTag::Crit) {
        r.push("for max damage late game");
    }
    if item.has_tag(EffectTag::Shield) {
        r.push("if you need to survive burst");
    }
    if item.has_tag(EffectTag::OnHit) {
        r.push("if enemies stack HP");
    }
    join_or(r, "; ", "solid alternative for your kit")
}

pub fn duo_item_swap_reason(item: &IndexedItem, lane: &LaneThreats, is_support: bool) -> String {
    let mut r = Vec::new();
    if item.has_tag(EffectTag::AntiHeal) {
        r.push("if your partner can't carry anti-heal");
    }
    if item.has_tag(EffectTag::Pen) {
        r.push("if enemies buy armor/MR");
    }
    if item.in_category(StatCategory::DefensePhysical) && lane.primary_physical {
        r.push("if you're getting burst down");
    }
    if item.in_category(StatCategory::DefenseMagical) && lane.primary_magical {
        r.push("if enemy mage rotates");
    }
    if item.has_tag(EffectTag::Sustain) && !item.has_tag(EffectTag::AntiHeal) {
        r.push("if you need lane sustain");
    }
    if item.has_tag(EffectTag::Tenacity) {
        r.push("if you keep getting CC'd");
    }
    if item.has_tag(EffectTag::Shield) || item.has_tag(EffectTag::Aura) {
        r.push("for teamfight protection");
    }
    if item.has_tag(EffectTag::OnHit) {
        r.push("if enemies stack HP");
    }
    if item.has_tag(EffectTag::Crit) && !is_support {
        r.push("for late game damage");
    }
    join_or(r, "; ", "solid alternative")
}

pub fn crest_swap_reason(crest: &IndexedItem) -> String {
    let mut r = Vec::new();
    if crest.has_tag(EffectTag::Sustain) {
        r.push("if you need healing between fights");
    }
    if crest.has_tag(EffectTag::Shield) {
        r.push("if you need burst survival");
    }
    if crest.has_tag(EffectTag::Mobility) {
        r.push("if you need to dodge or chase");
    }
    if crest.has_tag(EffectTag::AntiHeal) {
        r.push("if enemy healing is out of control");
    }
    if crest.in_category(StatCategory::DefensePhysical) {
        r.push("if physical damage is killing you");
    }
    if crest.in_category(StatCategory::DefenseMagical) {
        r.push("if magic damage is killing you");
    }
    if crest.has_tag(EffectTag::Crit) {
        r.push("for max damage late game");
    }
    if crest.has_tag(EffectTag::AttackSpeed) {
        r.push("for faster auto-attacks");
    }
    join_or(r, "; ", "general alternative")
}

/// Why `added` replaced a baseline item, checked in priority order.
pub fn swap_reason(added: Option<&IndexedItem>, threats: &ThreatProfile, enemy_name: &str) -> String {
    let Some(item) = added else {
        return "matchup adjustment".to_string();
    };
    if item.has_tag(EffectTag::AntiHeal) && threats.has_sustain {
        format!("enemy {enemy_name} has sustain, need anti-heal")
    } else if item.in_category(StatCategory::DefensePhysical) && threats.primary_damage_type == DamageType::Physical {
        "enemy deals physical damage, need armor".to_string()
    } else if item.in_category(StatCategory::DefenseMagical) && threats.primary_damage_type == DamageType::Magical {
        "enemy deals magic damage, need MR".to_string()
    } else if item.has_tag(EffectTag::Pen) && threats.has_threat(Threat::HardToKill) {
        "enemy is tanky, need penetration".to_string()
    } else {
        "matchup adjustment".to_string()
    }
}

// ============================================================================
// Tips
// ============================================================================

/// Lane advice against one enemy build.
pub fn matchup_tips(threats: &ThreatProfile, hero: &HeroProfile, enemy_name: &str) -> Vec<String> {
    let mut tips = Vec::new();
    if threats.has_sustain {
        tips.push(format!(
            "Anti-heal is non-negotiable. {enemy_name}'s build has sustain. Without anti-heal you lose extended trades."
        ));
    }
    if threats.has_weakness(Weakness::NoDefenses) {
        tips.push(format!(
            "{enemy_name}'s build has ZERO defensive stats. Short burst trades favor you."
        ));
    }
    if threats.has_weakness(Weakness::DiesToCc) {
        tips.push("No tenacity in their build. CC = kill.".to_string());
    }
    if threats.has_crit {
        tips.push("They build crit: armor items with anti-crit passives are gold-efficient counters.".to_string());
    }
    if threats.has_threat(Threat::OnHitDps) {
        tips.push(
            "On-hit DPS build: they win sustained fights. Force short trades or all-in with burst + CC.".to_string(),
        );
    }
    if threats.has_threat(Threat::ShredsArmor) {
        tips.push("They have armor shred: HP stacking is more valuable than pure armor.".to_string());
    }
    if hero.has_playstyle("burst") && threats.has_weakness(Weakness::NoDefenses) {
        tips.push("Your burst vs their squishiness = favorable. Look for 100-0 windows.".to_string());
    }
    tips
}

/// Lane advice for a pair of allies.
pub fn duo_tips(lane: &LaneThreats) -> Vec<String> {
    let rules: [(bool, &str); 5] = [
        (
            lane.has_sustain,
            "Enemy lane has sustain: make sure ONE of you has anti-heal. Don't double up.",
        ),
        (
            lane.has_weakness(Weakness::NoDefenses),
            "Enemy builds are squishy: coordinate burst trades. CC -> all-in together.",
        ),
        (
            lane.has_weakness(Weakness::DiesToCc),
            "No tenacity on enemy side: chain CC for guaranteed kills.",
        ),
        (
            lane.has_threat(Threat::OnHitDps) && lane.has_threat(Threat::HealsALot),
            "Enemy has sustained DPS + healing. Short trades only.",
        ),
        (lane.has_crit, "Enemy builds crit: at least one of you needs armor."),
    ];
    rules
        .into_iter()
        .filter(|(applies, _)| *applies)
        .map(|(_, tip)| tip.to_string())
        .collect()
}

/// What an enemy build threatens, for the hero-agnostic analysis.
pub fn dangers(threats: &ThreatProfile, thresholds: &Thresholds) -> Vec<String> {
    let tanky = threats.total_health > thresholds.tanky_health || threats.total_armor > thresholds.tanky_armor;
    let rules: [(bool, &str); 6] = [
        (threats.has_sustain, "Heals a lot: buy anti-heal or you lose trades"),
        (threats.has_crit, "Builds crit: armor with anti-crit passives shuts them down"),
        (threats.has_on_hit, "On-hit damage: they scale with attack speed, avoid long fights"),
        (
            threats.has_pen,
            "Has penetration: stacking one resist type won't save you, buy HP too",
        ),
        (tanky, "They're tanky: you'll need penetration to deal real damage"),
        (
            threats.is_squishy(thresholds),
            "Squishy: burst them before they can fight back",
        ),
    ];
    rules
        .into_iter()
        .filter(|(applies, _)| *applies)
        .map(|(_, text)| text.to_string())
        .collect()
}

/// What an enemy build leaves open.
pub fn exploits(threats: &ThreatProfile) -> Vec<String> {
    const EXPLOITS: [(Weakness, &str); 5] = [
        (Weakness::NoDefenses, "No defensive stats: burst and all-ins work great"),
        (Weakness::DiesToCc, "No tenacity: stuns and roots = guaranteed kills"),
        (
            Weakness::CantCutYourHealing,
            "They can't reduce your healing: sustain is extra effective",
        ),
        (
            Weakness::HealingIsCounterable,
            "Their healing is their lifeline: anti-heal guts their entire gameplan",
        ),
        (Weakness::ReliesOnCrit, "Crit-reliant: armor items are gold-efficient counters"),
    ];
    EXPLOITS
        .into_iter()
        .filter(|(w, _)| threats.has_weakness(*w))
        .map(|(_, text)| text.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyze::analyze_build;
    use scout_catalog::ItemIndex;
    use scout_test_utils::{sample_index, HeroBuilder};

    fn profile(index: &ItemIndex, items: &[&str]) -> ThreatProfile {
        analyze_build(index, items, None, &Thresholds::default())
    }

    #[test]
    fn test_percent_matches_feed_format() {
        assert_eq!(percent(56.0), "56%");
        assert_eq!(percent(55.2), "55.2%");
    }

    #[test]
    fn test_path_reasons_for_anti_heal_vs_sustain() {
        let index = sample_index();
        let threats = profile(&index, &["Bloodletter"]);
        let hero = HeroBuilder::new("sparrow", "Sparrow").build();
        let blade = index.get("Tainted Blade").unwrap();
        let reasons = path_reasons(blade, &hero, "Grux", &threats, &ProvenItems::default(), 55.0);
        assert_eq!(
            reasons,
            vec!["powers your physical damage".to_string(), "shuts down Grux's sustain".to_string()]
        );
    }

    #[test]
    fn test_path_reasons_fallback() {
        let index = sample_index();
        let threats = profile(&index, &["Mindrazor Orb"]);
        let hero = HeroBuilder::new("sparrow", "Sparrow").build();
        let will = index.get("Unbroken Will").unwrap();
        let reasons = path_reasons(will, &hero, "Gideon", &threats, &ProvenItems::default(), 55.0);
        assert_eq!(reasons, vec!["strong overall synergy with your kit".to_string()]);
    }

    #[test]
    fn test_swap_reasons() {
        let index = sample_index();
        assert_eq!(
            item_swap_reason(index.get("Tainted Guard").unwrap()),
            "if nobody else has anti-heal; if you're getting burst down"
        );
        assert_eq!(item_swap_reason(index.get("Longsword").unwrap()), "solid alternative for your kit");
        assert_eq!(crest_swap_reason(index.get("Healer Crest").unwrap()), "if you need burst survival");
        assert_eq!(crest_swap_reason(index.get("Magus Crest").unwrap()), "general alternative");
    }

    #[test]
    fn test_duo_swap_reason_hides_crit_for_supports() {
        let index = sample_index();
        let lane = LaneThreats::default();
        let rapture = index.get("Rapture").unwrap();
        assert_eq!(duo_item_swap_reason(rapture, &lane, true), "solid alternative");
        assert_eq!(duo_item_swap_reason(rapture, &lane, false), "for late game damage");
    }

    #[test]
    fn test_diff_swap_reason_priority() {
        let index = sample_index();
        let threats = profile(&index, &["Bloodletter", "Stonewall"]);
        assert_eq!(
            swap_reason(index.get("Tainted Guard"), &threats, "Grux"),
            "enemy Grux has sustain, need anti-heal"
        );
        assert_eq!(
            swap_reason(index.get("Stonewall"), &threats, "Grux"),
            "enemy deals physical damage, need armor"
        );
        assert_eq!(
            swap_reason(index.get("Basilisk"), &threats, "Grux"),
            "enemy is tanky, need penetration"
        );
        assert_eq!(swap_reason(None, &threats, "Grux"), "matchup adjustment");
    }

    #[test]
    fn test_matchup_tips_are_plain_ascii() {
        let index = sample_index();
        let threats = profile(&index, &["Bloodletter", "Sky Splitter", "Rapture"]);
        let hero = HeroBuilder::new("kallari", "Kallari").playstyle("burst").build();
        let tips = matchup_tips(&threats, &hero, "Grux");
        assert!(tips[0].starts_with("Anti-heal is non-negotiable. Grux's build has sustain."));
        assert!(tips.iter().any(|t| t.contains("Look for 100-0 windows")));
        assert!(tips.iter().all(|t| t.is_ascii()));
    }

    #[test]
    fn test_duo_tips_need_both_dps_and_healing() {
        let index = sample_index();
        let on_hit = profile(&index, &["Sky Splitter"]);
        let lane = LaneThreats::from_profiles([&on_hit]);
        assert!(!duo_tips(&lane).iter().any(|t| t.contains("sustained DPS")));
        let both = profile(&index, &["Sky Splitter", "Bloodletter"]);
        let lane = LaneThreats::from_profiles([&both]);
        assert!(duo_tips(&lane).iter().any(|t| t.contains("sustained DPS")));
    }

    #[test]
    fn test_dangers_and_exploits() {
        let index = sample_index();
        let t = Thresholds::default();
        let glass = profile(&index, &["Rapture"]);
        let d = dangers(&glass, &t);
        assert_eq!(d[0], "Builds crit: armor with anti-crit passives shuts them down");
        assert_eq!(d.last().map(String::as_str), Some("Squishy: burst them before they can fight back"));
        let e = exploits(&glass);
        assert!(e.contains(&"Crit-reliant: armor items are gold-efficient counters".to_string()));
        assert!(e.contains(&"No defensive stats: burst and all-ins work great".to_string()));
    }

    #[test]
    fn test_route_reason() {
        let index = sample_index();
        assert_eq!(route_reason(index.get("Tainted Blade").unwrap()), "damage + cuts their healing");
        assert_eq!(route_reason(index.get("Lifebinder").unwrap()), "strong stats");
    }
}
