//! Printing engine results as JSON or condensed text.

use crate::cli::OutputFormat;
use anyhow::{bail, Result};
use scout_engine::combo::HeroCombo;
use scout_engine::{
    AbilityTip, CounterBuildPath, CounterHeroAnalysis, DuoAnalysis, DuoCounterBuild, DuoPartner, EngineError,
    MetaDiff, Response, ThreatProfile,
};
use serde::Serialize;

/// Human-readable rendering of a result.
pub trait Render {
    fn render_text(&self) -> String;
}

/// The serialized label of a unit enum variant.
fn label<T: Serialize>(value: &T) -> String {
    match serde_json::to_value(value) {
        Ok(serde_json::Value::String(s)) => s,
        Ok(other) => other.to_string(),
        Err(_) => String::new(),
    }
}

fn list(items: &[String]) -> String {
    if items.is_empty() {
        "-".to_string()
    } else {
        items.join(", ")
    }
}

fn bullets(out: &mut Vec<String>, heading: &str, lines: impl IntoIterator<Item = String>) {
    let lines: Vec<String> = lines.into_iter().collect();
    if lines.is_empty() {
        return;
    }
    out.push(format!("{heading}:"));
    out.extend(lines.into_iter().map(|l| format!("  - {l}")));
}

/// Prints `result` in `format`. Engine errors are printed (as the JSON
/// envelope or on stderr) and then returned so the process exits non-zero.
pub fn emit<T: Serialize + Render>(format: OutputFormat, result: Result<T, EngineError>) -> Result<()> {
    let failure = result.as_ref().err().map(ToString::to_string);
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&Response::from(result))?);
        }
        OutputFormat::Text => {
            if let Ok(value) = &result {
                println!("{}", value.render_text());
            }
        }
    }
    match failure {
        Some(message) => bail!(message),
        None => Ok(()),
    }
}

// ============================================================================
// Renderers
// ============================================================================

impl Render for CounterBuildPath {
    fn render_text(&self) -> String {
        let mut out = vec![format!(
            "{} vs {} ({})",
            self.your_hero.name,
            self.vs_enemy.name,
            self.your_hero.role.as_deref().unwrap_or("any role")
        )];
        if self.role_info.is_role_mismatch {
            out.push(format!(
                "Role {} is not active; using {}",
                self.role_info.requested_role.as_deref().unwrap_or("-"),
                self.role_info.fallback_role.as_deref().unwrap_or("-")
            ));
        }
        out.push(format!(
            "Enemy meta: {} [{}] {} over {} matches",
            self.vs_enemy.meta_build.name,
            list(&self.vs_enemy.meta_build.items),
            self.vs_enemy.meta_build.win_rate,
            self.vs_enemy.meta_build.matches
        ));
        if let Some(aggressive) = &self.aggressive_build {
            out.push(format!("Aggressive ({}): {}", aggressive.name, list(&aggressive.items)));
        }
        let counter = &self.counter_build;
        out.push(format!("Counter ({}): {}", counter.name, list(&counter.items)));
        out.push(format!("Crest: {}", counter.crest));
        if let Some(augment) = &counter.augment.recommended {
            out.push(format!("Augment: {} ({})", augment.name, augment.win_rate));
        }
        bullets(
            &mut out,
            "Core path",
            counter
                .path
                .iter()
                .map(|p| format!("{}: {}", p.item, p.reasons.join("; "))),
        );
        if let Some(diff) = &self.meta_diff {
            bullets(
                &mut out,
                "Changes from meta",
                diff.swaps
                    .iter()
                    .map(|s| format!("{} -> {}: {}", s.removed, s.added, s.reason)),
            );
        }
        bullets(
            &mut out,
            "Also consider",
            self.also_consider
                .iter()
                .map(|a| format!("{}: {}", a.item, a.swap_when)),
        );
        bullets(
            &mut out,
            "Enemy augments",
            self.enemy_augment_warnings
                .iter()
                .map(|w| w.note.clone().unwrap_or_else(|| w.name.clone())),
        );
        bullets(&mut out, "Tips", self.tips.iter().cloned());
        bullets(&mut out, "Ability tips", self.ability_tips.iter().map(|t| t.tip.clone()));
        out.join("\n")
    }
}

impl Render for CounterHeroAnalysis {
    fn render_text(&self) -> String {
        let mut out = vec![format!(
            "{} ({}, {})",
            self.enemy.name,
            self.enemy.damage_type,
            list(&self.enemy.classes)
        )];
        for v in &self.variants {
            out.push(format!(
                "{} / {}: [{}] {} over {} matches",
                v.build.role,
                v.build.name,
                list(&v.build.items),
                v.build.win_rate,
                v.build.matches
            ));
            bullets(&mut out, "Dangers", v.dangers.iter().cloned());
            bullets(&mut out, "Exploits", v.exploits.iter().cloned());
            bullets(
                &mut out,
                "Counter routes",
                v.counter_routes.iter().map(|r| {
                    let items: Vec<String> = r.items.iter().map(|i| i.name.clone()).collect();
                    format!("{}: {}", r.label, list(&items))
                }),
            );
        }
        bullets(
            &mut out,
            "Augment warnings",
            self.augment_warnings
                .iter()
                .map(|w| format!("{} ({})", w.name, w.win_rate)),
        );
        bullets(&mut out, "How to play against", self.ability_tips.iter().map(|t| t.tip.clone()));
        out.join("\n")
    }
}

impl Render for DuoCounterBuild {
    fn render_text(&self) -> String {
        let mut out = Vec::new();
        for ally in &self.allies {
            out.push(format!(
                "{} [{}]: {}",
                ally.hero.name, ally.build.name, ally.responsibility
            ));
            out.push(format!("  Items: {}", list(&ally.build.items)));
            out.push(format!("  Crest: {}", ally.build.crest));
        }
        bullets(
            &mut out,
            "Enemies",
            self.enemies.iter().map(|e| {
                let threats: Vec<String> = e.threats.iter().map(|t| t.label().to_string()).collect();
                format!("{} ({}): {}", e.hero, e.meta_build.name, list(&threats))
            }),
        );
        bullets(&mut out, "Lane notes", self.synergy_notes.iter().cloned());
        if let Some(kit) = &self.kit_synergy {
            out.push(format!("Kit synergy: {}", kit.synergy.score));
        }
        bullets(
            &mut out,
            "Enemy augments",
            self.augment_warnings
                .iter()
                .map(|w| format!("{}: {} ({})", w.hero, w.augment, w.win_rate)),
        );
        bullets(&mut out, "Tips", self.tips.iter().cloned());
        out.join("\n")
    }
}

impl Render for Vec<DuoPartner> {
    fn render_text(&self) -> String {
        if self.is_empty() {
            return "No partners found".to_string();
        }
        self.iter()
            .enumerate()
            .map(|(i, d)| format!("{}. {} ({}): {}", i + 1, d.partner_name, d.score, d.reasons.join("; ")))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Render for ThreatProfile {
    fn render_text(&self) -> String {
        let threats: Vec<String> = self.threats.iter().map(|t| t.label().to_string()).collect();
        let weaknesses: Vec<String> = self.weaknesses.iter().map(label).collect();
        let mut out = vec![
            format!("Damage: {}", self.primary_damage_type),
            format!(
                "Power: {:.0} physical / {:.0} magical",
                self.total_physical_power, self.total_magical_power
            ),
            format!(
                "Defense: {:.0} health / {:.0} armor / {:.0} MR",
                self.total_health, self.total_armor, self.total_magic_resist
            ),
            format!("Threats: {}", list(&threats)),
            format!("Weaknesses: {}", list(&weaknesses)),
        ];
        if !self.unresolved_items.is_empty() {
            out.push(format!("Unknown items: {}", list(&self.unresolved_items)));
        }
        out.join("\n")
    }
}

impl Render for DuoAnalysis {
    fn render_text(&self) -> String {
        let mut out = vec![format!(
            "{} enabling {}: {}",
            self.support, self.partner, self.synergy.score
        )];
        bullets(&mut out, "Reasons", self.synergy.reasons.iter().cloned());
        bullets(&mut out, "Combos", self.synergy.combos.iter().map(|c| c.text.clone()));
        out.join("\n")
    }
}

impl Render for Vec<AbilityTip> {
    fn render_text(&self) -> String {
        if self.is_empty() {
            return "No tips".to_string();
        }
        self.iter()
            .map(|t| format!("[{}] {}: {}", label(&t.kind), t.tip, t.detail))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Render for HeroCombo {
    fn render_text(&self) -> String {
        let burst: Vec<String> = self
            .burst_combo
            .iter()
            .map(|s| format!("{} ({})", s.name, label(&s.key)))
            .collect();
        let dps: Vec<String> = self
            .dps_rotation
            .iter()
            .map(|s| format!("{} {:.1}/s", s.name, s.dps))
            .collect();
        let mut out = vec![
            format!("{} at rank {}", self.hero_name, self.rank),
            format!("Burst: {}", burst.join(" -> ")),
            format!("Rotation: {}", dps.join(" -> ")),
            format!("Full combo cost: {:.0}", self.total_combo_cost),
        ];
        if let Some(support) = &self.support_combos {
            let names = |steps: &[scout_engine::combo::ComboStep]| {
                steps.iter().map(|s| s.name.clone()).collect::<Vec<_>>().join(" -> ")
            };
            out.push(format!("Peel: {}", names(&support.peel)));
            out.push(format!("Engage: {}", names(&support.engage)));
            out.push(format!("Sustain: {}", names(&support.sustain)));
        }
        out.join("\n")
    }
}

impl Render for MetaDiff {
    fn render_text(&self) -> String {
        if self.identical {
            return "Builds are identical".to_string();
        }
        let mut out = vec![format!("Kept: {}", list(&self.kept))];
        bullets(
            &mut out,
            "Swaps",
            self.swaps
                .iter()
                .map(|s| format!("{} -> {}: {}", s.removed, s.added, s.reason)),
        );
        if !self.removed_extra.is_empty() {
            out.push(format!("Dropped: {}", list(&self.removed_extra)));
        }
        if !self.added_extra.is_empty() {
            out.push(format!("Added: {}", list(&self.added_extra)));
        }
        out.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scout_engine::{Swap, Weakness};

    #[test]
    fn label_uses_serde_spelling() {
        assert_eq!(label(&Weakness::DiesToCc), "dies_to_cc");
    }

    #[test]
    fn diff_text() {
        let diff = MetaDiff {
            kept: vec!["A".into()],
            swaps: vec![Swap {
                removed: "B".into(),
                added: "C".into(),
                reason: "because".into(),
            }],
            removed_extra: vec![],
            added_extra: vec!["D".into()],
            identical: false,
        };
        assert_eq!(diff.render_text(), "Kept: A\nSwaps:\n  - B -> C: because\nAdded: D");
    }

    #[test]
    fn empty_partner_list() {
        assert_eq!(Vec::<DuoPartner>::new().render_text(), "No partners found");
    }

    #[test]
    fn errors_are_returned_after_printing() {
        let err = emit::<MetaDiff>(OutputFormat::Json, Err(EngineError::HeroNotFound("x".into()))).unwrap_err();
        assert_eq!(err.to_string(), "Hero \"x\" not found in profiles");
    }
}
