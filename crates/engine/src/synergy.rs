//! Duo synergy between two hero kits.
//!
//! Scoring is asymmetric: the first kit is treated as the enabler (usually
//! the support) and the second as the partner it plays around.

use scout_catalog::HeroKit;
use serde::Serialize;

const BASELINE: f64 = 10.0;
const SOFT_CC_PER_SECOND: f64 = 3.0;
const SOFT_CC_CAP: f64 = 10.0;
const HARD_CC_PER_SECOND: f64 = 10.0;
const HARD_CC_CAP: f64 = 30.0;
const COMBINED_CC_PER_SECOND: f64 = 5.0;
const COMBINED_CC_CAP: f64 = 25.0;
const PEEL: f64 = 20.0;
const DOUBLE_SUSTAIN: f64 = 15.0;
const HEALER: f64 = 10.0;
const SHIELDER: f64 = 10.0;
const ENGAGE: f64 = 15.0;
const SUSTAIN_DUO: f64 = 12.0;
const MIXED_DAMAGE: f64 = 8.0;
const CC_PROVIDER: f64 = 8.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ComboKind {
    /// Hard CC followed by the partner's strongest ability.
    CcChain,
    /// Engage CC followed by the partner's area damage.
    Engage,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Combo {
    #[serde(rename = "type")]
    pub kind: ComboKind,
    pub text: String,
    /// Length of the CC window in seconds, for chains only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SynergyScore {
    pub score: i64,
    pub reasons: Vec<String>,
    pub combos: Vec<Combo>,
    #[serde(rename = "combinedHardCC")]
    pub combined_hard_cc: f64,
}

/// Scores how well `support` sets up `partner`.
pub fn score_synergy(support: &HeroKit, partner: &HeroKit) -> SynergyScore {
    let s = support.name();
    let p = partner.name();
    let mut score = BASELINE;
    let mut reasons = Vec::new();
    let mut combos = Vec::new();

    if support.total_soft_cc() > 0.0 {
        score += (support.total_soft_cc() * SOFT_CC_PER_SECOND).min(SOFT_CC_CAP);
        reasons.push(format!("Soft CC: {:.1}s of slows/silences", support.total_soft_cc()));
    }

    if support.total_hard_cc() > 0.0 {
        score += (support.total_hard_cc() * HARD_CC_PER_SECOND).min(HARD_CC_CAP);
        if let Some(follow_up) = partner.strongest_ability() {
            for ability in support.cc_abilities() {
                let kinds: Vec<&str> = ability.hard_kinds().map(|c| c.kind.as_str()).collect();
                if kinds.is_empty() {
                    continue;
                }
                let window = ability.hard_duration();
                combos.push(Combo {
                    kind: ComboKind::CcChain,
                    text: format!(
                        "{s} {} ({}) -> {p} {} during {window:.2}s window",
                        ability.name,
                        kinds.join("+"),
                        follow_up.name
                    ),
                    value: Some(window),
                });
            }
        }
        reasons.push(format!(
            "CC chain: {:.1}s hard CC for {p} to follow up",
            support.total_hard_cc()
        ));
    }

    if support.total_hard_cc() > 0.0 && partner.total_hard_cc() > 0.0 {
        let total = support.total_hard_cc() + partner.total_hard_cc();
        score += (total * COMBINED_CC_PER_SECOND).min(COMBINED_CC_CAP);
        reasons.push(format!("Combined CC: {total:.1}s total lockdown"));
    }

    if (support.has_shield() || support.has_heal()) && !partner.has_mobility() {
        score += PEEL;
        reasons.push(format!("Peel: {s} protects immobile {p}"));
    }
    if support.has_shield() && support.has_heal() {
        score += DOUBLE_SUSTAIN;
        reasons.push(format!("Double sustain: {s} has both heal and shield"));
    }
    if support.has_heal() {
        score += HEALER;
        reasons.push(format!("Healer: {s} keeps {p} healthy in lane"));
    }
    if support.has_shield() {
        score += SHIELDER;
        reasons.push(format!("Shields: {s} absorbs damage for {p}"));
    }

    let engages: Vec<_> = support.engage_abilities().collect();
    if !engages.is_empty() && partner.has_aoe() {
        score += ENGAGE;
        reasons.push(format!("Engage: {s} CC into {p} AoE damage"));
        if let Some(aoe) = partner.first_aoe_ability() {
            for engage in engages {
                combos.push(Combo {
                    kind: ComboKind::Engage,
                    text: format!("{s} {} -> {p} {} (AoE on grouped enemies)", engage.name, aoe.name),
                    value: None,
                });
            }
        }
    }

    if support.has_heal() && partner.has_heal() {
        score += SUSTAIN_DUO;
        reasons.push("Sustain duo: both have healing for extended fights".to_string());
    }

    if let (Some(a), Some(b)) = (support.damage_type(), partner.damage_type()) {
        if !a.eq_ignore_ascii_case(b) {
            score += MIXED_DAMAGE;
            reasons.push(format!("Mixed damage: {} + {}", a.to_lowercase(), b.to_lowercase()));
        }
    }

    if partner.total_hard_cc() == 0.0 && support.total_hard_cc() > 0.0 {
        score += CC_PROVIDER;
        reasons.push(format!("CC provider: {s} supplies the lockdown {p} lacks"));
    }

    SynergyScore {
        score: score.round() as i64,
        reasons,
        combos,
        combined_hard_cc: support.total_hard_cc() + partner.total_hard_cc(),
    }
}

// ============================================================================
// Partner ranking
// ============================================================================

/// Which heroes a given hero is paired with when ranking duos.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartnerPool {
    /// The hero is a support: rank carries, scored support-first.
    Carries,
    /// The hero is a carry: rank supports, scored with them as the enabler.
    Supports,
    /// Any other role: rank every other hero.
    Everyone,
}

impl PartnerPool {
    pub fn for_roles(is_support: bool, is_carry: bool) -> Self {
        if is_support {
            PartnerPool::Carries
        } else if is_carry {
            PartnerPool::Supports
        } else {
            PartnerPool::Everyone
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DuoPartner {
    pub partner: String,
    pub partner_name: String,
    pub score: i64,
    pub reasons: Vec<String>,
    pub combos: Vec<Combo>,
}

/// Scores `hero` against every candidate and returns the best `count`,
/// highest score first with ties broken by partner slug.
///
/// Candidates are expected to be pre-filtered to `pool`; the pool only
/// decides which side of the pairing is the enabler.
pub fn rank_partners<'a>(
    hero: &HeroKit,
    candidates: impl IntoIterator<Item = &'a HeroKit>,
    pool: PartnerPool,
    count: usize,
) -> Vec<DuoPartner> {
    let mut ranked: Vec<DuoPartner> = candidates
        .into_iter()
        .filter(|kit| kit.slug() != hero.slug())
        .map(|kit| {
            let synergy = match pool {
                PartnerPool::Supports => score_synergy(kit, hero),
                PartnerPool::Carries | PartnerPool::Everyone => score_synergy(hero, kit),
            };
            DuoPartner {
                partner: kit.slug().to_string(),
                partner_name: kit.name().to_string(),
                score: synergy.score,
                reasons: synergy.reasons,
                combos: synergy.combos,
            }
        })
        .collect();

    ranked.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.partner.cmp(&b.partner)));
    ranked.truncate(count);
    tracing::debug!(target: "scout::synergy", hero = hero.slug(), partners = ranked.len(), "Ranked duo partners");
    ranked
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DuoAnalysis {
    pub support: String,
    pub partner: String,
    #[serde(flatten)]
    pub synergy: SynergyScore,
}

/// Scores a specific pair. A hero flagged as support is the enabler; with
/// neither flagged, whichever direction scores higher wins (`first` on ties).
pub fn analyze_duo(first: &HeroKit, second: &HeroKit, first_supports: bool, second_supports: bool) -> DuoAnalysis {
    let (support, partner, synergy) = if first_supports {
        (first, second, score_synergy(first, second))
    } else if second_supports {
        (second, first, score_synergy(second, first))
    } else {
        let forward = score_synergy(first, second);
        let backward = score_synergy(second, first);
        if forward.score >= backward.score {
            (first, second, forward)
        } else {
            (second, first, backward)
        }
    };
    DuoAnalysis {
        support: support.slug().to_string(),
        partner: partner.slug().to_string(),
        synergy,
    }
}
