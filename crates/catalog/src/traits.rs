//! Crowd-control and trait extraction from ability text.
//!
//! Structured CC records attached to an ability are authoritative; the
//! description is scanned afterwards with [`CC_RULES`] to pick up anything the
//! records do not mention. Trait tables classify abilities for kit scoring
//! ([`KitTrait`]) and for matchup tips ([`DefensiveTrait`], [`OffensiveTrait`]).

use crate::rules::{pat, pat_unless, CompiledRules, PatternRule, TextMatcher, TextPattern};
use crate::text::clean_description;
use crate::types::CcRecord;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

// ============================================================================
// CC kinds
// ============================================================================

/// Crowd-control type. Unknown labels from structured records are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CcKind {
    Stun,
    Root,
    Suppress,
    Knockup,
    Fear,
    Pull,
    Knockback,
    Slow,
    Silence,
    Other(String),
}

impl CcKind {
    pub fn as_str(&self) -> &str {
        match self {
            CcKind::Stun => "stun",
            CcKind::Root => "root",
            CcKind::Suppress => "suppress",
            CcKind::Knockup => "knockup",
            CcKind::Fear => "fear",
            CcKind::Pull => "pull",
            CcKind::Knockback => "knockback",
            CcKind::Slow => "slow",
            CcKind::Silence => "silence",
            CcKind::Other(label) => label,
        }
    }

    /// Stun, root, suppress, knockup, fear, pull and knockback.
    pub fn is_hard(&self) -> bool {
        matches!(
            self,
            CcKind::Stun
                | CcKind::Root
                | CcKind::Suppress
                | CcKind::Knockup
                | CcKind::Fear
                | CcKind::Pull
                | CcKind::Knockback
        )
    }

    /// Kinds that start a fight: stun, pull, knockup, knockback.
    pub fn is_engage(&self) -> bool {
        matches!(self, CcKind::Stun | CcKind::Pull | CcKind::Knockup | CcKind::Knockback)
    }
}

impl From<&str> for CcKind {
    fn from(label: &str) -> Self {
        match label.to_ascii_lowercase().as_str() {
            "stun" => CcKind::Stun,
            "root" => CcKind::Root,
            "suppress" => CcKind::Suppress,
            "knockup" => CcKind::Knockup,
            "fear" => CcKind::Fear,
            "pull" => CcKind::Pull,
            "knockback" => CcKind::Knockback,
            "slow" => CcKind::Slow,
            "silence" => CcKind::Silence,
            _ => CcKind::Other(label.to_string()),
        }
    }
}

impl From<String> for CcKind {
    fn from(label: String) -> Self {
        CcKind::from(label.as_str())
    }
}

impl From<CcKind> for String {
    fn from(kind: CcKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for CcKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One normalized crowd-control entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CcEffect {
    #[serde(rename = "type")]
    pub kind: CcKind,
    /// Seconds.
    pub duration: f64,
    pub hard: bool,
}

/// Duration heuristics for CC extraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CcExtractorConfig {
    /// A structured slow whose value exceeds this is a percentage, not seconds.
    pub slow_percent_threshold: f64,
    /// Duration given to slows with no usable duration.
    pub slow_default_duration: f64,
    /// Duration given to structured records without a value.
    pub structured_default_duration: f64,
    /// Duration given to text matches without a captured duration.
    pub text_default_duration: f64,
    /// Replacement for durations that parse to zero.
    pub zero_duration_replacement: f64,
}

impl Default for CcExtractorConfig {
    fn default() -> Self {
        Self {
            slow_percent_threshold: 10.0,
            slow_default_duration: 1.0,
            structured_default_duration: 0.5,
            text_default_duration: 0.75,
            zero_duration_replacement: 0.5,
        }
    }
}

// ============================================================================
// CC rule table
// ============================================================================

#[derive(Debug, Clone, Copy)]
enum DurationSource {
    /// Always this many seconds.
    Fixed(f64),
    /// Capture group, else the text default.
    Captured(usize),
    /// Capture group, else the slow default.
    CapturedSlow(usize),
}

struct CcRule {
    kind: CcKind,
    matcher: TextMatcher,
    hard: bool,
    duration: DurationSource,
}

/// Ordered description patterns. Earlier rules win for the same kind.
static CC_RULES: LazyLock<Vec<CcRule>> = LazyLock::new(|| {
    use DurationSource::*;
    let table: [(CcKind, TextPattern, bool, DurationSource); 11] = [
        (CcKind::Stun, pat(r"stunn?(?:ing|ed|s)?\b.{0,60}?(?:for\s+)?(\d+\.?\d*)\s*s"), true, Captured(1)),
        (CcKind::Root, pat(r"root(?:ing|ed|s)?\b.{0,60}?(?:for\s+)?(\d+\.?\d*)\s*s"), true, Captured(1)),
        (CcKind::Suppress, pat(r"suppress(?:ing|ed|es)?\b.{0,60}?(?:for\s+)?(\d+\.?\d*)\s*s"), true, Captured(1)),
        (
            CcKind::Knockup,
            pat(r"knock(?:ing)?\s*(?:them\s+)?(?:all\s+)?(?:enem\w*\s+)?up\b.{0,40}?(?:for\s+)?(\d+\.?\d*)?\s*s?"),
            true,
            Captured(1),
        ),
        (CcKind::Knockup, pat(r"knock(?:ing)?\s+up\b"), true, Fixed(0.75)),
        (CcKind::Silence, pat(r"silenc(?:ing|ed|es?)?\b.{0,60}?(?:for\s+)?(\d+\.?\d*)\s*s"), false, Captured(1)),
        (CcKind::Pull, pat(r"pull(?:ing|s|ed)?\s+(?:all\s+)?(?:them|targets?|enem)"), true, Captured(1)),
        (CcKind::Fear, pat(r"fear(?:ing|ed|s)?\b.{0,60}?(?:for\s+)?(\d+\.?\d*)\s*s"), true, Captured(1)),
        (
            CcKind::Slow,
            pat(r"slow(?:ing|ed|s)?\b.{0,60}?(?:by\s+)?(\d+)%\s*(?:for\s+)?(\d+\.?\d*)?\s*s?"),
            false,
            CapturedSlow(2),
        ),
        (CcKind::Knockback, pat(r"knock(?:ing)?\s*(?:them\s+)?back"), true, Captured(1)),
        (CcKind::Stun, pat(r"stunn?(?:ing|ed|s)?\s+instead"), true, Fixed(1.0)),
    ];
    table
        .into_iter()
        .map(|(kind, pattern, hard, duration)| CcRule {
            kind,
            // RATIONALE: compile-time constant patterns; `.expect()` cannot fire.
            matcher: TextMatcher::compile(&pattern).expect("CC_RULES: compile-time constant"),
            hard,
            duration,
        })
        .collect()
});

/// Extracts CC entries from structured records, then from `description`.
///
/// Each kind appears at most once from text; structured records are kept as
/// given. Text with no CC wording yields nothing.
pub fn extract_cc(description: &str, structured: &[CcRecord], config: &CcExtractorConfig) -> Vec<CcEffect> {
    let mut found: Vec<CcEffect> = structured
        .iter()
        .map(|record| {
            let kind = CcKind::from(record.kind.as_str());
            let duration = match record.value {
                Some(v) if kind == CcKind::Slow && v > config.slow_percent_threshold => config.slow_default_duration,
                Some(v) if v.is_finite() && v != 0.0 => v,
                _ => config.structured_default_duration,
            };
            CcEffect {
                hard: kind.is_hard(),
                kind,
                duration,
            }
        })
        .collect();

    for rule in CC_RULES.iter() {
        if found.iter().any(|cc| cc.kind == rule.kind) {
            continue;
        }
        let Some(caps) = rule.matcher.captures(description) else {
            continue;
        };
        let captured = |group: usize| caps.get(group).and_then(|m| m.as_str().parse::<f64>().ok());
        let duration = match rule.duration {
            DurationSource::Fixed(secs) => secs,
            DurationSource::Captured(group) => captured(group).unwrap_or(config.text_default_duration),
            DurationSource::CapturedSlow(group) => captured(group).unwrap_or(config.slow_default_duration),
        };
        let duration = if duration == 0.0 || !duration.is_finite() {
            config.zero_duration_replacement
        } else {
            duration
        };
        found.push(CcEffect {
            kind: rule.kind.clone(),
            duration,
            hard: rule.hard,
        });
    }

    tracing::trace!(target: "scout::traits", count = found.len(), "Extracted CC");
    found
}

// ============================================================================
// Kit traits
// ============================================================================

/// Coarse ability role used for duo scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KitTrait {
    Shield,
    Heal,
    SpeedBoost,
    DamageReduction,
    Aoe,
    Mobility,
}

pub const KIT_TRAIT_RULES: &[PatternRule<KitTrait>] = &[
    PatternRule { label: KitTrait::Shield, patterns: &[pat("shield")] },
    PatternRule {
        label: KitTrait::Heal,
        patterns: &[
            pat_unless(r"\bheal", "th|ing.*reduc"),
            pat(r"\brestore.*\bhealth\b"),
            pat(r"\bregen.*\bhealth\b"),
        ],
    },
    PatternRule {
        label: KitTrait::SpeedBoost,
        patterns: &[pat("movement speed"), pat("haste"), pat("speed boost")],
    },
    PatternRule { label: KitTrait::DamageReduction, patterns: &[pat("damage reduc"), pat("armor")] },
    PatternRule {
        label: KitTrait::Aoe,
        patterns: &[pat("area"), pat("aoe"), pat("nearby enem"), pat("all enem")],
    },
    PatternRule {
        label: KitTrait::Mobility,
        patterns: &[pat("dash"), pat("charge"), pat("leap"), pat("teleport"), pat("blink")],
    },
];

// RATIONALE: compile-time constant patterns; `.expect()` cannot fire.
static KIT_TRAIT_MATCHERS: LazyLock<CompiledRules<KitTrait>> =
    LazyLock::new(|| CompiledRules::compile(KIT_TRAIT_RULES).expect("KIT_TRAIT_RULES: compile-time constant"));

/// Kit traits of an ability description, in table order.
pub fn kit_traits(description: &str) -> Vec<KitTrait> {
    let text = clean_description(description);
    KIT_TRAIT_MATCHERS.matching(&text).collect()
}

/// Augments read the same way as abilities.
pub fn augment_traits(description: &str) -> Vec<KitTrait> {
    kit_traits(description)
}

// ============================================================================
// Interaction traits
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefensiveTrait {
    Cleanse,
    CcImmunity,
    SpellShield,
    Dash,
    Healing,
    Shield,
    DamageReduction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OffensiveTrait {
    Stun,
    Root,
    Suppress,
    Silence,
    Knockup,
    Slow,
    Pull,
    AntiHeal,
    Execute,
}

impl OffensiveTrait {
    pub fn as_str(self) -> &'static str {
        match self {
            OffensiveTrait::Stun => "stun",
            OffensiveTrait::Root => "root",
            OffensiveTrait::Suppress => "suppress",
            OffensiveTrait::Silence => "silence",
            OffensiveTrait::Knockup => "knockup",
            OffensiveTrait::Slow => "slow",
            OffensiveTrait::Pull => "pull",
            OffensiveTrait::AntiHeal => "anti_heal",
            OffensiveTrait::Execute => "execute",
        }
    }

    /// Stun, root, suppress, knockup and pull.
    pub fn is_hard_cc(self) -> bool {
        matches!(
            self,
            OffensiveTrait::Stun
                | OffensiveTrait::Root
                | OffensiveTrait::Suppress
                | OffensiveTrait::Knockup
                | OffensiveTrait::Pull
        )
    }
}

pub const DEFENSIVE_RULES: &[PatternRule<DefensiveTrait>] = &[
    PatternRule {
        label: DefensiveTrait::Cleanse,
        patterns: &[pat(r"\bcleanse\b"), pat(r"removes? (?:all )?debuffs"), pat(r"removes? crowd control")],
    },
    PatternRule {
        label: DefensiveTrait::CcImmunity,
        patterns: &[pat("cc immun"), pat("crowd control immun"), pat(r"\bunstoppable\b")],
    },
    PatternRule {
        label: DefensiveTrait::SpellShield,
        patterns: &[pat("spell shield"), pat(r"blocks? (?:the next |an? )?abilit")],
    },
    PatternRule {
        label: DefensiveTrait::Dash,
        patterns: &[
            pat(r"\bdash(?:es)?\b"),
            pat(r"\bleap(?:s)?\b"),
            pat(r"\bblink(?:s)?\b"),
            pat(r"\bteleport(?:s)?\b"),
            pat("shadow walk"),
        ],
    },
    PatternRule {
        label: DefensiveTrait::Healing,
        patterns: &[
            pat(r"\bheals?\b"),
            pat(r"\bregenerat"),
            pat("restore.*health"),
            pat("health regen"),
            pat("life steal"),
            pat("lifesteal"),
            pat("omnivamp"),
        ],
    },
    PatternRule { label: DefensiveTrait::Shield, patterns: &[pat(r"\bshield\b"), pat(r"\bbarrier\b")] },
    PatternRule {
        label: DefensiveTrait::DamageReduction,
        patterns: &[pat("damage reduction"), pat("reduce.*damage.*taken"), pat(r"takes? \d+% less")],
    },
];

pub const OFFENSIVE_RULES: &[PatternRule<OffensiveTrait>] = &[
    PatternRule { label: OffensiveTrait::Stun, patterns: &[pat(r"\bstun(?:s|ned|ning)?\b")] },
    PatternRule { label: OffensiveTrait::Root, patterns: &[pat(r"\broot(?:s|ed|ing)?\b")] },
    PatternRule { label: OffensiveTrait::Suppress, patterns: &[pat(r"\bsuppress(?:es|ed|ion)?\b")] },
    PatternRule { label: OffensiveTrait::Silence, patterns: &[pat(r"\bsilence(?:s|d)?\b")] },
    PatternRule {
        label: OffensiveTrait::Knockup,
        patterns: &[pat(r"knock(?:s|ed|ing)?\s*up"), pat(r"knock(?:s|ed|ing)?\s*back"), pat("displac")],
    },
    PatternRule { label: OffensiveTrait::Slow, patterns: &[pat(r"\bslow(?:s|ed|ing)?\b")] },
    PatternRule {
        label: OffensiveTrait::Pull,
        patterns: &[pat(r"\bpull(?:s|ed|ing)?\b"), pat(r"\bgrab(?:s)?\b"), pat(r"drags?\b")],
    },
    PatternRule {
        label: OffensiveTrait::AntiHeal,
        patterns: &[pat("anti[- ]?heal"), pat("grievous"), pat("reduc.*healing"), pat("healing.*reduc")],
    },
    PatternRule {
        label: OffensiveTrait::Execute,
        patterns: &[
            pat(r"\bexecute\b"),
            pat("deals? more damage.*low health"),
            pat("bonus damage.*missing health"),
        ],
    },
];

// RATIONALE: compile-time constant patterns; `.expect()` cannot fire.
static DEFENSIVE_MATCHERS: LazyLock<CompiledRules<DefensiveTrait>> =
    LazyLock::new(|| CompiledRules::compile(DEFENSIVE_RULES).expect("DEFENSIVE_RULES: compile-time constant"));
static OFFENSIVE_MATCHERS: LazyLock<CompiledRules<OffensiveTrait>> =
    LazyLock::new(|| CompiledRules::compile(OFFENSIVE_RULES).expect("OFFENSIVE_RULES: compile-time constant"));

/// Defensive and offensive traits of one ability.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionTraits {
    pub defensive: Vec<DefensiveTrait>,
    pub offensive: Vec<OffensiveTrait>,
}

/// Classifies an ability for matchup tips. Structured CC is merged into the
/// offensive set; any structured type mentioning "knock" counts as knockup.
pub fn interaction_traits(description: &str, structured: &[CcRecord]) -> InteractionTraits {
    let text = clean_description(description);
    let defensive = DEFENSIVE_MATCHERS.matching(&text).collect();
    let mut offensive: Vec<OffensiveTrait> = OFFENSIVE_MATCHERS.matching(&text).collect();

    for record in structured {
        let label = record.kind.to_ascii_lowercase();
        let merged = match label.as_str() {
            "stun" => Some(OffensiveTrait::Stun),
            "root" => Some(OffensiveTrait::Root),
            "slow" => Some(OffensiveTrait::Slow),
            "suppress" => Some(OffensiveTrait::Suppress),
            "silence" => Some(OffensiveTrait::Silence),
            l if l.contains("knock") => Some(OffensiveTrait::Knockup),
            _ => None,
        };
        if let Some(t) = merged {
            if !offensive.contains(&t) {
                offensive.push(t);
            }
        }
    }

    InteractionTraits { defensive, offensive }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(kind: &str, value: Option<f64>) -> CcRecord {
        CcRecord {
            kind: kind.to_string(),
            value,
        }
    }

    // ------------------------------------------------------------------
    // CC extraction
    // ------------------------------------------------------------------

    #[test]
    fn test_stun_duration_from_text() {
        let cc = extract_cc("Stuns enemies for 2.5s", &[], &CcExtractorConfig::default());
        assert_eq!(
            cc,
            vec![CcEffect {
                kind: CcKind::Stun,
                duration: 2.5,
                hard: true
            }]
        );
    }

    #[test]
    fn test_plain_text_yields_nothing() {
        assert!(extract_cc("Deals damage to the target.", &[], &CcExtractorConfig::default()).is_empty());
    }

    #[test]
    fn test_structured_records_take_precedence() {
        let cc = extract_cc(
            "Stuns the target for 3s.",
            &[record("stun", Some(1.25))],
            &CcExtractorConfig::default(),
        );
        assert_eq!(cc.len(), 1);
        assert_eq!(cc[0].duration, 1.25);
    }

    #[test]
    fn test_structured_slow_percentage_uses_default_duration() {
        let config = CcExtractorConfig::default();
        let cc = extract_cc("", &[record("slow", Some(35.0)), record("root", None)], &config);
        assert_eq!(cc[0].duration, config.slow_default_duration);
        assert!(!cc[0].hard);
        assert_eq!(cc[1].duration, config.structured_default_duration);
        assert!(cc[1].hard);
    }

    #[test]
    fn test_slow_threshold_is_configurable() {
        let config = CcExtractorConfig {
            slow_percent_threshold: 50.0,
            ..Default::default()
        };
        let cc = extract_cc("", &[record("slow", Some(35.0))], &config);
        assert_eq!(cc[0].duration, 35.0);
    }

    #[test]
    fn test_text_slow_percentage_and_duration() {
        let cc = extract_cc("Slows by 40% for 2s.", &[], &CcExtractorConfig::default());
        assert_eq!(cc.len(), 1);
        assert_eq!(cc[0].kind, CcKind::Slow);
        assert_eq!(cc[0].duration, 2.0);
        assert!(!cc[0].hard);
    }

    #[test]
    fn test_text_slow_without_duration_defaults() {
        let cc = extract_cc("Slowing enemies by 30%.", &[], &CcExtractorConfig::default());
        assert_eq!(cc[0].duration, 1.0);
    }

    #[test]
    fn test_knock_up_without_duration_uses_fallback() {
        let cc = extract_cc("Leaps forward, knocking up nearby foes.", &[], &CcExtractorConfig::default());
        let knockup = cc.iter().find(|c| c.kind == CcKind::Knockup).expect("knockup");
        assert_eq!(knockup.duration, 0.75);
        assert!(knockup.hard);
    }

    #[test]
    fn test_zero_duration_is_replaced() {
        let cc = extract_cc("Roots the target for 0s.", &[], &CcExtractorConfig::default());
        assert_eq!(cc[0].duration, 0.5);
    }

    #[test]
    fn test_pull_is_hard_with_default_duration() {
        let cc = extract_cc("Pulls all enemies toward the center.", &[], &CcExtractorConfig::default());
        assert_eq!(cc[0].kind, CcKind::Pull);
        assert_eq!(cc[0].duration, 0.75);
    }

    #[test]
    fn test_unknown_structured_kind_is_soft() {
        let cc = extract_cc("", &[record("Blind", Some(1.0))], &CcExtractorConfig::default());
        assert_eq!(cc[0].kind, CcKind::Other("Blind".into()));
        assert!(!cc[0].hard);
    }

    #[test]
    fn test_cc_kind_serializes_as_label() {
        let json = serde_json::to_string(&CcEffect {
            kind: CcKind::Knockup,
            duration: 1.0,
            hard: true,
        })
        .expect("serialize");
        assert_eq!(json, r#"{"type":"knockup","duration":1.0,"hard":true}"#);
    }

    // ------------------------------------------------------------------
    // Traits
    // ------------------------------------------------------------------

    #[test]
    fn test_heal_excludes_health_and_healing_reduction() {
        assert!(kit_traits("Heals allies for 80").contains(&KitTrait::Heal));
        assert!(!kit_traits("Gains bonus health").contains(&KitTrait::Heal));
        assert!(!kit_traits("Applies healing reduction").contains(&KitTrait::Heal));
        assert!(kit_traits("Restores 5% max health").contains(&KitTrait::Heal));
    }

    #[test]
    fn test_kit_traits_strip_markup() {
        let traits = kit_traits("Deals <b>area</b> damage and grants a shield.");
        assert_eq!(traits, vec![KitTrait::Shield, KitTrait::Aoe]);
    }

    #[test]
    fn test_augment_traits_follow_ability_rules() {
        assert_eq!(augment_traits("Dash grants a shield"), vec![KitTrait::Shield, KitTrait::Mobility]);
    }

    #[test]
    fn test_interaction_traits_merge_structured_cc() {
        let traits = interaction_traits("Dashes forward and removes all debuffs.", &[record("knockback", Some(0.5))]);
        assert!(traits.defensive.contains(&DefensiveTrait::Dash));
        assert!(traits.defensive.contains(&DefensiveTrait::Cleanse));
        assert_eq!(traits.offensive, vec![OffensiveTrait::Knockup]);
    }

    #[test]
    fn test_offensive_hard_cc_set() {
        assert!(OffensiveTrait::Pull.is_hard_cc());
        assert!(!OffensiveTrait::Slow.is_hard_cc());
        assert!(!OffensiveTrait::Silence.is_hard_cc());
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn extracted_durations_are_positive(text in "\\PC{0,120}") {
                for cc in extract_cc(&text, &[], &CcExtractorConfig::default()) {
                    prop_assert!(cc.duration > 0.0);
                    prop_assert_eq!(cc.hard, cc.kind.is_hard());
                }
            }
        }
    }
}
