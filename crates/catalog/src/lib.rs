//! Game content model and derived indexes.
//!
//! This crate holds everything computed directly from static content:
//! - Raw item, ability, hero and statistics types ([`types`])
//! - The item index with semantic tags, stat categories and gold efficiency ([`index`])
//! - Crowd-control and trait extraction from ability text ([`traits`])
//! - Per-hero kit summaries for duo scoring ([`kit`])
//!
//! No I/O happens here; callers hand over already-parsed content.

#![deny(unsafe_code)]

pub mod index;
pub mod kit;
pub mod rules;
pub mod text;
pub mod traits;
pub mod types;

pub use index::{item_family, EffectTag, GoldEfficiency, IndexedItem, ItemIndex, StatCategory};
pub use kit::{display_name, CcAbility, HeroKit, KitAbility};
pub use text::{clean_description, clean_game_text};
pub use traits::{
    augment_traits, extract_cc, interaction_traits, kit_traits, CcEffect, CcExtractorConfig, CcKind,
    DefensiveTrait, InteractionTraits, KitTrait, OffensiveTrait,
};
pub use types::{
    confidence_score, stat, Ability, AbilityKey, AttackType, Augment, Build, BuildTab, CcRecord, CounterStat,
    DamageEntry, DamageType, HeroAbilitySet, HeroDataMap, HeroProfile, HeroStats, ItemData, ItemEffect,
    KnowledgeBase, MatchCount, Rarity, RawItem, RoleStats, SlotType, StatLine, StatValue, SynergyPreference,
    WinRate,
};
