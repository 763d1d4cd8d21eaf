//! Baseline-versus-counter build comparison.

use crate::analyze::ThreatProfile;
use crate::explain;
use scout_catalog::ItemIndex;
use serde::Serialize;
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Swap {
    pub removed: String,
    pub added: String,
    pub reason: String,
}

/// Edit script from a baseline build to a counter build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaDiff {
    pub kept: Vec<String>,
    pub swaps: Vec<Swap>,
    pub removed_extra: Vec<String>,
    pub added_extra: Vec<String>,
    pub identical: bool,
}

fn lowercase_set(items: &[String]) -> BTreeSet<String> {
    items.iter().map(|i| i.to_lowercase()).collect()
}

/// Compares item names case-insensitively. Removed and added items are
/// paired in order; whichever list is longer leaves its tail as extras.
pub fn meta_diff(
    baseline: &[String],
    counter: &[String],
    index: &ItemIndex,
    threats: &ThreatProfile,
    enemy_name: &str,
) -> MetaDiff {
    let baseline_set = lowercase_set(baseline);
    let counter_set = lowercase_set(counter);

    let (kept, removed): (Vec<String>, Vec<String>) = baseline
        .iter()
        .cloned()
        .partition(|i| counter_set.contains(&i.to_lowercase()));
    let added: Vec<String> = counter
        .iter()
        .filter(|i| !baseline_set.contains(&i.to_lowercase()))
        .cloned()
        .collect();

    let swaps = removed
        .iter()
        .zip(&added)
        .map(|(r, a)| Swap {
            removed: r.clone(),
            added: a.clone(),
            reason: explain::swap_reason(index.get(a), threats, enemy_name),
        })
        .collect();

    MetaDiff {
        identical: removed.is_empty() && added.is_empty(),
        removed_extra: removed.iter().skip(added.len()).cloned().collect(),
        added_extra: added.iter().skip(removed.len()).cloned().collect(),
        kept,
        swaps,
    }
}
