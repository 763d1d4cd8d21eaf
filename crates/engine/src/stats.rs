//! Helpers over per-hero match statistics.
//!
//! Build selection, proven-item aggregation, role fallback and head-to-head
//! lookups. All of them tolerate missing data and return `None` or empty
//! results rather than failing.

use scout_catalog::{confidence_score, CounterStat, HeroStats, RoleStats, StatLine};
use serde::Serialize;
use std::collections::BTreeMap;

/// Average win rate assumed for an item seen only in zero-match builds.
const NEUTRAL_WIN_RATE: f64 = 50.0;

// ============================================================================
// Best build
// ============================================================================

/// The most convincing build on record, with the role it came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BestBuild {
    pub role: String,
    pub name: String,
    pub items: Vec<String>,
    pub win_rate: f64,
    pub matches: u32,
    pub augments: Vec<StatLine>,
    pub crests: Vec<StatLine>,
}

/// Highest `winRate × log2(matches + 1)` build across `role`, or across every
/// role when `role` is `None`. Builds below `min_matches` are ignored; if none
/// qualify the search is repeated with a minimum of one match.
pub fn highest_win_rate_build(data: &HeroStats, role: Option<&str>, min_matches: u32) -> Option<BestBuild> {
    let roles: Vec<(&String, &RoleStats)> = match role {
        Some(r) => data.roles.get_key_value(r).into_iter().collect(),
        None => data.roles.iter().collect(),
    };

    let mut best: Option<(f64, BestBuild)> = None;
    for (role_name, rd) in roles {
        for tab in &rd.build_tabs {
            let matches = tab.matches.0;
            if matches < min_matches {
                continue;
            }
            let score = confidence_score(tab.win_rate.0, matches);
            if best.as_ref().map_or(true, |(s, _)| score > *s) {
                best = Some((
                    score,
                    BestBuild {
                        role: role_name.clone(),
                        name: tab.name.clone(),
                        items: tab.items.clone(),
                        win_rate: tab.win_rate.0,
                        matches,
                        augments: rd.augments.clone(),
                        crests: rd.crests.clone(),
                    },
                ));
            }
        }
    }

    match best {
        Some((_, build)) => Some(build),
        None if min_matches > 1 => highest_win_rate_build(data, role, 1),
        None => None,
    }
}

// ============================================================================
// Proven items
// ============================================================================

/// How an item has fared in a hero's own recorded builds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvenItem {
    pub appearances: u32,
    pub total_matches: u64,
    /// Match-weighted average win rate.
    pub avg_win_rate: f64,
}

/// Proven items keyed by display name, plus the role data they came from.
#[derive(Debug, Clone, Default)]
pub struct ProvenItems<'a> {
    items: BTreeMap<String, ProvenItem>,
    role_stats: Option<&'a RoleStats>,
}

impl<'a> ProvenItems<'a> {
    pub fn get(&self, name: &str) -> Option<&ProvenItem> {
        self.items.get(name)
    }

    pub fn role_stats(&self) -> Option<&'a RoleStats> {
        self.role_stats
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// A recorded crest line with this exact name.
    pub fn crest(&self, name: &str) -> Option<&'a StatLine> {
        self.role_stats?.crests.iter().find(|c| c.name == name)
    }
}

/// Aggregates the build tabs of `role`.
///
/// Without a matching role this falls back to the alphabetically first role
/// in `data.roles` (a `BTreeMap`), not the first role in the dataset file.
pub fn proven_items<'a>(data: Option<&'a HeroStats>, role: Option<&str>) -> ProvenItems<'a> {
    let Some(data) = data else {
        return ProvenItems::default();
    };
    let role_stats = role
        .and_then(|r| data.roles.get(r))
        .or_else(|| data.roles.values().next());

    let mut sums: BTreeMap<String, (u32, f64, u64)> = BTreeMap::new();
    for tab in role_stats.map(|rd| rd.build_tabs.as_slice()).unwrap_or_default() {
        let matches = u64::from(tab.matches.0);
        for name in &tab.items {
            let entry = sums.entry(name.clone()).or_insert((0, 0.0, 0));
            entry.0 += 1;
            entry.1 += tab.win_rate.0 * matches as f64;
            entry.2 += matches;
        }
    }

    let items = sums
        .into_iter()
        .map(|(name, (appearances, weighted, total_matches))| {
            let avg_win_rate = if total_matches > 0 {
                weighted / total_matches as f64
            } else {
                NEUTRAL_WIN_RATE
            };
            (name, ProvenItem { appearances, total_matches, avg_win_rate })
        })
        .collect();

    ProvenItems { items, role_stats }
}

// ============================================================================
// Role resolution
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleResolution {
    pub valid_role: Option<String>,
    pub is_role_mismatch: bool,
    pub requested_role: Option<String>,
    pub fallback_role: Option<String>,
    pub active_roles: Vec<String>,
    pub hero_name: String,
}

/// Accepts the requested role when it is active (or absent); otherwise falls
/// back to the active role with the most recorded matches.
pub fn resolve_role(data: Option<&HeroStats>, hero_name: &str, requested: Option<&str>) -> RoleResolution {
    let active_roles: Vec<String> = data.map(|d| d.active_roles.clone()).unwrap_or_default();

    let accepted = match requested {
        None => true,
        Some(r) => active_roles.iter().any(|a| a == r),
    };
    if accepted {
        return RoleResolution {
            valid_role: requested.map(str::to_string),
            is_role_mismatch: false,
            requested_role: requested.map(str::to_string),
            fallback_role: None,
            active_roles,
            hero_name: hero_name.to_string(),
        };
    }

    let mut best_role = active_roles
        .first()
        .cloned()
        .or_else(|| data.and_then(|d| d.roles.keys().next().cloned()));
    let mut best_matches = 0u64;
    for role in &active_roles {
        let Some(rd) = data.and_then(|d| d.roles.get(role)) else {
            continue;
        };
        let total = rd.total_matches();
        if total > best_matches {
            best_matches = total;
            best_role = Some(role.clone());
        }
    }

    tracing::debug!(
        target: "scout::stats",
        hero = hero_name,
        requested = ?requested,
        fallback = ?best_role,
        "Requested role not active; falling back"
    );

    RoleResolution {
        valid_role: best_role.clone(),
        is_role_mismatch: true,
        requested_role: requested.map(str::to_string),
        fallback_role: best_role,
        active_roles,
        hero_name: hero_name.to_string(),
    }
}

// ============================================================================
// Head-to-head records
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeadToHead {
    pub win_rate: f64,
    pub matches: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnemyHeadToHead {
    pub enemy_win_rate: f64,
    pub matches: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CounterData {
    /// Your win rate against the enemy, from your own counter list.
    pub your_vs_enemy: Option<HeadToHead>,
    /// The enemy's win rate against you, from any of its roles.
    pub enemy_vs_you: Option<EnemyHeadToHead>,
    pub has_direct_data: bool,
}

/// Looks up direct matchup records in both directions. Names compare
/// case-insensitively and records need at least one match.
pub fn lookup_counter_data(
    yours: Option<&HeroStats>,
    enemy: Option<&HeroStats>,
    your_name: &str,
    enemy_name: &str,
    your_role: Option<&str>,
) -> CounterData {
    let your_vs_enemy = yours
        .and_then(|d| d.role_or_default(your_role))
        .and_then(|rd| rd.counter_against(enemy_name))
        .filter(|c| c.matches.0 >= 1)
        .map(|c| HeadToHead {
            win_rate: c.win_rate.0,
            matches: c.matches.0,
        });

    let enemy_vs_you = enemy.and_then(|d| {
        d.roles
            .values()
            .filter_map(|rd| rd.counter_against(your_name))
            .find(|c| c.matches.0 >= 1)
            .map(|c| EnemyHeadToHead {
                enemy_win_rate: c.win_rate.0,
                matches: c.matches.0,
            })
    });

    CounterData {
        has_direct_data: your_vs_enemy.is_some() || enemy_vs_you.is_some(),
        your_vs_enemy,
        enemy_vs_you,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapedCounterBuild {
    pub build: BestBuild,
    pub matchup_data: CounterStat,
}

/// Your best build in `role`, provided your record against the enemy has at
/// least `min_matchup_matches` games behind it.
pub fn scraped_counter_build(
    yours: &HeroStats,
    role: Option<&str>,
    enemy_name: &str,
    min_matchup_matches: u32,
    min_build_matches: u32,
) -> Option<ScrapedCounterBuild> {
    let rd = role
        .and_then(|r| yours.roles.get(r))
        .or_else(|| yours.active_roles.first().and_then(|r| yours.roles.get(r)))?;
    let matchup = rd
        .counter_against(enemy_name)
        .filter(|c| c.matches.0 >= min_matchup_matches)?;
    let build = highest_win_rate_build(yours, role, min_build_matches)?;
    Some(ScrapedCounterBuild {
        build,
        matchup_data: matchup.clone(),
    })
}

/// Highest-win-rate augment line, if it clears `min_win_rate`.
pub fn top_augment_above(augments: &[StatLine], min_win_rate: f64) -> Option<&StatLine> {
    augments
        .iter()
        .fold(None, |best: Option<&StatLine>, a| match best {
            Some(b) if b.win_rate.0 >= a.win_rate.0 => Some(b),
            _ => Some(a),
        })
        .filter(|a| a.win_rate.0 > min_win_rate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use scout_catalog::{MatchCount, WinRate};
    use scout_test_utils::RoleStatsBuilder;

    fn stats(roles: Vec<(&str, RoleStats)>, active: &[&str]) -> HeroStats {
        HeroStats {
            active_roles: active.iter().map(|s| s.to_string()).collect(),
            roles: roles.into_iter().map(|(k, v)| (k.to_string(), v)).collect(),
        }
    }

    #[test]
    fn test_best_build_weighs_confidence() {
        let rd = RoleStatsBuilder::new()
            .build_tab("Lucky", &["A"], 80.0, 2)
            .build_tab("Solid", &["B"], 56.0, 400)
            .build();
        let data = stats(vec![("offlane", rd)], &["offlane"]);
        let best = highest_win_rate_build(&data, None, 2).unwrap();
        assert_eq!(best.name, "Solid");
        assert_eq!(best.role, "offlane");
    }

    #[test]
    fn test_best_build_retries_with_single_match() {
        let rd = RoleStatsBuilder::new().build_tab("Only", &["A"], 60.0, 1).build();
        let data = stats(vec![("mid", rd)], &["mid"]);
        assert_eq!(highest_win_rate_build(&data, Some("mid"), 2).unwrap().name, "Only");
        assert!(highest_win_rate_build(&data, Some("jungle"), 2).is_none());
    }

    #[test]
    fn test_proven_items_weight_by_matches() {
        let rd = RoleStatsBuilder::new()
            .build_tab("A", &["Bloodletter", "Stonewall"], 60.0, 100)
            .build_tab("B", &["Bloodletter"], 40.0, 100)
            .build_tab("C", &["Ghost Item"], 70.0, 0)
            .build();
        let data = stats(vec![("carry", rd)], &["carry"]);
        let proven = proven_items(Some(&data), Some("carry"));
        let bl = proven.get("Bloodletter").unwrap();
        assert_eq!(bl.appearances, 2);
        assert!((bl.avg_win_rate - 50.0).abs() < 1e-9);
        assert_eq!(proven.get("Ghost Item").unwrap().avg_win_rate, NEUTRAL_WIN_RATE);
        assert!(proven.role_stats().is_some());
    }

    #[test]
    fn test_proven_items_fall_back_to_alphabetically_first_role() {
        let support = RoleStatsBuilder::new().build_tab("S", &["Lifebinder"], 55.0, 50).build();
        let carry = RoleStatsBuilder::new().build_tab("C", &["Rapture"], 52.0, 50).build();
        let data = stats(vec![("support", support), ("carry", carry)], &["support", "carry"]);

        for role in [None, Some("jungle")] {
            let proven = proven_items(Some(&data), role);
            assert!(proven.get("Rapture").is_some());
            assert!(proven.get("Lifebinder").is_none());
        }
    }

    #[test]
    fn test_proven_items_without_data() {
        let proven = proven_items(None, Some("carry"));
        assert!(proven.is_empty());
        assert!(proven.role_stats().is_none());
    }

    #[test]
    fn test_resolve_role_accepts_active_role() {
        let data = stats(vec![("mid", RoleStats::default())], &["mid"]);
        let r = resolve_role(Some(&data), "Gideon", Some("mid"));
        assert!(!r.is_role_mismatch);
        assert_eq!(r.valid_role.as_deref(), Some("mid"));
        let r = resolve_role(Some(&data), "Gideon", None);
        assert!(!r.is_role_mismatch);
        assert!(r.valid_role.is_none());
    }

    #[test]
    fn test_resolve_role_falls_back_to_richest_active_role() {
        let thin = RoleStatsBuilder::new().build_tab("x", &[], 50.0, 10).build();
        let rich = RoleStatsBuilder::new().build_tab("y", &[], 50.0, 500).build();
        let data = stats(vec![("carry", thin), ("support", rich)], &["carry", "support"]);
        let r = resolve_role(Some(&data), "Muriel", Some("jungle"));
        assert!(r.is_role_mismatch);
        assert_eq!(r.fallback_role.as_deref(), Some("support"));
        assert_eq!(r.requested_role.as_deref(), Some("jungle"));
    }

    #[test]
    fn test_resolve_role_without_data() {
        let r = resolve_role(None, "Nobody", Some("mid"));
        assert!(r.is_role_mismatch);
        assert!(r.valid_role.is_none());
        assert!(r.active_roles.is_empty());
    }

    #[test]
    fn test_counter_lookup_checks_both_directions() {
        let yours = stats(
            vec![("offlane", RoleStatsBuilder::new().counter("grux", 54.0, 40).build())],
            &["offlane"],
        );
        let enemy = stats(
            vec![
                ("jungle", RoleStats::default()),
                ("offlane", RoleStatsBuilder::new().counter("Steel", 47.0, 38).build()),
            ],
            &["offlane"],
        );
        let data = lookup_counter_data(Some(&yours), Some(&enemy), "Steel", "Grux", Some("offlane"));
        assert!(data.has_direct_data);
        assert_eq!(data.your_vs_enemy.unwrap().matches, 40);
        assert_eq!(data.enemy_vs_you.unwrap().enemy_win_rate, 47.0);
    }

    #[test]
    fn test_counter_lookup_ignores_empty_records() {
        let yours = stats(
            vec![("offlane", RoleStatsBuilder::new().counter("Grux", 54.0, 0).build())],
            &["offlane"],
        );
        let data = lookup_counter_data(Some(&yours), None, "Steel", "Grux", None);
        assert!(!data.has_direct_data);
    }

    #[test]
    fn test_scraped_counter_build_requires_enough_matchup_games() {
        let rd = RoleStatsBuilder::new()
            .build_tab("Main", &["A"], 55.0, 50)
            .counter("Grux", 52.0, 4)
            .build();
        let data = stats(vec![("offlane", rd)], &["offlane"]);
        assert!(scraped_counter_build(&data, Some("offlane"), "Grux", 5, 2).is_none());
        assert!(scraped_counter_build(&data, Some("offlane"), "Grux", 4, 2).is_some());
    }

    #[test]
    fn test_top_augment_above_threshold() {
        let lines = vec![
            StatLine { name: "A".into(), win_rate: WinRate(54.0), matches: MatchCount(10) },
            StatLine { name: "B".into(), win_rate: WinRate(58.0), matches: MatchCount(10) },
        ];
        assert_eq!(top_augment_above(&lines, 55.0).map(|a| a.name.as_str()), Some("B"));
        assert!(top_augment_above(&lines, 60.0).is_none());
        assert!(top_augment_above(&[], 0.0).is_none());
    }
}
