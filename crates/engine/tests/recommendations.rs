use proptest::prelude::*;
use scout_catalog::{EffectTag, HeroDataMap};
use scout_engine::{Ally, Engine, EngineError, Response, Threat, Weakness};
use scout_test_utils::{hero_stats, sample_hero_data, sample_items, sample_knowledge_base, RoleStatsBuilder};
use std::collections::BTreeSet;

fn engine() -> Engine {
    Engine::new(&sample_knowledge_base())
}

fn enemies(slugs: &[&str]) -> Vec<String> {
    slugs.iter().map(|s| s.to_string()).collect()
}

/// Sample data with grux's only build replaced by `items`.
fn data_with_grux_build(items: &[&str]) -> HeroDataMap {
    let mut data = sample_hero_data();
    data.insert(
        "grux".to_string(),
        hero_stats(vec![(
            "offlane",
            RoleStatsBuilder::new().build_tab("Test", items, 55.0, 100).build(),
        )]),
    );
    data
}

fn completed_item_names() -> Vec<String> {
    let index = scout_catalog::ItemIndex::build(&sample_items());
    index.completed_items().into_iter().map(|i| i.name.clone()).collect()
}

// ============================================================================
// Solo counter builds
// ============================================================================

#[test]
fn sparrow_into_grux_counter_path() {
    let e = engine();
    let result = e.counter_build_path("sparrow", Some("carry"), "grux", &sample_hero_data()).unwrap();

    assert_eq!(result.your_hero.name, "Sparrow");
    assert_eq!(result.vs_enemy.meta_build.name, "Bruiser");
    assert!(result.enemy_build_analysis.has_sustain);
    assert!(result.enemy_build_analysis.threats.contains(&Threat::HealsALot));

    let core = &result.counter_build.core_items;
    assert_eq!(core.len(), 3);
    assert!(
        core.iter().any(|i| i == "Tainted Blade"),
        "anti-heal should be in the core: {core:?}"
    );
    assert_eq!(result.counter_build.items.len(), 6);
    assert_eq!(&result.counter_build.items[..3], core.as_slice());

    let aggressive = result.aggressive_build.as_ref().unwrap();
    assert_eq!(aggressive.name, "On-Hit");
    assert_eq!(aggressive.core_items, vec!["Sky Splitter", "Rapture", "Basilisk"]);

    let diff = result.meta_diff.as_ref().unwrap();
    assert!(!diff.identical);
    assert!(diff.swaps.iter().any(|s| s.added == "Tainted Blade"));

    assert!(result.counter_data.has_direct_data);
    assert!(result.counter_data.your_vs_enemy.is_some());
    assert!(result.counter_data.enemy_vs_you.is_some());
    assert!(result.scraped_counter_build.is_some());

    assert_eq!(result.enemy_augment_warnings.len(), 1);
    assert_eq!(
        result.enemy_augment_warnings[0].note.as_deref(),
        Some("Enemy likely runs Bloodlust (57% WR)")
    );
}

#[test]
fn counter_path_reasons_explain_anti_heal() {
    let e = engine();
    let result = e.counter_build_path("sparrow", None, "grux", &sample_hero_data()).unwrap();
    let pick = result
        .counter_build
        .path
        .iter()
        .find(|p| p.item == "Tainted Blade")
        .unwrap();
    assert!(pick.reasons.iter().any(|r| r.contains("Grux")), "{:?}", pick.reasons);
}

#[test]
fn counter_build_output_is_camel_case_json() {
    let e = engine();
    let result = e.counter_build_path("sparrow", None, "grux", &sample_hero_data());
    let json = serde_json::to_value(Response::from(result)).unwrap();
    assert!(json.get("yourHero").is_some());
    assert!(json.get("counterBuild").and_then(|c| c.get("coreItems")).is_some());
    assert!(json.get("enemyBuildAnalysis").is_some());
}

#[test]
fn errors_serialize_as_envelope() {
    let e = engine();
    let result = e.counter_build_path("sparrow", None, "nobody", &sample_hero_data());
    assert_eq!(result.as_ref().unwrap_err(), &EngineError::EnemyNotFound("nobody".into()));
    let json = serde_json::to_value(Response::from(result)).unwrap();
    assert_eq!(json["error"], "Enemy \"nobody\" not found in profiles");
}

#[test]
fn counter_build_is_deterministic() {
    let e = engine();
    let data = sample_hero_data();
    let first = e.counter_build_path("gideon", None, "grux", &data).unwrap();
    let second = e.counter_build_path("gideon", None, "grux", &data).unwrap();
    assert_eq!(first, second);

    let rebuilt = engine();
    assert_eq!(rebuilt.counter_build_path("gideon", None, "grux", &data).unwrap(), first);
}

#[test]
fn lifesteal_enemy_build_flags_sustain() {
    let e = engine();
    let p = e.analyze_build(&["Bloodletter"], Some("grux"));
    assert!(p.has_sustain);
    assert!(p.has_weakness(Weakness::CantCutYourHealing));
}

#[test]
fn core_path_avoids_family_reuse_when_alternatives_exist() {
    let e = engine();
    let result = e.counter_build_path("sparrow", None, "grux", &sample_hero_data()).unwrap();
    let families: Vec<_> = result
        .counter_build
        .core_items
        .iter()
        .filter_map(|name| e.index().get(name).and_then(|i| i.family))
        .collect();
    let unique: BTreeSet<_> = families.iter().collect();
    assert_eq!(families.len(), unique.len());
}

// ============================================================================
// Hero-agnostic counters
// ============================================================================

#[test]
fn counter_hero_analysis_for_hero_without_stats() {
    let e = engine();
    let err = e.counter_hero_analysis("kallari", &sample_hero_data()).unwrap_err();
    assert_eq!(err, EngineError::NoBuildData("Kallari".into()));
}

// ============================================================================
// Duo lanes
// ============================================================================

#[test]
fn duo_lane_splits_anti_heal_and_items() {
    let e = engine();
    let allies = vec![Ally::new("sparrow", Some("carry")), Ally::new("muriel", Some("support"))];
    let result = e
        .duo_counter_build(&allies, &enemies(&["grux", "steel"]), &sample_hero_data())
        .unwrap();

    let anti_heal_holders: Vec<_> = result
        .allies
        .iter()
        .filter(|a| {
            a.build
                .items
                .iter()
                .any(|i| e.index().get(i).is_some_and(|item| item.has_tag(EffectTag::AntiHeal)))
        })
        .map(|a| a.hero.slug.as_str())
        .collect();
    assert_eq!(anti_heal_holders, vec!["muriel"]);

    let all_items: Vec<&String> = result.allies.iter().flat_map(|a| &a.build.items).collect();
    let unique: BTreeSet<_> = all_items.iter().collect();
    assert_eq!(all_items.len(), unique.len());

    assert!(result
        .tips
        .iter()
        .any(|t| t.starts_with("Enemy lane has sustain")));
}

#[test]
fn duo_output_is_deterministic() {
    let e = engine();
    let allies = vec![Ally::new("steel", None), Ally::new("gideon", None)];
    let data = sample_hero_data();
    let a = e.duo_counter_build(&allies, &enemies(&["grux", "sparrow"]), &data).unwrap();
    let b = e.duo_counter_build(&allies, &enemies(&["grux", "sparrow"]), &data).unwrap();
    assert_eq!(a, b);
    assert!(a.allies[0].is_support);
    assert!(!a.allies[1].is_support);
    assert!(a.synergy_notes.iter().any(|n| n.starts_with("CC + burst synergy")));
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn counter_paths_never_repeat_items(picks in proptest::collection::vec(0usize..64, 0..6)) {
        let names = completed_item_names();
        let build: Vec<&str> = picks.iter().map(|i| names[i % names.len()].as_str()).collect();
        let data = data_with_grux_build(&build);
        let e = engine();
        for hero in ["sparrow", "gideon", "muriel", "kallari"] {
            let result = e.counter_build_path(hero, None, "grux", &data).unwrap();
            let items = &result.counter_build.items;
            let unique: BTreeSet<_> = items.iter().map(|i| i.to_lowercase()).collect();
            prop_assert_eq!(unique.len(), items.len());
        }
    }

    #[test]
    fn sustain_always_pulls_anti_heal_into_core(picks in proptest::collection::vec(0usize..64, 0..5)) {
        let names = completed_item_names();
        let mut build: Vec<&str> = picks.iter().map(|i| names[i % names.len()].as_str()).collect();
        build.push("Bloodletter");
        let data = data_with_grux_build(&build);
        let e = engine();
        let result = e.counter_build_path("sparrow", None, "grux", &data).unwrap();
        prop_assert!(result.enemy_build_analysis.has_sustain);
        let has_anti_heal = result
            .counter_build
            .core_items
            .iter()
            .any(|i| e.index().get(i).is_some_and(|item| item.has_tag(EffectTag::AntiHeal)));
        prop_assert!(has_anti_heal);
    }

    #[test]
    fn synergy_scores_are_stable(first in 0usize..5, second in 0usize..5) {
        let slugs = ["grux", "sparrow", "muriel", "gideon", "steel"];
        let e = engine();
        let a = e.synergy(slugs[first], slugs[second]);
        let b = e.synergy(slugs[first], slugs[second]);
        prop_assert_eq!(a, b);
    }
}
