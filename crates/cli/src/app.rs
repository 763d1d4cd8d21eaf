use crate::cli::{Cli, Commands, OutputFormat};
use crate::config::resolve_config;
use crate::dataset::{load_dataset, Dataset};
use crate::output::emit;
use anyhow::{Context, Result};
use clap::Parser;
use scout_engine::{highest_win_rate_build, meta_diff, Ally, Engine, EngineError, MetaDiff};

/// Parses `slug` or `slug:role`.
pub fn parse_ally(arg: &str) -> Ally {
    match arg.split_once(':') {
        Some((slug, role)) if !role.trim().is_empty() => Ally::new(slug.trim(), Some(role.trim())),
        Some((slug, _)) => Ally::new(slug.trim(), None),
        None => Ally::new(arg.trim(), None),
    }
}

fn require_hero(engine: &Engine, slug: &str) -> Result<(), EngineError> {
    match engine.profile(slug) {
        Some(_) => Ok(()),
        None => Err(EngineError::HeroNotFound(slug.to_string())),
    }
}

/// Distinguishes an unknown hero from one without ability data.
fn missing_abilities(engine: &Engine, slugs: &[&str]) -> EngineError {
    for slug in slugs {
        if let Err(e) = require_hero(engine, slug) {
            return e;
        }
    }
    let missing = slugs
        .iter()
        .find(|s| engine.hero_kit(s).is_none())
        .or(slugs.first())
        .copied()
        .unwrap_or_default();
    EngineError::NoAbilityData(missing.to_string())
}

fn diff(
    engine: &Engine,
    dataset: &Dataset,
    baseline: &[String],
    counter: &[String],
    enemy: Option<&str>,
) -> Result<MetaDiff, EngineError> {
    let (threats, enemy_name) = match enemy {
        Some(slug) => {
            let profile = engine
                .profile(slug)
                .ok_or_else(|| EngineError::EnemyNotFound(slug.to_string()))?;
            let min = engine.config().synthesis.min_build_matches;
            let items = dataset
                .stats
                .get(slug)
                .and_then(|d| highest_win_rate_build(d, None, min))
                .map(|b| b.items)
                .unwrap_or_default();
            (engine.analyze_build(&items, Some(slug)), profile.name.clone())
        }
        None => (engine.analyze_build::<String>(&[], None), "the enemy".to_string()),
    };
    Ok(meta_diff(baseline, counter, engine.index(), &threats, &enemy_name))
}

fn dispatch(command: Commands, format: OutputFormat, engine: &Engine, dataset: &Dataset) -> Result<()> {
    let data = &dataset.stats;
    match command {
        Commands::Counter { hero, enemy, role } => {
            emit(format, engine.counter_build_path(&hero, role.as_deref(), &enemy, data))
        }
        Commands::Duo { allies, enemies } => {
            let allies: Vec<Ally> = allies.iter().map(|a| parse_ally(a)).collect();
            emit(format, engine.duo_counter_build(&allies, &enemies, data))
        }
        Commands::Hero { enemy } => emit(format, engine.counter_hero_analysis(&enemy, data)),
        Commands::Duos { hero, count } => {
            let result = require_hero(engine, &hero).map(|()| engine.top_duos(&hero, count));
            emit(format, result)
        }
        Commands::Analyze { items, hero } => {
            let result = match hero.as_deref() {
                Some(h) => require_hero(engine, h).map(|()| engine.analyze_build(&items, Some(h))),
                None => Ok(engine.analyze_build(&items, None)),
            };
            emit(format, result)
        }
        Commands::Synergy { first, second } => {
            let result = engine
                .analyze_duo(&first, &second)
                .ok_or_else(|| missing_abilities(engine, &[first.as_str(), second.as_str()]));
            emit(format, result)
        }
        Commands::Tips { enemy, attacker } => {
            let result = match attacker.as_deref() {
                Some(you) => engine
                    .ability_tips(you, &enemy)
                    .ok_or_else(|| missing_abilities(engine, &[you, enemy.as_str()])),
                None => require_hero(engine, &enemy).map(|()| engine.defender_tips(&enemy)),
            };
            emit(format, result)
        }
        Commands::Combo { hero, rank } => {
            let result = engine
                .hero_combo(&hero, rank)
                .ok_or_else(|| missing_abilities(engine, &[hero.as_str()]));
            emit(format, result)
        }
        Commands::Diff {
            baseline,
            counter,
            enemy,
        } => emit(format, diff(engine, dataset, &baseline, &counter, enemy.as_deref())),
    }
}

/// Entry point for the `scout` binary.
pub fn run() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = resolve_config(cli.config.as_deref())?;
    let data_dir = cli
        .data
        .context("no dataset directory: pass --data or set SCOUT_DATA_DIR")?;
    let dataset = load_dataset(&data_dir).with_context(|| format!("loading dataset {}", data_dir.display()))?;
    let engine = Engine::with_config(&dataset.knowledge, config);

    dispatch(cli.command, cli.format, &engine, &dataset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use scout_test_utils::{sample_hero_data, sample_knowledge_base};

    fn fixture() -> (Engine, Dataset) {
        let knowledge = sample_knowledge_base();
        let engine = Engine::new(&knowledge);
        (
            engine,
            Dataset {
                knowledge,
                stats: sample_hero_data(),
            },
        )
    }

    #[test]
    fn parse_ally_with_and_without_role() {
        assert_eq!(parse_ally("sparrow:carry"), Ally::new("sparrow", Some("carry")));
        assert_eq!(parse_ally("muriel"), Ally::new("muriel", None));
        assert_eq!(parse_ally("steel:"), Ally::new("steel", None));
    }

    #[test]
    fn missing_abilities_prefers_unknown_hero() {
        let (engine, _) = fixture();
        assert_eq!(
            missing_abilities(&engine, &["steel", "nobody"]),
            EngineError::HeroNotFound("nobody".into())
        );
        assert_eq!(
            missing_abilities(&engine, &["steel", "kallari"]),
            EngineError::NoAbilityData("kallari".into())
        );
    }

    #[test]
    fn diff_against_enemy_best_build() {
        let (engine, dataset) = fixture();
        let baseline = vec!["Sky Splitter".to_string(), "Rapture".to_string()];
        let counter = vec!["Sky Splitter".to_string(), "Tainted Blade".to_string()];
        let result = diff(&engine, &dataset, &baseline, &counter, Some("grux")).unwrap();
        assert_eq!(result.kept, vec!["Sky Splitter"]);
        assert_eq!(result.swaps.len(), 1);
        assert!(result.swaps[0].reason.contains("Grux"));

        let err = diff(&engine, &dataset, &baseline, &counter, Some("nobody")).unwrap_err();
        assert_eq!(err, EngineError::EnemyNotFound("nobody".into()));
    }
}
