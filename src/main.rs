use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cardburg::{
    autoplay::{Autoplayer, Policy},
    engine::{Engine, EngineSettings},
    scenario::ScenarioLoader,
    stats::{get_stat_value, StatKey},
};

#[derive(Debug, Parser)]
#[command(author, version, about = "Cardburg headless city runner")]
struct Cli {
    /// Path to the scenario YAML file
    #[arg(long, default_value = "scenarios/starter.yaml")]
    scenario: PathBuf,

    /// Override turn count (uses scenario default when omitted)
    #[arg(long)]
    turns: Option<u32>,

    /// Override the scenario seed
    #[arg(long)]
    seed: Option<u64>,

    /// Override report interval in turns (0 disables reports)
    #[arg(long)]
    report_interval: Option<u32>,

    /// Directory for turn reports
    #[arg(long)]
    report_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("cardburg=info")),
        )
        .init();

    let cli = Cli::parse();
    let loader = ScenarioLoader::new(".");
    let scenario = loader.load(&cli.scenario)?;
    let turns = scenario.turns(cli.turns);

    let settings = EngineSettings {
        scenario_name: scenario.name.clone(),
        seed: cli.seed.unwrap_or(scenario.seed),
        report_interval_turns: cli
            .report_interval
            .unwrap_or(scenario.report_interval_turns),
        report_dir: cli.report_dir.unwrap_or_else(|| PathBuf::from("reports")),
    };

    let mut engine = Engine::new(settings, &scenario)?;
    let mut policy = Autoplayer::new();
    tracing::info!(scenario = %scenario.name, policy = policy.name(), turns, "starting run");
    engine.run(&mut policy, turns)?;

    let state = engine.state();
    println!(
        "Scenario '{}' completed after {} turns. Population: {}, money: ${}, tiles built: {}",
        scenario.name,
        state.turn(),
        get_stat_value(state, StatKey::Population),
        get_stat_value(state, StatKey::Money),
        state.grid().len()
    );
    Ok(())
}
