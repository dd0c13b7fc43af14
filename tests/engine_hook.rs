use cardburg::{
    autoplay::Autoplayer,
    engine::{Engine, EngineSettings},
    scenario::ScenarioLoader,
};
use tempfile::tempdir;

#[test]
fn engine_runs_hook_each_turn() {
    let loader = ScenarioLoader::new(env!("CARGO_MANIFEST_DIR"));
    let scenario = loader
        .load("scenarios/starter.yaml")
        .expect("scenario should load");
    let temp = tempdir().expect("tempdir");
    let settings = EngineSettings {
        scenario_name: scenario.name.clone(),
        seed: scenario.seed,
        report_interval_turns: 0,
        report_dir: temp.path().to_path_buf(),
    };
    let mut engine = Engine::new(settings, &scenario).expect("engine builds");

    let mut turns = Vec::new();
    engine
        .run_with_hook(&mut Autoplayer::new(), 6, |report| turns.push(report.turn))
        .expect("run succeeds");

    assert_eq!(turns, vec![1, 2, 3, 4, 5, 6]);
    assert_eq!(engine.state().turn(), 6);
    assert_eq!(engine.state().pending(), None);
}
