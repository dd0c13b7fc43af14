use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::{
    analysis::analyze,
    autoplay::Policy,
    cards::CardId,
    grid::{place_tile, Coord},
    report::{ReportWriter, TurnReport},
    rng::{RngManager, CONSTRUCTION_STREAM},
    scenario::Scenario,
    state::GameState,
    turn::apply_start_of_round_effects,
};

pub struct EngineSettings {
    pub scenario_name: String,
    pub seed: u64,
    pub report_interval_turns: u32,
    pub report_dir: PathBuf,
}

impl EngineSettings {
    pub fn from_scenario(scenario: &Scenario) -> Self {
        Self {
            scenario_name: scenario.name.clone(),
            seed: scenario.seed,
            report_interval_turns: scenario.report_interval_turns,
            report_dir: PathBuf::from("reports"),
        }
    }
}

/// A running game: the current state plus the random streams that drive it.
///
/// This is the surface a front end talks to. Invalid requests (nothing to
/// place, an unaffordable card, ending the turn mid-placement) are refused
/// with a warning and leave the game as it was.
pub struct Engine {
    state: GameState,
    rng: RngManager,
    report_writer: ReportWriter,
    settings: EngineSettings,
}

impl Engine {
    pub fn new(settings: EngineSettings, scenario: &Scenario) -> Result<Self> {
        let mut rng = RngManager::new(settings.seed);
        let state = scenario
            .build_state(&mut rng)
            .with_context(|| format!("Failed to set up scenario '{}'", scenario.name))?;
        Ok(Self::with_rng(settings, state, rng))
    }

    /// Resumes from an existing state with fresh streams seeded from the
    /// settings.
    pub fn from_state(settings: EngineSettings, state: GameState) -> Self {
        let rng = RngManager::new(settings.seed);
        Self::with_rng(settings, state, rng)
    }

    fn with_rng(settings: EngineSettings, state: GameState, rng: RngManager) -> Self {
        Self {
            state,
            rng,
            report_writer: ReportWriter::new(
                &settings.report_dir,
                settings.report_interval_turns,
            ),
            settings,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Builds the pending tile at `coord` and re-scores the city. Returns
    /// whether a tile was placed; an occupied lot only adds a log entry.
    pub fn place_pending(&mut self, coord: Coord) -> Result<bool> {
        let Some(kind) = self.state.pending() else {
            warn!(%coord, "no tile is waiting to be placed");
            return Ok(false);
        };
        let mut rng = self.rng.stream(CONSTRUCTION_STREAM);
        let state = place_tile(self.state.clone(), kind, coord, &mut rng)?;
        let placed = state.pending().is_none();
        self.state = if placed { analyze(state) } else { state };
        Ok(placed)
    }

    /// Plays the hand card `id` if the ledger covers its cost. Returns whether
    /// the card was played; a refused card stays in hand and nothing changes.
    pub fn play_card(&mut self, id: CardId) -> Result<bool> {
        let Some(card) = self.state.hand_card(id).copied() else {
            warn!(%id, "card is not in hand");
            return Ok(false);
        };
        if let Some((stat, required, available)) = card.shortfall(&self.state) {
            warn!(card = card.name(), %stat, required, available, "card is not affordable");
            return Ok(false);
        }
        self.state = card.effect(self.state.clone())?;
        Ok(true)
    }

    /// Drops the pending placement. Whatever was paid for it stays spent.
    pub fn cancel_placement(&mut self) {
        if let Some(kind) = self.state.pending() {
            self.state = self
                .state
                .clone()
                .with_pending(None)
                .with_log(format!("Cancelled {kind} placement"));
        }
    }

    /// Runs the end-of-turn phases and writes a report when one is due.
    /// Returns `None` when a placement is still pending.
    pub fn end_turn(&mut self) -> Result<Option<TurnReport>> {
        if let Some(kind) = self.state.pending() {
            warn!(%kind, "turn not ended: a tile is waiting to be placed");
            self.state = self
                .state
                .clone()
                .with_log(format!("Place the {kind} tile before ending the turn"));
            return Ok(None);
        }
        self.state = apply_start_of_round_effects(self.state.clone(), &mut self.rng)?;
        if let Some(path) = self
            .report_writer
            .maybe_write(&self.state, &self.settings.scenario_name)?
        {
            info!(path = %path.display(), "turn report written");
        }
        Ok(Some(TurnReport::capture(
            &self.state,
            &self.settings.scenario_name,
        )))
    }

    pub fn run(&mut self, policy: &mut dyn Policy, turns: u32) -> Result<()> {
        self.run_with_hook(policy, turns, |_| {})
    }

    /// Lets `policy` act and then ends the turn, `turns` times, passing each
    /// turn's report to `hook`.
    pub fn run_with_hook<F>(
        &mut self,
        policy: &mut dyn Policy,
        turns: u32,
        mut hook: F,
    ) -> Result<()>
    where
        F: FnMut(&TurnReport),
    {
        for _ in 0..turns {
            policy
                .play_turn(self)
                .with_context(|| format!("Policy failed on turn {}", self.state.turn() + 1))?;
            self.cancel_placement();
            if let Some(report) = self.end_turn()? {
                hook(&report);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{Card, CardKind};
    use crate::cells::TileKind;
    use crate::grid::get_cell;
    use crate::stats::{get_stat_value, StatKey};

    fn engine() -> Engine {
        let scenario = Scenario::starter();
        let mut settings = EngineSettings::from_scenario(&scenario);
        settings.report_interval_turns = 0;
        Engine::new(settings, &scenario).unwrap()
    }

    fn card_of(engine: &Engine, kind: CardKind) -> Option<CardId> {
        engine
            .state()
            .hand()
            .iter()
            .find(|card| card.kind() == kind)
            .map(|card| card.id())
    }

    #[test]
    fn placing_without_a_pending_tile_is_refused() {
        let mut engine = engine();
        let before = engine.state().clone();
        assert!(!engine.place_pending(Coord::new(1, 1)).unwrap());
        assert_eq!(engine.state(), &before);
    }

    #[test]
    fn unknown_card_is_refused() {
        let mut engine = engine();
        let before = engine.state().clone();
        assert!(!engine.play_card(CardId(10_000)).unwrap());
        assert_eq!(engine.state(), &before);
    }

    #[test]
    fn pending_placement_blocks_the_turn() {
        let mut engine = engine();
        engine.state = engine.state.clone().with_pending(Some(TileKind::Park));
        assert!(engine.end_turn().unwrap().is_none());
        assert_eq!(engine.state().turn(), 0);

        engine.cancel_placement();
        assert_eq!(engine.state().pending(), None);
        let report = engine.end_turn().unwrap().unwrap();
        assert_eq!(report.turn, 1);
    }

    #[test]
    fn approval_then_placement_builds_and_scores() {
        let mut engine = engine();
        let id = engine.state.allocate_card_id();
        engine.state.hand.push(Card {
            id,
            kind: CardKind::ApproveHousing,
        });
        assert!(card_of(&engine, CardKind::ApproveHousing).is_some());
        assert!(engine.play_card(id).unwrap());
        assert_eq!(engine.state().pending(), Some(TileKind::Residential));

        // taken by city hall
        assert!(!engine.place_pending(Coord::new(0, 1)).unwrap());
        assert!(engine.place_pending(Coord::new(1, 1)).unwrap());

        let home = get_cell(engine.state(), Coord::new(1, 1));
        let score = home.as_residential().map(|h| h.job_score()).unwrap_or_default();
        assert!(score > 0.0);
        assert_eq!(get_stat_value(engine.state(), StatKey::ActionPoints), 2.0);
    }
}
