//! End-of-turn orchestration.
//!
//! A round is a fixed sequence of phases. Each phase takes the state produced
//! by the one before it and draws randomness from its own named stream.

use tracing::info;

use crate::analysis::analyze;
use crate::cards::draw;
use crate::error::SimResult;
use crate::rng::{RngManager, SystemRng, DECK_STREAM, GROWTH_STREAM};
use crate::state::GameState;
use crate::stats::{get_stat_value, modify_stat, StatKey, StatLedger};

/// Residents per dwelling.
pub const RESIDENTS_PER_DWELLING: f64 = 2.5;

pub trait TurnPhase {
    fn name(&self) -> &'static str;

    fn stream(&self) -> &'static str {
        GROWTH_STREAM
    }

    fn run(&self, state: GameState, rng: &mut SystemRng<'_>) -> SimResult<GameState>;
}

/// Resets per-turn stats, then runs every built cell's turn-start effect in
/// row-major order. All of those effects share the growth stream.
pub struct CellEffects;

impl TurnPhase for CellEffects {
    fn name(&self) -> &'static str {
        "cell_effects"
    }

    fn run(&self, state: GameState, rng: &mut SystemRng<'_>) -> SimResult<GameState> {
        let mut state = state.map_stats(StatLedger::reset_turn_stats);
        for coord in state.grid().coords() {
            // earlier effects may have replaced this cell
            let Some(cell) = state.grid().lookup(coord).cloned() else {
                continue;
            };
            state = cell.on_turn_start(state, rng)?;
        }
        Ok(state)
    }
}

pub struct Population;

impl TurnPhase for Population {
    fn name(&self) -> &'static str {
        "population"
    }

    fn run(&self, state: GameState, _rng: &mut SystemRng<'_>) -> SimResult<GameState> {
        Ok(recompute_population(state))
    }
}

pub struct Analysis;

impl TurnPhase for Analysis {
    fn name(&self) -> &'static str {
        "analysis"
    }

    fn run(&self, state: GameState, _rng: &mut SystemRng<'_>) -> SimResult<GameState> {
        Ok(analyze(state))
    }
}

pub struct Draw;

impl TurnPhase for Draw {
    fn name(&self) -> &'static str {
        "draw"
    }

    fn stream(&self) -> &'static str {
        DECK_STREAM
    }

    fn run(&self, state: GameState, rng: &mut SystemRng<'_>) -> SimResult<GameState> {
        Ok(draw(state, rng))
    }
}

pub fn phases() -> [&'static dyn TurnPhase; 4] {
    [&CellEffects, &Population, &Analysis, &Draw]
}

/// Writes `RESIDENTS_PER_DWELLING` times the city's dwelling count into the
/// population stat.
pub fn recompute_population(state: GameState) -> GameState {
    let dwellings: usize = state
        .grid()
        .cells()
        .filter_map(|cell| cell.as_residential())
        .map(|home| home.dwellings().len())
        .sum();
    let population = RESIDENTS_PER_DWELLING * dwellings as f64;
    modify_stat(state, StatKey::Population, |_| population)
}

/// Ends the current turn: runs every phase and advances the turn counter.
pub fn apply_start_of_round_effects(
    state: GameState,
    rngs: &mut RngManager,
) -> SimResult<GameState> {
    let mut state = state;
    for phase in phases() {
        let mut rng = rngs.stream(phase.stream());
        state = phase.run(state, &mut rng)?;
    }
    let state = state.advance_turn();
    info!(
        turn = state.turn(),
        money = get_stat_value(&state, StatKey::Money),
        ap = get_stat_value(&state, StatKey::ActionPoints),
        population = get_stat_value(&state, StatKey::Population),
        "turn complete"
    );
    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cells::{Cell, CityHall, Residential};
    use crate::grid::{replace_cell, Coord, Grid};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn phases_run_in_order() {
        let names: Vec<&str> = phases().iter().map(|phase| phase.name()).collect();
        assert_eq!(names, ["cell_effects", "population", "analysis", "draw"]);
    }

    #[test]
    fn cell_effects_share_growth_and_draws_use_the_deck() {
        let streams: Vec<&str> = phases().iter().map(|phase| phase.stream()).collect();
        assert_eq!(streams, [GROWTH_STREAM, GROWTH_STREAM, GROWTH_STREAM, DECK_STREAM]);
    }

    #[test]
    fn population_counts_every_block() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut state = GameState::new(Grid::default());
        for (col, count) in [(0, 2), (3, 5)] {
            let home = (0..count).fold(Residential::new(Coord::new(0, col)), |home, _| {
                home.add_dwelling(&mut rng).unwrap()
            });
            state = replace_cell(state, Cell::Residential(home));
        }
        let state = recompute_population(state);
        assert_eq!(get_stat_value(&state, StatKey::Population), 17.5);
    }

    #[test]
    fn city_hall_grants_ap_over_a_round() {
        let mut rngs = RngManager::new(3);
        let state = replace_cell(
            GameState::new(Grid::default()),
            Cell::CityHall(CityHall::new(Coord::new(0, 0), 1)),
        );
        let state = modify_stat(state, StatKey::ActionPoints, |_| 0.0);
        let state = apply_start_of_round_effects(state, &mut rngs).unwrap();
        assert_eq!(get_stat_value(&state, StatKey::ActionPoints), 1.0);
        assert_eq!(state.turn(), 1);

        let state = modify_stat(state, StatKey::ActionPoints, |_| 19.0);
        let state = apply_start_of_round_effects(state, &mut rngs).unwrap();
        assert_eq!(get_stat_value(&state, StatKey::ActionPoints), 20.0);
    }

    #[test]
    fn population_is_reset_before_cell_effects() {
        let mut rngs = RngManager::new(3);
        let state = modify_stat(GameState::new(Grid::default()), StatKey::Population, |_| 500.0);
        let state = apply_start_of_round_effects(state, &mut rngs).unwrap();
        assert_eq!(get_stat_value(&state, StatKey::Population), 0.0);
    }
}
