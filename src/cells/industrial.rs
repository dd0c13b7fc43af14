use rand::RngCore;
use tracing::debug;

use crate::cells::{Cell, CellBehavior, Description, TileKind};
use crate::error::SimResult;
use crate::grid::{get_neighbors, replace_cell, Coord};
use crate::rng::RngExt;
use crate::state::GameState;
use crate::stats::{modify_stat, StatKey};

const RESIDENTIAL_APPLICATION_CHANCE: f64 = 0.2;
/// Per neighbouring residential block, per turn.
const POLLUTION_CHANCE: f64 = 0.1;

#[derive(Debug, Clone, PartialEq)]
pub struct Industrial {
    coord: Coord,
}

impl Industrial {
    pub const MOVEMENT_COST: u32 = 4;
    pub const JOBS: u32 = 50;
    pub const MONTHLY_MAINTENANCE: f64 = 1_000.0;

    pub fn new(coord: Coord) -> Self {
        Self { coord }
    }
}

impl CellBehavior for Industrial {
    fn kind(&self) -> TileKind {
        TileKind::Industrial
    }

    fn coord(&self) -> Coord {
        self.coord
    }

    fn movement_cost(&self) -> Option<u32> {
        Some(Self::MOVEMENT_COST)
    }

    fn job_count(&self) -> Option<u32> {
        Some(Self::JOBS)
    }

    fn describe(&self) -> Description {
        vec![
            ("Type", self.kind().to_string()),
            ("Monthly maintenance", format!("${}", Self::MONTHLY_MAINTENANCE)),
            ("Jobs", Self::JOBS.to_string()),
        ]
    }

    fn on_turn_start(&self, state: GameState, rng: &mut dyn RngCore) -> SimResult<GameState> {
        let mut state = state;
        if rng.chance(RESIDENTIAL_APPLICATION_CHANCE) {
            state = modify_stat(state, StatKey::ResidentialApplications, |n| n + 1.0);
        }
        state = modify_stat(state, StatKey::Money, |money| {
            money - Self::MONTHLY_MAINTENANCE
        });

        let neighbors = get_neighbors(&state, self.coord);
        for (_, cell) in neighbors.iter() {
            let Some(home) = cell.as_residential() else {
                continue;
            };
            if home.dwellings().is_empty() || !rng.chance(POLLUTION_CHANCE) {
                continue;
            }
            debug!(source = %self.coord, target = %home.coord(), "pollution drove out a household");
            state = replace_cell(state, Cell::Residential(home.remove_dwelling()?));
        }
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cells::Residential;
    use crate::grid::{get_cell, Grid};
    use crate::stats::get_stat_value;
    use rand::rngs::mock::StepRng;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn populated(coord: Coord, count: usize) -> Cell {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let home = (0..count).fold(Residential::new(coord), |home, _| {
            home.add_dwelling(&mut rng).unwrap()
        });
        Cell::Residential(home)
    }

    fn dwellings_at(state: &GameState, coord: Coord) -> usize {
        get_cell(state, coord)
            .as_residential()
            .map(|home| home.dwellings().len())
            .unwrap_or_default()
    }

    #[test]
    fn pollution_hits_every_adjacent_household_block() {
        let plant = Industrial::new(Coord::new(0, 0));
        let state = GameState::new(Grid::default());
        let state = replace_cell(state, populated(Coord::new(-1, -1), 2));
        let state = replace_cell(state, populated(Coord::new(0, 1), 1));
        let state = replace_cell(state, populated(Coord::new(1, 0), 0));
        let state = replace_cell(state, populated(Coord::new(0, 2), 3));

        let after = plant
            .on_turn_start(state, &mut StepRng::new(0, 0))
            .unwrap();

        assert_eq!(dwellings_at(&after, Coord::new(-1, -1)), 1);
        assert_eq!(dwellings_at(&after, Coord::new(0, 1)), 0);
        assert_eq!(dwellings_at(&after, Coord::new(1, 0)), 0);
        // two cells away
        assert_eq!(dwellings_at(&after, Coord::new(0, 2)), 3);
        assert_eq!(get_stat_value(&after, StatKey::ResidentialApplications), 3.0);
        assert_eq!(get_stat_value(&after, StatKey::Money), 9_000.0);
    }

    #[test]
    fn quiet_turn_only_costs_maintenance() {
        let plant = Industrial::new(Coord::new(0, 0));
        let state = replace_cell(GameState::new(Grid::default()), populated(Coord::new(0, 1), 2));
        let after = plant
            .on_turn_start(state, &mut StepRng::new(u64::MAX, 0))
            .unwrap();
        assert_eq!(dwellings_at(&after, Coord::new(0, 1)), 2);
        assert_eq!(get_stat_value(&after, StatKey::ResidentialApplications), 2.0);
        assert_eq!(get_stat_value(&after, StatKey::Money), 9_000.0);
    }
}
