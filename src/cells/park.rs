use rand::RngCore;

use crate::cells::{Cell, CellBehavior, Description, TileKind};
use crate::error::SimResult;
use crate::grid::{get_neighbors, replace_cell, Coord};
use crate::rng::RngExt;
use crate::state::GameState;
use crate::stats::{modify_stat, StatKey};

const DWELLING_BOOST_CHANCE: f64 = 0.2;

#[derive(Debug, Clone, PartialEq)]
pub struct Park {
    coord: Coord,
}

impl Park {
    pub const MOVEMENT_COST: u32 = 4;
    pub const MONTHLY_MAINTENANCE: f64 = 1_000.0;

    pub fn new(coord: Coord) -> Self {
        Self { coord }
    }
}

impl CellBehavior for Park {
    fn kind(&self) -> TileKind {
        TileKind::Park
    }

    fn coord(&self) -> Coord {
        self.coord
    }

    fn movement_cost(&self) -> Option<u32> {
        Some(Self::MOVEMENT_COST)
    }

    fn describe(&self) -> Description {
        vec![
            ("Type", self.kind().to_string()),
            ("Monthly maintenance", format!("${}", Self::MONTHLY_MAINTENANCE)),
            (
                "Effect",
                "Neighboring residential cells get an extra 20% chance to gain a dwelling."
                    .to_string(),
            ),
        ]
    }

    fn on_turn_start(&self, state: GameState, rng: &mut dyn RngCore) -> SimResult<GameState> {
        let mut state = state;
        let neighbors = get_neighbors(&state, self.coord);
        for (_, cell) in neighbors.iter() {
            let Some(home) = cell.as_residential() else {
                continue;
            };
            if home.has_free_lot() && rng.chance(DWELLING_BOOST_CHANCE) {
                state = replace_cell(state, Cell::Residential(home.add_dwelling(rng)?));
            }
        }
        Ok(modify_stat(state, StatKey::Money, |money| {
            money - Self::MONTHLY_MAINTENANCE
        }))
    }
}
