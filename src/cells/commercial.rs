use std::collections::BTreeSet;

use rand::{Rng, RngCore};

use crate::cells::{Cell, CellBehavior, Description, TileKind};
use crate::error::SimResult;
use crate::grid::{replace_cell, Coord};
use crate::rng::RngExt;
use crate::state::GameState;
use crate::stats::{modify_stat, StatKey};

/// Building slots a corridor can draw from. Renderers map indices onto the
/// footprints that fit the corridor's connections.
pub const BUILDING_SLOTS: u32 = 33;

const BUILD_UP_CHANCE: f64 = 0.3;
const INDUSTRIAL_APPLICATION_CHANCE: f64 = 0.2;

#[derive(Debug, Clone, PartialEq)]
pub struct CommercialCorridor {
    coord: Coord,
    buildings: BTreeSet<u32>,
}

impl CommercialCorridor {
    pub const MOVEMENT_COST: u32 = 3;

    /// A corridor with its first building already up.
    pub fn create<R: Rng + ?Sized>(coord: Coord, rng: &mut R) -> Self {
        Self {
            coord,
            buildings: BTreeSet::new(),
        }
        .with_new_building(rng)
    }

    pub fn buildings(&self) -> &BTreeSet<u32> {
        &self.buildings
    }

    /// Picks a random slot; if it is already built the corridor is unchanged.
    pub fn with_new_building<R: Rng + ?Sized>(&self, rng: &mut R) -> Self {
        let mut buildings = self.buildings.clone();
        buildings.insert(rng.gen_range(0..BUILDING_SLOTS));
        Self {
            coord: self.coord,
            buildings,
        }
    }
}

impl CellBehavior for CommercialCorridor {
    fn kind(&self) -> TileKind {
        TileKind::CommercialCorridor
    }

    fn coord(&self) -> Coord {
        self.coord
    }

    fn movement_cost(&self) -> Option<u32> {
        Some(Self::MOVEMENT_COST)
    }

    fn job_count(&self) -> Option<u32> {
        let built = u32::try_from(self.buildings.len()).unwrap_or(u32::MAX);
        Some(40 * built / 32)
    }

    fn describe(&self) -> Description {
        vec![
            ("Type", self.kind().to_string()),
            ("Buildings", self.buildings.len().to_string()),
            ("Jobs", self.job_count().unwrap_or_default().to_string()),
        ]
    }

    fn on_turn_start(&self, state: GameState, rng: &mut dyn RngCore) -> SimResult<GameState> {
        let mut state = state;
        if rng.chance(BUILD_UP_CHANCE) {
            state = replace_cell(state, Cell::CommercialCorridor(self.with_new_building(rng)));
        }
        if rng.chance(INDUSTRIAL_APPLICATION_CHANCE) {
            state = modify_stat(state, StatKey::IndustrialApplications, |n| n + 1.0);
        }
        Ok(state)
    }
}
