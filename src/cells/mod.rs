//! Cell variants.
//!
//! `Cell` is the closed set of things a grid coordinate can hold. Each variant
//! is its own immutable struct implementing `CellBehavior`; a change to a cell
//! produces a new value that replaces the old one in the grid.

mod city_hall;
mod commercial;
mod industrial;
mod park;
mod residential;
mod terrain;

use std::fmt;
use std::str::FromStr;

use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

pub use city_hall::CityHall;
pub use commercial::CommercialCorridor;
pub use industrial::Industrial;
pub use park::Park;
pub use residential::{Dwelling, Proximity, Residential, LOT_COUNT};
pub use terrain::{EmptyLot, FreewayCorridor, VoidCell};

use crate::error::{SimError, SimResult};
use crate::grid::Coord;
use crate::state::GameState;

/// Ordered key/value summary shown when hovering a cell.
pub type Description = Vec<(&'static str, String)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TileKind {
    Void,
    Empty,
    CityHall,
    Residential,
    Industrial,
    CommercialCorridor,
    Park,
    FreewayCorridor,
}

impl TileKind {
    pub const ALL: [TileKind; 8] = [
        TileKind::Void,
        TileKind::Empty,
        TileKind::CityHall,
        TileKind::Residential,
        TileKind::Industrial,
        TileKind::CommercialCorridor,
        TileKind::Park,
        TileKind::FreewayCorridor,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TileKind::Void => "void",
            TileKind::Empty => "empty",
            TileKind::CityHall => "city-hall",
            TileKind::Residential => "residential",
            TileKind::Industrial => "industrial",
            TileKind::CommercialCorridor => "commercial-corridor",
            TileKind::Park => "park",
            TileKind::FreewayCorridor => "freeway-corridor",
        }
    }

    /// Void and empty lots are what the grid reports where nothing was built.
    pub fn is_background(self) -> bool {
        matches!(self, TileKind::Void | TileKind::Empty)
    }
}

impl fmt::Display for TileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TileKind {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TileKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| SimError::UnknownTile(s.to_string()))
    }
}

pub trait CellBehavior {
    fn kind(&self) -> TileKind;

    fn coord(&self) -> Coord;

    /// Cost of entering this cell on a commute. `None` is impassable.
    fn movement_cost(&self) -> Option<u32>;

    /// Jobs offered here, for cells that provide any.
    fn job_count(&self) -> Option<u32> {
        None
    }

    fn describe(&self) -> Description {
        vec![("Type", self.kind().to_string())]
    }

    fn on_turn_start(&self, state: GameState, _rng: &mut dyn RngCore) -> SimResult<GameState> {
        Ok(state)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Void(VoidCell),
    Empty(EmptyLot),
    CityHall(CityHall),
    Residential(Residential),
    Industrial(Industrial),
    CommercialCorridor(CommercialCorridor),
    Park(Park),
    FreewayCorridor(FreewayCorridor),
}

impl Cell {
    /// A freshly built cell of `kind`, as produced by tile placement.
    pub fn build<R: Rng + ?Sized>(kind: TileKind, coord: Coord, rng: &mut R) -> SimResult<Cell> {
        let cell = match kind {
            TileKind::Void | TileKind::Empty => return Err(SimError::NotPlaceable(kind)),
            TileKind::CityHall => Cell::CityHall(CityHall::new(coord, 1)),
            TileKind::Residential => Cell::Residential(Residential::new(coord)),
            TileKind::Industrial => Cell::Industrial(Industrial::new(coord)),
            TileKind::CommercialCorridor => {
                Cell::CommercialCorridor(CommercialCorridor::create(coord, rng))
            }
            TileKind::Park => Cell::Park(Park::new(coord)),
            TileKind::FreewayCorridor => Cell::FreewayCorridor(FreewayCorridor::new(coord)),
        };
        Ok(cell)
    }

    fn behavior(&self) -> &dyn CellBehavior {
        match self {
            Cell::Void(cell) => cell,
            Cell::Empty(cell) => cell,
            Cell::CityHall(cell) => cell,
            Cell::Residential(cell) => cell,
            Cell::Industrial(cell) => cell,
            Cell::CommercialCorridor(cell) => cell,
            Cell::Park(cell) => cell,
            Cell::FreewayCorridor(cell) => cell,
        }
    }

    pub fn kind(&self) -> TileKind {
        self.behavior().kind()
    }

    pub fn coord(&self) -> Coord {
        self.behavior().coord()
    }

    pub fn movement_cost(&self) -> Option<u32> {
        self.behavior().movement_cost()
    }

    pub fn job_count(&self) -> Option<u32> {
        self.behavior().job_count()
    }

    pub fn describe(&self) -> Description {
        self.behavior().describe()
    }

    pub fn on_turn_start(&self, state: GameState, rng: &mut dyn RngCore) -> SimResult<GameState> {
        self.behavior().on_turn_start(state, rng)
    }

    pub fn is_buildable(&self) -> bool {
        matches!(self, Cell::Empty(_))
    }

    pub fn as_residential(&self) -> Option<&Residential> {
        match self {
            Cell::Residential(home) => Some(home),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn tile_names_round_trip_through_from_str() {
        for kind in TileKind::ALL {
            assert_eq!(kind.as_str().parse::<TileKind>(), Ok(kind));
        }
        assert_eq!(
            "skyscraper".parse::<TileKind>(),
            Err(SimError::UnknownTile("skyscraper".into()))
        );
    }

    #[test]
    fn built_cells_match_requested_kind() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let coord = Coord::new(4, -2);
        for kind in TileKind::ALL.into_iter().filter(|k| !k.is_background()) {
            let cell = Cell::build(kind, coord, &mut rng).unwrap();
            assert_eq!(cell.kind(), kind);
            assert_eq!(cell.coord(), coord);
            assert_eq!(cell.describe()[0], ("Type", kind.to_string()));
        }
        assert!(Cell::build(TileKind::Empty, coord, &mut rng).is_err());
    }

    #[test]
    fn traversal_costs_and_job_providers() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let at = Coord::new(0, 0);
        let cost = |kind| {
            Cell::build(kind, at, &mut ChaCha8Rng::seed_from_u64(0))
                .unwrap()
                .movement_cost()
        };
        assert_eq!(cost(TileKind::FreewayCorridor), Some(1));
        assert_eq!(cost(TileKind::CommercialCorridor), Some(3));
        assert_eq!(cost(TileKind::Residential), Some(4));
        assert_eq!(Cell::Void(VoidCell::new(at)).movement_cost(), None);
        assert_eq!(Cell::Empty(EmptyLot::new(at)).movement_cost(), None);

        let industrial = Cell::build(TileKind::Industrial, at, &mut rng).unwrap();
        assert_eq!(industrial.job_count(), Some(50));
        let park = Cell::build(TileKind::Park, at, &mut rng).unwrap();
        assert_eq!(park.job_count(), None);
    }
}
