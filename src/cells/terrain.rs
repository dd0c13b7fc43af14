use crate::cells::{CellBehavior, Description, TileKind};
use crate::grid::Coord;

/// Outside the map. Nothing can be built or travelled here.
#[derive(Debug, Clone, PartialEq)]
pub struct VoidCell {
    coord: Coord,
}

impl VoidCell {
    pub fn new(coord: Coord) -> Self {
        Self { coord }
    }
}

impl CellBehavior for VoidCell {
    fn kind(&self) -> TileKind {
        TileKind::Void
    }

    fn coord(&self) -> Coord {
        self.coord
    }

    fn movement_cost(&self) -> Option<u32> {
        None
    }
}

/// Undeveloped land inside the map; the only place tiles can go.
#[derive(Debug, Clone, PartialEq)]
pub struct EmptyLot {
    coord: Coord,
}

impl EmptyLot {
    pub fn new(coord: Coord) -> Self {
        Self { coord }
    }
}

impl CellBehavior for EmptyLot {
    fn kind(&self) -> TileKind {
        TileKind::Empty
    }

    fn coord(&self) -> Coord {
        self.coord
    }

    // No roads yet. Keeps the commute search inside the built-up area.
    fn movement_cost(&self) -> Option<u32> {
        None
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FreewayCorridor {
    coord: Coord,
}

impl FreewayCorridor {
    pub const MOVEMENT_COST: u32 = 1;

    pub fn new(coord: Coord) -> Self {
        Self { coord }
    }
}

impl CellBehavior for FreewayCorridor {
    fn kind(&self) -> TileKind {
        TileKind::FreewayCorridor
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
            ("Travel cost", Self::MOVEMENT_COST.to_string()),
        ]
    }
}
