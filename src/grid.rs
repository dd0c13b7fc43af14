//! Sparse, unbounded tile grid.
//!
//! Only explicitly built cells are stored. Any other coordinate resolves to a
//! background cell: an `Empty` lot inside the map bounds (or everywhere, when
//! the map has no bounds) and `Void` outside them.

use std::collections::HashMap;
use std::fmt;
use std::ops::RangeInclusive;
use std::sync::Arc;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cells::{Cell, EmptyLot, TileKind, VoidCell};
use crate::error::{SimError, SimResult};
use crate::state::GameState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Coord {
    pub row: i32,
    pub col: i32,
}

impl Coord {
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    pub fn step(self, direction: Direction) -> Self {
        let (dr, dc) = direction.offset();
        Self::new(self.row + dr, self.col + dc)
    }

    /// N, E, S, W. Commutes only travel along these.
    pub fn orthogonal(self) -> [Coord; 4] {
        [
            self.step(Direction::N),
            self.step(Direction::E),
            self.step(Direction::S),
            self.step(Direction::W),
        ]
    }

    pub fn manhattan(self, other: Coord) -> u32 {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
    NW,
}

impl Direction {
    pub const ALL: [Direction; 8] = [
        Direction::N,
        Direction::NE,
        Direction::E,
        Direction::SE,
        Direction::S,
        Direction::SW,
        Direction::W,
        Direction::NW,
    ];

    /// (row, column) delta; rows grow southwards.
    pub fn offset(self) -> (i32, i32) {
        match self {
            Direction::N => (-1, 0),
            Direction::NE => (-1, 1),
            Direction::E => (0, 1),
            Direction::SE => (1, 1),
            Direction::S => (1, 0),
            Direction::SW => (1, -1),
            Direction::W => (0, -1),
            Direction::NW => (-1, -1),
        }
    }
}

/// The eight cells around a coordinate, background cells included.
#[derive(Debug, Clone, PartialEq)]
pub struct Neighbors {
    cells: [Cell; 8],
}

impl Neighbors {
    pub fn get(&self, direction: Direction) -> &Cell {
        &self.cells[direction as usize]
    }

    pub fn iter(&self) -> impl Iterator<Item = (Direction, &Cell)> {
        Direction::ALL.into_iter().zip(self.cells.iter())
    }
}

/// Inclusive playable area. Coordinates outside it are void.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_row: i32,
    pub max_row: i32,
    pub min_col: i32,
    pub max_col: i32,
}

impl Bounds {
    pub fn contains(&self, coord: Coord) -> bool {
        (self.min_row..=self.max_row).contains(&coord.row)
            && (self.min_col..=self.max_col).contains(&coord.col)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Grid {
    cells: Arc<HashMap<Coord, Cell>>,
    bounds: Option<Bounds>,
}

impl Grid {
    pub fn new(bounds: Option<Bounds>) -> Self {
        Self {
            cells: Arc::new(HashMap::new()),
            bounds,
        }
    }

    pub fn bounds(&self) -> Option<Bounds> {
        self.bounds
    }

    /// The explicitly built cell at `coord`, if any.
    pub fn lookup(&self, coord: Coord) -> Option<&Cell> {
        self.cells.get(&coord)
    }

    pub fn get(&self, coord: Coord) -> Cell {
        self.lookup(coord)
            .cloned()
            .unwrap_or_else(|| self.background(coord))
    }

    pub fn background(&self, coord: Coord) -> Cell {
        match self.bounds {
            Some(bounds) if !bounds.contains(coord) => Cell::Void(VoidCell::new(coord)),
            _ => Cell::Empty(EmptyLot::new(coord)),
        }
    }

    /// Background cells are impassable, so only built cells are looked at.
    pub fn movement_cost(&self, coord: Coord) -> Option<u32> {
        self.lookup(coord).and_then(Cell::movement_cost)
    }

    /// Copy-on-write: a grid shared with an older state is cloned first.
    pub fn with_cell(mut self, cell: Cell) -> Self {
        Arc::make_mut(&mut self.cells).insert(cell.coord(), cell);
        self
    }

    /// Built coordinates in row-major order.
    pub fn coords(&self) -> Vec<Coord> {
        let mut coords: Vec<Coord> = self.cells.keys().copied().collect();
        coords.sort();
        coords
    }

    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.values()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

pub fn get_cell(state: &GameState, coord: Coord) -> Cell {
    state.grid().get(coord)
}

/// Drops whatever occupied the cell's coordinate and stores `cell` there.
pub fn replace_cell(state: GameState, cell: Cell) -> GameState {
    state.map_grid(|grid| grid.with_cell(cell))
}

pub fn get_neighbors(state: &GameState, coord: Coord) -> Neighbors {
    Neighbors {
        cells: Direction::ALL.map(|direction| get_cell(state, coord.step(direction))),
    }
}

/// Row-major block of cells covering both inclusive ranges.
pub fn get_grid(
    state: &GameState,
    rows: RangeInclusive<i32>,
    cols: RangeInclusive<i32>,
) -> Vec<Vec<Cell>> {
    rows.map(|row| {
        cols.clone()
            .map(|col| get_cell(state, Coord::new(row, col)))
            .collect()
    })
    .collect()
}

/// First built cell of `kind` in row-major order.
pub fn find_cell_by_kind(state: &GameState, kind: TileKind) -> Option<Cell> {
    state
        .grid()
        .coords()
        .into_iter()
        .filter_map(|coord| state.grid().lookup(coord))
        .find(|cell| cell.kind() == kind)
        .cloned()
}

/// Builds a tile on an empty lot and clears the pending selector.
///
/// Trying to build on anything but an empty lot only adds a log entry.
pub fn place_tile<R: Rng + ?Sized>(
    state: GameState,
    kind: TileKind,
    coord: Coord,
    rng: &mut R,
) -> SimResult<GameState> {
    if kind.is_background() {
        return Err(SimError::NotPlaceable(kind));
    }
    if !get_cell(&state, coord).is_buildable() {
        return Ok(state.with_log("Cell is occupied"));
    }
    let cell = Cell::build(kind, coord, rng)?;
    debug!(%coord, %kind, "tile placed");
    Ok(replace_cell(state, cell)
        .with_pending(None)
        .with_log(format!("Placed a {kind} tile")))
}
