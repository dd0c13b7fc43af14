use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::cards::{build_deck, default_deck, draw, DeckEntry};
use crate::cells::{Cell, CityHall, FreewayCorridor, TileKind};
use crate::error::SimResult;
use crate::grid::{replace_cell, Bounds, Coord, Grid};
use crate::rng::{RngManager, CONSTRUCTION_STREAM, DECK_STREAM};
use crate::state::GameState;
use crate::stats::{modify_stat, StatKey};

fn default_seed() -> u64 {
    7
}

fn default_report_interval_turns() -> u32 {
    10
}

fn default_city_hall_level() -> u32 {
    1
}

fn default_bounds() -> Option<Bounds> {
    Some(Bounds {
        min_row: -100,
        max_row: 100,
        min_col: -100,
        max_col: 100,
    })
}

#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub description: Option<String>,
    #[serde(default = "default_seed")]
    pub seed: u64,
    #[serde(default)]
    pub turns: Option<u32>,
    #[serde(default = "default_report_interval_turns")]
    pub report_interval_turns: u32,
    /// Omit for an unbounded map; `null` is also unbounded.
    #[serde(default = "default_bounds")]
    pub bounds: Option<Bounds>,
    #[serde(default)]
    pub cells: Vec<ScenarioCell>,
    #[serde(default)]
    pub freeways: Vec<FreewaySpan>,
    #[serde(default)]
    pub stats: BTreeMap<StatKey, f64>,
    #[serde(default = "default_deck")]
    pub deck: Vec<DeckEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioCell {
    pub kind: TileKind,
    pub row: i32,
    pub col: i32,
    /// Only read for city halls.
    #[serde(default = "default_city_hall_level")]
    pub level: u32,
}

/// A vertical freeway running down `col` from `from_row` to `to_row`
/// inclusive.
#[derive(Debug, Clone, Deserialize)]
pub struct FreewaySpan {
    pub col: i32,
    pub from_row: i32,
    pub to_row: i32,
}

pub struct ScenarioLoader {
    base_dir: PathBuf,
}

impl ScenarioLoader {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    pub fn load(&self, file: impl AsRef<Path>) -> Result<Scenario> {
        let path = self.base_dir.join(file);
        let data = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read scenario file {}", path.display()))?;
        let scenario: Scenario = serde_yaml::from_str(&data)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(scenario)
    }
}

impl Scenario {
    /// City hall beside a north-south freeway on an otherwise empty map.
    pub fn starter() -> Self {
        Self {
            name: "starter".to_string(),
            description: Some("A city hall beside the freeway.".to_string()),
            seed: default_seed(),
            turns: Some(40),
            report_interval_turns: default_report_interval_turns(),
            bounds: default_bounds(),
            cells: vec![ScenarioCell {
                kind: TileKind::CityHall,
                row: 0,
                col: 1,
                level: 1,
            }],
            freeways: vec![FreewaySpan {
                col: 0,
                from_row: -100,
                to_row: 100,
            }],
            stats: BTreeMap::new(),
            deck: default_deck(),
        }
    }

    /// Lays out the map, applies stat overrides, shuffles the deck and draws
    /// the opening hand.
    pub fn build_state(&self, rngs: &mut RngManager) -> SimResult<GameState> {
        let mut state = GameState::new(Grid::new(self.bounds));

        for span in &self.freeways {
            for row in span.from_row.min(span.to_row)..=span.from_row.max(span.to_row) {
                let coord = Coord::new(row, span.col);
                state = replace_cell(state, Cell::FreewayCorridor(FreewayCorridor::new(coord)));
            }
        }

        let mut construction = rngs.stream(CONSTRUCTION_STREAM);
        for placed in &self.cells {
            let coord = Coord::new(placed.row, placed.col);
            let cell = match placed.kind {
                TileKind::CityHall => Cell::CityHall(CityHall::new(coord, placed.level)),
                kind => Cell::build(kind, coord, &mut construction)?,
            };
            state = replace_cell(state, cell);
        }

        for (&key, &value) in &self.stats {
            state = modify_stat(state, key, |_| value);
        }

        let mut deck_rng = rngs.stream(DECK_STREAM);
        let state = build_deck(state, &self.deck, &mut deck_rng);
        Ok(draw(state, &mut deck_rng))
    }

    pub fn turns(&self, override_turns: Option<u32>) -> u32 {
        override_turns.or(self.turns).unwrap_or(40)
    }
}
