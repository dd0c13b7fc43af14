use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

use crate::cells::TileKind;
use crate::state::GameState;
use crate::stats::{get_stat_value, StatKey};

/// Summary of a city at the end of a turn.
#[derive(Debug, Clone, Serialize)]
pub struct TurnReport {
    pub scenario: String,
    pub turn: u32,
    pub money: f64,
    pub ap: f64,
    pub population: f64,
    pub residential_tax_rate: f64,
    pub applications: Applications,
    pub cells: BTreeMap<TileKind, usize>,
    pub residential: ResidentialSummary,
    pub hand: Vec<&'static str>,
    pub pending: Option<TileKind>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Applications {
    pub residential: f64,
    pub commercial: f64,
    pub industrial: f64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ResidentialSummary {
    pub blocks: usize,
    pub dwellings: usize,
    pub total_property_value: u64,
    pub mean_job_score: f64,
}

impl TurnReport {
    pub fn capture(state: &GameState, scenario: &str) -> Self {
        let mut cells = BTreeMap::new();
        let mut residential = ResidentialSummary::default();
        let mut score_total = 0.0;
        for coord in state.grid().coords() {
            let Some(cell) = state.grid().lookup(coord) else {
                continue;
            };
            *cells.entry(cell.kind()).or_insert(0) += 1;
            if let Some(home) = cell.as_residential() {
                residential.blocks += 1;
                residential.dwellings += home.dwellings().len();
                residential.total_property_value += home.total_property_value();
                score_total += home.job_score();
            }
        }
        if residential.blocks > 0 {
            residential.mean_job_score = score_total / residential.blocks as f64;
        }

        Self {
            scenario: scenario.to_string(),
            turn: state.turn(),
            money: get_stat_value(state, StatKey::Money),
            ap: get_stat_value(state, StatKey::ActionPoints),
            population: get_stat_value(state, StatKey::Population),
            residential_tax_rate: get_stat_value(state, StatKey::ResidentialTaxRate),
            applications: Applications {
                residential: get_stat_value(state, StatKey::ResidentialApplications),
                commercial: get_stat_value(state, StatKey::CommercialApplications),
                industrial: get_stat_value(state, StatKey::IndustrialApplications),
            },
            cells,
            residential,
            hand: state.hand().iter().map(|card| card.name()).collect(),
            pending: state.pending(),
        }
    }
}

/// Writes a JSON report every `interval` turns; an interval of 0 disables it.
pub struct ReportWriter {
    dir: PathBuf,
    interval: u32,
}

impl ReportWriter {
    pub fn new(dir: impl AsRef<Path>, interval: u32) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            interval,
        }
    }

    pub fn maybe_write(&self, state: &GameState, scenario: &str) -> Result<Option<PathBuf>> {
        if self.interval == 0 || state.turn() % self.interval != 0 {
            return Ok(None);
        }
        let dir = self.dir.join(scenario);
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create report directory {}", dir.display()))?;
        let path = dir.join(format!("turn_{:06}.json", state.turn()));
        let report = TurnReport::capture(state, scenario);
        let json = serde_json::to_string_pretty(&report).context("Failed to encode turn report")?;
        fs::write(&path, json)
            .with_context(|| format!("Failed to write report {}", path.display()))?;
        Ok(Some(path))
    }
}
