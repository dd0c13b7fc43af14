//! Stat ledger: keyed numeric resources with lazy defaults and clamped maxima.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SimError;
use crate::state::GameState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatKey {
    Money,
    #[serde(rename = "ap")]
    ActionPoints,
    ResidentialTaxRate,
    ResidentialApplications,
    CommercialApplications,
    IndustrialApplications,
    Population,
}

impl StatKey {
    pub const ALL: [StatKey; 7] = [
        StatKey::Money,
        StatKey::ActionPoints,
        StatKey::ResidentialTaxRate,
        StatKey::ResidentialApplications,
        StatKey::CommercialApplications,
        StatKey::IndustrialApplications,
        StatKey::Population,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            StatKey::Money => "money",
            StatKey::ActionPoints => "ap",
            StatKey::ResidentialTaxRate => "residential_tax_rate",
            StatKey::ResidentialApplications => "residential_applications",
            StatKey::CommercialApplications => "commercial_applications",
            StatKey::IndustrialApplications => "industrial_applications",
            StatKey::Population => "population",
        }
    }

    /// The value a stat has before anything has written to it.
    pub fn default_stat(self) -> Stat {
        match self {
            StatKey::Money => Stat::game(10_000.0, None, "Money", true),
            StatKey::ActionPoints => Stat::game(4.0, Some(20.0), "AP", true),
            StatKey::ResidentialTaxRate => Stat::game(0.05, Some(0.5), "Residential Tax", false),
            StatKey::ResidentialApplications => {
                Stat::game(2.0, Some(20.0), "Residential Applications", true)
            }
            StatKey::CommercialApplications => {
                Stat::game(0.0, Some(20.0), "Commercial Applications", true)
            }
            StatKey::IndustrialApplications => {
                Stat::game(0.0, Some(20.0), "Industrial Applications", true)
            }
            StatKey::Population => Stat {
                value: 0.0,
                lifecycle: Lifecycle::Turn,
                max: None,
                display_name: "Population",
                display: true,
            },
        }
    }
}

impl fmt::Display for StatKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatKey {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StatKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| SimError::UnknownStat(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Lifecycle {
    /// Persists for the whole game.
    Game,
    /// Reset to its default at the start of every round.
    Turn,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stat {
    pub value: f64,
    pub lifecycle: Lifecycle,
    pub max: Option<f64>,
    pub display_name: &'static str,
    pub display: bool,
}

impl Stat {
    fn game(value: f64, max: Option<f64>, display_name: &'static str, display: bool) -> Self {
        Self {
            value,
            lifecycle: Lifecycle::Game,
            max,
            display_name,
            display,
        }
    }

    fn clamped(mut self) -> Self {
        if let Some(max) = self.max {
            if self.value > max {
                self.value = max;
            }
        }
        self
    }
}

/// Only keys that have been written are stored; everything else reads as
/// its default.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatLedger {
    stats: BTreeMap<StatKey, Stat>,
}

impl StatLedger {
    pub fn get(&self, key: StatKey) -> Stat {
        self.stats
            .get(&key)
            .cloned()
            .unwrap_or_else(|| key.default_stat())
    }

    pub fn value(&self, key: StatKey) -> f64 {
        self.stats
            .get(&key)
            .map(|stat| stat.value)
            .unwrap_or_else(|| key.default_stat().value)
    }

    pub fn modify(mut self, key: StatKey, f: impl FnOnce(f64) -> f64) -> Self {
        let mut stat = self.get(key);
        stat.value = f(stat.value);
        self.stats.insert(key, stat.clamped());
        self
    }

    pub fn reset_turn_stats(mut self) -> Self {
        self.stats.retain(|_, stat| stat.lifecycle != Lifecycle::Turn);
        self
    }

    pub fn is_initialized(&self, key: StatKey) -> bool {
        self.stats.contains_key(&key)
    }
}

pub fn get_stat(state: &GameState, key: StatKey) -> Stat {
    state.stats().get(key)
}

pub fn get_stat_value(state: &GameState, key: StatKey) -> f64 {
    state.stats().value(key)
}

/// Applies `f` to the current (or default) value and clamps to the key's
/// maximum. The caller's ledger is never touched.
pub fn modify_stat(state: GameState, key: StatKey, f: impl FnOnce(f64) -> f64) -> GameState {
    state.map_stats(|stats| stats.modify(key, f))
}

/// Stats flagged for the stat bar, in key order.
pub fn displayed_stats(state: &GameState) -> Vec<(StatKey, Stat)> {
    StatKey::ALL
        .into_iter()
        .map(|key| (key, get_stat(state, key)))
        .filter(|(_, stat)| stat.display)
        .collect()
}
