use rand::{Rng, RngCore};
use serde::Serialize;
use tracing::debug;

use crate::cells::{Cell, CellBehavior, Description, TileKind};
use crate::error::{SimError, SimResult};
use crate::grid::{replace_cell, Coord};
use crate::rng::RngExt;
use crate::state::GameState;
use crate::stats::{get_stat_value, modify_stat, StatKey};

/// Number of house layout slots in one residential block.
pub const LOT_COUNT: usize = 104;

const BASE_PROPERTY_VALUE: u32 = 250_000;
const PROPERTY_VALUE_SPREAD: u32 = 50_000;
const BASE_MAINTENANCE: f64 = 1_000.0;
const MAINTENANCE_PER_DWELLING: f64 = 500.0;

const EXCELLENT_GROWTH_CHANCE: f64 = 0.75;
const GOOD_GROWTH_CHANCE: f64 = 0.5;
const POOR_DECLINE_CHANCE: f64 = 0.1;
const POOR_GROWTH_CHANCE: f64 = 0.3;
const COMMERCIAL_APPLICATION_CHANCE: f64 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Dwelling {
    pub property_value: u32,
    /// Layout slot in `0..LOT_COUNT`, unique within the cell.
    pub lot: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Proximity {
    Poor,
    Good,
    Excellent,
}

impl Proximity {
    pub fn from_score(score: f64) -> Self {
        if score > 10.0 {
            Proximity::Excellent
        } else if score > 5.0 {
            Proximity::Good
        } else {
            Proximity::Poor
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Proximity::Poor => "poor",
            Proximity::Good => "good",
            Proximity::Excellent => "excellent",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Residential {
    coord: Coord,
    /// Oldest first.
    dwellings: Vec<Dwelling>,
    job_score: f64,
}

impl Residential {
    pub const MOVEMENT_COST: u32 = 4;

    pub fn new(coord: Coord) -> Self {
        Self {
            coord,
            dwellings: Vec::new(),
            job_score: 0.0,
        }
    }

    pub fn dwellings(&self) -> &[Dwelling] {
        &self.dwellings
    }

    pub fn job_score(&self) -> f64 {
        self.job_score
    }

    pub fn proximity(&self) -> Proximity {
        Proximity::from_score(self.job_score)
    }

    pub fn has_free_lot(&self) -> bool {
        self.dwellings.len() < LOT_COUNT
    }

    pub fn total_property_value(&self) -> u64 {
        self.dwellings
            .iter()
            .map(|dwelling| u64::from(dwelling.property_value))
            .sum()
    }

    pub fn maintenance_cost(&self) -> f64 {
        BASE_MAINTENANCE + MAINTENANCE_PER_DWELLING * self.dwellings.len() as f64
    }

    /// New dwelling on a uniformly chosen free lot.
    pub fn add_dwelling<R: Rng + ?Sized>(&self, rng: &mut R) -> SimResult<Self> {
        let free: Vec<usize> = (0..LOT_COUNT)
            .filter(|lot| !self.dwellings.iter().any(|d| d.lot == *lot))
            .collect();
        if free.is_empty() {
            return Err(SimError::LotsFull(self.coord));
        }
        let lot = free[rng.gen_range(0..free.len())];
        let property_value = BASE_PROPERTY_VALUE + rng.gen_range(0..PROPERTY_VALUE_SPREAD);

        let mut dwellings = self.dwellings.clone();
        dwellings.push(Dwelling {
            property_value,
            lot,
        });
        Ok(Self {
            dwellings,
            ..self.clone()
        })
    }

    /// Drops the oldest dwelling, freeing its lot.
    pub fn remove_dwelling(&self) -> SimResult<Self> {
        if self.dwellings.is_empty() {
            return Err(SimError::NoDwellings(self.coord));
        }
        Ok(Self {
            dwellings: self.dwellings[1..].to_vec(),
            ..self.clone()
        })
    }

    /// `None` when the score is unchanged and the current cell can stay.
    pub fn rescored(&self, job_score: f64) -> Option<Self> {
        if job_score == self.job_score {
            return None;
        }
        Some(Self {
            job_score,
            ..self.clone()
        })
    }

    fn grow<R: Rng + ?Sized>(&self, chance: f64, rng: &mut R) -> SimResult<Option<Self>> {
        if self.has_free_lot() && rng.chance(chance) {
            return self.add_dwelling(rng).map(Some);
        }
        Ok(None)
    }

    fn develop<R: Rng + ?Sized>(&self, rng: &mut R) -> SimResult<Option<Self>> {
        match self.proximity() {
            Proximity::Excellent => self.grow(EXCELLENT_GROWTH_CHANCE, rng),
            Proximity::Good => self.grow(GOOD_GROWTH_CHANCE, rng),
            Proximity::Poor => {
                if !self.dwellings.is_empty() && rng.chance(POOR_DECLINE_CHANCE) {
                    return self.remove_dwelling().map(Some);
                }
                self.grow(POOR_GROWTH_CHANCE, rng)
            }
        }
    }
}

impl CellBehavior for Residential {
    fn kind(&self) -> TileKind {
        TileKind::Residential
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
            ("Lots", LOT_COUNT.to_string()),
            ("Dwellings", self.dwellings.len().to_string()),
            ("Total Property Value", format!("${}", self.total_property_value())),
            ("Monthly maintenance", format!("${}", self.maintenance_cost())),
            ("Job Score", format!("{:.2}", self.job_score)),
            ("Proximity to Jobs", self.proximity().as_str().to_string()),
        ]
    }

    fn on_turn_start(&self, state: GameState, rng: &mut dyn RngCore) -> SimResult<GameState> {
        let tax_rate = get_stat_value(&state, StatKey::ResidentialTaxRate);
        let revenue = (self.total_property_value() as f64 * tax_rate / 12.0).floor();
        let upkeep = self.maintenance_cost();
        let mut state = modify_stat(state, StatKey::Money, |money| money + revenue - upkeep);

        if let Some(developed) = self.develop(rng)? {
            debug!(
                coord = %self.coord,
                before = self.dwellings.len(),
                after = developed.dwellings.len(),
                "residential block changed"
            );
            state = replace_cell(state, Cell::Residential(developed));
        }

        if rng.chance(COMMERCIAL_APPLICATION_CHANCE) {
            state = modify_stat(state, StatKey::CommercialApplications, |n| n + 1.0);
        }
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{get_cell, Grid};
    use rand::rngs::mock::StepRng;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn always() -> StepRng {
        StepRng::new(0, 0)
    }

    fn never() -> StepRng {
        StepRng::new(u64::MAX, 0)
    }

    fn home_with(count: usize) -> Residential {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        (0..count).fold(Residential::new(Coord::new(0, 2)), |home, _| {
            home.add_dwelling(&mut rng).unwrap()
        })
    }

    fn state_with(home: &Residential) -> GameState {
        replace_cell(
            GameState::new(Grid::default()),
            Cell::Residential(home.clone()),
        )
    }

    fn home_at(state: &GameState, coord: Coord) -> Residential {
        get_cell(state, coord).as_residential().cloned().unwrap()
    }

    #[test]
    fn dwellings_take_distinct_lots() {
        let home = home_with(LOT_COUNT);
        let mut lots: Vec<usize> = home.dwellings().iter().map(|d| d.lot).collect();
        lots.sort_unstable();
        lots.dedup();
        assert_eq!(lots.len(), LOT_COUNT);
        assert!(!home.has_free_lot());
    }

    #[test]
    fn property_values_stay_in_band() {
        let home = home_with(30);
        for dwelling in home.dwellings() {
            assert!(dwelling.property_value >= 250_000);
            assert!(dwelling.property_value < 300_000);
        }
    }

    #[test]
    fn full_block_rejects_another_dwelling() {
        let home = home_with(LOT_COUNT);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert_eq!(
            home.add_dwelling(&mut rng),
            Err(SimError::LotsFull(Coord::new(0, 2)))
        );
    }

    #[test]
    fn empty_block_rejects_removal() {
        let home = Residential::new(Coord::new(5, 5));
        assert_eq!(
            home.remove_dwelling(),
            Err(SimError::NoDwellings(Coord::new(5, 5)))
        );
    }

    #[test]
    fn add_then_remove_restores_count() {
        let home = home_with(3);
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let restored = home.add_dwelling(&mut rng).unwrap().remove_dwelling().unwrap();
        assert_eq!(restored.dwellings().len(), home.dwellings().len());
    }

    #[test]
    fn rescoring_with_same_score_is_a_no_op() {
        let home = home_with(1).rescored(7.5).unwrap();
        assert!(home.rescored(7.5).is_none());
        assert_eq!(home.rescored(2.0).map(|h| h.job_score()), Some(2.0));
    }

    #[test]
    fn proximity_tiers() {
        assert_eq!(Proximity::from_score(0.0), Proximity::Poor);
        assert_eq!(Proximity::from_score(5.0), Proximity::Poor);
        assert_eq!(Proximity::from_score(5.1), Proximity::Good);
        assert_eq!(Proximity::from_score(10.0), Proximity::Good);
        assert_eq!(Proximity::from_score(10.5), Proximity::Excellent);
    }

    #[test]
    fn collects_taxes_minus_maintenance() {
        let home = home_with(2);
        let state = state_with(&home);
        let after = home.on_turn_start(state, &mut never()).unwrap();

        let expected_tax = (home.total_property_value() as f64 * 0.05 / 12.0).floor();
        assert_eq!(
            get_stat_value(&after, StatKey::Money),
            10_000.0 + expected_tax - 2_000.0
        );
        assert_eq!(home_at(&after, home.coord()).dwellings().len(), 2);
        assert_eq!(get_stat_value(&after, StatKey::CommercialApplications), 0.0);
    }

    #[test]
    fn unscored_block_without_dwellings_can_only_grow() {
        let home = Residential::new(Coord::new(0, 2));
        assert_eq!(home.proximity(), Proximity::Poor);

        let after = home.on_turn_start(state_with(&home), &mut always()).unwrap();
        assert_eq!(home_at(&after, home.coord()).dwellings().len(), 1);
        assert_eq!(get_stat_value(&after, StatKey::CommercialApplications), 1.0);
    }

    #[test]
    fn unscored_block_with_dwellings_can_decline() {
        let home = home_with(2);
        let after = home.on_turn_start(state_with(&home), &mut always()).unwrap();
        let remaining = home_at(&after, home.coord());
        assert_eq!(remaining.dwellings().len(), 1);
        assert_eq!(remaining.dwellings()[0], home.dwellings()[1]);
    }

    #[test]
    fn excellent_block_grows_until_full() {
        let home = home_with(LOT_COUNT - 1).rescored(12.0).unwrap();
        let after = home.on_turn_start(state_with(&home), &mut always()).unwrap();
        let grown = home_at(&after, home.coord());
        assert_eq!(grown.dwellings().len(), LOT_COUNT);

        let again = grown.on_turn_start(after, &mut always()).unwrap();
        assert_eq!(home_at(&again, home.coord()).dwellings().len(), LOT_COUNT);
    }

    #[test]
    fn good_block_never_declines() {
        let home = home_with(4).rescored(6.0).unwrap();
        let after = home.on_turn_start(state_with(&home), &mut always()).unwrap();
        assert_eq!(home_at(&after, home.coord()).dwellings().len(), 5);
    }
}
