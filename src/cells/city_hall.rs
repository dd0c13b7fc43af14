use rand::RngCore;

use crate::cells::{CellBehavior, Description, TileKind};
use crate::error::SimResult;
use crate::grid::Coord;
use crate::state::GameState;
use crate::stats::{modify_stat, StatKey};

/// Generates `level` action points every turn.
#[derive(Debug, Clone, PartialEq)]
pub struct CityHall {
    coord: Coord,
    level: u32,
}

impl CityHall {
    pub const MOVEMENT_COST: u32 = 4;
    pub const JOBS: u32 = 10;

    pub fn new(coord: Coord, level: u32) -> Self {
        Self { coord, level }
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn upgrade(&self) -> Self {
        Self::new(self.coord, self.level + 1)
    }
}

impl CellBehavior for CityHall {
    fn kind(&self) -> TileKind {
        TileKind::CityHall
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
            ("Effect", format!("+{} AP", self.level)),
            ("Level", self.level.to_string()),
            ("Jobs", Self::JOBS.to_string()),
        ]
    }

    fn on_turn_start(&self, state: GameState, _rng: &mut dyn RngCore) -> SimResult<GameState> {
        let level = f64::from(self.level);
        Ok(modify_stat(state, StatKey::ActionPoints, |ap| ap + level))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Grid;
    use crate::stats::get_stat_value;
    use rand::rngs::mock::StepRng;

    #[test]
    fn upgrade_returns_a_new_hall_one_level_up() {
        let hall = CityHall::new(Coord::new(0, 1), 2);
        let upgraded = hall.upgrade();
        assert_eq!(hall.level(), 2);
        assert_eq!(upgraded.level(), 3);
        assert_eq!(upgraded.coord(), hall.coord());
        assert_eq!(upgraded.describe()[1], ("Effect", "+3 AP".to_string()));
    }

    #[test]
    fn grants_level_action_points_clamped_to_max() {
        let mut rng = StepRng::new(0, 1);
        let hall = CityHall::new(Coord::new(0, 0), 3);
        let state = modify_stat(GameState::new(Grid::default()), StatKey::ActionPoints, |_| 0.0);

        let state = hall.on_turn_start(state, &mut rng).unwrap();
        assert_eq!(get_stat_value(&state, StatKey::ActionPoints), 3.0);

        let state = modify_stat(state, StatKey::ActionPoints, |_| 19.0);
        let state = hall.on_turn_start(state, &mut rng).unwrap();
        assert_eq!(get_stat_value(&state, StatKey::ActionPoints), 20.0);
    }
}
