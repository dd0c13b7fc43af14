pub mod analysis;
pub mod autoplay;
pub mod cards;
pub mod cells;
pub mod engine;
pub mod error;
pub mod grid;
pub mod report;
pub mod rng;
pub mod scenario;
pub mod state;
pub mod stats;
pub mod turn;

pub use engine::{Engine, EngineSettings};
pub use error::{SimError, SimResult};
pub use scenario::{Scenario, ScenarioLoader};
pub use state::{initial_state, GameState};
