//! The immutable game snapshot threaded through every transition.

use std::collections::VecDeque;

use tracing::debug;

use crate::cards::{Card, CardId};
use crate::cells::TileKind;
use crate::error::SimResult;
use crate::grid::Grid;
use crate::rng::RngManager;
use crate::scenario::Scenario;
use crate::stats::StatLedger;

/// Grid, ledger, card piles and log for one moment of a game.
///
/// Transitions take a state by value and hand back the next one. Cloning is
/// cheap for the grid (shared until written), so callers keep old snapshots
/// around freely.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GameState {
    pub(crate) grid: Grid,
    pub(crate) stats: StatLedger,
    pub(crate) hand: Vec<Card>,
    /// Front is the next card drawn.
    pub(crate) deck: VecDeque<Card>,
    pub(crate) discard: Vec<Card>,
    pub(crate) pending: Option<TileKind>,
    pub(crate) log: Vec<String>,
    pub(crate) turn: u32,
    pub(crate) next_card_id: u64,
}

impl GameState {
    pub fn new(grid: Grid) -> Self {
        Self {
            grid,
            log: vec!["Welcome!".to_string()],
            ..Self::default()
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn stats(&self) -> &StatLedger {
        &self.stats
    }

    pub fn hand(&self) -> &[Card] {
        &self.hand
    }

    pub fn deck(&self) -> &VecDeque<Card> {
        &self.deck
    }

    pub fn discard(&self) -> &[Card] {
        &self.discard
    }

    /// Tile kind waiting for a target coordinate, set by approval cards.
    pub fn pending(&self) -> Option<TileKind> {
        self.pending
    }

    /// Oldest entry first.
    pub fn log(&self) -> &[String] {
        &self.log
    }

    /// Rounds completed so far.
    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn hand_card(&self, id: CardId) -> Option<&Card> {
        self.hand.iter().find(|card| card.id == id)
    }

    /// Total number of card instances across hand, deck and discard.
    pub fn card_count(&self) -> usize {
        self.hand.len() + self.deck.len() + self.discard.len()
    }

    pub fn with_log(mut self, entry: impl Into<String>) -> Self {
        let entry = entry.into();
        debug!(turn = self.turn, %entry, "log");
        self.log.push(entry);
        self
    }

    pub fn with_pending(mut self, pending: Option<TileKind>) -> Self {
        self.pending = pending;
        self
    }

    pub fn map_stats(mut self, f: impl FnOnce(StatLedger) -> StatLedger) -> Self {
        self.stats = f(std::mem::take(&mut self.stats));
        self
    }

    pub fn map_grid(mut self, f: impl FnOnce(Grid) -> Grid) -> Self {
        self.grid = f(std::mem::take(&mut self.grid));
        self
    }

    pub(crate) fn allocate_card_id(&mut self) -> CardId {
        let id = CardId(self.next_card_id);
        self.next_card_id += 1;
        id
    }

    pub(crate) fn advance_turn(mut self) -> Self {
        self.turn += 1;
        self
    }
}

/// The built-in starting city with its deck shuffled and a first hand drawn.
pub fn initial_state(rngs: &mut RngManager) -> SimResult<GameState> {
    Scenario::starter().build_state(rngs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::HAND_SIZE;
    use crate::cells::TileKind;
    use crate::grid::{get_cell, Coord};

    #[test]
    fn new_state_greets_the_player() {
        let state = GameState::new(Grid::default());
        assert_eq!(state.log(), ["Welcome!".to_string()]);
        assert_eq!(state.turn(), 0);
        assert!(state.hand().is_empty());
    }

    #[test]
    fn initial_state_has_city_hall_freeway_and_a_hand() {
        let mut rngs = RngManager::new(7);
        let state = initial_state(&mut rngs).unwrap();
        assert_eq!(get_cell(&state, Coord::new(0, 1)).kind(), TileKind::CityHall);
        assert_eq!(
            get_cell(&state, Coord::new(-100, 0)).kind(),
            TileKind::FreewayCorridor
        );
        assert_eq!(
            get_cell(&state, Coord::new(100, 0)).kind(),
            TileKind::FreewayCorridor
        );
        assert_eq!(get_cell(&state, Coord::new(101, 0)).kind(), TileKind::Void);
        assert_eq!(get_cell(&state, Coord::new(5, 5)).kind(), TileKind::Empty);
        assert_eq!(state.hand().len(), HAND_SIZE);
        assert_eq!(state.card_count(), 15);
        assert_eq!(state.pending(), None);
    }

    #[test]
    fn card_ids_are_never_reused() {
        let mut state = GameState::default();
        let first = state.allocate_card_id();
        let second = state.allocate_card_id();
        assert_ne!(first, second);
    }
}
