//! Commute analysis: travel costs from a cell and its proximity to jobs.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use tracing::debug;

use crate::cells::Cell;
use crate::grid::{replace_cell, Coord};
use crate::state::GameState;

/// Cheapest travel cost from `origin` to every reachable coordinate.
///
/// Moves are orthogonal only. Entering a cell costs that cell's movement cost
/// and impassable cells are never entered, so unreachable coordinates are
/// simply absent. The origin is always present at cost 0.
pub fn distance_map(state: &GameState, origin: Coord) -> HashMap<Coord, u32> {
    let grid = state.grid();
    let mut costs = HashMap::from([(origin, 0)]);
    let mut frontier = BinaryHeap::from([Reverse((0u32, origin))]);

    while let Some(Reverse((cost, coord))) = frontier.pop() {
        if costs.get(&coord).is_some_and(|best| *best < cost) {
            continue;
        }
        for next in coord.orthogonal() {
            let Some(step) = grid.movement_cost(next) else {
                continue;
            };
            let next_cost = cost + step;
            if costs.get(&next).is_some_and(|best| *best <= next_cost) {
                continue;
            }
            costs.insert(next, next_cost);
            frontier.push(Reverse((next_cost, next)));
        }
    }
    costs
}

/// Mean of `jobs / travel cost` over every job provider reachable from
/// `origin`, not counting the origin itself. Zero when no jobs are in reach.
pub fn job_distance_score(state: &GameState, origin: Coord) -> f64 {
    let mut reachable: Vec<(Coord, u32)> = distance_map(state, origin)
        .into_iter()
        .filter(|(coord, _)| *coord != origin)
        .collect();
    reachable.sort_unstable();

    let ratios: Vec<f64> = reachable
        .into_iter()
        .filter_map(|(coord, distance)| {
            let jobs = state.grid().lookup(coord)?.job_count()?;
            Some(f64::from(jobs) / f64::from(distance))
        })
        .collect();

    if ratios.is_empty() {
        return 0.0;
    }
    ratios.iter().sum::<f64>() / ratios.len() as f64
}

/// Re-scores every residential block against the current map.
pub fn analyze(state: GameState) -> GameState {
    let rescored: Vec<Cell> = state
        .grid()
        .coords()
        .into_iter()
        .filter_map(|coord| {
            let home = state.grid().lookup(coord)?.as_residential()?;
            home.rescored(job_distance_score(&state, coord))
                .map(Cell::Residential)
        })
        .collect();

    debug!(changed = rescored.len(), "job scores refreshed");
    rescored.into_iter().fold(state, replace_cell)
}
