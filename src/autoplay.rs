//! Headless play: policies that make a turn's decisions for the engine.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use anyhow::Result;
use tracing::debug;

use crate::analysis::job_distance_score;
use crate::cards::CardKind;
use crate::cells::{Cell, Residential, TileKind};
use crate::engine::Engine;
use crate::grid::{find_cell_by_kind, get_cell, get_neighbors, replace_cell, Coord};
use crate::state::GameState;
use crate::stats::{get_stat_value, StatKey};

pub trait Policy {
    fn name(&self) -> &str;

    /// Plays cards and places tiles until the policy is done with the turn.
    fn play_turn(&mut self, engine: &mut Engine) -> Result<()>;
}

/// Upper bound the autoplayer will push the residential tax rate to.
const TAX_CEILING: f64 = 0.1;

/// Plays the most useful affordable card until none is left, placing each
/// tile on the best site it can find.
#[derive(Debug, Default)]
pub struct Autoplayer;

impl Autoplayer {
    pub fn new() -> Self {
        Self
    }

    fn priority(kind: CardKind, state: &GameState) -> Option<u8> {
        let priority = match kind {
            CardKind::ExpandMunicipalCharter => 0,
            CardKind::ApproveHousing => 1,
            CardKind::ApproveCommercialCorridor => 2,
            CardKind::ApproveIndustrial => 3,
            CardKind::ParksAndRecreation => 4,
            CardKind::ResidentialTaxAdjustment => {
                if get_stat_value(state, StatKey::ResidentialTaxRate) >= TAX_CEILING {
                    return None;
                }
                5
            }
            CardKind::Parade => 6,
        };
        Some(priority)
    }
}

impl Policy for Autoplayer {
    fn name(&self) -> &str {
        "greedy"
    }

    fn play_turn(&mut self, engine: &mut Engine) -> Result<()> {
        loop {
            let state = engine.state();
            let next = state
                .hand()
                .iter()
                .filter(|card| card.can_play(state))
                .filter_map(|card| Some((Self::priority(card.kind(), state)?, card.id())))
                .min();
            let Some((_, id)) = next else {
                return Ok(());
            };
            if !engine.play_card(id)? {
                return Ok(());
            }

            let Some(kind) = engine.state().pending() else {
                continue;
            };
            match choose_site(engine.state(), kind) {
                Some(coord) => {
                    debug!(%kind, %coord, "autoplayer placing tile");
                    engine.place_pending(coord)?;
                }
                None => engine.cancel_placement(),
            }
        }
    }
}

/// Empty lots orthogonally next to a passable built cell, in row-major order.
pub fn candidate_sites(state: &GameState) -> BTreeSet<Coord> {
    state
        .grid()
        .cells()
        .filter(|cell| cell.movement_cost().is_some())
        .flat_map(|cell| cell.coord().orthogonal())
        .filter(|coord| get_cell(state, *coord).is_buildable())
        .collect()
}

/// Best lot for a new `kind` tile, or `None` when no lot is free.
///
/// Homes go where the commute score would be highest; parks where they touch
/// the most homes; industry anywhere it cannot pollute a home, closest to
/// city hall; corridors closest to city hall. Ties go to the first lot in
/// row-major order.
pub fn choose_site(state: &GameState, kind: TileKind) -> Option<Coord> {
    let sites = candidate_sites(state);
    let hall = find_cell_by_kind(state, TileKind::CityHall)
        .map(|cell| cell.coord())
        .unwrap_or(Coord::new(0, 0));

    match kind {
        TileKind::Residential => best_by(sites, |site| {
            let trial = replace_cell(state.clone(), Cell::Residential(Residential::new(site)));
            job_distance_score(&trial, site)
        }),
        TileKind::Park => best_by(sites, |site| homes_around(state, site) as f64),
        TileKind::Industrial => best_by(
            sites
                .into_iter()
                .filter(|site| homes_around(state, *site) == 0)
                .collect(),
            |site| -f64::from(site.manhattan(hall)),
        ),
        _ => best_by(sites, |site| -f64::from(site.manhattan(hall))),
    }
}

fn homes_around(state: &GameState, coord: Coord) -> usize {
    get_neighbors(state, coord)
        .iter()
        .filter(|(_, cell)| cell.as_residential().is_some())
        .count()
}

fn best_by(sites: BTreeSet<Coord>, score: impl Fn(Coord) -> f64) -> Option<Coord> {
    sites
        .into_iter()
        .map(|site| (score(site), site))
        .fold(None, |best: Option<(f64, Coord)>, (value, site)| match best {
            Some((top, _)) if value.total_cmp(&top) != Ordering::Greater => best,
            _ => Some((value, site)),
        })
        .map(|(_, site)| site)
}
