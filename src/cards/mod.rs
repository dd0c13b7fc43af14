//! Cards: what they cost, what they do, and how they move between piles.

mod deck;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

pub use deck::{build_deck, default_deck, discard_hand_card, draw, DeckEntry, HAND_SIZE};

use crate::cells::{Cell, TileKind};
use crate::error::{SimError, SimResult};
use crate::grid::{find_cell_by_kind, replace_cell};
use crate::state::GameState;
use crate::stats::{get_stat_value, modify_stat, StatKey};

/// Unique per card instance, so two copies of the same card in hand are
/// never confused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct CardId(pub(crate) u64);

impl CardId {
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardKind {
    ApproveHousing,
    ApproveCommercialCorridor,
    ApproveIndustrial,
    ParksAndRecreation,
    ExpandMunicipalCharter,
    Parade,
    ResidentialTaxAdjustment,
}

impl CardKind {
    pub const ALL: [CardKind; 7] = [
        CardKind::ApproveHousing,
        CardKind::ApproveCommercialCorridor,
        CardKind::ApproveIndustrial,
        CardKind::ParksAndRecreation,
        CardKind::ExpandMunicipalCharter,
        CardKind::Parade,
        CardKind::ResidentialTaxAdjustment,
    ];

    fn key(self) -> &'static str {
        match self {
            CardKind::ApproveHousing => "approve_housing",
            CardKind::ApproveCommercialCorridor => "approve_commercial_corridor",
            CardKind::ApproveIndustrial => "approve_industrial",
            CardKind::ParksAndRecreation => "parks_and_recreation",
            CardKind::ExpandMunicipalCharter => "expand_municipal_charter",
            CardKind::Parade => "parade",
            CardKind::ResidentialTaxAdjustment => "residential_tax_adjustment",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            CardKind::ApproveHousing => "Approve Housing",
            CardKind::ApproveCommercialCorridor => "Approve Commercial Application",
            CardKind::ApproveIndustrial => "Approve Industrial",
            CardKind::ParksAndRecreation => "Parks & Rec Project",
            CardKind::ExpandMunicipalCharter => "Expand Municipal Charter",
            CardKind::Parade => "Parade",
            CardKind::ResidentialTaxAdjustment => "Residential Tax Adjustment",
        }
    }

    pub fn image_url(self) -> &'static str {
        match self {
            CardKind::ApproveHousing => "img/HousingDevelopmentInitiative.png",
            CardKind::ApproveCommercialCorridor => "img/MarketDistrict.jpeg",
            CardKind::ApproveIndustrial => "img/Industrial.jpeg",
            CardKind::ParksAndRecreation => "img/Park.jpeg",
            CardKind::ExpandMunicipalCharter => "img/MunicipalBondIssuance.jpeg",
            CardKind::Parade => "img/Parade.jpeg",
            CardKind::ResidentialTaxAdjustment => "img/ResidentialTaxAdjustment.jpeg",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            CardKind::ApproveHousing => "Place a residential tile.",
            CardKind::ApproveCommercialCorridor => {
                "Approve applications to develop a commercial corridor."
            }
            CardKind::ApproveIndustrial => "Place an industrial tile.",
            CardKind::ParksAndRecreation => {
                "Residential cells adjacent to a park have a 20% chance of adding a dwelling."
            }
            CardKind::ExpandMunicipalCharter => {
                "Expand the bureaucratic capacity of city hall. +1 to generated AP."
            }
            CardKind::Parade => "Throw a parade for the town. +10 AP",
            CardKind::ResidentialTaxAdjustment => "Increase residential taxes +5%",
        }
    }

    /// Amounts deducted from the ledger when the card is played.
    pub fn cost(self) -> &'static [(StatKey, f64)] {
        match self {
            CardKind::ApproveHousing => &[
                (StatKey::ActionPoints, 2.0),
                (StatKey::ResidentialApplications, 1.0),
            ],
            CardKind::ApproveCommercialCorridor => &[
                (StatKey::ActionPoints, 2.0),
                (StatKey::CommercialApplications, 1.0),
            ],
            CardKind::ApproveIndustrial => &[
                (StatKey::ActionPoints, 2.0),
                (StatKey::IndustrialApplications, 1.0),
            ],
            CardKind::ParksAndRecreation => &[(StatKey::ActionPoints, 3.0)],
            CardKind::ExpandMunicipalCharter => &[(StatKey::ActionPoints, 3.0)],
            CardKind::Parade => &[(StatKey::ActionPoints, 5.0), (StatKey::Money, 50_000.0)],
            CardKind::ResidentialTaxAdjustment => &[(StatKey::ActionPoints, 3.0)],
        }
    }

    /// Tile kind this card asks the player to place, if any.
    pub fn places(self) -> Option<TileKind> {
        match self {
            CardKind::ApproveHousing => Some(TileKind::Residential),
            CardKind::ApproveCommercialCorridor => Some(TileKind::CommercialCorridor),
            CardKind::ApproveIndustrial => Some(TileKind::Industrial),
            CardKind::ParksAndRecreation => Some(TileKind::Park),
            _ => None,
        }
    }

    /// The card's own mutation, applied after costs are paid.
    fn apply(self, state: GameState) -> GameState {
        if let Some(kind) = self.places() {
            return state.with_pending(Some(kind));
        }
        match self {
            CardKind::ExpandMunicipalCharter => {
                match find_cell_by_kind(&state, TileKind::CityHall) {
                    Some(Cell::CityHall(hall)) => {
                        replace_cell(state, Cell::CityHall(hall.upgrade()))
                    }
                    _ => state,
                }
            }
            CardKind::Parade => modify_stat(state, StatKey::ActionPoints, |ap| ap + 10.0),
            CardKind::ResidentialTaxAdjustment => {
                modify_stat(state, StatKey::ResidentialTaxRate, |rate| rate * 1.05)
            }
            _ => state,
        }
    }
}

impl fmt::Display for CardKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CardKind {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CardKind::ALL
            .into_iter()
            .find(|kind| kind.key() == s)
            .ok_or_else(|| SimError::UnknownCard(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Card {
    pub(crate) id: CardId,
    pub(crate) kind: CardKind,
}

impl Card {
    pub fn id(&self) -> CardId {
        self.id
    }

    pub fn kind(&self) -> CardKind {
        self.kind
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    /// First cost entry the ledger cannot cover, as (stat, required, available).
    pub fn shortfall(&self, state: &GameState) -> Option<(StatKey, f64, f64)> {
        self.kind.cost().iter().find_map(|&(stat, required)| {
            let available = get_stat_value(state, stat);
            (available < required).then_some((stat, required, available))
        })
    }

    pub fn can_play(&self, state: &GameState) -> bool {
        self.shortfall(state).is_none()
    }

    /// Pays the card's cost, moves it from hand to discard and applies it.
    ///
    /// Callers check `can_play` first; an unaffordable card or one that is not
    /// in hand is a contract violation.
    pub fn effect(&self, state: GameState) -> SimResult<GameState> {
        if state.hand_card(self.id).is_none() {
            return Err(SimError::CardNotInHand(self.id));
        }
        if let Some((stat, required, available)) = self.shortfall(&state) {
            return Err(SimError::InsufficientStat {
                card: self.name(),
                stat,
                required,
                available,
            });
        }

        let paid = self
            .kind
            .cost()
            .iter()
            .fold(state, |state, &(stat, amount)| {
                modify_stat(state, stat, |value| value - amount)
            });
        let state = discard_hand_card(paid, self.id)?;
        debug!(card = self.name(), id = %self.id, "card played");
        Ok(self.kind.apply(state).with_log(format!("Played {}", self.name())))
    }
}
