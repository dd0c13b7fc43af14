use thiserror::Error;

use crate::cards::CardId;
use crate::cells::TileKind;
use crate::grid::Coord;
use crate::stats::StatKey;

/// Contract violations inside the simulation core.
///
/// Rejected player input (an occupied lot, an unaffordable card) is not an
/// error: it is written to the state log and the state is returned unchanged.
/// Everything here means a caller skipped a capacity or affordability check.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimError {
    #[error("residential cell at {0} has no free lots")]
    LotsFull(Coord),

    #[error("residential cell at {0} has no dwellings to remove")]
    NoDwellings(Coord),

    #[error("unrecognized stat '{0}'")]
    UnknownStat(String),

    #[error("unrecognized tile type '{0}'")]
    UnknownTile(String),

    #[error("unrecognized card '{0}'")]
    UnknownCard(String),

    #[error("tile type '{0}' cannot be placed")]
    NotPlaceable(TileKind),

    #[error("card {0} is not in hand")]
    CardNotInHand(CardId),

    #[error("'{card}' needs {required} {stat}, only {available} available")]
    InsufficientStat {
        card: &'static str,
        stat: StatKey,
        required: f64,
        available: f64,
    },
}

pub type SimResult<T> = Result<T, SimError>;
