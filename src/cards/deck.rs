use std::collections::VecDeque;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Deserialize;
use tracing::debug;

use crate::cards::{Card, CardId, CardKind};
use crate::error::{SimError, SimResult};
use crate::state::GameState;

pub const HAND_SIZE: usize = 5;

/// One line of a deck list: `count` copies of `card`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct DeckEntry {
    pub card: CardKind,
    pub count: u32,
}

impl DeckEntry {
    pub const fn new(card: CardKind, count: u32) -> Self {
        Self { card, count }
    }
}

/// The fifteen-card deck a new city starts with.
pub fn default_deck() -> Vec<DeckEntry> {
    vec![
        DeckEntry::new(CardKind::ApproveHousing, 4),
        DeckEntry::new(CardKind::ApproveCommercialCorridor, 2),
        DeckEntry::new(CardKind::ApproveIndustrial, 2),
        DeckEntry::new(CardKind::ParksAndRecreation, 2),
        DeckEntry::new(CardKind::ExpandMunicipalCharter, 2),
        DeckEntry::new(CardKind::Parade, 1),
        DeckEntry::new(CardKind::ResidentialTaxAdjustment, 2),
    ]
}

/// Creates fresh card instances for `entries`, shuffles them and puts them
/// at the bottom of the deck.
pub fn build_deck<R: Rng + ?Sized>(
    mut state: GameState,
    entries: &[DeckEntry],
    rng: &mut R,
) -> GameState {
    let mut cards = Vec::new();
    for entry in entries {
        for _ in 0..entry.count {
            let id = state.allocate_card_id();
            cards.push(Card {
                id,
                kind: entry.card,
            });
        }
    }
    cards.shuffle(rng);
    state.deck.extend(cards);
    state
}

/// Discards the hand and draws a fresh one of `HAND_SIZE` cards.
///
/// When the deck runs dry the discard pile is shuffled into a new deck. The
/// hand only comes up short if the game owns fewer than `HAND_SIZE` cards.
pub fn draw<R: Rng + ?Sized>(mut state: GameState, rng: &mut R) -> GameState {
    let hand = std::mem::take(&mut state.hand);
    state.discard.extend(hand);

    while state.hand.len() < HAND_SIZE {
        if state.deck.is_empty() {
            if state.discard.is_empty() {
                break;
            }
            let mut pile = std::mem::take(&mut state.discard);
            pile.shuffle(rng);
            debug!(cards = pile.len(), "discard pile reshuffled into deck");
            state.deck = VecDeque::from(pile);
        }
        if let Some(card) = state.deck.pop_front() {
            state.hand.push(card);
        }
    }
    state
}

/// Moves the hand card with `id` onto the discard pile.
pub fn discard_hand_card(mut state: GameState, id: CardId) -> SimResult<GameState> {
    let index = state
        .hand
        .iter()
        .position(|card| card.id == id)
        .ok_or(SimError::CardNotInHand(id))?;
    let card = state.hand.remove(index);
    state.discard.push(card);
    Ok(state)
}
