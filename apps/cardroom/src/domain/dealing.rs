//! Deck construction, shuffling and dealing shared by both rule sets.

use rand::Rng;

use crate::domain::{Card, Rank, Suit};
use crate::errors::domain::{DomainError, ValidationKind};

pub const DECK_SIZE: usize = 52;

/// Generate a full 52-card deck in deterministic order (S, H, D, C; 2..A).
pub fn build_ordered_deck() -> Vec<Card> {
    let mut deck = Vec::with_capacity(DECK_SIZE);
    for suit in Suit::DECK_ORDER {
        for rank in Rank::ALL {
            deck.push(Card { suit, rank });
        }
    }
    deck
}

/// In-place Fisher-Yates shuffle driven by the injected random source.
pub fn shuffle<R: Rng + ?Sized>(cards: &mut [Card], rng: &mut R) {
    for i in (1..cards.len()).rev() {
        let j = rng.random_range(0..=i);
        cards.swap(i, j);
    }
}

/// A freshly shuffled 52-card deck.
pub fn shuffled_deck<R: Rng + ?Sized>(rng: &mut R) -> Vec<Card> {
    let mut deck = build_ordered_deck();
    shuffle(&mut deck, rng);
    deck
}

/// Deal the whole deck one card at a time to `seats` hands in order.
///
/// Hands differ in size by at most one card.
pub fn deal_round_robin(seats: usize, deck: Vec<Card>) -> Result<Vec<Vec<Card>>, DomainError> {
    if seats == 0 {
        return Err(DomainError::validation(
            ValidationKind::NotEnoughPlayers,
            "Cannot deal to zero players",
        ));
    }
    let mut hands: Vec<Vec<Card>> = vec![Vec::with_capacity(deck.len() / seats + 1); seats];
    for (i, card) in deck.into_iter().enumerate() {
        hands[i % seats].push(card);
    }
    Ok(hands)
}

/// Result of a Digu deal: 10 cards per seat, a discard seed and the draw pile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiguDeal {
    pub hands: Vec<Vec<Card>>,
    pub discard_seed: Card,
    pub draw_pile: Vec<Card>,
}

pub const DIGU_HAND_SIZE: usize = 10;

/// Deal exactly 10 cards to each seat, reserve one card to seed the discard
/// pile and keep the rest as the draw pile (top of pile = end of vec).
pub fn deal_digu(seats: usize, mut deck: Vec<Card>) -> Result<DiguDeal, DomainError> {
    if seats == 0 || seats * DIGU_HAND_SIZE + 1 > deck.len() {
        return Err(DomainError::validation(
            ValidationKind::NotEnoughPlayers,
            format!("Cannot deal {seats} Digu hands from {} cards", deck.len()),
        ));
    }
    let mut hands = Vec::with_capacity(seats);
    for _ in 0..seats {
        let rest = deck.split_off(DIGU_HAND_SIZE);
        hands.push(std::mem::replace(&mut deck, rest));
    }
    let discard_seed = deck.pop().ok_or_else(|| DomainError::invariant("Digu deal: deck empty"))?;
    Ok(DiguDeal {
        hands,
        discard_seed,
        draw_pile: deck,
    })
}
