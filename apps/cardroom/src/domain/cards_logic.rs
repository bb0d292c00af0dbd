//! Card game logic shared by both rule sets: suit checks and hand surgery.

use super::cards_types::{Card, Suit};

pub fn hand_has_suit(hand: &[Card], suit: Suit) -> bool {
    hand.iter().any(|c| c.suit == suit)
}

pub fn hand_contains(hand: &[Card], card: Card) -> bool {
    hand.contains(&card)
}

/// Remove `card` from `hand`, returning it if it was held.
pub fn take_card(hand: &mut Vec<Card>, card: Card) -> Option<Card> {
    let pos = hand.iter().position(|&c| c == card)?;
    Some(hand.remove(pos))
}

/// Sum of deadwood point values.
pub fn points(cards: &[Card]) -> u32 {
    cards.iter().map(|c| c.rank.points()).sum()
}
