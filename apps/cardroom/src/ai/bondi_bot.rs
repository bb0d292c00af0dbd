//! Bondi heuristic: shed cards without ending up as the trick leader when an
//! interrupt could land the whole trick in our hand.

use std::collections::BTreeMap;

use super::AiError;
use crate::domain::bondi::{legal_moves, BondiGameState, BondiStatus};
use crate::domain::{Card, Suit};

/// Pick the bot's next card. Always returns a legal card for the seat to move.
pub fn choose_card(state: &BondiGameState, bot_id: &str) -> Result<Card, AiError> {
    if state.status != BondiStatus::Playing
        || state.current_player().map(|p| p.id.as_str()) != Some(bot_id)
    {
        return Err(AiError::NotBotsTurn(bot_id.to_string()));
    }
    let legal = legal_moves(state, bot_id);
    if legal.is_empty() {
        return Err(AiError::NoLegalMove(format!("{bot_id} holds no cards")));
    }

    let pick = match state.leading_suit {
        None => lead_card(&legal),
        Some(lead) if legal.iter().all(|c| c.suit == lead) => follow_card(state, &legal, lead),
        // Void in the lead suit: interrupt, dumping the highest card.
        Some(_) => legal.iter().copied().max_by_key(|c| c.rank),
    };
    pick.ok_or_else(|| AiError::NoLegalMove(format!("{bot_id} found no card")))
}

/// Lowest card of the longest suit held.
fn lead_card(hand: &[Card]) -> Option<Card> {
    let mut by_suit: BTreeMap<Suit, Vec<Card>> = BTreeMap::new();
    for &c in hand {
        by_suit.entry(c.suit).or_default().push(c);
    }
    by_suit
        .into_values()
        .max_by_key(|cards| cards.len())
        .and_then(|cards| cards.into_iter().min_by_key(|c| c.rank))
}

/// Highest card that stays under the current leader, else the lowest.
fn follow_card(state: &BondiGameState, legal: &[Card], lead: Suit) -> Option<Card> {
    let top = state
        .current_trick
        .iter()
        .filter(|t| t.card.suit == lead)
        .map(|t| t.card.rank)
        .max();
    let under = legal
        .iter()
        .copied()
        .filter(|c| top.is_some_and(|r| c.rank < r))
        .max_by_key(|c| c.rank);
    under.or_else(|| legal.iter().copied().min_by_key(|c| c.rank))
}
