//! Digu heuristic: pick up helpful discards, meld greedily, throw the
//! heaviest deadwood, knock when low enough.

use rand::Rng;

use super::{AiError, DISCARD_PICKUP_CHANCE, KNOCK_CHANCE};
use crate::domain::digu::round::{discard_card, draw_card};
use crate::domain::digu::{
    can_knock, deadwood_cards, find_best_melds, process_knock, DiguGameState, DiguStatus,
    RoundResult,
};
use crate::domain::Card;

/// What a bot did on its turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiguBotTurn {
    pub drew_from_discard: bool,
    pub discarded: Card,
    pub knock: Option<RoundResult>,
}

/// Same rank as a held card, or same suit within two ranks.
pub fn would_help_meld(hand: &[Card], card: Card) -> bool {
    hand.iter().any(|c| {
        c.rank == card.rank
            || (c.suit == card.suit && c.rank.value().abs_diff(card.rank.value()) <= 2)
    })
}

/// Unmelded card worth the most points; if everything melds, the highest card.
fn worst_card(hand: &[Card], deadwood: &[Card]) -> Option<Card> {
    let pool = if deadwood.is_empty() { hand } else { deadwood };
    pool.iter()
        .copied()
        .max_by_key(|c| (c.rank.points(), c.rank))
}

/// Play one full Digu turn for `bot_id`: draw, meld, discard, maybe knock.
pub fn play_turn<R: Rng + ?Sized>(
    state: &mut DiguGameState,
    bot_id: &str,
    rng: &mut R,
) -> Result<DiguBotTurn, AiError> {
    let idx = state.require_player_index(bot_id)?;
    if state.status != DiguStatus::Playing || state.current_player_index != idx {
        return Err(AiError::NotBotsTurn(bot_id.to_string()));
    }

    let wants_discard = state
        .discard_pile
        .last()
        .is_some_and(|&top| would_help_meld(&state.players[idx].hand, top));
    let drew_from_discard = wants_discard && rng.random_bool(DISCARD_PICKUP_CHANCE);
    draw_card(state, bot_id, drew_from_discard, rng)?;

    let melds = find_best_melds(&state.players[idx].hand);
    let deadwood = deadwood_cards(&state.players[idx].hand, &melds);
    state.players[idx].melds = melds;
    let discarded = worst_card(&state.players[idx].hand, &deadwood)
        .ok_or_else(|| AiError::NoLegalMove(format!("{bot_id} holds no cards")))?;
    discard_card(state, bot_id, discarded)?;

    let player = &mut state.players[idx];
    player.melds = find_best_melds(&player.hand);
    let knock = if can_knock(player) && rng.random_bool(KNOCK_CHANCE) {
        Some(process_knock(state, bot_id)?)
    } else {
        None
    };

    Ok(DiguBotTurn {
        drew_from_discard,
        discarded,
        knock,
    })
}
