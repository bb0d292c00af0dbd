//! Lobby and per-round turn flow for Digu.

use std::collections::HashSet;

use rand::Rng;
use time::OffsetDateTime;

use super::melds::validate_meld;
use super::state::{DiguGameState, DiguPlayer, DiguStatus, Meld};
use super::DIGU_SEATS;
use crate::domain::cards_logic::{hand_contains, take_card};
use crate::domain::dealing::{deal_digu, shuffle, shuffled_deck, DIGU_HAND_SIZE};
use crate::domain::{bot_name, next_bot_id, Card};
use crate::errors::domain::{ConflictKind, DomainError, ValidationKind};

fn require_status(
    state: &DiguGameState,
    status: DiguStatus,
    detail: &'static str,
) -> Result<(), DomainError> {
    if state.status != status {
        let kind = if status == DiguStatus::Waiting {
            ValidationKind::NotWaiting
        } else {
            ValidationKind::PhaseMismatch
        };
        return Err(DomainError::validation(kind, detail));
    }
    Ok(())
}

/// Seat index of `player_id` if it currently holds the turn.
fn require_turn(state: &DiguGameState, player_id: &str) -> Result<usize, DomainError> {
    let idx = state.require_active_index(player_id)?;
    if idx != state.current_player_index {
        return Err(DomainError::validation(
            ValidationKind::OutOfTurn,
            "Out of turn",
        ));
    }
    Ok(idx)
}

pub fn join(state: &mut DiguGameState, player: DiguPlayer) -> Result<(), DomainError> {
    require_status(state, DiguStatus::Waiting, "Game is not waiting for players")?;
    if state.player_index(&player.id).is_some() {
        return Ok(());
    }
    if state.players.len() >= DIGU_SEATS {
        return Err(DomainError::conflict(
            ConflictKind::RoomFull,
            format!("Room is full ({DIGU_SEATS} players)"),
        ));
    }
    state.push_log(format!("{} joined", player.name));
    state.players.push(player);
    Ok(())
}

/// Fill empty seats with bots, then deal round one.
pub fn start_game<R: Rng + ?Sized>(
    state: &mut DiguGameState,
    rng: &mut R,
    now: OffsetDateTime,
) -> Result<(), DomainError> {
    require_status(state, DiguStatus::Waiting, "Game is not waiting for players")?;
    if state.players.is_empty() {
        return Err(DomainError::validation(
            ValidationKind::NotEnoughPlayers,
            "Need at least one player",
        ));
    }
    let humans = state.players.iter().filter(|p| !p.is_bot).count();
    let needed = DIGU_SEATS.saturating_sub(state.players.len());
    for i in 0..needed {
        let id = next_bot_id(state.players.iter().map(|p| p.id.as_str()));
        state.players.push(DiguPlayer::bot(id, bot_name(humans + i)));
    }
    if needed > 0 {
        state.push_log(format!("{needed} bot(s) joined the game"));
    }
    state.started_at = Some(now);
    state.current_round = 1;
    deal_round(state, rng)
}

/// Deal the next round after a round end.
pub fn start_new_round<R: Rng + ?Sized>(
    state: &mut DiguGameState,
    rng: &mut R,
) -> Result<(), DomainError> {
    require_status(state, DiguStatus::RoundEnd, "Round has not ended")?;
    state.current_round += 1;
    deal_round(state, rng)
}

fn deal_round<R: Rng + ?Sized>(state: &mut DiguGameState, rng: &mut R) -> Result<(), DomainError> {
    let deal = deal_digu(state.players.len(), shuffled_deck(rng))?;
    for (p, hand) in state.players.iter_mut().zip(deal.hands) {
        p.hand = hand;
        p.melds.clear();
        p.has_knocked = false;
        p.has_drawn = false;
        p.round_score = 0;
    }
    state.deck = deal.draw_pile;
    state.discard_pile = vec![deal.discard_seed];
    state.knocked_player_id = None;
    state.last_round = None;
    state.end_game_votes.clear();
    state.end_game_vote_deadline = None;
    state.status = DiguStatus::Playing;

    let opener = (state.current_round.saturating_sub(1) as usize) % state.players.len();
    state.current_player_index = if state.players[opener].has_dropped {
        state.next_active_index(opener).ok_or_else(|| {
            DomainError::validation(ValidationKind::NotEnoughPlayers, "Everyone has dropped")
        })?
    } else {
        opener
    };
    state.push_log(format!(
        "Round {} started! Each player dealt {DIGU_HAND_SIZE} cards.",
        state.current_round
    ));
    Ok(())
}

/// Draw the top card of the deck or the discard pile. Only the current player,
/// only at the start of their turn. An empty deck is rebuilt from the discard
/// pile, leaving its top card in place.
pub fn draw_card<R: Rng + ?Sized>(
    state: &mut DiguGameState,
    player_id: &str,
    from_discard: bool,
    rng: &mut R,
) -> Result<Card, DomainError> {
    require_status(state, DiguStatus::Playing, "Round is not in progress")?;
    let idx = require_turn(state, player_id)?;
    if state.players[idx].hand.len() != DIGU_HAND_SIZE {
        return Err(DomainError::validation(
            ValidationKind::PhaseMismatch,
            "Already drew this turn",
        ));
    }

    let card = if from_discard {
        state.discard_pile.pop().ok_or_else(|| {
            DomainError::validation(ValidationKind::NothingToDraw, "Discard pile is empty")
        })?
    } else {
        if state.deck.is_empty() {
            reshuffle_discards(state, rng)?;
        }
        state.deck.pop().ok_or_else(|| {
            DomainError::validation(ValidationKind::NothingToDraw, "No cards left to draw")
        })?
    };

    let name = state.players[idx].name.clone();
    state.players[idx].hand.push(card);
    state.players[idx].has_drawn = true;
    let source = if from_discard { "discard pile" } else { "deck" };
    state.push_log(format!("{name} drew from {source}"));
    Ok(card)
}

fn reshuffle_discards<R: Rng + ?Sized>(
    state: &mut DiguGameState,
    rng: &mut R,
) -> Result<(), DomainError> {
    if state.discard_pile.len() <= 1 {
        return Err(DomainError::validation(
            ValidationKind::NothingToDraw,
            "Deck and discard pile are empty",
        ));
    }
    let top = state.discard_pile.pop();
    let mut fresh = std::mem::take(&mut state.discard_pile);
    shuffle(&mut fresh, rng);
    state.deck = fresh;
    state.discard_pile.extend(top);
    state.push_log("Deck reshuffled from discard pile");
    Ok(())
}

/// Discard to end the turn. Melds that used the card are dropped.
pub fn discard_card(
    state: &mut DiguGameState,
    player_id: &str,
    card: Card,
) -> Result<(), DomainError> {
    require_status(state, DiguStatus::Playing, "Round is not in progress")?;
    let idx = require_turn(state, player_id)?;
    let player = &mut state.players[idx];
    if player.hand.len() != DIGU_HAND_SIZE + 1 {
        return Err(DomainError::validation(
            ValidationKind::PhaseMismatch,
            "Draw before discarding",
        ));
    }
    let Some(card) = take_card(&mut player.hand, card) else {
        return Err(DomainError::validation(
            ValidationKind::CardNotInHand,
            "Card not in hand",
        ));
    };
    player.melds.retain(|m| !m.cards.contains(&card));
    let name = player.name.clone();
    state.discard_pile.push(card);
    state.push_log(format!("{name} discarded {card}"));

    state.current_player_index = state.next_active_index(idx).ok_or_else(|| {
        DomainError::invariant("Invariant violated: no active seat to pass the turn to")
    })?;
    Ok(())
}

/// Replace the player's declared melds. The whole declaration is rejected if
/// any meld is invalid, uses a card not in hand, or overlaps another.
pub fn declare_melds(
    state: &mut DiguGameState,
    player_id: &str,
    proposed: Vec<Vec<Card>>,
) -> Result<Vec<Meld>, DomainError> {
    require_status(state, DiguStatus::Playing, "Round is not in progress")?;
    let idx = state.require_active_index(player_id)?;
    let hand = &state.players[idx].hand;

    let mut seen: HashSet<Card> = HashSet::new();
    let mut melds = Vec::with_capacity(proposed.len());
    for cards in proposed {
        let kind = match validate_meld(&cards) {
            super::MeldValidation::Valid(kind) => kind,
            super::MeldValidation::Invalid(reason) => {
                return Err(DomainError::validation(ValidationKind::InvalidMeld, reason));
            }
        };
        for &card in &cards {
            if !hand_contains(hand, card) {
                return Err(DomainError::validation(
                    ValidationKind::InvalidMeld,
                    format!("{card} is not in hand"),
                ));
            }
            if !seen.insert(card) {
                return Err(DomainError::validation(
                    ValidationKind::InvalidMeld,
                    format!("{card} is used in more than one meld"),
                ));
            }
        }
        melds.push(Meld { kind, cards });
    }

    let name = state.players[idx].name.clone();
    state.push_log(format!("{name} declared {} meld(s)", melds.len()));
    state.players[idx].melds = melds.clone();
    Ok(melds)
}
