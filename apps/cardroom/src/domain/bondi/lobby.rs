//! Room lifecycle for Bondi: seating, dealing, rematch.

use rand::Rng;
use time::OffsetDateTime;

use super::state::{BondiGameState, BondiPlayer, BondiStatus};
use super::BONDI_MIN_PLAYERS;
use crate::domain::dealing::{deal_round_robin, shuffled_deck};
use crate::domain::{bot_name, next_bot_id, Card, Rank, Suit};
use crate::errors::domain::{ConflictKind, DomainError, ValidationKind};

/// Holder of this card leads the first trick.
pub const OPENING_CARD: Card = Card::new(Rank::Ace, Suit::Spades);

fn require_waiting(state: &BondiGameState) -> Result<(), DomainError> {
    if state.status != BondiStatus::Waiting {
        return Err(DomainError::validation(
            ValidationKind::NotWaiting,
            "Game is not waiting for players",
        ));
    }
    Ok(())
}

fn require_seat(state: &BondiGameState) -> Result<(), DomainError> {
    if state.seated_count() >= state.max_players {
        return Err(DomainError::conflict(
            ConflictKind::RoomFull,
            format!("Room is full ({} players)", state.max_players),
        ));
    }
    Ok(())
}

pub fn join(state: &mut BondiGameState, player: BondiPlayer) -> Result<(), DomainError> {
    require_waiting(state)?;
    if state.player_index(&player.id).is_some() {
        return Ok(());
    }
    require_seat(state)?;
    state.push_log(format!("{} joined", player.name));
    state.players.push(player);
    Ok(())
}

/// Observers may join at any status and never receive cards.
pub fn join_as_spectator(state: &mut BondiGameState, mut player: BondiPlayer) {
    if state.player_index(&player.id).is_some() {
        return;
    }
    player.is_spectator = true;
    player.hand.clear();
    state.push_log(format!("{} is watching", player.name));
    state.players.push(player);
}

/// Seat a bot; returns its id.
pub fn add_bot(state: &mut BondiGameState) -> Result<String, DomainError> {
    require_waiting(state)?;
    require_seat(state)?;
    let bots = state.players.iter().filter(|p| p.is_bot).count();
    let id = next_bot_id(state.players.iter().map(|p| p.id.as_str()));
    let bot = BondiPlayer::bot(id.clone(), bot_name(bots));
    state.push_log(format!("{} joined", bot.name));
    state.players.push(bot);
    Ok(id)
}

/// Deal the whole deck to seated players and hand the lead to the A♠ holder.
pub fn start<R: Rng + ?Sized>(
    state: &mut BondiGameState,
    rng: &mut R,
    now: OffsetDateTime,
) -> Result<(), DomainError> {
    require_waiting(state)?;
    let seated: Vec<usize> = (0..state.players.len())
        .filter(|&i| !state.players[i].is_spectator)
        .collect();
    if seated.len() < BONDI_MIN_PLAYERS {
        return Err(DomainError::validation(
            ValidationKind::NotEnoughPlayers,
            format!("Need at least {BONDI_MIN_PLAYERS} players"),
        ));
    }

    let hands = deal_round_robin(seated.len(), shuffled_deck(rng))?;
    for (&seat, hand) in seated.iter().zip(hands) {
        state.players[seat].hand = hand;
    }

    state.current_trick.clear();
    state.leading_suit = None;
    state.leading_player_id = None;
    state.last_completed_trick = None;
    state.winners.clear();
    state.discarded.clear();
    state.log.clear();
    state.status = BondiStatus::Playing;
    state.started_at = Some(now);
    state.push_log(format!("Game started with {} players", seated.len()));

    let opener = seated
        .iter()
        .copied()
        .find(|&i| state.players[i].hand.contains(&OPENING_CARD))
        .unwrap_or(seated[0]);
    state.current_player_index = opener;
    let name = state.players[opener].name.clone();
    state.push_log(format!("{name} starts (has {OPENING_CARD})"));
    Ok(())
}

/// Reset a finished room to the lobby. Seats fill in join order up to the
/// cap; anyone past it keeps watching.
pub fn rematch(state: &mut BondiGameState) -> Result<(), DomainError> {
    if state.status != BondiStatus::Finished {
        return Err(DomainError::validation(
            ValidationKind::PhaseMismatch,
            "Rematch is only available after the game ends",
        ));
    }
    state.status = BondiStatus::Waiting;
    state.current_player_index = 0;
    state.current_trick.clear();
    state.leading_suit = None;
    state.leading_player_id = None;
    state.last_completed_trick = None;
    state.winners.clear();
    state.discarded.clear();
    state.started_at = None;
    let cap = state.max_players;
    let mut seated = 0;
    for p in &mut state.players {
        p.hand.clear();
        p.is_spectator = seated >= cap;
        if !p.is_spectator {
            seated += 1;
        }
    }
    state.log.clear();
    state.push_log("Rematch! Waiting for players...");
    Ok(())
}
