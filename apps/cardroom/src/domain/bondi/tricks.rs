use super::state::{BondiGameState, BondiStatus, TrickPlay};
use crate::domain::cards_logic::{hand_has_suit, take_card};
use crate::domain::{ordinal, Card, PlayerId, Suit};
use crate::errors::domain::{DomainError, ValidationKind};

/// How a trick ended, if the play closed one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrickResolution {
    /// Off-suit play; the leader picked up every card in the trick.
    Interrupted,
    /// Every seated player followed suit; cards left play.
    Completed,
}

/// Result of playing a card, describing what state changes occurred.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayCardResult {
    pub resolution: Option<TrickResolution>,
    /// Winner of the resolved trick.
    pub trick_winner: Option<PlayerId>,
    /// Players that emptied their hand as a result of this play.
    pub newly_finished: Vec<PlayerId>,
    pub game_finished: bool,
}

/// Legal cards for `player_id` given the open trick, ignoring turn order.
pub fn legal_moves(state: &BondiGameState, player_id: &str) -> Vec<Card> {
    if state.status != BondiStatus::Playing {
        return Vec::new();
    }
    let Some(player) = state.players.iter().find(|p| p.id == player_id) else {
        return Vec::new();
    };

    if let Some(lead) = state.leading_suit {
        if hand_has_suit(&player.hand, lead) {
            let mut v: Vec<Card> = player.hand.iter().copied().filter(|c| c.suit == lead).collect();
            v.sort();
            return v;
        }
    }

    let mut any = player.hand.clone();
    any.sort();
    any
}

/// Check turn, ownership and suit-following for a proposed play.
pub fn validate_move(
    state: &BondiGameState,
    player_id: &str,
    card: Card,
) -> Result<(), DomainError> {
    if state.status != BondiStatus::Playing {
        return Err(DomainError::validation(
            ValidationKind::PhaseMismatch,
            "Game is not in progress",
        ));
    }
    let idx = state.require_player_index(player_id)?;
    if idx != state.current_player_index {
        return Err(DomainError::validation(
            ValidationKind::OutOfTurn,
            "Out of turn",
        ));
    }
    let hand = &state.players[idx].hand;
    if !hand.contains(&card) {
        return Err(DomainError::validation(
            ValidationKind::CardNotInHand,
            "Card not in hand",
        ));
    }
    if let Some(lead) = state.leading_suit {
        if card.suit != lead && hand_has_suit(hand, lead) {
            return Err(DomainError::validation(
                ValidationKind::MustFollowSuit,
                "Must follow suit",
            ));
        }
    }
    Ok(())
}

pub fn is_valid_move(state: &BondiGameState, player_id: &str, card: Card) -> bool {
    validate_move(state, player_id, card).is_ok()
}

/// Holder of the highest card of `lead` in `trick`.
fn highest_of_suit(trick: &[TrickPlay], lead: Suit) -> Option<&TrickPlay> {
    trick
        .iter()
        .filter(|t| t.card.suit == lead)
        .max_by_key(|t| t.card.rank)
}

/// Next seat after `from` that is still in turn order.
pub fn next_active_index(state: &BondiGameState, from: usize) -> Option<usize> {
    let n = state.players.len();
    (1..=n)
        .map(|step| (from + step) % n)
        .find(|&i| state.players[i].is_active())
}

/// Apply one play. Validation runs first; on error the state is untouched.
pub fn process_turn(
    state: &mut BondiGameState,
    player_id: &str,
    card: Card,
) -> Result<PlayCardResult, DomainError> {
    validate_move(state, player_id, card)?;
    let idx = state.current_player_index;

    if state.current_trick.is_empty() {
        state.last_completed_trick = None;
    }

    let player = &mut state.players[idx];
    let Some(played) = take_card(&mut player.hand, card) else {
        return Err(DomainError::validation(
            ValidationKind::CardNotInHand,
            "Card not in hand",
        ));
    };
    let name = player.name.clone();
    state.current_trick.push(TrickPlay {
        player_id: player_id.to_string(),
        card: played,
    });
    state.push_log(format!("{name} played {played}"));

    let lead = match state.leading_suit {
        Some(lead) => lead,
        None => {
            state.leading_suit = Some(played.suit);
            state.push_log(format!("Leading suit: {}", played.suit.name()));
            played.suit
        }
    };

    if played.suit != lead {
        state.push_log(format!("Suit interrupted! {name} played off-suit"));
        return resolve_interrupted(state);
    }

    state.leading_player_id = highest_of_suit(&state.current_trick, lead).map(|t| t.player_id.clone());

    // Seats that emptied their hand this trick no longer count toward it.
    if state.current_trick.len() >= state.active_count() {
        return resolve_completed(state);
    }

    let Some(next) = next_active_index(state, idx) else {
        // Nobody left to follow; close the trick with what was played.
        return resolve_completed(state);
    };
    state.current_player_index = next;
    Ok(PlayCardResult {
        resolution: None,
        trick_winner: None,
        newly_finished: Vec::new(),
        game_finished: false,
    })
}

fn trick_winner(state: &BondiGameState) -> Result<(usize, PlayerId), DomainError> {
    let lead = state
        .leading_suit
        .ok_or_else(|| DomainError::invariant("Invariant violated: trick without leading suit"))?;
    let winner_id = highest_of_suit(&state.current_trick, lead)
        .map(|t| t.player_id.clone())
        .ok_or_else(|| DomainError::invariant("Invariant violated: trick has no lead-suit card"))?;
    let winner_idx = state.require_player_index(&winner_id)?;
    Ok((winner_idx, winner_id))
}

fn close_trick(state: &mut BondiGameState) -> Vec<TrickPlay> {
    let trick = std::mem::take(&mut state.current_trick);
    state.last_completed_trick = Some(trick.clone());
    state.leading_suit = None;
    state.leading_player_id = None;
    trick
}

fn resolve_interrupted(state: &mut BondiGameState) -> Result<PlayCardResult, DomainError> {
    let (winner_idx, winner_id) = trick_winner(state)?;
    let trick = close_trick(state);
    let count = trick.len();
    state.players[winner_idx]
        .hand
        .extend(trick.into_iter().map(|t| t.card));
    let winner_name = state.players[winner_idx].name.clone();
    state.push_log(format!("{winner_name} won trick (+{count} cards)"));

    state.current_player_index = winner_idx;
    let newly_finished = check_win_condition(state);
    Ok(PlayCardResult {
        resolution: Some(TrickResolution::Interrupted),
        trick_winner: Some(winner_id),
        newly_finished,
        game_finished: state.status == BondiStatus::Finished,
    })
}

fn resolve_completed(state: &mut BondiGameState) -> Result<PlayCardResult, DomainError> {
    let (winner_idx, winner_id) = trick_winner(state)?;
    let trick = close_trick(state);
    state.discarded.extend(trick.into_iter().map(|t| t.card));
    let winner_name = state.players[winner_idx].name.clone();
    state.push_log(format!("{winner_name} won trick (cards discarded)"));

    let newly_finished = check_win_condition(state);
    let game_finished = state.status == BondiStatus::Finished;
    if !game_finished {
        state.current_player_index = if state.players[winner_idx].is_active() {
            winner_idx
        } else {
            next_active_index(state, winner_idx).ok_or_else(|| {
                DomainError::invariant("Invariant violated: no active seat after trick")
            })?
        };
    }
    Ok(PlayCardResult {
        resolution: Some(TrickResolution::Completed),
        trick_winner: Some(winner_id),
        newly_finished,
        game_finished,
    })
}

/// Move empty-handed players into the winners list and end the game once
/// at most one player still holds cards. Returns the newly finished ids.
pub fn check_win_condition(state: &mut BondiGameState) -> Vec<PlayerId> {
    let mut newly_finished = Vec::new();
    for i in 0..state.players.len() {
        let p = &state.players[i];
        if p.is_spectator || !p.hand.is_empty() || state.winners.contains(&p.id) {
            continue;
        }
        let id = p.id.clone();
        let name = p.name.clone();
        state.players[i].is_spectator = true;
        state.winners.push(id.clone());
        let place = ordinal(state.winners.len());
        state.push_log(format!("{name} finished {place}!"));
        newly_finished.push(id);
    }

    let remaining: Vec<usize> = (0..state.players.len())
        .filter(|&i| !state.players[i].is_spectator)
        .collect();
    if remaining.len() <= 1 {
        if let Some(&last) = remaining.first() {
            let loser = &state.players[last];
            let (id, name) = (loser.id.clone(), loser.name.clone());
            state.winners.push(id);
            state.push_log(format!("{name} is the loser"));
        }
        state.status = BondiStatus::Finished;
        state.push_log("Game Over!");
    }
    newly_finished
}
