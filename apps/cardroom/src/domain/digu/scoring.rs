use std::collections::BTreeMap;

use super::melds::calculate_deadwood;
use super::state::{DiguGameState, DiguPlayer, DiguStatus, RoundResult};
use super::vote;
use super::{BIG_DIGU_BONUS, DROP_PENALTY, GIN_BONUS, KNOCK_THRESHOLD, UNDERCUT_BONUS};
use crate::domain::dealing::DIGU_HAND_SIZE;
use crate::domain::PlayerId;
use crate::errors::domain::{DomainError, ValidationKind};

pub fn player_deadwood(player: &DiguPlayer) -> u32 {
    calculate_deadwood(&player.hand, &player.melds)
}

pub fn can_knock(player: &DiguPlayer) -> bool {
    player_deadwood(player) <= KNOCK_THRESHOLD
}

/// All ten dealt cards covered by declared melds, before any draw.
pub fn is_big_digu(player: &DiguPlayer) -> bool {
    !player.has_drawn
        && player.melds.iter().map(|m| m.cards.len()).sum::<usize>() == DIGU_HAND_SIZE
}

/// Non-dropped player with the highest total; ties go to the earlier seat.
pub fn leader_by_total(state: &DiguGameState) -> Option<PlayerId> {
    let mut best: Option<&DiguPlayer> = None;
    for p in state.active_players() {
        if best.is_none_or(|b| p.total_score > b.total_score) {
            best = Some(p);
        }
    }
    best.map(|p| p.id.clone())
}

/// End the game with the current points leader as winner.
pub(crate) fn finish_game(state: &mut DiguGameState) {
    state.status = DiguStatus::Finished;
    state.end_game_vote_deadline = None;
    state.winner_id = leader_by_total(state);
    if let Some(name) = state
        .winner_id
        .as_deref()
        .and_then(|id| state.players.iter().find(|p| p.id == id))
        .map(|p| p.name.clone())
    {
        state.push_log(format!("{name} wins the game!"));
    }
}

/// Score a knock and close the round.
pub fn process_knock(
    state: &mut DiguGameState,
    player_id: &str,
) -> Result<RoundResult, DomainError> {
    if state.status != DiguStatus::Playing {
        return Err(DomainError::validation(
            ValidationKind::PhaseMismatch,
            "Round is not in progress",
        ));
    }
    let knocker_idx = state.require_active_index(player_id)?;
    let knocker = &state.players[knocker_idx];
    if knocker.hand.len() != DIGU_HAND_SIZE {
        return Err(DomainError::validation(
            ValidationKind::PhaseMismatch,
            "Knock with ten cards, before drawing or after discarding",
        ));
    }
    if !can_knock(knocker) {
        return Err(DomainError::validation(
            ValidationKind::KnockNotEligible,
            format!(
                "Deadwood {} is above {KNOCK_THRESHOLD}",
                player_deadwood(knocker)
            ),
        ));
    }

    let knocker_id = knocker.id.clone();
    let knocker_name = knocker.name.clone();
    let knocker_deadwood = player_deadwood(knocker);
    let big_digu = is_big_digu(knocker);
    let gin = knocker_deadwood == 0;

    let mut scores: BTreeMap<PlayerId, u32> = BTreeMap::new();
    let mut deadwood: BTreeMap<PlayerId, u32> = BTreeMap::new();
    let mut melds = BTreeMap::new();
    let mut bonuses: BTreeMap<PlayerId, Vec<String>> = BTreeMap::new();
    let mut lines = vec![format!("{knocker_name} knocked!")];

    let mut knocker_score = 0;
    let mut knocker_bonuses = Vec::new();
    if big_digu {
        knocker_score = BIG_DIGU_BONUS;
        knocker_bonuses.push(format!("Big Digu! (+{BIG_DIGU_BONUS})"));
        lines.push(format!("{knocker_name} has BIG DIGU! (+{BIG_DIGU_BONUS} bonus)"));
    } else if gin {
        knocker_score = GIN_BONUS;
        knocker_bonuses.push(format!("Gin! (+{GIN_BONUS})"));
        lines.push(format!("{knocker_name} has Gin! (+{GIN_BONUS} bonus)"));
    }

    // (score, seat) of the best undercut so far.
    let mut best_undercut: Option<(u32, usize)> = None;
    for (seat, p) in state.players.iter().enumerate() {
        if seat == knocker_idx || p.has_dropped {
            continue;
        }
        let dw = player_deadwood(p);
        deadwood.insert(p.id.clone(), dw);
        melds.insert(p.id.clone(), p.melds.clone());
        let mut own_bonuses = Vec::new();
        let mut score = 0;

        if big_digu || gin {
            knocker_score += dw;
        } else if dw <= knocker_deadwood {
            score = UNDERCUT_BONUS + (knocker_deadwood - dw);
            own_bonuses.push(format!("Undercut! (+{UNDERCUT_BONUS})"));
            lines.push(format!("{} undercut {knocker_name}!", p.name));
            if best_undercut.is_none_or(|(s, _)| score > s) {
                best_undercut = Some((score, seat));
            }
        } else {
            knocker_score += dw - knocker_deadwood;
        }
        scores.insert(p.id.clone(), score);
        bonuses.insert(p.id.clone(), own_bonuses);
    }
    scores.insert(knocker_id.clone(), knocker_score);
    deadwood.insert(knocker_id.clone(), knocker_deadwood);
    melds.insert(knocker_id.clone(), state.players[knocker_idx].melds.clone());
    bonuses.insert(knocker_id.clone(), knocker_bonuses);

    let winner_id = match best_undercut {
        Some((_, seat)) => state.players[seat].id.clone(),
        None => knocker_id.clone(),
    };

    for p in &mut state.players {
        p.round_score = scores.get(&p.id).copied().unwrap_or(0);
        p.total_score += p.round_score;
    }
    state.players[knocker_idx].has_knocked = true;
    state.knocked_player_id = Some(knocker_id);
    for line in lines {
        state.push_log(line);
    }
    let winner_name = state
        .players
        .iter()
        .find(|p| p.id == winner_id)
        .map(|p| p.name.clone())
        .unwrap_or_default();
    state.push_log(format!("{winner_name} wins round {}", state.current_round));

    let result = RoundResult {
        winner_id,
        scores,
        deadwood,
        melds,
        bonuses,
    };
    state.last_round = Some(result.clone());
    state.rounds_played += 1;
    state.status = DiguStatus::RoundEnd;

    if state
        .active_players()
        .any(|p| p.total_score >= state.target_score)
    {
        finish_game(state);
    }
    Ok(result)
}

/// What a drop did to the room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropOutcome {
    pub penalty: u32,
    pub bonus_per_player: u32,
    pub game_finished: bool,
}

/// Drop a player out of the game. The penalty is paid out evenly (rounded
/// down) to everyone still in.
pub fn handle_drop(state: &mut DiguGameState, player_id: &str) -> Result<DropOutcome, DomainError> {
    if !matches!(state.status, DiguStatus::Playing | DiguStatus::RoundEnd) {
        return Err(DomainError::validation(
            ValidationKind::PhaseMismatch,
            "Dropping is only possible during a game",
        ));
    }
    let idx = state.require_active_index(player_id)?;
    let penalty = DROP_PENALTY + player_deadwood(&state.players[idx]);
    state.players[idx].has_dropped = true;
    state.end_game_votes.remove(player_id);
    let name = state.players[idx].name.clone();
    state.push_log(format!("{name} dropped! (-{penalty} points)"));

    let remaining: Vec<usize> = (0..state.players.len())
        .filter(|&i| !state.players[i].has_dropped)
        .collect();
    let bonus_per_player = if remaining.is_empty() {
        0
    } else {
        penalty / remaining.len() as u32
    };
    for &i in &remaining {
        state.players[i].total_score += bonus_per_player;
    }

    if remaining.len() <= 1 {
        finish_game(state);
        return Ok(DropOutcome {
            penalty,
            bonus_per_player,
            game_finished: true,
        });
    }

    if state.status == DiguStatus::Playing && state.current_player_index == idx {
        if let Some(next) = state.next_active_index(idx) {
            state.current_player_index = next;
        }
    }
    // The dropper may have been the last human the ballot was waiting on.
    let game_finished = vote::vote_open(state)
        && vote::all_humans_voted(state)
        && vote::resolve_vote(state).game_ended;
    Ok(DropOutcome {
        penalty,
        bonus_per_player,
        game_finished,
    })
}
