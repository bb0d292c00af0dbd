//! End-of-round ballot on whether to stop the game. Time is passed in by the
//! caller; the session layer owns the actual timer.

use time::{Duration, OffsetDateTime};

use super::scoring::finish_game;
use super::state::{DiguGameState, DiguStatus};
use crate::errors::domain::{ConflictKind, DomainError, ValidationKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoteOutcome {
    pub end_votes: usize,
    pub continue_votes: usize,
    pub game_ended: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteProgress {
    /// Ballot open until the deadline.
    Open { deadline: OffsetDateTime },
    Resolved(VoteOutcome),
}

pub fn vote_open(state: &DiguGameState) -> bool {
    state.status == DiguStatus::RoundEnd && state.end_game_vote_deadline.is_some()
}

/// Every non-dropped human has cast a ballot. Bots never vote; they are left
/// off the ballot and tallied as "end" when it resolves.
pub fn all_humans_voted(state: &DiguGameState) -> bool {
    state
        .active_players()
        .filter(|p| !p.is_bot)
        .all(|p| state.end_game_votes.contains_key(&p.id))
}

/// Open the ballot. Re-opening an open ballot keeps its deadline. If no human
/// can vote the ballot resolves immediately.
pub fn initiate_vote(
    state: &mut DiguGameState,
    now: OffsetDateTime,
    window: Duration,
) -> Result<VoteProgress, DomainError> {
    if state.status != DiguStatus::RoundEnd {
        return Err(DomainError::validation(
            ValidationKind::PhaseMismatch,
            "Votes are only held between rounds",
        ));
    }
    if let Some(deadline) = state.end_game_vote_deadline {
        return Ok(VoteProgress::Open { deadline });
    }
    state.end_game_votes.clear();
    let deadline = now + window;
    state.end_game_vote_deadline = Some(deadline);
    state.push_log(format!(
        "Vote to end the game started ({}s)",
        window.whole_seconds()
    ));
    if all_humans_voted(state) {
        return Ok(VoteProgress::Resolved(resolve_vote(state)));
    }
    Ok(VoteProgress::Open { deadline })
}

pub fn cast_vote(
    state: &mut DiguGameState,
    player_id: &str,
    end_game: bool,
) -> Result<VoteProgress, DomainError> {
    let Some(deadline) = state.end_game_vote_deadline.filter(|_| vote_open(state)) else {
        return Err(DomainError::validation(
            ValidationKind::PhaseMismatch,
            "No vote in progress",
        ));
    };
    let idx = state.require_active_index(player_id)?;
    if state.end_game_votes.contains_key(player_id) {
        return Err(DomainError::conflict(
            ConflictKind::AlreadyVoted,
            "Vote already recorded",
        ));
    }
    state.end_game_votes.insert(player_id.to_string(), end_game);
    let name = state.players[idx].name.clone();
    let choice = if end_game { "end" } else { "continue" };
    state.push_log(format!("{name} voted to {choice}"));

    if all_humans_voted(state) {
        return Ok(VoteProgress::Resolved(resolve_vote(state)));
    }
    Ok(VoteProgress::Open { deadline })
}

/// Deadline tick. Returns `None` when the ballot already closed or the
/// deadline has not passed yet.
pub fn on_vote_deadline(state: &mut DiguGameState, now: OffsetDateTime) -> Option<VoteOutcome> {
    let deadline = state.end_game_vote_deadline?;
    if !vote_open(state) || now < deadline {
        return None;
    }
    Some(resolve_vote(state))
}

/// Tally the ballot. Non-voters count as "end"; "end" needs a strict majority.
pub fn resolve_vote(state: &mut DiguGameState) -> VoteOutcome {
    let (mut end_votes, mut continue_votes) = (0, 0);
    for p in state.active_players() {
        match state.end_game_votes.get(&p.id).copied().unwrap_or(true) {
            true => end_votes += 1,
            false => continue_votes += 1,
        }
    }
    state.end_game_vote_deadline = None;
    state.end_game_votes.clear();
    state.push_log(format!(
        "Vote result: {end_votes} end, {continue_votes} continue"
    ));

    let game_ended = end_votes > continue_votes;
    if game_ended {
        finish_game(state);
    }
    VoteOutcome {
        end_votes,
        continue_votes,
        game_ended,
    }
}
