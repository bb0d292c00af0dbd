use time::{Duration, OffsetDateTime};

use super::state::{DiguGameState, DiguStatus};
use super::test_helpers::dealt_state;
use super::vote::{cast_vote, initiate_vote, on_vote_deadline, VoteProgress};
use crate::errors::domain::{ConflictKind, DomainError, ValidationKind};

const WINDOW: Duration = Duration::seconds(30);

fn round_end(humans: usize) -> DiguGameState {
    let (mut state, _) = dealt_state(humans, 21);
    state.status = DiguStatus::RoundEnd;
    state
}

fn t0() -> OffsetDateTime {
    OffsetDateTime::UNIX_EPOCH
}

#[test]
fn silent_voter_counts_as_end() {
    let mut state = round_end(4);
    state.players[3].has_dropped = true;
    assert!(matches!(
        initiate_vote(&mut state, t0(), WINDOW).unwrap(),
        VoteProgress::Open { .. }
    ));
    assert!(matches!(
        cast_vote(&mut state, "h0", true).unwrap(),
        VoteProgress::Open { .. }
    ));
    cast_vote(&mut state, "h1", true).unwrap();

    assert_eq!(on_vote_deadline(&mut state, t0() + Duration::seconds(29)), None);
    let outcome = on_vote_deadline(&mut state, t0() + WINDOW).unwrap();
    assert_eq!(outcome.end_votes, 3);
    assert_eq!(outcome.continue_votes, 0);
    assert!(outcome.game_ended);
    assert_eq!(state.status, DiguStatus::Finished);
    assert!(state.winner_id.is_some());
}

#[test]
fn tie_keeps_playing() {
    let mut state = round_end(4);
    initiate_vote(&mut state, t0(), WINDOW).unwrap();
    cast_vote(&mut state, "h0", true).unwrap();
    cast_vote(&mut state, "h1", true).unwrap();
    cast_vote(&mut state, "h2", false).unwrap();
    let VoteProgress::Resolved(outcome) = cast_vote(&mut state, "h3", false).unwrap() else {
        panic!("all humans voted");
    };
    assert!(!outcome.game_ended);
    assert_eq!(state.status, DiguStatus::RoundEnd);
    assert_eq!(state.end_game_vote_deadline, None);
    // Deadline tick after early resolution is a no-op.
    assert_eq!(on_vote_deadline(&mut state, t0() + WINDOW), None);
}

#[test]
fn bots_are_counted_as_end() {
    let mut state = round_end(1);
    initiate_vote(&mut state, t0(), WINDOW).unwrap();
    let VoteProgress::Resolved(outcome) = cast_vote(&mut state, "h0", false).unwrap() else {
        panic!("sole human voted");
    };
    assert_eq!(outcome.end_votes, 3);
    assert!(outcome.game_ended);
}

#[test]
fn second_ballot_is_rejected() {
    let mut state = round_end(2);
    initiate_vote(&mut state, t0(), WINDOW).unwrap();
    cast_vote(&mut state, "h0", true).unwrap();
    assert!(matches!(
        cast_vote(&mut state, "h0", false),
        Err(DomainError::Conflict(ConflictKind::AlreadyVoted, _))
    ));
}

#[test]
fn voting_needs_an_open_ballot() {
    let mut state = round_end(2);
    assert!(matches!(
        cast_vote(&mut state, "h0", true),
        Err(DomainError::Validation(ValidationKind::PhaseMismatch, _))
    ));
    state.status = DiguStatus::Playing;
    assert!(initiate_vote(&mut state, t0(), WINDOW).is_err());
}

#[test]
fn reopening_keeps_the_deadline() {
    let mut state = round_end(2);
    let first = initiate_vote(&mut state, t0(), WINDOW).unwrap();
    let again = initiate_vote(&mut state, t0() + Duration::seconds(10), WINDOW).unwrap();
    assert_eq!(first, again);
}

#[test]
fn dropping_the_last_silent_human_closes_the_ballot() {
    let mut state = round_end(3);
    initiate_vote(&mut state, t0(), WINDOW).unwrap();
    cast_vote(&mut state, "h0", false).unwrap();
    cast_vote(&mut state, "h1", false).unwrap();

    let outcome = super::scoring::handle_drop(&mut state, "h2").unwrap();
    // Two continue against the bot's silent end.
    assert!(!outcome.game_finished);
    assert_eq!(state.end_game_vote_deadline, None);
    assert_eq!(state.status, DiguStatus::RoundEnd);
}
