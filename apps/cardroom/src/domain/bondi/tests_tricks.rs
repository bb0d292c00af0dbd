use super::test_helpers::playing_state;
use super::tricks::{is_valid_move, legal_moves, process_turn, validate_move, TrickResolution};
use crate::domain::{Card, Suit};
use crate::errors::domain::{DomainError, ValidationKind};

fn c(s: &str) -> Card {
    s.parse().unwrap()
}

#[test]
fn two_player_trick_goes_to_the_higher_card() {
    let mut state = playing_state(&[&["7S", "2H"], &["KS", "3H"]]);
    process_turn(&mut state, "p0", c("7S")).unwrap();
    assert_eq!(state.leading_suit, Some(Suit::Spades));
    assert_eq!(state.current_player_index, 1);

    let res = process_turn(&mut state, "p1", c("KS")).unwrap();
    assert_eq!(res.resolution, Some(TrickResolution::Completed));
    assert_eq!(res.trick_winner.as_deref(), Some("p1"));
    assert_eq!(state.current_player_index, 1);
    assert_eq!(state.discarded.len(), 2);
    assert!(state.current_trick.is_empty());
    assert_eq!(state.leading_suit, None);
    assert_eq!(state.last_completed_trick.as_ref().map(Vec::len), Some(2));
}

#[test]
fn must_follow_suit_when_holding_it() {
    let mut state = playing_state(&[&["7S", "2H"], &["KS", "3H"]]);
    process_turn(&mut state, "p0", c("7S")).unwrap();

    assert!(!is_valid_move(&state, "p1", c("3H")));
    let before = state.clone();
    let err = process_turn(&mut state, "p1", c("3H")).unwrap_err();
    assert!(matches!(
        err,
        DomainError::Validation(ValidationKind::MustFollowSuit, _)
    ));
    assert_eq!(state, before);
    assert_eq!(legal_moves(&state, "p1"), vec![c("KS")]);
}

#[test]
fn void_player_may_play_anything() {
    let mut state = playing_state(&[&["7S", "2H"], &["3H", "4D"]]);
    process_turn(&mut state, "p0", c("7S")).unwrap();
    assert!(is_valid_move(&state, "p1", c("3H")));
    assert!(is_valid_move(&state, "p1", c("4D")));
}

#[test]
fn rejects_out_of_turn_and_missing_cards() {
    let state = playing_state(&[&["7S", "2H"], &["KS", "3H"]]);
    assert!(matches!(
        validate_move(&state, "p1", c("KS")),
        Err(DomainError::Validation(ValidationKind::OutOfTurn, _))
    ));
    assert!(matches!(
        validate_move(&state, "p0", c("AS")),
        Err(DomainError::Validation(ValidationKind::CardNotInHand, _))
    ));
    assert!(matches!(
        validate_move(&state, "ghost", c("7S")),
        Err(DomainError::NotFound(_, _))
    ));
}

#[test]
fn interrupt_hands_trick_to_current_leader() {
    let mut state = playing_state(&[&["5H", "2S"], &["KH", "3S"], &["2C", "9D", "4S"]]);
    process_turn(&mut state, "p0", c("5H")).unwrap();
    process_turn(&mut state, "p1", c("KH")).unwrap();
    assert_eq!(state.leading_player_id.as_deref(), Some("p1"));

    let res = process_turn(&mut state, "p2", c("2C")).unwrap();
    assert_eq!(res.resolution, Some(TrickResolution::Interrupted));
    assert_eq!(res.trick_winner.as_deref(), Some("p1"));
    // 1 left after playing, plus the 3 trick cards.
    assert_eq!(state.players[1].hand.len(), 4);
    assert!(state.players[1].hand.contains(&c("2C")));
    assert_eq!(state.current_player_index, 1);
    assert!(state.discarded.is_empty());
    assert_eq!(state.leading_player_id, None);
}

#[test]
fn leading_player_tracks_highest_lead_suit_card() {
    let mut state = playing_state(&[&["5H", "2S"], &["KH", "3S"], &["AH", "4S"], &["2H", "5S"]]);
    process_turn(&mut state, "p0", c("5H")).unwrap();
    assert_eq!(state.leading_player_id.as_deref(), Some("p0"));
    process_turn(&mut state, "p1", c("KH")).unwrap();
    process_turn(&mut state, "p2", c("AH")).unwrap();
    process_turn(&mut state, "p3", c("2H")).unwrap();
    assert_eq!(state.current_player_index, 2);
    assert_eq!(state.discarded.len(), 4);
}

#[test]
fn turn_skips_spectators() {
    let mut state = playing_state(&[&["5H", "2S"], &[], &["KH", "3S"]]);
    state.players[1].is_spectator = true;
    process_turn(&mut state, "p0", c("5H")).unwrap();
    assert_eq!(state.current_player_index, 2);
    let res = process_turn(&mut state, "p2", c("KH")).unwrap();
    assert_eq!(res.resolution, Some(TrickResolution::Completed));
}

#[test]
fn last_completed_trick_clears_on_next_lead() {
    let mut state = playing_state(&[&["7S", "2H"], &["KS", "3H"]]);
    process_turn(&mut state, "p0", c("7S")).unwrap();
    process_turn(&mut state, "p1", c("KS")).unwrap();
    assert!(state.last_completed_trick.is_some());
    process_turn(&mut state, "p1", c("3H")).unwrap();
    assert!(state.last_completed_trick.is_none());
}

#[test]
fn play_is_logged() {
    let mut state = playing_state(&[&["7S", "2H"], &["KS", "3H"]]);
    process_turn(&mut state, "p0", c("7S")).unwrap();
    let lines = state.log.to_vec();
    assert_eq!(lines, vec!["P0 played 7♠".to_string(), "Leading suit: Spades".to_string()]);
}
