use super::state::BondiStatus;
use super::test_helpers::playing_state;
use super::tricks::{check_win_condition, process_turn, TrickResolution};
use crate::domain::Card;

fn c(s: &str) -> Card {
    s.parse().unwrap()
}

#[test]
fn emptied_hand_finishes_and_last_player_loses() {
    let mut state = playing_state(&[&["7S", "2H"], &["KS"]]);
    process_turn(&mut state, "p0", c("7S")).unwrap();
    let res = process_turn(&mut state, "p1", c("KS")).unwrap();

    assert_eq!(res.trick_winner.as_deref(), Some("p1"));
    assert_eq!(res.newly_finished, vec!["p1".to_string()]);
    assert!(res.game_finished);
    assert_eq!(state.winners, vec!["p1".to_string(), "p0".to_string()]);
    assert!(state.log.iter().any(|l| l == "P0 is the loser"));
}

#[test]
fn leading_with_last_card_closes_trick_when_one_hand_remains() {
    let mut state = playing_state(&[&["5S"], &["7S", "2H"]]);
    let res = process_turn(&mut state, "p0", c("5S")).unwrap();

    assert_eq!(res.resolution, Some(TrickResolution::Completed));
    assert_eq!(res.trick_winner.as_deref(), Some("p0"));
    assert_eq!(res.newly_finished, vec!["p0".to_string()]);
    assert!(res.game_finished);
    assert_eq!(state.status, BondiStatus::Finished);
    assert_eq!(state.winners, vec!["p0".to_string(), "p1".to_string()]);
    assert!(state.players[0].is_spectator);
    let log = state.log.to_vec();
    assert!(log.contains(&"P0 finished 1st!".to_string()));
    assert!(log.contains(&"P1 is the loser".to_string()));
    assert_eq!(log.last().map(String::as_str), Some("Game Over!"));
    assert_eq!(state.discarded, vec![c("5S")]);
}

#[test]
fn trick_closes_at_active_count_after_leader_empties() {
    let mut state = playing_state(&[&["5S"], &["7S", "2H"], &["9S", "3H"]]);
    let res = process_turn(&mut state, "p0", c("5S")).unwrap();
    assert!(res.resolution.is_none());
    assert_eq!(state.current_player_index, 1);

    let res = process_turn(&mut state, "p1", c("7S")).unwrap();
    assert_eq!(res.resolution, Some(TrickResolution::Completed));
    assert_eq!(res.trick_winner.as_deref(), Some("p1"));
    assert_eq!(res.newly_finished, vec!["p0".to_string()]);
    assert!(state.current_trick.is_empty());
    assert_eq!(state.discarded.len(), 2);
    assert_eq!(state.current_player_index, 1);
    assert_eq!(state.players[2].hand.len(), 2);
}

#[test]
fn winner_who_emptied_passes_lead_on() {
    let mut state = playing_state(&[&["KS"], &["7S", "3H"], &["2S", "4H"]]);
    process_turn(&mut state, "p0", c("KS")).unwrap();
    let res = process_turn(&mut state, "p1", c("7S")).unwrap();

    assert_eq!(res.trick_winner.as_deref(), Some("p0"));
    assert!(!res.game_finished);
    assert!(state.players[0].is_spectator);
    assert_eq!(state.current_player_index, 1);
    assert_eq!(state.status, BondiStatus::Playing);
}

#[test]
fn interrupter_can_finish_on_off_suit_card() {
    let mut state = playing_state(&[&["5H", "2S"], &["KH", "3S"], &["2C"]]);
    process_turn(&mut state, "p0", c("5H")).unwrap();
    process_turn(&mut state, "p1", c("KH")).unwrap();
    let res = process_turn(&mut state, "p2", c("2C")).unwrap();

    assert_eq!(res.newly_finished, vec!["p2".to_string()]);
    assert!(!res.game_finished);
    assert_eq!(state.current_player_index, 1);
    assert_eq!(state.winners, vec!["p2".to_string()]);
}

#[test]
fn placements_are_ordinal() {
    let mut state = playing_state(&[&[], &[], &["2C"], &["3C"]]);
    let finished = check_win_condition(&mut state);
    assert_eq!(finished, vec!["p0".to_string(), "p1".to_string()]);
    assert_eq!(state.status, BondiStatus::Playing);
    let log = state.log.to_vec();
    assert_eq!(log, vec!["P0 finished 1st!", "P1 finished 2nd!"]);
}

#[test]
fn check_is_idempotent_for_existing_winners() {
    let mut state = playing_state(&[&[], &["2C"], &["3C"]]);
    check_win_condition(&mut state);
    let again = check_win_condition(&mut state);
    assert!(again.is_empty());
    assert_eq!(state.winners.len(), 1);
}
