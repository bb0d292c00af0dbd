use super::melds::find_best_melds;
use super::scoring::{can_knock, handle_drop, is_big_digu, process_knock};
use super::state::{DiguGameState, DiguStatus};
use super::test_helpers::playing_state;
use crate::errors::domain::{DomainError, ValidationKind};

/// Fully melded: two runs and a four-card set.
const GIN_HAND: &[&str] = &["2S", "3S", "4S", "5H", "6H", "7H", "9C", "9D", "9H", "9S"];
/// Run of four clubs, set of eights, deadwood 2♦ 3♦ 7♦ = 12.
const DEADWOOD_12: &[&str] = &["4C", "5C", "6C", "7C", "8S", "8H", "8D", "2D", "3D", "7D"];
/// Two sets and a run, deadwood 8♣.
const DEADWOOD_8: &[&str] = &["10S", "10H", "10D", "QH", "QS", "QC", "4D", "5D", "6D", "8C"];
/// Sets of fives and jacks, run 2♠ 3♠ 4♠, deadwood 8♥.
const EVEN_8: &[&str] = &["2S", "3S", "4S", "5C", "5S", "5H", "JS", "JH", "JC", "8H"];
/// Sets of tens and queens, deadwood 2♣ 3♦ 7♥ 8♠ = 20.
const DEADWOOD_20: &[&str] = &["10S", "10H", "10D", "QH", "QS", "QC", "2C", "3D", "7H", "8S"];
/// Nothing melds: 15+15+10+10+10+10+3+2+6+5 = 86.
const DEADWOOD_86: &[&str] = &["AC", "AH", "KC", "KH", "JD", "JC", "3H", "2C", "6S", "5S"];

fn meld_all(state: &mut DiguGameState) {
    for p in &mut state.players {
        p.melds = find_best_melds(&p.hand);
    }
}

fn heads_up(knocker: &'static [&'static str], other: &'static [&'static str]) -> DiguGameState {
    let mut state = playing_state([knocker, other, DEADWOOD_8, DEADWOOD_86]);
    state.players[2].has_dropped = true;
    state.players[3].has_dropped = true;
    meld_all(&mut state);
    state
}

#[test]
fn gin_collects_opponent_deadwood() {
    let mut state = heads_up(GIN_HAND, DEADWOOD_12);
    state.players[0].has_drawn = true;
    assert!(!is_big_digu(&state.players[0]));

    let result = process_knock(&mut state, "p0").unwrap();
    assert_eq!(result.scores["p0"], 37);
    assert_eq!(result.scores["p1"], 0);
    assert_eq!(result.deadwood["p1"], 12);
    assert_eq!(result.winner_id, "p0");
    assert_eq!(result.bonuses["p0"], vec!["Gin! (+25)".to_string()]);
    assert!(!result.scores.contains_key("p2"));

    assert_eq!(state.status, DiguStatus::RoundEnd);
    assert_eq!(state.knocked_player_id.as_deref(), Some("p0"));
    assert!(state.players[0].has_knocked);
    assert_eq!(state.players[0].total_score, 37);
    assert_eq!(state.players[0].round_score, 37);
    assert_eq!(state.last_round.as_ref(), Some(&result));
}

#[test]
fn big_digu_pays_fifty() {
    let mut state = heads_up(GIN_HAND, DEADWOOD_12);
    assert!(is_big_digu(&state.players[0]));
    let result = process_knock(&mut state, "p0").unwrap();
    assert_eq!(result.scores["p0"], 50 + 12);
    assert_eq!(result.bonuses["p0"], vec!["Big Digu! (+50)".to_string()]);
}

#[test]
fn opponent_at_or_below_knocker_undercuts() {
    let mut state = playing_state([DEADWOOD_8, DEADWOOD_12, GIN_HAND, DEADWOOD_86]);
    state.players[3].has_dropped = true;
    meld_all(&mut state);
    let result = process_knock(&mut state, "p0").unwrap();

    // p2 holds zero deadwood: 25 + (8 - 0).
    assert_eq!(result.scores["p2"], 33);
    assert_eq!(result.winner_id, "p2");
    // p1 at 12 does not undercut: knocker takes 12 - 8.
    assert_eq!(result.scores["p0"], 4);
    assert_eq!(result.scores["p1"], 0);
    assert_eq!(result.bonuses["p2"], vec!["Undercut! (+25)".to_string()]);
    assert!(state
        .log
        .iter()
        .any(|l| l == "P2 undercut P0!"));
}

#[test]
fn equal_deadwood_still_undercuts() {
    let mut state = heads_up(DEADWOOD_8, EVEN_8);
    let result = process_knock(&mut state, "p0").unwrap();

    assert_eq!(result.deadwood["p0"], 8);
    assert_eq!(result.deadwood["p1"], 8);
    assert_eq!(result.scores["p1"], 25);
    assert_eq!(result.scores["p0"], 0);
    assert_eq!(result.winner_id, "p1");
}

#[test]
fn knock_needs_low_deadwood() {
    let mut state = playing_state([DEADWOOD_86, DEADWOOD_12, DEADWOOD_8, GIN_HAND]);
    meld_all(&mut state);
    assert!(!can_knock(&state.players[0]));
    let before = state.clone();
    assert!(matches!(
        process_knock(&mut state, "p0"),
        Err(DomainError::Validation(ValidationKind::KnockNotEligible, _))
    ));
    assert_eq!(state, before);
    assert!(!can_knock(&state.players[1]));
    assert!(can_knock(&state.players[2]));
}

#[test]
fn knock_with_eleven_cards_is_rejected() {
    let mut state = heads_up(GIN_HAND, DEADWOOD_12);
    state.players[0].hand.push("KS".parse().unwrap());
    assert!(matches!(
        process_knock(&mut state, "p0"),
        Err(DomainError::Validation(ValidationKind::PhaseMismatch, _))
    ));
}

#[test]
fn reaching_target_finishes_the_game() {
    let mut state = playing_state([GIN_HAND, DEADWOOD_12, DEADWOOD_8, DEADWOOD_86]);
    state.players[0].total_score = 90;
    meld_all(&mut state);
    process_knock(&mut state, "p0").unwrap();
    assert_eq!(state.status, DiguStatus::Finished);
    assert_eq!(state.winner_id.as_deref(), Some("p0"));
}

#[test]
fn drop_penalty_is_split_evenly() {
    let mut state = playing_state([DEADWOOD_86, DEADWOOD_12, DEADWOOD_8, GIN_HAND]);
    meld_all(&mut state);
    let outcome = handle_drop(&mut state, "p0").unwrap();
    assert_eq!(outcome.penalty, 111);
    assert_eq!(outcome.bonus_per_player, 37);
    assert!(!outcome.game_finished);
    assert!(state.players[0].has_dropped);
    assert_eq!(state.current_player_index, 1);
    for p in &state.players[1..] {
        assert_eq!(p.total_score, 37);
    }
    assert_eq!(state.players[0].total_score, 0);
}

#[test]
fn drop_bonus_rounds_down() {
    let mut state = playing_state([DEADWOOD_20, DEADWOOD_12, DEADWOOD_8, GIN_HAND]);
    state.players[3].has_dropped = true;
    meld_all(&mut state);
    let outcome = handle_drop(&mut state, "p0").unwrap();

    assert_eq!(outcome.penalty, 45);
    assert_eq!(outcome.bonus_per_player, 22);
    assert!(!outcome.game_finished);
    assert_eq!(state.players[1].total_score, 22);
    assert_eq!(state.players[2].total_score, 22);
    assert_eq!(state.players[3].total_score, 0);
}

#[test]
fn last_player_standing_wins() {
    let mut state = playing_state([DEADWOOD_86, DEADWOOD_12, DEADWOOD_8, GIN_HAND]);
    handle_drop(&mut state, "p0").unwrap();
    handle_drop(&mut state, "p1").unwrap();
    let outcome = handle_drop(&mut state, "p2").unwrap();
    assert!(outcome.game_finished);
    assert_eq!(state.status, DiguStatus::Finished);
    assert_eq!(state.winner_id.as_deref(), Some("p3"));
    assert!(matches!(
        handle_drop(&mut state, "p3"),
        Err(DomainError::Validation(ValidationKind::PhaseMismatch, _))
    ));
}
