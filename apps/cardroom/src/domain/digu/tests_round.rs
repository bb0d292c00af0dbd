use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use super::round::{declare_melds, discard_card, draw_card, join, start_new_round};
use super::state::{DiguGameState, DiguPlayer, DiguStatus};
use super::test_helpers::{cards, dealt_state, playing_state};
use crate::domain::dealing::DIGU_HAND_SIZE;
use crate::errors::domain::{ConflictKind, DomainError, ValidationKind};

#[test]
fn start_fills_bots_and_deals() {
    let (state, _) = dealt_state(2, 11);
    assert_eq!(state.players.len(), 4);
    assert_eq!(state.players.iter().filter(|p| p.is_bot).count(), 2);
    assert_eq!(state.players[2].name, "Bot Hana");
    assert!(state.players.iter().all(|p| p.hand.len() == DIGU_HAND_SIZE));
    assert_eq!(state.discard_pile.len(), 1);
    assert_eq!(state.deck.len(), 52 - 41);
    assert_eq!(state.status, DiguStatus::Playing);
    assert_eq!(state.current_round, 1);
    assert_eq!(state.current_player_index, 0);
    state.verify().unwrap();
}

#[test]
fn fifth_player_cannot_join() {
    let mut state = DiguGameState::new("ROOM01", DiguPlayer::new("h0", "H0"));
    for i in 1..4 {
        join(&mut state, DiguPlayer::new(format!("h{i}"), "x")).unwrap();
    }
    assert!(matches!(
        join(&mut state, DiguPlayer::new("h4", "x")),
        Err(DomainError::Conflict(ConflictKind::RoomFull, _))
    ));
}

#[test]
fn draw_then_discard_passes_the_turn() {
    let (mut state, mut rng) = dealt_state(1, 5);
    let top = *state.discard_pile.last().unwrap();
    let drawn = draw_card(&mut state, "h0", true, &mut rng).unwrap();
    assert_eq!(drawn, top);
    assert!(state.discard_pile.is_empty());
    assert_eq!(state.players[0].hand.len(), 11);

    assert!(matches!(
        draw_card(&mut state, "h0", false, &mut rng),
        Err(DomainError::Validation(ValidationKind::PhaseMismatch, _))
    ));

    let card = state.players[0].hand[0];
    discard_card(&mut state, "h0", card).unwrap();
    assert_eq!(state.discard_pile, vec![card]);
    assert_eq!(state.current_player_index, 1);
    state.verify().unwrap();
}

#[test]
fn discard_requires_a_draw_and_the_turn() {
    let (mut state, _) = dealt_state(2, 5);
    let card = state.players[0].hand[0];
    assert!(matches!(
        discard_card(&mut state, "h0", card),
        Err(DomainError::Validation(ValidationKind::PhaseMismatch, _))
    ));
    let other = state.players[1].hand[0];
    assert!(matches!(
        discard_card(&mut state, "h1", other),
        Err(DomainError::Validation(ValidationKind::OutOfTurn, _))
    ));
}

#[test]
fn empty_deck_is_rebuilt_from_discards() {
    let (mut state, mut rng) = dealt_state(1, 9);
    // Move the draw pile onto the discard pile under the current top card.
    let top = state.discard_pile.pop().unwrap();
    let rest = std::mem::take(&mut state.deck);
    state.discard_pile.extend(rest);
    state.discard_pile.push(top);

    draw_card(&mut state, "h0", false, &mut rng).unwrap();
    assert_eq!(state.discard_pile, vec![top]);
    assert_eq!(state.deck.len(), 52 - 41 - 1);
    state.verify().unwrap();
}

#[test]
fn nothing_to_draw() {
    let mut state = playing_state([
        &["2S", "3S", "4S", "5S", "6S", "7S", "8S", "9S", "10S", "JS"],
        &[],
        &[],
        &[],
    ]);
    let mut rng = ChaCha8Rng::seed_from_u64(0);
    assert!(matches!(
        draw_card(&mut state, "p0", true, &mut rng),
        Err(DomainError::Validation(ValidationKind::NothingToDraw, _))
    ));
    assert!(matches!(
        draw_card(&mut state, "p0", false, &mut rng),
        Err(DomainError::Validation(ValidationKind::NothingToDraw, _))
    ));
}

#[test]
fn declare_melds_is_all_or_nothing() {
    let mut state = playing_state([
        &["2S", "3S", "4S", "7H", "7D", "7C", "KD", "QD", "9C", "5H"],
        &[],
        &[],
        &[],
    ]);
    let melds = declare_melds(
        &mut state,
        "p0",
        vec![cards(&["2S", "3S", "4S"]), cards(&["7H", "7D", "7C"])],
    )
    .unwrap();
    assert_eq!(melds.len(), 2);

    let err = declare_melds(
        &mut state,
        "p0",
        vec![cards(&["7H", "7D", "7C"]), cards(&["KD", "QD", "JD"])],
    )
    .unwrap_err();
    assert!(matches!(err, DomainError::Validation(ValidationKind::InvalidMeld, _)));
    assert_eq!(state.players[0].melds.len(), 2);

    let overlap = declare_melds(
        &mut state,
        "p0",
        vec![cards(&["7H", "7D", "7C"]), cards(&["7C", "7D", "7H"])],
    );
    assert!(overlap.is_err());

    let bad = declare_melds(&mut state, "p0", vec![cards(&["KD", "QD", "9C"])]);
    assert!(matches!(
        bad,
        Err(DomainError::Validation(ValidationKind::InvalidMeld, ref d)) if d == "Run must be same suit"
    ));
}

#[test]
fn discarding_a_melded_card_prunes_the_meld() {
    let mut state = playing_state([
        &["2S", "3S", "4S", "7H", "7D", "7C", "KD", "QD", "9C", "5H", "AS"],
        &["2C", "3C", "4C", "5C", "6C", "8C", "10C", "JC", "QC", "KC"],
        &[],
        &[],
    ]);
    declare_melds(&mut state, "p0", vec![cards(&["2S", "3S", "4S"])]).unwrap();
    discard_card(&mut state, "p0", "3S".parse().unwrap()).unwrap();
    assert!(state.players[0].melds.is_empty());
    assert_eq!(state.current_player_index, 1);
}

#[test]
fn opener_rotates_and_skips_dropped() {
    let (mut state, mut rng) = dealt_state(1, 3);
    state.status = DiguStatus::RoundEnd;
    state.players[1].has_dropped = true;
    start_new_round(&mut state, &mut rng).unwrap();
    assert_eq!(state.current_round, 2);
    assert_eq!(state.current_player_index, 2);
    assert!(state.players.iter().all(|p| p.hand.len() == DIGU_HAND_SIZE));
    state.verify().unwrap();

    assert!(matches!(
        start_new_round(&mut state, &mut rng),
        Err(DomainError::Validation(ValidationKind::PhaseMismatch, _))
    ));
}
