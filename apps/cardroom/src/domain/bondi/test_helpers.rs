use super::state::{BondiGameState, BondiPlayer, BondiStatus};
use crate::domain::cards_parsing::try_parse_cards;

/// Playing-state fixture with hand-picked hands; seat `i` is `p{i}` named `P{i}`.
pub(crate) fn playing_state(hands: &[&[&str]]) -> BondiGameState {
    let mut state = BondiGameState::new("TEST01", BondiPlayer::new("p0", "P0"));
    state.players.clear();
    for (i, hand) in hands.iter().enumerate() {
        let mut p = BondiPlayer::new(format!("p{i}"), format!("P{i}"));
        p.hand = try_parse_cards(hand.iter().copied()).expect("fixture cards parse");
        state.players.push(p);
    }
    state.status = BondiStatus::Playing;
    state
}
