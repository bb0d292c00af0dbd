use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use time::OffsetDateTime;

use super::round::{join, start_game};
use super::state::{DiguGameState, DiguPlayer, DiguStatus};
use crate::domain::cards_parsing::try_parse_cards;
use crate::domain::Card;

pub(crate) fn cards(tokens: &[&str]) -> Vec<Card> {
    try_parse_cards(tokens.iter().copied()).expect("fixture cards parse")
}

/// Four-seat playing state with hand-picked hands; deck and discard empty.
pub(crate) fn playing_state(hands: [&[&str]; 4]) -> DiguGameState {
    let mut state = DiguGameState::new("TEST02", DiguPlayer::new("p0", "P0"));
    state.players.clear();
    for (i, hand) in hands.iter().enumerate() {
        let mut p = DiguPlayer::new(format!("p{i}"), format!("P{i}"));
        p.hand = cards(hand);
        state.players.push(p);
    }
    state.status = DiguStatus::Playing;
    state.current_round = 1;
    state
}

/// Real deal: `humans` seated humans, bots fill the rest.
pub(crate) fn dealt_state(humans: usize, seed: u64) -> (DiguGameState, ChaCha8Rng) {
    let mut state = DiguGameState::new("TEST03", DiguPlayer::new("h0", "H0"));
    for i in 1..humans {
        join(&mut state, DiguPlayer::new(format!("h{i}"), format!("H{i}"))).expect("join");
    }
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    start_game(&mut state, &mut rng, OffsetDateTime::UNIX_EPOCH).expect("start");
    (state, rng)
}
