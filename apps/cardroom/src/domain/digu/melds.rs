use std::collections::{BTreeMap, HashSet};

use super::state::{Meld, MeldKind};
use crate::domain::cards_logic::points;
use crate::domain::{Card, Rank, Suit};

pub const MIN_MELD_SIZE: usize = 3;
/// Sets found by the greedy search keep at most this many cards.
pub const MAX_SET_SIZE: usize = 4;

/// Result of checking a proposed meld.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeldValidation {
    Valid(MeldKind),
    Invalid(&'static str),
}

impl MeldValidation {
    pub fn is_valid(&self) -> bool {
        matches!(self, MeldValidation::Valid(_))
    }

    pub fn kind(&self) -> Option<MeldKind> {
        match self {
            MeldValidation::Valid(kind) => Some(*kind),
            MeldValidation::Invalid(_) => None,
        }
    }
}

/// A set is 3+ cards of one rank; a run is 3+ consecutive ranks of one
/// suit. Aces never appear in runs.
pub fn validate_meld(cards: &[Card]) -> MeldValidation {
    if cards.len() < MIN_MELD_SIZE {
        return MeldValidation::Invalid("Meld must have at least 3 cards");
    }
    let first = cards[0];
    if cards.iter().all(|c| c.rank == first.rank) {
        return MeldValidation::Valid(MeldKind::Set);
    }
    if !cards.iter().all(|c| c.suit == first.suit) {
        return MeldValidation::Invalid("Run must be same suit");
    }
    if cards.iter().any(|c| c.rank == Rank::Ace) {
        return MeldValidation::Invalid("Ace cannot be in runs");
    }
    let mut values: Vec<u8> = cards.iter().map(|c| c.rank.value()).collect();
    values.sort_unstable();
    if values.windows(2).any(|w| w[1] != w[0] + 1) {
        return MeldValidation::Invalid("Run must be consecutive ranks");
    }
    MeldValidation::Valid(MeldKind::Run)
}

/// Hand cards not covered by any meld.
pub fn deadwood_cards(hand: &[Card], melds: &[Meld]) -> Vec<Card> {
    let melded: HashSet<Card> = melds.iter().flat_map(|m| m.cards.iter().copied()).collect();
    hand.iter().copied().filter(|c| !melded.contains(c)).collect()
}

pub fn calculate_deadwood(hand: &[Card], melds: &[Meld]) -> u32 {
    points(&deadwood_cards(hand, melds))
}

/// Greedy meld search: rank groups of 3+ first (capped at four cards), then
/// runs of 3+ among the remaining non-Ace cards of each suit.
pub fn find_best_melds(hand: &[Card]) -> Vec<Meld> {
    let mut melds = Vec::new();
    let mut used: HashSet<Card> = HashSet::new();

    let mut by_rank: BTreeMap<Rank, Vec<Card>> = BTreeMap::new();
    for &card in hand {
        by_rank.entry(card.rank).or_default().push(card);
    }
    for group in by_rank.into_values() {
        if group.len() >= MIN_MELD_SIZE {
            let cards: Vec<Card> = group.into_iter().take(MAX_SET_SIZE).collect();
            used.extend(cards.iter().copied());
            melds.push(Meld {
                kind: MeldKind::Set,
                cards,
            });
        }
    }

    for suit in Suit::DECK_ORDER {
        let mut suited: Vec<Card> = hand
            .iter()
            .copied()
            .filter(|c| c.suit == suit && c.rank != Rank::Ace && !used.contains(c))
            .collect();
        suited.sort_by_key(|c| c.rank);

        let mut run: Vec<Card> = Vec::new();
        for card in suited {
            let extends = run
                .last()
                .map(|last| card.rank.value() == last.rank.value() + 1)
                .unwrap_or(true);
            if !extends {
                flush_run(&mut run, &mut melds);
            }
            run.push(card);
        }
        flush_run(&mut run, &mut melds);
    }
    melds
}

fn flush_run(run: &mut Vec<Card>, melds: &mut Vec<Meld>) {
    let cards = std::mem::take(run);
    if cards.len() >= MIN_MELD_SIZE {
        melds.push(Meld {
            kind: MeldKind::Run,
            cards,
        });
    }
}
