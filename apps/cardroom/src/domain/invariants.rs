//! Card conservation checks run before every state commit.

use std::collections::HashSet;

use crate::domain::dealing::DECK_SIZE;
use crate::domain::Card;
use crate::errors::domain::DomainError;

/// Verify that `cards` is exactly one standard deck: 52 cards, no duplicates.
pub fn require_full_deck<'a, I>(cards: I, ctx: &'static str) -> Result<(), DomainError>
where
    I: IntoIterator<Item = &'a Card>,
{
    let mut seen = HashSet::with_capacity(DECK_SIZE);
    let mut total = 0usize;
    for card in cards {
        total += 1;
        if !seen.insert(*card) {
            return Err(DomainError::invariant(format!(
                "Invariant violated: duplicate card {card} ({ctx})"
            )));
        }
    }
    if total != DECK_SIZE {
        return Err(DomainError::invariant(format!(
            "Invariant violated: {total} cards in session, expected {DECK_SIZE} ({ctx})"
        )));
    }
    Ok(())
}
