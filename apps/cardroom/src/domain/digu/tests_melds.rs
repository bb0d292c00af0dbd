use super::melds::{calculate_deadwood, deadwood_cards, find_best_melds, validate_meld, MeldValidation};
use super::state::{Meld, MeldKind};
use super::test_helpers::cards;

#[test]
fn ace_cannot_start_a_run() {
    assert_eq!(
        validate_meld(&cards(&["AH", "2H", "3H"])),
        MeldValidation::Invalid("Ace cannot be in runs")
    );
}

#[test]
fn same_rank_is_a_set() {
    assert_eq!(
        validate_meld(&cards(&["7S", "7H", "7D"])),
        MeldValidation::Valid(MeldKind::Set)
    );
    assert!(validate_meld(&cards(&["AS", "AH", "AD", "AC"])).is_valid());
}

#[test]
fn runs_need_one_suit_and_consecutive_ranks() {
    assert_eq!(
        validate_meld(&cards(&["9C", "JC", "10C"])).kind(),
        Some(MeldKind::Run)
    );
    assert_eq!(
        validate_meld(&cards(&["9C", "10C", "JH"])),
        MeldValidation::Invalid("Run must be same suit")
    );
    assert_eq!(
        validate_meld(&cards(&["9C", "10C", "QC"])),
        MeldValidation::Invalid("Run must be consecutive ranks")
    );
    assert_eq!(
        validate_meld(&cards(&["9C", "10C"])),
        MeldValidation::Invalid("Meld must have at least 3 cards")
    );
}

#[test]
fn deadwood_counts_unmelded_points() {
    assert_eq!(calculate_deadwood(&cards(&["AD", "5C"]), &[]), 20);

    let hand = cards(&["7S", "7H", "7D", "KC", "2C"]);
    let melds = vec![Meld {
        kind: MeldKind::Set,
        cards: cards(&["7S", "7H", "7D"]),
    }];
    assert_eq!(calculate_deadwood(&hand, &melds), 12);
    assert_eq!(deadwood_cards(&hand, &melds), cards(&["KC", "2C"]));
}

#[test]
fn greedy_search_takes_sets_then_runs() {
    let hand = cards(&["4S", "5S", "6S", "7S", "7H", "7D", "AC", "AD", "AH", "2C"]);
    let melds = find_best_melds(&hand);
    // The seven of spades goes to the set, leaving 4-5-6 as the run.
    assert_eq!(melds.len(), 3);
    assert!(melds
        .iter()
        .any(|m| m.kind == MeldKind::Set && m.cards.len() == 3 && m.cards.contains(&"7S".parse().unwrap())));
    assert!(melds
        .iter()
        .any(|m| m.kind == MeldKind::Run && m.cards == cards(&["4S", "5S", "6S"])));
    assert_eq!(calculate_deadwood(&hand, &melds), 2);
    for m in &melds {
        assert!(validate_meld(&m.cards).is_valid());
    }
}

#[test]
fn runs_skip_aces() {
    let hand = cards(&["QD", "KD", "AD", "2D"]);
    assert!(find_best_melds(&hand).is_empty());
}
