use crate::simulation::{Card, Rank};

/// Returns the total of the cards and whether an ace is still counted as 11.
fn evaluate(cards: &[Card]) -> (u32, bool) {
    let mut total: u32 = 0;
    let mut aces = 0;
    for card in cards {
        total += card.rank.value() as u32;
        if card.rank == Rank::Ace {
            aces += 1;
        }
    }

    // Count aces as 1 instead of 11, one at a time.
    while total > 21 && aces > 0 {
        total -= 10;
        aces -= 1;
    }

    (total, aces > 0)
}

/// Blackjack total: the best total not above 21, or the smallest total if the hand is bust.
pub fn hand_value(cards: &[Card]) -> u8 {
    let (total, _) = evaluate(cards);
    total.min(u8::MAX as u32) as u8
}

pub fn is_soft(cards: &[Card]) -> bool {
    let (total, soft) = evaluate(cards);
    soft && total <= 21
}

/// 21 on exactly two cards.
pub fn is_natural(cards: &[Card]) -> bool {
    cards.len() == 2 && hand_value(cards) == 21
}

#[cfg(test)]
mod tests {
    use crate::simulation::Suit;

    use super::*;

    fn cards(ranks: &[Rank]) -> Vec<Card> {
        ranks.iter().map(|&rank| Card::new(rank, Suit::Spade)).collect()
    }

    #[test]
    fn empty_hand_is_zero() {
        assert_eq!(hand_value(&[]), 0);
        assert!(!is_soft(&[]));
    }

    #[test]
    fn face_cards_count_ten() {
        assert_eq!(hand_value(&cards(&[Rank::King, Rank::Queen])), 20);
        assert_eq!(hand_value(&cards(&[Rank::Jack, Rank::Two, Rank::Three])), 15);
    }

    #[test]
    fn ace_with_king_is_twenty_one() {
        let hand = cards(&[Rank::Ace, Rank::King]);
        assert_eq!(hand_value(&hand), 21);
        assert!(is_natural(&hand));
        assert!(is_soft(&hand));
    }

    #[test]
    fn multiple_aces_downgrade_one_at_a_time() {
        assert_eq!(hand_value(&cards(&[Rank::Ace, Rank::Ace, Rank::Nine])), 21);
        assert_eq!(
            hand_value(&cards(&[Rank::Ace, Rank::Ace, Rank::Ace, Rank::Eight])),
            21
        );
        assert_eq!(hand_value(&cards(&[Rank::Ace, Rank::Ace])), 12);
    }

    #[test]
    fn bust_without_aces_keeps_the_raw_total() {
        assert_eq!(hand_value(&cards(&[Rank::Ten, Rank::Ten, Rank::Five])), 25);
        assert_eq!(
            hand_value(&cards(&[Rank::Ace, Rank::King, Rank::Queen, Rank::Five])),
            26
        );
    }

    #[test]
    fn soft_and_hard_aces() {
        assert!(is_soft(&cards(&[Rank::Ace, Rank::Six])));
        assert_eq!(hand_value(&cards(&[Rank::Ace, Rank::Six, Rank::Nine])), 16);
        assert!(!is_soft(&cards(&[Rank::Ace, Rank::Six, Rank::Nine])));
        assert!(!is_soft(&cards(&[Rank::Ten, Rank::Seven])));
    }

    #[test]
    fn three_card_twenty_one_is_not_natural() {
        assert!(!is_natural(&cards(&[Rank::Seven, Rank::Seven, Rank::Seven])));
        assert!(!is_natural(&cards(&[Rank::King, Rank::Queen])));
    }
}
