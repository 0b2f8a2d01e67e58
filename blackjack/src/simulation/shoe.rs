use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use strum::IntoEnumIterator;
use thiserror::Error;

use crate::counting::RunningCount;

use super::{Card, Rank, Suit};

pub const CARDS_PER_DECK: usize = 52;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShoeError {
    #[error("the shoe holds no more {0:?} cards to put on top")]
    RankExhausted(Rank),
}

/// Builds one ordered deck: ranks 2 to A, each in every suit.
pub fn build_deck() -> Vec<Card> {
    let mut cards = Vec::with_capacity(CARDS_PER_DECK);
    for rank in Rank::iter() {
        for suit in Suit::iter() {
            cards.push(Card { rank, suit });
        }
    }
    cards
}

/// Concatenates `number_of_decks` decks and shuffles them.
pub fn build_shoe<R: Rng + ?Sized>(number_of_decks: u8, rng: &mut R) -> Vec<Card> {
    let mut cards = build_ordered_shoe(number_of_decks);
    shuffle(&mut cards, rng);
    cards
}

/// Fisher-Yates: walking down from the last index, swap each slot with a uniformly
/// chosen slot at or below it.
pub fn shuffle<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.gen_range(0..=i);
        items.swap(i, j);
    }
}

pub(crate) fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

fn build_ordered_shoe(number_of_decks: u8) -> Vec<Card> {
    let mut cards = Vec::with_capacity(number_of_decks as usize * CARDS_PER_DECK);
    for _ in 0..number_of_decks {
        cards.extend(build_deck());
    }
    cards
}

/// Represents a shoe in the real world, together with the Hi-Lo running count of
/// every card dealt since it was last rebuilt.
#[derive(Debug, Clone)]
pub struct Shoe {
    number_of_decks: u8,
    cards: Vec<Card>,
    current_index: usize,
    running_count: RunningCount,
    rng: StdRng,
}

impl Shoe {
    /// Creates a new shuffled shoe. `number_of_decks` must be at least 1, which
    /// `Rule::validate` guarantees for every `Table`.
    pub(crate) fn new(number_of_decks: u8, seed: Option<u64>) -> Shoe {
        let mut rng = make_rng(seed);
        let cards = build_shoe(number_of_decks, &mut rng);
        Shoe {
            number_of_decks,
            cards,
            current_index: 0,
            running_count: RunningCount::new(),
            rng,
        }
    }

    /// Replaces the shoe with freshly shuffled decks and resets the running count.
    pub fn rebuild(&mut self) {
        log::info!(
            "rebuilding a {}-deck shoe with {} cards left",
            self.number_of_decks,
            self.remaining()
        );
        self.cards = build_shoe(self.number_of_decks, &mut self.rng);
        self.current_index = 0;
        self.running_count.reset();
    }

    /// Rebuilds the shoe so the given ranks are dealt first, in order, with the rest
    /// shuffled behind them. Leaves the shoe untouched on error.
    pub fn stack(&mut self, firsts: &[Rank]) -> Result<(), ShoeError> {
        let mut rest = build_ordered_shoe(self.number_of_decks);
        let mut cards = Vec::with_capacity(rest.len());
        for rank in firsts {
            let position = rest
                .iter()
                .position(|card| card.rank == *rank)
                .ok_or(ShoeError::RankExhausted(*rank))?;
            cards.push(rest.remove(position));
        }
        shuffle(&mut rest, &mut self.rng);
        cards.extend(rest);

        self.cards = cards;
        self.current_index = 0;
        self.running_count.reset();
        Ok(())
    }

    /// Deals the next card, rebuilding first if the shoe ran dry.
    pub fn deal_card(&mut self) -> Card {
        if self.remaining() == 0 {
            self.rebuild();
        }
        let card = self.cards[self.current_index];
        self.current_index += 1;
        self.running_count.add(card.rank);
        card
    }

    /// True when fewer than `reshuffle_below` cards are left.
    pub fn needs_rebuild(&self, reshuffle_below: usize) -> bool {
        self.remaining() < reshuffle_below
    }

    pub fn remaining(&self) -> usize {
        self.cards.len() - self.current_index
    }

    pub fn number_of_decks(&self) -> u8 {
        self.number_of_decks
    }

    pub fn running_count(&self) -> i32 {
        self.running_count.value()
    }

    /// Running count per remaining deck, never dividing by less than half a deck.
    pub fn true_count(&self) -> f64 {
        let decks_remaining = (self.remaining() as f64 / CARDS_PER_DECK as f64).max(0.5);
        self.running_count.value() as f64 / decks_remaining
    }

    pub fn preview_next_few_cards(&self, number: usize) -> &[Card] {
        let end = (self.current_index + number).min(self.cards.len());
        &self.cards[self.current_index..end]
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use crate::counting::hi_lo_value;

    use super::*;

    fn composition(cards: &[Card]) -> HashMap<Card, usize> {
        let mut counts = HashMap::new();
        for card in cards {
            *counts.entry(*card).or_insert(0) += 1;
        }
        counts
    }

    #[test]
    fn deck_has_every_card_once() {
        let deck = build_deck();
        assert_eq!(deck.len(), 52);
        let counts = composition(&deck);
        assert_eq!(counts.len(), 52);
        assert!(counts.values().all(|&count| count == 1));
        assert_eq!(deck[0], Card::new(Rank::Two, Suit::Spade));
        assert_eq!(deck[51], Card::new(Rank::Ace, Suit::Club));
    }

    #[test]
    fn shoe_holds_the_requested_decks() {
        let mut rng = make_rng(Some(11));
        for number_of_decks in [1, 2, 6, 8] {
            let shoe = build_shoe(number_of_decks, &mut rng);
            assert_eq!(shoe.len(), 52 * number_of_decks as usize);
            let counts = composition(&shoe);
            assert!(counts.values().all(|&count| count == number_of_decks as usize));
        }
    }

    #[test]
    fn shuffle_keeps_the_same_cards() {
        let mut rng = make_rng(Some(5));
        let mut cards = build_deck();
        shuffle(&mut cards, &mut rng);
        assert_eq!(composition(&cards), composition(&build_deck()));

        let mut empty: [u8; 0] = [];
        shuffle(&mut empty, &mut rng);
        let mut single = [9];
        shuffle(&mut single, &mut rng);
        assert_eq!(single, [9]);
    }

    #[test]
    fn same_seed_gives_the_same_shoe() {
        let a = Shoe::new(2, Some(42));
        let b = Shoe::new(2, Some(42));
        assert_eq!(a.cards, b.cards);
    }

    #[test]
    fn running_count_tracks_dealt_cards_until_rebuild() {
        let mut shoe = Shoe::new(1, Some(1));
        let mut expected = 0;
        for _ in 0..10 {
            let card = shoe.deal_card();
            expected += hi_lo_value(card.rank);
        }
        assert_eq!(shoe.running_count(), expected);
        assert_eq!(shoe.remaining(), 42);

        shoe.rebuild();
        assert_eq!(shoe.running_count(), 0);
        assert_eq!(shoe.remaining(), 52);
    }

    #[test]
    fn low_water_mark_is_strict() {
        let mut shoe = Shoe::new(1, Some(6));
        for _ in 0..37 {
            shoe.deal_card();
        }
        assert_eq!(shoe.remaining(), 15);
        assert!(!shoe.needs_rebuild(15));
        shoe.deal_card();
        assert!(shoe.needs_rebuild(15));
    }

    #[test]
    fn exhausted_shoe_rebuilds_transparently() {
        let mut shoe = Shoe::new(1, Some(2));
        for _ in 0..52 {
            shoe.deal_card();
        }
        assert_eq!(shoe.remaining(), 0);
        // A full deck nets to zero.
        assert_eq!(shoe.running_count(), 0);

        let card = shoe.deal_card();
        assert_eq!(shoe.remaining(), 51);
        assert_eq!(shoe.running_count(), hi_lo_value(card.rank));
    }

    #[test]
    fn stacked_ranks_come_out_first() {
        let mut shoe = Shoe::new(1, Some(9));
        let firsts = [Rank::Ace, Rank::King, Rank::Five, Rank::Six];
        shoe.stack(&firsts).unwrap();
        assert_eq!(shoe.remaining(), 52);
        assert_eq!(composition(&shoe.cards), composition(&build_deck()));
        let top: Vec<Rank> = shoe.preview_next_few_cards(4).iter().map(|c| c.rank).collect();
        assert_eq!(top, firsts);
    }

    #[test]
    fn stacking_more_than_the_shoe_holds_fails() {
        let mut shoe = Shoe::new(1, Some(9));
        let before = shoe.cards.clone();
        assert_eq!(
            shoe.stack(&[Rank::Six; 5]),
            Err(ShoeError::RankExhausted(Rank::Six))
        );
        assert_eq!(shoe.cards, before);
    }

    #[test]
    fn true_count_divides_by_decks_left() {
        let mut shoe = Shoe::new(2, Some(4));
        shoe.stack(&[Rank::Two, Rank::Three, Rank::Four, Rank::Five]).unwrap();
        for _ in 0..4 {
            shoe.deal_card();
        }
        assert_eq!(shoe.running_count(), 4);
        let expected = 4.0 / (100.0 / 52.0);
        assert!((shoe.true_count() - expected).abs() < 1e-9);
    }
}
