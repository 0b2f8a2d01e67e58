use rand::Rng;

use crate::simulation::{
    shoe::{build_deck, shuffle},
    Card, Rank,
};

/// Hi-Lo tag of a rank: low cards +1, neutral cards 0, tens and aces -1.
pub fn hi_lo_value(rank: Rank) -> i32 {
    match rank {
        Rank::Two | Rank::Three | Rank::Four | Rank::Five | Rank::Six => 1,
        Rank::Seven | Rank::Eight | Rank::Nine => 0,
        Rank::Ten | Rank::Jack | Rank::Queen | Rank::King | Rank::Ace => -1,
    }
}

/// Renders a count the way players say it: `+3`, `0`, `-2`.
pub fn format_count(count: i32) -> String {
    if count > 0 {
        format!("+{}", count)
    } else {
        count.to_string()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunningCount {
    count: i32,
    seen: usize,
}

impl RunningCount {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, rank: Rank) {
        self.count += hi_lo_value(rank);
        self.seen += 1;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn value(&self) -> i32 {
        self.count
    }

    pub fn seen(&self) -> usize {
        self.seen
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuessFeedback {
    NotANumber,
    Correct(i32),
    Incorrect { guess: i32, correct: i32 },
}

impl std::fmt::Display for GuessFeedback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GuessFeedback::NotANumber => write!(f, "Please enter a number for your guess."),
            GuessFeedback::Correct(count) => {
                write!(f, "Spot on! The running count is {}.", format_count(*count))
            }
            GuessFeedback::Incorrect { guess, correct } => write!(
                f,
                "Close. Your answer: {}, correct answer: {}.",
                format_count(*guess),
                format_count(*correct)
            ),
        }
    }
}

/// Flash-card drill over a slice of one freshly shuffled deck. Keeps its own count,
/// apart from the play-mode shoe.
#[derive(Debug, Clone)]
pub struct CountingDrill {
    cards: Vec<Card>,
    shown: usize,
    count: RunningCount,
}

impl CountingDrill {
    pub fn start<R: Rng + ?Sized>(drill_length: usize, rng: &mut R) -> Self {
        let mut cards = build_deck();
        shuffle(&mut cards, rng);
        cards.truncate(drill_length);
        Self::from_cards(cards)
    }

    pub fn from_cards(cards: Vec<Card>) -> Self {
        CountingDrill {
            cards,
            shown: 0,
            count: RunningCount::new(),
        }
    }

    /// Shows the next card. Returns `None` once every drill card has been shown.
    pub fn next_card(&mut self) -> Option<Card> {
        let card = *self.cards.get(self.shown)?;
        self.shown += 1;
        self.count.add(card.rank);
        Some(card)
    }

    pub fn current_card(&self) -> Option<Card> {
        self.shown.checked_sub(1).map(|index| self.cards[index])
    }

    /// True once the last card is out and the guess is due.
    pub fn is_finished(&self) -> bool {
        self.shown >= self.cards.len()
    }

    pub fn cards_shown(&self) -> usize {
        self.shown
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn running_count(&self) -> i32 {
        self.count.value()
    }

    pub fn check_guess(&self, input: &str) -> GuessFeedback {
        let guess: i32 = match input.trim().parse() {
            Ok(guess) => guess,
            Err(_) => return GuessFeedback::NotANumber,
        };
        let correct = self.count.value();
        if guess == correct {
            GuessFeedback::Correct(correct)
        } else {
            GuessFeedback::Incorrect { guess, correct }
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use strum::IntoEnumIterator;

    use crate::simulation::Suit;

    use super::*;

    fn card(rank: Rank) -> Card {
        Card::new(rank, Suit::Heart)
    }

    #[test]
    fn hi_lo_tags_every_rank() {
        let tags: Vec<i32> = Rank::iter().map(hi_lo_value).collect();
        assert_eq!(tags, vec![1, 1, 1, 1, 1, 0, 0, 0, -1, -1, -1, -1, -1]);
    }

    #[test]
    fn full_deck_nets_to_zero() {
        let total: i32 = build_deck().iter().map(|card| hi_lo_value(card.rank)).sum();
        assert_eq!(total, 0);
    }

    #[test]
    fn format_count_signs_positive_counts() {
        assert_eq!(format_count(3), "+3");
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(-2), "-2");
    }

    #[test]
    fn drill_counts_shown_cards_only() {
        let mut drill = CountingDrill::from_cards(vec![
            card(Rank::Two),
            card(Rank::King),
            card(Rank::Five),
            card(Rank::Eight),
        ]);
        assert_eq!(drill.current_card(), None);
        assert_eq!(drill.next_card(), Some(card(Rank::Two)));
        assert_eq!(drill.next_card(), Some(card(Rank::King)));
        assert_eq!(drill.running_count(), 0);
        drill.next_card();
        assert!(!drill.is_finished());
        drill.next_card();
        assert!(drill.is_finished());
        assert_eq!(drill.current_card(), Some(card(Rank::Eight)));
        assert_eq!(drill.running_count(), 1);
        assert_eq!(drill.next_card(), None);
        assert_eq!(drill.cards_shown(), 4);
    }

    #[test]
    fn started_drill_uses_distinct_cards() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut drill = CountingDrill::start(20, &mut rng);
        assert_eq!(drill.len(), 20);
        let mut seen = Vec::new();
        while let Some(card) = drill.next_card() {
            assert!(!seen.contains(&card));
            seen.push(card);
        }
        let expected: i32 = seen.iter().map(|card| hi_lo_value(card.rank)).sum();
        assert_eq!(drill.running_count(), expected);
    }

    #[test]
    fn guesses_are_graded() {
        let mut drill = CountingDrill::from_cards(vec![card(Rank::Three), card(Rank::Four)]);
        drill.next_card();
        drill.next_card();

        assert_eq!(drill.check_guess("2"), GuessFeedback::Correct(2));
        assert_eq!(drill.check_guess(" +2 "), GuessFeedback::Correct(2));
        assert_eq!(
            drill.check_guess("-1"),
            GuessFeedback::Incorrect {
                guess: -1,
                correct: 2
            }
        );
        assert_eq!(drill.check_guess("two"), GuessFeedback::NotANumber);
        assert_eq!(drill.check_guess(""), GuessFeedback::NotANumber);
    }

    #[test]
    fn feedback_messages() {
        assert_eq!(
            GuessFeedback::Correct(3).to_string(),
            "Spot on! The running count is +3."
        );
        assert_eq!(
            GuessFeedback::Incorrect {
                guess: 1,
                correct: -2
            }
            .to_string(),
            "Close. Your answer: +1, correct answer: -2."
        );
        assert_eq!(
            GuessFeedback::NotANumber.to_string(),
            "Please enter a number for your guess."
        );
    }
}
