use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

use crate::{
    evaluation::{hand_value, is_soft},
    simulation::{Card, Rank},
    Decision, HandType,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdviceError {
    #[error("'{0}' is not a hard total between 4 and 21")]
    InvalidHardTotal(String),
    #[error("'{0}' is not a soft hand such as A,7")]
    InvalidSoftHand(String),
    #[error("'{0}' is not a pair such as 8,8")]
    InvalidPair(String),
    #[error("'{0}' is not a dealer upcard (2-10 or A)")]
    InvalidUpCard(String),
}

/// The dealer's face-up card as a number: 2 to 10, ace as 11.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct UpCard(u8);

impl UpCard {
    pub const ALL: [UpCard; 10] = [
        UpCard(2),
        UpCard(3),
        UpCard(4),
        UpCard(5),
        UpCard(6),
        UpCard(7),
        UpCard(8),
        UpCard(9),
        UpCard(10),
        UpCard(11),
    ];

    pub fn from_rank(rank: Rank) -> Self {
        UpCard(rank.value())
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    /// Chart column, ace first.
    fn column(&self) -> usize {
        if self.0 == 11 {
            0
        } else {
            (self.0 - 1) as usize
        }
    }
}

impl FromStr for UpCard {
    type Err = AdviceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Rank::from_symbol(s)
            .map(UpCard::from_rank)
            .ok_or_else(|| AdviceError::InvalidUpCard(s.to_string()))
    }
}

impl std::fmt::Display for UpCard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0 == 11 {
            write!(f, "A")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// A player hand as the strategy trainer names it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandDescriptor {
    /// Hard total.
    Hard(u8),
    /// Ace plus a second card of this value (2 to 10).
    Soft(u8),
    Pair(Rank),
}

impl HandDescriptor {
    /// Parses the trainer's literal encodings: `16`, `A,7`, `8,8`.
    pub fn parse(hand_type: HandType, value: &str) -> Result<Self, AdviceError> {
        match hand_type {
            HandType::Hard => value
                .trim()
                .parse::<u8>()
                .ok()
                .filter(|total| (4..=21).contains(total))
                .map(HandDescriptor::Hard)
                .ok_or_else(|| AdviceError::InvalidHardTotal(value.to_string())),
            HandType::Soft => match split_two(value) {
                Some((Rank::Ace, second)) if second != Rank::Ace => {
                    Ok(HandDescriptor::Soft(second.value()))
                }
                _ => Err(AdviceError::InvalidSoftHand(value.to_string())),
            },
            HandType::Pair => match split_two(value) {
                Some((first, second)) if first == second => Ok(HandDescriptor::Pair(first)),
                _ => Err(AdviceError::InvalidPair(value.to_string())),
            },
        }
    }

    /// Classifies dealt cards. Two equal ranks only count as a pair when a split is
    /// still possible; otherwise the hand is read as soft or hard.
    pub fn from_cards(cards: &[Card], pair_allowed: bool) -> Option<Self> {
        match cards {
            [] => None,
            [first, second] if pair_allowed && first.rank == second.rank => {
                Some(HandDescriptor::Pair(first.rank))
            }
            _ if is_soft(cards) => Some(HandDescriptor::Soft(
                (hand_value(cards) - 11).clamp(2, 10),
            )),
            _ => Some(HandDescriptor::Hard(hand_value(cards))),
        }
    }

    /// Every hand the trainer offers for a hand type.
    pub fn options(hand_type: HandType) -> Vec<HandDescriptor> {
        use strum::IntoEnumIterator;
        match hand_type {
            HandType::Hard => (5..=20).map(HandDescriptor::Hard).collect(),
            HandType::Soft => (2..=10).map(HandDescriptor::Soft).collect(),
            HandType::Pair => Rank::iter().map(HandDescriptor::Pair).collect(),
        }
    }

    pub fn hand_type(&self) -> HandType {
        match self {
            HandDescriptor::Hard(_) => HandType::Hard,
            HandDescriptor::Soft(_) => HandType::Soft,
            HandDescriptor::Pair(_) => HandType::Pair,
        }
    }

    pub fn label(&self) -> String {
        match self {
            HandDescriptor::Hard(total) => format!("Hard {}", total),
            HandDescriptor::Soft(second) => format!("Soft A-{}", second),
            HandDescriptor::Pair(rank) => format!("Pair {0},{0}", rank.symbol()),
        }
    }
}

impl std::fmt::Display for HandDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HandDescriptor::Hard(total) => write!(f, "{}", total),
            HandDescriptor::Soft(second) => write!(f, "A,{}", second),
            HandDescriptor::Pair(rank) => write!(f, "{0},{0}", rank.symbol()),
        }
    }
}

fn split_two(value: &str) -> Option<(Rank, Rank)> {
    let (first, second) = value.split_once(',')?;
    Some((Rank::from_symbol(first)?, Rank::from_symbol(second)?))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Recommendation {
    pub action: Decision,
    pub rationale: &'static str,
}

pub trait Strategy {
    fn recommend(&self, hand: &HandDescriptor, dealer_up_card: UpCard) -> Recommendation;
}

pub struct BasicStrategy {
    hard_charts: [[Decision; 10]; 14],
    soft_charts: [[Decision; 10]; 9],
    pair_charts: [[Decision; 10]; 10],
}

impl BasicStrategy {
    pub fn new() -> BasicStrategy {
        const H: Decision = Decision::Hit;
        const S: Decision = Decision::Stand;
        const D: Decision = Decision::Double;
        const P: Decision = Decision::Split;

        // Columns: dealer A, 2, 3, ..., 10.
        BasicStrategy {
            hard_charts: [
                [H, H, H, H, H, H, H, H, H, H], // 4
                [H, H, H, H, H, H, H, H, H, H],
                [H, H, H, H, H, H, H, H, H, H],
                [H, H, H, H, H, H, H, H, H, H],
                [H, H, H, H, H, H, H, H, H, H],
                [H, H, H, H, H, H, H, H, H, H],
                [H, H, H, H, H, H, H, H, H, H],
                [H, H, H, H, H, H, H, H, H, H], // 11
                [H, S, S, S, S, S, H, H, H, H], // 12
                [H, S, S, S, S, S, H, H, H, H],
                [H, S, S, S, S, S, H, H, H, H],
                [H, S, S, S, S, S, H, H, H, H],
                [H, S, S, S, S, S, H, H, H, H], // 16
                [S, S, S, S, S, S, S, S, S, S], // 17, 17+
            ],
            soft_charts: [
                [H, H, H, D, D, D, H, H, H, H], // Ace + 2
                [H, H, H, D, D, D, H, H, H, H],
                [H, H, H, D, D, D, H, H, H, H],
                [H, H, H, D, D, D, H, H, H, H],
                [H, H, H, D, D, D, H, H, H, H], // Ace + 6
                [H, S, D, D, D, D, S, S, H, H], // Ace + 7
                [S, S, S, S, S, S, S, S, S, S],
                [S, S, S, S, S, S, S, S, S, S], // Ace + 9
                [S, S, S, S, S, S, S, S, S, S], // Ace + 10
            ],
            pair_charts: [
                [P, P, P, P, P, P, P, P, P, P], // Double Ace
                [H, H, H, P, P, P, P, H, H, H], // Double 2
                [H, H, H, P, P, P, P, H, H, H],
                [H, H, H, H, P, P, H, H, H, H],
                [H, D, D, D, D, D, D, D, D, H],
                [H, P, P, P, P, P, H, H, H, H],
                [H, P, P, P, P, P, P, H, H, H],
                [P, P, P, P, P, P, P, P, P, P],
                [S, P, P, P, P, P, S, P, P, S],
                [S, S, S, S, S, S, S, S, S, S], // Double 10
            ],
        }
    }
}

impl Default for BasicStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl Strategy for BasicStrategy {
    fn recommend(&self, hand: &HandDescriptor, dealer_up_card: UpCard) -> Recommendation {
        let col = dealer_up_card.column();
        match *hand {
            HandDescriptor::Pair(rank) => {
                let row = match rank {
                    Rank::Ace => 0,
                    _ => (rank.value() - 1) as usize,
                };
                let action = self.pair_charts[row][col];
                Recommendation {
                    action,
                    rationale: pair_rationale(rank, action),
                }
            }
            HandDescriptor::Soft(second) => {
                let second = second.clamp(2, 10);
                let action = self.soft_charts[(second - 2) as usize][col];
                Recommendation {
                    action,
                    rationale: soft_rationale(11 + second, action),
                }
            }
            HandDescriptor::Hard(total) => {
                let row = (total.clamp(4, 17) - 4) as usize;
                let action = self.hard_charts[row][col];
                Recommendation {
                    action,
                    rationale: hard_rationale(total, action),
                }
            }
        }
    }
}

fn pair_rationale(rank: Rank, action: Decision) -> &'static str {
    match (rank, action) {
        (Rank::Ace, _) => "Always split aces to start two strong hands.",
        (Rank::Eight, _) => "Always split eights to avoid a hard 16, which is a weak hand.",
        (Rank::Two | Rank::Three, Decision::Split) => {
            "Splitting small pairs vs a weak dealer improves your edge."
        }
        (Rank::Two | Rank::Three, _) => {
            "Small pairs vs stronger dealer hands should be played as regular hands."
        }
        (Rank::Four, Decision::Split) => {
            "Splitting 4s vs 5 or 6 can be profitable, otherwise hit."
        }
        (Rank::Four, _) => "Treat 4s as a weak hand and hit.",
        (Rank::Five, Decision::Double) => {
            "10 vs 2-9 is a great spot to double, never split 5s."
        }
        (Rank::Five, _) => "Hit against strong dealer upcards instead of splitting 5s.",
        (Rank::Six, Decision::Split) => {
            "Splitting 6s vs 2-6 puts more money out when dealer is weak."
        }
        (Rank::Six, _) => "Hit when the dealer shows a strong card.",
        (Rank::Seven, Decision::Split) => {
            "Splitting 7s vs 2-7 is good, as the dealer is more likely to bust."
        }
        (Rank::Seven, _) => "Hit when the dealer has the advantage.",
        (Rank::Nine, Decision::Stand) => {
            "19 is already very strong vs 7, 10, or Ace; just stand."
        }
        (Rank::Nine, _) => "Split 9s vs most dealer cards to improve your average result.",
        (Rank::Ten | Rank::Jack | Rank::Queen | Rank::King, _) => {
            "20 is one of the best totals; splitting would weaken your position."
        }
    }
}

fn soft_rationale(soft_total: u8, action: Decision) -> &'static str {
    match (soft_total, action) {
        (0..=17, Decision::Double) => "Soft totals 13-17 vs 4-6 are good double-down spots.",
        (0..=17, _) => "Soft low totals give you room to hit without much bust risk.",
        (18, Decision::Double) => "Soft 18 vs 3-6 is strong and worth doubling.",
        (18, Decision::Stand) => "Soft 18 is fine as-is vs a medium dealer card.",
        (18, _) => "Soft 18 vs 9, 10, or Ace needs aggression; hit.",
        _ => "Soft 19+ is strong; standing is usually best.",
    }
}

fn hard_rationale(hard_total: u8, action: Decision) -> &'static str {
    match (hard_total, action) {
        (0..=11, _) => "You cannot bust with 11 or less, so hitting is always safe.",
        (12..=16, Decision::Stand) => {
            "Let a weak dealer (2-6) draw and potentially bust while you hold your total."
        }
        (12..=16, _) => "Dealer 7-Ace is strong; improve your weak 12-16 by hitting.",
        _ => "Hard 17+ is strong enough; hitting risks busting too often.",
    }
}

/// String-level entry point: `recommend(Pair, "A,A", "6")`.
pub fn recommend(
    hand_type: HandType,
    player_value: &str,
    dealer_up_card: &str,
) -> Result<Recommendation, AdviceError> {
    let hand = HandDescriptor::parse(hand_type, player_value)?;
    let dealer_up_card: UpCard = dealer_up_card.parse()?;
    Ok(BasicStrategy::new().recommend(&hand, dealer_up_card))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MoveGrade {
    pub declared: Decision,
    pub recommendation: Recommendation,
    pub correct: bool,
}

impl MoveGrade {
    pub fn feedback(&self) -> String {
        if self.correct {
            format!(
                "Correct! Basic strategy recommends: {}.",
                self.recommendation.action.name()
            )
        } else {
            format!(
                "Not quite. Basic strategy recommends: {}.",
                self.recommendation.action.name()
            )
        }
    }
}

/// Only the action is graded; the rationale is there for display.
pub fn grade(declared: Decision, recommendation: Recommendation) -> MoveGrade {
    MoveGrade {
        declared,
        recommendation,
        correct: declared == recommendation.action,
    }
}
