use serde::Serialize;

use crate::evaluation::hand_value;

use super::{Card, HandOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GroupStatus {
    Playing,
    Stood,
    Busted,
}

/// Represents all hand cards. May contain more than 1 group of cards because of split.
#[derive(Debug, Clone)]
pub struct Hand {
    groups: Vec<Group>,
}

impl Hand {
    pub fn new() -> Hand {
        Hand {
            groups: vec![Group::new()],
        }
    }

    /// The given group receives a given card.
    pub fn receive_card(&mut self, group_index: usize, card: Card) {
        self.groups[group_index].cards.push(card);
    }

    /// Splits the given group: its last card moves into a new group at the end.
    /// Returns false, leaving the hand untouched, if the group holds fewer than 2 cards.
    pub fn split_group(&mut self, group_index: usize) -> bool {
        let group = &mut self.groups[group_index];
        if group.cards.len() < 2 {
            return false;
        }
        let mut new_group = Group::new();
        if let Some(card) = group.cards.pop() {
            new_group.cards.push(card);
        }
        self.groups.push(new_group);
        true
    }

    pub fn get_number_of_groups(&self) -> usize {
        self.groups.len()
    }

    pub fn get_cards(&self, group_index: usize) -> &[Card] {
        &self.groups[group_index].cards
    }

    pub fn value(&self, group_index: usize) -> u8 {
        hand_value(&self.groups[group_index].cards)
    }

    pub fn status(&self, group_index: usize) -> GroupStatus {
        self.groups[group_index].status
    }

    pub fn set_status(&mut self, group_index: usize, status: GroupStatus) {
        self.groups[group_index].status = status;
    }

    pub fn outcome(&self, group_index: usize) -> Option<HandOutcome> {
        self.groups[group_index].outcome
    }

    pub fn set_outcome(&mut self, group_index: usize, outcome: HandOutcome) {
        self.groups[group_index].outcome = Some(outcome);
    }

    /// Clears all the cards in all groups. Remove all the extra groups (i.e., groups
    /// that come from split), leaving only 1 original group, and it is empty.
    pub fn clear(&mut self) {
        self.groups.truncate(1);
        self.groups[0] = Group::new();
    }
}

impl Default for Hand {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone)]
struct Group {
    cards: Vec<Card>,
    status: GroupStatus,
    outcome: Option<HandOutcome>,
}

impl Group {
    fn new() -> Self {
        Self {
            cards: Vec::with_capacity(3),
            status: GroupStatus::Playing,
            outcome: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::simulation::{Rank, Suit};

    use super::*;

    #[test]
    fn should_split_successfully() {
        let mut hand = Hand::new();
        hand.receive_card(0, Card::new(Rank::Eight, Suit::Diamond));
        hand.receive_card(0, Card::new(Rank::Eight, Suit::Club));
        assert!(hand.split_group(0));
        assert_eq!(hand.get_number_of_groups(), 2);
        assert_eq!(hand.get_cards(0), &[Card::new(Rank::Eight, Suit::Diamond)]);
        assert_eq!(hand.get_cards(1), &[Card::new(Rank::Eight, Suit::Club)]);
        assert_eq!(hand.status(1), GroupStatus::Playing);
    }

    #[test]
    fn split_needs_two_cards() {
        let mut hand = Hand::new();
        hand.receive_card(0, Card::new(Rank::Ace, Suit::Heart));
        assert!(!hand.split_group(0));
        assert_eq!(hand.get_number_of_groups(), 1);
        assert_eq!(hand.get_cards(0).len(), 1);
    }

    #[test]
    fn clear_drops_split_groups_and_results() {
        let mut hand = Hand::new();
        hand.receive_card(0, Card::new(Rank::Nine, Suit::Spade));
        hand.receive_card(0, Card::new(Rank::Nine, Suit::Heart));
        hand.split_group(0);
        hand.set_status(0, GroupStatus::Busted);
        hand.set_outcome(1, HandOutcome::Push);
        hand.clear();
        assert_eq!(hand.get_number_of_groups(), 1);
        assert!(hand.get_cards(0).is_empty());
        assert_eq!(hand.status(0), GroupStatus::Playing);
        assert_eq!(hand.outcome(0), None);
        assert_eq!(hand.value(0), 0);
    }
}
