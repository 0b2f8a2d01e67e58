use serde::Serialize;

use crate::{counting::hi_lo_value, evaluation::hand_value};

use super::{hand::GroupStatus, Card, GamePhase, HandOutcome, Table};

/// Snapshot of a round for rendering. The hole card is `None` while it is face down,
/// and `running_count` leaves it out until it is revealed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoundView {
    pub phase: GamePhase,
    pub dealer: DealerView,
    pub hands: Vec<HandView>,
    pub current_hand: usize,
    pub split_used: bool,
    pub natural_on_deal: bool,
    pub can_hit: bool,
    pub can_stand: bool,
    pub can_split: bool,
    pub running_count: i32,
    pub cards_remaining: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DealerView {
    pub cards: Vec<Option<Card>>,
    /// Total of the visible cards only.
    pub total: u8,
    pub hole_hidden: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HandView {
    pub cards: Vec<Card>,
    pub total: u8,
    pub status: GroupStatus,
    pub outcome: Option<HandOutcome>,
}

impl Table {
    pub fn view(&self) -> RoundView {
        let hole_hidden = self.hole_card_hidden();
        let dealer_cards = self.dealer_hand.get_cards(0);
        let dealer = DealerView {
            cards: dealer_cards
                .iter()
                .enumerate()
                .map(|(index, card)| (!(hole_hidden && index == 1)).then_some(*card))
                .collect(),
            total: if hole_hidden {
                hand_value(&dealer_cards[..dealer_cards.len().min(1)])
            } else {
                hand_value(dealer_cards)
            },
            hole_hidden,
        };

        let hands = (0..self.player_hand.get_number_of_groups())
            .map(|group_index| HandView {
                cards: self.player_hand.get_cards(group_index).to_vec(),
                total: self.player_hand.value(group_index),
                status: self.player_hand.status(group_index),
                outcome: self.player_hand.outcome(group_index),
            })
            .collect();

        let hole_card_tag = match dealer_cards.get(1) {
            Some(hole_card) if hole_hidden && self.hole_card_counted => {
                hi_lo_value(hole_card.rank)
            }
            _ => 0,
        };

        let awaiting = self.phase == GamePhase::AwaitingDecision;
        RoundView {
            phase: self.phase,
            dealer,
            hands,
            current_hand: self.current_group_index,
            split_used: self.split_used,
            natural_on_deal: self.natural_on_deal,
            can_hit: awaiting,
            can_stand: awaiting,
            can_split: self.can_split(),
            running_count: self.shoe.running_count() - hole_card_tag,
            cards_remaining: self.shoe.remaining(),
        }
    }
}
