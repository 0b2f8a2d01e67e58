pub mod hand;
pub mod shoe;
pub mod view;

use blackjack_trainer_macros::allowed_phase;
use serde::{Serialize, Serializer};
use strum_macros::{EnumIter, EnumString, IntoStaticStr};
use thiserror::Error;

use crate::{
    evaluation::{hand_value, is_natural},
    strategy::{HandDescriptor, UpCard},
    Rule, RuleError,
};

use self::{
    hand::{GroupStatus, Hand},
    shoe::{Shoe, ShoeError},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum Suit {
    Spade,
    Heart,
    Diamond,
    Club,
}

impl Suit {
    pub fn symbol(&self) -> char {
        match self {
            Suit::Spade => '♠',
            Suit::Heart => '♥',
            Suit::Diamond => '♦',
            Suit::Club => '♣',
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, EnumString,
    IntoStaticStr,
)]
pub enum Rank {
    #[strum(serialize = "2")]
    Two = 2,
    #[strum(serialize = "3")]
    Three,
    #[strum(serialize = "4")]
    Four,
    #[strum(serialize = "5")]
    Five,
    #[strum(serialize = "6")]
    Six,
    #[strum(serialize = "7")]
    Seven,
    #[strum(serialize = "8")]
    Eight,
    #[strum(serialize = "9")]
    Nine,
    #[strum(serialize = "T", to_string = "10")]
    Ten,
    #[strum(serialize = "J")]
    Jack,
    #[strum(serialize = "Q")]
    Queen,
    #[strum(serialize = "K")]
    King,
    #[strum(serialize = "A")]
    Ace,
}

impl Rank {
    /// Blackjack value with the ace counted high.
    pub fn value(&self) -> u8 {
        match self {
            Rank::Ace => 11,
            Rank::Ten | Rank::Jack | Rank::Queen | Rank::King => 10,
            pip => *pip as u8,
        }
    }

    pub fn symbol(&self) -> &'static str {
        (*self).into()
    }

    /// Parses a rank symbol, ignoring case and surrounding whitespace.
    pub fn from_symbol(symbol: &str) -> Option<Rank> {
        symbol.trim().to_ascii_uppercase().parse().ok()
    }
}

/// Represents a card in the real world with a suit and a rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
}

impl Card {
    pub fn new(rank: Rank, suit: Suit) -> Card {
        Card { rank, suit }
    }
}

impl std::fmt::Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.rank.symbol(), self.suit.symbol())
    }
}

impl Serialize for Card {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GamePhase {
    NoRound,
    DealingInitial,
    AwaitingDecision,
    DealerPlaying,
    RoundResolved,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HandOutcome {
    Win,
    Loss,
    Push,
}

/// What a round action left behind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Progress {
    InPlay,
    /// The round just ended. Holds one outcome per player hand, in hand order.
    Resolved(Vec<HandOutcome>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Seat {
    Player(usize),
    Dealer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("{action} is not allowed during {phase:?} phase")]
    WrongPhase {
        action: &'static str,
        phase: GamePhase,
    },
    #[error("split needs a single unsplit hand of two equal-rank cards")]
    SplitNotAllowed,
}

/// Settles one player hand against the dealer's final total.
pub fn settle_hand(player_total: u8, dealer_total: u8) -> HandOutcome {
    if player_total > 21 {
        HandOutcome::Loss
    } else if dealer_total > 21 || player_total > dealer_total {
        HandOutcome::Win
    } else if player_total < dealer_total {
        HandOutcome::Loss
    } else {
        HandOutcome::Push
    }
}

/// Plays rounds of one player against the dealer out of a shared shoe.
#[derive(Debug)]
pub struct Table {
    rule: Rule,

    // Game state
    phase: GamePhase,
    shoe: Shoe,
    dealer_hand: Hand,

    // Player state
    player_hand: Hand,
    current_group_index: usize,
    split_used: bool,
    natural_on_deal: bool,
    // Whether the shoe's running count still includes the dealer's hole card.
    hole_card_counted: bool,
}

impl Table {
    pub fn new(rule: &Rule) -> Result<Self, RuleError> {
        rule.validate()?;
        Ok(Self::with_rule(rule))
    }

    /// `rule` must already be valid.
    pub(crate) fn with_rule(rule: &Rule) -> Self {
        Self {
            rule: *rule,
            phase: GamePhase::NoRound,
            shoe: Shoe::new(rule.number_of_decks, rule.seed),
            dealer_hand: Hand::new(),
            player_hand: Hand::new(),
            current_group_index: 0,
            split_used: false,
            natural_on_deal: false,
            hole_card_counted: false,
        }
    }

    /// Starts a new round. Allowed in every phase; an unfinished round is abandoned.
    pub fn deal_new_hand<H: TableEventHandler>(&mut self, handler: &mut H) -> Progress {
        if self.shoe.needs_rebuild(self.rule.reshuffle_below) {
            self.shoe.rebuild();
            handler.on_shoe_rebuilt(&self.shoe);
        }

        self.new_round();
        self.phase = GamePhase::DealingInitial;
        handler.on_round_begin(&self.shoe);

        for round in 0..2 {
            let card = self.draw(handler);
            self.player_hand.receive_card(0, card);
            handler.on_card_dealt(Seat::Player(0), Some(card));

            let card = self.draw(handler);
            self.dealer_hand.receive_card(0, card);
            let face_up = round == 0;
            self.hole_card_counted = !face_up;
            handler.on_card_dealt(Seat::Dealer, face_up.then_some(card));
        }

        if is_natural(self.player_hand.get_cards(0)) {
            log::debug!("player dealt a natural, round ends immediately");
            self.natural_on_deal = true;
            self.phase = GamePhase::DealerPlaying;
            self.reveal_hole_card(handler);
            self.player_hand.set_status(0, GroupStatus::Stood);
            self.player_hand.set_outcome(0, HandOutcome::Win);
            let outcomes = vec![HandOutcome::Win];
            self.phase = GamePhase::RoundResolved;
            handler.on_round_resolved(&outcomes, self.dealer_total());
            return Progress::Resolved(outcomes);
        }

        self.phase = GamePhase::AwaitingDecision;
        Progress::InPlay
    }

    /// Splits the only hand into two, each receiving one replacement card.
    #[allowed_phase(AwaitingDecision)]
    pub fn split<H: TableEventHandler>(&mut self, handler: &mut H) -> Result<Progress, ActionError> {
        if !self.can_split() {
            log::debug!("split rejected");
            return Err(ActionError::SplitNotAllowed);
        }

        self.player_hand.split_group(0);
        self.split_used = true;
        for group_index in 0..self.player_hand.get_number_of_groups() {
            let card = self.draw(handler);
            self.player_hand.receive_card(group_index, card);
            handler.on_card_dealt(Seat::Player(group_index), Some(card));
        }
        self.current_group_index = 0;
        handler.on_split(&self.player_hand);
        Ok(Progress::InPlay)
    }

    #[allowed_phase(AwaitingDecision)]
    pub fn hit<H: TableEventHandler>(&mut self, handler: &mut H) -> Result<Progress, ActionError> {
        let group_index = self.current_group_index;
        let card = self.draw(handler);
        self.player_hand.receive_card(group_index, card);
        handler.on_card_dealt(Seat::Player(group_index), Some(card));

        if self.player_hand.value(group_index) > 21 {
            self.player_hand.set_status(group_index, GroupStatus::Busted);
            handler.on_player_bust(group_index);
            return Ok(self.move_to_next_group_or_dealer(handler));
        }
        Ok(Progress::InPlay)
    }

    #[allowed_phase(AwaitingDecision)]
    pub fn stand<H: TableEventHandler>(&mut self, handler: &mut H) -> Result<Progress, ActionError> {
        self.player_hand
            .set_status(self.current_group_index, GroupStatus::Stood);
        Ok(self.move_to_next_group_or_dealer(handler))
    }

    pub fn can_split(&self) -> bool {
        if self.phase != GamePhase::AwaitingDecision
            || self.split_used
            || self.player_hand.get_number_of_groups() != 1
        {
            return false;
        }
        match self.player_hand.get_cards(0) {
            [first, second] => first.rank == second.rank,
            _ => false,
        }
    }

    /// Rebuilds the shoe so that the given ranks are dealt first, in order.
    pub fn stack_shoe(&mut self, firsts: &[Rank]) -> Result<(), ShoeError> {
        self.shoe.stack(firsts)?;
        self.hole_card_counted = false;
        Ok(())
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::RoundResolved
    }

    pub fn rule(&self) -> &Rule {
        &self.rule
    }

    pub fn shoe(&self) -> &Shoe {
        &self.shoe
    }

    pub fn player_hand(&self) -> &Hand {
        &self.player_hand
    }

    pub fn dealer_hand(&self) -> &Hand {
        &self.dealer_hand
    }

    pub fn current_group_index(&self) -> usize {
        self.current_group_index
    }

    pub fn split_used(&self) -> bool {
        self.split_used
    }

    pub fn natural_on_deal(&self) -> bool {
        self.natural_on_deal
    }

    /// The hole card stays face down until the dealer's turn.
    pub fn hole_card_hidden(&self) -> bool {
        matches!(
            self.phase,
            GamePhase::DealingInitial | GamePhase::AwaitingDecision
        )
    }

    pub fn dealer_total(&self) -> u8 {
        hand_value(self.dealer_hand.get_cards(0))
    }

    pub fn up_card(&self) -> Option<UpCard> {
        self.dealer_hand
            .get_cards(0)
            .first()
            .map(|card| UpCard::from_rank(card.rank))
    }

    /// Classifies the hand awaiting a decision, for strategy hints.
    pub fn current_descriptor(&self) -> Option<HandDescriptor> {
        if self.phase != GamePhase::AwaitingDecision {
            return None;
        }
        HandDescriptor::from_cards(
            self.player_hand.get_cards(self.current_group_index),
            self.can_split(),
        )
    }

    fn new_round(&mut self) {
        self.dealer_hand.clear();
        self.player_hand.clear();
        self.current_group_index = 0;
        self.split_used = false;
        self.natural_on_deal = false;
        self.hole_card_counted = false;
    }

    fn draw<H: TableEventHandler>(&mut self, handler: &mut H) -> Card {
        if self.shoe.remaining() == 0 {
            self.hole_card_counted = false;
            self.shoe.rebuild();
            handler.on_shoe_rebuilt(&self.shoe);
        }
        self.shoe.deal_card()
    }

    fn reveal_hole_card<H: TableEventHandler>(&mut self, handler: &mut H) {
        if let Some(&hole_card) = self.dealer_hand.get_cards(0).get(1) {
            handler.on_dealer_reveal(hole_card);
        }
    }

    /// Moves to the next live hand. If none is left, the dealer plays (unless every
    /// hand busted) and the round is settled.
    fn move_to_next_group_or_dealer<H: TableEventHandler>(&mut self, handler: &mut H) -> Progress {
        let next = (self.current_group_index + 1..self.player_hand.get_number_of_groups())
            .find(|&group_index| self.player_hand.value(group_index) <= 21);
        if let Some(group_index) = next {
            log::debug!("moving to hand {}", group_index);
            self.current_group_index = group_index;
            return Progress::InPlay;
        }

        self.phase = GamePhase::DealerPlaying;
        self.reveal_hole_card(handler);

        let any_hand_alive = (0..self.player_hand.get_number_of_groups())
            .any(|group_index| self.player_hand.status(group_index) != GroupStatus::Busted);
        if any_hand_alive {
            self.dealer_plays(handler);
        } else {
            log::debug!("every hand busted, dealer does not draw");
        }

        self.settle(handler)
    }

    fn dealer_plays<H: TableEventHandler>(&mut self, handler: &mut H) {
        while self.dealer_total() < self.rule.dealer_stands_on {
            let card = self.draw(handler);
            self.dealer_hand.receive_card(0, card);
            handler.on_card_dealt(Seat::Dealer, Some(card));
        }
        log::debug!("dealer stands with {}", self.dealer_total());
    }

    fn settle<H: TableEventHandler>(&mut self, handler: &mut H) -> Progress {
        let dealer_total = self.dealer_total();
        let outcomes: Vec<HandOutcome> = (0..self.player_hand.get_number_of_groups())
            .map(|group_index| settle_hand(self.player_hand.value(group_index), dealer_total))
            .collect();
        for (group_index, outcome) in outcomes.iter().enumerate() {
            self.player_hand.set_outcome(group_index, *outcome);
        }

        self.phase = GamePhase::RoundResolved;
        log::debug!("round resolved against dealer {}: {:?}", dealer_total, outcomes);
        handler.on_round_resolved(&outcomes, dealer_total);
        Progress::Resolved(outcomes)
    }
}

/// Callbacks fired as a round progresses. Every method defaults to doing nothing.
pub trait TableEventHandler {
    fn on_round_begin(&mut self, _shoe: &Shoe) {}
    fn on_shoe_rebuilt(&mut self, _shoe: &Shoe) {}
    /// `card` is `None` for the dealer's face-down hole card.
    fn on_card_dealt(&mut self, _seat: Seat, _card: Option<Card>) {}
    fn on_split(&mut self, _player_hand: &Hand) {}
    fn on_player_bust(&mut self, _group_index: usize) {}
    fn on_dealer_reveal(&mut self, _hole_card: Card) {}
    fn on_round_resolved(&mut self, _outcomes: &[HandOutcome], _dealer_total: u8) {}
}

impl TableEventHandler for () {}
