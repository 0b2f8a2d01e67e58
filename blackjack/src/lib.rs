pub mod counting;
pub mod evaluation;
pub mod session;
pub mod simulation;
pub mod statistics;
pub mod strategy;

use serde::{Deserialize, Serialize};
use serde_enum_str::{Deserialize_enum_str, Serialize_enum_str};
use thiserror::Error;

pub use counting::{hi_lo_value, CountingDrill, GuessFeedback, RunningCount};
pub use evaluation::{hand_value, is_natural, is_soft};
pub use session::Session;
pub use statistics::SessionStatistics;
pub use strategy::{
    grade, recommend, AdviceError, BasicStrategy, HandDescriptor, MoveGrade, Recommendation,
    Strategy, UpCard,
};

/// Table configuration shared by the play mode and the counting drill.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub number_of_decks: u8,
    /// A new round rebuilds the shoe when fewer cards than this remain.
    pub reshuffle_below: usize,
    /// The dealer draws while the dealer total is below this. Between 17 and 21.
    pub dealer_stands_on: u8,
    pub drill_length: usize,
    /// Fixed seed for reproducible shoes. `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for Rule {
    fn default() -> Self {
        Rule {
            number_of_decks: 6,
            reshuffle_below: 15,
            dealer_stands_on: 17,
            drill_length: 20,
            seed: None,
        }
    }
}

impl Rule {
    pub fn validate(&self) -> Result<(), RuleError> {
        if self.number_of_decks == 0 {
            return Err(RuleError::NoDecks);
        }
        if !(17..=21).contains(&self.dealer_stands_on) {
            return Err(RuleError::DealerStandsOn(self.dealer_stands_on));
        }
        if self.drill_length == 0 || self.drill_length > 52 {
            return Err(RuleError::DrillLength(self.drill_length));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    #[error("number_of_decks must be at least 1")]
    NoDecks,
    #[error("dealer_stands_on must be in [17, 21], got {0}")]
    DealerStandsOn(u8),
    #[error("drill_length must be in [1, 52], got {0}")]
    DrillLength(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize_enum_str, Deserialize_enum_str)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Hit,
    Stand,
    Double,
    Split,
}

impl Decision {
    pub fn name(&self) -> &'static str {
        match self {
            Decision::Hit => "Hit",
            Decision::Stand => "Stand",
            Decision::Double => "Double",
            Decision::Split => "Split",
        }
    }
}

/// The three shapes of hand the strategy trainer asks about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize_enum_str, Deserialize_enum_str)]
#[serde(rename_all = "lowercase")]
pub enum HandType {
    Hard,
    Soft,
    Pair,
}
