use blackjack_trainer::{grade, recommend, Decision, HandType};
use clap::{Args, ValueEnum};

use crate::BoxErr;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum HandTypeArg {
    Hard,
    Soft,
    Pair,
}

impl From<HandTypeArg> for HandType {
    fn from(arg: HandTypeArg) -> Self {
        match arg {
            HandTypeArg::Hard => HandType::Hard,
            HandTypeArg::Soft => HandType::Soft,
            HandTypeArg::Pair => HandType::Pair,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ActionArg {
    Hit,
    Stand,
    Double,
    Split,
}

impl From<ActionArg> for Decision {
    fn from(arg: ActionArg) -> Self {
        match arg {
            ActionArg::Hit => Decision::Hit,
            ActionArg::Stand => Decision::Stand,
            ActionArg::Double => Decision::Double,
            ActionArg::Split => Decision::Split,
        }
    }
}

#[derive(Debug, Args)]
pub struct AdviseArgs {
    /// Shape of the player hand
    #[arg(long, value_enum)]
    hand_type: HandTypeArg,

    /// Hard total (e.g. 16), soft hand (e.g. A,7) or pair (e.g. 8,8)
    #[arg(long)]
    value: String,

    /// Dealer upcard: 2-10, J, Q, K or A
    #[arg(long)]
    dealer: String,

    /// Your own choice, graded against basic strategy
    #[arg(long, value_enum)]
    action: Option<ActionArg>,
}

pub fn run(args: &AdviseArgs) -> Result<(), BoxErr> {
    let recommendation = recommend(args.hand_type.into(), &args.value, &args.dealer)?;
    log::debug!("{:?}", recommendation);

    println!("Recommended action: {}", recommendation.action.name());
    println!("{}", recommendation.rationale);
    if let Some(action) = args.action {
        println!("{}", grade(action.into(), recommendation).feedback());
    }
    Ok(())
}
