use std::io::{self, BufRead, Write};

use blackjack_trainer::counting::format_count;
use blackjack_trainer::simulation::hand::Hand;
use blackjack_trainer::simulation::shoe::Shoe;
use blackjack_trainer::simulation::view::{HandView, RoundView};
use blackjack_trainer::simulation::{
    ActionError, Card, HandOutcome, Progress, Seat, TableEventHandler,
};
use blackjack_trainer::{Session, SessionStatistics};

use crate::BoxErr;

const HELP: &str = "d: deal, h: hit, s: stand, p: split, ?: hint, v: view, q: quit";

/// Narrates table events as they happen.
#[derive(Debug, Default)]
struct TerminalHandler;

impl TableEventHandler for TerminalHandler {
    fn on_shoe_rebuilt(&mut self, shoe: &Shoe) {
        println!(
            "Shuffling a fresh {}-deck shoe. Running count is back to 0.",
            shoe.number_of_decks()
        );
    }

    fn on_card_dealt(&mut self, seat: Seat, card: Option<Card>) {
        match (seat, card) {
            (Seat::Dealer, None) => log::debug!("dealer takes the hole card"),
            (Seat::Dealer, Some(card)) => log::debug!("dealer receives {}", card),
            (Seat::Player(index), Some(card)) => {
                log::debug!("hand {} receives {}", index + 1, card)
            }
            (Seat::Player(_), None) => {}
        }
    }

    fn on_split(&mut self, player_hand: &Hand) {
        println!(
            "Split into {} hands. Playing hand 1.",
            player_hand.get_number_of_groups()
        );
    }

    fn on_player_bust(&mut self, group_index: usize) {
        log::debug!("hand {} busts", group_index + 1);
    }

    fn on_dealer_reveal(&mut self, hole_card: Card) {
        println!("Dealer reveals {}.", hole_card);
    }
}

pub fn run(mut session: Session) -> Result<(), BoxErr> {
    println!("Play against the dealer. {}", HELP);
    let mut handler = TerminalHandler;
    prompt()?;

    for line in io::stdin().lock().lines() {
        let line = line?;
        let result = match line.trim() {
            "q" => break,
            "d" => Ok(session.deal_new_hand(&mut handler)),
            "h" => session.hit(&mut handler),
            "s" => session.stand(&mut handler),
            "p" => session.split(&mut handler),
            "?" => {
                match session.hint() {
                    Some(hint) => println!("Hint: {}. {}", hint.action.name(), hint.rationale),
                    None => println!("No decision to make right now."),
                }
                prompt()?;
                continue;
            }
            "v" => {
                print!("{}", serde_yaml::to_string(&session.view())?);
                prompt()?;
                continue;
            }
            other => {
                println!("Unknown command '{}'. {}", other, HELP);
                prompt()?;
                continue;
            }
        };

        match result {
            Ok(progress) => {
                let view = session.view();
                println!("{}", render(&view));
                if let Progress::Resolved(_) = progress {
                    for message in outcome_messages(&view) {
                        println!("{}", message);
                    }
                    println!("{}", render_statistics(session.statistics()));
                }
            }
            Err(err) => report_rejected(err),
        }
        prompt()?;
    }

    let statistics = session.dispose();
    println!("{}", render_statistics(&statistics));
    Ok(())
}

fn report_rejected(err: ActionError) {
    log::debug!("{}", err);
    match err {
        ActionError::WrongPhase { .. } => println!("That move is not available. Deal with 'd'."),
        ActionError::SplitNotAllowed => println!("You can only split a pair, once per round."),
    }
}

fn prompt() -> io::Result<()> {
    print!("> ");
    io::stdout().flush()
}

fn render_cards<'a>(cards: impl Iterator<Item = Option<&'a Card>>) -> String {
    cards
        .map(|card| match card {
            Some(card) => card.to_string(),
            None => String::from("??"),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn render(view: &RoundView) -> String {
    let mut lines = Vec::new();
    let dealer_total = if view.dealer.hole_hidden {
        format!("Total showing: {}", view.dealer.total)
    } else {
        format!("Total: {}", view.dealer.total)
    };
    lines.push(format!(
        "Dealer: {}  ({})",
        render_cards(view.dealer.cards.iter().map(Option::as_ref)),
        dealer_total
    ));

    for (index, hand) in view.hands.iter().enumerate() {
        let marker = if view.can_hit && index == view.current_hand && view.hands.len() > 1 {
            "*"
        } else {
            " "
        };
        lines.push(format!(
            "{}{}: {}  (Total: {})",
            marker,
            hand_label(index, view.hands.len()),
            render_cards(hand.cards.iter().map(Some)),
            hand.total
        ));
    }

    lines.push(format!(
        "Running count: {}  Cards left: {}",
        format_count(view.running_count),
        view.cards_remaining
    ));
    lines.join("\n")
}

fn hand_label(index: usize, number_of_hands: usize) -> String {
    if number_of_hands > 1 {
        format!("Hand {}", index + 1)
    } else {
        String::from("You")
    }
}

/// One line per player hand, worded after the result of that hand.
fn outcome_messages(view: &RoundView) -> Vec<String> {
    if view.natural_on_deal {
        return vec![String::from("Blackjack! You have 21 on the deal.")];
    }

    let dealer_total = view.dealer.total;
    let prefix_hands = view.hands.len() > 1;
    view.hands
        .iter()
        .enumerate()
        .filter_map(|(index, hand)| {
            let message = outcome_message(hand, dealer_total)?;
            Some(if prefix_hands {
                format!("Hand {}: {}", index + 1, message)
            } else {
                message
            })
        })
        .collect()
}

fn outcome_message(hand: &HandView, dealer_total: u8) -> Option<String> {
    let player_total = hand.total;
    let message = match hand.outcome? {
        HandOutcome::Loss if player_total > 21 => String::from("You bust! Dealer wins."),
        HandOutcome::Win if dealer_total > 21 => format!(
            "Dealer busts with {}. You win with {}!",
            dealer_total, player_total
        ),
        HandOutcome::Loss => format!("Dealer wins {} vs your {}.", dealer_total, player_total),
        HandOutcome::Win => format!("You win! {} vs dealer's {}.", player_total, dealer_total),
        HandOutcome::Push => format!(
            "Push: both you and the dealer have {}.",
            player_total
        ),
    };
    Some(message)
}

fn render_statistics(statistics: &SessionStatistics) -> String {
    format!(
        "Hands played: {}  Wins: {}  Losses: {}  Pushes: {}  Win rate: {}%",
        statistics.hands_played,
        statistics.wins,
        statistics.losses,
        statistics.pushes,
        statistics.win_rate()
    )
}

#[cfg(test)]
mod tests {
    use blackjack_trainer::simulation::hand::GroupStatus;
    use blackjack_trainer::simulation::view::DealerView;
    use blackjack_trainer::simulation::{GamePhase, Rank, Suit};

    use super::*;

    fn hand(total: u8, outcome: HandOutcome) -> HandView {
        HandView {
            cards: vec![Card::new(Rank::Ten, Suit::Spade)],
            total,
            status: GroupStatus::Stood,
            outcome: Some(outcome),
        }
    }

    fn resolved_view(dealer_total: u8, hands: Vec<HandView>) -> RoundView {
        RoundView {
            phase: GamePhase::RoundResolved,
            dealer: DealerView {
                cards: vec![Some(Card::new(Rank::King, Suit::Heart))],
                total: dealer_total,
                hole_hidden: false,
            },
            hands,
            current_hand: 0,
            split_used: false,
            natural_on_deal: false,
            can_hit: false,
            can_stand: false,
            can_split: false,
            running_count: 0,
            cards_remaining: 300,
        }
    }

    #[test]
    fn single_hand_messages() {
        let cases = [
            (26, hand(16, HandOutcome::Win), "Dealer busts with 26. You win with 16!"),
            (18, hand(25, HandOutcome::Loss), "You bust! Dealer wins."),
            (20, hand(18, HandOutcome::Loss), "Dealer wins 20 vs your 18."),
            (17, hand(19, HandOutcome::Win), "You win! 19 vs dealer's 17."),
            (18, hand(18, HandOutcome::Push), "Push: both you and the dealer have 18."),
        ];
        for (dealer_total, player_hand, expected) in cases {
            let view = resolved_view(dealer_total, vec![player_hand]);
            assert_eq!(outcome_messages(&view), vec![String::from(expected)]);
        }
    }

    #[test]
    fn split_messages_are_prefixed() {
        let view = resolved_view(
            19,
            vec![hand(21, HandOutcome::Win), hand(23, HandOutcome::Loss)],
        );
        assert_eq!(
            outcome_messages(&view),
            vec![
                String::from("Hand 1: You win! 21 vs dealer's 19."),
                String::from("Hand 2: You bust! Dealer wins."),
            ]
        );
    }

    #[test]
    fn natural_has_its_own_message() {
        let mut view = resolved_view(17, vec![hand(21, HandOutcome::Win)]);
        view.natural_on_deal = true;
        assert_eq!(
            outcome_messages(&view),
            vec![String::from("Blackjack! You have 21 on the deal.")]
        );
    }

    #[test]
    fn hidden_hole_card_renders_as_question_marks() {
        let mut view = resolved_view(10, vec![hand(16, HandOutcome::Loss)]);
        view.dealer.cards.push(None);
        view.dealer.hole_hidden = true;
        let rendered = render(&view);
        assert!(rendered.starts_with("Dealer: K♥ ??  (Total showing: 10)"));
        assert!(rendered.contains("You: 10♠  (Total: 16)"));
    }
}
