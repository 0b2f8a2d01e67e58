use std::io::{self, BufRead, Write};

use blackjack_trainer::counting::format_count;
use blackjack_trainer::Session;

use crate::BoxErr;

const HELP: &str = "Enter: next card, c: show count, <number>: guess, r: restart, q: quit";

pub fn run(mut session: Session) -> Result<(), BoxErr> {
    println!("Hi-Lo counting drill. {}", HELP);
    session.start_drill();
    prompt(&session)?;

    for line in io::stdin().lock().lines() {
        let line = line?;
        let input = line.trim();
        match input {
            "q" => break,
            "r" => {
                session.start_drill();
                println!("New drill started.");
            }
            "" => match session.drill_mut().and_then(|drill| drill.next_card()) {
                Some(card) => println!("{}", card),
                None => println!("No more cards. Enter your guess for the running count."),
            },
            "c" => {
                if let Some(drill) = session.drill() {
                    println!("Running count: {}", format_count(drill.running_count()));
                }
            }
            guess => {
                if let Some(drill) = session.drill() {
                    if !drill.is_finished() {
                        log::debug!(
                            "guess made after {} of {} cards",
                            drill.cards_shown(),
                            drill.len()
                        );
                    }
                    println!("{}", drill.check_guess(guess));
                }
            }
        }
        prompt(&session)?;
    }
    Ok(())
}

fn prompt(session: &Session) -> io::Result<()> {
    if let Some(drill) = session.drill() {
        if drill.is_finished() {
            print!("[{}/{}] guess> ", drill.cards_shown(), drill.len());
        } else {
            print!("[{}/{}]> ", drill.cards_shown(), drill.len());
        }
    }
    io::stdout().flush()
}
