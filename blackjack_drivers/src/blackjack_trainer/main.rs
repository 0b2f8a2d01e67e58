mod advise;
mod drill;
mod play;

use std::path::PathBuf;
use std::process::ExitCode;

use blackjack_trainer::{Rule, Session};
use blackjack_trainer_drivers::load_config;
use clap::{Parser, Subcommand};

type BoxErr = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Parser)]
#[command(author, about, long_about = None)]
struct CommandLineArgs {
    /// The path of the config file. Defaults to ~/.blackjack_trainer.yml
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Subcommand)]
enum Mode {
    /// Ask basic strategy what to do with a hand
    Advise(advise::AdviseArgs),
    /// Hi-Lo counting drill
    Count,
    /// Play rounds against the dealer
    Play,
}

fn main() -> ExitCode {
    let args = CommandLineArgs::parse();

    let config = match load_config(args.config.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("error: {}", err);
            return ExitCode::FAILURE;
        }
    };
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.trainer.log_level.as_str()),
    )
    .init();
    log::debug!("{:?}", config);

    match run(args.mode, config.rule.try_into()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{}", err);
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(mode: Mode, rule: Result<Rule, blackjack_trainer::RuleError>) -> Result<(), BoxErr> {
    let rule = rule?;
    match mode {
        Mode::Advise(advise_args) => advise::run(&advise_args),
        Mode::Count => drill::run(Session::new(&rule)?),
        Mode::Play => play::run(Session::new(&rule)?),
    }
}
