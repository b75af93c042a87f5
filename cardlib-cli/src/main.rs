mod deal;
mod enumerate;
mod stats;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(version, about, long_about = None, propagate_version = true)]
struct Cli {
    /// Log more (-v info, -vv debug, -vvv trace); RUST_LOG takes precedence
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: CliCommands,
}

#[derive(Debug, Subcommand)]
enum CliCommands {
    /// Generate statistics
    Stats {
        #[command(subcommand)]
        command: stats::CliCommands,
    },
    /// Evaluate every hand that can be drawn from a deck
    Enumerate(enumerate::EnumerateArgs),
    /// Shuffle a deck, deal hands and show the winner
    Deal(deal::DealArgs),
    /// Describe the best poker hand within 5 to 7 cards, e.g. "As Kd Qh Jc Td"
    Describe {
        cards: String,
    },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match &cli.command {
        CliCommands::Stats { command } => stats::run(command),
        CliCommands::Enumerate(args) => enumerate::run(args),
        CliCommands::Deal(args) => deal::run(args),
        CliCommands::Describe { cards } => deal::describe(cards),
    }
}
