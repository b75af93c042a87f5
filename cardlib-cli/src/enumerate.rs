use std::collections::HashMap;
use std::time::Instant;

use anyhow::{ensure, Result};
use clap::Args;
use strum::IntoEnumIterator;
use tracing::info;

use cardlib_core::prelude::{CardSequence, Combiner, DeckType, HandGroup, PokerEvaluator};

#[derive(Debug, Args)]
pub struct EnumerateArgs {
    /// Hand size, from 5 to 7
    #[arg(short = 'k', long = "hand-size", default_value = "5", value_parser = clap::value_parser!(u8).range(5..=7))]
    hand_size: u8,

    /// Deck to draw from (standard, stripped32, stripped40, pinochle)
    #[arg(long = "deck", default_value = "standard")]
    deck: DeckType,
}

#[allow(clippy::cast_precision_loss)]
pub fn run(args: &EnumerateArgs) -> Result<()> {
    let k = usize::from(args.hand_size);
    let deck = args.deck.deck();
    ensure!(
        deck.iter().all(|card| !card.is_joker()),
        "the {} deck holds jokers, which poker hands cannot use",
        args.deck
    );

    let mut hand = CardSequence::new(k);
    let mut best = CardSequence::new(5);
    let mut combiner = Combiner::new(&deck, &mut hand, k, None)?;
    info!(deck = %args.deck, k, total = combiner.total(), "enumerating hands");

    let start = Instant::now();
    let mut counts: HashMap<HandGroup, u64> = HashMap::new();
    while let Some(hand) = combiner.next_combination() {
        let value = match k {
            5 => PokerEvaluator::eval5(hand),
            7 => PokerEvaluator::eval7(hand),
            _ => PokerEvaluator::best5(hand, &mut best)?,
        };
        *counts.entry(HandGroup::of_value(value)).or_insert(0) += 1;
    }
    let elapsed = start.elapsed();

    let total = combiner.total();
    println!(
        "{total} hands of {k} cards from the {} deck ({:.2?}):",
        args.deck, elapsed
    );
    for group in HandGroup::iter() {
        let count = counts.get(&group).copied().unwrap_or_default();
        println!(
            " - {:16} {count:>12} {:>9.4}%",
            group.name(),
            count as f64 * 100.0 / total as f64
        );
    }
    Ok(())
}
