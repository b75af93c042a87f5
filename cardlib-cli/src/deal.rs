use anyhow::{bail, ensure, Result};
use clap::Args;
use itertools::Itertools;
use tracing::{debug, info};

use cardlib_core::prelude::{seeded, CardSequence, DeckType, Flags, PokerEvaluator, Scorer};

#[derive(Debug, Args)]
pub struct DealArgs {
    /// Seed for the shuffle; 0 seeds from the operating system
    #[arg(long = "seed", default_value = "0")]
    seed: u64,

    /// Number of players to deal to
    #[arg(short = 'p', long = "players", default_value = "2")]
    players: usize,

    /// Cards per player, from 5 to 7
    #[arg(short = 'c', long = "cards", default_value = "7", value_parser = clap::value_parser!(u8).range(5..=7))]
    cards: u8,

    /// Deck to deal from
    #[arg(long = "deck", default_value = "standard")]
    deck: DeckType,
}

pub fn run(args: &DealArgs) -> Result<()> {
    let cards = usize::from(args.cards);
    let size = args.deck.size();
    ensure!(args.players > 0, "there must be at least one player");
    ensure!(
        args.players * cards <= size,
        "the {} deck has only {size} cards",
        args.deck
    );

    let mut rng = seeded(args.seed);
    let mut deck = CardSequence::new(size);
    deck.set_flags(Flags::Unique)?;
    deck.fill(size, args.deck)?;
    deck.shuffle(&mut rng)?;
    debug!(deck = %deck, "shuffled");

    let mut results = Vec::with_capacity(args.players);
    for player in 1..=args.players {
        let mut hand = CardSequence::new(cards);
        for _ in 0..cards {
            hand.append(deck.pop()?)?;
        }
        if hand.iter().any(|card| card.is_joker()) {
            println!("Player {player}: {hand} holds a joker and sits out");
            continue;
        }

        let mut best = CardSequence::new(5);
        let value = PokerEvaluator::best5(&hand, &mut best)?;
        let info = PokerEvaluator::hand_info(&best, Some(value));
        println!("Player {player}: {hand} -> {info}");
        results.push((player, value));
    }
    info!(remaining = deck.len(), "dealt");

    let Some(winning) = results.iter().map(|(_, value)| *value).min() else {
        bail!("every hand held a joker");
    };
    let winners = results
        .iter()
        .filter(|(_, value)| *value == winning)
        .map(|(player, _)| player)
        .join(", ");
    println!("Winner: player {winners}");
    Ok(())
}

pub fn describe(text: &str) -> Result<()> {
    let mut hand = CardSequence::new(7);
    hand.set_flags(Flags::Unique)?;
    let cards = CardSequence::parse(7, text)?;
    hand.extend(&cards, None)?;
    ensure!(hand.len() >= 5, "need at least 5 cards, got {}", hand.len());
    ensure!(
        hand.iter().all(|card| !card.is_joker()),
        "jokers cannot form a poker hand"
    );

    let mut best = CardSequence::new(5);
    let value = PokerEvaluator::best5(&hand, &mut best)?;
    let info = PokerEvaluator::hand_info(&best, Some(value));
    println!("{}: {info}", info.group());
    println!("  best five: {}", best.text(40).unwrap_or_default());
    println!("  value:     {value}");
    println!("  blackjack: {}", Scorer::blackjack_total(&hand));
    Ok(())
}
