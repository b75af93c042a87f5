use std::cell::RefCell;
use std::collections::HashMap;

use anyhow::Result;
use clap::Subcommand;
use itertools::Itertools;
use rand::prelude::*;
use rayon::prelude::*;
use strum::IntoEnumIterator;

use cardlib_core::prelude::{CardSequence, DeckType, HandGroup, PokerEvaluator};

#[derive(Debug, Subcommand)]
pub enum CliCommands {
    /// Estimate how often each poker hand comes up in 5- and 7-card draws
    HandStats {
        /// Run on a single thread (for profiling)
        #[arg(long = "single-threaded", default_value = "false")]
        single_threaded: bool,

        /// Perform this many iterations, in tens of thousands
        #[arg(short = 'i', long = "iterations", default_value = "100")]
        iterations: usize,
    },
}

type GroupCounts = HashMap<HandGroup, usize>;

fn merge(mut left: GroupCounts, right: GroupCounts) -> GroupCounts {
    for (group, count) in right {
        *left.entry(group).or_insert(0) += count;
    }
    left
}

#[allow(clippy::cast_precision_loss)]
fn generate_hand_stats<G>(
    single_threaded: bool,
    iterations: usize,
    generate_hand: G,
) -> Result<HashMap<HandGroup, f32>>
where
    G: Fn() -> Result<HandGroup> + std::marker::Sync,
{
    let count = |mut map: GroupCounts, group: Result<HandGroup>| -> Result<GroupCounts> {
        *map.entry(group?).or_insert(0) += 1;
        Ok(map)
    };

    let group_map: GroupCounts = if single_threaded {
        (0..iterations)
            .map(|_| generate_hand())
            .try_fold(HashMap::new(), count)?
    } else {
        (0..iterations)
            .into_par_iter()
            .map(|_| generate_hand())
            .try_fold(HashMap::new, count)
            .try_reduce(HashMap::new, |left, right| Ok(merge(left, right)))?
    };

    let total = group_map.values().sum::<usize>() as f32;

    Ok(group_map
        .into_iter()
        .map(|(group, count)| (group, (count as f32) / total))
        .collect())
}

fn print_group_stats(stats: &HashMap<HandGroup, f32>) {
    let name_columns = HandGroup::iter()
        .map(|group| group.name().len())
        .max()
        .unwrap_or_default();
    for (group, frequency) in stats.iter().sorted_by_key(|(group, _)| **group) {
        println!(
            " - {:name_width$} {:>8.4}%",
            group.name(),
            frequency * 100.0,
            name_width = name_columns
        );
    }
}

fn draw_stats(single_threaded: bool, iterations: usize, cards: usize) -> Result<()> {
    thread_local! {
        static RNG: RefCell<SmallRng> = RefCell::new(SmallRng::from_entropy());
    }

    let generate_hand = || -> Result<HandGroup> {
        let mut deck = CardSequence::new(52);
        deck.fill(52, DeckType::Standard)?;
        let mut hand = CardSequence::new(cards);
        RNG.with_borrow_mut(|rng| -> Result<()> {
            for _ in 0..cards {
                hand.append(deck.pop_random(rng)?)?;
            }
            Ok(())
        })?;

        let value = if cards == 5 {
            PokerEvaluator::eval5(&hand)
        } else {
            PokerEvaluator::eval7(&hand)
        };
        Ok(HandGroup::of_value(value))
    };

    let stats = generate_hand_stats(single_threaded, iterations, generate_hand)?;

    println!("When drawing {cards} cards from a shuffled 52-card standard deck, the frequencies of each best hand are:");
    print_group_stats(&stats);
    Ok(())
}

fn hand_stats(single_threaded: bool, iterations: usize) -> Result<()> {
    draw_stats(single_threaded, iterations, 5)?;
    draw_stats(single_threaded, iterations, 7)
}

pub fn run(command: &CliCommands) -> Result<()> {
    match command {
        CliCommands::HandStats {
            single_threaded,
            iterations,
        } => hand_stats(*single_threaded, *iterations * 10_000),
    }
}
