//! Construction of the lookup chain behind the poker evaluator.
//!
//! A hand is folded into the chain one card at a time. Every prefix is
//! reduced to a [`Partial`]: its sorted ranks plus the one suit all of its
//! cards share, if any. That is everything the final value depends on, so
//! the chain does not care about the order cards arrive in, and the number
//! of distinct prefixes stays small enough to tabulate outright.
//!
//! Each stage table holds one row of [`STRIDE`] entries per prefix state,
//! indexed by the next card. Entries are the row offset of the following
//! state, and the last stage stores the hand value instead.

use std::collections::HashMap;

use itertools::Itertools;
use slab::Slab;
use tracing::debug;

use crate::cardlib::cards::Card;

/// Row width of every stage table: one entry per suited card.
pub(crate) const STRIDE: usize = 52;

/// Number of distinct 5-card hand values.
pub(crate) const CLASS_COUNT: usize = 7462;

#[derive(Clone, Debug, Hash, PartialEq, Eq)]
struct Partial {
    ranks: heapless::Vec<u8, 5>,
    suit: Option<u8>,
}

impl Partial {
    fn of(card: Card) -> Self {
        let mut ranks = heapless::Vec::new();
        ranks.push(card.rank() as u8).ok();
        Self {
            ranks,
            suit: card.suit().map(|suit| suit as u8),
        }
    }

    fn with(&self, card: Card) -> Self {
        let rank = card.rank() as u8;
        let mut ranks = self.ranks.clone();
        let at = ranks.iter().position(|r| *r > rank).unwrap_or(ranks.len());
        ranks.insert(at, rank).ok();
        let suit = card.suit().map(|suit| suit as u8);
        Self {
            ranks,
            suit: if self.suit == suit { suit } else { None },
        }
    }

    fn class(&self) -> Option<([u8; 5], bool)> {
        let ranks = self.ranks.as_slice().try_into().ok()?;
        Some((ranks, self.suit.is_some()))
    }
}

/// Comparable strength of a 5-card rank pattern, or `None` if no real hand
/// has that pattern. `ranks` must be ascending.
///
/// The category sits above bit 20 (8 for a straight flush down to 0 for no
/// pair); below it the tiebreaking ranks take four bits each, most
/// significant first.
fn strength(ranks: [u8; 5], flush: bool) -> Option<u32> {
    let mut counts = [0_u8; 13];
    for rank in ranks {
        counts[usize::from(rank)] += 1;
    }
    let mut groups: heapless::Vec<(u8, u8), 5> = (0..13_u8)
        .rev()
        .filter(|rank| counts[usize::from(*rank)] > 0)
        .map(|rank| (counts[usize::from(rank)], rank))
        .collect();
    groups.sort_by(|a, b| b.0.cmp(&a.0));

    let (top, next) = (groups[0].0, groups.get(1).map(|group| group.0));
    if top == 5 || (flush && groups.len() < 5) {
        return None;
    }

    let straight_high = match ranks {
        _ if groups.len() < 5 => None,
        [0, 1, 2, 3, 12] => Some(3),
        [low, .., high] if high - low == 4 => Some(high),
        _ => None,
    };

    let category = match (straight_high, flush, top, next) {
        (Some(_), true, ..) => 8,
        (_, _, 4, _) => 7,
        (_, _, 3, Some(2)) => 6,
        (None, true, ..) => 5,
        (Some(_), false, ..) => 4,
        (_, _, 3, _) => 3,
        (_, _, 2, Some(2)) => 2,
        (_, _, 2, _) => 1,
        _ => 0,
    };

    let tiebreak: heapless::Vec<u8, 5> = match straight_high {
        Some(high) => [high].into_iter().collect(),
        _ => groups.iter().map(|group| group.1).collect(),
    };
    Some(
        tiebreak
            .iter()
            .enumerate()
            .fold(category << 20, |key, (i, rank)| {
                key | (u32::from(*rank) << (16 - 4 * i))
            }),
    )
}

/// Value of every possible 5-card class, numbered from 1 for the strongest.
fn class_values() -> HashMap<([u8; 5], bool), u16> {
    let mut classes: Vec<_> = (0..13_u8)
        .combinations_with_replacement(5)
        .cartesian_product([false, true])
        .filter_map(|(ranks, flush)| {
            let ranks: [u8; 5] = ranks.try_into().ok()?;
            strength(ranks, flush).map(|key| (key, ranks, flush))
        })
        .collect();
    classes.sort_unstable_by(|a, b| b.0.cmp(&a.0));
    debug_assert_eq!(classes.len(), CLASS_COUNT);

    classes
        .into_iter()
        .enumerate()
        .map(|(i, (_, ranks, flush))| ((ranks, flush), i as u16 + 1))
        .collect()
}

/// Dense numbering of the partial hands seen at one stage.
#[derive(Default)]
struct Interner {
    states: Slab<Partial>,
    ids: HashMap<Partial, usize>,
}

impl Interner {
    fn intern(&mut self, partial: Partial) -> usize {
        if let Some(id) = self.ids.get(&partial) {
            return *id;
        }
        let id = self.states.insert(partial.clone());
        self.ids.insert(partial, id);
        id
    }

    fn len(&self) -> usize {
        self.states.len()
    }

    /// Extend every state by every card, recording where each lands.
    fn next_stage<T>(&self, mut entry: impl FnMut(Partial) -> T) -> Vec<T> {
        let mut table = Vec::with_capacity(self.len() * STRIDE);
        for (_, partial) in &self.states {
            for id in 1..=52 {
                table.push(entry(partial.with(Card::new(id))));
            }
        }
        table
    }

    fn offsets(&self, next: &mut Self) -> Vec<u32> {
        self.next_stage(|partial| (next.intern(partial) * STRIDE) as u32)
    }
}

pub(crate) struct Tables {
    pub(crate) pairs: Vec<u32>,
    pub(crate) triples: Vec<u32>,
    pub(crate) quads: Vec<u32>,
    pub(crate) values: Vec<u16>,
}

pub(crate) fn build() -> Tables {
    let classes = class_values();

    let mut singles = Interner::default();
    for id in 1..=52 {
        singles.intern(Partial::of(Card::new(id)));
    }
    let mut doubles = Interner::default();
    let mut trebles = Interner::default();
    let mut fours = Interner::default();

    let pairs = singles.offsets(&mut doubles);
    let triples = doubles.offsets(&mut trebles);
    let quads = trebles.offsets(&mut fours);
    let values = fours.next_stage(|partial| {
        partial
            .class()
            .and_then(|class| classes.get(&class).copied())
            .unwrap_or(0)
    });

    debug!(
        classes = classes.len(),
        two_card = doubles.len(),
        three_card = trebles.len(),
        four_card = fours.len(),
        "built poker lookup tables"
    );
    Tables {
        pairs,
        triples,
        quads,
        values,
    }
}
