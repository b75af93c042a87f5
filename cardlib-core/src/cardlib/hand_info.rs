use std::cmp::Reverse;
use std::fmt;
use std::ops::RangeInclusive;

use itertools::Itertools;
use strum_macros::EnumIter;

use crate::cardlib::cards::{Card, Rank};
use crate::cardlib::poker_tables::CLASS_COUNT;

/// The nine poker hand categories, strongest first.
#[derive(Copy, Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, EnumIter)]
#[repr(u8)]
pub enum HandGroup {
    StraightFlush = 0,
    FourOfAKind = 1,
    FullHouse = 2,
    Flush = 3,
    Straight = 4,
    ThreeOfAKind = 5,
    TwoPair = 6,
    OnePair = 7,
    NoPair = 8,
}

impl HandGroup {
    const ALL: [Self; 9] = [
        Self::StraightFlush,
        Self::FourOfAKind,
        Self::FullHouse,
        Self::Flush,
        Self::Straight,
        Self::ThreeOfAKind,
        Self::TwoPair,
        Self::OnePair,
        Self::NoPair,
    ];

    /// Highest (weakest) value in each group.
    const UPPER: [u16; 9] = [10, 166, 322, 1599, 1609, 2467, 3325, 6185, 7462];

    /// Panics if `value` is not a hand value.
    ///
    /// ```
    /// # use cardlib_core::prelude::HandGroup;
    /// assert_eq!(HandGroup::of_value(1600), HandGroup::Straight);
    /// assert_eq!(HandGroup::of_value(3325), HandGroup::TwoPair);
    /// ```
    pub fn of_value(value: u16) -> Self {
        assert!(
            value >= 1 && usize::from(value) <= CLASS_COUNT,
            "{value} is not a hand value"
        );
        let index = Self::UPPER.partition_point(|upper| *upper < value);
        Self::ALL[index]
    }

    pub fn value_range(self) -> RangeInclusive<u16> {
        let index = self as usize;
        let low = index.checked_sub(1).map_or(1, |prev| Self::UPPER[prev] + 1);
        low..=Self::UPPER[index]
    }

    /// How many ranks it takes to break ties within the group.
    pub fn significant_ranks(self) -> usize {
        const COUNTS: [usize; 9] = [1, 2, 2, 5, 1, 3, 3, 4, 5];
        COUNTS[self as usize]
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::StraightFlush => "Straight Flush",
            Self::FourOfAKind => "Four of a Kind",
            Self::FullHouse => "Full House",
            Self::Flush => "Flush",
            Self::Straight => "Straight",
            Self::ThreeOfAKind => "Three of a Kind",
            Self::TwoPair => "Two Pair",
            Self::OnePair => "One Pair",
            Self::NoPair => "No Pair",
        }
    }

    fn is_straight(self) -> bool {
        matches!(self, Self::StraightFlush | Self::Straight)
    }
}

impl fmt::Display for HandGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What a five-card hand is, and the ranks that decide it.
///
/// The cards are kept in display order: the cards forming the pattern come
/// first, highest rank first, and a five-high straight puts its ace last.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HandInfo {
    value: u16,
    group: HandGroup,
    ranks: heapless::Vec<Rank, 5>,
    cards: [Card; 5],
}

impl HandInfo {
    /// Classify five cards whose hand value is `value`.
    pub fn new(cards: &[Card], value: u16) -> Self {
        let group = HandGroup::of_value(value);
        assert_eq!(cards.len(), 5, "hand must hold exactly 5 cards");
        let mut cards = [cards[0], cards[1], cards[2], cards[3], cards[4]];
        cards.sort_unstable_by(|a, b| b.cmp(a));

        if group.is_straight() {
            if cards[0].rank() == Rank::Ace && cards[1].rank() == Rank::Five {
                cards.rotate_left(1);
            }
        } else {
            let mut counts = [0_u8; 14];
            for card in cards {
                counts[card.rank() as usize] += 1;
            }
            cards.sort_by_key(|card| Reverse(counts[card.rank() as usize]));
        }

        let ranks = cards
            .iter()
            .map(|card| card.rank())
            .dedup()
            .take(group.significant_ranks())
            .collect();
        Self {
            value,
            group,
            ranks,
            cards,
        }
    }

    pub fn value(&self) -> u16 {
        self.value
    }

    pub fn group(&self) -> HandGroup {
        self.group
    }

    /// The deciding ranks, most significant first.
    pub fn ranks(&self) -> &[Rank] {
        &self.ranks
    }

    pub fn cards(&self) -> &[Card; 5] {
        &self.cards
    }
}

impl fmt::Display for HandInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = |i: usize| self.ranks[i].name();
        let plural = |i: usize| self.ranks[i].plural();
        let listed = |from: usize| self.ranks[from..].iter().map(|rank| rank.name()).join(", ");

        match self.group {
            HandGroup::StraightFlush if self.ranks[0] == Rank::Ace => f.write_str("Royal Flush"),
            HandGroup::StraightFlush => write!(f, "{}-high Straight Flush", name(0)),
            HandGroup::FourOfAKind => write!(f, "Four {}, {}", plural(0), name(1)),
            HandGroup::FullHouse => write!(f, "{} Full of {}", plural(0), plural(1)),
            HandGroup::Flush => write!(f, "Flush, {}", listed(0)),
            HandGroup::Straight => write!(f, "{}-high Straight", name(0)),
            HandGroup::ThreeOfAKind => write!(f, "Three {}, {}", plural(0), listed(1)),
            HandGroup::TwoPair => {
                write!(f, "Two Pair, {} and {}, {}", plural(0), plural(1), name(2))
            }
            HandGroup::OnePair => write!(f, "Pair of {}, {}", plural(0), listed(1)),
            HandGroup::NoPair => write!(f, "No Pair, {}", listed(0)),
        }
    }
}
