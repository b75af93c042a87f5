use static_assertions::const_assert_eq;
use tracing::debug;

use crate::cardlib::cards::Card;
use crate::cardlib::cardset::CardSet;
use crate::cardlib::error::{Error, Result};
use crate::cardlib::random::RandomSource;
use crate::cardlib::sequence::{sort_slice, CardSequence};

/// Largest deck a [`Combiner`] accepts.
pub const MAX_DECK: usize = 54;

const TABLE_SIZE: usize = MAX_DECK + 1;
const NOT_IN_DECK: u8 = u8::MAX;

const fn pascal() -> [[u64; TABLE_SIZE]; TABLE_SIZE] {
    let mut table = [[0; TABLE_SIZE]; TABLE_SIZE];
    let mut n = 0;
    while n < TABLE_SIZE {
        table[n][0] = 1;
        let mut k = 1;
        while k <= n {
            table[n][k] = table[n - 1][k - 1] + table[n - 1][k];
            k += 1;
        }
        n += 1;
    }
    table
}

const PASCAL: [[u64; TABLE_SIZE]; TABLE_SIZE] = pascal();
static BINOMIAL: [[u64; TABLE_SIZE]; TABLE_SIZE] = PASCAL;

const_assert_eq!(PASCAL[52][5], 2_598_960);
const_assert_eq!(PASCAL[54][54], 1);

#[inline]
fn choose(n: usize, k: usize) -> u64 {
    BINOMIAL[n][k]
}

/// Number of `k`-subsets of an `n`-set, or `None` if it does not fit in a
/// `u64`.
///
/// ```
/// # use cardlib_core::prelude::binomial;
/// assert_eq!(binomial(52, 5), Some(2_598_960));
/// assert_eq!(binomial(5, 7), Some(0));
/// ```
pub fn binomial(n: u32, k: u32) -> Option<u64> {
    if k > n {
        return Some(0);
    }
    let k = k.min(n - k);
    if n as usize <= MAX_DECK {
        return Some(choose(n as usize, k as usize));
    }

    let mut acc: u128 = 1;
    for i in 1..=k {
        acc = acc * u128::from(n - k + i) / u128::from(i);
        if acc > u128::from(u64::MAX) {
            return None;
        }
    }
    u64::try_from(acc).ok()
}

/// Walks the `k`-card subsets of a deck, writing each into a hand.
///
/// Enumeration ([`next_combination`](Self::next_combination)) visits every
/// subset once in colexicographic order. Sampling
/// ([`next_random`](Self::next_random)) draws independent uniform subsets.
/// Both count down the same budget: the cap if one was given, otherwise
/// `C(n, k)`. Enumeration also ends after the last subset.
#[derive(Debug)]
pub struct Combiner<'d, 'h> {
    deck: &'d CardSequence,
    hand: &'h mut CardSequence,
    k: usize,
    map: Vec<usize>,
    pool: Vec<usize>,
    inverse: [u8; TABLE_SIZE],
    total: u64,
    rank: u64,
    remaining: u64,
    started: bool,
}

impl<'d, 'h> Combiner<'d, 'h> {
    /// Prepare to draw `k`-card hands from `deck` into `hand`.
    ///
    /// Panics if `k` is 0 or exceeds the deck, if the deck holds more than
    /// [`MAX_DECK`] cards or repeats a card, or if `hand` cannot hold `k`
    /// cards. Fails with [`Error::ReadOnly`] if `hand` is read-only.
    pub fn new(
        deck: &'d CardSequence,
        hand: &'h mut CardSequence,
        k: usize,
        cap: Option<u64>,
    ) -> Result<Self> {
        let n = deck.len();
        assert!(n <= MAX_DECK, "deck holds more than {MAX_DECK} cards");
        assert!(k >= 1 && k <= n, "subset size must be in 1..={n}");
        assert!(hand.capacity() >= k, "hand cannot hold {k} cards");
        assert!(
            CardSet::try_from_cards(deck.as_slice()).is_some(),
            "deck repeats a card"
        );
        if hand.is_read_only() {
            return Err(Error::ReadOnly);
        }

        let mut inverse = [NOT_IN_DECK; TABLE_SIZE];
        for (index, card) in deck.iter().enumerate() {
            inverse[usize::from(card.id())] = index as u8;
        }

        let total = choose(n, k);
        let remaining = cap.unwrap_or(total);
        debug!(n, k, total, remaining, "combiner ready");

        let mut combiner = Self {
            deck,
            hand,
            k,
            map: (0..k).collect(),
            pool: (0..n).collect(),
            inverse,
            total,
            rank: 0,
            remaining,
            started: false,
        };
        combiner.write_map();
        Ok(combiner)
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn remaining(&self) -> u64 {
        self.remaining
    }

    /// Colex rank of the combination most recently enumerated.
    pub fn rank(&self) -> u64 {
        self.rank
    }

    pub fn hand(&self) -> &CardSequence {
        &*self.hand
    }

    fn write_map(&mut self) {
        let cards = self.deck.as_slice();
        self.hand.load(self.map.iter().map(|index| cards[*index]));
    }

    /// Step the index map to its colex successor.
    fn advance(&mut self) {
        let n = self.deck.len();
        for i in 0..self.k {
            let limit = if i + 1 < self.k {
                self.map[i + 1] - 1
            } else {
                n - 1
            };
            if self.map[i] < limit {
                self.map[i] += 1;
                for (j, slot) in self.map[..i].iter_mut().enumerate() {
                    *slot = j;
                }
                self.rank += 1;
                return;
            }
        }
    }

    /// The next combination in colex order, or `None` once every
    /// combination (or the capped number of them) has been produced.
    pub fn next_combination(&mut self) -> Option<&CardSequence> {
        if self.remaining == 0 || (self.started && self.rank + 1 == self.total) {
            return None;
        }
        if self.started {
            self.advance();
        } else {
            self.started = true;
        }
        self.remaining -= 1;
        self.write_map();
        Some(&*self.hand)
    }

    /// A uniformly random combination, in random order.
    pub fn next_random(&mut self, rng: &mut impl RandomSource) -> Option<&CardSequence> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        rng.partial_shuffle(&mut self.pool, self.k);

        let cards = self.deck.as_slice();
        self.hand
            .load(self.pool[..self.k].iter().map(|index| cards[*index]));
        Some(&*self.hand)
    }

    /// Position at which [`next_combination`](Self::next_combination) emits
    /// the cards of `hand`, in any order. `None` if `hand` is not a
    /// `k`-subset of the deck.
    pub fn colex_rank(&self, hand: &CardSequence) -> Option<u64> {
        if hand.len() != self.k {
            return None;
        }
        let mut indices = heapless::Vec::<u8, MAX_DECK>::new();
        for card in hand {
            let index = self.index_of(*card)?;
            indices.push(index).ok()?;
        }
        sort_slice(indices.as_mut_slice());
        if indices.windows(2).any(|pair| pair[0] == pair[1]) {
            return None;
        }

        Some(
            indices
                .iter()
                .enumerate()
                .map(|(i, index)| choose(usize::from(*index), i + 1))
                .sum(),
        )
    }

    fn index_of(&self, card: Card) -> Option<u8> {
        match self.inverse[usize::from(card.id())] {
            NOT_IN_DECK => None,
            index => Some(index),
        }
    }

    /// Write the combination of colex rank `rank` into `out`, in deck order.
    ///
    /// Fails with [`Error::ReadOnly`] or [`Error::Full`] if `out` cannot take
    /// the hand, then with [`Error::BadIndex`] if `rank` is not below
    /// [`total`](Self::total).
    pub fn colex_hand_at(&self, rank: u64, out: &mut CardSequence) -> Result<()> {
        if out.is_read_only() {
            return Err(Error::ReadOnly);
        }
        if out.capacity() < self.k {
            return Err(Error::Full);
        }
        if rank >= self.total {
            return Err(Error::BadIndex);
        }

        let mut indices = heapless::Vec::<usize, MAX_DECK>::new();
        let mut rest = rank;
        let mut upper = self.deck.len() - 1;
        for i in (1..=self.k).rev() {
            let (mut lo, mut hi) = (i - 1, upper);
            while lo < hi {
                let mid = (lo + hi + 1) / 2;
                if choose(mid, i) <= rest {
                    lo = mid;
                } else {
                    hi = mid - 1;
                }
            }
            rest -= choose(lo, i);
            indices.push(lo).map_err(|_| Error::Full)?;
            upper = lo.saturating_sub(1);
        }

        let cards = self.deck.as_slice();
        out.load(indices.iter().rev().map(|index| cards[*index]));
        Ok(())
    }
}
