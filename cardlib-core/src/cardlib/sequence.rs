use std::fmt;
use std::hash::{Hash, Hasher};

use bitflags::bitflags;
use tracing::trace;

use crate::cardlib::cards::{parse_cards, Card};
use crate::cardlib::cardset::CardSet;
use crate::cardlib::decks::DeckType;
use crate::cardlib::error::{Error, Result};
use crate::cardlib::random::RandomSource;

bitflags! {
    /// Persistent policy of a [`CardSequence`].
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
    pub struct Flags: u8 {
        /// Reject every mutation except clearing this flag
        const ReadOnly = 0b01;
        /// Reject duplicate cards, tracked with a presence mask
        const Unique   = 0b10;
    }
}

/// A bounded, ordered sequence of cards.
///
/// Storage is allocated once, at construction, and never grows: every
/// operation that would exceed the capacity fails with [`Error::Full`].
/// When [`Flags::Unique`] is set the sequence keeps a [`CardSet`] equal to
/// the union of its cards, and mutations that would introduce a duplicate
/// fail with [`Error::Duplicate`] without changing anything.
#[derive(Debug)]
pub struct CardSequence {
    cards: Vec<Card>,
    capacity: usize,
    flags: Flags,
    sorted: bool,
    mask: CardSet,
}

impl CardSequence {
    pub fn new(capacity: usize) -> Self {
        Self {
            cards: Vec::with_capacity(capacity),
            capacity,
            flags: Flags::empty(),
            sorted: false,
            mask: CardSet::empty(),
        }
    }

    /// A sequence exactly as large as `cards`, holding them.
    pub fn from_cards(cards: &[Card]) -> Self {
        let mut sequence = Self::new(cards.len());
        sequence.cards.extend_from_slice(cards);
        sequence
    }

    /// Parse card text into a new sequence of the given capacity.
    ///
    /// ```
    /// # use cardlib_core::prelude::CardSequence;
    /// let hand = CardSequence::parse(5, "3s Ad Jc 7d 10s").unwrap();
    /// assert_eq!(hand.to_string(), "(3s Ad Jc 7d Ts)");
    /// ```
    pub fn parse(capacity: usize, text: &str) -> Result<Self> {
        let cards = parse_cards(text)?;
        if cards.len() > capacity {
            return Err(Error::Full);
        }
        let mut sequence = Self::new(capacity);
        sequence.cards.extend_from_slice(&cards);
        Ok(sequence)
    }

    /// Convert a series of shorthand identifiers into a sequence.
    /// Panics if the input is incorrect. This exists only for test-writing.
    pub fn from_idents(idents: &str) -> Self {
        Self::from_cards(&parse_cards(idents).unwrap())
    }

    /// The same sequence, locked against mutation.
    pub fn frozen(mut self) -> Self {
        self.flags |= Flags::ReadOnly;
        self
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn flags(&self) -> Flags {
        self.flags
    }

    pub fn is_read_only(&self) -> bool {
        self.flags.contains(Flags::ReadOnly)
    }

    pub fn is_unique(&self) -> bool {
        self.flags.contains(Flags::Unique)
    }

    /// Whether the last mutation was a [`sort`](Self::sort).
    pub fn is_sorted(&self) -> bool {
        self.sorted
    }

    /// The presence mask; always empty unless the sequence is unique.
    pub fn mask(&self) -> CardSet {
        self.mask
    }

    pub fn as_slice(&self) -> &[Card] {
        &self.cards
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Card> {
        self.cards.iter()
    }

    /// Turn flags on. A read-only sequence may only (re)set
    /// [`Flags::ReadOnly`]. Turning on [`Flags::Unique`] fails with
    /// [`Error::Duplicate`] if the current contents repeat a card.
    pub fn set_flags(&mut self, flags: Flags) -> Result<()> {
        self.check_flag_change(flags)?;
        if flags.contains(Flags::Unique) && !self.is_unique() {
            self.mask = CardSet::try_from_cards(&self.cards).ok_or(Error::Duplicate)?;
        }
        self.flags |= flags;
        Ok(())
    }

    pub fn clear_flags(&mut self, flags: Flags) -> Result<()> {
        self.check_flag_change(flags)?;
        self.flags.remove(flags);
        if !self.is_unique() {
            self.mask = CardSet::empty();
        }
        Ok(())
    }

    fn check_flag_change(&self, flags: Flags) -> Result<()> {
        if self.is_read_only() && !Flags::ReadOnly.contains(flags) {
            Err(Error::ReadOnly)
        } else {
            Ok(())
        }
    }

    fn check_writable(&self) -> Result<()> {
        if self.is_read_only() {
            Err(Error::ReadOnly)
        } else {
            Ok(())
        }
    }

    fn rebuild_mask(&mut self) {
        self.mask = if self.is_unique() {
            self.cards.iter().copied().collect()
        } else {
            CardSet::empty()
        };
    }

    pub fn clear(&mut self) -> Result<()> {
        self.check_writable()?;
        self.cards.clear();
        self.mask = CardSet::empty();
        self.sorted = false;
        Ok(())
    }

    pub fn get(&self, index: usize) -> Result<Card> {
        self.cards.get(index).copied().ok_or(Error::BadIndex)
    }

    /// Replace the card at `index`, returning the card it held.
    pub fn set(&mut self, index: usize, card: Card) -> Result<Card> {
        self.check_writable()?;
        let old = self.get(index)?;
        if old == card {
            return Ok(old);
        }
        if self.is_unique() {
            if self.mask.contains(card) {
                return Err(Error::Duplicate);
            }
            self.mask.remove(old);
            self.mask.insert(card);
        }
        self.cards[index] = card;
        self.sorted = false;
        Ok(old)
    }

    pub fn append(&mut self, card: Card) -> Result<()> {
        self.check_writable()?;
        if self.cards.len() == self.capacity {
            return Err(Error::Full);
        }
        if self.is_unique() && !self.mask.insert(card) {
            return Err(Error::Duplicate);
        }
        self.cards.push(card);
        self.sorted = false;
        Ok(())
    }

    /// Append the first `count` cards of `other` (all of them for `None`).
    /// Either the whole batch is appended or nothing is. Returns the number of
    /// cards added.
    pub fn extend(&mut self, other: &Self, count: Option<usize>) -> Result<usize> {
        self.check_writable()?;
        let count = count.map_or(other.len(), |count| count.min(other.len()));
        if count > self.capacity - self.cards.len() {
            return Err(Error::Full);
        }
        let batch = &other.cards[..count];
        if self.is_unique() {
            let mut mask = self.mask;
            if !batch.iter().all(|card| mask.insert(*card)) {
                return Err(Error::Duplicate);
            }
            self.mask = mask;
        }
        self.cards.extend_from_slice(batch);
        self.sorted = false;
        Ok(count)
    }

    /// Insert `card` before position `index`; `index == len()` appends.
    pub fn insert(&mut self, index: usize, card: Card) -> Result<()> {
        self.check_writable()?;
        if self.cards.len() == self.capacity {
            return Err(Error::Full);
        }
        if index > self.cards.len() {
            return Err(Error::BadIndex);
        }
        if self.is_unique() && !self.mask.insert(card) {
            return Err(Error::Duplicate);
        }
        self.cards.insert(index, card);
        self.sorted = false;
        Ok(())
    }

    pub fn pop(&mut self) -> Result<Card> {
        self.check_writable()?;
        let card = self.cards.pop().ok_or(Error::BadIndex)?;
        self.mask.remove(card);
        self.sorted = false;
        Ok(card)
    }

    /// Remove a uniformly chosen card in O(1); the last card takes its place.
    pub fn pop_random(&mut self, rng: &mut impl RandomSource) -> Result<Card> {
        self.check_writable()?;
        if self.cards.is_empty() {
            return Err(Error::BadIndex);
        }
        let card = self.cards.swap_remove(rng.uniform(self.cards.len()));
        self.mask.remove(card);
        self.sorted = false;
        Ok(card)
    }

    /// Remove and return the card at `index`, shifting later cards down.
    pub fn delete(&mut self, index: usize) -> Result<Card> {
        self.check_writable()?;
        if index >= self.cards.len() {
            return Err(Error::BadIndex);
        }
        let card = self.cards.remove(index);
        self.mask.remove(card);
        self.sorted = false;
        Ok(card)
    }

    /// Position of the first occurrence of `card`.
    pub fn index(&self, card: Card) -> Option<usize> {
        if self.is_unique() && !self.mask.contains(card) {
            return None;
        }
        self.cards.iter().position(|c| *c == card)
    }

    pub fn contains(&self, card: Card) -> bool {
        self.index(card).is_some()
    }

    /// Remove the first occurrence of `card`, returning where it was. An
    /// absent card is not an error.
    pub fn remove(&mut self, card: Card) -> Result<Option<usize>> {
        self.check_writable()?;
        match self.index(card) {
            Some(index) => self.delete(index).map(|_| Some(index)),
            None => Ok(None),
        }
    }

    /// Keep only the first `len` cards.
    pub fn truncate(&mut self, len: usize) -> Result<()> {
        self.check_writable()?;
        if len > self.cards.len() {
            return Err(Error::BadIndex);
        }
        if len < self.cards.len() {
            self.cards.truncate(len);
            self.rebuild_mask();
            self.sorted = false;
        }
        Ok(())
    }

    /// Overwrite this sequence with the contents of `other`.
    pub fn copy_from(&mut self, other: &Self) -> Result<()> {
        self.check_writable()?;
        if other.len() > self.capacity {
            return Err(Error::Full);
        }
        if self.is_unique() {
            self.mask = CardSet::try_from_cards(&other.cards).ok_or(Error::Duplicate)?;
        }
        self.cards.clear();
        self.cards.extend_from_slice(&other.cards);
        self.sorted = false;
        Ok(())
    }

    /// Replace the contents without policy checks. Callers hold the sequence
    /// exclusively and have already verified it is writable and large enough.
    pub(crate) fn load(&mut self, cards: impl Iterator<Item = Card>) {
        self.cards.clear();
        self.cards.extend(cards);
        debug_assert!(self.cards.len() <= self.capacity);
        self.rebuild_mask();
        self.sorted = false;
    }

    /// Replace the contents with `count` cards dealt in order from the
    /// catalog deck, starting over when the deck runs out, so a large
    /// capacity can hold a multi-deck shoe.
    pub fn fill(&mut self, count: usize, deck_type: DeckType) -> Result<usize> {
        self.check_writable()?;
        if count > self.capacity {
            return Err(Error::Full);
        }
        let source = deck_type.cards();
        if self.is_unique() && count > source.len() {
            return Err(Error::Duplicate);
        }
        self.load(source.iter().copied().cycle().take(count));
        trace!(%deck_type, count, "filled sequence");
        Ok(count)
    }

    /// Unbiased Fisher-Yates shuffle of the whole sequence.
    pub fn shuffle(&mut self, rng: &mut impl RandomSource) -> Result<()> {
        self.check_writable()?;
        rng.shuffle(&mut self.cards);
        self.sorted = false;
        Ok(())
    }

    /// Sort ascending by card identity.
    pub fn sort(&mut self) -> Result<()> {
        self.check_writable()?;
        sort_slice(&mut self.cards);
        self.sorted = true;
        Ok(())
    }

    pub fn reverse(&mut self) -> Result<()> {
        self.check_writable()?;
        let len = self.cards.len();
        for i in 0..len / 2 {
            self.cards.swap(i, len - 1 - i);
        }
        self.sorted = false;
        Ok(())
    }

    /// 32-bit FNV-1a. Unique sequences hash their mask, so the value ignores
    /// order exactly as equality does; others hash the cards in order.
    pub fn fnv_hash(&self) -> u32 {
        const OFFSET_BASIS: u32 = 2_166_136_261;
        const PRIME: u32 = 16_777_619;

        let fold = |hash: u32, byte: u8| (hash ^ u32::from(byte)).wrapping_mul(PRIME);
        if self.is_unique() {
            self.mask.bits().to_le_bytes()[..7]
                .iter()
                .fold(OFFSET_BASIS, |hash, byte| fold(hash, *byte))
        } else {
            self.cards
                .iter()
                .fold(OFFSET_BASIS, |hash, card| fold(hash, card.id()))
        }
    }

    /// Render within `width` characters, eliding middle cards as `...` when
    /// they do not fit. The last card is always shown. Returns `None` when
    /// `width` cannot hold even the clipped form.
    ///
    /// ```
    /// # use cardlib_core::prelude::CardSequence;
    /// let hand = CardSequence::from_idents("As Kd Qh Jc Td");
    /// assert_eq!(hand.text(20).as_deref(), Some("(As Kd Qh Jc Td)"));
    /// assert_eq!(hand.text(9).as_deref(), Some("(As...Td)"));
    /// ```
    pub fn text(&self, width: usize) -> Option<String> {
        const MIN_WIDTH: [usize; 3] = [2, 4, 7];

        let len = self.cards.len();
        let min_width = MIN_WIDTH.get(len).copied().unwrap_or(9);
        if width < min_width {
            return None;
        }
        let clip_at = if width < 3 * len + 1 {
            (width - 6) / 3
        } else {
            len + 1
        };

        let mut text = String::with_capacity(width);
        text.push('(');
        for (i, card) in self.cards.iter().enumerate() {
            let last = i + 1 == len;
            if i >= clip_at {
                if !last {
                    continue;
                }
                text.push_str("...");
            } else if i != 0 {
                text.push(' ');
            }
            text.push_str(card.name());
        }
        text.push(')');
        Some(text)
    }
}

#[macro_export]
macro_rules! cards {
    ($ident:literal) => {
        $crate::cardlib::sequence::CardSequence::from_idents($ident)
    };
}

impl Clone for CardSequence {
    fn clone(&self) -> Self {
        let mut cards = Vec::with_capacity(self.capacity);
        cards.extend_from_slice(&self.cards);
        Self {
            cards,
            capacity: self.capacity,
            flags: self.flags,
            sorted: self.sorted,
            mask: self.mask,
        }
    }
}

/// Two unique sequences are equal when they hold the same cards in any
/// order; two sequences without the flag must match in length and order. A
/// unique sequence never equals one without the flag, so equal sequences
/// always agree on [`fnv_hash`](CardSequence::fnv_hash).
impl PartialEq for CardSequence {
    fn eq(&self, other: &Self) -> bool {
        match (self.is_unique(), other.is_unique()) {
            (true, true) => self.mask == other.mask,
            (false, false) => self.cards == other.cards,
            _ => false,
        }
    }
}

impl Eq for CardSequence {}

impl Hash for CardSequence {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u32(self.fnv_hash());
    }
}

impl fmt::Display for CardSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, card) in self.cards.iter().enumerate() {
            if i != 0 {
                f.write_str(" ")?;
            }
            f.write_str(card.name())?;
        }
        f.write_str(")")
    }
}

impl AsRef<[Card]> for CardSequence {
    fn as_ref(&self) -> &[Card] {
        &self.cards
    }
}

impl<'a> IntoIterator for &'a CardSequence {
    type Item = &'a Card;
    type IntoIter = std::slice::Iter<'a, Card>;

    fn into_iter(self) -> Self::IntoIter {
        self.cards.iter()
    }
}

/// Ascending sort. Small inputs, the common case for hands, go through
/// optimal sorting networks; anything longer is heapsorted in place.
pub(crate) fn sort_slice<T: Ord>(items: &mut [T]) {
    const NETWORK_2: &[(usize, usize)] = &[(0, 1)];
    const NETWORK_3: &[(usize, usize)] = &[(1, 2), (0, 2), (0, 1)];
    const NETWORK_4: &[(usize, usize)] = &[(0, 1), (2, 3), (0, 2), (1, 3), (1, 2)];
    #[rustfmt::skip]
    const NETWORK_5: &[(usize, usize)] = &[
        (0, 1), (3, 4), (2, 4), (2, 3), (0, 3), (0, 2), (1, 4), (1, 3), (1, 2),
    ];

    let network = match items.len() {
        0 | 1 => return,
        2 => NETWORK_2,
        3 => NETWORK_3,
        4 => NETWORK_4,
        5 => NETWORK_5,
        _ => return heapsort(items),
    };
    for &(a, b) in network {
        if items[a] > items[b] {
            items.swap(a, b);
        }
    }
}

fn heapsort<T: Ord>(items: &mut [T]) {
    let len = items.len();
    for start in (0..len / 2).rev() {
        sift_down(items, start, len);
    }
    for end in (1..len).rev() {
        items.swap(0, end);
        sift_down(items, 0, end);
    }
}

fn sift_down<T: Ord>(items: &mut [T], mut root: usize, end: usize) {
    loop {
        let mut child = 2 * root + 1;
        if child >= end {
            break;
        }
        if child + 1 < end && items[child] < items[child + 1] {
            child += 1;
        }
        if items[root] >= items[child] {
            break;
        }
        items.swap(root, child);
        root = child;
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    use super::*;
    use crate::card;
    use crate::cardlib::random::RandomSource;

    fn unique(capacity: usize) -> CardSequence {
        let mut sequence = CardSequence::new(capacity);
        sequence.set_flags(Flags::Unique).unwrap();
        sequence
    }

    fn expected_mask(sequence: &CardSequence) -> u64 {
        sequence
            .iter()
            .fold(0, |mask, card| mask | (1 << (card.id() - 1)))
    }

    #[test]
    fn append_and_render_test() {
        let mut hand = CardSequence::new(5);
        for card in ["3s", "Ad", "Jc", "7d", "10s"] {
            hand.append(card.parse().unwrap()).unwrap();
        }
        assert_eq!(hand.to_string(), "(3s Ad Jc 7d Ts)");
        assert_eq!(hand.append(card!("2c")), Err(Error::Full));
        assert_eq!(hand.len(), 5);
    }

    #[test]
    fn duplicate_append_test() {
        let mut hand = unique(10);
        hand.append(card!("Qh")).unwrap();
        hand.append(card!("2c")).unwrap();
        let mask = hand.mask();

        assert_eq!(hand.append(card!("Qh")), Err(Error::Duplicate));
        assert_eq!(hand.len(), 2);
        assert_eq!(hand.mask(), mask);
        assert_eq!(hand.mask().bits(), expected_mask(&hand));
    }

    #[test]
    fn read_only_test() {
        let mut hand = CardSequence::from_idents("8c 2s 9c 2c As");
        hand.set_flags(Flags::ReadOnly).unwrap();

        assert_eq!(hand.append(card!("Kd")), Err(Error::ReadOnly));
        assert_eq!(hand.set(0, card!("Kd")), Err(Error::ReadOnly));
        assert_eq!(hand.truncate(3), Err(Error::ReadOnly));
        assert_eq!(hand.sort(), Err(Error::ReadOnly));
        assert_eq!(hand.remove(card!("As")), Err(Error::ReadOnly));
        assert_eq!(hand.set_flags(Flags::Unique), Err(Error::ReadOnly));
        assert_eq!(hand.get(4), Ok(card!("As")));

        hand.clear_flags(Flags::ReadOnly).unwrap();
        hand.truncate(3).unwrap();
        assert_eq!(hand, CardSequence::from_idents("8c 2s 9c"));
    }

    #[test]
    fn unique_flag_requires_distinct_cards_test() {
        let mut hand = CardSequence::from_idents("8c 2s 8c");
        assert_eq!(hand.set_flags(Flags::Unique), Err(Error::Duplicate));
        assert!(!hand.is_unique());

        hand.delete(2).unwrap();
        hand.set_flags(Flags::Unique).unwrap();
        assert_eq!(hand.mask().bits(), expected_mask(&hand));

        hand.clear_flags(Flags::Unique).unwrap();
        assert_eq!(hand.mask(), CardSet::empty());
    }

    #[test]
    fn get_set_test() {
        let mut hand = unique(5);
        hand.extend(&CardSequence::from_idents("Ac Kc Qc"), None)
            .unwrap();

        assert_eq!(hand.get(3), Err(Error::BadIndex));
        assert_eq!(hand.set(3, card!("2d")), Err(Error::BadIndex));
        assert_eq!(hand.set(0, card!("Kc")), Err(Error::Duplicate));
        assert_eq!(hand.set(0, card!("Ac")), Ok(card!("Ac")));
        assert_eq!(hand.set(0, card!("2d")), Ok(card!("Ac")));
        assert!(!hand.contains(card!("Ac")));
        assert_eq!(hand.mask().bits(), expected_mask(&hand));
    }

    #[test]
    fn insert_delete_test() {
        let mut hand = unique(6);
        hand.extend(&CardSequence::from_idents("2c 3c 4c"), None)
            .unwrap();

        hand.insert(0, card!("5d")).unwrap();
        hand.insert(4, card!("6d")).unwrap();
        hand.insert(2, card!("7h")).unwrap();
        assert_eq!(hand.to_string(), "(5d 2c 7h 3c 4c 6d)");
        assert_eq!(hand.insert(0, card!("8h")), Err(Error::Full));

        assert_eq!(hand.delete(2), Ok(card!("7h")));
        assert_eq!(hand.insert(9, card!("8h")), Err(Error::BadIndex));
        assert_eq!(hand.insert(1, card!("2c")), Err(Error::Duplicate));
        assert_eq!(hand.delete(5), Err(Error::BadIndex));

        assert_eq!(hand.remove(card!("3c")), Ok(Some(2)));
        assert_eq!(hand.remove(card!("3c")), Ok(None));
        assert_eq!(hand.index(card!("6d")), Some(3));
        assert_eq!(hand.index(card!("Ks")), None);
        assert_eq!(hand.to_string(), "(5d 2c 4c 6d)");
        assert_eq!(hand.mask().bits(), expected_mask(&hand));
    }

    #[test]
    fn pop_test() {
        let mut rng = SmallRng::seed_from_u64(11);
        let mut hand = unique(5);
        assert_eq!(hand.pop(), Err(Error::BadIndex));
        assert_eq!(hand.pop_random(&mut rng), Err(Error::BadIndex));

        hand.extend(&CardSequence::from_idents("9s Ts Js Qs Ks"), None)
            .unwrap();
        assert_eq!(hand.pop(), Ok(card!("Ks")));

        let mut seen = HashSet::new();
        while !hand.is_empty() {
            let card = hand.pop_random(&mut rng).unwrap();
            assert!(!hand.contains(card));
            assert_eq!(hand.mask().bits(), expected_mask(&hand));
            seen.insert(card);
        }
        assert_eq!(seen.len(), 4);
    }

    #[test]
    fn extend_is_all_or_nothing_test() {
        let mut hand = unique(10);
        hand.extend(&CardSequence::from_idents("Ah Kh"), None)
            .unwrap();

        let clashing = CardSequence::from_idents("2d 3d Kh 4d");
        assert_eq!(hand.extend(&clashing, None), Err(Error::Duplicate));
        assert_eq!(hand.to_string(), "(Ah Kh)");
        assert_eq!(hand.extend(&clashing, Some(2)), Ok(2));
        assert_eq!(hand.to_string(), "(Ah Kh 2d 3d)");

        let repeated = CardSequence::from_idents("5c 5c");
        assert_eq!(hand.extend(&repeated, None), Err(Error::Duplicate));
        assert_eq!(hand.len(), 4);

        let long = CardSequence::from_idents("5c 6c 7c 8c 9c Tc Jc");
        assert_eq!(hand.extend(&long, None), Err(Error::Full));
        assert_eq!(hand.extend(&long, Some(100)), Err(Error::Full));
        assert_eq!(hand.extend(&long, Some(6)), Ok(6));
        assert_eq!(hand.mask().bits(), expected_mask(&hand));
    }

    #[test]
    fn truncate_test() {
        let mut hand = unique(8);
        hand.extend(&CardSequence::from_idents("2c 3c 4c 5c 6c"), None)
            .unwrap();
        assert_eq!(hand.truncate(6), Err(Error::BadIndex));
        hand.truncate(5).unwrap();
        hand.truncate(2).unwrap();
        assert_eq!(hand.to_string(), "(2c 3c)");
        assert_eq!(hand.mask().bits(), expected_mask(&hand));
        hand.truncate(0).unwrap();
        assert!(hand.is_empty());
        assert_eq!(hand.mask(), CardSet::empty());
    }

    #[test]
    fn fill_shoe_test() {
        let mut shoe = CardSequence::new(3 * 52);
        assert_eq!(shoe.fill(156, DeckType::Standard), Ok(156));
        assert_eq!(shoe.get(0), Ok(Card::new(1)));
        assert_eq!(shoe.get(52), Ok(Card::new(1)));
        assert_eq!(shoe.get(104), Ok(Card::new(1)));
        assert_eq!(shoe.get(155), Ok(Card::new(52)));
        assert_eq!(shoe.fill(157, DeckType::Standard), Err(Error::Full));

        let mut deck = unique(60);
        assert_eq!(deck.fill(55, DeckType::TwoJokers), Err(Error::Duplicate));
        assert_eq!(deck.fill(54, DeckType::TwoJokers), Ok(54));
        assert_eq!(deck.mask().bits(), (1 << 54) - 1);
        assert_eq!(deck.fill(24, DeckType::Pinochle), Ok(24));
        assert_eq!(deck.mask().bits(), expected_mask(&deck));
    }

    #[test]
    fn shuffle_keeps_contents_test() {
        let mut rng = SmallRng::seed_from_u64(3);
        let mut deck = unique(52);
        deck.fill(52, DeckType::Standard).unwrap();
        let before = deck.clone();
        deck.shuffle(&mut rng).unwrap();

        assert_eq!(deck, before);
        assert_ne!(deck.as_slice(), before.as_slice());
        assert_eq!(deck.fnv_hash(), before.fnv_hash());
    }

    #[test]
    fn sort_matches_std_sort_test() {
        let mut rng = SmallRng::seed_from_u64(5);
        for len in 0..=20 {
            for _ in 0..50 {
                let mut hand = CardSequence::new(len);
                for _ in 0..len {
                    let id = rng.uniform(54) as u8 + 1;
                    hand.append(Card::new(id)).unwrap();
                }
                let mut expected = hand.as_slice().to_vec();
                expected.sort_unstable();

                hand.sort().unwrap();
                assert!(hand.is_sorted());
                assert_eq!(hand.as_slice(), expected.as_slice());
            }
        }
    }

    #[test]
    fn reverse_test() {
        let mut hand = CardSequence::from_idents("2c 3d 4h 5s 6c");
        hand.sort().unwrap();
        hand.reverse().unwrap();
        assert!(!hand.is_sorted());
        assert_eq!(hand.to_string(), "(6c 5s 4h 3d 2c)");
    }

    #[test]
    fn equality_and_hash_test() {
        let a = CardSequence::from_idents("Ks Qd 2c");
        let b = CardSequence::from_idents("Ks Qd 2c");
        let c = CardSequence::from_idents("2c Ks Qd");
        assert_eq!(a, b);
        assert_eq!(a.fnv_hash(), b.fnv_hash());
        assert_ne!(a, c);
        assert_ne!(a, CardSequence::from_idents("Ks Qd"));

        let mut ua = a.clone();
        let mut uc = c.clone();
        ua.set_flags(Flags::Unique).unwrap();
        uc.set_flags(Flags::Unique).unwrap();
        assert_eq!(ua, uc);
        assert_eq!(ua.fnv_hash(), uc.fnv_hash());

        let mut set = HashSet::new();
        set.insert(ua.fnv_hash());
        assert!(set.contains(&uc.fnv_hash()));
    }

    #[test]
    fn mixed_policy_equality_test() {
        let plain = CardSequence::from_idents("Ks Qd 2c");
        let mut strict = plain.clone();
        strict.set_flags(Flags::Unique).unwrap();
        assert_eq!(plain.as_slice(), strict.as_slice());
        assert_ne!(plain, strict);
        assert_ne!(strict, plain);

        let mut sequences = HashSet::new();
        sequences.insert(plain.clone());
        sequences.insert(strict.clone());
        assert_eq!(sequences.len(), 2);

        let mut reordered = CardSequence::from_idents("2c Ks Qd");
        reordered.set_flags(Flags::Unique).unwrap();
        assert!(sequences.contains(&reordered));
        assert!(sequences.contains(&CardSequence::from_idents("Ks Qd 2c")));
        assert!(!sequences.contains(&CardSequence::from_idents("2c Ks Qd")));

        let mut locked = plain.clone();
        locked.set_flags(Flags::ReadOnly).unwrap();
        assert_eq!(locked, plain);
    }

    #[test]
    fn mask_invariant_under_random_mutation_test() {
        let mut rng = SmallRng::seed_from_u64(99);
        let mut hand = unique(20);
        for _ in 0..5_000 {
            let card = Card::new(rng.uniform(54) as u8 + 1);
            let index = rng.uniform(22);
            let _ = match rng.uniform(7) {
                0 | 1 => hand.append(card),
                2 => hand.insert(index, card),
                3 => hand.set(index, card).map(|_| ()),
                4 => hand.delete(index).map(|_| ()),
                5 => hand.remove(card).map(|_| ()),
                _ => hand.truncate(index),
            };
            assert_eq!(hand.mask().bits(), expected_mask(&hand));
            assert_eq!(hand.mask().count(), hand.len());
        }
    }

    #[test]
    fn copy_from_test() {
        let source = CardSequence::from_idents("Ah Ah Kd");
        let mut plain = CardSequence::new(3);
        plain.copy_from(&source).unwrap();
        assert_eq!(plain, source);

        let mut strict = unique(3);
        assert_eq!(strict.copy_from(&source), Err(Error::Duplicate));
        assert!(strict.is_empty());

        let mut small = CardSequence::new(2);
        assert_eq!(small.copy_from(&source), Err(Error::Full));
    }

    #[test]
    fn clipped_text_test() {
        let hand = CardSequence::from_idents("As Kd Qh Jc Td");
        assert_eq!(hand.text(16).as_deref(), Some("(As Kd Qh Jc Td)"));
        assert_eq!(hand.text(15).as_deref(), Some("(As Kd Qh...Td)"));
        assert_eq!(hand.text(9).as_deref(), Some("(As...Td)"));
        assert_eq!(hand.text(8), None);

        assert_eq!(CardSequence::new(4).text(2).as_deref(), Some("()"));
        assert_eq!(CardSequence::from_idents("JK JR").text(7).as_deref(), Some("(JK JR)"));
        assert_eq!(CardSequence::from_idents("JK JR").text(6), None);
    }

    #[test]
    fn parse_test() {
        let hand = CardSequence::parse(10, "KsKc5c9d2hQcJk").unwrap();
        assert_eq!(hand.to_string(), "(Ks Kc 5c 9d 2h Qc JK)");
        assert_eq!(hand.capacity(), 10);
        assert_eq!(CardSequence::parse(2, "Ks Kc 5c"), Err(Error::Full));
        assert!(CardSequence::parse(2, "Ks X").is_err());
    }
}
