use static_assertions::const_assert;

use super::cards::Card;

/// Presence set of card identities packed into one machine word. Card `c`
/// owns bit `c - 1`, so all 54 identities fit.
#[derive(Copy, Clone, Debug, Default, Hash, PartialEq, Eq)]
pub struct CardSet(u64);

impl CardSet {
    const ALL_CARDS_MASK: u64 = (1 << 54) - 1;
}

const_assert!(CardSet::ALL_CARDS_MASK.count_ones() == 54);

#[allow(clippy::multiple_inherent_impl)]
impl CardSet {
    pub fn empty() -> Self {
        Self(0)
    }

    /// Set of the given cards, or `None` if any card appears twice.
    pub fn try_from_cards(cards: &[Card]) -> Option<Self> {
        let mut set = Self::empty();
        cards.iter().all(|card| set.insert(*card)).then_some(set)
    }

    pub fn bits(self) -> u64 {
        self.0
    }

    pub fn count(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Returns `false`, leaving the set untouched, if the card was already present.
    pub fn insert(&mut self, card: Card) -> bool {
        let fresh = !self.contains(card);
        self.0 |= Self::get_mask(card);
        fresh
    }

    pub fn remove(&mut self, card: Card) {
        self.0 &= Self::ALL_CARDS_MASK & !Self::get_mask(card);
    }

    pub fn contains(self, card: Card) -> bool {
        (self.0 & Self::get_mask(card)) != 0
    }

    #[inline]
    fn get_mask(card: Card) -> u64 {
        1_u64 << (card.id() - 1)
    }
}

impl FromIterator<Card> for CardSet {
    fn from_iter<T: IntoIterator<Item = Card>>(iter: T) -> Self {
        let mut set = Self::empty();
        for card in iter {
            set.insert(card);
        }
        set
    }
}
