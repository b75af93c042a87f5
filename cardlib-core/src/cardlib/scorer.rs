use std::fmt;

use crate::cardlib::cards::{Card, Rank};

/// A blackjack hand total. A soft total counts one ace as eleven.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BlackjackTotal {
    pub total: u8,
    pub soft: bool,
}

impl BlackjackTotal {
    pub fn is_bust(self) -> bool {
        self.total > 21
    }
}

impl fmt::Display for BlackjackTotal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.soft {
            write!(f, "soft {}", self.total)
        } else {
            write!(f, "{}", self.total)
        }
    }
}

pub struct Scorer<'a> {
    cards: &'a [Card],
}

impl<'a> Scorer<'a> {
    fn new(cards: &'a [Card]) -> Self {
        Self { cards }
    }

    fn card_points(card: Card) -> u8 {
        match card.rank() {
            Rank::Joker => 0,
            Rank::Ace => 1,
            rank if rank >= Rank::Ten => 10,
            rank => rank as u8 + 2,
        }
    }

    fn total(&self) -> BlackjackTotal {
        let total = self
            .cards
            .iter()
            .fold(0_u8, |total, card| total.saturating_add(Self::card_points(*card)));
        let has_ace = self.cards.iter().any(|card| card.rank() == Rank::Ace);

        if has_ace && total < 12 {
            BlackjackTotal {
                total: total + 10,
                soft: true,
            }
        } else {
            BlackjackTotal { total, soft: false }
        }
    }

    /// Jokers count nothing.
    ///
    /// ```
    /// # use cardlib_core::prelude::{CardSequence, Scorer};
    /// let hand = CardSequence::from_idents("Ah 6d");
    /// assert_eq!(Scorer::blackjack_total(&hand).to_string(), "soft 17");
    /// ```
    pub fn blackjack_total(hand: &'a impl AsRef<[Card]>) -> BlackjackTotal {
        let scorer = Self::new(hand.as_ref());
        scorer.total()
    }
}
