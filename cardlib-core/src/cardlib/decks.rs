use lazy_static::lazy_static;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

use crate::cardlib::cards::{Card, Rank};
use crate::cardlib::sequence::CardSequence;

/// The catalog of deck variants. Discriminants are stable identifiers.
#[derive(Copy, Clone, Debug, Hash, PartialEq, Eq, EnumIter, EnumString, Display)]
#[repr(u8)]
pub enum DeckType {
    /// Normal 52-card deck
    #[strum(to_string = "standard")]
    Standard = 0,
    /// 52 cards plus one joker
    #[strum(to_string = "one-joker")]
    OneJoker = 1,
    /// 52 cards plus a black and a red joker
    #[strum(to_string = "two-jokers")]
    TwoJokers = 2,
    /// Deuces through sixes removed (Skat, Manila poker)
    #[strum(to_string = "stripped32")]
    Stripped32 = 3,
    /// Eights, nines and tens removed (Panguingue)
    #[strum(to_string = "stripped40")]
    Stripped40 = 4,
    /// Stripped40 plus a joker (Mexican poker)
    #[strum(to_string = "stripped40j")]
    Stripped40J = 5,
    /// Nines and up (Pinochle)
    #[strum(to_string = "pinochle")]
    Pinochle = 6,
}

lazy_static! {
    static ref DECK_CARDS: Vec<Vec<Card>> = DeckType::iter().map(DeckType::build).collect();
}

impl DeckType {
    fn build(self) -> Vec<Card> {
        let keep = |card: &Card| match self {
            Self::Standard | Self::OneJoker | Self::TwoJokers => true,
            Self::Stripped32 => card.rank() >= Rank::Seven,
            Self::Stripped40 | Self::Stripped40J => {
                !matches!(card.rank(), Rank::Eight | Rank::Nine | Rank::Ten)
            }
            Self::Pinochle => card.rank() >= Rank::Nine,
        };
        let jokers: &[Card] = match self {
            Self::OneJoker | Self::Stripped40J => &[Card::JOKER],
            Self::TwoJokers => &[Card::JOKER, Card::RED_JOKER],
            _ => &[],
        };

        (1..=52)
            .map(Card::new)
            .filter(keep)
            .chain(jokers.iter().copied())
            .collect()
    }

    /// The deck's cards in ascending order.
    pub fn cards(self) -> &'static [Card] {
        &DECK_CARDS[self as usize]
    }

    pub fn size(self) -> usize {
        self.cards().len()
    }

    /// A fresh read-only sequence holding the deck.
    pub fn deck(self) -> CardSequence {
        CardSequence::from_cards(self.cards()).frozen()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card;
    use crate::cardlib::cardset::CardSet;
    use crate::cardlib::error::Error;

    #[test]
    fn deck_sizes_test() {
        let sizes: Vec<_> = DeckType::iter().map(DeckType::size).collect();
        assert_eq!(sizes, [52, 53, 54, 32, 40, 41, 24]);
    }

    #[test]
    fn deck_contents_test() {
        let cards = DeckType::OneJoker.cards();
        assert_eq!(cards[0], card!("2c"));
        assert_eq!(cards[52], Card::JOKER);

        let cards = DeckType::Stripped32.cards();
        assert_eq!(cards[0], card!("7c"));
        assert_eq!(cards[31], card!("As"));

        let cards = DeckType::Stripped40J.cards();
        assert_eq!(cards[23], card!("7s"));
        assert_eq!(cards[24], card!("Jc"));
        assert_eq!(cards[40], Card::JOKER);

        assert_eq!(DeckType::Pinochle.cards()[0], card!("9c"));

        for deck_type in DeckType::iter() {
            let cards = deck_type.cards();
            assert_eq!(CardSet::try_from_cards(cards).map(CardSet::count), Some(cards.len()));
        }
    }

    #[test]
    fn read_only_deck_test() {
        let mut deck = DeckType::Standard.deck();
        assert_eq!(deck.len(), 52);
        assert!(deck.is_read_only());
        assert_eq!(deck.append(Card::JOKER), Err(Error::ReadOnly));
        assert_eq!(deck.pop(), Err(Error::ReadOnly));
    }

    #[test]
    fn deck_names_test() {
        assert_eq!("two-jokers".parse::<DeckType>().unwrap(), DeckType::TwoJokers);
        assert_eq!(DeckType::Stripped40J.to_string(), "stripped40j");
        assert!("tarot".parse::<DeckType>().is_err());
    }
}
