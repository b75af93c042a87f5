use std::fmt;
use std::str::FromStr;

use strum_macros::EnumIter;

use crate::cardlib::error::{Error, Result};

#[derive(Copy, Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, EnumIter)]
#[repr(u8)]
pub enum Suit {
    Club = 0,
    Diamond = 1,
    Heart = 2,
    Spade = 3,
}

impl Suit {
    const ALL: [Self; 4] = [Self::Club, Self::Diamond, Self::Heart, Self::Spade];

    pub fn name(self) -> &'static str {
        match self {
            Self::Club => "club",
            Self::Diamond => "diamond",
            Self::Heart => "heart",
            Self::Spade => "spade",
        }
    }

    fn from_char(c: u8) -> Option<Self> {
        match c.to_ascii_lowercase() {
            b'c' => Some(Self::Club),
            b'd' => Some(Self::Diamond),
            b'h' => Some(Self::Heart),
            b's' => Some(Self::Spade),
            _ => None,
        }
    }
}

#[derive(Copy, Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, EnumIter)]
#[repr(u8)]
pub enum Rank {
    Deuce = 0,
    Trey = 1,
    Four = 2,
    Five = 3,
    Six = 4,
    Seven = 5,
    Eight = 6,
    Nine = 7,
    Ten = 8,
    Jack = 9,
    Queen = 10,
    King = 11,
    Ace = 12,
    Joker = 13,
}

impl Rank {
    const ALL: [Self; 14] = [
        Self::Deuce,
        Self::Trey,
        Self::Four,
        Self::Five,
        Self::Six,
        Self::Seven,
        Self::Eight,
        Self::Nine,
        Self::Ten,
        Self::Jack,
        Self::Queen,
        Self::King,
        Self::Ace,
        Self::Joker,
    ];

    const NAMES: [&'static str; 14] = [
        "deuce", "trey", "four", "five", "six", "seven", "eight", "nine", "ten", "jack", "queen",
        "king", "ace", "joker",
    ];

    pub fn from_index(index: u8) -> Self {
        Self::ALL[usize::from(index)]
    }

    pub fn name(self) -> &'static str {
        Self::NAMES[self as usize]
    }

    /// English plural used in hand descriptions ("sixes", "kings").
    pub fn plural(self) -> String {
        match self {
            Self::Six => "sixes".to_owned(),
            _ => format!("{}s", self.name()),
        }
    }
}

/// A single card, identified by an integer in `1..=54`.
///
/// The identity of a suited card is `(rank << 2 | suit) + 1`, so cards order
/// rank-major, suit-minor. 53 is the (black) joker and 54 the red joker.
#[derive(Copy, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct Card(u8);

#[rustfmt::skip]
const CARD_NAMES: [&str; 54] = [
    "2c", "2d", "2h", "2s", "3c", "3d", "3h", "3s", "4c", "4d", "4h", "4s",
    "5c", "5d", "5h", "5s", "6c", "6d", "6h", "6s", "7c", "7d", "7h", "7s",
    "8c", "8d", "8h", "8s", "9c", "9d", "9h", "9s", "Tc", "Td", "Th", "Ts",
    "Jc", "Jd", "Jh", "Js", "Qc", "Qd", "Qh", "Qs", "Kc", "Kd", "Kh", "Ks",
    "Ac", "Ad", "Ah", "As", "JK", "JR",
];

impl Card {
    pub const JOKER: Self = Self(53);
    pub const RED_JOKER: Self = Self(54);

    /// Panics unless `id` is a valid identity in `1..=54`.
    pub const fn new(id: u8) -> Self {
        assert!(id >= 1 && id <= 54, "card identity must be in 1..=54");
        Self(id)
    }

    /// ```
    /// # use cardlib_core::prelude::{Card, Rank, Suit};
    /// assert_eq!(Card::from_parts(Rank::Five, Suit::Club).id(), 13);
    /// assert_eq!(Card::from_parts(Rank::Ace, Suit::Spade).id(), 52);
    /// ```
    pub const fn from_parts(rank: Rank, suit: Suit) -> Self {
        assert!(!matches!(rank, Rank::Joker), "jokers have no suit");
        Self((((rank as u8) << 2) | suit as u8) + 1)
    }

    pub const fn id(self) -> u8 {
        self.0
    }

    pub fn rank(self) -> Rank {
        Rank::from_index((self.0 - 1) >> 2)
    }

    pub fn suit(self) -> Option<Suit> {
        (!self.is_joker()).then(|| Suit::ALL[usize::from((self.0 - 1) & 3)])
    }

    pub const fn is_joker(self) -> bool {
        self.0 > 52
    }

    pub fn name(self) -> &'static str {
        CARD_NAMES[usize::from(self.0 - 1)]
    }

    /// ```
    /// # use cardlib_core::card;
    /// assert_eq!(card!("Jd").full_name(), "jack of diamonds");
    /// assert_eq!(card!("JR").full_name(), "red joker");
    /// ```
    pub fn full_name(self) -> String {
        match (self, self.suit()) {
            (Self::RED_JOKER, _) => "red joker".to_owned(),
            (_, None) => "joker".to_owned(),
            (_, Some(suit)) => format!("{} of {}s", self.rank().name(), suit.name()),
        }
    }

    /// Convert a shorthand identifier into a card. Panics if the identifier
    /// is incorrect. This exists only for test-writing.
    pub fn from_ident(ident: &str) -> Self {
        ident.parse().unwrap()
    }
}

#[macro_export]
macro_rules! card {
    ($ident:literal) => {
        $crate::cardlib::cards::Card::from_ident($ident)
    };
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Debug for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Card({})", self.name())
    }
}

impl FromStr for Card {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match parse_one(s) {
            Some((card, rest)) if rest.trim().is_empty() => Ok(card),
            _ => Err(Error::InvalidCard(s.trim().to_owned())),
        }
    }
}

/// Parse the first card name in `text`, returning it and the text after it.
///
/// Leading punctuation is skipped, case is ignored, "10" is accepted for the
/// ten, and whitespace may separate rank from suit.
fn parse_one(text: &str) -> Option<(Card, &str)> {
    let bytes = text.as_bytes();
    let mut at = bytes.iter().position(u8::is_ascii_alphanumeric)?;
    let first = bytes[at].to_ascii_lowercase();
    at += 1;

    let rank = match first {
        b'2'..=b'9' => Rank::from_index(first - b'2'),
        b't' => Rank::Ten,
        b'q' => Rank::Queen,
        b'k' => Rank::King,
        b'a' => Rank::Ace,
        b'1' if bytes.get(at) == Some(&b'0') => {
            at += 1;
            Rank::Ten
        }
        b'j' => match bytes.get(at).map(u8::to_ascii_lowercase) {
            Some(b'k') => return Some((Card::JOKER, &text[at + 1..])),
            Some(b'r') => return Some((Card::RED_JOKER, &text[at + 1..])),
            _ => Rank::Jack,
        },
        _ => return None,
    };

    while bytes.get(at).is_some_and(u8::is_ascii_whitespace) {
        at += 1;
    }
    let suit = Suit::from_char(*bytes.get(at)?)?;
    Some((Card::from_parts(rank, suit), &text[at + 1..]))
}

/// Parse every card name in `text`, e.g. `"KsKc5c9d2hQcJk"` or `"3s Ad 10s"`.
///
/// ```
/// # use cardlib_core::prelude::{parse_cards, Card};
/// let cards = parse_cards("KsKc5c9d2hQcJk").unwrap();
/// assert_eq!(cards.len(), 7);
/// assert_eq!(cards[6], Card::JOKER);
/// ```
pub fn parse_cards(text: &str) -> Result<Vec<Card>> {
    let mut cards = Vec::new();
    let mut rest = text;
    while let Some((card, next)) = parse_one(rest) {
        cards.push(card);
        rest = next;
    }
    if rest.trim().is_empty() {
        Ok(cards)
    } else {
        Err(Error::InvalidCard(rest.trim().to_owned()))
    }
}
