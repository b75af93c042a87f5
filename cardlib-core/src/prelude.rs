pub use crate::cardlib::cards::{parse_cards, Card, Rank, Suit};
pub use crate::cardlib::cardset::CardSet;
pub use crate::cardlib::combiner::{binomial, Combiner};
pub use crate::cardlib::decks::DeckType;
pub use crate::cardlib::error::{Error, Result};
pub use crate::cardlib::hand_evaluator::PokerEvaluator;
pub use crate::cardlib::hand_info::{HandGroup, HandInfo};
pub use crate::cardlib::random::{seeded, RandomSource};
pub use crate::cardlib::scorer::{BlackjackTotal, Scorer};
pub use crate::cardlib::sequence::{CardSequence, Flags};
