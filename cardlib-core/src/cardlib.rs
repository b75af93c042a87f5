pub mod cards;
pub mod cardset;
pub mod combiner;
pub mod decks;
pub mod error;
pub mod hand_evaluator;
pub mod hand_info;
mod poker_tables;
pub mod random;
pub mod scorer;
pub mod sequence;
