use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum Error {
    #[error("the sequence is read-only")]
    ReadOnly,
    #[error("the sequence is at capacity")]
    Full,
    #[error("the card is already present in a unique sequence")]
    Duplicate,
    #[error("index out of range")]
    BadIndex,
    #[error("unrecognized card text {0:?}")]
    InvalidCard(String),
}

pub type Result<T> = std::result::Result<T, Error>;
