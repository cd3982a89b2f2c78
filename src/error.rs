use thiserror::Error;

/// Errors the engine core can report to its caller. Everything here is a
/// validation failure; the core performs no I/O.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChessError {
    #[error("invalid FEN: {0}")]
    InvalidFen(String),

    /// The submitted move is not in the current legal set. The position is
    /// left untouched.
    #[error("illegal move: {0}")]
    IllegalMove(String),

    #[error("the game is already over")]
    GameOver,
}
