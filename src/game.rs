use crate::board::{Color, Piece, Position};
use crate::error::ChessError;
use crate::movegen::{generate_legal, in_check, Move};
use crate::search;

/// Outcome reported after every executed move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    Ongoing,
    /// The given color delivered checkmate.
    Checkmate(Color),
    Stalemate,
}

/// Owns the authoritative position and the legal-move list for the side to
/// move. The surrounding input/render layer only ever sees moves taken from
/// `legal_moves`/`moves_from` and hands one back to `execute_move`; nothing
/// else mutates the position.
#[derive(Debug, Clone)]
pub struct Game {
    position: Position,
    legal_moves: Vec<Move>,
    status: GameStatus,
}

impl Game {
    pub fn new() -> Self {
        Self::from_position(Position::new())
    }

    pub fn from_fen(fen: &str) -> Result<Self, ChessError> {
        Ok(Self::from_position(Position::from_fen(fen)?))
    }

    fn from_position(position: Position) -> Self {
        let mut game = Self {
            position,
            legal_moves: Vec::new(),
            status: GameStatus::Ongoing,
        };
        game.refresh();
        game
    }

    /// Regenerates the legal set and the termination status for the current
    /// side to move.
    fn refresh(&mut self) {
        self.legal_moves = generate_legal(&self.position);
        self.status = if self.legal_moves.is_empty() {
            if in_check(&self.position, self.position.side_to_move) {
                GameStatus::Checkmate(self.position.side_to_move.opposite())
            } else {
                GameStatus::Stalemate
            }
        } else {
            GameStatus::Ongoing
        };
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn side_to_move(&self) -> Color {
        self.position.side_to_move
    }

    /// Legal moves for the side to move.
    pub fn legal_moves(&self) -> &[Move] {
        &self.legal_moves
    }

    /// Legal moves originating at `from`; what a UI highlights once a piece
    /// is selected.
    pub fn moves_from(&self, from: u8) -> Vec<Move> {
        self.legal_moves
            .iter()
            .copied()
            .filter(|mv| mv.from == from)
            .collect()
    }

    /// Looks up the legal move matching an origin/destination pair and,
    /// for promotions, the promotion piece.
    pub fn find_move(&self, from: u8, to: u8, promotion: Piece) -> Option<Move> {
        self.legal_moves
            .iter()
            .copied()
            .find(|mv| mv.from == from && mv.to == to && mv.promotion == promotion)
    }

    /// Applies `mv` if it is contained in the current legal set (exact
    /// origin/destination/flags/promotion match) and reports the resulting
    /// status. A rejected move leaves the position untouched.
    pub fn execute_move(&mut self, mv: Move) -> Result<GameStatus, ChessError> {
        if self.status != GameStatus::Ongoing {
            return Err(ChessError::GameOver);
        }
        if !self.legal_moves.contains(&mv) {
            return Err(ChessError::IllegalMove(mv.coord()));
        }
        self.position.make_move(mv);
        self.refresh();
        Ok(self.status)
    }

    /// Search entry point for the non-human side.
    pub fn find_best_move(&self, depth: u32) -> Option<Move> {
        search::find_best_move(&self.position, depth)
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}
