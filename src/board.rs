use std::fmt;

use crate::error::ChessError;
use crate::movegen::{
    Move, FLAG_CASTLE_KINGSIDE, FLAG_CASTLE_QUEENSIDE, FLAG_EN_PASSANT, FLAG_PAWN_DOUBLE,
    FLAG_PROMOTION,
};

/// A piece is a signed byte: the sign is the color (positive = White),
/// the magnitude is the kind (1 = pawn .. 6 = king), zero is an empty square.
pub type Piece = i8;

pub const EMPTY: Piece = 0;

pub const W_PAWN: Piece = 1;
pub const W_KNIGHT: Piece = 2;
pub const W_BISHOP: Piece = 3;
pub const W_ROOK: Piece = 4;
pub const W_QUEEN: Piece = 5;
pub const W_KING: Piece = 6;

pub const B_PAWN: Piece = -1;
pub const B_KNIGHT: Piece = -2;
pub const B_BISHOP: Piece = -3;
pub const B_ROOK: Piece = -4;
pub const B_QUEEN: Piece = -5;
pub const B_KING: Piece = -6;

/// Piece kinds, i.e. `piece_kind` results.
pub const PAWN: i8 = 1;
pub const KNIGHT: i8 = 2;
pub const BISHOP: i8 = 3;
pub const ROOK: i8 = 4;
pub const QUEEN: i8 = 5;
pub const KING: i8 = 6;

pub const CASTLE_WK: u8 = 1 << 0;
pub const CASTLE_WQ: u8 = 1 << 1;
pub const CASTLE_BK: u8 = 1 << 2;
pub const CASTLE_BQ: u8 = 1 << 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub fn opposite(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Sign of this color's pieces on the board.
    pub fn sign(self) -> i8 {
        match self {
            Color::White => 1,
            Color::Black => -1,
        }
    }
}

/// Kind of a piece, ignoring color (0 for an empty square).
pub fn piece_kind(p: Piece) -> i8 {
    p.abs()
}

/// Color of a piece, `None` for an empty square.
pub fn piece_color(p: Piece) -> Option<Color> {
    match p.signum() {
        1 => Some(Color::White),
        -1 => Some(Color::Black),
        _ => None,
    }
}

pub fn piece_char(p: Piece) -> char {
    let c = match piece_kind(p) {
        PAWN => 'p',
        KNIGHT => 'n',
        BISHOP => 'b',
        ROOK => 'r',
        QUEEN => 'q',
        KING => 'k',
        _ => return '.',
    };
    if p > 0 {
        c.to_ascii_uppercase()
    } else {
        c
    }
}

pub fn piece_from_char(c: char) -> Option<Piece> {
    let kind = match c.to_ascii_lowercase() {
        'p' => PAWN,
        'n' => KNIGHT,
        'b' => BISHOP,
        'r' => ROOK,
        'q' => QUEEN,
        'k' => KING,
        _ => return None,
    };
    Some(if c.is_ascii_uppercase() { kind } else { -kind })
}

/// Parses a coordinate like "e4" into a square index (a1 = 0, h8 = 63).
pub fn parse_square(s: &str) -> Option<u8> {
    let mut chars = s.chars();
    let file = chars.next()?;
    let rank = chars.next()?;
    if chars.next().is_some() {
        return None;
    }
    if !('a'..='h').contains(&file) || !('1'..='8').contains(&rank) {
        return None;
    }
    let file = file as u8 - b'a';
    let rank = rank as u8 - b'1';
    Some(rank * 8 + file)
}

pub fn square_name(sq: u8) -> String {
    let file = (b'a' + sq % 8) as char;
    let rank = (b'1' + sq / 8) as char;
    format!("{}{}", file, rank)
}

pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// A full chess position. Squares are indexed rank*8 + file with a1 = 0.
///
/// A position is created once at game start (or from FEN) and from then on
/// only mutated through `make_move` / `unmake_move`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    pub squares: [Piece; 64],
    pub side_to_move: Color,
    pub castling_rights: u8,
    pub en_passant_square: Option<u8>,
    pub halfmove_clock: u16,
    pub fullmove_number: u16,
}

/// Everything `make_move` destroys, recorded so `unmake_move` can restore
/// the position bit for bit.
#[derive(Debug, Clone, Copy)]
pub struct Undo {
    pub mv: Move,
    pub moved_piece: Piece,
    pub captured_piece: Piece,
    pub castling_rights: u8,
    pub en_passant_square: Option<u8>,
    pub halfmove_clock: u16,
}

impl Position {
    /// The standard initial position.
    pub fn new() -> Self {
        Self::from_fen(START_FEN).expect("start position FEN is valid")
    }

    pub fn from_fen(fen: &str) -> Result<Self, ChessError> {
        let mut parts = fen.split_whitespace();
        let board_part = parts
            .next()
            .ok_or_else(|| ChessError::InvalidFen("missing board field".into()))?;
        let side_part = parts
            .next()
            .ok_or_else(|| ChessError::InvalidFen("missing side-to-move field".into()))?;
        let castling_part = parts
            .next()
            .ok_or_else(|| ChessError::InvalidFen("missing castling field".into()))?;
        let ep_part = parts
            .next()
            .ok_or_else(|| ChessError::InvalidFen("missing en-passant field".into()))?;
        let halfmove_part = parts.next().unwrap_or("0");
        let fullmove_part = parts.next().unwrap_or("1");

        let mut squares = [EMPTY; 64];
        let ranks: Vec<&str> = board_part.split('/').collect();
        if ranks.len() != 8 {
            return Err(ChessError::InvalidFen(format!(
                "expected 8 ranks, got {}",
                ranks.len()
            )));
        }
        for (i, rank_str) in ranks.iter().enumerate() {
            let rank = 7 - i;
            let mut file = 0usize;
            for c in rank_str.chars() {
                if let Some(n) = c.to_digit(10) {
                    file += n as usize;
                    continue;
                }
                let piece = piece_from_char(c)
                    .ok_or_else(|| ChessError::InvalidFen(format!("bad piece char '{}'", c)))?;
                if file >= 8 {
                    return Err(ChessError::InvalidFen(format!("rank overflow: {}", rank_str)));
                }
                squares[rank * 8 + file] = piece;
                file += 1;
            }
            if file != 8 {
                return Err(ChessError::InvalidFen(format!(
                    "rank does not sum to 8 files: {}",
                    rank_str
                )));
            }
        }

        let side_to_move = match side_part {
            "w" => Color::White,
            "b" => Color::Black,
            other => {
                return Err(ChessError::InvalidFen(format!("bad side to move '{}'", other)))
            }
        };

        let mut castling_rights = 0u8;
        if castling_part != "-" {
            for c in castling_part.chars() {
                castling_rights |= match c {
                    'K' => CASTLE_WK,
                    'Q' => CASTLE_WQ,
                    'k' => CASTLE_BK,
                    'q' => CASTLE_BQ,
                    other => {
                        return Err(ChessError::InvalidFen(format!(
                            "bad castling char '{}'",
                            other
                        )))
                    }
                };
            }
        }

        let en_passant_square = if ep_part == "-" {
            None
        } else {
            Some(parse_square(ep_part).ok_or_else(|| {
                ChessError::InvalidFen(format!("bad en-passant square '{}'", ep_part))
            })?)
        };

        let halfmove_clock = halfmove_part
            .parse::<u16>()
            .map_err(|_| ChessError::InvalidFen(format!("bad halfmove clock '{}'", halfmove_part)))?;
        let fullmove_number = fullmove_part
            .parse::<u16>()
            .map_err(|_| ChessError::InvalidFen(format!("bad fullmove number '{}'", fullmove_part)))?;

        Ok(Self {
            squares,
            side_to_move,
            castling_rights,
            en_passant_square,
            halfmove_clock,
            fullmove_number,
        })
    }

    pub fn to_fen(&self) -> String {
        let mut fen = String::new();
        for rank in (0..8).rev() {
            let mut empty = 0;
            for file in 0..8 {
                let p = self.squares[rank * 8 + file];
                if p == EMPTY {
                    empty += 1;
                } else {
                    if empty > 0 {
                        fen.push(char::from_digit(empty, 10).unwrap());
                        empty = 0;
                    }
                    fen.push(piece_char(p));
                }
            }
            if empty > 0 {
                fen.push(char::from_digit(empty, 10).unwrap());
            }
            if rank > 0 {
                fen.push('/');
            }
        }

        fen.push(' ');
        fen.push(match self.side_to_move {
            Color::White => 'w',
            Color::Black => 'b',
        });

        fen.push(' ');
        if self.castling_rights == 0 {
            fen.push('-');
        } else {
            if self.castling_rights & CASTLE_WK != 0 {
                fen.push('K');
            }
            if self.castling_rights & CASTLE_WQ != 0 {
                fen.push('Q');
            }
            if self.castling_rights & CASTLE_BK != 0 {
                fen.push('k');
            }
            if self.castling_rights & CASTLE_BQ != 0 {
                fen.push('q');
            }
        }

        fen.push(' ');
        match self.en_passant_square {
            Some(sq) => fen.push_str(&square_name(sq)),
            None => fen.push('-'),
        }

        fen.push(' ');
        fen.push_str(&self.halfmove_clock.to_string());
        fen.push(' ');
        fen.push_str(&self.fullmove_number.to_string());
        fen
    }

    /// Applies `mv` to this position and returns the undo record.
    ///
    /// `mv` must come from move generation on this exact position; the undo
    /// record is only meaningful for the position the move was applied to.
    pub fn make_move(&mut self, mv: Move) -> Undo {
        let moved_piece = self.squares[mv.from as usize];
        let mut undo = Undo {
            mv,
            moved_piece,
            captured_piece: self.squares[mv.to as usize],
            castling_rights: self.castling_rights,
            en_passant_square: self.en_passant_square,
            halfmove_clock: self.halfmove_clock,
        };

        self.squares[mv.from as usize] = EMPTY;

        // En passant captures a pawn that is not on the destination square.
        if mv.flags & FLAG_EN_PASSANT != 0 {
            let victim_sq = match self.side_to_move {
                Color::White => mv.to - 8,
                Color::Black => mv.to + 8,
            };
            undo.captured_piece = self.squares[victim_sq as usize];
            self.squares[victim_sq as usize] = EMPTY;
        }

        if mv.flags & FLAG_CASTLE_KINGSIDE != 0 {
            match self.side_to_move {
                Color::White => {
                    self.squares[5] = W_ROOK;
                    self.squares[7] = EMPTY;
                }
                Color::Black => {
                    self.squares[61] = B_ROOK;
                    self.squares[63] = EMPTY;
                }
            }
        } else if mv.flags & FLAG_CASTLE_QUEENSIDE != 0 {
            match self.side_to_move {
                Color::White => {
                    self.squares[3] = W_ROOK;
                    self.squares[0] = EMPTY;
                }
                Color::Black => {
                    self.squares[59] = B_ROOK;
                    self.squares[56] = EMPTY;
                }
            }
        }

        self.squares[mv.to as usize] = if mv.flags & FLAG_PROMOTION != 0 {
            mv.promotion
        } else {
            moved_piece
        };

        self.en_passant_square = if mv.flags & FLAG_PAWN_DOUBLE != 0 {
            Some(match self.side_to_move {
                Color::White => mv.from + 8,
                Color::Black => mv.from - 8,
            })
        } else {
            None
        };

        // A king move drops both of its side's rights; a rook leaving or
        // being captured on its home square drops that wing's right.
        match moved_piece {
            W_KING => self.castling_rights &= !(CASTLE_WK | CASTLE_WQ),
            B_KING => self.castling_rights &= !(CASTLE_BK | CASTLE_BQ),
            W_ROOK if mv.from == 7 => self.castling_rights &= !CASTLE_WK,
            W_ROOK if mv.from == 0 => self.castling_rights &= !CASTLE_WQ,
            B_ROOK if mv.from == 63 => self.castling_rights &= !CASTLE_BK,
            B_ROOK if mv.from == 56 => self.castling_rights &= !CASTLE_BQ,
            _ => {}
        }
        match (undo.captured_piece, mv.to) {
            (W_ROOK, 7) => self.castling_rights &= !CASTLE_WK,
            (W_ROOK, 0) => self.castling_rights &= !CASTLE_WQ,
            (B_ROOK, 63) => self.castling_rights &= !CASTLE_BK,
            (B_ROOK, 56) => self.castling_rights &= !CASTLE_BQ,
            _ => {}
        }

        if piece_kind(moved_piece) == PAWN || undo.captured_piece != EMPTY {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock += 1;
        }

        self.side_to_move = self.side_to_move.opposite();
        if self.side_to_move == Color::White {
            self.fullmove_number += 1;
        }

        undo
    }

    /// Exact inverse of `make_move`.
    pub fn unmake_move(&mut self, undo: &Undo) {
        self.side_to_move = self.side_to_move.opposite();
        if self.side_to_move == Color::Black {
            self.fullmove_number -= 1;
        }

        self.castling_rights = undo.castling_rights;
        self.en_passant_square = undo.en_passant_square;
        self.halfmove_clock = undo.halfmove_clock;

        let mv = undo.mv;

        if mv.flags & FLAG_CASTLE_KINGSIDE != 0 {
            match self.side_to_move {
                Color::White => {
                    self.squares[7] = W_ROOK;
                    self.squares[5] = EMPTY;
                }
                Color::Black => {
                    self.squares[63] = B_ROOK;
                    self.squares[61] = EMPTY;
                }
            }
        } else if mv.flags & FLAG_CASTLE_QUEENSIDE != 0 {
            match self.side_to_move {
                Color::White => {
                    self.squares[0] = W_ROOK;
                    self.squares[3] = EMPTY;
                }
                Color::Black => {
                    self.squares[56] = B_ROOK;
                    self.squares[59] = EMPTY;
                }
            }
        }

        self.squares[mv.from as usize] = undo.moved_piece;

        if mv.flags & FLAG_EN_PASSANT != 0 {
            // The victim goes back to its own square, not the destination.
            self.squares[mv.to as usize] = EMPTY;
            let victim_sq = match self.side_to_move {
                Color::White => mv.to - 8,
                Color::Black => mv.to + 8,
            };
            self.squares[victim_sq as usize] = undo.captured_piece;
        } else {
            self.squares[mv.to as usize] = undo.captured_piece;
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for rank in (0..8).rev() {
            write!(f, "{} ", rank + 1)?;
            for file in 0..8 {
                write!(f, "{} ", piece_char(self.squares[rank * 8 + file]))?;
            }
            writeln!(f)?;
        }
        writeln!(f, "  a b c d e f g h")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_position_layout() {
        let pos = Position::new();
        assert_eq!(pos.squares[0], W_ROOK);
        assert_eq!(pos.squares[4], W_KING);
        assert_eq!(pos.squares[12], W_PAWN);
        assert_eq!(pos.squares[60], B_KING);
        assert_eq!(pos.squares[63], B_ROOK);
        assert_eq!(pos.side_to_move, Color::White);
        assert_eq!(
            pos.castling_rights,
            CASTLE_WK | CASTLE_WQ | CASTLE_BK | CASTLE_BQ
        );
        assert_eq!(pos.en_passant_square, None);
    }

    #[test]
    fn fen_round_trip() {
        let fens = [
            START_FEN,
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
            "rnbqkbnr/pppp1ppp/8/4p3/4P3/8/PPPP1PPP/RNBQKBNR w KQkq e6 0 2",
            "4k3/8/8/8/8/8/8/4K2R b K - 12 45",
        ];
        for fen in fens {
            let pos = Position::from_fen(fen).unwrap();
            assert_eq!(pos.to_fen(), fen);
        }
    }

    #[test]
    fn fen_rejects_garbage() {
        assert!(Position::from_fen("").is_err());
        assert!(Position::from_fen("rnbqkbnr/pppppppp w KQkq - 0 1").is_err());
        assert!(Position::from_fen("9z/8/8/8/8/8/8/8 w - - 0 1").is_err());
        assert!(Position::from_fen("8/8/8/8/8/8/8/8 x - - 0 1").is_err());
        assert!(Position::from_fen("8/8/8/8/8/8/8/8 w Kz - 0 1").is_err());
    }

    #[test]
    fn square_names() {
        assert_eq!(parse_square("a1"), Some(0));
        assert_eq!(parse_square("e4"), Some(28));
        assert_eq!(parse_square("h8"), Some(63));
        assert_eq!(parse_square("i1"), None);
        assert_eq!(parse_square("a9"), None);
        assert_eq!(square_name(28), "e4");
        assert_eq!(square_name(63), "h8");
    }
}
