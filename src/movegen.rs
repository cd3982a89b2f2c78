use crate::board::{
    piece_color, piece_kind, Color, Piece, Position, BISHOP, B_KING, B_PAWN, CASTLE_BK, CASTLE_BQ,
    CASTLE_WK, CASTLE_WQ, EMPTY, KING, KNIGHT, PAWN, QUEEN, ROOK, W_KING, W_PAWN,
};

pub const FLAG_CAPTURE: u8 = 1 << 0;
pub const FLAG_EN_PASSANT: u8 = 1 << 1;
pub const FLAG_CASTLE_KINGSIDE: u8 = 1 << 2;
pub const FLAG_CASTLE_QUEENSIDE: u8 = 1 << 3;
pub const FLAG_PROMOTION: u8 = 1 << 4;
pub const FLAG_PAWN_DOUBLE: u8 = 1 << 5;

/// No legal chess position has more moves than this (the known record is 218).
/// Generation asserts against it instead of ever truncating.
pub const MAX_LEGAL_MOVES: usize = 218;

/// A move as the origin/destination squares plus flags. `promotion` is the
/// signed piece that ends up on the board, or 0 for non-promotions.
///
/// Two moves are the same move exactly when all four fields match; that is
/// the containment test `Game::execute_move` uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Move {
    pub from: u8,
    pub to: u8,
    pub promotion: Piece,
    pub flags: u8,
}

impl Move {
    pub fn new(from: u8, to: u8, flags: u8) -> Self {
        Self {
            from,
            to,
            promotion: EMPTY,
            flags,
        }
    }

    pub fn is_capture(&self) -> bool {
        self.flags & FLAG_CAPTURE != 0
    }

    pub fn is_promotion(&self) -> bool {
        self.flags & FLAG_PROMOTION != 0
    }

    pub fn is_castle(&self) -> bool {
        self.flags & (FLAG_CASTLE_KINGSIDE | FLAG_CASTLE_QUEENSIDE) != 0
    }

    /// Coordinate notation, e.g. "e2e4" or "e7e8q".
    pub fn coord(&self) -> String {
        let mut s = format!(
            "{}{}",
            crate::board::square_name(self.from),
            crate::board::square_name(self.to)
        );
        if self.is_promotion() {
            s.push(crate::board::piece_char(self.promotion).to_ascii_lowercase());
        }
        s
    }
}

const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

const KING_OFFSETS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

const BISHOP_DIRS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
const ROOK_DIRS: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

fn in_bounds(rank: i8, file: i8) -> bool {
    (0..8).contains(&rank) && (0..8).contains(&file)
}

fn square(rank: i8, file: i8) -> u8 {
    (rank * 8 + file) as u8
}

/// True iff at least one piece of `by` attacks `sq` in `pos`, ignoring pins
/// and whose turn it is. Scans outward from `sq` in every attack pattern, so
/// it works on arbitrary hypothetical positions (castling path checks included).
pub fn is_square_attacked(pos: &Position, sq: u8, by: Color) -> bool {
    let rank = (sq / 8) as i8;
    let file = (sq % 8) as i8;

    // A pawn of `by` attacks `sq` from one rank toward its own side.
    let pawn_rank = rank - by.sign();
    let pawn = match by {
        Color::White => W_PAWN,
        Color::Black => B_PAWN,
    };
    for df in [-1, 1] {
        if in_bounds(pawn_rank, file + df)
            && pos.squares[square(pawn_rank, file + df) as usize] == pawn
        {
            return true;
        }
    }

    for (dr, df) in KNIGHT_OFFSETS {
        if in_bounds(rank + dr, file + df) {
            let p = pos.squares[square(rank + dr, file + df) as usize];
            if piece_kind(p) == KNIGHT && piece_color(p) == Some(by) {
                return true;
            }
        }
    }

    for (dr, df) in ROOK_DIRS {
        let (mut r, mut f) = (rank + dr, file + df);
        while in_bounds(r, f) {
            let p = pos.squares[square(r, f) as usize];
            if p != EMPTY {
                if (piece_kind(p) == ROOK || piece_kind(p) == QUEEN) && piece_color(p) == Some(by)
                {
                    return true;
                }
                break;
            }
            r += dr;
            f += df;
        }
    }

    for (dr, df) in BISHOP_DIRS {
        let (mut r, mut f) = (rank + dr, file + df);
        while in_bounds(r, f) {
            let p = pos.squares[square(r, f) as usize];
            if p != EMPTY {
                if (piece_kind(p) == BISHOP || piece_kind(p) == QUEEN)
                    && piece_color(p) == Some(by)
                {
                    return true;
                }
                break;
            }
            r += dr;
            f += df;
        }
    }

    for (dr, df) in KING_OFFSETS {
        if in_bounds(rank + dr, file + df) {
            let p = pos.squares[square(rank + dr, file + df) as usize];
            if piece_kind(p) == KING && piece_color(p) == Some(by) {
                return true;
            }
        }
    }

    false
}

pub fn king_square(pos: &Position, color: Color) -> Option<u8> {
    let king = match color {
        Color::White => W_KING,
        Color::Black => B_KING,
    };
    pos.squares.iter().position(|&p| p == king).map(|i| i as u8)
}

pub fn in_check(pos: &Position, color: Color) -> bool {
    match king_square(pos, color) {
        Some(sq) => is_square_attacked(pos, sq, color.opposite()),
        None => {
            // A missing king is a generator/applier bug, not a game state.
            debug_assert!(false, "no {:?} king on the board", color);
            false
        }
    }
}

fn push_promotions(moves: &mut Vec<Move>, from: u8, to: u8, base_flags: u8, color: Color) {
    // Queen first so greedy tie-breaks favor it; order is fixed for
    // reproducible enumeration.
    for kind in [QUEEN, ROOK, BISHOP, KNIGHT] {
        moves.push(Move {
            from,
            to,
            promotion: kind * color.sign(),
            flags: base_flags | FLAG_PROMOTION,
        });
    }
}

/// Enumerates every move for the side to move that obeys piece movement rules,
/// without checking whether the mover's king is left in check. Castling is the
/// exception: its attack conditions are part of the movement rule and are
/// checked here.
///
/// Squares are scanned in ascending order, so the output order is
/// deterministic for a given position.
pub fn generate_pseudo_legal(pos: &Position) -> Vec<Move> {
    let mut moves = Vec::with_capacity(48);
    let us = pos.side_to_move;

    for from in 0..64u8 {
        let p = pos.squares[from as usize];
        if p == EMPTY || piece_color(p) != Some(us) {
            continue;
        }

        let rank = (from / 8) as i8;
        let file = (from % 8) as i8;

        match piece_kind(p) {
            PAWN => {
                let dir = us.sign();
                let start_rank = match us {
                    Color::White => 1,
                    Color::Black => 6,
                };
                let promo_rank = match us {
                    Color::White => 7,
                    Color::Black => 0,
                };

                let push_rank = rank + dir;
                if in_bounds(push_rank, file)
                    && pos.squares[square(push_rank, file) as usize] == EMPTY
                {
                    let to = square(push_rank, file);
                    if push_rank == promo_rank {
                        push_promotions(&mut moves, from, to, 0, us);
                    } else {
                        moves.push(Move::new(from, to, 0));
                    }

                    let double_rank = rank + dir * 2;
                    if rank == start_rank
                        && pos.squares[square(double_rank, file) as usize] == EMPTY
                    {
                        moves.push(Move::new(from, square(double_rank, file), FLAG_PAWN_DOUBLE));
                    }
                }

                for df in [-1, 1] {
                    let (cr, cf) = (rank + dir, file + df);
                    if !in_bounds(cr, cf) {
                        continue;
                    }
                    let to = square(cr, cf);
                    let target = pos.squares[to as usize];
                    if target != EMPTY && piece_color(target) != Some(us) {
                        if cr == promo_rank {
                            push_promotions(&mut moves, from, to, FLAG_CAPTURE, us);
                        } else {
                            moves.push(Move::new(from, to, FLAG_CAPTURE));
                        }
                    }
                    if pos.en_passant_square == Some(to) {
                        moves.push(Move::new(from, to, FLAG_CAPTURE | FLAG_EN_PASSANT));
                    }
                }
            }
            KNIGHT => {
                for (dr, df) in KNIGHT_OFFSETS {
                    let (r, f) = (rank + dr, file + df);
                    if !in_bounds(r, f) {
                        continue;
                    }
                    let to = square(r, f);
                    let target = pos.squares[to as usize];
                    if target == EMPTY {
                        moves.push(Move::new(from, to, 0));
                    } else if piece_color(target) != Some(us) {
                        moves.push(Move::new(from, to, FLAG_CAPTURE));
                    }
                }
            }
            BISHOP => slide(pos, from, &BISHOP_DIRS, &mut moves),
            ROOK => slide(pos, from, &ROOK_DIRS, &mut moves),
            QUEEN => {
                slide(pos, from, &BISHOP_DIRS, &mut moves);
                slide(pos, from, &ROOK_DIRS, &mut moves);
            }
            KING => {
                for (dr, df) in KING_OFFSETS {
                    let (r, f) = (rank + dr, file + df);
                    if !in_bounds(r, f) {
                        continue;
                    }
                    let to = square(r, f);
                    let target = pos.squares[to as usize];
                    if target == EMPTY {
                        moves.push(Move::new(from, to, 0));
                    } else if piece_color(target) != Some(us) {
                        moves.push(Move::new(from, to, FLAG_CAPTURE));
                    }
                }
                generate_castles(pos, us, from, &mut moves);
            }
            _ => unreachable!("invalid piece {} on square {}", p, from),
        }
    }

    moves
}

fn slide(pos: &Position, from: u8, dirs: &[(i8, i8)], moves: &mut Vec<Move>) {
    let us = pos.side_to_move;
    let rank = (from / 8) as i8;
    let file = (from % 8) as i8;
    for &(dr, df) in dirs {
        let (mut r, mut f) = (rank + dr, file + df);
        while in_bounds(r, f) {
            let to = square(r, f);
            let target = pos.squares[to as usize];
            if target == EMPTY {
                moves.push(Move::new(from, to, 0));
            } else {
                if piece_color(target) != Some(us) {
                    moves.push(Move::new(from, to, FLAG_CAPTURE));
                }
                break;
            }
            r += dr;
            f += df;
        }
    }
}

fn generate_castles(pos: &Position, us: Color, from: u8, moves: &mut Vec<Move>) {
    let (kingside_right, queenside_right, home) = match us {
        Color::White => (CASTLE_WK, CASTLE_WQ, 0u8),
        Color::Black => (CASTLE_BK, CASTLE_BQ, 56u8),
    };
    if from != home + 4 {
        return;
    }
    let them = us.opposite();

    if pos.castling_rights & kingside_right != 0
        && pos.squares[(home + 5) as usize] == EMPTY
        && pos.squares[(home + 6) as usize] == EMPTY
        && !is_square_attacked(pos, home + 4, them)
        && !is_square_attacked(pos, home + 5, them)
        && !is_square_attacked(pos, home + 6, them)
    {
        moves.push(Move::new(from, home + 6, FLAG_CASTLE_KINGSIDE));
    }

    if pos.castling_rights & queenside_right != 0
        && pos.squares[(home + 1) as usize] == EMPTY
        && pos.squares[(home + 2) as usize] == EMPTY
        && pos.squares[(home + 3) as usize] == EMPTY
        && !is_square_attacked(pos, home + 4, them)
        && !is_square_attacked(pos, home + 3, them)
        && !is_square_attacked(pos, home + 2, them)
    {
        moves.push(Move::new(from, home + 2, FLAG_CASTLE_QUEENSIDE));
    }
}

/// Pseudo-legal moves filtered down to the ones that do not leave the mover's
/// own king attacked. Works on one scratch copy with make/unmake per
/// candidate rather than a fresh position copy per move.
pub fn generate_legal(pos: &Position) -> Vec<Move> {
    let us = pos.side_to_move;
    let mut scratch = pos.clone();
    let mut legal = Vec::with_capacity(40);

    for mv in generate_pseudo_legal(pos) {
        let undo = scratch.make_move(mv);
        if !in_check(&scratch, us) {
            legal.push(mv);
        }
        scratch.unmake_move(&undo);
    }

    debug_assert!(
        legal.len() <= MAX_LEGAL_MOVES,
        "generated {} moves, more than any legal position allows",
        legal.len()
    );
    legal
}

/// Counts leaf nodes of the legal move tree to `depth`. Standard generator
/// validation against published node counts.
pub fn perft(pos: &mut Position, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }
    let moves = generate_legal(pos);
    if depth == 1 {
        return moves.len() as u64;
    }
    let mut nodes = 0;
    for mv in moves {
        let undo = pos.make_move(mv);
        nodes += perft(pos, depth - 1);
        pos.unmake_move(&undo);
    }
    nodes
}
