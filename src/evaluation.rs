use crate::board::{piece_kind, Piece, Position, BISHOP, KING, KNIGHT, PAWN, QUEEN, ROOK};

/// Material value of a piece in centipawns, ignoring color.
pub fn piece_value(p: Piece) -> i32 {
    match piece_kind(p) {
        PAWN => 100,
        KNIGHT => 320,
        BISHOP => 330,
        ROOK => 500,
        QUEEN => 900,
        KING => 20000,
        _ => 0,
    }
}

/// Static material balance from White's perspective: positive means White is
/// ahead. The search negates this for Black at leaf nodes.
pub fn evaluate(pos: &Position) -> i32 {
    let mut score = 0;
    for &p in &pos.squares {
        if p > 0 {
            score += piece_value(p);
        } else if p < 0 {
            score -= piece_value(p);
        }
    }
    score
}
