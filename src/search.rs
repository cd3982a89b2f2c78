//! Fixed-depth negamax with alpha-beta pruning over the legal move list.
//!
//! The search is synchronous and non-preemptible: one call explores the whole
//! fixed-depth tree on a single scratch position via make/unmake. Keep the
//! depth shallow if the caller's loop must stay responsive.

use crate::board::{Color, Position};
use crate::evaluation::evaluate;
use crate::movegen::{generate_legal, in_check, Move};

/// Sentinel wider than any reachable score.
pub const INF: i32 = 200_000;

/// Base score for checkmate. Actual mate scores are `MATE_SCORE - ply`, so a
/// mate found closer to the root outranks a deeper one regardless of the
/// configured search depth.
pub const MATE_SCORE: i32 = 100_000;

fn negamax(pos: &mut Position, depth: u32, ply: i32, mut alpha: i32, beta: i32) -> i32 {
    let moves = generate_legal(pos);

    if moves.is_empty() {
        return if in_check(pos, pos.side_to_move) {
            -(MATE_SCORE - ply)
        } else {
            0
        };
    }

    if depth == 0 {
        let raw = evaluate(pos);
        return match pos.side_to_move {
            Color::White => raw,
            Color::Black => -raw,
        };
    }

    let mut best = -INF;
    for mv in moves {
        let undo = pos.make_move(mv);
        let score = -negamax(pos, depth - 1, ply + 1, -beta, -alpha);
        pos.unmake_move(&undo);

        if score > best {
            best = score;
        }
        if best > alpha {
            alpha = best;
        }
        if alpha >= beta {
            break;
        }
    }
    best
}

/// Picks the move with the best negamax score at the given depth, or `None`
/// if the side to move has no legal moves. Ties go to the move generated
/// first, which is deterministic per position.
pub fn find_best_move(pos: &Position, depth: u32) -> Option<Move> {
    let mut scratch = pos.clone();
    let moves = generate_legal(&scratch);

    let mut best_move = None;
    let mut best_score = -INF;
    for mv in moves {
        let undo = scratch.make_move(mv);
        let score = -negamax(&mut scratch, depth.saturating_sub(1), 1, -INF, INF);
        scratch.unmake_move(&undo);

        if score > best_score {
            best_score = score;
            best_move = Some(mv);
        }
    }
    best_move
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::parse_square;

    #[test]
    fn takes_the_hanging_queen() {
        // Black queen on d5 is undefended; the rook on d1 takes it for free.
        let pos = Position::from_fen("4k3/8/8/3q4/8/8/8/3RK3 w - - 0 1").unwrap();
        let best = find_best_move(&pos, 2).unwrap();
        assert_eq!(best.from, parse_square("d1").unwrap());
        assert_eq!(best.to, parse_square("d5").unwrap());
    }

    #[test]
    fn finds_mate_in_one() {
        // Back-rank mate: Ra8#.
        let pos = Position::from_fen("6k1/5ppp/8/8/8/8/8/R3K3 w - - 0 1").unwrap();
        let best = find_best_move(&pos, 3).unwrap();
        assert_eq!(best.from, parse_square("a1").unwrap());
        assert_eq!(best.to, parse_square("a8").unwrap());
    }

    #[test]
    fn prefers_the_shorter_mate() {
        // Two queens against a bare king: plenty of mates exist deeper in the
        // tree, but Qb7 mates immediately and must win the tie.
        let pos = Position::from_fen("k7/2Q5/1Q6/8/8/8/8/4K3 w - - 0 1").unwrap();
        let best = find_best_move(&pos, 4).unwrap();

        let mut scratch = pos.clone();
        scratch.make_move(best);
        assert!(generate_legal(&scratch).is_empty());
        assert!(in_check(&scratch, crate::board::Color::Black));
    }

    #[test]
    fn no_legal_moves_returns_none() {
        // No legal moves for the side to move and no check: the search root
        // has nothing to return.
        let pos = Position::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
        assert!(find_best_move(&pos, 2).is_none());
    }
}
