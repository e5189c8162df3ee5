//! Sequential negamax with fail-soft alpha-beta pruning.
//!
//! Grounded directly in the teacher's `bots::alphabeta::AlphaBetaSearcher`,
//! generalized from a fixed `i16` minimax score and a hand-rolled recursive
//! helper into the crate's `i32` score scale with explicit PV threading.

use crate::error::{EngineError, InvalidDepthError};
use crate::eval::{terminal_score, Evaluator};
use crate::movegen::generate_legal_moves;
use crate::position::Position;
use crate::search::{prepend, Pv, INF, NEG_INF};

#[cfg(feature = "logging")]
use log::debug;

/// Negamax with alpha-beta pruning, searched from `ply` plies into the
/// tree rooted at the original call. Returns the principal variation found
/// (possibly empty at a terminal node) and its score from `pos`'s side to
/// move's perspective.
pub fn negamax(
    pos: &mut Position,
    evaluator: &(dyn Evaluator + Sync),
    mut alpha: i32,
    beta: i32,
    depth: u8,
    ply: u32,
) -> (Pv, i32) {
    if depth == 0 {
        return (Pv::new(), evaluator.eval(pos));
    }

    let moves = generate_legal_moves(pos);
    if moves.is_empty() {
        return (Pv::new(), terminal_score(pos, ply));
    }

    let mut best = NEG_INF;
    let mut best_pv = Pv::new();

    for m in moves.iter().copied() {
        let undo = pos.make_move(m);
        let (child_pv, child_score) = negamax(pos, evaluator, -beta, -alpha, depth - 1, ply + 1);
        pos.unmake_move(m, undo);
        let score = -child_score;

        if score > best {
            best = score;
            best_pv = prepend(m, child_pv);
        }
        if best > alpha {
            alpha = best;
        }
        if alpha >= beta {
            break;
        }
    }

    (best_pv, best)
}

/// Entry point: searches `pos` to `depth` plies and returns the best line
/// found as a growable `Vec`, matching this crate's sequential-search
/// surface (the parallel variants return a fixed-capacity array instead).
pub fn search_sequential(
    pos: &Position,
    evaluator: &(dyn Evaluator + Sync),
    depth: u8,
) -> Result<(Vec<crate::moves::Move>, i32), EngineError> {
    if depth == 0 {
        return Err(InvalidDepthError(0).into());
    }
    #[cfg(feature = "logging")]
    debug!("search_sequential: depth={depth}");

    let mut scratch = pos.clone();
    let (pv, score) = negamax(&mut scratch, evaluator, NEG_INF, INF, depth, 0);
    Ok((pv.into_iter().collect(), score))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::MaterialEvaluator;

    #[test]
    fn finds_mate_in_one() {
        let pos = Position::from_fen("6k1/5ppp/8/8/8/8/5PPP/R5K1 w - - 0 1").unwrap();
        let (pv, score) = search_sequential(&pos, &MaterialEvaluator, 2).unwrap();
        assert!(crate::eval::is_mate_score(score));
        assert_eq!(pv.first().unwrap().to_uci(), "a1a8");
    }

    #[test]
    fn stalemate_scores_as_draw() {
        let pos = Position::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
        let (pv, score) = search_sequential(&pos, &MaterialEvaluator, 1).unwrap();
        assert!(pv.is_empty());
        assert_eq!(score, 0);
    }

    #[test]
    fn zero_depth_is_rejected() {
        let pos = Position::starting();
        assert!(search_sequential(&pos, &MaterialEvaluator, 0).is_err());
    }
}
