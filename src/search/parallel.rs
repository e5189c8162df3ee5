//! Three parallel search variants sharing one `rayon`-backed worker pool:
//! Young Brothers Wait Concept (YBWC), Principal Variation Search (PVS),
//! and a naive parallel alpha-beta used only as a baseline for comparison.
//!
//! Grounded directly in the teacher's `bots::jamboree::jamboree` (YBWC) and
//! `bots::parallel_minimax` (naive parallel); PVS has no counterpart in the
//! teacher but is built the same way — eldest child sequential, siblings
//! fanned out with `rayon::join` — enriched with the null-window probe and
//! selective re-search `examples/original_source`'s `main.cpp` names as a
//! distinct `PVS<...>` entry point alongside `YBWC<...>`.

use crate::error::{EngineError, InvalidDepthError};
use crate::eval::{terminal_score, Evaluator};
use crate::movegen::generate_legal_moves;
use crate::moves::Move;
use crate::position::Position;
use crate::search::{prepend, sequential::negamax, Pv, INF, NEG_INF, SERIAL_DEPTH};
use lazy_static::lazy_static;
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, RwLock};

lazy_static! {
    static ref POOL: RwLock<Arc<ThreadPool>> = RwLock::new(Arc::new(build_pool(num_cpus::get())));
}

fn build_pool(threads: usize) -> ThreadPool {
    ThreadPoolBuilder::new()
        .num_threads(threads.max(1))
        .build()
        .expect("failed to build worker pool")
}

/// Replaces the process-wide worker pool used by the parallel search
/// variants. Mirrors `pleco_engine`'s thread-count option, reduced to the
/// single knob this crate's core needs.
pub fn set_num_threads(n: usize) {
    let mut guard = POOL.write().expect("worker pool lock poisoned");
    *guard = Arc::new(build_pool(n));
}

fn pool() -> Arc<ThreadPool> {
    POOL.read().expect("worker pool lock poisoned").clone()
}

/// Per-node coordination record shared by a node's parallel children:
/// the best score/line found so far and a cooperative cancellation flag.
/// `alpha` is guarded separately so probing children can read a fresh
/// window without contending on the result slot.
struct Coordinator {
    alpha: Mutex<i32>,
    beta: i32,
    best: Mutex<(i32, Pv)>,
    cancelled: AtomicBool,
}

impl Coordinator {
    fn new(alpha: i32, beta: i32, best_score: i32, best_pv: Pv) -> Coordinator {
        Coordinator {
            alpha: Mutex::new(alpha),
            beta,
            best: Mutex::new((best_score, best_pv)),
            cancelled: AtomicBool::new(best_score >= beta),
        }
    }

    fn current_alpha(&self) -> i32 {
        *self.alpha.lock().expect("alpha lock poisoned")
    }

    fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    fn report(&self, mv: Move, score: i32, child_pv: Pv) {
        {
            let mut best = self.best.lock().expect("best lock poisoned");
            if score > best.0 {
                *best = (score, prepend(mv, child_pv));
            }
        }
        let mut alpha = self.alpha.lock().expect("alpha lock poisoned");
        if score > *alpha {
            *alpha = score;
        }
        if *alpha >= self.beta {
            self.cancelled.store(true, Ordering::Relaxed);
        }
    }

    fn into_best(self) -> (i32, Pv) {
        self.best.into_inner().expect("best lock poisoned")
    }
}

fn dispatch<F>(moves: &[Move], leaf: &F)
where
    F: Fn(Move) + Sync,
{
    if moves.is_empty() {
        return;
    }
    if moves.len() == 1 {
        leaf(moves[0]);
        return;
    }
    let mid = moves.len() / 2;
    let (left, right) = moves.split_at(mid);
    rayon::join(|| dispatch(left, leaf), || dispatch(right, leaf));
}

// ---------------------------------------------------------------------
// Young Brothers Wait Concept
// ---------------------------------------------------------------------

fn ybwc_node(
    pos: &mut Position,
    evaluator: &(dyn Evaluator + Sync),
    mut alpha: i32,
    beta: i32,
    depth: u8,
    ply: u32,
) -> (Pv, i32) {
    if depth <= SERIAL_DEPTH {
        return negamax(pos, evaluator, alpha, beta, depth, ply);
    }

    let moves = generate_legal_moves(pos);
    if moves.is_empty() {
        return (Pv::new(), terminal_score(pos, ply));
    }

    let eldest = moves[0];
    let undo = pos.make_move(eldest);
    let (eldest_pv, eldest_score_neg) = ybwc_node(pos, evaluator, -beta, -alpha, depth - 1, ply + 1);
    pos.unmake_move(eldest, undo);
    let eldest_score = -eldest_score_neg;

    let mut best = eldest_score;
    let mut best_pv = prepend(eldest, eldest_pv);
    if best >= beta {
        return (best_pv, best);
    }
    if best > alpha {
        alpha = best;
    }

    let remaining = &moves[1..];
    if remaining.is_empty() {
        return (best_pv, best);
    }

    let coordinator = Coordinator::new(alpha, beta, best, best_pv.clone());
    let leaf = |mv: Move| {
        if coordinator.is_cancelled() {
            return;
        }
        let window_alpha = coordinator.current_alpha();
        if window_alpha >= beta {
            coordinator.cancelled.store(true, Ordering::Relaxed);
            return;
        }
        let mut local = pos.clone();
        let undo = local.make_move(mv);
        let (child_pv, child_score_neg) =
            ybwc_node(&mut local, evaluator, -beta, -window_alpha, depth - 1, ply + 1);
        local.unmake_move(mv, undo);
        coordinator.report(mv, -child_score_neg, child_pv);
    };
    dispatch(remaining, &leaf);

    let (coordinated_best, coordinated_pv) = coordinator.into_best();
    if coordinated_best > best {
        best = coordinated_best;
        best_pv = coordinated_pv;
    }
    (best_pv, best)
}

/// Searches `pos` to `depth` plies: eldest child sequential, younger
/// siblings fanned out across the worker pool once the eldest establishes
/// a window.
pub fn search_ybwc(
    pos: &Position,
    evaluator: &(dyn Evaluator + Sync),
    depth: u8,
) -> Result<(Pv, i32), EngineError> {
    if depth == 0 {
        return Err(InvalidDepthError(0).into());
    }
    let mut scratch = pos.clone();
    let p = pool();
    Ok(p.install(|| ybwc_node(&mut scratch, evaluator, NEG_INF, INF, depth, 0)))
}

// ---------------------------------------------------------------------
// Principal Variation Search
// ---------------------------------------------------------------------

fn pvs_node(
    pos: &mut Position,
    evaluator: &(dyn Evaluator + Sync),
    mut alpha: i32,
    beta: i32,
    depth: u8,
    ply: u32,
) -> (Pv, i32) {
    if depth <= SERIAL_DEPTH {
        return negamax(pos, evaluator, alpha, beta, depth, ply);
    }

    let moves = generate_legal_moves(pos);
    if moves.is_empty() {
        return (Pv::new(), terminal_score(pos, ply));
    }

    let eldest = moves[0];
    let undo = pos.make_move(eldest);
    let (eldest_pv, v0_neg) = pvs_node(pos, evaluator, -beta, -alpha, depth - 1, ply + 1);
    pos.unmake_move(eldest, undo);
    let v0 = -v0_neg;

    let mut best = v0;
    let mut best_pv = prepend(eldest, eldest_pv);
    if best >= beta {
        return (best_pv, best);
    }
    if best > alpha {
        alpha = best;
    }

    let remaining = &moves[1..];
    if remaining.is_empty() {
        return (best_pv, best);
    }

    let coordinator = Coordinator::new(alpha, beta, best, best_pv.clone());
    let leaf = |mv: Move| {
        if coordinator.is_cancelled() {
            return;
        }
        let window_alpha = coordinator.current_alpha();
        if window_alpha >= beta {
            coordinator.cancelled.store(true, Ordering::Relaxed);
            return;
        }
        let mut local = pos.clone();
        let undo = local.make_move(mv);

        // Null-window probe: one point wide, just above the current alpha.
        let (probe_pv, probe_score_neg) = pvs_node(
            &mut local,
            evaluator,
            -(window_alpha + 1),
            -window_alpha,
            depth - 1,
            ply + 1,
        );
        let probe_score = -probe_score_neg;

        let (final_score, final_pv) = if probe_score > window_alpha && probe_score < beta {
            let (full_pv, full_score_neg) =
                pvs_node(&mut local, evaluator, -beta, -window_alpha, depth - 1, ply + 1);
            (-full_score_neg, full_pv)
        } else {
            (probe_score, probe_pv)
        };

        local.unmake_move(mv, undo);
        coordinator.report(mv, final_score, final_pv);
    };
    dispatch(remaining, &leaf);

    let (coordinated_best, coordinated_pv) = coordinator.into_best();
    if coordinated_best > best {
        best = coordinated_best;
        best_pv = coordinated_pv;
    }
    (best_pv, best)
}

pub fn search_pvs(
    pos: &Position,
    evaluator: &(dyn Evaluator + Sync),
    depth: u8,
) -> Result<(Pv, i32), EngineError> {
    if depth == 0 {
        return Err(InvalidDepthError(0).into());
    }
    let mut scratch = pos.clone();
    let p = pool();
    Ok(p.install(|| pvs_node(&mut scratch, evaluator, NEG_INF, INF, depth, 0)))
}

// ---------------------------------------------------------------------
// Naive parallel alpha-beta
// ---------------------------------------------------------------------

fn naive_node(
    pos: &mut Position,
    evaluator: &(dyn Evaluator + Sync),
    alpha: i32,
    beta: i32,
    depth: u8,
    ply: u32,
) -> (Pv, i32) {
    if depth <= SERIAL_DEPTH {
        return negamax(pos, evaluator, alpha, beta, depth, ply);
    }

    let moves = generate_legal_moves(pos);
    if moves.is_empty() {
        return (Pv::new(), terminal_score(pos, ply));
    }

    // No sibling sees another sibling's score: every child is searched
    // against the same incoming window, so no child benefits from a
    // cutoff found by another. Included only as a weaker baseline.
    let coordinator = Coordinator::new(NEG_INF, beta, NEG_INF, Pv::new());
    let leaf = |mv: Move| {
        let mut local = pos.clone();
        let undo = local.make_move(mv);
        let (child_pv, child_score_neg) = naive_node(&mut local, evaluator, -beta, -alpha, depth - 1, ply + 1);
        local.unmake_move(mv, undo);
        coordinator.report(mv, -child_score_neg, child_pv);
    };
    dispatch(&moves, &leaf);

    let (best, pv) = coordinator.into_best();
    (pv, best)
}

pub fn search_parallel(
    pos: &Position,
    evaluator: &(dyn Evaluator + Sync),
    depth: u8,
) -> Result<(Pv, i32), EngineError> {
    if depth == 0 {
        return Err(InvalidDepthError(0).into());
    }
    let mut scratch = pos.clone();
    let p = pool();
    Ok(p.install(|| naive_node(&mut scratch, evaluator, NEG_INF, INF, depth, 0)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::MaterialEvaluator;

    fn positions() -> Vec<Position> {
        vec![
            Position::starting(),
            Position::from_fen(
                "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            )
            .unwrap(),
            Position::from_fen("6k1/5ppp/8/8/8/8/5PPP/R5K1 w - - 0 1").unwrap(),
        ]
    }

    #[test]
    fn ybwc_agrees_with_sequential_score() {
        for pos in positions() {
            let (_, seq_score) =
                crate::search::sequential::search_sequential(&pos, &MaterialEvaluator, 4).unwrap();
            let (_, par_score) = search_ybwc(&pos, &MaterialEvaluator, 4).unwrap();
            assert_eq!(seq_score, par_score);
        }
    }

    #[test]
    fn pvs_agrees_with_sequential_score() {
        for pos in positions() {
            let (_, seq_score) =
                crate::search::sequential::search_sequential(&pos, &MaterialEvaluator, 4).unwrap();
            let (_, par_score) = search_pvs(&pos, &MaterialEvaluator, 4).unwrap();
            assert_eq!(seq_score, par_score);
        }
    }

    #[test]
    fn naive_parallel_agrees_with_sequential_score() {
        for pos in positions() {
            let (_, seq_score) =
                crate::search::sequential::search_sequential(&pos, &MaterialEvaluator, 4).unwrap();
            let (_, par_score) = search_parallel(&pos, &MaterialEvaluator, 4).unwrap();
            assert_eq!(seq_score, par_score);
        }
    }

    #[test]
    fn single_thread_matches_multi_thread() {
        let pos = Position::starting();
        set_num_threads(1);
        let (_, one_thread) = search_ybwc(&pos, &MaterialEvaluator, 4).unwrap();
        set_num_threads(num_cpus::get());
        let (_, many_threads) = search_ybwc(&pos, &MaterialEvaluator, 4).unwrap();
        assert_eq!(one_thread, many_threads);
    }
}
