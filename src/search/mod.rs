//! Negamax alpha-beta search: a sequential baseline (`sequential`), three
//! parallel variants sharing a `rayon`-backed worker pool (`parallel`), and
//! a pure move-enumeration counter (`perft`).
//!
//! Grounded in the teacher's `bots` module: `MATE_V`/`DRAW_V`/`NEG_INF_V`/
//! `INF_V` constants and the `Searcher`-trait shape of `bots::mod`, the
//! sequential algorithm of `bots::alphabeta`, and the parallel variants of
//! `bots::jamboree` (YBWC) and `bots::parallel_minimax` (naive parallel).

pub mod parallel;
pub mod perft;
pub mod sequential;

use crate::moves::Move;
use arrayvec::ArrayVec;

/// Ply budget a principal variation can hold without heap allocation.
pub const MAX_PLY: usize = 64;

pub type Pv = ArrayVec<Move, MAX_PLY>;

pub const NEG_INF: i32 = -1_000_000;
pub const INF: i32 = 1_000_000;

/// Node depth, in remaining plies, at or below which a parallel search
/// variant stops splitting and falls back to the sequential algorithm —
/// the teacher's `jamboree::DIVIDE_CUTOFF`/`DIVISOR_SEQ` role, renamed to
/// the single knob this crate needs.
pub const SERIAL_DEPTH: u8 = 3;

fn prepend(m: Move, mut rest: Pv) -> Pv {
    let mut pv = Pv::new();
    pv.push(m);
    pv.extend(rest.drain(..));
    pv
}
