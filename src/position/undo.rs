//! The state `make_move` snapshots so `unmake_move` can restore it exactly.
//!
//! Grounded in the shape of the teacher's `board::board_state::BoardState`,
//! but returned by value from `make_move` rather than threaded through an
//! `Arc`-linked history list — this crate's move-generation/search loop
//! needs an explicit stack discipline (push on make, pop on unmake), not
//! the teacher's persistent-history sharing across cloned boards.

use crate::piece::Piece;
use crate::position::castling::CastleRights;
use crate::square::Square;

#[derive(Copy, Clone, Debug)]
pub struct Undo {
    pub captured: Option<Piece>,
    pub castling_rights: CastleRights,
    pub en_passant: Square,
    pub halfmove_clock: u16,
    pub hash: u64,
}
