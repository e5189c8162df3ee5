//! Castling-rights bitflags.
//!
//! Grounded in the teacher's `board::castle_rights::Castling`, ported from
//! the old `bitflags!` 0.9 API (`.bits` field, `mut` in-place helpers) to
//! the modern `bitflags` 2.x API (`.bits()` method, `Flags` trait).

use crate::piece::Color;
use bitflags::bitflags;

bitflags! {
    #[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
    pub struct CastleRights: u8 {
        const WHITE_KING_SIDE  = 0b0001;
        const WHITE_QUEEN_SIDE = 0b0010;
        const BLACK_KING_SIDE  = 0b0100;
        const BLACK_QUEEN_SIDE = 0b1000;
    }
}

impl CastleRights {
    pub const NONE: CastleRights = CastleRights::empty();
    pub const ALL: CastleRights = CastleRights::all();

    pub fn king_side(color: Color) -> CastleRights {
        match color {
            Color::White => CastleRights::WHITE_KING_SIDE,
            Color::Black => CastleRights::BLACK_KING_SIDE,
        }
    }

    pub fn queen_side(color: Color) -> CastleRights {
        match color {
            Color::White => CastleRights::WHITE_QUEEN_SIDE,
            Color::Black => CastleRights::BLACK_QUEEN_SIDE,
        }
    }

    pub fn has_king_side(self, color: Color) -> bool {
        self.contains(CastleRights::king_side(color))
    }

    pub fn has_queen_side(self, color: Color) -> bool {
        self.contains(CastleRights::queen_side(color))
    }

    pub fn remove_color(&mut self, color: Color) {
        self.remove(CastleRights::king_side(color) | CastleRights::queen_side(color));
    }
}
