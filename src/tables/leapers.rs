//! Compile-once leaper attack tables: pawn, knight, king.
//!
//! Grounded in the teacher's `helper::boards` leaper-table construction
//! (knight/king offsets and pawn-attack-from tables), reimplemented with
//! `lazy_static` instead of `static mut` globals — the teacher's own
//! `core::magic_helper::MagicHelper` already favors that pattern for the
//! larger sliding tables, so this crate uses it uniformly everywhere.

use crate::bitboard::BitBoard;
use crate::piece::Color;
use crate::square::Square;
use lazy_static::lazy_static;

const KNIGHT_DELTAS: [(i8, i8); 8] = [
    (1, 2), (2, 1), (2, -1), (1, -2),
    (-1, -2), (-2, -1), (-2, 1), (-1, 2),
];

const KING_DELTAS: [(i8, i8); 8] = [
    (1, 0), (1, 1), (0, 1), (-1, 1),
    (-1, 0), (-1, -1), (0, -1), (1, -1),
];

fn leaper_attacks(sq: Square, deltas: &[(i8, i8)]) -> BitBoard {
    let mut bb = BitBoard::new(0);
    let (f, r) = (sq.file() as i8, sq.rank() as i8);
    for &(df, dr) in deltas {
        let (nf, nr) = (f + df, r + dr);
        if (0..8).contains(&nf) && (0..8).contains(&nr) {
            bb.set_sq(Square::make(nf as u8, nr as u8));
        }
    }
    bb
}

fn pawn_attacks(sq: Square, color: Color) -> BitBoard {
    let bb = BitBoard::from_sq(sq);
    match color {
        Color::White => bb.shift_ne() | bb.shift_nw(),
        Color::Black => bb.shift_se() | bb.shift_sw(),
    }
}

pub struct LeaperTables {
    pub knight: [BitBoard; 64],
    pub king: [BitBoard; 64],
    pub pawn: [[BitBoard; 64]; 2],
}

fn build() -> LeaperTables {
    let mut knight = [BitBoard::new(0); 64];
    let mut king = [BitBoard::new(0); 64];
    let mut pawn = [[BitBoard::new(0); 64]; 2];
    for idx in 0u8..64 {
        let sq = Square(idx);
        knight[idx as usize] = leaper_attacks(sq, &KNIGHT_DELTAS);
        king[idx as usize] = leaper_attacks(sq, &KING_DELTAS);
        pawn[Color::White.idx()][idx as usize] = pawn_attacks(sq, Color::White);
        pawn[Color::Black.idx()][idx as usize] = pawn_attacks(sq, Color::Black);
    }
    LeaperTables { knight, king, pawn }
}

lazy_static! {
    pub static ref LEAPERS: LeaperTables = build();
}

#[inline(always)]
pub fn knight_attacks(sq: Square) -> BitBoard {
    LEAPERS.knight[sq.0 as usize]
}

#[inline(always)]
pub fn king_attacks(sq: Square) -> BitBoard {
    LEAPERS.king[sq.0 as usize]
}

#[inline(always)]
pub fn pawn_attacks_from(sq: Square, color: Color) -> BitBoard {
    LEAPERS.pawn[color.idx()][sq.0 as usize]
}
