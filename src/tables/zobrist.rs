//! Zobrist hash keys: one random key per (color, piece, square), one per
//! castling-rights combination, one per en-passant file, and one for the
//! side to move.
//!
//! Grounded in the teacher's `core::magic_helper::Zobrist`, built from the
//! same `tools::prng`-style generator with a fixed seed so the key set is
//! reproducible across runs (important for any future transposition-table
//! use, even though this crate does not implement one).

use crate::piece::{Color, Piece, ALL_PIECES};
use crate::square::Square;
use crate::tables::prng::Prng;
use lazy_static::lazy_static;

const ZOBRIST_SEED: u64 = 23_081;

pub struct ZobristKeys {
    pub piece_square: [[[u64; 64]; 6]; 2],
    pub castling: [u64; 16],
    pub en_passant_file: [u64; 8],
    pub side_to_move: u64,
}

fn build() -> ZobristKeys {
    let mut rng = Prng::new(ZOBRIST_SEED);
    let mut piece_square = [[[0u64; 64]; 6]; 2];
    for color in [Color::White, Color::Black] {
        for &piece in ALL_PIECES.iter() {
            for sq in 0u8..64 {
                piece_square[color.idx()][piece.idx()][sq as usize] = rng.next_u64();
            }
        }
    }
    let mut castling = [0u64; 16];
    for entry in castling.iter_mut() {
        *entry = rng.next_u64();
    }
    let mut en_passant_file = [0u64; 8];
    for entry in en_passant_file.iter_mut() {
        *entry = rng.next_u64();
    }
    let side_to_move = rng.next_u64();

    ZobristKeys {
        piece_square,
        castling,
        en_passant_file,
        side_to_move,
    }
}

lazy_static! {
    pub static ref ZOBRIST: ZobristKeys = build();
}

#[inline(always)]
pub fn piece_square_key(color: Color, piece: Piece, sq: Square) -> u64 {
    ZOBRIST.piece_square[color.idx()][piece.idx()][sq.0 as usize]
}

#[inline(always)]
pub fn castling_key(rights_bits: u8) -> u64 {
    ZOBRIST.castling[rights_bits as usize & 0xF]
}

#[inline(always)]
pub fn en_passant_key(file: u8) -> u64 {
    ZOBRIST.en_passant_file[file as usize & 0x7]
}

#[inline(always)]
pub fn side_to_move_key() -> u64 {
    ZOBRIST.side_to_move
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_pairwise_distinct_sample() {
        let a = piece_square_key(Color::White, Piece::Pawn, Square(0));
        let b = piece_square_key(Color::White, Piece::Pawn, Square(1));
        let c = piece_square_key(Color::Black, Piece::Pawn, Square(0));
        assert_ne!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn deterministic_across_calls() {
        let a = piece_square_key(Color::Black, Piece::King, Square(60));
        let b = piece_square_key(Color::Black, Piece::King, Square(60));
        assert_eq!(a, b);
    }
}
