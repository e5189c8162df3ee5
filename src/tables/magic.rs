//! Black-magic sliding-piece attack tables for bishops and rooks, plus the
//! one-time table build (Carry-Rippler occupancy enumeration + seeded magic
//! search).
//!
//! Grounded in the teacher's `core::magic_helper::MagicTable::init` (the
//! runtime magic-search loop, its `occupied`/`age` scratch bookkeeping, and
//! its per-square `SEEDS` table) and in `examples/original_source`'s
//! `Backend/Move/AttackTable.h`, which names the *black magic* variant this
//! module implements: the stored per-square value is the complement of the
//! relevant-occupancy mask, OR'd into the occupancy before multiplying, so
//! irrelevant squares are pinned to `1` instead of masked to `0`.
//!
//! Per-square local tables are concatenated into one flat `Vec<BitBoard>` in
//! (piece, square) order, each sized to its own minimal `2^popcount(mask)`
//! span. The original's further optimization — sharing otherwise-unused
//! slots between squares to compress the whole table down to a single
//! 87,988-entry array — is not attempted here; see `DESIGN.md`.

use crate::bitboard::BitBoard;
use crate::square::Square;
use crate::tables::prng::Prng;
use lazy_static::lazy_static;

#[derive(Copy, Clone, PartialEq, Eq)]
pub enum SlidingPiece {
    Bishop,
    Rook,
}

const BISHOP_DELTAS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
const ROOK_DELTAS: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

fn deltas_for(piece: SlidingPiece) -> [(i8, i8); 4] {
    match piece {
        SlidingPiece::Bishop => BISHOP_DELTAS,
        SlidingPiece::Rook => ROOK_DELTAS,
    }
}

/// Per-square seeds tuned the way the teacher's `magic_helper::SEEDS` table
/// is: values that let the search below terminate quickly for that square's
/// occupancy-subset count. These are rank-indexed, matching the observation
/// that seeds need to scale with the relevant-mask size, which is itself a
/// function of rank/file distance from the board edge.
const SEEDS: [u64; 8] = [728, 10316, 55013, 32803, 12281, 15100, 16645, 255];

/// Walks the four rays for `piece` from `sq`, stopping (inclusive) at the
/// first occupied square along each ray. This is the ground-truth attack
/// generator the magic table is checked against.
pub fn sliding_attack(piece: SlidingPiece, sq: Square, occupied: BitBoard) -> BitBoard {
    let mut attacks = BitBoard::new(0);
    let (f0, r0) = (sq.file() as i8, sq.rank() as i8);
    for &(df, dr) in deltas_for(piece).iter() {
        let (mut f, mut r) = (f0 + df, r0 + dr);
        while (0..8).contains(&f) && (0..8).contains(&r) {
            let s = Square::make(f as u8, r as u8);
            attacks.set_sq(s);
            if occupied.test_sq(s) {
                break;
            }
            f += df;
            r += dr;
        }
    }
    attacks
}

/// The relevant-occupancy mask: every square reachable by `sliding_attack`
/// from an empty board, excluding the board edge (edge squares never block
/// further sliding and so never affect the attack set).
fn relevant_mask(piece: SlidingPiece, sq: Square) -> BitBoard {
    let mut mask = BitBoard::new(0);
    let (f0, r0) = (sq.file() as i8, sq.rank() as i8);
    for &(df, dr) in deltas_for(piece).iter() {
        let (mut f, mut r) = (f0 + df, r0 + dr);
        while (1..7).contains(&f) && (1..7).contains(&r) {
            mask.set_sq(Square::make(f as u8, r as u8));
            f += df;
            r += dr;
        }
    }
    mask
}

#[derive(Copy, Clone)]
struct MagicEntry {
    not_mask: u64,
    magic: u64,
    shift: u32,
    offset: usize,
}

pub struct MagicTables {
    bishop: [MagicEntry; 64],
    rook: [MagicEntry; 64],
    attacks: Vec<BitBoard>,
}

/// Enumerates every subset of `mask` via the Carry-Rippler trick, starting
/// and ending at the empty subset.
fn subsets(mask: BitBoard) -> Vec<BitBoard> {
    let mut out = Vec::with_capacity(1usize << mask.count_bits());
    let mut occ = BitBoard::new(0);
    loop {
        out.push(occ);
        occ = BitBoard::new(occ.0.wrapping_sub(mask.0)) & mask;
        if occ.is_empty() {
            break;
        }
    }
    out
}

fn build_piece_tables(piece: SlidingPiece, seed_base: &[u64; 8]) -> ([MagicEntry; 64], Vec<BitBoard>) {
    let mut entries = [MagicEntry { not_mask: 0, magic: 0, shift: 0, offset: 0 }; 64];
    let mut flat = Vec::new();

    for idx in 0u8..64 {
        let sq = Square(idx);
        let mask = relevant_mask(piece, sq);
        let shift = 64 - mask.count_bits();
        let subs = subsets(mask);
        let seed = seed_base[(sq.rank()) as usize];

        let not_mask = !mask.0;
        let table_size = 1usize << (64 - shift);
        let mut rng = Prng::new(seed.max(1));
        let mut local: Vec<BitBoard> = vec![BitBoard::new(0); table_size];
        let mut filled = vec![false; table_size];

        'search: loop {
            let magic = rng.sparse_u64();
            if (magic.wrapping_mul(mask.0) >> 56).count_ones() < 6 {
                continue;
            }
            for slot in filled.iter_mut() {
                *slot = false;
            }
            for &occ in &subs {
                let idx2 = (((occ.0 | not_mask).wrapping_mul(magic)) >> shift) as usize;
                let attack = sliding_attack(piece, sq, occ);
                if filled[idx2] {
                    if local[idx2] != attack {
                        continue 'search;
                    }
                } else {
                    filled[idx2] = true;
                    local[idx2] = attack;
                }
            }
            entries[idx as usize] = MagicEntry {
                not_mask,
                magic,
                shift,
                offset: flat.len(),
            };
            flat.extend_from_slice(&local);
            break;
        }
    }

    (entries, flat)
}

fn build() -> MagicTables {
    let (bishop_entries, bishop_flat) = build_piece_tables(SlidingPiece::Bishop, &SEEDS);
    let (rook_entries, rook_flat) = build_piece_tables(SlidingPiece::Rook, &SEEDS);

    let mut attacks = Vec::with_capacity(bishop_flat.len() + rook_flat.len());
    attacks.extend_from_slice(&bishop_flat);
    let rook_base = attacks.len();
    attacks.extend_from_slice(&rook_flat);

    let mut rook = rook_entries;
    for e in rook.iter_mut() {
        e.offset += rook_base;
    }

    MagicTables {
        bishop: bishop_entries,
        rook,
        attacks,
    }
}

lazy_static! {
    static ref MAGIC: MagicTables = build();
}

impl MagicTables {
    #[inline(always)]
    fn lookup(&self, entries: &[MagicEntry; 64], sq: Square, occupied: BitBoard) -> BitBoard {
        let e = entries[sq.0 as usize];
        let idx = (((occupied.0 | e.not_mask).wrapping_mul(e.magic)) >> e.shift) as usize;
        self.attacks[e.offset + idx]
    }
}

#[inline(always)]
pub fn bishop_attacks(sq: Square, occupied: BitBoard) -> BitBoard {
    MAGIC.lookup(&MAGIC.bishop, sq, occupied)
}

#[inline(always)]
pub fn rook_attacks(sq: Square, occupied: BitBoard) -> BitBoard {
    MAGIC.lookup(&MAGIC.rook, sq, occupied)
}

#[inline(always)]
pub fn queen_attacks(sq: Square, occupied: BitBoard) -> BitBoard {
    bishop_attacks(sq, occupied) | rook_attacks(sq, occupied)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bishop_matches_naive_for_random_occupancies() {
        let sq = Square::from_algebraic("d4").unwrap();
        let mask = relevant_mask(SlidingPiece::Bishop, sq);
        for occ in subsets(mask) {
            assert_eq!(bishop_attacks(sq, occ), sliding_attack(SlidingPiece::Bishop, sq, occ));
        }
    }

    #[test]
    fn rook_matches_naive_for_random_occupancies() {
        let sq = Square::from_algebraic("a1").unwrap();
        let mask = relevant_mask(SlidingPiece::Rook, sq);
        for occ in subsets(mask) {
            assert_eq!(rook_attacks(sq, occ), sliding_attack(SlidingPiece::Rook, sq, occ));
        }
    }

    #[test]
    fn empty_board_rook_corner_attacks_whole_edge() {
        let a1 = Square::from_algebraic("a1").unwrap();
        let attacks = rook_attacks(a1, BitBoard::new(0));
        assert_eq!(attacks.count_bits(), 14);
    }
}
