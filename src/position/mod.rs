//! Mutable board state: per-(color, piece) bitboards, side to move,
//! castling rights, en-passant target, move counters, and an incrementally
//! maintained Zobrist hash.
//!
//! Grounded in the teacher's `board::Board`/`board::board_state::BoardState`
//! pair, collapsed into a single struct since this crate's make/unmake
//! protocol returns an explicit `Undo` on the caller's stack rather than
//! threading an `Arc`-linked persistent history.

pub mod castling;
pub mod undo;

use crate::bitboard::BitBoard;
use crate::error::{EngineError, FenError};
use crate::moves::{Move, MoveFlag};
use crate::piece::{Color, Piece, ALL_PIECES};
use crate::position::castling::CastleRights;
use crate::position::undo::Undo;
use crate::square::Square;
use crate::tables::magic::{bishop_attacks, rook_attacks};
use crate::tables::{leapers, zobrist};
use std::fmt;

#[derive(Clone)]
pub struct Position {
    board: [[BitBoard; 6]; 2],
    occ: [BitBoard; 2],
    side_to_move: Color,
    castling: CastleRights,
    ep_square: Square,
    halfmove_clock: u16,
    fullmove_number: u16,
    hash: u64,
}

impl Position {
    pub fn empty() -> Position {
        Position {
            board: [[BitBoard::new(0); 6]; 2],
            occ: [BitBoard::new(0); 2],
            side_to_move: Color::White,
            castling: CastleRights::NONE,
            ep_square: Square::NONE,
            halfmove_clock: 0,
            fullmove_number: 1,
            hash: 0,
        }
    }

    pub fn starting() -> Position {
        Position::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1")
            .expect("starting position FEN is well-formed")
    }

    // -- accessors ---------------------------------------------------

    #[inline(always)]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[inline(always)]
    pub fn castling_rights(&self) -> CastleRights {
        self.castling
    }

    #[inline(always)]
    pub fn en_passant(&self) -> Square {
        self.ep_square
    }

    #[inline(always)]
    pub fn halfmove_clock(&self) -> u16 {
        self.halfmove_clock
    }

    #[inline(always)]
    pub fn hash(&self) -> u64 {
        self.hash
    }

    #[inline(always)]
    pub fn pieces(&self, color: Color, piece: Piece) -> BitBoard {
        self.board[color.idx()][piece.idx()]
    }

    #[inline(always)]
    pub fn occupancy(&self, color: Color) -> BitBoard {
        self.occ[color.idx()]
    }

    #[inline(always)]
    pub fn all_occupancy(&self) -> BitBoard {
        self.occ[0] | self.occ[1]
    }

    pub fn king_square(&self, color: Color) -> Square {
        self.pieces(color, Piece::King).lsb()
    }

    pub fn piece_at(&self, sq: Square) -> Option<(Piece, Color)> {
        for color in [Color::White, Color::Black] {
            if !self.occ[color.idx()].test_sq(sq) {
                continue;
            }
            for &piece in ALL_PIECES.iter() {
                if self.board[color.idx()][piece.idx()].test_sq(sq) {
                    return Some((piece, color));
                }
            }
        }
        None
    }

    pub fn in_check(&self, color: Color) -> bool {
        self.is_square_attacked(self.king_square(color), !color)
    }

    /// True iff any piece belonging to `by_color` attacks `sq`.
    pub fn is_square_attacked(&self, sq: Square, by_color: Color) -> bool {
        let occ = self.all_occupancy();

        let pawns = self.pieces(by_color, Piece::Pawn);
        if (leapers::pawn_attacks_from(sq, !by_color) & pawns).0 != 0 {
            return true;
        }
        if (leapers::knight_attacks(sq) & self.pieces(by_color, Piece::Knight)).0 != 0 {
            return true;
        }
        if (leapers::king_attacks(sq) & self.pieces(by_color, Piece::King)).0 != 0 {
            return true;
        }
        let diag_attackers =
            self.pieces(by_color, Piece::Bishop) | self.pieces(by_color, Piece::Queen);
        if (bishop_attacks(sq, occ) & diag_attackers).0 != 0 {
            return true;
        }
        let orth_attackers =
            self.pieces(by_color, Piece::Rook) | self.pieces(by_color, Piece::Queen);
        if (rook_attacks(sq, occ) & orth_attackers).0 != 0 {
            return true;
        }
        false
    }

    // -- mutation ------------------------------------------------------

    fn put_piece(&mut self, piece: Piece, color: Color, sq: Square) {
        self.board[color.idx()][piece.idx()].set_sq(sq);
        self.occ[color.idx()].set_sq(sq);
        self.hash ^= zobrist::piece_square_key(color, piece, sq);
    }

    fn remove_piece(&mut self, piece: Piece, color: Color, sq: Square) {
        self.board[color.idx()][piece.idx()].clear_sq(sq);
        self.occ[color.idx()].clear_sq(sq);
        self.hash ^= zobrist::piece_square_key(color, piece, sq);
    }

    fn move_piece(&mut self, piece: Piece, color: Color, from: Square, to: Square) {
        self.remove_piece(piece, color, from);
        self.put_piece(piece, color, to);
    }

    fn set_ep_square(&mut self, sq: Square) {
        if self.ep_square.is_okay() {
            self.hash ^= zobrist::en_passant_key(self.ep_square.file());
        }
        self.ep_square = sq;
        if sq.is_okay() {
            self.hash ^= zobrist::en_passant_key(sq.file());
        }
    }

    fn set_castling(&mut self, rights: CastleRights) {
        self.hash ^= zobrist::castling_key(self.castling.bits());
        self.castling = rights;
        self.hash ^= zobrist::castling_key(self.castling.bits());
    }

    /// Applies `m`, which the caller must have obtained from the legal move
    /// generator for this exact position. Returns the state needed to undo
    /// it via [`Position::unmake_move`].
    pub fn make_move(&mut self, m: Move) -> Undo {
        let us = self.side_to_move;
        let them = !us;
        let from = m.from_sq();
        let to = m.to_sq();
        let flag = m.flag();

        let (moving_piece, _) = self
            .piece_at(from)
            .expect("make_move called with no piece on the origin square");

        let mut undo = Undo {
            captured: None,
            castling_rights: self.castling,
            en_passant: self.ep_square,
            halfmove_clock: self.halfmove_clock,
            hash: self.hash,
        };

        self.set_ep_square(Square::NONE);

        let mut halfmove_reset = moving_piece == Piece::Pawn;

        match flag {
            MoveFlag::EnPassant => {
                let captured_sq = Square::make(to.file(), from.rank());
                self.remove_piece(Piece::Pawn, them, captured_sq);
                self.move_piece(Piece::Pawn, us, from, to);
                undo.captured = Some(Piece::Pawn);
                halfmove_reset = true;
            }
            MoveFlag::KingCastle | MoveFlag::QueenCastle => {
                self.move_piece(Piece::King, us, from, to);
                let rank = from.rank();
                let (rook_from, rook_to) = if flag == MoveFlag::KingCastle {
                    (Square::make(7, rank), Square::make(5, rank))
                } else {
                    (Square::make(0, rank), Square::make(3, rank))
                };
                self.move_piece(Piece::Rook, us, rook_from, rook_to);
            }
            _ => {
                if flag.is_capture() {
                    let (captured_piece, _) = self
                        .piece_at(to)
                        .expect("capture flag set but destination is empty");
                    self.remove_piece(captured_piece, them, to);
                    undo.captured = Some(captured_piece);
                    halfmove_reset = true;
                }
                self.move_piece(moving_piece, us, from, to);
                if let Some(promo) = flag.promotion_piece() {
                    self.remove_piece(Piece::Pawn, us, to);
                    self.put_piece(promo, us, to);
                }
                if flag == MoveFlag::DoublePush {
                    self.set_ep_square(Square::make(from.file(), (from.rank() + to.rank()) / 2));
                }
            }
        }

        // Castling-rights updates: king move clears both of that color's
        // rights; a rook move or capture on a rook's home square clears
        // that side's right.
        let mut rights = self.castling;
        if moving_piece == Piece::King {
            rights.remove_color(us);
        }
        for (sq, side) in [
            (Square::make(0, 0), CastleRights::WHITE_QUEEN_SIDE),
            (Square::make(7, 0), CastleRights::WHITE_KING_SIDE),
            (Square::make(0, 7), CastleRights::BLACK_QUEEN_SIDE),
            (Square::make(7, 7), CastleRights::BLACK_KING_SIDE),
        ] {
            if from == sq || to == sq {
                rights.remove(side);
            }
        }
        if rights != self.castling {
            self.set_castling(rights);
        }

        self.halfmove_clock = if halfmove_reset { 0 } else { self.halfmove_clock + 1 };
        if us == Color::Black {
            self.fullmove_number += 1;
        }
        self.side_to_move = them;
        self.hash ^= zobrist::side_to_move_key();

        undo
    }

    /// Reverses `m`, restoring the exact state captured in `undo`. `m` must
    /// be the same move just returned from `make_move`.
    pub fn unmake_move(&mut self, m: Move, undo: Undo) {
        let them = self.side_to_move;
        let us = !them;
        let from = m.from_sq();
        let to = m.to_sq();
        let flag = m.flag();

        self.side_to_move = us;
        if us == Color::Black {
            self.fullmove_number -= 1;
        }

        match flag {
            MoveFlag::EnPassant => {
                self.move_piece(Piece::Pawn, us, to, from);
                let captured_sq = Square::make(to.file(), from.rank());
                self.put_piece(Piece::Pawn, them, captured_sq);
            }
            MoveFlag::KingCastle | MoveFlag::QueenCastle => {
                self.move_piece(Piece::King, us, to, from);
                let rank = from.rank();
                let (rook_from, rook_to) = if flag == MoveFlag::KingCastle {
                    (Square::make(7, rank), Square::make(5, rank))
                } else {
                    (Square::make(0, rank), Square::make(3, rank))
                };
                self.move_piece(Piece::Rook, us, rook_to, rook_from);
            }
            _ => {
                if let Some(promo) = flag.promotion_piece() {
                    self.remove_piece(promo, us, to);
                    self.put_piece(Piece::Pawn, us, from);
                } else {
                    let (moved, _) = self
                        .piece_at(to)
                        .expect("unmake_move: destination square is empty");
                    self.move_piece(moved, us, to, from);
                }
                if flag.is_capture() {
                    let captured = undo.captured.expect("capture flag set without recorded capture");
                    self.put_piece(captured, them, to);
                }
            }
        }

        self.castling = undo.castling_rights;
        self.ep_square = undo.en_passant;
        self.halfmove_clock = undo.halfmove_clock;
        self.hash = undo.hash;
    }

    // -- FEN -------------------------------------------------------------

    pub fn from_fen(fen: &str) -> Result<Position, EngineError> {
        let fields: Vec<&str> = fen.split_whitespace().collect();
        if fields.len() != 6 {
            return Err(FenError::WrongFieldCount { found: fields.len() }.into());
        }

        let mut pos = Position::empty();

        let ranks: Vec<&str> = fields[0].split('/').collect();
        if ranks.len() != 8 {
            return Err(FenError::WrongRankCount { found: ranks.len() }.into());
        }
        for (rank_from_top, rank_str) in ranks.iter().enumerate() {
            let rank = 7 - rank_from_top as u8;
            let mut file = 0u8;
            for ch in rank_str.chars() {
                if let Some(skip) = ch.to_digit(10) {
                    file += skip as u8;
                } else {
                    let (piece, color) = Piece::from_char(ch)
                        .ok_or(FenError::UnrecognizedPieceChar { ch })?;
                    if file >= 8 {
                        return Err(FenError::RankOverflowsBoard { rank: rank_str.to_string() }.into());
                    }
                    pos.put_piece(piece, color, Square::make(file, rank));
                    file += 1;
                }
            }
            if file != 8 {
                return Err(FenError::RankOverflowsBoard { rank: rank_str.to_string() }.into());
            }
        }

        pos.side_to_move = match fields[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => return Err(FenError::UnrecognizedSideToMove { found: other.to_string() }.into()),
        };

        let mut rights = CastleRights::NONE;
        if fields[2] != "-" {
            for ch in fields[2].chars() {
                rights |= match ch {
                    'K' => CastleRights::WHITE_KING_SIDE,
                    'Q' => CastleRights::WHITE_QUEEN_SIDE,
                    'k' => CastleRights::BLACK_KING_SIDE,
                    'q' => CastleRights::BLACK_QUEEN_SIDE,
                    ch => return Err(FenError::UnrecognizedCastlingChar { ch }.into()),
                };
            }
        }
        pos.castling = rights;
        pos.hash ^= zobrist::castling_key(pos.castling.bits());

        if fields[3] != "-" {
            let sq = Square::from_algebraic(fields[3])
                .ok_or(FenError::BadEnPassantSquare { found: fields[3].to_string() })?;
            let expected_rank = if pos.side_to_move == Color::White { 5 } else { 2 };
            if sq.rank() != expected_rank {
                return Err(FenError::BadEnPassantSquare { found: fields[3].to_string() }.into());
            }
            pos.ep_square = sq;
            pos.hash ^= zobrist::en_passant_key(sq.file());
        }

        pos.halfmove_clock = fields[4]
            .parse()
            .map_err(|_| FenError::BadHalfmoveClock { found: fields[4].to_string() })?;
        pos.fullmove_number = fields[5]
            .parse::<u16>()
            .map_err(|_| FenError::BadFullmoveNumber { found: fields[5].to_string() })?;
        if pos.fullmove_number == 0 {
            return Err(FenError::BadFullmoveNumber { found: fields[5].to_string() }.into());
        }

        if pos.pieces(Color::White, Piece::King).count_bits() != 1 {
            return Err(FenError::MissingOrDuplicateKing { color: "white" }.into());
        }
        if pos.pieces(Color::Black, Piece::King).count_bits() != 1 {
            return Err(FenError::MissingOrDuplicateKing { color: "black" }.into());
        }
        if pos.in_check(!pos.side_to_move) {
            return Err(FenError::OpponentInCheck.into());
        }

        if pos.side_to_move == Color::Black {
            pos.hash ^= zobrist::side_to_move_key();
        }

        Ok(pos)
    }

    pub fn to_fen(&self) -> String {
        let mut s = String::new();
        for rank_from_top in 0..8u8 {
            let rank = 7 - rank_from_top;
            let mut empty_run = 0u8;
            for file in 0..8u8 {
                let sq = Square::make(file, rank);
                match self.piece_at(sq) {
                    Some((piece, color)) => {
                        if empty_run > 0 {
                            s.push((b'0' + empty_run) as char);
                            empty_run = 0;
                        }
                        s.push(piece.to_char(color));
                    }
                    None => empty_run += 1,
                }
            }
            if empty_run > 0 {
                s.push((b'0' + empty_run) as char);
            }
            if rank_from_top != 7 {
                s.push('/');
            }
        }

        s.push(' ');
        s.push(if self.side_to_move == Color::White { 'w' } else { 'b' });

        s.push(' ');
        if self.castling.is_empty() {
            s.push('-');
        } else {
            if self.castling.has_king_side(Color::White) {
                s.push('K');
            }
            if self.castling.has_queen_side(Color::White) {
                s.push('Q');
            }
            if self.castling.has_king_side(Color::Black) {
                s.push('k');
            }
            if self.castling.has_queen_side(Color::Black) {
                s.push('q');
            }
        }

        s.push(' ');
        if self.ep_square.is_okay() {
            s.push_str(&self.ep_square.to_algebraic());
        } else {
            s.push('-');
        }

        s.push_str(&format!(" {} {}", self.halfmove_clock, self.fullmove_number));
        s
    }

    /// Reflects the board across the horizontal axis and swaps colors, so
    /// the position looks the same to the side now on move as the original
    /// looked to its opponent. Used to test evaluation symmetry.
    pub fn mirrored(&self) -> Position {
        let mut out = Position::empty();
        for color in [Color::White, Color::Black] {
            for &piece in ALL_PIECES.iter() {
                let bb = self.board[color.idx()][piece.idx()].mirror_vertical();
                for sq in bb.iter() {
                    out.put_piece(piece, !color, sq);
                }
            }
        }

        let mut rights = CastleRights::NONE;
        if self.castling.has_king_side(Color::White) {
            rights |= CastleRights::king_side(Color::Black);
        }
        if self.castling.has_queen_side(Color::White) {
            rights |= CastleRights::queen_side(Color::Black);
        }
        if self.castling.has_king_side(Color::Black) {
            rights |= CastleRights::king_side(Color::White);
        }
        if self.castling.has_queen_side(Color::Black) {
            rights |= CastleRights::queen_side(Color::White);
        }
        out.set_castling(rights);

        if self.ep_square.is_okay() {
            out.set_ep_square(self.ep_square.mirror_vertical());
        }

        out.side_to_move = !self.side_to_move;
        if out.side_to_move == Color::Black {
            out.hash ^= zobrist::side_to_move_key();
        }
        out.halfmove_clock = self.halfmove_clock;
        out.fullmove_number = self.fullmove_number;
        out
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Position(\"{}\")", self.to_fen())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starting_position_fen_round_trip() {
        let fen = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";
        let pos = Position::from_fen(fen).unwrap();
        assert_eq!(pos.to_fen(), fen);
    }

    #[test]
    fn kiwipete_fen_round_trip() {
        let fen = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
        let pos = Position::from_fen(fen).unwrap();
        assert_eq!(pos.to_fen(), fen);
    }

    #[test]
    fn rejects_wrong_field_count() {
        assert!(Position::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq -").is_err());
    }

    #[test]
    fn rejects_opponent_in_check() {
        // Black to move, but the white king (the side that just moved) sits
        // in check from a rook with no blocker: illegal resting position.
        let fen = "k6r/8/8/8/8/8/8/7K b - - 0 1";
        assert!(Position::from_fen(fen).is_err());
    }

    #[test]
    fn make_unmake_round_trip_preserves_hash() {
        let mut pos = Position::starting();
        let before_hash = pos.hash();
        let before_fen = pos.to_fen();
        let m = Move::new(
            Square::from_algebraic("e2").unwrap(),
            Square::from_algebraic("e4").unwrap(),
            MoveFlag::DoublePush,
        );
        let undo = pos.make_move(m);
        assert_ne!(pos.hash(), before_hash);
        pos.unmake_move(m, undo);
        assert_eq!(pos.hash(), before_hash);
        assert_eq!(pos.to_fen(), before_fen);
    }

    #[test]
    fn en_passant_capture_removes_passed_pawn() {
        let mut pos = Position::from_fen("8/8/8/K2pP2r/8/8/8/7k w - d6 0 1").unwrap();
        let m = Move::new(
            Square::from_algebraic("e5").unwrap(),
            Square::from_algebraic("d6").unwrap(),
            MoveFlag::EnPassant,
        );
        let undo = pos.make_move(m);
        assert!(pos.piece_at(Square::from_algebraic("d5").unwrap()).is_none());
        pos.unmake_move(m, undo);
        assert!(pos.piece_at(Square::from_algebraic("d5").unwrap()).is_some());
    }

    #[test]
    fn mirroring_twice_restores_the_original() {
        let fen = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
        let pos = Position::from_fen(fen).unwrap();
        assert_eq!(pos.mirrored().mirrored().to_fen(), fen);
    }

    #[test]
    fn mirroring_swaps_side_to_move_and_castling_rights() {
        let pos = Position::from_fen("r3k3/8/8/8/8/8/7P/4K2R w Kq - 0 1").unwrap();
        let mirrored = pos.mirrored();
        assert_eq!(mirrored.side_to_move(), Color::Black);
        assert!(mirrored.castling_rights().has_queen_side(Color::White));
        assert!(mirrored.castling_rights().has_king_side(Color::Black));
        assert!(!mirrored.castling_rights().has_king_side(Color::White));
        assert!(!mirrored.castling_rights().has_queen_side(Color::Black));
    }
}
