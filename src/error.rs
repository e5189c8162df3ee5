//! Error types surfaced to callers. Hand-written `Display`/`Error` impls in
//! the teacher's style (see `board/mod.rs::FenBuildError`) rather than a
//! derive-macro crate.

use std::error::Error;
use std::fmt;

/// Failure parsing or validating a FEN record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FenError {
    WrongFieldCount { found: usize },
    WrongRankCount { found: usize },
    RankOverflowsBoard { rank: String },
    UnrecognizedPieceChar { ch: char },
    UnrecognizedSideToMove { found: String },
    UnrecognizedCastlingChar { ch: char },
    BadEnPassantSquare { found: String },
    BadHalfmoveClock { found: String },
    BadFullmoveNumber { found: String },
    MissingOrDuplicateKing { color: &'static str },
    OpponentInCheck,
}

impl fmt::Display for FenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FenError::WrongFieldCount { found } => {
                write!(f, "expected 6 space-separated FEN fields, found {found}")
            }
            FenError::WrongRankCount { found } => {
                write!(f, "expected 8 ranks in board field, found {found}")
            }
            FenError::RankOverflowsBoard { rank } => {
                write!(f, "rank \"{rank}\" describes more than 8 files")
            }
            FenError::UnrecognizedPieceChar { ch } => {
                write!(f, "unrecognized piece character '{ch}'")
            }
            FenError::UnrecognizedSideToMove { found } => {
                write!(f, "side to move must be \"w\" or \"b\", found \"{found}\"")
            }
            FenError::UnrecognizedCastlingChar { ch } => {
                write!(f, "unrecognized castling character '{ch}'")
            }
            FenError::BadEnPassantSquare { found } => {
                write!(f, "en passant field \"{found}\" is not \"-\" or a rank 3/6 square")
            }
            FenError::BadHalfmoveClock { found } => {
                write!(f, "halfmove clock \"{found}\" is not a non-negative integer")
            }
            FenError::BadFullmoveNumber { found } => {
                write!(f, "fullmove number \"{found}\" is not a positive integer")
            }
            FenError::MissingOrDuplicateKing { color } => {
                write!(f, "{color} must have exactly one king")
            }
            FenError::OpponentInCheck => {
                write!(f, "side not to move is in check")
            }
        }
    }
}

impl Error for FenError {}

/// A move passed to `movegen::make_legal_move` was not a member of the
/// legal move set generated for that position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IllegalMoveError;

impl fmt::Display for IllegalMoveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "move is not legal in the given position")
    }
}

impl Error for IllegalMoveError {}

/// A search or perft call received a non-positive depth.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InvalidDepthError(pub i64);

impl fmt::Display for InvalidDepthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "depth must be positive, got {}", self.0)
    }
}

impl Error for InvalidDepthError {}

/// Unified error surfaced across the crate's public entry points.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EngineError {
    Fen(FenError),
    IllegalMove(IllegalMoveError),
    InvalidDepth(InvalidDepthError),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::Fen(e) => write!(f, "{e}"),
            EngineError::IllegalMove(e) => write!(f, "{e}"),
            EngineError::InvalidDepth(e) => write!(f, "{e}"),
        }
    }
}

impl Error for EngineError {}

impl From<FenError> for EngineError {
    fn from(e: FenError) -> EngineError {
        EngineError::Fen(e)
    }
}

impl From<IllegalMoveError> for EngineError {
    fn from(e: IllegalMoveError) -> EngineError {
        EngineError::IllegalMove(e)
    }
}

impl From<InvalidDepthError> for EngineError {
    fn from(e: InvalidDepthError) -> EngineError {
        EngineError::InvalidDepth(e)
    }
}
