//! Errors produced while turning notation into move records.
//!
//! Parsing failures ([`ParseError`]) never depend on the board and can be
//! collected across a whole move list. Resolution and execution failures
//! ([`DisambiguationError`], [`InvalidStateError`]) leave the board state
//! unreliable for the rest of the game, so a replay stops at the first one
//! and reports it as a [`ReplayError`].

use itertools::Itertools;
use thiserror::Error;

use crate::chess::core::{Color, Piece, Square};

/// Notation string does not match the move grammar.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("move {ply} ({notation:?}): {kind}")]
pub struct ParseError {
    /// Zero-based ply index of the move.
    pub ply: usize,
    /// Raw notation as it was supplied.
    pub notation: String,
    #[allow(missing_docs)]
    pub kind: ParseErrorKind,
}

/// The reason a notation string was rejected.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    #[error("empty notation")]
    Empty,
    #[error("unexpected symbol '{0}'")]
    UnexpectedSymbol(char),
    #[error("missing destination square")]
    MissingDestination,
    #[error("malformed disambiguation")]
    MalformedDisambiguation,
    #[error("pawn captures have to specify the origin file")]
    MissingCaptureFile,
    #[error("malformed promotion suffix")]
    MalformedPromotion,
    #[error("pawn reaching the last rank has to be promoted")]
    MissingPromotion,
}

/// Zero or more than one origin candidate survived filtering.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DisambiguationError {
    /// No piece of the moving kind can make the move.
    #[error("no '{piece}' can move to {destination}")]
    NotFound {
        #[allow(missing_docs)]
        piece: Piece,
        #[allow(missing_docs)]
        destination: Square,
    },
    /// Several pieces of the moving kind can make the move and the notation
    /// does not tell them apart.
    #[error(
        "'{piece}' to {destination} is ambiguous between {}",
        .candidates.iter().join(", ")
    )]
    Ambiguous {
        #[allow(missing_docs)]
        piece: Piece,
        #[allow(missing_docs)]
        destination: Square,
        /// Origins that remained after all filters.
        candidates: Vec<Square>,
    },
}

/// Board is in a state the move can not be applied to.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidStateError {
    /// Every side has to have exactly one king for king moves to resolve.
    #[error("expected 1 {color} king, got {found}")]
    KingCount {
        #[allow(missing_docs)]
        color: Color,
        #[allow(missing_docs)]
        found: usize,
    },
    /// The origin of a relocation does not hold the piece that is supposed
    /// to move.
    #[error("expected '{expected}' on {square}, got {}", .found.map_or_else(|| "empty square".to_string(), |piece| format!("'{piece}'")))]
    MissingPiece {
        #[allow(missing_docs)]
        expected: Piece,
        #[allow(missing_docs)]
        square: Square,
        #[allow(missing_docs)]
        found: Option<Piece>,
    },
}

/// Any failure of processing a single notation string.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Disambiguation(#[from] DisambiguationError),
    #[error(transparent)]
    InvalidState(#[from] InvalidStateError),
}

/// A replay stopped at the move that could not be resolved or applied. The
/// board reflects every move before it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("replay stopped at move {ply} ({notation:?})")]
pub struct ReplayError {
    /// Zero-based ply index of the failing move.
    pub ply: usize,
    /// Raw notation of the failing move.
    pub notation: String,
    /// What went wrong.
    #[source]
    pub source: Error,
}
