//! Replays a move list against a [`Board`], turning every notation string
//! into fully resolved [`MoveRecord`]s.
//!
//! Moves are applied strictly in order: resolving a move depends on the
//! board produced by all the moves before it. A [`Replay`] session owns the
//! board and is the accumulator of that fold.

use std::fmt;

use arrayvec::ArrayVec;
use itertools::Itertools;

use crate::chess::board::Board;
use crate::chess::core::{Piece, PieceKind, Promotion, Square};
use crate::disambiguation::resolve_origin;
use crate::error::{Error, InvalidStateError, ParseError, ReplayError};
use crate::notation::{self, MoveFlags, MoveSpec};

/// A single relocation with both ends known.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoveRecord {
    /// Zero-based ply index.
    pub ply: usize,
    /// Raw notation the record was resolved from.
    pub notation: String,
    /// The piece that ends up on the destination square. For the identity
    /// change following a promotion it is the promoted piece.
    pub piece: Piece,
    #[allow(missing_docs)]
    pub origin: Square,
    #[allow(missing_docs)]
    pub destination: Square,
    #[allow(missing_docs)]
    pub flags: MoveFlags,
    /// Target of the promotion, if any.
    pub promotion: Option<Promotion>,
}

impl MoveRecord {
    fn new(spec: MoveSpec, origin: Square, board: &Board) -> Self {
        let mut flags = spec.flags;
        if is_en_passant(&spec, origin, board) {
            flags |= MoveFlags::EN_PASSANT;
        }
        Self {
            ply: spec.ply,
            notation: spec.notation,
            piece: spec.piece,
            origin,
            destination: spec.destination,
            flags,
            promotion: spec.promotion,
        }
    }

    /// The piece expected on the origin square before the record is applied.
    #[must_use]
    pub fn moving_piece(&self) -> Piece {
        if self.flags.contains(MoveFlags::PROMOTION) {
            Piece::new(self.piece.color, PieceKind::Pawn)
        } else {
            self.piece
        }
    }

    /// Square of the pawn taken en passant.
    fn en_passant_victim(&self) -> Square {
        Square::new(self.destination.file(), self.origin.rank())
    }
}

impl fmt::Display for MoveRecord {
    /// Tab-separated: ply, notation, color, piece, origin, destination and
    /// comma-separated flags (`-` when there are none).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let flags = if self.flags.is_empty() {
            "-".to_string()
        } else {
            self.flags
                .iter_names()
                .map(|(name, _)| name.to_lowercase())
                .join(",")
        };
        write!(
            f,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}",
            self.ply,
            self.notation,
            self.piece.color,
            self.piece.kind.name(),
            self.origin,
            self.destination,
            flags
        )
    }
}

/// Records produced by a single notation string: castling and promotion
/// yield two, everything else yields one.
pub type MoveRecords = ArrayVec<MoveRecord, 2>;

/// A pawn capturing onto a vacant square takes the enemy pawn that stands
/// next to it on the destination file.
fn is_en_passant(spec: &MoveSpec, origin: Square, board: &Board) -> bool {
    let color = spec.piece.color;
    spec.piece.kind == PieceKind::Pawn
        && spec.flags.contains(MoveFlags::CAPTURE)
        && board.is_vacant(spec.destination)
        && board.at(Square::new(spec.destination.file(), origin.rank()))
            == Some(Piece::new(color.opponent(), PieceKind::Pawn))
}

/// Applies a resolved record to the board: the origin is cleared and the
/// piece is written to the destination, replacing whatever stood there.
///
/// # Errors
///
/// Returns [`InvalidStateError::MissingPiece`] and leaves the board intact
/// if the origin does not hold the moving piece (a pawn for the identity
/// change following a promotion).
pub fn execute(board: &mut Board, record: &MoveRecord) -> Result<(), InvalidStateError> {
    let expected = record.moving_piece();
    let found = board.at(record.origin);
    if found != Some(expected) {
        return Err(InvalidStateError::MissingPiece {
            expected,
            square: record.origin,
            found,
        });
    }
    if record.flags.contains(MoveFlags::EN_PASSANT) {
        let _ = board.remove(record.en_passant_victim());
    }
    let _ = board.remove(record.origin);
    board.put(record.destination, record.piece);
    Ok(())
}

/// Parses, resolves and executes one notation string on the board. On
/// failure the board may hold a partially applied move.
fn apply(board: &mut Board, ply: usize, notation: &str) -> Result<MoveRecords, Error> {
    let mut records = MoveRecords::new();
    for spec in notation::parse(ply, notation)? {
        let origin = resolve_origin(&spec, board)?;
        let record = MoveRecord::new(spec, origin, board);
        execute(board, &record)?;
        log::debug!("{record}");
        records.push(record);
    }
    Ok(records)
}

/// Replay session: the board after all the moves played so far.
///
/// ```
/// use sanreplay::chess::core::Square;
/// use sanreplay::Replay;
///
/// let mut replay = Replay::new();
/// let records = replay.play(0, "e4").unwrap();
/// assert_eq!(records[0].origin, Square::E2);
/// let records = replay.play(1, "Nf6").unwrap();
/// assert_eq!(records[0].origin, Square::G8);
/// ```
#[derive(Clone, Debug, Default)]
pub struct Replay {
    board: Board,
}

impl Replay {
    /// Creates a session starting from the standard position.
    #[must_use]
    pub fn new() -> Self {
        Self::from_board(Board::starting())
    }

    /// Creates a session starting from a caller-supplied position.
    #[must_use]
    pub const fn from_board(board: Board) -> Self {
        Self { board }
    }

    /// Current position.
    #[must_use]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn into_board(self) -> Board {
        self.board
    }

    /// Resolves the move played at the given ply and applies it.
    ///
    /// # Errors
    ///
    /// Returns [`Error`] if the notation can not be parsed, resolved or
    /// executed. The board is left as it was before the call.
    pub fn play(&mut self, ply: usize, notation: &str) -> Result<MoveRecords, Error> {
        let mut board = self.board.clone();
        let records = apply(&mut board, ply, notation)?;
        self.board = board;
        Ok(records)
    }

    /// Resolves the move the way [`Replay::play`] does but does not change
    /// the position.
    ///
    /// # Errors
    ///
    /// Same as [`Replay::play`].
    pub fn resolve(&self, ply: usize, notation: &str) -> Result<MoveRecords, Error> {
        let mut board = self.board.clone();
        apply(&mut board, ply, notation)
    }

    /// Plays the moves in order and stops at the first one that fails.
    ///
    /// # Errors
    ///
    /// Returns [`ReplayError`] for the failing move. The session keeps the
    /// position right before it.
    pub fn play_all<I, S>(&mut self, moves: I) -> Result<Vec<MoveRecord>, ReplayError>
    where
        I: IntoIterator<Item = (usize, S)>,
        S: AsRef<str>,
    {
        let mut records = Vec::new();
        for (ply, notation) in moves {
            let notation = notation.as_ref();
            match self.play(ply, notation) {
                Ok(resolved) => records.extend(resolved),
                Err(source) => {
                    return Err(ReplayError {
                        ply,
                        notation: notation.to_string(),
                        source,
                    })
                },
            }
        }
        Ok(records)
    }
}

/// Replays the moves from the standard starting position.
///
/// ```
/// use sanreplay::chess::core::Square;
///
/// let records = sanreplay::replay::replay([(0, "e4"), (1, "e5"), (2, "Nf3")]).unwrap();
/// assert_eq!(records.len(), 3);
/// assert_eq!(records[2].origin, Square::G1);
/// ```
///
/// # Errors
///
/// Returns [`ReplayError`] for the first move that can not be parsed,
/// resolved or executed.
pub fn replay<I, S>(moves: I) -> Result<Vec<MoveRecord>, ReplayError>
where
    I: IntoIterator<Item = (usize, S)>,
    S: AsRef<str>,
{
    replay_from(Board::starting(), moves)
}

/// Replays the moves from the given position.
///
/// # Errors
///
/// Same as [`replay`].
pub fn replay_from<I, S>(board: Board, moves: I) -> Result<Vec<MoveRecord>, ReplayError>
where
    I: IntoIterator<Item = (usize, S)>,
    S: AsRef<str>,
{
    Replay::from_board(board).play_all(moves)
}

/// Parses every move of the list without touching any board. A malformed
/// move is reported and the rest of the list is still parsed.
pub fn parse_all<I, S>(moves: I) -> (Vec<MoveSpec>, Vec<ParseError>)
where
    I: IntoIterator<Item = (usize, S)>,
    S: AsRef<str>,
{
    let mut specs = Vec::new();
    let mut errors = Vec::new();
    for (ply, notation) in moves {
        match notation::parse(ply, notation.as_ref()) {
            Ok(parsed) => specs.extend(parsed),
            Err(error) => {
                log::warn!("{error}");
                errors.push(error);
            },
        }
    }
    (specs, errors)
}
