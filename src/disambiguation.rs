//! Resolves the origin square of a [`MoveSpec`] against the current
//! [`Board`].
//!
//! Notation usually omits the origin ("Nf3") or only gives a part of it
//! ("Nbd7"). The candidates are all squares holding the moving piece; the
//! origin hint filters them first, then the movement geometry of the piece
//! (and path occlusion for sliding pieces) is checked. A hint that singles
//! out one candidate is trusted without the geometry check. The move is
//! rejected unless exactly one candidate survives: the resolver never
//! guesses.
//!
//! Only the geometry is checked: pins, checks and other rules of legal move
//! generation are out of scope.

use itertools::Itertools;

use crate::chess::board::Board;
use crate::chess::core::{Color, Piece, PieceKind, Rank, Square};
use crate::error::{DisambiguationError, Error, InvalidStateError};
use crate::notation::{MoveFlags, MoveSpec, OriginHint};

/// Finds the square the piece described by `spec` moves from.
///
/// Castling and the identity change following a promotion have fixed
/// origins and do not look at the board.
///
/// # Errors
///
/// - [`DisambiguationError::NotFound`] if no piece can make the move.
/// - [`DisambiguationError::Ambiguous`] if the notation does not tell
///   several candidates apart.
/// - [`InvalidStateError::KingCount`] if a king move is resolved on a board
///   without exactly one king of the moving color.
pub fn resolve_origin(spec: &MoveSpec, board: &Board) -> Result<Square, Error> {
    if let Some(origin) = spec.fixed_origin() {
        return Ok(origin);
    }
    match spec.piece.kind {
        PieceKind::King => Ok(king_square(board, spec.piece.color)?),
        PieceKind::Pawn => Ok(pawn_origin(spec, board)?),
        kind => {
            let candidates = board
                .locations(spec.piece)
                .filter(|square| spec.hint.admits(*square))
                .collect_vec();
            log::trace!(
                "{} candidates for '{}' to {}: [{}]",
                spec.notation,
                spec.piece,
                spec.destination,
                candidates.iter().join(", ")
            );
            // A single candidate picked out by an explicit hint is accepted
            // as is, everything else has to pass the geometry test.
            let candidates = if spec.hint == OriginHint::Unknown || candidates.len() > 1 {
                candidates
                    .into_iter()
                    .filter(|origin| reaches(kind, board, *origin, spec.destination))
                    .collect_vec()
            } else {
                candidates
            };
            match candidates.as_slice() {
                [origin] => Ok(*origin),
                [] => Err(DisambiguationError::NotFound {
                    piece: spec.piece,
                    destination: spec.destination,
                }
                .into()),
                _ => Err(DisambiguationError::Ambiguous {
                    piece: spec.piece,
                    destination: spec.destination,
                    candidates,
                }
                .into()),
            }
        },
    }
}

/// Returns `true` if a piece of the given kind standing on `from` can move
/// to `to` on this board, judging by its movement geometry and, for sliding
/// pieces, by the squares strictly between the two. The occupancy of `to`
/// itself never matters.
///
/// Pawns and kings are resolved without geometry and always return `false`.
#[must_use]
pub fn reaches(kind: PieceKind, board: &Board, from: Square, to: Square) -> bool {
    match kind {
        PieceKind::Knight => is_knight_jump(from, to),
        PieceKind::Bishop => is_diagonal(from, to) && is_path_clear(board, from, to),
        PieceKind::Rook => is_straight(from, to) && is_path_clear(board, from, to),
        PieceKind::Queen => {
            reaches(PieceKind::Bishop, board, from, to) || reaches(PieceKind::Rook, board, from, to)
        },
        PieceKind::King | PieceKind::Pawn => false,
    }
}

/// Row and column distance between the squares.
fn distance(from: Square, to: Square) -> (u8, u8) {
    (from.row().abs_diff(to.row()), from.col().abs_diff(to.col()))
}

fn is_knight_jump(from: Square, to: Square) -> bool {
    matches!(distance(from, to), (1, 2) | (2, 1))
}

fn is_diagonal(from: Square, to: Square) -> bool {
    let (rows, cols) = distance(from, to);
    rows == cols && rows > 0
}

fn is_straight(from: Square, to: Square) -> bool {
    let (rows, cols) = distance(from, to);
    (rows == 0) != (cols == 0)
}

/// Walks from `from` towards `to` along a line (the caller guarantees they
/// share one) and checks that every square strictly in between is vacant.
fn is_path_clear(board: &Board, from: Square, to: Square) -> bool {
    let step = |a: u8, b: u8| -> i8 {
        match b.cmp(&a) {
            std::cmp::Ordering::Less => -1,
            std::cmp::Ordering::Equal => 0,
            std::cmp::Ordering::Greater => 1,
        }
    };
    let (row_step, col_step) = (step(from.row(), to.row()), step(from.col(), to.col()));
    let mut current = from.offset(row_step, col_step);
    while let Some(square) = current {
        if square == to {
            return true;
        }
        if !board.is_vacant(square) {
            return false;
        }
        current = square.offset(row_step, col_step);
    }
    false
}

/// There is exactly one king of each color and it is the only piece that
/// can make a king move.
fn king_square(board: &Board, color: Color) -> Result<Square, InvalidStateError> {
    let kings = board
        .locations(Piece::new(color, PieceKind::King))
        .collect_vec();
    match kings.as_slice() {
        [king] => Ok(*king),
        _ => Err(InvalidStateError::KingCount {
            color,
            found: kings.len(),
        }),
    }
}

fn pawn_origin(spec: &MoveSpec, board: &Board) -> Result<Square, DisambiguationError> {
    let not_found = || DisambiguationError::NotFound {
        piece: spec.piece,
        destination: spec.destination,
    };
    let holds_pawn = |square: Square| board.at(square) == Some(spec.piece);
    let behind = -spec.piece.color.pawn_direction();
    let destination = spec.destination;

    if spec.flags.contains(MoveFlags::CAPTURE) {
        // Captures name the origin file, the origin rank is always the one
        // right behind the destination.
        let file = spec.hint.file().ok_or_else(not_found)?;
        let origin = Square::new(file, destination.rank())
            .offset(behind, 0)
            .filter(|origin| spec.hint.admits(*origin) && holds_pawn(*origin))
            .ok_or_else(not_found)?;
        if origin.col().abs_diff(destination.col()) != 1 {
            return Err(not_found());
        }
        return Ok(origin);
    }

    if !board.is_vacant(destination) {
        return Err(not_found());
    }
    let single_step = destination.offset(behind, 0).ok_or_else(not_found)?;
    if holds_pawn(single_step) {
        return Ok(single_step);
    }
    let double_step = single_step.offset(behind, 0).ok_or_else(not_found)?;
    if double_step.rank() == Rank::pawns_starting(spec.piece.color)
        && holds_pawn(double_step)
        && board.is_vacant(single_step)
    {
        return Ok(double_step);
    }
    Err(not_found())
}
