//! Parser for [Standard Algebraic Notation] (SAN) moves.
//!
//! A move string is turned into one or two [`MoveSpec`]s without looking at
//! the board: a spec names the moving piece, whatever part of the origin
//! the notation reveals and the destination. Finding the actual origin is
//! the job of [`crate::disambiguation`].
//!
//! The grammar is
//!
//! ```text
//! move        := castle | piece-move
//! castle      := ("O-O" | "O-O-O") suffix
//! piece-move  := [piece] [file] [rank] ["x"] file rank [["="] piece] suffix
//! suffix      := ["+" | "#"] annotations
//! ```
//!
//! where `piece` is one of `KQRBN` (its absence means a pawn move) and the
//! optional file and rank preceding the destination narrow down which of
//! the pieces is moving.
//!
//! [Standard Algebraic Notation]: https://www.chessprogramming.org/Algebraic_Chess_Notation#Standard_Algebraic_Notation_.28SAN.29

use arrayvec::ArrayVec;

use crate::chess::core::{Color, File, Piece, PieceKind, Promotion, Rank, Square};
use crate::error::{ParseError, ParseErrorKind};

bitflags::bitflags! {
    /// Properties of a move that are spelled out in the notation.
    ///
    /// Check and mate markers are informational only: they are never used to
    /// resolve the move.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct MoveFlags: u8 {
        /// The move takes an opponent's piece (`x`).
        const CAPTURE = 1;
        /// A pawn reaches the last rank and changes its identity (`=Q`).
        const PROMOTION = 1 << 1;
        /// One of the two halves of castling (`O-O` or `O-O-O`).
        const CASTLE = 1 << 2;
        /// The move gives check (`+`).
        const CHECK = 1 << 3;
        /// The move gives mate (`#`).
        const MATE = 1 << 4;
        /// Pawn capture onto the vacant square behind a pawn that has just
        /// advanced two squares. Never spelled out in SAN: it is detected
        /// while replaying.
        const EN_PASSANT = 1 << 5;
    }
}

/// The part of the origin square revealed by the notation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OriginHint {
    /// Nothing is known: "Nf3".
    Unknown,
    /// Origin file is known: "Nbd7", "exd5".
    File(File),
    /// Origin rank is known: "R1a3".
    Rank(Rank),
    /// The whole origin square is known: "Qh4e1".
    Square(Square),
}

impl OriginHint {
    /// Returns `true` if the square is compatible with the hint.
    #[must_use]
    pub fn admits(self, square: Square) -> bool {
        match self {
            Self::Unknown => true,
            Self::File(file) => square.file() == file,
            Self::Rank(rank) => square.rank() == rank,
            Self::Square(origin) => square == origin,
        }
    }

    /// Origin file if the notation specifies it.
    #[must_use]
    pub const fn file(self) -> Option<File> {
        match self {
            Self::File(file) => Some(file),
            Self::Square(square) => Some(square.file()),
            Self::Unknown | Self::Rank(_) => None,
        }
    }
}

/// A single relocation described by the notation, before its origin is
/// resolved against the board.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoveSpec {
    /// Zero-based ply index.
    pub ply: usize,
    /// Raw notation as it was supplied.
    pub notation: String,
    /// The piece that ends up on the destination square.
    pub piece: Piece,
    #[allow(missing_docs)]
    pub hint: OriginHint,
    #[allow(missing_docs)]
    pub destination: Square,
    #[allow(missing_docs)]
    pub flags: MoveFlags,
    /// Target of the promotion, if any.
    pub promotion: Option<Promotion>,
}

impl MoveSpec {
    /// Origin that does not require looking at the board: both halves of
    /// castling and the in-place identity change following a promotion.
    #[must_use]
    pub fn fixed_origin(&self) -> Option<Square> {
        match self.hint {
            OriginHint::Square(origin) if self.is_castle() || self.is_promotion_identity() => {
                Some(origin)
            },
            _ => None,
        }
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn is_castle(&self) -> bool {
        self.flags.contains(MoveFlags::CASTLE)
    }

    /// Returns `true` for the synthetic record of a pawn turning into the
    /// promoted piece on its square.
    #[must_use]
    pub fn is_promotion_identity(&self) -> bool {
        self.flags.contains(MoveFlags::PROMOTION) && self.piece.kind != PieceKind::Pawn
    }
}

/// Specs produced by a single notation string: castling and promotion yield
/// two, everything else yields one.
pub type MoveSpecs = ArrayVec<MoveSpec, 2>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Token {
    Piece(PieceKind),
    File(File),
    Rank(Rank),
    Capture,
    Promote,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum CastleSide {
    King,
    Queen,
}

/// Parses the move played at the given ply. The ply parity determines the
/// side that moves: White plays even plies.
///
/// ```
/// use sanreplay::chess::core::{Color, PieceKind, Square};
/// use sanreplay::notation::{self, OriginHint};
///
/// let specs = notation::parse(2, "Nbd7").unwrap();
/// assert_eq!(specs.len(), 1);
/// assert_eq!(specs[0].piece.color, Color::White);
/// assert_eq!(specs[0].piece.kind, PieceKind::Knight);
/// assert_eq!(specs[0].hint, OriginHint::File(sanreplay::chess::core::File::B));
/// assert_eq!(specs[0].destination, Square::D7);
/// ```
///
/// # Errors
///
/// Returns [`ParseError`] when the string does not match the grammar.
pub fn parse(ply: usize, notation: &str) -> Result<MoveSpecs, ParseError> {
    let error = |kind| ParseError {
        ply,
        notation: notation.to_string(),
        kind,
    };
    let color = Color::from_ply(ply);
    let (body, mut flags) = strip_suffix(notation.trim());
    if body.is_empty() {
        return Err(error(ParseErrorKind::Empty));
    }
    if let Some(side) = castle_side(body) {
        return Ok(castle(ply, notation, color, side, flags));
    }

    let tokens = lex(body).map_err(error)?;
    let (kind, rest) = match tokens.as_slice() {
        [Token::Piece(kind), rest @ ..] => (*kind, rest),
        rest => (PieceKind::Pawn, rest),
    };
    let (rest, promotion) = match rest {
        [head @ .., Token::Promote, Token::Piece(target)] => (head, Some(*target)),
        // "e8Q": the '=' is optional.
        [head @ .., Token::Piece(target)] if kind == PieceKind::Pawn => (head, Some(*target)),
        _ => (rest, None),
    };
    let (rest, destination) = match rest {
        [rest @ .., Token::File(file), Token::Rank(rank)] => (rest, Square::new(*file, *rank)),
        _ if rest.contains(&Token::Promote) => {
            return Err(error(ParseErrorKind::MalformedPromotion))
        },
        _ => return Err(error(ParseErrorKind::MissingDestination)),
    };
    let rest = match rest {
        [rest @ .., Token::Capture] => {
            flags |= MoveFlags::CAPTURE;
            rest
        },
        rest => rest,
    };
    let hint = match rest {
        [] => OriginHint::Unknown,
        [Token::File(file)] => OriginHint::File(*file),
        [Token::Rank(rank)] => OriginHint::Rank(*rank),
        [Token::File(file), Token::Rank(rank)] => OriginHint::Square(Square::new(*file, *rank)),
        _ if rest.contains(&Token::Promote) => {
            return Err(error(ParseErrorKind::MalformedPromotion))
        },
        _ => return Err(error(ParseErrorKind::MalformedDisambiguation)),
    };

    if kind == PieceKind::Pawn {
        // Pushes never carry an origin hint, captures always name the file.
        match (flags.contains(MoveFlags::CAPTURE), hint) {
            (true, hint) if hint.file().is_none() => {
                return Err(error(ParseErrorKind::MissingCaptureFile))
            },
            (false, OriginHint::File(_) | OriginHint::Rank(_) | OriginHint::Square(_)) => {
                return Err(error(ParseErrorKind::MalformedDisambiguation))
            },
            _ => (),
        }
    }
    let reaches_last_rank = destination.rank() == Rank::promotion(color);
    let promotion = match promotion {
        Some(target) => {
            if kind != PieceKind::Pawn || !reaches_last_rank {
                return Err(error(ParseErrorKind::MalformedPromotion));
            }
            Some(Promotion::try_from(target).map_err(|_| error(ParseErrorKind::MalformedPromotion))?)
        },
        None if kind == PieceKind::Pawn && reaches_last_rank => {
            return Err(error(ParseErrorKind::MissingPromotion))
        },
        None => None,
    };

    let mut specs = MoveSpecs::new();
    let mut spec = MoveSpec {
        ply,
        notation: notation.to_string(),
        piece: Piece::new(color, kind),
        hint,
        destination,
        flags,
        promotion,
    };
    if let Some(target) = promotion {
        spec.flags |= MoveFlags::PROMOTION;
        let identity = MoveSpec {
            piece: Piece::new(color, target.into()),
            hint: OriginHint::Square(destination),
            ..spec.clone()
        };
        specs.push(spec);
        specs.push(identity);
    } else {
        specs.push(spec);
    }
    Ok(specs)
}

/// Splits off check/mate markers and annotation glyphs ("!", "?", "!?").
/// Annotation glyphs may stand on either side of the check or mate marker
/// ("Nf3+!" and "Nf3!+" are both accepted).
fn strip_suffix(notation: &str) -> (&str, MoveFlags) {
    let glyphs = ['!', '?'];
    let body = notation.trim_end_matches(glyphs);
    let (body, flags) = if let Some(body) = body.strip_suffix('#') {
        (body, MoveFlags::MATE)
    } else if let Some(body) = body.strip_suffix('+') {
        (body, MoveFlags::CHECK)
    } else {
        (body, MoveFlags::empty())
    };
    (body.trim_end_matches(glyphs), flags)
}

fn castle_side(body: &str) -> Option<CastleSide> {
    match body {
        "O-O" | "0-0" => Some(CastleSide::King),
        "O-O-O" | "0-0-0" => Some(CastleSide::Queen),
        _ => None,
    }
}

/// Castling is fully determined by the side and the color: the rook
/// relocation comes first, then the king's.
fn castle(ply: usize, notation: &str, color: Color, side: CastleSide, flags: MoveFlags) -> MoveSpecs {
    let backrank = Rank::backrank(color);
    let (rook_from, rook_to, king_to) = match side {
        CastleSide::King => (File::H, File::F, File::G),
        CastleSide::Queen => (File::A, File::D, File::C),
    };
    let relocation = |kind, from, to| MoveSpec {
        ply,
        notation: notation.to_string(),
        piece: Piece::new(color, kind),
        hint: OriginHint::Square(Square::new(from, backrank)),
        destination: Square::new(to, backrank),
        flags: flags | MoveFlags::CASTLE,
        promotion: None,
    };
    let mut specs = MoveSpecs::new();
    specs.push(relocation(PieceKind::Rook, rook_from, rook_to));
    specs.push(relocation(PieceKind::King, File::E, king_to));
    specs
}

fn lex(body: &str) -> Result<Vec<Token>, ParseErrorKind> {
    body.chars()
        .map(|symbol| {
            match symbol {
                'x' | ':' => Some(Token::Capture),
                '=' => Some(Token::Promote),
                'a'..='h' => File::try_from(symbol).ok().map(Token::File),
                '1'..='8' => Rank::try_from(symbol).ok().map(Token::Rank),
                _ => PieceKind::from_san_letter(symbol).map(Token::Piece),
            }
            .ok_or(ParseErrorKind::UnexpectedSymbol(symbol))
        })
        .collect()
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;

    fn single(ply: usize, notation: &str) -> MoveSpec {
        let specs = parse(ply, notation).unwrap();
        assert_eq!(specs.len(), 1, "{notation}");
        specs[0].clone()
    }

    fn rejected(ply: usize, notation: &str) -> ParseErrorKind {
        let error = parse(ply, notation).unwrap_err();
        assert_eq!(error.ply, ply);
        assert_eq!(error.notation, notation);
        error.kind
    }

    #[test]
    fn pawn_push() {
        let spec = single(0, "e4");
        assert_eq!(spec.piece, Piece::new(Color::White, PieceKind::Pawn));
        assert_eq!(spec.hint, OriginHint::Unknown);
        assert_eq!(spec.destination, Square::E4);
        assert_eq!(spec.flags, MoveFlags::empty());
        assert_eq!(spec.promotion, None);
        assert_eq!(spec.notation, "e4");

        let spec = single(1, "e5");
        assert_eq!(spec.piece, Piece::new(Color::Black, PieceKind::Pawn));
    }

    #[test]
    fn pieces() {
        let spec = single(1, "Nf3");
        assert_eq!(spec.piece, Piece::new(Color::Black, PieceKind::Knight));
        assert_eq!(spec.destination, Square::F3);
        assert_eq!(spec.hint, OriginHint::Unknown);

        for (notation, kind) in [
            ("Bb5", PieceKind::Bishop),
            ("Re1", PieceKind::Rook),
            ("Qd1", PieceKind::Queen),
            ("Kf1", PieceKind::King),
        ] {
            assert_eq!(single(0, notation).piece.kind, kind);
        }
    }

    #[test]
    fn captures() {
        let spec = single(0, "exd5");
        assert_eq!(spec.piece.kind, PieceKind::Pawn);
        assert_eq!(spec.hint, OriginHint::File(File::E));
        assert_eq!(spec.destination, Square::D5);
        assert_eq!(spec.flags, MoveFlags::CAPTURE);

        let spec = single(3, "Bxf3");
        assert_eq!(spec.piece, Piece::new(Color::Black, PieceKind::Bishop));
        assert_eq!(spec.hint, OriginHint::Unknown);
        assert_eq!(spec.flags, MoveFlags::CAPTURE);

        assert_eq!(single(0, "e:d5").hint, OriginHint::File(File::E));
    }

    #[test]
    fn disambiguation() {
        assert_eq!(single(0, "Rad1").hint, OriginHint::File(File::A));
        assert_eq!(single(0, "R1a3").hint, OriginHint::Rank(Rank::One));
        assert_eq!(
            single(0, "Qh4e1").hint,
            OriginHint::Square(Square::H4)
        );
        let spec = single(1, "Nbxd7");
        assert_eq!(spec.hint, OriginHint::File(File::B));
        assert_eq!(spec.destination, Square::D7);
        assert_eq!(spec.flags, MoveFlags::CAPTURE);
        let spec = single(0, "Qh4xe1#");
        assert_eq!(spec.hint, OriginHint::Square(Square::H4));
        assert_eq!(spec.flags, MoveFlags::CAPTURE | MoveFlags::MATE);
    }

    #[test]
    fn suffixes() {
        assert_eq!(single(0, "Bxd7+").flags, MoveFlags::CAPTURE | MoveFlags::CHECK);
        assert_eq!(single(0, "Rd8#").flags, MoveFlags::MATE);
        assert_eq!(single(0, "Nf3!").flags, MoveFlags::empty());
        assert_eq!(single(0, "Qh5+?!").flags, MoveFlags::CHECK);
        let spec = single(0, "Nf3!+");
        assert_eq!((spec.destination, spec.flags), (Square::F3, MoveFlags::CHECK));
        assert_eq!(single(0, "Rd8?!#").flags, MoveFlags::MATE);
        assert_eq!(single(0, "Bxf7!+!").flags, MoveFlags::CAPTURE | MoveFlags::CHECK);
        let specs = parse(0, "O-O!+").unwrap();
        assert!(specs.iter().all(MoveSpec::is_castle));
        assert!(specs
            .iter()
            .all(|spec| spec.flags.contains(MoveFlags::CHECK)));
        assert_eq!(single(0, " e4 ").destination, Square::E4);
    }

    #[test]
    fn castling() {
        let specs = parse(0, "O-O").unwrap();
        assert_eq!(specs.len(), 2);
        assert_eq!(specs[0].piece, Piece::new(Color::White, PieceKind::Rook));
        assert_eq!(specs[0].fixed_origin(), Some(Square::H1));
        assert_eq!(specs[0].destination, Square::F1);
        assert_eq!(specs[1].piece, Piece::new(Color::White, PieceKind::King));
        assert_eq!(specs[1].fixed_origin(), Some(Square::E1));
        assert_eq!(specs[1].destination, Square::G1);
        assert!(specs.iter().all(MoveSpec::is_castle));

        let specs = parse(1, "O-O-O+").unwrap();
        assert_eq!(specs[0].piece, Piece::new(Color::Black, PieceKind::Rook));
        assert_eq!(specs[0].fixed_origin(), Some(Square::A8));
        assert_eq!(specs[0].destination, Square::D8);
        assert_eq!(specs[1].fixed_origin(), Some(Square::E8));
        assert_eq!(specs[1].destination, Square::C8);
        assert_eq!(specs[1].flags, MoveFlags::CASTLE | MoveFlags::CHECK);

        let specs = parse(1, "0-0").unwrap();
        assert_eq!(specs[1].destination, Square::G8);
    }

    #[test]
    fn promotion() {
        let specs = parse(0, "e8=Q").unwrap();
        assert_eq!(specs.len(), 2);
        assert_eq!(specs[0].piece, Piece::new(Color::White, PieceKind::Pawn));
        assert_eq!(specs[0].hint, OriginHint::Unknown);
        assert_eq!(specs[0].destination, Square::E8);
        assert_eq!(specs[0].promotion, Some(Promotion::Queen));
        assert_eq!(specs[0].fixed_origin(), None);
        assert!(!specs[0].is_promotion_identity());
        assert_eq!(specs[1].piece, Piece::new(Color::White, PieceKind::Queen));
        assert_eq!(specs[1].fixed_origin(), Some(Square::E8));
        assert_eq!(specs[1].destination, Square::E8);
        assert!(specs[1].is_promotion_identity());
        assert!(specs
            .iter()
            .all(|spec| spec.flags.contains(MoveFlags::PROMOTION)));

        let specs = parse(1, "gxh1=N+").unwrap();
        assert_eq!(specs[0].hint, OriginHint::File(File::G));
        assert_eq!(specs[0].destination, Square::H1);
        assert_eq!(
            specs[0].flags,
            MoveFlags::CAPTURE | MoveFlags::PROMOTION | MoveFlags::CHECK
        );
        assert_eq!(specs[1].piece, Piece::new(Color::Black, PieceKind::Knight));

        let specs = parse(0, "a8R").unwrap();
        assert_eq!(specs[0].promotion, Some(Promotion::Rook));
        assert_eq!(specs[1].piece.kind, PieceKind::Rook);
    }

    #[test]
    fn malformed() {
        assert_eq!(rejected(0, ""), ParseErrorKind::Empty);
        assert_eq!(rejected(0, "+"), ParseErrorKind::Empty);
        assert_eq!(rejected(0, "e9"), ParseErrorKind::UnexpectedSymbol('9'));
        assert_eq!(rejected(0, "Zf3"), ParseErrorKind::UnexpectedSymbol('Z'));
        assert_eq!(rejected(0, "O-O-O-O"), ParseErrorKind::UnexpectedSymbol('O'));
        assert_eq!(rejected(0, "N"), ParseErrorKind::MissingDestination);
        assert_eq!(rejected(0, "Nf"), ParseErrorKind::MissingDestination);
        assert_eq!(rejected(0, "Nxf3x"), ParseErrorKind::MissingDestination);
        assert_eq!(rejected(0, "Nbb1f3"), ParseErrorKind::MalformedDisambiguation);
        assert_eq!(rejected(0, "Nxbf3"), ParseErrorKind::MalformedDisambiguation);
        assert_eq!(rejected(0, "de4"), ParseErrorKind::MalformedDisambiguation);
        assert_eq!(rejected(0, "3e4"), ParseErrorKind::MalformedDisambiguation);
        assert_eq!(rejected(0, "d3e4"), ParseErrorKind::MalformedDisambiguation);
        assert_eq!(rejected(0, "3xe4"), ParseErrorKind::MissingCaptureFile);
        assert_eq!(rejected(0, "xd5"), ParseErrorKind::MissingCaptureFile);
        assert_eq!(rejected(0, "e8="), ParseErrorKind::MalformedPromotion);
        assert_eq!(rejected(0, "e8=K"), ParseErrorKind::MalformedPromotion);
        assert_eq!(rejected(0, "e7=Q"), ParseErrorKind::MalformedPromotion);
        assert_eq!(rejected(1, "e8=Q"), ParseErrorKind::MalformedPromotion);
        assert_eq!(rejected(0, "Ne8=Q"), ParseErrorKind::MalformedPromotion);
        assert_eq!(rejected(0, "e8"), ParseErrorKind::MissingPromotion);
        assert_eq!(rejected(1, "dxc1"), ParseErrorKind::MissingPromotion);
    }

    #[test]
    fn error_message() {
        assert_eq!(
            parse(7, "Nz3").unwrap_err().to_string(),
            "move 7 (\"Nz3\"): unexpected symbol 'z'"
        );
    }
}
