//! Chess primitives commonly used within [`crate::chess`] and by the notation
//! machinery built on top of it.

use std::fmt::{self, Write};

use anyhow::bail;
use itertools::Itertools;

#[allow(missing_docs)]
pub const BOARD_WIDTH: u8 = 8;
#[allow(missing_docs)]
pub const BOARD_SIZE: u8 = BOARD_WIDTH * BOARD_WIDTH;

/// Board squares: from left to right, from bottom to the top:
///
/// ```
/// use sanreplay::chess::core::Square;
///
/// assert_eq!(Square::A1 as u8, 0);
/// assert_eq!(Square::E1 as u8, 4);
/// assert_eq!(Square::H1 as u8, 7);
/// assert_eq!(Square::A4 as u8, 8 * 3);
/// assert_eq!(Square::H8 as u8, 63);
/// ```
///
/// Move records address squares by `(row, col)` where row 0 is the eighth
/// rank (the board is read top-down, starting from Black's back rank) and
/// col 0 is the a-file:
///
/// ```
/// use sanreplay::chess::core::Square;
///
/// assert_eq!((Square::A8.row(), Square::A8.col()), (0, 0));
/// assert_eq!((Square::E4.row(), Square::E4.col()), (4, 4));
/// assert_eq!((Square::H1.row(), Square::H1.col()), (7, 7));
/// assert_eq!(Square::from_row_col(7, 6), Some(Square::G1));
/// ```
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[rustfmt::skip]
#[allow(missing_docs)]
pub enum Square {
    A1, B1, C1, D1, E1, F1, G1, H1,
    A2, B2, C2, D2, E2, F2, G2, H2,
    A3, B3, C3, D3, E3, F3, G3, H3,
    A4, B4, C4, D4, E4, F4, G4, H4,
    A5, B5, C5, D5, E5, F5, G5, H5,
    A6, B6, C6, D6, E6, F6, G6, H6,
    A7, B7, C7, D7, E7, F7, G7, H7,
    A8, B8, C8, D8, E8, F8, G8, H8,
}

impl Square {
    #[rustfmt::skip]
    const ALL: [Self; BOARD_SIZE as usize] = [
        Self::A1, Self::B1, Self::C1, Self::D1, Self::E1, Self::F1, Self::G1, Self::H1,
        Self::A2, Self::B2, Self::C2, Self::D2, Self::E2, Self::F2, Self::G2, Self::H2,
        Self::A3, Self::B3, Self::C3, Self::D3, Self::E3, Self::F3, Self::G3, Self::H3,
        Self::A4, Self::B4, Self::C4, Self::D4, Self::E4, Self::F4, Self::G4, Self::H4,
        Self::A5, Self::B5, Self::C5, Self::D5, Self::E5, Self::F5, Self::G5, Self::H5,
        Self::A6, Self::B6, Self::C6, Self::D6, Self::E6, Self::F6, Self::G6, Self::H6,
        Self::A7, Self::B7, Self::C7, Self::D7, Self::E7, Self::F7, Self::G7, Self::H7,
        Self::A8, Self::B8, Self::C8, Self::D8, Self::E8, Self::F8, Self::G8, Self::H8,
    ];

    /// Connects file (column) and rank (row) to form a full square.
    #[must_use]
    pub const fn new(file: File, rank: Rank) -> Self {
        Self::ALL[(file as u8 + (rank as u8) * BOARD_WIDTH) as usize]
    }

    /// Returns file (column) on which the square is located.
    #[must_use]
    pub const fn file(self) -> File {
        File::ALL[(self as u8 % BOARD_WIDTH) as usize]
    }

    /// Returns rank (row) on which the square is located.
    #[must_use]
    pub const fn rank(self) -> Rank {
        Rank::ALL[(self as u8 / BOARD_WIDTH) as usize]
    }

    /// Row index in the top-down grid: 0 for the eighth rank, 7 for the
    /// first one.
    #[must_use]
    pub const fn row(self) -> u8 {
        BOARD_WIDTH - 1 - self.rank() as u8
    }

    /// Column index in the grid: 0 for the a-file, 7 for the h-file.
    #[must_use]
    pub const fn col(self) -> u8 {
        self.file() as u8
    }

    /// Inverse of [`Square::row`] and [`Square::col`]. Returns [`None`] when
    /// either coordinate is outside of the board.
    #[must_use]
    pub const fn from_row_col(row: u8, col: u8) -> Option<Self> {
        if row >= BOARD_WIDTH || col >= BOARD_WIDTH {
            return None;
        }
        Some(Self::ALL[((BOARD_WIDTH - 1 - row) * BOARD_WIDTH + col) as usize])
    }

    /// Moves the square by the given number of rows and columns in the
    /// top-down grid. Returns [`None`] if the result falls off the board.
    #[must_use]
    pub fn offset(self, rows: i8, cols: i8) -> Option<Self> {
        let row = i16::from(self.row()) + i16::from(rows);
        let col = i16::from(self.col()) + i16::from(cols);
        match (u8::try_from(row), u8::try_from(col)) {
            (Ok(row), Ok(col)) => Self::from_row_col(row, col),
            _ => None,
        }
    }

    /// Iterates over all squares from [`Square::A1`] to [`Square::H8`].
    pub fn iter() -> impl DoubleEndedIterator<Item = Self> {
        Self::ALL.into_iter()
    }
}

impl TryFrom<u8> for Square {
    type Error = anyhow::Error;

    /// Creates a square given its position on the board.
    ///
    /// # Errors
    ///
    /// If given square index is outside 0..[`BOARD_SIZE`] range.
    fn try_from(square_index: u8) -> anyhow::Result<Self> {
        match Self::ALL.get(square_index as usize) {
            Some(square) => Ok(*square),
            None => bail!("square index should be in 0..BOARD_SIZE, got {square_index}"),
        }
    }
}

impl TryFrom<&str> for Square {
    type Error = anyhow::Error;

    fn try_from(square: &str) -> anyhow::Result<Self> {
        let (file, rank) = match square.chars().collect_tuple() {
            Some((file, rank)) => (file, rank),
            None => bail!(
                "square should be two-char, got {square} with {} chars",
                square.chars().count()
            ),
        };
        Ok(Self::new(file.try_into()?, rank.try_into()?))
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file(), self.rank())
    }
}

/// Represents a column (vertical row) of the chessboard. In chess notation, it
/// is normally represented with a lowercase letter.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(missing_docs)]
pub enum File {
    A = 0,
    B = 1,
    C = 2,
    D = 3,
    E = 4,
    F = 5,
    G = 6,
    H = 7,
}

impl File {
    const ALL: [Self; BOARD_WIDTH as usize] = [
        Self::A,
        Self::B,
        Self::C,
        Self::D,
        Self::E,
        Self::F,
        Self::G,
        Self::H,
    ];

    /// Iterates over files from [`File::A`] to [`File::H`].
    pub fn iter() -> impl DoubleEndedIterator<Item = Self> {
        Self::ALL.into_iter()
    }
}

impl fmt::Display for File {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char(char::from(b'a' + *self as u8))
    }
}

impl TryFrom<char> for File {
    type Error = anyhow::Error;

    fn try_from(file: char) -> anyhow::Result<Self> {
        match file {
            'a'..='h' => Ok(Self::ALL[(file as u8 - b'a') as usize]),
            _ => bail!("file should be within 'a'..='h', got '{file}'"),
        }
    }
}

impl TryFrom<u8> for File {
    type Error = anyhow::Error;

    fn try_from(column: u8) -> anyhow::Result<Self> {
        match Self::ALL.get(column as usize) {
            Some(file) => Ok(*file),
            None => bail!("file should be within 0..BOARD_WIDTH, got {column}"),
        }
    }
}

/// Represents a horizontal row of the chessboard. In chess notation, it is
/// represented with a number. The implementation assumes zero-based values
/// (i.e. rank 1 would be 0).
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(missing_docs)]
pub enum Rank {
    One = 0,
    Two = 1,
    Three = 2,
    Four = 3,
    Five = 4,
    Six = 5,
    Seven = 6,
    Eight = 7,
}

impl Rank {
    const ALL: [Self; BOARD_WIDTH as usize] = [
        Self::One,
        Self::Two,
        Self::Three,
        Self::Four,
        Self::Five,
        Self::Six,
        Self::Seven,
        Self::Eight,
    ];

    /// Iterates over ranks from [`Rank::One`] to [`Rank::Eight`].
    pub fn iter() -> impl DoubleEndedIterator<Item = Self> {
        Self::ALL.into_iter()
    }

    /// The rank kings and rooks start on.
    #[must_use]
    pub const fn backrank(color: Color) -> Self {
        match color {
            Color::White => Self::One,
            Color::Black => Self::Eight,
        }
    }

    /// The rank pawns start on and may advance two squares from.
    #[must_use]
    pub const fn pawns_starting(color: Color) -> Self {
        match color {
            Color::White => Self::Two,
            Color::Black => Self::Seven,
        }
    }

    /// The rank pawns promote on.
    #[must_use]
    pub const fn promotion(color: Color) -> Self {
        Self::backrank(color.opponent())
    }
}

impl TryFrom<char> for Rank {
    type Error = anyhow::Error;

    fn try_from(rank: char) -> anyhow::Result<Self> {
        match rank {
            '1'..='8' => Ok(Self::ALL[(rank as u8 - b'1') as usize]),
            _ => bail!("rank should be within '1'..='8', got '{rank}'"),
        }
    }
}

impl TryFrom<u8> for Rank {
    type Error = anyhow::Error;

    fn try_from(row: u8) -> anyhow::Result<Self> {
        match Self::ALL.get(row as usize) {
            Some(rank) => Ok(*rank),
            None => bail!("rank should be within 0..BOARD_WIDTH, got {row}"),
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", *self as u8 + 1)
    }
}

/// A standard game of chess is played between two sides: White (having the
/// advantage of the first turn) and Black.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    White,
    Black,
}

impl Color {
    /// Side that made the move with the given zero-based ply index: White
    /// plays even plies (its first move is ply 0), Black plays odd ones.
    ///
    /// ```
    /// use sanreplay::chess::core::Color;
    ///
    /// assert_eq!(Color::from_ply(0), Color::White);
    /// assert_eq!(Color::from_ply(1), Color::Black);
    /// assert_eq!(Color::from_ply(40), Color::White);
    /// ```
    #[must_use]
    pub const fn from_ply(ply: usize) -> Self {
        if ply % 2 == 0 {
            Self::White
        } else {
            Self::Black
        }
    }

    /// "Flips" the color.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::White => Self::Black,
            Self::Black => Self::White,
        }
    }

    /// Row delta of a pawn push in the top-down grid: White pawns walk
    /// towards row 0, Black pawns towards row 7.
    #[must_use]
    pub const fn pawn_direction(self) -> i8 {
        match self {
            Self::White => -1,
            Self::Black => 1,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::White => "white",
            Self::Black => "black",
        })
    }
}

/// Standard [chess pieces].
///
/// [chess pieces]: https://en.wikipedia.org/wiki/Chess_piece
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PieceKind {
    King = 1,
    Queen,
    Rook,
    Bishop,
    Knight,
    Pawn,
}

impl PieceKind {
    /// Parses the uppercase piece letter used in algebraic notation. Pawns do
    /// not have a letter in SAN but `P` is accepted for completeness.
    #[must_use]
    pub const fn from_san_letter(letter: char) -> Option<Self> {
        match letter {
            'K' => Some(Self::King),
            'Q' => Some(Self::Queen),
            'R' => Some(Self::Rook),
            'B' => Some(Self::Bishop),
            'N' => Some(Self::Knight),
            'P' => Some(Self::Pawn),
            _ => None,
        }
    }

    /// Lowercase English name of the piece.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::King => "king",
            Self::Queen => "queen",
            Self::Rook => "rook",
            Self::Bishop => "bishop",
            Self::Knight => "knight",
            Self::Pawn => "pawn",
        }
    }
}

impl From<Promotion> for PieceKind {
    fn from(promotion: Promotion) -> Self {
        match promotion {
            Promotion::Queen => Self::Queen,
            Promotion::Rook => Self::Rook,
            Promotion::Bishop => Self::Bishop,
            Promotion::Knight => Self::Knight,
        }
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char(match &self {
            Self::King => 'k',
            Self::Queen => 'q',
            Self::Rook => 'r',
            Self::Bishop => 'b',
            Self::Knight => 'n',
            Self::Pawn => 'p',
        })
    }
}

/// Represents a specific piece owned by a side.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Piece {
    #[allow(missing_docs)]
    pub color: Color,
    #[allow(missing_docs)]
    pub kind: PieceKind,
}

impl Piece {
    #[allow(missing_docs)]
    #[must_use]
    pub const fn new(color: Color, kind: PieceKind) -> Self {
        Self { color, kind }
    }
}

impl TryFrom<char> for Piece {
    type Error = anyhow::Error;

    /// Parses a FEN piece symbol: uppercase for White, lowercase for Black.
    fn try_from(symbol: char) -> anyhow::Result<Self> {
        let color = if symbol.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        match PieceKind::from_san_letter(symbol.to_ascii_uppercase()) {
            Some(kind) => Ok(Self { color, kind }),
            None => bail!("piece symbol should be within \"KQRBNPkqrbnp\", got '{symbol}'"),
        }
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = self.kind.to_string();
        match self.color {
            // White: uppercase symbols.
            Color::White => f.write_str(&symbol.to_ascii_uppercase()),
            // Black: lowercase symbols.
            Color::Black => f.write_str(&symbol),
        }
    }
}

/// A pawn can be promoted to a queen, rook, bishop or a knight.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Hash)]
pub enum Promotion {
    Queen,
    Rook,
    Bishop,
    Knight,
}

impl TryFrom<PieceKind> for Promotion {
    type Error = anyhow::Error;

    fn try_from(kind: PieceKind) -> anyhow::Result<Self> {
        match kind {
            PieceKind::Queen => Ok(Self::Queen),
            PieceKind::Rook => Ok(Self::Rook),
            PieceKind::Bishop => Ok(Self::Bishop),
            PieceKind::Knight => Ok(Self::Knight),
            PieceKind::King | PieceKind::Pawn => {
                bail!("pawn can only be promoted to a queen, rook, bishop or knight")
            },
        }
    }
}

#[cfg(test)]
mod test {
    use std::mem::size_of;

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn rank() {
        assert_eq!(
            ('1'..='9')
                .filter_map(|ch| Rank::try_from(ch).ok())
                .collect::<Vec<Rank>>(),
            Rank::iter().collect::<Vec<Rank>>()
        );
        assert_eq!(
            (0..=BOARD_WIDTH)
                .filter_map(|idx| Rank::try_from(idx).ok())
                .collect::<Vec<Rank>>(),
            vec![
                Rank::One,
                Rank::Two,
                Rank::Three,
                Rank::Four,
                Rank::Five,
                Rank::Six,
                Rank::Seven,
                Rank::Eight,
            ]
        );
    }

    #[test]
    #[should_panic(expected = "rank should be within '1'..='8', got '9'")]
    fn rank_from_incorrect_char() {
        let _ = Rank::try_from('9').unwrap();
    }

    #[test]
    #[should_panic(expected = "rank should be within '1'..='8', got '0'")]
    fn rank_from_incorrect_char_zero() {
        let _ = Rank::try_from('0').unwrap();
    }

    #[test]
    #[should_panic(expected = "rank should be within 0..BOARD_WIDTH, got 8")]
    fn rank_from_incorrect_index() {
        let _ = Rank::try_from(BOARD_WIDTH).unwrap();
    }

    #[test]
    fn file() {
        assert_eq!(
            ('a'..='i')
                .filter_map(|ch| File::try_from(ch).ok())
                .collect::<Vec<File>>(),
            vec![
                File::A,
                File::B,
                File::C,
                File::D,
                File::E,
                File::F,
                File::G,
                File::H,
            ]
        );
        assert_eq!(
            (0..=BOARD_WIDTH)
                .filter_map(|idx| File::try_from(idx).ok())
                .collect::<Vec<File>>(),
            File::iter().collect::<Vec<File>>()
        );
    }

    #[test]
    #[should_panic(expected = "file should be within 'a'..='h', got 'i'")]
    fn file_from_incorrect_char() {
        let _ = File::try_from('i').unwrap();
    }

    #[test]
    fn square() {
        let squares: Vec<_> = [
            0u8,
            BOARD_SIZE - 1,
            BOARD_WIDTH - 1,
            BOARD_WIDTH,
            BOARD_WIDTH * 2 + 5,
            BOARD_SIZE,
        ]
        .iter()
        .filter_map(|square| Square::try_from(*square).ok())
        .collect();
        assert_eq!(
            squares,
            vec![Square::A1, Square::H8, Square::H1, Square::A2, Square::F3]
        );
        let squares: Vec<_> = [
            (File::B, Rank::Three),
            (File::F, Rank::Five),
            (File::H, Rank::Eight),
            (File::E, Rank::Four),
        ]
        .iter()
        .map(|(file, rank)| Square::new(*file, *rank))
        .collect();
        assert_eq!(
            squares,
            vec![Square::B3, Square::F5, Square::H8, Square::E4]
        );
        assert_eq!(Square::try_from("g1").unwrap(), Square::G1);
        assert!(Square::try_from("g").is_err());
        assert!(Square::try_from("g9").is_err());
        assert!(Square::try_from("e2e4").is_err());
    }

    #[test]
    #[should_panic(expected = "square index should be in 0..BOARD_SIZE, got 64")]
    fn square_from_incorrect_index() {
        let _ = Square::try_from(BOARD_SIZE).unwrap();
    }

    #[test]
    fn row_col_mapping() {
        for square in Square::iter() {
            assert_eq!(
                Square::from_row_col(square.row(), square.col()),
                Some(square)
            );
            assert_eq!(square.row(), 7 - square.rank() as u8);
            assert_eq!(square.col(), square.file() as u8);
        }
        assert_eq!(Square::from_row_col(0, 0), Some(Square::A8));
        assert_eq!(Square::from_row_col(6, 4), Some(Square::E2));
        assert_eq!(Square::from_row_col(3, 3), Some(Square::D5));
        assert_eq!(Square::from_row_col(8, 0), None);
        assert_eq!(Square::from_row_col(0, 8), None);
    }

    #[test]
    fn offset() {
        assert_eq!(Square::E4.offset(-1, 0), Some(Square::E5));
        assert_eq!(Square::E4.offset(1, 0), Some(Square::E3));
        assert_eq!(Square::E4.offset(-2, 1), Some(Square::F6));
        assert_eq!(Square::A1.offset(1, 0), None);
        assert_eq!(Square::A1.offset(0, -1), None);
        assert_eq!(Square::H8.offset(-1, 0), None);
        assert_eq!(Square::H8.offset(0, 1), None);
        assert_eq!(Square::H8.offset(7, -7), Some(Square::A1));
    }

    #[test]
    fn pieces() {
        assert_eq!(
            Piece::try_from('N').unwrap(),
            Piece::new(Color::White, PieceKind::Knight)
        );
        assert_eq!(
            Piece::try_from('q').unwrap(),
            Piece::new(Color::Black, PieceKind::Queen)
        );
        assert!(Piece::try_from('x').is_err());
        assert_eq!(
            "KQRBNPkqrbnp"
                .chars()
                .map(|symbol| Piece::try_from(symbol).unwrap().to_string())
                .collect::<String>(),
            "KQRBNPkqrbnp"
        );
    }

    #[test]
    fn promotion_targets() {
        assert_eq!(
            Promotion::try_from(PieceKind::Knight).unwrap(),
            Promotion::Knight
        );
        assert_eq!(PieceKind::from(Promotion::Queen), PieceKind::Queen);
        assert!(Promotion::try_from(PieceKind::King).is_err());
        assert!(Promotion::try_from(PieceKind::Pawn).is_err());
    }

    #[test]
    fn colors() {
        assert_eq!(Color::from_ply(0), Color::White);
        assert_eq!(Color::from_ply(1), Color::Black);
        assert_eq!(Color::from_ply(2), Color::White);
        assert_eq!(Color::White.opponent(), Color::Black);
        assert_eq!(Rank::backrank(Color::White), Rank::One);
        assert_eq!(Rank::promotion(Color::White), Rank::Eight);
        assert_eq!(Rank::pawns_starting(Color::Black), Rank::Seven);
    }

    #[test]
    fn primitive_size() {
        assert_eq!(size_of::<Square>(), 1);
        // Primitives will have small size thanks to the niche optimizations:
        // https://rust-lang.github.io/unsafe-code-guidelines/layout/enums.html#layout-of-a-data-carrying-enums-without-a-repr-annotation
        assert_eq!(size_of::<Piece>(), size_of::<Option<Piece>>());
    }
}
