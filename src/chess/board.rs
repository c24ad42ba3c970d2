//! Square-centric [`Board`]: which piece (if any) stands on each square.
//!
//! The board holds no history, castling rights or side to move: it is the
//! bare "current position after the moves replayed so far" that notation
//! resolution needs.

use std::fmt::{self, Write};

use anyhow::bail;

use crate::chess::core::{Color, File, Piece, PieceKind, Rank, Square, BOARD_SIZE, BOARD_WIDTH};

/// Piece placement on the 8x8 grid. A square holds at most one piece by
/// construction.
#[derive(Clone, PartialEq, Eq)]
pub struct Board {
    squares: [Option<Piece>; BOARD_SIZE as usize],
}

impl Board {
    /// Creates a board without any pieces.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            squares: [None; BOARD_SIZE as usize],
        }
    }

    /// Creates the starting position of the standard chess variant.
    ///
    /// ```
    /// use sanreplay::chess::board::Board;
    ///
    /// assert_eq!(
    ///     Board::starting().to_string(),
    ///     "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR"
    /// );
    /// ```
    #[must_use]
    pub fn starting() -> Self {
        const BACKRANK: [PieceKind; BOARD_WIDTH as usize] = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];
        let mut board = Self::empty();
        for color in [Color::White, Color::Black] {
            for (file, kind) in File::iter().zip(BACKRANK) {
                board.put(
                    Square::new(file, Rank::backrank(color)),
                    Piece::new(color, kind),
                );
                board.put(
                    Square::new(file, Rank::pawns_starting(color)),
                    Piece::new(color, PieceKind::Pawn),
                );
            }
        }
        board
    }

    /// Parses the piece placement field of [Forsyth-Edwards Notation] (FEN):
    /// ranks from the eighth to the first, separated by `/`, digits for runs
    /// of empty squares.
    ///
    /// Only the first whitespace-separated field is considered, so a full
    /// FEN string is accepted as well.
    ///
    /// # Errors
    ///
    /// Returns [`anyhow::Error`] if the placement is malformed: wrong number
    /// of ranks or files, unknown piece symbols or zero-length runs.
    ///
    /// [Forsyth-Edwards Notation]: https://www.chessprogramming.org/Forsyth-Edwards_Notation
    pub fn from_placement(input: &str) -> anyhow::Result<Self> {
        let pieces_placement = match input.split_whitespace().next() {
            Some(placement) => placement,
            None => bail!("incorrect FEN: missing pieces placement"),
        };
        let mut result = Self::empty();
        let mut rank_id = BOARD_WIDTH;
        for rank_fen in pieces_placement.split('/') {
            if rank_id == 0 {
                bail!("incorrect FEN: expected 8 ranks, got {pieces_placement}");
            }
            rank_id -= 1;
            let rank = Rank::try_from(rank_id)?;
            let mut file: u8 = 0;
            for symbol in rank_fen.chars() {
                if file >= BOARD_WIDTH {
                    bail!("incorrect FEN: rank {rank_fen} exceeds {BOARD_WIDTH} files");
                }
                match symbol {
                    '0' => bail!("increment can not be 0"),
                    '1'..='8' => {
                        file += symbol as u8 - b'0';
                        continue;
                    },
                    _ => (),
                }
                result.put(Square::new(file.try_into()?, rank), symbol.try_into()?);
                file += 1;
            }
            if file != BOARD_WIDTH {
                bail!("incorrect FEN: rank size should be exactly {BOARD_WIDTH}, got {rank_fen} of length {file}");
            }
        }
        if rank_id != 0 {
            bail!("incorrect FEN: there should be 8 ranks, got {pieces_placement}");
        }
        Ok(result)
    }

    /// Returns the piece standing on the square.
    #[must_use]
    pub const fn at(&self, square: Square) -> Option<Piece> {
        self.squares[square as usize]
    }

    /// Returns `true` if nothing stands on the square.
    #[must_use]
    pub const fn is_vacant(&self, square: Square) -> bool {
        self.at(square).is_none()
    }

    /// Places the piece on the square, replacing whatever stood there.
    pub fn put(&mut self, square: Square, piece: Piece) {
        self.squares[square as usize] = Some(piece);
    }

    /// Clears the square and returns its previous occupant.
    pub fn remove(&mut self, square: Square) -> Option<Piece> {
        self.squares[square as usize].take()
    }

    /// Iterates over all squares currently holding the given piece, from
    /// [`Square::A1`] to [`Square::H8`].
    pub fn locations(&self, piece: Piece) -> impl Iterator<Item = Square> + '_ {
        Square::iter().filter(move |square| self.at(*square) == Some(piece))
    }

    /// Total number of pieces on the board.
    #[must_use]
    pub fn num_pieces(&self) -> usize {
        self.squares.iter().flatten().count()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::starting()
    }
}

impl fmt::Display for Board {
    /// Prints the piece placement field of FEN.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in Rank::iter().rev() {
            let mut empty_squares = 0;
            for file in File::iter() {
                match self.at(Square::new(file, rank)) {
                    Some(piece) => {
                        if empty_squares != 0 {
                            write!(f, "{empty_squares}")?;
                            empty_squares = 0;
                        }
                        write!(f, "{piece}")?;
                    },
                    None => empty_squares += 1,
                }
            }
            if empty_squares != 0 {
                write!(f, "{empty_squares}")?;
            }
            if rank != Rank::One {
                f.write_char('/')?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Board {
    /// Dumps the board in a simple format ('.' for empty square, FEN algebraic
    /// symbol for piece) a-la Stockfish "debug" command in UCI mode.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in Rank::iter().rev() {
            for file in File::iter() {
                match self.at(Square::new(file, rank)) {
                    Some(piece) => write!(f, "{piece}"),
                    None => f.write_char('.'),
                }?;
                if file != File::H {
                    write!(f, "{SQUARE_SEPARATOR}")?;
                }
            }
            if rank != Rank::One {
                write!(f, "{LINE_SEPARATOR}")?;
            }
        }
        Ok(())
    }
}

const LINE_SEPARATOR: &str = "\n";
const SQUARE_SEPARATOR: &str = " ";
