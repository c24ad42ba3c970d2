//! Replays chess games written in Standard Algebraic Notation (SAN) and
//! resolves every move to the exact squares it connects.
//!
//! Notation such as "Nf3" or "Rad1" only names the destination and, at
//! best, part of the origin. [`notation::parse`] turns a move string into
//! board-independent [`notation::MoveSpec`]s,
//! [`disambiguation::resolve_origin`] finds the origin on the current
//! [`chess::board::Board`] and [`replay::execute`] applies the resolved
//! [`MoveRecord`]. [`Replay`] ties the three together for a whole game.
//!
//! ```
//! use sanreplay::chess::core::Square;
//!
//! let records = sanreplay::replay::replay(
//!     "e4 e5 Nf3 Nc6 Bb5 a6 Ba4 Nf6 O-O"
//!         .split_whitespace()
//!         .enumerate(),
//! )
//! .unwrap();
//! // Castling yields two records: the rook first, then the king.
//! assert_eq!(records.len(), 10);
//! assert_eq!(records[8].origin, Square::H1);
//! assert_eq!(records[9].destination, Square::G1);
//! ```

pub mod chess;
pub mod disambiguation;
pub mod error;
pub mod notation;
pub mod replay;

pub use replay::{MoveRecord, Replay};
use shadow_rs::shadow;

shadow!(build);

/// Returns the full version that can be used to identify how the binary was
/// built in the first place.
#[must_use]
pub fn version() -> String {
    format!(
        "{} (commit {}, branch {})",
        build::PKG_VERSION,
        build::SHORT_COMMIT,
        build::BRANCH
    )
}
