//! Chess board model: primitives and the square-addressable board that moves
//! are replayed on.

pub mod board;
pub mod core;
