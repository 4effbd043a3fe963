// Copyright 2017-2021 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! `mailbox` is a chess move generator built on a padded 10x12 mailbox board, together with a perft driver for
//! exercising it.
//!
//! The board is a flat array of 120 cells. The 64 playable squares sit in the middle, surrounded by cells holding an
//! uncapturable blocker piece, so that stepping and sliding pieces stop at the edge of the board without any bounds
//! checks. Move generation follows simplified rules: there is no check detection, castling, en-passant or
//! promotion.

pub mod board;
pub mod core;
pub mod movegen;
pub mod perft;

pub use board::Board;
pub use movegen::Generators;
pub use perft::{Perft, PerftError, PerftMode, PerftOptions, PerftResult};
