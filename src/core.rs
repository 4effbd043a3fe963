// Copyright 2021 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Module `core` contains core datatypes used pervasively throughout `mailbox`: squares on the padded board,
//! the piece catalog and moves.

mod r#move;
mod types;

pub use types::{
    capturable_by, pieces, playable_squares, Color, Direction, Piece, PieceKind, PieceParseError,
    Square, SquareParseError, BLACK_BISHOP, BLACK_KING, BLACK_KNIGHT, BLACK_PAWN, BLACK_QUEEN,
    BLACK_ROOK, BLOCKER, BOARD_SIZE, ROW_WIDTH, WHITE_BISHOP, WHITE_KING, WHITE_KNIGHT,
    WHITE_PAWN, WHITE_QUEEN, WHITE_ROOK,
};

pub use types::{
    A1, A2, A3, A4, A5, A6, A7, A8, B1, B2, B3, B4, B5, B6, B7, B8, C1, C2, C3, C4, C5, C6, C7, C8,
    D1, D2, D3, D4, D5, D6, D7, D8, E1, E2, E3, E4, E5, E6, E7, E8, F1, F2, F3, F4, F5, F6, F7, F8,
    G1, G2, G3, G4, G5, G6, G7, G8, H1, H2, H3, H4, H5, H6, H7, H8,
};

pub use r#move::{Move, MoveParseError};
