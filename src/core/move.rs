// Copyright 2017-2021 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::core::{Square, SquareParseError};

#[derive(Clone, PartialEq, Eq, Debug, Error)]
pub enum MoveParseError {
    #[error("move must be four characters long: {0:?}")]
    InvalidLength(String),
    #[error(transparent)]
    InvalidSquare(#[from] SquareParseError),
}

/// A move, recognized by the mailbox move generator: a plain relocation of whatever piece stands on the source
/// square to the destination square. Moves carry no capture, promotion or check information; the board records
/// what was captured when the move is made.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Move {
    source: Square,
    destination: Square,
}

impl Move {
    /// Constructs a new move from the source square to the destination square.
    pub const fn new(source: Square, destination: Square) -> Move {
        Move {
            source,
            destination,
        }
    }

    /// Parses a move from UCI notation, e.g. `e2e4`. Promotion suffixes are not supported.
    pub fn from_uci(uci: &str) -> Result<Move, MoveParseError> {
        if uci.len() != 4 || !uci.is_char_boundary(2) {
            return Err(MoveParseError::InvalidLength(uci.to_owned()));
        }

        let (source, destination) = uci.split_at(2);
        Ok(Move::new(
            Square::from_algebraic(source)?,
            Square::from_algebraic(destination)?,
        ))
    }

    /// Returns the source square of this move.
    pub fn source(self) -> Square {
        self.source
    }

    /// Returns the destination square of this move.
    pub fn destination(self) -> Square {
        self.destination
    }

    pub fn as_uci(self) -> String {
        format!("{}{}", self.source, self.destination)
    }
}

impl FromStr for Move {
    type Err = MoveParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Move::from_uci(s)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.source, self.destination)
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}
