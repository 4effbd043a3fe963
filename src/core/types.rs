// Copyright 2017-2021 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::{convert::TryFrom, fmt, str::FromStr};

use thiserror::Error;

/// Width of a row of the padded board: one padding file on each side of the eight real files.
pub const ROW_WIDTH: i32 = 10;

/// Number of cells on the padded board: two padding ranks above and below the eight real ranks.
pub const BOARD_SIZE: usize = 120;

const FIRST_PLAYABLE: u8 = 21;
const LAST_PLAYABLE: u8 = 98;

#[derive(Clone, PartialEq, Eq, Debug, Error)]
pub enum SquareParseError {
    #[error("square index out of range: {0}")]
    OutOfRange(u8),
    #[error("invalid square: {0:?}")]
    InvalidAlgebraic(String),
}

#[derive(Clone, PartialEq, Eq, Debug, Error)]
pub enum PieceParseError {
    #[error("invalid char: {0}")]
    InvalidChar(char),
}

/// A cell of the padded 10x12 board. Squares on the real 8x8 board are "playable"; every other cell is padding
/// and permanently holds the [`BLOCKER`] sentinel, so that stepping or sliding off the edge of the board lands on
/// an occupied, uncapturable cell instead of wrapping around.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Square(pub(in crate::core) u8);

impl Square {
    /// Creates the playable square with the given zero-based rank and file. Panics if either is not in `0..8`.
    pub const fn of(rank: u8, file: u8) -> Square {
        assert!(rank < 8 && file < 8, "rank and file must both be in 0..8");
        Square(FIRST_PLAYABLE + rank * ROW_WIDTH as u8 + file)
    }

    /// Parses a square written in algebraic notation, a file letter `a`-`h` followed by a rank digit `1`-`8`.
    pub fn from_algebraic(text: &str) -> Result<Square, SquareParseError> {
        let invalid = || SquareParseError::InvalidAlgebraic(text.to_owned());
        let mut chars = text.chars();
        let (file, rank) = match (chars.next(), chars.next(), chars.next()) {
            (Some(file), Some(rank), None) => (file, rank),
            _ => return Err(invalid()),
        };

        if !('a'..='h').contains(&file) || !('1'..='8').contains(&rank) {
            return Err(invalid());
        }

        Ok(Square::of(rank as u8 - b'1', file as u8 - b'a'))
    }

    /// Zero-based rank of this square. Only meaningful for playable squares.
    pub const fn rank(self) -> u8 {
        self.0 / ROW_WIDTH as u8 - 2
    }

    /// Zero-based file of this square. Only meaningful for playable squares.
    pub const fn file(self) -> u8 {
        self.0 % ROW_WIDTH as u8 - 1
    }

    /// Returns whether or not this square lies on the real 8x8 board.
    pub const fn is_playable(self) -> bool {
        let column = self.0 % ROW_WIDTH as u8;
        self.0 >= FIRST_PLAYABLE && self.0 <= LAST_PLAYABLE && column >= 1 && column <= 8
    }

    /// Index of this square into the padded board.
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Returns the square `delta` cells away on the padded board. Every generator delta applied to a playable square
    /// stays on the padded board.
    pub const fn offset(self, delta: i32) -> Square {
        Square((self.0 as i32 + delta) as u8)
    }

    /// Returns the closest square in the given direction.
    pub const fn towards(self, dir: Direction) -> Square {
        self.offset(dir.as_vector())
    }
}

impl TryFrom<u8> for Square {
    type Error = SquareParseError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if value as usize >= BOARD_SIZE {
            return Err(SquareParseError::OutOfRange(value));
        }

        Ok(Square(value))
    }
}

impl FromStr for Square {
    type Err = SquareParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Square::from_algebraic(s)
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_playable() {
            return write!(f, "#{}", self.0);
        }

        write!(
            f,
            "{}{}",
            (b'a' + self.file()) as char,
            (b'1' + self.rank()) as char
        )
    }
}

/// Iterates over every playable square in ascending index order, i.e. a1 to h1, then a2 to h2 and so on.
pub fn playable_squares() -> impl DoubleEndedIterator<Item = Square> {
    (FIRST_PLAYABLE..=LAST_PLAYABLE)
        .map(Square)
        .filter(|sq| sq.is_playable())
}

pub const A1: Square = Square(21);
pub const B1: Square = Square(22);
pub const C1: Square = Square(23);
pub const D1: Square = Square(24);
pub const E1: Square = Square(25);
pub const F1: Square = Square(26);
pub const G1: Square = Square(27);
pub const H1: Square = Square(28);
pub const A2: Square = Square(31);
pub const B2: Square = Square(32);
pub const C2: Square = Square(33);
pub const D2: Square = Square(34);
pub const E2: Square = Square(35);
pub const F2: Square = Square(36);
pub const G2: Square = Square(37);
pub const H2: Square = Square(38);
pub const A3: Square = Square(41);
pub const B3: Square = Square(42);
pub const C3: Square = Square(43);
pub const D3: Square = Square(44);
pub const E3: Square = Square(45);
pub const F3: Square = Square(46);
pub const G3: Square = Square(47);
pub const H3: Square = Square(48);
pub const A4: Square = Square(51);
pub const B4: Square = Square(52);
pub const C4: Square = Square(53);
pub const D4: Square = Square(54);
pub const E4: Square = Square(55);
pub const F4: Square = Square(56);
pub const G4: Square = Square(57);
pub const H4: Square = Square(58);
pub const A5: Square = Square(61);
pub const B5: Square = Square(62);
pub const C5: Square = Square(63);
pub const D5: Square = Square(64);
pub const E5: Square = Square(65);
pub const F5: Square = Square(66);
pub const G5: Square = Square(67);
pub const H5: Square = Square(68);
pub const A6: Square = Square(71);
pub const B6: Square = Square(72);
pub const C6: Square = Square(73);
pub const D6: Square = Square(74);
pub const E6: Square = Square(75);
pub const F6: Square = Square(76);
pub const G6: Square = Square(77);
pub const H6: Square = Square(78);
pub const A7: Square = Square(81);
pub const B7: Square = Square(82);
pub const C7: Square = Square(83);
pub const D7: Square = Square(84);
pub const E7: Square = Square(85);
pub const F7: Square = Square(86);
pub const G7: Square = Square(87);
pub const H7: Square = Square(88);
pub const A8: Square = Square(91);
pub const B8: Square = Square(92);
pub const C8: Square = Square(93);
pub const D8: Square = Square(94);
pub const E8: Square = Square(95);
pub const F8: Square = Square(96);
pub const G8: Square = Square(97);
pub const H8: Square = Square(98);

#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub fn toggle(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    pub fn is_white(self) -> bool {
        self == Color::White
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::White
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => write!(f, "white"),
            Color::Black => write!(f, "black"),
        }
    }
}

#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
    /// The sentinel filling the padding cells of the board.
    Blocker,
}

/// A piece, or the [`BLOCKER`] sentinel. Pieces are plain values; two pieces are equal when their color and kind
/// (and therefore their code) are equal.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Piece {
    pub color: Color,
    pub kind: PieceKind,
}

pub const WHITE_PAWN: Piece = Piece {
    color: Color::White,
    kind: PieceKind::Pawn,
};
pub const WHITE_KNIGHT: Piece = Piece {
    color: Color::White,
    kind: PieceKind::Knight,
};
pub const WHITE_BISHOP: Piece = Piece {
    color: Color::White,
    kind: PieceKind::Bishop,
};
pub const WHITE_ROOK: Piece = Piece {
    color: Color::White,
    kind: PieceKind::Rook,
};
pub const WHITE_QUEEN: Piece = Piece {
    color: Color::White,
    kind: PieceKind::Queen,
};
pub const WHITE_KING: Piece = Piece {
    color: Color::White,
    kind: PieceKind::King,
};
pub const BLACK_PAWN: Piece = Piece {
    color: Color::Black,
    kind: PieceKind::Pawn,
};
pub const BLACK_KNIGHT: Piece = Piece {
    color: Color::Black,
    kind: PieceKind::Knight,
};
pub const BLACK_BISHOP: Piece = Piece {
    color: Color::Black,
    kind: PieceKind::Bishop,
};
pub const BLACK_ROOK: Piece = Piece {
    color: Color::Black,
    kind: PieceKind::Rook,
};
pub const BLACK_QUEEN: Piece = Piece {
    color: Color::Black,
    kind: PieceKind::Queen,
};
pub const BLACK_KING: Piece = Piece {
    color: Color::Black,
    kind: PieceKind::King,
};

/// The sentinel occupying every padding cell. It never moves and can never be captured.
pub const BLOCKER: Piece = Piece {
    color: Color::White,
    kind: PieceKind::Blocker,
};

const CATALOG: [Piece; 12] = [
    WHITE_PAWN,
    WHITE_KNIGHT,
    WHITE_BISHOP,
    WHITE_ROOK,
    WHITE_QUEEN,
    WHITE_KING,
    BLACK_PAWN,
    BLACK_KNIGHT,
    BLACK_BISHOP,
    BLACK_ROOK,
    BLACK_QUEEN,
    BLACK_KING,
];

impl Piece {
    /// Looks up one of the twelve real pieces by its code. The sentinel's code is rejected like any other unknown
    /// character.
    pub fn from_code(code: char) -> Result<Piece, PieceParseError> {
        CATALOG
            .iter()
            .copied()
            .find(|piece| piece.code() == code)
            .ok_or(PieceParseError::InvalidChar(code))
    }

    pub fn code(self) -> char {
        let c = match self.kind {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
            PieceKind::Blocker => return 'X',
        };

        if self.color == Color::White {
            c.to_ascii_uppercase()
        } else {
            c
        }
    }

    pub fn is_white(self) -> bool {
        self.color.is_white()
    }

    pub fn is_blocker(self) -> bool {
        self.kind == PieceKind::Blocker
    }

    /// Ordinal of this piece in the catalog (white pawn through black king), or `None` for the sentinel.
    pub fn index(self) -> Option<usize> {
        if self.is_blocker() {
            return None;
        }

        let offset = match self.color {
            Color::White => 0,
            Color::Black => 6,
        };
        Some(offset + self.kind as usize)
    }

    /// Returns whether a piece of color `attacker` may capture this piece.
    pub fn can_be_captured_by(self, attacker: Color) -> bool {
        !self.is_blocker() && self.color != attacker
    }
}

impl TryFrom<char> for Piece {
    type Error = PieceParseError;

    fn try_from(value: char) -> Result<Self, Self::Error> {
        Piece::from_code(value)
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Capture test for the contents of a board cell. Empty cells hold nothing to capture.
pub fn capturable_by(occupant: Option<Piece>, attacker: Color) -> bool {
    occupant.map_or(false, |piece| piece.can_be_captured_by(attacker))
}

/// Iterates over the twelve real pieces in catalog order.
pub fn pieces() -> impl Iterator<Item = Piece> {
    CATALOG.into_iter()
}

#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl Direction {
    pub const fn as_vector(self) -> i32 {
        match self {
            Direction::North => ROW_WIDTH,
            Direction::NorthEast => ROW_WIDTH + 1,
            Direction::East => 1,
            Direction::SouthEast => -ROW_WIDTH + 1,
            Direction::South => -ROW_WIDTH,
            Direction::SouthWest => -ROW_WIDTH - 1,
            Direction::West => -1,
            Direction::NorthWest => ROW_WIDTH - 1,
        }
    }
}
