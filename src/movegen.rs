// Copyright 2021 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Move generation for the padded board. Each piece kind has a generator that, given a view of the board and a
//! source square, produces the destination squares that piece may move to under the simplified rules: no castling,
//! no en-passant, no promotion, and no test for whether the mover's king is left in check.
//!
//! Generators never bounds-check. Every delta is expressed against the 10-wide padded row, so any step off the real
//! board lands on a padding cell holding the uncapturable sentinel and is rejected like a friendly piece would be.

use crate::core::*;

/// A view of the board restricted to asking what occupies a cell.
pub trait Occupancy {
    /// Returns the occupant of `square`, `Some(BLOCKER)` for padding cells.
    fn occupant(&self, square: Square) -> Option<Piece>;
}

const KING_DELTAS: [i32; 8] = [
    Direction::North.as_vector(),
    Direction::South.as_vector(),
    Direction::East.as_vector(),
    Direction::West.as_vector(),
    Direction::NorthEast.as_vector(),
    Direction::NorthWest.as_vector(),
    Direction::SouthEast.as_vector(),
    Direction::SouthWest.as_vector(),
];

const KNIGHT_DELTAS: [i32; 8] = [
    2 * ROW_WIDTH + 1,
    2 * ROW_WIDTH - 1,
    -2 * ROW_WIDTH + 1,
    -2 * ROW_WIDTH - 1,
    ROW_WIDTH + 2,
    ROW_WIDTH - 2,
    -ROW_WIDTH + 2,
    -ROW_WIDTH - 2,
];

const BISHOP_DIRECTIONS: [Direction; 4] = [
    Direction::NorthEast,
    Direction::NorthWest,
    Direction::SouthEast,
    Direction::SouthWest,
];

const ROOK_DIRECTIONS: [Direction; 4] = [
    Direction::North,
    Direction::South,
    Direction::East,
    Direction::West,
];

const QUEEN_DIRECTIONS: [Direction; 8] = [
    Direction::North,
    Direction::South,
    Direction::East,
    Direction::West,
    Direction::NorthEast,
    Direction::NorthWest,
    Direction::SouthEast,
    Direction::SouthWest,
];

/// Signed deltas and starting rank for the pawns of one color.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PawnRules {
    color: Color,
    advance: i32,
    capture_west: i32,
    capture_east: i32,
    double_advance_rank: u8,
}

impl PawnRules {
    pub const fn new(color: Color) -> PawnRules {
        match color {
            Color::White => PawnRules {
                color,
                advance: Direction::North.as_vector(),
                capture_west: Direction::NorthWest.as_vector(),
                capture_east: Direction::NorthEast.as_vector(),
                double_advance_rank: 1,
            },
            Color::Black => PawnRules {
                color,
                advance: Direction::South.as_vector(),
                capture_west: Direction::SouthWest.as_vector(),
                capture_east: Direction::SouthEast.as_vector(),
                double_advance_rank: 6,
            },
        }
    }
}

/// A move generator for one piece kind and color.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Generator {
    King(Color),
    Knight(Color),
    Bishop(Color),
    Rook(Color),
    Queen(Color),
    Pawn(PawnRules),
}

impl Generator {
    /// Returns the generator for pieces of this kind and color, or `None` for the sentinel, which never moves.
    pub const fn for_piece(piece: Piece) -> Option<Generator> {
        let color = piece.color;
        let generator = match piece.kind {
            PieceKind::Pawn => Generator::Pawn(PawnRules::new(color)),
            PieceKind::Knight => Generator::Knight(color),
            PieceKind::Bishop => Generator::Bishop(color),
            PieceKind::Rook => Generator::Rook(color),
            PieceKind::Queen => Generator::Queen(color),
            PieceKind::King => Generator::King(color),
            PieceKind::Blocker => return None,
        };

        Some(generator)
    }

    /// Pushes every destination reachable from `from` onto `targets`, in direction order.
    pub fn destinations<O>(&self, board: &O, from: Square, targets: &mut Vec<Square>)
    where
        O: Occupancy + ?Sized,
    {
        match *self {
            Generator::King(us) => step(board, from, us, &KING_DELTAS, targets),
            Generator::Knight(us) => step(board, from, us, &KNIGHT_DELTAS, targets),
            Generator::Bishop(us) => slide(board, from, us, &BISHOP_DIRECTIONS, targets),
            Generator::Rook(us) => slide(board, from, us, &ROOK_DIRECTIONS, targets),
            Generator::Queen(us) => slide(board, from, us, &QUEEN_DIRECTIONS, targets),
            Generator::Pawn(ref rules) => pawn(board, from, rules, targets),
        }
    }
}

fn step<O>(board: &O, from: Square, us: Color, deltas: &[i32], targets: &mut Vec<Square>)
where
    O: Occupancy + ?Sized,
{
    for &delta in deltas {
        let to = from.offset(delta);
        match board.occupant(to) {
            None => targets.push(to),
            Some(piece) if piece.can_be_captured_by(us) => targets.push(to),
            Some(_) => {}
        }
    }
}

fn slide<O>(board: &O, from: Square, us: Color, directions: &[Direction], targets: &mut Vec<Square>)
where
    O: Occupancy + ?Sized,
{
    for &dir in directions {
        let mut to = from.towards(dir);
        loop {
            match board.occupant(to) {
                None => targets.push(to),
                Some(piece) => {
                    // Own pieces, enemy pieces and the sentinel all end the ray.
                    if piece.can_be_captured_by(us) {
                        targets.push(to);
                    }
                    break;
                }
            }

            to = to.towards(dir);
        }
    }
}

fn pawn<O>(board: &O, from: Square, rules: &PawnRules, targets: &mut Vec<Square>)
where
    O: Occupancy + ?Sized,
{
    let single = from.offset(rules.advance);
    if board.occupant(single).is_none() {
        targets.push(single);
        let double = single.offset(rules.advance);
        if from.rank() == rules.double_advance_rank && board.occupant(double).is_none() {
            targets.push(double);
        }
    }

    // Pawns only ever move diagonally onto something they can take.
    for delta in [rules.capture_west, rules.capture_east] {
        let to = from.offset(delta);
        if capturable_by(board.occupant(to), rules.color) {
            targets.push(to);
        }
    }
}

/// The table of generators for all twelve real pieces, indexed by [`Piece::index`]. Build one with
/// [`Generators::new`] and pass it by reference to everything that enumerates moves.
#[derive(Clone, Debug)]
pub struct Generators {
    table: [Generator; 12],
}

impl Generators {
    pub const fn new() -> Generators {
        const fn of(piece: Piece) -> Generator {
            match Generator::for_piece(piece) {
                Some(generator) => generator,
                None => panic!("the catalog holds no sentinel"),
            }
        }

        Generators {
            table: [
                of(WHITE_PAWN),
                of(WHITE_KNIGHT),
                of(WHITE_BISHOP),
                of(WHITE_ROOK),
                of(WHITE_QUEEN),
                of(WHITE_KING),
                of(BLACK_PAWN),
                of(BLACK_KNIGHT),
                of(BLACK_BISHOP),
                of(BLACK_ROOK),
                of(BLACK_QUEEN),
                of(BLACK_KING),
            ],
        }
    }

    /// Returns the generator for `piece`. Only the sentinel has none.
    pub fn get(&self, piece: Piece) -> Option<&Generator> {
        piece.index().map(|index| &self.table[index])
    }
}

impl Default for Generators {
    fn default() -> Self {
        Generators::new()
    }
}
