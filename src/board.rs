// Copyright 2017-2021 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::fmt::{self, Write};

use thiserror::Error;

use crate::{
    core::{self, *},
    movegen::{Generators, Occupancy},
};

/// A board, holding the pieces on a padded 10x12 grid along with enough history to take back every move made on
/// it. Boards are cheap to clone and a clone shares nothing with its source, so independent traversals should
/// each work on their own clone.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    /// Contents of every cell of the padded board. Padding cells hold the sentinel.
    squares: [Option<Piece>; BOARD_SIZE],
    /// Moves applied to this board, oldest first.
    played_moves: Vec<Move>,
    /// For each applied move, what stood on its destination square before the move.
    captures: Vec<Option<Piece>>,
}

impl Board {
    /// A board with every playable square empty.
    pub fn empty() -> Board {
        let mut squares = [Some(BLOCKER); BOARD_SIZE];
        for sq in core::playable_squares() {
            squares[sq.index()] = None;
        }

        Board {
            squares,
            played_moves: Vec::new(),
            captures: Vec::new(),
        }
    }

    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.squares[square.index()]
    }

    /// Looks up the piece on a square given in algebraic notation.
    pub fn piece_at_algebraic(&self, square: &str) -> Result<Option<Piece>, SquareParseError> {
        Ok(self.piece_at(Square::from_algebraic(square)?))
    }

    pub fn played_moves(&self) -> &[Move] {
        &self.played_moves
    }

    pub fn captures(&self) -> &[Option<Piece>] {
        &self.captures
    }

    /// Fills `moves` with every move available to `us`. Squares are visited in ascending order and each piece's
    /// moves are emitted in its generator's order, so the result is reproducible.
    pub fn generate_moves(&self, generators: &Generators, us: Color, moves: &mut Vec<Move>) {
        let mut targets = Vec::with_capacity(32);
        for from in core::playable_squares() {
            let piece = match self.piece_at(from) {
                Some(piece) if piece.color == us && !piece.is_blocker() => piece,
                _ => continue,
            };

            if let Some(generator) = generators.get(piece) {
                targets.clear();
                generator.destinations(self, from, &mut targets);
                moves.extend(targets.iter().map(|&to| Move::new(from, to)));
            }
        }
    }

    pub fn moves_for(&self, generators: &Generators, us: Color) -> Vec<Move> {
        let mut moves = Vec::new();
        self.generate_moves(generators, us, &mut moves);
        moves
    }
}

impl Occupancy for Board {
    fn occupant(&self, square: Square) -> Option<Piece> {
        self.piece_at(square)
    }
}

//
// Make and unmake move.
//

/// Reasons a move can't be applied to, or taken back from, a board.
#[derive(Clone, PartialEq, Eq, Debug, Error)]
pub enum MoveError {
    #[error("illegal move: square {0} is not on the board")]
    OutOfRange(Square),
    #[error("illegal move: no piece at source square {0}")]
    EmptySource(Square),
    #[error("illegal move: destination square {0} holds a piece of the moving side")]
    OwnPieceCapture(Square),
    #[error("no moves to unmake")]
    NoMovesToUnmake,
}

impl Board {
    /// Makes a move on the board by relocating the piece on the source square to the destination square, capturing
    /// whatever stood there. Nothing else happens: pawns reaching the last rank stay pawns and no rook follows the
    /// king.
    pub fn make_move(&mut self, mov: Move) -> Result<(), MoveError> {
        let (from, to) = (mov.source(), mov.destination());
        for sq in [from, to] {
            if !sq.is_playable() {
                return Err(MoveError::OutOfRange(sq));
            }
        }

        let moving_piece = match self.piece_at(from) {
            Some(piece) if !piece.is_blocker() => piece,
            _ => return Err(MoveError::EmptySource(from)),
        };

        let captured = self.piece_at(to);
        if captured.is_some() && !capturable_by(captured, moving_piece.color) {
            return Err(MoveError::OwnPieceCapture(to));
        }

        self.captures.push(captured);
        self.squares[to.index()] = Some(moving_piece);
        self.squares[from.index()] = None;
        self.played_moves.push(mov);
        Ok(())
    }

    /// Takes back the most recently made move, returning it.
    pub fn unmake_move(&mut self) -> Result<Move, MoveError> {
        let mov = self.played_moves.pop().ok_or(MoveError::NoMovesToUnmake)?;
        let captured = self
            .captures
            .pop()
            .expect("capture history out of sync with move history");

        let (from, to) = (mov.source(), mov.destination());
        self.squares[from.index()] = self.squares[to.index()];
        self.squares[to.index()] = captured;
        Ok(mov)
    }
}

//
// Placement parsing and generation.
//
// Boards are set up from the piece placement field of a FEN string: ranks from 8 down to 1, separated by slashes,
// with digits standing for runs of empty squares. The other FEN fields are not modeled.
//

/// Possible errors that can arise when parsing a placement string into a `Board`.
#[derive(Clone, PartialEq, Eq, Debug, Error)]
pub enum PlacementParseError {
    #[error("too many files on rank {rank}")]
    RankOverflow { rank: u8 },
    #[error("rank {rank} does not sum to 8")]
    IncompleteRank { rank: u8 },
    #[error("too many ranks")]
    TooManyRanks,
    #[error("missing ranks, input ended on rank {rank}")]
    MissingRanks { rank: u8 },
    #[error("invalid digit: {0}")]
    InvalidDigit(char),
    #[error("unknown piece: {0}")]
    UnknownPiece(char),
}

pub const START_PLACEMENT: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR";

impl Board {
    pub fn start_position() -> Board {
        Board::from_placement(START_PLACEMENT).expect("start placement is valid")
    }

    /// Constructs a new board from a piece placement string, such as
    /// `rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR`.
    pub fn from_placement(placement: impl AsRef<str>) -> Result<Board, PlacementParseError> {
        let mut board = Board::empty();
        // Zero-based rank being filled and the number of files already filled on it.
        let mut rank: u8 = 7;
        let mut file: u8 = 0;
        for c in placement.as_ref().chars() {
            match c {
                '/' => {
                    if file != 8 {
                        return Err(PlacementParseError::IncompleteRank { rank: rank + 1 });
                    }

                    if rank == 0 {
                        return Err(PlacementParseError::TooManyRanks);
                    }

                    rank -= 1;
                    file = 0;
                }
                '1'..='8' => {
                    let run = c as u8 - b'0';
                    if file + run > 8 {
                        return Err(PlacementParseError::RankOverflow { rank: rank + 1 });
                    }

                    file += run;
                }
                '0' | '9' => return Err(PlacementParseError::InvalidDigit(c)),
                c => {
                    let piece =
                        Piece::from_code(c).map_err(|_| PlacementParseError::UnknownPiece(c))?;
                    if file >= 8 {
                        return Err(PlacementParseError::RankOverflow { rank: rank + 1 });
                    }

                    board.squares[Square::of(rank, file).index()] = Some(piece);
                    file += 1;
                }
            }
        }

        if file != 8 {
            return Err(PlacementParseError::IncompleteRank { rank: rank + 1 });
        }

        if rank != 0 {
            return Err(PlacementParseError::MissingRanks { rank: rank + 1 });
        }

        Ok(board)
    }

    pub fn as_placement(&self) -> String {
        let mut buf = String::new();
        for rank in (0..8).rev() {
            let mut empty_squares = 0;
            for file in 0..8 {
                if let Some(piece) = self.piece_at(Square::of(rank, file)) {
                    if empty_squares != 0 {
                        write!(&mut buf, "{}", empty_squares).unwrap();
                    }
                    write!(&mut buf, "{}", piece).unwrap();
                    empty_squares = 0;
                } else {
                    empty_squares += 1;
                }
            }

            if empty_squares != 0 {
                write!(&mut buf, "{}", empty_squares).unwrap();
            }

            if rank != 0 {
                buf.push('/');
            }
        }

        buf
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for rank in (0..8).rev() {
            for file in 0..8 {
                if let Some(piece) = self.piece_at(Square::of(rank, file)) {
                    write!(f, " {} ", piece)?;
                } else {
                    write!(f, " . ")?;
                }
            }

            writeln!(f, "| {}", rank + 1)?;
        }

        for _ in 0..8 {
            write!(f, "---")?;
        }

        writeln!(f)?;
        for file in b'a'..=b'h' {
            write!(f, " {} ", file as char)?;
        }

        writeln!(f)?;
        Ok(())
    }
}

impl Default for Board {
    fn default() -> Self {
        Board::empty()
    }
}

#[cfg(test)]
mod tests {
    mod placement {
        use crate::{
            board::{Board, PlacementParseError, START_PLACEMENT},
            core::*,
        };

        #[test]
        fn starting_position() {
            let board = Board::from_placement(START_PLACEMENT).unwrap();
            assert_eq!(Some(WHITE_QUEEN), board.piece_at(D1));
            assert_eq!(Some(BLACK_KING), board.piece_at(E8));
            assert_eq!(Ok(Some(WHITE_KNIGHT)), board.piece_at_algebraic("g1"));

            let back_rank = [
                WHITE_ROOK,
                WHITE_KNIGHT,
                WHITE_BISHOP,
                WHITE_QUEEN,
                WHITE_KING,
                WHITE_BISHOP,
                WHITE_KNIGHT,
                WHITE_ROOK,
            ];
            for (file, &piece) in back_rank.iter().enumerate() {
                let file = file as u8;
                assert_eq!(Some(piece), board.piece_at(Square::of(0, file)));
                assert_eq!(Some(WHITE_PAWN), board.piece_at(Square::of(1, file)));
                assert_eq!(Some(BLACK_PAWN), board.piece_at(Square::of(6, file)));
                let black = Piece {
                    color: Color::Black,
                    kind: piece.kind,
                };
                assert_eq!(Some(black), board.piece_at(Square::of(7, file)));
                for rank in 2..6 {
                    assert_eq!(None, board.piece_at(Square::of(rank, file)));
                }
            }
        }

        #[test]
        fn padding_holds_blockers() {
            let board = Board::start_position();
            for index in 0..BOARD_SIZE as u8 {
                let sq = Square::try_from(index).unwrap();
                if !sq.is_playable() {
                    assert_eq!(Some(BLOCKER), board.piece_at(sq), "expected blocker at {}", index);
                }
            }
        }

        #[test]
        fn round_trip() {
            for placement in [
                START_PLACEMENT,
                "rnbqkbnr/pp1ppppp/2p5/8/6P1/2P5/PP1PPP1P/RNBQKBNR",
                "8/8/8/8/1k6/8/pK6/Q7",
                "8/8/8/8/8/8/8/8",
            ] {
                let board = Board::from_placement(placement).unwrap();
                assert_eq!(placement, board.as_placement());
            }
        }

        #[test]
        fn digit_overflows_rank() {
            let err = Board::from_placement("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPP2/RNBQKBNR").unwrap_err();
            assert_eq!(PlacementParseError::RankOverflow { rank: 2 }, err);
        }

        #[test]
        fn piece_overflows_rank() {
            let err = Board::from_placement("rnbqkbnrp/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR").unwrap_err();
            assert_eq!(PlacementParseError::RankOverflow { rank: 8 }, err);
        }

        #[test]
        fn invalid_digit() {
            let err = Board::from_placement("rnbqkbnr/pppppppp/9/8/8/8/PPPPPPPP/RNBQKBNR").unwrap_err();
            assert_eq!(PlacementParseError::InvalidDigit('9'), err);
            let err = Board::from_placement("0/8/8/8/8/8/8/8").unwrap_err();
            assert_eq!(PlacementParseError::InvalidDigit('0'), err);
        }

        #[test]
        fn last_rank_short() {
            let err = Board::from_placement("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBN").unwrap_err();
            assert_eq!(PlacementParseError::IncompleteRank { rank: 1 }, err);
        }

        #[test]
        fn slash_before_rank_is_full() {
            let err = Board::from_placement("rnbqkbn/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR").unwrap_err();
            assert_eq!(PlacementParseError::IncompleteRank { rank: 8 }, err);
        }

        #[test]
        fn trailing_slash() {
            let err = Board::from_placement("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR/").unwrap_err();
            assert_eq!(PlacementParseError::TooManyRanks, err);
        }

        #[test]
        fn missing_rank() {
            let err = Board::from_placement("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP").unwrap_err();
            assert_eq!(PlacementParseError::MissingRanks { rank: 2 }, err);
        }

        #[test]
        fn empty() {
            let err = Board::from_placement("").unwrap_err();
            assert_eq!(PlacementParseError::IncompleteRank { rank: 8 }, err);
        }

        #[test]
        fn unknown_piece() {
            let err = Board::from_placement("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQXBNR").unwrap_err();
            assert_eq!(PlacementParseError::UnknownPiece('X'), err);
            let err = Board::from_placement("z7/8/8/8/8/8/8/8").unwrap_err();
            assert_eq!(PlacementParseError::UnknownPiece('z'), err);
        }

        #[test]
        fn display() {
            let board = Board::from_placement("8/8/8/8/8/8/8/K6k").unwrap();
            let text = board.to_string();
            let lines: Vec<_> = text.lines().collect();
            assert_eq!(10, lines.len());
            assert_eq!(" .  .  .  .  .  .  .  . | 8", lines[0]);
            assert_eq!(" K  .  .  .  .  .  .  k | 1", lines[7]);
            assert_eq!(" a  b  c  d  e  f  g  h ", lines[9]);
        }
    }

    mod make {
        use crate::{
            board::{Board, MoveError},
            core::*,
        };

        fn mov(uci: &str) -> Move {
            Move::from_uci(uci).unwrap()
        }

        fn assert_same_squares(expected: &Board, actual: &Board) {
            for sq in playable_squares() {
                assert_eq!(
                    expected.piece_at(sq),
                    actual.piece_at(sq),
                    "pieces differ at {}",
                    sq
                );
            }
        }

        #[test]
        fn quiet_move() {
            let mut board = Board::start_position();
            board.make_move(mov("e2e4")).unwrap();
            assert_eq!(None, board.piece_at(E2));
            assert_eq!(Some(WHITE_PAWN), board.piece_at(E4));
            assert_eq!(&[mov("e2e4")], board.played_moves());
            assert_eq!(&[None::<Piece>], board.captures());
        }

        #[test]
        fn capture() {
            let mut board =
                Board::from_placement("rnbqkbnr/ppp1pppp/8/3p4/4P3/8/PPPP1PPP/RNBQKBNR").unwrap();
            board.make_move(mov("e4d5")).unwrap();
            assert_eq!(None, board.piece_at(E4));
            assert_eq!(Some(WHITE_PAWN), board.piece_at(D5));
            assert_eq!(&[Some(BLACK_PAWN)], board.captures());
        }

        #[test]
        fn pawn_reaching_last_rank_stays_a_pawn() {
            let mut board = Board::from_placement("8/4P3/8/8/8/8/8/8").unwrap();
            board.make_move(mov("e7e8")).unwrap();
            assert_eq!(Some(WHITE_PAWN), board.piece_at(E8));
        }

        #[test]
        fn unmake_quiet_move() {
            let original = Board::start_position();
            let mut board = original.clone();
            board.make_move(mov("e2e4")).unwrap();
            assert_eq!(Ok(mov("e2e4")), board.unmake_move());
            assert_same_squares(&original, &board);
            assert!(board.played_moves().is_empty());
            assert!(board.captures().is_empty());
        }

        #[test]
        fn unmake_capture() {
            let original =
                Board::from_placement("rnbqkbnr/ppp1pppp/8/3p4/4P3/8/PPPP1PPP/RNBQKBNR").unwrap();
            let mut board = original.clone();
            board.make_move(mov("e4d5")).unwrap();
            board.unmake_move().unwrap();
            assert_eq!(original, board);
        }

        #[test]
        fn unmake_is_lifo() {
            let original = Board::start_position();
            let mut board = original.clone();
            let line = ["e2e4", "e7e5", "g1f3", "b8c6", "f1b5", "a7a6", "b5c6", "d7c6"];
            for uci in line {
                board.make_move(mov(uci)).unwrap();
            }

            assert_eq!(line.len(), board.played_moves().len());
            assert_eq!(line.len(), board.captures().len());
            for uci in line.iter().rev() {
                assert_eq!(Ok(mov(uci)), board.unmake_move());
                assert_eq!(board.played_moves().len(), board.captures().len());
            }

            assert_eq!(original, board);
        }

        #[test]
        fn unmake_without_moves() {
            let mut board = Board::start_position();
            assert_eq!(Err(MoveError::NoMovesToUnmake), board.unmake_move());
        }

        #[test]
        fn empty_source() {
            let mut board = Board::start_position();
            assert_eq!(Err(MoveError::EmptySource(E4)), board.make_move(mov("e4e5")));
            assert!(board.played_moves().is_empty());
        }

        #[test]
        fn own_piece_capture() {
            let mut board = Board::start_position();
            assert_eq!(
                Err(MoveError::OwnPieceCapture(E2)),
                board.make_move(mov("e1e2"))
            );
            assert!(board.captures().is_empty());
        }

        #[test]
        fn out_of_range() {
            let mut board = Board::start_position();
            let off_board = A1.towards(Direction::West);
            assert_eq!(
                Err(MoveError::OutOfRange(off_board)),
                board.make_move(Move::new(A1, off_board))
            );
            assert_eq!(
                Err(MoveError::OutOfRange(off_board)),
                board.make_move(Move::new(off_board, A3))
            );
        }

        #[test]
        fn clone_is_deep() {
            let original = Board::start_position();
            let mut copy = original.clone();
            assert_eq!(original, copy);

            copy.make_move(mov("e2e4")).unwrap();
            assert_eq!(Some(WHITE_PAWN), original.piece_at(E2));
            assert_eq!(None, original.piece_at(E4));
            assert!(original.played_moves().is_empty());

            // ...and the other way around.
            let mut source = copy.clone();
            source.unmake_move().unwrap();
            assert_eq!(Some(WHITE_PAWN), copy.piece_at(E4));
            assert_eq!(1, copy.played_moves().len());
        }
    }

    mod moves {
        use std::collections::HashSet;

        use crate::{board::Board, core::*, movegen::Generators};

        fn moves_from(from: &str, destinations: &str) -> Vec<Move> {
            destinations
                .split_whitespace()
                .map(|to| Move::from_uci(&format!("{}{}", from, to)).unwrap())
                .collect()
        }

        #[test]
        fn both_sides() {
            let board = Board::from_placement("8/8/8/8/1k6/8/pK6/Q7").unwrap();
            let generators = Generators::new();

            let white: HashSet<_> = board.moves_for(&generators, Color::White).into_iter().collect();
            let mut expected = moves_from("a1", "a2 b1 c1 d1 e1 f1 g1 h1");
            expected.extend(moves_from("b2", "a2 a3 b3 c3 c2 c1 b1"));
            assert_eq!(expected.into_iter().collect::<HashSet<_>>(), white);

            let black = board.moves_for(&generators, Color::Black);
            assert_eq!(8, black.len());
            let black: HashSet<_> = black.into_iter().collect();
            assert_eq!(
                moves_from("b4", "a5 b5 c5 a4 c4 a3 b3 c3")
                    .into_iter()
                    .collect::<HashSet<_>>(),
                black
            );
        }

        #[test]
        fn start_position_counts() {
            let board = Board::start_position();
            let generators = Generators::new();
            assert_eq!(20, board.moves_for(&generators, Color::White).len());
            assert_eq!(20, board.moves_for(&generators, Color::Black).len());
        }

        #[test]
        fn scan_order_is_ascending() {
            let board = Board::start_position();
            let generators = Generators::new();
            let moves = board.moves_for(&generators, Color::White);
            assert!(moves.windows(2).all(|w| w[0].source() <= w[1].source()));
            // b1's knight is the first piece with moves, and c3 is its first target.
            assert_eq!(Move::new(B1, C3), moves[0]);
            assert_eq!(moves, board.moves_for(&generators, Color::White));
        }

        #[test]
        fn buffer_is_appended_to() {
            let board = Board::start_position();
            let generators = Generators::new();
            let mut moves = vec![Move::new(A1, A2)];
            board.generate_moves(&generators, Color::White, &mut moves);
            assert_eq!(21, moves.len());
            assert_eq!(Move::new(A1, A2), moves[0]);
        }

        #[test]
        fn empty_board_has_no_moves() {
            let board = Board::empty();
            assert!(board.moves_for(&Generators::new(), Color::White).is_empty());
        }
    }

    mod round_trip {
        use rand::{rngs::SmallRng, seq::SliceRandom, SeedableRng};

        use crate::{board::Board, core::*, movegen::Generators};

        #[test]
        fn every_generated_move_unmakes() {
            let generators = Generators::new();
            for placement in [
                "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR",
                "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R",
                "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8",
            ] {
                let original = Board::from_placement(placement).unwrap();
                for side in [Color::White, Color::Black] {
                    let mut board = original.clone();
                    for mov in original.moves_for(&generators, side) {
                        board.make_move(mov).unwrap();
                        assert_eq!(1, board.played_moves().len());
                        assert_eq!(1, board.captures().len());
                        board.unmake_move().unwrap();
                        assert_eq!(original, board, "{} did not unmake cleanly", mov);
                    }
                }
            }
        }

        #[test]
        fn random_walks_unwind() {
            let generators = Generators::new();
            let mut rng = SmallRng::seed_from_u64(0x6d61_696c_626f_78);
            for _ in 0..32 {
                let original = Board::start_position();
                let mut board = original.clone();
                let mut side = Color::White;
                let mut snapshots = Vec::new();
                for _ in 0..40 {
                    let moves = board.moves_for(&generators, side);
                    let mov = match moves.choose(&mut rng) {
                        Some(&mov) => mov,
                        None => break,
                    };

                    snapshots.push(board.clone());
                    board.make_move(mov).unwrap();
                    side = side.toggle();
                }

                while let Some(snapshot) = snapshots.pop() {
                    board.unmake_move().unwrap();
                    assert_eq!(snapshot, board);
                }

                assert_eq!(original, board);
            }
        }
    }
}
