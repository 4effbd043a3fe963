// Copyright 2021 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Perft ("performance test") walks the move generation tree to a fixed depth and counts its leaves, which can be
//! compared with known totals to find bugs in move generation and in make/unmake.
//!
//! The totals here are those of the simplified rules implemented by [`crate::movegen`]. They agree with full chess
//! only at shallow depths.

use std::collections::HashMap;
use std::time::Instant;

use thiserror::Error;
use tracing::{debug, trace};

use crate::{
    board::{Board, MoveError},
    core::*,
    movegen::Generators,
};

pub mod parallel;

/// How the last ply of a perft is counted.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PerftMode {
    /// Moves at the last ply are generated and counted but never played.
    NonBulk,
    /// Every move is played, down to depth zero.
    Bulk,
}

impl Default for PerftMode {
    fn default() -> Self {
        PerftMode::NonBulk
    }
}

#[derive(Clone, PartialEq, Eq, Debug, Error)]
pub enum PerftError {
    #[error("depth must be greater than 0, got {0}")]
    InvalidDepth(i32),
    #[error("no board to run perft on")]
    MissingBoard,
    #[error(transparent)]
    IllegalMove(#[from] MoveError),
}

/// The results of a perft.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PerftResult {
    pub(crate) searched_nodes: u64,
    pub(crate) leaf_nodes: u64,
    pub(crate) divide: HashMap<Move, u64>,
}

impl PerftResult {
    /// Number of positions whose moves were generated, internal nodes included.
    pub fn searched_nodes(&self) -> u64 {
        self.searched_nodes
    }

    /// Number of positions at the requested depth.
    pub fn leaf_nodes(&self) -> u64 {
        self.leaf_nodes
    }

    /// Leaf count below each move played at the root.
    pub fn divide(&self) -> &HashMap<Move, u64> {
        &self.divide
    }
}

/// Options for a perft run.
#[derive(Clone, Debug)]
pub struct PerftOptions {
    /// The board to walk. The run takes ownership, so the caller's own boards are never touched.
    pub board: Option<Board>,

    /// Depth to walk to; must be positive.
    pub depth: i32,

    /// Side to move at the root.
    pub side_to_move: Color,

    pub mode: PerftMode,

    /// Number of worker threads. One walks the tree on the calling thread; zero uses one worker per logical CPU.
    pub threads: usize,
}

impl Default for PerftOptions {
    fn default() -> Self {
        PerftOptions {
            board: None,
            depth: 1,
            side_to_move: Color::White,
            mode: PerftMode::NonBulk,
            threads: 1,
        }
    }
}

/// The perft engine. Holds the generator table that every traversal it runs dispatches through.
#[derive(Clone, Debug, Default)]
pub struct Perft {
    generators: Generators,
}

impl Perft {
    pub fn new() -> Perft {
        Perft::with_generators(Generators::new())
    }

    pub fn with_generators(generators: Generators) -> Perft {
        Perft { generators }
    }

    pub fn generators(&self) -> &Generators {
        &self.generators
    }

    /// Runs a non-bulk perft. The board is returned to its original state when this returns successfully.
    pub fn perft(&self, board: &mut Board, depth: i32, side: Color) -> Result<PerftResult, PerftError> {
        self.perft_with_mode(board, depth, PerftMode::NonBulk, side)
    }

    pub fn perft_with_mode(
        &self,
        board: &mut Board,
        depth: i32,
        mode: PerftMode,
        side: Color,
    ) -> Result<PerftResult, PerftError> {
        if depth <= 0 {
            return Err(PerftError::InvalidDepth(depth));
        }

        debug!(depth, %side, ?mode, "starting perft");
        let start = Instant::now();
        let mut result = PerftResult::default();
        result.leaf_nodes = walk(&self.generators, board, &mut result, depth, depth, mode, side)?;
        debug!(
            leaf_nodes = result.leaf_nodes,
            searched_nodes = result.searched_nodes,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "perft complete"
        );
        Ok(result)
    }

    /// Runs a perft as described by `options`, on as many threads as requested.
    pub fn run(&self, options: PerftOptions) -> Result<PerftResult, PerftError> {
        let mut board = options.board.ok_or(PerftError::MissingBoard)?;
        if options.threads == 1 {
            return self.perft_with_mode(&mut board, options.depth, options.mode, options.side_to_move);
        }

        parallel::perft_parallel(
            &self.generators,
            &board,
            options.depth,
            options.side_to_move,
            options.mode,
            options.threads,
        )
    }
}

/// One node of the walk. Every call counts itself as a searched node and returns the number of leaves below it;
/// calls at `root_depth` also record that count per move.
pub(crate) fn walk(
    generators: &Generators,
    board: &mut Board,
    result: &mut PerftResult,
    depth: i32,
    root_depth: i32,
    mode: PerftMode,
    side: Color,
) -> Result<u64, PerftError> {
    result.searched_nodes += 1;
    if depth == 0 {
        return Ok(1);
    }

    let moves = board.moves_for(generators, side);
    if depth == 1 && mode == PerftMode::NonBulk {
        if depth == root_depth {
            result.divide.extend(moves.iter().map(|&mov| (mov, 1)));
        }

        return Ok(moves.len() as u64);
    }

    let mut leaf_nodes = 0;
    for mov in moves {
        board.make_move(mov)?;
        let count = walk(generators, board, result, depth - 1, root_depth, mode, side.toggle())?;
        if depth == root_depth {
            trace!(%mov, count, "root move");
            result.divide.insert(mov, count);
        }

        leaf_nodes += count;
        board
            .unmake_move()
            .expect("failed to unmake a move that was just made");
    }

    Ok(leaf_nodes)
}
