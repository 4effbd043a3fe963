// Copyright 2021 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Perft across several threads. The root is expanded once on the calling thread and its moves are dealt out to
//! workers, each walking its share of the subtrees on a private copy of the board. Totals are identical to a
//! single-threaded walk.

use std::thread;
use std::time::Instant;

use tracing::debug;

use crate::{
    board::Board,
    core::*,
    movegen::Generators,
    perft::{walk, PerftError, PerftMode, PerftResult},
};

/// Runs a perft of `board` to `depth` with up to `threads` workers. Zero threads means one per logical CPU.
pub fn perft_parallel(
    generators: &Generators,
    board: &Board,
    depth: i32,
    side: Color,
    mode: PerftMode,
    threads: usize,
) -> Result<PerftResult, PerftError> {
    if depth <= 0 {
        return Err(PerftError::InvalidDepth(depth));
    }

    let threads = if threads == 0 { num_cpus::get() } else { threads };
    let root_moves = board.moves_for(generators, side);
    let workers = threads.min(root_moves.len());
    if workers <= 1 || (depth == 1 && mode == PerftMode::NonBulk) {
        let mut board = board.clone();
        let mut result = PerftResult::default();
        result.leaf_nodes = walk(generators, &mut board, &mut result, depth, depth, mode, side)?;
        return Ok(result);
    }

    debug!(depth, %side, ?mode, workers, "starting parallel perft");
    let start = Instant::now();
    let partials: Vec<Result<PerftResult, PerftError>> = thread::scope(|scope| {
        let handles: Vec<_> = (0..workers)
            .map(|worker| {
                let share: Vec<Move> = root_moves
                    .iter()
                    .copied()
                    .skip(worker)
                    .step_by(workers)
                    .collect();
                let mut board = board.clone();
                thread::Builder::new()
                    .name(format!("perft worker {}", worker))
                    .spawn_scoped(scope, move || {
                        walk_share(generators, &mut board, &share, depth, mode, side.toggle())
                    })
                    .expect("failed to spawn perft worker")
            })
            .collect();

        handles
            .into_iter()
            .map(|handle| handle.join().expect("perft worker panicked"))
            .collect()
    });

    // The root itself is searched once, here.
    let mut result = PerftResult {
        searched_nodes: 1,
        ..PerftResult::default()
    };
    for partial in partials {
        let partial = partial?;
        result.searched_nodes += partial.searched_nodes;
        result.leaf_nodes += partial.leaf_nodes;
        result.divide.extend(partial.divide);
    }

    debug!(
        leaf_nodes = result.leaf_nodes,
        searched_nodes = result.searched_nodes,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "parallel perft complete"
    );
    Ok(result)
}

/// Walks the subtree below each of `moves`, which are all root moves. `side` is the side to move after them.
fn walk_share(
    generators: &Generators,
    board: &mut Board,
    moves: &[Move],
    depth: i32,
    mode: PerftMode,
    side: Color,
) -> Result<PerftResult, PerftError> {
    let mut result = PerftResult::default();
    for &mov in moves {
        board.make_move(mov)?;
        // Passing the root's depth keeps the walk below from recording its own moves in the divide.
        let count = walk(generators, board, &mut result, depth - 1, depth, mode, side)?;
        board
            .unmake_move()
            .expect("failed to unmake a move that was just made");
        result.divide.insert(mov, count);
        result.leaf_nodes += count;
    }

    debug!(moves = moves.len(), leaf_nodes = result.leaf_nodes, "worker finished");
    Ok(result)
}
