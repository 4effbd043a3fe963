// Copyright 2021 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::time::Instant;

use anyhow::Context;
use mailbox::{board::START_PLACEMENT, core::Color, Board, Perft, PerftMode, PerftOptions};
use structopt::StructOpt;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

const REFERENCE_POSITIONS: [(&str, Color); 2] = [
    (START_PLACEMENT, Color::White),
    ("rnbqkbnr/pp1ppppp/2p5/8/6P1/2P5/PP1PPP1P/RNBQKBNR", Color::Black),
];

/// Times perft on a pair of reference positions.
#[derive(Debug, StructOpt)]
struct Options {
    /// The depth to search to.
    #[structopt(short, long, default_value = "4")]
    depth: i32,

    /// Number of times to run each position.
    #[structopt(short, long, default_value = "5")]
    iterations: u32,

    /// Play every move down to depth zero instead of counting the moves at the last ply.
    #[structopt(long)]
    bulk: bool,

    /// Number of worker threads; 0 uses one per logical CPU.
    #[structopt(short, long, default_value = "1")]
    threads: usize,

    /// Log perft progress at debug level unless RUST_LOG says otherwise.
    #[structopt(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Options::from_args();
    let default_level = if args.verbose { "debug" } else { "warn" };
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let mode = if args.bulk {
        PerftMode::Bulk
    } else {
        PerftMode::NonBulk
    };
    let perft = Perft::new();
    for _ in 0..args.iterations {
        for &(placement, side) in REFERENCE_POSITIONS.iter() {
            let board = Board::from_placement(placement)
                .with_context(|| format!("invalid reference placement {}", placement))?;
            let start = Instant::now();
            let result = perft.run(PerftOptions {
                board: Some(board),
                depth: args.depth,
                side_to_move: side,
                mode,
                threads: args.threads,
            })?;
            println!(
                "duration ({} depth): {} ms",
                args.depth,
                start.elapsed().as_millis()
            );
            println!(
                "Found: {} leaf nodes. Generated: {}",
                result.leaf_nodes(),
                result.searched_nodes()
            );
        }
    }

    Ok(())
}
