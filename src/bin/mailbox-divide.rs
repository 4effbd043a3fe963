// Copyright 2021 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::{collections::BTreeMap, time::Instant};

use anyhow::Context;
use mailbox::{core::Color, Board, Perft, PerftMode, PerftOptions};
use serde::Serialize;
use structopt::StructOpt;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Prints the perft leaf count below every move of a position.
#[derive(Debug, StructOpt)]
struct Options {
    /// Piece placement of the position to divide, in FEN notation.
    #[structopt(name = "PLACEMENT")]
    placement: String,

    /// The depth to search to.
    #[structopt(short, long)]
    depth: i32,

    /// Black moves first instead of white.
    #[structopt(long)]
    black: bool,

    /// Play every move down to depth zero instead of counting the moves at the last ply.
    #[structopt(long)]
    bulk: bool,

    /// Number of worker threads; 0 uses one per logical CPU.
    #[structopt(short, long, default_value = "1")]
    threads: usize,

    /// Print a JSON report instead of text.
    #[structopt(long)]
    json: bool,

    /// Log perft progress at debug level unless RUST_LOG says otherwise.
    #[structopt(short, long)]
    verbose: bool,
}

#[derive(Debug, Serialize)]
struct DivideReport {
    placement: String,
    side_to_move: String,
    depth: i32,
    leaf_nodes: u64,
    searched_nodes: u64,
    duration_ms: u64,
    divide: BTreeMap<String, u64>,
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

    let board = Board::from_placement(&args.placement)
        .with_context(|| format!("invalid placement {:?}", args.placement))?;
    let side = if args.black {
        Color::Black
    } else {
        Color::White
    };
    let mode = if args.bulk {
        PerftMode::Bulk
    } else {
        PerftMode::NonBulk
    };

    let start = Instant::now();
    let result = Perft::new().run(PerftOptions {
        board: Some(board),
        depth: args.depth,
        side_to_move: side,
        mode,
        threads: args.threads,
    })?;
    let report = DivideReport {
        placement: args.placement,
        side_to_move: side.to_string(),
        depth: args.depth,
        leaf_nodes: result.leaf_nodes(),
        searched_nodes: result.searched_nodes(),
        duration_ms: start.elapsed().as_millis() as u64,
        divide: result
            .divide()
            .iter()
            .map(|(mov, &count)| (mov.as_uci(), count))
            .collect(),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    for (mov, count) in &report.divide {
        println!("{}: {}", mov, count);
    }

    println!();
    println!("{:<20} {}", "Moves:", report.divide.len());
    println!("{:<20} {}", "Leaf Nodes:", report.leaf_nodes);
    println!("{:<20} {}", "Searched Nodes:", report.searched_nodes);
    println!("{:<20} {} ms", "Duration:", report.duration_ms);
    Ok(())
}
