// Copyright 2021 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use anyhow::Context;
use structopt::StructOpt;

use mailbox::{core::Color, Board, Generators};

#[derive(Debug, StructOpt)]
struct Options {
    /// Piece placement of the position to analyze, in FEN notation.
    #[structopt(name = "PLACEMENT")]
    placement: String,

    /// List black's moves instead of white's.
    #[structopt(long)]
    black: bool,
}

fn main() -> anyhow::Result<()> {
    let ops = Options::from_args();
    let board = Board::from_placement(&ops.placement)
        .with_context(|| format!("invalid placement {:?}", ops.placement))?;
    let side = if ops.black {
        Color::Black
    } else {
        Color::White
    };

    for mov in board.moves_for(&Generators::new(), side) {
        println!("{}", mov.as_uci());
    }

    Ok(())
}
