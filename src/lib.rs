// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

#[macro_use]
extern crate num_derive;
#[macro_use]
extern crate bitflags;
#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate log;
#[macro_use]
extern crate serde_derive;
#[macro_use]
extern crate pest_derive;

pub mod attacks;
mod board;
pub mod console;
pub mod engine;
pub mod eval;
mod game_state;
pub mod mailbox;
mod movegen;
mod moves;
mod notation;
mod perft;
pub mod search;
pub mod types;
mod zobrist;

pub use board::{Board, FenParseError, MoveRejection, START_FEN};
pub use game_state::GameState;
pub use movegen::{MoveGenerator, MoveVec};
pub use moves::{Move, MoveFlags, MoveParseError};
pub use perft::perft;
pub use types::{Color, File, Piece, PieceKind, Rank, Square};
