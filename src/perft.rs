// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use rayon::prelude::*;

use crate::board::Board;

/// Counts the leaf nodes of the legal move tree of the given depth rooted at `board`.
pub fn perft(board: &Board, depth: u32) -> u64 {
    count_nodes(board, depth, true)
}

/// With `use_legality_test`, pseudo-legal moves are filtered before they are played. Without it,
/// every pseudo-legal move is played and discarded afterwards if it left the mover in check. Both
/// must agree.
fn count_nodes(board: &Board, depth: u32, use_legality_test: bool) -> u64 {
    if depth == 0 {
        return 1;
    }

    let moves = board.pseudo_legal_moves();
    moves
        .par_iter()
        .map(|&mov| {
            if use_legality_test && !board.is_legal_given_pseudolegal(&mov) {
                return 0;
            }

            let side_to_move = board.side_to_move();
            let mut child = board.clone();
            child.make_move(mov);
            if !use_legality_test && child.is_check(side_to_move) {
                return 0;
            }

            count_nodes(&child, depth - 1, use_legality_test)
        })
        .sum()
}
