// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use crate::board::Board;
use crate::eval::{BoardEvaluator, Score};
use crate::moves::Move;
use crate::search::{DataRecorder, NullDataRecorder, Record};

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SearchResult {
    pub best_move: Move,
    pub nodes_searched: u64,
    /// The score of the position after `best_move`, from the point of view of the side that
    /// plays it.
    pub score: Score,
}

pub trait Searcher {
    /// Picks a move for the side to move. Returns `None` when there is nothing to play, either
    /// because the game is over or because no legal move exists.
    fn search(&mut self, board: &Board) -> Option<SearchResult>;
}

/// Looks exactly one ply ahead: every legal move is played on a scratch copy of the board, the
/// resulting position is scored, and the move is taken back. The first move with the strictly
/// highest score wins. The opponent's reply is never considered.
pub struct OnePlySearcher<E> {
    evaluator: E,
    recorder: Box<dyn DataRecorder + Send>,
    nodes_searched: u64,
}

impl<E: BoardEvaluator> OnePlySearcher<E> {
    pub fn new(evaluator: E) -> OnePlySearcher<E> {
        OnePlySearcher {
            evaluator,
            recorder: Box::new(NullDataRecorder),
            nodes_searched: 0,
        }
    }

    /// Sends one record per scored candidate to `recorder`.
    pub fn with_recorder(mut self, recorder: Box<dyn DataRecorder + Send>) -> OnePlySearcher<E> {
        self.recorder = recorder;
        self
    }

    pub fn evaluator(&self) -> &E {
        &self.evaluator
    }
}

impl<E: BoardEvaluator> Searcher for OnePlySearcher<E> {
    fn search(&mut self, board: &Board) -> Option<SearchResult> {
        if board.state().is_terminal() {
            return None;
        }

        self.nodes_searched = 0;
        let side = board.side_to_move();
        let mut scratch = board.clone();
        let mut scored: Vec<(Move, Score)> = Vec::new();
        let mut best: Option<(Move, Score)> = None;
        for mov in board.legal_moves().iter() {
            let played = scratch
                .apply_move(mov)
                .expect("invalid move: generated move rejected by scratch board");
            let score = self.evaluator.evaluate(&scratch).for_side(side);
            scratch.undo_move();
            self.nodes_searched += 1;

            scored.push((played, score));
            let improves = match best {
                Some((_, best_score)) => score > best_score,
                None => true,
            };
            if improves {
                best = Some((played, score));
            }
        }

        let (best_move, score) = best?;
        for &(mov, mov_score) in &scored {
            let rec = Record {
                fen: String::new(),
                candidate: mov.to_string(),
                score: mov_score.to_string(),
                chosen: mov == best_move,
            };
            self.recorder.record(board, &rec);
        }

        debug!(
            "searched {} moves, best {} ({})",
            self.nodes_searched, best_move, score
        );
        Some(SearchResult {
            best_move,
            nodes_searched: self.nodes_searched,
            score,
        })
    }
}
