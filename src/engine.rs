// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use std::error::Error;
use std::fmt;

use crate::board::{Board, MoveRejection};
use crate::eval::{BoardEvaluator, Score, WeightedEvaluator, Weights};
use crate::moves::{Move, MoveParseError};
use crate::search::{DataRecorder, OnePlySearcher, SearchResult, Searcher};

#[derive(Clone, Debug, PartialEq)]
pub enum PlayError {
    Parse(MoveParseError),
    Illegal(MoveRejection),
}

impl fmt::Display for PlayError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PlayError::Parse(err) => write!(f, "invalid move: {}", err),
            PlayError::Illegal(err) => write!(f, "illegal move: {}", err),
        }
    }
}

impl Error for PlayError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            PlayError::Parse(err) => Some(err),
            PlayError::Illegal(err) => Some(err),
        }
    }
}

impl From<MoveParseError> for PlayError {
    fn from(err: MoveParseError) -> PlayError {
        PlayError::Parse(err)
    }
}

impl From<MoveRejection> for PlayError {
    fn from(err: MoveRejection) -> PlayError {
        PlayError::Illegal(err)
    }
}

/// An engine owns the live game board and the searcher that picks its replies. Front-ends talk to
/// the engine rather than to the board directly.
pub struct Engine<E: BoardEvaluator> {
    board: Board,
    searcher: OnePlySearcher<E>,
}

impl Engine<WeightedEvaluator> {
    pub fn with_weights(board: Board, weights: Weights) -> Engine<WeightedEvaluator> {
        Engine::new(board, WeightedEvaluator::new(weights))
    }
}

impl<E: BoardEvaluator> Engine<E> {
    pub fn new(board: Board, evaluator: E) -> Engine<E> {
        Engine {
            board,
            searcher: OnePlySearcher::new(evaluator),
        }
    }

    pub fn with_recorder(mut self, recorder: Box<dyn DataRecorder + Send>) -> Engine<E> {
        self.searcher = self.searcher.with_recorder(recorder);
        self
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Parses `text` as a move in algebraic notation and plays it for the side to move.
    pub fn play(&mut self, text: &str) -> Result<Move, PlayError> {
        let candidate = Move::from_san(text)?;
        self.play_move(&candidate)
    }

    pub fn play_move(&mut self, candidate: &Move) -> Result<Move, PlayError> {
        let played = self.board.apply_move(candidate)?;
        Ok(played)
    }

    /// The move the engine would play for the side to move, without playing it.
    pub fn find_best_move(&mut self) -> Option<SearchResult> {
        self.searcher.search(&self.board)
    }

    /// Searches for and plays the engine's move. Returns `None` when the game is over.
    pub fn reply(&mut self) -> Option<SearchResult> {
        let result = self.find_best_move()?;
        let mover = self.board.side_to_move();
        let san = self.board.san(&result.best_move);
        self.board
            .apply_move(&result.best_move)
            .expect("invalid move: searcher chose an illegal move");
        info!("{} plays {} ({})", mover, san, result.score);
        Some(result)
    }

    /// Static evaluation of the current position, relative to white.
    pub fn evaluate(&self) -> Score {
        self.searcher.evaluator().evaluate(&self.board)
    }

    pub fn undo(&mut self) -> Option<Move> {
        self.board.undo_move()
    }

    pub fn resign(&mut self) -> Result<(), PlayError> {
        self.board.resign()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{Engine, PlayError};
    use crate::board::{Board, MoveRejection};
    use crate::eval::{Score, Weights};
    use crate::game_state::GameState;
    use crate::moves::MoveParseError;
    use crate::types::{Color, Square};

    fn engine() -> Engine<crate::eval::WeightedEvaluator> {
        Engine::with_weights(Board::new(), Weights::default())
    }

    #[test]
    fn play_and_reply() {
        let mut engine = engine();
        engine.play("e4").unwrap();
        assert_eq!(Color::Black, engine.board().side_to_move());
        let result = engine.reply().unwrap();
        assert_eq!(Color::White, engine.board().side_to_move());
        assert_eq!(Some(result.best_move), engine.board().last_move());
    }

    #[test]
    fn parse_errors_surface() {
        let mut engine = engine();
        assert_eq!(Err(PlayError::Parse(MoveParseError::Empty)), engine.play(""));
    }

    #[test]
    fn illegal_moves_surface() {
        let mut engine = engine();
        assert_eq!(
            Err(PlayError::Illegal(MoveRejection::NoMatchingMove)),
            engine.play("e5")
        );
        assert_eq!(Color::White, engine.board().side_to_move());
    }

    #[test]
    fn resign_then_no_reply() {
        let mut engine = engine();
        engine.resign().unwrap();
        assert_eq!(GameState::Resignation(Color::White), engine.board().state());
        assert!(engine.reply().is_none());
        assert_eq!(Score::Loss, engine.evaluate());
    }

    #[test]
    fn undo_takes_back() {
        let mut engine = engine();
        engine.play("Nf3").unwrap();
        let undone = engine.undo().unwrap();
        assert_eq!(Some(Square::F3), undone.destination());
        assert_eq!(Board::new().as_fen(), engine.board().as_fen());
    }
}
