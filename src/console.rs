// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use std::io::{self, BufRead, Write};

use crate::engine::Engine;
use crate::eval::BoardEvaluator;
use crate::types::Color;

/// A text session between a human and the engine. Each input line is either a command or a move
/// in algebraic notation for the human's side; the engine answers on its own turns.
pub struct Console<E: BoardEvaluator> {
    engine: Engine<E>,
    engine_side: Option<Color>,
}

impl<E: BoardEvaluator> Console<E> {
    /// Starts a session. With `engine_side` of `None` both sides are played from the input.
    pub fn new(engine: Engine<E>, engine_side: Option<Color>) -> Console<E> {
        Console {
            engine,
            engine_side,
        }
    }

    pub fn engine(&self) -> &Engine<E> {
        &self.engine
    }

    pub fn run<R, W>(&mut self, reader: R, mut writer: W) -> io::Result<()>
    where
        R: BufRead,
        W: Write,
    {
        self.engine_turn(&mut writer)?;
        self.show_board(&mut writer)?;
        for maybe_line in reader.lines() {
            let line = maybe_line?;
            let components: Vec<_> = line.split_whitespace().collect();
            match components.as_slice() {
                [] => continue,
                ["quit"] => break,
                ["undo"] => self.handle_undo(&mut writer)?,
                ["moves"] => self.handle_moves(&mut writer)?,
                ["fen"] => writeln!(&mut writer, "{}", self.engine.board().as_fen())?,
                ["resign"] => self.handle_resign(&mut writer)?,
                [text] => self.handle_move(&mut writer, text)?,
                _ => writeln!(&mut writer, "unrecognized command")?,
            }
        }

        Ok(())
    }

    fn handle_move<W: Write>(&mut self, w: &mut W, text: &str) -> io::Result<()> {
        if self.engine.board().state().is_over() {
            writeln!(w, "the game is over ({})", self.engine.board().state())?;
            return Ok(());
        }

        match self.engine.play(text) {
            Ok(_) => {}
            Err(err) => {
                debug!("refused {:?}: {}", text, err);
                return writeln!(w, "{}", err);
            }
        }

        self.engine_turn(w)?;
        self.show_board(w)
    }

    /// Lets the engine move for as long as it is the engine's turn.
    fn engine_turn<W: Write>(&mut self, w: &mut W) -> io::Result<()> {
        while Some(self.engine.board().side_to_move()) == self.engine_side
            && !self.engine.board().state().is_over()
        {
            let result = match self.engine.find_best_move() {
                Some(result) => result,
                None => break,
            };

            let san = self.engine.board().san(&result.best_move);
            if let Err(err) = self.engine.play_move(&result.best_move) {
                warn!("engine move {} refused: {}", san, err);
                break;
            }

            info!("engine plays {} ({})", san, result.score);
            writeln!(w, "engine plays {} ({})", san, result.score)?;
        }

        Ok(())
    }

    fn handle_undo<W: Write>(&mut self, w: &mut W) -> io::Result<()> {
        // Take back the engine's reply as well so the human is on move again.
        match self.engine.undo() {
            Some(mov) => writeln!(w, "took back {}", mov)?,
            None => return writeln!(w, "nothing to undo"),
        }

        if self.engine_side.is_some() && Some(self.engine.board().side_to_move()) == self.engine_side
        {
            if let Some(mov) = self.engine.undo() {
                writeln!(w, "took back {}", mov)?;
            }
        }

        self.show_board(w)
    }

    fn handle_moves<W: Write>(&mut self, w: &mut W) -> io::Result<()> {
        let board = self.engine.board();
        if board.state().is_terminal() {
            return writeln!(w, "no moves, the game is over");
        }

        let moves: Vec<String> = board
            .legal_moves()
            .iter()
            .map(|mov| board.san(mov))
            .collect();
        writeln!(w, "{}", moves.join(" "))
    }

    fn handle_resign<W: Write>(&mut self, w: &mut W) -> io::Result<()> {
        if let Err(err) = self.engine.resign() {
            return writeln!(w, "cannot resign: {}", err);
        }

        self.show_board(w)
    }

    fn show_board<W: Write>(&self, w: &mut W) -> io::Result<()> {
        writeln!(w, "{}", self.engine.board())
    }
}
