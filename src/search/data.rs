// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use std::io::Write;
use std::sync::Mutex;

use csv::Writer;

use crate::board::Board;

/// One scored candidate move of a search.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub fen: String,
    pub candidate: String,
    pub score: String,
    pub chosen: bool,
}

pub trait DataRecorder {
    fn record(&self, board: &Board, rec: &Record);
}

pub struct NullDataRecorder;
impl DataRecorder for NullDataRecorder {
    fn record(&self, _board: &Board, _rec: &Record) {}
}

/// Writes every record as a CSV row. Write failures are logged and otherwise ignored; losing a
/// row must not interrupt a game.
pub struct CsvDataRecorder<W: Write> {
    writer: Mutex<Writer<W>>,
}

impl<W: Write> CsvDataRecorder<W> {
    pub fn new(writer: W) -> CsvDataRecorder<W> {
        CsvDataRecorder {
            writer: Mutex::new(Writer::from_writer(writer)),
        }
    }

    /// Flushes and returns the underlying writer.
    pub fn into_inner(self) -> Option<W> {
        let writer = match self.writer.into_inner() {
            Ok(writer) => writer,
            Err(poisoned) => poisoned.into_inner(),
        };
        writer.into_inner().ok()
    }
}

impl<W: Write> DataRecorder for CsvDataRecorder<W> {
    fn record(&self, board: &Board, rec: &Record) {
        let mut copy = rec.clone();
        copy.fen = board.as_fen();
        let mut writer = match self.writer.lock() {
            Ok(writer) => writer,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Err(err) = writer.serialize(&copy) {
            warn!("failed to record search data: {}", err);
            return;
        }
        if let Err(err) = writer.flush() {
            warn!("failed to flush search data: {}", err);
        }
    }
}
