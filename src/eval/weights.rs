// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Evaluation weights, loaded from a plain text file of `NAME=value` lines:
//!
//! ```text
//! # heavier on material than the defaults
//! MATERIAL=1.5
//! KING_SAFETY=0.3
//! ```
//!
//! Blank lines and lines starting with `#` are skipped. Terms the file does not mention keep their
//! default weight.
use std::error::Error;
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use regex::Regex;

lazy_static! {
    static ref WEIGHT_LINE: Regex = Regex::new(r"^\s*([A-Za-z_]+)\s*=\s*(\S+)\s*$").unwrap();
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Weights {
    pub material: f32,
    pub space: f32,
    pub king_safety: f32,
    pub piece_activity: f32,
}

impl Default for Weights {
    fn default() -> Weights {
        Weights {
            material: 1.0,
            space: 0.1,
            king_safety: 0.2,
            piece_activity: 0.1,
        }
    }
}

#[derive(Debug)]
pub enum WeightsError {
    Io(io::Error),
    /// The given (1-based) line is not of the form `NAME=value`.
    MalformedLine(usize, String),
    /// The value on the given (1-based) line is not a number.
    InvalidValue(usize, String),
}

impl fmt::Display for WeightsError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            WeightsError::Io(err) => write!(f, "failed to read weights: {}", err),
            WeightsError::MalformedLine(line, text) => {
                write!(f, "line {}: expected NAME=value, found {:?}", line, text)
            }
            WeightsError::InvalidValue(line, text) => {
                write!(f, "line {}: {:?} is not a number", line, text)
            }
        }
    }
}

impl Error for WeightsError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            WeightsError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for WeightsError {
    fn from(err: io::Error) -> WeightsError {
        WeightsError::Io(err)
    }
}

impl Weights {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Weights, WeightsError> {
        let text = fs::read_to_string(path)?;
        Weights::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Weights, WeightsError> {
        let mut weights = Weights::default();
        for (idx, line) in text.lines().enumerate() {
            let line_no = idx + 1;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let captures = WEIGHT_LINE
                .captures(trimmed)
                .ok_or_else(|| WeightsError::MalformedLine(line_no, line.to_owned()))?;
            let name = &captures[1];
            let raw_value = &captures[2];
            let value = raw_value
                .parse::<f32>()
                .map_err(|_| WeightsError::InvalidValue(line_no, raw_value.to_owned()))?;
            if !value.is_finite() {
                return Err(WeightsError::InvalidValue(line_no, raw_value.to_owned()));
            }

            match name {
                "MATERIAL" => weights.material = value,
                "SPACE" => weights.space = value,
                "KING_SAFETY" => weights.king_safety = value,
                "PIECE_ACTIVITY" => weights.piece_activity = value,
                _ => warn!("ignoring unknown weight {:?} on line {}", name, line_no),
            }
        }

        debug!("loaded weights {:?}", weights);
        Ok(weights)
    }
}
