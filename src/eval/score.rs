// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use std::cmp::Ordering;
use std::fmt;
use std::ops::Neg;

use crate::types::Color;

/// Score is the output of a board evaluation function. Board evaluators can return one of three
/// variants, depending on the board position. Unless stated otherwise a score is relative to
/// white.
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum Score {
    /// The game is over and won.
    Win,

    /// The game is over and lost.
    Loss,

    /// The game is undecided and the evaluator has assigned the given weighted score.
    Evaluated(f32),
}

impl Score {
    /// Re-expresses a white-relative score from the point of view of `side`.
    pub fn for_side(self, side: Color) -> Score {
        match side {
            Color::White => self,
            Color::Black => -self,
        }
    }

    pub fn is_decisive(self) -> bool {
        match self {
            Score::Evaluated(_) => false,
            _ => true,
        }
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Score::Win => write!(f, "#"),
            Score::Loss => write!(f, "#-"),
            Score::Evaluated(score) => write!(f, "{}", score),
        }
    }
}

impl Eq for Score {}

impl PartialOrd for Score {
    fn partial_cmp(&self, other: &Score) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Score {
    fn cmp(&self, other: &Score) -> Ordering {
        // A win is better than everything but another win, a loss is worse than everything but
        // another loss, and evaluated scores compare as numbers.
        match (self, other) {
            (Score::Win, Score::Win) | (Score::Loss, Score::Loss) => Ordering::Equal,
            (Score::Win, _) => Ordering::Greater,
            (_, Score::Win) => Ordering::Less,
            (Score::Loss, _) => Ordering::Less,
            (_, Score::Loss) => Ordering::Greater,
            (Score::Evaluated(self_score), Score::Evaluated(other_score)) => self_score
                .partial_cmp(other_score)
                .expect("NaN in score comparison"),
        }
    }
}

impl Neg for Score {
    type Output = Score;

    fn neg(self) -> Score {
        match self {
            Score::Win => Score::Loss,
            Score::Loss => Score::Win,
            Score::Evaluated(score) => Score::Evaluated(-score),
        }
    }
}
