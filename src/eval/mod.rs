// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use crate::board::Board;

mod score;
mod weighted_evaluator;
mod weights;

pub use score::Score;
pub use weighted_evaluator::WeightedEvaluator;
pub use weights::{Weights, WeightsError};

/// A static evaluation function. Scores are always from white's point of view: positive values
/// favor white, `Score::Win` is a win for white.
pub trait BoardEvaluator {
    fn evaluate(&self, board: &Board) -> Score;
}
