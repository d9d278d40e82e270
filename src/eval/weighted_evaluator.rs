// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use crate::attacks;
use crate::board::Board;
use crate::eval::{BoardEvaluator, Score, Weights};
use crate::game_state::GameState;
use crate::mailbox::Mailbox;
use crate::types::{Color, PieceKind, Rank, TableIndex};

const QUEEN_VALUE: f32 = 9f32;
const ROOK_VALUE: f32 = 5f32;
const BISHOP_VALUE: f32 = 3f32;
const KNIGHT_VALUE: f32 = 3f32;
const PAWN_VALUE: f32 = 1f32;

// Each term is divided by the largest difference it can plausibly reach, so that every term lands
// roughly in [-1, 1] before weighting.
const MATERIAL_REFERENCE: f32 = 39f32;
const SPACE_REFERENCE: f32 = 40f32;
const KING_SAFETY_REFERENCE: f32 = 9f32;
const PIECE_ACTIVITY_REFERENCE: f32 = 100f32;

/// Scores a position as a weighted sum of material, pawn space, king safety and piece activity.
#[derive(Clone, Debug, Default)]
pub struct WeightedEvaluator {
    weights: Weights,
}

impl WeightedEvaluator {
    pub fn new(weights: Weights) -> WeightedEvaluator {
        WeightedEvaluator { weights }
    }

    pub fn weights(&self) -> &Weights {
        &self.weights
    }
}

impl BoardEvaluator for WeightedEvaluator {
    fn evaluate(&self, board: &Board) -> Score {
        match board.state() {
            GameState::Checkmate => return Score::Loss.for_side(board.side_to_move()),
            GameState::Resignation(side) => return Score::Loss.for_side(side),
            state if state.is_draw() => return Score::Evaluated(0f32),
            _ => {}
        }

        let mailbox = board.mailbox();
        let material = evaluate_metric(|c| material(mailbox, c)) / MATERIAL_REFERENCE;
        let space = evaluate_metric(|c| space(mailbox, c)) / SPACE_REFERENCE;
        let king_safety = evaluate_metric(|c| king_safety(board, c)) / KING_SAFETY_REFERENCE;
        let activity = evaluate_metric(|c| activity(mailbox, c)) / PIECE_ACTIVITY_REFERENCE;

        Score::Evaluated(
            self.weights.material * material
                + self.weights.space * space
                + self.weights.king_safety * king_safety
                + self.weights.piece_activity * activity,
        )
    }
}

fn evaluate_metric<F>(func: F) -> f32
where
    F: Fn(Color) -> f32,
{
    let white = func(Color::White);
    let black = func(Color::Black);
    white - black
}

fn material(mailbox: &Mailbox, color: Color) -> f32 {
    let count = |kind| mailbox.count(kind, color) as f32;
    QUEEN_VALUE * count(PieceKind::Queen)
        + ROOK_VALUE * count(PieceKind::Rook)
        + BISHOP_VALUE * count(PieceKind::Bishop)
        + KNIGHT_VALUE * count(PieceKind::Knight)
        + PAWN_VALUE * count(PieceKind::Pawn)
}

/// How far this side's pawns have advanced past their starting rank, summed over all pawns.
fn space(mailbox: &Mailbox, color: Color) -> f32 {
    let start = color.pawn_rank().as_index() as i32;
    mailbox
        .squares_of(PieceKind::Pawn, color)
        .map(|sq| (sq.rank().as_index() as i32 - start).abs() as f32)
        .sum()
}

/// Safety of this side's king: the squares around it (and its own square) that the enemy does
/// not attack, with a bonus for a king still sheltering on its back rank.
fn king_safety(board: &Board, color: Color) -> f32 {
    let king = match board.king_square(color) {
        Some(sq) => sq,
        None => return 0f32,
    };

    let pressure = attacks::attacked_neighborhood(board.mailbox(), king, color.toggle()) as f32;
    let sheltered: Rank = color.back_rank();
    let shelter_bonus = if king.rank() == sheltered { 1f32 } else { 0f32 };
    shelter_bonus - pressure
}

/// Squares reachable by this side's knights, bishops, rooks and queens, ignoring pins.
fn activity(mailbox: &Mailbox, color: Color) -> f32 {
    let mut reachable = 0usize;
    for (square, piece) in mailbox.pieces_of(color) {
        match piece.kind {
            PieceKind::Knight => {
                reachable += attacks::knight_targets(square)
                    .filter(|&target| !mailbox.is_color(target, color))
                    .count();
            }
            PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen => {
                for &dir in attacks::slide_directions(piece.kind) {
                    reachable += attacks::ray(mailbox, square, dir)
                        .filter(|&target| !mailbox.is_color(target, color))
                        .count();
                }
            }
            _ => {}
        }
    }

    reachable as f32
}
