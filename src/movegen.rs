// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Pseudo-legal move generation. The generator obeys piece movement and occupancy rules but does
//! not check whether a move exposes the mover's own king; `Board` filters for that.
//!
//! Every generator is written once from the perspective of the side to move. Color only enters
//! through `Color::forward` and the rank helpers on `Color`, so white and black share code paths.
use arrayvec::ArrayVec;

use crate::attacks;
use crate::board::Board;
use crate::mailbox::Mailbox;
use crate::moves::Move;
use crate::types::{CastleStatus, Color, File, Piece, PieceKind, Rank, Square};
use crate::types::{PIECE_KINDS, PROMOTION_KINDS};

pub type MoveVec = ArrayVec<[Move; 256]>;

#[derive(Copy, Clone, Debug, Default)]
pub struct MoveGenerator;

impl MoveGenerator {
    pub fn new() -> MoveGenerator {
        MoveGenerator
    }

    /// Generates every pseudo-legal move for the side to move.
    pub fn generate_moves(&self, board: &Board, moves: &mut MoveVec) {
        for &kind in PIECE_KINDS.iter() {
            self.generate_moves_for(board, kind, moves);
        }
    }

    /// Generates the pseudo-legal moves of a single piece kind for the side to move.
    pub fn generate_moves_for(&self, board: &Board, kind: PieceKind, moves: &mut MoveVec) {
        match kind {
            PieceKind::Pawn => add_pawns(board, moves),
            PieceKind::Knight => add_leapers(board, kind, moves),
            PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen => {
                add_sliding_pieces(board, kind, moves)
            }
            PieceKind::King => add_kings(board, moves),
        }
    }
}

/// Pushes a move from `source` to `dest` unless `dest` holds a friendly piece.
fn push_step(
    mailbox: &Mailbox,
    color: Color,
    kind: PieceKind,
    source: Square,
    dest: Square,
    moves: &mut MoveVec,
) {
    match mailbox.piece_at(dest) {
        None => moves.push(Move::quiet(kind, source, dest)),
        Some(target) if target.color != color => {
            moves.push(Move::capture(kind, source, dest, target))
        }
        Some(_) => {}
    }
}

/// Pushes a pawn move, expanding it into the four promotions when it lands on the far rank.
fn push_pawn_move(
    color: Color,
    source: Square,
    dest: Square,
    captured: Option<Piece>,
    moves: &mut MoveVec,
) {
    if dest.rank() == color.promotion_rank() {
        for &promote_to in PROMOTION_KINDS.iter() {
            let mov = match captured {
                Some(piece) => Move::promotion_capture(source, dest, promote_to, piece),
                None => Move::promotion(source, dest, promote_to),
            };
            moves.push(mov);
        }
        return;
    }

    let mov = match captured {
        Some(piece) => Move::capture(PieceKind::Pawn, source, dest, piece),
        None => Move::quiet(PieceKind::Pawn, source, dest),
    };
    moves.push(mov);
}

fn add_pawns(board: &Board, moves: &mut MoveVec) {
    let color = board.side_to_move();
    let mailbox = board.mailbox();
    let forward = color.forward();
    let en_passant = board.en_passant_square();

    for pawn in mailbox.squares_of(PieceKind::Pawn, color) {
        // A pawn on the last rank (only possible from a hand-written FEN) has nowhere to go.
        let target = match pawn.towards(forward) {
            Some(sq) => sq,
            None => continue,
        };

        // non-capturing moves
        if mailbox.is_empty(target) {
            push_pawn_move(color, pawn, target, None, moves);

            // double-pawn pushes, for pawns still on their starting rank
            if pawn.rank() == color.pawn_rank() {
                if let Some(two_push_target) = target.towards(forward) {
                    if mailbox.is_empty(two_push_target) {
                        moves.push(Move::quiet(PieceKind::Pawn, pawn, two_push_target));
                    }
                }
            }
        }

        for attack_sq in attacks::pawn_targets(pawn, color) {
            match mailbox.piece_at(attack_sq) {
                Some(target) if target.color != color => {
                    push_pawn_move(color, pawn, attack_sq, Some(target), moves)
                }
                Some(_) => {}
                None if en_passant == Some(attack_sq) => {
                    // The pawn being captured stands directly behind the en passant square.
                    let victim_sq = attack_sq.towards(color.toggle().forward());
                    let victim = victim_sq.and_then(|sq| mailbox.piece_at(sq));
                    if let Some(victim) = victim {
                        if victim == Piece::new(PieceKind::Pawn, color.toggle()) {
                            moves.push(Move::en_passant(pawn, attack_sq, victim));
                        }
                    }
                }
                None => {}
            }
        }
    }
}

fn add_leapers(board: &Board, kind: PieceKind, moves: &mut MoveVec) {
    let color = board.side_to_move();
    let mailbox = board.mailbox();
    for knight in mailbox.squares_of(kind, color) {
        for target in attacks::knight_targets(knight) {
            push_step(mailbox, color, kind, knight, target, moves);
        }
    }
}

fn add_sliding_pieces(board: &Board, kind: PieceKind, moves: &mut MoveVec) {
    let color = board.side_to_move();
    let mailbox = board.mailbox();
    for piece in mailbox.squares_of(kind, color) {
        for &dir in attacks::slide_directions(kind) {
            // The ray ends on its first blocker, which push_step keeps only if it is an enemy.
            for target in attacks::ray(mailbox, piece, dir) {
                push_step(mailbox, color, kind, piece, target, moves);
            }
        }
    }
}

fn add_kings(board: &Board, moves: &mut MoveVec) {
    let color = board.side_to_move();
    let enemy = color.toggle();
    let mailbox = board.mailbox();
    let king = match board.king_square(color) {
        Some(sq) => sq,
        None => return,
    };

    for target in attacks::king_targets(king) {
        if !attacks::is_attacked(mailbox, target, enemy) {
            push_step(mailbox, color, PieceKind::King, king, target, moves);
        }
    }

    let rank = color.back_rank();
    if king != Square::of(rank, File::E) || attacks::is_attacked(mailbox, king, enemy) {
        // can't castle out of check, or with a king that has left home
        return;
    }

    let rook = Piece::new(PieceKind::Rook, color);
    let castle_status = board.castle_status();
    let empty = |files: &[File]| {
        files
            .iter()
            .all(|&file| mailbox.is_empty(Square::of(rank, file)))
    };
    let safe = |files: &[File]| {
        files
            .iter()
            .all(|&file| !attacks::is_attacked(mailbox, Square::of(rank, file), enemy))
    };

    if castle_status.contains(CastleStatus::kingside(color))
        && mailbox.piece_at(Square::of(rank, File::H)) == Some(rook)
        && empty(&[File::F, File::G])
        && safe(&[File::F, File::G])
    {
        moves.push(Move::kingside_castle(king, Square::of(rank, File::G)));
    }

    // b1 must be empty for the rook to pass, but the king never crosses it.
    if castle_status.contains(CastleStatus::queenside(color))
        && mailbox.piece_at(Square::of(rank, File::A)) == Some(rook)
        && empty(&[File::B, File::C, File::D])
        && safe(&[File::C, File::D])
    {
        moves.push(Move::queenside_castle(king, Square::of(rank, File::C)));
    }
}

/// The rook squares touched by a castle of the given side, as `(from, to)`.
pub fn castle_rook_squares(color: Color, kingside: bool) -> (Square, Square) {
    let rank: Rank = color.back_rank();
    if kingside {
        (Square::of(rank, File::H), Square::of(rank, File::F))
    } else {
        (Square::of(rank, File::A), Square::of(rank, File::D))
    }
}
