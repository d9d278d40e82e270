// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Attack probes over a mailbox. Sliding pieces are handled by walking rays one square at a time,
//! leapers (knights and kings) by checking a fixed set of offsets. Every step goes through
//! `Square::offset`, which rejects steps that leave the board or wrap around a file edge.
use crate::mailbox::Mailbox;
use crate::types::{Color, Direction, PieceKind, Square};
use crate::types::{ALL_DIRECTIONS, DIAGONALS, KNIGHT_OFFSETS, ORTHOGONALS};

/// Walks from an origin square in one direction. The walk yields every empty square and then the
/// first occupied square it meets, if any, after which it stops. The origin itself is never yielded.
pub struct Ray<'a> {
    mailbox: &'a Mailbox,
    current: Square,
    direction: Direction,
    done: bool,
}

impl<'a> Iterator for Ray<'a> {
    type Item = Square;

    fn next(&mut self) -> Option<Square> {
        if self.done {
            return None;
        }

        match self.current.towards(self.direction) {
            Some(next) => {
                self.current = next;
                if !self.mailbox.is_empty(next) {
                    self.done = true;
                }
                Some(next)
            }
            None => {
                self.done = true;
                None
            }
        }
    }
}

pub fn ray(mailbox: &Mailbox, origin: Square, direction: Direction) -> Ray<'_> {
    Ray {
        mailbox,
        current: origin,
        direction,
        done: false,
    }
}

/// The directions a sliding piece of the given kind moves in. Non-sliding kinds have none.
pub fn slide_directions(kind: PieceKind) -> &'static [Direction] {
    match kind {
        PieceKind::Bishop => &DIAGONALS,
        PieceKind::Rook => &ORTHOGONALS,
        PieceKind::Queen => &ALL_DIRECTIONS,
        _ => &[],
    }
}

pub fn knight_targets(origin: Square) -> impl Iterator<Item = Square> {
    KNIGHT_OFFSETS
        .iter()
        .filter_map(move |&offset| origin.offset(offset))
}

pub fn king_targets(origin: Square) -> impl Iterator<Item = Square> {
    ALL_DIRECTIONS
        .iter()
        .filter_map(move |&dir| origin.towards(dir))
}

/// The two diagonals a pawn of the given color captures along.
pub fn pawn_capture_directions(color: Color) -> [Direction; 2] {
    match color {
        Color::White => [Direction::NorthWest, Direction::NorthEast],
        Color::Black => [Direction::SouthWest, Direction::SouthEast],
    }
}

pub fn pawn_targets(origin: Square, color: Color) -> impl Iterator<Item = Square> {
    let dirs = pawn_capture_directions(color);
    (0..2).filter_map(move |i| origin.towards(dirs[i]))
}

/// Returns whether any piece of color `by` attacks the target square.
pub fn is_attacked(mailbox: &Mailbox, target: Square, by: Color) -> bool {
    // Walk rays outward from the target as if it held a queen. The first piece hit on an
    // orthogonal attacks the target if it is a rook or queen; on a diagonal, a bishop or queen.
    for &dir in &ORTHOGONALS {
        if let Some(hit) = ray(mailbox, target, dir).last() {
            if mailbox.holds(hit, PieceKind::Rook, by) || mailbox.holds(hit, PieceKind::Queen, by) {
                return true;
            }
        }
    }

    for &dir in &DIAGONALS {
        if let Some(hit) = ray(mailbox, target, dir).last() {
            if mailbox.holds(hit, PieceKind::Bishop, by) || mailbox.holds(hit, PieceKind::Queen, by)
            {
                return true;
            }
        }
    }

    // Knight jumps are symmetric.
    if knight_targets(target).any(|sq| mailbox.holds(sq, PieceKind::Knight, by)) {
        return true;
    }

    // A pawn of `by` attacks the target from the squares an opposing pawn on the target would
    // capture towards.
    if pawn_targets(target, by.toggle()).any(|sq| mailbox.holds(sq, PieceKind::Pawn, by)) {
        return true;
    }

    king_targets(target).any(|sq| mailbox.holds(sq, PieceKind::King, by))
}

/// Counts how many of the squares adjacent to `center` (and the center itself) are attacked by `by`.
pub fn attacked_neighborhood(mailbox: &Mailbox, center: Square, by: Color) -> usize {
    let around = king_targets(center).filter(|&sq| is_attacked(mailbox, sq, by)).count();
    around + is_attacked(mailbox, center, by) as usize
}
