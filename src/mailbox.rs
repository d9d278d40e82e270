// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The `mailbox` module contains the piece storage of a board: a flat array of 64 cells indexed by
//! square, each holding a piece encoding. A cell is either 0 (empty) or exactly one piece-kind bit
//! combined with the color bit.
use std::fmt;

use crate::types::{squares, Color, Piece, PieceKind, Square, TableIndex};

#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct Mailbox {
    cells: [u8; 64],
}

impl Mailbox {
    pub const fn empty() -> Mailbox {
        Mailbox { cells: [0; 64] }
    }

    /// Returns the raw piece encoding stored on the given square.
    pub fn get(&self, square: Square) -> u8 {
        self.cells[square.as_index()]
    }

    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        Piece::decode(self.get(square))
    }

    pub fn is_empty(&self, square: Square) -> bool {
        self.get(square) == 0
    }

    /// Whether the given square holds a piece belonging to `color`.
    pub fn is_color(&self, square: Square, color: Color) -> bool {
        match self.piece_at(square) {
            Some(piece) => piece.color == color,
            None => false,
        }
    }

    pub fn holds(&self, square: Square, kind: PieceKind, color: Color) -> bool {
        self.get(square) == Piece::new(kind, color).encode()
    }

    pub fn put(&mut self, square: Square, piece: Piece) {
        self.cells[square.as_index()] = piece.encode();
    }

    /// Empties the given square, returning whatever was there.
    pub fn clear(&mut self, square: Square) -> Option<Piece> {
        let existing = self.piece_at(square);
        self.cells[square.as_index()] = 0;
        existing
    }

    /// Writes an optional piece to a square, clearing it for `None`.
    pub fn set(&mut self, square: Square, piece: Option<Piece>) {
        self.cells[square.as_index()] = piece.map(Piece::encode).unwrap_or(0);
    }

    /// Iterates over every occupied square in ascending square order.
    pub fn pieces<'a>(&'a self) -> impl Iterator<Item = (Square, Piece)> + 'a {
        squares().filter_map(move |sq| self.piece_at(sq).map(|piece| (sq, piece)))
    }

    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.pieces().filter(move |(_, piece)| piece.color == color)
    }

    /// Iterates over every square holding the given piece, in ascending square order.
    pub fn squares_of(&self, kind: PieceKind, color: Color) -> impl Iterator<Item = Square> + '_ {
        squares().filter(move |&sq| self.holds(sq, kind, color))
    }

    pub fn count(&self, kind: PieceKind, color: Color) -> usize {
        let encoding = Piece::new(kind, color).encode();
        self.cells.iter().filter(|&&cell| cell == encoding).count()
    }

    /// Finds the first square holding the given piece, scanning from a1.
    pub fn find(&self, kind: PieceKind, color: Color) -> Option<Square> {
        squares().find(|&sq| self.holds(sq, kind, color))
    }
}

impl Default for Mailbox {
    fn default() -> Self {
        Mailbox::empty()
    }
}

impl fmt::Debug for Mailbox {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_list().entries(self.cells.iter()).finish()
    }
}
