// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use std::fmt;

use crate::mailbox::Mailbox;
use crate::types::{Color, PieceKind, COLORS};

/// The classification of a position, derived after every move.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum GameState {
    InProgress,
    /// The side to move is in check but has replies.
    Check,
    /// The side to move is in check and has no replies.
    Checkmate,
    /// The side to move is not in check and has no replies.
    Stalemate,
    FiftyMoveRule,
    InsufficientMaterial,
    ThreefoldRepetition,
    /// The given side has resigned.
    Resignation(Color),
}

impl GameState {
    /// Whether no further moves may be played.
    pub fn is_terminal(self) -> bool {
        match self {
            GameState::Checkmate | GameState::Stalemate | GameState::Resignation(_) => true,
            _ => false,
        }
    }

    pub fn is_draw(self) -> bool {
        match self {
            GameState::Stalemate
            | GameState::FiftyMoveRule
            | GameState::InsufficientMaterial
            | GameState::ThreefoldRepetition => true,
            _ => false,
        }
    }

    /// Whether the game has ended, either decisively or drawn.
    pub fn is_over(self) -> bool {
        self.is_terminal() || self.is_draw()
    }
}

impl Default for GameState {
    fn default() -> Self {
        GameState::InProgress
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            GameState::InProgress => write!(f, "IN PROGRESS"),
            GameState::Check => write!(f, "CHECK"),
            GameState::Checkmate => write!(f, "CHECKMATE"),
            GameState::Stalemate => write!(f, "STALEMATE"),
            GameState::FiftyMoveRule => write!(f, "FIFTY MOVE RULE"),
            GameState::InsufficientMaterial => write!(f, "INSUFFICIENT MATERIAL"),
            GameState::ThreefoldRepetition => write!(f, "THREEFOLD REPETITION"),
            GameState::Resignation(Color::White) => write!(f, "WHITE RESIGNED"),
            GameState::Resignation(Color::Black) => write!(f, "BLACK RESIGNED"),
        }
    }
}

/// Returns whether neither side has enough material left to deliver mate: no pawns, rooks or
/// queens anywhere, and at most one minor piece per side.
pub fn is_insufficient_material(mailbox: &Mailbox) -> bool {
    for &color in COLORS.iter() {
        let mut minors = 0;
        for (_, piece) in mailbox.pieces_of(color) {
            match piece.kind {
                PieceKind::King => {}
                kind if kind.is_minor() => minors += 1,
                _ => return false,
            }
        }

        if minors > 1 {
            return false;
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Piece, Square};

    fn kings() -> Mailbox {
        let mut mailbox = Mailbox::empty();
        mailbox.put(Square::E1, Piece::new(PieceKind::King, Color::White));
        mailbox.put(Square::E8, Piece::new(PieceKind::King, Color::Black));
        mailbox
    }

    #[test]
    fn bare_kings() {
        assert!(is_insufficient_material(&kings()));
    }

    #[test]
    fn one_minor_each() {
        let mut mailbox = kings();
        mailbox.put(Square::C1, Piece::new(PieceKind::Bishop, Color::White));
        mailbox.put(Square::B8, Piece::new(PieceKind::Knight, Color::Black));
        assert!(is_insufficient_material(&mailbox));

        mailbox.put(Square::G8, Piece::new(PieceKind::Knight, Color::Black));
        assert!(!is_insufficient_material(&mailbox));
    }

    #[test]
    fn any_pawn_is_sufficient() {
        let mut mailbox = kings();
        mailbox.put(Square::A2, Piece::new(PieceKind::Pawn, Color::White));
        assert!(!is_insufficient_material(&mailbox));
    }

    #[test]
    fn any_rook_or_queen_is_sufficient() {
        for &kind in &[PieceKind::Rook, PieceKind::Queen] {
            let mut mailbox = kings();
            mailbox.put(Square::D8, Piece::new(kind, Color::Black));
            assert!(!is_insufficient_material(&mailbox));
        }
    }

    #[test]
    fn terminal_states() {
        assert!(GameState::Checkmate.is_terminal());
        assert!(GameState::Resignation(Color::Black).is_terminal());
        assert!(!GameState::Check.is_terminal());
        assert!(!GameState::FiftyMoveRule.is_terminal());
        assert!(GameState::FiftyMoveRule.is_over());
        assert!(GameState::Stalemate.is_draw());
        assert!(!GameState::InProgress.is_over());
    }
}
