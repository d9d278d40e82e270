// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The `moves` module contains the definition of a Move, the unit of play exchanged between the
//! notation surface, the move generator, and the board.
//!
//! A move comes into being in one of two ways:
//!  * parsed from standard algebraic notation, in which case it records only what the notation
//!    said: the piece, the destination, the tags, and whatever disambiguation was written. Its
//!    origin square is usually unknown.
//!  * constructed by the move generator from fully-known coordinates. These moves also remember
//!    the piece they captured, so that the board can undo them.
//!
//! A parsed move is turned into a concrete one by matching it against the generator's output
//! (see `Move::describes`).
use std::error::Error;
use std::fmt::{self, Write};
use std::str::FromStr;

use crate::notation;
use crate::types::{File, Piece, PieceKind, Rank, Square};

bitflags! {
    /// Tags describing what kind of move a `Move` is. Tags are additive: a promotion may also be
    /// a capture, and any move may also give check.
    pub struct MoveFlags: u8 {
        const CAPTURE = 0b0000_0001;
        const PROMOTION = 0b0000_0010;
        const SHORT_CASTLE = 0b0000_0100;
        const LONG_CASTLE = 0b0000_1000;
        const EN_PASSANT = 0b0001_0000;
        const CHECK = 0b0010_0000;
        const CHECKMATE = 0b0100_0000;
        const CASTLE = Self::SHORT_CASTLE.bits | Self::LONG_CASTLE.bits;
        const ANNOTATIONS = Self::CHECK.bits | Self::CHECKMATE.bits;
    }
}

/// Possible errors that can arise when parsing algebraic notation into a `Move`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MoveParseError {
    Empty,
    Syntax { input: String, position: usize },
}

impl fmt::Display for MoveParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            MoveParseError::Empty => write!(f, "empty move"),
            MoveParseError::Syntax { input, position } => {
                write!(f, "invalid move {:?} (at character {})", input, position)
            }
        }
    }
}

impl Error for MoveParseError {}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Move {
    piece: PieceKind,
    source: Option<Square>,
    destination: Option<Square>,
    file_hint: Option<File>,
    rank_hint: Option<Rank>,
    flags: MoveFlags,
    promotion: Option<PieceKind>,
    captured: Option<Piece>,
}

//
// Constructors for concrete moves
//

impl Move {
    /// Constructs a new quiet move of the given piece from the source square to the destination
    /// square.
    pub fn quiet(piece: PieceKind, source: Square, dest: Square) -> Move {
        Move {
            piece,
            source: Some(source),
            destination: Some(dest),
            file_hint: None,
            rank_hint: None,
            flags: MoveFlags::empty(),
            promotion: None,
            captured: None,
        }
    }

    /// Constructs a new move of the given piece that captures `captured` on the destination square.
    pub fn capture(piece: PieceKind, source: Square, dest: Square, captured: Piece) -> Move {
        let mut mov = Move::quiet(piece, source, dest);
        mov.flags |= MoveFlags::CAPTURE;
        mov.captured = Some(captured);
        mov
    }

    /// Constructs a new en passant capture. The captured pawn does not stand on the destination
    /// square, but directly behind it from the mover's point of view.
    pub fn en_passant(source: Square, dest: Square, captured: Piece) -> Move {
        let mut mov = Move::capture(PieceKind::Pawn, source, dest, captured);
        mov.flags |= MoveFlags::EN_PASSANT;
        mov
    }

    pub fn promotion(source: Square, dest: Square, promote_to: PieceKind) -> Move {
        Move::quiet(PieceKind::Pawn, source, dest).with_promotion(promote_to)
    }

    pub fn promotion_capture(
        source: Square,
        dest: Square,
        promote_to: PieceKind,
        captured: Piece,
    ) -> Move {
        Move::capture(PieceKind::Pawn, source, dest, captured).with_promotion(promote_to)
    }

    /// Constructs a kingside castle. The source and destination are the king's squares.
    pub fn kingside_castle(source: Square, dest: Square) -> Move {
        let mut mov = Move::quiet(PieceKind::King, source, dest);
        mov.flags |= MoveFlags::SHORT_CASTLE;
        mov
    }

    /// Constructs a queenside castle. The source and destination are the king's squares.
    pub fn queenside_castle(source: Square, dest: Square) -> Move {
        let mut mov = Move::quiet(PieceKind::King, source, dest);
        mov.flags |= MoveFlags::LONG_CASTLE;
        mov
    }
}

//
// Notation-side construction
//

impl Move {
    /// Parses a move from standard algebraic notation.
    pub fn from_san(text: &str) -> Result<Move, MoveParseError> {
        notation::parse_san(text)
    }

    /// An empty move of the given piece, to be filled in by the notation parser.
    pub(crate) fn from_notation(piece: PieceKind) -> Move {
        Move {
            piece,
            source: None,
            destination: None,
            file_hint: None,
            rank_hint: None,
            flags: MoveFlags::empty(),
            promotion: None,
            captured: None,
        }
    }

    pub fn with_flags(mut self, flags: MoveFlags) -> Move {
        self.flags |= flags;
        self
    }

    pub(crate) fn with_source(mut self, source: Square) -> Move {
        self.source = Some(source);
        self
    }

    pub(crate) fn with_destination(mut self, dest: Square) -> Move {
        self.destination = Some(dest);
        self
    }

    pub(crate) fn with_hints(mut self, file: Option<File>, rank: Option<Rank>) -> Move {
        self.file_hint = file;
        self.rank_hint = rank;
        self
    }

    pub(crate) fn with_promotion(mut self, kind: PieceKind) -> Move {
        self.flags |= MoveFlags::PROMOTION;
        self.promotion = Some(kind);
        self
    }
}

//
// Accessors
//

impl Move {
    pub fn piece(&self) -> PieceKind {
        self.piece
    }

    /// The square the moving piece leaves. `None` when the move was parsed from notation that
    /// did not name a full origin square.
    pub fn source(&self) -> Option<Square> {
        self.source
    }

    /// The square the moving piece lands on. `None` only for castles parsed from notation.
    pub fn destination(&self) -> Option<Square> {
        self.destination
    }

    pub fn file_hint(&self) -> Option<File> {
        self.file_hint
    }

    pub fn rank_hint(&self) -> Option<Rank> {
        self.rank_hint
    }

    pub fn flags(&self) -> MoveFlags {
        self.flags
    }

    pub fn promotion_piece(&self) -> Option<PieceKind> {
        self.promotion
    }

    pub fn captured(&self) -> Option<Piece> {
        self.captured
    }

    pub fn is_capture(&self) -> bool {
        self.flags.contains(MoveFlags::CAPTURE)
    }

    pub fn is_promotion(&self) -> bool {
        self.flags.contains(MoveFlags::PROMOTION)
    }

    pub fn is_castle(&self) -> bool {
        self.flags.intersects(MoveFlags::CASTLE)
    }

    pub fn is_kingside_castle(&self) -> bool {
        self.flags.contains(MoveFlags::SHORT_CASTLE)
    }

    pub fn is_queenside_castle(&self) -> bool {
        self.flags.contains(MoveFlags::LONG_CASTLE)
    }

    pub fn is_en_passant(&self) -> bool {
        self.flags.contains(MoveFlags::EN_PASSANT)
    }

    pub fn is_check(&self) -> bool {
        self.flags.contains(MoveFlags::CHECK)
    }

    pub fn is_checkmate(&self) -> bool {
        self.flags.contains(MoveFlags::CHECKMATE)
    }

    /// Returns whether this (possibly partial) move describes the concrete move `concrete`.
    ///
    /// Castles match by side alone. Otherwise the piece and destination must agree, any origin
    /// information this move carries must agree with the concrete origin, and the promotion
    /// piece must be identical. A move written with a capture marker only describes captures, and
    /// a pawn move written without one never describes a capture. Check annotations are ignored.
    pub fn describes(&self, concrete: &Move) -> bool {
        if self.is_castle() || concrete.is_castle() {
            return self.flags & MoveFlags::CASTLE == concrete.flags & MoveFlags::CASTLE;
        }

        if self.piece != concrete.piece || self.destination != concrete.destination {
            return false;
        }

        if let Some(source) = self.source {
            if concrete.source != Some(source) {
                return false;
            }
        }

        let concrete_source = match concrete.source {
            Some(sq) => sq,
            None => return false,
        };

        if let Some(file) = self.file_hint {
            if concrete_source.file() != file {
                return false;
            }
        }

        if let Some(rank) = self.rank_hint {
            if concrete_source.rank() != rank {
                return false;
            }
        }

        if self.is_capture() && !concrete.is_capture() {
            return false;
        }

        if self.piece == PieceKind::Pawn && !self.is_capture() && concrete.is_capture() {
            return false;
        }

        self.promotion == concrete.promotion
    }
}

impl FromStr for Move {
    type Err = MoveParseError;

    fn from_str(s: &str) -> Result<Move, MoveParseError> {
        Move::from_san(s)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_kingside_castle() {
            f.write_str("O-O")?;
        } else if self.is_queenside_castle() {
            f.write_str("O-O-O")?;
        } else {
            if let Some(letter) = self.piece.notation_letter() {
                f.write_char(letter)?;
                match self.source {
                    Some(source) => write!(f, "{}", source)?,
                    None => {
                        if let Some(file) = self.file_hint {
                            write!(f, "{}", file)?;
                        }
                        if let Some(rank) = self.rank_hint {
                            write!(f, "{}", rank)?;
                        }
                    }
                }
            } else if self.is_capture() {
                // Pawns name their origin file, and only when capturing.
                let file = self.source.map(|sq| sq.file()).or(self.file_hint);
                if let Some(file) = file {
                    write!(f, "{}", file)?;
                }
            }

            if self.is_capture() {
                f.write_char('x')?;
            }

            if let Some(dest) = self.destination {
                write!(f, "{}", dest)?;
            }

            if let Some(promotion) = self.promotion {
                write!(f, "={}", promotion)?;
            }
        }

        if self.is_checkmate() {
            f.write_char('#')?;
        } else if self.is_check() {
            f.write_char('+')?;
        }

        Ok(())
    }
}
