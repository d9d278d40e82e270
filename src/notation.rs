// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use std::convert::TryFrom;

use pest::error::InputLocation;
use pest::iterators::Pair;
use pest::Parser;

use crate::moves::{Move, MoveFlags, MoveParseError};
use crate::types::{File, PieceKind, Rank, Square};

#[derive(Parser)]
#[grammar = "notation.pest"]
struct NotationParser;

/// Parses a single move written in standard algebraic notation. The resulting move carries only
/// what the notation says: its origin is usually unresolved until a board matches it against the
/// moves available in a position.
pub fn parse_san(text: &str) -> Result<Move, MoveParseError> {
    if text.is_empty() {
        return Err(MoveParseError::Empty);
    }

    let mut pairs = NotationParser::parse(Rule::san, text).map_err(|err| {
        let position = match err.location {
            InputLocation::Pos(pos) => pos,
            InputLocation::Span((start, _)) => start,
        };
        MoveParseError::Syntax {
            input: text.to_owned(),
            position,
        }
    })?;

    let san = match pairs.next() {
        Some(pair) => pair,
        None => unreachable!("successful parse produced no san pair"),
    };

    for pair in san.into_inner() {
        match pair.as_rule() {
            Rule::castle => return Ok(castle(pair)),
            Rule::piece_move => return Ok(piece_move(pair)),
            Rule::pawn_move => return Ok(pawn_move(pair)),
            _ => {}
        }
    }

    unreachable!("san rule matched without a move")
}

fn castle(pair: Pair<Rule>) -> Move {
    let mut flags = MoveFlags::empty();
    for part in pair.into_inner() {
        match part.as_rule() {
            Rule::short_castle => flags |= MoveFlags::SHORT_CASTLE,
            Rule::long_castle => flags |= MoveFlags::LONG_CASTLE,
            Rule::check => flags |= MoveFlags::CHECK,
            Rule::checkmate => flags |= MoveFlags::CHECKMATE,
            _ => unreachable!(),
        }
    }

    Move::from_notation(PieceKind::King).with_flags(flags)
}

fn piece_move(pair: Pair<Rule>) -> Move {
    let mut parts = pair.into_inner();
    let letter = parts
        .next()
        .map(|piece| first_char(&piece))
        .expect("piece moves always start with a piece letter");
    let kind = PieceKind::from_notation_letter(letter).expect("grammar admits only piece letters");
    let mut mov = Move::from_notation(kind);
    for part in parts {
        match part.as_rule() {
            Rule::origin => {
                let hint = part
                    .into_inner()
                    .next()
                    .expect("origin always wraps a square, file or rank");
                mov = match hint.as_rule() {
                    Rule::square => {
                        let sq = square(&hint);
                        mov.with_source(sq).with_hints(Some(sq.file()), Some(sq.rank()))
                    }
                    Rule::file => mov.with_hints(Some(file(&hint)), None),
                    Rule::rank => mov.with_hints(None, Some(rank(&hint))),
                    _ => unreachable!(),
                };
            }
            Rule::capture => mov = mov.with_flags(MoveFlags::CAPTURE),
            Rule::square => mov = mov.with_destination(square(&part)),
            Rule::check => mov = mov.with_flags(MoveFlags::CHECK),
            Rule::checkmate => mov = mov.with_flags(MoveFlags::CHECKMATE),
            _ => unreachable!(),
        }
    }

    mov
}

fn pawn_move(pair: Pair<Rule>) -> Move {
    let mut mov = Move::from_notation(PieceKind::Pawn);
    for part in pair.into_inner() {
        match part.as_rule() {
            Rule::file => mov = mov.with_hints(Some(file(&part)), None),
            Rule::capture => mov = mov.with_flags(MoveFlags::CAPTURE),
            Rule::square => mov = mov.with_destination(square(&part)),
            Rule::promotion => {
                let letter = part
                    .into_inner()
                    .next()
                    .map(|piece| first_char(&piece))
                    .expect("promotion always names a piece");
                let kind = PieceKind::from_notation_letter(letter)
                    .expect("grammar admits only promotion letters");
                mov = mov.with_promotion(kind);
            }
            Rule::check => mov = mov.with_flags(MoveFlags::CHECK),
            Rule::checkmate => mov = mov.with_flags(MoveFlags::CHECKMATE),
            _ => unreachable!(),
        }
    }

    mov
}

fn first_char(pair: &Pair<Rule>) -> char {
    pair.as_str().chars().next().unwrap_or_default()
}

fn square(pair: &Pair<Rule>) -> Square {
    Square::parse(pair.as_str()).expect("grammar admits only valid squares")
}

fn file(pair: &Pair<Rule>) -> File {
    File::try_from(first_char(pair)).expect("grammar admits only valid files")
}

fn rank(pair: &Pair<Rule>) -> Rank {
    Rank::try_from(first_char(pair)).expect("grammar admits only valid ranks")
}
