// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use std::convert::TryFrom;
use std::error::Error;
use std::fmt::{self, Write};

use hashbrown::HashMap;

use crate::attacks;
use crate::game_state::{self, GameState};
use crate::mailbox::Mailbox;
use crate::movegen::{self, MoveGenerator, MoveVec};
use crate::moves::{Move, MoveFlags};
use crate::types::TableIndex;
use crate::types::{CastleStatus, Color, File, Piece, PieceKind, Rank, Square};
use crate::types::{FILES, RANKS};
use crate::zobrist;

pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

static BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

/// Possible errors that can arise when parsing a FEN string into a `Board`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FenParseError {
    UnexpectedChar(char),
    UnexpectedEnd,
    InvalidDigit,
    FileDoesNotSumToEight,
    UnknownPiece(char),
    TooManyRanks,
    TooManyKings(Color),
    InvalidSideToMove,
    InvalidCastle,
    InvalidEnPassant,
    InvalidHalfmove,
    InvalidFullmove,
}

impl fmt::Display for FenParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FenParseError::UnexpectedChar(c) => write!(f, "unexpected character {:?}", c),
            FenParseError::UnexpectedEnd => write!(f, "unexpected end of input"),
            FenParseError::InvalidDigit => write!(f, "invalid empty-square count"),
            FenParseError::FileDoesNotSumToEight => write!(f, "rank does not cover eight files"),
            FenParseError::UnknownPiece(c) => write!(f, "unknown piece {:?}", c),
            FenParseError::TooManyRanks => write!(f, "more than eight ranks"),
            FenParseError::TooManyKings(color) => write!(f, "more than one king for {}", color),
            FenParseError::InvalidSideToMove => write!(f, "invalid side to move"),
            FenParseError::InvalidCastle => write!(f, "invalid castling rights"),
            FenParseError::InvalidEnPassant => write!(f, "invalid en passant square"),
            FenParseError::InvalidHalfmove => write!(f, "invalid halfmove clock"),
            FenParseError::InvalidFullmove => write!(f, "invalid fullmove clock"),
        }
    }
}

impl Error for FenParseError {}

/// Reasons a well-formed move is refused by the board. Refusal is an ordinary outcome of
/// `Board::validate` and `Board::apply_move`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MoveRejection {
    /// No pseudo-legal move in this position fits the description.
    NoMatchingMove,
    /// The description fits this many pseudo-legal moves.
    Ambiguous(usize),
    LeavesKingInCheck,
    GameOver(GameState),
}

impl fmt::Display for MoveRejection {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            MoveRejection::NoMatchingMove => write!(f, "no such move in this position"),
            MoveRejection::Ambiguous(count) => {
                write!(f, "ambiguous move, {} pieces fit the description", count)
            }
            MoveRejection::LeavesKingInCheck => write!(f, "move leaves the king in check"),
            MoveRejection::GameOver(state) => write!(f, "the game is over ({})", state),
        }
    }
}

impl Error for MoveRejection {}

/// Everything needed to take a move back. Castling rights only ever shrink during play, so they
/// are snapshotted rather than recomputed.
#[derive(Clone, Debug)]
struct HistoryEntry {
    mov: Move,
    castle_status: CastleStatus,
    king_squares: [Option<Square>; 2],
    halfmove_clock: u32,
    fullmove_clock: u32,
    fen_en_passant: Option<Square>,
    state: GameState,
    zobrist_hash: u64,
}

/// A chess position together with the history of the game that led to it.
#[derive(Clone, Debug)]
pub struct Board {
    mailbox: Mailbox,
    side_to_move: Color,
    castle_status: CastleStatus,
    king_squares: [Option<Square>; 2],
    halfmove_clock: u32,
    fullmove_clock: u32,
    fen_en_passant: Option<Square>,
    history: Vec<HistoryEntry>,
    state: GameState,
    zobrist_hash: u64,
    position_counts: HashMap<u64, u32>,
}

//
// Construction
//

impl Board {
    /// A board in the standard starting position.
    pub fn new() -> Board {
        let mut board = Board::empty();
        for (&file, &kind) in FILES.iter().zip(BACK_RANK.iter()) {
            for &color in &[Color::White, Color::Black] {
                board.mailbox.put(
                    Square::of(color.back_rank(), file),
                    Piece::new(kind, color),
                );
                board.mailbox.put(
                    Square::of(color.pawn_rank(), file),
                    Piece::new(PieceKind::Pawn, color),
                );
            }
        }

        board.king_squares = [Some(Square::E1), Some(Square::E8)];
        board.castle_status = CastleStatus::all();
        board.finish_setup();
        board
    }

    /// A board with no pieces, white to move, and no castling rights.
    pub fn empty() -> Board {
        Board {
            mailbox: Mailbox::empty(),
            side_to_move: Color::White,
            castle_status: CastleStatus::NONE,
            king_squares: [None, None],
            halfmove_clock: 0,
            fullmove_clock: 1,
            fen_en_passant: None,
            history: Vec::new(),
            state: GameState::InProgress,
            zobrist_hash: 0,
            position_counts: HashMap::new(),
        }
    }

    /// Parses a position from FEN. Only the piece placement is required; the side to move,
    /// castling rights, en passant square and the two clocks may each be left off the end. Missing
    /// castling rights are inferred from which kings and rooks still stand on their home squares.
    pub fn from_fen<S: AsRef<str>>(fen: S) -> Result<Board, FenParseError> {
        use std::iter::Peekable;
        use std::str::Chars;

        type Stream<'a> = Peekable<Chars<'a>>;

        fn advance<'a>(iter: &mut Stream<'a>) -> Result<(), FenParseError> {
            let _ = iter.next();
            Ok(())
        }

        fn peek<'a>(iter: &mut Stream<'a>) -> Result<char, FenParseError> {
            if let Some(c) = iter.peek() {
                Ok(*c)
            } else {
                Err(FenParseError::UnexpectedEnd)
            }
        }

        fn eat_rank_separator<'a>(iter: &mut Stream<'a>) -> Result<(), FenParseError> {
            match iter.next() {
                Some('/') => Ok(()),
                Some(c) if c.is_digit(10) || Piece::try_from(c).is_ok() => {
                    Err(FenParseError::FileDoesNotSumToEight)
                }
                Some(c) => Err(FenParseError::UnexpectedChar(c)),
                None => Err(FenParseError::UnexpectedEnd),
            }
        }

        fn eat_placement(board: &mut Board, placement: &str) -> Result<(), FenParseError> {
            let iter = &mut placement.chars().peekable();
            for &rank in RANKS.iter().rev() {
                let mut file = File::A as usize;
                while file <= File::H as usize {
                    let c = peek(iter)?;
                    if c == '/' {
                        return Err(FenParseError::FileDoesNotSumToEight);
                    }

                    // digits 1 through 8 indicate empty squares.
                    if c.is_digit(10) {
                        if c < '1' || c > '8' {
                            return Err(FenParseError::InvalidDigit);
                        }

                        file += c as usize - '0' as usize;
                        if file > 8 {
                            return Err(FenParseError::FileDoesNotSumToEight);
                        }

                        advance(iter)?;
                        continue;
                    }

                    // if it's not a digit, it represents a piece.
                    let piece = Piece::try_from(c).map_err(|_| FenParseError::UnknownPiece(c))?;
                    let square = Square::of(rank, File::from_index(file));
                    if piece.kind == PieceKind::King {
                        if board.king_squares[piece.color.as_index()].is_some() {
                            return Err(FenParseError::TooManyKings(piece.color));
                        }
                        board.king_squares[piece.color.as_index()] = Some(square);
                    }

                    board.mailbox.put(square, piece);
                    advance(iter)?;
                    file += 1;
                }

                if rank != Rank::One {
                    eat_rank_separator(iter)?;
                }
            }

            match iter.next() {
                None => Ok(()),
                Some('/') => Err(FenParseError::TooManyRanks),
                Some(_) => Err(FenParseError::FileDoesNotSumToEight),
            }
        }

        fn eat_side_to_move(field: &str) -> Result<Color, FenParseError> {
            match field {
                "w" => Ok(Color::White),
                "b" => Ok(Color::Black),
                _ => Err(FenParseError::InvalidSideToMove),
            }
        }

        fn eat_castle_status(field: &str) -> Result<CastleStatus, FenParseError> {
            if field == "-" {
                return Ok(CastleStatus::NONE);
            }

            let mut status = CastleStatus::NONE;
            for c in field.chars() {
                let right = match c {
                    'K' => CastleStatus::WHITE_KINGSIDE,
                    'Q' => CastleStatus::WHITE_QUEENSIDE,
                    'k' => CastleStatus::BLACK_KINGSIDE,
                    'q' => CastleStatus::BLACK_QUEENSIDE,
                    _ => return Err(FenParseError::InvalidCastle),
                };

                status |= right;
            }

            Ok(status)
        }

        fn eat_en_passant(field: &str, side: Color) -> Result<Option<Square>, FenParseError> {
            if field == "-" {
                return Ok(None);
            }

            // The en passant square is the one the last double push skipped over, so it sits on
            // the third rank from the mover's point of view.
            let expected_rank = match side {
                Color::White => Rank::Six,
                Color::Black => Rank::Three,
            };

            match Square::parse(field) {
                Some(sq) if sq.rank() == expected_rank => Ok(Some(sq)),
                _ => Err(FenParseError::InvalidEnPassant),
            }
        }

        let mut board = Board::empty();
        let mut fields = fen.as_ref().split_whitespace();
        let placement = fields.next().ok_or(FenParseError::UnexpectedEnd)?;
        eat_placement(&mut board, placement)?;

        let mut castle_status = CastleStatus::all();
        if let Some(field) = fields.next() {
            board.side_to_move = eat_side_to_move(field)?;
        }
        if let Some(field) = fields.next() {
            castle_status = eat_castle_status(field)?;
        }
        if let Some(field) = fields.next() {
            board.fen_en_passant = eat_en_passant(field, board.side_to_move)?;
        }
        if let Some(field) = fields.next() {
            board.halfmove_clock = field
                .parse::<u32>()
                .map_err(|_| FenParseError::InvalidHalfmove)?;
        }
        if let Some(field) = fields.next() {
            board.fullmove_clock = field
                .parse::<u32>()
                .map_err(|_| FenParseError::InvalidFullmove)?;
        }
        if let Some(extra) = fields.next() {
            let c = extra.chars().next().unwrap_or(' ');
            return Err(FenParseError::UnexpectedChar(c));
        }

        board.castle_status = castle_status & board.castle_rights_from_placement();
        board.finish_setup();
        Ok(board)
    }

    /// The castling rights compatible with the pieces on the board: a right survives only while
    /// its king and rook stand on their home squares.
    fn castle_rights_from_placement(&self) -> CastleStatus {
        let mut status = CastleStatus::NONE;
        for &color in &[Color::White, Color::Black] {
            let rank = color.back_rank();
            if !self
                .mailbox
                .holds(Square::of(rank, File::E), PieceKind::King, color)
            {
                continue;
            }

            if self
                .mailbox
                .holds(Square::of(rank, File::H), PieceKind::Rook, color)
            {
                status |= CastleStatus::kingside(color);
            }

            if self
                .mailbox
                .holds(Square::of(rank, File::A), PieceKind::Rook, color)
            {
                status |= CastleStatus::queenside(color);
            }
        }

        status
    }

    fn finish_setup(&mut self) {
        self.history.clear();
        self.zobrist_hash = zobrist::hash(self);
        self.position_counts.clear();
        self.position_counts.insert(self.zobrist_hash, 1);
        self.state = self.compute_state();
    }
}

impl Default for Board {
    fn default() -> Self {
        Board::new()
    }
}

//
// Board state getters
//

impl Board {
    pub fn mailbox(&self) -> &Mailbox {
        &self.mailbox
    }

    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.mailbox.piece_at(square)
    }

    /// The raw piece encoding on a square: 0 when empty, otherwise a piece-kind bit combined with
    /// the color bit.
    pub fn get(&self, square: Square) -> u8 {
        self.mailbox.get(square)
    }

    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    pub fn is_white_turn(&self) -> bool {
        self.side_to_move == Color::White
    }

    pub fn castle_status(&self) -> CastleStatus {
        self.castle_status
    }

    pub fn can_castle_kingside(&self, color: Color) -> bool {
        self.castle_status.contains(CastleStatus::kingside(color))
    }

    pub fn can_castle_queenside(&self, color: Color) -> bool {
        self.castle_status.contains(CastleStatus::queenside(color))
    }

    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.king_squares[color.as_index()]
    }

    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    pub fn fullmove_clock(&self) -> u32 {
        self.fullmove_clock
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn zobrist_hash(&self) -> u64 {
        self.zobrist_hash
    }

    /// How many times the current position has occurred in this game, counting the current one.
    pub fn repetitions(&self) -> u32 {
        self.position_counts
            .get(&self.zobrist_hash)
            .cloned()
            .unwrap_or(0)
    }

    /// The moves played so far, oldest first.
    pub fn history(&self) -> impl Iterator<Item = &Move> + '_ {
        self.history.iter().map(|entry| &entry.mov)
    }

    pub fn last_move(&self) -> Option<Move> {
        self.history.last().map(|entry| entry.mov)
    }

    /// The square a pawn may capture onto en passant, if any. Only the immediately preceding move
    /// matters; before any move has been played the FEN en passant field is used instead.
    pub fn en_passant_square(&self) -> Option<Square> {
        let entry = match self.history.last() {
            Some(entry) => entry,
            None => return self.fen_en_passant,
        };

        let mov = entry.mov;
        if mov.piece() != PieceKind::Pawn {
            return None;
        }

        let (source, dest) = match (mov.source(), mov.destination()) {
            (Some(source), Some(dest)) => (source, dest),
            _ => return None,
        };

        if (source.rank() as i32 - dest.rank() as i32).abs() != 2 {
            return None;
        }

        let mover = self.side_to_move.toggle();
        source.towards(mover.forward())
    }

    /// The en passant square, but only when a pawn of the side to move stands ready to capture
    /// onto it. Positions that differ only in an unusable en passant square are the same position.
    pub fn capturable_en_passant_square(&self) -> Option<Square> {
        let ep_square = self.en_passant_square()?;
        if !self.mailbox.is_empty(ep_square) {
            return None;
        }

        let side = self.side_to_move;
        let mover = side.toggle();
        let victim = ep_square.towards(mover.forward())?;
        if !self.mailbox.holds(victim, PieceKind::Pawn, mover) {
            return None;
        }

        let has_capturer = attacks::pawn_targets(ep_square, mover)
            .any(|sq| self.mailbox.holds(sq, PieceKind::Pawn, side));
        if has_capturer {
            Some(ep_square)
        } else {
            None
        }
    }

    /// Whether the given side's king is attacked. A side without a king is never in check.
    pub fn is_check(&self, color: Color) -> bool {
        match self.king_square(color) {
            Some(king) => attacks::is_attacked(&self.mailbox, king, color.toggle()),
            None => false,
        }
    }

    pub fn as_fen(&self) -> String {
        let mut buf = String::new();
        for &rank in RANKS.iter().rev() {
            let mut empty_squares = 0;
            for &file in &FILES {
                let square = Square::of(rank, file);
                if let Some(piece) = self.piece_at(square) {
                    if empty_squares != 0 {
                        write!(&mut buf, "{}", empty_squares).unwrap();
                    }
                    write!(&mut buf, "{}", piece).unwrap();
                    empty_squares = 0;
                } else {
                    empty_squares += 1;
                }
            }

            if empty_squares != 0 {
                write!(&mut buf, "{}", empty_squares).unwrap();
            }

            if rank != Rank::One {
                buf.push('/');
            }
        }

        write!(&mut buf, " {} ", self.side_to_move).unwrap();
        if self.castle_status.is_empty() {
            buf.push('-');
        }
        if self.can_castle_kingside(Color::White) {
            buf.push('K');
        }
        if self.can_castle_queenside(Color::White) {
            buf.push('Q');
        }
        if self.can_castle_kingside(Color::Black) {
            buf.push('k');
        }
        if self.can_castle_queenside(Color::Black) {
            buf.push('q');
        }
        buf.push(' ');
        if let Some(ep_square) = self.en_passant_square() {
            write!(&mut buf, "{}", ep_square).unwrap();
        } else {
            buf.push('-');
        }
        write!(
            &mut buf,
            " {} {}",
            self.halfmove_clock(),
            self.fullmove_clock()
        )
        .unwrap();
        buf
    }
}

//
// Move generation and legality
//

impl Board {
    /// Every pseudo-legal move for the side to move.
    pub fn pseudo_legal_moves(&self) -> MoveVec {
        let mut moves = MoveVec::new();
        MoveGenerator::new().generate_moves(self, &mut moves);
        moves
    }

    /// Every legal move for the side to move.
    pub fn legal_moves(&self) -> MoveVec {
        let mut moves = self.pseudo_legal_moves();
        moves.retain(|mov| self.is_legal_given_pseudolegal(mov));
        moves
    }

    /// The legal moves of a single piece kind for the side to move.
    pub fn legal_moves_for(&self, kind: PieceKind) -> MoveVec {
        let mut moves = MoveVec::new();
        MoveGenerator::new().generate_moves_for(self, kind, &mut moves);
        moves.retain(|mov| self.is_legal_given_pseudolegal(mov));
        moves
    }

    /// Returns whether a pseudo-legal move leaves the mover's own king safe. The move is played on
    /// a scratch copy of the mailbox; the live board is never touched.
    pub fn is_legal_given_pseudolegal(&self, mov: &Move) -> bool {
        let color = self.side_to_move;
        let mut scratch = self.mailbox;
        place_pieces(&mut scratch, mov, color);
        let king = if mov.piece() == PieceKind::King {
            mov.destination()
        } else {
            self.king_square(color)
        };

        match king {
            Some(king) => !attacks::is_attacked(&scratch, king, color.toggle()),
            None => true,
        }
    }

    /// Resolves a (possibly partial) move against this position. The move's piece kind is
    /// generated, the candidates it describes are collected, and the single match, if there is
    /// exactly one, is checked for king safety. The returned move is fully concrete.
    pub fn validate(&self, candidate: &Move) -> Result<Move, MoveRejection> {
        if self.state.is_terminal() {
            return Err(MoveRejection::GameOver(self.state));
        }

        let mut moves = MoveVec::new();
        MoveGenerator::new().generate_moves_for(self, candidate.piece(), &mut moves);
        let mut matches = moves.iter().filter(|mov| candidate.describes(mov));
        let concrete = match matches.next() {
            Some(mov) => *mov,
            None => {
                debug!("rejecting {}: no matching move", candidate);
                return Err(MoveRejection::NoMatchingMove);
            }
        };

        let others = matches.count();
        if others > 0 {
            debug!("rejecting {}: {} candidates", candidate, others + 1);
            return Err(MoveRejection::Ambiguous(others + 1));
        }

        if !self.is_legal_given_pseudolegal(&concrete) {
            debug!("rejecting {}: leaves king in check", candidate);
            return Err(MoveRejection::LeavesKingInCheck);
        }

        Ok(concrete)
    }

    fn compute_state(&self) -> GameState {
        let color = self.side_to_move;
        let in_check = self.is_check(color);
        if self.legal_moves().is_empty() {
            return if in_check {
                GameState::Checkmate
            } else {
                GameState::Stalemate
            };
        }

        if self.halfmove_clock >= 100 {
            return GameState::FiftyMoveRule;
        }

        if game_state::is_insufficient_material(&self.mailbox) {
            return GameState::InsufficientMaterial;
        }

        if self.repetitions() >= 3 {
            return GameState::ThreefoldRepetition;
        }

        if in_check {
            GameState::Check
        } else {
            GameState::InProgress
        }
    }
}

//
// Move application and board manipulation
//

impl Board {
    /// Validates and plays a move. On success the played move is returned fully resolved and
    /// tagged with `CHECK` or `CHECKMATE` when it gives one. On failure the board is unchanged.
    pub fn apply_move(&mut self, candidate: &Move) -> Result<Move, MoveRejection> {
        let concrete = self.validate(candidate)?;
        let mover = self.side_to_move;
        self.make_move(concrete);
        self.state = self.compute_state();

        let tags = if self.state == GameState::Checkmate {
            MoveFlags::CHECKMATE
        } else if self.is_check(self.side_to_move) {
            MoveFlags::CHECK
        } else {
            MoveFlags::empty()
        };

        let played = concrete.with_flags(tags);
        if let Some(entry) = self.history.last_mut() {
            entry.mov = played;
        }

        debug!("{} played {}", mover, played);
        if self.state != GameState::InProgress {
            info!("game state is now {}", self.state);
        }

        Ok(played)
    }

    /// Plays a concrete move without validating it and without recomputing the game state. The
    /// move must have come from this position's move generator.
    pub(crate) fn make_move(&mut self, mov: Move) {
        let color = self.side_to_move;
        let source = mov.source().expect("invalid move: no source square");
        let dest = mov.destination().expect("invalid move: no destination square");
        self.history.push(HistoryEntry {
            mov,
            castle_status: self.castle_status,
            king_squares: self.king_squares,
            halfmove_clock: self.halfmove_clock,
            fullmove_clock: self.fullmove_clock,
            fen_en_passant: self.fen_en_passant,
            state: self.state,
            zobrist_hash: self.zobrist_hash,
        });

        place_pieces(&mut self.mailbox, &mov, color);
        if mov.piece() == PieceKind::King {
            self.king_squares[color.as_index()] = Some(dest);
            self.castle_status.remove(CastleStatus::both(color));
        }

        // A piece leaving a rook's home square, or a capture landing on one, ends that right.
        self.castle_status.remove(castle_mask(source));
        self.castle_status.remove(castle_mask(dest));

        if mov.is_capture() || mov.piece() == PieceKind::Pawn {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock = self.halfmove_clock.saturating_add(1);
        }

        if color == Color::Black {
            self.fullmove_clock = self.fullmove_clock.saturating_add(1);
        }

        self.side_to_move = color.toggle();
        self.zobrist_hash = zobrist::hash(self);
        *self.position_counts.entry(self.zobrist_hash).or_insert(0) += 1;
    }

    /// Takes back the most recent move, restoring the position exactly as it was before it. Returns
    /// the move taken back, or `None` if no move has been played.
    pub fn undo_move(&mut self) -> Option<Move> {
        let entry = self.history.pop()?;
        if let Some(count) = self.position_counts.get_mut(&self.zobrist_hash) {
            *count -= 1;
            if *count == 0 {
                self.position_counts.remove(&self.zobrist_hash);
            }
        }

        let color = self.side_to_move.toggle();
        lift_pieces(&mut self.mailbox, &entry.mov, color);
        self.side_to_move = color;
        self.castle_status = entry.castle_status;
        self.king_squares = entry.king_squares;
        self.halfmove_clock = entry.halfmove_clock;
        self.fullmove_clock = entry.fullmove_clock;
        self.fen_en_passant = entry.fen_en_passant;
        self.state = entry.state;
        self.zobrist_hash = entry.zobrist_hash;
        Some(entry.mov)
    }

    /// The side to move resigns. Refused if the game has already ended.
    pub fn resign(&mut self) -> Result<(), MoveRejection> {
        if self.state.is_terminal() {
            return Err(MoveRejection::GameOver(self.state));
        }

        self.state = GameState::Resignation(self.side_to_move);
        info!("{} resigns", self.side_to_move);
        Ok(())
    }

    /// Renders a legal move of this position in minimal standard algebraic notation: origin
    /// information is written only when another piece of the same kind could also reach the
    /// destination, and a trailing `+` or `#` marks check and mate.
    pub fn san(&self, mov: &Move) -> String {
        let mut buf = String::new();
        let (source, dest) = match (mov.source(), mov.destination()) {
            (Some(source), Some(dest)) => (source, dest),
            _ => return mov.to_string(),
        };

        if mov.is_kingside_castle() {
            buf.push_str("O-O");
        } else if mov.is_queenside_castle() {
            buf.push_str("O-O-O");
        } else {
            match mov.piece().notation_letter() {
                Some(letter) => {
                    buf.push(letter);
                    let mut rivals = MoveVec::new();
                    MoveGenerator::new().generate_moves_for(self, mov.piece(), &mut rivals);
                    let rivals: Vec<Square> = rivals
                        .iter()
                        .filter(|other| other.destination() == Some(dest))
                        .filter_map(|other| other.source())
                        .filter(|&other| other != source)
                        .collect();

                    if !rivals.is_empty() {
                        if rivals.iter().all(|sq| sq.file() != source.file()) {
                            write!(&mut buf, "{}", source.file()).unwrap();
                        } else if rivals.iter().all(|sq| sq.rank() != source.rank()) {
                            write!(&mut buf, "{}", source.rank()).unwrap();
                        } else {
                            write!(&mut buf, "{}", source).unwrap();
                        }
                    }
                }
                None if mov.is_capture() => write!(&mut buf, "{}", source.file()).unwrap(),
                None => {}
            }

            if mov.is_capture() {
                buf.push('x');
            }

            write!(&mut buf, "{}", dest).unwrap();
            if let Some(promotion) = mov.promotion_piece() {
                write!(&mut buf, "={}", promotion).unwrap();
            }
        }

        let mut scratch = self.clone();
        scratch.make_move(*mov);
        if scratch.is_check(scratch.side_to_move) {
            if scratch.legal_moves().is_empty() {
                buf.push('#');
            } else {
                buf.push('+');
            }
        }

        buf
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let side = match self.side_to_move {
            Color::White => "White",
            Color::Black => "Black",
        };
        writeln!(f, "{} turn", side)?;
        writeln!(f, "GAME STATE: {}", self.state)?;
        writeln!(f)?;
        for &rank in RANKS.iter().rev() {
            write!(f, " {} |", rank)?;
            for &file in &FILES {
                let sq = Square::of(rank, file);
                if let Some(piece) = self.piece_at(sq) {
                    write!(f, " {} ", piece)?;
                } else {
                    write!(f, " . ")?;
                }
            }

            writeln!(f)?;
        }

        write!(f, "   +")?;
        for _ in &FILES {
            write!(f, "---")?;
        }

        writeln!(f)?;
        write!(f, "    ")?;
        for &file in &FILES {
            write!(f, " {} ", file)?;
        }

        writeln!(f)
    }
}

//
// Helper functions
//

/// The castling right tied to a rook home square, or no right for any other square.
fn castle_mask(square: Square) -> CastleStatus {
    match square {
        Square::A1 => CastleStatus::WHITE_QUEENSIDE,
        Square::H1 => CastleStatus::WHITE_KINGSIDE,
        Square::A8 => CastleStatus::BLACK_QUEENSIDE,
        Square::H8 => CastleStatus::BLACK_KINGSIDE,
        _ => CastleStatus::NONE,
    }
}

/// The square holding the pawn taken by an en passant capture landing on `dest`.
fn en_passant_victim(dest: Square, mover: Color) -> Square {
    dest.towards(mover.toggle().forward())
        .expect("invalid move: en passant capture on the edge of the board")
}

/// Moves the pieces of a concrete move on a mailbox.
fn place_pieces(mailbox: &mut Mailbox, mov: &Move, color: Color) {
    let source = mov.source().expect("invalid move: no source square");
    let dest = mov.destination().expect("invalid move: no destination square");

    if mov.is_castle() {
        let (rook_from, rook_to) = movegen::castle_rook_squares(color, mov.is_kingside_castle());
        mailbox.clear(source);
        mailbox.clear(rook_from);
        mailbox.put(dest, Piece::new(PieceKind::King, color));
        mailbox.put(rook_to, Piece::new(PieceKind::Rook, color));
        return;
    }

    mailbox.clear(source);
    if mov.is_en_passant() {
        mailbox.clear(en_passant_victim(dest, color));
    }

    let kind = mov.promotion_piece().unwrap_or_else(|| mov.piece());
    mailbox.put(dest, Piece::new(kind, color));
}

/// Reverses `place_pieces`.
fn lift_pieces(mailbox: &mut Mailbox, mov: &Move, color: Color) {
    let source = mov.source().expect("invalid move: no source square");
    let dest = mov.destination().expect("invalid move: no destination square");

    if mov.is_castle() {
        let (rook_from, rook_to) = movegen::castle_rook_squares(color, mov.is_kingside_castle());
        mailbox.clear(dest);
        mailbox.clear(rook_to);
        mailbox.put(source, Piece::new(PieceKind::King, color));
        mailbox.put(rook_from, Piece::new(PieceKind::Rook, color));
        return;
    }

    mailbox.put(source, Piece::new(mov.piece(), color));
    if mov.is_en_passant() {
        mailbox.clear(dest);
        mailbox.set(en_passant_victim(dest, color), mov.captured());
    } else {
        mailbox.set(dest, mov.captured());
    }
}

#[cfg(test)]
mod tests {
    use super::{Board, MoveRejection};
    use crate::game_state::GameState;
    use crate::moves::Move;
    use crate::types::{CastleStatus, Color, PieceKind, Square};

    fn play(board: &mut Board, moves: &[&str]) {
        for text in moves {
            let mov = Move::from_san(text).unwrap();
            board.apply_move(&mov).unwrap();
        }
    }

    #[test]
    fn start_position_has_twenty_moves() {
        let board = Board::new();
        assert_eq!(20, board.legal_moves().len());
        assert_eq!(GameState::InProgress, board.state());
        assert_eq!(Some(Square::E1), board.king_square(Color::White));
        assert_eq!(Some(Square::E8), board.king_square(Color::Black));
    }

    #[test]
    fn check_smoke() {
        let board =
            Board::from_fen("r2q1rk1/pP1p2pp/Q4n2/bbp1p3/Np6/1B3NBn/pPPP1PPP/R3K2R b KQ - 0 1")
                .unwrap();
        assert!(board.is_check(Color::Black));
        assert_eq!(GameState::Check, board.state());
    }

    #[test]
    fn pinned_piece_cannot_move() {
        let board = Board::from_fen("8/8/3q4/8/8/3B4/3K4/8 w - - 0 1").unwrap();
        let bishop_moves = board.legal_moves_for(PieceKind::Bishop);
        assert!(bishop_moves.is_empty());

        let mov = Move::from_san("Be4").unwrap();
        assert_eq!(Err(MoveRejection::LeavesKingInCheck), board.validate(&mov));
    }

    #[test]
    fn unpinned_piece_may_block() {
        let board = Board::from_fen("8/8/8/q7/8/2B5/3K4/8 w - - 0 1").unwrap();
        let mov = Move::from_san("Bb4").unwrap();
        assert!(board.validate(&mov).is_ok());
    }

    #[test]
    fn ambiguous_knight_move() {
        let board = Board::from_fen("4k3/8/8/8/8/8/8/1N2KN2 w - - 0 1").unwrap();
        let mov = Move::from_san("Nd2").unwrap();
        assert_eq!(Err(MoveRejection::Ambiguous(2)), board.validate(&mov));

        let mov = Move::from_san("Nbd2").unwrap();
        let resolved = board.validate(&mov).unwrap();
        assert_eq!(Some(Square::B1), resolved.source());
    }

    #[test]
    fn rook_disambiguated_by_rank() {
        let board = Board::from_fen("R3k3/8/8/8/8/8/8/R3K3 w - - 0 1").unwrap();
        let mov = Move::from_san("Ra4").unwrap();
        assert_eq!(Err(MoveRejection::Ambiguous(2)), board.validate(&mov));
        let resolved = board.validate(&Move::from_san("R1a4").unwrap()).unwrap();
        assert_eq!(Some(Square::A1), resolved.source());
    }

    #[test]
    fn no_matching_move() {
        let board = Board::new();
        let mov = Move::from_san("e5").unwrap();
        assert_eq!(Err(MoveRejection::NoMatchingMove), board.validate(&mov));
        let mov = Move::from_san("Nd2").unwrap();
        assert_eq!(Err(MoveRejection::NoMatchingMove), board.validate(&mov));
    }

    #[test]
    fn apply_and_undo() {
        let mut board = Board::new();
        let before = board.clone();
        let played = board.apply_move(&Move::from_san("e4").unwrap()).unwrap();
        assert_eq!(Some(Square::E2), played.source());
        assert_eq!(Color::Black, board.side_to_move());
        assert_eq!(Some(Square::E3), board.en_passant_square());
        assert_eq!(
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1",
            board.as_fen()
        );

        assert_eq!(Some(played), board.undo_move());
        assert_eq!(before.mailbox(), board.mailbox());
        assert_eq!(before.as_fen(), board.as_fen());
        assert_eq!(before.zobrist_hash(), board.zobrist_hash());
        assert_eq!(None, board.undo_move());
    }

    #[test]
    fn en_passant_capture_and_undo() {
        let mut board = Board::new();
        play(&mut board, &["e4", "a6", "e5", "d5"]);
        let before = board.clone();
        let played = board.apply_move(&Move::from_san("exd6").unwrap()).unwrap();
        assert!(played.is_en_passant());
        assert_eq!(None, board.piece_at(Square::D5));
        assert_eq!(PieceKind::Pawn, board.piece_at(Square::D6).unwrap().kind);

        board.undo_move();
        assert_eq!(before.mailbox(), board.mailbox());
        assert_eq!(before.as_fen(), board.as_fen());
    }

    #[test]
    fn en_passant_only_immediately() {
        let mut board = Board::new();
        play(&mut board, &["e4", "a6", "e5", "d5", "a3", "a5"]);
        let mov = Move::from_san("exd6").unwrap();
        assert_eq!(Err(MoveRejection::NoMatchingMove), board.validate(&mov));
    }

    #[test]
    fn castling_moves_both_pieces() {
        let mut board = Board::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        let before = board.clone();
        board.apply_move(&Move::from_san("O-O").unwrap()).unwrap();
        assert_eq!(None, board.piece_at(Square::E1));
        assert_eq!(None, board.piece_at(Square::H1));
        assert_eq!(PieceKind::King, board.piece_at(Square::G1).unwrap().kind);
        assert_eq!(PieceKind::Rook, board.piece_at(Square::F1).unwrap().kind);
        assert_eq!(Some(Square::G1), board.king_square(Color::White));
        assert!(!board.castle_status().intersects(CastleStatus::WHITE));

        board.apply_move(&Move::from_san("O-O-O").unwrap()).unwrap();
        assert_eq!(PieceKind::King, board.piece_at(Square::C8).unwrap().kind);
        assert_eq!(PieceKind::Rook, board.piece_at(Square::D8).unwrap().kind);
        assert_eq!(None, board.piece_at(Square::A8));
        assert_eq!(CastleStatus::NONE, board.castle_status());

        board.undo_move();
        board.undo_move();
        assert_eq!(before.mailbox(), board.mailbox());
        assert_eq!(before.castle_status(), board.castle_status());
        assert_eq!(Some(Square::E1), board.king_square(Color::White));
    }

    #[test]
    fn rook_moves_clear_one_right() {
        let mut board = Board::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        play(&mut board, &["Rh2"]);
        assert!(!board.can_castle_kingside(Color::White));
        assert!(board.can_castle_queenside(Color::White));

        // Capturing a rook on its home square also clears the right.
        play(&mut board, &["Rxa1+"]);
        assert!(!board.can_castle_queenside(Color::White));
        assert!(!board.can_castle_queenside(Color::Black));
    }

    #[test]
    fn promotion_and_undo() {
        let mut board = Board::from_fen("1r2k3/P7/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        let before = board.clone();
        let played = board.apply_move(&Move::from_san("axb8=N").unwrap()).unwrap();
        assert_eq!(Some(PieceKind::Knight), played.promotion_piece());
        assert_eq!(PieceKind::Knight, board.piece_at(Square::B8).unwrap().kind);
        assert_eq!(None, board.piece_at(Square::A7));

        board.undo_move();
        assert_eq!(before.mailbox(), board.mailbox());

        let mov = Move::from_san("a8").unwrap();
        assert_eq!(Err(MoveRejection::NoMatchingMove), board.validate(&mov));
    }

    #[test]
    fn fools_mate() {
        let mut board = Board::new();
        play(&mut board, &["f3", "e5", "g4"]);
        let played = board.apply_move(&Move::from_san("Qh4").unwrap()).unwrap();
        assert!(played.is_checkmate());
        assert_eq!("Qd8h4#", played.to_string());
        assert_eq!(GameState::Checkmate, board.state());
        assert!(board.legal_moves().is_empty());

        let mov = Move::from_san("a3").unwrap();
        assert_eq!(
            Err(MoveRejection::GameOver(GameState::Checkmate)),
            board.apply_move(&mov)
        );

        board.undo_move();
        assert_eq!(GameState::InProgress, board.state());
    }

    #[test]
    fn stalemate() {
        let mut board = Board::from_fen("7k/8/5Q2/8/8/8/8/K7 w - - 0 1").unwrap();
        play(&mut board, &["Qf7"]);
        assert_eq!(GameState::Stalemate, board.state());
    }

    #[test]
    fn fifty_move_rule() {
        let mut board = Board::from_fen("4k3/8/8/8/8/8/R7/4K3 w - - 99 80").unwrap();
        play(&mut board, &["Ra3"]);
        assert_eq!(100, board.halfmove_clock());
        assert_eq!(GameState::FiftyMoveRule, board.state());
    }

    #[test]
    fn clocks_stop_at_their_limit() {
        let max = u32::max_value();
        let fen = format!("4k3/8/8/8/8/8/8/4K2R b - - {} {}", max, max);
        let mut board = Board::from_fen(fen).unwrap();
        play(&mut board, &["Kd7", "Rh7+"]);
        assert_eq!(max, board.halfmove_clock());
        assert_eq!(max, board.fullmove_clock());
        assert_eq!(GameState::FiftyMoveRule, board.state());

        board.undo_move();
        board.undo_move();
        assert_eq!(max, board.halfmove_clock());
        assert_eq!(max, board.fullmove_clock());
    }

    #[test]
    fn insufficient_material_after_capture() {
        let mut board = Board::from_fen("4k3/8/8/8/8/8/4r3/3NK3 w - - 0 1").unwrap();
        play(&mut board, &["Kxe2"]);
        assert_eq!(GameState::InsufficientMaterial, board.state());
    }

    #[test]
    fn threefold_repetition() {
        let mut board = Board::new();
        play(&mut board, &["Nf3", "Nf6", "Ng1", "Ng8", "Nf3", "Nf6", "Ng1"]);
        assert_eq!(GameState::InProgress, board.state());
        play(&mut board, &["Ng8"]);
        assert_eq!(3, board.repetitions());
        assert_eq!(GameState::ThreefoldRepetition, board.state());

        board.undo_move();
        assert_eq!(2, board.repetitions());
    }

    #[test]
    fn resignation() {
        let mut board = Board::new();
        play(&mut board, &["e4"]);
        board.resign().unwrap();
        assert_eq!(GameState::Resignation(Color::Black), board.state());
        assert!(board.apply_move(&Move::from_san("e5").unwrap()).is_err());
        assert!(board.resign().is_err());

        board.undo_move();
        assert_eq!(GameState::InProgress, board.state());
        assert_eq!(Color::White, board.side_to_move());
    }

    #[test]
    fn minimal_san() {
        let board = Board::from_fen("4k3/8/8/8/8/8/8/1N2KN2 w - - 0 1").unwrap();
        let mov = board
            .validate(&Move::from_san("Nbd2").unwrap())
            .unwrap();
        assert_eq!("Nbd2", board.san(&mov));
        let mov = board.validate(&Move::from_san("Nc3").unwrap()).unwrap();
        assert_eq!("Nc3", board.san(&mov));

        let mut board = Board::new();
        play(&mut board, &["e4", "f5"]);
        let mov = board.validate(&Move::from_san("exf5").unwrap()).unwrap();
        assert_eq!("exf5", board.san(&mov));
        let mov = board.validate(&Move::from_san("Qh5").unwrap()).unwrap();
        assert_eq!("Qh5+", board.san(&mov));
    }

    #[test]
    fn display_renders_ranks_top_down() {
        let board = Board::new();
        let text = board.to_string();
        assert!(text.starts_with("White turn\n"));
        let first_rank = text.lines().find(|l| l.starts_with(" 8 |")).unwrap();
        assert_eq!(" 8 | r  n  b  q  k  b  n  r ", first_rank);
    }

    mod fen {
        use crate::board::{Board, FenParseError};
        use crate::types::{CastleStatus, Color, Piece, PieceKind, Square};
        use crate::types::{squares, TableIndex};

        #[test]
        fn fen_smoke() {
            let board = Board::from_fen("8/8/8/8/8/8/8/8 w - - 0 0").unwrap();
            assert_eq!(Color::White, board.side_to_move());
            assert_eq!(CastleStatus::NONE, board.castle_status());
            assert_eq!(None, board.en_passant_square());
            assert_eq!(0, board.halfmove_clock());
            assert_eq!(0, board.fullmove_clock());
        }

        #[test]
        fn placement_only() {
            let board = Board::from_fen("8/8/8/8/8/8/8/8").unwrap();
            for sq in squares() {
                assert_eq!(0, board.get(sq));
            }
            assert_eq!(Color::White, board.side_to_move());
        }

        #[test]
        fn start_position_layout() {
            let board = Board::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR").unwrap();
            let expected = [16, 4, 8, 32, 64, 8, 4, 16];
            for i in 0..8 {
                assert_eq!(expected[i], board.get(Square::from_index(i)));
                assert_eq!(expected[i] | 1, board.get(Square::from_index(56 + i)));
                assert_eq!(2, board.get(Square::from_index(8 + i)));
                assert_eq!(3, board.get(Square::from_index(48 + i)));
            }
            for i in 16..48 {
                assert_eq!(0, board.get(Square::from_index(i)));
            }

            // Castling rights are inferred from the home squares.
            assert_eq!(CastleStatus::all(), board.castle_status());
            assert_eq!(Board::new().as_fen(), board.as_fen());
        }

        #[test]
        fn custom_position() {
            let board = Board::from_fen("4k3/8/8/3P4/4p3/8/8/4K3").unwrap();
            assert_eq!(
                Some(Piece::new(PieceKind::King, Color::White)),
                board.piece_at(Square::E1)
            );
            assert_eq!(
                Some(Piece::new(PieceKind::Pawn, Color::White)),
                board.piece_at(Square::D5)
            );
            assert_eq!(
                Some(Piece::new(PieceKind::Pawn, Color::Black)),
                board.piece_at(Square::E4)
            );
            assert_eq!(Some(Square::E8), board.king_square(Color::Black));
            assert_eq!(CastleStatus::NONE, board.castle_status());
        }

        #[test]
        fn invalid_piece() {
            assert_eq!(
                Some(FenParseError::UnknownPiece('X')),
                Board::from_fen("4k3/8/8/3X4/4p3/8/8/4K3").err()
            );
        }

        #[test]
        fn rank_overflow() {
            assert_eq!(
                Some(FenParseError::FileDoesNotSumToEight),
                Board::from_fen("4k3/8/8/3P5/4p3/8/8/4K3").err()
            );
        }

        #[test]
        fn rank_underflow() {
            assert_eq!(
                Some(FenParseError::FileDoesNotSumToEight),
                Board::from_fen("4k3/8/8/3P3/4p3/8/8/4K3").err()
            );
        }

        #[test]
        fn too_few_and_too_many_ranks() {
            assert_eq!(
                Some(FenParseError::UnexpectedEnd),
                Board::from_fen("8/8/8").err()
            );
            assert_eq!(
                Some(FenParseError::TooManyRanks),
                Board::from_fen("8/8/8/8/8/8/8/8/8").err()
            );
        }

        #[test]
        fn two_kings() {
            assert_eq!(
                Some(FenParseError::TooManyKings(Color::White)),
                Board::from_fen("4k3/8/8/8/8/8/8/3KK3").err()
            );
        }

        #[test]
        fn bad_digit() {
            assert_eq!(
                Some(FenParseError::InvalidDigit),
                Board::from_fen("8/8/8/8/8/8/8/0").err()
            );
        }

        #[test]
        fn trailing_fields() {
            let board =
                Board::from_fen("r3k2r/8/8/8/8/8/8/R3K2R b Kq - 7 31").unwrap();
            assert_eq!(Color::Black, board.side_to_move());
            assert_eq!(
                CastleStatus::WHITE_KINGSIDE | CastleStatus::BLACK_QUEENSIDE,
                board.castle_status()
            );
            assert_eq!(7, board.halfmove_clock());
            assert_eq!(31, board.fullmove_clock());
            assert_eq!("r3k2r/8/8/8/8/8/8/R3K2R b Kq - 7 31", board.as_fen());
        }

        #[test]
        fn invalid_trailing_fields() {
            let base = "4k3/8/8/8/8/8/8/4K3";
            assert_eq!(
                Some(FenParseError::InvalidSideToMove),
                Board::from_fen(format!("{} x", base)).err()
            );
            assert_eq!(
                Some(FenParseError::InvalidCastle),
                Board::from_fen(format!("{} w KX", base)).err()
            );
            assert_eq!(
                Some(FenParseError::InvalidEnPassant),
                Board::from_fen(format!("{} w - e4", base)).err()
            );
            assert_eq!(
                Some(FenParseError::InvalidHalfmove),
                Board::from_fen(format!("{} w - - x", base)).err()
            );
            assert_eq!(
                Some(FenParseError::InvalidFullmove),
                Board::from_fen(format!("{} w - - 0 -1", base)).err()
            );
        }

        #[test]
        fn capturable_en_passant_needs_a_capturer() {
            let board = Board::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 2").unwrap();
            assert_eq!(Some(Square::D6), board.capturable_en_passant_square());

            let board = Board::from_fen("4k3/8/8/3p4/8/8/4P3/4K3 w - d6 0 2").unwrap();
            assert_eq!(Some(Square::D6), board.en_passant_square());
            assert_eq!(None, board.capturable_en_passant_square());
        }

        #[test]
        fn en_passant_field() {
            let board = Board::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 2").unwrap();
            assert_eq!(Some(Square::D6), board.en_passant_square());
            assert_eq!("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 2", board.as_fen());
        }

        #[test]
        fn rights_without_rook_are_dropped() {
            let board = Board::from_fen("4k3/8/8/8/8/8/8/4K3 w KQkq - 0 1").unwrap();
            assert_eq!(CastleStatus::NONE, board.castle_status());
        }
    }
}
