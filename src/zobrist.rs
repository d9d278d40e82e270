// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Zobrist hashing of positions. Two positions hash equal when they agree on piece placement,
//! side to move, castling rights and en passant square; the move clocks are not part of the hash,
//! which is what repetition detection needs.
use crate::board::Board;
use crate::types::{CastleStatus, Color, Piece, Square, TableIndex};

struct Xorshift64 {
    state: u64,
}

impl Xorshift64 {
    pub const fn new(seed: u64) -> Xorshift64 {
        Xorshift64 { state: seed }
    }

    pub fn next(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        self.state
    }
}

const SIDE_TO_MOVE_INDEX: usize = 768;
const CASTLING_RIGHTS_INDEX: usize = 769;
const EN_PASSANT_INDEX: usize = 773;
const TABLE_SIZE: usize = 781;

static CASTLE_RIGHTS: [CastleStatus; 4] = [
    CastleStatus::WHITE_KINGSIDE,
    CastleStatus::WHITE_QUEENSIDE,
    CastleStatus::BLACK_KINGSIDE,
    CastleStatus::BLACK_QUEENSIDE,
];

struct ZobristHasher {
    magic_hashes: [u64; TABLE_SIZE],
}

impl ZobristHasher {
    pub fn new(seed: u64) -> ZobristHasher {
        let mut rng = Xorshift64::new(seed);
        let mut magic_hashes = [0; TABLE_SIZE];
        for entry in magic_hashes.iter_mut() {
            *entry = rng.next();
        }

        ZobristHasher { magic_hashes }
    }

    pub fn square_hash(&self, piece: Piece, square: Square) -> u64 {
        // Twelve entries per square: the six white kinds, then the six black kinds.
        let offset = 12 * square.as_index();
        let color_offset = if piece.color == Color::White { 0 } else { 6 };
        self.magic_hashes[offset + color_offset + piece.kind.ordinal()]
    }

    pub fn side_to_move_hash(&self, side: Color) -> u64 {
        match side {
            Color::White => 0,
            Color::Black => self.magic_hashes[SIDE_TO_MOVE_INDEX],
        }
    }

    pub fn en_passant_hash(&self, square: Square) -> u64 {
        self.magic_hashes[square.file().as_index() + EN_PASSANT_INDEX]
    }

    fn castle_hash(&self, offset: usize) -> u64 {
        self.magic_hashes[offset + CASTLING_RIGHTS_INDEX]
    }

    pub fn hash(&self, board: &Board) -> u64 {
        let mut running_hash = 0u64;
        for (square, piece) in board.mailbox().pieces() {
            running_hash ^= self.square_hash(piece, square);
        }

        running_hash ^= self.side_to_move_hash(board.side_to_move());
        for (offset, &right) in CASTLE_RIGHTS.iter().enumerate() {
            if board.castle_status().contains(right) {
                running_hash ^= self.castle_hash(offset);
            }
        }

        if let Some(ep_square) = board.capturable_en_passant_square() {
            running_hash ^= self.en_passant_hash(ep_square);
        }

        running_hash
    }
}

const ZOBRIST_SEED: u64 = 0xf68e_34a4_e8cc_f09a;

lazy_static! {
    static ref ZOBRIST_HASHER: ZobristHasher = ZobristHasher::new(ZOBRIST_SEED);
}

pub fn hash(board: &Board) -> u64 {
    ZOBRIST_HASHER.hash(board)
}
