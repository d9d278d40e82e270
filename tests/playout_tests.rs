// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use chessbot::{Board, Color, Move, PieceKind};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const GAMES: u64 = 24;
const MAX_PLIES: usize = 120;

fn assert_kings_cached(board: &Board) {
    for &color in &[Color::White, Color::Black] {
        assert_eq!(
            board.mailbox().find(PieceKind::King, color),
            board.king_square(color),
            "king cache out of sync in {}",
            board.as_fen()
        );
    }
}

/// Every legal move leaves the mover's king safe, and taking it back restores the position.
fn check_position(board: &Board) {
    let mover = board.side_to_move();
    for mov in board.legal_moves().iter() {
        let mut child = board.clone();
        child.apply_move(mov).unwrap();
        assert!(
            !child.is_check(mover),
            "{} leaves the king in check in {}",
            mov,
            board.as_fen()
        );
        assert_kings_cached(&child);

        child.undo_move().unwrap();
        assert_eq!(board.mailbox(), child.mailbox());
        assert_eq!(board.as_fen(), child.as_fen());
        assert_eq!(board.castle_status(), child.castle_status());
        assert_eq!(board.king_square(Color::White), child.king_square(Color::White));
        assert_eq!(board.king_square(Color::Black), child.king_square(Color::Black));
        assert_eq!(board.zobrist_hash(), child.zobrist_hash());
        assert_eq!(board.state(), child.state());
    }
}

#[test]
fn random_playouts_keep_invariants() {
    for seed in 0..GAMES {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut board = Board::new();
        let mut played: Vec<Move> = Vec::new();
        for _ in 0..MAX_PLIES {
            if board.state().is_over() {
                break;
            }

            check_position(&board);
            let moves = board.legal_moves();
            let mov = moves[rng.gen_range(0, moves.len())];
            played.push(board.apply_move(&mov).unwrap());
        }

        // Unwinding the whole game lands back on the start position.
        while let Some(mov) = board.undo_move() {
            assert_eq!(played.pop(), Some(mov));
        }
        assert_eq!(Board::new().as_fen(), board.as_fen());
        assert_eq!(Board::new().zobrist_hash(), board.zobrist_hash());
    }
}

#[test]
fn minimal_notation_replays_the_game() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let mut board = Board::new();
    for _ in 0..MAX_PLIES {
        if board.state().is_over() {
            break;
        }

        let moves = board.legal_moves();
        let mov = moves[rng.gen_range(0, moves.len())];
        let san = board.san(&mov);
        let reparsed = Move::from_san(&san).unwrap();
        let played = board.apply_move(&reparsed).unwrap();
        assert_eq!(mov.source(), played.source(), "{}", san);
        assert_eq!(mov.destination(), played.destination(), "{}", san);
        assert_eq!(mov.promotion_piece(), played.promotion_piece(), "{}", san);
        assert_eq!(played.is_check() || played.is_checkmate(), san.ends_with('+') || san.ends_with('#'));
    }
}
