// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use chessbot::{Board, Move, MoveParseError, PieceKind, Square};

#[test]
fn invalid_inputs() {
    assert_eq!(Err(MoveParseError::Empty), Move::from_san(""));
    for text in &["Xx4", "e8=X", "O-O-O-O", "e", "Nz4", "e9", "Pe4", "nf3", "exd"] {
        assert!(Move::from_san(text).is_err(), "{:?} parsed", text);
    }
}

#[test]
fn accepted_forms() {
    let cases: &[(&str, PieceKind, Square)] = &[
        ("e4", PieceKind::Pawn, Square::E4),
        ("exd5", PieceKind::Pawn, Square::D5),
        ("Nbd7", PieceKind::Knight, Square::D7),
        ("R1e4", PieceKind::Rook, Square::E4),
        ("Qh4e1", PieceKind::Queen, Square::E1),
        ("e8=Q", PieceKind::Pawn, Square::E8),
        ("exf8=N", PieceKind::Pawn, Square::F8),
        ("Kxe2+", PieceKind::King, Square::E2),
    ];

    for &(text, kind, dest) in cases {
        let mov = Move::from_san(text).unwrap();
        assert_eq!(kind, mov.piece(), "{}", text);
        assert_eq!(Some(dest), mov.destination(), "{}", text);
    }
}

#[test]
fn castles_carry_no_squares() {
    let short = Move::from_san("O-O").unwrap();
    let long = Move::from_san("O-O-O").unwrap();
    assert!(short.is_kingside_castle());
    assert!(long.is_queenside_castle());
    assert_eq!(PieceKind::King, short.piece());
    assert_eq!(None, long.destination());
    assert_eq!("O-O", short.to_string());
    assert_eq!("O-O-O", long.to_string());
}

#[test]
fn generated_moves_round_trip() {
    let positions = [
        chessbot::START_FEN,
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8",
        "r2q1rk1/pP1p2pp/Q4n2/bbp1p3/Np6/1B3NBn/pPPP1PPP/R3K2R b KQ - 0 1",
    ];

    for fen in &positions {
        let board = Board::from_fen(fen).unwrap();
        for mov in board.legal_moves().iter() {
            let text = mov.to_string();
            let parsed = Move::from_san(&text).unwrap();
            assert_eq!(mov.piece(), parsed.piece(), "{}", text);
            assert_eq!(mov.is_capture(), parsed.is_capture(), "{}", text);
            assert_eq!(mov.is_promotion(), parsed.is_promotion(), "{}", text);
            assert_eq!(mov.promotion_piece(), parsed.promotion_piece(), "{}", text);
            if !mov.is_castle() {
                assert_eq!(mov.destination(), parsed.destination(), "{}", text);
            }

            // A fully written move always resolves to itself.
            assert_eq!(
                (mov.source(), mov.destination()),
                board
                    .validate(&parsed)
                    .map(|resolved| (resolved.source(), resolved.destination()))
                    .unwrap(),
                "{}",
                text
            );
        }
    }
}

#[test]
fn check_marks_are_optional() {
    let mut board = Board::new();
    for text in &["e4", "f5", "Qh5+"] {
        board.apply_move(&Move::from_san(text).unwrap()).unwrap();
    }
    let last = board.last_move().unwrap();
    assert!(last.is_check());
    assert_eq!("Qd1h5+", last.to_string());

    board.undo_move();
    let played = board.apply_move(&Move::from_san("Qh5").unwrap()).unwrap();
    assert!(played.is_check());
}
