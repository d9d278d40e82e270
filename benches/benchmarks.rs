// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

#[macro_use]
extern crate criterion;

use chessbot::attacks;
use chessbot::engine::Engine;
use chessbot::eval::Weights;
use chessbot::{Board, Color, MoveGenerator, MoveVec, Square};
use criterion::black_box;
use criterion::Criterion;

const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";

fn criterion_benchmark(c: &mut Criterion) {
    c.bench_function("is attacked e4 kiwipete", |b| {
        let board = Board::from_fen(KIWIPETE).unwrap();
        b.iter(|| attacks::is_attacked(board.mailbox(), black_box(Square::E4), Color::Black))
    });

    c.bench_function("board clone", |b| {
        let board = Board::new();
        b.iter(|| black_box(&board).clone())
    });

    c.bench_function("generate moves start", |b| {
        let board = Board::new();
        b.iter(|| {
            let mut vec = MoveVec::default();
            let gen = MoveGenerator::new();
            gen.generate_moves(black_box(&board), &mut vec);
        });
    });

    c.bench_function("legal moves kiwipete", |b| {
        let board = Board::from_fen(KIWIPETE).unwrap();
        b.iter(|| black_box(&board).legal_moves())
    });

    c.bench_function("best move kiwipete", |b| {
        let board = Board::from_fen(KIWIPETE).unwrap();
        let mut engine = Engine::with_weights(board, Weights::default());
        b.iter(|| engine.find_best_move())
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
