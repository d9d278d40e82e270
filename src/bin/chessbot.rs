// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

#[macro_use]
extern crate clap;

use std::fs::File;
use std::io;
use std::process;
use std::time::Instant;

use chessbot::console::Console;
use chessbot::engine::Engine;
use chessbot::eval::{Score, Weights};
use chessbot::search::CsvDataRecorder;
use chessbot::{perft, Board, Color};
use clap::{App, Arg, ArgMatches, SubCommand};
use serde_derive::Serialize;

#[derive(Serialize)]
struct Evaluation<'a> {
    fen: String,
    weights: &'a Weights,
    score: Score,
    best_move: Option<String>,
}

fn main() {
    env_logger::init();
    let fen_arg = || {
        Arg::with_name("FEN")
            .help("FEN string for a board position")
            .required(true)
            .index(1)
    };
    let weights_arg = || {
        Arg::with_name("weights")
            .help("File of NAME=value evaluation weights")
            .value_name("FILE")
            .short("-w")
            .long("--weights")
            .takes_value(true)
    };

    let matches = App::new(crate_name!())
        .version(crate_version!())
        .author(crate_authors!())
        .about(crate_description!())
        .subcommand(
            SubCommand::with_name("play")
                .about("Play a game on the console")
                .arg(
                    Arg::with_name("fen")
                        .help("FEN string of the starting position")
                        .value_name("FEN")
                        .long("--fen")
                        .takes_value(true),
                )
                .arg(weights_arg())
                .arg(
                    Arg::with_name("engine-plays")
                        .help("Side played by the engine; omit to play both sides yourself")
                        .value_name("SIDE")
                        .long("--engine-plays")
                        .possible_values(&["white", "black"])
                        .takes_value(true),
                )
                .arg(
                    Arg::with_name("record")
                        .help("Write every scored candidate move to this CSV file")
                        .value_name("CSV")
                        .long("--record")
                        .takes_value(true),
                ),
        )
        .subcommand(
            SubCommand::with_name("evaluate")
                .about("Evaluate a board position")
                .arg(fen_arg())
                .arg(weights_arg())
                .arg(
                    Arg::with_name("json")
                        .help("Print the evaluation as JSON")
                        .long("--json"),
                ),
        )
        .subcommand(
            SubCommand::with_name("perft")
                .about("PERFT analysis of board positions")
                .arg(fen_arg())
                .arg(
                    Arg::with_name("depth")
                        .help("Depth of move tree to search")
                        .value_name("DEPTH")
                        .short("-d")
                        .long("--depth")
                        .required(true)
                        .takes_value(true),
                ),
        )
        .get_matches();

    match matches.subcommand() {
        ("perft", Some(matches)) => run_perft(matches),
        ("evaluate", Some(matches)) => run_evaluate(matches),
        ("play", Some(matches)) => run_play(matches),
        _ => run_play(&ArgMatches::default()),
    }
}

fn load_board(fen: &str) -> Board {
    match Board::from_fen(fen) {
        Ok(board) => board,
        Err(err) => {
            eprintln!("invalid fen {:?}: {}", fen, err);
            process::exit(1);
        }
    }
}

fn load_weights(matches: &ArgMatches) -> Weights {
    let path = match matches.value_of("weights") {
        Some(path) => path,
        None => return Weights::default(),
    };

    match Weights::from_file(path) {
        Ok(weights) => weights,
        Err(err) => {
            eprintln!("invalid weights file {}: {}", path, err);
            process::exit(1);
        }
    }
}

fn run_play(matches: &ArgMatches) -> ! {
    let board = load_board(matches.value_of("fen").unwrap_or(chessbot::START_FEN));
    let weights = load_weights(matches);
    let engine_side = match matches.value_of("engine-plays") {
        Some("white") => Some(Color::White),
        Some("black") => Some(Color::Black),
        _ => None,
    };

    let mut engine = Engine::with_weights(board, weights);
    if let Some(path) = matches.value_of("record") {
        let file = match File::create(path) {
            Ok(file) => file,
            Err(err) => {
                eprintln!("cannot create {}: {}", path, err);
                process::exit(1);
            }
        };
        engine = engine.with_recorder(Box::new(CsvDataRecorder::new(file)));
    }

    let mut console = Console::new(engine, engine_side);
    let stdin = io::stdin();
    let stdout = io::stdout();
    if let Err(err) = console.run(stdin.lock(), stdout.lock()) {
        eprintln!("console error: {}", err);
        process::exit(1);
    }

    process::exit(0);
}

fn run_evaluate(matches: &ArgMatches) -> ! {
    let fen = matches.value_of("FEN").unwrap();
    let board = load_board(fen);
    let weights = load_weights(matches);
    let mut engine = Engine::with_weights(board.clone(), weights);
    let score = engine.evaluate();
    let best = engine.find_best_move();

    if matches.is_present("json") {
        let evaluation = Evaluation {
            fen: board.as_fen(),
            weights: &weights,
            score,
            best_move: best.map(|result| board.san(&result.best_move)),
        };
        match serde_json::to_string_pretty(&evaluation) {
            Ok(text) => println!("{}", text),
            Err(err) => {
                eprintln!("failed to serialize evaluation: {}", err);
                process::exit(1);
            }
        }
        process::exit(0);
    }

    println!("fen:   {}", fen);
    println!();
    println!("{}", board);
    println!("score: {}", score);
    match best {
        Some(result) => {
            println!("best move: {}", board.san(&result.best_move));
            println!("    score: {}", result.score);
            println!("    nodes: {}", result.nodes_searched);
        }
        None => println!("no moves: {}", board.state()),
    }

    process::exit(0);
}

fn run_perft(matches: &ArgMatches) -> ! {
    let fen = matches.value_of("FEN").unwrap();
    let depth = value_t_or_exit!(matches, "depth", u32);
    let board = load_board(fen);

    println!("fen:   {}", fen);
    println!("depth: {}", depth);
    println!();
    println!("{}", board);
    println!();
    for i in 1..depth + 1 {
        let start = Instant::now();
        let results = perft(&board, i);
        let duration = start.elapsed();
        let ms = duration.as_secs() * 1000 + u64::from(duration.subsec_millis());
        println!("perft({}) = {} ({} ms)", i, results, ms);
    }

    process::exit(0);
}
