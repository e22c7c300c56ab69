//! A line-based interface for playing against the engine at a terminal
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////
use std::io::{self, BufRead, Write};
use std::time::Duration;
use log::info;
use crate::chess::{Color, Move, Position};
use crate::engine::Engine;

/// Plays a game at the terminal, the user as `Red` against the engine as `Black`
///
/// Moves are entered in coordinate notation, such as `h2e2`. Entering `moves` lists the legal
/// moves and `quit` resigns the game. The game ends when either side has no legal move, which in
/// this game is a loss whether or not the king is in check, or when the same position occurs for
/// the third time, which is scored as a draw.
pub fn play(
    mut pos: Position,
    mut engine: Engine,
    depth: usize,
    time_limit: Option<Duration>)
-> io::Result<()> {
    let stdin = io::stdin();
    let mut input = stdin.lock();

    loop {
        println!("{}", pos.board_string());

        if pos.repetition() {
            println!("Draw by repetition.");
            return Ok(());
        }
        let legal = pos.legal_moves();
        if legal.is_empty() {
            match pos.turn() {
                Color::Red => println!("You have no moves. The engine wins."),
                Color::Black => println!("The engine has no moves. You win!"),
            }
            return Ok(());
        }

        match pos.turn() {
            Color::Red => {
                let mv = match read_move(&mut input, &legal)? {
                    Some(mv) => mv,
                    None => {
                        println!("You resigned.");
                        return Ok(());
                    },
                };

                info!("user plays {}", mv);
                pos.make_move(mv);
            },
            Color::Black => {
                let thinking = match engine.search(&mut pos, depth, time_limit) {
                    Some(thinking) => thinking,
                    // unreachable while legal moves remain, but never panic over it
                    None => {
                        println!("The engine resigns. You win!");
                        return Ok(());
                    },
                };

                let mv = thinking.best_move();
                println!("The engine plays {} (depth {}, score {}, {} nodes, {} nps).",
                    mv, thinking.depth(), i32::from(thinking.score()),
                    thinking.nodes(), thinking.nps());
                info!("engine plays {}", mv);
                pos.make_move(mv);
            },
        }
    }
}

/// Prompts until the user enters a legal move, returning `None` on `quit` or end of input
fn read_move(input: &mut dyn BufRead, legal: &[Move]) -> io::Result<Option<Move>> {
    loop {
        print!("your move: ");
        io::stdout().flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Ok(None);
        }

        match line.trim() {
            "quit" | "exit" => return Ok(None),
            "moves" => {
                for mv in legal {
                    print!(" {}", mv);
                }
                println!();
            },
            text => match text.parse::<Move>() {
                Ok(mv) if legal.contains(&mv) => return Ok(Some(mv)),
                _ => println!("{}: not a legal move (enter `moves` to list them)", text),
            },
        }
    }
}
