use std::io::{self, BufRead, Write};

use anyhow::Result;
use rand::seq::SliceRandom;

use minnow::board::{parse_square, piece_from_char, piece_kind, Color};
use minnow::game::{Game, GameStatus};
use minnow::movegen::Move;

/// Search depth for the bot. Raising this makes the blocking search call
/// proportionally slower; see the module notes in `search`.
const BOT_DEPTH: u32 = 3;

enum Opponent {
    Search,
    Random,
}

fn main() -> Result<()> {
    let opponent = if std::env::args().any(|a| a == "--random") {
        Opponent::Random
    } else {
        Opponent::Search
    };

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut rng = rand::thread_rng();
    let mut game = Game::new();

    println!("minnow - you play White, moves like e2e4 (e7e8q to promote)");
    println!("commands: new, fen <FEN>, moves <square>, quit");
    print_board(&game);

    let mut line = String::new();
    loop {
        write!(stdout, "> ")?;
        stdout.flush()?;
        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let input = line.trim();

        match input {
            "quit" => break,
            "new" => {
                game = Game::new();
                print_board(&game);
                continue;
            }
            "" => continue,
            _ => {}
        }

        if let Some(fen) = input.strip_prefix("fen ") {
            match Game::from_fen(fen) {
                Ok(g) => {
                    game = g;
                    print_board(&game);
                }
                Err(e) => println!("{}", e),
            }
            continue;
        }

        if let Some(square) = input.strip_prefix("moves ") {
            match parse_square(square) {
                Some(sq) => {
                    let coords: Vec<String> =
                        game.moves_from(sq).iter().map(Move::coord).collect();
                    println!("{}", if coords.is_empty() { "(none)".into() } else { coords.join(" ") });
                }
                None => println!("bad square: {}", square),
            }
            continue;
        }

        let Some(mv) = parse_coord_move(&game, input) else {
            println!("not a legal move: {}", input);
            continue;
        };

        match game.execute_move(mv) {
            Ok(GameStatus::Ongoing) => {}
            Ok(status) => {
                print_board(&game);
                print_result(status);
                continue;
            }
            Err(e) => {
                println!("{}", e);
                continue;
            }
        }

        // Bot reply.
        let reply = match opponent {
            Opponent::Search => game.find_best_move(BOT_DEPTH),
            Opponent::Random => game.legal_moves().choose(&mut rng).copied(),
        };
        if let Some(reply) = reply {
            println!("bot plays {}", reply.coord());
            let status = game.execute_move(reply)?;
            print_board(&game);
            if status != GameStatus::Ongoing {
                print_result(status);
            }
        }
    }

    Ok(())
}

/// Maps "e2e4" / "e7e8q" onto a move from the current legal set.
fn parse_coord_move(game: &Game, input: &str) -> Option<Move> {
    if input.len() != 4 && input.len() != 5 {
        return None;
    }
    let from = parse_square(&input[..2])?;
    let to = parse_square(&input[2..4])?;
    let promotion = if input.len() == 5 {
        let kind = piece_kind(piece_from_char(input.as_bytes()[4] as char)?);
        kind * game.side_to_move().sign()
    } else {
        0
    };
    game.find_move(from, to, promotion)
}

fn print_board(game: &Game) {
    print!("{}", game.position());
}

fn print_result(status: GameStatus) {
    match status {
        GameStatus::Checkmate(Color::White) => println!("checkmate - White wins"),
        GameStatus::Checkmate(Color::Black) => println!("checkmate - Black wins"),
        GameStatus::Stalemate => println!("stalemate - draw"),
        GameStatus::Ongoing => {}
    }
}
