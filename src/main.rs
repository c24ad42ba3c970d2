use std::io::{self, BufRead, BufWriter, Write};

use anyhow::bail;
use clap::Parser;
use sanreplay::chess::board::Board;
use sanreplay::Replay;

/// Replays chess games written in Standard Algebraic Notation and prints the
/// resolved moves, one tab-separated line per relocation: game, ply,
/// notation, color, piece, origin, destination and flags.
#[derive(Parser, Debug)]
#[command(version = sanreplay::version(), about)]
struct Config {
    /// Moves of a single game. When omitted, games are read from stdin, one
    /// game per line.
    moves: Vec<String>,
    /// Piece placement field of FEN to start from instead of the standard
    /// starting position.
    #[arg(long)]
    placement: Option<String>,
    /// Ply index of the first move. Odd values mean Black moves first.
    #[arg(long, default_value_t = 0)]
    first_ply: usize,
    /// Print the final position after each game.
    #[arg(long)]
    board: bool,
}

/// Game termination markers that can end a move list.
const RESULTS: [&str; 4] = ["1-0", "0-1", "1/2-1/2", "*"];

/// Splits a move list into notation strings, dropping move numbers ("12.",
/// "12...", the "1." in "1.e4") and the game result.
fn tokenize(line: &str) -> Vec<&str> {
    line.split_whitespace()
        .map(|token| match token.rsplit_once('.') {
            Some((number, notation))
                if number.chars().all(|c| c.is_ascii_digit() || c == '.') =>
            {
                notation
            },
            _ => token,
        })
        .filter(|notation| !notation.is_empty() && !RESULTS.contains(notation))
        .collect()
}

/// Replays a single game and prints its records. Returns `false` if the game
/// could not be replayed until the end.
fn replay_game(
    out: &mut impl Write,
    config: &Config,
    start: &Board,
    game: usize,
    moves: &[&str],
) -> anyhow::Result<bool> {
    let mut replay = Replay::from_board(start.clone());
    let mut completed = true;
    for (ply, notation) in (config.first_ply..).zip(moves) {
        match replay.play(ply, notation) {
            Ok(records) => {
                for record in records {
                    writeln!(out, "{game}\t{record}")?;
                }
            },
            Err(error) => {
                log::error!("game {game}: replay stopped at move {ply} ({notation:?}): {error}");
                completed = false;
                break;
            },
        }
    }
    if config.board {
        writeln!(out, "{:?}", replay.board())?;
        writeln!(out)?;
    }
    Ok(completed)
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let config = Config::parse();
    log::info!("sanreplay {}", sanreplay::version());

    let start = match &config.placement {
        Some(placement) => Board::from_placement(placement)?,
        None => Board::starting(),
    };
    let mut out = BufWriter::new(io::stdout().lock());
    let mut games = 0;
    let mut failed = 0;
    if config.moves.is_empty() {
        for line in io::stdin().lock().lines() {
            let line = line?;
            let moves = tokenize(&line);
            if moves.is_empty() {
                continue;
            }
            games += 1;
            if !replay_game(&mut out, &config, &start, games, &moves)? {
                failed += 1;
            }
        }
    } else {
        let line = config.moves.join(" ");
        games += 1;
        if !replay_game(&mut out, &config, &start, games, &tokenize(&line))? {
            failed += 1;
        }
    }
    out.flush()?;

    if failed != 0 {
        bail!("{failed} out of {games} games could not be replayed");
    }
    Ok(())
}
