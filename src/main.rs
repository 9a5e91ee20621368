//! Prism Layout CLI
//!
//! Usage:
//!   prism-layout [OPTIONS] [FILE]
//!
//! Options:
//!   -a, --anchor <ID>  Card that just moved (overrides the board's anchor)
//!       --no-resolve   Skip overlap resolution, only route connectors
//!   -v, --verbose...   Raise log verbosity (-v debug, -vv trace)
//!   -h, --help         Print help

use std::io::{self, Read};
use std::path::PathBuf;

use clap::Parser;
use log::LevelFilter;

use prism_layout::{process_board, Board};

#[derive(Parser)]
#[command(name = "prism-layout")]
#[command(about = "Resolve card overlaps and route connectors for a board snapshot")]
struct Cli {
    /// Board snapshot in TOML (reads from stdin if not provided)
    input: Option<PathBuf>,

    /// Card that just moved; overlap resolution keeps it fixed
    #[arg(short, long)]
    anchor: Option<String>,

    /// Skip overlap resolution
    #[arg(long, conflicts_with = "anchor")]
    no_resolve: bool,

    /// Raise log verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    // Read input
    let parsed = match &cli.input {
        Some(path) => Board::from_file(path),
        None => {
            let mut buffer = String::new();
            if let Err(e) = io::stdin().read_to_string(&mut buffer) {
                eprintln!("Error reading from stdin: {}", e);
                std::process::exit(1);
            }
            buffer.parse()
        }
    };

    let mut board = match parsed {
        Ok(board) => board,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    if cli.no_resolve {
        board.anchor = None;
    } else if let Some(anchor) = cli.anchor {
        board.anchor = Some(anchor);
    }

    let output = process_board(&board)
        .map_err(prism_layout::ProcessError::from)
        .and_then(|report| report.to_toml().map_err(Into::into));
    match output {
        Ok(toml) => print!("{}", toml),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
