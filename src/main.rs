//! Replays a short canned session against the board, printing each frame.
//!
//! The session walks through an exchange, a tax challenge window, a blocked
//! assassination, and a won challenge, ending on the victory banner.

use std::env;
use std::error::Error;
use std::process;

use tracing::Level;

use coup_board::{Board, BoardError, ReplayEngine, Transcript};

/// One human input, as a frontend would deliver it.
#[derive(Copy, Clone, Debug)]
enum Gesture {
    Press(&'static str),
    Toggle(usize),
    Confirm,
}

static GESTURES: [Gesture; 10] = [
    Gesture::Press("Exchange"),
    Gesture::Toggle(2),
    Gesture::Toggle(3),
    Gesture::Confirm,
    Gesture::Press("Pass"),
    Gesture::Press("Income"),
    Gesture::Toggle(0),
    Gesture::Press("Block"),
    Gesture::Press("Assassinate"),
    Gesture::Press("Challenge"),
];

static SESSION: &str = r#"{
    "frames": [
        {
            "obs": ["Duke", "Captain", "none", "none",
                    "Captain", "Assassin", "none", "none",
                    0, 0, 0, 0, 0, 0, 0, 0,
                    2, 2, "none", "none", 0, 0],
            "legal": ["income", "foreign_aid", "tax", "exchange", "steal"]
        },
        {
            "obs": ["Duke", "Captain", "Ambassador", "Contessa",
                    "Captain", "Assassin", "none", "none",
                    0, 0, 0, 0, 0, 0, 0, 0,
                    2, 2, "exchange", "none", 0, 0],
            "legal": ["exchange_return_12", "exchange_return_13", "exchange_return_14",
                      "exchange_return_23", "exchange_return_24", "exchange_return_34"]
        },
        {
            "obs": ["Duke", "Captain", "none", "none",
                    "Captain", "Assassin", "none", "none",
                    0, 0, 0, 0, 0, 0, 0, 0,
                    2, 5, "exchange_return_34", "tax", 0, 0],
            "legal": ["pass", "challenge"]
        },
        {
            "obs": ["Duke", "Captain", "none", "none",
                    "Captain", "Assassin", "none", "none",
                    0, 0, 0, 0, 0, 0, 0, 0,
                    2, 5, "pass", "tax", 0, 0],
            "legal": ["income", "foreign_aid", "tax", "exchange", "steal"]
        },
        {
            "obs": ["Duke", "Captain", "none", "none",
                    "Captain", "Assassin", "none", "none",
                    0, 0, 0, 0, 0, 0, 0, 0,
                    3, 2, "income", "assassinate", 0, 0, "assassinate"],
            "legal": ["pass", "block_assassinate", "challenge", "lose_card_1", "lose_card_2"]
        },
        {
            "obs": ["Duke", "Captain", "none", "none",
                    "Captain", "Assassin", "none", "none",
                    0, 0, 0, 0, 0, 0, 0, 0,
                    3, 2, "block_assassinate", "pass", 0, 0],
            "legal": ["income", "foreign_aid", "tax", "exchange", "steal", "assassinate"]
        },
        {
            "obs": ["Duke", "Captain", "none", "none",
                    "Captain", "Assassin", "none", "none",
                    0, 0, 0, 0, 1, 0, 0, 0,
                    0, 5, "assassinate", "tax", 0, 0],
            "legal": ["pass", "challenge"]
        },
        {
            "obs": ["Duke", "Captain", "none", "none",
                    "Captain", "Assassin", "none", "none",
                    0, 0, 0, 0, 1, 1, 0, 0,
                    0, 5, "challenge", "lose_card_2", 0, 1],
            "legal": []
        }
    ]
}"#;

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(log_level())
        .init();

    if let Err(err) = run() {
        eprintln!("session failed: {err}");
        process::exit(1);
    }
}

fn log_level() -> Level {
    let mut level = Level::WARN;
    for arg in env::args().skip(1) {
        match arg.as_str() {
            "-d" | "--debug" => level = Level::DEBUG,
            "-i" | "--info" => level = Level::INFO,
            _ => eprintln!("unknown option {arg:?}"),
        }
    }
    level
}

fn run() -> Result<(), Box<dyn Error>> {
    let transcript = Transcript::from_json(SESSION)?;
    let mut board = Board::new(ReplayEngine::new(transcript))?;

    println!("{}", board.presentation());

    for gesture in &GESTURES {
        println!("-> {gesture:?}");
        drive(&mut board, gesture)?;
        println!("{}", board.presentation());
    }

    match board.winner() {
        Some(seat) => tracing::info!(seat, "session finished"),
        None => tracing::warn!("transcript ended before the game did"),
    }

    Ok(())
}

fn drive(board: &mut Board<ReplayEngine>, gesture: &Gesture) -> Result<(), BoardError> {
    match gesture {
        Gesture::Press(label) => {
            board.activate(label)?;
        }
        Gesture::Toggle(card_idx) => {
            board.toggle_card(*card_idx);
        }
        Gesture::Confirm => board.confirm()?,
    }
    Ok(())
}
