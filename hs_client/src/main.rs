//! A terminal client for the Hold'em game service.
//!
//! Reads commands from stdin, forwards them to the service and prints the
//! synchronized table after every change.

use anyhow::{Context, Result};
use hs_client::{
    commands::{Command, parse_command},
    config::ClientConfig,
    controller::{Controller, Outcome},
    logging,
};
use pico_args::Arguments;
use std::path::PathBuf;
use std::time::Instant;
use tokio::io::AsyncBufReadExt;

const HELP: &str = "\
Play Texas Hold'em against the game service from a terminal

USAGE:
  hs_client [OPTIONS]

OPTIONS:
  --server URL          API base URL  [default: http://localhost:8000/api]
  --token-file PATH     Where the bearer token is kept  [default: .holdem_token]
  --players N           Seats for 'new' without a count  [default: 4]
  --speed X             Speed multiplier for 'auto'  [default: 1.0]
  --game ID             Load this game on startup

FLAGS:
  -h, --help            Print help information

Type 'help' at the prompt for the list of commands.
";

struct Args {
    server_url: Option<String>,
    token_file: Option<PathBuf>,
    players: Option<u8>,
    speed: Option<f64>,
    game: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let args = Args {
        server_url: pargs.opt_value_from_str("--server")?,
        token_file: pargs.opt_value_from_str("--token-file")?,
        players: pargs.opt_value_from_str("--players")?,
        speed: pargs.opt_value_from_str("--speed")?,
        game: pargs.opt_value_from_str("--game")?,
    };

    logging::init();
    run(args).await
}

async fn run(args: Args) -> Result<()> {
    let mut config = ClientConfig::from_env(args.server_url, args.token_file);
    if let Some(players) = args.players {
        config.default_players = players;
    }
    if let Some(speed) = args.speed {
        config.auto_speed = speed;
    }
    config.validate().context("Invalid configuration")?;

    tracing::info!(
        api_base = %config.api_base,
        token_file = %config.token_file.display(),
        "Starting client"
    );

    let mut controller = Controller::new(&config)?;

    if let Some(game_id) = args.game {
        match controller.execute(Command::Load(game_id)).await {
            Ok(Outcome::Continue(text)) => println!("{}", text),
            Ok(Outcome::Quit) => return Ok(()),
            Err(e) => eprintln!("Error: {e:#}"),
        }
    }

    println!("Type 'help' for commands, 'quit' to exit.");

    let mut stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut line = String::new();

    loop {
        line.clear();
        match stdin.read_line(&mut line).await {
            Ok(0) => break, // EOF
            Ok(_) => {
                let input = line.trim();
                if input.is_empty() {
                    continue;
                }

                let command = match parse_command(input) {
                    Ok(command) => command,
                    Err(e) => {
                        eprintln!("{}", e);
                        continue;
                    }
                };

                let name = command.name();
                let started = Instant::now();
                let result = controller.execute(command).await;
                logging::log_command(name, started.elapsed(), result.is_ok());

                match result {
                    Ok(Outcome::Continue(text)) => println!("{}", text),
                    Ok(Outcome::Quit) => break,
                    Err(e) => eprintln!("Error: {e:#}"),
                }
            }
            Err(e) => {
                eprintln!("Error reading input: {}", e);
                break;
            }
        }
    }

    println!("Goodbye.");
    Ok(())
}
