use holdem_sync::PlayerId;
use holdem_sync::api::{ActionKind, PlayerActionRequest, Street};
use std::fmt;

/// A parsed line of user input.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Create a game with an optional seat count
    NewGame { players: Option<u8> },
    /// Load an existing game by id
    Load(String),
    Start,
    Deal { smart: bool },
    Advance(Street),
    Act(PlayerActionRequest),
    AutoPlay { speed: Option<f64> },
    Step,
    Refresh,
    Show,
    Log,
    Clear,
    Login { username: String, password: String },
    Logout,
    Register {
        username: String,
        password: String,
        nickname: Option<String>,
    },
    Player(PlayerId),
    Stats(PlayerId),
    Profile(PlayerId),
    Players { skip: Option<u32>, limit: Option<u32> },
    Games { status: Option<String> },
    GameStats,
    Help,
    Quit,
}

impl Command {
    /// Short name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Command::NewGame { .. } => "new",
            Command::Load(_) => "load",
            Command::Start => "start",
            Command::Deal { .. } => "deal",
            Command::Advance(Street::Flop) => "flop",
            Command::Advance(Street::Turn) => "turn",
            Command::Advance(Street::River) => "river",
            Command::Act(_) => "act",
            Command::AutoPlay { .. } => "auto",
            Command::Step => "step",
            Command::Refresh => "refresh",
            Command::Show => "show",
            Command::Log => "log",
            Command::Clear => "clear",
            Command::Login { .. } => "login",
            Command::Logout => "logout",
            Command::Register { .. } => "register",
            Command::Player(_) => "player",
            Command::Stats(_) => "stats",
            Command::Profile(_) => "profile",
            Command::Players { .. } => "players",
            Command::Games { .. } => "games",
            Command::GameStats => "gamestats",
            Command::Help => "help",
            Command::Quit => "quit",
        }
    }
}

/// Errors that can occur during command parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A required argument is missing.
    MissingArgument { command: String, usage: &'static str },
    /// An argument could not be parsed as a number.
    InvalidNumber(String),
    /// Unknown player action.
    InvalidAction(String),
    /// Unrecognized command.
    UnrecognizedCommand(String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingArgument { command, usage } => {
                write!(f, "'{}' is missing an argument. Usage: {}", command, usage)
            }
            Self::InvalidNumber(value) => {
                write!(f, "Invalid number '{}'. Must be a positive number", value)
            }
            Self::InvalidAction(value) => write!(
                f,
                "Invalid action '{}'. Use fold, check, call, raise <amount> or all-in",
                value
            ),
            Self::UnrecognizedCommand(cmd) => write!(
                f,
                "Unrecognized command '{}'. Type 'help' to see available commands",
                cmd
            ),
        }
    }
}

impl std::error::Error for ParseError {}

pub const HELP: &str = "\
new [players]                     Create a game and make it the active one
load <game_id>                    Load an existing game
start                             Start the hand
deal [smart]                      Deal hole cards, optionally with the smart dealer
flop | turn | river               Reveal the next street
act <player_id> <action> [amt]    fold, check, call, raise <amount>, all-in
auto [speed]                      Let AI players finish the hand
step                              Let the current player take one AI decision
refresh                           Re-fetch the active game
show                              Print the table
log                               Print the event log
clear                             Forget the active game, hidden cards and log
login <user> <pass>               Authenticate and persist the token
logout                            Forget the persisted token
register <user> <pass> [nick]     Create an account
player <id> | stats <id> | profile <id>
players [skip] [limit]            List players
games [status]                    List recorded games
gamestats                         Aggregate game statistics
help | quit
";

/// Parse a command string into a [`Command`].
///
/// # Examples
///
/// ```
/// use hs_client::commands::{Command, parse_command};
/// use holdem_sync::api::Street;
///
/// assert_eq!(parse_command("flop"), Ok(Command::Advance(Street::Flop)));
/// assert_eq!(parse_command("new 6"), Ok(Command::NewGame { players: Some(6) }));
/// ```
pub fn parse_command(input: &str) -> Result<Command, ParseError> {
    let trimmed = input.trim();
    let parts: Vec<&str> = trimmed.split_ascii_whitespace().collect();
    let Some((&head, args)) = parts.split_first() else {
        return Err(ParseError::UnrecognizedCommand(String::new()));
    };

    match head {
        "new" => Ok(Command::NewGame {
            players: parse_opt(args.first())?,
        }),
        "load" => Ok(Command::Load(
            required(head, args.first(), "load <game_id>")?.to_string(),
        )),
        "start" => Ok(Command::Start),
        "deal" => match args.first() {
            None => Ok(Command::Deal { smart: false }),
            Some(&"smart") => Ok(Command::Deal { smart: true }),
            Some(other) => Err(ParseError::UnrecognizedCommand(format!("deal {other}"))),
        },
        "flop" => Ok(Command::Advance(Street::Flop)),
        "turn" => Ok(Command::Advance(Street::Turn)),
        "river" => Ok(Command::Advance(Street::River)),
        "act" => parse_act_command(args),
        "auto" => Ok(Command::AutoPlay {
            speed: parse_opt(args.first())?,
        }),
        "step" => Ok(Command::Step),
        "refresh" => Ok(Command::Refresh),
        "show" => Ok(Command::Show),
        "log" => Ok(Command::Log),
        "clear" => Ok(Command::Clear),
        "login" => {
            let usage = "login <user> <pass>";
            Ok(Command::Login {
                username: required(head, args.first(), usage)?.to_string(),
                password: required(head, args.get(1), usage)?.to_string(),
            })
        }
        "logout" => Ok(Command::Logout),
        "register" => {
            let usage = "register <user> <pass> [nick]";
            Ok(Command::Register {
                username: required(head, args.first(), usage)?.to_string(),
                password: required(head, args.get(1), usage)?.to_string(),
                nickname: args.get(2).map(|s| s.to_string()),
            })
        }
        "player" => Ok(Command::Player(parse_player_id(head, args)?)),
        "stats" => Ok(Command::Stats(parse_player_id(head, args)?)),
        "profile" => Ok(Command::Profile(parse_player_id(head, args)?)),
        "players" => Ok(Command::Players {
            skip: parse_opt(args.first())?,
            limit: parse_opt(args.get(1))?,
        }),
        "games" => Ok(Command::Games {
            status: args.first().map(|s| s.to_string()),
        }),
        "gamestats" => Ok(Command::GameStats),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" => Ok(Command::Quit),
        _ => Err(ParseError::UnrecognizedCommand(trimmed.to_string())),
    }
}

/// Parse "act <player_id> <action> [amount]"
fn parse_act_command(args: &[&str]) -> Result<Command, ParseError> {
    let usage = "act <player_id> <action> [amount]";
    let player_id: PlayerId = parse_number(required("act", args.first(), usage)?)?;
    let action = required("act", args.get(1), usage)?;

    let request = match action.to_lowercase().as_str() {
        "fold" => PlayerActionRequest::new(player_id, ActionKind::Fold),
        "check" => PlayerActionRequest::new(player_id, ActionKind::Check),
        "call" => PlayerActionRequest::new(player_id, ActionKind::Call),
        "all-in" | "allin" | "all_in" => PlayerActionRequest::new(player_id, ActionKind::AllIn),
        "raise" => match args.get(2) {
            Some(amount) => PlayerActionRequest::raise(player_id, parse_number(amount)?),
            // Let the service pick the minimum raise
            None => PlayerActionRequest::new(player_id, ActionKind::Raise),
        },
        other => return Err(ParseError::InvalidAction(other.to_string())),
    };

    Ok(Command::Act(request))
}

fn parse_player_id(command: &str, args: &[&str]) -> Result<PlayerId, ParseError> {
    parse_number(required(command, args.first(), "<command> <player_id>")?)
}

fn required<'a>(
    command: &str,
    arg: Option<&&'a str>,
    usage: &'static str,
) -> Result<&'a str, ParseError> {
    arg.copied().ok_or_else(|| ParseError::MissingArgument {
        command: command.to_string(),
        usage,
    })
}

fn parse_number<T: std::str::FromStr + PartialOrd + Default>(value: &str) -> Result<T, ParseError> {
    match value.parse::<T>() {
        Ok(n) if n >= T::default() => Ok(n),
        _ => Err(ParseError::InvalidNumber(value.to_string())),
    }
}

fn parse_opt<T: std::str::FromStr + PartialOrd + Default>(
    value: Option<&&str>,
) -> Result<Option<T>, ParseError> {
    value.map(|v| parse_number(v)).transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    // === Single-word command tests ===

    #[test]
    fn test_parse_streets() {
        assert_eq!(parse_command("flop"), Ok(Command::Advance(Street::Flop)));
        assert_eq!(parse_command("turn"), Ok(Command::Advance(Street::Turn)));
        assert_eq!(parse_command("river"), Ok(Command::Advance(Street::River)));
    }

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!(parse_command("start"), Ok(Command::Start));
        assert_eq!(parse_command("step"), Ok(Command::Step));
        assert_eq!(parse_command("show"), Ok(Command::Show));
        assert_eq!(parse_command("clear"), Ok(Command::Clear));
        assert_eq!(parse_command("exit"), Ok(Command::Quit));
        assert_eq!(parse_command("?"), Ok(Command::Help));
    }

    // === Whitespace handling ===

    #[test]
    fn test_parse_with_surrounding_whitespace() {
        assert_eq!(parse_command("  refresh  "), Ok(Command::Refresh));
    }

    #[test]
    fn test_parse_empty_input() {
        assert!(matches!(
            parse_command("   "),
            Err(ParseError::UnrecognizedCommand(_))
        ));
    }

    // === Commands with arguments ===

    #[test]
    fn test_parse_new_game() {
        assert_eq!(parse_command("new"), Ok(Command::NewGame { players: None }));
        assert_eq!(
            parse_command("new 6"),
            Ok(Command::NewGame { players: Some(6) })
        );
        assert_eq!(
            parse_command("new six"),
            Err(ParseError::InvalidNumber("six".to_string()))
        );
    }

    #[test]
    fn test_parse_deal() {
        assert_eq!(parse_command("deal"), Ok(Command::Deal { smart: false }));
        assert_eq!(parse_command("deal smart"), Ok(Command::Deal { smart: true }));
        assert!(parse_command("deal fast").is_err());
    }

    #[test]
    fn test_parse_load_requires_id() {
        assert_eq!(
            parse_command("load ab12cd34"),
            Ok(Command::Load("ab12cd34".to_string()))
        );
        assert!(matches!(
            parse_command("load"),
            Err(ParseError::MissingArgument { .. })
        ));
    }

    #[test]
    fn test_parse_act() {
        assert_eq!(
            parse_command("act 2 call"),
            Ok(Command::Act(PlayerActionRequest::new(2, ActionKind::Call)))
        );
        assert_eq!(
            parse_command("act 1 ALL-IN"),
            Ok(Command::Act(PlayerActionRequest::new(1, ActionKind::AllIn)))
        );
        assert_eq!(
            parse_command("act 3 raise 40"),
            Ok(Command::Act(PlayerActionRequest::raise(3, 40.0)))
        );
        assert_eq!(
            parse_command("act 3 raise"),
            Ok(Command::Act(PlayerActionRequest::new(3, ActionKind::Raise)))
        );
    }

    #[test]
    fn test_parse_act_errors() {
        assert!(matches!(
            parse_command("act"),
            Err(ParseError::MissingArgument { .. })
        ));
        assert_eq!(
            parse_command("act 1 dance"),
            Err(ParseError::InvalidAction("dance".to_string()))
        );
        assert_eq!(
            parse_command("act 1 raise -5"),
            Err(ParseError::InvalidNumber("-5".to_string()))
        );
    }

    #[test]
    fn test_parse_auto_speed() {
        assert_eq!(parse_command("auto"), Ok(Command::AutoPlay { speed: None }));
        assert_eq!(
            parse_command("auto 2.5"),
            Ok(Command::AutoPlay { speed: Some(2.5) })
        );
    }

    #[test]
    fn test_parse_account_commands() {
        assert_eq!(
            parse_command("login alice secret1"),
            Ok(Command::Login {
                username: "alice".to_string(),
                password: "secret1".to_string()
            })
        );
        assert_eq!(
            parse_command("register bob hunter22 Bobby"),
            Ok(Command::Register {
                username: "bob".to_string(),
                password: "hunter22".to_string(),
                nickname: Some("Bobby".to_string()),
            })
        );
        assert!(parse_command("login alice").is_err());
    }

    #[test]
    fn test_parse_player_lookups() {
        assert_eq!(parse_command("player 7"), Ok(Command::Player(7)));
        assert_eq!(parse_command("stats 7"), Ok(Command::Stats(7)));
        assert_eq!(parse_command("profile 7"), Ok(Command::Profile(7)));
        assert_eq!(
            parse_command("players 20 10"),
            Ok(Command::Players {
                skip: Some(20),
                limit: Some(10)
            })
        );
        assert_eq!(
            parse_command("games finished"),
            Ok(Command::Games {
                status: Some("finished".to_string())
            })
        );
    }

    #[test]
    fn test_parse_unrecognized() {
        assert_eq!(
            parse_command("shuffle"),
            Err(ParseError::UnrecognizedCommand("shuffle".to_string()))
        );
    }

    #[test]
    fn test_command_names_match_keywords() {
        for input in ["flop", "turn", "river", "step", "gamestats", "logout"] {
            assert_eq!(parse_command(input).unwrap().name(), input);
        }
    }

    #[test]
    fn test_error_messages() {
        let err = ParseError::InvalidNumber("x".to_string());
        assert!(err.to_string().contains("'x'"));
        let err = ParseError::UnrecognizedCommand("foo".to_string());
        assert!(err.to_string().contains("help"));
    }
}
