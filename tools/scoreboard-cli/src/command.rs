//! Command language of the interactive prompt
//!
//! One command per line, tokens split on whitespace. A target token that is
//! an integer addresses a player by rank, anything else by name.

use player_registry::PlayerRef;
use std::path::PathBuf;
use thiserror::Error;

/// A player addressed from the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Rank(usize),
    Name(String),
}

impl Target {
    /// Integers become ranks; negatives and integers too large to hold
    /// become the invalid rank 0
    pub fn parse(token: &str) -> Self {
        match token.parse::<i64>() {
            Ok(n) => Target::Rank(usize::try_from(n).unwrap_or(0)),
            Err(_) if is_integer(token) => Target::Rank(0),
            Err(_) => Target::Name(token.to_string()),
        }
    }

    pub fn as_player_ref(&self) -> PlayerRef<'_> {
        match self {
            Target::Rank(rank) => PlayerRef::Rank(*rank),
            Target::Name(name) => PlayerRef::Name(name),
        }
    }
}

/// A parsed command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Show the table, or write it to a file
    Print { file: Option<PathBuf> },
    ShowPlayer(Target),
    AddPlayer { name: Option<String>, score: i32 },
    RemovePlayer(Target),
    RemoveAll,
    RenamePlayer { target: Target, new_name: String },
    AddScore { target: Target, delta: i32 },
    ResetScore(Target),
    ResetAll,
    Win(Target),
    Loss(Target),
    SetShowMax(i64),
    SetMaxPlayers(i64),
    Save(Option<PathBuf>),
    LoadPlayers(PathBuf),
    LoadHistory(Option<PathBuf>),
    Help,
    Exit,
}

/// Errors produced while parsing a command line
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("Unknown command '{0}', type 'help' for available commands")]
    UnknownCommand(String),

    #[error("No such subcommand '{sub}' for '{command}'")]
    UnknownSubcommand { command: String, sub: String },

    #[error("Missing argument, usage: {0}")]
    MissingArgument(&'static str),

    #[error("Unexpected argument '{0}'")]
    UnexpectedArgument(String),

    #[error("Invalid number '{0}'")]
    InvalidNumber(String),
}

/// Command summary shown by `help`
pub const HELP: &[(&str, &str)] = &[
    ("print | scoreboard | show | score", "Show the scoreboard"),
    ("print file <path>", "Write the scoreboard to a file"),
    ("player <target>", "Show one player"),
    ("player add [name] [score]", "Add a player"),
    ("player remove <target|all>", "Remove a player, or everyone"),
    ("player rename <target> <name>", "Rename a player"),
    ("player reset <target>", "Reset a player's score"),
    ("score add <target> [delta]", "Add to a player's score (default 1)"),
    ("score reset <target|all>", "Reset one score, or all of them"),
    ("win <target> | loss <target>", "Add or take one point"),
    ("set show <n> | set max <n>", "Set how many players are shown, or the player limit"),
    ("save [path]", "Save players to a file"),
    ("load players <path>", "Add players from a file"),
    ("load history [path]", "Replace all players with a saved list"),
    ("help", "Show this help"),
    ("exit | quit", "Leave the scoreboard"),
];

impl Command {
    /// Parse one input line; blank lines yield `None`
    pub fn parse(line: &str) -> Result<Option<Command>, CommandError> {
        let mut args = Args::new(line);
        let Some(head) = args.next() else {
            return Ok(None);
        };

        let bare = args.is_empty();
        let command = match head {
            "print" | "scoreboard" | "show" | "score" if bare => {
                Command::Print { file: None }
            }
            "print" | "scoreboard" | "show" => match args.next() {
                Some("file") => {
                    Command::Print { file: Some(args.path("print file <path>")?) }
                }
                Some(sub) => return Err(unknown_sub(head, sub)),
                None => Command::Print { file: None },
            },
            "score" => parse_score(&mut args)?,
            "player" => parse_player(&mut args)?,
            "win" => Command::Win(args.target("win <target>")?),
            "loss" => Command::Loss(args.target("loss <target>")?),
            "set" => match args.next() {
                Some("show") => Command::SetShowMax(args.number("set show <n>")?),
                Some("max") => Command::SetMaxPlayers(args.number("set max <n>")?),
                Some(sub) => return Err(unknown_sub(head, sub)),
                None => return Err(CommandError::MissingArgument("set show|max <n>")),
            },
            "save" => Command::Save(args.optional_path()),
            "load" => match args.next() {
                Some("players") => Command::LoadPlayers(args.path("load players <path>")?),
                Some("history") => Command::LoadHistory(args.optional_path()),
                Some(sub) => return Err(unknown_sub(head, sub)),
                None => return Err(CommandError::MissingArgument("load players|history <path>")),
            },
            "help" => Command::Help,
            "exit" | "quit" => Command::Exit,
            other => return Err(CommandError::UnknownCommand(other.to_string())),
        };

        args.finish()?;
        Ok(Some(command))
    }
}

fn parse_player(args: &mut Args<'_>) -> Result<Command, CommandError> {
    let command = match args.next() {
        Some("add") => {
            let name = args.next().map(str::to_string);
            let score = args.optional_number()?.unwrap_or(0);
            Command::AddPlayer { name, score }
        }
        Some("remove") => match args.next() {
            Some("all") => Command::RemoveAll,
            Some(token) => Command::RemovePlayer(Target::parse(token)),
            None => return Err(CommandError::MissingArgument("player remove <target|all>")),
        },
        Some("rename") => {
            let target = args.target("player rename <target> <name>")?;
            let new_name = args
                .next()
                .ok_or(CommandError::MissingArgument("player rename <target> <name>"))?;
            Command::RenamePlayer { target, new_name: new_name.to_string() }
        }
        Some("reset") => Command::ResetScore(args.target("player reset <target>")?),
        Some(token) => Command::ShowPlayer(Target::parse(token)),
        None => return Err(CommandError::MissingArgument("player <target>")),
    };
    Ok(command)
}

fn parse_score(args: &mut Args<'_>) -> Result<Command, CommandError> {
    let command = match args.next() {
        Some("add") => {
            let target = args.target("score add <target> [delta]")?;
            let delta = args.optional_number()?.unwrap_or(1);
            Command::AddScore { target, delta }
        }
        Some("reset") => match args.next() {
            Some("all") => Command::ResetAll,
            Some(token) => Command::ResetScore(Target::parse(token)),
            None => return Err(CommandError::MissingArgument("score reset <target|all>")),
        },
        Some(sub) => return Err(unknown_sub("score", sub)),
        None => Command::Print { file: None },
    };
    Ok(command)
}

fn is_integer(token: &str) -> bool {
    let digits = token.strip_prefix(&['-', '+'][..]).unwrap_or(token);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

fn unknown_sub(command: &str, sub: &str) -> CommandError {
    CommandError::UnknownSubcommand { command: command.to_string(), sub: sub.to_string() }
}

/// Whitespace-separated tokens of one line
struct Args<'a> {
    tokens: std::iter::Peekable<std::str::SplitWhitespace<'a>>,
}

impl<'a> Args<'a> {
    fn new(line: &'a str) -> Self {
        Self { tokens: line.split_whitespace().peekable() }
    }

    fn next(&mut self) -> Option<&'a str> {
        self.tokens.next()
    }

    fn is_empty(&mut self) -> bool {
        self.tokens.peek().is_none()
    }

    fn target(&mut self, usage: &'static str) -> Result<Target, CommandError> {
        self.next().map(Target::parse).ok_or(CommandError::MissingArgument(usage))
    }

    fn path(&mut self, usage: &'static str) -> Result<PathBuf, CommandError> {
        self.next().map(PathBuf::from).ok_or(CommandError::MissingArgument(usage))
    }

    fn optional_path(&mut self) -> Option<PathBuf> {
        self.next().map(PathBuf::from)
    }

    fn number<T: std::str::FromStr>(&mut self, usage: &'static str) -> Result<T, CommandError> {
        self.optional_number()?.ok_or(CommandError::MissingArgument(usage))
    }

    fn optional_number<T: std::str::FromStr>(&mut self) -> Result<Option<T>, CommandError> {
        self.next()
            .map(|token| token.parse().map_err(|_| CommandError::InvalidNumber(token.to_string())))
            .transpose()
    }

    fn finish(&mut self) -> Result<(), CommandError> {
        match self.next() {
            Some(extra) => Err(CommandError::UnexpectedArgument(extra.to_string())),
            None => Ok(()),
        }
    }
}
