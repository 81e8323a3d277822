//! Hand-rolled argument parsing for the `vocab` binary.

use std::fmt;

use services::SessionKind;
use vocab_core::model::{DEFAULT_EXAM_COUNT, DEFAULT_PAGE_SIZE};

use crate::config::Config;

#[derive(Debug)]
pub enum ArgsError {
    MissingValue { flag: &'static str },
    MissingArgument { what: &'static str },
    UnknownArg(String),
    UnknownCommand(String),
    InvalidNumber { flag: &'static str, raw: String },
    InvalidSessionKind(String),
    InvalidDbUrl { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::MissingArgument { what } => write!(f, "missing {what}"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::UnknownCommand(cmd) => write!(f, "unknown command: {cmd}"),
            ArgsError::InvalidNumber { flag, raw } => write!(f, "invalid {flag} value: {raw}"),
            ArgsError::InvalidSessionKind(raw) => write!(f, "invalid session type: {raw}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

pub fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn require_number<T: std::str::FromStr>(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<T, ArgsError> {
    let raw = require_value(args, flag)?;
    raw.parse()
        .map_err(|_| ArgsError::InvalidNumber { flag, raw: raw.clone() })
}

/// Raw paging input. Range checks are left to `PageRequest` so that bad
/// values come back as engine errors in the JSON envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageArgs {
    pub page: i64,
    pub page_size: i64,
}

impl Default for PageArgs {
    fn default() -> Self {
        Self {
            page: 0,
            page_size: DEFAULT_PAGE_SIZE as i64,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Login { username: Option<String> },
    Register { username: Option<String> },
    Users,
    DeleteUser { username: String },
    UserStats { username: Option<String> },
    Learn(PageArgs),
    Review(PageArgs),
    ReviewAll,
    Exam { count: i64 },
    Mistakes { words: Vec<String> },
    Correct { words: Vec<String> },
    Stats,
    Reset { reset_mistakes: bool, reset_position: bool },
    RecordSession {
        kind: SessionKind,
        words_count: usize,
        correct_count: usize,
        duration_secs: u64,
    },
    History,
    SetLearnPosition(usize),
    SetReviewPosition(usize),
}

impl Command {
    /// Whether the command runs against the active user's bound document.
    pub fn needs_session(&self) -> bool {
        !matches!(
            self,
            Command::Login { .. }
                | Command::Register { .. }
                | Command::Users
                | Command::DeleteUser { .. }
                | Command::UserStats { .. }
        )
    }
}

#[derive(Debug)]
pub enum Invocation {
    Help,
    Run { config: Config, command: Command },
}

pub fn print_usage() {
    eprintln!("Usage: vocab [--db <sqlite_url>] [--words <file>] [--user <name>] <command>");
    eprintln!();
    eprintln!("Accounts:");
    eprintln!("  login [name]            log in, creating the user on first use");
    eprintln!("  register [name]         create a new user");
    eprintln!("  users                   list stored users");
    eprintln!("  delete-user <name>      delete a user other than --user");
    eprintln!("  user-stats [name]       summary counters for a user");
    eprintln!();
    eprintln!("Progress (requires --user):");
    eprintln!("  learn  [--page N] [--page-size N]   page 0 resumes at the stored cursor");
    eprintln!("  review [--page N] [--page-size N]");
    eprintln!("  review-all");
    eprintln!("  exam [--count N]");
    eprintln!("  mistakes <word>...      record wrong answers");
    eprintln!("  correct <word>...       record right answers");
    eprintln!("  stats");
    eprintln!("  reset [--mistakes] [--keep-position]");
    eprintln!("  record-session <learn|exam|review> <words> <correct> <seconds>");
    eprintln!("  history");
    eprintln!("  set-learn-position <N>");
    eprintln!("  set-review-position <N>");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  VOCAB_DB_URL, VOCAB_WORDS_FILE, VOCAB_USER, RUST_LOG");
}

/// Parse the process arguments over a config already seeded from the environment.
pub fn parse(
    mut config: Config,
    argv: impl IntoIterator<Item = String>,
) -> Result<Invocation, ArgsError> {
    let mut args = argv.into_iter();
    let mut rest = Vec::new();

    // Global flags may appear anywhere; everything else belongs to the command.
    while let Some(arg) = args.next() {
        if matches!(arg.as_str(), "--help" | "-h") {
            return Ok(Invocation::Help);
        }
        if !config.apply_flag(&arg, &mut args)? {
            rest.push(arg);
        }
    }

    let mut rest = rest.into_iter();
    let Some(name) = rest.next() else {
        return Ok(Invocation::Help);
    };
    let command = parse_command(&name, &mut rest)?;
    if let Some(extra) = rest.next() {
        return Err(ArgsError::UnknownArg(extra));
    }
    Ok(Invocation::Run { config, command })
}

fn parse_command(
    name: &str,
    args: &mut impl Iterator<Item = String>,
) -> Result<Command, ArgsError> {
    let command = match name {
        "login" => Command::Login {
            username: args.next(),
        },
        "register" => Command::Register {
            username: args.next(),
        },
        "users" => Command::Users,
        "delete-user" => Command::DeleteUser {
            username: args.next().ok_or(ArgsError::MissingArgument {
                what: "username to delete",
            })?,
        },
        "user-stats" => Command::UserStats {
            username: args.next(),
        },
        "learn" => Command::Learn(parse_page_args(args)?),
        "review" => Command::Review(parse_page_args(args)?),
        "review-all" => Command::ReviewAll,
        "exam" => {
            let mut count = DEFAULT_EXAM_COUNT as i64;
            while let Some(arg) = args.next() {
                match arg.as_str() {
                    "--count" => count = require_number(args, "--count")?,
                    _ => return Err(ArgsError::UnknownArg(arg)),
                }
            }
            Command::Exam { count }
        }
        "mistakes" => Command::Mistakes {
            words: args.collect(),
        },
        "correct" => Command::Correct {
            words: args.collect(),
        },
        "stats" => Command::Stats,
        "reset" => {
            let mut reset_mistakes = false;
            let mut reset_position = true;
            for arg in args.by_ref() {
                match arg.as_str() {
                    "--mistakes" => reset_mistakes = true,
                    "--keep-position" => reset_position = false,
                    _ => return Err(ArgsError::UnknownArg(arg)),
                }
            }
            Command::Reset {
                reset_mistakes,
                reset_position,
            }
        }
        "record-session" => {
            let raw_kind = args.next().ok_or(ArgsError::MissingArgument {
                what: "session type",
            })?;
            let kind = raw_kind
                .parse()
                .map_err(|_| ArgsError::InvalidSessionKind(raw_kind.clone()))?;
            Command::RecordSession {
                kind,
                words_count: require_number(args, "words count")?,
                correct_count: require_number(args, "correct count")?,
                duration_secs: require_number(args, "duration")?,
            }
        }
        "history" => Command::History,
        "set-learn-position" => Command::SetLearnPosition(require_number(args, "position")?),
        "set-review-position" => Command::SetReviewPosition(require_number(args, "position")?),
        other => return Err(ArgsError::UnknownCommand(other.to_string())),
    };
    Ok(command)
}

fn parse_page_args(args: &mut impl Iterator<Item = String>) -> Result<PageArgs, ArgsError> {
    let mut page_args = PageArgs::default();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--page" => page_args.page = require_number(args, "--page")?,
            "--page-size" => page_args.page_size = require_number(args, "--page-size")?,
            _ => return Err(ArgsError::UnknownArg(arg)),
        }
    }
    Ok(page_args)
}
