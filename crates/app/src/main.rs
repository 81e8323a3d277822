mod cli;
mod config;
mod logging;
mod response;

use std::path::Path;

use serde_json::{Value, json};
use tracing::{debug, info};

use services::{AppServices, Clock, ProgressError, ProgressSession};
use vocab_core::model::{PageRequest, Username, Vocabulary, exam_count};

use crate::cli::{ArgsError, Command, Invocation, PageArgs};
use crate::config::{Config, prepare_sqlite_file};
use crate::response::{Failure, message, success};

fn load_vocabulary(path: &Path) -> Result<Vocabulary, Failure> {
    let text = std::fs::read_to_string(path).map_err(|err| {
        Failure::new(
            format!("cannot read word list {}: {err}", path.display()),
            "VOCABULARY_UNAVAILABLE",
        )
    })?;
    let vocabulary = Vocabulary::parse(&text);
    info!(path = %path.display(), words = vocabulary.len(), "loaded word list");
    Ok(vocabulary)
}

fn page_request(args: PageArgs) -> Result<PageRequest, Failure> {
    PageRequest::new(args.page, args.page_size).map_err(|err| ProgressError::from(err).into())
}

fn current_user(config: &Config) -> Result<Option<Username>, Failure> {
    config
        .user
        .as_deref()
        .map(Username::parse)
        .transpose()
        .map_err(|err| Failure::new(err.to_string(), "INVALID_USERNAME"))
}

fn named_or_current(named: Option<String>, config: &Config) -> Result<String, Failure> {
    named
        .or_else(|| config.user.clone())
        .ok_or_else(|| ArgsError::MissingArgument { what: "username" }.into())
}

async fn run(config: Config, command: Command) -> Result<Value, Failure> {
    // Only new accounts need the word list; other commands work off stored documents.
    let vocabulary = if matches!(command, Command::Login { .. } | Command::Register { .. }) {
        load_vocabulary(&config.words_file)?
    } else {
        Vocabulary::default()
    };

    prepare_sqlite_file(&config.db_url)
        .map_err(|err| Failure::new(err.to_string(), "STORAGE_UNAVAILABLE"))?;
    let services = AppServices::new_sqlite(&config.db_url, vocabulary, Clock::default_clock()).await?;
    debug!(db = %config.db_url, "storage ready");

    if command.needs_session() {
        let mut session = services.progress().session();
        if let Some(user) = config.user.as_deref() {
            session.set_active_user(user).await?;
        }
        return run_session(&mut session, command).await;
    }

    let accounts = services.accounts();
    let current = current_user(&config)?;
    match command {
        Command::Login { username } => {
            let name = named_or_current(username, &config)?;
            success(&accounts.login(&name).await?)
        }
        Command::Register { username } => {
            let name = named_or_current(username, &config)?;
            let username = accounts.register(&name).await?;
            Ok(json!({
                "success": true,
                "username": username,
                "message": format!("user {username} registered"),
            }))
        }
        Command::Users => success(&accounts.list_users(current.as_ref()).await?),
        Command::DeleteUser { username } => {
            let deleted = accounts.delete_user(&username, current.as_ref()).await?;
            Ok(json!({
                "success": true,
                "username": deleted,
                "message": format!("user {deleted} deleted"),
            }))
        }
        Command::UserStats { username } => {
            let name = named_or_current(username, &config)?;
            success(&accounts.user_stats(&name).await?)
        }
        _ => Err(Failure::new("command requires an active user", "INVALID_COMMAND")),
    }
}

async fn run_session(session: &mut ProgressSession, command: Command) -> Result<Value, Failure> {
    match command {
        Command::Learn(args) => success(&session.learn_page(page_request(args)?).await?),
        Command::Review(args) => success(&session.review_page(page_request(args)?).await?),
        Command::ReviewAll => success(&session.all_review_words()?),
        Command::Exam { count } => {
            let count = exam_count(count).map_err(ProgressError::from)?;
            success(&session.exam_words(count)?)
        }
        Command::Mistakes { words } => success(&session.update_mistakes_batch(&words).await?),
        Command::Correct { words } => success(&session.update_correct_batch(&words).await?),
        Command::Stats => success(&session.stats()?),
        Command::Reset {
            reset_mistakes,
            reset_position,
        } => success(&session.reset_progress(reset_mistakes, reset_position).await?),
        Command::RecordSession {
            kind,
            words_count,
            correct_count,
            duration_secs,
        } => {
            session
                .record_learning_session(kind, words_count, correct_count, duration_secs)
                .await?;
            Ok(message("learning session recorded"))
        }
        Command::History => success(session.learning_history()?),
        Command::SetLearnPosition(position) => {
            session.set_learn_position(position).await?;
            Ok(json!({ "success": true, "last_learn_position": position }))
        }
        Command::SetReviewPosition(position) => {
            session.set_review_position(position).await?;
            Ok(json!({ "success": true, "last_review_position": position }))
        }
        _ => Err(Failure::new("command does not use a session", "INVALID_COMMAND")),
    }
}

fn emit(value: &Value) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{text}"),
        Err(err) => eprintln!("failed to encode response: {err}"),
    }
}

#[tokio::main]
async fn main() {
    logging::init_tracing();

    let invocation = match cli::parse(Config::from_env(), std::env::args().skip(1)) {
        Ok(invocation) => invocation,
        Err(err) => {
            emit(&Failure::from(err).to_json());
            cli::print_usage();
            std::process::exit(2);
        }
    };

    let (config, command) = match invocation {
        Invocation::Help => {
            cli::print_usage();
            return;
        }
        Invocation::Run { config, command } => (config, command),
    };

    match run(config, command).await {
        Ok(value) => emit(&value),
        Err(failure) => {
            emit(&failure.to_json());
            std::process::exit(1);
        }
    }
}
