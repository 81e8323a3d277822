//! Runtime configuration: built-in defaults, then environment, then flags.

use std::path::{Path, PathBuf};

use crate::cli::ArgsError;

pub const DEFAULT_DB_URL: &str = "sqlite://vocab.sqlite3";
pub const DEFAULT_WORDS_FILE: &str = "data/words.txt";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub db_url: String,
    pub words_file: PathBuf,
    pub user: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_url: DEFAULT_DB_URL.to_string(),
            words_file: PathBuf::from(DEFAULT_WORDS_FILE),
            user: None,
        }
    }
}

impl Config {
    /// Defaults overlaid with `VOCAB_DB_URL`, `VOCAB_WORDS_FILE` and `VOCAB_USER`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        Self {
            db_url: non_empty("VOCAB_DB_URL").map_or(defaults.db_url, normalize_sqlite_url),
            words_file: non_empty("VOCAB_WORDS_FILE").map_or(defaults.words_file, PathBuf::from),
            user: non_empty("VOCAB_USER"),
        }
    }

    /// Apply one global flag. Returns `Ok(false)` if `flag` is not a global flag.
    pub fn apply_flag(
        &mut self,
        flag: &str,
        args: &mut impl Iterator<Item = String>,
    ) -> Result<bool, ArgsError> {
        match flag {
            "--db" => {
                let value = crate::cli::require_value(args, "--db")?;
                if value.trim().is_empty() {
                    return Err(ArgsError::InvalidDbUrl { raw: value });
                }
                self.db_url = normalize_sqlite_url(value);
            }
            "--words" => {
                self.words_file = PathBuf::from(crate::cli::require_value(args, "--words")?);
            }
            "--user" => {
                let value = crate::cli::require_value(args, "--user")?;
                self.user = Some(value);
            }
            _ => return Ok(false),
        }
        Ok(true)
    }
}

/// Turn a bare or `sqlite:`-prefixed path into an absolute `sqlite://` URL.
pub fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") || raw.starts_with("sqlite:file:") {
        return raw;
    }

    let trimmed = raw.trim();
    let path_str = trimmed.strip_prefix("sqlite:").unwrap_or(trimmed);
    let path = Path::new(path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

/// Make sure the database file and its parent directory exist before sqlx opens it.
pub fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" || db_url.starts_with("sqlite:file:") {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }
    Ok(())
}
