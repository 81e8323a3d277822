//! JSON envelope written to stdout for every command.

use serde::Serialize;
use serde_json::{Map, Value, json};

use services::{AccountError, AppServicesError, ProgressError};
use storage::repository::StorageError;

use crate::cli::ArgsError;

/// A failed command: the message plus a stable machine-readable code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub message: String,
    pub code: &'static str,
}

impl Failure {
    pub fn new(message: impl Into<String>, code: &'static str) -> Self {
        Self {
            message: message.into(),
            code,
        }
    }

    pub fn to_json(&self) -> Value {
        json!({
            "success": false,
            "error": self.message,
            "code": self.code,
        })
    }
}

fn storage_code(err: &StorageError) -> &'static str {
    match err {
        StorageError::NotFound => "USER_NOT_FOUND",
        StorageError::Conflict => "USER_EXISTS",
        _ => "STORAGE_UNAVAILABLE",
    }
}

impl From<ProgressError> for Failure {
    fn from(err: ProgressError) -> Self {
        let code = match &err {
            ProgressError::NoActiveUser => "NO_ACTIVE_USER",
            ProgressError::UnknownUser(_) => "USER_NOT_FOUND",
            ProgressError::InvalidArgument(_) => "INVALID_ARGUMENT",
            ProgressError::InvalidUsername(_) => "INVALID_USERNAME",
            ProgressError::Storage(inner) => storage_code(inner),
            _ => "INTERNAL_ERROR",
        };
        Self::new(err.to_string(), code)
    }
}

impl From<AccountError> for Failure {
    fn from(err: AccountError) -> Self {
        let code = match &err {
            AccountError::InvalidUsername(_) => "INVALID_USERNAME",
            AccountError::AlreadyExists(_) => "USER_EXISTS",
            AccountError::UnknownUser(_) => "USER_NOT_FOUND",
            AccountError::UserActive(_) => "USER_ACTIVE",
            AccountError::Storage(inner) => storage_code(inner),
            _ => "INTERNAL_ERROR",
        };
        Self::new(err.to_string(), code)
    }
}

impl From<AppServicesError> for Failure {
    fn from(err: AppServicesError) -> Self {
        Self::new(err.to_string(), "STORAGE_UNAVAILABLE")
    }
}

impl From<ArgsError> for Failure {
    fn from(err: ArgsError) -> Self {
        Self::new(err.to_string(), "INVALID_COMMAND")
    }
}

/// Wrap a payload as `{"success": true, ...payload}`.
///
/// Object payloads are flattened into the envelope; anything else lands
/// under `"data"`.
pub fn success<T: Serialize>(payload: &T) -> Result<Value, Failure> {
    let value = serde_json::to_value(payload)
        .map_err(|err| Failure::new(err.to_string(), "INTERNAL_ERROR"))?;
    let mut envelope = Map::new();
    envelope.insert("success".into(), Value::Bool(true));
    match value {
        Value::Object(fields) => envelope.extend(fields),
        Value::Null => {}
        other => {
            envelope.insert("data".into(), other);
        }
    }
    Ok(Value::Object(envelope))
}

/// A success envelope carrying only a message.
pub fn message(text: &str) -> Value {
    json!({ "success": true, "message": text })
}

#[cfg(test)]
mod tests {
    use super::*;
    use vocab_core::model::{PageRequest, Username};

    #[derive(Serialize)]
    struct Page {
        words: Vec<&'static str>,
        #[serde(rename = "totalPages")]
        total_pages: usize,
    }

    #[test]
    fn success_flattens_object_payloads() {
        let value = success(&Page {
            words: vec!["apple"],
            total_pages: 1,
        })
        .unwrap();
        assert_eq!(
            value,
            json!({"success": true, "words": ["apple"], "totalPages": 1})
        );
        assert_eq!(success(&3).unwrap(), json!({"success": true, "data": 3}));
        assert_eq!(success(&()).unwrap(), json!({"success": true}));
    }

    #[test]
    fn engine_errors_map_to_codes() {
        let failure = Failure::from(ProgressError::NoActiveUser);
        assert_eq!(
            failure.to_json(),
            json!({"success": false, "error": "no user data loaded", "code": "NO_ACTIVE_USER"})
        );

        let bad_page = PageRequest::new(-1, 10).unwrap_err();
        assert_eq!(
            Failure::from(ProgressError::from(bad_page)).code,
            "INVALID_ARGUMENT"
        );
        assert_eq!(
            Failure::from(ProgressError::Storage(StorageError::Serialization("bad".into()))).code,
            "STORAGE_UNAVAILABLE"
        );
    }

    #[test]
    fn account_errors_map_to_codes() {
        let alice = Username::parse("alice").unwrap();
        assert_eq!(
            Failure::from(AccountError::UserActive(alice.clone())).code,
            "USER_ACTIVE"
        );
        assert_eq!(
            Failure::from(AccountError::AlreadyExists(alice)).code,
            "USER_EXISTS"
        );
    }
}
