use sqlx::Row;
use vocab_core::model::{UserDocument, Username};

use crate::repository::{StorageError, UserSummaryRecord};

fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

pub(crate) fn encode_document(doc: &UserDocument) -> Result<String, StorageError> {
    serde_json::to_string(doc).map_err(ser)
}

/// Decode a stored document, rejecting rows whose embedded username does not
/// match the key they were stored under.
pub(crate) fn decode_document(key: &Username, raw: &str) -> Result<UserDocument, StorageError> {
    let doc: UserDocument = serde_json::from_str(raw).map_err(ser)?;
    if doc.username() != key {
        return Err(StorageError::Serialization(format!(
            "document stored under {key} belongs to {}",
            doc.username()
        )));
    }
    Ok(doc)
}

pub(crate) fn map_summary_row(
    row: &sqlx::sqlite::SqliteRow,
) -> Result<UserSummaryRecord, StorageError> {
    let username = Username::parse(row.try_get::<String, _>("username").map_err(ser)?)
        .map_err(ser)?;
    Ok(UserSummaryRecord {
        username,
        created_at: row.try_get("created_at").map_err(ser)?,
        last_login: row.try_get("last_login").map_err(ser)?,
    })
}
