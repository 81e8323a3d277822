use async_trait::async_trait;
use chrono::Utc;
use sqlx::Row;
use tracing::debug;
use vocab_core::model::{UserDocument, Username};

use super::SqliteRepository;
use super::mapping::{decode_document, encode_document, map_summary_row};
use crate::repository::{StorageError, UserDocumentRepository, UserSummaryRecord};

fn conn(e: sqlx::Error) -> StorageError {
    StorageError::Connection(e.to_string())
}

#[async_trait]
impl UserDocumentRepository for SqliteRepository {
    async fn load_document(&self, username: &Username) -> Result<UserDocument, StorageError> {
        let row = sqlx::query("SELECT document FROM user_documents WHERE username = ?1")
            .bind(username.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(conn)?;

        let Some(row) = row else {
            return Err(StorageError::NotFound);
        };
        let raw: String = row
            .try_get("document")
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        decode_document(username, &raw)
    }

    async fn save_document(&self, document: &UserDocument) -> Result<(), StorageError> {
        let raw = encode_document(document)?;
        let info = document.user_info();

        // Single statement: either the new document lands or the old row stays.
        sqlx::query(
            r"
            INSERT INTO user_documents (username, document, created_at, last_login, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(username) DO UPDATE SET
                document = excluded.document,
                created_at = excluded.created_at,
                last_login = excluded.last_login,
                updated_at = excluded.updated_at
            ",
        )
        .bind(document.username().as_str())
        .bind(raw)
        .bind(info.created_at)
        .bind(info.last_login)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(conn)?;

        debug!(user = %document.username(), words = document.word_count(), "saved user document");
        Ok(())
    }

    async fn insert_new_document(&self, document: &UserDocument) -> Result<(), StorageError> {
        let raw = encode_document(document)?;
        let info = document.user_info();

        let res = sqlx::query(
            r"
            INSERT INTO user_documents (username, document, created_at, last_login, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(username) DO NOTHING
            ",
        )
        .bind(document.username().as_str())
        .bind(raw)
        .bind(info.created_at)
        .bind(info.last_login)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(conn)?;

        if res.rows_affected() == 0 {
            return Err(StorageError::Conflict);
        }
        Ok(())
    }

    async fn document_exists(&self, username: &Username) -> Result<bool, StorageError> {
        let row = sqlx::query("SELECT 1 FROM user_documents WHERE username = ?1")
            .bind(username.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(conn)?;
        Ok(row.is_some())
    }

    async fn list_users(&self) -> Result<Vec<UserSummaryRecord>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT username, created_at, last_login
            FROM user_documents
            ORDER BY last_login DESC, username ASC
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;

        let mut users = Vec::with_capacity(rows.len());
        for row in rows {
            users.push(map_summary_row(&row)?);
        }
        Ok(users)
    }

    async fn delete_document(&self, username: &Username) -> Result<(), StorageError> {
        let res = sqlx::query("DELETE FROM user_documents WHERE username = ?1")
            .bind(username.as_str())
            .execute(&self.pool)
            .await
            .map_err(conn)?;

        if res.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }
}
