//! SQLite implementation of [`MessageLog`].

use async_trait::async_trait;
use chrono::NaiveDateTime;
use sqlx::{Row, SqlitePool};
use tracing::{debug, info};

use capnote_core::{Error, IncomingMessage, MemoRecord, MessageLog, NoteRecord, Result};

/// Row counts per table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LogCounts {
    pub messages: i64,
    pub memos: i64,
    pub notes: i64,
}

/// A row of the `messages` table.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredMessage {
    pub id: i64,
    pub sender_id: String,
    pub sender_name: String,
    pub message: String,
    pub message_chain: String,
    pub timestamp: i64,
    pub platform: String,
    pub created_at: NaiveDateTime,
}

/// A row of the `notes` table.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredNote {
    pub id: i64,
    pub record: NoteRecord,
    pub created_at: NaiveDateTime,
}

pub struct SqliteMessageLog {
    pool: SqlitePool,
}

impl SqliteMessageLog {
    /// Wrap an already-migrated pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn counts(&self) -> Result<LogCounts> {
        let row = sqlx::query(
            r#"
            SELECT
                (SELECT COUNT(*) FROM messages) AS messages,
                (SELECT COUNT(*) FROM memos) AS memos,
                (SELECT COUNT(*) FROM notes) AS notes
            "#,
        )
        .fetch_one(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(LogCounts {
            messages: row.get("messages"),
            memos: row.get("memos"),
            notes: row.get("notes"),
        })
    }

    /// Newest messages first.
    pub async fn recent_messages(&self, limit: i64) -> Result<Vec<StoredMessage>> {
        let rows = sqlx::query(
            r#"
            SELECT id, sender_id, sender_name, message, message_chain, timestamp, platform, created_at
            FROM messages
            ORDER BY id DESC
            LIMIT ?
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(rows
            .into_iter()
            .map(|row| StoredMessage {
                id: row.get("id"),
                sender_id: row.get("sender_id"),
                sender_name: row.get("sender_name"),
                message: row.get("message"),
                message_chain: row.get("message_chain"),
                timestamp: row.get("timestamp"),
                platform: row.get("platform"),
                created_at: row.get("created_at"),
            })
            .collect())
    }

    /// Newest memos first.
    pub async fn recent_memos(&self, limit: i64) -> Result<Vec<MemoRecord>> {
        let rows = sqlx::query(
            "SELECT sender_id, sender_name, content, timestamp FROM memos ORDER BY id DESC LIMIT ?",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(rows
            .into_iter()
            .map(|row| MemoRecord {
                sender_id: row.get("sender_id"),
                sender_name: row.get("sender_name"),
                content: row.get("content"),
                timestamp: row.get("timestamp"),
            })
            .collect())
    }

    /// Newest note records first.
    pub async fn recent_notes(&self, limit: i64) -> Result<Vec<StoredNote>> {
        let rows = sqlx::query(
            "SELECT id, title, content, url, message_id, created_at FROM notes ORDER BY id DESC LIMIT ?",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(rows
            .into_iter()
            .map(|row| StoredNote {
                id: row.get("id"),
                record: NoteRecord {
                    title: row.get("title"),
                    content: row.get("content"),
                    url: row.get("url"),
                    message_id: row.get("message_id"),
                },
                created_at: row.get("created_at"),
            })
            .collect())
    }
}

#[async_trait]
impl MessageLog for SqliteMessageLog {
    async fn save_message(&self, message: &IncomingMessage) -> Result<i64> {
        let id = sqlx::query(
            r#"
            INSERT INTO messages (sender_id, sender_name, message, message_chain, timestamp, platform)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&message.sender_id)
        .bind(&message.sender_name)
        .bind(&message.text)
        .bind(message.chain.to_storage_text())
        .bind(message.timestamp)
        .bind(&message.platform)
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?
        .last_insert_rowid();

        debug!(subsystem = "db", component = "log", op = "save_message", message_id = id, "Message logged");
        Ok(id)
    }

    async fn save_memo(&self, memo: &MemoRecord) -> Result<i64> {
        let id = sqlx::query(
            "INSERT INTO memos (sender_id, sender_name, content, timestamp) VALUES (?, ?, ?, ?)",
        )
        .bind(&memo.sender_id)
        .bind(&memo.sender_name)
        .bind(&memo.content)
        .bind(memo.timestamp)
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?
        .last_insert_rowid();

        debug!(subsystem = "db", component = "log", op = "save_memo", memo_id = id, "Memo logged");
        Ok(id)
    }

    async fn save_note_record(&self, record: &NoteRecord) -> Result<i64> {
        let id = sqlx::query("INSERT INTO notes (title, content, url, message_id) VALUES (?, ?, ?, ?)")
            .bind(&record.title)
            .bind(&record.content)
            .bind(&record.url)
            .bind(record.message_id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?
            .last_insert_rowid();

        debug!(subsystem = "db", component = "log", op = "save_note_record", record_id = id, "Note recorded");
        Ok(id)
    }

    /// Close the pool, waiting for in-flight statements.
    async fn close(&self) {
        self.pool.close().await;
        info!(subsystem = "db", component = "log", op = "close", "Message log closed");
    }
}
