//! # capnote-db
//!
//! SQLite audit log for capnote: every incoming message, every plain-text
//! memo and every note that reached a remote service.
//!
//! ## Example
//!
//! ```rust,ignore
//! use capnote_db::{Database, MessageLog, IncomingMessage};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("sqlite://capnote.db?mode=rwc").await?;
//!     let id = db.log.save_message(&IncomingMessage::default()).await?;
//!     println!("Logged message {}", id);
//!     db.close().await;
//!     Ok(())
//! }
//! ```

pub mod log;
pub mod pool;

// Re-export core types
pub use capnote_core::*;

pub use log::{LogCounts, SqliteMessageLog, StoredMessage, StoredNote};
pub use pool::{create_pool, create_pool_with_config, migrate, PoolConfig};

/// Open connection pool plus the repositories built on it.
pub struct Database {
    pub log: SqliteMessageLog,
}

impl Database {
    pub async fn connect(url: &str) -> Result<Self> {
        Self::connect_with_config(url, PoolConfig::for_url(url)).await
    }

    pub async fn connect_with_config(url: &str, config: PoolConfig) -> Result<Self> {
        let pool = create_pool_with_config(url, config).await?;
        Ok(Self {
            log: SqliteMessageLog::new(pool),
        })
    }

    /// Fresh, migrated in-memory database.
    pub async fn in_memory() -> Result<Self> {
        Self::connect_with_config("sqlite::memory:", PoolConfig::in_memory()).await
    }

    pub async fn close(&self) {
        self.log.close().await;
    }
}
