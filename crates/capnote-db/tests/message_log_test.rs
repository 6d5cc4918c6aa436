//! Message log against in-memory and file-backed SQLite.

use capnote_db::{
    Database, IncomingMessage, MemoRecord, MessageChain, MessageLog, NoteRecord, PoolConfig,
};
use serde_json::json;

fn message(text: &str) -> IncomingMessage {
    IncomingMessage {
        sender_id: "wxid_alice".to_string(),
        sender_name: "Alice".to_string(),
        text: text.to_string(),
        chain: MessageChain(json!([{"type": "Plain", "text": text}])),
        timestamp: 1_700_000_000_000,
        platform: "wechat".to_string(),
        is_admin: true,
    }
}

#[tokio::test]
async fn test_save_message_round_trip() {
    let db = Database::in_memory().await.unwrap();

    let first = db.log.save_message(&message("hello")).await.unwrap();
    let second = db.log.save_message(&message("again")).await.unwrap();
    assert!(second > first);

    let rows = db.log.recent_messages(10).await.unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].message, "again");
    assert_eq!(rows[1].id, first);
    assert_eq!(rows[1].sender_name, "Alice");
    assert_eq!(rows[1].platform, "wechat");
    assert_eq!(rows[1].timestamp, 1_700_000_000_000);

    let chain: serde_json::Value = serde_json::from_str(&rows[1].message_chain).unwrap();
    assert_eq!(chain, json!([{"type": "Plain", "text": "hello"}]));
}

#[tokio::test]
async fn test_empty_chain_stored_as_empty_string() {
    let db = Database::in_memory().await.unwrap();
    let msg = IncomingMessage {
        text: "no chain".to_string(),
        ..Default::default()
    };
    db.log.save_message(&msg).await.unwrap();

    let rows = db.log.recent_messages(1).await.unwrap();
    assert_eq!(rows[0].message_chain, "");
}

#[tokio::test]
async fn test_memo_and_note_records() {
    let db = Database::in_memory().await.unwrap();
    let message_id = db.log.save_message(&message("remember milk")).await.unwrap();

    db.log
        .save_memo(&MemoRecord::from(&message("remember milk")))
        .await
        .unwrap();
    db.log
        .save_note_record(&NoteRecord {
            title: "remember milk".to_string(),
            content: "remember milk".to_string(),
            url: None,
            message_id: Some(message_id),
        })
        .await
        .unwrap();

    let counts = db.log.counts().await.unwrap();
    assert_eq!((counts.messages, counts.memos, counts.notes), (1, 1, 1));

    let memos = db.log.recent_memos(5).await.unwrap();
    assert_eq!(memos[0].content, "remember milk");

    let notes = db.log.recent_notes(5).await.unwrap();
    assert_eq!(notes[0].record.message_id, Some(message_id));
    assert!(notes[0].record.url.is_none());
}

#[tokio::test]
async fn test_file_database_persists_across_connections() {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}?mode=rwc", dir.path().join("log.db").display());

    {
        let db = Database::connect(&url).await.unwrap();
        db.log.save_message(&message("persisted")).await.unwrap();
        db.close().await;
    }

    let db = Database::connect_with_config(&url, PoolConfig::new().max_connections(1))
        .await
        .unwrap();
    let rows = db.log.recent_messages(1).await.unwrap();
    assert_eq!(rows[0].message, "persisted");
}

#[tokio::test]
async fn test_write_after_close_fails() {
    let db = Database::in_memory().await.unwrap();
    db.close().await;
    assert!(db.log.save_message(&message("late")).await.is_err());
}
