//! In-app messages exchanged through the backing store.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kind of an in-app message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageKind {
    Direct,
    Announcement,
    System,
}

/// A message record. Lifecycle is create-then-list; the only mutation is
/// the read flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppMessage {
    pub id: String,
    pub sender_id: String,
    pub receiver_id: String,
    pub kind: MessageKind,
    pub body: String,
    #[serde(default)]
    pub read: bool,
    pub sent_at: DateTime<Utc>,
}

impl AppMessage {
    /// Creates an unread message stamped with the current time.
    pub fn new(
        sender_id: impl Into<String>,
        receiver_id: impl Into<String>,
        kind: MessageKind,
        body: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            sender_id: sender_id.into(),
            receiver_id: receiver_id.into(),
            kind,
            body: body.into(),
            read: false,
            sent_at: Utc::now(),
        }
    }
}

/// Repository for in-app messages.
#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Stores a message.
    async fn send(&self, message: &AppMessage) -> Result<()>;

    /// Lists messages addressed to a user, most recent first.
    async fn list_for(&self, receiver_id: &str) -> Result<Vec<AppMessage>>;

    /// Marks a message as read.
    async fn mark_read(&self, message_id: &str) -> Result<()>;
}
