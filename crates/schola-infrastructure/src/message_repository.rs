//! DirStorage-based MessageRepository implementation.

use crate::dir_storage::DirStorage;
use crate::paths::{Collection, ScholaPaths};
use anyhow::Result;
use async_trait::async_trait;
use schola_core::message::{AppMessage, MessageRepository};
use std::path::Path;

pub struct DirMessageRepository {
    storage: DirStorage,
}

impl DirMessageRepository {
    const ENTITY_NAME: &'static str = "message";

    pub async fn new(base_dir: Option<&Path>) -> Result<Self> {
        let paths = ScholaPaths::new(base_dir);
        let storage = paths.open_storage(Collection::Messages).await?;
        Ok(Self { storage })
    }
}

#[async_trait]
impl MessageRepository for DirMessageRepository {
    async fn send(&self, message: &AppMessage) -> Result<()> {
        self.storage
            .save(Self::ENTITY_NAME, &message.id, message)
            .await
            .map_err(Into::into)
    }

    async fn list_for(&self, receiver_id: &str) -> Result<Vec<AppMessage>> {
        let all: Vec<(String, AppMessage)> = self.storage.load_all(Self::ENTITY_NAME).await?;
        let mut messages: Vec<AppMessage> = all
            .into_iter()
            .map(|(_, message)| message)
            .filter(|message| message.receiver_id == receiver_id)
            .collect();
        messages.sort_by(|a, b| b.sent_at.cmp(&a.sent_at));
        Ok(messages)
    }

    async fn mark_read(&self, message_id: &str) -> Result<()> {
        let mut message: AppMessage = self.storage.load(Self::ENTITY_NAME, message_id).await?;
        message.read = true;
        self.send(&message).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use schola_core::message::MessageKind;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_send_list_mark_read() {
        let temp_dir = TempDir::new().unwrap();
        let repo = DirMessageRepository::new(Some(temp_dir.path())).await.unwrap();

        let message = AppMessage::new("admin-1", "u-1", MessageKind::Direct, "Hola");
        repo.send(&message).await.unwrap();
        repo.send(&AppMessage::new("admin-1", "u-2", MessageKind::Direct, "Otra"))
            .await
            .unwrap();

        let inbox = repo.list_for("u-1").await.unwrap();
        assert_eq!(inbox.len(), 1);
        assert!(!inbox[0].read);

        repo.mark_read(&message.id).await.unwrap();
        let inbox = repo.list_for("u-1").await.unwrap();
        assert!(inbox[0].read);
    }
}
