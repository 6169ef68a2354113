//! 内存存储实现。
//!
//! 与持久化端口同形的进程内实现，测试和无数据库环境使用。

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};

use async_trait::async_trait;
use domain::{Chat, ChatId, Message, MessageId, NewMessage, RepositoryError, RoomName};
use tokio::sync::RwLock;

use crate::repository::{ChatRepository, MessageRepository};

#[derive(Default)]
pub struct MemoryChatRepository {
    chats: RwLock<HashMap<RoomName, Chat>>,
    next_id: AtomicI64,
}

impl MemoryChatRepository {
    pub fn new() -> Self {
        Self {
            chats: RwLock::new(HashMap::new()),
            next_id: AtomicI64::new(1),
        }
    }

    /// 移除一个房间记录，用于模拟房间在连接存续期间消失。
    pub async fn remove(&self, room: &RoomName) {
        self.chats.write().await.remove(room);
    }
}

#[async_trait]
impl ChatRepository for MemoryChatRepository {
    async fn get_or_create(&self, room: &RoomName) -> Result<Chat, RepositoryError> {
        let mut chats = self.chats.write().await;
        if let Some(chat) = chats.get(room) {
            return Ok(chat.clone());
        }
        let chat = Chat::new(
            ChatId(self.next_id.fetch_add(1, Ordering::Relaxed)),
            room.clone(),
        );
        chats.insert(room.clone(), chat.clone());
        Ok(chat)
    }

    async fn find_by_room(&self, room: &RoomName) -> Result<Option<Chat>, RepositoryError> {
        Ok(self.chats.read().await.get(room).cloned())
    }

    async fn exists(&self, room: &RoomName) -> Result<bool, RepositoryError> {
        Ok(self.chats.read().await.contains_key(room))
    }
}

#[derive(Default)]
pub struct MemoryMessageRepository {
    messages: RwLock<Vec<Message>>,
    next_id: AtomicI64,
    fail_next: AtomicBool,
}

impl MemoryMessageRepository {
    pub fn new() -> Self {
        Self {
            messages: RwLock::new(Vec::new()),
            next_id: AtomicI64::new(1),
            fail_next: AtomicBool::new(false),
        }
    }

    pub async fn all(&self) -> Vec<Message> {
        self.messages.read().await.clone()
    }

    /// 让下一次写入失败，用于模拟存储暂时不可用。
    pub fn fail_next_create(&self) {
        self.fail_next.store(true, Ordering::Relaxed);
    }
}

#[async_trait]
impl MessageRepository for MemoryMessageRepository {
    async fn create(&self, message: NewMessage) -> Result<Message, RepositoryError> {
        if self.fail_next.swap(false, Ordering::Relaxed) {
            return Err(RepositoryError::storage("message store unavailable"));
        }
        let message = message.into_message(MessageId(self.next_id.fetch_add(1, Ordering::Relaxed)));
        self.messages.write().await.push(message.clone());
        Ok(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn get_or_create_is_lazy_and_stable() {
        let repo = MemoryChatRepository::new();
        let room = RoomName::parse("chat_5").unwrap();

        assert!(!repo.exists(&room).await.unwrap());
        let first = repo.get_or_create(&room).await.unwrap();
        let second = repo.get_or_create(&room).await.unwrap();
        assert_eq!(first.id, second.id);
        assert!(repo.exists(&room).await.unwrap());
    }
}
