//! 聊天会话 Repository 实现。

use application::ChatRepository;
use async_trait::async_trait;
use domain::{Chat, ChatId, RepositoryError, RoomName};
use sqlx::FromRow;

use super::map_sqlx_error;
use crate::db::DbPool;

/// 数据库会话模型
#[derive(Debug, Clone, FromRow)]
struct DbChat {
    id: i64,
    room: String,
}

impl DbChat {
    fn into_chat(self) -> Result<Chat, RepositoryError> {
        let room = RoomName::parse(self.room)
            .map_err(|err| RepositoryError::storage(err.to_string()))?;
        Ok(Chat::new(ChatId(self.id), room))
    }
}

pub struct PgChatRepository {
    pool: DbPool,
}

impl PgChatRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ChatRepository for PgChatRepository {
    async fn get_or_create(&self, room: &RoomName) -> Result<Chat, RepositoryError> {
        // 并发安全的惰性创建：冲突时落到已有行
        sqlx::query("INSERT INTO chats (room) VALUES ($1) ON CONFLICT (room) DO NOTHING")
            .bind(room.as_str())
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        let row: DbChat = sqlx::query_as("SELECT id, room FROM chats WHERE room = $1")
            .bind(room.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        row.into_chat()
    }

    async fn find_by_room(&self, room: &RoomName) -> Result<Option<Chat>, RepositoryError> {
        let row: Option<DbChat> = sqlx::query_as("SELECT id, room FROM chats WHERE room = $1")
            .bind(room.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        row.map(DbChat::into_chat).transpose()
    }

    async fn exists(&self, room: &RoomName) -> Result<bool, RepositoryError> {
        let (exists,): (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM chats WHERE room = $1)")
            .bind(room.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(exists)
    }
}
